/// HTTP endpoint for on-demand risk evaluation
///
/// Provides a small REST API for the dashboard (or any other client) to
/// score a coordinate without linking the library.
///
/// Endpoints:
/// - GET /health - Service health check
/// - GET /climate-risks/multi-hazard?lat={lat}&lon={lon} - Five-hazard
///   assessment and premium multiplier for a coordinate

use crate::evaluator::{EvaluationError, LocationEvaluator};
use crate::model::Coordinate;
use serde_json::json;
use std::collections::HashMap;
use tracing::{info, warn};

const MULTI_HAZARD_PATH: &str = "/climate-risks/multi-hazard";

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

/// Splits a request target into path and decoded query parameters.
fn split_target(target: &str) -> (&str, HashMap<String, String>) {
    let (path, query) = target.split_once('?').unwrap_or((target, ""));
    let params = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let decode = |s: &str| {
                urlencoding::decode(s)
                    .map(|d| d.into_owned())
                    .unwrap_or_else(|_| s.to_string())
            };
            (decode(key), decode(value))
        })
        .collect();
    (path, params)
}

fn coordinate_param(params: &HashMap<String, String>, name: &str) -> Result<f64, String> {
    let raw = params
        .get(name)
        .ok_or_else(|| format!("missing query parameter '{}'", name))?;
    raw.trim()
        .parse::<f64>()
        .map_err(|_| format!("query parameter '{}' is not a number: {}", name, raw))
}

/// Resolves a request target to a status code and JSON body.
pub fn route(evaluator: &LocationEvaluator, target: &str) -> (u16, serde_json::Value) {
    let (path, params) = split_target(target);

    match path {
        "/health" => handle_health(),
        MULTI_HAZARD_PATH => handle_multi_hazard(evaluator, &params),
        _ => (
            404,
            json!({
                "error": "Not found",
                "available_endpoints": ["/health", "/climate-risks/multi-hazard?lat={lat}&lon={lon}"]
            }),
        ),
    }
}

/// Handle /health endpoint
fn handle_health() -> (u16, serde_json::Value) {
    (
        200,
        json!({
            "status": "ok",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION")
        }),
    )
}

/// Handle /climate-risks/multi-hazard endpoint
fn handle_multi_hazard(
    evaluator: &LocationEvaluator,
    params: &HashMap<String, String>,
) -> (u16, serde_json::Value) {
    let coordinate = coordinate_param(params, "lat")
        .and_then(|lat| coordinate_param(params, "lon").map(|lon| (lat, lon)))
        .and_then(|(lat, lon)| Coordinate::new(lat, lon).map_err(|e| e.to_string()));

    let coordinate = match coordinate {
        Ok(c) => c,
        Err(e) => return (400, json!({ "error": e })),
    };

    match evaluator.evaluate(coordinate) {
        Ok(assessment) => match serde_json::to_value(&assessment) {
            Ok(body) => (200, body),
            Err(e) => (500, json!({ "error": e.to_string() })),
        },
        Err(e) => {
            let status = match e {
                EvaluationError::Coordinate(_) => 400,
                EvaluationError::Assessment(_) => 422,
                EvaluationError::Ingest(_) => 502,
                EvaluationError::Incomplete => 500,
            };
            (
                status,
                json!({
                    "error": e.to_string(),
                    "latitude": coordinate.latitude,
                    "longitude": coordinate.longitude
                }),
            )
        }
    }
}

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

/// Start HTTP endpoint server on the specified port. Blocks serving
/// requests until the listener fails.
pub fn start_endpoint_server(port: u16, evaluator: LocationEvaluator) -> Result<(), String> {
    let server = tiny_http::Server::http(format!("0.0.0.0:{}", port))
        .map_err(|e| format!("Failed to start HTTP server: {}", e))?;

    info!(port, "HTTP endpoint listening");
    info!("   GET /health - Service health check");
    info!("   GET {}?lat={{lat}}&lon={{lon}} - Multi-hazard risk", MULTI_HAZARD_PATH);

    for request in server.incoming_requests() {
        let (status, body) = if *request.method() == tiny_http::Method::Get {
            route(&evaluator, request.url())
        } else {
            (405, json!({ "error": "Method not allowed" }))
        };
        info!(method = %request.method(), url = request.url(), status, "request");

        if let Err(e) = request.respond(create_response(status, &body)) {
            warn!(error = %e, "failed to send response");
        }
    }

    Ok(())
}

/// Create HTTP response with JSON body
fn create_response(status_code: u16, json: &serde_json::Value) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let body = serde_json::to_string_pretty(json).unwrap_or_else(|_| json.to_string());

    let response = tiny_http::Response::from_data(body.into_bytes())
        .with_status_code(tiny_http::StatusCode::from(status_code));

    match tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
        Ok(header) => response.with_header(header),
        Err(()) => response,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::tests::canned_evaluator;

    #[test]
    fn test_split_target_decodes_query() {
        let (path, params) = split_target("/climate-risks/multi-hazard?lat=29.95&lon=-90.07&note=a%20b");
        assert_eq!(path, MULTI_HAZARD_PATH);
        assert_eq!(params["lat"], "29.95");
        assert_eq!(params["lon"], "-90.07");
        assert_eq!(params["note"], "a b");
    }

    #[test]
    fn test_health() {
        let (status, body) = route(&canned_evaluator(), "/health");
        assert_eq!(status, 200);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "climate_risk_service");
    }

    #[test]
    fn test_multi_hazard_returns_assessment() {
        let (status, body) = route(&canned_evaluator(), "/climate-risks/multi-hazard?lat=35.0&lon=-110.0");
        assert_eq!(status, 200, "body: {}", body);
        assert_eq!(body["wildfire"]["level"], "High");
        assert_eq!(body["wildfire"]["probability"], 75);
        assert_eq!(body["drought"]["probability"], 90);
        assert_eq!(body["premium_multiplier"], 2.0);
    }

    #[test]
    fn test_multi_hazard_missing_parameter() {
        let (status, body) = route(&canned_evaluator(), "/climate-risks/multi-hazard?lat=35.0");
        assert_eq!(status, 400);
        assert!(body["error"].as_str().unwrap().contains("lon"));
    }

    #[test]
    fn test_multi_hazard_non_numeric_parameter() {
        let (status, _) = route(&canned_evaluator(), "/climate-risks/multi-hazard?lat=north&lon=1");
        assert_eq!(status, 400);
    }

    #[test]
    fn test_multi_hazard_out_of_range() {
        let (status, body) = route(&canned_evaluator(), "/climate-risks/multi-hazard?lat=95&lon=1");
        assert_eq!(status, 400);
        assert!(body["error"].as_str().unwrap().contains("latitude"));
    }

    #[test]
    fn test_multi_hazard_upstream_failure_is_bad_gateway() {
        let (status, body) = route(&canned_evaluator(), "/climate-risks/multi-hazard?lat=-33.9&lon=151.2");
        assert_eq!(status, 502);
        assert_eq!(body["latitude"], -33.9);
    }

    #[test]
    fn test_unknown_route() {
        let (status, body) = route(&canned_evaluator(), "/site/05568500");
        assert_eq!(status, 404);
        assert!(body["available_endpoints"].is_array());
    }
}
