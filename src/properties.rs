/// Tracked property registry loaded from properties.toml
///
/// The portfolio of insured properties the service evaluates in bulk.
/// Property records themselves live in the dashboard backend; this file is
/// the local list of what to score, keyed by the backend's property id.

use crate::model::{Coordinate, CoordinateError};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_PROPERTIES_PATH: &str = "properties.toml";

/// One insured property.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Property {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Insured value in the portfolio currency.
    #[serde(default)]
    pub value: Option<f64>,
    /// Current annual premium before climate adjustment.
    #[serde(default)]
    pub premium: Option<f64>,
}

impl Property {
    pub fn coordinate(&self) -> Result<Coordinate, CoordinateError> {
        Coordinate::new(self.latitude, self.longitude)
    }
}

#[derive(Debug, Deserialize)]
struct PropertyRegistry {
    #[serde(default)]
    property: Vec<Property>,
}

#[derive(Debug, Error)]
pub enum PropertiesError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("property {id}: {source}")]
    Coordinate {
        id: String,
        #[source]
        source: CoordinateError,
    },

    #[error("duplicate property id: {0}")]
    DuplicateId(String),
}

/// Parses a registry from TOML text and checks ids and coordinates.
pub fn parse_properties(contents: &str, path: &Path) -> Result<Vec<Property>, PropertiesError> {
    let registry: PropertyRegistry = toml::from_str(contents).map_err(|source| PropertiesError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let mut seen = HashSet::new();
    for property in &registry.property {
        if !seen.insert(property.id.as_str()) {
            return Err(PropertiesError::DuplicateId(property.id.clone()));
        }
        property.coordinate().map_err(|source| PropertiesError::Coordinate {
            id: property.id.clone(),
            source,
        })?;
    }

    Ok(registry.property)
}

pub fn load_properties_from(path: &Path) -> Result<Vec<Property>, PropertiesError> {
    let contents = fs::read_to_string(path).map_err(|source| PropertiesError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_properties(&contents, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(contents: &str) -> Result<Vec<Property>, PropertiesError> {
        parse_properties(contents, Path::new("test.toml"))
    }

    #[test]
    fn test_parse_registry() {
        let properties = parse(
            r#"
            [[property]]
            id = "P-001"
            name = "Riverside Warehouse"
            latitude = 29.95
            longitude = -90.07
            value = 4500000.0
            premium = 18250.0

            [[property]]
            id = "P-002"
            name = "Hillside Office"
            latitude = 34.05
            longitude = -118.24
            "#,
        )
        .expect("registry should parse");

        assert_eq!(properties.len(), 2);
        assert_eq!(properties[0].value, Some(4_500_000.0));
        assert_eq!(properties[1].premium, None);
        assert!(properties[1].coordinate().is_ok());
    }

    #[test]
    fn test_empty_registry_is_allowed() {
        assert!(parse("").expect("empty file parses").is_empty());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = parse(
            r#"
            [[property]]
            id = "P-001"
            name = "A"
            latitude = 1.0
            longitude = 1.0

            [[property]]
            id = "P-001"
            name = "B"
            latitude = 2.0
            longitude = 2.0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, PropertiesError::DuplicateId(id) if id == "P-001"));
    }

    #[test]
    fn test_out_of_range_coordinate_names_property() {
        let err = parse(
            r#"
            [[property]]
            id = "P-009"
            name = "Nowhere"
            latitude = 95.0
            longitude = 0.0
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("P-009"), "got: {}", err);
    }

    #[test]
    fn test_repository_properties_toml_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_PROPERTIES_PATH);
        let properties = load_properties_from(&path).expect("shipped properties.toml should load");
        assert!(!properties.is_empty());
        for property in &properties {
            assert!(!property.id.is_empty(), "id must not be empty");
            assert!(!property.name.is_empty(), "name must not be empty");
        }
    }
}
