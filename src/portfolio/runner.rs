/// Parallel portfolio evaluation.
///
/// Each property is fetched and scored on its own worker; results come
/// back over a channel and are returned in the order the properties were
/// given. Evaluations share nothing mutable, so one property failing (bad
/// coordinate, upstream outage, malformed series) never touches another.

use crate::evaluator::{EvaluationError, LocationEvaluator};
use crate::portfolio::PropertyOutcome;
use crate::properties::Property;
use chrono::Utc;
use std::sync::mpsc;
use threadpool::ThreadPool;
use tracing::{info, warn};

/// Default number of concurrent upstream fetches.
pub const DEFAULT_WORKERS: usize = 4;

pub struct PortfolioRunner {
    evaluator: LocationEvaluator,
    workers: usize,
}

impl PortfolioRunner {
    pub fn new(evaluator: LocationEvaluator) -> Self {
        Self {
            evaluator,
            workers: DEFAULT_WORKERS,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Evaluates every property and returns one outcome per property, in
    /// input order.
    pub fn run(&self, properties: &[Property]) -> Vec<PropertyOutcome> {
        info!(
            properties = properties.len(),
            workers = self.workers,
            "evaluating portfolio"
        );

        let pool = ThreadPool::new(self.workers);
        let (tx, rx) = mpsc::channel();

        for (index, property) in properties.iter().cloned().enumerate() {
            let tx = tx.clone();
            let evaluator = self.evaluator.clone();
            pool.execute(move || {
                let outcome = evaluate_property(&evaluator, property);
                let _ = tx.send((index, outcome));
            });
        }
        drop(tx);

        let mut slots: Vec<Option<PropertyOutcome>> = properties.iter().map(|_| None).collect();
        for (index, outcome) in rx.iter() {
            if let Some(slot) = slots.get_mut(index) {
                *slot = Some(outcome);
            }
        }
        pool.join();

        // A job that panicked dropped its sender without reporting.
        let outcomes: Vec<PropertyOutcome> = slots
            .into_iter()
            .zip(properties)
            .map(|(slot, property)| {
                slot.unwrap_or_else(|| {
                    warn!(property = %property.id, "property evaluation did not complete");
                    PropertyOutcome {
                        property: property.clone(),
                        evaluated_at: Utc::now(),
                        result: Err(EvaluationError::Incomplete),
                    }
                })
            })
            .collect();

        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        info!(
            evaluated = outcomes.len() - failed,
            failed,
            "portfolio evaluation complete"
        );
        outcomes
    }
}

fn evaluate_property(evaluator: &LocationEvaluator, property: Property) -> PropertyOutcome {
    let result = property
        .coordinate()
        .map_err(EvaluationError::from)
        .and_then(|coordinate| evaluator.evaluate(coordinate));

    if let Err(e) = &result {
        warn!(property = %property.id, error = %e, "property evaluation failed");
    }

    PropertyOutcome {
        property,
        evaluated_at: Utc::now(),
        result,
    }
}
