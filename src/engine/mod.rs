mod async_engine;
mod errors;
mod matcher;
#[cfg(test)]
mod tests;

pub use async_engine::ReconciliationEngine;
pub use errors::EngineError;
pub use matcher::reconcile;
