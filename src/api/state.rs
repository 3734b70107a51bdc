//! Shared handler state

use std::sync::Arc;

use crate::config::Environment;
use crate::domain::GenerationService;

#[derive(Clone)]
pub struct AppState {
    pub generation_service: Arc<GenerationService>,
    pub environment: Environment,
}

impl AppState {
    pub fn new(generation_service: Arc<GenerationService>, environment: Environment) -> Self {
        Self {
            generation_service,
            environment,
        }
    }

    /// Whether upstream error text may be echoed to clients
    pub fn expose_error_details(&self) -> bool {
        !self.environment.is_production()
    }
}
