use std::sync::Arc;

use crate::config::Config;
use crate::quiz::SharedGenerator;

/// Shared state for the axum handlers. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub generator: SharedGenerator,
    pub config: Arc<Config>,
}
