use std::sync::Arc;

use slidesketch_core::{CompletionBackend, Config};

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub config: Config,
    pub backend: Arc<dyn CompletionBackend>,
}
