use std::sync::Arc;

use crate::audit::Auditor;
use crate::config::AuditorConfig;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: AuditorConfig,
    pub auditor: Auditor,
}

impl AppState {
    pub fn new(config: AuditorConfig, auditor: Auditor) -> Self {
        Self { config, auditor }
    }
}
