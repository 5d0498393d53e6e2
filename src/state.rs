use crate::config::settings::AppConfig;
use crate::infrastructure::storage::local::LocalStorage;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub storage: LocalStorage,
}

impl AppState {
    pub fn new(config: AppConfig, storage: LocalStorage) -> Self {
        Self { config, storage }
    }
}
