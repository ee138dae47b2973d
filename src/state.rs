use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::IncomeStore;
use crate::services::IncomeService;

/// Shared application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub incomes: IncomeService,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn IncomeStore>) -> Self {
        Self {
            config: Arc::new(config),
            incomes: IncomeService::new(store),
        }
    }
}
