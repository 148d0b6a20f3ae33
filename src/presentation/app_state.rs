// Application state for HTTP handlers
use crate::application::data_manager::DataManager;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub data_manager: Arc<DataManager>,
}
