use std::sync::Arc;

use crate::fetch::Fetcher;
use crate::pipeline::StatsContext;
use crate::storage::DataDir;

#[derive(Clone)]
pub struct AppState {
    pub data_dir: Arc<DataDir>,
    pub stats: Arc<StatsContext>,
    pub fetcher: Arc<Fetcher>,
    pub cors_origin: Option<String>,
}
