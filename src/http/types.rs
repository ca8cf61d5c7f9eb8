use crate::db::Store;
use crate::roster::ColumnLabels;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Store,
    pub labels: Arc<ColumnLabels>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(store: Store, labels: ColumnLabels, max_upload_bytes: usize) -> Self {
        Self {
            store,
            labels: Arc::new(labels),
            max_upload_bytes,
        }
    }
}
