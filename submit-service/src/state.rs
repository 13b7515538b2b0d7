use std::sync::Arc;

use shared::IdentityConfig;

use crate::store::RecordStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub identity: IdentityConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, identity: IdentityConfig) -> Self {
        Self { store, identity }
    }
}
