use crate::auth::AuthStore;
use crate::config::StoreConfig;
use crate::store::DataStore;

/// Everything one client sees: its own session and its own copy of the data.
#[derive(Clone)]
pub struct App {
    pub auth: AuthStore,
    pub data: DataStore,
}

impl App {
    pub fn new(config: StoreConfig) -> Self {
        App {
            auth: AuthStore::new(config.latency),
            data: DataStore::new(config),
        }
    }
}
