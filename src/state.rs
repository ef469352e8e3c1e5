use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use crate::{
    config::Config,
    couchbase::CouchbaseStore,
    metrics,
    store::DocumentStore,
    templates::Templates,
};

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn DocumentStore>,
    pub templates: Templates,
    pub metrics: PrometheusHandle,
}

impl AppState {
    /// Connects to the configured store and assembles the shared state.
    /// A connection or authentication failure here is fatal; the server never
    /// starts without a working store.
    pub async fn new(config: Config) -> anyhow::Result<Arc<Self>> {
        let store = CouchbaseStore::connect(&config).await?;
        Self::with_store(config, Arc::new(store))
    }

    /// Assembles state around an already-constructed store. Tests use this to
    /// inject an in-memory store behind the same trait.
    pub fn with_store(
        config: Config,
        store: Arc<dyn DocumentStore>,
    ) -> anyhow::Result<Arc<Self>> {
        let templates = Templates::new()?;
        let metrics = metrics::install()?;

        Ok(Arc::new(Self {
            config,
            store,
            templates,
            metrics,
        }))
    }
}
