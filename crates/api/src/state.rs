use std::sync::Arc;

use mirage_db::store::UserStore;
use mirage_replicate::{ModelVersions, PredictionsApi};
use tokio_util::sync::CancellationToken;

use crate::config::ServerConfig;

/// Shared application state available to all handlers.
///
/// The provider client and user store are held behind trait objects so
/// integration tests can swap in fakes without touching the network or
/// a database.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (bind address, CORS, JWT).
    pub config: Arc<ServerConfig>,
    /// Prediction provider client.
    pub predictions: Arc<dyn PredictionsApi>,
    /// Model versions used when building prediction requests.
    pub models: Arc<ModelVersions>,
    /// User persistence (usage counters, profile lookup).
    pub users: Arc<dyn UserStore>,
    /// Cancelled on shutdown; child tokens stop in-flight polling loops.
    pub shutdown: CancellationToken,
}
