//! Wiring of a ready-to-use client from configuration

use std::sync::Arc;

use smartpantry_common::auth::SessionManager;
use smartpantry_domain::{Config, Result};
use tracing::info;

use crate::api::{
    AiApi, ApiClient, ApiClientConfig, AuthApi, HttpTokenRefresher, InventoryApi, PlannerApi,
    SessionProvider, ShoppingApi,
};
use crate::config;
use crate::storage::FileTokenStorage;

/// Session manager over the HTTP refresher and the session file
pub type AppSession = SessionManager<HttpTokenRefresher, FileTokenStorage>;

/// Every service of the client, sharing one session
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub session: Arc<AppSession>,
    pub client: Arc<ApiClient>,
    pub auth: Arc<AuthApi>,
    pub inventory: Arc<InventoryApi>,
    pub shopping: Arc<ShoppingApi>,
    pub planner: Arc<PlannerApi>,
    pub ai: Arc<AiApi>,
}

impl AppContext {
    /// Build the client and restore any session persisted at
    /// `config.session.storage_path`.
    ///
    /// # Errors
    /// Returns `SmartPantryError::Config` for invalid settings and
    /// `SmartPantryError::Storage` if the session file cannot be read.
    pub async fn from_config(config: Config) -> Result<Self> {
        config.validate()?;

        let storage = Arc::new(FileTokenStorage::new(config.session.storage_path.clone()));
        let refresher = Arc::new(HttpTokenRefresher::from_config(&config.api)?);
        let session = Arc::new(SessionManager::new(refresher, storage));
        let restored = session.initialize().await?;

        let provider: Arc<dyn SessionProvider> = Arc::clone(&session) as Arc<dyn SessionProvider>;
        let client = Arc::new(ApiClient::new(ApiClientConfig::from(&config.api), Arc::clone(&provider))?);

        info!(base_url = %config.api.base_url_trimmed(), restored, "SmartPantry client ready");

        Ok(Self {
            auth: Arc::new(AuthApi::new(Arc::clone(&client), provider)),
            inventory: Arc::new(InventoryApi::new(Arc::clone(&client))),
            shopping: Arc::new(ShoppingApi::new(Arc::clone(&client))),
            planner: Arc::new(PlannerApi::new(Arc::clone(&client))),
            ai: Arc::new(AiApi::new(Arc::clone(&client))),
            config: Arc::new(config),
            session,
            client,
        })
    }

    /// [`config::load`] followed by [`AppContext::from_config`].
    ///
    /// # Errors
    /// Any configuration or storage error.
    pub async fn from_env() -> Result<Self> {
        Self::from_config(config::load()?).await
    }
}
