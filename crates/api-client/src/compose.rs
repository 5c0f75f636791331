//! Builds the full store set backed by HTTP repositories.

use crate::auth::HttpAuthService;
use crate::client::ApiClient;
use crate::repository::HttpRepository;
use crate::ApiResult;
use clinic_core::{
    AuthStore, Capabilities, ClinicConfig, ClinicStores, FileSessionStorage, List, Repositories,
    SessionStorage, TokenProvider,
};
use clinic_types::{Activity, Doctor, Fee, Patient, Visit};
use std::sync::Arc;

/// Connects every store to the API at `cfg.api_base_url()`.
///
/// The auth session is persisted under `cfg.session_dir()`. Entity requests carry the token of
/// the session held by the returned [`ClinicStores::auth`].
///
/// # Errors
///
/// Returns an error if the base URL is invalid or the HTTP client cannot be built.
pub fn connect(cfg: &ClinicConfig) -> ApiResult<ClinicStores> {
    let storage = Arc::new(FileSessionStorage::new(cfg.session_dir()));
    connect_with_storage(cfg, storage)
}

/// As [`connect`], with the auth session kept in `storage`.
pub fn connect_with_storage(
    cfg: &ClinicConfig,
    storage: Arc<dyn SessionStorage>,
) -> ApiResult<ClinicStores> {
    let anonymous = ApiClient::from_config(cfg)?;
    let auth = AuthStore::new(Arc::new(HttpAuthService::new(anonymous.clone())), storage);

    let tokens: Arc<dyn TokenProvider> = Arc::new(auth.clone());
    let client = anonymous.with_token_provider(tokens);
    tracing::info!("clinic API at {}", client.base_url());

    let fees: Arc<dyn List<Fee>> = Arc::new(HttpRepository::<Fee>::new(client.clone()));
    let activity: Arc<dyn List<Activity>> =
        Arc::new(HttpRepository::<Activity>::new(client.clone()));
    let repositories = Repositories {
        doctors: Capabilities::full(Arc::new(HttpRepository::<Doctor>::new(client.clone()))),
        patients: Capabilities::full(Arc::new(HttpRepository::<Patient>::new(client.clone()))),
        visits: Capabilities::full(Arc::new(HttpRepository::<Visit>::new(client))),
        fees: Some(fees),
        activity: Some(activity),
    };

    Ok(ClinicStores::new(cfg, auth, repositories))
}
