//! Application state shared by every handler.

use crate::auth::CredentialVerifier;
use crate::services::payments::PaymentService;
use std::sync::Arc;
use ticketpay_core::Config;
use ticketpay_db::PaymentStore;
use ticketpay_storage::Storage;
use ticketpay_upload::UploadGateway;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub payments: PaymentService,
    pub store: Arc<dyn PaymentStore>,
    pub storage: Arc<dyn Storage>,
    pub verifier: Arc<dyn CredentialVerifier>,
}

impl AppState {
    /// Wire the workflow from its collaborators. The storage backend is the
    /// one chosen at startup; nothing here looks at the environment.
    pub fn new(
        config: Config,
        store: Arc<dyn PaymentStore>,
        storage: Arc<dyn Storage>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Self {
        let gateway = UploadGateway::new(storage.clone());
        let payments = PaymentService::new(gateway, store.clone());

        Self {
            config,
            payments,
            store,
            storage,
            verifier,
        }
    }
}
