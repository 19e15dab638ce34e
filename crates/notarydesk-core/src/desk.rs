// ── Desk ──
//
// Lifecycle-scoped facade: built once per process from a `BackendConfig`,
// passed explicitly to whoever needs it, and shut down before exit so
// in-flight notifications are not dropped.

use std::sync::Arc;

use notarydesk_api::{FunctionsClient, ProjectKeys, RestClient, WebhookClient};
use tracing::{debug, info};
use uuid::Uuid;

use crate::backend::{
    BookingStore, CrmNotifier, EmailNotifier, HostedPayments, HostedStore, Notifier,
    PaymentGateway, SmsNotifier, WebhookNotifier,
};
use crate::config::BackendConfig;
use crate::error::CoreError;
use crate::model::{BookingRecord, BookingStatus};
use crate::presenter::Presenter;
use crate::submit::{Dispatcher, Orchestrator, SubmissionOutcome};
use crate::wizard::{BookingWizard, ValidatedDraft};

pub struct Desk {
    config: BackendConfig,
    store: Arc<dyn BookingStore>,
    orchestrator: Orchestrator,
}

impl Desk {
    /// Wire up the hosted store, checkout and notification channels.
    pub fn new(config: BackendConfig) -> Result<Self, CoreError> {
        let transport = config.transport();
        let mut keys = ProjectKeys::anonymous(config.anon_key.clone());
        if let Some(admin) = &config.admin_key {
            keys = keys.with_admin_key(admin.clone());
        }
        let project_url = config.project_url.as_str();

        let rest = RestClient::new(project_url, &keys, &transport, config.table.clone())?;
        let functions = Arc::new(FunctionsClient::new(
            project_url,
            &keys,
            &transport,
            config.functions.clone(),
        )?);

        let store: Arc<dyn BookingStore> = Arc::new(HostedStore::new(rest));
        let payments: Arc<dyn PaymentGateway> = Arc::new(HostedPayments::new(
            Arc::clone(&functions),
            config.success_url.clone(),
            config.cancel_url.clone(),
        ));

        let mut notifiers: Vec<Arc<dyn Notifier>> = Vec::with_capacity(4);
        notifiers.push(Arc::new(EmailNotifier::new(
            Arc::clone(&functions),
            config.business.clone(),
        )));
        notifiers.push(Arc::new(SmsNotifier::new(
            Arc::clone(&functions),
            config.business.clone(),
        )));
        notifiers.push(Arc::new(CrmNotifier::new(Arc::clone(&functions))));
        if let Some(url) = &config.automation_webhook {
            let client = WebhookClient::new(url.clone(), &transport)?;
            notifiers.push(Arc::new(WebhookNotifier::new(
                client,
                config.business.clone(),
            )));
        }

        debug!(
            project = %config.project_url,
            admin = keys.is_admin(),
            channels = notifiers.len(),
            "desk ready"
        );
        Ok(Self::from_parts(config, store, payments, notifiers))
    }

    /// Assemble from explicit collaborators.
    pub fn from_parts(
        config: BackendConfig,
        store: Arc<dyn BookingStore>,
        payments: Arc<dyn PaymentGateway>,
        notifiers: Vec<Arc<dyn Notifier>>,
    ) -> Self {
        let orchestrator = Orchestrator::new(
            Arc::clone(&store),
            payments,
            notifiers,
            Dispatcher::new(),
            config.business.clone(),
        );
        Self {
            config,
            store,
            orchestrator,
        }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// A fresh wizard for one booking attempt.
    pub fn wizard(&self) -> BookingWizard {
        BookingWizard::new()
    }

    pub async fn submit(
        &self,
        draft: ValidatedDraft,
        presenter: &dyn Presenter,
    ) -> Result<SubmissionOutcome, CoreError> {
        self.orchestrator.submit(draft, presenter).await
    }

    pub async fn get_booking(&self, id: Uuid) -> Result<BookingRecord, CoreError> {
        self.store.get(id).await
    }

    /// Direct status write (admin action). No transition is refused.
    pub async fn set_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<BookingRecord, CoreError> {
        self.store.set_status(id, status).await
    }

    /// Wait for in-flight notifications, then drop the desk.
    pub async fn shutdown(self) {
        let dispatcher = self.orchestrator.dispatcher();
        let pending = dispatcher.in_flight();
        dispatcher.shutdown().await;
        info!(pending, "desk shut down");
    }
}
