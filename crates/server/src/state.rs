use std::sync::Arc;

use relief_core::{
    Advisor, AuditHandle, AuditStore, Classifier, Config, CrisisCoordinator, EntryStore,
    LookupCatalog, SanitizedConfig,
};

/// Shared application state
pub struct AppState {
    config: Config,
    entries: Arc<dyn EntryStore>,
    classifier: Option<Arc<dyn Classifier>>,
    catalog: Arc<LookupCatalog>,
    crisis: Arc<CrisisCoordinator>,
    advisor: Option<Arc<Advisor>>,
    audit_store: Arc<dyn AuditStore>,
    audit: AuditHandle,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Config,
        entries: Arc<dyn EntryStore>,
        classifier: Option<Arc<dyn Classifier>>,
        catalog: Arc<LookupCatalog>,
        crisis: Arc<CrisisCoordinator>,
        advisor: Option<Arc<Advisor>>,
        audit_store: Arc<dyn AuditStore>,
        audit: AuditHandle,
    ) -> Self {
        Self {
            config,
            entries,
            classifier,
            catalog,
            crisis,
            advisor,
            audit_store,
            audit,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn entries(&self) -> &dyn EntryStore {
        self.entries.as_ref()
    }

    pub fn classifier(&self) -> Option<&Arc<dyn Classifier>> {
        self.classifier.as_ref()
    }

    pub fn catalog(&self) -> &LookupCatalog {
        self.catalog.as_ref()
    }

    pub fn crisis(&self) -> &CrisisCoordinator {
        self.crisis.as_ref()
    }

    pub fn advisor(&self) -> Option<&Arc<Advisor>> {
        self.advisor.as_ref()
    }

    pub fn audit_store(&self) -> &dyn AuditStore {
        self.audit_store.as_ref()
    }

    pub fn audit(&self) -> &AuditHandle {
        &self.audit
    }
}
