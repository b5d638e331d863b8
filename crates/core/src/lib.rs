pub mod advisor;
pub mod audit;
pub mod classifier;
pub mod config;
pub mod crisis;
pub mod entry;
pub mod lookup;
pub mod matching;
pub mod metrics;
pub mod report;
pub mod testing;

pub use advisor::{Advisor, AdvisorError, RiskAnalysis, SmartMatch};
pub use audit::{
    create_audit_system, AuditError, AuditEvent, AuditFilter, AuditHandle, AuditRecord,
    AuditStore, AuditWriter, SqliteAuditStore,
};
pub use classifier::{
    create_llm_client, ClassificationError, Classifier, LlmClassifier, LlmClient, LlmError,
};
pub use config::{
    load_config, load_config_from_str, validate_config, ClassifierConfig, Config, ConfigError,
    CrisisConfig, LlmProvider, SanitizedConfig,
};
pub use crisis::{CrisisCoordinator, CrisisError, EscalationReport, Notification, UrgentNeed};
pub use entry::{
    AidEntry, Analysis, EntryError, EntryFilter, EntryStatus, EntryStore, Item, NewEntry,
    Priority, SqliteEntryStore,
};
pub use lookup::{DispatchOutcome, LookupCatalog};
pub use matching::{match_entries, MatchQuery, MatchResult};
pub use report::{stock_balance, stock_summary, StockBalance, StockSummary};
