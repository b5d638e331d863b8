use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use relief_core::{
    create_audit_system, create_llm_client, load_config, validate_config, Advisor, AuditEvent,
    AuditStore, Classifier, CrisisCoordinator, EntryStore, LlmClassifier, LookupCatalog,
    SqliteAuditStore, SqliteEntryStore,
};
use relief_server::api::create_router;
use relief_server::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Buffer size for audit event channel
const AUDIT_BUFFER_SIZE: usize = 1000;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::var("RELIEF_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Database path: {:?}", config.database.path);

    // Short config hash for the audit trail
    let config_json = serde_json::to_string(&config).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    let config_hash_short = &config_hash[..16];

    let entries: Arc<dyn EntryStore> = Arc::new(
        SqliteEntryStore::new(&config.database.path).context("Failed to create entry store")?,
    );
    info!("Entry store initialized");

    let audit_store: Arc<dyn AuditStore> = Arc::new(
        SqliteAuditStore::new(&config.database.path).context("Failed to create audit store")?,
    );
    info!("Audit store initialized");

    let (audit_handle, audit_writer) =
        create_audit_system(Arc::clone(&audit_store), AUDIT_BUFFER_SIZE);
    let writer_handle = tokio::spawn(audit_writer.run());

    audit_handle
        .emit(AuditEvent::ServiceStarted {
            version: VERSION.to_string(),
            config_hash: config_hash_short.to_string(),
        })
        .await;

    // Classifier and advisor share one LLM client
    let llm_client = match &config.classifier {
        Some(classifier_config) => {
            let client =
                create_llm_client(classifier_config).context("Failed to create LLM client")?;
            info!(
                "Classifier using {} ({})",
                client.provider(),
                client.model()
            );
            Some(client)
        }
        None => {
            info!("No classifier configured, classification endpoints are disabled");
            None
        }
    };

    let classifier: Option<Arc<dyn Classifier>> = match (&llm_client, &config.classifier) {
        (Some(client), Some(classifier_config)) => Some(Arc::new(
            LlmClassifier::new(Arc::clone(client)).with_max_tokens(classifier_config.max_tokens),
        )),
        _ => None,
    };

    let catalog = Arc::new(LookupCatalog::builtin());

    let advisor = llm_client
        .as_ref()
        .map(|client| Arc::new(Advisor::new(Arc::clone(client), Arc::clone(&catalog))));

    let crisis = Arc::new(
        CrisisCoordinator::new(
            Arc::clone(&entries),
            Arc::clone(&catalog),
            config.crisis.clone(),
        )
        .with_audit(audit_handle.clone()),
    );

    let state = Arc::new(AppState::new(
        config.clone(),
        entries,
        classifier,
        catalog,
        crisis,
        advisor,
        audit_store,
        audit_handle.clone(),
    ));

    let app = create_router(state);

    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutting down...");
    audit_handle
        .emit(AuditEvent::ServiceStopped {
            reason: "graceful_shutdown".to_string(),
        })
        .await;

    // The router (and the coordinator's handle clone) is gone once serve
    // returns; dropping ours closes the channel so the writer drains and exits.
    drop(audit_handle);
    let _ = writer_handle.await;
    info!("Audit writer stopped");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
