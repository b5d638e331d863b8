//! In-process test fixture driving the router with mock collaborators.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use relief_core::config::DatabaseConfig;
use relief_core::testing::{MockClassifier, MockLlmClient};
use relief_core::{
    create_audit_system, Advisor, AuditStore, Classifier, Config, CrisisCoordinator, EntryStore,
    LlmClient, LookupCatalog, SqliteAuditStore, SqliteEntryStore,
};
use relief_server::state::AppState;

/// Router plus handles on its mocks.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new().await;
/// fixture.classifier.set_analysis("text", fixtures::offer("İzmir", "su", 10)).await;
/// let response = fixture.post("/submit-entry", json!({"text": "text"})).await;
/// assert_eq!(response.status, StatusCode::OK);
/// ```
pub struct TestFixture {
    pub router: Router,
    pub classifier: Arc<MockClassifier>,
    pub llm: Arc<MockLlmClient>,
    pub entries: Arc<dyn EntryStore>,
    /// Holds the SQLite file
    pub temp_dir: TempDir,
}

#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Which optional collaborators the fixture wires in.
#[derive(Debug, Clone)]
pub struct TestConfig {
    pub with_classifier: bool,
    pub llm_default_reply: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            with_classifier: true,
            llm_default_reply: "no idea".to_string(),
        }
    }
}

impl TestConfig {
    /// No classifier and no advisor, as when `[classifier]` is absent.
    pub fn without_classifier() -> Self {
        Self {
            with_classifier: false,
            ..Default::default()
        }
    }
}

impl TestFixture {
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    pub async fn with_config(test_config: TestConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let config = Config {
            database: DatabaseConfig {
                path: db_path.clone(),
            },
            ..Default::default()
        };

        let entries: Arc<dyn EntryStore> =
            Arc::new(SqliteEntryStore::new(&db_path).expect("Failed to create entry store"));
        let audit_store: Arc<dyn AuditStore> =
            Arc::new(SqliteAuditStore::new(&db_path).expect("Failed to create audit store"));

        let (audit_handle, audit_writer) = create_audit_system(Arc::clone(&audit_store), 100);
        tokio::spawn(audit_writer.run());

        let classifier = Arc::new(MockClassifier::new());
        let llm = Arc::new(MockLlmClient::new(test_config.llm_default_reply.clone()));
        let catalog = Arc::new(LookupCatalog::builtin());

        let crisis = Arc::new(
            CrisisCoordinator::new(
                Arc::clone(&entries),
                Arc::clone(&catalog),
                config.crisis.clone(),
            )
            .with_audit(audit_handle.clone()),
        );

        let (classifier_dep, advisor) = if test_config.with_classifier {
            (
                Some(Arc::clone(&classifier) as Arc<dyn Classifier>),
                Some(Arc::new(Advisor::new(
                    Arc::clone(&llm) as Arc<dyn LlmClient>,
                    Arc::clone(&catalog),
                ))),
            )
        } else {
            (None, None)
        };

        let state = Arc::new(AppState::new(
            config,
            Arc::clone(&entries),
            classifier_dep,
            catalog,
            crisis,
            advisor,
            audit_store,
            audit_handle,
        ));

        Self {
            router: relief_server::api::create_router(state),
            classifier,
            llm,
            entries,
            temp_dir,
        }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// POST without a body (query-string endpoints).
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request("POST", path, None).await
    }

    /// GET returning the raw body text.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Poll `/audit` until at least `count` events of `event_type` are stored.
    pub async fn wait_for_audit(&self, event_type: &str, count: u64) -> Value {
        let path = format!("/audit?event_type={}", event_type);
        for _ in 0..50 {
            let response = self.get(&path).await;
            if response.body["total"].as_u64().unwrap_or(0) >= count {
                return response.body;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("audit events of type {} never arrived", event_type);
    }

    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
