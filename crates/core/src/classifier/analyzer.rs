//! Free-text classification into [`Analysis`] records.

use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex_lite::Regex;
use thiserror::Error;

use super::llm::{CompletionRequest, LlmClient, LlmError};
use crate::entry::Analysis;
use crate::metrics::{CLASSIFICATIONS_TOTAL, LLM_TOKENS};

/// Error type for classification.
#[derive(Debug, Error)]
pub enum ClassificationError {
    /// The text service could not be reached or returned an error.
    #[error("{0}")]
    Service(String),

    /// The reply could not be decoded as an analysis.
    #[error("{message}")]
    Decode { message: String, response: String },

    #[error("classifier not configured")]
    NotConfigured,
}

impl From<LlmError> for ClassificationError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::NotConfigured => ClassificationError::NotConfigured,
            other => ClassificationError::Service(other.to_string()),
        }
    }
}

/// Converts free text into a structured [`Analysis`].
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Analysis, ClassificationError>;
}

const CLASSIFY_INSTRUCTION: &str = r#"Analyze the text below, written by someone during a disaster, and answer with JSON ONLY. Do not write any explanation or other text.

The JSON must have exactly this shape:
{
    "need": true/false,
    "location": "city/district",
    "items": [
        {
            "name": "product name",
            "quantity": 0,
            "unit": "piece/pack/bottle"
        }
    ],
    "priority": "low/medium/high/urgent"
}

"need" is true when the writer is asking for aid and false when they are offering it.
Keep place and product names in the language of the text."#;

/// Classifier backed by an [`LlmClient`].
pub struct LlmClassifier {
    client: Arc<dyn LlmClient>,
    max_tokens: u32,
}

impl LlmClassifier {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client,
            max_tokens: 1024,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn build_prompt(text: &str) -> String {
        format!("Text: \"{}\"\n\nJSON:", text)
    }

    /// Decode a raw completion, tolerating a surrounding code fence.
    pub fn parse_response(text: &str) -> Result<Analysis, ClassificationError> {
        let cleaned = strip_code_fence(text);
        serde_json::from_str(cleaned).map_err(|e| ClassificationError::Decode {
            message: e.to_string(),
            response: text.to_string(),
        })
    }
}

#[async_trait]
impl Classifier for LlmClassifier {
    async fn classify(&self, text: &str) -> Result<Analysis, ClassificationError> {
        let request = CompletionRequest::new(Self::build_prompt(text))
            .with_system(CLASSIFY_INSTRUCTION)
            .with_max_tokens(self.max_tokens)
            .with_temperature(0.0);

        let response = match self.client.complete(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(provider = self.client.provider(), error = %e, "Classification request failed");
                CLASSIFICATIONS_TOTAL
                    .with_label_values(&["service_error"])
                    .inc();
                return Err(e.into());
            }
        };

        let provider = self.client.provider();
        LLM_TOKENS
            .with_label_values(&[provider, "input"])
            .inc_by(response.usage.input_tokens as u64);
        LLM_TOKENS
            .with_label_values(&[provider, "output"])
            .inc_by(response.usage.output_tokens as u64);

        match Self::parse_response(&response.text) {
            Ok(analysis) => {
                CLASSIFICATIONS_TOTAL.with_label_values(&["success"]).inc();
                tracing::debug!(
                    need = analysis.need,
                    location = analysis.location_or_unknown(),
                    items = analysis.items.len(),
                    "Classified text"
                );
                Ok(analysis)
            }
            Err(e) => {
                CLASSIFICATIONS_TOTAL
                    .with_label_values(&["decode_error"])
                    .inc();
                tracing::warn!(error = %e, "Classifier reply did not match the analysis schema");
                Err(e)
            }
        }
    }
}

/// Remove a leading code-fence marker (bare or `json`-tagged) and a trailing
/// one, trimming surrounding whitespace.
pub fn strip_code_fence(text: &str) -> &str {
    let mut cleaned = text.trim();
    if let Some(rest) = cleaned.strip_prefix("```json") {
        cleaned = rest;
    } else if let Some(rest) = cleaned.strip_prefix("```") {
        cleaned = rest;
    }
    if let Some(rest) = cleaned.strip_suffix("```") {
        cleaned = rest;
    }
    cleaned.trim()
}

static JSON_OBJECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[^}]+\}").unwrap());

/// Best-effort: the first `{...}` block in `text` that contains no nested
/// closing brace. Used for free-form advisor replies, not for classification.
pub fn extract_json_object(text: &str) -> Option<&str> {
    JSON_OBJECT.find(text).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::llm::{CompletionResponse, LlmUsage};
    use crate::entry::Item;
    use std::sync::Mutex;

    struct ScriptedClient {
        reply: Result<String, String>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedClient {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(message.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedClient {
        fn provider(&self) -> &str {
            "scripted"
        }

        fn model(&self) -> &str {
            "scripted-model"
        }

        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            self.prompts.lock().unwrap().push(request.prompt);
            match &self.reply {
                Ok(text) => Ok(CompletionResponse {
                    text: text.clone(),
                    usage: LlmUsage::default(),
                    model: "scripted-model".to_string(),
                }),
                Err(message) => Err(LlmError::Http(message.clone())),
            }
        }
    }

    const BODY: &str = r#"{"need": true, "location": "İzmir", "items": [{"name": "su", "quantity": 50, "unit": "şişe"}], "priority": "high"}"#;

    #[test]
    fn test_strip_code_fence_variants() {
        assert_eq!(strip_code_fence("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("  {}  "), "{}");
        assert_eq!(strip_code_fence("{}\n```"), "{}");
        assert_eq!(strip_code_fence("```json{}"), "{}");
    }

    #[test]
    fn test_fenced_and_unfenced_parse_identically() {
        let fenced = format!("```json\n{}\n```", BODY);
        let plain = LlmClassifier::parse_response(BODY).unwrap();
        let from_fence = LlmClassifier::parse_response(&fenced).unwrap();
        assert_eq!(plain, from_fence);
        assert_eq!(plain.items, vec![Item::new("su", 50, "şişe")]);
    }

    #[test]
    fn test_parse_response_reports_raw_text_on_failure() {
        let err = LlmClassifier::parse_response("I cannot help with that").unwrap_err();
        match err {
            ClassificationError::Decode { response, .. } => {
                assert_eq!(response, "I cannot help with that");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_extract_json_object() {
        let text = "Sure! Here it is: {\"recommended_city\": \"Kocaeli\"} hope it helps {\"x\": 1}";
        assert_eq!(
            extract_json_object(text),
            Some("{\"recommended_city\": \"Kocaeli\"}")
        );
        assert_eq!(extract_json_object("no braces here"), None);
        assert_eq!(extract_json_object("{}"), None);
    }

    #[tokio::test]
    async fn test_classify_sends_text_and_decodes() {
        let client = ScriptedClient::replying(&format!("```json\n{}\n```", BODY));
        let classifier = LlmClassifier::new(client.clone());

        let analysis = classifier
            .classify("İzmir'de 50 su ihtiyacımız var")
            .await
            .unwrap();
        assert!(analysis.need);
        assert_eq!(analysis.location.as_deref(), Some("İzmir"));

        let prompts = client.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("İzmir'de 50 su ihtiyacımız var"));
    }

    #[tokio::test]
    async fn test_classify_service_failure() {
        let classifier = LlmClassifier::new(ScriptedClient::failing("connection refused"));
        let err = classifier.classify("anything").await.unwrap_err();
        assert!(matches!(err, ClassificationError::Service(_)));
        assert!(err.to_string().contains("connection refused"));
    }
}
