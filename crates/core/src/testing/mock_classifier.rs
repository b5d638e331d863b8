//! Mock classifier for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::classifier::{ClassificationError, Classifier};
use crate::entry::Analysis;

/// Mock implementation of the [`Classifier`] trait.
///
/// Returns scripted analyses keyed by the exact input text. Unknown text
/// fails with a service error, as a real backend would for garbage input.
///
/// # Example
///
/// ```rust,ignore
/// use relief_core::testing::{MockClassifier, fixtures};
///
/// let classifier = MockClassifier::new();
/// classifier
///     .set_analysis("İzmir'de 50 su lazım", fixtures::need("İzmir", "su", 50, "high"))
///     .await;
///
/// let analysis = classifier.classify("İzmir'de 50 su lazım").await?;
/// assert!(analysis.need);
/// ```
#[derive(Default)]
pub struct MockClassifier {
    analyses: Arc<RwLock<HashMap<String, Analysis>>>,
    /// If set, every call fails with this message.
    failure: Arc<RwLock<Option<String>>>,
    /// Texts received, in call order.
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the analysis returned for `text`.
    pub async fn set_analysis(&self, text: impl Into<String>, analysis: Analysis) {
        self.analyses.write().await.insert(text.into(), analysis);
    }

    /// Make every subsequent call fail.
    pub async fn fail_with(&self, message: impl Into<String>) {
        *self.failure.write().await = Some(message.into());
    }

    pub async fn clear_failure(&self) {
        *self.failure.write().await = None;
    }

    pub async fn calls(&self) -> Vec<String> {
        self.calls.read().await.clone()
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn classify(&self, text: &str) -> Result<Analysis, ClassificationError> {
        self.calls.write().await.push(text.to_string());

        if let Some(message) = self.failure.read().await.clone() {
            return Err(ClassificationError::Service(message));
        }

        self.analyses
            .read()
            .await
            .get(text)
            .cloned()
            .ok_or_else(|| ClassificationError::Service(format!("no scripted analysis for: {}", text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_scripted_analysis_and_calls() {
        let classifier = MockClassifier::new();
        classifier
            .set_analysis("text", fixtures::need("Van", "su", 3, "urgent"))
            .await;

        let analysis = classifier.classify("text").await.unwrap();
        assert_eq!(analysis.location.as_deref(), Some("Van"));
        assert!(classifier.classify("other").await.is_err());
        assert_eq!(classifier.calls().await, vec!["text", "other"]);
    }

    #[tokio::test]
    async fn test_fail_with() {
        let classifier = MockClassifier::new();
        classifier
            .set_analysis("text", fixtures::offer("Van", "su", 3))
            .await;
        classifier.fail_with("quota exceeded").await;

        let err = classifier.classify("text").await.unwrap_err();
        assert_eq!(err.to_string(), "quota exceeded");

        classifier.clear_failure().await;
        assert!(classifier.classify("text").await.is_ok());
    }
}
