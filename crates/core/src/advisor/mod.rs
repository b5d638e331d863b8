//! LLM-assisted recommendations: where to source a product from, and which
//! regions look at risk.
//!
//! Replies are free-form; the first flat JSON object in the reply is used
//! and a fixed answer is substituted when none can be read.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::classifier::{extract_json_object, CompletionRequest, LlmClient, LlmError};
use crate::lookup::LookupCatalog;

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Suggested source city for a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmartMatch {
    pub ai_recommendation: Map<String, Value>,
    pub nearby_options: Vec<String>,
    /// True when the model's reply could not be read and the fixed answer was used.
    pub fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAnalysis {
    pub ai_analysis: Map<String, Value>,
    pub timestamp: DateTime<Utc>,
    pub fallback: bool,
}

pub struct Advisor {
    client: Arc<dyn LlmClient>,
    catalog: Arc<LookupCatalog>,
}

impl Advisor {
    pub fn new(client: Arc<dyn LlmClient>, catalog: Arc<LookupCatalog>) -> Self {
        Self { client, catalog }
    }

    pub async fn smart_match(
        &self,
        location: &str,
        product: &str,
    ) -> Result<SmartMatch, AdvisorError> {
        let nearby = self.catalog.nearby_cities(location);
        let first = nearby.first().cloned().unwrap_or_default();

        let prompt = format!(
            r#"There is a need for {product} in {location}.
Pick one of the nearby cities: {options}

Answer in JSON:
{{
    "recommended_city": "{first}",
    "reason": "Close by and has enough stock",
    "distance": "50",
    "available_amount": "10"
}}"#,
            product = product,
            location = location,
            options = nearby.join(", "),
            first = first,
        );

        let reply = self.ask(prompt).await?;
        let (ai_recommendation, fallback) = match read_object(&reply) {
            Some(object) => (object, false),
            None => {
                tracing::warn!(location = %location, product = %product, "Smart matching reply unreadable, using nearest city");
                (
                    into_object(json!({
                        "recommended_city": first,
                        "reason": "Nearest city",
                        "distance": "100",
                        "available_amount": "5",
                    })),
                    true,
                )
            }
        };

        Ok(SmartMatch {
            ai_recommendation,
            nearby_options: nearby,
            fallback,
        })
    }

    pub async fn risk_analysis(&self) -> Result<RiskAnalysis, AdvisorError> {
        let prompt = r#"Analyse earthquake risk and aid resources for the cities of Turkey.

Answer in JSON:
{
    "high_risk": ["list of cities"],
    "low_supply": ["cities short on stock"],
    "recommendation": "recommendation text"
}"#
        .to_string();

        let reply = self.ask(prompt).await?;
        let (ai_analysis, fallback) = match read_object(&reply) {
            Some(object) => (object, false),
            None => {
                tracing::warn!("Risk analysis reply unreadable, using default assessment");
                (
                    into_object(json!({
                        "high_risk": ["İstanbul", "İzmir", "Bursa"],
                        "low_supply": ["Trabzon", "Samsun"],
                        "recommendation": "Increasing stock in these cities is recommended",
                    })),
                    true,
                )
            }
        };

        Ok(RiskAnalysis {
            ai_analysis,
            timestamp: Utc::now(),
            fallback,
        })
    }

    async fn ask(&self, prompt: String) -> Result<String, AdvisorError> {
        let request = CompletionRequest::new(prompt)
            .with_max_tokens(512)
            .with_temperature(0.2);
        let response = self.client.complete(request).await?;
        Ok(response.text)
    }
}

fn read_object(reply: &str) -> Option<Map<String, Value>> {
    let raw = extract_json_object(reply)?;
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}

fn into_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(object) => object,
        _ => Map::new(),
    }
}
