//! Testing utilities: deterministic doubles for the classifier and LLM,
//! plus entry fixtures.
//!
//! # Example
//!
//! ```rust,ignore
//! use relief_core::testing::{fixtures, MockClassifier};
//!
//! let classifier = MockClassifier::new();
//! classifier.set_analysis("text", fixtures::need("Hatay", "çadır", 5, "urgent")).await;
//! ```

mod mock_classifier;
mod mock_llm;

pub use mock_classifier::MockClassifier;
pub use mock_llm::MockLlmClient;

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::Utc;

    use crate::entry::{AidEntry, Analysis, EntryStatus, Item, NewEntry};

    /// An item with an empty unit.
    pub fn item(name: &str, quantity: u32) -> Item {
        Item::new(name, quantity, "")
    }

    /// Analysis of a request for one product.
    pub fn need(location: &str, product: &str, quantity: u32, priority: &str) -> Analysis {
        Analysis {
            need: true,
            location: Some(location.to_string()),
            items: vec![item(product, quantity)],
            priority: priority.to_string(),
        }
    }

    /// Analysis of an offer of one product.
    pub fn offer(location: &str, product: &str, quantity: u32) -> Analysis {
        Analysis {
            need: false,
            location: Some(location.to_string()),
            items: vec![item(product, quantity)],
            priority: "low".to_string(),
        }
    }

    /// New demand entry.
    pub fn demand(name: &str, location: &str, items: Vec<Item>, priority: &str) -> NewEntry {
        NewEntry {
            name: Some(name.to_string()),
            original_text: format!("{} needs help in {}", name, location),
            analysis: Analysis {
                need: true,
                location: Some(location.to_string()),
                items,
                priority: priority.to_string(),
            },
        }
    }

    /// New supply entry (priority "low").
    pub fn supply(name: &str, location: &str, items: Vec<Item>) -> NewEntry {
        NewEntry {
            name: Some(name.to_string()),
            original_text: format!("{} can give supplies in {}", name, location),
            analysis: Analysis {
                need: false,
                location: Some(location.to_string()),
                items,
                priority: "low".to_string(),
            },
        }
    }

    /// Materialise a new entry as if the store had just inserted it.
    pub fn stored(entry: NewEntry) -> AidEntry {
        AidEntry {
            id: uuid::Uuid::new_v4().to_string(),
            name: entry.name,
            original_text: entry.original_text,
            analysis: entry.analysis,
            status: EntryStatus::Active,
            timestamp: Utc::now(),
            crisis_activated_at: None,
        }
    }
}
