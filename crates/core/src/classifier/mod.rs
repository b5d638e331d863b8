//! Text classification: LLM clients and the analysis adapter built on them.

mod analyzer;
pub mod llm;

pub use analyzer::{
    extract_json_object, strip_code_fence, ClassificationError, Classifier, LlmClassifier,
};
pub use llm::{
    create_llm_client, AnthropicClient, CompletionRequest, CompletionResponse, GeminiClient,
    LlmClient, LlmError, LlmUsage, OllamaClient,
};
