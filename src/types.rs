use serde::{Deserialize, Serialize};

/// Body of a text-completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompletionResponse {
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompletionChoice {
    pub text: String,
}

/// A validated classification. `category` is always one of the categories
/// the caller supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Exact prompt sent to the completion service.
    pub prompt: String,
    /// First completion choice as returned, before normalization.
    pub response: String,
    pub category: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifyRequest {
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    pub destination_name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClassifyResponse {
    pub id: String,
    pub created: i64,
    pub model: String,
    pub result: Option<ClassificationResult>,
}
