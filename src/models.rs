use serde::{Deserialize, Serialize};

/// Prompts scoring above this are flagged.
pub const PROMPT_RISK_THRESHOLD: i64 = 0;
/// Responses scoring at or above this are flagged.
pub const RESPONSE_RISK_THRESHOLD: i64 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub user_id: String,
    pub updated: String,
    #[serde(default)]
    pub created: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    pub id: String,
    pub text: String,
    pub risk_score: i64,
    pub conversation_id: String,
    pub created: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub llm_responses: Vec<LlmResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmResponse {
    pub id: String,
    /// Usually a JSON document encoded as a string; see `ui::chat::decode_output`.
    #[serde(default)]
    pub output: serde_json::Value,
    pub risk_score: i64,
    pub created: String,
    #[serde(default)]
    pub prompt_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptsPage {
    pub prompts: Vec<Prompt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationsPage {
    pub conversations: Vec<Conversation>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
}

impl Prompt {
    pub fn is_risky(&self) -> bool {
        self.risk_score > PROMPT_RISK_THRESHOLD
    }

    pub fn has_risky_response(&self) -> bool {
        self.llm_responses.iter().any(LlmResponse::is_risky)
    }
}

impl LlmResponse {
    pub fn is_risky(&self) -> bool {
        self.risk_score >= RESPONSE_RISK_THRESHOLD
    }
}

impl PromptsPage {
    pub fn risky_prompts(&self) -> Vec<&Prompt> {
        self.prompts.iter().filter(|p| p.is_risky()).collect()
    }

    pub fn prompts_with_risky_responses(&self) -> Vec<&Prompt> {
        self.prompts
            .iter()
            .filter(|p| p.has_risky_response())
            .collect()
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
