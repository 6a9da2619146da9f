use crate::api::{ApiClient, ApiError};
use crate::models::{Conversation, Prompt};
use crate::ui::{ChatBubble, response_text};
use crate::utils::{BUBBLE_TIME_FORMAT, format_timestamp};
use chrono_tz::Tz;
use tracing::info;

/// The backend lists prompts and responses newest first; transcripts read oldest first.
pub fn chronological(prompts: Vec<Prompt>) -> Vec<Prompt> {
    prompts
        .into_iter()
        .rev()
        .map(|mut prompt| {
            prompt.llm_responses.reverse();
            prompt
        })
        .collect()
}

pub struct ConversationDetail {
    pub conversation: Conversation,
    pub transcript: Vec<Prompt>,
    tz: Tz,
}

impl ConversationDetail {
    pub async fn load(api: &ApiClient, id: &str, tz: Tz) -> Result<Self, ApiError> {
        let conversation = api.get_conversation(id).await?;
        let prompts = api.list_prompts_and_responses(Some(id)).await?;
        info!(
            "Loaded conversation {} with {} prompts",
            id,
            prompts.prompts.len()
        );

        Ok(Self {
            conversation,
            transcript: chronological(prompts.prompts),
            tz,
        })
    }

    pub fn bubbles(&self) -> Vec<ChatBubble> {
        let mut bubbles = Vec::new();
        for prompt in &self.transcript {
            bubbles.push(ChatBubble::user(
                prompt.text.clone(),
                Some(format_timestamp(&prompt.created, self.tz, BUBBLE_TIME_FORMAT)),
            ));
            for response in &prompt.llm_responses {
                bubbles.push(ChatBubble::assistant(
                    response_text(&response.output),
                    Some(format_timestamp(
                        &response.created,
                        self.tz,
                        BUBBLE_TIME_FORMAT,
                    )),
                    response.risk_score,
                    response.is_risky(),
                ));
            }
        }
        bubbles
    }

    pub fn render(&self, width: usize) -> String {
        let title = if self.conversation.title.trim().is_empty() {
            "Untitled conversation"
        } else {
            self.conversation.title.as_str()
        };

        let mut out = String::new();
        let pad = width.saturating_sub(title.chars().count()) / 2;
        out.push_str(&format!("{}{}\n\n", " ".repeat(pad), title));

        if self.transcript.is_empty() {
            out.push_str("No messages in this conversation.\n");
            return out;
        }

        for bubble in self.bubbles() {
            out.push_str(&bubble.render(width));
            out.push('\n');
        }
        out
    }
}
