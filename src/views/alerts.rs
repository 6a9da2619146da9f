use super::Navigation;
use crate::api::{ApiClient, ApiError};
use crate::models::{Prompt, PromptsPage};
use crate::route::conversation_location;
use crate::ui::{AlertHandler, AlertItem, AlertPanel};
use tracing::info;

pub const SHOWN_ALERTS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Prompt,
    Response,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PromptAlert {
    pub prompt: Prompt,
    pub kind: AlertKind,
}

impl AlertItem for PromptAlert {
    fn text(&self) -> &str {
        &self.prompt.text
    }

    fn meta(&self) -> Option<String> {
        let score = match self.kind {
            AlertKind::Prompt => self.prompt.risk_score,
            AlertKind::Response => self
                .prompt
                .llm_responses
                .iter()
                .map(|r| r.risk_score)
                .max()
                .unwrap_or_default(),
        };
        Some(format!(
            "risk {} · conversation {}",
            score, self.prompt.conversation_id
        ))
    }
}

#[derive(Default)]
struct AlertEvents {
    next: Option<Navigation>,
}

impl AlertHandler<PromptAlert> for AlertEvents {
    fn alert_clicked(&mut self, item: &PromptAlert) {
        self.next = Some(Navigation::push(conversation_location(
            &item.prompt.conversation_id,
        )));
    }
}

pub struct AlertsView {
    pub risky_prompts: AlertPanel<PromptAlert>,
    pub risky_responses: AlertPanel<PromptAlert>,
}

impl AlertsView {
    pub async fn load(api: &ApiClient) -> Result<Self, ApiError> {
        let page = api.list_prompts_and_responses(None).await?;
        Ok(Self::from_page(&page))
    }

    /// Both panels are filters over the same fetched prompts.
    pub fn from_page(page: &PromptsPage) -> Self {
        let alerts = |prompts: Vec<&Prompt>, kind: AlertKind| -> Vec<PromptAlert> {
            prompts
                .into_iter()
                .map(|p| PromptAlert {
                    prompt: p.clone(),
                    kind,
                })
                .collect()
        };

        let risky_prompts = alerts(page.risky_prompts(), AlertKind::Prompt);
        let risky_responses = alerts(page.prompts_with_risky_responses(), AlertKind::Response);
        info!(
            "{} risky prompts, {} prompts with risky responses",
            risky_prompts.len(),
            risky_responses.len()
        );

        let prompt_count = risky_prompts.len();
        let response_count = risky_responses.len();
        Self {
            risky_prompts: AlertPanel::new("Risky Prompts", 'P', risky_prompts)
                .description("Prompts that may lead to harmful or sensitive content.")
                .count(prompt_count)
                .max_items(SHOWN_ALERTS),
            risky_responses: AlertPanel::new("Risky Responses", 'R', risky_responses)
                .description(
                    "LLM responses that may provide harmful, sensitive, or confidential information.",
                )
                .count(response_count)
                .max_items(SHOWN_ALERTS),
        }
    }

    /// Opens an item by reference such as `P3` or `r1`.
    pub fn open(&self, reference: &str) -> Option<Navigation> {
        let mut chars = reference.trim().chars();
        let key = chars.next()?.to_ascii_uppercase();
        let position: usize = chars.as_str().parse().ok()?;

        let panel = [&self.risky_prompts, &self.risky_responses]
            .into_iter()
            .find(|p| p.key() == key)?;

        let mut events = AlertEvents::default();
        panel.select(position, &mut events);
        events.next
    }

    pub fn render(&self) -> String {
        format!(
            "{}\n{}",
            self.risky_prompts.render(),
            self.risky_responses.render()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{prompt, response};
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn page(prompts: Vec<Prompt>) -> PromptsPage {
        PromptsPage { prompts }
    }

    fn many_risky(n: usize) -> Vec<Prompt> {
        (0..n)
            .map(|i| prompt(&format!("p{}", i), &format!("c{}", i), 1))
            .collect()
    }

    #[test]
    fn truncates_render_but_counts_everything() {
        let view = AlertsView::from_page(&page(many_risky(12)));
        assert_eq!(view.risky_prompts.shown().len(), 8);
        assert_eq!(view.risky_prompts.total(), 12);

        let out = view.render();
        assert!(out.contains("Risky Prompts (12 alerts)"));
        assert!(out.contains("Risky Responses (0 alerts)"));
        assert!(out.contains("You're all clear right now."));
    }

    #[test]
    fn panels_use_separate_thresholds() {
        let mut mild_reply = prompt("a", "c1", 0);
        mild_reply.llm_responses = vec![response("ra", 2, "meh")];
        let mut bad_reply = prompt("b", "c2", 0);
        bad_reply.llm_responses = vec![response("rb0", 0, "ok"), response("rb1", 3, "bad")];
        let risky_prompt = prompt("c", "c3", 1);

        let view = AlertsView::from_page(&page(vec![mild_reply, bad_reply, risky_prompt]));
        let prompt_ids: Vec<&str> = view
            .risky_prompts
            .shown()
            .iter()
            .map(|a| a.prompt.id.as_str())
            .collect();
        let response_ids: Vec<&str> = view
            .risky_responses
            .shown()
            .iter()
            .map(|a| a.prompt.id.as_str())
            .collect();

        assert_eq!(prompt_ids, vec!["c"]);
        assert_eq!(response_ids, vec!["b"]);
        assert_eq!(
            view.risky_responses.shown()[0].meta().as_deref(),
            Some("risk 3 · conversation c2")
        );
    }

    #[test]
    fn opening_alert_navigates_to_conversation() {
        let view = AlertsView::from_page(&page(many_risky(3)));
        assert_eq!(view.open("p2"), Some(Navigation::push("/conversations/c1")));
        assert_eq!(view.open("P9"), None);
        assert_eq!(view.open("R1"), None);
        assert_eq!(view.open("x1"), None);
        assert_eq!(view.open(""), None);
    }

    #[test]
    fn alert_links_escape_conversation_ids() {
        let view = AlertsView::from_page(&page(vec![prompt("p1", "team/7 a", 2)]));
        assert_eq!(
            view.open("P1"),
            Some(Navigation::push("/conversations/team%2F7%20a"))
        );
    }

    #[tokio::test]
    async fn loads_unscoped_prompts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/prompts"))
            .and(query_param("include", "llm_responses"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "prompts": many_risky(2) })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let api = ApiClient::with_client(&server.uri(), reqwest::Client::new()).unwrap();
        let view = AlertsView::load(&api).await.unwrap();
        assert_eq!(view.risky_prompts.total(), 2);
    }
}
