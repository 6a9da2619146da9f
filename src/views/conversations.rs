use super::Navigation;
use super::conversation::ConversationDetail;
use crate::api::{ApiClient, ApiError};
use crate::models::Conversation;
use crate::route::{PageQuery, Pagination, conversation_location, resolve};
use crate::ui::{CellValue, Column, ListHandler, PaginatedList};
use crate::utils::{LIST_TIME_FORMAT, format_timestamp};
use chrono_tz::Tz;
use tracing::info;

const SECTION: &str = "/conversations";

#[derive(Debug, Clone, PartialEq)]
pub struct ConversationRow {
    pub conversation: Conversation,
    pub last_message: String,
}

impl ConversationRow {
    pub fn new(conversation: Conversation, tz: Tz) -> Self {
        let last_message = format_timestamp(&conversation.updated, tz, LIST_TIME_FORMAT);
        Self {
            conversation,
            last_message,
        }
    }
}

pub fn columns() -> Vec<Column<ConversationRow>> {
    vec![
        Column::new("title", "Conversation Title", |r: &ConversationRow| {
            CellValue::Text(r.conversation.title.clone())
        })
        .with_render(|r: &ConversationRow| {
            if r.conversation.title.trim().is_empty() {
                "Untitled conversation".to_string()
            } else {
                r.conversation.title.clone()
            }
        }),
        Column::new("user", "User ID", |r: &ConversationRow| {
            CellValue::Text(r.conversation.user_id.clone())
        }),
        Column::new("updated", "Last Message Sent", |r: &ConversationRow| {
            CellValue::Text(r.last_message.clone())
        }),
    ]
}

/// Turns list events into navigations relative to the conversations section.
#[derive(Default)]
pub struct ListEvents {
    next: Option<Navigation>,
}

impl ListHandler<ConversationRow> for ListEvents {
    fn navigate(&mut self, target: String) {
        let target = resolve(SECTION, &target).unwrap_or(target);
        self.next = Some(Navigation::push(target));
    }

    fn row_clicked(&mut self, row: &ConversationRow) {
        self.next = Some(Navigation::replace(conversation_location(
            &row.conversation.id,
        )));
    }
}

/// The conversations layout: one page of conversations and, on a detail
/// location, the selected transcript beside it.
pub struct ConversationsView {
    pub list: PaginatedList<ConversationRow>,
    pub detail: Option<ConversationDetail>,
}

impl ConversationsView {
    pub async fn load(
        api: &ApiClient,
        query: PageQuery,
        selected: Option<&str>,
        tz: Tz,
    ) -> Result<Self, ApiError> {
        let (page, detail) = match selected {
            Some(id) => {
                let (page, detail) = tokio::try_join!(
                    api.list_conversations(query),
                    ConversationDetail::load(api, id, tz)
                )?;
                (page, Some(detail))
            }
            None => (api.list_conversations(query).await?, None),
        };

        info!(
            "Loaded {} of {} conversations (page {})",
            page.conversations.len(),
            page.total,
            page.page
        );

        let pagination = Pagination::from_page(&page);
        let refresh = format!("{}{}", SECTION, pagination.request().to_query());
        let rows = page
            .conversations
            .into_iter()
            .map(|c| ConversationRow::new(c, tz))
            .collect();

        let list = PaginatedList::new("Conversations", rows, columns(), pagination)
            .with_action("Refresh", refresh);

        Ok(Self { list, detail })
    }

    /// Runs a list interaction and returns the navigation it asked for, if any.
    pub fn interact<R>(
        &self,
        f: impl FnOnce(&PaginatedList<ConversationRow>, &mut ListEvents) -> R,
    ) -> (R, Option<Navigation>) {
        let mut events = ListEvents::default();
        let result = f(&self.list, &mut events);
        (result, events.next)
    }

    pub fn render(&self, width: usize) -> String {
        let mut out = self.list.render();
        if let Some(detail) = &self.detail {
            out.push('\n');
            out.push_str(&detail.render(width));
        }
        out
    }
}
