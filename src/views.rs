pub mod alerts;
pub mod conversation;
pub mod conversations;
pub mod home;

use crate::api::{ApiClient, ApiError};
use crate::route::Route;
use alerts::AlertsView;
use chrono_tz::Tz;
use conversations::ConversationsView;

/// A request to move to another location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub target: String,
    /// Replace the current history entry instead of adding one.
    pub replace: bool,
}

impl Navigation {
    pub fn push(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            replace: false,
        }
    }

    pub fn replace(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            replace: true,
        }
    }
}

pub enum Screen {
    Home,
    Conversations(ConversationsView),
    Alerts(AlertsView),
    NotFound(String),
    /// A loader failed; the message is the full error chain.
    Failed(String),
}

impl Screen {
    pub async fn load(api: &ApiClient, route: &Route, tz: Tz) -> Result<Self, ApiError> {
        Ok(match route {
            Route::Home => Screen::Home,
            Route::Conversations(query) => {
                Screen::Conversations(ConversationsView::load(api, *query, None, tz).await?)
            }
            Route::Conversation { id, list } => {
                Screen::Conversations(ConversationsView::load(api, *list, Some(id), tz).await?)
            }
            Route::Alerts => Screen::Alerts(AlertsView::load(api).await?),
        })
    }

    pub fn render(&self, width: usize) -> String {
        match self {
            Screen::Home => home::render(),
            Screen::Conversations(view) => view.render(width),
            Screen::Alerts(view) => view.render(),
            Screen::NotFound(path) => format!("Page not found: {}\n", path),
            Screen::Failed(message) => format!("Something went wrong\n{}\n", message),
        }
    }
}
