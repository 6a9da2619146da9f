use crate::models::ConversationsPage;
use thiserror::Error;
use url::Url;

const LOCATION_BASE: &str = "http://chatwatch.local/";
pub const DEFAULT_PAGE: u32 = 1;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("Invalid location '{0}': {1}")]
    InvalidLocation(String, url::ParseError),
    #[error("No page at {0}")]
    NotFound(String),
}

/// One-based paging as it appears in locations and API queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    pub page: u32,
    pub limit: u32,
}

/// Zero-based paging request emitted by list interactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page_index: u32,
    pub page_size: u32,
}

/// Where the current page sits among the server's rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page_index: u32,
    pub page_size: u32,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Conversations(PageQuery),
    /// The detail view is nested in the conversations layout, so it keeps a list page too.
    Conversation { id: String, list: PageQuery },
    Alerts,
}

impl PageQuery {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    fn from_url(url: &Url, default_limit: u32) -> Self {
        let mut page = None;
        let mut limit = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "page" => page = parse_positive(&value),
                "limit" => limit = parse_positive(&value),
                _ => {}
            }
        }
        Self::new(page.unwrap_or(DEFAULT_PAGE), limit.unwrap_or(default_limit))
    }
}

fn parse_positive(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|n| *n > 0)
}

impl PageRequest {
    /// Query string for this request, always `?page={page_index + 1}&limit={page_size}`.
    pub fn to_query(&self) -> String {
        format!(
            "?page={}&limit={}",
            self.page_index.saturating_add(1),
            self.page_size
        )
    }
}

impl From<PageQuery> for PageRequest {
    fn from(query: PageQuery) -> Self {
        Self {
            page_index: query.page.saturating_sub(1),
            page_size: query.limit,
        }
    }
}

impl Pagination {
    pub fn from_page(page: &ConversationsPage) -> Self {
        Self {
            page_index: page.page.saturating_sub(1),
            page_size: page.limit.max(1),
            total: page.total,
        }
    }

    /// Never zero, even for an empty result set.
    pub fn page_count(&self) -> u32 {
        let size = u64::from(self.page_size.max(1));
        let pages = self.total.div_ceil(size).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub fn request(&self) -> PageRequest {
        PageRequest {
            page_index: self.page_index,
            page_size: self.page_size,
        }
    }
}

impl Route {
    pub fn parse(location: &str, default_limit: u32) -> Result<Self, RouteError> {
        let url = resolve_url(None, location)?;
        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();

        match segments.as_slice() {
            [] => Ok(Route::Home),
            ["conversations"] => Ok(Route::Conversations(PageQuery::from_url(
                &url,
                default_limit,
            ))),
            ["conversations", id] => Ok(Route::Conversation {
                id: urlencoding::decode(id)
                    .map_err(|_| RouteError::NotFound(url.path().to_string()))?
                    .into_owned(),
                list: PageQuery::from_url(&url, default_limit),
            }),
            ["alerts"] => Ok(Route::Alerts),
            _ => Err(RouteError::NotFound(url.path().to_string())),
        }
    }
}

/// Location of one conversation; the id is escaped so any string survives [`Route::parse`].
pub fn conversation_location(id: &str) -> String {
    format!("/conversations/{}", urlencoding::encode(id))
}

/// Resolves `target` against `current` the way a browser resolves a link,
/// returning the path and query of the result.
pub fn resolve(current: &str, target: &str) -> Result<String, RouteError> {
    let url = resolve_url(Some(current), target)?;
    Ok(match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    })
}

fn resolve_url(current: Option<&str>, target: &str) -> Result<Url, RouteError> {
    let invalid = |e| RouteError::InvalidLocation(target.to_string(), e);
    let mut base = Url::parse(LOCATION_BASE).map_err(invalid)?;
    if let Some(current) = current {
        base = base.join(current).map_err(invalid)?;
    }
    base.join(target).map_err(invalid)
}
