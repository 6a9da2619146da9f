pub mod alert_panel;
pub mod chat;
pub mod list;
pub mod nav;

pub use alert_panel::{AlertHandler, AlertItem, AlertPanel};
pub use chat::{ChatBubble, response_text};
pub use list::{CellValue, Column, ColumnFilter, ListError, ListHandler, PaginatedList};

/// Width screens are laid out for.
pub const SCREEN_WIDTH: usize = 100;
