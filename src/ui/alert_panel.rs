use crate::utils::truncate_line;

pub const DEFAULT_MAX_ITEMS: usize = 8;
const TEXT_WIDTH: usize = 72;

/// Something that can be listed as an alert.
pub trait AlertItem {
    fn text(&self) -> &str;
    fn meta(&self) -> Option<String> {
        None
    }
}

pub trait AlertHandler<T> {
    fn alert_clicked(&mut self, item: &T);
}

pub struct AlertPanel<T> {
    title: String,
    description: Option<String>,
    /// Shown instead of the item count when set.
    count: Option<usize>,
    items: Vec<T>,
    max_items: usize,
    /// Prefix for item references, e.g. `P` gives `P1`, `P2`, ...
    key: char,
}

impl<T: AlertItem> AlertPanel<T> {
    pub fn new(title: impl Into<String>, key: char, items: Vec<T>) -> Self {
        Self {
            title: title.into(),
            description: None,
            count: None,
            items,
            max_items: DEFAULT_MAX_ITEMS,
            key: key.to_ascii_uppercase(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub fn max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn key(&self) -> char {
        self.key
    }

    pub fn shown(&self) -> &[T] {
        &self.items[..self.items.len().min(self.max_items)]
    }

    pub fn total(&self) -> usize {
        self.count.unwrap_or(self.items.len())
    }

    /// `position` is one-based over the shown items.
    pub fn select(&self, position: usize, handler: &mut impl AlertHandler<T>) -> bool {
        match position.checked_sub(1).and_then(|i| self.shown().get(i)) {
            Some(item) => {
                handler.alert_clicked(item);
                true
            }
            None => false,
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("== {} ==\n", self.title));
        if let Some(description) = &self.description {
            out.push_str(description);
            out.push('\n');
        }

        let total = self.total();
        let noun = if total == 1 { "alert" } else { "alerts" };
        out.push_str(&format!("{} ({} {})\n", self.title, total, noun));

        let shown = self.shown();
        if shown.is_empty() {
            out.push_str("    No alerts\n");
            out.push_str("    You're all clear right now.\n");
            return out;
        }

        for (i, item) in shown.iter().enumerate() {
            out.push_str(&format!(
                "  {}{:<3} {}\n",
                self.key,
                i + 1,
                truncate_line(item.text(), TEXT_WIDTH)
            ));
            if let Some(meta) = item.meta() {
                out.push_str(&format!("       {}\n", meta));
            }
        }
        out
    }
}
