//! Paginated, searchable, sortable list over one page of server rows.
//!
//! Page position is owned by the caller: paging actions never touch the
//! `Pagination` they were given, they emit a navigation target instead.
//! Search, per-column filters and sorting are local and only narrow or
//! reorder the rows already on this page.

use crate::route::{PageRequest, Pagination};
use crate::utils::fit;
use std::cmp::Ordering;
use thiserror::Error;

pub const PAGE_SIZE_OPTIONS: [u32; 3] = [10, 25, 50];
const MAX_COLUMN_WIDTH: usize = 40;
const EMPTY_TITLE: &str = "No conversations found";
const EMPTY_HINT: &str = "Try a different search.";

#[derive(Debug, Error, PartialEq)]
pub enum ListError {
    #[error("Unknown column: {0}")]
    UnknownColumn(String),
    #[error("Page size {0} is not offered")]
    UnsupportedPageSize(u32),
    #[error("No row {0} on this page")]
    NoRow(usize),
    #[error("No action {0}")]
    NoAction(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

impl CellValue {
    pub fn display(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => n.to_string(),
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().parse().ok(),
        }
    }

    fn compare(&self, other: &CellValue) -> Ordering {
        match (self, other) {
            (CellValue::Number(a), CellValue::Number(b)) => a.total_cmp(b),
            _ => self
                .display()
                .to_lowercase()
                .cmp(&other.display().to_lowercase()),
        }
    }
}

pub struct Column<T> {
    pub key: &'static str,
    pub header: &'static str,
    pub accessor: fn(&T) -> CellValue,
    /// Overrides the cell's display text when set.
    pub render: Option<fn(&T) -> String>,
}

impl<T> Column<T> {
    pub fn new(key: &'static str, header: &'static str, accessor: fn(&T) -> CellValue) -> Self {
        Self {
            key,
            header,
            accessor,
            render: None,
        }
    }

    pub fn with_render(mut self, render: fn(&T) -> String) -> Self {
        self.render = Some(render);
        self
    }

    fn cell(&self, row: &T) -> String {
        match self.render {
            Some(render) => render(row),
            None => (self.accessor)(row).display(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnFilter {
    Contains(String),
    Range { min: Option<f64>, max: Option<f64> },
}

impl ColumnFilter {
    fn matches(&self, value: &CellValue) -> bool {
        match self {
            ColumnFilter::Contains(needle) => contains_ignore_case(&value.display(), needle),
            ColumnFilter::Range { min, max } => match value.as_number() {
                Some(n) => min.is_none_or(|m| n >= m) && max.is_none_or(|m| n <= m),
                None => false,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    fn marker(self) -> &'static str {
        match self {
            SortDirection::Ascending => "^",
            SortDirection::Descending => "v",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: &'static str,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderAction {
    pub label: String,
    pub target: String,
}

/// Receives what the list wants to happen outside of it.
pub trait ListHandler<T> {
    /// `target` is a query string such as `?page=2&limit=25`.
    fn navigate(&mut self, target: String);
    fn row_clicked(&mut self, row: &T);
}

pub struct PaginatedList<T> {
    title: String,
    rows: Vec<T>,
    columns: Vec<Column<T>>,
    pagination: Pagination,
    actions: Vec<HeaderAction>,
    search: String,
    filters: Vec<(&'static str, ColumnFilter)>,
    sort: Option<SortSpec>,
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl<T> PaginatedList<T> {
    pub fn new(
        title: impl Into<String>,
        rows: Vec<T>,
        columns: Vec<Column<T>>,
        pagination: Pagination,
    ) -> Self {
        Self {
            title: title.into(),
            rows,
            columns,
            pagination,
            actions: Vec::new(),
            search: String::new(),
            filters: Vec::new(),
            sort: None,
        }
    }

    pub fn with_action(mut self, label: impl Into<String>, target: impl Into<String>) -> Self {
        self.actions.push(HeaderAction {
            label: label.into(),
            target: target.into(),
        });
        self
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    pub fn clear_search(&mut self) {
        self.search.clear();
    }

    pub fn sort(&self) -> Option<SortSpec> {
        self.sort
    }

    fn column(&self, key: &str) -> Result<&Column<T>, ListError> {
        self.columns
            .iter()
            .find(|c| c.key.eq_ignore_ascii_case(key) || c.header.eq_ignore_ascii_case(key))
            .ok_or_else(|| ListError::UnknownColumn(key.to_string()))
    }

    /// Numeric columns are judged by the first row, so an empty page treats every column as text.
    fn is_numeric(&self, column: &Column<T>) -> bool {
        self.rows
            .first()
            .is_some_and(|row| matches!((column.accessor)(row), CellValue::Number(_)))
    }

    pub fn set_filter(&mut self, key: &str, filter: ColumnFilter) -> Result<(), ListError> {
        let column_key = self.column(key)?.key;
        self.filters.retain(|(k, _)| *k != column_key);
        let is_empty = matches!(&filter, ColumnFilter::Contains(s) if s.is_empty())
            || matches!(filter, ColumnFilter::Range { min: None, max: None });
        if !is_empty {
            self.filters.push((column_key, filter));
        }
        Ok(())
    }

    pub fn clear_filter(&mut self, key: &str) -> Result<(), ListError> {
        let column_key = self.column(key)?.key;
        self.filters.retain(|(k, _)| *k != column_key);
        Ok(())
    }

    /// Cycles a column through its first direction, the opposite one, then unsorted.
    /// Text columns start ascending and numeric columns descending.
    pub fn toggle_sort(&mut self, key: &str) -> Result<Option<SortSpec>, ListError> {
        let column = self.column(key)?;
        let column_key = column.key;
        let first = if self.is_numeric(column) {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };

        self.sort = match self.sort {
            Some(spec) if spec.column == column_key => {
                if spec.direction == first {
                    Some(SortSpec {
                        column: column_key,
                        direction: first.flipped(),
                    })
                } else {
                    None
                }
            }
            _ => Some(SortSpec {
                column: column_key,
                direction: first,
            }),
        };
        Ok(self.sort)
    }

    fn row_matches(&self, row: &T) -> bool {
        let search_hit = self.search.trim().is_empty()
            || self
                .columns
                .iter()
                .any(|c| contains_ignore_case(&c.cell(row), self.search.trim()));

        search_hit
            && self.filters.iter().all(|(key, filter)| {
                self.columns
                    .iter()
                    .find(|c| c.key == *key)
                    .is_none_or(|c| filter.matches(&(c.accessor)(row)))
            })
    }

    /// Rows left after search and filters, in sort order.
    pub fn visible_rows(&self) -> Vec<&T> {
        let mut rows: Vec<&T> = self.rows.iter().filter(|r| self.row_matches(r)).collect();

        if let Some(spec) = self.sort
            && let Some(column) = self.columns.iter().find(|c| c.key == spec.column)
        {
            rows.sort_by(|a, b| {
                let ord = (column.accessor)(a).compare(&(column.accessor)(b));
                match spec.direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }

        rows
    }

    pub fn page_count(&self) -> u32 {
        self.pagination.page_count()
    }

    pub fn can_previous_page(&self) -> bool {
        self.pagination.page_index > 0
    }

    pub fn can_next_page(&self) -> bool {
        self.pagination.page_index + 1 < self.page_count()
    }

    fn go_to(&self, page_index: u32, page_size: u32, handler: &mut impl ListHandler<T>) {
        let request = PageRequest {
            page_index,
            page_size,
        };
        handler.navigate(request.to_query());
    }

    pub fn first_page(&self, handler: &mut impl ListHandler<T>) {
        if self.can_previous_page() {
            self.go_to(0, self.pagination.page_size, handler);
        }
    }

    pub fn previous_page(&self, handler: &mut impl ListHandler<T>) {
        if self.can_previous_page() {
            self.go_to(
                self.pagination.page_index - 1,
                self.pagination.page_size,
                handler,
            );
        }
    }

    pub fn next_page(&self, handler: &mut impl ListHandler<T>) {
        if self.can_next_page() {
            self.go_to(
                self.pagination.page_index + 1,
                self.pagination.page_size,
                handler,
            );
        }
    }

    pub fn last_page(&self, handler: &mut impl ListHandler<T>) {
        if self.can_next_page() {
            self.go_to(self.page_count() - 1, self.pagination.page_size, handler);
        }
    }

    /// Keeps the first row of the current page in view under the new size,
    /// never past the last page.
    pub fn set_page_size(
        &self,
        size: u32,
        handler: &mut impl ListHandler<T>,
    ) -> Result<(), ListError> {
        if !PAGE_SIZE_OPTIONS.contains(&size) {
            return Err(ListError::UnsupportedPageSize(size));
        }
        let resized = Pagination {
            page_index: 0,
            page_size: size,
            total: self.pagination.total,
        };
        let top_row = u64::from(self.pagination.page_index) * u64::from(self.pagination.page_size);
        let last_index = resized.page_count() - 1;
        let page_index = u32::try_from(top_row / u64::from(size))
            .unwrap_or(last_index)
            .min(last_index);
        self.go_to(page_index, size, handler);
        Ok(())
    }

    /// `position` is one-based, counted over the visible rows.
    pub fn click(&self, position: usize, handler: &mut impl ListHandler<T>) -> Result<(), ListError> {
        let row = position
            .checked_sub(1)
            .and_then(|i| self.visible_rows().get(i).copied())
            .ok_or(ListError::NoRow(position))?;
        handler.row_clicked(row);
        Ok(())
    }

    pub fn action(&self, index: usize, handler: &mut impl ListHandler<T>) -> Result<(), ListError> {
        let action = index
            .checked_sub(1)
            .and_then(|i| self.actions.get(i))
            .ok_or(ListError::NoAction(index))?;
        handler.navigate(action.target.clone());
        Ok(())
    }

    pub fn render(&self) -> String {
        let visible = self.visible_rows();
        let mut out = String::new();

        out.push_str(&self.title);
        out.push('\n');
        out.push_str(&format!("{} results", self.pagination.total));
        if !self.actions.is_empty() {
            let labels: Vec<String> = self
                .actions
                .iter()
                .enumerate()
                .map(|(i, a)| format!("[{}] {}", i + 1, a.label))
                .collect();
            out.push_str(&format!("    {}", labels.join("  ")));
        }
        out.push('\n');

        if !self.search.is_empty() {
            out.push_str(&format!("Search: {}  (clear search: `clear`)\n", self.search));
        }
        if let Some(spec) = self.sort
            && let Ok(column) = self.column(spec.column)
        {
            out.push_str(&format!("Sorted by {} {}\n", column.header, spec.direction.marker()));
        }
        for (key, filter) in &self.filters {
            let header = self.column(key).map(|c| c.header).unwrap_or(*key);
            let shown = match filter {
                ColumnFilter::Contains(s) => format!("contains \"{}\"", s),
                ColumnFilter::Range { min, max } => format!(
                    "{}..{}",
                    min.map(|m| m.to_string()).unwrap_or_default(),
                    max.map(|m| m.to_string()).unwrap_or_default()
                ),
            };
            out.push_str(&format!("Filter: {} {}\n", header, shown));
        }

        let widths: Vec<usize> = self
            .columns
            .iter()
            .map(|c| {
                visible
                    .iter()
                    .map(|r| c.cell(r).chars().count())
                    .chain(std::iter::once(c.header.chars().count()))
                    .max()
                    .unwrap_or(0)
                    .min(MAX_COLUMN_WIDTH)
            })
            .collect();
        let number_width = visible.len().max(1).to_string().len().max(1);
        let rule_width = number_width + widths.iter().map(|w| w + 2).sum::<usize>() + 2;
        let rule = "-".repeat(rule_width);

        out.push_str(&rule);
        out.push('\n');

        if visible.is_empty() {
            out.push('\n');
            out.push_str(&format!("    {}\n", EMPTY_TITLE));
            out.push_str(&format!("    {}\n", EMPTY_HINT));
            out.push('\n');
        } else {
            let mut header = format!("{}  ", " ".repeat(number_width));
            for (column, width) in self.columns.iter().zip(&widths) {
                header.push_str(&fit(column.header, *width));
                header.push_str("  ");
            }
            out.push_str(header.trim_end());
            out.push('\n');

            for (i, row) in visible.iter().enumerate() {
                let mut line = format!("{:>width$}  ", i + 1, width = number_width);
                for (column, width) in self.columns.iter().zip(&widths) {
                    line.push_str(&fit(&column.cell(row), *width));
                    line.push_str("  ");
                }
                out.push_str(line.trim_end());
                out.push('\n');
            }
        }

        out.push_str(&rule);
        out.push('\n');

        let nav = [
            ("<< first", self.can_previous_page()),
            ("< prev", self.can_previous_page()),
            ("next >", self.can_next_page()),
            ("last >>", self.can_next_page()),
        ]
        .iter()
        .map(|(label, enabled)| {
            if *enabled {
                label.to_string()
            } else {
                format!("({})", label)
            }
        })
        .collect::<Vec<_>>()
        .join("  ");

        let sizes = PAGE_SIZE_OPTIONS
            .iter()
            .map(|s| {
                if *s == self.pagination.page_size {
                    format!("[{}]", s)
                } else {
                    s.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ");

        out.push_str(&format!(
            "{}    Page {} of {}    Show: {}\n",
            nav,
            self.pagination.page_index + 1,
            self.page_count(),
            sizes
        ));
        out.push_str(&format!(
            "Showing {} of {} rows\n",
            visible.len(),
            self.pagination.total
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        name: &'static str,
        owner: &'static str,
        score: f64,
    }

    fn columns() -> Vec<Column<Row>> {
        vec![
            Column::new("name", "Name", |r: &Row| CellValue::Text(r.name.to_string())),
            Column::new("owner", "Owner", |r: &Row| CellValue::Text(r.owner.to_string()))
                .with_render(|r: &Row| format!("@{}", r.owner)),
            Column::new("score", "Score", |r: &Row| CellValue::Number(r.score)),
        ]
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { name: "beta", owner: "ann", score: 2.0 },
            Row { name: "Alpha", owner: "bob", score: 9.0 },
            Row { name: "gamma", owner: "ann", score: 5.0 },
        ]
    }

    fn list(page_index: u32, page_size: u32, total: u64) -> PaginatedList<Row> {
        PaginatedList::new(
            "Things",
            rows(),
            columns(),
            Pagination { page_index, page_size, total },
        )
    }

    #[derive(Default)]
    struct Recorder {
        targets: Vec<String>,
        clicked: Vec<Row>,
    }

    impl ListHandler<Row> for Recorder {
        fn navigate(&mut self, target: String) {
            self.targets.push(target);
        }

        fn row_clicked(&mut self, row: &Row) {
            self.clicked.push(row.clone());
        }
    }

    fn names(list: &PaginatedList<Row>) -> Vec<&'static str> {
        list.visible_rows().iter().map(|r| r.name).collect()
    }

    #[test]
    fn search_narrows_current_page_only() {
        let mut l = list(0, 25, 3);
        l.set_search("ANN");
        assert_eq!(names(&l), vec!["beta", "gamma"]);

        l.set_search("@bob");
        assert_eq!(names(&l), vec!["Alpha"]);

        l.clear_search();
        assert_eq!(names(&l).len(), 3);
        assert_eq!(l.pagination().total, 3);
    }

    #[test]
    fn text_sort_cycles_asc_desc_none() {
        let mut l = list(0, 25, 3);
        assert_eq!(
            l.toggle_sort("name").unwrap().map(|s| s.direction),
            Some(SortDirection::Ascending)
        );
        assert_eq!(names(&l), vec!["Alpha", "beta", "gamma"]);

        l.toggle_sort("name").unwrap();
        assert_eq!(names(&l), vec!["gamma", "beta", "Alpha"]);

        assert_eq!(l.toggle_sort("name").unwrap(), None);
        assert_eq!(names(&l), vec!["beta", "Alpha", "gamma"]);
    }

    #[test]
    fn numeric_sort_starts_descending() {
        let mut l = list(0, 25, 3);
        l.toggle_sort("Score").unwrap();
        assert_eq!(names(&l), vec!["Alpha", "gamma", "beta"]);

        l.toggle_sort("name").unwrap();
        assert_eq!(l.sort().map(|s| s.column), Some("name"));
    }

    #[test]
    fn column_filters_combine_with_search() {
        let mut l = list(0, 25, 3);
        l.set_filter("score", ColumnFilter::Range { min: Some(3.0), max: None })
            .unwrap();
        assert_eq!(names(&l), vec!["Alpha", "gamma"]);

        l.set_filter("owner", ColumnFilter::Contains("an".to_string()))
            .unwrap();
        assert_eq!(names(&l), vec!["gamma"]);

        l.set_search("zzz");
        assert!(l.visible_rows().is_empty());

        l.clear_search();
        l.clear_filter("score").unwrap();
        assert_eq!(names(&l), vec!["beta", "gamma"]);

        assert_eq!(
            l.set_filter("nope", ColumnFilter::Contains("x".to_string())),
            Err(ListError::UnknownColumn("nope".to_string()))
        );
    }

    #[test]
    fn paging_emits_navigation_without_mutating() {
        let l = list(1, 25, 101);
        let mut rec = Recorder::default();

        l.next_page(&mut rec);
        l.previous_page(&mut rec);
        l.first_page(&mut rec);
        l.last_page(&mut rec);

        assert_eq!(
            rec.targets,
            vec![
                "?page=3&limit=25",
                "?page=1&limit=25",
                "?page=1&limit=25",
                "?page=5&limit=25",
            ]
        );
        assert_eq!(l.pagination().page_index, 1);
    }

    #[test]
    fn disabled_paging_emits_nothing() {
        let only_page = list(0, 25, 0);
        let mut rec = Recorder::default();
        assert_eq!(only_page.page_count(), 1);

        only_page.first_page(&mut rec);
        only_page.previous_page(&mut rec);
        only_page.next_page(&mut rec);
        only_page.last_page(&mut rec);
        assert!(rec.targets.is_empty());
    }

    #[test]
    fn page_size_change_keeps_top_row() {
        let l = list(3, 10, 200);
        let mut rec = Recorder::default();

        l.set_page_size(25, &mut rec).unwrap();
        l.set_page_size(50, &mut rec).unwrap();
        assert_eq!(rec.targets, vec!["?page=2&limit=25", "?page=1&limit=50"]);

        assert_eq!(
            l.set_page_size(7, &mut rec),
            Err(ListError::UnsupportedPageSize(7))
        );
        assert_eq!(rec.targets.len(), 2);
    }

    #[test]
    fn page_size_change_stays_within_page_count() {
        let l = list(u32::MAX - 1, 50, 100);
        let mut rec = Recorder::default();

        l.set_page_size(10, &mut rec).unwrap();
        l.set_page_size(25, &mut rec).unwrap();
        assert_eq!(rec.targets, vec!["?page=10&limit=10", "?page=4&limit=25"]);
    }

    #[test]
    fn click_forwards_visible_row() {
        let mut l = list(0, 25, 3);
        l.toggle_sort("score").unwrap();
        let mut rec = Recorder::default();

        l.click(1, &mut rec).unwrap();
        assert_eq!(rec.clicked, vec![rows()[1].clone()]);

        assert_eq!(l.click(0, &mut rec), Err(ListError::NoRow(0)));
        assert_eq!(l.click(4, &mut rec), Err(ListError::NoRow(4)));
    }

    #[test]
    fn header_action_navigates() {
        let l = list(0, 25, 3).with_action("Refresh", "/things?page=1&limit=25");
        let mut rec = Recorder::default();
        l.action(1, &mut rec).unwrap();
        assert_eq!(rec.targets, vec!["/things?page=1&limit=25"]);
        assert_eq!(l.action(2, &mut rec), Err(ListError::NoAction(2)));
    }

    #[test]
    fn renders_rows_and_footer() {
        let l = list(0, 25, 3);
        let expected = "\
Things
3 results
------------------------
   Name   Owner  Score
1  beta   @ann   2
2  Alpha  @bob   9
3  gamma  @ann   5
------------------------
(<< first)  (< prev)  (next >)  (last >>)    Page 1 of 1    Show: 10 [25] 50
Showing 3 of 3 rows
";
        assert_eq!(l.render(), expected);
    }

    #[test]
    fn renders_empty_state_instead_of_rows() {
        let mut l = list(0, 25, 3);
        l.set_search("nothing matches");
        let out = l.render();
        assert!(out.contains("No conversations found"));
        assert!(out.contains("Try a different search."));
        assert!(!out.contains("Alpha"));
        assert!(out.contains("Showing 0 of 3 rows"));
    }
}
