//! Table observer for pretty-printing hit counts.
//!
//! This module provides [`TableObserver`], which renders a counter
//! [`Snapshot`] as a text table using the `tabled` crate.
//!
//! # Feature Flag
//!
//! This module requires the `table` feature:
//!
//! ```toml
//! [dependencies]
//! hitcounter = { version = "0.1", features = ["table"] }
//! ```
//!
//! # Examples
//!
//! ## Standard format (vertical list)
//!
//! ```rust,ignore
//! use hitcounter::observers::table::{TableObserver, TableStyle};
//!
//! let observer = TableObserver::new().with_style(TableStyle::Rounded);
//! println!("{}", observer.render_store(&store));
//! // ╭───────┬───────╮
//! // │ Key   │ Count │
//! // ├───────┼───────┤
//! // │ about │ 12    │
//! // │ index │ 1042  │
//! // ╰───────┴───────╯
//! ```
//!
//! ## Compact format (multiple columns)
//!
//! ```rust,ignore
//! let observer = TableObserver::new().compact(true).columns(3);
//! // ╭─────────────┬─────────────┬──────────╮
//! // │ about: 12   │ index: 1042 │ shop: 7  │
//! // ╰─────────────┴─────────────┴──────────╯
//! ```

use crate::snapshot::Snapshot;
use crate::store::CounterStore;
use tabled::builder::Builder;
use tabled::settings::{object::Rows, Remove, Style};
use tabled::{Table, Tabled};

/// Border style of the rendered table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TableStyle {
    /// Plain `+`, `-` and `|`
    Ascii,
    /// Rounded box-drawing corners (default)
    #[default]
    Rounded,
    /// Square box-drawing corners
    Sharp,
    /// GitHub-flavored Markdown
    Markdown,
}

#[derive(Tabled)]
struct CountRow<'a> {
    #[tabled(rename = "Key")]
    key: &'a str,
    #[tabled(rename = "Count")]
    count: u64,
}

/// Renders hit counts as a table, one row or cell per key in key order.
///
/// In compact mode the keys are laid out as `key: count` cells across
/// [`columns`](Self::columns) columns and no header is printed.
#[derive(Debug, Clone)]
pub struct TableObserver {
    style: TableStyle,
    show_header: bool,
    title: Option<String>,
    compact: bool,
    columns: usize,
}

impl Default for TableObserver {
    fn default() -> Self {
        Self {
            style: TableStyle::default(),
            show_header: true,
            title: None,
            compact: false,
            columns: 1,
        }
    }
}

impl TableObserver {
    /// Creates a new table observer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the border style.
    pub fn with_style(mut self, style: TableStyle) -> Self {
        self.style = style;
        self
    }

    /// Shows or hides the `Key | Count` header row.
    pub fn with_header(mut self, show: bool) -> Self {
        self.show_header = show;
        self
    }

    /// Prints `title` on its own line above the table.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Enables or disables compact mode.
    pub fn compact(mut self, enabled: bool) -> Self {
        self.compact = enabled;
        self
    }

    /// Sets the number of cells per row in compact mode, at least 1.
    pub fn columns(mut self, count: usize) -> Self {
        self.columns = count.max(1);
        self
    }

    fn finish(&self, mut table: Table) -> String {
        match self.style {
            TableStyle::Ascii => table.with(Style::ascii()),
            TableStyle::Rounded => table.with(Style::rounded()),
            TableStyle::Sharp => table.with(Style::sharp()),
            TableStyle::Markdown => table.with(Style::markdown()),
        };
        match self.title {
            Some(ref title) => format!("{}\n{}", title, table),
            None => table.to_string(),
        }
    }

    fn render_compact(&self, snapshot: &Snapshot) -> String {
        let cells: Vec<String> = snapshot
            .iter()
            .map(|(key, count)| format!("{key}: {count}"))
            .collect();

        if cells.is_empty() {
            return String::new();
        }

        let mut builder = Builder::default();
        for chunk in cells.chunks(self.columns) {
            let mut row = chunk.to_vec();
            row.resize(self.columns, String::new());
            builder.push_record(row);
        }
        self.finish(builder.build())
    }

    fn render_standard(&self, snapshot: &Snapshot) -> String {
        let rows = snapshot.iter().map(|(key, count)| CountRow {
            key,
            count: *count,
        });

        let mut table = Table::new(rows);
        if !self.show_header {
            table.with(Remove::row(Rows::first()));
        }
        self.finish(table)
    }

    /// Renders a snapshot as a formatted table string.
    pub fn render(&self, snapshot: &Snapshot) -> String {
        if self.compact {
            self.render_compact(snapshot)
        } else {
            self.render_standard(snapshot)
        }
    }

    /// Renders the current counts of a store.
    pub fn render_store(&self, store: &CounterStore) -> String {
        self.render(&store.snapshot())
    }
}
