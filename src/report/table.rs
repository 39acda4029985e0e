//! Table renderer for run statistics.
//!
//! # Feature Flag
//!
//! This module requires the `table` feature.
//!
//! ```rust,ignore
//! use pcmatrix::report::table::{TableReport, TableStyle};
//!
//! let output = TableReport::new()
//!     .with_style(TableStyle::Rounded)
//!     .with_title("pcmatrix")
//!     .render(&summary);
//! // pcmatrix
//! // ╭──────────────────────┬───────╮
//! // │ Name                 │ Value │
//! // ├──────────────────────┼───────┤
//! // │ produced             │ 1200  │
//! // │ consumed             │ 1200  │
//! // ...
//! ```

use tabled::{settings::Style, Table, Tabled};

use crate::run::RunSummary;

/// Available table styles for rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TableStyle {
    /// ASCII table with simple characters: +, -, |
    Ascii,
    /// Modern rounded corners (default)
    #[default]
    Rounded,
    /// Sharp corners with box-drawing characters
    Sharp,
    /// GitHub-flavored Markdown table
    Markdown,
    /// No borders, just spacing
    Blank,
}

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Name")]
    name: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

/// Renders a [`RunSummary`] as a two-column table.
#[derive(Debug, Clone, Default)]
pub struct TableReport {
    style: TableStyle,
    title: Option<String>,
    show_counters: bool,
}

impl TableReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(mut self, style: TableStyle) -> Self {
        self.style = style;
        self
    }

    /// Sets a title printed above the table.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Also lists the coordinator's final counter values.
    pub fn with_counters(mut self, show: bool) -> Self {
        self.show_counters = show;
        self
    }

    fn apply_style(&self, table: &mut Table) {
        match self.style {
            TableStyle::Ascii => {
                table.with(Style::ascii());
            }
            TableStyle::Rounded => {
                table.with(Style::rounded());
            }
            TableStyle::Sharp => {
                table.with(Style::sharp());
            }
            TableStyle::Markdown => {
                table.with(Style::markdown());
            }
            TableStyle::Blank => {
                table.with(Style::blank());
            }
        }
    }

    pub fn render(&self, summary: &RunSummary) -> String {
        let mut rows: Vec<StatRow> = summary
            .stats
            .entries()
            .iter()
            .map(|&(name, value)| StatRow {
                name,
                value: value.to_string(),
            })
            .collect();

        if self.show_counters {
            for (name, value) in [
                ("counter.produced", summary.produced_counter),
                ("counter.consumed", summary.consumed_counter),
                ("counter.occupancy", summary.occupancy),
            ] {
                rows.push(StatRow {
                    name,
                    value: value.to_string(),
                });
            }
        }

        rows.push(StatRow {
            name: "elapsed_ms",
            value: summary.elapsed.as_millis().to_string(),
        });

        let mut table = Table::new(&rows);
        self.apply_style(&mut table);

        match &self.title {
            Some(title) => format!("{}\n{}", title, table),
            None => table.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::sample_summary;

    #[test]
    fn test_render_contains_stats() {
        let output = TableReport::new().render(&sample_summary());
        assert!(output.contains("Name"));
        assert!(output.contains("multiplied"));
        assert!(output.contains("410"));
        assert!(output.contains("elapsed_ms"));
        assert!(!output.contains("counter.occupancy"));
    }

    #[test]
    fn test_render_with_counters_and_title() {
        let output = TableReport::new()
            .with_style(TableStyle::Ascii)
            .with_title("run")
            .with_counters(true)
            .render(&sample_summary());
        assert!(output.starts_with("run\n+"));
        assert!(output.contains("counter.occupancy"));
    }

    #[test]
    fn test_markdown_style() {
        let output = TableReport::new()
            .with_style(TableStyle::Markdown)
            .render(&sample_summary());
        assert!(output.contains("| produced"));
    }
}
