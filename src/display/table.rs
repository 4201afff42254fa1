use crate::api::models::QueryResult;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table, presets};

const MAX_ERROR_WIDTH: usize = 60;

/// Formatter for the per-query summary printed after `analyse`
pub struct TableDisplay {
    use_colors: bool,
}

impl Default for TableDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl TableDisplay {
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    /// Set color usage
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// One row per query: name, row count, and outcome
    pub fn render_summary(&self, results: &[QueryResult]) -> String {
        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL);
        table.set_content_arrangement(ContentArrangement::Dynamic);

        if self.use_colors {
            table.set_header(vec![
                Cell::new("Query").add_attribute(Attribute::Bold),
                Cell::new("Rows").add_attribute(Attribute::Bold),
                Cell::new("Status").add_attribute(Attribute::Bold),
            ]);
        } else {
            table.set_header(vec!["Query", "Rows", "Status"]);
        }

        for result in results {
            let status = if result.is_failure() {
                truncate(&result.error, MAX_ERROR_WIDTH)
            } else {
                "ok".to_string()
            };

            let status_cell = match (self.use_colors, result.is_failure()) {
                (true, true) => Cell::new(status).fg(Color::Red),
                (true, false) => Cell::new(status).fg(Color::Green),
                (false, _) => Cell::new(status),
            };

            table.add_row(vec![
                Cell::new(&result.query),
                Cell::new(result.data.len().to_string()),
                status_cell,
            ]);
        }

        table.to_string()
    }
}

/// Shorten `text` to at most `max` characters, marking the cut with `...`
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::Row;

    #[test]
    fn test_render_summary_lists_each_query() {
        let results = vec![
            QueryResult::success("optimization", vec![Row::new(), Row::new()]),
            QueryResult::failure("performance", "pg_stat_statements is not enabled".to_string()),
        ];

        let rendered = TableDisplay::new().with_colors(false).render_summary(&results);
        assert!(rendered.contains("optimization"));
        assert!(rendered.contains("performance"));
        assert!(rendered.contains("pg_stat_statements is not enabled"));
        assert!(rendered.contains("ok"));
        assert!(rendered.contains('2'));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
    }
}
