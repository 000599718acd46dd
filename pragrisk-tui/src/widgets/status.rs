//! List status line: paging, sort and search state.

use pragrisk_core::{Pagination, SortState};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub struct ListStatus<'a> {
    pub pagination: &'a Pagination,
    pub sort: &'a SortState,
    pub search: &'a str,
    pub is_loading: bool,
    pub style: Style,
    pub accent: Style,
}

impl<'a> ListStatus<'a> {
    pub fn text(&self) -> String {
        let direction = if self.sort.ascending { "asc" } else { "desc" };
        let mut text = if self.search.is_empty() {
            format!(
                "page {}/{} | {} total | sort {} {}",
                self.pagination.page,
                self.pagination.page_count(),
                self.pagination.total_items,
                self.sort.predicate,
                direction
            )
        } else {
            format!("search \"{}\" | {} found", self.search, self.pagination.total_items)
        };
        if self.is_loading {
            text.push_str(" | loading...");
        }
        text
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let style = if self.is_loading { self.accent } else { self.style };
        let line = Line::from(vec![Span::styled(self.text(), style)]);
        f.render_widget(Paragraph::new(line), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_text() {
        let mut pagination = Pagination::new(20);
        pagination.total_items = 45;
        let sort = SortState {
            predicate: "name".to_string(),
            ascending: false,
        };
        let status = ListStatus {
            pagination: &pagination,
            sort: &sort,
            search: "",
            is_loading: true,
            style: Style::default(),
            accent: Style::default(),
        };
        assert_eq!(status.text(), "page 1/3 | 45 total | sort name desc | loading...");

        let status = ListStatus {
            search: "phish",
            is_loading: false,
            ..status
        };
        assert_eq!(status.text(), "search \"phish\" | 45 found");
    }
}
