use ratatui::{prelude::*, widgets::Paragraph};

use super::super::ExpandApp;
use crate::vim::{InputBuffer, VimMode};

const LABEL_WIDTH: u16 = 12;

/// One labelled single-line input with a vim-style cursor
pub fn draw_field(
    frame: &mut Frame,
    area: Rect,
    app: &ExpandApp,
    label: &str,
    buffer: &InputBuffer,
    is_focused: bool,
) {
    if area.width <= LABEL_WIDTH + 2 {
        return;
    }
    let is_insert = is_focused && app.vim_mode == VimMode::Insert;

    let label_style = if is_focused {
        app.theme.primary_style()
    } else {
        app.theme.style()
    };
    frame.render_widget(
        Paragraph::new(label).style(label_style),
        Rect::new(area.x, area.y, LABEL_WIDTH, 1),
    );

    let display_content = buffer.display('*');
    let field = Rect::new(area.x + LABEL_WIDTH, area.y, area.width - LABEL_WIDTH, 1);
    let cursor_pos = buffer.cursor();

    if is_insert {
        let before: String = display_content.chars().take(cursor_pos).collect();
        let after: String = display_content.chars().skip(cursor_pos).collect();

        let line = Line::from(vec![
            Span::styled(before, app.theme.style()),
            Span::styled("|", app.theme.primary_style().add_modifier(Modifier::BOLD)),
            Span::styled(after, app.theme.style()),
        ]);
        frame.render_widget(Paragraph::new(line), field);
    } else if is_focused {
        let chars: Vec<char> = display_content.chars().collect();
        let mut spans: Vec<Span> = chars
            .iter()
            .enumerate()
            .map(|(i, ch)| {
                let style = if i == cursor_pos {
                    app.theme.style().add_modifier(Modifier::REVERSED)
                } else {
                    app.theme.style()
                };
                Span::styled(ch.to_string(), style)
            })
            .collect();
        if cursor_pos >= chars.len() {
            spans.push(Span::styled(" ", app.theme.style().add_modifier(Modifier::REVERSED)));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), field);
    } else {
        let display = if display_content.is_empty() { "(empty)" } else { &display_content };
        frame.render_widget(Paragraph::new(display).style(app.theme.muted_style()), field);
    }
}

/// Bold section title, returns the next free row
pub fn draw_title(frame: &mut Frame, area: Rect, app: &ExpandApp, title: &str) -> u16 {
    frame.render_widget(
        Paragraph::new(title.to_string()).style(app.theme.primary_style().add_modifier(Modifier::BOLD)),
        Rect::new(area.x + 2, area.y + 1, area.width.saturating_sub(4), 1),
    );
    area.y + 3
}

/// Plain text row inside a content panel
pub fn draw_line(frame: &mut Frame, area: Rect, y: u16, text: impl Into<String>, style: Style) {
    if y >= area.y + area.height {
        return;
    }
    frame.render_widget(
        Paragraph::new(text.into()).style(style),
        Rect::new(area.x + 2, y, area.width.saturating_sub(4), 1),
    );
}

/// Style of a list row, highlighted when selected
pub fn row_style(app: &ExpandApp, is_selected: bool, is_focused: bool) -> Style {
    if is_selected && is_focused {
        app.theme.primary_style().add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else if is_selected {
        app.theme.secondary_style().add_modifier(Modifier::REVERSED)
    } else {
        app.theme.style()
    }
}

/// First row to draw so that `selected` stays visible in `height` rows
pub fn scroll_offset(selected: usize, height: usize) -> usize {
    if height == 0 || selected < height {
        0
    } else {
        selected + 1 - height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_offset_keeps_selection_visible() {
        assert_eq!(scroll_offset(0, 5), 0);
        assert_eq!(scroll_offset(4, 5), 0);
        assert_eq!(scroll_offset(5, 5), 1);
        assert_eq!(scroll_offset(9, 0), 0);
    }
}
