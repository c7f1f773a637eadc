use ratatui::{prelude::*, widgets::{Block, Borders, Clear, Paragraph}};

use super::super::{ContentFocus, ExpandApp};
use super::form::draw_field;
use crate::ui::center_rect;

pub fn draw_login(frame: &mut Frame, area: Rect, app: &ExpandApp) {
    let width = 60.min(area.width.saturating_sub(4));
    let height = 11.min(area.height.saturating_sub(2));
    let centered = center_rect(area, width, height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style())
        .title(" Log in to the Ceph Dashboard ");

    let inner = block.inner(centered);
    frame.render_widget(Clear, centered);
    frame.render_widget(block, centered);

    if inner.height < 7 || inner.width < 20 {
        return;
    }

    let mut y = inner.y + 1;
    frame.render_widget(
        Paragraph::new(app.config.dashboard.url.as_str()).style(app.theme.muted_style()),
        Rect::new(inner.x + 2, y, inner.width - 4, 1),
    );
    y += 2;

    let fields = [("Username", &app.username), ("Password", &app.password)];
    for (idx, (label, buffer)) in fields.iter().enumerate() {
        let focused = app.content_focus == ContentFocus::InputField(idx);
        draw_field(frame, Rect::new(inner.x + 2, y, inner.width - 4, 1), app, label, buffer, focused);
        y += 2;
    }

    let button_text = " [Enter] Log in ";
    let button_width = button_text.len() as u16;
    let ready = !app.username.is_empty() && !app.password.is_empty();
    let button_style = if ready {
        app.theme.primary_style().add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        app.theme.muted_style().add_modifier(Modifier::REVERSED)
    };
    frame.render_widget(
        Paragraph::new(button_text).style(button_style),
        Rect::new(inner.x + 2, inner.y + inner.height - 1, button_width.min(inner.width - 2), 1),
    );
}
