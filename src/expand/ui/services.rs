use ratatui::prelude::*;

use super::super::{ContentFocus, ExpandApp};
use super::form::{draw_line, draw_title, row_style, scroll_offset};

pub fn draw_services_step(frame: &mut Frame, area: Rect, app: &ExpandApp) {
    if area.height < 6 {
        return;
    }

    let mut y = draw_title(frame, area, app, "Create Services");

    if app.services.is_empty() {
        let text = if app.is_loading { "Loading services..." } else { "No services deployed yet" };
        draw_line(frame, area, y, text, app.theme.muted_style());
        return;
    }

    draw_line(
        frame,
        area,
        y,
        format!("{:<32} {:<12} {}", "Service", "Type", "Running"),
        app.theme.muted_style().add_modifier(Modifier::BOLD),
    );
    y += 1;

    let focused = app.content_focus == ContentFocus::List;
    let rows = (area.y + area.height).saturating_sub(y + 1) as usize;
    let offset = scroll_offset(app.list_selected, rows);
    for (idx, service) in app.services.iter().enumerate().skip(offset).take(rows) {
        let line = format!(
            "{:<32} {:<12} {}/{}",
            service.service_name, service.service_type, service.status.running, service.status.size
        );
        let style = if idx == app.list_selected {
            row_style(app, true, focused)
        } else if service.status.running < service.status.size {
            app.theme.warning_style()
        } else {
            app.theme.style()
        };
        draw_line(frame, area, y, line, style);
        y += 1;
    }
}
