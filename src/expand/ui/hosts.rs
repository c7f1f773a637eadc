use ratatui::prelude::*;

use super::super::{ContentFocus, ExpandApp, NO_SCHEDULE_LABEL};
use super::form::{draw_field, draw_line, draw_title, row_style, scroll_offset};

pub fn draw_hosts_step(frame: &mut Frame, area: Rect, app: &ExpandApp) {
    if area.height < 12 || area.width < 30 {
        return;
    }

    let mut y = draw_title(frame, area, app, "Add Hosts");

    let form_height = 8;
    let list_bottom = area.y + area.height - form_height;
    let list_focused = app.content_focus == ContentFocus::List;

    if app.hosts.is_empty() {
        let text = if app.is_loading { "Loading hosts..." } else { "No hosts found" };
        draw_line(frame, area, y, text, app.theme.muted_style());
    } else {
        draw_line(
            frame,
            area,
            y,
            format!("{:<24} {:<16} {:<8} {}", "Hostname", "Address", "Daemons", "Labels"),
            app.theme.muted_style().add_modifier(Modifier::BOLD),
        );
        y += 1;

        let rows = list_bottom.saturating_sub(y) as usize;
        let offset = scroll_offset(app.list_selected, rows);
        for (idx, host) in app.hosts.iter().enumerate().skip(offset).take(rows) {
            let pending = host.has_label(NO_SCHEDULE_LABEL);
            let marker = if pending { "+" } else { " " };
            let line = format!(
                "{marker}{:<23} {:<16} {:<8} {}",
                host.hostname,
                host.addr,
                host.services.len(),
                host.labels.join(", ")
            );
            let style = if idx == app.list_selected {
                row_style(app, true, list_focused)
            } else if pending {
                app.theme.warning_style()
            } else {
                app.theme.style()
            };
            draw_line(frame, area, y, line, style);
            y += 1;
        }
    }

    let mut y = list_bottom;
    draw_line(
        frame,
        area,
        y,
        format!("+ hosts carrying {NO_SCHEDULE_LABEL} are accepted on expansion"),
        app.theme.muted_style(),
    );
    y += 2;

    draw_line(frame, area, y, "Add host", app.theme.secondary_style().add_modifier(Modifier::BOLD));
    y += 1;

    let fields = [
        ("Hostname", &app.new_hostname),
        ("Address", &app.new_addr),
        ("Labels", &app.new_labels),
    ];
    for (idx, (label, buffer)) in fields.iter().enumerate() {
        let focused = app.content_focus == ContentFocus::InputField(idx);
        draw_field(
            frame,
            Rect::new(area.x + 2, y, area.width - 4, 1),
            app,
            label,
            buffer,
            focused,
        );
        y += 1;
    }
}
