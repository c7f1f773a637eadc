use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use super::super::{ExpandApp, TaskState, NO_SCHEDULE_LABEL};
use super::form::{draw_line, draw_title};

pub fn draw_review_step(frame: &mut Frame, area: Rect, app: &ExpandApp) {
    if area.height < 12 {
        return;
    }

    let mut y = draw_title(frame, area, app, "Review");

    let accepting: Vec<&str> = app
        .hosts
        .iter()
        .filter(|h| h.has_label(NO_SCHEDULE_LABEL))
        .map(|h| h.hostname.as_str())
        .collect();
    let spec = app.drive_group().into_spec();
    let selected = app.selected_device_count();

    draw_line(frame, area, y, "Cluster Resources:", app.theme.style());
    y += 1;
    draw_line(frame, area, y, format!("  Hosts: {}", app.hosts.len()), app.theme.style());
    y += 1;
    let accept_text = if accepting.is_empty() {
        "  Hosts to accept: none".to_string()
    } else {
        format!("  Hosts to accept: {}", accepting.join(", "))
    };
    draw_line(frame, area, y, accept_text, app.theme.secondary_style());
    y += 1;
    draw_line(frame, area, y, format!("  Services: {}", app.services.len()), app.theme.style());
    y += 2;

    draw_line(frame, area, y, "OSDs:", app.theme.style());
    y += 1;
    if selected == 0 {
        draw_line(frame, area, y, "  No devices selected, no OSDs will be created", app.theme.muted_style());
        y += 1;
    } else {
        draw_line(frame, area, y, format!("  Devices: {selected}"), app.theme.secondary_style());
        y += 1;
        draw_line(frame, area, y, format!("  Host pattern: {}", spec.host_pattern), app.theme.style());
        y += 1;
        let filter = spec
            .data_devices
            .as_ref()
            .and_then(|f| serde_json::to_string(f).ok())
            .unwrap_or_default();
        draw_line(frame, area, y, format!("  Data devices: {filter}"), app.theme.style());
        y += 1;
        draw_line(
            frame,
            area,
            y,
            format!("  Encryption: {}", if spec.encrypted { "on" } else { "off" }),
            app.theme.style(),
        );
        y += 1;
    }
    y += 1;

    for task in &app.tasks {
        if y >= area.y + area.height - 3 {
            break;
        }
        let (status_char, style) = match task.status {
            TaskState::Running => (app.spinner_char(), app.theme.primary_style()),
            TaskState::Success => ('x', app.theme.secondary_style()),
            TaskState::Failed => ('!', app.theme.error_style()),
        };
        draw_line(frame, area, y, format!("  [{status_char}] {}", task.name), style);
        y += 1;
    }

    if !app.is_executing {
        let button_text = format!(" [n] {} ", app.controller.submit_button_label());
        let button_width = button_text.len() as u16;
        frame.render_widget(
            Paragraph::new(button_text)
                .style(app.theme.primary_style().add_modifier(Modifier::BOLD | Modifier::REVERSED)),
            Rect::new(area.x + 2, area.y + area.height - 2, button_width.min(area.width.saturating_sub(4)), 1),
        );
    }
}
