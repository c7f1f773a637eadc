use ratatui::prelude::*;

use super::super::{ContentFocus, ExpandApp};
use super::form::{draw_field, draw_line, draw_title, row_style, scroll_offset};

pub fn draw_osds_step(frame: &mut Frame, area: Rect, app: &ExpandApp) {
    if area.height < 14 || area.width < 30 {
        return;
    }

    let mut y = draw_title(frame, area, app, "Create OSDs");
    let selection = app.device_selection();

    let settings = format!(
        "Type: {}   Encryption: {}",
        app.device_type.label(),
        if app.encrypted { "on" } else { "off" }
    );
    draw_line(frame, area, y, settings, app.theme.style());
    y += 1;

    let fields = [
        ("Vendor", &app.vendor),
        ("Model", &app.model),
        ("Hosts", &app.host_pattern),
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
    y += 1;

    let selected = app.selected_device_count();
    let count_style = if selected > 0 {
        app.theme.success_style().add_modifier(Modifier::BOLD)
    } else {
        app.theme.warning_style()
    };
    draw_line(frame, area, y, format!("Selected devices: {selected}"), count_style);
    y += 2;

    if app.inventory.is_empty() {
        let text = if app.is_loading { "Loading inventory..." } else { "No devices found" };
        draw_line(frame, area, y, text, app.theme.muted_style());
        return;
    }

    draw_line(
        frame,
        area,
        y,
        format!("  {:<16} {:<12} {:<5} {:<10} {}", "Host", "Path", "Type", "Size", "Vendor / Model"),
        app.theme.muted_style().add_modifier(Modifier::BOLD),
    );
    y += 1;

    let list_focused = app.content_focus == ContentFocus::List;
    let rows = (area.y + area.height).saturating_sub(y + 1) as usize;
    let offset = scroll_offset(app.list_selected, rows);
    let devices = app
        .inventory
        .iter()
        .flat_map(|host| host.devices.iter().map(move |device| (host.name.as_str(), device)));

    for (idx, (hostname, device)) in devices.enumerate().skip(offset).take(rows) {
        let picked = selection.matches(device);
        let mark = if picked { "x" } else if device.available { " " } else { "-" };
        let line = format!(
            "[{mark}] {:<14} {:<12} {:<5} {:<10} {} {}",
            hostname,
            device.path,
            device.human_readable_type,
            device.sys_api.human_readable_size,
            device.sys_api.vendor,
            device.sys_api.model
        );
        let style = if idx == app.list_selected {
            row_style(app, true, list_focused)
        } else if picked {
            app.theme.secondary_style()
        } else {
            app.theme.muted_style()
        };
        draw_line(frame, area, y, line, style);
        y += 1;
    }
}
