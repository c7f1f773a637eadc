use ratatui::{prelude::*, widgets::{Block, Borders, Clear, Paragraph, Wrap}};

use super::super::{ExpandApp, TaskState};
use crate::api::ClusterStatus;
use crate::ui::center_rect;

pub fn draw_welcome_content(frame: &mut Frame, area: Rect, app: &ExpandApp) {
    let content_width = 64.min(area.width.saturating_sub(4));
    let content_height = 14.min(area.height.saturating_sub(2));
    let centered = center_rect(area, content_width, content_height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style())
        .title(format!(" {} ", app.config.general.subtitle));

    let inner = block.inner(centered);
    frame.render_widget(Clear, centered);
    frame.render_widget(block, centered);

    if inner.height < 4 {
        return;
    }

    let welcome_text = [
        "",
        "Please proceed to complete the cluster expansion:",
        "",
        "  * Add hosts and accept them into the cluster",
        "  * Create OSDs on the available devices",
        "  * Review the services that will run",
        "",
    ];

    let mut y = inner.y;
    for line in &welcome_text {
        if y >= inner.y + inner.height - 2 {
            break;
        }
        frame.render_widget(
            Paragraph::new(*line).style(app.theme.style()),
            Rect::new(inner.x + 1, y, inner.width.saturating_sub(2), 1),
        );
        y += 1;
    }

    if app.cluster_status == Some(ClusterStatus::PostInstalled) && y < inner.y + inner.height - 2 {
        frame.render_widget(
            Paragraph::new("  The cluster has already been expanded once.").style(app.theme.warning_style()),
            Rect::new(inner.x + 1, y, inner.width.saturating_sub(2), 1),
        );
    }

    let button_y = inner.y + inner.height - 2;
    let expand = "[ Expand Cluster ]";
    let skip = "[ Skip ]";
    let total = (expand.len() + skip.len() + 2) as u16;
    let button_x = inner.x + inner.width.saturating_sub(total) / 2;
    let buttons = Line::from(vec![
        Span::styled(expand, app.theme.primary_style().add_modifier(Modifier::BOLD | Modifier::REVERSED)),
        Span::raw("  "),
        Span::styled(skip, app.theme.muted_style().add_modifier(Modifier::REVERSED)),
    ]);
    frame.render_widget(
        Paragraph::new(buttons),
        Rect::new(button_x, button_y, total.min(inner.width), 1),
    );

    let hint = "Enter: expand  s: skip";
    let hint_x = inner.x + inner.width.saturating_sub(hint.len() as u16) / 2;
    frame.render_widget(
        Paragraph::new(hint).style(app.theme.muted_style()),
        Rect::new(hint_x, button_y + 1, (hint.len() as u16).min(inner.width), 1),
    );
}

/// Shown after the wizard navigated back to the dashboard
pub fn draw_finished(frame: &mut Frame, area: Rect, app: &ExpandApp) {
    let width = 64.min(area.width.saturating_sub(4));
    let height = (app.tasks.len() as u16 + 6).clamp(6, area.height.saturating_sub(2).max(6));
    let centered = center_rect(area, width, height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style())
        .title(" Cluster Expansion ");
    let inner = block.inner(centered);
    frame.render_widget(Clear, centered);
    frame.render_widget(block, centered);

    let mut lines: Vec<Line> = Vec::new();
    for task in &app.tasks {
        let (status_char, style) = match task.status {
            TaskState::Running => (app.spinner_char(), app.theme.primary_style()),
            TaskState::Success => ('x', app.theme.success_style()),
            TaskState::Failed => ('!', app.theme.error_style()),
        };
        lines.push(Line::styled(format!(" [{status_char}] {}", task.name), style));
    }
    lines.push(Line::raw(""));

    let footer = match app.route {
        _ if app.is_executing => " Waiting for the dashboard to finish...".to_string(),
        Some(route) => format!(" Continue in the dashboard at {}. Press any key to exit.", route.path()),
        None => " The cluster was not marked as expanded. Press any key to exit.".to_string(),
    };
    lines.push(Line::styled(footer, app.theme.muted_style()));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
