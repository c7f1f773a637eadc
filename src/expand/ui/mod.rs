mod form;
mod hosts;
mod login;
mod osds;
mod review;
mod services;
mod welcome;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::{ExpandApp, NotificationType, PanelFocus, SkipDialog, StepId, StepResult};
use crate::ui::center_rect;
use crate::vim::VimMode;

/// Main draw function for the expansion wizard
pub fn draw(frame: &mut Frame, app: &ExpandApp) {
    let area = frame.area();
    frame.render_widget(Clear, area);

    // 1-line header, content, 3-line message, 1-line status
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(10),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    draw_header(frame, chunks[0], app);
    match app.panel_focus {
        PanelFocus::Login => login::draw_login(frame, chunks[1], app),
        PanelFocus::Welcome => welcome::draw_welcome_content(frame, chunks[1], app),
        PanelFocus::Wizard => draw_wizard(frame, chunks[1], app),
        PanelFocus::Finished => welcome::draw_finished(frame, chunks[1], app),
    }
    draw_message(frame, chunks[2], app);
    draw_status_bar(frame, chunks[3], app);

    // Overlays
    if let Some(dialog) = &app.confirm_skip {
        draw_confirm_dialog(frame, dialog, app);
    }

    if app.show_help {
        draw_help(frame, app);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &ExpandApp) {
    frame.render_widget(Clear, area);

    let title = format!(" {} (v{}) ", app.config.general.title, env!("CARGO_PKG_VERSION"));
    frame.render_widget(
        Paragraph::new(title).style(app.theme.primary_style().add_modifier(Modifier::BOLD)),
        area,
    );

    let (session, style) = match &app.auth {
        Some(auth) if app.is_dryrun() => (format!("[{} @ demo] ", auth.username), app.theme.warning_style()),
        Some(auth) => (format!("[{}] ", auth.username), app.theme.secondary_style()),
        None => ("[not logged in] ".to_string(), app.theme.muted_style()),
    };
    frame.render_widget(
        Paragraph::new(session).style(style).alignment(Alignment::Right),
        area,
    );
}

fn draw_wizard(frame: &mut Frame, area: Rect, app: &ExpandApp) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25), Constraint::Percentage(75)])
        .split(area);

    draw_sidebar(frame, chunks[0], app);
    draw_main_content(frame, chunks[1], app);
}

fn draw_sidebar(frame: &mut Frame, area: Rect, app: &ExpandApp) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style())
        .title(" Steps ");

    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    if inner.height < 3 {
        return;
    }

    let current = app.controller.current_step();
    for (idx, title) in app.controller.steps().titles().iter().enumerate() {
        if idx as u16 >= inner.height {
            break;
        }

        let is_current = idx + 1 == current.index;
        let result = app.step_results.get(idx).copied().unwrap_or_default();
        let status = match result {
            StepResult::Completed => "[x]",
            StepResult::Failed => "[!]",
            StepResult::Pending => "[ ]",
        };

        let style = if is_current {
            app.theme.primary_style().add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else if result == StepResult::Completed {
            app.theme.secondary_style()
        } else if result == StepResult::Failed {
            app.theme.error_style()
        } else {
            app.theme.style()
        };

        let line_area = Rect::new(inner.x, inner.y + idx as u16, inner.width, 1);
        frame.render_widget(Paragraph::new(format!(" {status} {title}")).style(style), line_area);
    }

    let hint = format!("n:{} p:{}", app.controller.submit_button_label(), app.controller.cancel_button_label());
    if inner.height > app.step_results.len() as u16 + 2 {
        frame.render_widget(
            Paragraph::new(hint).style(app.theme.muted_style()),
            Rect::new(inner.x, inner.y + inner.height - 1, inner.width, 1),
        );
    }
}

fn draw_main_content(frame: &mut Frame, area: Rect, app: &ExpandApp) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.primary_style());

    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    match app.current_step_id() {
        Some(StepId::Hosts) => hosts::draw_hosts_step(frame, inner, app),
        Some(StepId::Osds) => osds::draw_osds_step(frame, inner, app),
        Some(StepId::Services) => services::draw_services_step(frame, inner, app),
        Some(StepId::Review) => review::draw_review_step(frame, inner, app),
        None => {}
    }
}

fn draw_message(frame: &mut Frame, area: Rect, app: &ExpandApp) {
    let msg = match &app.message {
        Some(m) => m,
        None if app.is_executing || app.is_loading => {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(app.theme.secondary_style())
                .title(" Info ")
                .title_style(app.theme.secondary_style().add_modifier(Modifier::BOLD));

            let content = Line::from(vec![
                Span::styled(format!("{} ", app.spinner_char()), app.theme.primary_style()),
                Span::styled("Please wait...", app.theme.style()),
            ]);

            frame.render_widget(Paragraph::new(content).block(block), area);
            return;
        }
        None => return,
    };

    let title = match msg.kind {
        NotificationType::Error => " Error ",
        NotificationType::Info => " Info ",
        NotificationType::Success => " Success ",
    };
    let border_style = app.theme.notification_style(msg.kind);
    let text_style = if msg.is_error() { border_style } else { app.theme.style() };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title)
        .title_style(border_style.add_modifier(Modifier::BOLD));

    let paragraph = Paragraph::new(Line::from(Span::styled(msg.text.as_str(), text_style)))
        .block(block)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &ExpandApp) {
    frame.render_widget(Clear, area);

    let mode_name = app.vim_mode.display_name();
    let mode_span = Span::styled(format!(" {mode_name} "), app.theme.mode_style(mode_name));

    let after_mode = if app.vim_mode == VimMode::Command {
        Span::styled(format!(":{}", app.command_buffer.content()), app.theme.style())
    } else {
        Span::styled(app.status_bar.left_hint.clone(), app.theme.muted_style())
    };

    frame.render_widget(
        Paragraph::new(Line::from(vec![mode_span, Span::raw(" "), after_mode])),
        Rect::new(area.x, area.y, area.width * 2 / 3, 1),
    );

    let right_text = if app.panel_focus == PanelFocus::Wizard {
        let step = app.controller.current_step();
        format!("{}/{}  {}", step.index, app.controller.steps().total_steps(), app.status_bar.right_hint)
    } else {
        app.status_bar.right_hint.clone()
    };

    frame.render_widget(
        Paragraph::new(right_text)
            .style(app.theme.muted_style())
            .alignment(Alignment::Right),
        Rect::new(area.x + area.width / 3, area.y, area.width * 2 / 3, 1),
    );
}

fn draw_confirm_dialog(frame: &mut Frame, dialog: &SkipDialog, app: &ExpandApp) {
    let width = 56.min(frame.area().width.saturating_sub(4));
    let height = 10.min(frame.area().height);
    let area = center_rect(frame.area(), width, height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.warning_style())
        .title(format!(" {} ", dialog.title))
        .title_style(app.theme.warning_style().add_modifier(Modifier::BOLD));

    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    if inner.height < 3 {
        return;
    }

    frame.render_widget(
        Paragraph::new(dialog.message)
            .style(app.theme.style())
            .wrap(Wrap { trim: true }),
        Rect::new(inner.x + 1, inner.y, inner.width.saturating_sub(2), inner.height - 2),
    );

    let hints = if app.is_executing {
        Line::from(Span::styled(format!("{} {}...", app.spinner_char(), dialog.button), app.theme.muted_style()))
    } else {
        Line::from(vec![
            Span::styled("[", app.theme.style()),
            Span::styled("Y", app.theme.primary_style().add_modifier(Modifier::BOLD)),
            Span::styled(format!("] {} / [", dialog.button), app.theme.style()),
            Span::styled("N", app.theme.primary_style().add_modifier(Modifier::BOLD)),
            Span::styled("] Cancel", app.theme.style()),
        ])
    };

    frame.render_widget(
        Paragraph::new(hints).alignment(Alignment::Center),
        Rect::new(inner.x, inner.y + inner.height - 1, inner.width, 1),
    );
}

fn draw_help(frame: &mut Frame, app: &ExpandApp) {
    let width = 60.min(frame.area().width.saturating_sub(4));
    let height = 22.min(frame.area().height.saturating_sub(2));
    let area = center_rect(frame.area(), width, height);

    let help_text = [
        "",
        "Wizard:",
        "",
        "  n / Enter      Next step, Expand Cluster on Review",
        "  p              Previous step, Cancel on the first",
        "  j/k            Move through lists and fields",
        "  Tab            Switch between list and form",
        "  a              Add host (Add Hosts)",
        "  t / e          Device type / encryption (Create OSDs)",
        "  r              Refresh the current step",
        "",
        "Vim Modes:",
        "",
        "  i              Enter insert mode",
        "  Esc            Return to normal",
        "  :              Command mode",
        "",
        "Commands: :next :back :skip :expand :refresh :quit",
        "",
        "Press q or Esc to close",
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style())
        .title(" Help ");

    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    for (i, line) in help_text.iter().enumerate() {
        if i as u16 >= inner.height {
            break;
        }
        frame.render_widget(
            Paragraph::new(*line).style(app.theme.style()),
            Rect::new(inner.x, inner.y + i as u16, inner.width, 1),
        );
    }
}
