use ratatui::style::{Color, Modifier, Style};

use crate::expand::NotificationType;

#[derive(Debug, Clone)]
pub struct Theme {
    pub primary: Color,
    pub secondary: Color,
    pub background: Color,
    pub foreground: Color,
    pub error: Color,
    pub success: Color,
    pub warning: Color,
    pub border: Color,
    pub muted: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color::Red,
            secondary: Color::Cyan,
            background: Color::Reset,
            foreground: Color::White,
            error: Color::LightRed,
            success: Color::Green,
            warning: Color::Yellow,
            border: Color::DarkGray,
            muted: Color::DarkGray,
        }
    }
}

impl Theme {
    pub fn style(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }

    pub fn primary_style(&self) -> Style {
        Style::default().fg(self.primary)
    }

    pub fn secondary_style(&self) -> Style {
        Style::default().fg(self.secondary)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn success_style(&self) -> Style {
        Style::default().fg(self.success)
    }

    pub fn warning_style(&self) -> Style {
        Style::default().fg(self.warning)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn notification_style(&self, kind: NotificationType) -> Style {
        match kind {
            NotificationType::Error => self.error_style(),
            NotificationType::Info => self.secondary_style(),
            NotificationType::Success => self.success_style(),
        }
    }

    pub fn mode_style(&self, mode: &str) -> Style {
        let color = match mode {
            "NORMAL" => self.secondary,
            "INSERT" => self.success,
            "COMMAND" => self.warning,
            _ => self.foreground,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }
}
