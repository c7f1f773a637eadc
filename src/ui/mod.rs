mod theme;

pub use theme::Theme;

use ratatui::layout::Rect;

/// Fixed-size rectangle centered in `area`, clamped to its bounds
pub fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_rect_clamps() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(center_rect(area, 10, 4), Rect::new(5, 3, 10, 4));
        assert_eq!(center_rect(area, 40, 40), Rect::new(0, 0, 20, 10));
    }
}
