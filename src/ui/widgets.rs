use super::constants::UI_SCREEN_SIZE;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::{Block, BorderType, Borders};

const POPUP_WIDTH: u16 = 48;
const POPUP_HEIGHT: u16 = 8;

pub fn default_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
}

/// Splits the terminal into the player body and the hover text row below it,
/// centered and capped at [`UI_SCREEN_SIZE`].
pub fn screen_layout(area: Rect) -> [Rect; 2] {
    let (width, height) = UI_SCREEN_SIZE;
    let screen = Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width.min(area.width),
        height.min(area.height),
    );
    Layout::vertical([Constraint::Min(6), Constraint::Length(1)]).areas(screen)
}

pub fn popup_rect(area: Rect) -> Rect {
    let width = POPUP_WIDTH.min(area.width);
    let height = POPUP_HEIGHT.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::{popup_rect, screen_layout};
    use ratatui::layout::Rect;

    #[test]
    fn test_popup_rect_is_centered_and_bounded() {
        let rect = popup_rect(Rect::new(0, 0, 64, 14));
        assert_eq!(rect, Rect::new(8, 3, 48, 8));

        let small = popup_rect(Rect::new(2, 1, 20, 5));
        assert_eq!(small, Rect::new(2, 1, 20, 5));
    }

    #[test]
    fn test_screen_layout_centers_player() {
        let [body, hover_row] = screen_layout(Rect::new(0, 0, 80, 20));
        assert_eq!(body, Rect::new(8, 3, 64, 13));
        assert_eq!(hover_row, Rect::new(8, 16, 64, 1));

        let [body, hover_row] = screen_layout(Rect::new(0, 0, 40, 10));
        assert_eq!(body, Rect::new(0, 0, 40, 9));
        assert_eq!(hover_row, Rect::new(0, 9, 40, 1));
    }
}
