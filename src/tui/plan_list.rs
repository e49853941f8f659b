/// Plan list screen: one card per plan id; picking one opens its detail route.
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use super::AppState;
use super::render::{ACCENT, DIM, fit_width};

const CARD_HEIGHT: u16 = 3;
const MARGIN_X: u16 = 2;

/// Plans that fit on screen at once.
fn capacity(body: Rect) -> usize {
    (body.height.saturating_sub(1) / CARD_HEIGHT) as usize
}

/// Card rects for the window of plans that fits, scrolled so `selected` is
/// always on screen. Each entry carries the plan index it draws.
pub fn item_rects(body: Rect, count: usize, selected: usize) -> Vec<(usize, Rect)> {
    let width = body.width.saturating_sub(MARGIN_X * 2);
    let fits = capacity(body);
    let scroll = (selected + 1).saturating_sub(fits).min(count.saturating_sub(fits));
    (scroll..count)
        .take(fits)
        .enumerate()
        .map(|(row, i)| {
            let y = body.y + 1 + row as u16 * CARD_HEIGHT;
            (i, Rect::new(body.x + MARGIN_X, y, width, CARD_HEIGHT))
        })
        .collect()
}

pub fn hit_test(body: Rect, count: usize, selected: usize, col: u16, row: u16) -> Option<usize> {
    item_rects(body, count, selected)
        .into_iter()
        .find(|(_, r)| col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height)
        .map(|(i, _)| i)
}

pub fn draw(f: &mut Frame, state: &AppState, body: Rect) {
    let rects = item_rects(body, state.plans.len(), state.list_selected);

    for &(i, rect) in &rects {
        let Some(plan) = state.plans.get(i) else { continue };
        let selected = i == state.list_selected;
        let border = if selected { ACCENT } else { Color::Rgb(40, 38, 60) };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border));
        let inner = block.inner(rect);
        f.render_widget(block, rect);

        let name_style = if selected {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Rgb(150, 145, 190))
        };
        let marker = if selected { "❯ " } else { "  " };
        let line = Line::from(vec![
            Span::styled(marker, Style::default().fg(ACCENT)),
            Span::styled(fit_width(plan, inner.width.saturating_sub(2) as usize), name_style),
        ]);
        f.render_widget(Paragraph::new(line), inner);
    }

    // plans past the window
    let last = rects.last().map(|(i, _)| i + 1).unwrap_or(0);
    if state.plans.len() > last {
        let more = state.plans.len() - last;
        let y = rects.last().map(|(_, r)| r.y + r.height).unwrap_or(body.y);
        if y < body.y + body.height {
            let area = Rect::new(body.x + MARGIN_X, y, body.width.saturating_sub(MARGIN_X), 1);
            f.render_widget(
                Paragraph::new(Span::styled(format!("  … {more} more"), Style::default().fg(DIM))),
                area,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_rects_stop_at_body_bottom() {
        let body = Rect::new(0, 1, 40, 10);
        let rects = item_rects(body, 5, 0);
        assert_eq!(rects.len(), 3);
        assert_eq!(rects[0], (0, Rect::new(2, 2, 36, 3)));
        assert_eq!(rects[2], (2, Rect::new(2, 8, 36, 3)));
    }

    #[test]
    fn test_selected_plan_is_always_drawn() {
        let body = Rect::new(0, 1, 80, 22);
        for selected in 0..12 {
            let rects = item_rects(body, 12, selected);
            assert!(
                rects.iter().any(|(i, r)| *i == selected && r.y + r.height <= body.y + body.height),
                "plan {selected} off screen"
            );
            assert_eq!(rects.len(), 7);
        }
        // scrolled to the end, the last plan sits in the bottom slot
        let rects = item_rects(body, 12, 11);
        assert_eq!(rects.first().map(|(i, _)| *i), Some(5));
        assert_eq!(rects.last().map(|(i, _)| *i), Some(11));
    }

    #[test]
    fn test_hit_test_maps_rows_to_plans() {
        let body = Rect::new(0, 1, 40, 20);
        assert_eq!(hit_test(body, 3, 0, 5, 2), Some(0));
        assert_eq!(hit_test(body, 3, 0, 5, 6), Some(1));
        assert_eq!(hit_test(body, 3, 0, 5, 10), Some(2));
        assert_eq!(hit_test(body, 3, 0, 5, 11), None);
        assert_eq!(hit_test(body, 3, 0, 0, 2), None);
    }

    #[test]
    fn test_hit_test_follows_scroll() {
        let body = Rect::new(0, 1, 40, 10);
        // three slots; selecting plan 4 scrolls plans 2..=4 into view
        assert_eq!(hit_test(body, 6, 4, 5, 2), Some(2));
        assert_eq!(hit_test(body, 6, 4, 5, 8), Some(4));
    }
}
