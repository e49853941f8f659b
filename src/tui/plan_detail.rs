/// Plan detail screen: group cards with a fixed-column product grid.
///
/// Layout is computed once per frame by `layout()` and shared with mouse
/// hit-testing so clicks land on exactly what was drawn. The view scrolls just
/// enough to keep the focused item on screen.
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use super::render::{ACCENT, DIM, DONE, fit_width, wrap_width};
use crate::detail::{CardKey, Focus, PlanDetail};

pub const CARD_HEIGHT: u16 = 5;
const GROUP_GAP: u16 = 1;

#[derive(Debug, Clone, Copy)]
struct Slot {
    focus: Focus,
    y: u32,
    x: u16,
    width: u16,
    height: u16,
}

fn virtual_slots(detail: &PlanDetail, body: Rect) -> Vec<Slot> {
    let cols = detail.columns() as u16;
    let card_w = (body.width / cols).max(1);
    let mut slots = Vec::new();
    let mut y: u32 = 0;
    for (gi, gv) in detail.groups.iter().enumerate() {
        slots.push(Slot { focus: Focus::Header(gi), y, x: body.x, width: body.width, height: 1 });
        y += 1;
        if gv.expanded {
            for pi in 0..gv.group.products.len() {
                let row = (pi / cols as usize) as u32;
                let col = (pi % cols as usize) as u16;
                slots.push(Slot {
                    focus: Focus::Product(CardKey::new(gi, pi)),
                    y: y + row * CARD_HEIGHT as u32,
                    x: body.x + col * card_w,
                    width: card_w,
                    height: CARD_HEIGHT,
                });
            }
            let rows = gv.group.products.len().div_ceil(cols as usize) as u32;
            y += rows * CARD_HEIGHT as u32;
        }
        y += GROUP_GAP as u32;
    }
    slots
}

/// On-screen rects for every item that fits after scrolling to the focus.
pub fn layout(detail: &PlanDetail, body: Rect) -> Vec<(Focus, Rect)> {
    let slots = virtual_slots(detail, body);
    let height = body.height as u32;
    let scroll = slots
        .iter()
        .find(|s| s.focus == detail.focus)
        .map(|s| (s.y + s.height as u32).saturating_sub(height))
        .unwrap_or(0);

    slots
        .into_iter()
        .filter(|s| s.y >= scroll && s.y + s.height as u32 <= scroll + height)
        .map(|s| {
            let y = body.y + (s.y - scroll) as u16;
            (s.focus, Rect::new(s.x, y, s.width, s.height))
        })
        .collect()
}

pub fn hit_test(detail: &PlanDetail, body: Rect, col: u16, row: u16) -> Option<Focus> {
    layout(detail, body)
        .into_iter()
        .find(|(_, r)| col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height)
        .map(|(f, _)| f)
}

pub fn draw(f: &mut Frame, detail: &PlanDetail, body: Rect) {
    for (focus, rect) in layout(detail, body) {
        match focus {
            Focus::Header(gi) => draw_header(f, detail, gi, rect),
            Focus::Product(key) => draw_card(f, detail, key, rect),
        }
    }
}

fn draw_header(f: &mut Frame, detail: &PlanDetail, gi: usize, rect: Rect) {
    let Some(gv) = detail.groups.get(gi) else { return };
    let focused = detail.focus == Focus::Header(gi);
    let arrow = if gv.expanded { "▼" } else { "▶" };
    let done = gv.group.checked_count();
    let total = gv.group.products.len();

    let name_style = if focused {
        Style::default().fg(Color::Black).bg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    };
    let count_color = if total > 0 && done == total { DONE } else { DIM };
    let line = Line::from(vec![
        Span::styled(format!(" {arrow} "), Style::default().fg(ACCENT)),
        Span::styled(format!(" {} ", gv.group.name), name_style),
        Span::styled(format!("  {done}/{total}"), Style::default().fg(count_color)),
    ]);
    f.render_widget(Paragraph::new(line), rect);
}

fn draw_card(f: &mut Frame, detail: &PlanDetail, key: CardKey, rect: Rect) {
    let (Some(product), Some(card)) = (detail.product(key), detail.card(key)) else {
        return;
    };
    let focused = detail.focus == Focus::Product(key);
    let border = if focused {
        ACCENT
    } else if product.checked {
        DONE
    } else {
        Color::Rgb(60, 58, 90)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border));
    let inner = block.inner(rect);
    f.render_widget(block, rect);
    if inner.width == 0 || inner.height == 0 {
        return;
    }
    let w = inner.width as usize;

    let row = |i: u16| Rect { y: inner.y + i, height: 1, ..inner };

    // Row 0: glyph centred, badge top-right
    f.render_widget(
        Paragraph::new(fit_width(&product.glyph(), w)).alignment(Alignment::Center),
        row(0),
    );
    if let Some(badge) = product.badge() {
        let color = if product.has_memo() { Color::Red } else { Color::White };
        f.render_widget(
            Paragraph::new(Span::styled(badge, Style::default().fg(color).add_modifier(Modifier::BOLD)))
                .alignment(Alignment::Right),
            row(0),
        );
    }

    // Row 1: name
    if inner.height > 1 {
        let mut style = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
        if product.checked {
            style = style.fg(DIM).add_modifier(Modifier::CROSSED_OUT);
        }
        f.render_widget(
            Paragraph::new(Span::styled(fit_width(&product.name, w), style)).alignment(Alignment::Center),
            row(1),
        );
    }

    // Row 2: checked mark bottom-right
    if inner.height > 2 && product.checked {
        f.render_widget(Paragraph::new("✅").alignment(Alignment::Right), row(2));
    }

    if card.is_memo_shown() {
        let memo = product.memo.as_deref().unwrap_or("");
        let lines: Vec<Line> = wrap_width(memo, w)
            .into_iter()
            .take(inner.height as usize)
            .map(Line::from)
            .collect();
        f.render_widget(Clear, inner);
        f.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::White).bg(Color::Rgb(30, 30, 30))),
            inner,
        );
    }
}
