/// Overlay/popup draw functions: product edit dialog, product add dialog, and
/// the quantity dropdown they share.
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, Paragraph},
};
use tui_textarea::TextArea;

use super::dialogs::{AddDialog, EditDialog, EditField, QuantityDropdown};
use super::input::LineInput;
use super::render::{ACCENT, DIM, fit_width};
use crate::detail::PlanDetail;
use crate::form::AddField;
use crate::model::{QUANTITY_OPTIONS, Quantity};

const MEMO_HEIGHT: u16 = 5;

fn popup(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect { x, y, width, height }
}

fn dialog_block(title: &str) -> Block<'static> {
    Block::default()
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT))
        .style(Style::default().bg(Color::Rgb(12, 12, 22)))
}

fn label_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DIM)
    }
}

/// Slice of `area` starting `offset` rows down.
fn rows(area: Rect, offset: u16, height: u16) -> Rect {
    let y = (area.y + offset).min(area.y + area.height);
    let height = height.min((area.y + area.height).saturating_sub(y));
    Rect { y, height, ..area }
}

fn draw_line_input(f: &mut Frame, label: &str, input: &LineInput, focused: bool, area: Rect) {
    let width = area.width.saturating_sub(16) as usize;
    let mut spans = vec![Span::styled(format!(" {label:<14}"), label_style(focused))];
    if focused {
        let (before, after) = input.text().split_at(input.cursor());
        let mut rest = after.chars();
        let at = rest.next().map(String::from).unwrap_or_else(|| " ".to_string());
        spans.push(Span::raw(before.to_string()));
        spans.push(Span::styled(at, Style::default().add_modifier(Modifier::REVERSED)));
        spans.push(Span::raw(rest.as_str().to_string()));
    } else {
        spans.push(Span::raw(fit_width(input.text(), width)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_memo(f: &mut Frame, memo: &TextArea<'static>, focused: bool, area: Rect) {
    let mut memo = memo.clone();
    memo.set_block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(label_style(focused))
            .title(Span::styled(" Memo ", label_style(focused))),
    );
    if focused {
        memo.set_cursor_style(Style::default().add_modifier(Modifier::REVERSED));
    } else {
        memo.set_cursor_style(Style::default());
    }
    memo.set_cursor_line_style(Style::default());
    f.render_widget(&memo, area);
}

fn draw_quantity(f: &mut Frame, quantity: Quantity, focused: bool, area: Rect) {
    let value_style = if focused {
        Style::default().fg(Color::Black).bg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let line = Line::from(vec![
        Span::styled(format!(" {:<14}", "Quantity"), label_style(focused)),
        Span::styled(format!(" {quantity} ▾ "), value_style),
        Span::styled(if focused { "  Enter list · 1-9 · ←→" } else { "" }, Style::default().fg(DIM)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

/// Open dropdown list, anchored under the quantity row.
fn draw_dropdown(f: &mut Frame, dropdown: &QuantityDropdown, anchor: Rect, frame: Rect) {
    if !dropdown.open {
        return;
    }
    let height = QUANTITY_OPTIONS.len() as u16 + 2;
    let y = if anchor.y + 1 + height <= frame.y + frame.height {
        anchor.y + 1
    } else {
        anchor.y.saturating_sub(height)
    };
    let area = Rect { x: anchor.x + 16, y, width: 8, height }.intersection(frame);
    f.render_widget(Clear, area);
    let items: Vec<ListItem<'static>> = QUANTITY_OPTIONS
        .iter()
        .enumerate()
        .map(|(i, opt)| {
            let style = if i == dropdown.highlighted {
                Style::default().fg(Color::Black).bg(ACCENT)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(Span::styled(format!("  {opt}  "), style)))
        })
        .collect();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT))
        .style(Style::default().bg(Color::Rgb(12, 12, 22)));
    f.render_widget(List::new(items).block(block), area);
}

fn draw_footer(f: &mut Frame, area: Rect, error: Option<&str>) {
    let line = match error {
        Some(err) => Line::from(Span::styled(format!(" ✗ {err}"), Style::default().fg(Color::Red))),
        None => Line::from(vec![
            Span::styled(" Ctrl+S", Style::default().fg(ACCENT)),
            Span::styled(" save   ", Style::default().fg(DIM)),
            Span::styled("Esc", Style::default().fg(ACCENT)),
            Span::styled(" cancel   ", Style::default().fg(DIM)),
            Span::styled("Tab", Style::default().fg(ACCENT)),
            Span::styled(" next field", Style::default().fg(DIM)),
        ]),
    };
    f.render_widget(Paragraph::new(line), area);
}

// ── Edit dialog ───────────────────────────────────────────────────────────────

pub fn draw_edit(f: &mut Frame, detail: &PlanDetail, dialog: &EditDialog, area: Rect) {
    let (Some(product), Some(form)) = (
        detail.product(dialog.key),
        detail.card(dialog.key).and_then(|c| c.edit_form()),
    ) else {
        return;
    };

    let popup_area = popup(area, 56, MEMO_HEIGHT + 9);
    f.render_widget(Clear, popup_area);
    let block = dialog_block("Edit product");
    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let name = Line::from(vec![
        Span::styled(" Name  ", Style::default().fg(DIM)),
        Span::styled(
            fit_width(&format!("{} {}", product.glyph(), product.name), inner.width.saturating_sub(8) as usize),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
    ]);
    f.render_widget(Paragraph::new(name), rows(inner, 0, 1));

    let checked_focus = dialog.field == EditField::Checked;
    let mark = if form.checked { "[x]" } else { "[ ]" };
    let checkbox = Line::from(vec![
        Span::styled(format!(" {mark} "), label_style(checked_focus)),
        Span::styled("Bought", label_style(checked_focus)),
    ]);
    f.render_widget(Paragraph::new(checkbox), rows(inner, 2, 1));

    draw_memo(f, &dialog.memo, dialog.field == EditField::Memo, rows(inner, 3, MEMO_HEIGHT));

    let qty_row = rows(inner, 3 + MEMO_HEIGHT + 1, 1);
    draw_quantity(f, form.quantity(), dialog.field == EditField::Quantity, qty_row);

    draw_footer(f, rows(inner, inner.height.saturating_sub(1), 1), None);
    draw_dropdown(f, &dialog.dropdown, qty_row, area);
}

// ── Add dialog ────────────────────────────────────────────────────────────────

pub fn draw_add(f: &mut Frame, dialog: &AddDialog, group: &str, area: Rect) {
    let popup_area = popup(area, 60, MEMO_HEIGHT + 15);
    f.render_widget(Clear, popup_area);
    let block = dialog_block(&format!("Add product · {group}"));
    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let focus = dialog.field;
    draw_line_input(f, AddField::Name.label(), &dialog.name, focus == AddField::Name, rows(inner, 0, 1));
    draw_line_input(f, AddField::Icon.label(), &dialog.icon, focus == AddField::Icon, rows(inner, 1, 1));
    draw_memo(f, &dialog.memo, focus == AddField::Memo, rows(inner, 2, MEMO_HEIGHT));

    let qty_row = rows(inner, 2 + MEMO_HEIGHT, 1);
    draw_quantity(f, dialog.quantity, focus == AddField::Quantity, qty_row);
    draw_line_input(
        f,
        AddField::BasePrice.label(),
        &dialog.base_price,
        focus == AddField::BasePrice,
        rows(inner, 3 + MEMO_HEIGHT, 1),
    );

    let form = dialog.form();
    let mut stub: Vec<Line> = vec![Line::raw("")];
    stub.push(Line::from(Span::styled(" Groups (multiple)", Style::default().fg(DIM))));
    stub.extend(form.groups.iter().map(|g| Line::raw(format!("   - {g}"))));
    stub.push(Line::from(Span::styled(" Tags (multiple)", Style::default().fg(DIM))));
    stub.extend(form.tags.iter().map(|t| Line::raw(format!("   # {t}"))));
    let photo = form
        .image
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "not selected".to_string());
    stub.push(Line::from(Span::styled(format!(" Photo (1): {photo}"), Style::default().fg(DIM))));
    f.render_widget(Paragraph::new(stub), rows(inner, 4 + MEMO_HEIGHT, 6));

    draw_footer(f, rows(inner, inner.height.saturating_sub(1), 1), dialog.error.as_deref());
    draw_dropdown(f, &dialog.dropdown, qty_row, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_popup_is_centred_and_clamped() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(popup(area, 60, 20), Rect::new(20, 10, 60, 20));
        let tiny = Rect::new(0, 0, 30, 10);
        let p = popup(tiny, 60, 20);
        assert_eq!((p.width, p.height), (28, 8));
    }

    #[test]
    fn test_rows_clip_to_area() {
        let area = Rect::new(0, 0, 10, 5);
        assert_eq!(rows(area, 3, 4), Rect::new(0, 3, 10, 2));
        assert_eq!(rows(area, 9, 1).height, 0);
    }
}
