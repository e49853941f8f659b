/// Ratatui draw entry-point for shoplist.
/// Thin dispatcher; screens live in plan_list.rs / plan_detail.rs, dialogs in overlays.rs.
///
///   ┌────────────────────────────────────────────────┐
///   │  title bar (1 line)                            │
///   ├────────────────────────────────────────────────┤
///   │  screen body (Min(0))                          │
///   ├────────────────────────────────────────────────┤
///   │  status / key hints (1 line)                   │
///   └────────────────────────────────────────────────┘
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::{AppState, Overlay};
use crate::route::Route;

pub const BG: Color = Color::Rgb(8, 8, 14);
pub const DIM: Color = Color::Rgb(70, 67, 100);
pub const ACCENT: Color = Color::Cyan;
pub const DONE: Color = Color::Rgb(90, 200, 120);

fn split(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Min(0),    // body
            Constraint::Length(1), // status
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

/// Screen body for a full-frame area; mouse hit-testing uses the same split.
pub fn body_area(area: Rect) -> Rect {
    split(area)[1]
}

pub fn draw(f: &mut Frame, state: &AppState) {
    let [title, body, status] = split(f.area());
    f.render_widget(
        ratatui::widgets::Block::default().style(Style::default().bg(BG)),
        f.area(),
    );

    match state.nav.current() {
        Route::PlanList => {
            draw_title(f, title, "🛒 Shopping plans", None);
            super::plan_list::draw(f, state, body);
        }
        Route::PlanDetail { plan_id } => {
            let progress = state.detail.as_ref().map(|d| d.progress());
            draw_title(f, title, &format!("🗓  {plan_id} shopping plan"), progress);
            if let Some(detail) = &state.detail {
                super::plan_detail::draw(f, detail, body);
            }
        }
    }

    draw_status(f, state, status);

    match &state.overlay {
        Some(Overlay::Edit(dialog)) => {
            if let Some(detail) = &state.detail {
                super::overlays::draw_edit(f, detail, dialog, f.area());
            }
        }
        Some(Overlay::Add(dialog)) => {
            let group = state
                .detail
                .as_ref()
                .and_then(|d| d.groups.get(dialog.group))
                .map(|g| g.group.name.as_str())
                .unwrap_or("");
            super::overlays::draw_add(f, dialog, group, f.area());
        }
        None => {}
    }
}

fn draw_title(f: &mut Frame, area: Rect, title: &str, progress: Option<(usize, usize)>) {
    let mut spans = vec![
        Span::raw(" "),
        Span::styled(title.to_string(), Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
    ];
    if let Some((done, total)) = progress {
        let color = if total > 0 && done == total { DONE } else { DIM };
        spans.push(Span::styled(format!("   {done}/{total} done"), Style::default().fg(color)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_status(f: &mut Frame, state: &AppState, area: Rect) {
    if let Some(msg) = state.status_text() {
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(format!(" {msg}"), Style::default().fg(Color::Yellow)))),
            area,
        );
        return;
    }
    let hints: &[(&str, &str)] = match (&state.overlay, state.nav.current()) {
        (Some(_), _) => &[("Tab", "field"), ("Ctrl+S", "save"), ("Esc", "cancel")],
        (None, Route::PlanList) => &[("↑↓", "select"), ("Enter", "open"), ("n", "new plan"), ("q", "quit")],
        (None, Route::PlanDetail { .. }) => &[
            ("←↑↓→", "move"),
            ("Enter", "tap/memo"),
            ("Enter×2 / x", "done"),
            ("e", "edit"),
            ("a", "add"),
            ("Esc", "back"),
        ],
    };
    let mut spans = vec![Span::raw(" ")];
    for (key, label) in hints {
        spans.push(Span::styled(key.to_string(), Style::default().fg(ACCENT)));
        spans.push(Span::styled(format!(" {label}  "), Style::default().fg(DIM)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

// ── Text helpers ──────────────────────────────────────────────────────────────

/// Truncate to `max` terminal columns (CJK and emoji count double), adding `…`
/// when something was cut.
pub fn fit_width(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Greedy wrap by display width; used for memo bubbles.
pub fn wrap_width(s: &str, max: usize) -> Vec<String> {
    let max = max.max(1);
    let mut lines = Vec::new();
    for raw in s.lines() {
        let mut line = String::new();
        let mut used = 0;
        for c in raw.chars() {
            let w = c.width().unwrap_or(0);
            if used + w > max && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                used = 0;
            }
            line.push(c);
            used += w;
        }
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_width_counts_wide_chars() {
        assert_eq!(fit_width("牛乳", 4), "牛乳");
        assert_eq!(fit_width("鶏むね肉", 5), "鶏む…");
        assert_eq!(fit_width("bread", 3), "br…");
        assert_eq!(fit_width("x", 0), "");
    }

    #[test]
    fn test_wrap_width() {
        assert_eq!(wrap_width("那須の牛乳", 4), vec!["那須", "の牛", "乳"]);
        assert_eq!(wrap_width("ab\ncd", 10), vec!["ab", "cd"]);
    }

    #[test]
    fn test_body_area_excludes_bars() {
        let body = body_area(Rect::new(0, 0, 80, 24));
        assert_eq!(body, Rect::new(0, 1, 80, 22));
    }
}
