/// Ratatui-based TUI for shoplist.
///
/// Architecture:
///   main thread:  event loop over crossterm key/mouse events, gesture tick, UiEvent drain
///   memo timers:  tokio::spawn one-shot sleeps that post UiEvent::MemoExpired back
///
/// Screens follow the route on top of the navigator:
///   plan_list            → plan_list.rs
///   plan_detail/{id}     → plan_detail.rs (+ edit/add dialogs from overlays.rs)
pub mod dialogs;
pub mod input;
pub mod overlays;
pub mod plan_detail;
pub mod plan_list;
pub mod render;

use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use tokio::sync::mpsc;

use crate::config::ResolvedConfig;
use crate::detail::{CardKey, Effect, Focus, PlanDetail};
use crate::gesture::{Gesture, GestureDetector};
use crate::plans;
use crate::route::{Navigator, Route};
use dialogs::{AddDialog, DialogAction, EditDialog};

const TICK: Duration = Duration::from_millis(50);
const STATUS_TTL: Duration = Duration::from_secs(3);

// ── UiEvent: posted back to the loop by background tasks ────────────────────

#[derive(Debug, Clone)]
pub enum UiEvent {
    /// A memo display timer ran out
    MemoExpired { key: CardKey, ticket: u64 },
}

/// Spawn the one-shot memo hide timer.
pub fn schedule_memo_hide(
    tx: mpsc::UnboundedSender<UiEvent>,
    key: CardKey,
    ticket: u64,
    after: Duration,
) {
    tokio::spawn(async move {
        tokio::time::sleep(after).await;
        let _ = tx.send(UiEvent::MemoExpired { key, ticket });
    });
}

// ── Overlay: modal dialogs on the detail screen ──────────────────────────────

pub enum Overlay {
    Edit(EditDialog),
    Add(AddDialog),
}

// ── AppState ──────────────────────────────────────────────────────────────────

pub struct AppState {
    pub config: ResolvedConfig,
    pub nav: Navigator,
    pub plans: Vec<String>,
    /// Highlighted row on the plan list
    pub list_selected: usize,
    /// Present while the detail route is on top
    pub detail: Option<PlanDetail>,
    pub overlay: Option<Overlay>,
    pub gestures: GestureDetector<Focus>,
    /// Transient status line message
    pub status: Option<(String, Instant)>,
    next_ticket: u64,
}

impl AppState {
    pub fn new(config: ResolvedConfig, start_plan: Option<&str>) -> Self {
        let gestures = GestureDetector::new(config.double_tap, config.long_press);
        let mut state = Self {
            plans: config.plans.clone(),
            config,
            nav: Navigator::with_start(start_plan),
            list_selected: 0,
            detail: None,
            overlay: None,
            gestures,
            status: None,
            next_ticket: 0,
        };
        if let Some(idx) = start_plan.and_then(|id| state.plans.iter().position(|p| p == id)) {
            state.list_selected = idx;
        }
        state.sync_route();
        state
    }

    /// Tickets keep rising across screen rebuilds, so a timer from an old
    /// detail screen can never match a card on a new one.
    fn issue_ticket(&mut self) -> u64 {
        self.next_ticket += 1;
        self.next_ticket
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some((msg.into(), Instant::now()));
    }

    pub fn status_text(&self) -> Option<&str> {
        self.status
            .as_ref()
            .filter(|(_, at)| at.elapsed() < STATUS_TTL)
            .map(|(m, _)| m.as_str())
    }

    // ── Navigation ────────────────────────────────────────────────────────────

    pub fn open_plan(&mut self, plan_id: &str) {
        self.nav.open_plan(plan_id);
        self.sync_route();
    }

    pub fn back(&mut self) {
        self.nav.back();
        self.sync_route();
    }

    /// Rebuild or drop screen state to match the route on top.
    fn sync_route(&mut self) {
        self.gestures.reset();
        self.overlay = None;
        let Some(plan_id) = self.nav.current().plan_id() else {
            self.detail = None;
            return;
        };
        if self.detail.as_ref().is_none_or(|d| d.plan_id != plan_id) {
            self.detail = Some(PlanDetail::open(plan_id, self.config.grid_columns));
        }
    }

    pub fn add_today_plan(&mut self) {
        let before = self.plans.len();
        self.list_selected = plans::add_today(&mut self.plans);
        if self.plans.len() > before {
            tracing::info!(plan = %self.plans[self.list_selected], "plan created");
            self.set_status(format!("created plan {}", self.plans[self.list_selected]));
        } else {
            self.set_status("today's plan already exists");
        }
    }

    // ── Gestures ──────────────────────────────────────────────────────────────

    pub fn apply_gesture(&mut self, gesture: Gesture<Focus>, ui_tx: &mpsc::UnboundedSender<UiEvent>) {
        if self.overlay.is_some() {
            return;
        }
        let ticket = match gesture {
            Gesture::Tap(Focus::Product(_)) => self.issue_ticket(),
            _ => 0,
        };
        // focus stays where the cursor is now; a late tap still lands on its own target
        let Some(detail) = self.detail.as_mut() else { return };
        tracing::debug!(?gesture, "gesture");
        match detail.apply_gesture(gesture, ticket) {
            Some(Effect::ScheduleMemoHide { key, ticket }) => {
                schedule_memo_hide(ui_tx.clone(), key, ticket, self.config.memo_hide);
            }
            Some(Effect::EditStarted(key)) => {
                if let Some(form) = detail.card(key).and_then(|c| c.edit_form()) {
                    self.overlay = Some(Overlay::Edit(EditDialog::new(key, form)));
                }
            }
            Some(Effect::Toggled { .. }) | Some(Effect::GroupToggled { .. }) | None => {}
        }
    }

    pub fn apply_event(&mut self, ev: UiEvent) {
        match ev {
            UiEvent::MemoExpired { key, ticket } => {
                if let Some(detail) = self.detail.as_mut() {
                    detail.memo_expired(key, ticket);
                }
            }
        }
    }

    // ── Dialogs ───────────────────────────────────────────────────────────────

    pub fn open_add_dialog(&mut self) {
        let Some(detail) = self.detail.as_ref() else { return };
        self.gestures.reset();
        self.overlay = Some(Overlay::Add(AddDialog::new(detail.focused_group())));
    }

    fn handle_overlay_key(&mut self, key: KeyEvent) {
        let Some(detail) = self.detail.as_mut() else {
            self.overlay = None;
            return;
        };
        match self.overlay.take() {
            Some(Overlay::Edit(mut dialog)) => {
                let card_key = dialog.key;
                let Some(form) = detail.card_mut(card_key).and_then(|c| c.edit_form_mut()) else {
                    return;
                };
                match dialog.handle_key(key, form) {
                    DialogAction::None => self.overlay = Some(Overlay::Edit(dialog)),
                    DialogAction::Save => {
                        detail.save_edit(card_key);
                    }
                    DialogAction::Cancel => {
                        detail.cancel_edit(card_key);
                    }
                }
            }
            Some(Overlay::Add(mut dialog)) => match dialog.handle_key(key) {
                DialogAction::None => self.overlay = Some(Overlay::Add(dialog)),
                DialogAction::Cancel => {}
                DialogAction::Save => {
                    let group = dialog.group;
                    let mut added = None;
                    match dialog.form().save(|p| added = detail.add_product(group, p)) {
                        Ok(()) => {
                            if let Some(key) = added {
                                detail.focus = Focus::Product(key);
                                if !detail.groups[group].expanded {
                                    detail.toggle_group(group);
                                }
                            }
                        }
                        Err(_) => {
                            dialog.error = Some("name is required".to_string());
                            self.overlay = Some(Overlay::Add(dialog));
                        }
                    }
                }
            },
            None => {}
        }
    }
}

// ── Terminal setup / teardown ─────────────────────────────────────────────────

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) {
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen);
    let _ = terminal.show_cursor();
}

// ── Main TUI run loop ─────────────────────────────────────────────────────────

pub async fn run(config: ResolvedConfig, start_plan: Option<String>) -> Result<()> {
    let mut terminal = setup_terminal()?;

    // Panic hook: restore terminal before printing panic
    let orig_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        orig_hook(info);
    }));

    let state = AppState::new(config, start_plan.as_deref());
    let result = event_loop(&mut terminal, state).await;

    restore_terminal(&mut terminal);
    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut state: AppState,
) -> Result<()> {
    let (ui_tx, mut ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let mut crossterm_events = EventStream::new();
    let mut ticker = tokio::time::interval(TICK);
    let mut status_shown = false;

    terminal.draw(|f| render::draw(f, &state))?;

    loop {
        tokio::select! {
            // ── Gesture tick: late taps, held long presses, status expiry ─────
            _ = ticker.tick() => {
                let mut dirty = false;
                if let Some(g) = state.gestures.poll(Instant::now()) {
                    state.apply_gesture(g, &ui_tx);
                    dirty = true;
                }
                let showing = state.status_text().is_some();
                if showing != status_shown {
                    status_shown = showing;
                    dirty = true;
                }
                if dirty {
                    terminal.draw(|f| render::draw(f, &state))?;
                }
            }

            // ── Timer events ──────────────────────────────────────────────────
            Some(ev) = ui_rx.recv() => {
                state.apply_event(ev);
                terminal.draw(|f| render::draw(f, &state))?;
            }

            // ── Keyboard/mouse/resize events ──────────────────────────────────
            Some(Ok(ev)) = crossterm_events.next() => {
                match ev {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if !handle_key(key, &mut state, &ui_tx) {
                            break;
                        }
                    }
                    Event::Mouse(mouse) => {
                        let size = terminal.size()?;
                        let area = Rect::new(0, 0, size.width, size.height);
                        handle_mouse(mouse, area, &mut state, &ui_tx);
                    }
                    _ => {}
                }
                terminal.draw(|f| render::draw(f, &state))?;
            }
        }
    }

    tracing::info!("exiting");
    Ok(())
}

// ── Key handler ───────────────────────────────────────────────────────────────

/// Returns false when the app should quit.
fn handle_key(key: KeyEvent, state: &mut AppState, ui_tx: &mpsc::UnboundedSender<UiEvent>) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return false;
    }

    if state.overlay.is_some() {
        state.handle_overlay_key(key);
        return true;
    }

    if matches!(state.nav.current(), Route::PlanList) {
        return handle_list_key(key, state);
    }

    let Some(detail) = state.detail.as_mut() else {
        state.back();
        return true;
    };
    let focus = detail.focus;
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Backspace => state.back(),
        KeyCode::Left | KeyCode::Char('h') => detail.move_prev(),
        KeyCode::Right | KeyCode::Char('l') => detail.move_next(),
        KeyCode::Up | KeyCode::Char('k') => detail.move_up(),
        KeyCode::Down | KeyCode::Char('j') => detail.move_down(),
        KeyCode::Enter | KeyCode::Char(' ') => {
            if let Some(g) = state.gestures.press(focus, Instant::now()) {
                state.apply_gesture(g, ui_tx);
            }
        }
        KeyCode::Char('x') => state.apply_gesture(Gesture::DoubleTap(focus), ui_tx),
        KeyCode::Char('e') => {
            let g = state.gestures.long_press(focus);
            state.apply_gesture(g, ui_tx);
        }
        KeyCode::Char('a') => state.open_add_dialog(),
        _ => {}
    }
    true
}

fn handle_list_key(key: KeyEvent, state: &mut AppState) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return false,
        KeyCode::Up | KeyCode::Char('k') => {
            state.list_selected = state.list_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.list_selected + 1 < state.plans.len() {
                state.list_selected += 1;
            }
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            if let Some(id) = state.plans.get(state.list_selected).cloned() {
                state.open_plan(&id);
            }
        }
        KeyCode::Char('n') => state.add_today_plan(),
        _ => {}
    }
    true
}

// ── Mouse handler ─────────────────────────────────────────────────────────────

fn handle_mouse(
    mouse: MouseEvent,
    area: Rect,
    state: &mut AppState,
    ui_tx: &mpsc::UnboundedSender<UiEvent>,
) {
    if state.overlay.is_some() {
        return;
    }
    let body = render::body_area(area);
    let now = Instant::now();

    if matches!(state.nav.current(), Route::PlanList) {
        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
            if let Some(idx) = plan_list::hit_test(
                body,
                state.plans.len(),
                state.list_selected,
                mouse.column,
                mouse.row,
            ) {
                state.list_selected = idx;
                let id = state.plans[idx].clone();
                state.open_plan(&id);
            }
        }
        return;
    }

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let target = state
                .detail
                .as_ref()
                .and_then(|d| plan_detail::hit_test(d, body, mouse.column, mouse.row));
            if let Some(target) = target {
                if let Some(d) = state.detail.as_mut() {
                    d.focus = target;
                }
                state.gestures.mouse_down(target, now);
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            // a plain click resolves later from the tick, once the double-tap window closes
            if let Some(g) = state.gestures.mouse_up(now) {
                state.apply_gesture(g, ui_tx);
            }
        }
        MouseEventKind::ScrollDown => {
            if let Some(d) = state.detail.as_mut() {
                d.move_down();
            }
        }
        MouseEventKind::ScrollUp => {
            if let Some(d) = state.detail.as_mut() {
                d.move_up();
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFile;

    fn config() -> ResolvedConfig {
        let mut cfg = ResolvedConfig::resolve(&ConfigFile::default(), None);
        cfg.memo_hide = Duration::from_millis(20);
        cfg
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    const MILK: CardKey = CardKey { group: 0, product: 0 };

    #[test]
    fn test_start_plan_opens_detail() {
        let state = AppState::new(config(), Some("2025-06-24"));
        assert_eq!(state.nav.current().plan_id(), Some("2025-06-24"));
        assert_eq!(state.list_selected, 1);
        assert_eq!(state.detail.as_ref().map(|d| d.plan_id.as_str()), Some("2025-06-24"));
    }

    #[test]
    fn test_list_keys_move_and_open() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut state = AppState::new(config(), None);
        assert!(state.detail.is_none());
        assert!(handle_key(press(KeyCode::Down), &mut state, &tx));
        assert!(handle_key(press(KeyCode::Enter), &mut state, &tx));
        assert_eq!(state.nav.current().plan_id(), Some("2025-06-24"));
        assert!(handle_key(press(KeyCode::Esc), &mut state, &tx));
        assert_eq!(state.nav.current(), &Route::PlanList);
        assert!(!handle_key(press(KeyCode::Char('q')), &mut state, &tx));
    }

    #[tokio::test]
    async fn test_leaving_plan_discards_edit() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut state = AppState::new(config(), Some("2025-06-24"));
        state.apply_gesture(Gesture::LongPress(Focus::Product(MILK)), &tx);
        assert!(matches!(state.overlay, Some(Overlay::Edit(_))));

        state.back();
        assert!(state.overlay.is_none());
        assert!(state.detail.is_none());

        state.open_plan("2025-06-24");
        let detail = state.detail.as_ref().unwrap();
        assert!(!detail.card(MILK).unwrap().is_editing());
    }

    #[tokio::test]
    async fn test_edit_dialog_save_applies_changes() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut state = AppState::new(config(), Some("2025-06-24"));
        state.apply_gesture(Gesture::LongPress(Focus::Product(MILK)), &tx);
        // focus starts on the checkbox
        assert!(handle_key(press(KeyCode::Char(' ')), &mut state, &tx));
        assert!(handle_key(ctrl('s'), &mut state, &tx));
        assert!(state.overlay.is_none());
        let detail = state.detail.as_ref().unwrap();
        assert!(detail.product(MILK).unwrap().checked);
        assert!(!detail.card(MILK).unwrap().is_editing());
    }

    #[tokio::test]
    async fn test_memo_hides_after_timer() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut state = AppState::new(config(), Some("2025-06-24"));
        state.apply_gesture(Gesture::Tap(Focus::Product(MILK)), &tx);
        assert!(state.detail.as_ref().unwrap().card(MILK).unwrap().is_memo_shown());

        let ev = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        state.apply_event(ev);
        assert!(!state.detail.as_ref().unwrap().card(MILK).unwrap().is_memo_shown());
    }

    #[tokio::test]
    async fn test_stale_timer_is_ignored() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut state = AppState::new(config(), Some("2025-06-24"));
        state.apply_gesture(Gesture::Tap(Focus::Product(MILK)), &tx);
        let first = rx.recv().await.unwrap();

        // hidden by long press + cancel, then shown again with a new ticket
        state.apply_gesture(Gesture::LongPress(Focus::Product(MILK)), &tx);
        assert!(handle_key(press(KeyCode::Esc), &mut state, &tx));
        state.apply_gesture(Gesture::Tap(Focus::Product(MILK)), &tx);

        state.apply_event(first);
        assert!(state.detail.as_ref().unwrap().card(MILK).unwrap().is_memo_shown());
    }

    #[tokio::test]
    async fn test_add_dialog_requires_name() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut state = AppState::new(config(), Some("2025-06-24"));
        state.open_add_dialog();
        assert!(handle_key(ctrl('s'), &mut state, &tx));
        match &state.overlay {
            Some(Overlay::Add(dialog)) => assert!(dialog.error.is_some()),
            _ => panic!("add dialog should stay open"),
        }

        for c in "卵".chars() {
            handle_key(press(KeyCode::Char(c)), &mut state, &tx);
        }
        assert!(handle_key(ctrl('s'), &mut state, &tx));
        assert!(state.overlay.is_none());
        let detail = state.detail.as_ref().unwrap();
        let Focus::Product(key) = detail.focus else { panic!("focus should move to the new card") };
        assert_eq!(detail.product(key).unwrap().name, "卵");
    }

    #[test]
    fn test_long_plan_list_keeps_selection_on_screen() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut cfg = config();
        cfg.plans = (1..=12).map(|d| format!("2025-07-{d:02}")).collect();
        let mut state = AppState::new(cfg, None);
        let body = render::body_area(Rect::new(0, 0, 80, 24));
        for _ in 0..11 {
            handle_key(press(KeyCode::Down), &mut state, &tx);
            let rects = plan_list::item_rects(body, state.plans.len(), state.list_selected);
            assert!(rects.iter().any(|(i, _)| *i == state.list_selected));
        }
        assert_eq!(state.list_selected, 11);

        let (_, rect) = *plan_list::item_rects(body, 12, 11).last().unwrap();
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: rect.x + 1,
            row: rect.y + 1,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse(click, Rect::new(0, 0, 80, 24), &mut state, &tx);
        assert_eq!(state.nav.current().plan_id(), Some("2025-07-12"));
    }

    #[tokio::test]
    async fn test_late_tap_does_not_pull_focus_back() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut state = AppState::new(config(), Some("2025-06-24"));
        handle_key(press(KeyCode::Enter), &mut state, &tx);
        handle_key(press(KeyCode::Right), &mut state, &tx);
        let bread = Focus::Product(CardKey::new(0, 1));
        assert_eq!(state.detail.as_ref().unwrap().focus, bread);

        let tap = state.gestures.poll(Instant::now() + Duration::from_secs(1)).unwrap();
        state.apply_gesture(tap, &tx);
        let detail = state.detail.as_ref().unwrap();
        assert_eq!(detail.focus, bread);
        assert!(detail.card(MILK).unwrap().is_memo_shown());
    }

    #[test]
    fn test_mouse_down_focuses_card() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut state = AppState::new(config(), Some("2025-06-24"));
        let area = Rect::new(0, 0, 80, 24);
        let down = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 30,
            row: 3,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse(down, area, &mut state, &tx);
        assert_eq!(state.detail.as_ref().unwrap().focus, Focus::Product(CardKey::new(0, 1)));
    }

    #[test]
    fn test_new_plan_is_added_once() {
        let mut state = AppState::new(config(), None);
        let before = state.plans.len();
        state.add_today_plan();
        state.add_today_plan();
        assert_eq!(state.plans.len(), before + 1);
        assert_eq!(state.list_selected, 0);
        assert!(state.status_text().is_some());
    }
}
