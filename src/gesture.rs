/// Gesture recognition for terminal input.
///
/// Terminals only give us key presses and mouse down/up, so taps, double taps
/// and long presses are reconstructed from timing:
///
///   press, no second press within `double_tap`   → Tap (reported late, from `poll`)
///   press, press within `double_tap`            → DoubleTap
///   mouse down held for `long_press`             → LongPress (release swallowed)
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture<T> {
    Tap(T),
    DoubleTap(T),
    LongPress(T),
}

#[derive(Debug)]
struct Held<T> {
    target: T,
    since: Instant,
    fired: bool,
}

#[derive(Debug)]
pub struct GestureDetector<T> {
    double_tap: Duration,
    long_press: Duration,
    pending_tap: Option<(T, Instant)>,
    held: Option<Held<T>>,
}

impl<T: Clone + PartialEq> GestureDetector<T> {
    pub fn new(double_tap: Duration, long_press: Duration) -> Self {
        Self {
            double_tap,
            long_press,
            pending_tap: None,
            held: None,
        }
    }

    /// A click (key press or short mouse click) on `target`.
    /// A press on a different target flushes the pending tap immediately.
    pub fn press(&mut self, target: T, now: Instant) -> Option<Gesture<T>> {
        match self.pending_tap.take() {
            Some((prev, at)) if prev == target && now.duration_since(at) < self.double_tap => {
                Some(Gesture::DoubleTap(target))
            }
            Some((prev, _)) => {
                self.pending_tap = Some((target, now));
                Some(Gesture::Tap(prev))
            }
            None => {
                self.pending_tap = Some((target, now));
                None
            }
        }
    }

    /// Recognised directly (e.g. a dedicated key); drops any pending tap.
    pub fn long_press(&mut self, target: T) -> Gesture<T> {
        self.pending_tap = None;
        Gesture::LongPress(target)
    }

    pub fn mouse_down(&mut self, target: T, now: Instant) {
        self.held = Some(Held { target, since: now, fired: false });
    }

    pub fn mouse_up(&mut self, now: Instant) -> Option<Gesture<T>> {
        let held = self.held.take()?;
        if held.fired {
            return None;
        }
        if now.duration_since(held.since) >= self.long_press {
            return Some(self.long_press(held.target));
        }
        self.press(held.target, now)
    }

    /// Drive time-based recognition; call on every tick.
    pub fn poll(&mut self, now: Instant) -> Option<Gesture<T>> {
        let long_press = self.long_press;
        let fire = match &mut self.held {
            Some(held) if !held.fired && now.duration_since(held.since) >= long_press => {
                held.fired = true;
                Some(held.target.clone())
            }
            _ => None,
        };
        if let Some(target) = fire {
            return Some(self.long_press(target));
        }
        let due = matches!(&self.pending_tap, Some((_, at)) if now.duration_since(*at) >= self.double_tap);
        if due {
            self.pending_tap.take().map(|(t, _)| Gesture::Tap(t))
        } else {
            None
        }
    }

    /// Forget everything in flight (screen change, dialog opened).
    pub fn reset(&mut self) {
        self.pending_tap = None;
        self.held = None;
    }

    #[cfg(test)]
    pub fn is_idle(&self) -> bool {
        self.pending_tap.is_none() && self.held.is_none()
    }
}
