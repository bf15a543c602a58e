//! Terminal event collection: crossterm polling, mouse wheel coalescing, and the
//! input thread that feeds decoded events to the reactor.

use crate::error::PagerError;
use crate::input::keys::Key;
use crate::logger::Level;
use crate::reactor::ReactorHandle;
use ratatui::crossterm::event::{self, Event, MouseEvent, MouseEventKind};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Default coalescing window in milliseconds for wheel events.
const DEFAULT_COALESCE_WINDOW_MS: u64 = 12;
/// Number of lines produced by a single mouse wheel tick.
const MOUSE_SCROLL_LINES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// Terminal events in the form the reactor consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(Key),
    Resize { cols: u16, rows: u16 },
    Scroll { direction: ScrollDirection, lines: usize },
}

/// Aggregates bursts of same-direction wheel events into one larger step.
#[derive(Debug, Clone)]
pub struct InputCoalescer {
    window: Duration,
    pending: Option<PendingScroll>,
}

#[derive(Debug, Clone)]
struct PendingScroll {
    direction: ScrollDirection,
    lines: usize,
    last_event: Instant,
}

impl InputCoalescer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Register a wheel event, returning a previously accumulated scroll that must be
    /// flushed first because the direction changed.
    pub fn push(
        &mut self,
        direction: ScrollDirection,
        lines: usize,
        now: Instant,
    ) -> Option<(ScrollDirection, usize)> {
        match self.pending {
            Some(ref mut pending) if pending.direction == direction => {
                pending.lines = pending.lines.saturating_add(lines);
                pending.last_event = now;
                None
            }
            _ => {
                let flushed = self.flush();
                self.pending = Some(PendingScroll {
                    direction,
                    lines,
                    last_event: now,
                });
                flushed
            }
        }
    }

    /// Flush the accumulated scroll once the window has passed without new events.
    pub fn flush_if_stale(&mut self, now: Instant) -> Option<(ScrollDirection, usize)> {
        let stale = self
            .pending
            .as_ref()
            .is_some_and(|pending| now.duration_since(pending.last_event) >= self.window);
        if stale {
            self.flush()
        } else {
            None
        }
    }

    pub fn flush(&mut self) -> Option<(ScrollDirection, usize)> {
        self.pending
            .take()
            .map(|pending| (pending.direction, pending.lines))
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_none()
    }
}

/// Polls crossterm and turns its events into [`InputEvent`]s.
#[derive(Debug)]
pub struct RawInputCollector {
    coalescer: InputCoalescer,
    pending_events: VecDeque<InputEvent>,
}

impl Default for RawInputCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl RawInputCollector {
    pub fn new() -> Self {
        Self::with_window(Duration::from_millis(DEFAULT_COALESCE_WINDOW_MS))
    }

    pub fn with_window(window: Duration) -> Self {
        Self {
            coalescer: InputCoalescer::new(window),
            pending_events: VecDeque::new(),
        }
    }

    /// Feed one crossterm event without polling. Used by the poll loop and by tests.
    pub fn process_event(&mut self, event: Event) {
        match event {
            Event::Key(key_event) => {
                if let Some(key) = Key::from_event(key_event) {
                    self.flush_pending_scroll();
                    self.pending_events.push_back(InputEvent::Key(key));
                }
            }
            Event::Resize(cols, rows) => {
                self.flush_pending_scroll();
                self.pending_events
                    .push_back(InputEvent::Resize { cols, rows });
            }
            Event::Mouse(mouse_event) => self.handle_mouse_event(mouse_event),
            _ => {}
        }
    }

    /// Next ready event without touching the terminal.
    pub fn try_next(&mut self) -> Option<InputEvent> {
        if let Some(event) = self.pending_events.pop_front() {
            return Some(event);
        }
        self.coalescer
            .flush_if_stale(Instant::now())
            .map(|(direction, lines)| InputEvent::Scroll { direction, lines })
    }

    /// Next event, waiting up to `timeout` for the terminal.
    pub fn poll_event(&mut self, timeout: Duration) -> std::io::Result<Option<InputEvent>> {
        if let Some(event) = self.try_next() {
            return Ok(Some(event));
        }
        if event::poll(timeout)? {
            self.process_event(event::read()?);
        }
        Ok(self.try_next())
    }

    fn handle_mouse_event(&mut self, mouse_event: MouseEvent) {
        let direction = match mouse_event.kind {
            MouseEventKind::ScrollUp => ScrollDirection::Up,
            MouseEventKind::ScrollDown => ScrollDirection::Down,
            _ => return,
        };
        if let Some((direction, lines)) =
            self.coalescer
                .push(direction, MOUSE_SCROLL_LINES, Instant::now())
        {
            self.pending_events
                .push_back(InputEvent::Scroll { direction, lines });
        }
    }

    fn flush_pending_scroll(&mut self) {
        if let Some((direction, lines)) = self.coalescer.flush() {
            self.pending_events
                .push_back(InputEvent::Scroll { direction, lines });
        }
    }
}

/// Spawn the dedicated input thread. It runs until the reactor stops; a terminal
/// read failure stops the reactor with an error.
pub fn spawn_input_thread<A>(
    reactor: ReactorHandle<A>,
    poll_interval: Duration,
) -> std::io::Result<std::thread::JoinHandle<()>>
where
    A: From<InputEvent> + Send + 'static,
{
    std::thread::Builder::new()
        .name("rpager-input".to_string())
        .spawn(move || {
            let mut collector = RawInputCollector::new();
            while !reactor.is_stopping() {
                match collector.poll_event(poll_interval) {
                    Ok(Some(event)) => {
                        if !reactor.enqueue(A::from(event), "input") {
                            break;
                        }
                    }
                    Ok(None) => continue,
                    Err(e) => {
                        reactor.fail(PagerError::terminal("Failed to read terminal input", e));
                        break;
                    }
                }
            }
            reactor
                .log()
                .record(Level::Debug, "input", "input thread exiting");
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn wheel(kind: MouseEventKind) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn accumulates_same_direction_within_window() {
        let mut coalescer = InputCoalescer::new(Duration::from_millis(10));
        let now = Instant::now();
        assert!(coalescer.push(ScrollDirection::Down, 1, now).is_none());
        assert!(coalescer
            .push(ScrollDirection::Down, 2, now + Duration::from_millis(5))
            .is_none());

        assert!(coalescer
            .flush_if_stale(now + Duration::from_millis(6))
            .is_none());
        assert_eq!(
            coalescer.flush_if_stale(now + Duration::from_millis(20)),
            Some((ScrollDirection::Down, 3))
        );
        assert!(coalescer.is_empty());
    }

    #[test]
    fn flushes_on_direction_change() {
        let mut coalescer = InputCoalescer::new(Duration::from_millis(10));
        let now = Instant::now();
        coalescer.push(ScrollDirection::Up, 1, now);
        let flushed = coalescer.push(ScrollDirection::Down, 1, now + Duration::from_millis(3));
        assert_eq!(flushed, Some((ScrollDirection::Up, 1)));
        assert_eq!(coalescer.flush(), Some((ScrollDirection::Down, 1)));
    }

    #[test]
    fn key_flushes_pending_scroll_first() {
        let mut collector = RawInputCollector::with_window(Duration::from_secs(60));
        collector.process_event(wheel(MouseEventKind::ScrollDown));
        collector.process_event(wheel(MouseEventKind::ScrollDown));
        collector.process_event(Event::Key(KeyEvent::new(
            KeyCode::Char('j'),
            KeyModifiers::NONE,
        )));

        assert_eq!(
            collector.try_next(),
            Some(InputEvent::Scroll {
                direction: ScrollDirection::Down,
                lines: 6
            })
        );
        assert_eq!(collector.try_next(), Some(InputEvent::Key(Key::Char(b'j'))));
        assert_eq!(collector.try_next(), None);
    }

    #[test]
    fn resize_is_forwarded() {
        let mut collector = RawInputCollector::new();
        collector.process_event(Event::Resize(80, 24));
        assert_eq!(
            collector.try_next(),
            Some(InputEvent::Resize { cols: 80, rows: 24 })
        );
    }
}
