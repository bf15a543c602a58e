//! Navigable viewer state.
//!
//! The model keeps two windows of already-read lines around an anchor offset: `after`
//! starts at the anchor and runs forward, `before` holds the lines immediately
//! preceding it, nearest first. Scrolling moves lines between the two windows
//! without touching the content; larger jumps reset both windows and let the pager
//! refill them.
//!
//! Invariants:
//! 1. If `after` is non-empty, `after[0].offset == anchor_offset`.
//! 2. Each window is contiguous, and `before[0].end() == anchor_offset` when
//!    `before` is non-empty.

use crate::cancel::CancelSlot;
use crate::reader::Line;
use crate::render::style::{Colour, Style};
use crate::search::Pattern;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Result of a [`Model::move_to_offset`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reposition {
    /// Already at the target.
    Unchanged,
    /// Target found in a window; lines were moved, nothing was read.
    Reused,
    /// Target not loaded; both windows were discarded.
    Reset,
}

/// A pattern with the style its matches are drawn in.
#[derive(Debug, Clone)]
pub struct Highlight {
    pub style: Style,
    pub pattern: Pattern,
}

/// Saved colour patterns, the committed search pattern and the one being typed.
#[derive(Debug, Default)]
pub struct PatternSet {
    saved: Vec<Highlight>,
    selected: usize,
    search: Option<Highlight>,
    transient: Option<Highlight>,
    next_colour: usize,
}

impl PatternSet {
    /// Add a saved pattern. Without an explicit colour the next palette entry is used.
    pub fn add(&mut self, pattern: Pattern, colour: Option<Colour>) -> Style {
        let colour = colour.unwrap_or_else(|| {
            let colour = Colour::PALETTE[self.next_colour % Colour::PALETTE.len()];
            self.next_colour += 1;
            colour
        });
        let style = Style::with_colours(Colour::Black, colour);
        self.saved.push(Highlight { style, pattern });
        self.selected = self.saved.len() - 1;
        style
    }

    pub fn saved(&self) -> &[Highlight] {
        &self.saved
    }

    pub fn selected(&self) -> Option<&Highlight> {
        self.saved.get(self.selected)
    }

    /// Move the selection forward (or backward) through the saved patterns.
    pub fn cycle(&mut self, forward: bool) -> Option<&Highlight> {
        if self.saved.is_empty() {
            return None;
        }
        let len = self.saved.len();
        self.selected = if forward {
            (self.selected + 1) % len
        } else {
            (self.selected + len - 1) % len
        };
        self.saved.get(self.selected)
    }

    /// Remove the selected saved pattern.
    pub fn delete_selected(&mut self) -> Option<Highlight> {
        if self.saved.is_empty() {
            return None;
        }
        let removed = self.saved.remove(self.selected);
        if self.selected >= self.saved.len() {
            self.selected = self.saved.len().saturating_sub(1);
        }
        Some(removed)
    }

    pub fn search(&self) -> Option<&Highlight> {
        self.search.as_ref()
    }

    pub fn set_search(&mut self, pattern: Pattern) {
        self.search = Some(Highlight {
            style: Style::INVERTED,
            pattern,
        });
    }

    pub fn set_transient(&mut self, highlight: Option<Highlight>) {
        self.transient = highlight;
    }

    pub fn transient(&self) -> Option<&Highlight> {
        self.transient.as_ref()
    }

    /// Patterns in paint order: saved, then search, then the one being typed.
    pub fn paint_order(&self) -> impl Iterator<Item = &Highlight> {
        self.saved
            .iter()
            .chain(self.search.iter())
            .chain(self.transient.iter())
    }
}

#[derive(Debug, Clone)]
struct StatusMessage {
    text: String,
    set_at: Instant,
}

/// The pager's single state instance. Owned by the reactor.
#[derive(Debug)]
pub struct Model {
    anchor_offset: u64,
    after: VecDeque<Line>,
    before: VecDeque<Line>,
    /// Set once a forward fill came back short: `after` reaches the end of the data
    /// known at that time.
    after_at_end: bool,
    pub file_size: u64,
    pub rows: Option<u16>,
    pub cols: Option<u16>,
    pub patterns: PatternSet,
    pub horizontal_offset: usize,
    pub wrap: bool,
    pub debug_overlay: bool,
    status: Option<StatusMessage>,
    long_operations: usize,
    pub cancel: CancelSlot,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    /// Fresh model with unknown dimensions and empty windows.
    pub fn new() -> Self {
        Self {
            anchor_offset: 0,
            after: VecDeque::new(),
            before: VecDeque::new(),
            after_at_end: false,
            file_size: 0,
            rows: None,
            cols: None,
            patterns: PatternSet::default(),
            horizontal_offset: 0,
            wrap: false,
            debug_overlay: false,
            status: None,
            long_operations: 0,
            cancel: CancelSlot::new(),
        }
    }

    pub fn anchor_offset(&self) -> u64 {
        self.anchor_offset
    }

    pub fn after(&self) -> &VecDeque<Line> {
        &self.after
    }

    pub fn before(&self) -> &VecDeque<Line> {
        &self.before
    }

    /// Offset just past the last line in `after`.
    pub fn after_end(&self) -> u64 {
        self.after.back().map_or(self.anchor_offset, Line::end)
    }

    /// Offset of the farthest line in `before`.
    pub fn before_start(&self) -> u64 {
        self.before.back().map_or(self.anchor_offset, |line| line.offset)
    }

    pub fn after_at_end(&self) -> bool {
        self.after_at_end
    }

    /// Reposition the anchor, reusing loaded lines when the target is in a window.
    pub fn move_to_offset(&mut self, target: u64) -> Reposition {
        if target == self.anchor_offset {
            return Reposition::Unchanged;
        }

        if target < self.anchor_offset {
            if self.before.iter().any(|line| line.offset == target) {
                while self.anchor_offset != target {
                    let Some(line) = self.before.pop_front() else {
                        break;
                    };
                    self.anchor_offset = line.offset;
                    self.after.push_front(line);
                }
                return Reposition::Reused;
            }
        } else if self.after.iter().any(|line| line.end() == target) {
            while self.anchor_offset != target {
                let Some(line) = self.after.pop_front() else {
                    break;
                };
                self.anchor_offset = line.end();
                self.before.push_front(line);
            }
            return Reposition::Reused;
        }

        self.before.clear();
        self.after.clear();
        self.after_at_end = false;
        self.anchor_offset = target;
        Reposition::Reset
    }

    /// Scroll towards the end by up to `lines`, never lifting the last loaded line
    /// above the bottom of a `page`-line screen. Returns the number of lines moved.
    pub fn scroll_down(&mut self, lines: usize, page: usize) -> usize {
        let available = self.after.len().saturating_sub(page.max(1));
        let steps = lines.min(available);
        if steps == 0 {
            return 0;
        }
        let target = self.after[steps - 1].end();
        self.move_to_offset(target);
        steps
    }

    /// Scroll towards the start by up to `lines`. Returns the number of lines moved.
    pub fn scroll_up(&mut self, lines: usize) -> usize {
        let steps = lines.min(self.before.len());
        if steps == 0 {
            return 0;
        }
        let target = self.before[steps - 1].offset;
        self.move_to_offset(target);
        steps
    }

    /// Append lines read forward from `from`. Dropped unless `from` is still the end
    /// of the `after` window. `reached_end` records that the read hit end of data.
    pub fn extend_after(&mut self, from: u64, lines: Vec<Line>, reached_end: bool) -> bool {
        if from != self.after_end() {
            return false;
        }
        let mut expected = from;
        for line in lines {
            if line.offset != expected {
                return false;
            }
            expected = line.end();
            self.after.push_back(line);
        }
        self.after_at_end = reached_end;
        true
    }

    /// Append lines read backward from `from`, nearest first. Dropped unless `from`
    /// is still the start of the `before` window.
    pub fn extend_before(&mut self, from: u64, lines: Vec<Line>) -> bool {
        if from != self.before_start() {
            return false;
        }
        let mut expected = from;
        for line in lines {
            if line.end() != expected {
                return false;
            }
            expected = line.offset;
            self.before.push_back(line);
        }
        true
    }

    /// Drop lines farther than `keep_before`/`keep_after` from the anchor.
    pub fn trim_windows(&mut self, keep_before: usize, keep_after: usize) {
        self.before.truncate(keep_before);
        if self.after.len() > keep_after {
            self.after.truncate(keep_after);
            self.after_at_end = false;
        }
    }

    /// Content grew: lines past the old end may now be complete.
    pub fn content_grew(&mut self, size: u64) {
        if size > self.file_size {
            self.file_size = size;
            self.after_at_end = false;
        }
    }

    /// Check both window invariants.
    pub fn check_invariants(&self) -> Result<(), String> {
        if let Some(first) = self.after.front() {
            if first.offset != self.anchor_offset {
                return Err(format!(
                    "after starts at {} but anchor is {}",
                    first.offset, self.anchor_offset
                ));
            }
        }
        let mut expected = self.anchor_offset;
        for line in &self.after {
            if line.offset != expected {
                return Err(format!("gap in after at {}", line.offset));
            }
            expected = line.end();
        }
        let mut expected = self.anchor_offset;
        for line in &self.before {
            if line.end() != expected {
                return Err(format!("gap in before at {}", line.offset));
            }
            expected = line.offset;
        }
        Ok(())
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            set_at: Instant::now(),
        });
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// The status message, if it is younger than `linger`.
    pub fn status(&self, now: Instant, linger: Duration) -> Option<&str> {
        self.status
            .as_ref()
            .filter(|status| now.saturating_duration_since(status.set_at) < linger)
            .map(|status| status.text.as_str())
    }

    /// Forget an expired status message.
    pub fn expire_status(&mut self, now: Instant, linger: Duration) -> bool {
        let expired = self
            .status
            .as_ref()
            .is_some_and(|status| now.saturating_duration_since(status.set_at) >= linger);
        if expired {
            self.status = None;
        }
        expired
    }

    pub fn begin_long_operation(&mut self) {
        self.long_operations += 1;
    }

    pub fn end_long_operation(&mut self) {
        self.long_operations = self.long_operations.saturating_sub(1);
    }

    pub fn long_operation_in_flight(&self) -> bool {
        self.long_operations > 0
    }

    pub fn long_operations(&self) -> usize {
        self.long_operations
    }

    /// Number of content rows on screen (the last row is the status line).
    pub fn page_rows(&self) -> usize {
        self.rows.map_or(0, |rows| rows.saturating_sub(1) as usize)
    }
}
