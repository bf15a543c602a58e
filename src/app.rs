//! The pager: reactor dispatcher tying the model, workers and renderer together.
//!
//! All state lives in [`Pager`] and is only touched from [`Dispatcher::dispatch`]
//! and [`Dispatcher::after_action`]. Anything that reads the content runs on a
//! worker and comes back as a [`PagerAction`].

pub mod actions;
pub mod fill;
pub mod follow;
pub mod terminal;

pub use actions::PagerAction;

use crate::config::Config;
use crate::content::Content;
use crate::error::Result;
use crate::input::bindings::HORIZONTAL_STEP;
use crate::input::{
    self, Command, InputEvent, Key, Prompt, PromptEvent, PromptKind, ScrollDirection, Submission,
};
use crate::logger::{Level, SharedLog};
use crate::model::{Highlight, Model};
use crate::reactor::{Dispatcher, Reactor, ReactorHandle};
use crate::render::{self, Frame, ScreenWriter, Sink, Style};
use crate::search::{
    spawn_long_operation, Direction, LongOperation, OperationOutcome, OperationReport, Pattern,
    ScanChunks,
};
use fill::FillReport;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Poll interval of the input thread.
const INPUT_POLL: Duration = Duration::from_millis(50);
/// Windows are trimmed beyond this many screens on either side of the anchor.
const WINDOW_CAP_SCREENS: usize = 4;
const MIN_WINDOW_CAP: usize = 64;

/// Top-up workers in flight, one per direction at most.
#[derive(Debug, Default)]
struct Fills {
    after: bool,
    before: bool,
}

pub struct Pager {
    model: Model,
    content: Arc<dyn Content>,
    config: Config,
    writer: ScreenWriter,
    prompt: Option<Prompt>,
    search_direction: Direction,
    fills: Fills,
    force_repaint: bool,
    log: SharedLog,
}

impl Pager {
    pub fn new(
        content: Arc<dyn Content>,
        config: Config,
        sink: Sink,
        log: SharedLog,
    ) -> Result<Self> {
        let mut model = Model::new();
        model.file_size = content.size()?;
        model.wrap = config.wrap;
        let writer = ScreenWriter::new(sink, config.settle_delay());
        Ok(Self {
            model,
            content,
            config,
            writer,
            prompt: None,
            search_direction: Direction::Forward,
            fills: Fills::default(),
            force_repaint: false,
            log,
        })
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    pub fn writer(&self) -> &ScreenWriter {
        &self.writer
    }

    /// Cancel whatever long operation is still running so its worker returns
    /// before the runtime shuts down.
    pub fn shutdown(&mut self) {
        if self.model.long_operation_in_flight() {
            self.log
                .record(Level::Debug, "app", "cancelling pending long operation");
        }
        self.model.cancel.cancel();
    }

    fn chunks(&self) -> ScanChunks {
        ScanChunks {
            forward: self.config.forward_buffer_size,
            backward: self.config.backward_chunk_size,
        }
    }

    fn set_status(&mut self, text: impl Into<String>, reactor: &ReactorHandle<PagerAction>) {
        self.model.set_status(text);
        let linger = self.config.status_linger();
        let reactor = reactor.clone();
        tokio::spawn(async move {
            tokio::time::sleep(linger).await;
            reactor.enqueue(PagerAction::Tick, "status.linger");
        });
    }

    fn handle_input(&mut self, event: InputEvent, reactor: &ReactorHandle<PagerAction>) {
        match event {
            InputEvent::Key(key) => match self.prompt.as_mut() {
                Some(prompt) => {
                    let event = prompt.handle_key(key);
                    self.handle_prompt_event(event, reactor);
                }
                None => self.handle_key(key, reactor),
            },
            InputEvent::Resize { cols, rows } => {
                self.model.cols = Some(cols);
                self.model.rows = Some(rows);
                self.force_repaint = true;
            }
            InputEvent::Scroll { direction, lines } => match direction {
                ScrollDirection::Down => {
                    let page = self.model.page_rows();
                    self.model.scroll_down(lines, page);
                }
                ScrollDirection::Up => {
                    self.model.scroll_up(lines);
                }
            },
        }
    }

    fn handle_key(&mut self, key: Key, reactor: &ReactorHandle<PagerAction>) {
        let Some(command) = input::lookup(key) else {
            return;
        };
        let page = self.model.page_rows();
        let half = (page / 2).max(1);
        match command {
            Command::Quit => {
                self.shutdown();
                reactor.stop(None);
            }
            Command::LineDown => {
                self.model.scroll_down(1, page);
            }
            Command::LineUp => {
                self.model.scroll_up(1);
            }
            Command::HalfPageDown => {
                self.model.scroll_down(half, page);
            }
            Command::HalfPageUp => {
                self.model.scroll_up(half);
            }
            Command::ScrollLeft => {
                self.model.horizontal_offset =
                    self.model.horizontal_offset.saturating_sub(HORIZONTAL_STEP);
            }
            Command::ScrollRight => {
                if !self.model.wrap {
                    self.model.horizontal_offset += HORIZONTAL_STEP;
                }
            }
            Command::Repaint => self.force_repaint = true,
            Command::Top => {
                self.model.cancel.cancel();
                self.model.move_to_offset(0);
            }
            Command::Bottom => {
                self.start_long_operation(LongOperation::Bottom { page: page.max(1) }, reactor);
            }
            Command::OpenPrompt(kind) => {
                self.log
                    .record(Level::Debug, "prompt", &format!("open {}", kind.describe()));
                self.prompt = Some(Prompt::new(kind));
            }
            Command::NextMatch => self.repeat_search(self.search_direction, reactor),
            Command::PreviousMatch => {
                self.repeat_search(self.search_direction.reversed(), reactor)
            }
            Command::ToggleWrap => {
                self.model.wrap = !self.model.wrap;
                self.model.horizontal_offset = 0;
            }
            Command::NextPattern | Command::PreviousPattern => {
                let forward = command == Command::NextPattern;
                let message = match self.model.patterns.cycle(forward) {
                    Some(highlight) => format!("Selected: {}", highlight.pattern.source()),
                    None => "No saved patterns".to_string(),
                };
                self.set_status(message, reactor);
            }
            Command::DeletePattern => {
                let message = match self.model.patterns.delete_selected() {
                    Some(removed) => format!("Removed: {}", removed.pattern.source()),
                    None => "No saved patterns".to_string(),
                };
                self.set_status(message, reactor);
            }
            Command::ToggleDebug => self.model.debug_overlay = !self.model.debug_overlay,
        }
    }

    fn handle_prompt_event(&mut self, event: PromptEvent, reactor: &ReactorHandle<PagerAction>) {
        let Some(kind) = self.prompt.as_ref().map(Prompt::kind) else {
            return;
        };
        match event {
            PromptEvent::Edited => {
                if matches!(kind, PromptKind::Search { .. }) {
                    let typed = self.prompt.as_ref().map_or("", Prompt::input);
                    let transient = (!typed.is_empty())
                        .then(|| Pattern::compile(typed).ok())
                        .flatten()
                        .map(|pattern| Highlight {
                            style: Style::INVERTED,
                            pattern,
                        });
                    self.model.patterns.set_transient(transient);
                }
            }
            PromptEvent::Cancelled => {
                self.prompt = None;
                self.model.patterns.set_transient(None);
            }
            PromptEvent::Committed(text) => {
                self.prompt = None;
                self.model.patterns.set_transient(None);
                match kind.on_enter(&text) {
                    Ok(submission) => self.submit(submission, reactor),
                    Err(message) => self.set_status(message, reactor),
                }
            }
        }
    }

    fn submit(&mut self, submission: Submission, reactor: &ReactorHandle<PagerAction>) {
        match submission {
            Submission::Search { pattern, reverse } => match Pattern::compile(&pattern) {
                Ok(pattern) => {
                    self.model.patterns.set_search(pattern);
                    self.search_direction = if reverse {
                        Direction::Backward
                    } else {
                        Direction::Forward
                    };
                    self.repeat_search(self.search_direction, reactor);
                }
                Err(e) => self.set_status(e.to_string(), reactor),
            },
            Submission::Colour { colour, pattern } => match Pattern::compile(&pattern) {
                Ok(compiled) => {
                    let style = self.model.patterns.add(compiled, colour);
                    self.log.record(
                        Level::Debug,
                        "colour",
                        &format!("{} -> style {:#04x}", pattern, style.0),
                    );
                }
                Err(e) => self.set_status(e.to_string(), reactor),
            },
            Submission::Seek { percent } => {
                self.start_long_operation(LongOperation::Seek { percent }, reactor)
            }
            Submission::Bisect { prefix } => {
                self.start_long_operation(LongOperation::Bisect { prefix }, reactor)
            }
            Submission::Empty => {}
        }
    }

    /// Search from the current position with the committed search pattern.
    fn repeat_search(&mut self, direction: Direction, reactor: &ReactorHandle<PagerAction>) {
        let Some(pattern) = self.model.patterns.search().map(|h| h.pattern.clone()) else {
            self.set_status("No previous search", reactor);
            return;
        };
        let anchor = self.model.anchor_offset();
        // Until the top line is loaded its end is unknown; the worker skips it.
        let (start, skip_current) = match direction {
            Direction::Forward => match self.model.after().front() {
                Some(line) => (line.end(), false),
                None => (anchor, true),
            },
            Direction::Backward => (anchor, false),
        };
        self.start_long_operation(
            LongOperation::Search {
                pattern,
                start,
                direction,
                skip_current,
            },
            reactor,
        );
    }

    fn start_long_operation(
        &mut self,
        operation: LongOperation,
        reactor: &ReactorHandle<PagerAction>,
    ) {
        self.model.begin_long_operation();
        let token = self.model.cancel.reissue();
        self.model.clear_status();
        self.log.record(
            Level::Debug,
            operation.name(),
            &format!("start with token {}", token.id()),
        );
        spawn_long_operation(
            Arc::clone(&self.content),
            operation,
            token,
            self.chunks(),
            reactor.clone(),
        );
    }

    fn finish_long_operation(
        &mut self,
        report: OperationReport,
        reactor: &ReactorHandle<PagerAction>,
    ) {
        self.model.end_long_operation();
        if !self.model.cancel.is_current(&report.token) {
            self.log.record(
                Level::Debug,
                report.operation,
                &format!("dropping stale result of token {}", report.token.id()),
            );
            return;
        }
        self.model.cancel.release(&report.token);
        match report.outcome {
            OperationOutcome::MoveTo(offset) => {
                self.model.move_to_offset(offset);
            }
            OperationOutcome::NotFound(message) => self.set_status(message, reactor),
            OperationOutcome::Cancelled | OperationOutcome::Failed => {}
        }
    }

    fn apply_fill(&mut self, report: FillReport) {
        let applied = match report.direction {
            Direction::Forward => {
                self.fills.after = false;
                self.model
                    .extend_after(report.from, report.lines, report.reached_end)
            }
            Direction::Backward => {
                self.fills.before = false;
                self.model.extend_before(report.from, report.lines)
            }
        };
        if !applied {
            self.log.record(
                Level::Trace,
                "fill",
                &format!("dropping stale {:?} fill from {}", report.direction, report.from),
            );
        }
    }

    /// Request lines for whichever window is short, then bound both windows.
    fn top_up(&mut self, reactor: &ReactorHandle<PagerAction>) {
        let page = self.model.page_rows().max(1);
        let cap = (page * WINDOW_CAP_SCREENS).max(MIN_WINDOW_CAP);
        self.model.trim_windows(cap, cap);

        let after_target = page * 2;
        let after_len = self.model.after().len();
        if !self.fills.after && after_len < after_target && !self.model.after_at_end() {
            self.fills.after = true;
            fill::spawn_fill(
                Arc::clone(&self.content),
                Direction::Forward,
                self.model.after_end(),
                after_target - after_len,
                self.chunks(),
                reactor.clone(),
            );
        }

        let before_len = self.model.before().len();
        let before_start = self.model.before_start();
        if !self.fills.before && before_len < page && before_start > 0 {
            self.fills.before = true;
            fill::spawn_fill(
                Arc::clone(&self.content),
                Direction::Backward,
                before_start,
                page - before_len,
                self.chunks(),
                reactor.clone(),
            );
        }
    }

    fn render(&mut self, reactor: &ReactorHandle<PagerAction>) {
        let prompt = self.prompt.as_ref().map(|p| (p.kind().prompt(), p.input()));
        let frame = Frame {
            name: self.content.name(),
            prompt,
            now: Instant::now(),
            linger: self.config.status_linger(),
            tab_width: self.config.tab_width,
            cycle: reactor.cycle(),
        };
        let Some(screen) = render::compose(&self.model, &frame) else {
            return;
        };
        let force = std::mem::take(&mut self.force_repaint);
        self.writer.write(screen, force, reactor);
    }
}

impl Dispatcher for Pager {
    type Action = PagerAction;

    fn dispatch(&mut self, action: PagerAction, reactor: &ReactorHandle<PagerAction>) {
        match action {
            PagerAction::Input(event) => self.handle_input(event, reactor),
            PagerAction::ContentGrew { size } => self.model.content_grew(size),
            PagerAction::LinesLoaded(report) => self.apply_fill(report),
            PagerAction::OperationFinished(report) => self.finish_long_operation(report, reactor),
            PagerAction::WriteCompleted => self.writer.complete(reactor),
            PagerAction::Tick => {
                self.model
                    .expire_status(Instant::now(), self.config.status_linger());
            }
        }
    }

    fn after_action(&mut self, reactor: &ReactorHandle<PagerAction>) {
        if reactor.is_stopping() {
            return;
        }
        if self.model.rows.is_some() {
            self.top_up(reactor);
        }
        self.render(reactor);
    }
}

/// Streams still being read are polled even without `follow`, until they finish.
fn watches_growth(content: &dyn Content, config: &Config) -> bool {
    config.follow || content.is_arriving()
}

/// Run the pager on the current terminal until the user quits or a fatal error
/// stops the reactor.
pub async fn run(content: Arc<dyn Content>, config: Config, log: SharedLog) -> Result<()> {
    let guard = terminal::TerminalGuard::enter()?;
    let (cols, rows) = guard.size()?;

    let mut reactor = Reactor::with_log(Arc::clone(&log));
    let handle = reactor.handle();
    let mut pager = Pager::new(
        Arc::clone(&content),
        config.clone(),
        render::sink(std::io::stdout()),
        Arc::clone(&log),
    )?;

    handle.enqueue(
        PagerAction::Input(InputEvent::Resize { cols, rows }),
        "startup",
    );
    input::spawn_input_thread(handle.clone(), INPUT_POLL)?;
    if watches_growth(content.as_ref(), &config) {
        let size = pager.model().file_size;
        follow::spawn_growth_poller(
            Arc::clone(&content),
            size,
            config.follow,
            handle.clone(),
        )?;
    }

    let result = reactor.run(&mut pager).await;
    pager.shutdown();
    handle.stop(None);
    drop(guard);
    log.record(Level::Info, "app", "pager exited");
    result
}
