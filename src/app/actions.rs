use crate::app::fill::FillReport;
use crate::app::follow::ContentGrew;
use crate::input::InputEvent;
use crate::render::WriteCompleted;
use crate::search::OperationReport;

/// Everything the reactor can be asked to do.
#[derive(Debug)]
pub enum PagerAction {
    Input(InputEvent),
    ContentGrew { size: u64 },
    LinesLoaded(FillReport),
    OperationFinished(OperationReport),
    WriteCompleted,
    /// Re-render so time-dependent state (the status message) is redrawn.
    Tick,
}

impl From<InputEvent> for PagerAction {
    fn from(event: InputEvent) -> Self {
        PagerAction::Input(event)
    }
}

impl From<ContentGrew> for PagerAction {
    fn from(grew: ContentGrew) -> Self {
        PagerAction::ContentGrew { size: grew.size }
    }
}

impl From<FillReport> for PagerAction {
    fn from(report: FillReport) -> Self {
        PagerAction::LinesLoaded(report)
    }
}

impl From<OperationReport> for PagerAction {
    fn from(report: OperationReport) -> Self {
        PagerAction::OperationFinished(report)
    }
}

impl From<WriteCompleted> for PagerAction {
    fn from(_: WriteCompleted) -> Self {
        PagerAction::WriteCompleted
    }
}
