// src/progress.rs
use crate::error::Stage;

/// Stage-level progress reporting for a pipeline run.
/// Frontends implement this to surface status; the library itself only logs.
pub trait Progress {
    /// Called once with the number of stages about to run.
    fn begin(&mut self, _total: usize) {}

    /// A stage is starting.
    fn stage(&mut self, _stage: Stage) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// A stage finished, having produced `items` rows/markers/files.
    fn stage_done(&mut self, _stage: Stage, _items: usize) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
