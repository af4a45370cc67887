//! Progress reporting.
//!
//! Scanners report `(percent, task, status)` triples to a [`ProgressSink`].
//! Percent values never decrease within a task and every task ends with a
//! report at 100.

/// Receiver of progress updates.
pub trait ProgressSink {
    /// Record that `task` is `percent` complete.
    fn report(&self, percent: u8, task: &str, status: &str);
}

/// A sink that discards every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _percent: u8, _task: &str, _status: &str) {}
}

impl<F> ProgressSink for F
where
    F: Fn(u8, &str, &str),
{
    fn report(&self, percent: u8, task: &str, status: &str) {
        self(percent, task, status)
    }
}

/// Status text of the final report of a task.
pub const COMPLETED: &str = "Completed";

/// Step counter for one task.
pub struct TaskProgress<'a> {
    sink: &'a dyn ProgressSink,
    task: String,
    total: usize,
    done: usize,
}

impl<'a> TaskProgress<'a> {
    /// Start tracking `total` steps of `task`.
    pub fn new(sink: &'a dyn ProgressSink, task: impl Into<String>, total: usize) -> Self {
        Self {
            sink,
            task: task.into(),
            total,
            done: 0,
        }
    }

    /// Mark one more step done and report it.
    pub fn step(&mut self) {
        self.done = (self.done + 1).min(self.total);
        let status = format!("{}/{}", self.done, self.total);
        self.sink.report(self.percent(), &self.task, &status);
    }

    /// Report the task as complete.
    pub fn finish(self) {
        self.sink.report(100, &self.task, COMPLETED);
    }

    /// Rounded percentage of steps done.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((self.done * 100 + self.total / 2) / self.total) as u8
    }
}
