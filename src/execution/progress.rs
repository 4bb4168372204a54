//! Progress tracking for a pipeline run.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// One step of a run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Look the filter name up in the registry.
    Resolve,
    /// Decode the source file.
    Load,
    /// Run the filter over the raster.
    Apply,
    /// Encode and write the destination file.
    Save,
}

impl Step {
    /// Every step, in the order a run performs them.
    pub const ALL: [Step; 4] = [Step::Resolve, Step::Load, Step::Apply, Step::Save];
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Resolve => write!(f, "resolve"),
            Step::Load => write!(f, "load"),
            Step::Apply => write!(f, "apply"),
            Step::Save => write!(f, "save"),
        }
    }
}

/// A progress update event.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressUpdate {
    /// The run has started.
    Started {
        /// Number of steps the run will perform.
        total_steps: usize,
    },
    /// A step has started.
    StepStarted {
        /// The step.
        step: Step,
        /// Steps completed so far.
        index: usize,
        /// Total steps in the run.
        total: usize,
    },
    /// A step has completed.
    StepCompleted {
        /// The step.
        step: Step,
        /// Time spent in the step.
        duration_ms: u64,
        /// Steps completed, this one included.
        index: usize,
        /// Total steps in the run.
        total: usize,
    },
    /// The run finished successfully.
    Completed {
        /// Time since the run started.
        total_duration_ms: u64,
    },
    /// A step failed and the run was aborted.
    Error {
        /// The step that failed.
        step: Step,
        /// Error message.
        message: String,
    },
}

/// Callback type for progress updates.
pub type ProgressCallback = Box<dyn Fn(ProgressUpdate) + Send + Sync>;

/// Tracks the steps of a single run and forwards events to a callback.
pub struct ProgressTracker {
    total_steps: usize,
    completed_steps: usize,
    start_time: Option<Instant>,
    step_start: Option<Instant>,
    callback: Option<Arc<ProgressCallback>>,
}

impl ProgressTracker {
    /// Create a tracker for `total_steps` steps.
    pub fn new(total_steps: usize) -> Self {
        Self {
            total_steps,
            completed_steps: 0,
            start_time: None,
            step_start: None,
            callback: None,
        }
    }

    /// Set a callback for progress updates.
    pub fn with_callback(mut self, callback: Arc<ProgressCallback>) -> Self {
        self.callback = Some(callback);
        self
    }

    /// Start tracking.
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
        self.send_update(ProgressUpdate::Started {
            total_steps: self.total_steps,
        });
    }

    /// Report that a step has started.
    pub fn step_started(&mut self, step: Step) {
        self.step_start = Some(Instant::now());
        self.send_update(ProgressUpdate::StepStarted {
            step,
            index: self.completed_steps,
            total: self.total_steps,
        });
    }

    /// Report that a step has completed.
    pub fn step_completed(&mut self, step: Step) {
        let duration_ms = self
            .step_start
            .take()
            .map(|t| t.elapsed().as_millis() as u64)
            .unwrap_or(0);
        self.completed_steps += 1;

        self.send_update(ProgressUpdate::StepCompleted {
            step,
            duration_ms,
            index: self.completed_steps,
            total: self.total_steps,
        });
    }

    /// Report an error.
    pub fn report_error(&self, step: Step, message: String) {
        self.send_update(ProgressUpdate::Error { step, message });
    }

    /// Complete tracking.
    pub fn complete(&self) {
        self.send_update(ProgressUpdate::Completed {
            total_duration_ms: self.elapsed_ms(),
        });
    }

    /// Milliseconds since [`start`](Self::start).
    pub fn elapsed_ms(&self) -> u64 {
        self.start_time
            .map(|t| t.elapsed().as_millis() as u64)
            .unwrap_or(0)
    }

    /// Get current progress percentage.
    pub fn progress_percent(&self) -> f32 {
        if self.total_steps == 0 {
            return 100.0;
        }
        (self.completed_steps as f32 / self.total_steps as f32) * 100.0
    }

    fn send_update(&self, update: ProgressUpdate) {
        if let Some(ref callback) = self.callback {
            callback(update);
        }
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new(Step::ALL.len())
    }
}
