//! Progress reporting for pipeline runs
//!
//! Provides a simple API for reporting what the pipeline is doing:
//! - Current phase (one per pipeline stage)
//! - Progress (current/total with a label)
//! - Activity log

use tracing::{debug, info};

/// Pipeline phases, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Normalizing,
    Resolving,
    Simplifying,
    Deduplicating,
    Projecting,
    Writing,
    Complete,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Loading => write!(f, "Loading source"),
            Phase::Normalizing => write!(f, "Normalizing columns"),
            Phase::Resolving => write!(f, "Resolving codes"),
            Phase::Simplifying => write!(f, "Simplifying cuisines"),
            Phase::Deduplicating => write!(f, "Removing duplicates"),
            Phase::Projecting => write!(f, "Projecting columns"),
            Phase::Writing => write!(f, "Writing output"),
            Phase::Complete => write!(f, "Complete"),
        }
    }
}

/// Progress information for the current operation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Progress {
    pub current: u64,
    pub total: u64,
    pub label: String,
}

impl Progress {
    pub fn new(current: u64, total: u64, label: impl Into<String>) -> Self {
        Self {
            current,
            total,
            label: label.into(),
        }
    }

    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.current as f64 / self.total as f64
        }
    }
}

/// Trait for progress reporters - allows both logging and silent/test modes
pub trait Ui {
    fn set_phase(&mut self, phase: Phase);
    fn set_info(&mut self, info: impl Into<String>);
    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>);
    fn clear_progress(&mut self);
    fn log(&mut self, message: impl Into<String>);
}

/// Reports through `tracing`
#[derive(Debug, Default)]
pub struct LogUi {
    phase: Option<Phase>,
    progress: Option<Progress>,
}

impl LogUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Option<Phase> {
        self.phase
    }
}

impl Ui for LogUi {
    fn set_phase(&mut self, phase: Phase) {
        self.phase = Some(phase);
        info!("{}", phase);
    }

    fn set_info(&mut self, info: impl Into<String>) {
        info!("{}", info.into());
    }

    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>) {
        let progress = Progress::new(current, total, label);
        debug!(
            current,
            total,
            percent = (progress.ratio() * 100.0).round() as u64,
            "{}",
            progress.label
        );
        self.progress = Some(progress);
    }

    fn clear_progress(&mut self) {
        self.progress = None;
    }

    fn log(&mut self, message: impl Into<String>) {
        info!("{}", message.into());
    }
}

/// Silent UI implementation for testing and non-interactive use
#[derive(Default)]
pub struct SilentUi;

impl SilentUi {
    pub fn new() -> Self {
        Self
    }
}

impl Ui for SilentUi {
    fn set_phase(&mut self, _phase: Phase) {}
    fn set_info(&mut self, _info: impl Into<String>) {}
    fn set_progress(&mut self, _current: u64, _total: u64, _label: impl Into<String>) {}
    fn clear_progress(&mut self) {}
    fn log(&mut self, _message: impl Into<String>) {}
}

/// Records every call, for asserting on stage order
#[derive(Debug, Default)]
pub struct RecordingUi {
    pub phases: Vec<Phase>,
    pub messages: Vec<String>,
}

impl Ui for RecordingUi {
    fn set_phase(&mut self, phase: Phase) {
        self.phases.push(phase);
    }
    fn set_info(&mut self, info: impl Into<String>) {
        self.messages.push(info.into());
    }
    fn set_progress(&mut self, _current: u64, _total: u64, _label: impl Into<String>) {}
    fn clear_progress(&mut self) {}
    fn log(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_ratio() {
        assert_eq!(Progress::new(5, 10, "rows").ratio(), 0.5);
        assert_eq!(Progress::new(5, 0, "rows").ratio(), 0.0);
    }

    #[test]
    fn test_log_ui_tracks_phase() {
        let mut ui = LogUi::new();
        ui.set_phase(Phase::Resolving);
        assert_eq!(ui.phase(), Some(Phase::Resolving));
    }
}
