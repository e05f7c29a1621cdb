//! UI/Progress presentation layer
//!
//! This module handles:
//! - Progress reporting for batch operations over project files
//! - Interactive progress bars using indicatif
//! - Silent progress for quiet runs and tests
//!
//! All progress reporting goes through the ProgressReporter trait, allowing
//! different implementations based on command-line flags (e.g. --verbose,
//! where log lines would be garbled by a redrawn bar).

use indicatif::{ProgressBar, ProgressStyle};

/// Progress reporter trait for batch operations
pub trait ProgressReporter {
    /// Show the project currently being processed
    fn update_project(&mut self, project: &str, current: usize, total: usize);

    /// Increment project progress
    fn inc_project(&mut self);

    /// Finish progress
    fn finish(&mut self);

    /// Abandon on error
    fn abandon(&mut self);
}

/// Interactive progress reporter with a visual progress bar
pub struct InteractiveProgressReporter {
    project_pb: ProgressBar,
}

impl InteractiveProgressReporter {
    /// Create a new interactive progress reporter with total project count
    pub fn new(total_projects: u64) -> Self {
        let project_pb = ProgressBar::new(total_projects);
        if let Ok(style) =
            ProgressStyle::default_bar().template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            project_pb.set_style(style.progress_chars("#>-"));
        }

        Self { project_pb }
    }
}

impl ProgressReporter for InteractiveProgressReporter {
    fn update_project(&mut self, project: &str, current: usize, total: usize) {
        // Truncate long paths for display
        let display_path = match project.char_indices().rev().nth(46) {
            Some((start, _)) if project.chars().count() > 50 => {
                format!("...{}", &project[start..])
            }
            _ => project.to_string(),
        };
        self.project_pb
            .set_message(format!("({}/{}) {}", current, total, display_path));
    }

    fn inc_project(&mut self) {
        self.project_pb.inc(1);
    }

    fn finish(&mut self) {
        self.project_pb.finish_and_clear();
    }

    fn abandon(&mut self) {
        self.project_pb.abandon();
    }
}

/// Silent progress reporter
///
/// No-op implementation used in verbose mode and by library callers.
#[derive(Default)]
pub struct SilentProgressReporter;

impl ProgressReporter for SilentProgressReporter {
    fn update_project(&mut self, _project: &str, _current: usize, _total: usize) {
        // No-op for silent mode
    }

    fn inc_project(&mut self) {
        // No-op for silent mode
    }

    fn finish(&mut self) {
        // No-op for silent mode
    }

    fn abandon(&mut self) {
        // No-op for silent mode
    }
}
