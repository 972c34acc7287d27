//! Display implementations for domain models.
//!
//! Kept apart from the model definitions so the models stay free of
//! presentation. Output is markdown.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::flow::{Flow, FlowAnalysis};
use crate::steps::{Step, StepKind};

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "**{}**: {}", self.step_type(), self.description())
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}. {}", self.id(), self.name())?;
        writeln!(f)?;

        let status = if self.is_completed() {
            "completed"
        } else {
            "in progress"
        };
        writeln!(f, "- Status: {status}")?;
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at()))?;
        writeln!(
            f,
            "- Runs: {} started, {} completed",
            self.start_count(),
            self.completion_count()
        )?;

        if self.steps().is_empty() {
            writeln!(f, "\nNo steps in this flow.")?;
            return Ok(());
        }

        writeln!(f, "\n## Steps")?;
        writeln!(f)?;
        for (position, step) in self.steps().iter().enumerate() {
            writeln!(f, "{}. {step}", position + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for FlowAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Analysis: {}", self.name)?;
        writeln!(f)?;
        writeln!(f, "- Started: {}", self.start_count)?;
        writeln!(f, "- Completed: {}", self.completion_count)?;
        match self.mean_errors {
            Some(mean) => writeln!(f, "- Mean errors per completion: {mean}")?,
            None => writeln!(f, "- Flow never completed.")?,
        }
        writeln!(f, "- Skipped screens: {}", self.skipped_screens)?;
        writeln!(f, "- Error screens: {}", self.error_screens)
    }
}
