//! Free text input step.

use std::io::{self, Write};

use log::debug;
use serde::{Deserialize, Serialize};

use super::{write_record, StepContext, StepKind};
use crate::error::{FlowError, Result};
use crate::input::require_line;

/// Captures a description and a required, non-empty text value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextInputStep {
    pub description: String,
    pub value: String,
}

impl TextInputStep {
    pub fn new(description: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            value: value.into(),
        }
    }
}

impl StepKind for TextInputStep {
    fn step_type(&self) -> &'static str {
        "Text Input Step"
    }

    fn description(&self) -> String {
        format!("{} - {}", self.description, self.value)
    }

    fn write_details(&self, sink: &mut dyn Write) -> io::Result<()> {
        write_record(
            sink,
            "TEXT INPUT Step",
            &[
                ("Description", self.description.clone()),
                ("Text Input", self.value.clone()),
            ],
        )
    }

    /// An empty or blank value is rejected and the previous value is kept.
    fn execute(&mut self, ctx: &mut StepContext<'_>) -> Result<()> {
        self.description = require_line(ctx.input, "DESCRIPTION: ")?;
        let value = require_line(ctx.input, "TEXT INPUT: ")?;

        if value.trim().is_empty() {
            debug!("Rejected empty text input for {:?}", self.description);
            return Err(FlowError::EmptyInput {
                field: "Text input".to_string(),
            });
        }

        self.value = value;
        Ok(())
    }
}
