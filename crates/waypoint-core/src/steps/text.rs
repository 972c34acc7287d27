//! Text screen step.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use super::{write_record, StepContext, StepKind};
use crate::error::Result;
use crate::input::require_line;

/// Captures a title and a body of copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextStep {
    pub title: String,
    pub body: String,
}

impl TextStep {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

impl StepKind for TextStep {
    fn step_type(&self) -> &'static str {
        "Text Step"
    }

    fn description(&self) -> String {
        format!("{} - {}", self.title, self.body)
    }

    fn write_details(&self, sink: &mut dyn Write) -> io::Result<()> {
        write_record(
            sink,
            "TEXT Step",
            &[("Title", self.title.clone()), ("Text", self.body.clone())],
        )
    }

    fn execute(&mut self, ctx: &mut StepContext<'_>) -> Result<()> {
        self.title = require_line(ctx.input, "TITLE: ")?;
        self.body = require_line(ctx.input, "COPY: ")?;
        Ok(())
    }
}
