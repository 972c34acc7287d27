//! Title screen step.

use std::io::{self, Write};

use log::debug;
use serde::{Deserialize, Serialize};

use super::{write_record, StepContext, StepKind};
use crate::error::Result;
use crate::input::require_line;

/// Captures a title and a subtitle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TitleStep {
    pub title: String,
    pub subtitle: String,
}

impl TitleStep {
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
        }
    }
}

impl StepKind for TitleStep {
    fn step_type(&self) -> &'static str {
        "Title Step"
    }

    fn description(&self) -> String {
        format!("{} - {}", self.title, self.subtitle)
    }

    fn write_details(&self, sink: &mut dyn Write) -> io::Result<()> {
        write_record(
            sink,
            "TITLE Step",
            &[
                ("Title", self.title.clone()),
                ("Subtitle", self.subtitle.clone()),
            ],
        )
    }

    fn execute(&mut self, ctx: &mut StepContext<'_>) -> Result<()> {
        self.title = require_line(ctx.input, "TITLE: ")?;
        self.subtitle = require_line(ctx.input, "SUBTITLE: ")?;
        debug!("Captured title {:?}", self.title);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ScriptedInput;

    #[test]
    fn test_execute_captures_both_lines() {
        let mut input = ScriptedInput::new(["Welcome", "Getting started"]);
        let mut out = Vec::new();
        let mut step = TitleStep::default();

        step.execute(&mut StepContext::new(&mut input, &mut out)).unwrap();

        assert_eq!(step, TitleStep::new("Welcome", "Getting started"));
        assert_eq!(step.description(), "Welcome - Getting started");
        assert_eq!(input.prompts(), ["TITLE: ", "SUBTITLE: "]);
    }
}
