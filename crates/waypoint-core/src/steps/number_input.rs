//! Numeric input step.

use std::io::{self, Write};

use log::debug;
use serde::{Deserialize, Serialize};

use super::{write_record, Operand, StepContext, StepKind};
use crate::error::Result;
use crate::input::read_number;

/// Captures a number, re-prompting until the answer parses.
///
/// Starts unexecuted; the first successful execution makes
/// [`NumberInputStep::is_executed`] true for good. Downstream steps check
/// that flag before reading [`NumberInputStep::number`], which is zero until
/// then.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumberInputStep {
    pub description: String,
    value: f64,
    executed: bool,
}

impl NumberInputStep {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            value: 0.0,
            executed: false,
        }
    }

    /// Captured value, or zero before execution.
    pub fn number(&self) -> f64 {
        self.value
    }

    /// Whether a value has been captured.
    pub fn is_executed(&self) -> bool {
        self.executed
    }

    /// Snapshot used to resolve a back-reference at `index`.
    pub fn operand(&self, index: usize) -> Operand {
        Operand {
            index,
            executed: self.executed,
            value: self.value,
        }
    }
}

impl StepKind for NumberInputStep {
    fn step_type(&self) -> &'static str {
        "Number Input Step"
    }

    fn description(&self) -> String {
        format!("{} - {}", self.description, self.value)
    }

    fn write_details(&self, sink: &mut dyn Write) -> io::Result<()> {
        write_record(
            sink,
            "NUMBER INPUT Step",
            &[
                ("Description", self.description.clone()),
                ("Number Input", self.value.to_string()),
            ],
        )
    }

    fn execute(&mut self, ctx: &mut StepContext<'_>) -> Result<()> {
        writeln!(ctx.out, "Description: {}", self.description)?;
        self.value = read_number(ctx.input, ctx.out, "Enter a number: ")?;
        self.executed = true;
        debug!("Number input {:?} captured {}", self.description, self.value);
        Ok(())
    }
}
