//! Terminal marker step.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use super::{write_record, StepContext, StepKind};
use crate::error::Result;

/// Marks the end of a flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndStep;

impl StepKind for EndStep {
    fn step_type(&self) -> &'static str {
        "End Step"
    }

    fn description(&self) -> String {
        "End of flow".to_string()
    }

    fn write_details(&self, sink: &mut dyn Write) -> io::Result<()> {
        write_record(sink, "END Step", &[])
    }

    fn execute(&mut self, ctx: &mut StepContext<'_>) -> Result<()> {
        writeln!(ctx.out, "End of flow. The flow completed successfully.")?;
        Ok(())
    }
}
