//! Step showing a previously referenced file again.

use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{format_csv_row, read_lines, write_record, FileKind, StepContext, StepKind};
use crate::error::{FlowError, Result};
use crate::input::require_token;

/// Re-reads `file_name` at execution time and prints it as text or CSV.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayStep {
    pub step_index: usize,
    pub content: String,
    pub file_name: String,
}

impl DisplayStep {
    pub fn new(
        step_index: usize,
        content: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            step_index,
            content: content.into(),
            file_name: file_name.into(),
        }
    }
}

impl StepKind for DisplayStep {
    fn step_type(&self) -> &'static str {
        "Display Step"
    }

    fn description(&self) -> String {
        format!("{} - {}", self.content, self.file_name)
    }

    fn write_details(&self, sink: &mut dyn Write) -> io::Result<()> {
        write_record(
            sink,
            "DISPLAY Step",
            &[
                ("Step", self.step_index.to_string()),
                ("File name", self.file_name.clone()),
                ("Content", self.content.clone()),
            ],
        )
    }

    fn execute(&mut self, ctx: &mut StepContext<'_>) -> Result<()> {
        writeln!(ctx.out, "Display step {}", self.step_index)?;
        let choice = require_token(
            ctx.input,
            "Select the file type to display (1 - TEXT FILE, 2 - CSV FILE): ",
        )?;
        let kind = match choice.as_str() {
            "1" => FileKind::Text,
            "2" => FileKind::Csv,
            _ => return Err(FlowError::InvalidSelection { choice }),
        };

        let lines = read_lines(Path::new(&self.file_name))?;
        for line in &lines {
            match kind {
                FileKind::Text => writeln!(ctx.out, "{line}")?,
                FileKind::Csv => writeln!(ctx.out, "{}", format_csv_row(line))?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::input::ScriptedInput;

    #[test]
    fn test_rereads_file_on_each_execution() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("report.txt");
        std::fs::write(&path, "v1\n").unwrap();

        let mut step = DisplayStep::new(2, "Report", path.to_str().unwrap());
        let mut input = ScriptedInput::new(["1", "1"]);

        let mut first = Vec::new();
        step.execute(&mut StepContext::new(&mut input, &mut first)).unwrap();
        std::fs::write(&path, "v2\n").unwrap();
        let mut second = Vec::new();
        step.execute(&mut StepContext::new(&mut input, &mut second)).unwrap();

        assert!(String::from_utf8(first).unwrap().contains("v1"));
        assert!(String::from_utf8(second).unwrap().contains("v2"));
    }

    #[test]
    fn test_invalid_file_type_choice() {
        let mut step = DisplayStep::new(1, "Report", "report.txt");
        let mut input = ScriptedInput::new(["3"]);
        let mut out = Vec::new();

        let err = step
            .execute(&mut StepContext::new(&mut input, &mut out))
            .unwrap_err();

        assert!(matches!(err, FlowError::InvalidSelection { .. }));
    }
}
