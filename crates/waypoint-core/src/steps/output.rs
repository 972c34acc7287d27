//! Step writing a small text artifact.

use std::io::{self, Write};
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use super::{write_record, StepContext, StepKind};
use crate::error::{Result, ResultExt};
use crate::input::require_line;

/// Writes its title, description and step number to `file_name`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputStep {
    pub step_index: usize,
    pub file_name: String,
    pub title: String,
    pub description: String,
}

impl OutputStep {
    pub fn new(
        step_index: usize,
        file_name: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            step_index,
            file_name: file_name.into(),
            title: title.into(),
            description: description.into(),
        }
    }

    /// Content of the artifact.
    pub fn artifact(&self) -> String {
        format!(
            "Title: {}\nDescription: {}\nStep Number: {}\n",
            self.title, self.description, self.step_index
        )
    }
}

impl StepKind for OutputStep {
    fn step_type(&self) -> &'static str {
        "Output Step"
    }

    fn description(&self) -> String {
        format!(
            "{} - {} - {} - {}",
            self.step_index, self.file_name, self.title, self.description
        )
    }

    fn write_details(&self, sink: &mut dyn Write) -> io::Result<()> {
        write_record(
            sink,
            "OUTPUT Step",
            &[
                ("Step", self.step_index.to_string()),
                ("File name", self.file_name.clone()),
                ("Title", self.title.clone()),
                ("Text", self.description.clone()),
            ],
        )
    }

    /// A blank answer to the file name prompt keeps the configured name.
    fn execute(&mut self, ctx: &mut StepContext<'_>) -> Result<()> {
        let answer = require_line(ctx.input, "Enter the output .txt file name: ")?;
        if !answer.trim().is_empty() {
            self.file_name = answer.trim().to_string();
        }

        let path = Path::new(&self.file_name);
        std::fs::write(path, self.artifact()).fs_context(path)?;

        info!("Wrote output artifact {}", self.file_name);
        writeln!(ctx.out, "The output file was generated successfully.")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::error::FlowError;
    use crate::input::ScriptedInput;

    #[test]
    fn test_writes_artifact() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("out.txt");

        let mut step = OutputStep::new(3, path.to_str().unwrap(), "Summary", "All done");
        let mut input = ScriptedInput::new([""]);
        let mut out = Vec::new();

        step.execute(&mut StepContext::new(&mut input, &mut out)).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Title: Summary\nDescription: All done\nStep Number: 3\n"
        );
    }

    #[test]
    fn test_unwritable_target_is_recoverable() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("missing-dir").join("out.txt");

        let mut step = OutputStep::new(1, "", "t", "d");
        let mut input = ScriptedInput::new([path.to_str().unwrap()]);
        let mut out = Vec::new();

        let err = step
            .execute(&mut StepContext::new(&mut input, &mut out))
            .unwrap_err();

        assert!(matches!(err, FlowError::FileSystem { .. }));
        assert!(!path.exists());
    }
}
