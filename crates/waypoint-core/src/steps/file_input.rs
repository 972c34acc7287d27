//! Text and CSV file input steps.

use std::io::{self, Write};
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use super::{format_csv_row, read_lines, write_record, StepContext, StepKind};
use crate::error::Result;
use crate::input::require_line;

/// Kind of file a file step reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Text,
    Csv,
}

impl FileKind {
    fn extension(&self) -> &'static str {
        match self {
            FileKind::Text => "txt",
            FileKind::Csv => "csv",
        }
    }
}

/// Reads an external file and shows its content.
///
/// Only the metadata is kept; the content is never stored in the step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInputStep {
    kind: FileKind,
    pub description: String,
    pub file_name: String,
}

impl FileInputStep {
    /// A step reading a plain text file.
    pub fn text(description: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            kind: FileKind::Text,
            description: description.into(),
            file_name: file_name.into(),
        }
    }

    /// A step reading a CSV file.
    pub fn csv(description: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            kind: FileKind::Csv,
            description: description.into(),
            file_name: file_name.into(),
        }
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }
}

impl StepKind for FileInputStep {
    fn step_type(&self) -> &'static str {
        match self.kind {
            FileKind::Text => "Text File Input Step",
            FileKind::Csv => "CSV File Input Step",
        }
    }

    fn description(&self) -> String {
        format!("{} - {}", self.description, self.file_name)
    }

    fn write_details(&self, sink: &mut dyn Write) -> io::Result<()> {
        match self.kind {
            FileKind::Text => write_record(
                sink,
                "TEXT FILE INPUT Step",
                &[
                    ("File", self.file_name.clone()),
                    ("Description", self.description.clone()),
                ],
            ),
            FileKind::Csv => write_record(
                sink,
                "CSV FILE INPUT Step",
                &[
                    ("File name", self.file_name.clone()),
                    ("Description", self.description.clone()),
                ],
            ),
        }
    }

    /// A blank answer to the file name prompt keeps the configured name.
    fn execute(&mut self, ctx: &mut StepContext<'_>) -> Result<()> {
        writeln!(ctx.out, "Description: {}", self.description)?;
        let prompt = format!("Enter the .{} file name: ", self.kind.extension());
        let answer = require_line(ctx.input, &prompt)?;
        if !answer.trim().is_empty() {
            self.file_name = answer.trim().to_string();
        }

        let lines = read_lines(Path::new(&self.file_name))?;
        debug!("Read {} lines from {}", lines.len(), self.file_name);

        writeln!(ctx.out, "File contents:")?;
        match self.kind {
            FileKind::Text => {
                for line in &lines {
                    writeln!(ctx.out, "{line}")?;
                }
            }
            FileKind::Csv => {
                for line in &lines {
                    writeln!(ctx.out, "{}", format_csv_row(line))?;
                }
                writeln!(ctx.out, "{} rows read", lines.len())?;
            }
        }
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
    fn test_text_file_is_shown() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "first line\nsecond line\n").unwrap();

        let mut input = ScriptedInput::new([path.to_str().unwrap()]);
        let mut out = Vec::new();
        let mut step = FileInputStep::text("Notes", "");

        step.execute(&mut StepContext::new(&mut input, &mut out)).unwrap();

        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("first line\nsecond line\n"));
        assert_eq!(step.file_name, path.to_str().unwrap());
    }

    #[test]
    fn test_csv_rows_are_split() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "a,b\n1,2\n").unwrap();

        let mut input = ScriptedInput::new([""]);
        let mut out = Vec::new();
        let mut step = FileInputStep::csv("Data", path.to_str().unwrap());

        step.execute(&mut StepContext::new(&mut input, &mut out)).unwrap();

        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("a | b\n1 | 2\n2 rows read"));
    }

    #[test]
    fn test_missing_file_is_recoverable() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("absent.txt");

        let mut input = ScriptedInput::new([path.to_str().unwrap()]);
        let mut out = Vec::new();
        let mut step = FileInputStep::text("Missing", "");

        let err = step
            .execute(&mut StepContext::new(&mut input, &mut out))
            .unwrap_err();

        assert!(matches!(err, FlowError::FileSystem { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_records_use_kind_specific_labels() {
        let mut sink = Vec::new();
        FileInputStep::csv("Data", "data.csv")
            .write_details(&mut sink)
            .unwrap();
        assert_eq!(
            String::from_utf8(sink).unwrap(),
            "CSV FILE INPUT Step\nFile name: data.csv\nDescription: Data\n\n"
        );
    }
}
