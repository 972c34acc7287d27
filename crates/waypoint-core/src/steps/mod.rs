//! Typed steps a flow is assembled from.
//!
//! Every variant implements [`StepKind`], the shared contract:
//!
//! - `execute`: performs the interactive or file-bound action, mutating only
//!   the step's own fields
//! - `step_type`: fixed label identifying the variant
//! - `description`: human-readable summary of the key fields
//! - `write_details`: fixed-format record appended to a sink
//!
//! [`Step`] is the closed set of variants a flow owns. Adding a variant means
//! adding a file here and one arm to [`Step::kind`] and [`Step::kind_mut`].
//!
//! # Record format
//!
//! ```text
//! TITLE Step
//! Title: Welcome
//! Subtitle: Getting started
//!
//! ```

use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ResultExt};
use crate::input::InputSource;

pub mod calculus;
pub mod display;
pub mod end;
pub mod file_input;
pub mod number_input;
pub mod output;
pub mod text;
pub mod text_input;
pub mod title;

pub use calculus::{CalculusStep, Operation};
pub use display::DisplayStep;
pub use end::EndStep;
pub use file_input::{FileInputStep, FileKind};
pub use number_input::NumberInputStep;
pub use output::OutputStep;
pub use text::TextStep;
pub use text_input::TextInputStep;
pub use title::TitleStep;

/// Snapshot of a number input step another step depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Operand {
    /// Position of the number input inside its flow
    pub index: usize,
    /// Whether the number input has been executed
    pub executed: bool,
    /// Captured value, zero until executed
    pub value: f64,
}

/// Everything a step may use while executing.
pub struct StepContext<'a> {
    /// Source of the values the step captures
    pub input: &'a mut dyn InputSource,
    /// User-facing messages
    pub out: &'a mut dyn Write,
    /// Resolved back-references, empty for steps without dependencies
    pub operands: &'a [Operand],
}

impl<'a> StepContext<'a> {
    /// Context without operands.
    pub fn new(input: &'a mut dyn InputSource, out: &'a mut dyn Write) -> Self {
        Self {
            input,
            out,
            operands: &[],
        }
    }

    /// Attach resolved operands.
    pub fn with_operands(mut self, operands: &'a [Operand]) -> Self {
        self.operands = operands;
        self
    }
}

/// Behavior shared by every step variant.
pub trait StepKind {
    /// Fixed label identifying the variant.
    fn step_type(&self) -> &'static str;

    /// Summary combining the variant's key fields.
    fn description(&self) -> String;

    /// Appends the variant's record to `sink`.
    fn write_details(&self, sink: &mut dyn Write) -> io::Result<()>;

    /// Performs the step's action.
    fn execute(&mut self, ctx: &mut StepContext<'_>) -> Result<()>;
}

/// A single typed unit of work within a flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Step {
    Title(TitleStep),
    Text(TextStep),
    TextInput(TextInputStep),
    NumberInput(NumberInputStep),
    Calculus(CalculusStep),
    TextFileInput(FileInputStep),
    CsvFileInput(FileInputStep),
    Display(DisplayStep),
    Output(OutputStep),
    End(EndStep),
}

impl Step {
    fn kind(&self) -> &dyn StepKind {
        match self {
            Step::Title(step) => step,
            Step::Text(step) => step,
            Step::TextInput(step) => step,
            Step::NumberInput(step) => step,
            Step::Calculus(step) => step,
            Step::TextFileInput(step) | Step::CsvFileInput(step) => step,
            Step::Display(step) => step,
            Step::Output(step) => step,
            Step::End(step) => step,
        }
    }

    fn kind_mut(&mut self) -> &mut dyn StepKind {
        match self {
            Step::Title(step) => step,
            Step::Text(step) => step,
            Step::TextInput(step) => step,
            Step::NumberInput(step) => step,
            Step::Calculus(step) => step,
            Step::TextFileInput(step) | Step::CsvFileInput(step) => step,
            Step::Display(step) => step,
            Step::Output(step) => step,
            Step::End(step) => step,
        }
    }

    /// The number input behind this step, if it is one.
    pub fn as_number_input(&self) -> Option<&NumberInputStep> {
        match self {
            Step::NumberInput(step) => Some(step),
            _ => None,
        }
    }

    /// The calculus behind this step, if it is one.
    pub fn as_calculus(&self) -> Option<&CalculusStep> {
        match self {
            Step::Calculus(step) => Some(step),
            _ => None,
        }
    }
}

impl StepKind for Step {
    fn step_type(&self) -> &'static str {
        self.kind().step_type()
    }

    fn description(&self) -> String {
        self.kind().description()
    }

    fn write_details(&self, sink: &mut dyn Write) -> io::Result<()> {
        self.kind().write_details(sink)
    }

    fn execute(&mut self, ctx: &mut StepContext<'_>) -> Result<()> {
        self.kind_mut().execute(ctx)
    }
}

impl From<TitleStep> for Step {
    fn from(step: TitleStep) -> Self {
        Step::Title(step)
    }
}

impl From<TextStep> for Step {
    fn from(step: TextStep) -> Self {
        Step::Text(step)
    }
}

impl From<TextInputStep> for Step {
    fn from(step: TextInputStep) -> Self {
        Step::TextInput(step)
    }
}

impl From<NumberInputStep> for Step {
    fn from(step: NumberInputStep) -> Self {
        Step::NumberInput(step)
    }
}

impl From<CalculusStep> for Step {
    fn from(step: CalculusStep) -> Self {
        Step::Calculus(step)
    }
}

impl From<FileInputStep> for Step {
    fn from(step: FileInputStep) -> Self {
        match step.kind() {
            FileKind::Text => Step::TextFileInput(step),
            FileKind::Csv => Step::CsvFileInput(step),
        }
    }
}

impl From<DisplayStep> for Step {
    fn from(step: DisplayStep) -> Self {
        Step::Display(step)
    }
}

impl From<OutputStep> for Step {
    fn from(step: OutputStep) -> Self {
        Step::Output(step)
    }
}

impl From<EndStep> for Step {
    fn from(step: EndStep) -> Self {
        Step::End(step)
    }
}

/// Writes a record header, one `Label: value` line per field and the
/// closing blank line.
pub(crate) fn write_record(
    sink: &mut dyn Write,
    header: &str,
    fields: &[(&str, String)],
) -> io::Result<()> {
    writeln!(sink, "{header}")?;
    for (label, value) in fields {
        writeln!(sink, "{label}: {value}")?;
    }
    writeln!(sink)
}

/// Reads a whole file as lines. The handle is released before returning.
pub(crate) fn read_lines(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path).fs_context(path)?;
    Ok(content.lines().map(str::to_string).collect())
}

/// Splits a CSV line into trimmed cells joined for terminal display.
pub(crate) fn format_csv_row(line: &str) -> String {
    line.split(',')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" | ")
}
