//! Append-only audit log of flows.
//!
//! The log is a human-readable text file, not a database. Three kinds of
//! blocks interleave in it:
//!
//! ```text
//! Nume proces: Demo                      <- creation line
//! Demo - Welcome - Intro | End of flow |  <- summary line at finalization
//!
//! Numele procesului: Demo                <- snapshot block
//! TITLE Step
//! Title: Welcome
//! Subtitle: Intro
//!
//! END Step
//!
//! -------------------------
//! ```
//!
//! [`parse_saved_flows`] reads snapshot blocks back and ignores the rest.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ResultExt};
use crate::flow::Flow;
use crate::steps::StepKind;

/// Prefix of the line recording a flow creation.
pub const CREATION_PREFIX: &str = "Nume proces: ";
/// Prefix of the line opening a snapshot block.
pub const FLOW_HEADER_PREFIX: &str = "Numele procesului: ";
/// Line closing a snapshot block.
pub const FLOW_DELIMITER: &str = "-------------------------";

/// Writes one snapshot block for `flow`.
pub fn write_flow_block(sink: &mut dyn Write, flow: &Flow) -> io::Result<()> {
    writeln!(sink, "{FLOW_HEADER_PREFIX}{}", flow.name())?;
    for step in flow.steps() {
        step.write_details(sink)?;
    }
    writeln!(sink, "{FLOW_DELIMITER}")
}

/// Handle on the audit log file.
///
/// Every call opens the file, writes or reads it whole and closes it again.
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, text: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .fs_context(&self.path)?;
        file.write_all(text.as_bytes()).fs_context(&self.path)?;
        debug!("Appended {} bytes to {}", text.len(), self.path.display());
        Ok(())
    }

    /// Records that a flow named `name` was created.
    pub fn record_creation(&self, name: &str) -> Result<()> {
        self.append(&format!("{CREATION_PREFIX}{name}\n"))
    }

    /// Records the finalized step list of `flow`.
    pub fn record_summary(&self, flow: &Flow) -> Result<()> {
        self.append(&format!("{} - {}\n\n", flow.name(), flow.steps_info()))
    }

    /// Every line of the log, verbatim.
    pub fn read_lines(&self) -> Result<Vec<String>> {
        let content = std::fs::read_to_string(&self.path).fs_context(&self.path)?;
        Ok(content.lines().map(str::to_string).collect())
    }
}

/// One step record read back from a snapshot block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Header line, e.g. `TITLE Step`
    pub header: String,
    /// `(label, value)` pairs in file order
    pub fields: Vec<(String, String)>,
}

impl StepRecord {
    fn new(header: &str) -> Self {
        Self {
            header: header.to_string(),
            fields: Vec::new(),
        }
    }

    /// Value of the first field labelled `label`.
    pub fn field(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, value)| value.as_str())
    }
}

/// A snapshot block read back from the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedFlow {
    pub name: String,
    pub steps: Vec<StepRecord>,
}

/// Parses every complete snapshot block in `text`.
///
/// Creation and summary lines outside blocks are skipped, as is a trailing
/// block without its delimiter.
pub fn parse_saved_flows(text: &str) -> Vec<SavedFlow> {
    let mut flows = Vec::new();
    let mut current: Option<SavedFlow> = None;
    let mut record: Option<StepRecord> = None;

    for line in text.lines() {
        if let Some(name) = line.strip_prefix(FLOW_HEADER_PREFIX) {
            record = None;
            current = Some(SavedFlow {
                name: name.to_string(),
                steps: Vec::new(),
            });
            continue;
        }

        let Some(flow) = current.as_mut() else {
            continue;
        };

        if line == FLOW_DELIMITER {
            flow.steps.extend(record.take());
            flows.extend(current.take());
            continue;
        }

        if line.is_empty() {
            flow.steps.extend(record.take());
            continue;
        }

        match record.as_mut() {
            Some(open) => match line.split_once(": ") {
                Some((label, value)) => open.fields.push((label.to_string(), value.to_string())),
                None => flow.steps.extend(record.replace(StepRecord::new(line))),
            },
            None => record = Some(StepRecord::new(line)),
        }
    }

    flows
}
