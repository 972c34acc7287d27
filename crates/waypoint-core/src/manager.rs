//! Registry owning every flow of a session.
//!
//! The [`FlowManager`] is constructed explicitly (see
//! [`FlowManagerBuilder`]) and handed to whatever drives the session. It
//! starts empty and is torn down with [`FlowManager::close`], which appends
//! a final snapshot of every flow to the audit log.
//!
//! # Example
//!
//! ```rust,no_run
//! use waypoint_core::{FlowManagerBuilder, ScriptedInput, TitleStep};
//!
//! # fn example() -> waypoint_core::Result<()> {
//! let mut manager = FlowManagerBuilder::new()
//!     .with_audit_log_path(Some("flows.txt"))
//!     .build()?;
//!
//! let mut input = ScriptedInput::new(["Welcome", "Getting started"]);
//! let mut out = std::io::stdout();
//!
//! let demo = manager.create_flow("Demo");
//! manager.add_step_to_flow(demo, TitleStep::default(), &mut input, &mut out)?;
//! manager.close()?;
//! # Ok(())
//! # }
//! ```

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::audit::{write_flow_block, AuditLog};
use crate::error::{FlowError, Result, ResultExt};
use crate::flow::{Flow, FlowAnalysis, FlowId, RunStatus, StepOutcome};
use crate::input::InputSource;
use crate::steps::Step;

/// Builder for creating and configuring FlowManager instances.
#[derive(Debug, Clone, Default)]
pub struct FlowManagerBuilder {
    audit_log_path: Option<PathBuf>,
}

impl FlowManagerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            audit_log_path: None,
        }
    }

    /// Sets a custom audit log path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/waypoint/flows.txt` or
    /// `~/.local/share/waypoint/flows.txt`
    pub fn with_audit_log_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.audit_log_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Builds an empty manager.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::XdgDirectory` if no default path can be placed
    /// Returns `FlowError::FileSystem` if the log directory cannot be created
    pub fn build(self) -> Result<FlowManager> {
        let path = match self.audit_log_path {
            Some(path) => path,
            None => Self::default_audit_log_path()?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).fs_context(parent)?;
            }
        }

        info!("Using audit log {}", path.display());
        Ok(FlowManager::new(AuditLog::new(path)))
    }

    fn default_audit_log_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("waypoint")
            .place_data_file("flows.txt")
            .map_err(|e| FlowError::XdgDirectory(e.to_string()))
    }
}

/// Registry of flows with lookup, execution, deletion and persistence.
#[derive(Debug)]
pub struct FlowManager {
    flows: Vec<Flow>,
    audit: AuditLog,
}

impl FlowManager {
    /// Creates an empty registry writing to `audit`.
    pub fn new(audit: AuditLog) -> Self {
        Self {
            flows: Vec::new(),
            audit,
        }
    }

    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    /// Registered flows in registration order.
    pub fn flows(&self) -> &[Flow] {
        &self.flows
    }

    pub fn flow_names(&self) -> Vec<&str> {
        self.flows.iter().map(Flow::name).collect()
    }

    pub fn flow(&self, id: FlowId) -> Option<&Flow> {
        self.flows.iter().find(|flow| flow.id() == id)
    }

    /// Mutable access to a registered flow.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::FlowNotFound` for an unregistered id.
    pub fn flow_mut(&mut self, id: FlowId) -> Result<&mut Flow> {
        self.flows
            .iter_mut()
            .find(|flow| flow.id() == id)
            .ok_or(FlowError::FlowNotFound { id: id.0 })
    }

    /// Constructs and registers an empty flow.
    ///
    /// Names are not required to be unique; see
    /// [`FlowManager::get_flow_by_name`].
    pub fn create_flow(&mut self, name: impl Into<String>) -> FlowId {
        self.add_flow(Flow::new(name))
    }

    /// Registers a flow the caller built directly.
    pub fn add_flow(&mut self, flow: Flow) -> FlowId {
        let id = flow.id();
        info!("Registered flow {:?} with ID {id}", flow.name());
        self.flows.push(flow);
        id
    }

    /// Appends `step` to the flow and executes it right away.
    ///
    /// On a flow that is already completed the step is appended but not
    /// executed, and the skip is recorded.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::FlowNotFound` for an unregistered id,
    /// `FlowError::InvalidReference` for a calculus step with bad
    /// references, and any non-recoverable error raised by the step.
    pub fn add_step_to_flow(
        &mut self,
        id: FlowId,
        step: impl Into<Step>,
        input: &mut dyn InputSource,
        out: &mut dyn Write,
    ) -> Result<StepOutcome> {
        let flow = self.flow_mut(id)?;
        let index = flow.add_step(step)?;

        if flow.is_completed() {
            debug!("Flow {:?} already completed, skipping step {index}", flow.name());
            flow.mark_screen_skipped(index);
            return Ok(StepOutcome::Skipped);
        }

        flow.execute_step(index, input, out)
    }

    /// Runs the flow; see [`Flow::run`].
    pub fn run_flow(
        &mut self,
        id: FlowId,
        input: &mut dyn InputSource,
        out: &mut dyn Write,
    ) -> Result<RunStatus> {
        self.flow_mut(id)?.run(input, out)
    }

    /// Removes and drops the flow with `id`, steps included.
    ///
    /// Returns whether a flow was removed; an unknown id is a no-op.
    pub fn delete_flow(&mut self, id: FlowId) -> bool {
        match self.flows.iter().position(|flow| flow.id() == id) {
            Some(position) => {
                let flow = self.flows.remove(position);
                info!("Deleted flow {:?} with ID {id}", flow.name());
                true
            }
            None => false,
        }
    }

    /// First registered flow whose name matches exactly.
    pub fn get_flow_by_name(&self, name: &str) -> Option<&Flow> {
        self.flows.iter().find(|flow| flow.name() == name)
    }

    /// Id of the first registered flow whose name matches exactly.
    pub fn find_flow_id(&self, name: &str) -> Option<FlowId> {
        self.get_flow_by_name(name).map(Flow::id)
    }

    /// Analysis of the flow; see [`Flow::analyze`].
    pub fn analyze_flow(&self, id: FlowId) -> Result<FlowAnalysis> {
        self.flow(id)
            .map(Flow::analyze)
            .ok_or(FlowError::FlowNotFound { id: id.0 })
    }

    /// Appends one snapshot block per registered flow to `path`.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::FileSystem` if the file cannot be opened or
    /// written; nothing is written when opening fails.
    pub fn save_flows_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .fs_context(path)?;

        let mut writer = BufWriter::new(file);
        for flow in &self.flows {
            write_flow_block(&mut writer, flow).fs_context(path)?;
        }
        writer.flush().fs_context(path)?;

        info!("Saved {} flow(s) to {}", self.flows.len(), path.display());
        Ok(())
    }

    /// Every line of `path`, verbatim.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::FileSystem` if the file cannot be read.
    pub fn display_flows_from_file(&self, path: impl AsRef<Path>) -> Result<Vec<String>> {
        AuditLog::new(path.as_ref()).read_lines()
    }

    /// Tears the registry down, appending a final snapshot to the audit log
    /// when any flow is registered.
    pub fn close(self) -> Result<()> {
        if !self.flows.is_empty() {
            self.save_flows_to_file(self.audit.path())?;
        }
        info!("Flow manager closed");
        Ok(())
    }
}
