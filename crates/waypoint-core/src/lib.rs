//! Core library for the Waypoint flow builder.
//!
//! A flow is a named, ordered sequence of typed steps (titles, text, user
//! input, arithmetic over earlier inputs, file reads and file writes). Flows
//! are assembled interactively, executed step by step, tracked for
//! starts/completions/errors, and snapshotted into an append-only text log.
//!
//! - [`steps`]: the step contract ([`StepKind`]) and its ten variants
//! - [`flow`]: a single flow and its run bookkeeping
//! - [`manager`]: the registry of flows and its persistence
//! - [`audit`]: the text log format, written and parsed back
//! - [`input`]: where steps get their values from
//! - [`display`]: markdown formatting for terminal output
//!
//! # Quick Start
//!
//! ```rust
//! use waypoint_core::{CalculusStep, Flow, NumberInputStep, RunStatus, ScriptedInput};
//!
//! # fn example() -> waypoint_core::Result<()> {
//! let mut flow = Flow::new("Budget");
//! let income = flow.add_step(NumberInputStep::new("Monthly income"))?;
//! flow.add_step(CalculusStep::new(1, "divide").with_inputs([income]))?;
//!
//! // Income, divisor, then "n" to stop operating
//! let mut input = ScriptedInput::new(["3000", "4", "n"]);
//! let mut out = Vec::new();
//!
//! assert_eq!(flow.run(&mut input, &mut out)?, RunStatus::Completed { errors: 0 });
//! assert_eq!(flow.steps()[1].as_calculus().map(|c| c.result()), Some(750.0));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod audit;
pub mod display;
pub mod error;
pub mod flow;
pub mod input;
pub mod manager;
pub mod steps;

// Re-export commonly used types
pub use audit::{parse_saved_flows, AuditLog, SavedFlow, StepRecord};
pub use display::{FlowList, LocalDateTime, OperationStatus};
pub use error::{FlowError, Result, ResultExt};
pub use flow::{Flow, FlowAnalysis, FlowId, RunStatus, StepOutcome};
pub use input::{InputSource, LineInput, ScriptedInput};
pub use manager::{FlowManager, FlowManagerBuilder};
pub use steps::{
    CalculusStep, DisplayStep, EndStep, FileInputStep, FileKind, NumberInputStep, Operation,
    OutputStep, Step, StepContext, StepKind, TextInputStep, TextStep, TitleStep,
};
