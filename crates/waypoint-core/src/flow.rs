//! Flow model: an ordered sequence of owned steps plus run bookkeeping.

use std::fmt;
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use jiff::Timestamp;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{FlowError, Result};
use crate::input::InputSource;
use crate::steps::{Operand, Step, StepContext, StepKind};

static NEXT_FLOW_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a flow, unique within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlowId(pub u64);

impl FlowId {
    fn next() -> Self {
        FlowId(NEXT_FLOW_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for FlowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What happened to a single step execution.
#[derive(Debug)]
pub enum StepOutcome {
    /// The step ran to completion
    Executed,
    /// The step hit a recoverable error, recorded as an error screen
    Failed(FlowError),
    /// The flow was already completed, recorded as a skipped screen
    Skipped,
}

/// Result of [`Flow::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// A full pass over every step finished
    Completed { errors: usize },
    /// The flow had completed before; nothing ran and no counter moved
    AlreadyCompleted,
}

/// Run statistics of a flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowAnalysis {
    pub name: String,
    pub start_count: u32,
    pub completion_count: u32,
    /// Errors per completed run, `None` when the flow never completed
    pub mean_errors: Option<f64>,
    pub skipped_screens: usize,
    pub error_screens: usize,
}

impl FlowAnalysis {
    /// Pretty-printed JSON form of the report.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A named, ordered sequence of steps with its own run bookkeeping.
///
/// The flow owns its steps. Calculus steps refer to number inputs by their
/// position in [`Flow::steps`]; [`Flow::add_step`] only accepts references
/// to number inputs already present, so a reference can never dangle.
#[derive(Debug)]
pub struct Flow {
    id: FlowId,
    name: String,
    steps: Vec<Step>,
    created_at: Timestamp,
    start_count: u32,
    completion_count: u32,
    skipped_screens: Vec<usize>,
    error_screens: Vec<usize>,
    completed: bool,
}

impl Flow {
    /// Creates an empty flow stamped with the current time.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: FlowId::next(),
            name: name.into(),
            steps: Vec::new(),
            created_at: Timestamp::now(),
            start_count: 0,
            completion_count: 0,
            skipped_screens: Vec::new(),
            error_screens: Vec::new(),
            completed: false,
        }
    }

    pub fn id(&self) -> FlowId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn start_count(&self) -> u32 {
        self.start_count
    }

    pub fn completion_count(&self) -> u32 {
        self.completion_count
    }

    pub fn skipped_screens(&self) -> &[usize] {
        &self.skipped_screens
    }

    pub fn error_screens(&self) -> &[usize] {
        &self.error_screens
    }

    /// Total errors recorded so far; one per error screen.
    pub fn total_errors(&self) -> usize {
        self.error_screens.len()
    }

    /// True once a full, uninterrupted pass over every step has finished.
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Appends `step`, taking ownership, and returns its position.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::InvalidReference` when a calculus step points at
    /// a position that is not a number input of this flow.
    pub fn add_step(&mut self, step: impl Into<Step>) -> Result<usize> {
        let step = step.into();
        if let Some(calculus) = step.as_calculus() {
            if calculus.inputs().is_empty() {
                return Err(FlowError::InvalidReference {
                    index: self.steps.len(),
                    reason: "calculus step references no number input".to_string(),
                });
            }
            for &index in calculus.inputs() {
                self.number_input_at(index)?;
            }
        }

        self.steps.push(step);
        let index = self.steps.len() - 1;
        debug!("Flow {:?} received step {index}", self.name);
        Ok(index)
    }

    fn number_input_at(&self, index: usize) -> Result<Operand> {
        match self.steps.get(index) {
            Some(step) => step
                .as_number_input()
                .map(|number| number.operand(index))
                .ok_or_else(|| FlowError::InvalidReference {
                    index,
                    reason: format!("step is a {}, not a number input", step.step_type()),
                }),
            None => Err(FlowError::InvalidReference {
                index,
                reason: "no step at this position".to_string(),
            }),
        }
    }

    /// Resolves the back-references of the step at `index`.
    fn operands_for(&self, index: usize) -> Result<Vec<Operand>> {
        match self.steps.get(index).and_then(Step::as_calculus) {
            Some(calculus) => calculus
                .inputs()
                .iter()
                .map(|&input| self.number_input_at(input))
                .collect(),
            None => Ok(Vec::new()),
        }
    }

    /// Executes the step at `index`.
    ///
    /// Recoverable errors are reported on `out`, recorded as an error screen
    /// and returned as [`StepOutcome::Failed`]. Any other error propagates.
    pub fn execute_step(
        &mut self,
        index: usize,
        input: &mut dyn InputSource,
        out: &mut dyn Write,
    ) -> Result<StepOutcome> {
        let operands = self.operands_for(index)?;
        let step = self
            .steps
            .get_mut(index)
            .ok_or_else(|| FlowError::InvalidReference {
                index,
                reason: "no step at this position".to_string(),
            })?;

        debug!("Executing {} at position {index}", step.step_type());
        let result = {
            let mut ctx = StepContext::new(input, out).with_operands(&operands);
            step.execute(&mut ctx)
        };

        match result {
            Ok(()) => Ok(StepOutcome::Executed),
            Err(e) if e.is_recoverable() => {
                warn!("Step {index} of flow {:?} failed: {e}", self.name);
                writeln!(out, "Error: {e}")?;
                self.mark_screen_error(index);
                Ok(StepOutcome::Failed(e))
            }
            Err(e) => {
                error!("Step {index} of flow {:?} aborted: {e}", self.name);
                Err(e)
            }
        }
    }

    /// Replays every step once.
    ///
    /// On a completed flow this is a no-op reporting
    /// [`RunStatus::AlreadyCompleted`]; neither counter moves. Otherwise the
    /// start counter goes up, each step executes, and only after the whole
    /// pass does the completion counter go up. A fatal step error leaves the
    /// flow started but not completed.
    pub fn run(&mut self, input: &mut dyn InputSource, out: &mut dyn Write) -> Result<RunStatus> {
        if self.completed {
            info!("Flow {:?} already completed, not replaying", self.name);
            return Ok(RunStatus::AlreadyCompleted);
        }

        self.start_count += 1;
        info!("Running flow {:?} (start #{})", self.name, self.start_count);

        let mut errors = 0;
        for index in 0..self.steps.len() {
            if let StepOutcome::Failed(_) = self.execute_step(index, input, out)? {
                errors += 1;
            }
        }

        self.completion_count += 1;
        self.completed = true;
        info!("Flow {:?} completed with {errors} error(s)", self.name);
        Ok(RunStatus::Completed { errors })
    }

    /// Summarizes the run statistics.
    pub fn analyze(&self) -> FlowAnalysis {
        let mean_errors = if self.completion_count > 0 {
            Some(self.total_errors() as f64 / f64::from(self.completion_count))
        } else {
            None
        };

        FlowAnalysis {
            name: self.name.clone(),
            start_count: self.start_count,
            completion_count: self.completion_count,
            mean_errors,
            skipped_screens: self.skipped_screens.len(),
            error_screens: self.error_screens.len(),
        }
    }

    pub fn mark_screen_skipped(&mut self, index: usize) {
        self.skipped_screens.push(index);
    }

    pub fn mark_screen_error(&mut self, index: usize) {
        self.error_screens.push(index);
    }

    /// Every step description, each followed by `" | "`.
    pub fn steps_info(&self) -> String {
        self.steps
            .iter()
            .map(|step| format!("{} | ", step.description()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ScriptedInput;
    use crate::steps::{CalculusStep, EndStep, NumberInputStep, TextInputStep, TitleStep};

    fn run_with(flow: &mut Flow, answers: &[&str]) -> Result<RunStatus> {
        let mut input = ScriptedInput::new(answers.iter().copied());
        let mut out = Vec::new();
        flow.run(&mut input, &mut out)
    }

    #[test]
    fn test_new_flow_is_empty() {
        let flow = Flow::new("Demo");
        assert_eq!(flow.name(), "Demo");
        assert!(flow.steps().is_empty());
        assert!(!flow.is_completed());
        assert_eq!(flow.start_count(), 0);
        assert_eq!(flow.completion_count(), 0);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Flow::new("same");
        let b = Flow::new("same");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_run_completes_and_counts() {
        let mut flow = Flow::new("Demo");
        flow.add_step(TitleStep::default()).unwrap();
        flow.add_step(EndStep).unwrap();

        let status = run_with(&mut flow, &["Hello", "World"]).unwrap();

        assert_eq!(status, RunStatus::Completed { errors: 0 });
        assert!(flow.is_completed());
        assert_eq!(flow.start_count(), 1);
        assert_eq!(flow.completion_count(), 1);
        assert_eq!(flow.steps_info(), "Hello - World | End of flow | ");
    }

    #[test]
    fn test_rerun_is_explicit_noop() {
        let mut flow = Flow::new("Demo");
        flow.add_step(TitleStep::default()).unwrap();
        run_with(&mut flow, &["a", "b"]).unwrap();

        let status = run_with(&mut flow, &[]).unwrap();

        assert_eq!(status, RunStatus::AlreadyCompleted);
        assert_eq!(flow.start_count(), 1);
        assert_eq!(flow.completion_count(), 1);
    }

    #[test]
    fn test_fatal_error_leaves_flow_incomplete() {
        let mut flow = Flow::new("Demo");
        flow.add_step(TextInputStep::default()).unwrap();

        let err = run_with(&mut flow, &["Name", ""]).unwrap_err();

        assert!(matches!(err, FlowError::EmptyInput { .. }));
        assert!(!flow.is_completed());
        assert_eq!(flow.start_count(), 1);
        assert_eq!(flow.completion_count(), 0);
    }

    #[test]
    fn test_recoverable_error_recorded_and_run_continues() {
        let mut flow = Flow::new("Demo");
        let number = flow.add_step(NumberInputStep::new("n")).unwrap();
        flow.add_step(CalculusStep::new(1, "divide").with_inputs([number])).unwrap();
        flow.add_step(EndStep).unwrap();

        let status = run_with(&mut flow, &["4", "0"]).unwrap();

        assert_eq!(status, RunStatus::Completed { errors: 1 });
        assert_eq!(flow.error_screens(), [1]);
        assert_eq!(flow.total_errors(), 1);
        assert_eq!(flow.steps()[1].as_calculus().unwrap().result(), 0.0);
    }

    #[test]
    fn test_calculus_reference_must_be_number_input() {
        let mut flow = Flow::new("Demo");
        flow.add_step(TitleStep::default()).unwrap();

        let err = flow
            .add_step(CalculusStep::new(1, "add").with_inputs([0]))
            .unwrap_err();
        assert!(matches!(err, FlowError::InvalidReference { index: 0, .. }));

        let err = flow
            .add_step(CalculusStep::new(1, "add").with_inputs([7]))
            .unwrap_err();
        assert!(matches!(err, FlowError::InvalidReference { index: 7, .. }));

        let err = flow.add_step(CalculusStep::new(0, "add")).unwrap_err();
        assert!(matches!(err, FlowError::InvalidReference { .. }));
        assert_eq!(flow.steps().len(), 1);
    }

    #[test]
    fn test_analyze_never_completed() {
        let mut flow = Flow::new("Demo");
        flow.mark_screen_skipped(0);
        flow.mark_screen_error(1);

        let analysis = flow.analyze();

        assert_eq!(analysis.mean_errors, None);
        assert_eq!(analysis.skipped_screens, 1);
        assert_eq!(analysis.error_screens, 1);
    }

    #[test]
    fn test_analyze_mean_errors() {
        let mut flow = Flow::new("Demo");
        flow.add_step(EndStep).unwrap();
        run_with(&mut flow, &[]).unwrap();
        flow.mark_screen_error(0);
        flow.mark_screen_error(0);

        let analysis = flow.analyze();

        assert_eq!(analysis.completion_count, 1);
        assert_eq!(analysis.mean_errors, Some(2.0));
        let json = analysis.to_json().unwrap();
        assert!(json.contains("\"mean_errors\": 2.0"));
    }
}
