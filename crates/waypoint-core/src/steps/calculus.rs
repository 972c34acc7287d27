//! Calculator step operating on earlier number inputs.

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::{write_record, StepContext, StepKind};
use crate::error::{FlowError, Result};
use crate::input::{read_confirmation, read_number, require_token};

/// The six operations the calculator offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Min,
    Max,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
        Operation::Min,
        Operation::Max,
    ];

    /// Applies the operation. Only division can fail.
    pub fn apply(self, left: f64, right: f64) -> Result<f64> {
        Ok(match self {
            Operation::Add => left + right,
            Operation::Subtract => left - right,
            Operation::Multiply => left * right,
            Operation::Divide => {
                if right == 0.0 {
                    return Err(FlowError::DivisionByZero);
                }
                left / right
            }
            Operation::Min => left.min(right),
            Operation::Max => left.max(right),
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
            Operation::Divide => "divide",
            Operation::Min => "min",
            Operation::Max => "max",
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Multiply => "*",
            Operation::Divide => "/",
            Operation::Min => "min",
            Operation::Max => "max",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Operation {
    type Err = FlowError;

    /// Accepts the menu number, the name or the symbol, case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "1" | "add" | "+" | "addition" => Ok(Operation::Add),
            "2" | "subtract" | "-" | "subtraction" => Ok(Operation::Subtract),
            "3" | "multiply" | "*" | "multiplication" => Ok(Operation::Multiply),
            "4" | "divide" | "/" | "division" => Ok(Operation::Divide),
            "5" | "min" | "minimum" => Ok(Operation::Min),
            "6" | "max" | "maximum" => Ok(Operation::Max),
            _ => Err(FlowError::UnknownOperation {
                choice: s.to_string(),
            }),
        }
    }
}

/// Calculator over number input steps of the same flow.
///
/// `inputs` holds positions in the owning flow, never the steps
/// themselves. The flow resolves them into operands right before
/// execution. The first operand is the left-hand side; the right-hand side
/// is asked for each round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculusStep {
    pub step_count: usize,
    pub operation_label: String,
    inputs: Vec<usize>,
    result: f64,
}

impl CalculusStep {
    pub fn new(step_count: usize, operation_label: impl Into<String>) -> Self {
        Self {
            step_count,
            operation_label: operation_label.into(),
            inputs: Vec::new(),
            result: 0.0,
        }
    }

    /// Reference the number input at `index` of the owning flow.
    pub fn add_input(&mut self, index: usize) {
        self.inputs.push(index);
    }

    /// Builder-style variant of [`CalculusStep::add_input`].
    pub fn with_inputs(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.inputs.extend(indices);
        self
    }

    pub fn inputs(&self) -> &[usize] {
        &self.inputs
    }

    /// Last computed value, zero until a round succeeds.
    pub fn result(&self) -> f64 {
        self.result
    }

    /// The operation fixed by the label, if the label names one.
    pub fn operation(&self) -> Option<Operation> {
        self.operation_label.parse().ok()
    }

    fn choose_operation(&self, ctx: &mut StepContext<'_>) -> Result<Operation> {
        if let Some(operation) = self.operation() {
            return Ok(operation);
        }

        writeln!(ctx.out, "Choose an operation:")?;
        for (position, operation) in Operation::ALL.iter().enumerate() {
            writeln!(
                ctx.out,
                "{}. {} ({})",
                position + 1,
                operation,
                operation.symbol()
            )?;
        }
        let choice = require_token(ctx.input, "Enter the number of the operation: ")?;
        choice.parse()
    }

    fn run_round(&mut self, ctx: &mut StepContext<'_>) -> Result<()> {
        if let Some(pending) = ctx.operands.iter().find(|operand| !operand.executed) {
            return Err(FlowError::MissingDependency {
                index: pending.index,
            });
        }
        let left = match ctx.operands.first() {
            Some(operand) => operand.value,
            None => {
                return Err(FlowError::InvalidReference {
                    index: 0,
                    reason: "calculus step references no number input".to_string(),
                })
            }
        };

        let right = read_number(ctx.input, ctx.out, "Enter a number for the operation: ")?;
        let operation = self.choose_operation(ctx)?;
        let value = operation.apply(left, right)?;

        self.result = value;
        info!("Calculus {left} {} {right} = {value}", operation.symbol());
        writeln!(ctx.out, "Result: {value}")?;
        Ok(())
    }
}

impl StepKind for CalculusStep {
    fn step_type(&self) -> &'static str {
        "Calculus Step"
    }

    fn description(&self) -> String {
        format!("{} steps - {}", self.step_count, self.operation_label)
    }

    fn write_details(&self, sink: &mut dyn Write) -> io::Result<()> {
        write_record(
            sink,
            "CALCULUS Step",
            &[
                ("Steps", self.step_count.to_string()),
                ("Operation", self.operation_label.clone()),
                ("Result", self.result.to_string()),
            ],
        )
    }

    /// Runs rounds until the user declines another one. A failing round
    /// leaves `result` as it was and ends the step.
    fn execute(&mut self, ctx: &mut StepContext<'_>) -> Result<()> {
        loop {
            self.run_round(ctx)?;
            if !read_confirmation(ctx.input, "Perform another operation? (y/n): ")? {
                debug!("Calculus finished with result {}", self.result);
                return Ok(());
            }
        }
    }
}
