//! Interactive menu session.
//!
//! The session owns the flow manager for its whole lifetime and tears it
//! down on exit, which appends a final snapshot to the audit log. A
//! recoverable error is reported and the menu comes back; any other error
//! ends the session.

use std::io::Write;

use anyhow::Result;
use log::{error, info};
use waypoint_core::{
    input::{read_menu_choice, require_line},
    CalculusStep, DisplayStep, EndStep, FileInputStep, FlowError, FlowId, FlowList, FlowManager,
    InputSource, NumberInputStep, Operation, OperationStatus, OutputStep, RunStatus, Step,
    StepOutcome, TextInputStep, TextStep, TitleStep,
};

use crate::renderer::TerminalRenderer;

/// Step kinds in menu order, with a short explanation each.
pub const STEP_KINDS: [(&str, &str); 10] = [
    ("Title Step", "a title and a subtitle"),
    ("Text Step", "a title and a body of copy"),
    ("Text Input Step", "a description and a required text value"),
    ("Number Input Step", "a description and a number"),
    ("Calculus Step", "arithmetic over earlier number inputs"),
    ("Text File Input Step", "shows the content of a .txt file"),
    ("CSV File Input Step", "shows the rows of a .csv file"),
    ("Display Step", "shows a text or CSV file again"),
    ("Output Step", "writes a small .txt file"),
    ("End Step", "finishes and runs the flow"),
];

/// Markdown list of [`STEP_KINDS`].
pub fn step_kinds_markdown() -> String {
    STEP_KINDS
        .iter()
        .enumerate()
        .map(|(position, (label, help))| format!("{}. **{label}**: {help}\n", position + 1))
        .collect()
}

enum Action {
    Continue,
    Exit,
}

pub struct Session<I, W> {
    manager: FlowManager,
    renderer: TerminalRenderer,
    input: I,
    out: W,
    json: bool,
}

impl<I: InputSource, W: Write> Session<I, W> {
    pub fn new(
        manager: FlowManager,
        renderer: TerminalRenderer,
        input: I,
        out: W,
        json: bool,
    ) -> Self {
        Self {
            manager,
            renderer,
            input,
            out,
            json,
        }
    }

    /// Runs the menu until the user exits or a fatal error occurs.
    ///
    /// The manager is closed either way.
    pub fn run(mut self) -> Result<()> {
        info!("Session started");
        let outcome = loop {
            match self.next_action() {
                Ok(Action::Continue) => continue,
                Ok(Action::Exit) => break Ok(()),
                Err(e) if e.is_recoverable() => {
                    self.report(&OperationStatus::failure(e.to_string()))?;
                }
                Err(e) => {
                    error!("Session aborted: {e}");
                    self.report(&OperationStatus::failure(e.to_string()))?;
                    break Err(e);
                }
            }
        };

        let closed = self.manager.close();
        info!("Session ended");
        match (outcome, closed) {
            (Ok(()), closed) => Ok(closed?),
            (Err(fatal), Ok(())) => Err(fatal.into()),
            (Err(fatal), Err(close)) => Err(anyhow::Error::new(fatal)
                .context(format!("Closing the flow manager also failed: {close}"))),
        }
    }

    fn next_action(&mut self) -> waypoint_core::Result<Action> {
        self.show_main_menu()?;
        let choice = match read_menu_choice(
            &mut self.input,
            &mut self.out,
            "Choose an option: ",
            0,
            6,
        ) {
            Ok(choice) => choice,
            Err(FlowError::InputClosed { .. }) => {
                info!("Input closed at the main menu");
                return Ok(Action::Exit);
            }
            Err(e) => return Err(e),
        };

        match choice {
            1 => self.create_flow()?,
            2 => self.list_flows()?,
            3 => self.run_flow()?,
            4 => self.delete_flow()?,
            5 => self.show_details()?,
            6 => self.analyze_flow()?,
            _ => {
                writeln!(self.out, "Exiting the program.")?;
                return Ok(Action::Exit);
            }
        }
        Ok(Action::Continue)
    }

    fn show_main_menu(&mut self) -> waypoint_core::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "1. Create flow")?;
        writeln!(self.out, "2. List flows")?;
        writeln!(self.out, "3. Run flow")?;
        writeln!(self.out, "4. Delete flow")?;
        writeln!(self.out, "5. Flow details")?;
        writeln!(self.out, "6. Analyze flow")?;
        writeln!(self.out, "0. Exit")?;
        Ok(())
    }

    fn report(&mut self, status: &OperationStatus) -> waypoint_core::Result<()> {
        write!(self.out, "{status}")?;
        Ok(())
    }

    fn render(&mut self, markdown: &str) -> waypoint_core::Result<()> {
        self.renderer.render(&mut self.out, markdown)?;
        Ok(())
    }

    /// Asks for a flow name and resolves it to the first flow with that
    /// exact name.
    fn select_flow(&mut self) -> waypoint_core::Result<Option<FlowId>> {
        let name = require_line(&mut self.input, "Enter the flow name: ")?;
        let id = self.manager.find_flow_id(name.trim());
        if id.is_none() {
            self.report(&OperationStatus::failure("Flow not found.".to_string()))?;
        }
        Ok(id)
    }

    fn create_flow(&mut self) -> waypoint_core::Result<()> {
        let name = require_line(&mut self.input, "Enter the flow name: ")?;
        let name = name.trim().to_string();
        if name.is_empty() {
            let err = FlowError::invalid_input("flow name").with_reason("cannot be empty");
            return self.report(&OperationStatus::failure(err.to_string()));
        }

        let id = self.manager.create_flow(name.as_str());
        self.manager.audit().record_creation(&name)?;

        loop {
            self.render(&step_kinds_markdown())?;
            let choice = read_menu_choice(
                &mut self.input,
                &mut self.out,
                "Choose a step type: ",
                1,
                10,
            )?;

            if choice == 10 {
                return self.finalize_flow(id);
            }

            match self.build_step(id, choice)? {
                Some(step) => self.add_step(id, step)?,
                None => continue,
            }
        }
    }

    fn add_step(&mut self, id: FlowId, step: Step) -> waypoint_core::Result<()> {
        match self
            .manager
            .add_step_to_flow(id, step, &mut self.input, &mut self.out)
        {
            Ok(StepOutcome::Executed) | Ok(StepOutcome::Failed(_)) => Ok(()),
            Ok(StepOutcome::Skipped) => self.report(&OperationStatus::failure(
                "The flow is already completed; the step was not executed.".to_string(),
            )),
            Err(e) if e.is_recoverable() => self.report(&OperationStatus::failure(e.to_string())),
            Err(e) => Err(e),
        }
    }

    /// Appends the End step, runs the flow once and records it.
    fn finalize_flow(&mut self, id: FlowId) -> waypoint_core::Result<()> {
        self.add_step(id, EndStep.into())?;
        let status = self
            .manager
            .run_flow(id, &mut self.input, &mut self.out)?;

        let flow = self
            .manager
            .flow(id)
            .ok_or(FlowError::FlowNotFound { id: id.0 })?;
        self.manager.audit().record_summary(flow)?;
        self.manager.save_flows_to_file(self.manager.audit().path())?;

        let message = match status {
            RunStatus::Completed { errors } => format!(
                "Flow {} created with {} steps ({errors} error(s) on the first run).",
                flow.name(),
                flow.steps().len()
            ),
            RunStatus::AlreadyCompleted => format!("Flow {} created.", flow.name()),
        };
        self.report(&OperationStatus::success(message))
    }

    /// Asks for the configuration of step kind `choice` (1-9).
    ///
    /// Returns `None` when the step cannot be built in the current flow.
    fn build_step(&mut self, id: FlowId, choice: u32) -> waypoint_core::Result<Option<Step>> {
        let step: Step = match choice {
            1 => TitleStep::default().into(),
            2 => TextStep::default().into(),
            3 => TextInputStep::default().into(),
            4 => {
                let description = require_line(&mut self.input, "Description: ")?;
                NumberInputStep::new(description).into()
            }
            5 => return self.build_calculus(id),
            6 | 7 => {
                let description = require_line(&mut self.input, "Description: ")?;
                let file_name = require_line(&mut self.input, "File name: ")?;
                if choice == 6 {
                    FileInputStep::text(description, file_name.trim()).into()
                } else {
                    FileInputStep::csv(description, file_name.trim()).into()
                }
            }
            8 => {
                let step_count = self.step_count(id);
                let step_index = read_menu_choice(
                    &mut self.input,
                    &mut self.out,
                    "Step number to display: ",
                    1,
                    step_count.max(1),
                )?;
                let content = require_line(&mut self.input, "Content: ")?;
                let file_name = require_line(&mut self.input, "File name: ")?;
                DisplayStep::new(step_index as usize, content, file_name.trim()).into()
            }
            9 => {
                let title = require_line(&mut self.input, "Title: ")?;
                let description = require_line(&mut self.input, "Description: ")?;
                let file_name = require_line(&mut self.input, "File name: ")?;
                let step_index = self.step_count(id) as usize + 1;
                OutputStep::new(step_index, file_name.trim(), title, description).into()
            }
            _ => EndStep.into(),
        };
        Ok(Some(step))
    }

    fn step_count(&self, id: FlowId) -> u32 {
        self.manager
            .flow(id)
            .map_or(0, |flow| u32::try_from(flow.steps().len()).unwrap_or(u32::MAX))
    }

    /// Picks the operation and the number inputs a calculus step uses.
    fn build_calculus(&mut self, id: FlowId) -> waypoint_core::Result<Option<Step>> {
        let numbers: Vec<(usize, String)> = self
            .manager
            .flow(id)
            .map(|flow| {
                flow.steps()
                    .iter()
                    .enumerate()
                    .filter_map(|(index, step)| {
                        step.as_number_input()
                            .map(|number| (index, number.description.clone()))
                    })
                    .collect()
            })
            .unwrap_or_default();

        if numbers.is_empty() {
            self.report(&OperationStatus::failure(
                "Add a number input step before a calculus step.".to_string(),
            ))?;
            return Ok(None);
        }

        let names: Vec<_> = Operation::ALL.iter().map(Operation::as_str).collect();
        let prompt = format!("Operation ({}): ", names.join(", "));
        let operation = require_line(&mut self.input, &prompt)?;

        writeln!(self.out, "Number input steps:")?;
        for (position, (index, description)) in numbers.iter().enumerate() {
            writeln!(self.out, "{}. {description} (step {})", position + 1, index + 1)?;
        }
        let max = u32::try_from(numbers.len()).unwrap_or(u32::MAX);
        let count = read_menu_choice(
            &mut self.input,
            &mut self.out,
            "How many number inputs does the operation use? ",
            1,
            max,
        )?;

        let mut calculus = CalculusStep::new(count as usize, operation.trim());
        for _ in 0..count {
            let pick = read_menu_choice(
                &mut self.input,
                &mut self.out,
                "Number input to use: ",
                1,
                max,
            )?;
            calculus.add_input(numbers[pick as usize - 1].0);
        }
        Ok(Some(calculus.into()))
    }

    fn list_flows(&mut self) -> waypoint_core::Result<()> {
        let list: FlowList<'_> = self.manager.flows().iter().collect();
        let markdown = list.to_string();
        self.render(&markdown)?;

        let path = self.manager.audit().path().to_path_buf();
        if !path.exists() {
            return Ok(());
        }
        writeln!(self.out, "Audit log {}:", path.display())?;
        for line in self.manager.display_flows_from_file(&path)? {
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }

    fn run_flow(&mut self) -> waypoint_core::Result<()> {
        let Some(id) = self.select_flow()? else {
            return Ok(());
        };

        if let Some(flow) = self.manager.flow(id) {
            let (name, info) = (flow.name().to_string(), flow.steps_info());
            writeln!(self.out, "Flow: {name}")?;
            writeln!(self.out, "Selected steps: {info}")?;
        }

        let status = match self
            .manager
            .run_flow(id, &mut self.input, &mut self.out)?
        {
            RunStatus::Completed { errors } => OperationStatus::success(format!(
                "Flow completed with {errors} error(s)."
            )),
            RunStatus::AlreadyCompleted => {
                OperationStatus::failure("The flow has already been completed.".to_string())
            }
        };
        self.report(&status)
    }

    fn delete_flow(&mut self) -> waypoint_core::Result<()> {
        let Some(id) = self.select_flow()? else {
            return Ok(());
        };

        let status = if self.manager.delete_flow(id) {
            OperationStatus::success("Flow deleted successfully.".to_string())
        } else {
            OperationStatus::failure("Flow not found.".to_string())
        };
        self.report(&status)
    }

    fn show_details(&mut self) -> waypoint_core::Result<()> {
        let Some(id) = self.select_flow()? else {
            return Ok(());
        };

        let markdown = match self.manager.flow(id) {
            Some(flow) => flow.to_string(),
            None => return Err(FlowError::FlowNotFound { id: id.0 }),
        };
        self.render(&markdown)
    }

    fn analyze_flow(&mut self) -> waypoint_core::Result<()> {
        let Some(id) = self.select_flow()? else {
            return Ok(());
        };

        let analysis = self.manager.analyze_flow(id)?;
        if self.json {
            writeln!(self.out, "{}", analysis.to_json()?)?;
            Ok(())
        } else {
            self.render(&analysis.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use tempfile::TempDir;
    use waypoint_core::{FlowManagerBuilder, ScriptedInput};

    use super::*;

    fn run_session(dir: &TempDir, answers: &[&str]) -> (Result<()>, String) {
        run_session_with_log(&dir.path().join("flows.txt"), answers)
    }

    fn run_session_with_log(log: &Path, answers: &[&str]) -> (Result<()>, String) {
        let manager = FlowManagerBuilder::new()
            .with_audit_log_path(Some(log))
            .build()
            .expect("Failed to create manager");
        let mut out = Vec::new();
        let result = Session::new(
            manager,
            TerminalRenderer::new(false),
            ScriptedInput::new(answers.iter().copied()),
            &mut out,
            false,
        )
        .run();
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_step_kinds_markdown_numbers_every_kind() {
        let markdown = step_kinds_markdown();
        assert!(markdown.starts_with("1. **Title Step**"));
        assert!(markdown.contains("10. **End Step**"));
    }

    #[test]
    fn test_create_title_flow_records_log() {
        let dir = TempDir::new().unwrap();
        let (result, shown) = run_session(
            &dir,
            &["1", "Demo", "1", "Hi", "There", "10", "Hi", "There", "0"],
        );

        result.unwrap();
        assert!(shown.contains("Success: Flow Demo created with 2 steps"));
        let log = std::fs::read_to_string(dir.path().join("flows.txt")).unwrap();
        assert!(log.starts_with("Nume proces: Demo\nDemo - Hi - There | End of flow | \n\n"));
        assert!(log.contains("Numele procesului: Demo\nTITLE Step\nTitle: Hi\n"));
    }

    #[test]
    fn test_unknown_flow_is_reported() {
        let dir = TempDir::new().unwrap();
        let (result, shown) = run_session(&dir, &["4", "ghost", "0"]);

        result.unwrap();
        assert!(shown.contains("Error: Flow not found."));
    }

    #[test]
    fn test_calculus_without_number_inputs_is_refused() {
        let dir = TempDir::new().unwrap();
        let (result, shown) = run_session(&dir, &["1", "Calc", "5", "10", "0"]);

        result.unwrap();
        assert!(shown.contains("Add a number input step before a calculus step."));
    }

    #[test]
    fn test_fatal_error_ends_session_and_flushes() {
        let dir = TempDir::new().unwrap();
        let (result, shown) = run_session(&dir, &["1", "Broken", "3", "Name", ""]);

        assert!(result.is_err());
        assert!(shown.contains("Error: Invalid input. Text input cannot be empty"));
        let log = std::fs::read_to_string(dir.path().join("flows.txt")).unwrap();
        assert!(log.contains("Numele procesului: Broken"));
    }

    #[test]
    fn test_input_closed_at_menu_exits_cleanly() {
        let dir = TempDir::new().unwrap();
        let (result, _) = run_session(&dir, &[]);
        result.unwrap();
    }

    #[test]
    fn test_run_shows_flow_and_selected_steps() {
        let dir = TempDir::new().unwrap();
        let (result, shown) = run_session(
            &dir,
            &[
                "1", "Demo", "1", "Hi", "There", "10", "Hi", "There", "3", "Demo", "0",
            ],
        );

        result.unwrap();
        assert!(shown.contains("Flow: Demo\nSelected steps: Hi - There | End of flow | \n"));
        assert!(shown.contains("Error: The flow has already been completed."));
    }

    #[test]
    fn test_close_failure_keeps_fatal_error() {
        let dir = TempDir::new().unwrap();
        // The log path is a directory, so every append to it fails
        let (result, shown) = run_session_with_log(dir.path(), &["1", "Demo", "3"]);

        let err = result.unwrap_err();
        assert!(shown.contains("Error: File system error"));
        assert!(matches!(
            err.downcast_ref::<FlowError>(),
            Some(FlowError::InputClosed { .. })
        ));
        assert!(err
            .to_string()
            .starts_with("Closing the flow manager also failed: File system error"));
    }
}
