//! Value-supplying capability consumed by step execution.
//!
//! Steps never touch stdin directly. They ask an [`InputSource`] for lines,
//! which lets the interactive session hand them the terminal while tests and
//! scripts hand them a [`ScriptedInput`].

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use log::debug;

use crate::error::{FlowError, Result};

/// Line- and token-based reads with a prompt.
pub trait InputSource {
    /// Shows `prompt` and reads one line, without its line terminator.
    ///
    /// Returns `Ok(None)` once the source is exhausted.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Shows `prompt` and reads the first whitespace-separated token,
    /// skipping blank lines the way a stream extraction would.
    fn read_token(&mut self, prompt: &str) -> Result<Option<String>> {
        loop {
            match self.read_line(prompt)? {
                Some(line) => {
                    if let Some(token) = line.split_whitespace().next() {
                        return Ok(Some(token.to_string()));
                    }
                }
                None => return Ok(None),
            }
        }
    }
}

/// Reads a line, treating an exhausted source as an error.
pub fn require_line(input: &mut dyn InputSource, prompt: &str) -> Result<String> {
    input
        .read_line(prompt)?
        .ok_or_else(|| FlowError::InputClosed {
            prompt: prompt.to_string(),
        })
}

/// Reads a token, treating an exhausted source as an error.
pub fn require_token(input: &mut dyn InputSource, prompt: &str) -> Result<String> {
    input
        .read_token(prompt)?
        .ok_or_else(|| FlowError::InputClosed {
            prompt: prompt.to_string(),
        })
}

/// Prompts until the answer parses as a number.
///
/// Malformed answers are reported on `out` and asked again; they never end
/// the read.
pub fn read_number(input: &mut dyn InputSource, out: &mut dyn Write, prompt: &str) -> Result<f64> {
    loop {
        let line = require_line(input, prompt)?;
        match line.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => return Ok(value),
            _ => {
                debug!("Rejected numeric input {line:?}");
                writeln!(out, "Invalid input. Please enter a valid number.")?;
            }
        }
    }
}

/// Prompts until the answer is an integer within `min..=max`.
pub fn read_menu_choice(
    input: &mut dyn InputSource,
    out: &mut dyn Write,
    prompt: &str,
    min: u32,
    max: u32,
) -> Result<u32> {
    loop {
        let token = require_token(input, prompt)?;
        match token.parse::<u32>() {
            Ok(choice) if (min..=max).contains(&choice) => return Ok(choice),
            _ => writeln!(
                out,
                "Invalid option. Please enter an option between {min} and {max}."
            )?,
        }
    }
}

/// Asks a yes/no question; only an answer starting with `y` or `d` counts as
/// yes.
pub fn read_confirmation(input: &mut dyn InputSource, prompt: &str) -> Result<bool> {
    let answer = require_token(input, prompt)?;
    Ok(matches!(
        answer.chars().next(),
        Some('y' | 'Y' | 'd' | 'D')
    ))
}

/// Input source over any buffered reader, echoing prompts to a writer.
pub struct LineInput<R, W> {
    reader: R,
    prompt_sink: W,
}

impl<R: BufRead, W: Write> LineInput<R, W> {
    /// Create an input source reading from `reader` and prompting on
    /// `prompt_sink`.
    pub fn new(reader: R, prompt_sink: W) -> Self {
        Self {
            reader,
            prompt_sink,
        }
    }
}

impl<R: BufRead, W: Write> InputSource for LineInput<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.prompt_sink, "{prompt}")?;
        self.prompt_sink.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }
}

/// Input source answering prompts from a fixed list of lines.
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedInput {
    /// Create a scripted source that yields `lines` in order.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Queue another answer.
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push_back(line.into());
    }

    /// Number of answers not consumed yet.
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }

    /// Every prompt shown so far, in order.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl InputSource for ScriptedInput {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.lines.pop_front())
    }
}
