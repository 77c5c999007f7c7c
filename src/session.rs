//! Interactive session loop
//!
//! Reads one line at a time, dispatches `help`, `quit`/`exit` and blank
//! lines locally, and hands everything else to the [`InferenceAdapter`].

use crate::adapter::InferenceAdapter;
use crate::converse::ModelInvoker;
use crate::error::AppResult;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Prompt printed before every read
pub const PROMPT: &str = "> ";

pub const HELP_TEXT: &str = "\
Available commands:
  help           - Show this help message
  quit/exit      - Exit the application

Or simply type a message to chat with the model.
";

pub const FAREWELL: &str = "Goodbye!";

/// What a single input line asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Help,
    Empty,
    /// Send the line, exactly as typed, to the model
    Message(String),
}

impl Command {
    /// Classify a line (without its line terminator)
    ///
    /// Keywords are matched on the trimmed, lower-cased line; messages keep
    /// their original text.
    pub fn parse(line: &str) -> Self {
        let normalized = line.trim().to_lowercase();
        match normalized.as_str() {
            "quit" | "exit" => Self::Quit,
            "help" => Self::Help,
            "" => Self::Empty,
            _ => Self::Message(line.to_string()),
        }
    }
}

/// The read-dispatch-print loop
pub struct Session<I> {
    adapter: InferenceAdapter<I>,
}

impl<I: ModelInvoker> Session<I> {
    pub fn new(adapter: InferenceAdapter<I>) -> Self {
        Self { adapter }
    }

    pub fn adapter(&self) -> &InferenceAdapter<I> {
        &self.adapter
    }

    /// Run until end of input or an exit keyword
    ///
    /// Model failures are rendered by the adapter and never end the loop.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Io`](crate::error::AppError::Io) only if reading
    /// `input` or writing `output` fails.
    pub async fn run<R, W>(&self, mut input: R, output: &mut W) -> AppResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        self.print_banner(output)?;

        let mut buf = Vec::new();
        let mut turns = 0usize;
        loop {
            write!(output, "{}", PROMPT)?;
            output.flush()?;

            buf.clear();
            if input.read_until(b'\n', &mut buf).await? == 0 {
                tracing::debug!("End of input");
                break;
            }
            let raw = String::from_utf8_lossy(&buf);
            let line = raw.trim_end_matches(['\n', '\r']);

            match Command::parse(line) {
                Command::Quit => break,
                Command::Help => output.write_all(HELP_TEXT.as_bytes())?,
                Command::Empty => continue,
                Command::Message(text) => {
                    turns += 1;
                    tracing::debug!(turn = turns, length = text.len(), "Sending user message");
                    self.adapter.send(&text, output).await?;
                }
            }
        }

        writeln!(output, "\n{}", FAREWELL)?;
        output.flush()?;
        tracing::info!(turns, "Session ended");
        Ok(())
    }

    fn print_banner<W: Write>(&self, output: &mut W) -> AppResult<()> {
        writeln!(output, "AWS Bedrock Amazon Nova Console")?;
        writeln!(output, "================================")?;
        writeln!(output, "Enter 'quit' or 'exit' to terminate")?;
        writeln!(output, "Enter 'help' for available commands")?;
        writeln!(output, "Current model: {}", self.adapter.settings().model_id())?;
        writeln!(output)?;
        Ok(())
    }
}
