//! Line-oriented read-eval-print loop around a [`ChatSession`].

use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::warn;

use super::chat::ChatSession;
use crate::config::Messages;
use crate::model::InferenceError;

/// A failure confined to a single turn. The loop reports it and goes on.
#[derive(Error, Debug)]
pub enum TurnError {
    #[error(transparent)]
    Inference(#[from] InferenceError),
    #[error("could not read input: {0}")]
    Input(io::Error),
}

/// Read one line, dropping only the line terminator.
///
/// Returns `Ok(None)` at end of input. Undecodable lines are a turn error;
/// any other I/O failure is returned as fatal.
fn read_turn_line<R: BufRead>(input: &mut R) -> io::Result<Option<Result<String, TurnError>>> {
    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) => Ok(None),
        Ok(_) => {
            if line.ends_with('\n') {
                line.pop();
                if line.ends_with('\r') {
                    line.pop();
                }
            }
            Ok(Some(Ok(line)))
        }
        Err(e) if e.kind() == io::ErrorKind::InvalidData => Ok(Some(Err(TurnError::Input(e)))),
        Err(e) => Err(e),
    }
}

/// Run the interactive chat until the sentinel line or end of input.
///
/// # Arguments
/// * `session` - Session that receives every non-sentinel line, including empty ones.
/// * `system_prompt` - Instruction sent with every turn.
/// * `messages` - Localized labels and the sentinel.
/// * `input` / `output` - Console streams.
pub async fn run_interactive<R, W>(
    session: &mut ChatSession,
    system_prompt: Option<&str>,
    messages: &Messages,
    mut input: R,
    mut output: W,
) -> io::Result<()>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "{}", messages.greeting)?;

    loop {
        write!(output, "{}", messages.user_label)?;
        output.flush()?;

        let line = match read_turn_line(&mut input)? {
            Some(line) => line,
            None => {
                writeln!(output)?;
                writeln!(output, "{}", messages.farewell)?;
                return Ok(());
            }
        };

        let turn = match line {
            Ok(line) if line == messages.sentinel => {
                writeln!(output, "{}", messages.farewell)?;
                return Ok(());
            }
            Ok(line) => session
                .generate(&line, system_prompt)
                .await
                .map_err(TurnError::from),
            Err(e) => Err(e),
        };

        match turn {
            Ok(reply) => writeln!(output, "{}{}", messages.assistant_label, reply)?,
            Err(e) => {
                warn!(error = %e, "chat turn failed");
                writeln!(output, "{}{}", messages.error_label, e)?;
            }
        }
    }
}
