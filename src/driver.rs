use std::io::{Read, Write};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::clipboard::ClipboardSink;
use crate::payload::{InvocationRequest, build_payload};
use crate::resolver::{ProcessIntrospector, Resolver};

/// Supplies the command that produced our input, if it can be found.
pub trait CommandSource {
    fn parent_command(&self) -> Option<String>;
}

impl<I: ProcessIntrospector> CommandSource for Resolver<I> {
    fn parent_command(&self) -> Option<String> {
        self.resolve_parent()
    }
}

impl<F: Fn() -> Option<String>> CommandSource for F {
    fn parent_command(&self) -> Option<String> {
        self()
    }
}

/// Runs one pipeline stage: payload to the clipboard, input through to `out`.
pub struct Driver<S: CommandSource, C: ClipboardSink> {
    commands: S,
    clipboard: C,
}

impl<S: CommandSource, C: ClipboardSink> Driver<S, C> {
    pub fn new(commands: S, clipboard: C) -> Self {
        Self {
            commands,
            clipboard,
        }
    }

    /// The whole stage as seen from the shell. A terminal on stdin means
    /// nothing was piped in, so `help` is printed and the clipboard is left
    /// alone; otherwise `input` is read to the end and handed to [`run`].
    ///
    /// [`run`]: Driver::run
    pub fn run_stage<R: Read, W: Write>(
        &mut self,
        request: &InvocationRequest,
        stdin_is_terminal: bool,
        mut input: R,
        help: &str,
        out: &mut W,
    ) -> Result<()> {
        if stdin_is_terminal {
            writeln!(out, "{}", help.trim_end()).context("Failed to print help")?;
            return Ok(());
        }

        let mut text = String::new();
        input
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        debug!(bytes = text.len(), "read stdin");

        self.run(request, &text, out)
    }

    /// Copies the payload for `request`, then echoes the trimmed input.
    ///
    /// Nothing is written to `out` if the clipboard rejects the payload.
    pub fn run<W: Write>(
        &mut self,
        request: &InvocationRequest,
        input: &str,
        out: &mut W,
    ) -> Result<()> {
        let input = input.trim();

        let command = if request.needs_command() {
            self.commands.parent_command()
        } else {
            None
        };

        let payload = build_payload(request, input, command.as_deref());
        info!(mode = ?request.mode, format = ?request.format, "copying to clipboard");
        self.clipboard
            .set_text(&payload)
            .context("Clipboard error")?;

        writeln!(out, "{input}").context("Failed to write to stdout")?;
        out.flush().context("Failed to flush stdout")?;
        Ok(())
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }
}
