use std::io;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("failed to write payload to {program}: {source}")]
    Write {
        program: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("failed to wait for {program}: {source}")]
    Wait {
        program: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited with {status}")]
    Failed {
        program: &'static str,
        status: ExitStatus,
    },

    #[error("clipboard backend error: {0}")]
    Backend(String),
}

/// Destination for the final payload. Called at most once per run.
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The platform clipboard.
///
/// On Linux the payload is piped into `xclip -selection clipboard`, which
/// forks and keeps serving the selection after `ct` exits. Elsewhere
/// `arboard` talks to the native clipboard directly.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let text = text.trim();
        tracing::debug!(bytes = text.len(), "copying payload to clipboard");

        #[cfg(target_os = "linux")]
        {
            copy_xclip(text)
        }

        #[cfg(not(target_os = "linux"))]
        {
            copy_arboard(text)
        }
    }
}

#[cfg(target_os = "linux")]
fn copy_xclip(text: &str) -> Result<(), ClipboardError> {
    pipe_to_selection_owner("xclip", &["-selection", "clipboard"], text)
}

/// Feeds `text` to a program that forks and keeps owning the selection.
///
/// The forked owner must not hold our stdout or stderr, or whatever reads
/// them downstream would stay open until the selection changes hands.
#[cfg(any(target_os = "linux", all(test, unix)))]
fn pipe_to_selection_owner(
    program: &'static str,
    args: &[&str],
    text: &str,
) -> Result<(), ClipboardError> {
    use std::io::Write;
    use std::process::{Command, Stdio};

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| ClipboardError::Spawn { program, source })?;

    // Dropping stdin closes the pipe so the program sees EOF.
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(text.as_bytes()),
        None => Ok(()),
    };

    let status = child
        .wait()
        .map_err(|source| ClipboardError::Wait { program, source })?;
    written.map_err(|source| ClipboardError::Write { program, source })?;

    if status.success() {
        Ok(())
    } else {
        Err(ClipboardError::Failed { program, status })
    }
}

#[cfg(not(target_os = "linux"))]
fn copy_arboard(text: &str) -> Result<(), ClipboardError> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
    clipboard
        .set_text(text)
        .map_err(|e| ClipboardError::Backend(e.to_string()))
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingClipboard;
    use super::*;

    #[test]
    fn test_recording_clipboard_trims() {
        let mut clipboard = RecordingClipboard::default();
        clipboard.set_text("  hi\n").unwrap();
        assert_eq!(clipboard.payloads, vec!["hi".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn test_pipe_to_selection_owner_delivers_payload() {
        let script = "test \"$(cat)\" = 'hello world'";
        pipe_to_selection_owner("sh", &["-c", script], "hello world").unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_pipe_to_selection_owner_reports_exit_status() {
        let err =
            pipe_to_selection_owner("sh", &["-c", "cat >/dev/null; exit 4"], "x").unwrap_err();
        assert!(matches!(
            err,
            ClipboardError::Failed { program: "sh", status } if status.code() == Some(4)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_write_failure_is_not_reported_as_wait_failure() {
        // The program exits without reading, so a large payload hits a closed pipe.
        let payload = "x".repeat(1 << 20);
        let err = pipe_to_selection_owner("sh", &["-c", "exit 0"], &payload).unwrap_err();
        assert!(matches!(err, ClipboardError::Write { program: "sh", .. }));
        assert!(err.to_string().starts_with("failed to write payload to sh"));
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_program_is_spawn_error() {
        let err =
            pipe_to_selection_owner("definitely-not-a-real-program-ct", &[], "x").unwrap_err();
        assert!(matches!(err, ClipboardError::Spawn { .. }));
    }

    #[test]
    fn test_error_messages_carry_cause() {
        let err = ClipboardError::Spawn {
            program: "xclip",
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.to_string(), "failed to spawn xclip: not found");

        let err = ClipboardError::Unavailable("no display".to_string());
        assert!(err.to_string().contains("no display"));
    }
}
