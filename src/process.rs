use std::io;
use std::process::{Command, Stdio};
use std::string::FromUtf8Error;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UtilityError {
    #[error("cannot run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited with code {code:?}: {stderr}")]
    Failed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{program} printed non-UTF-8 output")]
    InvalidOutput {
        program: String,
        #[source]
        source: FromUtf8Error,
    },
}

/// Runs a read-only system utility such as `ps` and returns its trimmed
/// stdout. Stdin is closed so the utility can never wait on our pipeline.
pub fn query_utility(program: &str, args: &[&str]) -> Result<String, UtilityError> {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| UtilityError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(UtilityError::Failed {
            program: program.to_string(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let stdout = String::from_utf8(output.stdout).map_err(|source| UtilityError::InvalidOutput {
        program: program.to_string(),
        source,
    })?;

    Ok(stdout.trim().to_string())
}
