//! Best-effort recovery of the shell command that piped into `ct`.
//!
//! Two tiers are tried against the parent process:
//!
//! 1. its argument vector, looking for a shell `-c <script>` invocation;
//! 2. the line `ps` renders for it, cleaned of prompt decoration.
//!
//! Any failure is logged as a warning and reported as "not detected".

pub mod heuristics;
pub mod introspect;

use std::io;

use thiserror::Error;
use tracing::{debug, warn};

use crate::process::UtilityError;

pub use heuristics::ToolPattern;
pub use introspect::{
    DefaultIntrospector, ProcessIntrospector, ProcfsIntrospector, SysinfoIntrospector,
    default_introspector, parent_pid,
};

/// Fallback used when `argv[0]` gives nothing usable.
pub const DEFAULT_TOOL_NAME: &str = "ct";

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("cannot read command line of process {pid}: {source}")]
    Io {
        pid: u32,
        #[source]
        source: io::Error,
    },

    #[error("process {0} not found")]
    ProcessNotFound(u32),

    #[error("command line of process {0} is not valid UTF-8")]
    InvalidUtf8(u32),

    #[error("process status query failed: {0}")]
    Utility(#[from] UtilityError),

    #[error("parent process id unavailable")]
    NoParent,
}

pub struct Resolver<I: ProcessIntrospector = DefaultIntrospector> {
    introspector: I,
    pattern: ToolPattern,
}

impl Resolver<DefaultIntrospector> {
    pub fn for_tool(tool_name: &str) -> Result<Self, regex::Error> {
        Ok(Self::new(default_introspector(), ToolPattern::new(tool_name)?))
    }
}

impl<I: ProcessIntrospector> Resolver<I> {
    pub fn new(introspector: I, pattern: ToolPattern) -> Self {
        Self {
            introspector,
            pattern,
        }
    }

    /// Reconstructs the command for `pid`, or `None` if nothing usable was
    /// found. Never fails.
    pub fn resolve(&self, pid: u32) -> Option<String> {
        match self.try_resolve(pid) {
            Ok(cmd) if cmd.is_empty() => {
                debug!(pid, "parent command resolved to an empty string");
                None
            }
            Ok(cmd) => {
                debug!(pid, command = %cmd, "resolved parent command");
                Some(cmd)
            }
            Err(e) => {
                warn!("command detection warning: {e}");
                None
            }
        }
    }

    /// Resolves the command of this process's parent.
    pub fn resolve_parent(&self) -> Option<String> {
        match parent_pid() {
            Some(pid) => self.resolve(pid),
            None => {
                warn!("command detection warning: {}", ResolveError::NoParent);
                None
            }
        }
    }

    fn try_resolve(&self, pid: u32) -> Result<String, ResolveError> {
        let argv = self.introspector.argv(pid)?;
        if let Some(script) = heuristics::extract_shell_command(&argv) {
            debug!(pid, script, "parent was invoked with -c");
            return Ok(self.pattern.strip_tool_invocation(script));
        }

        let rendered = self.introspector.rendered_args(pid)?;
        debug!(pid, rendered = %rendered, "falling back to rendered process args");
        Ok(self.pattern.clean_rendered_line(&rendered))
    }
}

/// The name `ct` was invoked under, used to find it in the parent's
/// command line.
pub fn tool_name_from_argv0(argv0: Option<&str>) -> String {
    argv0
        .map(std::path::Path::new)
        .and_then(|p| p.file_stem())
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_TOOL_NAME)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    struct FakeIntrospector {
        argv: Result<Vec<&'static str>, ()>,
        rendered: Result<&'static str, ()>,
        rendered_calls: Cell<u32>,
    }

    impl FakeIntrospector {
        fn new(argv: Result<Vec<&'static str>, ()>, rendered: Result<&'static str, ()>) -> Self {
            Self {
                argv,
                rendered,
                rendered_calls: Cell::new(0),
            }
        }
    }

    impl ProcessIntrospector for FakeIntrospector {
        fn argv(&self, pid: u32) -> Result<Vec<String>, ResolveError> {
            self.argv
                .clone()
                .map(|v| v.into_iter().map(String::from).collect())
                .map_err(|_| ResolveError::ProcessNotFound(pid))
        }

        fn rendered_args(&self, _pid: u32) -> Result<String, ResolveError> {
            self.rendered_calls.set(self.rendered_calls.get() + 1);
            self.rendered
                .map(String::from)
                .map_err(|_| {
                    ResolveError::Utility(UtilityError::Spawn {
                        program: "ps".to_string(),
                        source: io::Error::from(io::ErrorKind::NotFound),
                    })
                })
        }
    }

    fn resolver(fake: FakeIntrospector) -> Resolver<FakeIntrospector> {
        Resolver::new(fake, ToolPattern::new("ct").unwrap())
    }

    #[test]
    fn test_resolves_shell_dash_c() {
        let r = resolver(FakeIntrospector::new(
            Ok(vec!["/bin/bash", "-c", "echo hello world | ct -m"]),
            Err(()),
        ));
        assert_eq!(r.resolve(100), Some("echo hello world".to_string()));
        assert_eq!(r.introspector.rendered_calls.get(), 0);
    }

    #[test]
    fn test_falls_back_to_rendered_line() {
        let r = resolver(FakeIntrospector::new(
            Ok(vec!["-zsh"]),
            Ok("  3  seq 1 3 | ct -c"),
        ));
        assert_eq!(r.resolve(100), Some("seq 1 3".to_string()));
        assert_eq!(r.introspector.rendered_calls.get(), 1);
    }

    #[test]
    fn test_argv_failure_is_not_detected() {
        let r = resolver(FakeIntrospector::new(Err(()), Ok("bash")));
        assert_eq!(r.resolve(100), None);
    }

    #[test]
    fn test_fallback_failure_is_not_detected() {
        let r = resolver(FakeIntrospector::new(Ok(vec!["bash"]), Err(())));
        assert_eq!(r.resolve(100), None);
    }

    #[test]
    fn test_empty_result_is_not_detected() {
        let r = resolver(FakeIntrospector::new(Ok(vec!["sh", "-c", "| ct"]), Err(())));
        assert_eq!(r.resolve(100), None);
    }

    #[test]
    fn test_utility_error_keeps_its_cause() {
        use std::error::Error as _;

        let err = ResolveError::from(UtilityError::Failed {
            program: "ps".to_string(),
            code: Some(1),
            stderr: "no such process".to_string(),
        });
        assert!(err.to_string().contains("no such process"));
        let cause = err.source().unwrap().downcast_ref::<UtilityError>();
        assert!(matches!(cause, Some(UtilityError::Failed { code: Some(1), .. })));
    }

    #[test]
    fn test_tool_name_from_argv0() {
        assert_eq!(tool_name_from_argv0(Some("/usr/local/bin/ct")), "ct");
        assert_eq!(tool_name_from_argv0(Some("clipcat")), "clipcat");
        assert_eq!(tool_name_from_argv0(Some("")), DEFAULT_TOOL_NAME);
        assert_eq!(tool_name_from_argv0(None), DEFAULT_TOOL_NAME);
    }
}
