//! Read-only views of another process's command line.

use std::fs;

use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};

use super::ResolveError;
use crate::process::query_utility;

pub trait ProcessIntrospector {
    /// The raw argument vector the OS recorded for `pid`.
    fn argv(&self, pid: u32) -> Result<Vec<String>, ResolveError>;

    /// The single line `ps` renders for `pid`.
    fn rendered_args(&self, pid: u32) -> Result<String, ResolveError> {
        ps_args(pid)
    }
}

/// Linux backend reading `/proc/<pid>/cmdline`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcfsIntrospector;

impl ProcessIntrospector for ProcfsIntrospector {
    fn argv(&self, pid: u32) -> Result<Vec<String>, ResolveError> {
        let raw = fs::read(format!("/proc/{pid}/cmdline"))
            .map_err(|source| ResolveError::Io { pid, source })?;
        split_cmdline(pid, &raw)
    }
}

/// Portable backend using `sysinfo`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SysinfoIntrospector;

impl ProcessIntrospector for SysinfoIntrospector {
    fn argv(&self, pid: u32) -> Result<Vec<String>, ResolveError> {
        let mut sys = System::new();
        let sys_pid = Pid::from_u32(pid);
        sys.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[sys_pid]),
            true,
            ProcessRefreshKind::nothing().with_cmd(UpdateKind::Always),
        );

        let process = sys
            .process(sys_pid)
            .ok_or(ResolveError::ProcessNotFound(pid))?;

        process
            .cmd()
            .iter()
            .filter(|arg| !arg.is_empty())
            .map(|arg| {
                arg.to_str()
                    .map(str::to_string)
                    .ok_or(ResolveError::InvalidUtf8(pid))
            })
            .collect()
    }
}

#[cfg(target_os = "linux")]
pub type DefaultIntrospector = ProcfsIntrospector;

#[cfg(not(target_os = "linux"))]
pub type DefaultIntrospector = SysinfoIntrospector;

pub fn default_introspector() -> DefaultIntrospector {
    DefaultIntrospector::default()
}

/// Parent of the current process.
#[cfg(unix)]
pub fn parent_pid() -> Option<u32> {
    Some(std::os::unix::process::parent_id())
}

#[cfg(not(unix))]
pub fn parent_pid() -> Option<u32> {
    let mut sys = System::new();
    let me = sysinfo::get_current_pid().ok()?;
    sys.refresh_processes(ProcessesToUpdate::Some(&[me]), true);
    sys.process(me)?.parent().map(|pid| pid.as_u32())
}

fn split_cmdline(pid: u32, raw: &[u8]) -> Result<Vec<String>, ResolveError> {
    raw.split(|b| *b == 0)
        .filter(|part| !part.is_empty())
        .map(|part| {
            String::from_utf8(part.to_vec()).map_err(|_| ResolveError::InvalidUtf8(pid))
        })
        .collect()
}

fn ps_args(pid: u32) -> Result<String, ResolveError> {
    let pid_arg = pid.to_string();
    Ok(query_utility("ps", &["-p", &pid_arg, "-o", "args="])?)
}
