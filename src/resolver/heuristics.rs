//! String heuristics for turning a shell command line into the command that
//! fed `ct`. Everything here is pure so it can be tested without touching the
//! process table.
//!
//! These are approximations. A command line that legitimately contains
//! `| <tool>` somewhere else, or whose prompt is not the `└─$` style, will be
//! over- or under-stripped.

use once_cell::sync::Lazy;
use regex::Regex;

/// `┌──(user㉿host)-[~]` / `└─$ ` style prompts leave everything up to and
/// including `└─$` in the rendered line.
static PROMPT_DECORATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^.*?└─\$\s*").expect("valid prompt pattern"));

static JOB_INDEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\d+\s*").expect("valid index pattern"));

/// Matches a pipe into the tool and everything after it.
#[derive(Debug, Clone)]
pub struct ToolPattern {
    tool_name: String,
    regex: Regex,
}

impl ToolPattern {
    pub fn new(tool_name: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!(r"(?s)\s*\|\s*{}.*$", regex::escape(tool_name)))?;
        Ok(Self {
            tool_name: tool_name.to_string(),
            regex,
        })
    }

    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    /// Removes the `| <tool> ...` tail and trims what is left.
    pub fn strip_tool_invocation(&self, line: &str) -> String {
        self.regex.replace(line, "").trim().to_string()
    }

    /// Cleans a line as rendered by `ps`: prompt decoration, then a leading
    /// job/history index, then the `| <tool>` tail.
    pub fn clean_rendered_line(&self, line: &str) -> String {
        let line = strip_prompt_decoration(line);
        let line = strip_job_index(&line);
        self.strip_tool_invocation(&line)
    }
}

/// The argument following the first `-c`, i.e. the script a shell was asked
/// to run.
pub fn extract_shell_command(argv: &[String]) -> Option<&str> {
    let idx = argv.iter().position(|arg| arg == "-c")?;
    argv.get(idx + 1).map(String::as_str)
}

pub fn strip_prompt_decoration(line: &str) -> String {
    PROMPT_DECORATION.replace(line, "").into_owned()
}

pub fn strip_job_index(line: &str) -> String {
    JOB_INDEX.replace(line, "").into_owned()
}
