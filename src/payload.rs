/// Placeholder used wherever the parent command could not be recovered.
pub const COMMAND_NOT_DETECTED: &str = "[command not detected]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    PlainOutput,
    CommandOnly,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Raw,
    MarkdownInline,
    MarkdownBlock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvocationRequest {
    pub mode: Mode,
    pub format: Format,
}

impl InvocationRequest {
    pub fn new(mode: Mode, format: Format) -> Self {
        Self { mode, format }
    }

    /// Whether this request needs the parent command to be resolved.
    pub fn needs_command(&self) -> bool {
        matches!(self.mode, Mode::CommandOnly | Mode::Both)
    }
}

impl Default for InvocationRequest {
    fn default() -> Self {
        Self::new(Mode::PlainOutput, Format::Raw)
    }
}

pub fn compose(mode: Mode, input: &str, command: Option<&str>) -> String {
    let command = command.unwrap_or(COMMAND_NOT_DETECTED);
    match mode {
        Mode::CommandOnly => command.to_string(),
        Mode::Both => format!("Command:\n{command}\n\nOutput:\n{input}"),
        Mode::PlainOutput => input.to_string(),
    }
}

pub fn wrap(format: Format, payload: &str) -> String {
    match format {
        Format::MarkdownInline => format!("`{payload}`"),
        Format::MarkdownBlock => format!("```\n{payload}\n```"),
        Format::Raw => payload.to_string(),
    }
}

/// Builds the clipboard payload for a request: mode selection first, then
/// markdown wrapping.
pub fn build_payload(request: &InvocationRequest, input: &str, command: Option<&str>) -> String {
    wrap(request.format, &compose(request.mode, input, command))
}
