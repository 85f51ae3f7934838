use clap::{ArgAction, Parser};

use crate::payload::{Format, InvocationRequest, Mode};

const EXAMPLES: &str = "Examples:
  echo 'test' | ct
  cat file.txt | ct -b
  seq 1 3 | ct -m";

#[derive(Parser, Debug)]
#[command(name = "ct", version)]
#[command(about = "ct - Tee-like tool with clipboard integration", long_about = None)]
#[command(after_help = EXAMPLES)]
pub struct Cli {
    /// Copy both command and output
    #[arg(short, long)]
    pub both: bool,

    /// Copy only the executed command
    #[arg(short, long)]
    pub command_only: bool,

    /// Format as markdown inline code (`text`)
    #[arg(short = 'm', long)]
    pub markdown_inline: bool,

    /// Format as markdown code block (```text```)
    #[arg(short = 'M', long)]
    pub markdown_block: bool,

    /// Print more diagnostics to stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Collapses the flags into a request. Command-only beats both, and
    /// inline markdown beats block markdown.
    pub fn request(&self) -> InvocationRequest {
        let mode = if self.command_only {
            Mode::CommandOnly
        } else if self.both {
            Mode::Both
        } else {
            Mode::PlainOutput
        };

        let format = if self.markdown_inline {
            Format::MarkdownInline
        } else if self.markdown_block {
            Format::MarkdownBlock
        } else {
            Format::Raw
        };

        InvocationRequest::new(mode, format)
    }

    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
