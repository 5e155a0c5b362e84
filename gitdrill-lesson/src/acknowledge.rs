//! The pause between levels, where the operator goes and looks at the remote.

use std::io::{self, BufRead, Write};

use colored::Colorize;

use crate::error::LessonError;
use crate::report::LevelReport;

/// Blocks until the operator is ready for the next level.
pub trait Acknowledge {
    fn acknowledge(&mut self, report: &LevelReport) -> Result<(), LessonError>;
}

/// Never pauses. Used by `--yes` and by tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoAcknowledge;

impl Acknowledge for AutoAcknowledge {
    fn acknowledge(&mut self, _report: &LevelReport) -> Result<(), LessonError> {
        Ok(())
    }
}

/// Prints a level summary and waits for a line on `input`.
///
/// End of input counts as an acknowledgement so piped runs finish.
pub struct StdinPrompt<R, W> {
    input: R,
    output: W,
}

impl StdinPrompt<io::StdinLock<'static>, io::Stderr> {
    pub fn new() -> Self {
        Self {
            input: io::stdin().lock(),
            output: io::stderr(),
        }
    }
}

impl Default for StdinPrompt<io::StdinLock<'static>, io::Stderr> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: BufRead, W: Write> StdinPrompt<R, W> {
    pub fn with_io(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn write_summary(&mut self, report: &LevelReport) -> io::Result<()> {
        let status = if report.succeeded() {
            "done".green().bold()
        } else {
            "done with failures".yellow().bold()
        };
        writeln!(
            self.output,
            "{} level {} ({}) by {}: {status}",
            "==>".blue().bold(),
            report.level,
            report.description,
            report.actor.as_str().cyan(),
        )?;
        for step in report.failed_steps() {
            let detail = step
                .error
                .clone()
                .or_else(|| {
                    step.commands
                        .iter()
                        .find(|c| !c.success && !c.tolerated)
                        .map(|c| format!("{}: {}", c.command, c.diagnostic))
                })
                .unwrap_or_default();
            writeln!(self.output, "    {} {} {detail}", "x".red(), step.verb)?;
        }
        write!(
            self.output,
            "    Inspect the remote, pull in your own clone, then press {} to continue ",
            "Enter".bold()
        )?;
        self.output.flush()
    }
}

impl<R: BufRead, W: Write> Acknowledge for StdinPrompt<R, W> {
    fn acknowledge(&mut self, report: &LevelReport) -> Result<(), LessonError> {
        self.write_summary(report).map_err(LessonError::Acknowledge)?;
        let mut line = String::new();
        self.input
            .read_line(&mut line)
            .map_err(LessonError::Acknowledge)?;
        Ok(())
    }
}
