//! Operator decisions for per-entity and per-file confirmation.
//!
//! Every "generate this entity?" and "overwrite this file?" question goes
//! through a [`DecisionProvider`], so the generator does not care whether
//! answers come from a terminal, a batch run or a test script.

use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Failed to write prompt: {message}")]
    WriteFailed { message: String },

    #[error("Failed to read answer: {message}")]
    ReadFailed { message: String },
}

/// Outcome of a single confirmation question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    Skip,
    /// Proceed, and stop asking for the rest of the run.
    ProceedAll,
}

impl Decision {
    /// Interpret a free-text answer. Empty and unrecognised answers mean yes.
    pub fn from_answer(answer: &str) -> Self {
        match answer.trim().to_ascii_lowercase().as_str() {
            "n" | "no" => Decision::Skip,
            "a" | "all" => Decision::ProceedAll,
            _ => Decision::Proceed,
        }
    }
}

pub trait DecisionProvider {
    fn decide(&mut self, question: &str) -> Result<Decision, PromptError>;
}

/// Asks the operator on a terminal-like pair of streams.
pub struct InteractiveDecisions<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> InteractiveDecisions<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl InteractiveDecisions<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> DecisionProvider for InteractiveDecisions<R, W> {
    fn decide(&mut self, question: &str) -> Result<Decision, PromptError> {
        write!(self.output, "{} [y/n/all]? ", question)
            .and_then(|_| self.output.flush())
            .map_err(|e| PromptError::WriteFailed {
                message: e.to_string(),
            })?;

        let mut line = Vec::new();
        let read = self
            .input
            .read_until(b'\n', &mut line)
            .map_err(|e| PromptError::ReadFailed {
                message: e.to_string(),
            })?;

        if read == 0 {
            debug!(question, "input closed, using default answer");
            // Keep the terminal output on its own line after EOF.
            writeln!(self.output).map_err(|e| PromptError::WriteFailed {
                message: e.to_string(),
            })?;
        }

        // Undecodable input is just another unrecognised answer.
        Ok(Decision::from_answer(&String::from_utf8_lossy(&line)))
    }
}

/// Non-interactive mode: answers "all" to everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct BatchDecisions;

impl DecisionProvider for BatchDecisions {
    fn decide(&mut self, question: &str) -> Result<Decision, PromptError> {
        debug!(question, "auto-confirmed");
        Ok(Decision::ProceedAll)
    }
}

/// One "apply to all remaining" flag guarding a series of questions.
#[derive(Debug, Default)]
pub struct ApplyAllGate {
    all: bool,
}

impl ApplyAllGate {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn is_open(&self) -> bool {
        self.all
    }

    /// Ask `question` unless an earlier answer already applied to all.
    ///
    /// Returns whether the item should be processed.
    pub fn confirm(
        &mut self,
        provider: &mut dyn DecisionProvider,
        question: &str,
    ) -> Result<bool, PromptError> {
        if self.all {
            return Ok(true);
        }
        match provider.decide(question)? {
            Decision::Proceed => Ok(true),
            Decision::Skip => Ok(false),
            Decision::ProceedAll => {
                self.all = true;
                Ok(true)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ScriptedDecisions;
    use rstest::rstest;
    use std::io::Cursor;

    #[rstest]
    #[case("", Decision::Proceed)]
    #[case("y", Decision::Proceed)]
    #[case("yes\n", Decision::Proceed)]
    #[case("whatever", Decision::Proceed)]
    #[case("n", Decision::Skip)]
    #[case(" NO \n", Decision::Skip)]
    #[case("all", Decision::ProceedAll)]
    #[case("A", Decision::ProceedAll)]
    fn test_from_answer(#[case] answer: &str, #[case] expected: Decision) {
        assert_eq!(Decision::from_answer(answer), expected);
    }

    #[test]
    fn test_interactive_reads_answers_in_order() {
        let input = Cursor::new("n\nall\n");
        let mut output = Vec::new();
        {
            let mut provider = InteractiveDecisions::new(input, &mut output);
            assert_eq!(provider.decide("First").unwrap(), Decision::Skip);
            assert_eq!(provider.decide("Second").unwrap(), Decision::ProceedAll);
        }
        let shown = String::from_utf8(output).unwrap();
        assert!(shown.contains("First [y/n/all]? "));
        assert!(shown.contains("Second [y/n/all]? "));
    }

    #[test]
    fn test_interactive_eof_uses_default() {
        let mut output = Vec::new();
        let mut provider = InteractiveDecisions::new(Cursor::new(""), &mut output);
        assert_eq!(provider.decide("Question").unwrap(), Decision::Proceed);
    }

    #[test]
    fn test_interactive_invalid_utf8_proceeds() {
        let mut output = Vec::new();
        let input = Cursor::new(vec![0xff, b'\n', b'n', b'\n']);
        let mut provider = InteractiveDecisions::new(input, &mut output);
        assert_eq!(provider.decide("First").unwrap(), Decision::Proceed);
        assert_eq!(provider.decide("Second").unwrap(), Decision::Skip);
    }

    #[test]
    fn test_interactive_eof_write_failure() {
        struct RejectsNewline;
        impl Write for RejectsNewline {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                if buf == b"\n" {
                    return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
                }
                Ok(buf.len())
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut provider = InteractiveDecisions::new(Cursor::new(""), RejectsNewline);
        let result = provider.decide("Question");
        assert!(matches!(result, Err(PromptError::WriteFailed { .. })));
    }

    #[test]
    fn test_batch_always_proceeds_to_all() {
        let mut provider = BatchDecisions;
        assert_eq!(provider.decide("anything").unwrap(), Decision::ProceedAll);
    }

    #[test]
    fn test_gate_all_stops_prompting() {
        let mut provider = ScriptedDecisions::new(&["y", "all", "n"]);
        let mut gate = ApplyAllGate::new();

        assert!(gate.confirm(&mut provider, "one").unwrap());
        assert!(!gate.is_open());
        assert!(gate.confirm(&mut provider, "two").unwrap());
        assert!(gate.is_open());
        assert!(gate.confirm(&mut provider, "three").unwrap());

        assert_eq!(provider.questions, vec!["one", "two"]);
    }

    #[test]
    fn test_gate_skip() {
        let mut provider = ScriptedDecisions::new(&["n"]);
        let mut gate = ApplyAllGate::new();
        assert!(!gate.confirm(&mut provider, "one").unwrap());
        assert!(!gate.is_open());
    }
}
