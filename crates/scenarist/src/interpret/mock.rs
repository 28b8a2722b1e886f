//! Mock interpreter for testing.

use crate::error::{Result, ScenaristError};
use crate::scenario::ChangeSpec;

use super::{InterpretContext, IntentInterpreter};

/// Interpreter that returns canned changes regardless of the prompt.
#[derive(Debug, Clone, Default)]
pub struct MockInterpreter {
    changes: Vec<ChangeSpec>,
    fail: bool,
}

impl MockInterpreter {
    /// A mock that returns the given changes.
    pub fn returning(changes: Vec<ChangeSpec>) -> Self {
        Self {
            changes,
            fail: false,
        }
    }

    /// A mock that always signals interpretation failure.
    pub fn failing() -> Self {
        Self {
            changes: Vec::new(),
            fail: true,
        }
    }
}

impl IntentInterpreter for MockInterpreter {
    fn interpret(&self, prompt: &str, _context: &InterpretContext) -> Result<Vec<ChangeSpec>> {
        if self.fail {
            return Err(ScenaristError::Interpretation(format!(
                "mock interpreter rejected prompt: {prompt}"
            )));
        }
        Ok(self.changes.clone())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
