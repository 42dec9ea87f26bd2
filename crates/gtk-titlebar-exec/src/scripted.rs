//! Scripted command runners for testing.
//!
//! Both runners record every argument vector they receive, so tests can
//! assert on the exact command sequence without a real X11 session.
//!
//! - [`ScriptedRunner`] is strict: commands must arrive in the scripted order.
//! - [`TableRunner`] answers by argument vector in any order, any number of
//!   times.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{ExecError, Result};
use crate::runner::{display_command, CommandRunner};

#[derive(Debug, Clone)]
enum Response {
    Output(String),
    Failure(String),
}

impl Response {
    fn answer(&self, argv: &[String]) -> Result<String> {
        match self {
            Response::Output(out) => Ok(out.clone()),
            Response::Failure(message) => Err(ExecError::Scripted {
                command: display_command(argv),
                message: message.clone(),
            }),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A strict runner that expects an exact, ordered command sequence.
///
/// A command that does not match the next expectation is answered with
/// [`ExecError::Unexpected`] and leaves the script untouched.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    expected: Mutex<VecDeque<(Vec<String>, Response)>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expect `argv` next and answer it with `output`.
    pub fn expect(self, argv: Vec<String>, output: impl Into<String>) -> Self {
        lock(&self.expected).push_back((argv, Response::Output(output.into())));
        self
    }

    /// Expect `argv` next and fail it with `message`.
    pub fn expect_failure(self, argv: Vec<String>, message: impl Into<String>) -> Self {
        lock(&self.expected).push_back((argv, Response::Failure(message.into())));
        self
    }

    /// Every command received so far, in order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        lock(&self.calls).clone()
    }

    /// Expectations that have not been consumed yet.
    pub fn remaining(&self) -> Vec<Vec<String>> {
        lock(&self.expected)
            .iter()
            .map(|(argv, _)| argv.clone())
            .collect()
    }

    /// True once every scripted command has been received.
    pub fn is_exhausted(&self) -> bool {
        lock(&self.expected).is_empty()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, argv: &[String]) -> Result<String> {
        lock(&self.calls).push(argv.to_vec());

        let mut expected = lock(&self.expected);
        match expected.front() {
            Some((next, _)) if next.as_slice() == argv => {
                let (_, response) = expected
                    .pop_front()
                    .ok_or_else(|| ExecError::Unexpected(display_command(argv)))?;
                response.answer(argv)
            }
            _ => Err(ExecError::Unexpected(display_command(argv))),
        }
    }
}

/// A runner that answers commands from a lookup table.
///
/// Unknown commands are answered with [`ExecError::Unexpected`].
#[derive(Debug, Default)]
pub struct TableRunner {
    responses: HashMap<Vec<String>, Response>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl TableRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `argv` with `output`.
    pub fn respond(mut self, argv: Vec<String>, output: impl Into<String>) -> Self {
        self.responses.insert(argv, Response::Output(output.into()));
        self
    }

    /// Fail `argv` with `message`.
    pub fn fail(mut self, argv: Vec<String>, message: impl Into<String>) -> Self {
        self.responses.insert(argv, Response::Failure(message.into()));
        self
    }

    /// Every command received so far, in order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        lock(&self.calls).clone()
    }

    /// Forget recorded calls, keeping the table.
    pub fn clear_calls(&self) {
        lock(&self.calls).clear();
    }
}

impl CommandRunner for TableRunner {
    fn run(&self, argv: &[String]) -> Result<String> {
        lock(&self.calls).push(argv.to_vec());
        match self.responses.get(argv) {
            Some(response) => response.answer(argv),
            None => Err(ExecError::Unexpected(display_command(argv))),
        }
    }
}
