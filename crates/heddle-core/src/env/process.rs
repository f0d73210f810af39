//! Subprocess launch configuration.

use std::collections::HashMap;
use std::process::Command;

use serde::{Deserialize, Serialize};

use crate::path::AbsolutePath;

/// Everything a child process should inherit from its parent task, and
/// nothing it must not.
///
/// The environment block is complete (snapshot plus task overrides);
/// applying it starts from an empty block rather than the real process
/// environment, so a sibling task's working-directory or variable
/// assumptions can never leak onto the child.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessStartInfo {
    program: String,
    args: Vec<String>,
    working_directory: AbsolutePath,
    env: HashMap<String, String>,
}

impl ProcessStartInfo {
    pub(crate) fn new(
        program: impl Into<String>,
        working_directory: AbsolutePath,
        env: HashMap<String, String>,
    ) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_directory,
            env,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arg_list(&self) -> &[String] {
        &self.args
    }

    pub fn working_directory(&self) -> &AbsolutePath {
        &self.working_directory
    }

    pub fn env(&self) -> &HashMap<String, String> {
        &self.env
    }

    /// Build a `std::process::Command` carrying this configuration.
    ///
    /// Launching and waiting belong to the caller; this core stops at the
    /// configuration boundary.
    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command.env_clear();
        command.envs(&self.env);
        if !self.working_directory.is_empty() {
            command.current_dir(self.working_directory.as_str());
        }
        command
    }
}
