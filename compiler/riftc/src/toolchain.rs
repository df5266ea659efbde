//! External build toolchain invocation.
//!
//! The pipeline never spawns processes directly. It builds a [`ToolCommand`]
//! and hands it to a [`ProcessLauncher`], so tests can record launches without
//! running anything.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io;
use std::path::Path;
use std::process::Command;

use thiserror::Error;

/// Environment variable overriding the CMake program.
pub const CMAKE_ENV: &str = "RIFT_CMAKE";

const DEFAULT_CMAKE: &str = "cmake";

/// A program with its arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl ToolCommand {
    pub fn new(program: impl Into<OsString>) -> Self {
        ToolCommand {
            program: program.into(),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_owned());
        self
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Failure to run an external tool.
#[derive(Debug, Error)]
pub enum ToolchainError {
    /// The program does not exist.
    #[error("'{program}' not found: {source}")]
    NotFound {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The program exists but could not be started.
    #[error("couldn't launch '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The program ran and exited unsuccessfully.
    #[error(
        "'{command}' failed with {}",
        .exit_code.map_or_else(|| "no exit code".to_string(), |code| format!("exit code {code}"))
    )]
    Failed {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },
}

/// Runs tool commands to completion.
pub trait ProcessLauncher {
    /// Run `command`, blocking until it exits. Any non-zero exit is an error.
    fn launch(&self, command: &ToolCommand) -> Result<(), ToolchainError>;
}

/// Launches real processes with [`std::process::Command`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemLauncher;

impl ProcessLauncher for SystemLauncher {
    fn launch(&self, command: &ToolCommand) -> Result<(), ToolchainError> {
        tracing::debug!(%command, "launching");
        let program = command.program.to_string_lossy().into_owned();

        let output = Command::new(&command.program)
            .args(&command.args)
            .output()
            .map_err(|source| {
                if source.kind() == io::ErrorKind::NotFound {
                    ToolchainError::NotFound {
                        program: program.clone(),
                        source,
                    }
                } else {
                    ToolchainError::Launch {
                        program: program.clone(),
                        source,
                    }
                }
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            tracing::debug!(%program, "{}", stdout.trim_end());
        }

        if output.status.success() {
            Ok(())
        } else {
            Err(ToolchainError::Failed {
                command: command.to_string(),
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        }
    }
}

/// Builds CMake invocations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CMake {
    program: OsString,
}

impl Default for CMake {
    fn default() -> Self {
        Self::new(DEFAULT_CMAKE)
    }
}

impl CMake {
    pub fn new(program: impl Into<OsString>) -> Self {
        CMake {
            program: program.into(),
        }
    }

    /// The program named by `RIFT_CMAKE`, or `cmake`.
    pub fn from_env() -> Self {
        std::env::var_os(CMAKE_ENV)
            .filter(|program| !program.is_empty())
            .map_or_else(Self::default, Self::new)
    }

    /// `cmake -S <source> -B <build> -DCMAKE_BUILD_TYPE=<mode>`
    pub fn configure(&self, source: &Path, build: &Path, build_mode: &str) -> ToolCommand {
        ToolCommand::new(&self.program)
            .arg("-S")
            .arg(source)
            .arg("-B")
            .arg(build)
            .arg(format!("-DCMAKE_BUILD_TYPE={build_mode}"))
    }

    /// `cmake --build <build> --config <mode>`
    pub fn build(&self, build: &Path, build_mode: &str) -> ToolCommand {
        ToolCommand::new(&self.program)
            .arg("--build")
            .arg(build)
            .arg("--config")
            .arg(build_mode)
    }
}
