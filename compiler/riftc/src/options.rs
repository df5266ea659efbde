//! Command-line options of `riftc build`.

use std::path::PathBuf;

use rift_diagnostic::{CompileConfig, DEFAULT_BUILD_MODE};

/// Options accepted by `riftc build`. Unset values keep the project defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Build configuration passed to the toolchain (`Debug`, `Release`, ...).
    pub build_mode: Option<String>,
    pub intermediates: Option<PathBuf>,
    pub binaries: Option<PathBuf>,
    pub verbose: bool,
}

impl BuildOptions {
    /// Merge `other` into `self`. Set values in `other` win, flags are OR'd.
    pub fn merge(&mut self, other: &Self) {
        if other.build_mode.is_some() {
            self.build_mode.clone_from(&other.build_mode);
        }
        if other.intermediates.is_some() {
            self.intermediates.clone_from(&other.intermediates);
        }
        if other.binaries.is_some() {
            self.binaries.clone_from(&other.binaries);
        }
        self.verbose |= other.verbose;
    }

    /// Apply these options on top of `config`.
    pub fn apply(&self, mut config: CompileConfig) -> CompileConfig {
        if let Some(mode) = &self.build_mode {
            config = config.with_build_mode(mode.as_str());
        }
        if let Some(path) = &self.intermediates {
            config = config.with_intermediates(path.as_path());
        }
        if let Some(path) = &self.binaries {
            config = config.with_binaries(path.as_path());
        }
        config
    }
}

/// Parse build flags. Unknown flags are reported and skipped.
pub fn parse_build_options(args: &[String]) -> BuildOptions {
    let mut options = BuildOptions::default();

    for arg in args {
        if arg == "--debug" {
            options.build_mode = Some("Debug".to_string());
        } else if arg == "--release" {
            options.build_mode = Some(DEFAULT_BUILD_MODE.to_string());
        } else if let Some(mode) = arg.strip_prefix("--mode=") {
            if mode.is_empty() {
                eprintln!("warning: empty build mode, keeping the default");
            } else {
                options.build_mode = Some(mode.to_string());
            }
        } else if let Some(path) = arg.strip_prefix("--intermediates=") {
            options.intermediates = Some(PathBuf::from(path));
        } else if let Some(path) = arg.strip_prefix("--binaries=") {
            options.binaries = Some(PathBuf::from(path));
        } else if arg == "-v" || arg == "--verbose" {
            options.verbose = true;
        } else {
            eprintln!("warning: unknown option '{arg}'");
        }
    }

    options
}
