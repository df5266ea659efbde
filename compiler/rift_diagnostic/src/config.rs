//! Per-run compile configuration.

use std::path::{Path, PathBuf};

/// Build mode used when none is requested.
pub const DEFAULT_BUILD_MODE: &str = "Release";

/// Where a compile run writes its output and how the toolchain builds it.
///
/// Built once before a run and never changed while the run is in progress.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CompileConfig {
    /// Root of generated code and toolchain build trees.
    pub intermediates_path: PathBuf,
    /// Root of copied artifacts.
    pub binaries_path: PathBuf,
    /// Toolchain configuration name, e.g. `Release` or `Debug`.
    pub build_mode: String,
}

impl CompileConfig {
    /// Default layout for a project folder: `Intermediates/` and `Binaries/`
    /// next to the project file, built in release mode.
    pub fn for_project(project_folder: impl AsRef<Path>) -> Self {
        let folder = project_folder.as_ref();
        CompileConfig {
            intermediates_path: folder.join("Intermediates"),
            binaries_path: folder.join("Binaries"),
            build_mode: DEFAULT_BUILD_MODE.to_string(),
        }
    }

    #[must_use]
    pub fn with_intermediates(mut self, path: impl Into<PathBuf>) -> Self {
        self.intermediates_path = path.into();
        self
    }

    #[must_use]
    pub fn with_binaries(mut self, path: impl Into<PathBuf>) -> Self {
        self.binaries_path = path.into();
        self
    }

    #[must_use]
    pub fn with_build_mode(mut self, mode: impl Into<String>) -> Self {
        self.build_mode = mode.into();
        self
    }

    /// Folder holding one generated source tree per module.
    pub fn code_path(&self) -> PathBuf {
        self.intermediates_path.join("Code")
    }

    /// Folder the toolchain configures and builds in.
    pub fn cmake_path(&self) -> PathBuf {
        self.intermediates_path.join("CMake")
    }
}

#[cfg(test)]
mod tests;
