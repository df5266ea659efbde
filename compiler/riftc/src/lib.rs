//! Rift compiler driver.
//!
//! Loads a Rift project into an [`AstStore`](rift_ast::AstStore) and drives it
//! through the C++ backend:
//!
//! ```text
//! open_project → Pipeline (generate C++ → generate CMake → cmake configure/build → copy artifacts)
//! ```
//!
//! Failures never escape as errors from [`build`]: they are collected on the
//! returned [`CompileContext`](rift_diagnostic::CompileContext).

use std::sync::Once;

pub mod build;
pub mod files;
pub mod options;
pub mod project;
pub mod toolchain;

pub use build::{build, build_with, spawn_build, spawn_build_with, BuildState, Pipeline, Stage};
pub use options::{parse_build_options, BuildOptions};
pub use project::{open_project, ProjectLoadError};
pub use toolchain::{CMake, ProcessLauncher, SystemLauncher, ToolCommand, ToolchainError};

static TRACING_INIT: Once = Once::new();

/// Log filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "riftc=info";

/// Log filter for verbose runs.
pub const VERBOSE_LOG_FILTER: &str =
    "riftc=debug,rift_ast=debug,rift_codegen=debug,rift_diagnostic=debug";

/// Initialize tracing with [`DEFAULT_LOG_FILTER`].
///
/// Safe to call multiple times; only the first call installs a subscriber.
/// `RUST_LOG` overrides the filter, e.g. `RUST_LOG=rift_codegen=trace`.
pub fn init_tracing() {
    init_tracing_with(DEFAULT_LOG_FILTER);
}

/// Initialize tracing, falling back to `default_filter` without `RUST_LOG`.
pub fn init_tracing_with(default_filter: &str) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(false).with_level(true))
            .with(filter)
            .init();
    });
}
