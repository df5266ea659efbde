//! Compile context for the Rift build pipeline.
//!
//! Every stage of a compile run shares one [`CompileContext`]: the immutable
//! [`CompileConfig`] for the run plus the list of diagnostics accumulated so
//! far. Stages never return errors to each other. A failing step records a
//! diagnostic and the next step checks [`CompileContext::has_errors`] before
//! starting.
//!
//! ```text
//! let mut context = CompileContext::new(CompileConfig::for_project(folder));
//! generate_code(&ast, &mut context);
//! if context.has_errors() {
//!     return;
//! }
//! ```

mod config;
mod context;

pub use config::{CompileConfig, DEFAULT_BUILD_MODE};
pub use context::{CompileContext, CompileError};
