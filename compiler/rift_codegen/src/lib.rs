//! C++ Generation Backend for Rift
//!
//! Lowers each module of an [`AstStore`](rift_ast::AstStore) into one C++
//! header and one source file, then describes the generated tree to CMake.
//!
//! # Architecture
//!
//! ```text
//! AstStore (snapshot)
//!        ↓
//!   stamp_native_names + generate_parameter_fragments
//!        ↓
//!   generate_code      (Code/<Module>/Include/code.h, Code/<Module>/Src/code.cpp)
//!        ↓
//!   generate_cmake     (Code/CMakeLists.txt, Code/<Module>/CMakeLists.txt)
//! ```
//!
//! Failures to write a file are recorded on the
//! [`CompileContext`](rift_diagnostic::CompileContext) and generation carries on
//! with the remaining files.

use std::io;
use std::path::Path;

pub mod cmake;
pub mod cpp;
mod fragment;
mod native;
mod writer;

pub use cmake::generate_cmake;
pub use cpp::{generate_code, generate_module_code, ModuleCode};
pub use fragment::{generate_parameter_fragments, CCppCodeGenFragment};
pub use native::{cpp_spelling, stamp_native_names, CCppNativeName};
pub use writer::CodeWriter;

/// Write `text` to `path`, creating missing parent folders.
pub(crate) fn save_text(path: &Path, text: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, text)
}
