//! Rift AST - entity/component syntax tree
//!
//! This crate holds the in-memory representation of a Rift project:
//! - `AstStore`: entity allocator with one typed table per component
//! - Typed queries over component sets
//! - Parent/child hierarchy links
//! - Module resolution (which module owns what, which one is the project)
//! - Built-in primitive types
//!
//! # Design Philosophy
//!
//! - **Compose, don't inherit**: a node's role is the set of components it holds
//! - **Ids, not pointers**: nodes refer to each other through generational `Id`s
//! - **Deterministic order**: queries walk tables by entity slot, so the same
//!   store always yields the same sequence

/// Compile-time assertion that a type has a specific size.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod components;
pub mod hierarchy;
mod id;
pub mod module;
pub mod native;
mod query;
mod store;

pub use components::{
    CClassDecl, CFileRef, CFunctionDecl, CFunctionLibraryDecl, CIdentifier, CModule,
    CParameterDecl, CStructDecl, CType, CVariableDecl, ModuleTarget, TypeCategory,
};
pub use hierarchy::{CChild, CParent};
pub use id::Id;
pub use native::{BuiltinType, CNativeType, NativeTypes};
pub use query::{ComponentSet, Query};
pub use store::{AstStore, Component, Observer};
