//! Declaration graph model for exportpub.
//!
//! A read-only view of one compilation unit as the host compiler sees it:
//! source files holding classes, functions and properties, the types they
//! reference, and the annotations carried by each declaration.
//!
//! ## Modules
//!
//! - [`name`] — Dot-separated qualified names
//! - [`types`] — Type references, type arguments and star projections
//! - [`declaration`] — Classes, functions, properties and constructors
//! - [`graph`] — Module graph, class index and declaration paths
//! - [`builder`] — Fluent builders for hosts and tests

pub mod builder;
pub mod declaration;
pub mod error;
pub mod graph;
pub mod name;
pub mod types;

// Re-export key types for convenience
pub use declaration::{
    Accessor, ClassDecl, ClassKind, ConstructorDecl, Declaration, FunctionDecl, Modifiers,
    PropertyDecl, ValueParameter, Visibility, JS_EXPORT,
};
pub use error::{ModelError, Result};
pub use graph::{ClassIndex, DeclPath, ModuleGraph, SourceFile};
pub use name::QualifiedName;
pub use types::{Type, TypeArgument};
