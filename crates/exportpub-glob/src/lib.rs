//! Shell-glob matching over separator-delimited qualified names.
//!
//! Globs are translated to anchored regular expressions. Single-segment
//! wildcards (`*`, `?`, character classes) never match the separator, so
//! `com.example.*` selects the direct members of `com.example` only, while
//! `com.example.**` selects everything below it.
//!
//! ```rust
//! use exportpub_glob::{ExportFilter, GlobMatcher};
//!
//! let glob = GlobMatcher::compile("com.example.*", '.').unwrap();
//! assert!(glob.matches("com.example.Foo"));
//! assert!(!glob.matches("com.example.sub.Foo"));
//!
//! let everything = ExportFilter::new(&[] as &[&str], '.').unwrap();
//! assert!(everything.matches("any.Name"));
//! ```

pub mod error;
pub mod filter;
pub mod glob;

pub use error::{GlobError, Result};
pub use filter::ExportFilter;
pub use glob::{glob_to_regex, GlobMatcher};
