//! Structural verdicts and the reasons behind a rejection.
//!
//! A rejection carries the offending members and types already rendered, so
//! the annotator can build its warning without going back to the graph.

use std::fmt;

use exportpub_model::Visibility;
use serde::Serialize;

/// A platform property that keeps a declaration out of the export surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlatformFlag {
    Expect,
    External,
    Inline,
    Suspend,
    Value,
    Annotation,
    Anonymous,
}

impl fmt::Display for PlatformFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformFlag::Expect => write!(f, "expect declaration"),
            PlatformFlag::External => write!(f, "external declaration"),
            PlatformFlag::Inline => write!(f, "inline function"),
            PlatformFlag::Suspend => write!(f, "suspend function"),
            PlatformFlag::Value => write!(f, "value class"),
            PlatformFlag::Annotation => write!(f, "annotation class"),
            PlatformFlag::Anonymous => write!(f, "anonymous object"),
        }
    }
}

/// The first disqualifying condition found for a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "kebab-case")]
pub enum Rejection {
    Platform(PlatformFlag),
    NotPublic(Visibility),
    /// Rendered supertypes that are not exportable.
    Supertypes(Vec<String>),
    /// Rendered constructor signatures.
    Constructors(Vec<String>),
    /// Rendered property signatures.
    Properties(Vec<String>),
    /// Rendered method signatures.
    Methods(Vec<String>),
    /// Method names bound to more than one signature.
    OverloadedMethods(Vec<String>),
    ReturnType(String),
    DispatchReceiver(String),
    ExtensionReceiver(String),
    /// Rendered as `name: type`.
    Parameters(Vec<String>),
    PropertyType(String),
}

fn list(items: &[String]) -> String {
    format!("[{}]", items.join(", "))
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Platform(flag) => write!(f, "platform restriction ({flag})"),
            Rejection::NotPublic(visibility) => write!(f, "{visibility} visibility"),
            Rejection::Supertypes(types) => {
                write!(f, "non-exportable supertypes {}", list(types))
            }
            Rejection::Constructors(ctors) => {
                write!(f, "non-exportable constructors {}", list(ctors))
            }
            Rejection::Properties(props) => {
                write!(f, "non-exportable properties {}", list(props))
            }
            Rejection::Methods(methods) => {
                write!(f, "non-exportable methods {}", list(methods))
            }
            Rejection::OverloadedMethods(names) => write!(
                f,
                "overloaded methods {} which could cause a call ambiguity in JavaScript",
                list(names)
            ),
            Rejection::ReturnType(ty) => write!(f, "non-exportable return type {ty}"),
            Rejection::DispatchReceiver(ty) => {
                write!(f, "non-exportable dispatch receiver {ty}")
            }
            Rejection::ExtensionReceiver(ty) => {
                write!(f, "non-exportable extension receiver {ty}")
            }
            Rejection::Parameters(params) => {
                write!(f, "non-exportable parameters {}", list(params))
            }
            Rejection::PropertyType(ty) => write!(f, "non-exportable property type {ty}"),
        }
    }
}

/// Outcome of evaluating one declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Exportable,
    Rejected(Rejection),
}

impl Verdict {
    pub fn is_exportable(&self) -> bool {
        matches!(self, Verdict::Exportable)
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Verdict::Exportable => None,
            Verdict::Rejected(r) => Some(r),
        }
    }
}

impl From<Rejection> for Verdict {
    fn from(rejection: Rejection) -> Self {
        Verdict::Rejected(rejection)
    }
}
