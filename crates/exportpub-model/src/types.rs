//! Type references as seen by the export analysis.
//!
//! A type is either a reference to a class with type arguments, a reference
//! to a type parameter, or the untyped `dynamic` marker. Type arguments may be
//! star projections (`List<*>`) at any nesting depth.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::name::QualifiedName;

/// A type reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Type {
    /// A class type, e.g. `kotlin.collections.List<kotlin.String>?`.
    Class {
        class: QualifiedName,
        #[serde(default)]
        arguments: Vec<TypeArgument>,
        #[serde(default)]
        nullable: bool,
    },
    /// A reference to a type parameter in scope, with its upper bounds.
    Parameter {
        name: String,
        #[serde(default)]
        bounds: Vec<Type>,
        #[serde(default)]
        nullable: bool,
    },
    /// The untyped marker; anything goes on the foreign side.
    Dynamic,
}

/// A type argument: either a concrete type or a star projection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeArgument {
    Star,
    Type(Type),
}

impl Type {
    /// A non-generic class type.
    pub fn class(name: impl Into<QualifiedName>) -> Self {
        Type::Class {
            class: name.into(),
            arguments: Vec::new(),
            nullable: false,
        }
    }

    /// A generic class type with concrete arguments.
    pub fn generic(name: impl Into<QualifiedName>, arguments: Vec<Type>) -> Self {
        Type::Class {
            class: name.into(),
            arguments: arguments.into_iter().map(TypeArgument::Type).collect(),
            nullable: false,
        }
    }

    /// A generic class type with explicit (possibly star) arguments.
    pub fn with_arguments(name: impl Into<QualifiedName>, arguments: Vec<TypeArgument>) -> Self {
        Type::Class {
            class: name.into(),
            arguments,
            nullable: false,
        }
    }

    /// A type parameter reference with no declared bounds.
    pub fn parameter(name: impl Into<String>) -> Self {
        Type::Parameter {
            name: name.into(),
            bounds: Vec::new(),
            nullable: false,
        }
    }

    pub fn dynamic() -> Self {
        Type::Dynamic
    }

    /// The same type, marked nullable.
    pub fn nullable(mut self) -> Self {
        match &mut self {
            Type::Class { nullable, .. } | Type::Parameter { nullable, .. } => *nullable = true,
            Type::Dynamic => {}
        }
        self
    }

    /// The referenced class, for class types.
    pub fn class_name(&self) -> Option<&QualifiedName> {
        match self {
            Type::Class { class, .. } => Some(class),
            _ => None,
        }
    }

    pub fn arguments(&self) -> &[TypeArgument] {
        match self {
            Type::Class { arguments, .. } => arguments,
            _ => &[],
        }
    }

    /// Whether a star projection appears anywhere in the argument tree.
    pub fn has_star_projection(&self) -> bool {
        self.arguments().iter().any(|arg| match arg {
            TypeArgument::Star => true,
            TypeArgument::Type(inner) => inner.has_star_projection(),
        })
    }

    /// A type parameter reference with upper bounds.
    pub fn bounded(name: impl Into<String>, bounds: Vec<Type>) -> Self {
        Type::Parameter {
            name: name.into(),
            bounds,
            nullable: false,
        }
    }

    /// Stable identity used for memoization: the rendered type with
    /// nullability erased at every level and type parameters spelled out
    /// with their bounds (`T : kotlin.Long`).
    pub fn key(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, Render::Key);
        out
    }

    fn render_into(&self, out: &mut String, mode: Render) {
        match self {
            Type::Class {
                class,
                arguments,
                nullable,
            } => {
                out.push_str(class.as_str());
                if !arguments.is_empty() {
                    out.push('<');
                    for (i, arg) in arguments.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        match arg {
                            TypeArgument::Star => out.push('*'),
                            TypeArgument::Type(inner) => inner.render_into(out, mode),
                        }
                    }
                    out.push('>');
                }
                if mode == Render::Display && *nullable {
                    out.push('?');
                }
            }
            Type::Parameter {
                name,
                bounds,
                nullable,
            } => {
                out.push_str(name);
                match mode {
                    Render::Display if *nullable => out.push('?'),
                    Render::Display => {}
                    Render::Key if !bounds.is_empty() => {
                        out.push_str(" : ");
                        for (i, bound) in bounds.iter().enumerate() {
                            if i > 0 {
                                out.push_str(" & ");
                            }
                            bound.render_into(out, mode);
                        }
                    }
                    Render::Key => {}
                }
            }
            Type::Dynamic => out.push_str("dynamic"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Render {
    Display,
    Key,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.render_into(&mut out, Render::Display);
        f.write_str(&out)
    }
}

impl fmt::Display for TypeArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeArgument::Star => write!(f, "*"),
            TypeArgument::Type(ty) => write!(f, "{ty}"),
        }
    }
}
