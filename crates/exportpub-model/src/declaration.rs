//! Declarations: classes, functions, properties and constructors.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::name::QualifiedName;
use crate::types::{Type, TypeArgument};

/// Qualified name of the export marker annotation.
pub const JS_EXPORT: &str = "kotlin.js.JsExport";

/// Declared visibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Internal,
    Private,
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Protected => write!(f, "protected"),
            Self::Internal => write!(f, "internal"),
            Self::Private => write!(f, "private"),
        }
    }
}

/// The kind of a class declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
    Object,
    Enum,
    Annotation,
}

/// Platform-specific modifiers that can make a declaration unexportable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Modifiers {
    /// A multiplatform `expect` stub.
    pub expect: bool,
    /// Implemented outside the compiled module.
    pub external: bool,
    /// An inline function.
    pub inline: bool,
    /// A suspending function.
    pub suspend: bool,
    /// A value (inline) class.
    pub value: bool,
    /// An anonymous object.
    pub anonymous: bool,
}

/// A named value parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Type,
}

impl ValueParameter {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A class, interface, object, enum or annotation class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClassDecl {
    pub fq_name: QualifiedName,
    #[serde(default)]
    pub kind: ClassKind,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub annotations: Vec<QualifiedName>,
    #[serde(default)]
    pub type_parameters: Vec<String>,
    #[serde(default)]
    pub supertypes: Vec<Type>,
    /// Members and nested classes, in declaration order.
    #[serde(default)]
    pub declarations: Vec<Declaration>,
}

/// A function or method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FunctionDecl {
    pub fq_name: QualifiedName,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub annotations: Vec<QualifiedName>,
    pub return_type: Type,
    #[serde(default)]
    pub parameters: Vec<ValueParameter>,
    #[serde(default)]
    pub dispatch_receiver: Option<Type>,
    #[serde(default)]
    pub extension_receiver: Option<Type>,
    /// Ancestor type this member is inherited from without being redeclared.
    #[serde(default)]
    pub inherited_from: Option<Type>,
}

/// A class constructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConstructorDecl {
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub parameters: Vec<ValueParameter>,
    /// Outer instance for inner-class constructors.
    #[serde(default)]
    pub dispatch_receiver: Option<Type>,
}

/// A property getter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Accessor {
    pub return_type: Type,
    #[serde(default)]
    pub dispatch_receiver: Option<Type>,
    #[serde(default)]
    pub extension_receiver: Option<Type>,
}

/// A property (`val`/`var`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PropertyDecl {
    pub fq_name: QualifiedName,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub annotations: Vec<QualifiedName>,
    #[serde(default)]
    pub mutable: bool,
    #[serde(default)]
    pub getter: Option<Accessor>,
    #[serde(default)]
    pub backing_field: Option<Type>,
    /// Ancestor type this member is inherited from without being redeclared.
    #[serde(default)]
    pub inherited_from: Option<Type>,
}

/// Any declaration in the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "decl", rename_all = "lowercase")]
pub enum Declaration {
    Class(ClassDecl),
    Function(FunctionDecl),
    Property(PropertyDecl),
    Constructor(ConstructorDecl),
}

fn carries_export(annotations: &[QualifiedName]) -> bool {
    annotations.iter().any(|a| a.as_str() == JS_EXPORT)
}

fn add_export(annotations: &mut Vec<QualifiedName>) {
    if !carries_export(annotations) {
        annotations.push(QualifiedName::new(JS_EXPORT));
    }
}

fn render_parameters(parameters: &[ValueParameter]) -> String {
    parameters
        .iter()
        .map(|p| p.ty.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// `owner::member` for a qualified member name; top-level names in the root
/// package render with an empty owner.
fn owner_and_member(name: &QualifiedName) -> String {
    let owner = name.parent().map(|p| p.to_string()).unwrap_or_default();
    format!("{owner}::{}", name.short_name())
}

impl ClassDecl {
    pub fn is_exported(&self) -> bool {
        carries_export(&self.annotations)
    }

    pub fn mark_exported(&mut self) {
        add_export(&mut self.annotations);
    }

    pub fn is_enum(&self) -> bool {
        self.kind == ClassKind::Enum
    }

    pub fn is_annotation_class(&self) -> bool {
        self.kind == ClassKind::Annotation
    }

    /// The class as a type, applied to its own type parameters.
    pub fn self_type(&self) -> Type {
        Type::with_arguments(
            self.fq_name.clone(),
            self.type_parameters
                .iter()
                .map(|p| TypeArgument::Type(Type::parameter(p.clone())))
                .collect(),
        )
    }

    pub fn properties(&self) -> impl Iterator<Item = &PropertyDecl> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Property(p) => Some(p),
            _ => None,
        })
    }

    pub fn methods(&self) -> impl Iterator<Item = &FunctionDecl> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Function(f) => Some(f),
            _ => None,
        })
    }

    pub fn constructors(&self) -> impl Iterator<Item = &ConstructorDecl> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Constructor(c) => Some(c),
            _ => None,
        })
    }

    pub fn nested_classes(&self) -> impl Iterator<Item = &ClassDecl> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Class(c) => Some(c),
            _ => None,
        })
    }
}

impl FunctionDecl {
    pub fn name(&self) -> &str {
        self.fq_name.short_name()
    }

    pub fn is_exported(&self) -> bool {
        carries_export(&self.annotations)
    }

    pub fn mark_exported(&mut self) {
        add_export(&mut self.annotations);
    }

    /// `owner::name(params):returnType`
    pub fn signature(&self) -> String {
        format!(
            "{}({}):{}",
            owner_and_member(&self.fq_name),
            render_parameters(&self.parameters),
            self.return_type
        )
    }
}

impl ConstructorDecl {
    /// `owner::<init>(params)`
    pub fn signature(&self, owner: &QualifiedName) -> String {
        format!("{owner}::<init>({})", render_parameters(&self.parameters))
    }
}

impl PropertyDecl {
    pub fn name(&self) -> &str {
        self.fq_name.short_name()
    }

    pub fn is_exported(&self) -> bool {
        carries_export(&self.annotations)
    }

    pub fn mark_exported(&mut self) {
        add_export(&mut self.annotations);
    }

    /// The getter's return type, or the backing field type when there is no
    /// getter.
    pub fn resolved_type(&self) -> Result<&Type> {
        match (&self.getter, &self.backing_field) {
            (Some(getter), _) => Ok(&getter.return_type),
            (None, Some(field)) => Ok(field),
            (None, None) => Err(ModelError::MissingPropertyType {
                property: self.fq_name.to_string(),
            }),
        }
    }

    /// `owner::name: type`
    pub fn signature(&self) -> String {
        let ty = match self.resolved_type() {
            Ok(ty) => ty.to_string(),
            Err(_) => "<unresolved>".to_string(),
        };
        format!("{}: {ty}", owner_and_member(&self.fq_name))
    }
}

impl Declaration {
    /// Qualified name; constructors have none of their own.
    pub fn fq_name(&self) -> Option<&QualifiedName> {
        match self {
            Declaration::Class(c) => Some(&c.fq_name),
            Declaration::Function(f) => Some(&f.fq_name),
            Declaration::Property(p) => Some(&p.fq_name),
            Declaration::Constructor(_) => None,
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            Declaration::Class(_) => "class",
            Declaration::Function(_) => "function",
            Declaration::Property(_) => "property",
            Declaration::Constructor(_) => "constructor",
        }
    }

    pub fn is_exported(&self) -> bool {
        match self {
            Declaration::Class(c) => c.is_exported(),
            Declaration::Function(f) => f.is_exported(),
            Declaration::Property(p) => p.is_exported(),
            Declaration::Constructor(_) => false,
        }
    }

    /// Attach the export marker. Constructors are never marked on their own.
    pub fn mark_exported(&mut self) {
        match self {
            Declaration::Class(c) => c.mark_exported(),
            Declaration::Function(f) => f.mark_exported(),
            Declaration::Property(p) => p.mark_exported(),
            Declaration::Constructor(_) => {}
        }
    }
}
