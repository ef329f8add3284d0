//! Fluent builders for declaration graphs.
//!
//! Hosts that assemble a graph programmatically (and tests) use these instead
//! of spelling out every field. Defaults follow the source language: public
//! visibility, no modifiers, `kotlin.Unit` return type, and a public no-arg
//! primary constructor for ordinary classes.
//!
//! # Example
//!
//! ```rust
//! use exportpub_model::builder::ClassBuilder;
//! use exportpub_model::types::Type;
//!
//! let class = ClassBuilder::new("com.example.Point")
//!     .property("x", Type::class("kotlin.Double"))
//!     .property("y", Type::class("kotlin.Double"))
//!     .method("length", vec![], Type::class("kotlin.Double"))
//!     .build();
//!
//! assert_eq!(class.properties().count(), 2);
//! assert_eq!(class.constructors().count(), 1);
//! ```

use crate::declaration::{
    Accessor, ClassDecl, ClassKind, ConstructorDecl, Declaration, FunctionDecl, Modifiers,
    PropertyDecl, ValueParameter, Visibility, JS_EXPORT,
};
use crate::name::QualifiedName;
use crate::types::Type;

/// Builder for [`ClassDecl`].
pub struct ClassBuilder {
    class: ClassDecl,
    default_constructor: bool,
    /// Members added through the helpers; they get the class's self type as
    /// dispatch receiver at build time.
    needs_receiver: Vec<usize>,
}

impl ClassBuilder {
    pub fn new(fq_name: impl Into<QualifiedName>) -> Self {
        Self {
            class: ClassDecl {
                fq_name: fq_name.into(),
                kind: ClassKind::Class,
                visibility: Visibility::Public,
                modifiers: Modifiers::default(),
                annotations: Vec::new(),
                type_parameters: Vec::new(),
                supertypes: Vec::new(),
                declarations: Vec::new(),
            },
            default_constructor: true,
            needs_receiver: Vec::new(),
        }
    }

    pub fn kind(mut self, kind: ClassKind) -> Self {
        self.class.kind = kind;
        self
    }

    pub fn interface(self) -> Self {
        self.kind(ClassKind::Interface)
    }

    pub fn object(self) -> Self {
        self.kind(ClassKind::Object)
    }

    pub fn enum_class(self) -> Self {
        self.kind(ClassKind::Enum)
    }

    pub fn annotation_class(self) -> Self {
        self.kind(ClassKind::Annotation)
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.class.visibility = visibility;
        self
    }

    pub fn private(self) -> Self {
        self.visibility(Visibility::Private)
    }

    pub fn expect(mut self) -> Self {
        self.class.modifiers.expect = true;
        self
    }

    pub fn external(mut self) -> Self {
        self.class.modifiers.external = true;
        self
    }

    pub fn value(mut self) -> Self {
        self.class.modifiers.value = true;
        self
    }

    pub fn anonymous(mut self) -> Self {
        self.class.modifiers.anonymous = true;
        self
    }

    pub fn exported(mut self) -> Self {
        self.class.annotations.push(QualifiedName::new(JS_EXPORT));
        self
    }

    pub fn type_parameter(mut self, name: impl Into<String>) -> Self {
        self.class.type_parameters.push(name.into());
        self
    }

    pub fn supertype(mut self, ty: Type) -> Self {
        self.class.supertypes.push(ty);
        self
    }

    /// A public read-only property with a getter of type `ty`.
    pub fn property(mut self, name: &str, ty: Type) -> Self {
        let property = PropertyBuilder::new(self.class.fq_name.child(name), ty).build();
        self.needs_receiver.push(self.class.declarations.len());
        self.class.declarations.push(Declaration::Property(property));
        self
    }

    /// A property inherited unchanged from `ancestor`.
    pub fn inherited_property(mut self, name: &str, ty: Type, ancestor: Type) -> Self {
        let property = PropertyBuilder::new(self.class.fq_name.child(name), ty)
            .inherited_from(ancestor)
            .build();
        self.needs_receiver.push(self.class.declarations.len());
        self.class.declarations.push(Declaration::Property(property));
        self
    }

    /// A public method taking `params` (named `p0`, `p1`, ...) and returning `ret`.
    pub fn method(mut self, name: &str, params: Vec<Type>, ret: Type) -> Self {
        let function = FunctionBuilder::new(self.class.fq_name.child(name))
            .params(params)
            .returns(ret)
            .build();
        self.needs_receiver.push(self.class.declarations.len());
        self.class.declarations.push(Declaration::Function(function));
        self
    }

    /// A method inherited unchanged from `ancestor`.
    pub fn inherited_method(mut self, name: &str, params: Vec<Type>, ret: Type, ancestor: Type) -> Self {
        let function = FunctionBuilder::new(self.class.fq_name.child(name))
            .params(params)
            .returns(ret)
            .inherited_from(ancestor)
            .build();
        self.needs_receiver.push(self.class.declarations.len());
        self.class.declarations.push(Declaration::Function(function));
        self
    }

    /// Add a fully specified member function; receivers are left as given.
    pub fn function(mut self, function: FunctionDecl) -> Self {
        self.class.declarations.push(Declaration::Function(function));
        self
    }

    /// Add a fully specified member property; receivers are left as given.
    pub fn property_decl(mut self, property: PropertyDecl) -> Self {
        self.class.declarations.push(Declaration::Property(property));
        self
    }

    /// An explicit public constructor. Suppresses the default one.
    pub fn constructor(self, params: Vec<Type>) -> Self {
        self.constructor_with(Visibility::Public, params)
    }

    pub fn constructor_with(mut self, visibility: Visibility, params: Vec<Type>) -> Self {
        let primary = self.class.constructors().next().is_none();
        self.class
            .declarations
            .push(Declaration::Constructor(ConstructorDecl {
                visibility,
                modifiers: Modifiers::default(),
                primary,
                parameters: named_params(params),
                dispatch_receiver: None,
            }));
        self.default_constructor = false;
        self
    }

    pub fn no_default_constructor(mut self) -> Self {
        self.default_constructor = false;
        self
    }

    pub fn nested(mut self, class: ClassDecl) -> Self {
        self.class.declarations.push(Declaration::Class(class));
        self
    }

    pub fn build(mut self) -> ClassDecl {
        let self_type = self.class.self_type();
        for idx in &self.needs_receiver {
            match &mut self.class.declarations[*idx] {
                Declaration::Function(f) => f.dispatch_receiver = Some(self_type.clone()),
                Declaration::Property(p) => {
                    if let Some(getter) = &mut p.getter {
                        getter.dispatch_receiver = Some(self_type.clone());
                    }
                }
                _ => {}
            }
        }

        if self.default_constructor
            && self.class.kind == ClassKind::Class
            && self.class.constructors().next().is_none()
        {
            self.class.declarations.insert(
                0,
                Declaration::Constructor(ConstructorDecl {
                    visibility: Visibility::Public,
                    modifiers: Modifiers::default(),
                    primary: true,
                    parameters: Vec::new(),
                    dispatch_receiver: None,
                }),
            );
        }
        self.class
    }
}

fn named_params(params: Vec<Type>) -> Vec<ValueParameter> {
    params
        .into_iter()
        .enumerate()
        .map(|(i, ty)| ValueParameter::new(format!("p{i}"), ty))
        .collect()
}

/// Builder for [`FunctionDecl`].
pub struct FunctionBuilder {
    function: FunctionDecl,
}

impl FunctionBuilder {
    pub fn new(fq_name: impl Into<QualifiedName>) -> Self {
        Self {
            function: FunctionDecl {
                fq_name: fq_name.into(),
                visibility: Visibility::Public,
                modifiers: Modifiers::default(),
                annotations: Vec::new(),
                return_type: Type::class("kotlin.Unit"),
                parameters: Vec::new(),
                dispatch_receiver: None,
                extension_receiver: None,
                inherited_from: None,
            },
        }
    }

    pub fn param(mut self, name: &str, ty: Type) -> Self {
        self.function.parameters.push(ValueParameter::new(name, ty));
        self
    }

    pub fn params(mut self, params: Vec<Type>) -> Self {
        self.function.parameters = named_params(params);
        self
    }

    pub fn returns(mut self, ty: Type) -> Self {
        self.function.return_type = ty;
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.function.visibility = visibility;
        self
    }

    pub fn private(self) -> Self {
        self.visibility(Visibility::Private)
    }

    pub fn expect(mut self) -> Self {
        self.function.modifiers.expect = true;
        self
    }

    pub fn external(mut self) -> Self {
        self.function.modifiers.external = true;
        self
    }

    pub fn inline(mut self) -> Self {
        self.function.modifiers.inline = true;
        self
    }

    pub fn suspend(mut self) -> Self {
        self.function.modifiers.suspend = true;
        self
    }

    pub fn dispatch_receiver(mut self, ty: Type) -> Self {
        self.function.dispatch_receiver = Some(ty);
        self
    }

    pub fn extension_receiver(mut self, ty: Type) -> Self {
        self.function.extension_receiver = Some(ty);
        self
    }

    pub fn inherited_from(mut self, ty: Type) -> Self {
        self.function.inherited_from = Some(ty);
        self
    }

    pub fn exported(mut self) -> Self {
        self.function.annotations.push(QualifiedName::new(JS_EXPORT));
        self
    }

    pub fn build(self) -> FunctionDecl {
        self.function
    }
}

/// Builder for [`PropertyDecl`].
pub struct PropertyBuilder {
    property: PropertyDecl,
}

impl PropertyBuilder {
    /// A public `val` whose getter returns `ty`.
    pub fn new(fq_name: impl Into<QualifiedName>, ty: Type) -> Self {
        Self {
            property: PropertyDecl {
                fq_name: fq_name.into(),
                visibility: Visibility::Public,
                modifiers: Modifiers::default(),
                annotations: Vec::new(),
                mutable: false,
                getter: Some(Accessor {
                    return_type: ty,
                    dispatch_receiver: None,
                    extension_receiver: None,
                }),
                backing_field: None,
                inherited_from: None,
            },
        }
    }

    /// Drop the getter and keep the type on the backing field only.
    pub fn field_only(mut self) -> Self {
        if let Some(getter) = self.property.getter.take() {
            self.property.backing_field = Some(getter.return_type);
        }
        self
    }

    /// Drop both getter and backing field, leaving the type unresolvable.
    pub fn untyped(mut self) -> Self {
        self.property.getter = None;
        self.property.backing_field = None;
        self
    }

    pub fn mutable(mut self) -> Self {
        self.property.mutable = true;
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.property.visibility = visibility;
        self
    }

    pub fn private(self) -> Self {
        self.visibility(Visibility::Private)
    }

    pub fn expect(mut self) -> Self {
        self.property.modifiers.expect = true;
        self
    }

    pub fn external(mut self) -> Self {
        self.property.modifiers.external = true;
        self
    }

    pub fn dispatch_receiver(mut self, ty: Type) -> Self {
        if let Some(getter) = &mut self.property.getter {
            getter.dispatch_receiver = Some(ty);
        }
        self
    }

    pub fn extension_receiver(mut self, ty: Type) -> Self {
        if let Some(getter) = &mut self.property.getter {
            getter.extension_receiver = Some(ty);
        }
        self
    }

    pub fn inherited_from(mut self, ty: Type) -> Self {
        self.property.inherited_from = Some(ty);
        self
    }

    pub fn exported(mut self) -> Self {
        self.property.annotations.push(QualifiedName::new(JS_EXPORT));
        self
    }

    pub fn build(self) -> PropertyDecl {
        self.property
    }
}
