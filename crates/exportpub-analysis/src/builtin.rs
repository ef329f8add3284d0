//! Built-in exportable types.
//!
//! Standard types the JavaScript backend already knows how to represent.
//! Classification is by class identity only; the one exception is
//! `kotlin.Array`, whose element type must itself be exportable.

use exportpub_model::{Type, TypeArgument};

/// Category of a built-in exportable type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinKind {
    /// `kotlin.Any`
    Top,
    /// `kotlin.Unit`
    Unit,
    /// Boolean, 8/16/32-bit integers, 32/64-bit floats.
    Primitive,
    String,
    PrimitiveArray,
    /// Generic `kotlin.Array<T>`.
    Array,
    /// `kotlin.Enum`
    EnumBase,
    /// `kotlin.Throwable`
    Throwable,
    /// `kotlin.reflect.KClass`
    ClassReference,
    /// Read-only and mutable collection interfaces.
    Collection,
}

impl BuiltinKind {
    /// Whether values of this kind need a runtime conversion shim on the
    /// boundary. Static exportability is certified either way.
    pub fn needs_conversion(&self) -> bool {
        matches!(self, BuiltinKind::Collection)
    }
}

const PRIMITIVES: &[&str] = &[
    "kotlin.Boolean",
    "kotlin.Byte",
    "kotlin.Short",
    "kotlin.Int",
    "kotlin.Float",
    "kotlin.Double",
];

const PRIMITIVE_ARRAYS: &[&str] = &[
    "kotlin.BooleanArray",
    "kotlin.ByteArray",
    "kotlin.ShortArray",
    "kotlin.IntArray",
    "kotlin.FloatArray",
    "kotlin.DoubleArray",
];

const COLLECTIONS: &[&str] = &[
    "kotlin.collections.Collection",
    "kotlin.collections.MutableCollection",
    "kotlin.collections.List",
    "kotlin.collections.MutableList",
    "kotlin.collections.Set",
    "kotlin.collections.MutableSet",
    "kotlin.collections.Map",
    "kotlin.collections.MutableMap",
];

/// Identify a built-in type by its class. Ignores type arguments.
pub fn classify(ty: &Type) -> Option<BuiltinKind> {
    let name = ty.class_name()?.as_str();
    let kind = match name {
        "kotlin.Any" => BuiltinKind::Top,
        "kotlin.Unit" => BuiltinKind::Unit,
        "kotlin.String" => BuiltinKind::String,
        "kotlin.Array" => BuiltinKind::Array,
        "kotlin.Enum" => BuiltinKind::EnumBase,
        "kotlin.Throwable" => BuiltinKind::Throwable,
        "kotlin.reflect.KClass" => BuiltinKind::ClassReference,
        _ if PRIMITIVES.contains(&name) => BuiltinKind::Primitive,
        _ if PRIMITIVE_ARRAYS.contains(&name) => BuiltinKind::PrimitiveArray,
        _ if COLLECTIONS.contains(&name) => BuiltinKind::Collection,
        _ => return None,
    };
    Some(kind)
}

/// Whether `ty` is a built-in exportable type.
///
/// A star projection anywhere in the arguments vetoes the type outright.
/// For `kotlin.Array<T>`, `element_exportable` decides on `T`; an untyped
/// array is accepted.
pub fn is_builtin_exportable<E>(
    ty: &Type,
    mut element_exportable: impl FnMut(&Type) -> Result<bool, E>,
) -> Result<bool, E> {
    if ty.has_star_projection() {
        return Ok(false);
    }
    match classify(ty) {
        None => Ok(false),
        Some(BuiltinKind::Array) => match ty.arguments().first() {
            None => Ok(true),
            Some(TypeArgument::Star) => Ok(false),
            Some(TypeArgument::Type(element)) => element_exportable(element),
        },
        Some(_) => Ok(true),
    }
}

/// Whether `ty`, or any type in its argument tree, is a built-in that needs a
/// runtime conversion on the boundary.
pub fn needs_conversion(ty: &Type) -> bool {
    classify(ty).is_some_and(|kind| kind.needs_conversion())
        || ty.arguments().iter().any(|arg| match arg {
            TypeArgument::Star => false,
            TypeArgument::Type(inner) => needs_conversion(inner),
        })
}
