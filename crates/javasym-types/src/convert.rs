use javasym_syntax::ast::{TypeArg, TypeRef, TypeRefKind, WildcardBound};

use crate::decl::TypeDeclaration;
use crate::error::{ResolveError, Result};
use crate::reference::ReferenceType;
use crate::ty::{PrimitiveType, Type, Wildcard};

/// Converts a written type into a [`Type`].
///
/// Class names are handed to `resolve` as written, dotted, without type
/// arguments (`Map.Entry`, `java.util.List`). Only the arguments of the last
/// segment are kept.
pub fn type_from_syntax(ty: &TypeRef, resolve: &dyn Fn(&str) -> Result<TypeDeclaration>) -> Result<Type> {
    match &ty.kind {
        TypeRefKind::Primitive(keyword) => PrimitiveType::from_keyword(keyword)
            .map(Type::Primitive)
            .ok_or_else(|| ResolveError::Unsupported(format!("primitive type `{keyword}`"))),
        TypeRefKind::Void => Ok(Type::Void),
        TypeRefKind::Array(component) => Ok(Type::array(type_from_syntax(component, resolve)?)),
        TypeRefKind::Class(segments) => {
            let name = segments
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
                .join(".");
            match resolve(&name)? {
                TypeDeclaration::TypeParameter(tp) => Ok(Type::TypeVariable(tp)),
                TypeDeclaration::Reference(decl) => {
                    let args = match segments.last() {
                        Some(last) => last
                            .args
                            .iter()
                            .map(|arg| type_argument(arg, resolve))
                            .collect::<Result<Vec<_>>>()?,
                        None => Vec::new(),
                    };
                    Ok(Type::reference(ReferenceType::new(decl, args)?))
                }
            }
        }
    }
}

fn type_argument(arg: &TypeArg, resolve: &dyn Fn(&str) -> Result<TypeDeclaration>) -> Result<Type> {
    Ok(match arg {
        TypeArg::Type(ty) => type_from_syntax(ty, resolve)?,
        TypeArg::Wildcard(None) => Type::wildcard(Wildcard::Unbounded),
        TypeArg::Wildcard(Some(WildcardBound::Extends(bound))) => {
            Type::wildcard(Wildcard::Extends(type_from_syntax(bound, resolve)?))
        }
        TypeArg::Wildcard(Some(WildcardBound::Super(bound))) => {
            Type::wildcard(Wildcard::Super(type_from_syntax(bound, resolve)?))
        }
    })
}
