use std::fmt;
use std::sync::Arc;

use crate::decl::{ReferenceTypeDeclaration, TypeParameterDeclaration};
use crate::error::{ResolveError, Result};
use crate::ty::{Type, Wildcard, JAVA_LANG_OBJECT};
use crate::type_params::TypeParametersMap;

/// A usage of a class or interface, possibly parameterized.
///
/// The map is either empty (raw) or binds every declared type parameter, in
/// declaration order.
#[derive(Clone)]
pub struct ReferenceType {
    declaration: Arc<dyn ReferenceTypeDeclaration>,
    type_parameters_map: TypeParametersMap,
}

impl ReferenceType {
    pub fn new(declaration: Arc<dyn ReferenceTypeDeclaration>, type_arguments: Vec<Type>) -> Result<Self> {
        let params = declaration.type_parameters();
        if !type_arguments.is_empty() && type_arguments.len() != params.len() {
            return Err(ResolveError::InvariantViolation(format!(
                "{} expects {} type arguments, got {}",
                declaration.qualified_name(),
                params.len(),
                type_arguments.len()
            )));
        }
        let type_parameters_map = params
            .into_iter()
            .zip(type_arguments)
            .fold(TypeParametersMap::new(), |map, (tp, arg)| map.with(tp, arg));
        Ok(Self {
            declaration,
            type_parameters_map,
        })
    }

    /// Parameterized by the declaration's own type variables.
    pub fn undetermined(declaration: Arc<dyn ReferenceTypeDeclaration>) -> Self {
        let type_parameters_map = declaration
            .type_parameters()
            .into_iter()
            .fold(TypeParametersMap::new(), |map, tp| {
                map.with(tp.clone(), Type::TypeVariable(tp))
            });
        Self {
            declaration,
            type_parameters_map,
        }
    }

    pub fn raw(declaration: Arc<dyn ReferenceTypeDeclaration>) -> Self {
        Self {
            declaration,
            type_parameters_map: TypeParametersMap::new(),
        }
    }

    pub fn declaration(&self) -> &Arc<dyn ReferenceTypeDeclaration> {
        &self.declaration
    }

    pub fn qualified_name(&self) -> &str {
        self.declaration.qualified_name()
    }

    pub fn type_parameters_map(&self) -> &TypeParametersMap {
        &self.type_parameters_map
    }

    pub fn type_arguments(&self) -> impl Iterator<Item = &Type> + '_ {
        self.type_parameters_map.values()
    }

    /// The argument bound to the type parameter called `name`.
    pub fn type_argument(&self, name: &str) -> Option<&Type> {
        self.type_parameters_map.get_by_name(name)
    }

    pub fn is_java_lang_object(&self) -> bool {
        self.qualified_name() == JAVA_LANG_OBJECT
    }

    /// True without arguments, or when every argument is the declaration's own
    /// type variable. Non-generic types are never raw.
    pub fn is_raw(&self) -> bool {
        if self.declaration.type_parameters().is_empty() {
            return false;
        }
        self.type_parameters_map.iter().all(|(tp, arg)| match arg {
            Type::TypeVariable(var) => var.qualified_name() == tp.qualified_name(),
            _ => false,
        })
    }

    pub fn describe(&self) -> String {
        let mut out = self.qualified_name().to_string();
        if !self.type_parameters_map.is_empty() {
            let args: Vec<String> = self.type_arguments().map(Type::describe).collect();
            out.push('<');
            out.push_str(&args.join(", "));
            out.push('>');
        }
        out
    }

    /// Direct supertypes with this type's arguments substituted.
    pub fn ancestors(&self) -> Result<Vec<ReferenceType>> {
        Ok(self
            .declaration
            .ancestors()?
            .into_iter()
            .map(|a| self.substitute_into(a))
            .collect())
    }

    /// Transitive supertypes with this type's arguments substituted.
    ///
    /// `java.lang.Object` appears exactly once, at the end; it has no ancestors
    /// itself.
    pub fn all_ancestors(&self) -> Result<Vec<ReferenceType>> {
        if self.is_java_lang_object() {
            return Ok(Vec::new());
        }
        let mut ancestors: Vec<ReferenceType> = self
            .declaration
            .all_ancestors()?
            .into_iter()
            .map(|a| self.substitute_into(a))
            .filter(|a| !a.is_java_lang_object())
            .collect();
        let object = self.declaration.solver().solve_type(JAVA_LANG_OBJECT)?;
        ancestors.push(ReferenceType::raw(object));
        Ok(ancestors)
    }

    /// Type of the visible field `name` as seen through this parameterization.
    pub fn field_type(&self, name: &str) -> Result<Option<Type>> {
        let field = match self.declaration.field(name) {
            Ok(field) => field,
            Err(ResolveError::Unsolved { .. }) => return Ok(None),
            Err(err) => return Err(err),
        };
        let declaring = field.declaring_type();
        let declared = field.ty()?;
        if declaring.qualified_name() == self.qualified_name() {
            return Ok(Some(self.type_parameters_map.replace_all(&declared)));
        }
        // Inherited: substitute through the matching ancestor.
        let ancestor = self
            .all_ancestors()?
            .into_iter()
            .find(|a| a.qualified_name() == declaring.qualified_name());
        Ok(Some(match ancestor {
            Some(ancestor) => ancestor.type_parameters_map.replace_all(&declared),
            None => declared,
        }))
    }

    /// Rebuilds the type with every argument mapped through `f`.
    pub fn transform_type_arguments(
        &self,
        mut f: impl FnMut(&Type) -> Result<Type>,
    ) -> Result<ReferenceType> {
        let mut changed = false;
        let mut map = TypeParametersMap::new();
        for (tp, arg) in self.type_parameters_map.iter() {
            let transformed = f(arg)?;
            changed |= !transformed.same_instance(arg);
            map.insert(tp.clone(), transformed);
        }
        if !changed {
            return Ok(self.clone());
        }
        Ok(ReferenceType {
            declaration: self.declaration.clone(),
            type_parameters_map: map,
        })
    }

    pub fn is_assignable_by(&self, other: &Type) -> bool {
        match other {
            Type::Null => return true,
            Type::Void => return false,
            _ if self.is_java_lang_object() => return true,
            _ => {}
        }
        match other {
            Type::Primitive(p) => {
                let boxed = p.box_type_qualified_name();
                if self.qualified_name() == boxed {
                    return true;
                }
                match self.declaration.solver().solve_type(boxed) {
                    Ok(decl) => decl.can_be_assigned_to(self.declaration.as_ref()),
                    Err(err) => {
                        tracing::debug!(
                            target: "javasym.types",
                            boxed,
                            error = %err,
                            "cannot resolve box type"
                        );
                        false
                    }
                }
            }
            Type::Reference(other) => {
                if self.compare_considering_type_parameters(other) {
                    return true;
                }
                match other.all_ancestors() {
                    Ok(ancestors) => ancestors
                        .iter()
                        .any(|a| self.compare_considering_type_parameters(a)),
                    Err(err) => {
                        tracing::debug!(
                            target: "javasym.types",
                            name = other.qualified_name(),
                            error = %err,
                            "cannot compute ancestors"
                        );
                        false
                    }
                }
            }
            Type::TypeVariable(tp) => tp
                .bounds()
                .unwrap_or_default()
                .iter()
                .any(|b| b.is_extends() && self.is_assignable_by(b.ty())),
            Type::LambdaConstraint(c) => self.is_assignable_by(&c.bound),
            Type::Wildcard(w) => match &**w {
                Wildcard::Extends(bound) => self.is_assignable_by(bound),
                _ => false,
            },
            Type::Array(_) | Type::Null | Type::Void => false,
        }
    }

    /// Same type, or same declaration with compatible arguments.
    pub fn compare_considering_type_parameters(&self, other: &ReferenceType) -> bool {
        if self == other {
            return true;
        }
        if self.qualified_name() != other.qualified_name() {
            return false;
        }
        if self.is_raw() || other.is_raw() {
            return true;
        }
        if self.type_parameters_map.len() != other.type_parameters_map.len() {
            tracing::debug!(
                target: "javasym.types",
                this = %self.describe(),
                other = %other.describe(),
                "type argument count mismatch"
            );
            return false;
        }
        for (this_arg, other_arg) in self.type_arguments().zip(other.type_arguments()) {
            if this_arg == other_arg {
                continue;
            }
            match this_arg {
                Type::Wildcard(w) => match &**w {
                    Wildcard::Super(bound) if other_arg.is_assignable_by(bound) => {}
                    Wildcard::Extends(bound) if bound.is_assignable_by(other_arg) => {}
                    Wildcard::Unbounded => {}
                    _ => return false,
                },
                Type::TypeVariable(this_var) => {
                    let Type::TypeVariable(other_var) = other_arg else {
                        return false;
                    };
                    return same_bounds(this_var.as_ref(), other_var.as_ref());
                }
                _ => return false,
            }
        }
        true
    }

    /// `None` when nothing was replaced.
    pub(crate) fn replace_type_variables(
        &self,
        tp: &dyn TypeParameterDeclaration,
        replacement: &Type,
        inferred: &mut TypeParametersMap,
    ) -> Option<ReferenceType> {
        let mut changed = false;
        let mut map = TypeParametersMap::new();
        for (key, arg) in self.type_parameters_map.iter() {
            let replaced = arg.replace_type_variables(tp, replacement, inferred);
            changed |= !replaced.same_instance(arg);
            map.insert(key.clone(), replaced);
        }
        changed.then(|| ReferenceType {
            declaration: self.declaration.clone(),
            type_parameters_map: map,
        })
    }

    fn substitute_into(&self, ancestor: ReferenceType) -> ReferenceType {
        if self.type_parameters_map.is_empty() {
            return ancestor;
        }
        match self.type_parameters_map.replace_all(&Type::reference(ancestor.clone())) {
            Type::Reference(substituted) => Arc::unwrap_or_clone(substituted),
            _ => ancestor,
        }
    }
}

fn same_bounds(a: &dyn TypeParameterDeclaration, b: &dyn TypeParameterDeclaration) -> bool {
    match (a.bounds(), b.bounds()) {
        (Ok(a), Ok(b)) => a.len() == b.len() && a.iter().all(|bound| b.iter().any(|o| o.ty() == bound.ty())),
        _ => false,
    }
}

impl PartialEq for ReferenceType {
    fn eq(&self, other: &Self) -> bool {
        self.qualified_name() == other.qualified_name()
            && self.type_parameters_map == other.type_parameters_map
    }
}

impl Eq for ReferenceType {}

impl fmt::Debug for ReferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}
