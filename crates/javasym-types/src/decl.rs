//! Declaration capability traits.
//!
//! Every backend (source, binary, runtime, synthetic) implements these roles;
//! nothing above this module knows which backend a declaration came from.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::error::{ResolveError, Result};
use crate::reference::ReferenceType;
use crate::solver::SolverHandle;
use crate::symbol::SymbolReference;
use crate::ty::{Type, Wildcard, JAVA_LANG_OBJECT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Annotation,
}

impl TypeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
            TypeKind::Annotation => "annotation",
        }
    }
}

/// Which backend produced a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    Source,
    Binary,
    Runtime,
    Synthetic,
}

impl Origin {
    pub fn as_str(self) -> &'static str {
        match self {
            Origin::Source => "source",
            Origin::Binary => "binary",
            Origin::Runtime => "runtime",
            Origin::Synthetic => "synthetic",
        }
    }
}

pub trait Ancestry {
    /// Direct supertypes, expressed in terms of this declaration's own type
    /// variables.
    fn ancestors(&self) -> Result<Vec<ReferenceType>>;
}

pub trait FieldLookup {
    fn declared_fields(&self) -> Vec<Arc<dyn FieldDeclaration>>;
}

pub trait MethodLookup {
    fn declared_methods(&self) -> Vec<Arc<dyn MethodDeclaration>>;

    fn constructors(&self) -> Vec<Arc<dyn ConstructorDeclaration>>;

    /// Most applicable method named `name` visible in this type, including
    /// inherited ones.
    fn solve_method(
        &self,
        name: &str,
        args: &[Type],
        static_only: bool,
    ) -> Result<SymbolReference<Arc<dyn MethodDeclaration>>>;
}

/// A class, interface, enum or annotation.
pub trait ReferenceTypeDeclaration:
    Ancestry + FieldLookup + MethodLookup + Send + Sync + fmt::Debug
{
    /// Simple name; nested types use their own simple name.
    fn name(&self) -> &str;

    /// Dotted name, nested types joined with `.` (`java.util.Map.Entry`).
    fn qualified_name(&self) -> &str;

    fn package_name(&self) -> &str;

    fn kind(&self) -> TypeKind;

    fn origin(&self) -> Origin;

    fn type_parameters(&self) -> Vec<Arc<dyn TypeParameterDeclaration>>;

    fn internal_types(&self) -> Vec<Arc<dyn ReferenceTypeDeclaration>>;

    fn containing_type(&self) -> Result<Option<Arc<dyn ReferenceTypeDeclaration>>>;

    /// The solver that produced this declaration. Further lookups go through
    /// its root.
    fn solver(&self) -> &SolverHandle;

    fn is_class(&self) -> bool {
        self.kind() == TypeKind::Class
    }

    fn is_interface(&self) -> bool {
        self.kind() == TypeKind::Interface
    }

    fn is_enum(&self) -> bool {
        self.kind() == TypeKind::Enum
    }
}

impl<'a> dyn ReferenceTypeDeclaration + 'a {
    pub fn is_java_lang_object(&self) -> bool {
        self.qualified_name() == JAVA_LANG_OBJECT
    }

    /// Transitive supertypes with type arguments propagated along the chain.
    ///
    /// Duplicates reached through several paths are listed once. A type that
    /// reaches itself yields [`ResolveError::AncestorCycle`].
    pub fn all_ancestors(&self) -> Result<Vec<ReferenceType>> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut path = vec![self.qualified_name().to_string()];
        for ancestor in self.ancestors()? {
            collect_ancestors(ancestor, &mut path, &mut seen, &mut out)?;
        }
        Ok(out)
    }

    /// Own fields, then non-private fields of every ancestor.
    pub fn all_fields(&self) -> Result<Vec<Arc<dyn FieldDeclaration>>> {
        let mut fields = self.declared_fields();
        for ancestor in self.all_ancestors()? {
            fields.extend(
                ancestor
                    .declaration()
                    .declared_fields()
                    .into_iter()
                    .filter(|f| !f.is_private()),
            );
        }
        Ok(fields)
    }

    pub fn field(&self, name: &str) -> Result<Arc<dyn FieldDeclaration>> {
        self.all_fields()?
            .into_iter()
            .find(|f| f.name() == name)
            .ok_or_else(|| ResolveError::unsolved_in(name, self.qualified_name()))
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_ok()
    }

    /// Whether a value of this declaration's type can be stored in `other`.
    pub fn can_be_assigned_to(&self, other: &dyn ReferenceTypeDeclaration) -> bool {
        if other.qualified_name() == self.qualified_name() || other.is_java_lang_object() {
            return true;
        }
        match self.all_ancestors() {
            Ok(ancestors) => ancestors
                .iter()
                .any(|a| a.qualified_name() == other.qualified_name()),
            Err(err) => {
                tracing::debug!(
                    target: "javasym.types",
                    name = self.qualified_name(),
                    error = %err,
                    "cannot compute ancestors"
                );
                false
            }
        }
    }

    /// Declaration-level assignability: type arguments are ignored.
    pub fn is_assignable_by_type(&self, ty: &Type) -> bool {
        match ty {
            Type::Null => true,
            Type::Reference(other) => other.declaration().can_be_assigned_to(self),
            Type::Primitive(p) => {
                if self.is_java_lang_object() {
                    return true;
                }
                self.solver()
                    .solve_type(p.box_type_qualified_name())
                    .map(|boxed| boxed.can_be_assigned_to(self))
                    .unwrap_or(false)
            }
            Type::Array(_) => self.is_java_lang_object(),
            Type::TypeVariable(tp) => tp
                .bounds()
                .unwrap_or_default()
                .iter()
                .any(|b| b.is_extends() && self.is_assignable_by_type(b.ty())),
            Type::Wildcard(w) => match &**w {
                Wildcard::Extends(bound) => self.is_assignable_by_type(bound),
                _ => self.is_java_lang_object(),
            },
            Type::LambdaConstraint(c) => self.is_assignable_by_type(&c.bound),
            Type::Void => false,
        }
    }

    /// Looks up a type parameter by name here, then in enclosing types.
    pub fn find_type_parameter(&self, name: &str) -> Result<Option<Arc<dyn TypeParameterDeclaration>>> {
        if let Some(tp) = self.type_parameters().into_iter().find(|tp| tp.name() == name) {
            return Ok(Some(tp));
        }
        match self.containing_type()? {
            Some(outer) => outer.find_type_parameter(name),
            None => Ok(None),
        }
    }
}

fn collect_ancestors(
    ancestor: ReferenceType,
    path: &mut Vec<String>,
    seen: &mut HashSet<String>,
    out: &mut Vec<ReferenceType>,
) -> Result<()> {
    let qualified = ancestor.qualified_name().to_string();
    if path.contains(&qualified) {
        return Err(ResolveError::AncestorCycle(qualified));
    }
    if !seen.insert(ancestor.describe()) {
        return Ok(());
    }
    let parents = ancestor.ancestors()?;
    out.push(ancestor);
    path.push(qualified);
    for parent in parents {
        collect_ancestors(parent, path, seen, out)?;
    }
    path.pop();
    Ok(())
}

/// What a lexical type lookup can produce.
#[derive(Debug, Clone)]
pub enum TypeDeclaration {
    Reference(Arc<dyn ReferenceTypeDeclaration>),
    TypeParameter(Arc<dyn TypeParameterDeclaration>),
}

impl TypeDeclaration {
    pub fn name(&self) -> &str {
        match self {
            TypeDeclaration::Reference(decl) => decl.name(),
            TypeDeclaration::TypeParameter(tp) => tp.name(),
        }
    }

    pub fn qualified_name(&self) -> String {
        match self {
            TypeDeclaration::Reference(decl) => decl.qualified_name().to_string(),
            TypeDeclaration::TypeParameter(tp) => tp.qualified_name(),
        }
    }

    pub fn is_type_parameter(&self) -> bool {
        matches!(self, TypeDeclaration::TypeParameter(_))
    }

    pub fn as_reference(&self) -> Option<&Arc<dyn ReferenceTypeDeclaration>> {
        match self {
            TypeDeclaration::Reference(decl) => Some(decl),
            TypeDeclaration::TypeParameter(_) => None,
        }
    }

    pub fn into_reference(self) -> Option<Arc<dyn ReferenceTypeDeclaration>> {
        match self {
            TypeDeclaration::Reference(decl) => Some(decl),
            TypeDeclaration::TypeParameter(_) => None,
        }
    }
}

/// Where a type parameter is declared. The payload is the container's
/// identity: a type's qualified name, or `Type.member` for methods and
/// constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeParameterContainer {
    Type(String),
    Method(String),
    Constructor(String),
}

impl TypeParameterContainer {
    pub fn id(&self) -> &str {
        match self {
            TypeParameterContainer::Type(id)
            | TypeParameterContainer::Method(id)
            | TypeParameterContainer::Constructor(id) => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bound {
    is_extends: bool,
    ty: Type,
}

impl Bound {
    pub fn extends(ty: Type) -> Self {
        Self { is_extends: true, ty }
    }

    pub fn super_(ty: Type) -> Self {
        Self { is_extends: false, ty }
    }

    pub fn is_extends(&self) -> bool {
        self.is_extends
    }

    pub fn is_super(&self) -> bool {
        !self.is_extends
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }
}

pub trait TypeParameterDeclaration: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn container(&self) -> TypeParameterContainer;

    /// Resolved lazily; fails when the container cannot reach a solver.
    fn bounds(&self) -> Result<Vec<Bound>>;

    fn qualified_name(&self) -> String {
        format!("{}.{}", self.container().id(), self.name())
    }

    fn declared_on_type(&self) -> bool {
        matches!(self.container(), TypeParameterContainer::Type(_))
    }

    fn declared_on_method(&self) -> bool {
        matches!(self.container(), TypeParameterContainer::Method(_))
    }

    fn declared_on_constructor(&self) -> bool {
        matches!(self.container(), TypeParameterContainer::Constructor(_))
    }

    fn has_lower_bound(&self) -> Result<bool> {
        Ok(self.bounds()?.iter().any(Bound::is_super))
    }

    fn lower_bound(&self) -> Result<Option<Type>> {
        Ok(self
            .bounds()?
            .into_iter()
            .find(Bound::is_super)
            .map(|b| b.ty))
    }

    fn upper_bounds(&self) -> Result<Vec<Type>> {
        Ok(self
            .bounds()?
            .into_iter()
            .filter(Bound::is_extends)
            .map(|b| b.ty)
            .collect())
    }
}

/// Anything with a name and a type: fields, parameters, locals.
pub trait ValueDeclaration: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn ty(&self) -> Result<Type>;
}

pub trait FieldDeclaration: ValueDeclaration {
    fn is_static(&self) -> bool;

    fn is_private(&self) -> bool;

    fn declaring_type(&self) -> Arc<dyn ReferenceTypeDeclaration>;
}

pub trait ParameterDeclaration: ValueDeclaration {
    fn is_variadic(&self) -> bool;
}

/// Shared surface of methods and constructors.
pub trait MethodLikeDeclaration: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn declaring_type(&self) -> Arc<dyn ReferenceTypeDeclaration>;

    fn params(&self) -> Vec<Arc<dyn ParameterDeclaration>>;

    fn type_parameters(&self) -> Vec<Arc<dyn TypeParameterDeclaration>>;

    fn param_count(&self) -> usize {
        self.params().len()
    }

    fn param(&self, index: usize) -> Result<Arc<dyn ParameterDeclaration>> {
        self.params().get(index).cloned().ok_or_else(|| {
            ResolveError::InvariantViolation(format!(
                "`{}` has no parameter at index {index}",
                self.name()
            ))
        })
    }

    fn param_type(&self, index: usize) -> Result<Type> {
        self.param(index)?.ty()
    }

    fn last_param(&self) -> Result<Arc<dyn ParameterDeclaration>> {
        self.params().last().cloned().ok_or_else(|| {
            ResolveError::InvariantViolation(format!("`{}` has no parameters", self.name()))
        })
    }

    fn is_variadic(&self) -> bool {
        self.params().last().is_some_and(|p| p.is_variadic())
    }

    /// Own type parameters shadow those of the declaring type and the types
    /// enclosing it.
    fn find_type_parameter(&self, name: &str) -> Result<Option<Arc<dyn TypeParameterDeclaration>>> {
        if let Some(tp) = self.type_parameters().into_iter().find(|tp| tp.name() == name) {
            return Ok(Some(tp));
        }
        self.declaring_type().find_type_parameter(name)
    }

    /// `name(T1, T2)` with described parameter types.
    fn signature(&self) -> Result<String> {
        let params = self
            .params()
            .iter()
            .map(|p| p.ty().map(|ty| ty.describe()))
            .collect::<Result<Vec<_>>>()?;
        Ok(format!("{}({})", self.name(), params.join(", ")))
    }

    fn qualified_signature(&self) -> Result<String> {
        Ok(format!(
            "{}.{}",
            self.declaring_type().qualified_name(),
            self.signature()?
        ))
    }
}

pub trait MethodDeclaration: MethodLikeDeclaration {
    fn return_type(&self) -> Result<Type>;

    fn is_static(&self) -> bool;

    fn is_abstract(&self) -> bool;
}

pub trait ConstructorDeclaration: MethodLikeDeclaration {}
