//! Declarations backed by parsed source.
//!
//! Written types are resolved on demand through the lexical scope of the
//! member that mentions them, so a declaration costs nothing until queried.

use std::fmt;
use std::sync::Arc;

use javasym_syntax::ast::{ParamDecl, TypeParam, TypeRef};
use javasym_types::{
    resolution, Ancestry, Bound, ConstructorDeclaration, FieldDeclaration, FieldLookup, MethodDeclaration,
    MethodLikeDeclaration, MethodLookup, Origin, ParameterDeclaration, ReferenceType, ReferenceTypeDeclaration,
    ResolveError, Result, SolverHandle, SymbolReference, Type, TypeKind, TypeParameterContainer,
    TypeParameterDeclaration, ValueDeclaration, JAVA_LANG_OBJECT,
};

use crate::context::Context;
use crate::source::file::{SourceFile, TypeNode};

const JAVA_LANG_ENUM: &str = "java.lang.Enum";
const JAVA_LANG_STRING: &str = "java.lang.String";

/// Which method-like member of a type a handle refers to. Enums get the
/// implicit `values()` and `valueOf(String)`; classes without constructors
/// get the default one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MethodSlot {
    Method(usize),
    Constructor(usize),
    DefaultConstructor,
    EnumValues,
    EnumValueOf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldSlot {
    Member(usize),
    EnumConstant(usize),
}

/// Scope that declares a type parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Owner {
    Type,
    Member(MethodSlot),
}

fn as_reference(ty: Type, owner: &str) -> Result<ReferenceType> {
    match ty {
        Type::Reference(reference) => Ok(Arc::unwrap_or_clone(reference)),
        other => Err(ResolveError::InvariantViolation(format!(
            "supertype {} of {owner} is not a class or interface",
            other.describe()
        ))),
    }
}

pub(crate) struct SourceTypeDeclaration {
    file: Arc<SourceFile>,
    index: usize,
}

impl SourceTypeDeclaration {
    pub(crate) fn new(file: Arc<SourceFile>, index: usize) -> Self {
        Self { file, index }
    }

    fn node(&self) -> &TypeNode {
        self.file.node(self.index)
    }

    fn supertype(&self, ty: &TypeRef) -> Result<ReferenceType> {
        let node = self.node();
        let context = self.file.header_context(self.index);
        let resolved = self.file.resolve(ty, context.as_ref(), &node.qualified_name)?;
        as_reference(resolved, &node.qualified_name)
    }

    fn method_slots(&self) -> Vec<MethodSlot> {
        let node = self.node();
        let mut slots: Vec<MethodSlot> = (0..node.methods.len()).map(MethodSlot::Method).collect();
        if node.kind == TypeKind::Enum {
            slots.push(MethodSlot::EnumValues);
            slots.push(MethodSlot::EnumValueOf);
        }
        slots
    }

    fn constructor_slots(&self) -> Vec<MethodSlot> {
        let node = self.node();
        match node.kind {
            TypeKind::Interface | TypeKind::Annotation => Vec::new(),
            _ if node.constructors.is_empty() => vec![MethodSlot::DefaultConstructor],
            _ => (0..node.constructors.len()).map(MethodSlot::Constructor).collect(),
        }
    }
}

impl fmt::Debug for SourceTypeDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceTypeDeclaration")
            .field("name", &self.node().qualified_name)
            .field("kind", &self.node().kind)
            .finish()
    }
}

impl Ancestry for SourceTypeDeclaration {
    fn ancestors(&self) -> Result<Vec<ReferenceType>> {
        let node = self.node();
        let mut ancestors = Vec::new();
        match node.kind {
            TypeKind::Class => {
                match node.extends.first() {
                    Some(super_class) => ancestors.push(self.supertype(super_class)?),
                    None if node.qualified_name != JAVA_LANG_OBJECT => {
                        let object = self.file.solver.solve_type(JAVA_LANG_OBJECT)?;
                        ancestors.push(ReferenceType::raw(object));
                    }
                    None => {}
                }
                for interface in &node.implements {
                    ancestors.push(self.supertype(interface)?);
                }
            }
            TypeKind::Interface => {
                for interface in &node.extends {
                    ancestors.push(self.supertype(interface)?);
                }
            }
            TypeKind::Enum => {
                let enum_class = self.file.solver.solve_type(JAVA_LANG_ENUM)?;
                let this = Type::reference(ReferenceType::raw(self.file.declaration(self.index)));
                ancestors.push(ReferenceType::new(enum_class, vec![this])?);
                for interface in &node.implements {
                    ancestors.push(self.supertype(interface)?);
                }
            }
            TypeKind::Annotation => {}
        }
        Ok(ancestors)
    }
}

impl FieldLookup for SourceTypeDeclaration {
    fn declared_fields(&self) -> Vec<Arc<dyn FieldDeclaration>> {
        let node = self.node();
        let constants = (0..node.enum_constants.len()).map(FieldSlot::EnumConstant);
        constants
            .chain((0..node.fields.len()).map(FieldSlot::Member))
            .map(|slot| {
                Arc::new(SourceField {
                    file: self.file.clone(),
                    index: self.index,
                    slot,
                }) as Arc<dyn FieldDeclaration>
            })
            .collect()
    }
}

impl MethodLookup for SourceTypeDeclaration {
    fn declared_methods(&self) -> Vec<Arc<dyn MethodDeclaration>> {
        self.method_slots()
            .into_iter()
            .map(|slot| Arc::new(SourceMethod::new(self.file.clone(), self.index, slot)) as Arc<dyn MethodDeclaration>)
            .collect()
    }

    fn constructors(&self) -> Vec<Arc<dyn ConstructorDeclaration>> {
        self.constructor_slots()
            .into_iter()
            .map(|slot| {
                Arc::new(SourceMethod::new(self.file.clone(), self.index, slot)) as Arc<dyn ConstructorDeclaration>
            })
            .collect()
    }

    fn solve_method(
        &self,
        name: &str,
        args: &[Type],
        static_only: bool,
    ) -> Result<SymbolReference<Arc<dyn MethodDeclaration>>> {
        resolution::solve_method_in_type(self, name, args, static_only)
    }
}

impl ReferenceTypeDeclaration for SourceTypeDeclaration {
    fn name(&self) -> &str {
        &self.node().name
    }

    fn qualified_name(&self) -> &str {
        &self.node().qualified_name
    }

    fn package_name(&self) -> &str {
        self.file.package_name()
    }

    fn kind(&self) -> TypeKind {
        self.node().kind
    }

    fn origin(&self) -> Origin {
        Origin::Source
    }

    fn type_parameters(&self) -> Vec<Arc<dyn TypeParameterDeclaration>> {
        (0..self.node().type_params.len())
            .map(|position| {
                Arc::new(SourceTypeParameter {
                    file: self.file.clone(),
                    index: self.index,
                    owner: Owner::Type,
                    position,
                }) as Arc<dyn TypeParameterDeclaration>
            })
            .collect()
    }

    fn internal_types(&self) -> Vec<Arc<dyn ReferenceTypeDeclaration>> {
        self.node()
            .nested
            .iter()
            .map(|&nested| self.file.declaration(nested))
            .collect()
    }

    fn containing_type(&self) -> Result<Option<Arc<dyn ReferenceTypeDeclaration>>> {
        Ok(self.node().parent.map(|outer| self.file.declaration(outer)))
    }

    fn solver(&self) -> &SolverHandle {
        &self.file.solver
    }
}

struct SourceTypeParameter {
    file: Arc<SourceFile>,
    index: usize,
    owner: Owner,
    position: usize,
}

impl SourceTypeParameter {
    fn written(&self) -> Option<&TypeParam> {
        let node = self.file.node(self.index);
        let params = match self.owner {
            Owner::Type => &node.type_params,
            Owner::Member(MethodSlot::Method(method)) => &node.methods[method].type_params,
            Owner::Member(MethodSlot::Constructor(constructor)) => &node.constructors[constructor].type_params,
            Owner::Member(_) => return None,
        };
        params.get(self.position)
    }

    fn context(&self) -> Arc<dyn Context> {
        match self.owner {
            Owner::Type => self.file.header_context(self.index),
            Owner::Member(slot) => self.file.member_context(self.index, slot),
        }
    }
}

impl fmt::Debug for SourceTypeParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeParameter({})", self.qualified_name())
    }
}

impl TypeParameterDeclaration for SourceTypeParameter {
    fn name(&self) -> &str {
        self.written().map(|tp| tp.name.as_str()).unwrap_or_default()
    }

    fn container(&self) -> TypeParameterContainer {
        let node = self.file.node(self.index);
        let qualified = &node.qualified_name;
        match self.owner {
            Owner::Type => TypeParameterContainer::Type(qualified.clone()),
            Owner::Member(MethodSlot::Method(method)) => {
                TypeParameterContainer::Method(format!("{qualified}.{}", node.methods[method].name))
            }
            Owner::Member(_) => TypeParameterContainer::Constructor(format!("{qualified}.{}", node.name)),
        }
    }

    fn bounds(&self) -> Result<Vec<Bound>> {
        let Some(written) = self.written() else {
            return Ok(Vec::new());
        };
        let context = self.context();
        let scope = self.qualified_name();
        written.bounds
            .iter()
            .map(|bound| Ok(Bound::extends(self.file.resolve(bound, context.as_ref(), &scope)?)))
            .collect()
    }
}

struct SourceField {
    file: Arc<SourceFile>,
    index: usize,
    slot: FieldSlot,
}

impl fmt::Debug for SourceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Field({}.{})", self.file.node(self.index).qualified_name, self.name())
    }
}

impl ValueDeclaration for SourceField {
    fn name(&self) -> &str {
        let node = self.file.node(self.index);
        match self.slot {
            FieldSlot::Member(field) => &node.fields[field].name,
            FieldSlot::EnumConstant(constant) => &node.enum_constants[constant],
        }
    }

    fn ty(&self) -> Result<Type> {
        let node = self.file.node(self.index);
        match self.slot {
            FieldSlot::Member(field) => {
                let context = self.file.body_context(self.index);
                self.file
                    .resolve(&node.fields[field].ty, context.as_ref(), &node.qualified_name)
            }
            FieldSlot::EnumConstant(_) => Ok(Type::reference(ReferenceType::raw(
                self.file.declaration(self.index),
            ))),
        }
    }
}

impl FieldDeclaration for SourceField {
    fn is_static(&self) -> bool {
        let node = self.file.node(self.index);
        match self.slot {
            FieldSlot::Member(field) => node.fields[field].modifiers.is_static || node.kind == TypeKind::Interface,
            FieldSlot::EnumConstant(_) => true,
        }
    }

    fn is_private(&self) -> bool {
        match self.slot {
            FieldSlot::Member(field) => self.file.node(self.index).fields[field].modifiers.is_private,
            FieldSlot::EnumConstant(_) => false,
        }
    }

    fn declaring_type(&self) -> Arc<dyn ReferenceTypeDeclaration> {
        self.file.declaration(self.index)
    }
}

/// A method or constructor of a source type, written or implicit.
pub(crate) struct SourceMethod {
    file: Arc<SourceFile>,
    index: usize,
    slot: MethodSlot,
}

impl SourceMethod {
    pub(crate) fn new(file: Arc<SourceFile>, index: usize, slot: MethodSlot) -> Self {
        Self { file, index, slot }
    }

    fn node(&self) -> &TypeNode {
        self.file.node(self.index)
    }

    fn written_params(&self) -> &[ParamDecl] {
        let node = self.node();
        match self.slot {
            MethodSlot::Method(method) => &node.methods[method].params,
            MethodSlot::Constructor(constructor) => &node.constructors[constructor].params,
            _ => &[],
        }
    }

    fn resolve(&self, ty: &TypeRef) -> Result<Type> {
        let context = self.file.member_context(self.index, self.slot);
        self.file.resolve(ty, context.as_ref(), &self.node().qualified_name)
    }

    fn this_type(&self) -> Type {
        Type::reference(ReferenceType::raw(self.file.declaration(self.index)))
    }
}

impl fmt::Debug for SourceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Method({}.{})", self.node().qualified_name, self.name())
    }
}

impl MethodLikeDeclaration for SourceMethod {
    fn name(&self) -> &str {
        let node = self.node();
        match self.slot {
            MethodSlot::Method(method) => &node.methods[method].name,
            MethodSlot::Constructor(_) | MethodSlot::DefaultConstructor => &node.name,
            MethodSlot::EnumValues => "values",
            MethodSlot::EnumValueOf => "valueOf",
        }
    }

    fn declaring_type(&self) -> Arc<dyn ReferenceTypeDeclaration> {
        self.file.declaration(self.index)
    }

    fn params(&self) -> Vec<Arc<dyn ParameterDeclaration>> {
        let count = match self.slot {
            MethodSlot::EnumValueOf => 1,
            _ => self.written_params().len(),
        };
        (0..count)
            .map(|position| {
                Arc::new(SourceParameter {
                    method: SourceMethod::new(self.file.clone(), self.index, self.slot),
                    position,
                }) as Arc<dyn ParameterDeclaration>
            })
            .collect()
    }

    fn type_parameters(&self) -> Vec<Arc<dyn TypeParameterDeclaration>> {
        let node = self.node();
        let count = match self.slot {
            MethodSlot::Method(method) => node.methods[method].type_params.len(),
            MethodSlot::Constructor(constructor) => node.constructors[constructor].type_params.len(),
            _ => 0,
        };
        (0..count)
            .map(|position| {
                Arc::new(SourceTypeParameter {
                    file: self.file.clone(),
                    index: self.index,
                    owner: Owner::Member(self.slot),
                    position,
                }) as Arc<dyn TypeParameterDeclaration>
            })
            .collect()
    }
}

impl MethodDeclaration for SourceMethod {
    fn return_type(&self) -> Result<Type> {
        match self.slot {
            MethodSlot::Method(method) => self.resolve(&self.node().methods[method].return_ty),
            MethodSlot::EnumValues => Ok(Type::array(self.this_type())),
            MethodSlot::EnumValueOf => Ok(self.this_type()),
            MethodSlot::Constructor(_) | MethodSlot::DefaultConstructor => Ok(Type::Void),
        }
    }

    fn is_static(&self) -> bool {
        match self.slot {
            MethodSlot::Method(method) => self.node().methods[method].modifiers.is_static,
            MethodSlot::EnumValues | MethodSlot::EnumValueOf => true,
            MethodSlot::Constructor(_) | MethodSlot::DefaultConstructor => false,
        }
    }

    /// Interface methods without a body are implicitly abstract.
    fn is_abstract(&self) -> bool {
        let node = self.node();
        match self.slot {
            MethodSlot::Method(method) => {
                let method = &node.methods[method];
                let modifiers = &method.modifiers;
                modifiers.is_abstract
                    || (node.kind == TypeKind::Interface
                        && !modifiers.is_default
                        && !modifiers.is_static
                        && !method.has_body)
            }
            _ => false,
        }
    }
}

impl ConstructorDeclaration for SourceMethod {}

struct SourceParameter {
    method: SourceMethod,
    position: usize,
}

impl fmt::Debug for SourceParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parameter({:?}#{})", self.method, self.position)
    }
}

impl ValueDeclaration for SourceParameter {
    fn name(&self) -> &str {
        match self.method.slot {
            MethodSlot::EnumValueOf => "name",
            _ => self
                .method
                .written_params()
                .get(self.position)
                .map(|p| p.name.as_str())
                .unwrap_or_default(),
        }
    }

    fn ty(&self) -> Result<Type> {
        if self.method.slot == MethodSlot::EnumValueOf {
            let string = self.method.file.solver.solve_type(JAVA_LANG_STRING)?;
            return Ok(Type::reference(ReferenceType::raw(string)));
        }
        let param = self.method.written_params().get(self.position).ok_or_else(|| {
            ResolveError::InvariantViolation(format!(
                "`{}` has no parameter at index {}",
                self.method.name(),
                self.position
            ))
        })?;
        self.method.resolve(&param.ty)
    }
}

impl ParameterDeclaration for SourceParameter {
    fn is_variadic(&self) -> bool {
        self.method
            .written_params()
            .get(self.position)
            .is_some_and(|p| p.is_varargs)
    }
}
