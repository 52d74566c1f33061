//! Declarations assembled in code.
//!
//! Types are written as source text (`java.util.List<T>`, `int[]`,
//! `java.lang.String`) and resolved lazily: names of type parameters in scope
//! resolve to type variables, everything else through the root of the solver
//! the declaration was built for. Class names must be fully qualified.

use std::fmt;
use std::sync::Arc;

use crate::convert::type_from_syntax;
use crate::decl::{
    Ancestry, Bound, ConstructorDeclaration, FieldDeclaration, FieldLookup, MethodDeclaration,
    MethodLikeDeclaration, MethodLookup, Origin, ParameterDeclaration, ReferenceTypeDeclaration,
    TypeDeclaration, TypeKind, TypeParameterContainer, TypeParameterDeclaration, ValueDeclaration,
};
use crate::error::{ResolveError, Result};
use crate::reference::ReferenceType;
use crate::resolution;
use crate::solver::SolverHandle;
use crate::symbol::SymbolReference;
use crate::ty::{Type, JAVA_LANG_OBJECT};

#[derive(Debug, Clone)]
struct TypeParamData {
    name: String,
    bounds: Vec<String>,
}

#[derive(Debug, Clone)]
struct FieldData {
    name: String,
    ty: String,
    is_static: bool,
    is_private: bool,
}

#[derive(Debug, Clone)]
struct ParamData {
    name: String,
    ty: String,
    is_variadic: bool,
}

/// Describes one method or constructor of a [`TypeDeclarationBuilder`].
#[derive(Debug, Clone)]
pub struct MethodBuilder {
    name: String,
    type_params: Vec<TypeParamData>,
    params: Vec<ParamData>,
    return_type: String,
    is_static: bool,
    is_abstract: bool,
}

impl MethodBuilder {
    /// A `void` instance method without parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_params: Vec::new(),
            params: Vec::new(),
            return_type: "void".to_string(),
            is_static: false,
            is_abstract: false,
        }
    }

    pub fn returns(mut self, ty: impl Into<String>) -> Self {
        self.return_type = ty.into();
        self
    }

    pub fn param(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.params.push(ParamData {
            name: name.into(),
            ty: ty.into(),
            is_variadic: false,
        });
        self
    }

    /// Trailing `element...` parameter; its type is `element[]`.
    pub fn varargs(mut self, name: impl Into<String>, element: impl Into<String>) -> Self {
        self.params.push(ParamData {
            name: name.into(),
            ty: format!("{}[]", element.into()),
            is_variadic: true,
        });
        self
    }

    pub fn type_param(mut self, name: impl Into<String>, bounds: &[&str]) -> Self {
        self.type_params.push(TypeParamData {
            name: name.into(),
            bounds: bounds.iter().map(|b| b.to_string()).collect(),
        });
        self
    }

    pub fn static_(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn abstract_(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    fn validate(&self, owner: &str) -> Result<()> {
        if let Some(pos) = self.params.iter().position(|p| p.is_variadic) {
            if pos + 1 != self.params.len() {
                return Err(ResolveError::InvariantViolation(format!(
                    "{owner}.{}: variadic parameter must be last",
                    self.name
                )));
            }
        }
        check_unique_type_params(&self.type_params, owner)
    }
}

/// Builds a class, interface or enum declaration.
///
/// ```
/// use javasym_types::synthetic::{MethodBuilder, TypeDeclarationBuilder};
///
/// let builder = TypeDeclarationBuilder::class("com.example.Box")
///     .type_param("T", &[])
///     .field("value", "T")
///     .method(MethodBuilder::new("get").returns("T"));
/// # let _ = builder;
/// ```
#[derive(Debug, Clone)]
pub struct TypeDeclarationBuilder {
    qualified_name: String,
    kind: TypeKind,
    type_params: Vec<TypeParamData>,
    extends: Vec<String>,
    implements: Vec<String>,
    fields: Vec<FieldData>,
    methods: Vec<MethodBuilder>,
    constructors: Vec<MethodBuilder>,
}

impl TypeDeclarationBuilder {
    fn new(qualified_name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            kind,
            type_params: Vec::new(),
            extends: Vec::new(),
            implements: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
        }
    }

    pub fn class(qualified_name: impl Into<String>) -> Self {
        Self::new(qualified_name, TypeKind::Class)
    }

    pub fn interface(qualified_name: impl Into<String>) -> Self {
        Self::new(qualified_name, TypeKind::Interface)
    }

    /// Enums implicitly extend `java.lang.Enum<Self>` and declare `values()`
    /// and `valueOf(String)`.
    pub fn enumeration(qualified_name: impl Into<String>) -> Self {
        Self::new(qualified_name, TypeKind::Enum)
    }

    pub fn type_param(mut self, name: impl Into<String>, bounds: &[&str]) -> Self {
        self.type_params.push(TypeParamData {
            name: name.into(),
            bounds: bounds.iter().map(|b| b.to_string()).collect(),
        });
        self
    }

    /// Superclass of a class, or a superinterface of an interface.
    pub fn extends(mut self, ty: impl Into<String>) -> Self {
        self.extends.push(ty.into());
        self
    }

    pub fn implements(mut self, ty: impl Into<String>) -> Self {
        self.implements.push(ty.into());
        self
    }

    pub fn field(self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.push_field(name.into(), ty.into(), false, false)
    }

    pub fn static_field(self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.push_field(name.into(), ty.into(), true, false)
    }

    pub fn private_field(self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.push_field(name.into(), ty.into(), false, true)
    }

    fn push_field(mut self, name: String, ty: String, is_static: bool, is_private: bool) -> Self {
        self.fields.push(FieldData {
            name,
            ty,
            is_static,
            is_private,
        });
        self
    }

    pub fn method(mut self, method: MethodBuilder) -> Self {
        self.methods.push(method);
        self
    }

    /// The builder's name and return type are ignored.
    pub fn constructor(mut self, constructor: MethodBuilder) -> Self {
        self.constructors.push(constructor);
        self
    }

    pub fn build(self, solver: SolverHandle) -> Result<Arc<dyn ReferenceTypeDeclaration>> {
        let qualified_name = self.qualified_name;
        if qualified_name.is_empty() || qualified_name.split('.').any(str::is_empty) {
            return Err(ResolveError::InvariantViolation(format!(
                "malformed type name `{qualified_name}`"
            )));
        }
        let (package, name) = match qualified_name.rsplit_once('.') {
            Some((package, name)) => (package.to_string(), name.to_string()),
            None => (String::new(), qualified_name.clone()),
        };
        check_unique_type_params(&self.type_params, &qualified_name)?;
        for method in self.methods.iter().chain(&self.constructors) {
            method.validate(&qualified_name)?;
        }

        let mut supertypes = Vec::new();
        match self.kind {
            TypeKind::Class => {
                if self.extends.len() > 1 {
                    return Err(ResolveError::InvariantViolation(format!(
                        "class {qualified_name} extends more than one class"
                    )));
                }
                if self.extends.is_empty() && qualified_name != JAVA_LANG_OBJECT {
                    supertypes.push(JAVA_LANG_OBJECT.to_string());
                }
                supertypes.extend(self.extends);
            }
            TypeKind::Enum => {
                supertypes.push(format!("java.lang.Enum<{qualified_name}>"));
            }
            TypeKind::Interface | TypeKind::Annotation => supertypes.extend(self.extends),
        }
        supertypes.extend(self.implements);

        let mut methods = self.methods;
        if self.kind == TypeKind::Enum {
            methods.push(
                MethodBuilder::new("values")
                    .returns(format!("{qualified_name}[]"))
                    .static_(),
            );
            methods.push(
                MethodBuilder::new("valueOf")
                    .param("name", "java.lang.String")
                    .returns(qualified_name.clone())
                    .static_(),
            );
        }
        let constructors = self
            .constructors
            .into_iter()
            .map(|mut c| {
                c.name = name.clone();
                c.return_type = "void".to_string();
                c
            })
            .collect();

        let data = Arc::new(ClassData {
            name,
            qualified_name,
            package,
            kind: self.kind,
            type_params: self.type_params,
            supertypes,
            fields: self.fields,
            methods,
            constructors,
            solver,
        });
        Ok(Arc::new(SyntheticTypeDeclaration { data }))
    }
}

fn check_unique_type_params(params: &[TypeParamData], owner: &str) -> Result<()> {
    for (i, tp) in params.iter().enumerate() {
        if params[..i].iter().any(|other| other.name == tp.name) {
            return Err(ResolveError::InvariantViolation(format!(
                "duplicate type parameter `{}` on {owner}",
                tp.name
            )));
        }
    }
    Ok(())
}

struct ClassData {
    name: String,
    qualified_name: String,
    package: String,
    kind: TypeKind,
    type_params: Vec<TypeParamData>,
    supertypes: Vec<String>,
    fields: Vec<FieldData>,
    methods: Vec<MethodBuilder>,
    constructors: Vec<MethodBuilder>,
    solver: SolverHandle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Member {
    Method(usize),
    Constructor(usize),
}

/// Scope that declares a type parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Owner {
    Type,
    Member(Member),
}

impl ClassData {
    fn member(&self, member: Member) -> &MethodBuilder {
        match member {
            Member::Method(index) => &self.methods[index],
            Member::Constructor(index) => &self.constructors[index],
        }
    }

    fn type_params_of(&self, owner: Owner) -> &[TypeParamData] {
        match owner {
            Owner::Type => &self.type_params,
            Owner::Member(member) => &self.member(member).type_params,
        }
    }

    fn declaration(self: &Arc<Self>) -> Arc<dyn ReferenceTypeDeclaration> {
        Arc::new(SyntheticTypeDeclaration { data: self.clone() })
    }

    fn type_parameter(self: &Arc<Self>, owner: Owner, name: &str) -> Result<Option<Arc<dyn TypeParameterDeclaration>>> {
        match owner {
            Owner::Type => self.declaration().find_type_parameter(name),
            Owner::Member(member) => SyntheticMethod {
                data: self.clone(),
                member,
            }
            .find_type_parameter(name),
        }
    }

    fn lookup(self: &Arc<Self>, name: &str, owner: Owner) -> Result<TypeDeclaration> {
        if let Some(tp) = self.type_parameter(owner, name)? {
            return Ok(TypeDeclaration::TypeParameter(tp));
        }
        if name == self.qualified_name {
            return Ok(TypeDeclaration::Reference(self.declaration()));
        }
        Ok(TypeDeclaration::Reference(self.solver.solve_type(name)?))
    }

    fn resolve(self: &Arc<Self>, text: &str, owner: Owner) -> Result<Type> {
        let syntax = javasym_syntax::parse_type_ref(text).ok_or_else(|| {
            ResolveError::InvariantViolation(format!("malformed type `{text}` in {}", self.qualified_name))
        })?;
        let lookup = |name: &str| self.lookup(name, owner);
        type_from_syntax(&syntax, &lookup)
    }
}

pub struct SyntheticTypeDeclaration {
    data: Arc<ClassData>,
}

impl fmt::Debug for SyntheticTypeDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntheticTypeDeclaration")
            .field("name", &self.data.qualified_name)
            .field("kind", &self.data.kind)
            .finish()
    }
}

impl Ancestry for SyntheticTypeDeclaration {
    fn ancestors(&self) -> Result<Vec<ReferenceType>> {
        self.data
            .supertypes
            .iter()
            .map(|text| match self.data.resolve(text, Owner::Type)? {
                Type::Reference(reference) => Ok(Arc::unwrap_or_clone(reference)),
                other => Err(ResolveError::InvariantViolation(format!(
                    "supertype {} of {} is not a class or interface",
                    other.describe(),
                    self.data.qualified_name
                ))),
            })
            .collect()
    }
}

impl FieldLookup for SyntheticTypeDeclaration {
    fn declared_fields(&self) -> Vec<Arc<dyn FieldDeclaration>> {
        (0..self.data.fields.len())
            .map(|index| {
                Arc::new(SyntheticField {
                    data: self.data.clone(),
                    index,
                }) as Arc<dyn FieldDeclaration>
            })
            .collect()
    }
}

impl MethodLookup for SyntheticTypeDeclaration {
    fn declared_methods(&self) -> Vec<Arc<dyn MethodDeclaration>> {
        (0..self.data.methods.len())
            .map(|index| {
                Arc::new(SyntheticMethod {
                    data: self.data.clone(),
                    member: Member::Method(index),
                }) as Arc<dyn MethodDeclaration>
            })
            .collect()
    }

    fn constructors(&self) -> Vec<Arc<dyn ConstructorDeclaration>> {
        (0..self.data.constructors.len())
            .map(|index| {
                Arc::new(SyntheticMethod {
                    data: self.data.clone(),
                    member: Member::Constructor(index),
                }) as Arc<dyn ConstructorDeclaration>
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

impl ReferenceTypeDeclaration for SyntheticTypeDeclaration {
    fn name(&self) -> &str {
        &self.data.name
    }

    fn qualified_name(&self) -> &str {
        &self.data.qualified_name
    }

    fn package_name(&self) -> &str {
        &self.data.package
    }

    fn kind(&self) -> TypeKind {
        self.data.kind
    }

    fn origin(&self) -> Origin {
        Origin::Synthetic
    }

    fn type_parameters(&self) -> Vec<Arc<dyn TypeParameterDeclaration>> {
        (0..self.data.type_params.len())
            .map(|index| {
                Arc::new(SyntheticTypeParameter {
                    data: self.data.clone(),
                    owner: Owner::Type,
                    index,
                }) as Arc<dyn TypeParameterDeclaration>
            })
            .collect()
    }

    fn internal_types(&self) -> Vec<Arc<dyn ReferenceTypeDeclaration>> {
        Vec::new()
    }

    fn containing_type(&self) -> Result<Option<Arc<dyn ReferenceTypeDeclaration>>> {
        Ok(None)
    }

    fn solver(&self) -> &SolverHandle {
        &self.data.solver
    }
}

struct SyntheticTypeParameter {
    data: Arc<ClassData>,
    owner: Owner,
    index: usize,
}

impl SyntheticTypeParameter {
    fn entry(&self) -> &TypeParamData {
        &self.data.type_params_of(self.owner)[self.index]
    }
}

impl fmt::Debug for SyntheticTypeParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeParameter({})", self.qualified_name())
    }
}

impl TypeParameterDeclaration for SyntheticTypeParameter {
    fn name(&self) -> &str {
        &self.entry().name
    }

    fn container(&self) -> TypeParameterContainer {
        let qualified = &self.data.qualified_name;
        match self.owner {
            Owner::Type => TypeParameterContainer::Type(qualified.clone()),
            Owner::Member(member) => {
                let id = format!("{qualified}.{}", self.data.member(member).name);
                match member {
                    Member::Method(_) => TypeParameterContainer::Method(id),
                    Member::Constructor(_) => TypeParameterContainer::Constructor(id),
                }
            }
        }
    }

    fn bounds(&self) -> Result<Vec<Bound>> {
        self.entry()
            .bounds
            .iter()
            .map(|text| Ok(Bound::extends(self.data.resolve(text, self.owner)?)))
            .collect()
    }
}

struct SyntheticField {
    data: Arc<ClassData>,
    index: usize,
}

impl SyntheticField {
    fn entry(&self) -> &FieldData {
        &self.data.fields[self.index]
    }
}

impl fmt::Debug for SyntheticField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Field({}.{})", self.data.qualified_name, self.entry().name)
    }
}

impl ValueDeclaration for SyntheticField {
    fn name(&self) -> &str {
        &self.entry().name
    }

    fn ty(&self) -> Result<Type> {
        self.data.resolve(&self.entry().ty, Owner::Type)
    }
}

impl FieldDeclaration for SyntheticField {
    fn is_static(&self) -> bool {
        self.entry().is_static
    }

    fn is_private(&self) -> bool {
        self.entry().is_private
    }

    fn declaring_type(&self) -> Arc<dyn ReferenceTypeDeclaration> {
        self.data.declaration()
    }
}

/// A method or a constructor, depending on `member`.
struct SyntheticMethod {
    data: Arc<ClassData>,
    member: Member,
}

impl SyntheticMethod {
    fn entry(&self) -> &MethodBuilder {
        self.data.member(self.member)
    }
}

impl fmt::Debug for SyntheticMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Method({}.{})", self.data.qualified_name, self.entry().name)
    }
}

impl MethodLikeDeclaration for SyntheticMethod {
    fn name(&self) -> &str {
        &self.entry().name
    }

    fn declaring_type(&self) -> Arc<dyn ReferenceTypeDeclaration> {
        self.data.declaration()
    }

    fn params(&self) -> Vec<Arc<dyn ParameterDeclaration>> {
        (0..self.entry().params.len())
            .map(|index| {
                Arc::new(SyntheticParameter {
                    data: self.data.clone(),
                    member: self.member,
                    index,
                }) as Arc<dyn ParameterDeclaration>
            })
            .collect()
    }

    fn type_parameters(&self) -> Vec<Arc<dyn TypeParameterDeclaration>> {
        (0..self.entry().type_params.len())
            .map(|index| {
                Arc::new(SyntheticTypeParameter {
                    data: self.data.clone(),
                    owner: Owner::Member(self.member),
                    index,
                }) as Arc<dyn TypeParameterDeclaration>
            })
            .collect()
    }
}

impl MethodDeclaration for SyntheticMethod {
    fn return_type(&self) -> Result<Type> {
        self.data.resolve(&self.entry().return_type, Owner::Member(self.member))
    }

    fn is_static(&self) -> bool {
        self.entry().is_static
    }

    fn is_abstract(&self) -> bool {
        self.entry().is_abstract || self.data.kind == TypeKind::Interface
    }
}

impl ConstructorDeclaration for SyntheticMethod {}

struct SyntheticParameter {
    data: Arc<ClassData>,
    member: Member,
    index: usize,
}

impl SyntheticParameter {
    fn entry(&self) -> &ParamData {
        &self.data.member(self.member).params[self.index]
    }
}

impl fmt::Debug for SyntheticParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parameter({}: {})", self.entry().name, self.entry().ty)
    }
}

impl ValueDeclaration for SyntheticParameter {
    fn name(&self) -> &str {
        &self.entry().name
    }

    fn ty(&self) -> Result<Type> {
        self.data.resolve(&self.entry().ty, Owner::Member(self.member))
    }
}

impl ParameterDeclaration for SyntheticParameter {
    fn is_variadic(&self) -> bool {
        self.entry().is_variadic
    }
}
