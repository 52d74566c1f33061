//! Declarations backed by decoded class files.
//!
//! Used by both the jar solver and the runtime catalogue. Generic signatures
//! are preferred over erased descriptors whenever the class file carries them.

use std::fmt;
use std::sync::{Arc, Weak};

use javasym_classfile::{
    internal_to_qualified, BaseType, ClassStub, ClassTypeSignature, FieldStub, FieldType, MethodStub,
    ReturnType, TypeArgument, TypeSignature, ACC_ANNOTATION, ACC_BRIDGE, ACC_ENUM, ACC_INTERFACE,
    ACC_PRIVATE, ACC_SYNTHETIC,
};
use javasym_types::{
    resolution, Ancestry, Bound, ConstructorDeclaration, FieldDeclaration, FieldLookup, MethodDeclaration,
    MethodLikeDeclaration, MethodLookup, Origin, ParameterDeclaration, PrimitiveType, ReferenceType,
    ReferenceTypeDeclaration, ResolveError, Result, SolverHandle, SymbolReference, Type, TypeKind,
    TypeParameterContainer, TypeParameterDeclaration, ValueDeclaration, Wildcard,
};

/// The backend a binary declaration was loaded from.
///
/// Nested and enclosing classes are loaded through it directly, by internal
/// name, rather than through the solver tree.
pub(crate) trait ClassSource: Send + Sync {
    fn load_internal(&self, internal_name: &str) -> Option<Arc<dyn ReferenceTypeDeclaration>>;
}

pub(crate) struct BinaryClass {
    stub: ClassStub,
    qualified_name: String,
    name: String,
    package: String,
    origin: Origin,
    solver: SolverHandle,
    source: Weak<dyn ClassSource>,
}

/// Wraps `stub` as a declaration produced by `solver`.
pub(crate) fn declare(
    stub: ClassStub,
    origin: Origin,
    solver: SolverHandle,
    source: Weak<dyn ClassSource>,
) -> Arc<dyn ReferenceTypeDeclaration> {
    let qualified_name = stub.qualified_name();
    let package = match stub.internal_name.rsplit_once('/') {
        Some((package, _)) => package.replace('/', "."),
        None => String::new(),
    };
    let name = stub
        .inner_classes
        .iter()
        .find(|info| info.inner_class == stub.internal_name)
        .and_then(|info| info.inner_name.clone())
        .unwrap_or_else(|| {
            let simple = stub.internal_name.rsplit('/').next().unwrap_or(&stub.internal_name);
            simple.rsplit('$').next().unwrap_or(simple).to_string()
        });
    let class = Arc::new(BinaryClass {
        stub,
        qualified_name,
        name,
        package,
        origin,
        solver,
        source,
    });
    Arc::new(BinaryTypeDeclaration { class })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Type,
    Method(usize),
}

fn primitive(base: BaseType) -> Result<Type> {
    PrimitiveType::from_keyword(base.keyword())
        .map(Type::Primitive)
        .ok_or_else(|| ResolveError::Unsupported(format!("primitive type `{}`", base.keyword())))
}

fn is_hidden(access_flags: u16) -> bool {
    access_flags & (ACC_SYNTHETIC | ACC_BRIDGE) != 0
}

impl BinaryClass {
    fn declaration(self: &Arc<Self>) -> Arc<dyn ReferenceTypeDeclaration> {
        Arc::new(BinaryTypeDeclaration { class: self.clone() })
    }

    fn kind(&self) -> TypeKind {
        let flags = self.stub.access_flags;
        if flags & ACC_ANNOTATION != 0 {
            TypeKind::Annotation
        } else if flags & ACC_INTERFACE != 0 {
            TypeKind::Interface
        } else if flags & ACC_ENUM != 0 {
            TypeKind::Enum
        } else {
            TypeKind::Class
        }
    }

    fn method(&self, index: usize) -> &MethodStub {
        &self.stub.methods[index]
    }

    fn load(&self, internal_name: &str) -> Option<Arc<dyn ReferenceTypeDeclaration>> {
        self.source.upgrade()?.load_internal(internal_name)
    }

    fn containing(self: &Arc<Self>) -> Result<Option<Arc<dyn ReferenceTypeDeclaration>>> {
        let outer = self
            .stub
            .inner_classes
            .iter()
            .find(|info| info.inner_class == self.stub.internal_name)
            .and_then(|info| info.outer_class.as_deref());
        let Some(outer) = outer else {
            return Ok(None);
        };
        match self.load(outer) {
            Some(decl) => Ok(Some(decl)),
            None => self.solver.solve_type(&internal_to_qualified(outer)).map(Some),
        }
    }

    fn class_named(self: &Arc<Self>, internal_name: &str) -> Result<Arc<dyn ReferenceTypeDeclaration>> {
        if internal_name == self.stub.internal_name {
            return Ok(self.declaration());
        }
        self.solver.solve_type(&internal_to_qualified(internal_name))
    }

    fn type_variable(self: &Arc<Self>, name: &str, scope: Scope) -> Result<Type> {
        let found = match scope {
            Scope::Method(index) => BinaryMethod {
                class: self.clone(),
                index,
            }
            .find_type_parameter(name)?,
            Scope::Type => self.declaration().find_type_parameter(name)?,
        };
        found
            .map(Type::TypeVariable)
            .ok_or_else(|| ResolveError::unsolved_in(name, self.qualified_name.clone()))
    }

    fn class_type_params(&self) -> &[javasym_classfile::TypeParameter] {
        self.stub
            .signature
            .as_ref()
            .map(|sig| sig.type_parameters.as_slice())
            .unwrap_or(&[])
    }

    fn method_type_params(&self, index: usize) -> &[javasym_classfile::TypeParameter] {
        self.method(index)
            .signature
            .as_ref()
            .map(|sig| sig.type_parameters.as_slice())
            .unwrap_or(&[])
    }

    fn type_params_of(&self, scope: Scope) -> &[javasym_classfile::TypeParameter] {
        match scope {
            Scope::Type => self.class_type_params(),
            Scope::Method(index) => self.method_type_params(index),
        }
    }

    fn from_descriptor(self: &Arc<Self>, ty: &FieldType) -> Result<Type> {
        match ty {
            FieldType::Base(base) => primitive(*base),
            FieldType::Array(component) => Ok(Type::array(self.from_descriptor(component)?)),
            FieldType::Object(internal) => Ok(Type::reference(ReferenceType::raw(self.class_named(internal)?))),
        }
    }

    fn from_signature(self: &Arc<Self>, sig: &TypeSignature, scope: Scope) -> Result<Type> {
        match sig {
            TypeSignature::Base(base) => primitive(*base),
            TypeSignature::Array(component) => Ok(Type::array(self.from_signature(component, scope)?)),
            TypeSignature::TypeVariable(name) => self.type_variable(name, scope),
            TypeSignature::Class(class) => Ok(Type::reference(self.class_type(class, scope)?)),
        }
    }

    fn class_type(self: &Arc<Self>, class: &ClassTypeSignature, scope: Scope) -> Result<ReferenceType> {
        let declaration = self.class_named(&class.internal_name())?;
        let args = class
            .type_arguments()
            .iter()
            .map(|arg| self.type_argument(arg, scope))
            .collect::<Result<Vec<_>>>()?;
        ReferenceType::new(declaration, args)
    }

    fn type_argument(self: &Arc<Self>, arg: &TypeArgument, scope: Scope) -> Result<Type> {
        Ok(match arg {
            TypeArgument::Any => Type::wildcard(Wildcard::Unbounded),
            TypeArgument::Exact(ty) => self.from_signature(ty, scope)?,
            TypeArgument::Extends(ty) => Type::wildcard(Wildcard::Extends(self.from_signature(ty, scope)?)),
            TypeArgument::Super(ty) => Type::wildcard(Wildcard::Super(self.from_signature(ty, scope)?)),
        })
    }

    /// Parameter types from the generic signature when it lines up with the
    /// descriptor; inner-class constructors carry extra synthetic parameters.
    fn param_type(self: &Arc<Self>, method: usize, index: usize) -> Result<Type> {
        let stub = self.method(method);
        if let Some(sig) = &stub.signature {
            if sig.parameters.len() == stub.descriptor.params.len() {
                return self.from_signature(&sig.parameters[index], Scope::Method(method));
            }
        }
        self.from_descriptor(&stub.descriptor.params[index])
    }

    fn return_type(self: &Arc<Self>, method: usize) -> Result<Type> {
        let stub = self.method(method);
        match &stub.signature {
            Some(sig) => match &sig.return_type {
                Some(ty) => self.from_signature(ty, Scope::Method(method)),
                None => Ok(Type::Void),
            },
            None => match &stub.descriptor.return_type {
                ReturnType::Void => Ok(Type::Void),
                ReturnType::Type(ty) => self.from_descriptor(ty),
            },
        }
    }
}

pub(crate) struct BinaryTypeDeclaration {
    class: Arc<BinaryClass>,
}

impl fmt::Debug for BinaryTypeDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryTypeDeclaration")
            .field("name", &self.class.qualified_name)
            .field("origin", &self.class.origin)
            .finish()
    }
}

impl Ancestry for BinaryTypeDeclaration {
    fn ancestors(&self) -> Result<Vec<ReferenceType>> {
        let class = &self.class;
        let is_interface = matches!(class.kind(), TypeKind::Interface | TypeKind::Annotation);
        let mut ancestors = Vec::new();
        match &class.stub.signature {
            Some(sig) => {
                if !is_interface && class.stub.super_class.is_some() {
                    ancestors.push(class.class_type(&sig.super_class, Scope::Type)?);
                }
                for interface in &sig.interfaces {
                    ancestors.push(class.class_type(interface, Scope::Type)?);
                }
            }
            None => {
                if !is_interface {
                    if let Some(super_class) = &class.stub.super_class {
                        ancestors.push(ReferenceType::raw(class.class_named(super_class)?));
                    }
                }
                for interface in &class.stub.interfaces {
                    ancestors.push(ReferenceType::raw(class.class_named(interface)?));
                }
            }
        }
        Ok(ancestors)
    }
}

impl FieldLookup for BinaryTypeDeclaration {
    fn declared_fields(&self) -> Vec<Arc<dyn FieldDeclaration>> {
        self.class
            .stub
            .fields
            .iter()
            .enumerate()
            .filter(|(_, field)| !is_hidden(field.access_flags))
            .map(|(index, _)| {
                Arc::new(BinaryField {
                    class: self.class.clone(),
                    index,
                }) as Arc<dyn FieldDeclaration>
            })
            .collect()
    }
}

impl BinaryTypeDeclaration {
    fn method_indexes(&self, constructors: bool) -> impl Iterator<Item = usize> + '_ {
        self.class
            .stub
            .methods
            .iter()
            .enumerate()
            .filter(move |(_, m)| m.is_constructor() == constructors && !is_hidden(m.access_flags))
            .map(|(index, _)| index)
    }
}

impl MethodLookup for BinaryTypeDeclaration {
    fn declared_methods(&self) -> Vec<Arc<dyn MethodDeclaration>> {
        self.method_indexes(false)
            .map(|index| {
                Arc::new(BinaryMethod {
                    class: self.class.clone(),
                    index,
                }) as Arc<dyn MethodDeclaration>
            })
            .collect()
    }

    fn constructors(&self) -> Vec<Arc<dyn ConstructorDeclaration>> {
        self.method_indexes(true)
            .map(|index| {
                Arc::new(BinaryMethod {
                    class: self.class.clone(),
                    index,
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

impl ReferenceTypeDeclaration for BinaryTypeDeclaration {
    fn name(&self) -> &str {
        &self.class.name
    }

    fn qualified_name(&self) -> &str {
        &self.class.qualified_name
    }

    fn package_name(&self) -> &str {
        &self.class.package
    }

    fn kind(&self) -> TypeKind {
        self.class.kind()
    }

    fn origin(&self) -> Origin {
        self.class.origin
    }

    fn type_parameters(&self) -> Vec<Arc<dyn TypeParameterDeclaration>> {
        (0..self.class.class_type_params().len())
            .map(|index| {
                Arc::new(BinaryTypeParameter {
                    class: self.class.clone(),
                    scope: Scope::Type,
                    index,
                }) as Arc<dyn TypeParameterDeclaration>
            })
            .collect()
    }

    fn internal_types(&self) -> Vec<Arc<dyn ReferenceTypeDeclaration>> {
        self.class
            .stub
            .member_classes()
            .filter_map(|info| {
                let found = self.class.load(&info.inner_class);
                if found.is_none() {
                    tracing::debug!(
                        target: "javasym.solver",
                        outer = %self.class.qualified_name,
                        inner = %info.inner_class,
                        "member class not available"
                    );
                }
                found
            })
            .collect()
    }

    fn containing_type(&self) -> Result<Option<Arc<dyn ReferenceTypeDeclaration>>> {
        self.class.containing()
    }

    fn solver(&self) -> &SolverHandle {
        &self.class.solver
    }
}

struct BinaryTypeParameter {
    class: Arc<BinaryClass>,
    scope: Scope,
    index: usize,
}

impl BinaryTypeParameter {
    fn stub(&self) -> &javasym_classfile::TypeParameter {
        &self.class.type_params_of(self.scope)[self.index]
    }
}

impl fmt::Debug for BinaryTypeParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeParameter({})", self.qualified_name())
    }
}

impl TypeParameterDeclaration for BinaryTypeParameter {
    fn name(&self) -> &str {
        &self.stub().name
    }

    fn container(&self) -> TypeParameterContainer {
        let qualified = &self.class.qualified_name;
        match self.scope {
            Scope::Type => TypeParameterContainer::Type(qualified.clone()),
            Scope::Method(index) => {
                let method = self.class.method(index);
                if method.is_constructor() {
                    TypeParameterContainer::Constructor(format!("{qualified}.{}", self.class.name))
                } else {
                    TypeParameterContainer::Method(format!("{qualified}.{}", method.name))
                }
            }
        }
    }

    fn bounds(&self) -> Result<Vec<Bound>> {
        let stub = self.stub();
        stub.class_bound
            .iter()
            .chain(&stub.interface_bounds)
            .map(|bound| Ok(Bound::extends(self.class.from_signature(bound, self.scope)?)))
            .collect()
    }
}

struct BinaryField {
    class: Arc<BinaryClass>,
    index: usize,
}

impl BinaryField {
    fn stub(&self) -> &FieldStub {
        &self.class.stub.fields[self.index]
    }
}

impl fmt::Debug for BinaryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Field({}.{})", self.class.qualified_name, self.stub().name)
    }
}

impl ValueDeclaration for BinaryField {
    fn name(&self) -> &str {
        &self.stub().name
    }

    fn ty(&self) -> Result<Type> {
        match &self.stub().signature {
            Some(sig) => self.class.from_signature(sig, Scope::Type),
            None => self.class.from_descriptor(&self.stub().descriptor),
        }
    }
}

impl FieldDeclaration for BinaryField {
    fn is_static(&self) -> bool {
        self.stub().is_static()
    }

    fn is_private(&self) -> bool {
        self.stub().access_flags & ACC_PRIVATE != 0
    }

    fn declaring_type(&self) -> Arc<dyn ReferenceTypeDeclaration> {
        self.class.declaration()
    }
}

/// A method or constructor; `<init>` entries are constructors.
struct BinaryMethod {
    class: Arc<BinaryClass>,
    index: usize,
}

impl BinaryMethod {
    fn stub(&self) -> &MethodStub {
        self.class.method(self.index)
    }
}

impl fmt::Debug for BinaryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Method({}.{})", self.class.qualified_name, self.name())
    }
}

impl MethodLikeDeclaration for BinaryMethod {
    fn name(&self) -> &str {
        let stub = self.stub();
        if stub.is_constructor() {
            &self.class.name
        } else {
            &stub.name
        }
    }

    fn declaring_type(&self) -> Arc<dyn ReferenceTypeDeclaration> {
        self.class.declaration()
    }

    fn params(&self) -> Vec<Arc<dyn ParameterDeclaration>> {
        let count = self.stub().descriptor.params.len();
        (0..count)
            .map(|index| {
                Arc::new(BinaryParameter {
                    class: self.class.clone(),
                    method: self.index,
                    index,
                    name: format!("arg{index}"),
                    is_variadic: self.stub().is_varargs() && index + 1 == count,
                }) as Arc<dyn ParameterDeclaration>
            })
            .collect()
    }

    fn type_parameters(&self) -> Vec<Arc<dyn TypeParameterDeclaration>> {
        (0..self.class.method_type_params(self.index).len())
            .map(|index| {
                Arc::new(BinaryTypeParameter {
                    class: self.class.clone(),
                    scope: Scope::Method(self.index),
                    index,
                }) as Arc<dyn TypeParameterDeclaration>
            })
            .collect()
    }
}

impl MethodDeclaration for BinaryMethod {
    fn return_type(&self) -> Result<Type> {
        self.class.return_type(self.index)
    }

    fn is_static(&self) -> bool {
        self.stub().is_static()
    }

    fn is_abstract(&self) -> bool {
        self.stub().is_abstract()
    }
}

impl ConstructorDeclaration for BinaryMethod {}

/// Class files keep no parameter names; parameters are called `arg0`, `arg1`, ...
struct BinaryParameter {
    class: Arc<BinaryClass>,
    method: usize,
    index: usize,
    name: String,
    is_variadic: bool,
}

impl fmt::Debug for BinaryParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parameter({}.{}#{})",
            self.class.qualified_name,
            self.class.method(self.method).name,
            self.index
        )
    }
}

impl ValueDeclaration for BinaryParameter {
    fn name(&self) -> &str {
        &self.name
    }

    fn ty(&self) -> Result<Type> {
        self.class.param_type(self.method, self.index)
    }
}

impl ParameterDeclaration for BinaryParameter {
    fn is_variadic(&self) -> bool {
        self.is_variadic
    }
}
