use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use javasym_syntax::ast::{
    CompilationUnit, ConstructorDecl, FieldDecl, ImportDecl, MemberDecl, MethodDecl, Modifiers, TypeDecl,
    TypeDeclKind, TypeParam, TypeRef,
};
use javasym_types::{
    type_from_syntax, ReferenceTypeDeclaration, ResolveError, Result, SolverHandle, Type, TypeKind,
};

use crate::context::{CompilationUnitContext, Context, MethodContext, TypeDeclarationContext};
use crate::source::decl::{MethodSlot, SourceMethod, SourceTypeDeclaration};

/// One type declaration of a file, with its nested types split out into
/// their own nodes.
#[derive(Debug)]
pub(crate) struct TypeNode {
    pub(crate) name: String,
    pub(crate) qualified_name: String,
    pub(crate) kind: TypeKind,
    pub(crate) modifiers: Modifiers,
    pub(crate) type_params: Vec<TypeParam>,
    pub(crate) extends: Vec<TypeRef>,
    pub(crate) implements: Vec<TypeRef>,
    pub(crate) enum_constants: Vec<String>,
    pub(crate) fields: Vec<FieldDecl>,
    pub(crate) methods: Vec<MethodDecl>,
    pub(crate) constructors: Vec<ConstructorDecl>,
    pub(crate) parent: Option<usize>,
    pub(crate) nested: Vec<usize>,
}

/// A parsed compilation unit whose declarations resolve names through the
/// solver that loaded it.
pub struct SourceFile {
    path: Option<PathBuf>,
    package: String,
    imports: Vec<ImportDecl>,
    nodes: Vec<TypeNode>,
    top_level: Vec<usize>,
    pub(crate) solver: SolverHandle,
}

fn kind_of(kind: TypeDeclKind) -> TypeKind {
    match kind {
        TypeDeclKind::Class => TypeKind::Class,
        TypeDeclKind::Interface => TypeKind::Interface,
        TypeDeclKind::Enum => TypeKind::Enum,
        TypeDeclKind::Annotation => TypeKind::Annotation,
    }
}

fn flatten(decl: TypeDecl, qualified_name: String, parent: Option<usize>, nodes: &mut Vec<TypeNode>) -> usize {
    let index = nodes.len();
    let mut fields = Vec::new();
    let mut methods = Vec::new();
    let mut constructors = Vec::new();
    let mut nested = Vec::new();
    for member in decl.members {
        match member {
            MemberDecl::Field(field) => fields.push(field),
            MemberDecl::Method(method) => methods.push(method),
            MemberDecl::Constructor(constructor) => constructors.push(constructor),
            MemberDecl::Type(inner) => nested.push(inner),
            MemberDecl::Initializer(_) => {}
        }
    }
    nodes.push(TypeNode {
        name: decl.name,
        qualified_name,
        kind: kind_of(decl.kind),
        modifiers: decl.modifiers,
        type_params: decl.type_params,
        extends: decl.extends,
        implements: decl.implements,
        enum_constants: decl.enum_constants,
        fields,
        methods,
        constructors,
        parent,
        nested: Vec::new(),
    });
    for inner in nested {
        let inner_name = format!("{}.{}", nodes[index].qualified_name, inner.name);
        let child = flatten(inner, inner_name, Some(index), nodes);
        nodes[index].nested.push(child);
    }
    index
}

impl SourceFile {
    pub fn new(unit: CompilationUnit, path: Option<PathBuf>, solver: SolverHandle) -> Arc<Self> {
        let package = unit.package.map(|p| p.name).unwrap_or_default();
        let mut nodes = Vec::new();
        let mut top_level = Vec::new();
        for decl in unit.types {
            let qualified_name = if package.is_empty() {
                decl.name.clone()
            } else {
                format!("{package}.{}", decl.name)
            };
            top_level.push(flatten(decl, qualified_name, None, &mut nodes));
        }
        Arc::new(SourceFile {
            path,
            package,
            imports: unit.imports,
            nodes,
            top_level,
            solver,
        })
    }

    pub fn parse(text: &str, path: Option<PathBuf>, solver: SolverHandle) -> Arc<Self> {
        Self::new(javasym_syntax::parse(text).into_compilation_unit(), path, solver)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Empty for the default package.
    pub fn package_name(&self) -> &str {
        &self.package
    }

    pub fn imports(&self) -> &[ImportDecl] {
        &self.imports
    }

    pub fn types(self: &Arc<Self>) -> Vec<Arc<dyn ReferenceTypeDeclaration>> {
        self.top_level.iter().map(|&index| self.declaration(index)).collect()
    }

    /// Finds a type by its path inside this file: `Outer` or `Outer.Inner`.
    pub fn find_type(self: &Arc<Self>, path: &str) -> Option<Arc<dyn ReferenceTypeDeclaration>> {
        self.find_node(path).map(|index| self.declaration(index))
    }

    /// Scope of the file itself: imports, package and top-level types.
    pub fn context(self: &Arc<Self>) -> Arc<dyn Context> {
        Arc::new(CompilationUnitContext::new(self.clone()))
    }

    /// Scope of the body of the type at `path`.
    pub fn type_context(self: &Arc<Self>, path: &str) -> Option<Arc<dyn Context>> {
        self.find_node(path).map(|index| self.body_context(index))
    }

    /// Scope of the first method called `name` in the type at `path`; a name
    /// equal to the type's own selects its first constructor.
    pub fn method_context(self: &Arc<Self>, path: &str, name: &str) -> Option<Arc<dyn Context>> {
        let index = self.find_node(path)?;
        let node = &self.nodes[index];
        let slot = match node.methods.iter().position(|m| m.name == name) {
            Some(method) => MethodSlot::Method(method),
            None if node.name == name && !node.constructors.is_empty() => MethodSlot::Constructor(0),
            None => return None,
        };
        Some(self.member_context(index, slot))
    }

    pub(crate) fn node(&self, index: usize) -> &TypeNode {
        &self.nodes[index]
    }

    pub(crate) fn top_level_names(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.top_level
            .iter()
            .map(|&index| (self.nodes[index].name.as_str(), index))
    }

    pub(crate) fn find_node(&self, path: &str) -> Option<usize> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self
            .top_level
            .iter()
            .copied()
            .find(|&index| self.nodes[index].name == first)?;
        for segment in segments {
            current = self.nodes[current]
                .nested
                .iter()
                .copied()
                .find(|&index| self.nodes[index].name == segment)?;
        }
        Some(current)
    }

    pub(crate) fn declaration(self: &Arc<Self>, index: usize) -> Arc<dyn ReferenceTypeDeclaration> {
        Arc::new(SourceTypeDeclaration::new(self.clone(), index))
    }

    /// Scope seen by members of the type at `index`.
    pub(crate) fn body_context(self: &Arc<Self>, index: usize) -> Arc<dyn Context> {
        self.type_scope(index, true)
    }

    /// Scope seen by the type's own header (supertypes, type parameter
    /// bounds). Member types inherited from ancestors are not visible here.
    pub(crate) fn header_context(self: &Arc<Self>, index: usize) -> Arc<dyn Context> {
        self.type_scope(index, false)
    }

    fn type_scope(self: &Arc<Self>, index: usize, search_ancestors: bool) -> Arc<dyn Context> {
        let parent = match self.nodes[index].parent {
            Some(outer) => self.body_context(outer),
            None => self.context(),
        };
        Arc::new(TypeDeclarationContext::with_ancestor_search(
            self.declaration(index),
            Some(parent),
            search_ancestors,
        ))
    }

    pub(crate) fn member_context(self: &Arc<Self>, index: usize, slot: MethodSlot) -> Arc<dyn Context> {
        Arc::new(MethodContext::new(
            Arc::new(SourceMethod::new(self.clone(), index, slot)),
            Some(self.body_context(index)),
        ))
    }

    /// Converts a written type, looking names up in `context`.
    pub(crate) fn resolve(&self, ty: &TypeRef, context: &dyn Context, scope: &str) -> Result<Type> {
        let root = self.solver.root()?;
        let lookup = |name: &str| {
            context
                .solve_type(name, root.as_ref())?
                .into_declaration()
                .ok_or_else(|| ResolveError::unsolved_in(name, scope))
        };
        type_from_syntax(ty, &lookup)
    }
}

impl fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let types: Vec<&str> = self.top_level.iter().map(|&i| self.nodes[i].name.as_str()).collect();
        f.debug_struct("SourceFile")
            .field("path", &self.path)
            .field("package", &self.package)
            .field("types", &types)
            .finish()
    }
}
