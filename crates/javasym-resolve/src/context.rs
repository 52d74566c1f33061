//! Lexical scopes.
//!
//! A scope answers symbol, type and method lookups for one syntactic level
//! (compilation unit, type body, method) and defers to its parent for
//! anything it does not declare. Every lookup takes the root solver of the
//! session.

use std::fmt;
use std::sync::Arc;

use javasym_types::{
    MethodDeclaration, MethodLikeDeclaration, ReferenceTypeDeclaration, ResolveError, Result, SymbolReference, Type,
    TypeDeclaration, TypeSolver, Value, ValueDeclaration, JAVA_LANG_OBJECT,
};

use crate::facade::symbol_in_type;
use crate::source::SourceFile;

pub trait Context: Send + Sync + fmt::Debug {
    fn parent(&self) -> Option<Arc<dyn Context>>;

    fn solve_symbol(&self, name: &str, solver: &dyn TypeSolver) -> Result<SymbolReference<Arc<dyn ValueDeclaration>>>;

    fn solve_symbol_as_value(&self, name: &str, solver: &dyn TypeSolver) -> Result<Option<Value>> {
        match self.solve_symbol(name, solver)?.into_declaration() {
            Some(declaration) => Value::from_declaration(declaration.as_ref()).map(Some),
            None => Ok(None),
        }
    }

    fn solve_type(&self, name: &str, solver: &dyn TypeSolver) -> Result<SymbolReference<TypeDeclaration>>;

    /// A type variable in scope called `name`.
    fn solve_generic_type(&self, name: &str, solver: &dyn TypeSolver) -> Result<Option<Type>> {
        match self.parent() {
            Some(parent) => parent.solve_generic_type(name, solver),
            None => Ok(None),
        }
    }

    fn solve_method(
        &self,
        name: &str,
        args: &[Type],
        static_only: bool,
        solver: &dyn TypeSolver,
    ) -> Result<SymbolReference<Arc<dyn MethodDeclaration>>>;
}

fn reference(found: SymbolReference<Arc<dyn ReferenceTypeDeclaration>>) -> SymbolReference<TypeDeclaration> {
    found.map(TypeDeclaration::Reference)
}

/// `a.b.C.x` -> (`a.b.C`, `x`).
fn split_member(qualified: &str) -> Result<(&str, &str)> {
    qualified
        .rsplit_once('.')
        .ok_or_else(|| ResolveError::Unsupported(format!("`{qualified}` has no enclosing type")))
}

/// Scope of a whole file: its own top-level types, imports, package and
/// `java.lang`.
pub struct CompilationUnitContext {
    file: Arc<SourceFile>,
}

impl CompilationUnitContext {
    pub fn new(file: Arc<SourceFile>) -> Self {
        Self { file }
    }

    pub fn file(&self) -> &Arc<SourceFile> {
        &self.file
    }

    /// A static on-demand import of a type declared in this very file.
    fn imports_own_type(&self, imported: &str) -> Result<bool> {
        let (package, simple) = split_member(imported)?;
        Ok(self.file.package_name() == package && self.file.top_level_names().any(|(name, _)| name == simple))
    }
}

impl fmt::Debug for CompilationUnitContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompilationUnitContext").field("file", &self.file).finish()
    }
}

impl Context for CompilationUnitContext {
    fn parent(&self) -> Option<Arc<dyn Context>> {
        None
    }

    fn solve_symbol(&self, name: &str, solver: &dyn TypeSolver) -> Result<SymbolReference<Arc<dyn ValueDeclaration>>> {
        let mut current = name;
        while let Some((type_name, member)) = current.rsplit_once('.') {
            if let Some(TypeDeclaration::Reference(decl)) = self.solve_type(type_name, solver)?.into_declaration() {
                return symbol_in_type(decl.as_ref(), member);
            }
            current = type_name;
        }

        for import in self.file.imports().iter().filter(|i| i.is_static) {
            if import.is_star {
                let imported = solver.solve_type(&import.path)?;
                let found = symbol_in_type(imported.as_ref(), name)?;
                if found.is_solved() {
                    return Ok(found);
                }
            } else {
                let (type_name, member) = split_member(&import.path)?;
                if member == name {
                    let imported = solver.solve_type(type_name)?;
                    return symbol_in_type(imported.as_ref(), member);
                }
            }
        }
        Ok(SymbolReference::unsolved())
    }

    fn solve_type(&self, name: &str, solver: &dyn TypeSolver) -> Result<SymbolReference<TypeDeclaration>> {
        if let Some((_, index)) = self.file.top_level_names().find(|(own, _)| *own == name) {
            return Ok(SymbolReference::solved(TypeDeclaration::Reference(
                self.file.declaration(index),
            )));
        }

        let prefix = name.split_once('.');
        for import in self.file.imports().iter().filter(|i| !i.is_star) {
            let candidate = match import.path.rsplit_once('.') {
                Some((_, simple)) if simple == name => Some(import.path.clone()),
                _ => match prefix {
                    Some((prefix, rest)) if import.path.ends_with(&format!(".{prefix}")) => {
                        Some(format!("{}.{rest}", import.path))
                    }
                    _ => None,
                },
            };
            if let Some(candidate) = candidate {
                let found = solver.try_to_solve_type(&candidate);
                if found.is_solved() {
                    return Ok(reference(found));
                }
            }
        }
        for import in self.file.imports().iter().filter(|i| i.is_star) {
            let found = solver.try_to_solve_type(&format!("{}.{name}", import.path));
            if found.is_solved() {
                return Ok(reference(found));
            }
        }

        let in_package = if self.file.package_name().is_empty() {
            name.to_string()
        } else {
            format!("{}.{name}", self.file.package_name())
        };
        let found = solver.try_to_solve_type(&in_package);
        if found.is_solved() {
            return Ok(reference(found));
        }

        let found = solver.try_to_solve_type(&format!("java.lang.{name}"));
        if found.is_solved() {
            return Ok(reference(found));
        }

        // Classes of the default package cannot be imported, so simple names
        // stop here.
        if name.contains('.') {
            return Ok(reference(solver.try_to_solve_type(name)));
        }
        Ok(SymbolReference::unsolved())
    }

    fn solve_method(
        &self,
        name: &str,
        args: &[Type],
        _static_only: bool,
        solver: &dyn TypeSolver,
    ) -> Result<SymbolReference<Arc<dyn MethodDeclaration>>> {
        for import in self.file.imports().iter().filter(|i| i.is_static) {
            if import.is_star {
                if self.imports_own_type(&import.path)? {
                    // Members of this file's own types were already searched
                    // by the enclosing type scopes.
                    return Ok(SymbolReference::unsolved());
                }
                let imported = solver.solve_type(&import.path)?;
                let found = imported.solve_method(name, args, true)?;
                if found.is_solved() {
                    return Ok(found);
                }
            } else if import.path == name || import.path.ends_with(&format!(".{name}")) {
                let (type_name, _) = split_member(&import.path)?;
                let imported = solver.solve_type(type_name)?;
                let found = imported.solve_method(name, args, true)?;
                if found.is_solved() {
                    return Ok(found);
                }
            }
        }
        Ok(SymbolReference::unsolved())
    }
}

/// Scope of a type body: the type itself, its member types, its type
/// parameters and the member types it inherits.
///
/// Works over any [`ReferenceTypeDeclaration`], whatever its backend.
pub struct TypeDeclarationContext {
    declaration: Arc<dyn ReferenceTypeDeclaration>,
    parent: Option<Arc<dyn Context>>,
    search_ancestors: bool,
}

impl TypeDeclarationContext {
    pub fn new(declaration: Arc<dyn ReferenceTypeDeclaration>, parent: Option<Arc<dyn Context>>) -> Self {
        Self::with_ancestor_search(declaration, parent, true)
    }

    /// With `search_ancestors` off, member types inherited from supertypes
    /// are not in scope. Used while the supertypes themselves are resolved.
    pub fn with_ancestor_search(
        declaration: Arc<dyn ReferenceTypeDeclaration>,
        parent: Option<Arc<dyn Context>>,
        search_ancestors: bool,
    ) -> Self {
        Self {
            declaration,
            parent,
            search_ancestors,
        }
    }

    pub fn declaration(&self) -> &Arc<dyn ReferenceTypeDeclaration> {
        &self.declaration
    }

    fn solve_in_parent(&self, name: &str, solver: &dyn TypeSolver) -> Result<SymbolReference<TypeDeclaration>> {
        match &self.parent {
            Some(parent) => parent.solve_type(name, solver),
            None => Ok(SymbolReference::unsolved()),
        }
    }

    fn inherited_member_type(&self, name: &str) -> Option<Arc<dyn ReferenceTypeDeclaration>> {
        let ancestors = match self.declaration.ancestors() {
            Ok(ancestors) => ancestors,
            Err(err) => {
                tracing::debug!(
                    target: "javasym.resolution",
                    ty = self.declaration.qualified_name(),
                    error = %err,
                    "skipping inherited member types"
                );
                return None;
            }
        };
        ancestors.iter().find_map(|ancestor| {
            ancestor
                .declaration()
                .internal_types()
                .into_iter()
                .find(|internal| internal.name() == name)
        })
    }
}

impl fmt::Debug for TypeDeclarationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDeclarationContext")
            .field("declaration", &self.declaration.qualified_name())
            .field("search_ancestors", &self.search_ancestors)
            .finish()
    }
}

impl Context for TypeDeclarationContext {
    fn parent(&self) -> Option<Arc<dyn Context>> {
        self.parent.clone()
    }

    fn solve_symbol(&self, name: &str, solver: &dyn TypeSolver) -> Result<SymbolReference<Arc<dyn ValueDeclaration>>> {
        match self.declaration.field(name) {
            Ok(field) => {
                let value: Arc<dyn ValueDeclaration> = field;
                Ok(SymbolReference::solved(value))
            }
            Err(ResolveError::Unsolved { .. }) => match &self.parent {
                Some(parent) => parent.solve_symbol(name, solver),
                None => Ok(SymbolReference::unsolved()),
            },
            Err(err) => Err(err),
        }
    }

    fn solve_type(&self, name: &str, solver: &dyn TypeSolver) -> Result<SymbolReference<TypeDeclaration>> {
        let own = self.declaration.name();
        if own == name {
            return Ok(SymbolReference::solved(TypeDeclaration::Reference(
                self.declaration.clone(),
            )));
        }

        for internal in self.declaration.internal_types() {
            let inner = internal.name();
            if inner == name {
                return Ok(SymbolReference::solved(TypeDeclaration::Reference(internal)));
            }
            let qualified_inner = format!("{own}.{inner}");
            let rest = if name == qualified_inner || name.starts_with(&format!("{qualified_inner}.")) {
                Some(&name[own.len() + 1..])
            } else {
                name.strip_prefix(inner).and_then(|rest| rest.strip_prefix('.'))
            };
            if let Some(rest) = rest {
                return TypeDeclarationContext::new(internal.clone(), self.parent.clone()).solve_type(rest, solver);
            }
        }

        if let Some(tp) = self
            .declaration
            .type_parameters()
            .into_iter()
            .find(|tp| tp.name() == name)
        {
            return Ok(SymbolReference::solved(TypeDeclaration::TypeParameter(tp)));
        }

        if self.search_ancestors {
            if let Some(inherited) = self.inherited_member_type(name) {
                return Ok(SymbolReference::solved(TypeDeclaration::Reference(inherited)));
            }
        }

        self.solve_in_parent(name, solver)
    }

    fn solve_generic_type(&self, name: &str, solver: &dyn TypeSolver) -> Result<Option<Type>> {
        if let Some(tp) = self.declaration.find_type_parameter(name)? {
            return Ok(Some(Type::TypeVariable(tp)));
        }
        match &self.parent {
            Some(parent) => parent.solve_generic_type(name, solver),
            None => Ok(None),
        }
    }

    /// Own methods and the best match of each supertype compete; enclosing
    /// scopes are only consulted when neither yields a candidate.
    fn solve_method(
        &self,
        name: &str,
        args: &[Type],
        static_only: bool,
        solver: &dyn TypeSolver,
    ) -> Result<SymbolReference<Arc<dyn MethodDeclaration>>> {
        let decl = &self.declaration;
        let mut candidates: Vec<Arc<dyn MethodDeclaration>> = decl
            .declared_methods()
            .into_iter()
            .filter(|m| m.name() == name && (!static_only || m.is_static()))
            .collect();

        if !decl.is_java_lang_object() {
            for ancestor in decl.ancestors()? {
                if ancestor.qualified_name() == decl.qualified_name() {
                    continue;
                }
                if let Some(method) = ancestor
                    .declaration()
                    .solve_method(name, args, static_only)?
                    .into_declaration()
                {
                    candidates.push(method);
                }
            }
        }

        if candidates.is_empty() {
            if let Some(parent) = &self.parent {
                if let Some(method) = parent
                    .solve_method(name, args, static_only, solver)?
                    .into_declaration()
                {
                    candidates.push(method);
                }
            }
        }

        if candidates.is_empty() && decl.is_interface() {
            let object = solver.solve_type(JAVA_LANG_OBJECT)?;
            if let Some(method) = object.solve_method(name, args, false)?.into_declaration() {
                candidates.push(method);
            }
        }

        javasym_types::resolution::find_most_applicable_method(&candidates, name, args)
    }
}

/// Scope of a method or constructor: its parameters and its own type
/// parameters.
pub struct MethodContext {
    method: Arc<dyn MethodLikeDeclaration>,
    parent: Option<Arc<dyn Context>>,
}

impl MethodContext {
    pub fn new(method: Arc<dyn MethodLikeDeclaration>, parent: Option<Arc<dyn Context>>) -> Self {
        Self { method, parent }
    }

    pub fn method(&self) -> &Arc<dyn MethodLikeDeclaration> {
        &self.method
    }
}

impl fmt::Debug for MethodContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodContext").field("method", &self.method).finish()
    }
}

impl Context for MethodContext {
    fn parent(&self) -> Option<Arc<dyn Context>> {
        self.parent.clone()
    }

    fn solve_symbol(&self, name: &str, solver: &dyn TypeSolver) -> Result<SymbolReference<Arc<dyn ValueDeclaration>>> {
        if let Some(param) = self.method.params().into_iter().find(|p| p.name() == name) {
            let value: Arc<dyn ValueDeclaration> = param;
            return Ok(SymbolReference::solved(value));
        }
        match &self.parent {
            Some(parent) => parent.solve_symbol(name, solver),
            None => Ok(SymbolReference::unsolved()),
        }
    }

    fn solve_type(&self, name: &str, solver: &dyn TypeSolver) -> Result<SymbolReference<TypeDeclaration>> {
        if let Some(tp) = self
            .method
            .type_parameters()
            .into_iter()
            .find(|tp| tp.name() == name)
        {
            return Ok(SymbolReference::solved(TypeDeclaration::TypeParameter(tp)));
        }
        match &self.parent {
            Some(parent) => parent.solve_type(name, solver),
            None => Ok(SymbolReference::unsolved()),
        }
    }

    fn solve_generic_type(&self, name: &str, solver: &dyn TypeSolver) -> Result<Option<Type>> {
        if let Some(tp) = self.method.find_type_parameter(name)? {
            return Ok(Some(Type::TypeVariable(tp)));
        }
        match &self.parent {
            Some(parent) => parent.solve_generic_type(name, solver),
            None => Ok(None),
        }
    }

    /// Calls from a method body are not restricted to static methods.
    fn solve_method(
        &self,
        name: &str,
        args: &[Type],
        _static_only: bool,
        solver: &dyn TypeSolver,
    ) -> Result<SymbolReference<Arc<dyn MethodDeclaration>>> {
        match &self.parent {
            Some(parent) => parent.solve_method(name, args, false, solver),
            None => Ok(SymbolReference::unsolved()),
        }
    }
}
