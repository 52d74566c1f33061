//! Type solver tree.
//!
//! Solvers link to their parent through weak references so that a composite
//! owns its children and never the other way around. Declarations keep a
//! [`SolverHandle`] to the solver that produced them and always resolve
//! further names through that solver's root.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::decl::ReferenceTypeDeclaration;
use crate::error::{ResolveError, Result};
use crate::symbol::SymbolReference;
use crate::synthetic::TypeDeclarationBuilder;

/// Self and parent links shared by every solver implementation.
pub struct SolverLink {
    this: Weak<dyn TypeSolver>,
    parent: RwLock<Option<Weak<dyn TypeSolver>>>,
}

impl SolverLink {
    /// `this` is the weak self reference handed out by `Arc::new_cyclic`.
    pub fn new(this: Weak<dyn TypeSolver>) -> Self {
        Self {
            this,
            parent: RwLock::new(None),
        }
    }

    pub fn handle(&self) -> SolverHandle {
        SolverHandle(Some(self.this.clone()))
    }
}

impl fmt::Debug for SolverLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolverLink")
            .field("has_parent", &self.parent.read().is_some())
            .finish()
    }
}

pub trait TypeSolver: Send + Sync + fmt::Debug {
    fn link(&self) -> &SolverLink;

    /// Probe lookup by qualified name.
    fn try_to_solve_type(&self, name: &str) -> SymbolReference<Arc<dyn ReferenceTypeDeclaration>>;

    fn description(&self) -> String {
        "TypeSolver".to_string()
    }
}

impl<'a> dyn TypeSolver + 'a {
    pub fn parent(&self) -> Option<Arc<dyn TypeSolver>> {
        self.link().parent.read().as_ref().and_then(Weak::upgrade)
    }

    /// A solver can be attached once, and never to itself.
    pub fn set_parent(&self, parent: &Arc<dyn TypeSolver>) -> Result<()> {
        if std::ptr::addr_eq(Arc::as_ptr(parent), self as *const Self) {
            return Err(ResolveError::InvariantViolation(
                "a type solver cannot be its own parent".to_string(),
            ));
        }
        let mut slot = self.link().parent.write();
        if slot.is_some() {
            return Err(ResolveError::InvariantViolation(format!(
                "{} already has a parent",
                self.description()
            )));
        }
        *slot = Some(Arc::downgrade(parent));
        Ok(())
    }

    /// The topmost solver reachable through parent links.
    pub fn root(&self) -> Result<Arc<dyn TypeSolver>> {
        let mut current = self.link().this.upgrade().ok_or_else(|| {
            ResolveError::InvariantViolation(format!("{} has been dropped", self.description()))
        })?;
        while let Some(parent) = current.parent() {
            current = parent;
        }
        Ok(current)
    }

    /// Demand lookup: [`ResolveError::Unsolved`] naming this solver on failure.
    pub fn solve_type(&self, name: &str) -> Result<Arc<dyn ReferenceTypeDeclaration>> {
        self.try_to_solve_type(name)
            .into_declaration()
            .ok_or_else(|| ResolveError::unsolved_in(name, self.description()))
    }
}

/// Weak link from a declaration back to the solver that produced it.
#[derive(Clone, Default)]
pub struct SolverHandle(Option<Weak<dyn TypeSolver>>);

impl SolverHandle {
    /// A handle that cannot resolve anything; lookups through it fail with
    /// [`ResolveError::InvariantViolation`].
    pub fn detached() -> Self {
        Self(None)
    }

    pub fn root(&self) -> Result<Arc<dyn TypeSolver>> {
        let solver = self
            .0
            .as_ref()
            .and_then(Weak::upgrade)
            .ok_or_else(|| {
                ResolveError::InvariantViolation("declaration is not attached to a type solver".to_string())
            })?;
        solver.root()
    }

    /// Resolves `name` through the root of the producing solver.
    pub fn solve_type(&self, name: &str) -> Result<Arc<dyn ReferenceTypeDeclaration>> {
        self.root()?.solve_type(name)
    }
}

impl fmt::Debug for SolverHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_ref().and_then(Weak::upgrade) {
            Some(solver) => write!(f, "SolverHandle({})", solver.description()),
            None => f.write_str("SolverHandle(detached)"),
        }
    }
}

/// Tries each child in registration order and returns the first success.
pub struct CombinedTypeSolver {
    link: SolverLink,
    children: RwLock<Vec<Arc<dyn TypeSolver>>>,
}

impl CombinedTypeSolver {
    pub fn new(children: Vec<Arc<dyn TypeSolver>>) -> Result<Arc<Self>> {
        let combined = Arc::new_cyclic(|this: &Weak<CombinedTypeSolver>| {
            let this: Weak<dyn TypeSolver> = this.clone();
            CombinedTypeSolver {
                link: SolverLink::new(this),
                children: RwLock::new(Vec::new()),
            }
        });
        for child in children {
            combined.add(child)?;
        }
        Ok(combined)
    }

    /// Appends `child` and makes this solver its parent.
    pub fn add(&self, child: Arc<dyn TypeSolver>) -> Result<()> {
        let this = self.link.this.upgrade().ok_or_else(|| {
            ResolveError::InvariantViolation("combined solver has been dropped".to_string())
        })?;
        child.set_parent(&this)?;
        self.children.write().push(child);
        Ok(())
    }

    pub fn children(&self) -> Vec<Arc<dyn TypeSolver>> {
        self.children.read().clone()
    }
}

impl TypeSolver for CombinedTypeSolver {
    fn link(&self) -> &SolverLink {
        &self.link
    }

    fn try_to_solve_type(&self, name: &str) -> SymbolReference<Arc<dyn ReferenceTypeDeclaration>> {
        for child in self.children() {
            let found = child.try_to_solve_type(name);
            if found.is_solved() {
                return found;
            }
        }
        tracing::debug!(target: "javasym.solver", name, "no child solver resolved type");
        SymbolReference::unsolved()
    }

    fn description(&self) -> String {
        let children: Vec<String> = self.children().iter().map(|c| c.description()).collect();
        format!("CombinedTypeSolver[{}]", children.join(", "))
    }
}

impl fmt::Debug for CombinedTypeSolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombinedTypeSolver")
            .field("children", &*self.children.read())
            .finish()
    }
}

/// Flat name to declaration map, used for fixtures and synthetic types.
pub struct MemoryTypeSolver {
    link: SolverLink,
    declarations: RwLock<HashMap<String, Arc<dyn ReferenceTypeDeclaration>>>,
}

impl MemoryTypeSolver {
    pub fn new() -> Arc<Self> {
        Arc::new_cyclic(|this: &Weak<MemoryTypeSolver>| {
            let this: Weak<dyn TypeSolver> = this.clone();
            MemoryTypeSolver {
                link: SolverLink::new(this),
                declarations: RwLock::new(HashMap::new()),
            }
        })
    }

    /// Handle for declarations that should resolve names through this solver.
    pub fn handle(&self) -> SolverHandle {
        self.link.handle()
    }

    pub fn add_declaration(&self, name: impl Into<String>, declaration: Arc<dyn ReferenceTypeDeclaration>) {
        self.declarations.write().insert(name.into(), declaration);
    }

    /// Builds a synthetic declaration bound to this solver and registers it
    /// under its qualified name.
    pub fn define(&self, builder: TypeDeclarationBuilder) -> Result<Arc<dyn ReferenceTypeDeclaration>> {
        let declaration = builder.build(self.handle())?;
        self.add_declaration(declaration.qualified_name().to_string(), declaration.clone());
        Ok(declaration)
    }

    pub fn len(&self) -> usize {
        self.declarations.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.read().is_empty()
    }
}

impl TypeSolver for MemoryTypeSolver {
    fn link(&self) -> &SolverLink {
        &self.link
    }

    fn try_to_solve_type(&self, name: &str) -> SymbolReference<Arc<dyn ReferenceTypeDeclaration>> {
        match self.declarations.read().get(name) {
            Some(decl) => SymbolReference::solved(decl.clone()),
            None => SymbolReference::unsolved(),
        }
    }

    fn description(&self) -> String {
        format!("MemoryTypeSolver({} types)", self.len())
    }
}

impl fmt::Debug for MemoryTypeSolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self.declarations.read().keys().cloned().collect();
        names.sort();
        f.debug_struct("MemoryTypeSolver").field("types", &names).finish()
    }
}
