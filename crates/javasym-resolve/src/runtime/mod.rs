//! Runtime-backed type solving.
//!
//! A [`ClassLoader`] hands out classes by binary name; [`ReflectionTypeSolver`]
//! wraps them as declarations. The default loader is a built-in catalogue of
//! core library classes, so no JVM or JDK install is needed.

mod catalogue;

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use javasym_classfile::ClassStub;
use javasym_types::{Origin, ReferenceTypeDeclaration, SolverLink, SymbolReference, TypeSolver};
use parking_lot::Mutex;

use crate::binary::{self, ClassSource};

pub use catalogue::BuiltinClassLoader;

pub trait ClassLoader: Send + Sync + fmt::Debug {
    /// Loads a class by binary name, nested classes joined with `$`
    /// (`java.util.Map$Entry`).
    fn load_class(&self, binary_name: &str) -> Option<ClassStub>;
}

const JRE_PREFIXES: &[&str] = &["java.", "javax."];

pub struct ReflectionTypeSolver {
    link: SolverLink,
    this: Weak<ReflectionTypeSolver>,
    loader: Arc<dyn ClassLoader>,
    /// Empty means every name may be loaded.
    allowed_prefixes: Vec<String>,
    declarations: Mutex<HashMap<String, Arc<dyn ReferenceTypeDeclaration>>>,
}

impl ReflectionTypeSolver {
    /// Unrestricted solver over the built-in catalogue.
    pub fn new() -> Arc<Self> {
        Self::with_loader(Arc::new(BuiltinClassLoader::new()), Vec::new())
    }

    /// Only names under `java.` and `javax.` are resolved.
    pub fn jre_only() -> Arc<Self> {
        Self::with_allowed_prefixes(JRE_PREFIXES.iter().map(|p| p.to_string()).collect())
    }

    pub fn with_allowed_prefixes(allowed_prefixes: Vec<String>) -> Arc<Self> {
        Self::with_loader(Arc::new(BuiltinClassLoader::new()), allowed_prefixes)
    }

    pub fn with_loader(loader: Arc<dyn ClassLoader>, allowed_prefixes: Vec<String>) -> Arc<Self> {
        Arc::new_cyclic(|this: &Weak<ReflectionTypeSolver>| {
            let solver: Weak<dyn TypeSolver> = this.clone();
            ReflectionTypeSolver {
                link: SolverLink::new(solver),
                this: this.clone(),
                loader,
                allowed_prefixes,
                declarations: Mutex::new(HashMap::new()),
            }
        })
    }

    pub fn allowed_prefixes(&self) -> &[String] {
        &self.allowed_prefixes
    }

    fn is_allowed(&self, name: &str) -> bool {
        self.allowed_prefixes.is_empty() || self.allowed_prefixes.iter().any(|p| name.starts_with(p.as_str()))
    }

    fn load(&self, binary_name: &str) -> Option<Arc<dyn ReferenceTypeDeclaration>> {
        if let Some(decl) = self.declarations.lock().get(binary_name) {
            return Some(decl.clone());
        }
        let stub = self.loader.load_class(binary_name)?;
        let source: Weak<dyn ClassSource> = self.this.clone();
        let decl = binary::declare(stub, Origin::Runtime, self.link.handle(), source);
        Some(
            self.declarations
                .lock()
                .entry(binary_name.to_string())
                .or_insert(decl)
                .clone(),
        )
    }
}

impl ClassSource for ReflectionTypeSolver {
    fn load_internal(&self, internal_name: &str) -> Option<Arc<dyn ReferenceTypeDeclaration>> {
        self.load(&internal_name.replace('/', "."))
    }
}

impl TypeSolver for ReflectionTypeSolver {
    fn link(&self) -> &SolverLink {
        &self.link
    }

    /// Nested classes written with dots (`java.util.Map.Entry`) are found by
    /// resolving the enclosing name and searching its member classes.
    fn try_to_solve_type(&self, name: &str) -> SymbolReference<Arc<dyn ReferenceTypeDeclaration>> {
        if !self.is_allowed(name) {
            return SymbolReference::unsolved();
        }
        if let Some(decl) = self.load(name) {
            return SymbolReference::solved(decl);
        }
        let Some((outer, inner)) = name.rsplit_once('.') else {
            return SymbolReference::unsolved();
        };
        let Some(outer) = self.try_to_solve_type(outer).into_declaration() else {
            return SymbolReference::unsolved();
        };
        outer
            .internal_types()
            .into_iter()
            .find(|nested| nested.name() == inner)
            .into()
    }

    fn description(&self) -> String {
        if self.allowed_prefixes.is_empty() {
            "ReflectionTypeSolver".to_string()
        } else {
            format!("ReflectionTypeSolver[{}]", self.allowed_prefixes.join(", "))
        }
    }
}

impl fmt::Debug for ReflectionTypeSolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReflectionTypeSolver")
            .field("loader", &self.loader)
            .field("allowed_prefixes", &self.allowed_prefixes)
            .finish()
    }
}
