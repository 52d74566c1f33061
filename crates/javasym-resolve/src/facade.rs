use std::sync::Arc;

use javasym_types::{
    MethodUsage, ReferenceType, ReferenceTypeDeclaration, ResolveError, Result, SymbolReference, Type,
    TypeDeclaration, TypeSolver, Value, ValueDeclaration,
};

use crate::context::Context;

/// Visible field `name` of `decl`, own or inherited.
pub(crate) fn symbol_in_type(
    decl: &dyn ReferenceTypeDeclaration,
    name: &str,
) -> Result<SymbolReference<Arc<dyn ValueDeclaration>>> {
    match decl.field(name) {
        Ok(field) => {
            let value: Arc<dyn ValueDeclaration> = field;
            Ok(SymbolReference::solved(value))
        }
        Err(ResolveError::Unsolved { .. }) => Ok(SymbolReference::unsolved()),
        Err(err) => Err(err),
    }
}

/// Entry point for resolving names found at some point of a source tree.
///
/// Lookups start in the given [`Context`] and fall back to the root of the
/// solver tree the facade was created with.
#[derive(Debug, Clone)]
pub struct SymbolSolver {
    solver: Arc<dyn TypeSolver>,
}

impl SymbolSolver {
    pub fn new(solver: Arc<dyn TypeSolver>) -> Self {
        Self { solver }
    }

    fn root(&self) -> Result<Arc<dyn TypeSolver>> {
        self.solver.root()
    }

    pub fn solve_symbol(
        &self,
        name: &str,
        context: &dyn Context,
    ) -> Result<SymbolReference<Arc<dyn ValueDeclaration>>> {
        context.solve_symbol(name, self.root()?.as_ref())
    }

    pub fn solve_symbol_as_value(&self, name: &str, context: &dyn Context) -> Result<Option<Value>> {
        context.solve_symbol_as_value(name, self.root()?.as_ref())
    }

    pub fn solve_type(&self, name: &str, context: &dyn Context) -> Result<SymbolReference<TypeDeclaration>> {
        context.solve_type(name, self.root()?.as_ref())
    }

    /// Unlike the other lookups, a method that cannot be found is an error.
    pub fn solve_method(&self, name: &str, args: &[Type], context: &dyn Context) -> Result<MethodUsage> {
        let root = self.root()?;
        match context.solve_method(name, args, false, root.as_ref())?.into_declaration() {
            Some(method) => MethodUsage::new(method),
            None => {
                tracing::debug!(target: "javasym.resolution", name, args = args.len(), "method not found");
                Err(ResolveError::unsolved_in(name, format!("{context:?}")))
            }
        }
    }

    /// A type variable in scope, or else the named type parameterised with
    /// its own type variables.
    pub fn solve_type_usage(&self, name: &str, context: &dyn Context) -> Result<Type> {
        let root = self.root()?;
        if let Some(generic) = context.solve_generic_type(name, root.as_ref())? {
            return Ok(generic);
        }
        let decl = root.solve_type(name)?;
        Ok(Type::reference(ReferenceType::undetermined(decl)))
    }

    pub fn solve_symbol_in_type(
        &self,
        decl: &dyn ReferenceTypeDeclaration,
        name: &str,
    ) -> Result<SymbolReference<Arc<dyn ValueDeclaration>>> {
        symbol_in_type(decl, name)
    }
}
