use std::path::Path;
use std::sync::Arc;

use javasym_resolve::{JavaParserTypeSolver, ReflectionTypeSolver};
use javasym_test_utils::write_sources;
use javasym_types::{CombinedTypeSolver, ReferenceType, Type, TypeSolver};
use tempfile::TempDir;

mod facade;
mod jar;
mod runtime;

/// Runtime classes first, then `rest`, the way a configured session orders
/// its solvers.
pub fn session(rest: Vec<Arc<dyn TypeSolver>>) -> Arc<dyn TypeSolver> {
    let mut children: Vec<Arc<dyn TypeSolver>> = vec![ReflectionTypeSolver::new()];
    children.extend(rest);
    CombinedTypeSolver::new(children).unwrap()
}

pub fn source_tree(files: &[(&str, &str)]) -> (TempDir, Arc<JavaParserTypeSolver>) {
    let dir = tempfile::tempdir().unwrap();
    write_sources(dir.path(), files);
    let solver = JavaParserTypeSolver::new(dir.path()).unwrap();
    (dir, solver)
}

pub fn source_solver(root: &Path) -> Arc<JavaParserTypeSolver> {
    JavaParserTypeSolver::new(root).unwrap()
}

/// The raw reference type named `name`, resolved through `solver`.
pub fn class_type(solver: &Arc<dyn TypeSolver>, name: &str) -> Type {
    Type::reference(ReferenceType::raw(solver.solve_type(name).unwrap()))
}
