//! Type model and resolution core for Java symbol solving.
//!
//! The crate is backend-agnostic: declarations are consumed through the
//! capability traits in [`decl`], and every name lookup goes through the root
//! of a [`TypeSolver`] tree. Concrete backends (source trees, jars, the
//! runtime catalogue) live in `javasym-resolve`.

#![forbid(unsafe_code)]

mod convert;
pub mod decl;
mod error;
mod reference;
pub mod resolution;
mod solver;
mod symbol;
pub mod synthetic;
mod ty;
mod type_params;

pub use convert::type_from_syntax;
pub use decl::{
    Ancestry, Bound, ConstructorDeclaration, FieldDeclaration, FieldLookup, MethodDeclaration,
    MethodLikeDeclaration, MethodLookup, Origin, ParameterDeclaration, ReferenceTypeDeclaration,
    TypeDeclaration, TypeKind, TypeParameterContainer, TypeParameterDeclaration, ValueDeclaration,
};
pub use error::{ResolveError, Result};
pub use reference::ReferenceType;
pub use solver::{CombinedTypeSolver, MemoryTypeSolver, SolverHandle, SolverLink, TypeSolver};
pub use symbol::{MethodUsage, SymbolReference, Value};
pub use ty::{ArrayType, LambdaConstraintType, PrimitiveType, Type, Wildcard, JAVA_LANG_OBJECT};
pub use type_params::TypeParametersMap;
