//! Declaration backends, lexical scopes and the symbol solver facade.
//!
//! Three backends produce declarations: parsed source trees
//! ([`JavaParserTypeSolver`]), class-file archives ([`JarTypeSolver`]) and
//! the runtime class catalogue ([`ReflectionTypeSolver`]). All of them plug
//! into a `javasym_types::CombinedTypeSolver` and resolve further names
//! through its root.

#![forbid(unsafe_code)]

mod binary;
mod context;
mod error;
mod facade;
mod jar;
mod runtime;
mod source;

pub use context::{CompilationUnitContext, Context, MethodContext, TypeDeclarationContext};
pub use error::{JarError, SourceError};
pub use facade::SymbolSolver;
pub use jar::{entry_to_internal_name, JarTypeSolver};
pub use runtime::{BuiltinClassLoader, ClassLoader, ReflectionTypeSolver};
pub use source::{JavaParserTypeSolver, SourceFile};
