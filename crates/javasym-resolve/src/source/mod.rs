//! Source-backed type solving.

mod decl;
mod file;
mod solver;

pub use file::SourceFile;
pub use solver::JavaParserTypeSolver;
