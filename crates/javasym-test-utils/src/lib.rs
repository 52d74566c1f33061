//! Utilities shared by javasym tests.
//!
//! [`ClassFileBuilder`] assembles minimal class files by hand so binary-backed
//! tests don't need a `javac` on `PATH`; [`write_jar`] and [`write_sources`]
//! lay fixtures out on disk.

mod class_bytes;
mod fixtures;

pub use class_bytes::{ClassFileBuilder, MemberSpec};
pub use fixtures::{write_jar, write_sources};
