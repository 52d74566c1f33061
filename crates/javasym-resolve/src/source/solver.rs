use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};

use javasym_types::{ReferenceTypeDeclaration, SolverLink, SymbolReference, TypeSolver};
use parking_lot::Mutex;
use walkdir::WalkDir;

use crate::error::SourceError;
use crate::source::SourceFile;

/// Resolves types from a tree of `.java` files laid out by package.
///
/// For `a.b.C.D` the candidate files are `a/b/C/D.java`, `a/b/C.java`,
/// `a/b.java` and `a.java`, each with the rest of the name looked up as a
/// nested path. When the file does not declare the type, the other files of
/// the same directory are searched too.
pub struct JavaParserTypeSolver {
    link: SolverLink,
    root: PathBuf,
    parsed_files: Mutex<HashMap<PathBuf, Option<Arc<SourceFile>>>>,
    parsed_directories: Mutex<HashMap<PathBuf, Vec<Arc<SourceFile>>>>,
    found_types: Mutex<HashMap<String, Arc<dyn ReferenceTypeDeclaration>>>,
}

impl JavaParserTypeSolver {
    pub fn new(root: impl AsRef<Path>) -> Result<Arc<Self>, SourceError> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(SourceError::NotADirectory(root.to_path_buf()));
        }
        let root = root.canonicalize().map_err(|source| SourceError::Io {
            path: root.to_path_buf(),
            source,
        })?;
        Ok(Arc::new_cyclic(|this: &Weak<JavaParserTypeSolver>| {
            let solver: Weak<dyn TypeSolver> = this.clone();
            JavaParserTypeSolver {
                link: SolverLink::new(solver),
                root,
                parsed_files: Mutex::new(HashMap::new()),
                parsed_directories: Mutex::new(HashMap::new()),
                found_types: Mutex::new(HashMap::new()),
            }
        }))
    }

    pub fn source_root(&self) -> &Path {
        &self.root
    }

    /// The parsed file at `relative` under the source root, if it exists.
    pub fn source_file(&self, relative: impl AsRef<Path>) -> Option<Arc<SourceFile>> {
        self.parse(&self.root.join(relative))
    }

    fn parse(&self, path: &Path) -> Option<Arc<SourceFile>> {
        if let Some(parsed) = self.parsed_files.lock().get(path) {
            return parsed.clone();
        }
        let parsed = match fs::read_to_string(path) {
            Ok(text) => Some(SourceFile::parse(&text, Some(path.to_path_buf()), self.link.handle())),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                tracing::warn!(
                    target: "javasym.solver",
                    path = %path.display(),
                    error = %err,
                    "skipping unreadable source file"
                );
                None
            }
        };
        self.parsed_files
            .lock()
            .entry(path.to_path_buf())
            .or_insert(parsed)
            .clone()
    }

    fn parse_directory(&self, dir: &Path) -> Vec<Arc<SourceFile>> {
        if let Some(files) = self.parsed_directories.lock().get(dir) {
            return files.clone();
        }
        let mut files = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!(
                        target: "javasym.solver",
                        dir = %dir.display(),
                        error = %err,
                        "cannot list source directory"
                    );
                    break;
                }
            };
            let is_java = entry
                .path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("java"));
            if entry.file_type().is_file() && is_java {
                files.extend(self.parse(entry.path()));
            }
        }
        tracing::debug!(
            target: "javasym.solver",
            dir = %dir.display(),
            files = files.len(),
            "parsed source directory"
        );
        self.parsed_directories
            .lock()
            .entry(dir.to_path_buf())
            .or_insert(files)
            .clone()
    }

    fn solve_uncached(&self, name: &str) -> Option<Arc<dyn ReferenceTypeDeclaration>> {
        let elements: Vec<&str> = name.split('.').collect();
        if !elements.iter().all(|segment| is_identifier(segment)) {
            tracing::debug!(target: "javasym.solver", name, "not a qualified type name");
            return None;
        }
        for split in (1..=elements.len()).rev() {
            let mut path = self.root.clone();
            path.extend(&elements[..split - 1]);
            path.push(format!("{}.java", elements[split - 1]));
            let type_path = elements[split - 1..].join(".");

            if let Some(found) = self.parse(&path).and_then(|file| file.find_type(&type_path)) {
                return Some(found);
            }
            let Some(dir) = path.parent() else {
                continue;
            };
            if let Some(found) = self
                .parse_directory(dir)
                .iter()
                .find_map(|file| file.find_type(&type_path))
            {
                return Some(found);
            }
        }
        None
    }
}

/// Segments become path components, so anything that could name a
/// different directory is refused.
fn is_identifier(segment: &str) -> bool {
    !segment.is_empty() && segment.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

impl TypeSolver for JavaParserTypeSolver {
    fn link(&self) -> &SolverLink {
        &self.link
    }

    /// Only successful lookups are memoised.
    fn try_to_solve_type(&self, name: &str) -> SymbolReference<Arc<dyn ReferenceTypeDeclaration>> {
        if let Some(found) = self.found_types.lock().get(name) {
            return SymbolReference::solved(found.clone());
        }
        let Some(found) = self.solve_uncached(name) else {
            return SymbolReference::unsolved();
        };
        tracing::debug!(target: "javasym.solver", name, root = %self.root.display(), "found source type");
        self.found_types.lock().insert(name.to_string(), found.clone());
        SymbolReference::solved(found)
    }

    fn description(&self) -> String {
        format!("JavaParserTypeSolver({})", self.root.display())
    }
}

impl fmt::Debug for JavaParserTypeSolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JavaParserTypeSolver")
            .field("root", &self.root)
            .field("parsed_files", &self.parsed_files.lock().len())
            .finish()
    }
}
