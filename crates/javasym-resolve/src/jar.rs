use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};

use javasym_classfile::{internal_to_qualified, ClassStub};
use javasym_types::{Origin, ReferenceTypeDeclaration, SolverLink, SymbolReference, TypeSolver};
use parking_lot::Mutex;
use zip::ZipArchive;

use crate::binary::{self, ClassSource};
use crate::error::JarError;

/// `java/util/Map$Entry.class` -> `java/util/Map$Entry`.
pub fn entry_to_internal_name(entry_name: &str) -> Option<&str> {
    let internal = entry_name
        .strip_prefix('/')
        .unwrap_or(entry_name)
        .strip_suffix(".class")?;
    if internal.starts_with("META-INF/") || internal.ends_with("module-info") || internal.ends_with("package-info")
    {
        return None;
    }
    Some(internal)
}

/// Resolves types from the `.class` entries of one archive.
///
/// The central directory is scanned once, at construction; class files are
/// decoded on first lookup and kept for the lifetime of the solver.
pub struct JarTypeSolver {
    link: SolverLink,
    this: Weak<JarTypeSolver>,
    path: PathBuf,
    archive: Mutex<ZipArchive<File>>,
    /// Qualified name (`java.util.Map.Entry`) -> entry name.
    index: HashMap<String, String>,
    declarations: Mutex<HashMap<String, Arc<dyn ReferenceTypeDeclaration>>>,
}

impl JarTypeSolver {
    pub fn new(path: impl AsRef<Path>) -> Result<Arc<Self>, JarError> {
        let path = path.as_ref().to_path_buf();
        let archive = ZipArchive::new(File::open(&path)?)?;

        let mut index = HashMap::new();
        for entry in archive.file_names() {
            let Some(internal) = entry_to_internal_name(entry) else {
                continue;
            };
            index
                .entry(internal_to_qualified(internal))
                .or_insert_with(|| entry.to_string());
        }
        tracing::debug!(
            target: "javasym.solver",
            jar = %path.display(),
            classes = index.len(),
            "indexed jar"
        );

        Ok(Arc::new_cyclic(|this: &Weak<JarTypeSolver>| {
            let solver: Weak<dyn TypeSolver> = this.clone();
            JarTypeSolver {
                link: SolverLink::new(solver),
                this: this.clone(),
                path,
                archive: Mutex::new(archive),
                index,
                declarations: Mutex::new(HashMap::new()),
            }
        }))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Qualified names of every class in the archive, sorted.
    pub fn class_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.index.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    fn read_stub(&self, entry: &str) -> Result<ClassStub, JarError> {
        let bytes = {
            let mut archive = self.archive.lock();
            let mut file = archive.by_name(entry)?;
            let mut bytes = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut bytes)?;
            bytes
        };
        ClassStub::parse(&bytes).map_err(|source| JarError::ClassFile {
            entry: entry.to_string(),
            source,
        })
    }

    fn materialize(&self, name: &str) -> Option<Arc<dyn ReferenceTypeDeclaration>> {
        if let Some(decl) = self.declarations.lock().get(name) {
            return Some(decl.clone());
        }
        let entry = self.index.get(name)?;
        let stub = match self.read_stub(entry) {
            Ok(stub) => stub,
            Err(err) => {
                tracing::warn!(
                    target: "javasym.solver",
                    jar = %self.path.display(),
                    entry = %entry,
                    error = %err,
                    "skipping unreadable class entry"
                );
                return None;
            }
        };
        let source: Weak<dyn ClassSource> = self.this.clone();
        let decl = binary::declare(stub, Origin::Binary, self.link.handle(), source);
        tracing::debug!(target: "javasym.solver", jar = %self.path.display(), name, "loaded class");
        Some(
            self.declarations
                .lock()
                .entry(name.to_string())
                .or_insert(decl)
                .clone(),
        )
    }
}

impl ClassSource for JarTypeSolver {
    fn load_internal(&self, internal_name: &str) -> Option<Arc<dyn ReferenceTypeDeclaration>> {
        self.materialize(&internal_to_qualified(internal_name))
    }
}

impl TypeSolver for JarTypeSolver {
    fn link(&self) -> &SolverLink {
        &self.link
    }

    fn try_to_solve_type(&self, name: &str) -> SymbolReference<Arc<dyn ReferenceTypeDeclaration>> {
        self.materialize(name).into()
    }

    fn description(&self) -> String {
        format!("JarTypeSolver({})", self.path.display())
    }
}

impl fmt::Debug for JarTypeSolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JarTypeSolver")
            .field("path", &self.path)
            .field("classes", &self.index.len())
            .finish()
    }
}
