use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum JarError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    #[error("{entry}: {source}")]
    ClassFile {
        entry: String,
        #[source]
        source: javasym_classfile::Error,
    },
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("source root {} is not a directory", .0.display())]
    NotADirectory(PathBuf),
}
