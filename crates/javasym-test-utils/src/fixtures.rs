use std::fs;
use std::io::Write;
use std::path::Path;

use zip::write::FileOptions;

/// Writes `(relative path, contents)` pairs below `root`, creating parent
/// directories as needed.
pub fn write_sources(root: &Path, files: &[(&str, &str)]) {
    for (rel, text) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create fixture directory");
        }
        fs::write(&path, text).expect("write fixture file");
    }
}

/// Writes a zip archive at `path` with the given `(entry name, bytes)` pairs.
pub fn write_jar(path: &Path, entries: &[(&str, Vec<u8>)]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create fixture directory");
    }
    let file = fs::File::create(path).expect("create fixture jar");
    let mut zip = zip::ZipWriter::new(file);
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for (name, bytes) in entries {
        zip.start_file(*name, options).expect("start jar entry");
        zip.write_all(bytes).expect("write jar entry");
    }
    zip.finish().expect("finish fixture jar");
}
