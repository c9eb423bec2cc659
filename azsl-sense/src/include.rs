//! Resolution of `#include` paths to document URIs.
use std::path::{Path, PathBuf};

use url::Url;
use walkdir::WalkDir;

use crate::shader_error::ShaderError;

/// Include text with `\` separators turned into `/`.
pub fn normalize_include_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// `./` and `../` includes are resolved against the including document.
pub fn is_relative_include(path: &str) -> bool {
    path.starts_with('.')
}

// Path of a URI with `/` separators, decoded for file URIs.
fn uri_path(uri: &Url) -> String {
    match uri.to_file_path() {
        Ok(path) => path.to_string_lossy().replace('\\', "/"),
        Err(()) => uri.path().to_string(),
    }
}

/// Whether the path of `uri` ends with `include` on a path component boundary:
/// `shared.azsli` matches `/project/shared.azsli` but not `/project/unshared.azsli`.
pub fn uri_matches_include(uri: &Url, include: &str) -> bool {
    let include = normalize_include_path(include);
    let include = include.trim_start_matches("./");
    if include.is_empty() {
        return false;
    }
    let path = uri_path(uri);
    match path.strip_suffix(include) {
        Some(prefix) => prefix.is_empty() || prefix.ends_with('/') || include.starts_with('/'),
        None => false,
    }
}

/// Finds include targets, first among known documents then on disk.
#[derive(Debug, Default, Clone)]
pub struct IncludeHandler {
    includes: Vec<PathBuf>,
}

impl IncludeHandler {
    pub fn new(includes: Vec<PathBuf>) -> Self {
        Self { includes }
    }
    pub fn get_includes(&self) -> &[PathBuf] {
        &self.includes
    }
    /// Join a relative include onto the URI of the including document.
    pub fn resolve_relative(owner: &Url, include: &str) -> Result<Url, ShaderError> {
        owner
            .join(&normalize_include_path(include))
            .map_err(|err| ShaderError::InvalidPath(format!("{} from {}: {}", include, owner, err)))
    }
    /// First known URI matching the include. Relative includes never go through here.
    pub fn search_in_documents<'a>(
        include: &str,
        mut documents: impl Iterator<Item = &'a Url>,
    ) -> Option<Url> {
        documents
            .find(|uri| uri_matches_include(uri, include))
            .cloned()
    }
    /// Walk the include directories for a file ending with `include`.
    pub fn search_path_in_includes(&self, include: &str) -> Option<PathBuf> {
        let include = normalize_include_path(include);
        let relative = Path::new(include.trim_start_matches("./"));
        if relative.as_os_str().is_empty() {
            return None;
        }
        for root in &self.includes {
            let direct = root.join(relative);
            if direct.is_file() {
                return Some(direct);
            }
            let found = WalkDir::new(root)
                .follow_links(true)
                .into_iter()
                .filter_map(|entry| match entry {
                    Ok(entry) => Some(entry),
                    Err(err) => {
                        log::debug!("Skipping include directory entry: {}", err);
                        None
                    }
                })
                .find(|entry| entry.file_type().is_file() && entry.path().ends_with(relative));
            if let Some(entry) = found {
                return Some(entry.into_path());
            }
        }
        None
    }
}

/// Read a file found on disk.
pub fn read_include(path: &Path) -> Result<(Url, String), ShaderError> {
    let uri = Url::from_file_path(path)
        .map_err(|()| ShaderError::InvalidPath(path.display().to_string()))?;
    let content = std::fs::read_to_string(path).map_err(|err| ShaderError::io(path, err))?;
    Ok((uri, content))
}
