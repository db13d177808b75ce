use std::path::{Component, Path};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("Empty path")]
    Empty,

    #[error("Absolute path not allowed: {0}")]
    Absolute(String),

    #[error("Parent directory traversal not allowed: {0}")]
    Traversal(String),

    #[error("Invalid UTF-8 in path: {0}")]
    InvalidUtf8(String),

    #[error("No valid components: {0}")]
    NoComponents(String),
}

pub struct PathSanitizer;

impl PathSanitizer {
    /// Sanitize an archive member name to prevent:
    /// - Directory traversal (../)
    /// - Absolute paths (/etc/passwd)
    /// - Zip slip attacks
    ///
    /// Backslash separators are treated like forward slashes. Returns a
    /// normalized relative path joined with `/`.
    pub fn sanitize(raw_path: &str) -> Result<String, PathError> {
        if raw_path.is_empty() {
            return Err(PathError::Empty);
        }

        let unified = raw_path.replace('\\', "/");
        if unified.starts_with('/') || has_drive_prefix(&unified) {
            return Err(PathError::Absolute(raw_path.to_string()));
        }

        let mut components = Vec::new();
        for component in Path::new(&unified).components() {
            match component {
                Component::Prefix(_) | Component::RootDir => {
                    return Err(PathError::Absolute(raw_path.to_string()));
                }
                Component::ParentDir => {
                    return Err(PathError::Traversal(raw_path.to_string()));
                }
                // Skip current directory markers
                Component::CurDir => continue,
                Component::Normal(part) => {
                    let part = part
                        .to_str()
                        .ok_or_else(|| PathError::InvalidUtf8(format!("{:?}", part)))?;
                    components.push(part);
                }
            }
        }

        if components.is_empty() {
            return Err(PathError::NoComponents(raw_path.to_string()));
        }

        Ok(components.join("/"))
    }
}

/// `C:` style prefixes, which only parse as prefixes on Windows
fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
