
use crate::input::InputFile;
use crate::parser::{ArchiveExtractor, ParseError};
use crate::security::PathSanitizer;
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// Resource-fork directory added by the macOS archiver
const MACOS_FORK_PREFIX: &str = "__MACOSX/";

/// Finder metadata file, skipped at any depth
const DS_STORE: &str = ".DS_Store";

/// Built-in ZIP extractor working entirely in memory
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipExtractor;

impl ArchiveExtractor for ZipExtractor {
    fn members(&self, archive: &[u8], max_member_size: u64) -> Result<Vec<InputFile>, ParseError> {
        let mut zip = ZipArchive::new(Cursor::new(archive))?;
        let mut members = Vec::new();

        for i in 0..zip.len() {
            let file = zip.by_index(i)?;

            // Skip directories
            if file.is_dir() {
                continue;
            }

            let raw_path = file.name().to_string();
            if is_platform_artifact(&raw_path) {
                continue;
            }

            let path = PathSanitizer::sanitize(&raw_path)?;

            // Declared sizes can lie, so cap the read itself
            let mut contents = Vec::new();
            file.take(max_member_size.saturating_add(1))
                .read_to_end(&mut contents)?;

            if contents.len() as u64 > max_member_size {
                return Err(ParseError::MemberTooLarge {
                    path,
                    size: contents.len() as u64,
                    max: max_member_size,
                });
            }

            members.push(InputFile::from_contents(path, contents));
        }

        Ok(members)
    }
}

fn is_platform_artifact(raw_path: &str) -> bool {
    let basename = raw_path.rsplit('/').next().unwrap_or(raw_path);
    raw_path.starts_with(MACOS_FORK_PREFIX) || basename == DS_STORE
}
