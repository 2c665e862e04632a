/// Destination filename validation
///
/// Checks a user-entered save destination before any write is attempted, so
/// the editor can flag a bad filename next to the input instead of failing
/// mid-save.
use super::error::ValidationError;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Characters allowed in a destination filename: word characters, hyphen,
/// dot and space
static FILENAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w\-. ]+$").unwrap());

/// How to treat a candidate whose directory component is empty
///
/// The character rule forbids path separators, so every accepted candidate
/// is a bare filename with an empty directory component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyDirectoryPolicy {
    /// An empty directory component names the current directory, which
    /// always exists.
    #[default]
    CurrentDirectory,

    /// An empty directory component is checked literally and never exists.
    /// Every candidate is rejected under this policy.
    Strict,
}

/// Validate a destination filename
pub fn validate_destination(
    candidate: &str,
    policy: EmptyDirectoryPolicy,
) -> Result<(), ValidationError> {
    if candidate.is_empty() {
        return Err(ValidationError::Empty);
    }

    if !FILENAME_PATTERN.is_match(candidate) {
        return Err(ValidationError::InvalidCharacters(candidate.to_string()));
    }

    let directory = Path::new(candidate)
        .parent()
        .unwrap_or_else(|| Path::new(""));

    if directory_exists(directory, policy) {
        Ok(())
    } else {
        Err(ValidationError::MissingDirectory(directory.to_path_buf()))
    }
}

/// Check the directory component of a candidate path
fn directory_exists(directory: &Path, policy: EmptyDirectoryPolicy) -> bool {
    if directory.as_os_str().is_empty() {
        return match policy {
            EmptyDirectoryPolicy::CurrentDirectory => true,
            EmptyDirectoryPolicy::Strict => false,
        };
    }

    directory.is_dir()
}
