//! Reversible obfuscation of string values
//!
//! String values are stored on disk with their characters in reverse order so
//! that a casual reader of the file does not see them verbatim. This is
//! obfuscation, not encryption: anyone who knows the rule can undo it.
//!
//! The rule operates on Unicode scalar values, never on bytes, so multi-byte
//! text survives intact. Existing files depend on this exact rule; changing it
//! breaks every previously written configuration.

/// Obscure a value before it is written to disk
pub fn obscure(value: &str) -> String {
    value.chars().rev().collect()
}

/// Recover a value that was written with [`obscure`]
pub fn reveal(value: &str) -> String {
    value.chars().rev().collect()
}
