use crate::error::{CueError, Result};

/// Collapse every run of whitespace (including newlines) to a single space
/// and trim the ends. Case is preserved; matching lower-cases separately.
pub fn normalize(input: &str) -> Result<String> {
    let collapsed = input.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return Err(CueError::EmptyInput);
    }
    Ok(collapsed)
}
