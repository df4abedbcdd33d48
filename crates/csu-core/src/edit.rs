//! Byte-range source edits, applied atomically per group

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during edit application
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EditError {
    #[error("Overlapping edits detected at offset {0}")]
    OverlappingEdits(usize),

    #[error("Edit span {start}..{end} out of bounds for source length {len}")]
    SpanOutOfBounds { start: usize, end: usize, len: usize },
}

/// Represents a single code edit operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edit {
    /// Byte offset where the replaced range starts
    pub start: usize,
    /// Byte offset just past the replaced range
    pub end: usize,
    /// The replacement text
    pub replacement: String,
}

impl Edit {
    /// Replace `start..end` with `replacement`
    pub fn new(start: usize, end: usize, replacement: impl Into<String>) -> Self {
        Self {
            start,
            end,
            replacement: replacement.into(),
        }
    }

    /// Insert `text` before the byte at `at`
    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::new(at, at, text)
    }

    /// Remove `start..end`
    pub fn delete(start: usize, end: usize) -> Self {
        Self::new(start, end, "")
    }

    fn conflicts_with(&self, other: &Edit) -> bool {
        (self.start < other.end && other.start < self.end) || self.start == other.start
    }
}

/// Edits that belong to one fix and must be applied together or not at all
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditGroup {
    /// Human-readable description of the fix
    pub description: String,
    pub edits: Vec<Edit>,
}

impl EditGroup {
    pub fn new(description: impl Into<String>, edits: Vec<Edit>) -> Self {
        Self {
            description: description.into(),
            edits,
        }
    }

    /// A group holding a single edit
    pub fn single(description: impl Into<String>, edit: Edit) -> Self {
        Self::new(description, vec![edit])
    }

    fn start(&self) -> usize {
        self.edits.iter().map(|e| e.start).min().unwrap_or(0)
    }
}

/// Apply edits to source code
///
/// Edits are applied in reverse order (from end to start) to maintain
/// valid offsets throughout the process.
///
/// # Returns
/// * `Ok(String)` - The modified source code
/// * `Err(EditError)` - If edits overlap or are out of bounds
pub fn apply_edits(source: &str, edits: &[Edit]) -> Result<String, EditError> {
    if edits.is_empty() {
        return Ok(source.to_string());
    }

    // Sort edits by start position (descending) for safe replacement
    let mut sorted_edits: Vec<&Edit> = edits.iter().collect();
    sorted_edits.sort_by(|a, b| b.start.cmp(&a.start).then(b.end.cmp(&a.end)));

    // Validate: check for overlapping edits and bounds
    let mut prev_start: Option<usize> = None;

    for edit in &sorted_edits {
        check_bounds(source, edit)?;

        if let Some(prev) = prev_start {
            if edit.end > prev || edit.start == prev {
                return Err(EditError::OverlappingEdits(edit.start));
            }
        }

        prev_start = Some(edit.start);
    }

    let mut result = source.to_string();
    for edit in sorted_edits {
        result.replace_range(edit.start..edit.end, &edit.replacement);
    }

    Ok(result)
}

/// Apply fix groups atomically
///
/// Groups are taken in source order; a group that conflicts with an already
/// accepted group is skipped whole, so a fix is never half-applied. Returns
/// the new source and the number of groups applied.
pub fn apply_edit_groups(source: &str, groups: &[EditGroup]) -> Result<(String, usize), EditError> {
    let mut ordered: Vec<&EditGroup> = groups.iter().filter(|g| !g.edits.is_empty()).collect();
    ordered.sort_by_key(|g| g.start());

    let mut accepted: Vec<&Edit> = Vec::new();
    let mut applied = 0;

    for group in ordered {
        for edit in &group.edits {
            check_bounds(source, edit)?;
        }

        let conflicts = group
            .edits
            .iter()
            .any(|edit| accepted.iter().any(|taken| taken.conflicts_with(edit)));
        if conflicts {
            debug!(description = %group.description, "skipping conflicting fix");
            continue;
        }

        accepted.extend(group.edits.iter());
        applied += 1;
    }

    let edits: Vec<Edit> = accepted.into_iter().cloned().collect();
    let result = apply_edits(source, &edits)?;
    Ok((result, applied))
}

fn check_bounds(source: &str, edit: &Edit) -> Result<(), EditError> {
    let in_bounds = edit.start <= edit.end
        && edit.end <= source.len()
        && source.is_char_boundary(edit.start)
        && source.is_char_boundary(edit.end);
    if in_bounds {
        Ok(())
    } else {
        Err(EditError::SpanOutOfBounds {
            start: edit.start,
            end: edit.end,
            len: source.len(),
        })
    }
}
