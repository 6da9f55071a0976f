//! Source file representation with line-start indexing for fast line/column lookup.

use crate::file_id::FileId;
use std::path::PathBuf;

/// A netlist source file loaded into the current STA invocation.
///
/// Stores the file's content along with precomputed line-start offsets for
/// efficient line/column resolution when the loader needs to point at the
/// identifier or expression that triggered a fatal error or warning.
pub struct SourceFile {
    /// The unique identifier for this file within the [`SourceDb`](crate::SourceDb).
    pub id: FileId,
    /// The filesystem path of this file (or a synthetic name for in-memory sources).
    pub path: PathBuf,
    /// The full text content of the file.
    pub content: String,
    /// Byte offsets of each line start (the first entry is always 0).
    line_starts: Vec<u32>,
}

impl SourceFile {
    /// Creates a new `SourceFile` with precomputed line starts.
    pub fn new(id: FileId, path: PathBuf, content: String) -> Self {
        let line_starts = compute_line_starts(&content);
        Self {
            id,
            path,
            content,
            line_starts,
        }
    }

    /// Converts a byte offset into 1-indexed (line, column) coordinates.
    ///
    /// Uses binary search on the precomputed line-start offsets for efficient lookup.
    pub fn line_col(&self, byte_offset: u32) -> (u32, u32) {
        let line_idx = match self.line_starts.binary_search(&byte_offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line = (line_idx as u32) + 1;
        let col = byte_offset - self.line_starts[line_idx] + 1;
        (line, col)
    }

    /// Returns a substring of the file content between byte offsets.
    pub fn snippet(&self, start: u32, end: u32) -> &str {
        &self.content[start as usize..end as usize]
    }
}

/// Computes the byte offsets of each line start in the given content.
fn compute_line_starts(content: &str) -> Vec<u32> {
    let mut starts = vec![0u32];
    for (i, byte) in content.bytes().enumerate() {
        if byte == b'\n' {
            starts.push((i + 1) as u32);
        }
    }
    starts
}
