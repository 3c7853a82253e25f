//! Byte-level difference between a golden and a candidate image.

use serde::{Deserialize, Serialize};

/// Summary of how two byte sequences differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteDiff {
    /// Number of bytes in the golden file
    pub expected_len: usize,
    /// Number of bytes in the candidate image
    pub actual_len: usize,
    /// Offset of the first differing byte, `None` if one is a prefix of the other
    pub first_mismatch: Option<usize>,
    /// Differing bytes in the common prefix plus the length difference
    pub differing_bytes: usize,
}

impl ByteDiff {
    /// Compare two byte sequences exactly.
    ///
    /// Returns `None` when they are identical in length and content.
    pub fn between(expected: &[u8], actual: &[u8]) -> Option<Self> {
        if expected == actual {
            return None;
        }

        let mut first_mismatch = None;
        let mut differing_bytes = 0;
        for (i, (e, a)) in expected.iter().zip(actual).enumerate() {
            if e != a {
                first_mismatch.get_or_insert(i);
                differing_bytes += 1;
            }
        }
        differing_bytes += expected.len().abs_diff(actual.len());

        Some(Self {
            expected_len: expected.len(),
            actual_len: actual.len(),
            first_mismatch,
            differing_bytes,
        })
    }

    /// Whether the two sequences have different lengths.
    pub fn length_changed(&self) -> bool {
        self.expected_len != self.actual_len
    }

    /// Generate a human-readable summary.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if self.length_changed() {
            parts.push(format!(
                "length {} != {}",
                self.actual_len, self.expected_len
            ));
        }
        if let Some(offset) = self.first_mismatch {
            parts.push(format!("first difference at byte {offset}"));
        }
        parts.push(format!("{} bytes differ", self.differing_bytes));

        format!("Golden mismatch: {}", parts.join(", "))
    }
}
