use crate::model::{HeadingEntry, HeadingLevel};
use crate::outline::classifier::Candidate;

/// Repairs the level sequence and collapses immediate repeats.
///
/// The state machine tracks the deepest level the document has earned so
/// far: a candidate may never sit more than one step below it, so a jump
/// like H1 -> H3 is clamped to H1 -> H2. Stepping back up is always
/// allowed. Candidates arrive in document order and leave in document
/// order.
pub fn validate(candidates: &[Candidate]) -> Vec<HeadingEntry> {
    let mut entries: Vec<HeadingEntry> = Vec::new();
    let mut expected_depth: u8 = 1;

    for candidate in candidates {
        let depth = candidate.level.depth().min(expected_depth);
        expected_depth = (depth + 1).min(3);

        let entry = HeadingEntry {
            level: HeadingLevel::from_depth(depth),
            text: candidate.line.text.clone(),
            page: candidate.line.page,
        };

        // Immediate repeats are extraction noise; the same heading
        // recurring later (a running chapter title) is kept.
        if entries.last() == Some(&entry) {
            continue;
        }
        entries.push(entry);
    }

    entries
}
