use std::collections::HashSet;

use crate::utils::normalize_text;

/// Paragraphs shorter than this many characters are always kept; they are
/// assumed to be headers or short conversational turns.
pub const MIN_BLOCK_SIZE: usize = 200;

/// Remove repeated large paragraphs, keeping the first occurrence.
///
/// Paragraphs are blank-line-delimited blocks hashed on their
/// whitespace-normalized content with blake3, so the result is identical
/// across runs and processes.
pub fn deduplicate_blocks(text: &str, min_block_size: usize) -> String {
    let mut seen: HashSet<[u8; 32]> = HashSet::new();
    let mut kept: Vec<&str> = Vec::new();

    for para in text.split("\n\n") {
        if para.chars().count() < min_block_size {
            kept.push(para);
            continue;
        }
        let hash = *blake3::hash(normalize_text(para).as_bytes()).as_bytes();
        if seen.insert(hash) {
            kept.push(para);
        }
    }

    kept.join("\n\n")
}
