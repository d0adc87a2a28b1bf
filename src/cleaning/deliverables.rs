/// Default header patterns opening a deliverable section, matched as
/// case-insensitive substrings.
pub const DEFAULT_PATTERNS: [&str; 7] =
    ["##", "constraint", "draft", "decision", "output", "result", "deliverable"];

/// Keep only deliverable sections: a line matching any pattern opens a
/// section; following non-blank lines belong to it; a blank line after at
/// least one content line closes it. Everything outside matched sections is
/// dropped. An empty pattern list selects the defaults.
pub fn extract_deliverables(text: &str, patterns: &[String]) -> String {
    let patterns: Vec<String> = if patterns.is_empty() {
        DEFAULT_PATTERNS.iter().map(|p| p.to_string()).collect()
    } else {
        patterns.iter().map(|p| p.to_lowercase()).collect()
    };

    let mut deliverables: Vec<&str> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut in_section = false;

    for line in text.split('\n') {
        let line_lower = line.to_lowercase();
        let opens_section = patterns.iter().any(|p| line_lower.contains(p));

        if opens_section {
            deliverables.append(&mut current);
            in_section = true;
            current.push(line);
        } else if in_section {
            if !line.trim().is_empty() {
                current.push(line);
            } else if current.len() > 1 {
                deliverables.append(&mut current);
                in_section = false;
            }
        }
    }
    deliverables.append(&mut current);

    deliverables.join("\n")
}
