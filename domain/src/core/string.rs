//! String utilities for the domain layer.

/// Truncate a string to a maximum length with ellipsis (UTF-8 safe)
///
/// Uses byte length for max_len but ensures truncation occurs at valid
/// UTF-8 character boundaries.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let target = max_len.saturating_sub(3);
        let mut end = target.min(s.len());
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}

/// Collapse runs of blank lines into single line breaks and trim the result.
///
/// Rendered context uses a blank line as the passage delimiter, so passage
/// text must never contain one.
pub fn collapse_blank_lines(s: &str) -> String {
    s.lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collect the bodies of fenced code blocks whose info string is one of `tags`.
///
/// An unterminated block at the end of `text` is discarded.
pub fn fenced_blocks(text: &str, tags: &[&str]) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Option<String> = None;

    for line in text.lines() {
        let trimmed = line.trim();
        match current.as_mut() {
            None => {
                if let Some(tag) = trimmed.strip_prefix("```")
                    && tags.iter().any(|t| t.eq_ignore_ascii_case(tag.trim()))
                {
                    current = Some(String::new());
                }
            }
            Some(_) if trimmed == "```" => {
                if let Some(block) = current.take() {
                    blocks.push(block);
                }
            }
            Some(block) => {
                block.push_str(line);
                block.push('\n');
            }
        }
    }

    blocks
}
