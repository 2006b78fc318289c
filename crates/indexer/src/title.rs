use once_cell::sync::Lazy;
use regex::Regex;

static H1_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^#[ \t]+(\S.*?)[ \t\r]*$").expect("valid H1 regex"));

/// Title of a Markdown document: the first `# ` heading, else the first
/// non-blank line. `None` for blank content.
pub fn extract_title(content: &str) -> Option<String> {
    if let Some(caps) = H1_LINE.captures(content) {
        return Some(caps[1].to_string());
    }

    content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}
