use regex::RegexBuilder;

/// Which part of a raw message an export keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractMode {
    /// Keep the message text unchanged.
    #[default]
    All,
    /// Keep only the inner content of the configured XML-like tags.
    Tags,
}

/// Immutable description of one extraction call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionSpec {
    /// Tag names in the order the user gave them; output preserves this order.
    pub tags: Vec<String>,
    pub separator: String,
    pub mode: ExtractMode,
}

impl ExtractionSpec {
    pub fn keep_all(separator: impl Into<String>) -> Self {
        Self {
            tags: Vec::new(),
            separator: separator.into(),
            mode: ExtractMode::All,
        }
    }

    pub fn tags_only(tags: Vec<String>, separator: impl Into<String>) -> Self {
        Self {
            tags,
            separator: separator.into(),
            mode: ExtractMode::Tags,
        }
    }
}

/// Splits raw user tag input on whitespace, commas and semicolons
/// (ASCII and CJK full-width variants), dropping empty entries.
pub fn parse_tag_input(raw: &str) -> Vec<String> {
    raw.split(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | '，' | '；'))
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Applies `spec` to `text`.
///
/// In `Tags` mode, each tag is matched as a case-insensitive XML-like element
/// `<tag ...>content</tag>`. Matching is non-greedy: the first closing tag
/// ends a match, so nested same-named tags are not special-cased. Results are
/// ordered tag-list first, document order second, with trimmed inner content;
/// empty matches are discarded.
pub fn extract(text: &str, spec: &ExtractionSpec) -> String {
    match spec.mode {
        ExtractMode::All => text.to_string(),
        ExtractMode::Tags => {
            if text.is_empty() || spec.tags.is_empty() {
                return String::new();
            }
            let mut parts: Vec<&str> = Vec::new();
            for tag in &spec.tags {
                let tag = tag.trim();
                if tag.is_empty() {
                    continue;
                }
                // Tag names are user input; escape before building the pattern.
                let escaped = regex::escape(tag);
                let pattern = format!(r"<\s*{escaped}(?:\s[^>]*)?>(.*?)<\s*/\s*{escaped}\s*>");
                let Ok(matcher) = RegexBuilder::new(&pattern)
                    .case_insensitive(true)
                    .dot_matches_new_line(true)
                    .build()
                else {
                    continue;
                };
                for captures in matcher.captures_iter(text) {
                    if let Some(inner) = captures.get(1) {
                        let content = inner.as_str().trim();
                        if !content.is_empty() {
                            parts.push(content);
                        }
                    }
                }
            }
            parts.join(&spec.separator)
        }
    }
}
