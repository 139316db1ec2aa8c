//! Front-matter extraction.
//!
//! A document may open with a `---` fence holding `key: value` pairs. The
//! fence is consumed before block parsing; the pairs surface on the render
//! result and feed the `<head>` of complete-document output.

use std::collections::BTreeMap;

/// Consume a leading front-matter fence, returning its key/value pairs.
///
/// The fence must start on the first line and close with `---` or `...`;
/// an unterminated fence is left in place and parsed as ordinary Markdown.
pub fn extract(lines: &mut Vec<String>) -> BTreeMap<String, String> {
    let mut pairs = BTreeMap::new();

    if lines.first().map(|line| line.trim()) != Some("---") {
        return pairs;
    }

    let close = lines
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, line)| {
            let trimmed = line.trim();
            trimmed == "---" || trimmed == "..."
        })
        .map(|(idx, _)| idx);

    let Some(close) = close else {
        return pairs;
    };

    for line in &lines[1..close] {
        if let Some((key, value)) = line.split_once(':') {
            let key = key.trim();
            if !key.is_empty() {
                pairs.insert(key.to_string(), value.trim().to_string());
            }
        }
    }

    lines.drain(..=close);
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(doc: &str) -> Vec<String> {
        doc.split('\n').map(str::to_string).collect()
    }

    #[test]
    fn extracts_leading_front_matter() {
        let mut doc = lines("---\ntitle: My Doc\nlang: en\n---\n# Hello");

        let pairs = extract(&mut doc);

        assert_eq!(pairs.get("title").map(String::as_str), Some("My Doc"));
        assert_eq!(pairs.get("lang").map(String::as_str), Some("en"));
        assert_eq!(doc, vec!["# Hello"]);
    }

    #[test]
    fn leaves_unterminated_fence_alone() {
        let mut doc = lines("---\ntitle: My Doc");
        let pairs = extract(&mut doc);
        assert!(pairs.is_empty());
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn ignores_documents_without_front_matter() {
        let mut doc = lines("# Hello\n---");
        let pairs = extract(&mut doc);
        assert!(pairs.is_empty());
        assert_eq!(doc.len(), 2);
    }
}
