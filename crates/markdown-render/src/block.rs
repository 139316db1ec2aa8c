//! Block segmentation: splits preprocessed lines into block-level units
//! using blank-line, marker and indentation rules. A line-oriented state
//! machine with small trackers for fences, quotes and lists; nesting is
//! bounded by the engine-wide depth guard.

use std::collections::HashMap;
use std::sync::LazyLock;

use markdown_render_config::ConversionOptions;
use regex::Regex;

use crate::error::{RenderError, MAX_NESTING_DEPTH};
use crate::line::{is_blank, split_indent, strip_indent};

/// A block-level unit of the document.
#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    Paragraph { lines: Vec<String> },
    Heading { level: u8, text: String },
    CodeBlock { language: Option<String>, code: String },
    BlockQuote { blocks: Vec<Block> },
    List(List),
    Table(Table),
    HtmlBlock { lines: Vec<String> },
    HorizontalRule,
}

#[derive(Clone, Debug, PartialEq)]
pub struct List {
    pub ordered: bool,
    /// Loose lists render item paragraphs inside `<p>`.
    pub loose: bool,
    pub items: Vec<ListItem>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ListItem {
    /// `Some(checked)` for task list items.
    pub task: Option<bool>,
    pub blocks: Vec<Block>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub alignments: Vec<Alignment>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Alignment {
    None,
    Left,
    Center,
    Right,
}

/// A collected link reference definition.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkDef {
    pub url: String,
    pub title: Option<String>,
}

/// Reference definitions keyed by lowercased id.
#[derive(Debug, Default)]
pub struct RefMap {
    defs: HashMap<String, LinkDef>,
}

impl RefMap {
    pub fn get(&self, id: &str) -> Option<&LinkDef> {
        self.defs.get(&id.to_lowercase())
    }

    pub fn insert(&mut self, id: &str, def: LinkDef) {
        // First definition wins, matching reference Markdown behavior.
        self.defs.entry(id.to_lowercase()).or_insert(def);
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

static REF_DEF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^ {0,3}\[([^\]]+)\]:[ \t]*<?([^\s>]+)>?(?:[ \t]+(?:"([^"]*)"|'([^']*)'|\(([^)]*)\)))?[ \t]*$"#,
    )
    .unwrap()
});

static TASK_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([ xX])\][ \t]+(.*)$").unwrap());

/// Pull link reference definitions out of the document, skipping fenced
/// code regions, and return them as a lookup map.
pub fn collect_reference_definitions(
    lines: &mut Vec<String>,
    fenced_code_enabled: bool,
) -> RefMap {
    let mut refs = RefMap::default();
    let mut fence: Option<Fence> = None;

    lines.retain(|line| {
        if let Some(open) = &fence {
            if is_fence_close(line, open) {
                fence = None;
            }
            return true;
        }
        if fenced_code_enabled {
            if let Some(open) = detect_fence_start(line) {
                fence = Some(open);
                return true;
            }
        }

        let Some(caps) = REF_DEF_RE.captures(line) else {
            return true;
        };
        let id = caps.get(1).unwrap().as_str();
        let url = caps.get(2).unwrap().as_str().to_string();
        let title = caps
            .get(3)
            .or_else(|| caps.get(4))
            .or_else(|| caps.get(5))
            .map(|m| m.as_str().to_string());
        refs.insert(id, LinkDef { url, title });
        false
    });

    refs
}

/// Parse a whole document into blocks.
pub fn parse_document(
    lines: &[String],
    options: &ConversionOptions,
) -> Result<Vec<Block>, RenderError> {
    parse_blocks(lines, options, 0)
}

fn parse_blocks(
    lines: &[String],
    options: &ConversionOptions,
    depth: usize,
) -> Result<Vec<Block>, RenderError> {
    if depth >= MAX_NESTING_DEPTH {
        return Err(RenderError::NestingTooDeep {
            limit: MAX_NESTING_DEPTH,
        });
    }

    let mut blocks = Vec::new();
    let mut paragraph: Vec<String> = Vec::new();
    let mut i = 0usize;

    macro_rules! flush_paragraph {
        () => {
            if !paragraph.is_empty() {
                blocks.push(Block::Paragraph {
                    lines: std::mem::take(&mut paragraph),
                });
            }
        };
    }

    while i < lines.len() {
        let line = &lines[i];

        if is_blank(line) {
            flush_paragraph!();
            i += 1;
            continue;
        }

        let (indent, rest) = split_indent(line);

        // Fenced code.
        if options.gh_code_blocks {
            if let Some(fence) = detect_fence_start(line) {
                flush_paragraph!();
                let mut j = i + 1;
                while j < lines.len() && !is_fence_close(&lines[j], &fence) {
                    j += 1;
                }
                let code = lines[i + 1..j].join("\n");
                blocks.push(Block::CodeBlock {
                    language: fence.language.clone(),
                    code,
                });
                i = if j < lines.len() { j + 1 } else { j };
                continue;
            }
        }

        // Setext heading closes a single pending paragraph line.
        if !paragraph.is_empty() {
            if let Some(level) = setext_underline_level(line) {
                if paragraph.len() == 1 {
                    let text = paragraph.pop().unwrap().trim().to_string();
                    blocks.push(Block::Heading { level, text });
                    i += 1;
                    continue;
                }
                flush_paragraph!();
                if is_horizontal_rule(line) {
                    blocks.push(Block::HorizontalRule);
                    i += 1;
                    continue;
                }
                paragraph.push(line.clone());
                i += 1;
                continue;
            }
        }

        // ATX heading.
        if let Some((level, text)) = detect_atx_heading(line, options) {
            flush_paragraph!();
            blocks.push(Block::Heading { level, text });
            i += 1;
            continue;
        }

        // Horizontal rule (checked before lists so `* * *` is not a list).
        if is_horizontal_rule(line) {
            flush_paragraph!();
            blocks.push(Block::HorizontalRule);
            i += 1;
            continue;
        }

        // Blockquote.
        if indent <= 3 && rest.starts_with('>') {
            flush_paragraph!();
            let (region, consumed) = collect_blockquote_region(&lines[i..], options);
            blocks.push(Block::BlockQuote {
                blocks: parse_blocks(&region, options, depth + 1)?,
            });
            i += consumed;
            continue;
        }

        // Table.
        if options.tables && paragraph.is_empty() && rest.contains('|') {
            if let Some((table, consumed)) = try_parse_table(&lines[i..]) {
                blocks.push(Block::Table(table));
                i += consumed;
                continue;
            }
        }

        // List.
        if indent <= 3 && detect_list_marker(rest).is_some() {
            flush_paragraph!();
            let (list, consumed) = parse_list(&lines[i..], options, depth)?;
            blocks.push(Block::List(list));
            i += consumed;
            continue;
        }

        // Raw HTML block.
        if paragraph.is_empty() && indent == 0 && is_html_block_start(rest) {
            let mut j = i;
            while j < lines.len() && !is_blank(&lines[j]) {
                j += 1;
            }
            blocks.push(Block::HtmlBlock {
                lines: lines[i..j].to_vec(),
            });
            i = j;
            continue;
        }

        // Indented code.
        if paragraph.is_empty() && indent >= 4 {
            let (code, consumed) = collect_indented_code(&lines[i..]);
            blocks.push(Block::CodeBlock {
                language: None,
                code,
            });
            i += consumed;
            continue;
        }

        paragraph.push(line.clone());
        i += 1;
    }

    flush_paragraph!();
    Ok(blocks)
}

#[derive(Clone, Debug)]
struct Fence {
    ch: char,
    len: usize,
    language: Option<String>,
}

fn detect_fence_start(line: &str) -> Option<Fence> {
    let (indent, rest) = split_indent(line);
    if indent > 3 {
        return None;
    }

    let ch = rest.chars().next()?;
    if ch != '`' && ch != '~' {
        return None;
    }

    let len = rest.chars().take_while(|c| *c == ch).count();
    if len < 3 {
        return None;
    }

    let info = rest[len..].trim();
    if ch == '`' && info.contains('`') {
        return None;
    }

    let language = info
        .split_whitespace()
        .next()
        .map(str::to_string)
        .filter(|lang| !lang.is_empty());

    Some(Fence { ch, len, language })
}

fn is_fence_close(line: &str, fence: &Fence) -> bool {
    let (indent, rest) = split_indent(line);
    if indent > 3 {
        return false;
    }

    let trimmed = rest.trim_end();
    !trimmed.is_empty()
        && trimmed.chars().all(|c| c == fence.ch)
        && trimmed.len() >= fence.len
}

fn detect_atx_heading(line: &str, options: &ConversionOptions) -> Option<(u8, String)> {
    let (indent, rest) = split_indent(line);
    if indent > 3 {
        return None;
    }

    let level = rest.chars().take_while(|c| *c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }

    let after = &rest[level..];
    if options.require_space_before_heading_text
        && !after.starts_with(' ')
        && !after.starts_with('\t')
    {
        return None;
    }

    let mut content = after.trim();
    // Strip a trailing run of closing hashes when whitespace-separated.
    let stripped = content.trim_end_matches('#');
    if stripped.len() < content.len() && stripped.ends_with(char::is_whitespace) {
        content = stripped.trim_end();
    }

    if content.is_empty() {
        return None;
    }

    Some((level as u8, content.to_string()))
}

fn setext_underline_level(line: &str) -> Option<u8> {
    let (indent, rest) = split_indent(line);
    if indent > 3 {
        return None;
    }

    let trimmed = rest.trim_end();
    if trimmed.len() < 3 {
        return None;
    }

    if trimmed.chars().all(|c| c == '=') {
        Some(1)
    } else if trimmed.chars().all(|c| c == '-') {
        Some(2)
    } else {
        None
    }
}

fn is_horizontal_rule(line: &str) -> bool {
    let (indent, rest) = split_indent(line);
    if indent > 3 {
        return false;
    }

    let mut marker = None;
    let mut count = 0usize;
    for ch in rest.trim_end().chars() {
        match ch {
            ' ' => continue,
            '*' | '-' | '_' => {
                if marker.get_or_insert(ch) != &ch {
                    return false;
                }
                count += 1;
            }
            _ => return false,
        }
    }
    count >= 3
}

struct ListMarker<'a> {
    ordered: bool,
    content: &'a str,
}

fn detect_list_marker(rest: &str) -> Option<ListMarker<'_>> {
    let first = rest.chars().next()?;

    if matches!(first, '*' | '+' | '-') {
        let after = &rest[1..];
        if after.starts_with(' ') {
            return Some(ListMarker {
                ordered: false,
                content: after.trim_start_matches(' '),
            });
        }
        return None;
    }

    if first.is_ascii_digit() {
        let digits = rest.chars().take_while(char::is_ascii_digit).count();
        let after = &rest[digits..];
        if let Some(tail) = after.strip_prefix('.') {
            if tail.starts_with(' ') {
                return Some(ListMarker {
                    ordered: true,
                    content: tail.trim_start_matches(' '),
                });
            }
        }
    }

    None
}

fn collect_blockquote_region(
    lines: &[String],
    options: &ConversionOptions,
) -> (Vec<String>, usize) {
    let mut region = Vec::new();
    let mut j = 0usize;

    while j < lines.len() {
        let line = &lines[j];
        let (indent, rest) = split_indent(line);

        if indent <= 3 && rest.starts_with('>') {
            region.push(strip_quote_marker(rest).to_string());
            j += 1;
            continue;
        }

        if is_blank(line) {
            if options.split_adjacent_blockquotes {
                break;
            }
            // Merge across blank lines when another quoted region follows.
            let mut k = j + 1;
            while k < lines.len() && is_blank(&lines[k]) {
                k += 1;
            }
            let continues = k < lines.len() && {
                let (next_indent, next_rest) = split_indent(&lines[k]);
                next_indent <= 3 && next_rest.starts_with('>')
            };
            if !continues {
                break;
            }
            for _ in j..k {
                region.push(String::new());
            }
            j = k;
            continue;
        }

        // Lazy continuation of the previous quoted paragraph line.
        if region.last().is_some_and(|prev| !is_blank(prev)) {
            region.push(line.clone());
            j += 1;
            continue;
        }

        break;
    }

    (region, j)
}

fn strip_quote_marker(rest: &str) -> &str {
    let after = &rest[1..];
    after.strip_prefix(' ').unwrap_or(after)
}

fn parse_list(
    lines: &[String],
    options: &ConversionOptions,
    depth: usize,
) -> Result<(List, usize), RenderError> {
    let (_, first_rest) = split_indent(&lines[0]);
    let ordered = detect_list_marker(first_rest)
        .expect("caller detected a list marker")
        .ordered;

    let sibling_max = if options.disable_forced_4_spaces_indented_sublists {
        1
    } else {
        3
    };

    let mut raw_items: Vec<Vec<String>> = Vec::new();
    let mut loose = false;
    let mut pending_blanks = 0usize;
    let mut j = 0usize;

    while j < lines.len() {
        let line = &lines[j];

        if is_blank(line) {
            pending_blanks += 1;
            j += 1;
            continue;
        }

        let (indent, rest) = split_indent(line);
        let marker = detect_list_marker(rest);

        if let Some(marker) = &marker {
            if indent <= sibling_max && !is_horizontal_rule(line) {
                if marker.ordered != ordered {
                    break;
                }
                if pending_blanks > 0 && !raw_items.is_empty() {
                    loose = true;
                }
                pending_blanks = 0;
                raw_items.push(vec![marker.content.to_string()]);
                j += 1;
                continue;
            }
        }

        let Some(item) = raw_items.last_mut() else {
            break;
        };

        // Continuation: nested markers always belong to the item; plain
        // text does unless a blank line demoted it to 4-space territory.
        let continues = if marker.is_some() {
            true
        } else if pending_blanks == 0 {
            true
        } else {
            indent >= 4
        };
        if !continues {
            break;
        }

        if pending_blanks > 0 {
            loose = true;
            for _ in 0..pending_blanks {
                item.push(String::new());
            }
            pending_blanks = 0;
        }
        item.push(strip_indent(line, 4).to_string());
        j += 1;
    }

    let consumed = j - pending_blanks;

    let mut items = Vec::with_capacity(raw_items.len());
    for mut item_lines in raw_items {
        let task = if options.tasklists {
            let parsed = TASK_ITEM_RE.captures(&item_lines[0]).map(|caps| {
                let checked = !caps.get(1).unwrap().as_str().trim().is_empty();
                (checked, caps.get(2).unwrap().as_str().to_string())
            });
            parsed.map(|(checked, text)| {
                item_lines[0] = text;
                checked
            })
        } else {
            None
        };

        items.push(ListItem {
            task,
            blocks: parse_blocks(&item_lines, options, depth + 1)?,
        });
    }

    Ok((
        List {
            ordered,
            loose,
            items,
        },
        consumed,
    ))
}

fn try_parse_table(lines: &[String]) -> Option<(Table, usize)> {
    if lines.len() < 2 {
        return None;
    }

    let delimiter = &lines[1];
    if !is_table_delimiter(delimiter) {
        return None;
    }

    let headers = split_table_row(&lines[0]);
    let delim_cells = split_table_row(delimiter);
    if headers.is_empty() || headers.len() != delim_cells.len() {
        return None;
    }

    let mut alignments = Vec::with_capacity(delim_cells.len());
    for cell in &delim_cells {
        alignments.push(parse_alignment(cell)?);
    }

    let mut rows = Vec::new();
    let mut j = 2usize;
    while j < lines.len() && !is_blank(&lines[j]) && lines[j].contains('|') {
        let mut cells = split_table_row(&lines[j]);
        cells.resize(headers.len(), String::new());
        rows.push(cells);
        j += 1;
    }

    Some((
        Table {
            headers,
            alignments,
            rows,
        },
        j,
    ))
}

fn is_table_delimiter(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty()
        && trimmed.contains('-')
        && trimmed.chars().all(|c| matches!(c, '|' | '-' | ':' | ' '))
}

fn parse_alignment(cell: &str) -> Option<Alignment> {
    let cell = cell.trim();
    let dashes: &str = cell.trim_start_matches(':').trim_end_matches(':');
    if dashes.is_empty() || !dashes.chars().all(|c| c == '-') {
        return None;
    }

    Some(match (cell.starts_with(':'), cell.ends_with(':')) {
        (true, true) => Alignment::Center,
        (true, false) => Alignment::Left,
        (false, true) => Alignment::Right,
        (false, false) => Alignment::None,
    })
}

/// Split a table row into trimmed cells, honoring `\|` escapes.
fn split_table_row(line: &str) -> Vec<String> {
    let mut trimmed = line.trim();
    trimmed = trimmed.strip_prefix('|').unwrap_or(trimmed);
    trimmed = trimmed.strip_suffix('|').unwrap_or(trimmed);

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = trimmed.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                if let Some(next) = chars.next() {
                    if next == '|' {
                        current.push('|');
                    } else {
                        current.push('\\');
                        current.push(next);
                    }
                } else {
                    current.push('\\');
                }
            }
            '|' => cells.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    cells.push(current);

    cells.into_iter().map(|cell| cell.trim().to_string()).collect()
}

const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "audio",
    "blockquote",
    "dd",
    "details",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "iframe",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "script",
    "section",
    "style",
    "table",
    "tbody",
    "td",
    "th",
    "thead",
    "tr",
    "ul",
    "video",
];

static HTML_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^</?([A-Za-z][A-Za-z0-9-]*)").unwrap());

fn is_html_block_start(rest: &str) -> bool {
    if rest.starts_with("<!--") {
        return true;
    }

    HTML_BLOCK_RE
        .captures(rest)
        .is_some_and(|caps| BLOCK_TAGS.contains(&caps[1].to_lowercase().as_str()))
}

fn collect_indented_code(lines: &[String]) -> (String, usize) {
    let mut content: Vec<&str> = Vec::new();
    let mut pending_blanks = 0usize;
    let mut j = 0usize;

    while j < lines.len() {
        let line = &lines[j];
        if is_blank(line) {
            pending_blanks += 1;
            j += 1;
            continue;
        }
        if crate::line::leading_indent_width(line) < 4 {
            break;
        }
        for _ in 0..pending_blanks {
            content.push("");
        }
        pending_blanks = 0;
        content.push(strip_indent(line, 4));
        j += 1;
    }

    (content.join("\n"), j - pending_blanks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::split_lines;

    fn defaults() -> ConversionOptions {
        ConversionOptions::default()
    }

    fn parse(doc: &str, options: &ConversionOptions) -> Vec<Block> {
        parse_document(&split_lines(doc), options).unwrap()
    }

    #[test]
    fn parses_atx_headings_with_trailing_hashes() {
        let blocks = parse("## Heading ##", &defaults());
        assert_eq!(
            blocks,
            vec![Block::Heading {
                level: 2,
                text: "Heading".to_string()
            }]
        );
    }

    #[test]
    fn space_requirement_demotes_tight_headings() {
        let options = ConversionOptions {
            require_space_before_heading_text: true,
            ..defaults()
        };
        let blocks = parse("#5 bolt", &options);
        assert!(matches!(blocks[0], Block::Paragraph { .. }));

        // Without the option the same line is a heading.
        let blocks = parse("#5 bolt", &defaults());
        assert!(matches!(blocks[0], Block::Heading { level: 1, .. }));
    }

    #[test]
    fn parses_setext_headings() {
        let blocks = parse("Title\n=====\n\nSub\n---", &defaults());
        assert_eq!(
            blocks,
            vec![
                Block::Heading {
                    level: 1,
                    text: "Title".to_string()
                },
                Block::Heading {
                    level: 2,
                    text: "Sub".to_string()
                },
            ]
        );
    }

    #[test]
    fn fenced_code_keeps_content_verbatim() {
        let blocks = parse("```rust\nfn main() {}\n```", &defaults());
        assert_eq!(
            blocks,
            vec![Block::CodeBlock {
                language: Some("rust".to_string()),
                code: "fn main() {}".to_string()
            }]
        );
    }

    #[test]
    fn fences_are_plain_text_when_gh_code_blocks_is_off() {
        let options = ConversionOptions {
            gh_code_blocks: false,
            ..defaults()
        };
        let blocks = parse("```\ncode\n```", &options);
        assert!(matches!(blocks[0], Block::Paragraph { .. }));
    }

    #[test]
    fn indented_code_strips_four_spaces() {
        let blocks = parse("    let x = 1;\n    let y = 2;", &defaults());
        assert_eq!(
            blocks,
            vec![Block::CodeBlock {
                language: None,
                code: "let x = 1;\nlet y = 2;".to_string()
            }]
        );
    }

    #[test]
    fn adjacent_blockquotes_merge_by_default() {
        let blocks = parse("> a\n\n> b", &defaults());
        assert_eq!(blocks.len(), 1);
        let Block::BlockQuote { blocks: inner } = &blocks[0] else {
            panic!("expected blockquote");
        };
        assert_eq!(inner.len(), 2);
    }

    #[test]
    fn adjacent_blockquotes_split_when_asked() {
        let options = ConversionOptions {
            split_adjacent_blockquotes: true,
            ..defaults()
        };
        let blocks = parse("> a\n\n> b", &options);
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn four_space_rule_keeps_shallow_sublists_as_siblings() {
        let blocks = parse("- a\n  - b", &defaults());
        let Block::List(list) = &blocks[0] else {
            panic!("expected list");
        };
        assert_eq!(list.items.len(), 2);
    }

    #[test]
    fn two_space_sublists_nest_when_forced_indentation_is_disabled() {
        let options = ConversionOptions {
            disable_forced_4_spaces_indented_sublists: true,
            ..defaults()
        };
        let blocks = parse("- a\n  - b", &options);
        let Block::List(list) = &blocks[0] else {
            panic!("expected list");
        };
        assert_eq!(list.items.len(), 1);
        assert!(list.items[0]
            .blocks
            .iter()
            .any(|block| matches!(block, Block::List(_))));
    }

    #[test]
    fn four_space_sublists_always_nest() {
        let blocks = parse("- a\n    - b", &defaults());
        let Block::List(list) = &blocks[0] else {
            panic!("expected list");
        };
        assert_eq!(list.items.len(), 1);
    }

    #[test]
    fn blank_separated_items_make_a_loose_list() {
        let blocks = parse("- a\n\n- b", &defaults());
        let Block::List(list) = &blocks[0] else {
            panic!("expected list");
        };
        assert!(list.loose);
        assert_eq!(list.items.len(), 2);
    }

    #[test]
    fn task_markers_are_captured_when_enabled() {
        let options = ConversionOptions {
            tasklists: true,
            ..defaults()
        };
        let blocks = parse("- [x] done\n- [ ] todo", &options);
        let Block::List(list) = &blocks[0] else {
            panic!("expected list");
        };
        assert_eq!(list.items[0].task, Some(true));
        assert_eq!(list.items[1].task, Some(false));
    }

    #[test]
    fn tables_require_the_option() {
        let doc = "| a | b |\n| --- | --- |\n| 1 | 2 |";
        assert!(matches!(parse(doc, &defaults())[0], Block::Paragraph { .. }));

        let options = ConversionOptions {
            tables: true,
            ..defaults()
        };
        let Block::Table(table) = &parse(doc, &options)[0] else {
            panic!("expected table");
        };
        assert_eq!(table.headers, vec!["a", "b"]);
        assert_eq!(table.rows, vec![vec!["1", "2"]]);
    }

    #[test]
    fn table_alignments_come_from_colons() {
        let options = ConversionOptions {
            tables: true,
            ..defaults()
        };
        let doc = "| a | b | c | d |\n|:--|:-:|--:|---|\n| 1 | 2 | 3 | 4 |";
        let Block::Table(table) = &parse(doc, &options)[0] else {
            panic!("expected table");
        };
        assert_eq!(
            table.alignments,
            vec![
                Alignment::Left,
                Alignment::Center,
                Alignment::Right,
                Alignment::None
            ]
        );
    }

    #[test]
    fn horizontal_rules_beat_list_markers() {
        let blocks = parse("* * *", &defaults());
        assert_eq!(blocks, vec![Block::HorizontalRule]);
    }

    #[test]
    fn reference_definitions_are_collected_and_removed() {
        let mut lines = split_lines("[one]: https://example.com \"Example\"\ntext");
        let refs = collect_reference_definitions(&mut lines, true);
        assert_eq!(refs.len(), 1);
        let def = refs.get("ONE").expect("case-insensitive lookup");
        assert_eq!(def.url, "https://example.com");
        assert_eq!(def.title.as_deref(), Some("Example"));
        assert_eq!(lines, vec!["text"]);
    }

    #[test]
    fn reference_definitions_inside_fences_stay_put() {
        let mut lines = split_lines("```\n[one]: https://example.com\n```");
        let refs = collect_reference_definitions(&mut lines, true);
        assert!(refs.is_empty());
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn deep_nesting_is_rejected() {
        let doc = ">".repeat(40) + " too deep";
        let err = parse_document(&split_lines(&doc), &defaults()).unwrap_err();
        assert_eq!(err, RenderError::NestingTooDeep { limit: 32 });
    }
}
