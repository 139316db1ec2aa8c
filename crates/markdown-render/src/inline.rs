//! Inline transformation: text-level substitutions applied within block
//! content. A single left-to-right scanner with fixed precedence — escapes,
//! code spans, angle constructs, images/links, emphasis, autolinks,
//! mentions, emoji, line breaks — each gated by its option.

use std::sync::LazyLock;

use markdown_render_config::ConversionOptions;
use regex::Regex;

use crate::block::RefMap;
use crate::emoji;
use crate::error::{RenderError, MAX_NESTING_DEPTH};

/// Characters a backslash always escapes.
const ESCAPABLE: &str = "\\`*_{}[]()>#+-.!~|:@";

static ANGLE_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<([A-Za-z][A-Za-z0-9+.-]*://[^<>\s]+)>").unwrap());

static ANGLE_EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<([^<>\s@]+@[^<>\s@]+\.[^<>\s@]+)>").unwrap());

static RAW_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^</?[A-Za-z][A-Za-z0-9-]*(?:\s[^<>]*)?/?>").unwrap());

static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^&(?:[A-Za-z][A-Za-z0-9]{1,31}|#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6});").unwrap()
});

static EMOJI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:([A-Za-z0-9_+-]+):").unwrap());

static MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@([A-Za-z0-9][A-Za-z0-9-]*)").unwrap());

static BARE_EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());

static IMG_DIMENSIONS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^=(\d+|\*)x(\d+|\*)$").unwrap());

/// Renders inline Markdown within one block, under one option set.
pub struct InlineRenderer<'a> {
    options: &'a ConversionOptions,
    refs: &'a RefMap,
}

impl<'a> InlineRenderer<'a> {
    pub fn new(options: &'a ConversionOptions, refs: &'a RefMap) -> Self {
        Self { options, refs }
    }

    pub fn render(&self, text: &str) -> Result<String, RenderError> {
        self.render_depth(text, 0)
    }

    fn render_depth(&self, text: &str, depth: usize) -> Result<String, RenderError> {
        if depth >= MAX_NESTING_DEPTH {
            return Err(RenderError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
            });
        }

        let mut out = String::with_capacity(text.len() + 16);
        let mut i = 0usize;

        while i < text.len() {
            let rest = &text[i..];
            let ch = rest.chars().next().expect("index is on a char boundary");

            let consumed = match ch {
                '\\' => self.emit_escape(rest, &mut out),
                '`' => self.emit_code_span(rest, &mut out),
                '<' => self.emit_angle(rest, &mut out),
                '&' => emit_entity(rest, &mut out),
                '!' if rest[1..].starts_with('[') => self.emit_image(rest, &mut out),
                '[' => self.emit_link(rest, &mut out, depth)?,
                '*' | '_' => self.emit_emphasis(text, i, ch, &mut out, depth)?,
                '~' => self.emit_strikethrough(rest, &mut out, depth)?,
                ':' => self.emit_emoji(rest, &mut out),
                '@' => self.emit_mention(text, i, &mut out),
                '\n' => self.emit_line_break(&mut out),
                _ => self.emit_text(text, i, ch, &mut out),
            };

            debug_assert!(consumed > 0);
            i += consumed;
        }

        Ok(out)
    }

    fn emit_escape(&self, rest: &str, out: &mut String) -> usize {
        let Some(next) = rest[1..].chars().next() else {
            out.push('\\');
            return 1;
        };

        if ESCAPABLE.contains(next) {
            out.push(next);
            1 + next.len_utf8()
        } else if next == '<' && self.options.backslash_escapes_html_tags {
            out.push_str("&lt;");
            2
        } else {
            out.push('\\');
            1
        }
    }

    fn emit_code_span(&self, rest: &str, out: &mut String) -> usize {
        let delim_len = rest.chars().take_while(|c| *c == '`').count();
        let delim = &rest[..delim_len];
        let body = &rest[delim_len..];

        match body.find(delim) {
            Some(end) => {
                let content = body[..end].trim();
                out.push_str("<code>");
                out.push_str(&escape_code(content));
                out.push_str("</code>");
                delim_len + end + delim_len
            }
            None => {
                out.push_str(delim);
                delim_len
            }
        }
    }

    fn emit_angle(&self, rest: &str, out: &mut String) -> usize {
        if rest.starts_with("<!--") {
            if let Some(end) = rest.find("-->") {
                out.push_str(&rest[..end + 3]);
                return end + 3;
            }
        }

        if let Some(caps) = ANGLE_URL_RE.captures(rest) {
            let url = caps.get(1).unwrap().as_str();
            out.push_str(&self.anchor_open(url, None));
            out.push_str(&escape_code(url));
            out.push_str("</a>");
            return caps.get(0).unwrap().len();
        }

        if let Some(caps) = ANGLE_EMAIL_RE.captures(rest) {
            let address = caps.get(1).unwrap().as_str();
            out.push_str(&self.email_link(address));
            return caps.get(0).unwrap().len();
        }

        if let Some(m) = RAW_TAG_RE.find(rest) {
            out.push_str(m.as_str());
            return m.len();
        }

        out.push_str("&lt;");
        1
    }

    fn emit_image(&self, rest: &str, out: &mut String) -> usize {
        let Some((alt, after_text)) = parse_bracketed(&rest[1..]) else {
            out.push('!');
            return 1;
        };
        let after = &rest[1 + after_text..];

        if after.starts_with('(') {
            if let Some(dest) = self.parse_destination(after) {
                out.push_str(&self.image_tag(alt, &dest));
                return 1 + after_text + dest.consumed;
            }
        } else if let Some(def) = self.lookup_reference(after, alt) {
            let dest = Destination {
                url: def.0,
                title: def.1,
                dimensions: None,
                consumed: def.2,
            };
            out.push_str(&self.image_tag(alt, &dest));
            return 1 + after_text + dest.consumed;
        }

        out.push('!');
        1
    }

    fn emit_link(
        &self,
        rest: &str,
        out: &mut String,
        depth: usize,
    ) -> Result<usize, RenderError> {
        let Some((text, after_text)) = parse_bracketed(rest) else {
            out.push('[');
            return Ok(1);
        };
        let after = &rest[after_text..];

        if after.starts_with('(') {
            if let Some(dest) = self.parse_destination(after) {
                out.push_str(&self.anchor_open(&dest.url, dest.title.as_deref()));
                out.push_str(&self.render_depth(text, depth + 1)?);
                out.push_str("</a>");
                return Ok(after_text + dest.consumed);
            }
        } else if let Some((url, title, consumed)) = self.lookup_reference(after, text) {
            out.push_str(&self.anchor_open(&url, title.as_deref()));
            out.push_str(&self.render_depth(text, depth + 1)?);
            out.push_str("</a>");
            return Ok(after_text + consumed);
        }

        out.push('[');
        Ok(1)
    }

    /// Resolve `[id]` or shortcut reference syntax following link text.
    /// Returns the definition plus the extra bytes consumed after the text.
    fn lookup_reference(&self, after: &str, text: &str) -> Option<(String, Option<String>, usize)> {
        if after.starts_with('[') {
            let (id, consumed) = parse_bracketed(after)?;
            let id = if id.is_empty() { text } else { id };
            let def = self.refs.get(id)?;
            return Some((def.url.clone(), def.title.clone(), consumed));
        }

        let def = self.refs.get(text)?;
        Some((def.url.clone(), def.title.clone(), 0))
    }

    fn emit_emphasis(
        &self,
        text: &str,
        i: usize,
        ch: char,
        out: &mut String,
        depth: usize,
    ) -> Result<usize, RenderError> {
        let rest = &text[i..];
        let run = rest.chars().take_while(|c| *c == ch).count();

        if ch == '_' {
            if self.options.underline {
                return self.emit_underline(rest, run, out, depth);
            }
            if self.options.literal_mid_word_underscores
                && prev_char(text, i).is_some_and(char::is_alphanumeric)
                && rest[run..].chars().next().is_some_and(char::is_alphanumeric)
            {
                out.push_str(&rest[..run]);
                return Ok(run);
            }
        }

        // The opening run must touch its content.
        if !rest[run..].chars().next().is_some_and(|c| !c.is_whitespace()) {
            out.push_str(&rest[..run]);
            return Ok(run);
        }

        for width in (1..=run.min(3)).rev() {
            let delim = &rest[..width];
            let body = &rest[run..];
            let Some(end) = self.find_closing(body, delim, ch) else {
                continue;
            };

            let inner = self.render_depth(&body[..end], depth + 1)?;
            let (open, close) = match width {
                3 => ("<strong><em>", "</em></strong>"),
                2 => ("<strong>", "</strong>"),
                _ => ("<em>", "</em>"),
            };

            // Extra delimiters beyond the matched width stay literal.
            out.push_str(&rest[..run - width]);
            out.push_str(open);
            out.push_str(&inner);
            out.push_str(close);
            return Ok(run + end + width);
        }

        out.push_str(&rest[..run]);
        Ok(run)
    }

    fn emit_underline(
        &self,
        rest: &str,
        run: usize,
        out: &mut String,
        depth: usize,
    ) -> Result<usize, RenderError> {
        if run >= 2 {
            let width = run.min(3);
            let delim = &rest[..width];
            let body = &rest[run..];
            if let Some(end) = self.find_closing(body, delim, '_') {
                let inner = self.render_depth(&body[..end], depth + 1)?;
                out.push_str(&rest[..run - width]);
                out.push_str("<u>");
                out.push_str(&inner);
                out.push_str("</u>");
                return Ok(run + end + width);
            }
        }

        out.push_str(&rest[..run]);
        Ok(run)
    }

    /// Find a closing delimiter run preceded by non-whitespace.
    fn find_closing(&self, body: &str, delim: &str, ch: char) -> Option<usize> {
        let mut search_from = 0usize;
        while let Some(pos) = body[search_from..].find(delim) {
            let at = search_from + pos;
            let valid_before = at > 0
                && body[..at]
                    .chars()
                    .next_back()
                    .is_some_and(|c| !c.is_whitespace());
            let after = body[at + delim.len()..].chars().next();
            let valid_after = if ch == '_' && self.options.literal_mid_word_underscores {
                !after.is_some_and(char::is_alphanumeric)
            } else {
                true
            };

            if valid_before && valid_after {
                return Some(at);
            }

            search_from = at + delim.len();
        }
        None
    }

    fn emit_strikethrough(
        &self,
        rest: &str,
        out: &mut String,
        depth: usize,
    ) -> Result<usize, RenderError> {
        if self.options.strikethrough && rest.starts_with("~~") {
            if let Some(end) = self.find_closing(&rest[2..], "~~", '~') {
                let inner = self.render_depth(&rest[2..2 + end], depth + 1)?;
                out.push_str("<del>");
                out.push_str(&inner);
                out.push_str("</del>");
                return Ok(2 + end + 2);
            }
        }

        out.push('~');
        Ok(1)
    }

    fn emit_emoji(&self, rest: &str, out: &mut String) -> usize {
        if self.options.emoji {
            if let Some(caps) = EMOJI_RE.captures(rest) {
                if let Some(replacement) = emoji::lookup(caps.get(1).unwrap().as_str()) {
                    out.push_str(replacement);
                    return caps.get(0).unwrap().len();
                }
            }
        }

        out.push(':');
        1
    }

    fn emit_mention(&self, text: &str, i: usize, out: &mut String) -> usize {
        let rest = &text[i..];
        if self.options.gh_mentions && at_word_boundary(text, i) {
            if let Some(caps) = MENTION_RE.captures(rest) {
                let username = caps.get(1).unwrap().as_str();
                let url = self.options.gh_mentions_link.replace("{u}", username);
                out.push_str(&self.anchor_open(&url, None));
                out.push('@');
                out.push_str(username);
                out.push_str("</a>");
                return caps.get(0).unwrap().len();
            }
        }

        out.push('@');
        1
    }

    fn emit_line_break(&self, out: &mut String) -> usize {
        let hard = out.ends_with("  ");
        while out.ends_with(' ') {
            out.pop();
        }

        if hard || self.options.simple_line_breaks {
            out.push_str("<br />\n");
        } else {
            out.push('\n');
        }
        1
    }

    fn emit_text(&self, text: &str, i: usize, ch: char, out: &mut String) -> usize {
        let rest = &text[i..];

        if self.options.simplified_auto_link && at_word_boundary(text, i) {
            if let Some(consumed) = self.emit_bare_url(rest, out) {
                return consumed;
            }
            if let Some(caps) = BARE_EMAIL_RE.find(rest) {
                out.push_str(&self.email_link(caps.as_str()));
                return caps.len();
            }
        }

        out.push(ch);
        ch.len_utf8()
    }

    fn emit_bare_url(&self, rest: &str, out: &mut String) -> Option<usize> {
        let schemed = rest.starts_with("http://") || rest.starts_with("https://");
        if !schemed && !rest.starts_with("www.") {
            return None;
        }

        let end = rest
            .find(|c: char| c.is_whitespace() || c == '<')
            .unwrap_or(rest.len());
        let mut url = &rest[..end];

        if self.options.exclude_trailing_punctuation_from_urls {
            url = url.trim_end_matches(['.', '!', '?', ',', '(', ')']);
        }
        if url.len() <= if schemed { 8 } else { 4 } {
            return None;
        }

        let href = if schemed {
            url.to_string()
        } else {
            format!("http://{url}")
        };

        out.push_str(&self.anchor_open(&href, None));
        out.push_str(&escape_code(url));
        out.push_str("</a>");
        Some(url.len())
    }

    fn anchor_open(&self, url: &str, title: Option<&str>) -> String {
        let mut anchor = format!("<a href=\"{}\"", escape_attr(url));
        if let Some(title) = title {
            anchor.push_str(&format!(" title=\"{}\"", escape_attr(title)));
        }
        if self.options.open_links_in_new_window {
            anchor.push_str(" target=\"_blank\" rel=\"noopener noreferrer\"");
        }
        anchor.push('>');
        anchor
    }

    fn email_link(&self, address: &str) -> String {
        if self.options.encode_emails {
            let encoded = encode_email(address);
            format!("<a href=\"mailto:{encoded}\">{encoded}</a>")
        } else {
            format!(
                "<a href=\"mailto:{}\">{}</a>",
                escape_attr(address),
                escape_code(address)
            )
        }
    }

    fn image_tag(&self, alt: &str, dest: &Destination) -> String {
        let mut img = format!(
            "<img src=\"{}\" alt=\"{}\"",
            escape_attr(&dest.url),
            escape_attr(alt)
        );
        if let Some(title) = &dest.title {
            img.push_str(&format!(" title=\"{}\"", escape_attr(title)));
        }
        if let Some((width, height)) = &dest.dimensions {
            if width != "*" {
                img.push_str(&format!(" width=\"{width}\""));
            }
            if height != "*" {
                img.push_str(&format!(" height=\"{height}\""));
            }
        }
        img.push_str(" />");
        img
    }

    /// Parse `(url "title")`, with optional `=WxH` dimensions when enabled.
    fn parse_destination(&self, after: &str) -> Option<Destination> {
        let inner_end = find_matching_paren(after)?;
        let inner = after[1..inner_end].trim();
        let consumed = inner_end + 1;

        let (url, mut remainder) = if let Some(stripped) = inner.strip_prefix('<') {
            let close = stripped.find('>')?;
            (&stripped[..close], stripped[close + 1..].trim_start())
        } else {
            match inner.find(char::is_whitespace) {
                Some(pos) => (&inner[..pos], inner[pos..].trim_start()),
                None => (inner, ""),
            }
        };

        let mut dimensions = None;
        if self.options.parse_img_dimensions {
            let token = remainder.split_whitespace().next().unwrap_or("");
            if let Some(caps) = IMG_DIMENSIONS_RE.captures(token) {
                dimensions = Some((caps[1].to_string(), caps[2].to_string()));
                remainder = remainder[token.len()..].trim_start();
            }
        }

        let title = parse_title(remainder);

        Some(Destination {
            url: url.to_string(),
            title,
            dimensions,
            consumed,
        })
    }
}

struct Destination {
    url: String,
    title: Option<String>,
    dimensions: Option<(String, String)>,
    consumed: usize,
}

/// Parse a `[...]` group starting at the opening bracket, honoring escapes
/// and nested brackets. Returns the inner text and total bytes consumed.
fn parse_bracketed(s: &str) -> Option<(&str, usize)> {
    if !s.starts_with('[') {
        return None;
    }

    let mut level = 0usize;
    let mut chars = s.char_indices();
    while let Some((idx, ch)) = chars.next() {
        match ch {
            '\\' => {
                chars.next();
            }
            '[' => level += 1,
            ']' => {
                level -= 1;
                if level == 0 {
                    return Some((&s[1..idx], idx + 1));
                }
            }
            '\n' => return None,
            _ => {}
        }
    }
    None
}

fn find_matching_paren(s: &str) -> Option<usize> {
    let mut level = 0usize;
    let mut chars = s.char_indices();
    while let Some((idx, ch)) = chars.next() {
        match ch {
            '\\' => {
                chars.next();
            }
            '(' => level += 1,
            ')' => {
                level -= 1;
                if level == 0 {
                    return Some(idx);
                }
            }
            '\n' => return None,
            _ => {}
        }
    }
    None
}

fn parse_title(remainder: &str) -> Option<String> {
    let remainder = remainder.trim();
    for (open, close) in [('"', '"'), ('\'', '\''), ('(', ')')] {
        if let Some(stripped) = remainder.strip_prefix(open) {
            if let Some(end) = stripped.rfind(close) {
                return Some(stripped[..end].to_string());
            }
        }
    }
    None
}

fn emit_entity(rest: &str, out: &mut String) -> usize {
    if let Some(m) = ENTITY_RE.find(rest) {
        out.push_str(m.as_str());
        m.len()
    } else {
        out.push_str("&amp;");
        1
    }
}

fn prev_char(text: &str, i: usize) -> Option<char> {
    text[..i].chars().next_back()
}

fn at_word_boundary(text: &str, i: usize) -> bool {
    match prev_char(text, i) {
        None => true,
        Some(prev) => prev.is_whitespace() || matches!(prev, '(' | '*' | '_' | '~' | '>'),
    }
}

/// Deterministic entity encoding for email obfuscation: every character
/// becomes a decimal entity, so identical input yields identical output.
fn encode_email(address: &str) -> String {
    address
        .chars()
        .map(|ch| format!("&#{};", ch as u32))
        .collect()
}

/// Escape text for code contexts: every metacharacter becomes an entity.
pub fn escape_code(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape text for attribute values.
pub fn escape_attr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
