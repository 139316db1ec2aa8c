//! HTML emission: renders the block tree into markup under the resolved
//! options. Owns the per-conversion header id state; nothing here survives
//! the call.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use markdown_render_config::ConversionOptions;
use regex::Regex;

use crate::block::{Alignment, Block, List, ListItem, RefMap, Table};
use crate::error::RenderError;
use crate::header_id::{self, HeaderIdState};
use crate::inline::{escape_attr, escape_code, InlineRenderer};

static CUSTOM_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]*\{([^{}]+)\}[ \t]*$").unwrap());

/// Renders one parsed document. Construct per conversion.
pub struct Emitter<'a> {
    options: &'a ConversionOptions,
    refs: &'a RefMap,
    header_ids: HeaderIdState,
}

impl<'a> Emitter<'a> {
    pub fn new(options: &'a ConversionOptions, refs: &'a RefMap) -> Self {
        Self {
            options,
            refs,
            header_ids: HeaderIdState::new(),
        }
    }

    /// Render the block tree, wrapping it in a full document when
    /// `completeHTMLDocument` is set.
    pub fn render_document(
        &mut self,
        blocks: &[Block],
        metadata: &BTreeMap<String, String>,
    ) -> Result<String, RenderError> {
        let body = self.render_blocks(blocks)?;

        if !self.options.complete_html_document {
            return Ok(body);
        }

        let lang = metadata
            .get("lang")
            .or_else(|| metadata.get("language"))
            .map(|lang| format!(" lang=\"{}\"", escape_attr(lang)))
            .unwrap_or_default();
        let charset = metadata
            .get("charset")
            .map(String::as_str)
            .unwrap_or("utf-8");

        let mut doc = String::with_capacity(body.len() + 128);
        doc.push_str("<!DOCTYPE HTML>\n");
        doc.push_str(&format!("<html{lang}>\n<head>\n"));
        doc.push_str(&format!("<meta charset=\"{}\">\n", escape_attr(charset)));
        if let Some(title) = metadata.get("title") {
            doc.push_str(&format!("<title>{}</title>\n", escape_code(title)));
        }
        doc.push_str("</head>\n<body>\n");
        doc.push_str(&body);
        doc.push_str("\n</body>\n</html>");
        Ok(doc)
    }

    fn render_blocks(&mut self, blocks: &[Block]) -> Result<String, RenderError> {
        let mut parts = Vec::with_capacity(blocks.len());
        for block in blocks {
            parts.push(self.render_block(block)?);
        }
        Ok(parts.join("\n"))
    }

    fn render_block(&mut self, block: &Block) -> Result<String, RenderError> {
        match block {
            Block::Paragraph { lines } => {
                let text = lines.join("\n");
                Ok(format!("<p>{}</p>", self.inline(text.trim())?))
            }
            Block::Heading { level, text } => self.render_heading(*level, text),
            Block::CodeBlock { language, code } => Ok(self.render_code_block(language, code)),
            Block::BlockQuote { blocks } => {
                let inner = self.render_blocks(blocks)?;
                if inner.is_empty() {
                    Ok("<blockquote></blockquote>".to_string())
                } else {
                    Ok(format!("<blockquote>\n{inner}\n</blockquote>"))
                }
            }
            Block::List(list) => self.render_list(list),
            Block::Table(table) => self.render_table(table),
            Block::HtmlBlock { lines } => Ok(lines.join("\n")),
            Block::HorizontalRule => Ok("<hr />".to_string()),
        }
    }

    fn render_heading(&mut self, level: u8, text: &str) -> Result<String, RenderError> {
        let mut display = text;
        let mut id_source = text.to_string();

        if self.options.customized_header_id {
            if let Some(caps) = CUSTOM_ID_RE.captures(text) {
                id_source = caps.get(1).unwrap().as_str().trim().to_string();
                display = &text[..caps.get(0).unwrap().start()];
            }
        }

        let tag_level = level + self.options.header_level_start - 1;
        let content = self.inline(display.trim_end())?;

        if self.options.no_header_id {
            return Ok(format!("<h{tag_level}>{content}</h{tag_level}>"));
        }

        let id = header_id::build(&id_source, self.options, &mut self.header_ids);
        Ok(format!(
            "<h{tag_level} id=\"{}\">{content}</h{tag_level}>",
            escape_attr(&id)
        ))
    }

    fn render_code_block(&mut self, language: &Option<String>, code: &str) -> String {
        let mut open = String::from("<pre><code");
        if let Some(lang) = language {
            let lang = escape_attr(lang);
            open.push_str(&format!(" class=\"{lang} language-{lang}\""));
        }
        open.push('>');

        let trailing = if code.is_empty() || self.options.omit_extra_wl_in_code_blocks {
            ""
        } else {
            "\n"
        };

        format!("{open}{}{trailing}</code></pre>", escape_code(code))
    }

    fn render_list(&mut self, list: &List) -> Result<String, RenderError> {
        let tag = if list.ordered { "ol" } else { "ul" };
        let mut parts = Vec::with_capacity(list.items.len() + 2);
        parts.push(format!("<{tag}>"));
        for item in &list.items {
            parts.push(self.render_list_item(item, list.loose)?);
        }
        parts.push(format!("</{tag}>"));
        Ok(parts.join("\n"))
    }

    fn render_list_item(&mut self, item: &ListItem, loose: bool) -> Result<String, RenderError> {
        let mut parts = Vec::with_capacity(item.blocks.len());
        for block in &item.blocks {
            match block {
                Block::Paragraph { lines } if !loose => {
                    parts.push(self.inline(lines.join("\n").trim())?);
                }
                other => parts.push(self.render_block(other)?),
            }
        }
        let content = parts.join("\n");

        match item.task {
            Some(checked) => {
                let checked = if checked { " checked" } else { "" };
                Ok(format!(
                    "<li class=\"task-list-item\" style=\"list-style-type: none;\">\
                     <input type=\"checkbox\" disabled style=\"margin: 0px 0.35em 0.25em -1.6em; \
                     vertical-align: middle;\"{checked}> {content}</li>"
                ))
            }
            None => Ok(format!("<li>{content}</li>")),
        }
    }

    fn render_table(&mut self, table: &Table) -> Result<String, RenderError> {
        let mut parts = Vec::new();
        parts.push("<table>".to_string());
        parts.push("<thead>".to_string());
        parts.push("<tr>".to_string());
        for (header, alignment) in table.headers.iter().zip(&table.alignments) {
            let mut th = String::from("<th");
            if self.options.tables_header_id {
                let id = header_id::build(header, self.options, &mut self.header_ids);
                th.push_str(&format!(" id=\"{}\"", escape_attr(&id)));
            }
            th.push_str(alignment_style(*alignment));
            th.push('>');
            th.push_str(&self.inline(header)?);
            th.push_str("</th>");
            parts.push(th);
        }
        parts.push("</tr>".to_string());
        parts.push("</thead>".to_string());
        parts.push("<tbody>".to_string());
        for row in &table.rows {
            parts.push("<tr>".to_string());
            for (cell, alignment) in row.iter().zip(&table.alignments) {
                parts.push(format!(
                    "<td{}>{}</td>",
                    alignment_style(*alignment),
                    self.inline(cell)?
                ));
            }
            parts.push("</tr>".to_string());
        }
        parts.push("</tbody>".to_string());
        parts.push("</table>".to_string());
        Ok(parts.join("\n"))
    }

    fn inline(&self, text: &str) -> Result<String, RenderError> {
        InlineRenderer::new(self.options, self.refs).render(text)
    }
}

fn alignment_style(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::None => "",
        Alignment::Left => " style=\"text-align:left;\"",
        Alignment::Center => " style=\"text-align:center;\"",
        Alignment::Right => " style=\"text-align:right;\"",
    }
}
