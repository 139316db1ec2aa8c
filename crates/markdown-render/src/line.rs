//! Line-level preprocessing: newline normalization, tab expansion and
//! indentation measurement. Everything downstream works on these lines.

/// Split a document into lines with normalized endings and tabs expanded to
/// 4-column tab stops.
pub fn split_lines(input: &str) -> Vec<String> {
    let normalized = input.replace("\r\n", "\n").replace('\r', "\n");
    normalized.split('\n').map(detab).collect()
}

fn detab(line: &str) -> String {
    if !line.contains('\t') {
        return line.to_string();
    }

    let mut out = String::with_capacity(line.len());
    let mut column = 0usize;
    for ch in line.chars() {
        if ch == '\t' {
            let pad = 4 - (column % 4);
            for _ in 0..pad {
                out.push(' ');
            }
            column += pad;
        } else {
            out.push(ch);
            column += 1;
        }
    }
    out
}

/// Width of the leading whitespace, counting tabs as 4 columns.
pub fn leading_indent_width(line: &str) -> usize {
    let mut width = 0usize;
    for ch in line.chars() {
        match ch {
            ' ' => width += 1,
            '\t' => width += 4,
            _ => break,
        }
    }
    width
}

/// Split a line into its indentation width and the remaining text.
pub fn split_indent(line: &str) -> (usize, &str) {
    let mut width = 0usize;
    let mut byte_index = line.len();

    for (idx, ch) in line.char_indices() {
        match ch {
            ' ' => width += 1,
            '\t' => width += 4,
            _ => {
                byte_index = idx;
                break;
            }
        }
    }

    (width, &line[byte_index..])
}

/// Strip up to `n` leading space columns from a line.
pub fn strip_indent(line: &str, n: usize) -> &str {
    let mut stripped = 0usize;
    for (idx, ch) in line.char_indices() {
        if stripped >= n || ch != ' ' {
            return &line[idx..];
        }
        stripped += 1;
    }
    ""
}

/// Remove the indentation shared by every non-blank line. Rescues Markdown
/// that was embedded in an indented context (template strings, heredocs).
pub fn strip_common_indent(lines: &mut [String]) {
    let common = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| leading_indent_width(line))
        .min()
        .unwrap_or(0);

    if common == 0 {
        return;
    }

    for line in lines.iter_mut() {
        *line = strip_indent(line, common).to_string();
    }
}

/// True when the line is empty or whitespace-only.
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
