//! Header id generation: slug styles, prefixing and per-conversion
//! uniqueness.

use std::collections::HashMap;

use markdown_render_config::ConversionOptions;

/// Tracks ids already handed out during one conversion. Owned by a single
/// emitter invocation and discarded with it.
#[derive(Debug, Default)]
pub struct HeaderIdState {
    counts: HashMap<String, usize>,
}

impl HeaderIdState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `id`, suffixed with an incrementing counter on collision.
    pub fn unique(&mut self, id: String) -> String {
        let count = self.counts.entry(id.clone()).or_insert(0);
        let seen = *count;
        *count += 1;
        if seen == 0 {
            id
        } else {
            format!("{id}-{seen}")
        }
    }
}

/// Build the id attribute for a heading from its source text.
///
/// The prefix joins the title before slugification unless
/// `rawPrefixHeaderId` asks for it verbatim.
pub fn build(title: &str, options: &ConversionOptions, state: &mut HeaderIdState) -> String {
    let prefix = options.prefix_header_id.as_prefix().unwrap_or("");

    let id = if options.raw_prefix_header_id {
        format!("{prefix}{}", slug(title, options))
    } else {
        slug(&format!("{prefix}{title}"), options)
    };

    state.unique(id)
}

fn slug(text: &str, options: &ConversionOptions) -> String {
    if options.gh_compatible_header_id {
        github_slug(text)
    } else if options.raw_header_id {
        raw_slug(text)
    } else {
        plain_slug(text)
    }
}

/// Default style: strip every non-word character, lowercase the rest.
fn plain_slug(text: &str) -> String {
    text.chars()
        .filter(|ch| ch.is_alphanumeric() || *ch == '_')
        .collect::<String>()
        .to_lowercase()
}

/// GitHub style: lowercase, spaces become dashes, punctuation dropped.
fn github_slug(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter_map(|ch| {
            if ch == ' ' {
                Some('-')
            } else if ch.is_alphanumeric() || ch == '_' || ch == '-' {
                Some(ch)
            } else {
                None
            }
        })
        .collect()
}

/// Raw style: only spaces and quotes are replaced with dashes.
fn raw_slug(text: &str) -> String {
    text.chars()
        .map(|ch| match ch {
            ' ' | '\'' | '"' => '-',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use markdown_render_config::HeaderIdPrefix;

    fn options() -> ConversionOptions {
        ConversionOptions::default()
    }

    #[test]
    fn plain_style_strips_non_word_characters() {
        let mut state = HeaderIdState::new();
        assert_eq!(build("Hello, world", &options(), &mut state), "helloworld");
    }

    #[test]
    fn github_style_dashes_spaces() {
        let mut state = HeaderIdState::new();
        let opts = ConversionOptions {
            gh_compatible_header_id: true,
            ..options()
        };
        assert_eq!(build("Hello, world!", &opts, &mut state), "hello-world");
    }

    #[test]
    fn raw_style_only_replaces_spaces_and_quotes() {
        let mut state = HeaderIdState::new();
        let opts = ConversionOptions {
            raw_header_id: true,
            ..options()
        };
        assert_eq!(build("A \"B\" C", &opts, &mut state), "A--B--C");
    }

    #[test]
    fn collisions_receive_numeric_suffixes() {
        let mut state = HeaderIdState::new();
        let opts = options();
        assert_eq!(build("Foo", &opts, &mut state), "foo");
        assert_eq!(build("Foo", &opts, &mut state), "foo-1");
        assert_eq!(build("Foo", &opts, &mut state), "foo-2");
    }

    #[test]
    fn prefix_is_normalized_with_the_title() {
        let mut state = HeaderIdState::new();
        let opts = ConversionOptions {
            prefix_header_id: HeaderIdPrefix::Custom("Docs ".to_string()),
            gh_compatible_header_id: true,
            ..options()
        };
        assert_eq!(build("Intro", &opts, &mut state), "docs-intro");
    }

    #[test]
    fn raw_prefix_skips_normalization() {
        let mut state = HeaderIdState::new();
        let opts = ConversionOptions {
            prefix_header_id: HeaderIdPrefix::Section,
            raw_prefix_header_id: true,
            ..options()
        };
        assert_eq!(build("Intro", &opts, &mut state), "section-intro");
    }
}
