//! Configuration primitives for the markdown-render engine.
//!
//! Options resolve through a fixed precedence stack: built-in defaults →
//! flavor preset → user overrides, later layers winning per key. The result
//! is an immutable [`ConversionOptions`] value handed to the engine; nothing
//! is mutated after resolution, so conversions stay referentially
//! transparent. Unknown keys and mistyped values are rejected outright —
//! there is no passthrough of unrecognized settings.

use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

const CONFIG_FILE_NAME: &str = ".markdown-render.toml";

/// Default prefix applied when `prefixHeaderId` is set to `true`.
const GENERIC_ID_PREFIX: &str = "section-";

/// Named preset of option overrides approximating a Markdown dialect.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Flavor {
    #[default]
    Original,
    Github,
    Vanilla,
}

impl Flavor {
    pub const ALL: &'static [Flavor] = &[Flavor::Original, Flavor::Github, Flavor::Vanilla];

    pub fn as_str(self) -> &'static str {
        match self {
            Flavor::Original => "original",
            Flavor::Github => "github",
            Flavor::Vanilla => "vanilla",
        }
    }

    /// The override layer this flavor applies on top of the defaults,
    /// before user overrides.
    pub fn preset(self) -> OptionOverrides {
        match self {
            // John Gruber's markdown.pl behavior: no generated header ids,
            // no fenced code blocks.
            Flavor::Original => OptionOverrides {
                no_header_id: Some(true),
                gh_code_blocks: Some(false),
                ..OptionOverrides::default()
            },
            Flavor::Github => OptionOverrides {
                omit_extra_wl_in_code_blocks: Some(true),
                simplified_auto_link: Some(true),
                exclude_trailing_punctuation_from_urls: Some(true),
                literal_mid_word_underscores: Some(true),
                strikethrough: Some(true),
                tables: Some(true),
                tables_header_id: Some(true),
                gh_code_blocks: Some(true),
                tasklists: Some(true),
                disable_forced_4_spaces_indented_sublists: Some(true),
                simple_line_breaks: Some(true),
                require_space_before_heading_text: Some(true),
                gh_compatible_header_id: Some(true),
                gh_mentions: Some(true),
                backslash_escapes_html_tags: Some(true),
                emoji: Some(true),
                split_adjacent_blockquotes: Some(true),
                ..OptionOverrides::default()
            },
            Flavor::Vanilla => OptionOverrides::default(),
        }
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Flavor {
    type Err = OptionsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "original" => Ok(Flavor::Original),
            "github" => Ok(Flavor::Github),
            "vanilla" => Ok(Flavor::Vanilla),
            _ => Err(OptionsError::UnknownFlavor {
                value: value.to_string(),
            }),
        }
    }
}

/// Resolved form of the bool-or-string `prefixHeaderId` option.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum HeaderIdPrefix {
    #[default]
    None,
    Section,
    Custom(String),
}

impl HeaderIdPrefix {
    /// The literal prefix text, if any.
    pub fn as_prefix(&self) -> Option<&str> {
        match self {
            HeaderIdPrefix::None => None,
            HeaderIdPrefix::Section => Some(GENERIC_ID_PREFIX),
            HeaderIdPrefix::Custom(prefix) => Some(prefix),
        }
    }
}

impl From<BoolOrString> for HeaderIdPrefix {
    fn from(value: BoolOrString) -> Self {
        match value {
            BoolOrString::Bool(false) => HeaderIdPrefix::None,
            BoolOrString::Bool(true) => HeaderIdPrefix::Section,
            BoolOrString::String(prefix) => HeaderIdPrefix::Custom(prefix),
        }
    }
}

impl Serialize for HeaderIdPrefix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            HeaderIdPrefix::None => serializer.serialize_bool(false),
            HeaderIdPrefix::Section => serializer.serialize_bool(true),
            HeaderIdPrefix::Custom(prefix) => serializer.serialize_str(prefix),
        }
    }
}

/// Wire value accepted for options that take either a bool or a string.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BoolOrString {
    Bool(bool),
    String(String),
}

/// Fully resolved, immutable option set consumed by the conversion engine.
///
/// Field names follow Rust convention; the serde renames preserve the wire
/// names used by config files, `--set` and the registry table.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionOptions {
    #[serde(rename = "omitExtraWLInCodeBlocks")]
    pub omit_extra_wl_in_code_blocks: bool,
    pub no_header_id: bool,
    pub customized_header_id: bool,
    pub gh_compatible_header_id: bool,
    pub prefix_header_id: HeaderIdPrefix,
    pub raw_prefix_header_id: bool,
    pub raw_header_id: bool,
    pub parse_img_dimensions: bool,
    pub header_level_start: u8,
    pub simplified_auto_link: bool,
    #[serde(rename = "excludeTrailingPunctuationFromURLs")]
    pub exclude_trailing_punctuation_from_urls: bool,
    pub literal_mid_word_underscores: bool,
    pub strikethrough: bool,
    pub tables: bool,
    pub tables_header_id: bool,
    pub gh_code_blocks: bool,
    pub tasklists: bool,
    pub smart_indentation_fix: bool,
    pub disable_forced_4_spaces_indented_sublists: bool,
    pub simple_line_breaks: bool,
    pub require_space_before_heading_text: bool,
    pub gh_mentions: bool,
    pub gh_mentions_link: String,
    pub encode_emails: bool,
    pub open_links_in_new_window: bool,
    #[serde(rename = "backslashEscapesHTMLTags")]
    pub backslash_escapes_html_tags: bool,
    pub emoji: bool,
    pub underline: bool,
    #[serde(rename = "completeHTMLDocument")]
    pub complete_html_document: bool,
    pub metadata: bool,
    pub split_adjacent_blockquotes: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        ConversionOptions {
            omit_extra_wl_in_code_blocks: false,
            no_header_id: false,
            customized_header_id: false,
            gh_compatible_header_id: false,
            prefix_header_id: HeaderIdPrefix::None,
            raw_prefix_header_id: false,
            raw_header_id: false,
            parse_img_dimensions: false,
            header_level_start: 1,
            simplified_auto_link: false,
            exclude_trailing_punctuation_from_urls: false,
            literal_mid_word_underscores: false,
            strikethrough: false,
            tables: false,
            tables_header_id: false,
            gh_code_blocks: true,
            tasklists: false,
            smart_indentation_fix: false,
            disable_forced_4_spaces_indented_sublists: false,
            simple_line_breaks: false,
            require_space_before_heading_text: false,
            gh_mentions: false,
            gh_mentions_link: "https://github.com/{u}".to_string(),
            encode_emails: true,
            open_links_in_new_window: false,
            backslash_escapes_html_tags: false,
            emoji: false,
            underline: false,
            complete_html_document: false,
            metadata: false,
            split_adjacent_blockquotes: false,
        }
    }
}

/// Partial option layer: every recognized key, each optionally set.
///
/// Unknown keys are a hard deserialization error rather than silently
/// ignored settings.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OptionOverrides {
    /// Selects the preset layer; never reaches the engine as an option.
    pub flavor: Option<Flavor>,
    #[serde(rename = "omitExtraWLInCodeBlocks")]
    pub omit_extra_wl_in_code_blocks: Option<bool>,
    pub no_header_id: Option<bool>,
    pub customized_header_id: Option<bool>,
    pub gh_compatible_header_id: Option<bool>,
    pub prefix_header_id: Option<BoolOrString>,
    pub raw_prefix_header_id: Option<bool>,
    pub raw_header_id: Option<bool>,
    pub parse_img_dimensions: Option<bool>,
    pub header_level_start: Option<u8>,
    pub simplified_auto_link: Option<bool>,
    #[serde(rename = "excludeTrailingPunctuationFromURLs")]
    pub exclude_trailing_punctuation_from_urls: Option<bool>,
    pub literal_mid_word_underscores: Option<bool>,
    pub strikethrough: Option<bool>,
    pub tables: Option<bool>,
    pub tables_header_id: Option<bool>,
    pub gh_code_blocks: Option<bool>,
    pub tasklists: Option<bool>,
    pub smart_indentation_fix: Option<bool>,
    pub disable_forced_4_spaces_indented_sublists: Option<bool>,
    pub simple_line_breaks: Option<bool>,
    pub require_space_before_heading_text: Option<bool>,
    pub gh_mentions: Option<bool>,
    pub gh_mentions_link: Option<String>,
    pub encode_emails: Option<bool>,
    pub open_links_in_new_window: Option<bool>,
    #[serde(rename = "backslashEscapesHTMLTags")]
    pub backslash_escapes_html_tags: Option<bool>,
    pub emoji: Option<bool>,
    pub underline: Option<bool>,
    #[serde(rename = "completeHTMLDocument")]
    pub complete_html_document: Option<bool>,
    pub metadata: Option<bool>,
    pub split_adjacent_blockquotes: Option<bool>,
}

impl OptionOverrides {
    /// Parse a TOML document of wire-named keys into an override layer.
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Assign a single option from string key/value, validated against the
    /// registry. `flavor` is accepted here as well since it is part of the
    /// raw override surface.
    pub fn set(&mut self, key: &str, raw: &str) -> Result<(), OptionsError> {
        if key == "flavor" {
            self.flavor = Some(raw.parse()?);
            return Ok(());
        }

        let spec = spec_for(key).ok_or_else(|| OptionsError::UnknownOption {
            key: key.to_string(),
        })?;

        match spec.kind {
            OptionKind::Bool => {
                let value = parse_bool(key, raw)?;
                self.set_bool(key, value);
            }
            OptionKind::Int => {
                let value: u8 = raw.parse().map_err(|_| OptionsError::InvalidValue {
                    key: key.to_string(),
                    expected: "an integer between 1 and 6",
                    value: raw.to_string(),
                })?;
                debug_assert_eq!(key, "headerLevelStart");
                self.header_level_start = Some(value);
            }
            OptionKind::Str => {
                debug_assert_eq!(key, "ghMentionsLink");
                self.gh_mentions_link = Some(raw.to_string());
            }
            OptionKind::BoolOrStr => {
                debug_assert_eq!(key, "prefixHeaderId");
                self.prefix_header_id = Some(match raw {
                    "true" => BoolOrString::Bool(true),
                    "false" => BoolOrString::Bool(false),
                    other => BoolOrString::String(other.to_string()),
                });
            }
        }

        Ok(())
    }

    fn set_bool(&mut self, key: &str, value: bool) {
        let slot = match key {
            "omitExtraWLInCodeBlocks" => &mut self.omit_extra_wl_in_code_blocks,
            "noHeaderId" => &mut self.no_header_id,
            "customizedHeaderId" => &mut self.customized_header_id,
            "ghCompatibleHeaderId" => &mut self.gh_compatible_header_id,
            "rawPrefixHeaderId" => &mut self.raw_prefix_header_id,
            "rawHeaderId" => &mut self.raw_header_id,
            "parseImgDimensions" => &mut self.parse_img_dimensions,
            "simplifiedAutoLink" => &mut self.simplified_auto_link,
            "excludeTrailingPunctuationFromURLs" => {
                &mut self.exclude_trailing_punctuation_from_urls
            }
            "literalMidWordUnderscores" => &mut self.literal_mid_word_underscores,
            "strikethrough" => &mut self.strikethrough,
            "tables" => &mut self.tables,
            "tablesHeaderId" => &mut self.tables_header_id,
            "ghCodeBlocks" => &mut self.gh_code_blocks,
            "tasklists" => &mut self.tasklists,
            "smartIndentationFix" => &mut self.smart_indentation_fix,
            "disableForced4SpacesIndentedSublists" => {
                &mut self.disable_forced_4_spaces_indented_sublists
            }
            "simpleLineBreaks" => &mut self.simple_line_breaks,
            "requireSpaceBeforeHeadingText" => &mut self.require_space_before_heading_text,
            "ghMentions" => &mut self.gh_mentions,
            "encodeEmails" => &mut self.encode_emails,
            "openLinksInNewWindow" => &mut self.open_links_in_new_window,
            "backslashEscapesHTMLTags" => &mut self.backslash_escapes_html_tags,
            "emoji" => &mut self.emoji,
            "underline" => &mut self.underline,
            "completeHTMLDocument" => &mut self.complete_html_document,
            "metadata" => &mut self.metadata,
            "splitAdjacentBlockquotes" => &mut self.split_adjacent_blockquotes,
            other => unreachable!("registry lists no bool option named '{other}'"),
        };
        *slot = Some(value);
    }

    /// Overlay `other` on top of this layer; keys set in `other` win.
    pub fn merge(&mut self, other: OptionOverrides) {
        macro_rules! take {
            ($($field:ident),+ $(,)?) => {
                $(if other.$field.is_some() {
                    self.$field = other.$field;
                })+
            };
        }
        take!(
            flavor,
            omit_extra_wl_in_code_blocks,
            no_header_id,
            customized_header_id,
            gh_compatible_header_id,
            prefix_header_id,
            raw_prefix_header_id,
            raw_header_id,
            parse_img_dimensions,
            header_level_start,
            simplified_auto_link,
            exclude_trailing_punctuation_from_urls,
            literal_mid_word_underscores,
            strikethrough,
            tables,
            tables_header_id,
            gh_code_blocks,
            tasklists,
            smart_indentation_fix,
            disable_forced_4_spaces_indented_sublists,
            simple_line_breaks,
            require_space_before_heading_text,
            gh_mentions,
            gh_mentions_link,
            encode_emails,
            open_links_in_new_window,
            backslash_escapes_html_tags,
            emoji,
            underline,
            complete_html_document,
            metadata,
            split_adjacent_blockquotes,
        );
    }

    fn apply(&self, options: &mut ConversionOptions) {
        macro_rules! overlay {
            ($($field:ident),+ $(,)?) => {
                $(if let Some(value) = &self.$field {
                    options.$field = value.clone();
                })+
            };
        }
        overlay!(
            omit_extra_wl_in_code_blocks,
            no_header_id,
            customized_header_id,
            gh_compatible_header_id,
            raw_prefix_header_id,
            raw_header_id,
            parse_img_dimensions,
            header_level_start,
            simplified_auto_link,
            exclude_trailing_punctuation_from_urls,
            literal_mid_word_underscores,
            strikethrough,
            tables,
            tables_header_id,
            gh_code_blocks,
            tasklists,
            smart_indentation_fix,
            disable_forced_4_spaces_indented_sublists,
            simple_line_breaks,
            require_space_before_heading_text,
            gh_mentions,
            gh_mentions_link,
            encode_emails,
            open_links_in_new_window,
            backslash_escapes_html_tags,
            emoji,
            underline,
            complete_html_document,
            metadata,
            split_adjacent_blockquotes,
        );
        if let Some(prefix) = &self.prefix_header_id {
            options.prefix_header_id = prefix.clone().into();
        }
    }
}

/// Resolve an override layer into a concrete option set.
///
/// Precedence: defaults → flavor preset (`overrides.flavor`, default
/// `original`) → `overrides`. Resolution is pure; the same input always
/// yields the same option set.
pub fn resolve(overrides: &OptionOverrides) -> Result<ConversionOptions, OptionsError> {
    let mut options = ConversionOptions::default();
    let flavor = overrides.flavor.unwrap_or_default();
    flavor.preset().apply(&mut options);
    overrides.apply(&mut options);

    if !(1..=6).contains(&options.header_level_start) {
        return Err(OptionsError::InvalidValue {
            key: "headerLevelStart".to_string(),
            expected: "an integer between 1 and 6",
            value: options.header_level_start.to_string(),
        });
    }

    Ok(options)
}

/// Value shape of a registry entry.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OptionKind {
    Bool,
    Int,
    Str,
    BoolOrStr,
}

impl OptionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OptionKind::Bool => "bool",
            OptionKind::Int => "int",
            OptionKind::Str => "string",
            OptionKind::BoolOrStr => "bool|string",
        }
    }
}

/// One recognized option: wire name, value kind, default, effect.
#[derive(Clone, Copy, Debug)]
pub struct OptionSpec {
    pub name: &'static str,
    pub kind: OptionKind,
    pub default: &'static str,
    pub help: &'static str,
}

/// Authoritative list of recognized engine options (`flavor` excluded — it
/// selects a preset rather than configuring the engine).
pub const OPTIONS: &[OptionSpec] = &[
    OptionSpec {
        name: "omitExtraWLInCodeBlocks",
        kind: OptionKind::Bool,
        default: "false",
        help: "Omit the trailing newline in rendered code blocks",
    },
    OptionSpec {
        name: "noHeaderId",
        kind: OptionKind::Bool,
        default: "false",
        help: "Disable automatic generation of header ids",
    },
    OptionSpec {
        name: "customizedHeaderId",
        kind: OptionKind::Bool,
        default: "false",
        help: "Use trailing curly-brace text as the header id",
    },
    OptionSpec {
        name: "ghCompatibleHeaderId",
        kind: OptionKind::Bool,
        default: "false",
        help: "Generate GitHub-style slugs for header ids",
    },
    OptionSpec {
        name: "prefixHeaderId",
        kind: OptionKind::BoolOrStr,
        default: "false",
        help: "Prefix generated header ids (true for 'section-', or a custom string)",
    },
    OptionSpec {
        name: "rawPrefixHeaderId",
        kind: OptionKind::Bool,
        default: "false",
        help: "Prepend the header id prefix verbatim, skipping normalization",
    },
    OptionSpec {
        name: "rawHeaderId",
        kind: OptionKind::Bool,
        default: "false",
        help: "Only replace spaces and quotes with dashes when building header ids",
    },
    OptionSpec {
        name: "parseImgDimensions",
        kind: OptionKind::Bool,
        default: "false",
        help: "Allow =WxH image dimensions inside image syntax",
    },
    OptionSpec {
        name: "headerLevelStart",
        kind: OptionKind::Int,
        default: "1",
        help: "Heading tag level that a single # maps to",
    },
    OptionSpec {
        name: "simplifiedAutoLink",
        kind: OptionKind::Bool,
        default: "false",
        help: "Link bare URLs and email addresses automatically",
    },
    OptionSpec {
        name: "excludeTrailingPunctuationFromURLs",
        kind: OptionKind::Bool,
        default: "false",
        help: "Trim trailing punctuation from autolinked URLs",
    },
    OptionSpec {
        name: "literalMidWordUnderscores",
        kind: OptionKind::Bool,
        default: "false",
        help: "Treat underscores in the middle of words as literal text",
    },
    OptionSpec {
        name: "strikethrough",
        kind: OptionKind::Bool,
        default: "false",
        help: "Enable ~~strikethrough~~ syntax",
    },
    OptionSpec {
        name: "tables",
        kind: OptionKind::Bool,
        default: "false",
        help: "Enable pipe-table syntax",
    },
    OptionSpec {
        name: "tablesHeaderId",
        kind: OptionKind::Bool,
        default: "false",
        help: "Add an id attribute to table header cells",
    },
    OptionSpec {
        name: "ghCodeBlocks",
        kind: OptionKind::Bool,
        default: "true",
        help: "Enable fenced (GFM-style) code blocks",
    },
    OptionSpec {
        name: "tasklists",
        kind: OptionKind::Bool,
        default: "false",
        help: "Enable GFM task list items",
    },
    OptionSpec {
        name: "smartIndentationFix",
        kind: OptionKind::Bool,
        default: "false",
        help: "Strip indentation shared by every line of the document",
    },
    OptionSpec {
        name: "disableForced4SpacesIndentedSublists",
        kind: OptionKind::Bool,
        default: "false",
        help: "Let 2-3 spaces nest a sublist instead of requiring 4",
    },
    OptionSpec {
        name: "simpleLineBreaks",
        kind: OptionKind::Bool,
        default: "false",
        help: "Render every in-paragraph newline as a line break",
    },
    OptionSpec {
        name: "requireSpaceBeforeHeadingText",
        kind: OptionKind::Bool,
        default: "false",
        help: "Require a space between # and the heading text",
    },
    OptionSpec {
        name: "ghMentions",
        kind: OptionKind::Bool,
        default: "false",
        help: "Link @username mentions",
    },
    OptionSpec {
        name: "ghMentionsLink",
        kind: OptionKind::Str,
        default: "https://github.com/{u}",
        help: "Link template for @mentions; {u} is replaced with the username",
    },
    OptionSpec {
        name: "encodeEmails",
        kind: OptionKind::Bool,
        default: "true",
        help: "Encode email addresses as character entities",
    },
    OptionSpec {
        name: "openLinksInNewWindow",
        kind: OptionKind::Bool,
        default: "false",
        help: "Add target=\"_blank\" to rendered links",
    },
    OptionSpec {
        name: "backslashEscapesHTMLTags",
        kind: OptionKind::Bool,
        default: "false",
        help: "Let backslash escape literal HTML tags",
    },
    OptionSpec {
        name: "emoji",
        kind: OptionKind::Bool,
        default: "false",
        help: "Enable :shortcode: emoji",
    },
    OptionSpec {
        name: "underline",
        kind: OptionKind::Bool,
        default: "false",
        help: "Render __text__ as underline instead of bold",
    },
    OptionSpec {
        name: "completeHTMLDocument",
        kind: OptionKind::Bool,
        default: "false",
        help: "Emit a complete HTML document instead of a fragment",
    },
    OptionSpec {
        name: "metadata",
        kind: OptionKind::Bool,
        default: "false",
        help: "Parse leading front-matter metadata",
    },
    OptionSpec {
        name: "splitAdjacentBlockquotes",
        kind: OptionKind::Bool,
        default: "false",
        help: "Keep blank-line-separated blockquotes as separate elements",
    },
];

/// Look up a registry entry by wire name.
pub fn spec_for(name: &str) -> Option<&'static OptionSpec> {
    OPTIONS.iter().find(|spec| spec.name == name)
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, OptionsError> {
    match raw {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(OptionsError::InvalidValue {
            key: key.to_string(),
            expected: "'true' or 'false'",
            value: raw.to_string(),
        }),
    }
}

/// Errors raised while validating or resolving options.
#[derive(Debug, Error, PartialEq)]
pub enum OptionsError {
    #[error("unknown option '{key}'")]
    UnknownOption { key: String },
    #[error("invalid value '{value}' for option '{key}': expected {expected}")]
    InvalidValue {
        key: String,
        expected: &'static str,
        value: String,
    },
    #[error("unknown flavor '{value}' (expected one of: original, github, vanilla)")]
    UnknownFlavor { value: String },
}

/// Loader options, typically supplied by the CLI layer.
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub override_path: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
}

impl LoadOptions {
    pub fn with_override_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_path = Some(path.into());
        self
    }

    pub fn with_working_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(path.into());
        self
    }
}

/// Errors surfaced while loading configuration from disk.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file {path} not found")]
    OverrideNotFound { path: PathBuf },
    #[error("failed to read config {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error(transparent)]
    Options(#[from] OptionsError),
}

/// Override layer loaded from an on-disk config file.
#[derive(Clone, Debug, Default)]
pub struct RenderConfig {
    pub overrides: OptionOverrides,
    /// The file the overrides came from, if one was found.
    pub source: Option<PathBuf>,
}

impl RenderConfig {
    /// Load `.markdown-render.toml` from the working directory, or the
    /// explicit override path. A missing file is only an error when the
    /// caller named it explicitly.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let working_dir = match options.working_dir {
            Some(dir) => dir,
            None => env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        };

        let (path, required) = match options.override_path {
            Some(path) => {
                let path = if path.is_absolute() {
                    path
                } else {
                    working_dir.join(path)
                };
                (path, true)
            }
            None => (working_dir.join(CONFIG_FILE_NAME), false),
        };

        if !path.exists() {
            if required {
                return Err(ConfigError::OverrideNotFound { path });
            }
            return Ok(RenderConfig::default());
        }

        let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let overrides =
            OptionOverrides::from_toml_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?;

        Ok(RenderConfig {
            overrides,
            source: Some(path),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_values() {
        let options = ConversionOptions::default();
        assert!(!options.no_header_id);
        assert!(options.gh_code_blocks);
        assert!(options.encode_emails);
        assert_eq!(options.header_level_start, 1);
        assert_eq!(options.gh_mentions_link, "https://github.com/{u}");
        assert_eq!(options.prefix_header_id, HeaderIdPrefix::None);
    }

    #[test]
    fn registry_agrees_with_defaults() {
        // Given
        let defaults =
            serde_json::to_value(ConversionOptions::default()).expect("options serialize");
        let map = defaults.as_object().expect("options serialize to a map");

        // Then: every registry entry matches the struct default, and vice versa.
        assert_eq!(map.len(), OPTIONS.len());
        for spec in OPTIONS {
            let value = map
                .get(spec.name)
                .unwrap_or_else(|| panic!("registry key '{}' missing from options", spec.name));
            let rendered = match value {
                serde_json::Value::Bool(b) => b.to_string(),
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::String(s) => s.clone(),
                other => panic!("unexpected default shape for '{}': {other}", spec.name),
            };
            assert_eq!(
                rendered, spec.default,
                "registry default for '{}' drifted",
                spec.name
            );
        }
    }

    #[test]
    fn resolve_applies_flavor_preset() {
        let overrides = OptionOverrides {
            flavor: Some(Flavor::Github),
            ..OptionOverrides::default()
        };

        let options = resolve(&overrides).unwrap();

        assert!(options.tables);
        assert!(options.strikethrough);
        assert!(options.simple_line_breaks);
        assert!(!options.no_header_id);
    }

    #[test]
    fn user_overrides_win_over_flavor_preset() {
        // Given: github turns tables on, the user turns them back off.
        let overrides = OptionOverrides {
            flavor: Some(Flavor::Github),
            tables: Some(false),
            ..OptionOverrides::default()
        };

        // When
        let options = resolve(&overrides).unwrap();

        // Then
        assert!(!options.tables);
        assert!(options.strikethrough);
    }

    #[test]
    fn default_flavor_is_original() {
        let options = resolve(&OptionOverrides::default()).unwrap();
        assert!(options.no_header_id);
        assert!(!options.gh_code_blocks);
    }

    #[test]
    fn set_rejects_unknown_keys() {
        let mut overrides = OptionOverrides::default();
        let err = overrides.set("bogusKey", "true").unwrap_err();
        assert_eq!(
            err,
            OptionsError::UnknownOption {
                key: "bogusKey".to_string()
            }
        );
    }

    #[test]
    fn set_rejects_mistyped_values() {
        let mut overrides = OptionOverrides::default();
        let err = overrides.set("tables", "yes").unwrap_err();
        assert!(matches!(err, OptionsError::InvalidValue { .. }));

        let err = overrides.set("headerLevelStart", "two").unwrap_err();
        assert!(matches!(err, OptionsError::InvalidValue { .. }));
    }

    #[test]
    fn set_accepts_every_registry_key() {
        let mut overrides = OptionOverrides::default();
        for spec in OPTIONS {
            let raw = match spec.kind {
                OptionKind::Bool => "true",
                OptionKind::Int => "3",
                OptionKind::Str | OptionKind::BoolOrStr => "value",
            };
            overrides
                .set(spec.name, raw)
                .unwrap_or_else(|err| panic!("set('{}') failed: {err}", spec.name));
        }
    }

    #[test]
    fn unknown_flavor_is_rejected() {
        let err = "notaflavor".parse::<Flavor>().unwrap_err();
        assert_eq!(
            err,
            OptionsError::UnknownFlavor {
                value: "notaflavor".to_string()
            }
        );
    }

    #[test]
    fn header_level_start_is_range_checked() {
        let overrides = OptionOverrides {
            header_level_start: Some(9),
            ..OptionOverrides::default()
        };
        assert!(matches!(
            resolve(&overrides),
            Err(OptionsError::InvalidValue { .. })
        ));
    }

    #[test]
    fn merge_overlays_later_layers() {
        let mut base = OptionOverrides {
            tables: Some(true),
            emoji: Some(true),
            ..OptionOverrides::default()
        };
        let layer = OptionOverrides {
            tables: Some(false),
            underline: Some(true),
            ..OptionOverrides::default()
        };

        base.merge(layer);

        assert_eq!(base.tables, Some(false));
        assert_eq!(base.emoji, Some(true));
        assert_eq!(base.underline, Some(true));
    }

    #[test]
    fn toml_overrides_reject_unknown_keys() {
        let err = OptionOverrides::from_toml_str("bogusKey = true").unwrap_err();
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    fn prefix_header_id_accepts_bool_and_string() {
        let overrides = OptionOverrides::from_toml_str("prefixHeaderId = true").unwrap();
        assert_eq!(overrides.prefix_header_id, Some(BoolOrString::Bool(true)));

        let overrides = OptionOverrides::from_toml_str("prefixHeaderId = \"docs-\"").unwrap();
        assert_eq!(
            overrides.prefix_header_id,
            Some(BoolOrString::String("docs-".to_string()))
        );

        let resolved = resolve(&overrides).unwrap();
        assert_eq!(resolved.prefix_header_id.as_prefix(), Some("docs-"));
    }

    #[test]
    fn resolution_is_deterministic() {
        let overrides = OptionOverrides {
            flavor: Some(Flavor::Github),
            emoji: Some(false),
            gh_mentions_link: Some("https://example.com/{u}".to_string()),
            ..OptionOverrides::default()
        };
        assert_eq!(resolve(&overrides).unwrap(), resolve(&overrides).unwrap());
    }
}
