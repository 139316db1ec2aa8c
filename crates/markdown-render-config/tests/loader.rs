use markdown_render_config::{resolve, Flavor, LoadOptions, RenderConfig};
use std::fs;

#[test]
fn should_return_empty_overrides_without_a_config_file() {
    // Given
    let dir = tempfile::tempdir().unwrap();

    // When
    let config = RenderConfig::load(
        LoadOptions::default().with_working_dir(dir.path()),
    )
    .unwrap();

    // Then
    assert!(config.source.is_none());
    assert_eq!(config.overrides, Default::default());
}

#[test]
fn should_load_the_working_directory_config() {
    // Given
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(".markdown-render.toml"),
        "flavor = \"github\"\ntables = false\nghMentionsLink = \"https://example.com/{u}\"\n",
    )
    .unwrap();

    // When
    let config = RenderConfig::load(
        LoadOptions::default().with_working_dir(dir.path()),
    )
    .unwrap();

    // Then
    assert!(config.source.is_some());
    assert_eq!(config.overrides.flavor, Some(Flavor::Github));
    assert_eq!(config.overrides.tables, Some(false));

    let options = resolve(&config.overrides).unwrap();
    assert!(!options.tables);
    assert!(options.strikethrough);
    assert_eq!(options.gh_mentions_link, "https://example.com/{u}");
}

#[test]
fn should_prefer_an_explicit_override_path() {
    // Given: both a working-directory config and an explicit one.
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(".markdown-render.toml"), "tables = true\n").unwrap();
    let explicit = dir.path().join("other.toml");
    fs::write(&explicit, "emoji = true\n").unwrap();

    // When
    let config = RenderConfig::load(
        LoadOptions::default()
            .with_working_dir(dir.path())
            .with_override_path(&explicit),
    )
    .unwrap();

    // Then: only the explicit file is read.
    assert_eq!(config.overrides.emoji, Some(true));
    assert_eq!(config.overrides.tables, None);
}

#[test]
fn should_fail_when_the_explicit_config_is_missing() {
    let dir = tempfile::tempdir().unwrap();
    let err = RenderConfig::load(
        LoadOptions::default()
            .with_working_dir(dir.path())
            .with_override_path(dir.path().join("missing.toml")),
    )
    .unwrap_err();

    assert!(err.to_string().contains("not found"));
}

#[test]
fn should_surface_parse_errors_with_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".markdown-render.toml");
    fs::write(&path, "tables = \"not a bool\"\n").unwrap();

    let err = RenderConfig::load(
        LoadOptions::default().with_working_dir(dir.path()),
    )
    .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("failed to parse config"));
    assert!(message.contains(".markdown-render.toml"));
}

#[test]
fn should_reject_unknown_keys_in_config_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(".markdown-render.toml"), "bogus = 1\n").unwrap();

    let err = RenderConfig::load(
        LoadOptions::default().with_working_dir(dir.path()),
    )
    .unwrap_err();

    assert!(err.to_string().contains("unknown field"));
}
