use anyhow::{bail, Context, Result};
use clap::Parser;
use markdown_render::Converter;
use markdown_render_config::{resolve, Flavor, LoadOptions, RenderConfig, OPTIONS};
use std::{
    fs,
    io::{self, Read, Write},
    path::PathBuf,
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Flavor preset to apply (original, github, vanilla)
    #[arg(short, long, value_name = "FLAVOR")]
    flavor: Option<String>,

    /// Set an engine option, e.g. --set tables=true (repeatable)
    #[arg(short, long, value_name = "KEY=VALUE")]
    set: Vec<String>,

    /// Explicit config file (default: .markdown-render.toml in the
    /// working directory, if present)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write HTML to this file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// List every recognized option and exit
    #[arg(long)]
    list_options: bool,

    /// Print the resolved option set as JSON and exit
    #[arg(long)]
    show_options: bool,

    /// Path to markdown file (- for stdin)
    #[arg(value_name = "FILE", default_value = "-")]
    path: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.list_options {
        return print_registry();
    }

    let load = match &cli.config {
        Some(path) => LoadOptions::default().with_override_path(path),
        None => LoadOptions::default(),
    };
    let mut overrides = RenderConfig::load(load)
        .context("failed to load configuration")?
        .overrides;

    if let Some(flavor) = &cli.flavor {
        overrides.flavor = Some(flavor.parse::<Flavor>()?);
    }

    for pair in &cli.set {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("--set expects KEY=VALUE, got '{pair}'"))?;
        overrides.set(key, value)?;
    }

    let options = resolve(&overrides)?;

    if cli.show_options {
        let rendered = serde_json::to_string_pretty(&options)?;
        return emit(&rendered);
    }

    let markdown = read_document(&cli.path)
        .with_context(|| format!("unable to read markdown from {}", cli.path.display()))?;

    let html = Converter::new(options).make_html(&markdown)?;

    match &cli.output {
        Some(path) => fs::write(path, html.as_bytes())
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => emit(&html)?,
    }

    Ok(())
}

fn read_document(path: &PathBuf) -> Result<String> {
    if path == &PathBuf::from("-") {
        let mut buffer = String::new();
        io::stdin()
            .lock()
            .read_to_string(&mut buffer)
            .context("failed to read stdin")?;
        Ok(buffer)
    } else {
        let contents = fs::read_to_string(path)?;
        Ok(contents)
    }
}

fn print_registry() -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    for spec in OPTIONS {
        let line = format!(
            "{} ({}, default: {})\n    {}",
            spec.name,
            spec.kind.as_str(),
            spec.default,
            spec.help
        );
        match writeln!(handle, "{line}") {
            Ok(()) => {}
            Err(err) if should_ignore_pipe_error(&err) => return Ok(()),
            Err(err) => bail!("failed to print option listing: {err}"),
        }
    }

    Ok(())
}

fn emit(content: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match writeln!(handle, "{content}") {
        Ok(()) => {}
        Err(err) if should_ignore_pipe_error(&err) => return Ok(()),
        Err(err) => return Err(err).context("failed to write output"),
    }

    match handle.flush() {
        Ok(()) => Ok(()),
        Err(err) if should_ignore_pipe_error(&err) => Ok(()),
        Err(err) => Err(err).context("failed to flush stdout"),
    }
}

fn should_ignore_pipe_error(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::BrokenPipe | io::ErrorKind::WouldBlock
    )
}
