//! Command-line interface for factspan.
//!
//! With no subcommand, reads a transcript from stdin and writes the
//! converted document to stdout. Subcommands add file I/O, validation,
//! human-readable inspection and config display.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::config::{self, OutputFormat, ResolvedConfig};
use crate::core::{hash_input, Pipeline};
use crate::domain::Document;

pub mod inspect;

/// factspan - Evidence-anchored fact documents from annotated transcripts
#[derive(Parser, Debug)]
#[command(name = "factspan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a transcript into a document
    Convert {
        /// Input file (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (writes to stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (overrides config)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Validate a transcript and print a summary
    Check {
        /// Input file (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Print facts alongside the chunks that prove them
    Show {
        /// Input file (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let config = config::config()?;

        match self.command {
            None => convert(config, None, None, None, false).await,
            Some(Commands::Convert {
                input,
                output,
                format,
                pretty,
            }) => convert(config, input.as_deref(), output.as_deref(), format, pretty).await,
            Some(Commands::Check { input }) => check(config, input.as_deref()).await,
            Some(Commands::Show { input }) => show(config, input.as_deref()).await,
            Some(Commands::Config) => {
                show_config(config);
                Ok(())
            }
        }
    }
}

/// Read the whole transcript from a file or stdin
async fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read input file: {}", path.display())),
        None => {
            let mut buffer = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buffer)
                .await
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}

/// Run the pipeline over the input, attaching the source to any failure
async fn load_document(config: &ResolvedConfig, input: Option<&Path>) -> Result<(String, Document)> {
    let text = read_input(input).await?;
    let source = input
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<stdin>".to_string());

    let document = Pipeline::new(config.limits.clone())
        .run(&text)
        .with_context(|| format!("Failed to convert transcript: {}", source))?;

    Ok((text, document))
}

/// Serialize a document in the requested format
pub fn render(document: &Document, format: OutputFormat, pretty: bool) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut json = document
                .to_json(pretty)
                .context("Failed to serialize document as JSON")?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Yaml => document
            .to_yaml()
            .context("Failed to serialize document as YAML"),
    }
}

async fn convert(
    config: &ResolvedConfig,
    input: Option<&Path>,
    output: Option<&Path>,
    format: Option<OutputFormat>,
    pretty: bool,
) -> Result<()> {
    let (_, document) = load_document(config, input).await?;
    let rendered = render(
        &document,
        format.unwrap_or(config.format),
        pretty || config.pretty,
    )?;

    match output {
        Some(path) => tokio::fs::write(path, rendered)
            .await
            .with_context(|| format!("Failed to write output file: {}", path.display())),
        None => {
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(rendered.as_bytes())
                .await
                .context("Failed to write stdout")?;
            stdout.flush().await.context("Failed to flush stdout")
        }
    }
}

async fn check(config: &ResolvedConfig, input: Option<&Path>) -> Result<()> {
    let (text, document) = load_document(config, input).await?;
    print!("{}", inspect::render_summary(&document, &hash_input(&text)));
    Ok(())
}

async fn show(config: &ResolvedConfig, input: Option<&Path>) -> Result<()> {
    let (_, document) = load_document(config, input).await?;
    print!("{}", inspect::render_document(&document));
    Ok(())
}

fn show_config(config: &ResolvedConfig) {
    println!("factspan configuration:");
    println!();
    println!("  format:          {}", config.format);
    println!("  pretty:          {}", config.pretty);
    println!("  max_input_bytes: {}", config.limits.max_input_bytes);
    println!("  max_utterances:  {}", config.limits.max_utterances);
    println!();
    match &config.config_file {
        Some(path) => println!("  config file:     {}", path.display()),
        None => println!("  config file:     (none, using defaults)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_json_and_yaml() {
        let document = crate::core::convert("alice: hi there\n- quote(hi)\n").unwrap();

        let json = render(&document, OutputFormat::Json, false).unwrap();
        assert!(json.starts_with("[{\"speaker\":\"alice\""));
        assert!(json.ends_with('\n'));

        let yaml = render(&document, OutputFormat::Yaml, false).unwrap();
        assert!(yaml.contains("speaker: alice"));
    }

    #[test]
    fn test_cli_parses_default_and_subcommands() {
        let cli = Cli::try_parse_from(["factspan"]).unwrap();
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["factspan", "convert", "-f", "yaml", "--pretty"]).unwrap();
        match cli.command {
            Some(Commands::Convert { format, pretty, .. }) => {
                assert_eq!(format, Some(OutputFormat::Yaml));
                assert!(pretty);
            }
            other => panic!("Expected convert, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_convert_file_to_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let input = temp.path().join("talk.txt");
        let output = temp.path().join("talk.json");
        tokio::fs::write(&input, "bob: it rains\n- claim(weather) quote(rains)\n")
            .await
            .unwrap();

        convert(
            &ResolvedConfig::default(),
            Some(input.as_path()),
            Some(output.as_path()),
            None,
            false,
        )
        .await
        .unwrap();

        let written = tokio::fs::read_to_string(&output).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value[0]["speaker"], "bob");
        assert_eq!(value[0]["facts"][0]["claim"], "weather");
    }

    #[tokio::test]
    async fn test_convert_failure_writes_nothing() {
        let temp = tempfile::TempDir::new().unwrap();
        let input = temp.path().join("bad.txt");
        let output = temp.path().join("bad.json");
        tokio::fs::write(&input, "bob: hi\n- quote(missing)\n")
            .await
            .unwrap();

        let result = convert(
            &ResolvedConfig::default(),
            Some(input.as_path()),
            Some(output.as_path()),
            None,
            false,
        )
        .await;

        assert!(result.is_err());
        assert!(!output.exists());
    }
}
