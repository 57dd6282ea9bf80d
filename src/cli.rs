//! Command-line argument parsing and output for the outline tool
//!
//! Supports:
//! - Printing the outline of a file as an indented tree or JSON
//! - Using a JSON symbol dump instead of the built-in parser
//! - Watch mode, republishing on every save

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use crate::config::OutlineConfig;
use crate::language;
use crate::outline::{render_tree, BufferId, OutlineSnapshot};
use crate::sink::PresentationSink;

/// Language identifier used when none is given or detected
pub const FALLBACK_LANGUAGE: &str = "plaintext";

/// Print the structure outline of a source file
#[derive(Parser, Debug)]
#[command(
    name = "structure-outline",
    version,
    about = "Print the structure outline of a source file"
)]
pub struct CliArgs {
    /// File to outline
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Language identifier (detected from the extension if omitted)
    #[arg(short, long, value_name = "ID")]
    pub language: Option<String>,

    /// JSON file with document symbols to use instead of the built-in parser
    #[arg(long, value_name = "JSON")]
    pub symbols: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Tree)]
    pub format: OutputFormat,

    /// Config file (defaults to ~/.config/structure-outline/config.yaml)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Keep running and print the outline again whenever the file changes
    #[arg(short, long)]
    pub watch: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Tree,
    Json,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub file: PathBuf,
    pub buffer: BufferId,
    pub language: String,
    pub symbols: Option<PathBuf>,
    pub format: OutputFormat,
    pub outline: OutlineConfig,
    pub watch: bool,
}

impl CliArgs {
    /// Resolve the language and load configuration
    pub fn into_config(self) -> Result<StartupConfig> {
        let language = match self.language {
            Some(language) => language,
            None => match language::from_path(&self.file) {
                Some(detected) => detected.to_string(),
                None => {
                    tracing::warn!(
                        "Cannot detect language of {}, outline will be empty",
                        self.file.display()
                    );
                    FALLBACK_LANGUAGE.to_string()
                }
            },
        };

        let outline = match &self.config {
            Some(path) => OutlineConfig::load_from(path)?,
            None => OutlineConfig::load(),
        };

        Ok(StartupConfig {
            buffer: BufferId::new(self.file.display().to_string()),
            file: self.file,
            language,
            symbols: self.symbols,
            format: self.format,
            outline,
            watch: self.watch,
        })
    }
}

impl StartupConfig {
    pub fn read_file(&self) -> Result<String> {
        std::fs::read_to_string(&self.file)
            .with_context(|| format!("Failed to read {}", self.file.display()))
    }
}

/// Sink that writes each published outline to a writer
pub struct PrintSink<W: Write> {
    out: W,
    format: OutputFormat,
    published: usize,
}

impl<W: Write> PrintSink<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self {
            out,
            format,
            published: 0,
        }
    }

    /// Number of outlines written
    pub fn published(&self) -> usize {
        self.published
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, snapshot: &OutlineSnapshot) -> Result<()> {
        match self.format {
            OutputFormat::Tree => {
                if self.published > 0 {
                    writeln!(
                        self.out,
                        "-- {} (generation {}) --",
                        snapshot.buffer, snapshot.generation
                    )?;
                }
                if snapshot.is_empty() {
                    writeln!(self.out, "(no structure)")?;
                } else {
                    self.out.write_all(render_tree(&snapshot.roots).as_bytes())?;
                }
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut self.out, snapshot)
                    .context("Failed to serialize outline")?;
                writeln!(self.out)?;
            }
        }
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> PresentationSink for PrintSink<W> {
    fn publish(&mut self, snapshot: &OutlineSnapshot) {
        match self.write(snapshot) {
            Ok(()) => self.published += 1,
            Err(e) => tracing::warn!("Failed to print outline: {:#}", e),
        }
    }
}
