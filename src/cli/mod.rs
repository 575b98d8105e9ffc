use clap::Parser;
use colored::Colorize;
use eyre::Result;
use log::info;
use std::path::PathBuf;

use crate::cfg::config::ConfigSpec;
use crate::completion::{FishGenerator, PreambleCommands, build_script};
use crate::loader::{TreeLoader, TreeSource};
use crate::output::{default_output_path, resolve_output_path, write_script};
use crate::ports::fs::FileSystem;
use crate::ports::http::SdkFetcher;

/// Generate fish completions for gcloud
#[derive(Debug, Clone, Parser)]
#[command(name = "fgc", version, about)]
pub struct Cli {
    /// gcloud SDK archive (.tar.gz); skips the download
    #[arg(short = 'f', long, value_name = "ARCHIVE", conflicts_with = "tree")]
    pub sdk: Option<PathBuf>,

    /// Command tree document (JSON or YAML); skips the SDK archive entirely
    #[arg(short, long, value_name = "DOC")]
    pub tree: Option<PathBuf>,

    /// Output file, or a directory to write gcloud.fish into
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Subset of commands for which to generate completions
    #[arg(short, long, num_args = 1.., value_name = "COMMAND")]
    pub subset: Option<Vec<String>>,

    /// Config file (default: <config dir>/fgc/fgc.yml)
    #[arg(short, long, env = "FGC_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Program the completions are registered for
    #[arg(long)]
    pub program: Option<String>,

    /// Top-level commands offered by the preamble when --subset is given
    #[arg(long, value_enum)]
    pub preamble_commands: Option<PreambleCommands>,

    /// Print the script instead of writing it
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,
}

impl Cli {
    pub fn tree_source(&self) -> TreeSource {
        match (&self.tree, &self.sdk) {
            (Some(doc), _) => TreeSource::Document(doc.clone()),
            (None, Some(archive)) => TreeSource::Archive(archive.clone()),
            (None, None) => TreeSource::Remote,
        }
    }

    /// Command-line values take precedence over the config file.
    pub fn apply_overrides(&self, mut config: ConfigSpec) -> ConfigSpec {
        if let Some(ref program) = self.program {
            config.program = program.clone();
        }
        if let Some(preamble) = self.preamble_commands {
            config.preamble_commands = preamble;
        }
        config
    }

    /// Loads the tree, renders the script and writes it. Returns the written
    /// path, or `None` when printing to stdout.
    pub async fn execute<F, S>(&self, config: &ConfigSpec, fetcher: F, fs: &S) -> Result<Option<PathBuf>>
    where
        F: SdkFetcher,
        S: FileSystem,
    {
        let loader = TreeLoader::new(fetcher, config.source.clone());
        let tree = loader.load(&self.tree_source(), fs).await?;

        let generator = FishGenerator::new(config.program.clone());
        let script = build_script(&generator, &tree, self.subset.as_deref(), config.preamble_commands);

        if self.stdout {
            print!("{}", script);
            return Ok(None);
        }

        let path = match self.output {
            Some(ref requested) => resolve_output_path(fs, requested, &config.output.file_name).await?,
            None => default_output_path(fs, &config.default_output_dir()?, &config.output.file_name).await?,
        };
        write_script(fs, &path, &script).await?;

        info!("Done");
        eprintln!("{} Wrote {}", "✓".green(), path.display());
        Ok(Some(path))
    }
}
