use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use hookgen_codegen::Pipeline;
use hookgen_core::config::CONFIG_FILE_NAME;
use hookgen_core::{Config, PluginConfig};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Generate bindings from the configuration file.
#[derive(Parser)]
pub struct GenerateCommand {
    /// Configuration file path.
    #[arg(short, long, default_value = CONFIG_FILE_NAME)]
    pub config: String,

    /// Directory relative paths resolve against (defaults to the config file's directory).
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Skip `forge build` even when the config enables it.
    #[arg(long)]
    pub no_build: bool,

    /// Print the generated module instead of writing it.
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateCommand {
    /// Execute the generate command.
    pub fn execute(self) -> Result<()> {
        let config = self.load_config()?;

        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Locating artifacts and generating bindings...");

        let mut pipeline = Pipeline::new(config);

        if self.dry_run {
            let module = pipeline.generate();
            pb.finish_and_clear();
            print!("{}", module?.render());
            return Ok(());
        }

        let result = pipeline.run();
        pb.finish_and_clear();
        let summary = result?;

        println!();
        println!(
            "  {} Generated {} bindings for {} contracts",
            style("✓").green(),
            style(summary.bindings).cyan(),
            style(summary.contracts.len()).cyan()
        );
        for contract in &summary.contracts {
            println!("    - {}", contract);
        }
        println!(
            "  {} Output: {} ({} bytes)",
            style("→").dim(),
            style(summary.output_path.display()).cyan(),
            summary.bytes
        );
        println!();

        Ok(())
    }

    /// Read the config file and resolve it against the root directory.
    fn load_config(&self) -> Result<Config> {
        let config_path = Path::new(&self.config);
        if !config_path.exists() {
            anyhow::bail!(
                "Configuration file not found: {}\nRun `hookgen init` to create one.",
                self.config
            );
        }

        tracing::info!("Loading configuration from {}", self.config);
        let config = Config::from_file(config_path)
            .with_context(|| format!("Invalid configuration in {}", self.config))?;

        let base = match &self.root {
            Some(root) => root.clone(),
            None => config_dir(config_path),
        };
        let mut config = config.resolve_paths(&base);

        if self.no_build {
            for plugin in &mut config.plugins {
                if let PluginConfig::Foundry(options) = plugin {
                    options.forge.build = false;
                }
            }
        }

        Ok(config)
    }
}

fn config_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
