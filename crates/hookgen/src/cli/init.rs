use anyhow::Result;
use clap::Parser;
use console::style;
use hookgen_core::config::CONFIG_FILE_NAME;
use std::fs;
use std::path::Path;

/// Create a configuration file in the current directory.
#[derive(Parser)]
pub struct InitCommand {
    /// Where generated bindings are written.
    #[arg(short, long, default_value = "src/generated.ts")]
    pub out: String,

    /// Overwrite an existing configuration file.
    #[arg(long)]
    pub force: bool,
}

impl InitCommand {
    /// Execute the init command.
    pub fn execute(self) -> Result<()> {
        let current_dir = std::env::current_dir()?;
        let path = write_config(&current_dir, &self.out, self.force)?;

        println!(
            "{} Created {}. Run {} to generate bindings.",
            style("✓").green(),
            style(path.display()).cyan(),
            style("hookgen generate").cyan()
        );
        Ok(())
    }
}

/// Write the starter config into `dir`.
fn write_config(dir: &Path, out: &str, force: bool) -> Result<std::path::PathBuf> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite it.",
            path.display()
        );
    }

    fs::write(&path, template(out))?;
    Ok(path)
}

fn template(out: &str) -> String {
    let out = toml::Value::String(out.to_string());
    format!(
        r#"# Bindings are written here. Relative paths resolve against this file.
out = {out}

# Plugins run in the order they are declared.

[[plugins]]
kind = "foundry"
project = "."
include = ["*.json"]

[plugins.forge]
build = true
clean = false

[[plugins]]
kind = "react"
use_contract_event = true
use_contract = true
use_contract_item_event = true
"#
    )
}
