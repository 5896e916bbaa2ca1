//! Foundry artifact discovery.
//!
//! Optionally runs `forge build`, then walks the build directory and parses
//! every JSON output whose path matches the include patterns and none of the
//! exclude patterns.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use hookgen_core::{Artifact, Error, FoundryOptions, Result};
use walkdir::WalkDir;

/// Build directory used when neither the options nor `foundry.toml` name one.
const DEFAULT_OUT_DIR: &str = "out";

/// Foundry writes compiler metadata here; it holds no contract ABIs.
const BUILD_INFO_DIR: &str = "build-info";

/// Locates contract artifacts for one Foundry project.
pub struct ArtifactLocator<'a> {
    options: &'a FoundryOptions,
}

impl<'a> ArtifactLocator<'a> {
    pub fn new(options: &'a FoundryOptions) -> Self {
        Self { options }
    }

    /// Build (if configured), enumerate, filter and parse artifacts.
    ///
    /// Artifacts come back sorted by contract name.
    pub fn locate(&self) -> Result<Vec<Artifact>> {
        if self.options.forge.build {
            self.build()?;
        }

        let out_dir = self.artifacts_dir()?;
        if !out_dir.is_dir() {
            return Err(Error::NotFound(format!(
                "build directory {} does not exist",
                out_dir.display()
            )));
        }

        let include = compile_patterns(&self.options.include)?;
        let exclude = compile_patterns(&self.options.exclude)?;

        let mut artifacts: BTreeMap<String, Artifact> = BTreeMap::new();
        let walker = WalkDir::new(&out_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !(e.file_type().is_dir() && e.file_name() == BUILD_INFO_DIR));

        for entry in walker {
            let entry = entry.map_err(|e| Error::Io(e.into()))?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().map(|ext| ext != "json").unwrap_or(true)
            {
                continue;
            }

            let relative = path.strip_prefix(&out_dir).unwrap_or(path);
            if !include.is_match(relative) || exclude.is_match(relative) {
                continue;
            }

            let Some(artifact) = self.load(path, relative)? else {
                continue;
            };

            if let Some(existing) = artifacts.get(&artifact.name) {
                return Err(Error::Parse {
                    path: relative.to_path_buf(),
                    message: format!(
                        "contract `{}` is also defined by {}",
                        artifact.name,
                        existing.source.display()
                    ),
                });
            }
            artifacts.insert(artifact.name.clone(), artifact);
        }

        if artifacts.is_empty() {
            return Err(Error::NotFound(format!(
                "no artifacts in {} matched include {:?}",
                out_dir.display(),
                self.options.include
            )));
        }

        tracing::info!(count = artifacts.len(), dir = %out_dir.display(), "Located artifacts");
        Ok(artifacts.into_values().collect())
    }

    /// Parse one output file. Returns `None` for contracts without an ABI.
    fn load(&self, path: &Path, relative: &Path) -> Result<Option<Artifact>> {
        let content = std::fs::read(path)
            .map_err(|e| e.to_string())
            .and_then(|bytes| String::from_utf8(bytes).map_err(|e| e.to_string()))
            .map_err(|message| Error::Parse {
                path: relative.to_path_buf(),
                message,
            })?;
        let contract = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| Error::Parse {
                path: relative.to_path_buf(),
                message: "file name is not valid UTF-8".into(),
            })?;

        let name = match &self.options.name_prefix {
            Some(prefix) => format!("{}{}", prefix, contract),
            None => contract.to_string(),
        };

        let mut artifact = Artifact::from_json(name, relative, &content)?;
        if artifact.abi.is_empty() {
            tracing::debug!(file = %relative.display(), "Skipping artifact with empty ABI");
            return Ok(None);
        }

        if let Some(chains) = self.options.deployments.get(contract) {
            for (chain_id, address) in chains {
                let chain_id = chain_id.parse::<u64>().map_err(|_| {
                    Error::Config(format!("non-numeric chain id `{}`", chain_id))
                })?;
                artifact.deployments.insert(chain_id, address.clone());
            }
        }

        tracing::debug!(contract = %artifact.name, file = %relative.display(), "Loaded artifact");
        Ok(Some(artifact))
    }

    /// Resolve the build directory: explicit option, then `foundry.toml`, then `out`.
    pub fn artifacts_dir(&self) -> Result<PathBuf> {
        let project = &self.options.project;
        if let Some(dir) = &self.options.artifacts {
            return Ok(project.join(dir));
        }

        let foundry_toml = project.join("foundry.toml");
        if foundry_toml.is_file() {
            let content = std::fs::read_to_string(&foundry_toml)?;
            let value: toml::Value = toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse {}: {}", foundry_toml.display(), e))
            })?;

            let out = value
                .get("profile")
                .and_then(|p| p.get("default"))
                .and_then(|d| d.get("out"))
                .and_then(|o| o.as_str());
            if let Some(out) = out {
                return Ok(project.join(out));
            }
        }

        Ok(project.join(DEFAULT_OUT_DIR))
    }

    /// Run `forge clean` (if configured) and `forge build` in the project root.
    fn build(&self) -> Result<()> {
        if self.options.forge.clean {
            self.run_forge(&["clean"])?;
        }
        self.run_forge(&["build"])
    }

    fn run_forge(&self, args: &[&str]) -> Result<()> {
        let forge = &self.options.forge.path;
        let command = format!("{} {}", forge, args.join(" "));

        let program = which::which(forge).map_err(|e| Error::Build {
            command: command.clone(),
            reason: format!("executable not found: {}", e),
        })?;

        tracing::info!(command = %command, project = %self.options.project.display(), "Running build");
        let output = Command::new(program)
            .args(args)
            .current_dir(&self.options.project)
            .output()
            .map_err(|e| Error::Build {
                command: command.clone(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Build {
                command,
                reason: format!("exited with {}: {}", output.status, stderr.trim()),
            });
        }

        Ok(())
    }
}

/// Compile patterns matched at any depth below the build directory.
///
/// `*` stays within one path component; only `**` crosses directories.
fn compile_patterns(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let anchored = if pat.starts_with("**/") {
            pat.clone()
        } else {
            format!("**/{}", pat)
        };
        let glob = GlobBuilder::new(&anchored)
            .literal_separator(true)
            .build()
            .map_err(|e| Error::Config(format!("Invalid glob pattern `{}`: {}", pat, e)))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| Error::Config(format!("Invalid glob patterns: {}", e)))
}
