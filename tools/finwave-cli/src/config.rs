//! Config command - print the effective configuration

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use finwave_core::FinwaveConfig;

/// Arguments for the config command
#[derive(Args)]
pub struct ConfigArgs {
    /// Configuration file to load (defaults are printed when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Execute the config command
pub fn execute(args: ConfigArgs) -> Result<()> {
    let config = load(args.config.as_deref())?;
    config.validate().context("Configuration is invalid")?;
    print!("{}", config.to_toml_string()?);
    Ok(())
}

/// Load `path` if given, otherwise the built-in defaults
pub fn load(path: Option<&Path>) -> Result<FinwaveConfig> {
    match path {
        Some(path) => FinwaveConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(FinwaveConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_defaults_without_path() {
        assert_eq!(load(None).unwrap(), FinwaveConfig::default());
    }

    #[test]
    fn test_load_file_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fish.toml");
        std::fs::write(&path, "[swim]\nswim_frequency = 3.0\n").unwrap();
        let config = load(Some(&path)).unwrap();
        assert_eq!(config.swim.swim_frequency, 3.0);
    }

    #[test]
    fn test_load_missing_file_has_context() {
        let err = load(Some(Path::new("/nonexistent/fish.toml"))).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to load config"));
    }
}
