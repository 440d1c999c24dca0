//! Config command

use std::path::Path;

use anyhow::Result;
use fintant_core::config::default_config_path;

use super::load_config;

pub fn cmd_config(config_path: Option<&Path>) -> Result<()> {
    let (config, source) = load_config(config_path)?;

    println!("⚙️  Planner configuration");
    println!("   Source: {}", source);
    if config_path.is_none() {
        if let Some(path) = default_config_path() {
            println!("   Override path: {}", path.display());
        }
    }
    println!();
    print!("{}", config.to_toml()?);
    Ok(())
}
