//! Config command handlers

use anyhow::{bail, Context, Result};

use scrawl_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(output: &Output) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "default_limit": config.default_limit,
                    "show_totals": config.show_totals
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            println!("Configuration:");
            println!("  data_dir:      {}", config.data_dir.display());
            println!("  default_limit: {}", config.default_limit);
            println!("  show_totals:   {}", config.show_totals);
            println!();
            println!("Config file: {}", Config::config_file_path().display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(key: String, value: String, output: &Output) -> Result<()> {
    let mut config = Config::load().context("Failed to load configuration")?;

    match key.as_str() {
        "data_dir" => {
            config.data_dir = value.clone().into();
        }
        "default_limit" => {
            let limit: u32 = value
                .parse()
                .context("Invalid value for default_limit. Use a positive integer.")?;
            if limit == 0 {
                bail!("default_limit must be at least 1");
            }
            config.default_limit = limit;
        }
        "show_totals" => {
            config.show_totals = value
                .parse()
                .context("Invalid value for show_totals. Use 'true' or 'false'.")?;
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, default_limit, show_totals",
                key
            );
        }
    }

    config.save().context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}
