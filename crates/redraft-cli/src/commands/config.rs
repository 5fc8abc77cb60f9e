//! Config command handlers

use anyhow::{bail, Context, Result};

use redraft_core::Config;

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
                    "site_name": config.site_name,
                    "auto_schema": config.auto_schema,
                    "accepted_entities": config.accepted_entities,
                    "scorer_url": config.scorer_url,
                    "schema_generator_url": config.schema_generator_url,
                    "schema_validator_url": config.schema_validator_url,
                    "publisher_url": config.publisher_url,
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            println!("Configuration:");
            println!("  data_dir:             {}", config.data_dir.display());
            println!(
                "  site_name:            {}",
                config.site_name.as_deref().unwrap_or("(not set)")
            );
            println!("  auto_schema:          {}", config.auto_schema);
            println!(
                "  accepted_entities:    {}",
                config.accepted_entities.join(", ")
            );
            println!(
                "  scorer_url:           {}",
                config.scorer_url.as_deref().unwrap_or("(not set)")
            );
            println!(
                "  schema_generator_url: {}",
                config.schema_generator_url.as_deref().unwrap_or("(not set)")
            );
            println!(
                "  schema_validator_url: {}",
                config.schema_validator_url.as_deref().unwrap_or("(not set)")
            );
            println!(
                "  publisher_url:        {}",
                config.publisher_url.as_deref().unwrap_or("(not set)")
            );
            println!();
            println!("Config file: {}", Config::config_file_path().display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(key: String, value: String, output: &Output) -> Result<()> {
    let mut config = Config::load().context("Failed to load configuration")?;

    fn optional(value: &str) -> Option<String> {
        if value.is_empty() || value == "none" {
            None
        } else {
            Some(value.to_string())
        }
    }

    match key.as_str() {
        "data_dir" => {
            config.data_dir = value.clone().into();
        }
        "site_name" => {
            config.site_name = optional(&value);
        }
        "auto_schema" => {
            config.auto_schema = value
                .parse()
                .context("Invalid value for auto_schema. Use 'true' or 'false'.")?;
        }
        "accepted_entities" => {
            config.accepted_entities = value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
        "scorer_url" => {
            config.scorer_url = optional(&value);
        }
        "schema_generator_url" => {
            config.schema_generator_url = optional(&value);
        }
        "schema_validator_url" => {
            config.schema_validator_url = optional(&value);
        }
        "publisher_url" => {
            config.publisher_url = optional(&value);
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, site_name, auto_schema, accepted_entities,\n\
                 scorer_url, schema_generator_url, schema_validator_url, publisher_url",
                key
            );
        }
    }

    config.save().context("Failed to save configuration")?;
    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}
