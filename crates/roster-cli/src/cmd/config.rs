use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use roster_core::config::{Config, WarnLevel};
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the effective configuration
    Show,

    /// Validate the config for common mistakes
    Validate,
}

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(root, json),
        ConfigSubcommand::Validate => validate(root, json),
    }
}

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    if json {
        return print_json(&config);
    }
    println!("Company:        {}", config.company.id);
    if let Some(name) = &config.company.name {
        println!("Name:           {name}");
    }
    println!("Close delay:    {}ms", config.session.close_delay_ms);
    println!("Default photo:  {}", config.default_photo_url);
    println!("Project types:  {}", config.role_catalog.sets().len());
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

/// Lint the role catalog and session settings. Errors fail the command;
/// warnings are printed but leave the exit status at zero.
fn validate(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let (errors, warnings): (Vec<_>, Vec<_>) = config
        .validate()
        .into_iter()
        .partition(|w| w.level == WarnLevel::Error);

    if json {
        print_json(&serde_json::json!({
            "company": config.company.id,
            "valid": errors.is_empty(),
            "errors": errors,
            "warnings": warnings,
        }))?;
    } else if errors.is_empty() && warnings.is_empty() {
        println!(
            "Config for '{}' is valid: {} project types, no warnings.",
            config.company.id,
            config.role_catalog.sets().len()
        );
    } else {
        for e in &errors {
            println!("[error] {}", e.message);
        }
        for w in &warnings {
            println!("[warning] {}", w.message);
        }
    }

    if !errors.is_empty() {
        anyhow::bail!("config has {} error(s)", errors.len());
    }
    Ok(())
}
