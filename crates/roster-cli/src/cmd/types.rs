use crate::output::{print_json, print_table};
use anyhow::Context;
use roster_core::config::Config;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let sets = config.role_catalog.sets();

    if json {
        return print_json(&sets);
    }

    if sets.is_empty() {
        println!("No project types configured.");
        return Ok(());
    }

    let rows = sets
        .iter()
        .map(|s| vec![s.project_type.clone(), s.roles.join(", ")])
        .collect();
    print_table(&["TYPE", "ROLES"], rows);
    Ok(())
}
