use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use roster_core::{config::Config, store::YamlStore};
use std::path::Path;

#[derive(Subcommand)]
pub enum EmployeeSubcommand {
    /// List every employee in the company directory
    List,
}

pub fn run(root: &Path, subcmd: EmployeeSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        EmployeeSubcommand::List => list(root, json),
    }
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let employees = YamlStore::new(root)
        .load_employees(&config.company.id)
        .context("failed to load employees")?;

    if json {
        return print_json(&employees);
    }

    if employees.is_empty() {
        println!("No employees.");
        return Ok(());
    }

    let rows = employees
        .iter()
        .map(|e| vec![e.email.clone(), e.name.clone(), e.designation.clone()])
        .collect();
    print_table(&["EMAIL", "NAME", "DESIGNATION"], rows);
    Ok(())
}
