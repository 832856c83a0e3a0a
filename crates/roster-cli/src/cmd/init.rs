use anyhow::Context;
use roster_core::{config::Config, paths, store::YamlStore};
use std::path::Path;

pub fn run(root: &Path, company: &str, name: Option<&str>) -> anyhow::Result<()> {
    paths::validate_company_id(company)?;

    println!("Initializing roster in: {}", root.display());

    let config_path = paths::config_path(root);
    let config = if config_path.exists() {
        let existing = Config::load(root).context("failed to load config")?;
        if existing.company.id != company {
            anyhow::bail!(
                "workspace is already initialized for company '{}'",
                existing.company.id
            );
        }
        println!("  exists:  .roster/config.yaml");
        existing
    } else {
        let mut cfg = Config::new(company);
        cfg.company.name = name.map(str::to_string);
        cfg.save(root).context("failed to write config.yaml")?;
        println!("  created: .roster/config.yaml");
        cfg
    };

    let store = YamlStore::new(root);
    let projects = paths::projects_path(root, &config.company.id);
    let employees = paths::employees_path(root, &config.company.id);
    let had_projects = projects.exists();
    let had_employees = employees.exists();
    store
        .init_company(&config.company.id)
        .context("failed to create company data files")?;
    report(root, &projects, had_projects);
    report(root, &employees, had_employees);

    println!("\nroster initialized for company '{}'.", config.company.id);
    Ok(())
}

fn report(root: &Path, path: &Path, existed: bool) {
    let rel = path.strip_prefix(root).unwrap_or(path);
    if existed {
        println!("  exists:  {}", rel.display());
    } else {
        println!("  created: {}", rel.display());
    }
}
