use crate::cmd::{block_on, load_board};
use crate::output::{or_dash, print_json, print_table};
use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use roster_core::config::Config;
use roster_core::project::{DirectoryLookup, Project, Viewer, UNASSIGNED};
use roster_core::roster::Toggled;
use roster_core::session::SubmitOutcome;
use roster_core::{ProjectBoard, RosterError};
use serde::Serialize;
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ProjectSubcommand {
    /// List the projects visible to the acting user, one page at a time
    List {
        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Show a project with its team
    Show {
        /// Project id
        id: String,
    },

    /// Edit a project and submit the change
    Edit(EditArgs),
}

#[derive(Args)]
pub struct EditArgs {
    /// Project id
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    /// Project type; pass an empty string to clear it
    #[arg(long = "type", value_name = "TYPE")]
    pub project_type: Option<String>,

    /// Start date (YYYY-MM-DD)
    #[arg(long, conflicts_with = "no_start")]
    pub start: Option<NaiveDate>,

    /// End date (YYYY-MM-DD)
    #[arg(long, conflicts_with = "no_end")]
    pub end: Option<NaiveDate>,

    /// Clear the start date
    #[arg(long)]
    pub no_start: bool,

    /// Clear the end date
    #[arg(long)]
    pub no_end: bool,

    #[arg(long)]
    pub description: Option<String>,

    /// Add the member if absent, remove if present (repeatable)
    #[arg(long = "toggle", value_name = "EMAIL", value_parser = parse_email)]
    pub toggles: Vec<String>,

    /// Assign a role to a team member (repeatable)
    #[arg(long = "role", value_name = "EMAIL=ROLE", value_parser = parse_role)]
    pub roles: Vec<(String, String)>,
}

fn parse_email(s: &str) -> Result<String, String> {
    let email = s.trim();
    if email.is_empty() {
        return Err("email must not be blank".to_string());
    }
    Ok(email.to_string())
}

fn parse_role(s: &str) -> Result<(String, String), String> {
    let (email, role) = s
        .split_once('=')
        .ok_or_else(|| format!("expected EMAIL=ROLE, got '{s}'"))?;
    if email.trim().is_empty() || role.trim().is_empty() {
        return Err(format!("expected EMAIL=ROLE, got '{s}'"));
    }
    Ok((email.trim().to_string(), role.trim().to_string()))
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn run(
    root: &Path,
    viewer: &Viewer,
    subcmd: ProjectSubcommand,
    json: bool,
) -> anyhow::Result<()> {
    match subcmd {
        ProjectSubcommand::List { page } => list(root, viewer, page, json),
        ProjectSubcommand::Show { id } => show(root, viewer, &id, json),
        ProjectSubcommand::Edit(args) => edit(root, viewer, args, json),
    }
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectCard<'a> {
    id: &'a str,
    title: &'a str,
    #[serde(rename = "type")]
    project_type: &'a str,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    leads: Vec<&'a str>,
    task_count: usize,
}

impl<'a> From<&'a Project> for ProjectCard<'a> {
    fn from(p: &'a Project) -> Self {
        Self {
            id: &p.id,
            title: &p.title,
            project_type: &p.project_type,
            start_date: p.start_date,
            end_date: p.end_date,
            leads: p.preview_leads(),
            task_count: p.task_count(),
        }
    }
}

fn list(root: &Path, viewer: &Viewer, page: usize, json: bool) -> anyhow::Result<()> {
    let (mut board, _store) = load_board(root, viewer)?;
    if !board.goto_page(page) {
        eprintln!(
            "note: page {page} is out of range (1-{}); showing page {}",
            board.total_pages().max(1),
            board.page_state().current_page()
        );
    }

    let cards: Vec<ProjectCard<'_>> = board.visible().iter().map(ProjectCard::from).collect();

    if json {
        let value = serde_json::json!({
            "page": board.page_state().current_page(),
            "totalPages": board.total_pages(),
            "totalProjects": board.projects().len(),
            "projects": cards,
        });
        return print_json(&value);
    }

    if cards.is_empty() {
        println!("No projects.");
        return Ok(());
    }

    let rows = cards
        .iter()
        .map(|c| {
            vec![
                c.id.to_string(),
                c.title.to_string(),
                c.project_type.to_string(),
                or_dash(c.start_date),
                or_dash(c.end_date),
                c.leads.join(", "),
                c.task_count.to_string(),
            ]
        })
        .collect();
    print_table(&["ID", "TITLE", "TYPE", "START", "END", "LEADS", "TASKS"], rows);
    println!(
        "\nPage {} of {}",
        board.page_state().current_page(),
        board.total_pages()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TeamRow {
    email: String,
    name: String,
    role: String,
    photo_url: String,
}

fn team_rows(board: &ProjectBoard, project: &Project, default_photo: &str) -> Vec<TeamRow> {
    let directory = board.employees();
    project
        .team_leads
        .iter()
        .filter(|a| !a.email.trim().is_empty())
        .map(|a| TeamRow {
            email: a.email.clone(),
            name: directory
                .find(&a.email)
                .map(|e| e.name.clone())
                .unwrap_or_default(),
            role: if a.role.is_empty() {
                UNASSIGNED.to_string()
            } else {
                a.role.clone()
            },
            photo_url: directory.photo_url_or(&a.email, default_photo),
        })
        .collect()
}

fn show(root: &Path, viewer: &Viewer, id: &str, json: bool) -> anyhow::Result<()> {
    let (board, _store) = load_board(root, viewer)?;
    let project = board
        .project(id)
        .ok_or_else(|| RosterError::ProjectNotFound(id.to_string()))?;
    let config = Config::load(root).context("failed to load config")?;
    let team = team_rows(&board, project, &config.default_photo_url);

    if json {
        let value = serde_json::json!({
            "project": project,
            "team": team,
            "taskCount": project.task_count(),
            "editable": viewer.can_edit(project),
        });
        return print_json(&value);
    }

    println!("Project: {}", project.title);
    println!("ID:          {}", project.id);
    println!("Type:        {}", or_dash(non_empty(&project.project_type)));
    println!("Start:       {}", or_dash(project.start_date));
    println!("End:         {}", or_dash(project.end_date));
    println!("Created by:  {}", or_dash(non_empty(&project.created_by)));
    println!("Tasks:       {}", project.task_count());
    if !project.description.is_empty() {
        println!("\n{}", project.description);
    }

    println!();
    if team.is_empty() {
        println!("No team members.");
    } else {
        let rows = team
            .into_iter()
            .map(|t| vec![t.email, t.name, t.role])
            .collect();
        print_table(&["EMAIL", "NAME", "ROLE"], rows);
    }
    Ok(())
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

// ---------------------------------------------------------------------------
// edit
// ---------------------------------------------------------------------------

fn edit(root: &Path, viewer: &Viewer, args: EditArgs, json: bool) -> anyhow::Result<()> {
    let (mut board, store) = load_board(root, viewer)?;

    if let Err(e) = board.open_edit(&args.id) {
        return Err(match board.notice() {
            Some(n) => anyhow::Error::new(e).context(format!("{}: {}", n.header, n.content)),
            None => anyhow::Error::new(e),
        });
    }

    apply_edits(&mut board, &args, json)?;

    let outcome = block_on(board.submit_edit(&store))??;
    match outcome {
        SubmitOutcome::Invalid(errors) => {
            if json {
                print_json(&serde_json::json!({ "updated": false, "errors": errors }))?;
            } else {
                for (field, message) in errors.iter() {
                    println!("[{field}] {message}");
                }
            }
            anyhow::bail!("validation failed with {} error(s)", errors.len());
        }
        SubmitOutcome::Updated { notice, .. } => {
            if json {
                let value = serde_json::json!({
                    "updated": true,
                    "notice": notice,
                    "project": board.project(&args.id),
                });
                print_json(&value)?;
            } else {
                println!("{}", notice.header);
                println!("{}", notice.content);
            }
            Ok(())
        }
        SubmitOutcome::Failed => {
            let detail = board
                .session()
                .notice()
                .map(|n| format!("{}: {}", n.header, n.content))
                .unwrap_or_else(|| "update failed".to_string());
            anyhow::bail!(detail);
        }
        SubmitOutcome::Stale => {
            anyhow::bail!("edit session was closed before the update finished")
        }
    }
}

/// Apply the requested edits to the open session in a fixed order:
/// title, type, dates, description, member toggles, then roles.
fn apply_edits(board: &mut ProjectBoard, args: &EditArgs, json: bool) -> anyhow::Result<()> {
    if let Some(title) = &args.title {
        board.set_title(title.as_str())?;
    }

    if let Some(project_type) = &args.project_type {
        let project_type = non_empty(project_type.trim());
        if let Some(t) = project_type {
            board
                .catalog()
                .roles_for(t)
                .with_context(|| format!("available types: {}", type_list(board)))?;
        }
        for email in board.change_type(project_type)? {
            if !json {
                println!("  role reset: {email} ({UNASSIGNED})");
            }
        }
    }

    if args.no_start {
        board.set_start_date(None)?;
    } else if let Some(date) = args.start {
        board.set_start_date(Some(date))?;
    }
    if args.no_end {
        board.set_end_date(None)?;
    } else if let Some(date) = args.end {
        board.set_end_date(Some(date))?;
    }

    if let Some(description) = &args.description {
        board.set_description(description.as_str())?;
    }

    for email in &args.toggles {
        let toggled = board.toggle_member(email)?;
        if !json {
            match toggled {
                Toggled::Added => println!("  added:   {email}"),
                Toggled::Removed => println!("  removed: {email}"),
            }
        }
    }

    for (email, role) in &args.roles {
        if role != UNASSIGNED && !board.session().role_options().iter().any(|r| r == role) {
            let current = board
                .session()
                .form()
                .and_then(|f| f.project_type.clone())
                .unwrap_or_else(|| "(none)".to_string());
            anyhow::bail!("role '{role}' is not available for project type '{current}'");
        }
        if !board.set_member_role(email, role.as_str())? {
            eprintln!("warning: {email} is not on the team; role '{role}' ignored");
        }
    }

    Ok(())
}

fn type_list(board: &ProjectBoard) -> String {
    board.catalog().project_types().collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_role_splits_on_first_equals() {
        assert_eq!(
            parse_role("ana@acme.io=QA Tester").unwrap(),
            ("ana@acme.io".to_string(), "QA Tester".to_string())
        );
        assert_eq!(
            parse_role("ana@acme.io=A=B").unwrap(),
            ("ana@acme.io".to_string(), "A=B".to_string())
        );
    }

    #[test]
    fn parse_email_trims_and_rejects_blank() {
        assert_eq!(parse_email(" bo@acme.io ").unwrap(), "bo@acme.io");
        assert!(parse_email("").is_err());
        assert!(parse_email("   ").is_err());
    }

    #[test]
    fn parse_role_rejects_malformed_values() {
        assert!(parse_role("ana@acme.io").is_err());
        assert!(parse_role("=QA Tester").is_err());
        assert!(parse_role("ana@acme.io=").is_err());
    }
}
