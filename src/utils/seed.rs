use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

use crate::directory::InMemoryDirectory;
use crate::model::employee::Employee;

#[derive(Deserialize)]
struct SeedTeam {
    id: u64,
    name: String,
    manager_id: u64,
}

#[derive(Deserialize)]
struct SeedFile {
    #[serde(default)]
    teams: Vec<SeedTeam>,
    #[serde(default)]
    employees: Vec<Employee>,
}

/// Load teams/employees from a JSON file into the in-memory directory.
/// Runs once at startup; duplicate ids are skipped, not fatal.
pub fn warmup_directory(directory: &InMemoryDirectory, path: &str) -> Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read seed file {path}"))?;
    let seed: SeedFile =
        serde_json::from_str(&raw).with_context(|| format!("failed to parse seed file {path}"))?;

    let mut teams = 0usize;
    for team in seed.teams {
        if directory.insert_team(team.id, team.name, team.manager_id) {
            teams += 1;
        }
    }
    let mut employees = 0usize;
    for employee in seed.employees {
        if directory.insert_employee(employee) {
            employees += 1;
        }
    }
    info!(teams, employees, path, "directory seeded");
    Ok(())
}
