//! Identity collaborator.
//!
//! Employee/team lookups are supplied by an external directory; the engine
//! treats the ids as opaque keys and only ever reads through this trait.
//! The in-memory implementation backs the registration endpoints and the
//! startup seed loader.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::model::employee::Employee;
use crate::model::team::Team;

pub trait Directory: Send + Sync {
    fn employee(&self, id: u64) -> Option<Employee>;
    fn team(&self, id: u64) -> Option<Team>;
}

/// Team record as stored; membership is assembled from employee records on
/// read so the two can never drift apart.
#[derive(Debug, Clone)]
struct TeamRecord {
    id: u64,
    name: String,
    manager_id: u64,
}

#[derive(Default)]
pub struct InMemoryDirectory {
    employees: RwLock<HashMap<u64, Employee>>,
    teams: RwLock<HashMap<u64, TeamRecord>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the id is already registered.
    pub fn insert_employee(&self, employee: Employee) -> bool {
        let mut employees = self
            .employees
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if employees.contains_key(&employee.id) {
            return false;
        }
        employees.insert(employee.id, employee);
        true
    }

    /// Returns false when the id is already registered.
    pub fn insert_team(&self, id: u64, name: String, manager_id: u64) -> bool {
        let mut teams = self.teams.write().unwrap_or_else(PoisonError::into_inner);
        if teams.contains_key(&id) {
            return false;
        }
        teams.insert(
            id,
            TeamRecord {
                id,
                name,
                manager_id,
            },
        );
        true
    }

    pub fn employees(&self) -> Vec<Employee> {
        let mut all: Vec<Employee> = self
            .employees
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        all.sort_by_key(|e| e.id);
        all
    }

    fn members_of(&self, team_id: u64) -> Vec<u64> {
        let mut members: Vec<u64> = self
            .employees
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|e| e.team_id == Some(team_id))
            .map(|e| e.id)
            .collect();
        members.sort_unstable();
        members
    }
}

impl Directory for InMemoryDirectory {
    fn employee(&self, id: u64) -> Option<Employee> {
        self.employees
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    fn team(&self, id: u64) -> Option<Team> {
        let record = self
            .teams
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()?;
        Some(Team {
            id: record.id,
            name: record.name,
            manager_id: record.manager_id,
            members: self.members_of(id),
        })
    }
}
