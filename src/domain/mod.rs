//! Host-side HR domain: employees plus the leave and activity-report
//! calendars built on top of the grid engine

pub mod cra;
pub mod leave;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::GridEntity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub position: String,
    pub department: String,
    pub hire_date: NaiveDate,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Case-insensitive match on full name, department or position
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.full_name().to_lowercase().contains(&needle)
            || self.department.to_lowercase().contains(&needle)
            || self.position.to_lowercase().contains(&needle)
    }
}

impl GridEntity for Employee {
    fn entity_id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> String {
        self.full_name()
    }
}
