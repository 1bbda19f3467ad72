//! Class schedule management

mod sample;
mod stats;

pub use sample::*;
pub use stats::*;

use serde::{Deserialize, Serialize};

/// A scheduled class session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSession {
    pub id: u64,
    pub group_name: String,
    pub teacher_name: String,
    pub classroom: String,
    pub date: String,
    pub time: String,
}

/// Fields for a class that has not been scheduled yet
#[derive(Debug, Clone, Deserialize)]
pub struct NewClass {
    pub group_name: String,
    pub teacher_name: String,
    pub classroom: String,
    pub date: String,
    pub time: String,
}

/// Search criteria. Unset and empty fields match anything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassFilter {
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub teacher_name: Option<String>,
    #[serde(default)]
    pub classroom: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
}

fn field_matches(wanted: &Option<String>, actual: &str) -> bool {
    match wanted.as_deref() {
        None | Some("") => true,
        Some(wanted) => wanted == actual,
    }
}

impl ClassFilter {
    pub fn matches(&self, class: &ClassSession) -> bool {
        field_matches(&self.group_name, &class.group_name)
            && field_matches(&self.teacher_name, &class.teacher_name)
            && field_matches(&self.classroom, &class.classroom)
            && field_matches(&self.date, &class.date)
            && field_matches(&self.time, &class.time)
    }
}

/// Ordered collection of class sessions
#[derive(Debug, Clone)]
pub struct Schedule {
    classes: Vec<ClassSession>,
    next_id: u64,
}

impl Schedule {
    pub fn new() -> Self {
        Self {
            classes: Vec::new(),
            next_id: 1,
        }
    }

    /// Append a class and assign it the next id. Ids are never reused.
    pub fn add(&mut self, class: NewClass) -> ClassSession {
        let session = ClassSession {
            id: self.next_id,
            group_name: class.group_name,
            teacher_name: class.teacher_name,
            classroom: class.classroom,
            date: class.date,
            time: class.time,
        };
        self.next_id += 1;
        self.classes.push(session.clone());
        session
    }

    /// Remove a class by id; an unknown id leaves the schedule untouched
    pub fn delete(&mut self, id: u64) -> Option<ClassSession> {
        let index = self.classes.iter().position(|c| c.id == id)?;
        Some(self.classes.remove(index))
    }

    pub fn get(&self, id: u64) -> Option<&ClassSession> {
        self.classes.iter().find(|c| c.id == id)
    }

    /// All classes in insertion order
    pub fn list(&self) -> &[ClassSession] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn search(&self, filter: &ClassFilter) -> Vec<ClassSession> {
        self.classes
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect()
    }

    pub fn statistics(&self) -> ScheduleStats {
        ScheduleStats::from_classes(&self.classes)
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new()
    }
}
