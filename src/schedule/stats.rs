//! Schedule statistics

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::ClassSession;

/// Aggregate counts shown on the statistics page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleStats {
    pub total_classes: usize,
    pub unique_teachers: usize,
    pub unique_groups: usize,
    pub unique_classrooms: usize,
}

impl ScheduleStats {
    pub fn from_classes(classes: &[ClassSession]) -> Self {
        let distinct = |field: fn(&ClassSession) -> &str| {
            classes.iter().map(field).collect::<HashSet<_>>().len()
        };

        Self {
            total_classes: classes.len(),
            unique_teachers: distinct(|c| c.teacher_name.as_str()),
            unique_groups: distinct(|c| c.group_name.as_str()),
            unique_classrooms: distinct(|c| c.classroom.as_str()),
        }
    }
}
