//! Entity kinds and their canonical field names.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const CLIENT_ID: &str = "ClientID";
pub const CLIENT_NAME: &str = "ClientName";
pub const PRIORITY_LEVEL: &str = "PriorityLevel";
pub const REQUESTED_TASK_IDS: &str = "RequestedTaskIDs";
pub const GROUP_TAG: &str = "GroupTag";
pub const ATTRIBUTES_JSON: &str = "AttributesJSON";

pub const WORKER_ID: &str = "WorkerID";
pub const WORKER_NAME: &str = "WorkerName";
pub const SKILLS: &str = "Skills";
pub const AVAILABLE_SLOTS: &str = "AvailableSlots";
pub const MAX_LOAD_PER_PHASE: &str = "MaxLoadPerPhase";
pub const WORKER_GROUP: &str = "WorkerGroup";
pub const QUALIFICATION_LEVEL: &str = "QualificationLevel";

pub const TASK_ID: &str = "TaskID";
pub const TASK_NAME: &str = "TaskName";
pub const CATEGORY: &str = "Category";
pub const DURATION: &str = "Duration";
pub const REQUIRED_SKILLS: &str = "RequiredSkills";
pub const PREFERRED_PHASES: &str = "PreferredPhases";
pub const MAX_CONCURRENT: &str = "MaxConcurrent";

/// One of the three record kinds in a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Client,
    Worker,
    Task,
}

impl EntityKind {
    /// All kinds, in dataset order.
    pub const ALL: [EntityKind; 3] = [EntityKind::Client, EntityKind::Worker, EntityKind::Task];

    /// Canonical field names, in schema order.
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            EntityKind::Client => &[
                CLIENT_ID,
                CLIENT_NAME,
                PRIORITY_LEVEL,
                REQUESTED_TASK_IDS,
                GROUP_TAG,
                ATTRIBUTES_JSON,
            ],
            EntityKind::Worker => &[
                WORKER_ID,
                WORKER_NAME,
                SKILLS,
                AVAILABLE_SLOTS,
                MAX_LOAD_PER_PHASE,
                WORKER_GROUP,
                QUALIFICATION_LEVEL,
            ],
            EntityKind::Task => &[
                TASK_ID,
                TASK_NAME,
                CATEGORY,
                DURATION,
                REQUIRED_SKILLS,
                PREFERRED_PHASES,
                MAX_CONCURRENT,
            ],
        }
    }

    /// The field that must be present and unique within a collection.
    pub fn key_field(&self) -> &'static str {
        match self {
            EntityKind::Client => CLIENT_ID,
            EntityKind::Worker => WORKER_ID,
            EntityKind::Task => TASK_ID,
        }
    }

    /// Plural collection name, as used in messages and edit payloads.
    pub fn collection_name(&self) -> &'static str {
        match self {
            EntityKind::Client => "clients",
            EntityKind::Worker => "workers",
            EntityKind::Task => "tasks",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Client => "Client",
            EntityKind::Worker => "Worker",
            EntityKind::Task => "Task",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
