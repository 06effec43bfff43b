//! Entity records: the typed shape of client, worker and task rows.

mod cell;
mod dataset;
mod kind;
mod records;

pub mod fields {
    //! Canonical field names.
    pub use super::kind::{
        ATTRIBUTES_JSON, AVAILABLE_SLOTS, CATEGORY, CLIENT_ID, CLIENT_NAME, DURATION, GROUP_TAG,
        MAX_CONCURRENT, MAX_LOAD_PER_PHASE, PREFERRED_PHASES, PRIORITY_LEVEL, QUALIFICATION_LEVEL,
        REQUESTED_TASK_IDS, REQUIRED_SKILLS, SKILLS, TASK_ID, TASK_NAME, WORKER_GROUP, WORKER_ID,
        WORKER_NAME,
    };
}

pub use cell::{CellValue, RawRow};
pub(crate) use dataset::typed_rows;
pub use dataset::{Dataset, EntityCollection};
pub use kind::EntityKind;
pub use records::{ClientRecord, EntityRecord, TaskRecord, WorkerRecord};
