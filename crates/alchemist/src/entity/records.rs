//! Typed client, worker and task records.
//!
//! Records are built from header-normalized rows. Every canonical field is a
//! named cell (absent columns become [`CellValue::Empty`]); anything else is
//! kept in `extra` so a record can be turned back into a row unchanged.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::cell::{CellValue, RawRow};
use super::kind::*;

/// Common behaviour of the three record shapes.
pub trait EntityRecord: Clone {
    /// The kind this record belongs to.
    const KIND: EntityKind;

    /// Build a record from a row whose headers are already canonical.
    fn from_row(row: RawRow) -> Self;

    /// Canonical fields in schema order, followed by extra columns.
    fn cells(&self) -> Vec<(&str, &CellValue)>;

    /// The key cell (`ClientID`, `WorkerID`, `TaskID`).
    fn key_cell(&self) -> &CellValue;

    /// Trimmed key value, if present.
    fn key(&self) -> Option<String> {
        self.key_cell().as_key()
    }

    /// Convert back into an untyped row, dropping absent canonical fields.
    fn to_row(&self) -> RawRow {
        self.cells()
            .into_iter()
            .filter(|(_, cell)| !matches!(cell, CellValue::Empty))
            .map(|(name, cell)| (name.to_string(), cell.clone()))
            .collect()
    }
}

fn take(row: &mut RawRow, field: &str) -> CellValue {
    row.shift_remove(field).unwrap_or_default()
}

fn with_extra<'a>(
    mut cells: Vec<(&'a str, &'a CellValue)>,
    extra: &'a IndexMap<String, CellValue>,
) -> Vec<(&'a str, &'a CellValue)> {
    cells.extend(extra.iter().map(|(k, v)| (k.as_str(), v)));
    cells
}

/// A client requesting tasks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    #[serde(rename = "ClientID", default)]
    pub client_id: CellValue,
    #[serde(rename = "ClientName", default)]
    pub client_name: CellValue,
    #[serde(rename = "PriorityLevel", default)]
    pub priority_level: CellValue,
    #[serde(rename = "RequestedTaskIDs", default)]
    pub requested_task_ids: CellValue,
    #[serde(rename = "GroupTag", default)]
    pub group_tag: CellValue,
    #[serde(rename = "AttributesJSON", default)]
    pub attributes_json: CellValue,
    #[serde(flatten)]
    pub extra: IndexMap<String, CellValue>,
}

impl EntityRecord for ClientRecord {
    const KIND: EntityKind = EntityKind::Client;

    fn from_row(mut row: RawRow) -> Self {
        Self {
            client_id: take(&mut row, CLIENT_ID),
            client_name: take(&mut row, CLIENT_NAME),
            priority_level: take(&mut row, PRIORITY_LEVEL),
            requested_task_ids: take(&mut row, REQUESTED_TASK_IDS),
            group_tag: take(&mut row, GROUP_TAG),
            attributes_json: take(&mut row, ATTRIBUTES_JSON),
            extra: row,
        }
    }

    fn cells(&self) -> Vec<(&str, &CellValue)> {
        with_extra(
            vec![
                (CLIENT_ID, &self.client_id),
                (CLIENT_NAME, &self.client_name),
                (PRIORITY_LEVEL, &self.priority_level),
                (REQUESTED_TASK_IDS, &self.requested_task_ids),
                (GROUP_TAG, &self.group_tag),
                (ATTRIBUTES_JSON, &self.attributes_json),
            ],
            &self.extra,
        )
    }

    fn key_cell(&self) -> &CellValue {
        &self.client_id
    }
}

/// A worker with phase availability.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkerRecord {
    #[serde(rename = "WorkerID", default)]
    pub worker_id: CellValue,
    #[serde(rename = "WorkerName", default)]
    pub worker_name: CellValue,
    #[serde(rename = "Skills", default)]
    pub skills: CellValue,
    #[serde(rename = "AvailableSlots", default)]
    pub available_slots: CellValue,
    #[serde(rename = "MaxLoadPerPhase", default)]
    pub max_load_per_phase: CellValue,
    #[serde(rename = "WorkerGroup", default)]
    pub worker_group: CellValue,
    #[serde(rename = "QualificationLevel", default)]
    pub qualification_level: CellValue,
    #[serde(flatten)]
    pub extra: IndexMap<String, CellValue>,
}

impl EntityRecord for WorkerRecord {
    const KIND: EntityKind = EntityKind::Worker;

    fn from_row(mut row: RawRow) -> Self {
        Self {
            worker_id: take(&mut row, WORKER_ID),
            worker_name: take(&mut row, WORKER_NAME),
            skills: take(&mut row, SKILLS),
            available_slots: take(&mut row, AVAILABLE_SLOTS),
            max_load_per_phase: take(&mut row, MAX_LOAD_PER_PHASE),
            worker_group: take(&mut row, WORKER_GROUP),
            qualification_level: take(&mut row, QUALIFICATION_LEVEL),
            extra: row,
        }
    }

    fn cells(&self) -> Vec<(&str, &CellValue)> {
        with_extra(
            vec![
                (WORKER_ID, &self.worker_id),
                (WORKER_NAME, &self.worker_name),
                (SKILLS, &self.skills),
                (AVAILABLE_SLOTS, &self.available_slots),
                (MAX_LOAD_PER_PHASE, &self.max_load_per_phase),
                (WORKER_GROUP, &self.worker_group),
                (QUALIFICATION_LEVEL, &self.qualification_level),
            ],
            &self.extra,
        )
    }

    fn key_cell(&self) -> &CellValue {
        &self.worker_id
    }
}

/// A task to be scheduled into phases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    #[serde(rename = "TaskID", default)]
    pub task_id: CellValue,
    #[serde(rename = "TaskName", default)]
    pub task_name: CellValue,
    #[serde(rename = "Category", default)]
    pub category: CellValue,
    #[serde(rename = "Duration", default)]
    pub duration: CellValue,
    #[serde(rename = "RequiredSkills", default)]
    pub required_skills: CellValue,
    #[serde(rename = "PreferredPhases", default)]
    pub preferred_phases: CellValue,
    #[serde(rename = "MaxConcurrent", default)]
    pub max_concurrent: CellValue,
    #[serde(flatten)]
    pub extra: IndexMap<String, CellValue>,
}

impl EntityRecord for TaskRecord {
    const KIND: EntityKind = EntityKind::Task;

    fn from_row(mut row: RawRow) -> Self {
        Self {
            task_id: take(&mut row, TASK_ID),
            task_name: take(&mut row, TASK_NAME),
            category: take(&mut row, CATEGORY),
            duration: take(&mut row, DURATION),
            required_skills: take(&mut row, REQUIRED_SKILLS),
            preferred_phases: take(&mut row, PREFERRED_PHASES),
            max_concurrent: take(&mut row, MAX_CONCURRENT),
            extra: row,
        }
    }

    fn cells(&self) -> Vec<(&str, &CellValue)> {
        with_extra(
            vec![
                (TASK_ID, &self.task_id),
                (TASK_NAME, &self.task_name),
                (CATEGORY, &self.category),
                (DURATION, &self.duration),
                (REQUIRED_SKILLS, &self.required_skills),
                (PREFERRED_PHASES, &self.preferred_phases),
                (MAX_CONCURRENT, &self.max_concurrent),
            ],
            &self.extra,
        )
    }

    fn key_cell(&self) -> &CellValue {
        &self.task_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), CellValue::text(*v)))
            .collect()
    }

    #[test]
    fn test_from_row_splits_extra_columns() {
        let record = ClientRecord::from_row(row(&[
            ("ClientID", "C1"),
            ("Region", "EU"),
            ("PriorityLevel", "3"),
        ]));

        assert_eq!(record.key(), Some("C1".to_string()));
        assert_eq!(record.priority_level, CellValue::text("3"));
        assert_eq!(record.client_name, CellValue::Empty);
        assert_eq!(record.extra.len(), 1);
        assert!(record.extra.contains_key("Region"));
    }

    #[test]
    fn test_cells_canonical_order_then_extra() {
        let record = TaskRecord::from_row(row(&[("Notes", "x"), ("TaskID", "T1")]));
        let names: Vec<&str> = record.cells().into_iter().map(|(n, _)| n).collect();

        assert_eq!(&names[..7], EntityKind::Task.fields());
        assert_eq!(names[7], "Notes");
    }

    #[test]
    fn test_to_row_drops_absent_fields() {
        let record = WorkerRecord::from_row(row(&[("WorkerID", "W1"), ("Skills", "")]));
        let out = record.to_row();

        assert_eq!(out.len(), 2);
        assert_eq!(out["Skills"], CellValue::text(""));
    }

    #[test]
    fn test_serialize_uses_canonical_names() {
        let record = WorkerRecord::from_row(row(&[("WorkerID", "W1"), ("Shift", "night")]));
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["WorkerID"], "W1");
        assert_eq!(value["Shift"], "night");
    }
}
