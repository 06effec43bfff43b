//! Entity collections and the three-collection dataset.

use serde::{Deserialize, Serialize};

use crate::input::normalize_row;

use super::cell::RawRow;
use super::kind::EntityKind;
use super::records::{ClientRecord, EntityRecord, TaskRecord, WorkerRecord};

/// A single typed collection of one entity kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "records", rename_all = "lowercase")]
pub enum EntityCollection {
    Clients(Vec<ClientRecord>),
    Workers(Vec<WorkerRecord>),
    Tasks(Vec<TaskRecord>),
}

impl EntityCollection {
    /// Normalize headers of raw rows and type them as `kind`.
    pub fn from_rows(kind: EntityKind, rows: Vec<RawRow>) -> Self {
        match kind {
            EntityKind::Client => EntityCollection::Clients(typed_rows(kind, rows)),
            EntityKind::Worker => EntityCollection::Workers(typed_rows(kind, rows)),
            EntityKind::Task => EntityCollection::Tasks(typed_rows(kind, rows)),
        }
    }

    /// The kind of records held.
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityCollection::Clients(_) => EntityKind::Client,
            EntityCollection::Workers(_) => EntityKind::Worker,
            EntityCollection::Tasks(_) => EntityKind::Task,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        match self {
            EntityCollection::Clients(r) => r.len(),
            EntityCollection::Workers(r) => r.len(),
            EntityCollection::Tasks(r) => r.len(),
        }
    }

    /// True when the collection holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Normalize and type a batch of raw rows.
pub(crate) fn typed_rows<R: EntityRecord>(kind: EntityKind, rows: Vec<RawRow>) -> Vec<R> {
    rows.into_iter()
        .map(|row| R::from_row(normalize_row(row, kind)))
        .collect()
}

/// The clients, workers and tasks of one session.
///
/// Owned by the caller; engine operations borrow it and return new state
/// instead of mutating it in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub clients: Vec<ClientRecord>,
    #[serde(default)]
    pub workers: Vec<WorkerRecord>,
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,
}

impl Dataset {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dataset from raw ingested rows of each kind.
    pub fn from_rows(clients: Vec<RawRow>, workers: Vec<RawRow>, tasks: Vec<RawRow>) -> Self {
        Self {
            clients: typed_rows(EntityKind::Client, clients),
            workers: typed_rows(EntityKind::Worker, workers),
            tasks: typed_rows(EntityKind::Task, tasks),
        }
    }

    /// Replace one collection wholesale.
    pub fn with_collection(mut self, collection: EntityCollection) -> Self {
        match collection {
            EntityCollection::Clients(r) => self.clients = r,
            EntityCollection::Workers(r) => self.workers = r,
            EntityCollection::Tasks(r) => self.tasks = r,
        }
        self
    }

    /// Total number of records across all collections.
    pub fn record_count(&self) -> usize {
        self.clients.len() + self.workers.len() + self.tasks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::CellValue;

    fn raw(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), CellValue::text(*v)))
            .collect()
    }

    #[test]
    fn test_from_rows_normalizes_headers() {
        let dataset = Dataset::from_rows(
            vec![raw(&[("client id", "C1"), ("Priority Level", "2")])],
            vec![raw(&[("WORKERID", "W1")])],
            vec![],
        );

        assert_eq!(dataset.clients[0].key(), Some("C1".to_string()));
        assert_eq!(dataset.clients[0].priority_level, CellValue::text("2"));
        assert_eq!(dataset.workers[0].key(), Some("W1".to_string()));
        assert_eq!(dataset.record_count(), 2);
    }

    #[test]
    fn test_with_collection_replaces_wholesale() {
        let dataset = Dataset::from_rows(
            vec![raw(&[("ClientID", "C1")]), raw(&[("ClientID", "C2")])],
            vec![],
            vec![],
        );
        let replaced = dataset.clone().with_collection(EntityCollection::from_rows(
            EntityKind::Client,
            vec![raw(&[("ClientID", "C9")])],
        ));

        assert_eq!(replaced.clients.len(), 1);
        assert_eq!(dataset.clients.len(), 2);
    }

    #[test]
    fn test_collection_kind() {
        let collection = EntityCollection::from_rows(EntityKind::Task, vec![]);
        assert_eq!(collection.kind(), EntityKind::Task);
        assert!(collection.is_empty());
    }
}
