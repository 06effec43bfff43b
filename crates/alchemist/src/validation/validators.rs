//! Per-kind record validators and the validation engine.

use std::collections::HashSet;
use std::ops::RangeInclusive;

use tracing::debug;

use crate::entity::fields::*;
use crate::entity::{
    ClientRecord, Dataset, EntityCollection, EntityKind, EntityRecord, RawRow, TaskRecord,
    WorkerRecord, typed_rows,
};

use super::issue::{IssueKind, ValidationIssue, ValidationSummary};

/// Validation thresholds.
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Lowest allowed `PriorityLevel`.
    pub priority_min: i64,
    /// Highest allowed `PriorityLevel`.
    pub priority_max: i64,
    /// Smallest allowed `Duration`.
    pub min_duration: i64,
    /// Check `RequestedTaskIDs` against the task collection in whole-dataset runs.
    pub check_references: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            priority_min: 1,
            priority_max: 5,
            min_duration: 1,
            check_references: true,
        }
    }
}

/// Collects issues for the record currently being checked.
pub struct RecordScope<'a> {
    entity: EntityKind,
    record_key: &'a str,
    issues: &'a mut Vec<ValidationIssue>,
}

impl<'a> RecordScope<'a> {
    fn new(entity: EntityKind, record_key: &'a str, issues: &'a mut Vec<ValidationIssue>) -> Self {
        Self {
            entity,
            record_key,
            issues,
        }
    }

    /// Key of the record in scope.
    pub fn record_key(&self) -> &str {
        self.record_key
    }

    /// Report an issue against `field`.
    pub fn report(&mut self, kind: IssueKind, field: &str, message: impl Into<String>) {
        self.issues.push(
            ValidationIssue::new(self.entity, self.record_key, kind, message).with_field(field),
        );
    }
}

/// A validator for one entity kind.
///
/// `check_record` holds the kind-specific checklist; `validate` wraps it with
/// the checks every kind shares: empty-cell scan, key presence and duplicate
/// keys. Duplicates are reported on the second and later occurrence and the
/// record is still checked.
pub trait Validator {
    /// Record type validated.
    type Record: EntityRecord;

    /// Kind-specific field checks for one record.
    fn check_record(&self, record: &Self::Record, scope: &mut RecordScope<'_>);

    /// Validate a whole collection. Never fails; output order follows input
    /// record order, then check order.
    fn validate(&self, records: &[Self::Record]) -> Vec<ValidationIssue> {
        let kind = Self::Record::KIND;
        let key_field = kind.key_field();
        let mut issues = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for (index, record) in records.iter().enumerate() {
            let key = record.key();
            let record_key = key.clone().unwrap_or_else(|| format!("row {}", index + 1));
            let mut scope = RecordScope::new(kind, &record_key, &mut issues);

            for (field, cell) in record.cells() {
                if cell.is_empty_text() {
                    scope.report(
                        IssueKind::FieldMissing,
                        field,
                        format!("Empty cell in {}: {}", kind.collection_name(), field),
                    );
                }
            }

            match key {
                None => scope.report(
                    IssueKind::FieldMissing,
                    key_field,
                    format!("{} missing", key_field),
                ),
                Some(key) => {
                    if !seen.insert(key.clone()) {
                        scope.report(
                            IssueKind::DuplicateKey,
                            key_field,
                            format!("Duplicate {}: {}", key_field, key),
                        );
                    }
                }
            }

            self.check_record(record, &mut scope);
        }

        issues
    }
}

/// Validates client records.
pub struct ClientValidator {
    priority: RangeInclusive<i64>,
}

impl ClientValidator {
    pub fn new(config: &ValidationConfig) -> Self {
        Self {
            priority: config.priority_min..=config.priority_max,
        }
    }
}

impl Validator for ClientValidator {
    type Record = ClientRecord;

    fn check_record(&self, record: &ClientRecord, scope: &mut RecordScope<'_>) {
        let key = scope.record_key().to_string();

        if !record
            .priority_level
            .as_integer()
            .is_some_and(|p| self.priority.contains(&p))
        {
            scope.report(
                IssueKind::FieldOutOfRange,
                PRIORITY_LEVEL,
                format!(
                    "Invalid PriorityLevel for client {}: expected an integer in {}..={}, got '{}'",
                    key,
                    self.priority.start(),
                    self.priority.end(),
                    record.priority_level.as_text()
                ),
            );
        }

        if record.requested_task_ids.parse_text_list().is_none() {
            scope.report(
                IssueKind::MalformedStructuredField,
                REQUESTED_TASK_IDS,
                format!("Malformed RequestedTaskIDs for client {}", key),
            );
        }

        if record.attributes_json.parse_json_object().is_none() {
            scope.report(
                IssueKind::MalformedStructuredField,
                ATTRIBUTES_JSON,
                format!("Malformed AttributesJSON for client {}", key),
            );
        }
    }
}

/// Validates worker records.
pub struct WorkerValidator;

impl Validator for WorkerValidator {
    type Record = WorkerRecord;

    fn check_record(&self, record: &WorkerRecord, scope: &mut RecordScope<'_>) {
        let key = scope.record_key().to_string();

        if record.available_slots.parse_phase_list().is_none() {
            scope.report(
                IssueKind::MalformedStructuredField,
                AVAILABLE_SLOTS,
                format!("Malformed AvailableSlots for worker {}", key),
            );
        }

        if record.max_load_per_phase.as_number().is_none() {
            scope.report(
                IssueKind::FieldOutOfRange,
                MAX_LOAD_PER_PHASE,
                format!(
                    "Invalid MaxLoadPerPhase for worker {}: expected a number, got '{}'",
                    key,
                    record.max_load_per_phase.as_text()
                ),
            );
        }
    }
}

/// Validates task records.
pub struct TaskValidator {
    min_duration: i64,
}

impl TaskValidator {
    pub fn new(config: &ValidationConfig) -> Self {
        Self {
            min_duration: config.min_duration,
        }
    }
}

impl Validator for TaskValidator {
    type Record = TaskRecord;

    fn check_record(&self, record: &TaskRecord, scope: &mut RecordScope<'_>) {
        let key = scope.record_key().to_string();

        if !record
            .duration
            .as_integer()
            .is_some_and(|d| d >= self.min_duration)
        {
            scope.report(
                IssueKind::FieldOutOfRange,
                DURATION,
                format!(
                    "Invalid Duration for task {}: expected an integer >= {}, got '{}'",
                    key,
                    self.min_duration,
                    record.duration.as_text()
                ),
            );
        }

        if record.preferred_phases.parse_phase_list().is_none() {
            scope.report(
                IssueKind::MalformedStructuredField,
                PREFERRED_PHASES,
                format!("Malformed PreferredPhases for task {}", key),
            );
        }
    }
}

/// Report requested task IDs that name no task in `tasks`.
///
/// Skipped entirely while the task collection is empty (not loaded yet).
pub fn check_requested_tasks(
    clients: &[ClientRecord],
    tasks: &[TaskRecord],
) -> Vec<ValidationIssue> {
    if tasks.is_empty() {
        return Vec::new();
    }

    let known: HashSet<String> = tasks.iter().filter_map(|t| t.key()).collect();
    let mut issues = Vec::new();

    for (index, client) in clients.iter().enumerate() {
        let Some(requested) = client.requested_task_ids.parse_text_list() else {
            continue;
        };
        let record_key = client.key().unwrap_or_else(|| format!("row {}", index + 1));

        for task_id in requested.iter().filter(|id| !known.contains(*id)) {
            issues.push(
                ValidationIssue::new(
                    EntityKind::Client,
                    &record_key,
                    IssueKind::UnknownReference,
                    format!("Unknown task '{}' requested by client {}", task_id, record_key),
                )
                .with_field(REQUESTED_TASK_IDS),
            );
        }
    }

    issues
}

/// Runs the per-kind validators.
pub struct ValidationEngine {
    config: ValidationConfig,
    clients: ClientValidator,
    workers: WorkerValidator,
    tasks: TaskValidator,
}

impl ValidationEngine {
    /// Create a validation engine with default thresholds.
    pub fn new() -> Self {
        Self::with_config(ValidationConfig::default())
    }

    /// Create a validation engine with custom thresholds.
    pub fn with_config(config: ValidationConfig) -> Self {
        Self {
            clients: ClientValidator::new(&config),
            workers: WorkerValidator,
            tasks: TaskValidator::new(&config),
            config,
        }
    }

    /// The thresholds in use.
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub fn validate_clients(&self, records: &[ClientRecord]) -> Vec<ValidationIssue> {
        self.clients.validate(records)
    }

    pub fn validate_workers(&self, records: &[WorkerRecord]) -> Vec<ValidationIssue> {
        self.workers.validate(records)
    }

    pub fn validate_tasks(&self, records: &[TaskRecord]) -> Vec<ValidationIssue> {
        self.tasks.validate(records)
    }

    /// Validate one typed collection.
    pub fn validate(&self, collection: &EntityCollection) -> Vec<ValidationIssue> {
        let issues = match collection {
            EntityCollection::Clients(records) => self.validate_clients(records),
            EntityCollection::Workers(records) => self.validate_workers(records),
            EntityCollection::Tasks(records) => self.validate_tasks(records),
        };
        debug!(
            kind = %collection.kind(),
            records = collection.len(),
            issues = issues.len(),
            "validated collection"
        );
        issues
    }

    /// Normalize, type and validate raw ingested rows of `kind`.
    pub fn validate_rows(&self, kind: EntityKind, rows: Vec<RawRow>) -> Vec<ValidationIssue> {
        match kind {
            EntityKind::Client => self.validate_clients(&typed_rows(kind, rows)),
            EntityKind::Worker => self.validate_workers(&typed_rows(kind, rows)),
            EntityKind::Task => self.validate_tasks(&typed_rows(kind, rows)),
        }
    }

    /// Validate all three collections, then cross-entity references.
    pub fn validate_dataset(&self, dataset: &Dataset) -> Vec<ValidationIssue> {
        let mut issues = self.validate_clients(&dataset.clients);
        issues.extend(self.validate_workers(&dataset.workers));
        issues.extend(self.validate_tasks(&dataset.tasks));

        if self.config.check_references {
            issues.extend(check_requested_tasks(&dataset.clients, &dataset.tasks));
        }

        let summary = ValidationSummary::from_issues(&issues);
        debug!(
            records = dataset.record_count(),
            issues = summary.total,
            "validated dataset"
        );
        issues
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::CellValue;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), CellValue::text(*v)))
            .collect()
    }

    fn client(id: &str, priority: &str, attrs: &str) -> ClientRecord {
        ClientRecord::from_row(row(&[
            ("ClientID", id),
            ("ClientName", "Acme"),
            ("PriorityLevel", priority),
            ("RequestedTaskIDs", "T1,T2"),
            ("GroupTag", "GroupA"),
            ("AttributesJSON", attrs),
        ]))
    }

    fn worker(id: &str, slots: &str, max_load: &str) -> WorkerRecord {
        WorkerRecord::from_row(row(&[
            ("WorkerID", id),
            ("WorkerName", "Ann"),
            ("Skills", "coding"),
            ("AvailableSlots", slots),
            ("MaxLoadPerPhase", max_load),
            ("WorkerGroup", "GroupA"),
            ("QualificationLevel", "3"),
        ]))
    }

    fn task(id: &str, duration: &str, phases: &str) -> TaskRecord {
        TaskRecord::from_row(row(&[
            ("TaskID", id),
            ("TaskName", "Audit"),
            ("Category", "Admin"),
            ("Duration", duration),
            ("RequiredSkills", "coding"),
            ("PreferredPhases", phases),
            ("MaxConcurrent", "2"),
        ]))
    }

    #[test]
    fn test_clean_client_has_no_issues() {
        let engine = ValidationEngine::new();
        let issues = engine.validate_clients(&[client("C1", "3", "{}")]);
        assert!(issues.is_empty(), "{:?}", issues);
    }

    #[test]
    fn test_priority_out_of_range() {
        let engine = ValidationEngine::new();
        for bad in ["0", "6", "high", "2.5"] {
            let issues = engine.validate_clients(&[client("C1", bad, "{}")]);
            assert_eq!(issues.len(), 1, "priority {}", bad);
            assert_eq!(issues[0].kind, IssueKind::FieldOutOfRange);
            assert_eq!(issues[0].record_key, "C1");
        }
    }

    #[test]
    fn test_priority_range_is_configurable() {
        let engine = ValidationEngine::with_config(ValidationConfig {
            priority_max: 10,
            ..ValidationConfig::default()
        });
        assert!(engine.validate_clients(&[client("C1", "8", "{}")]).is_empty());
    }

    #[test]
    fn test_malformed_attributes_json_continues() {
        let engine = ValidationEngine::new();
        let issues = engine.validate_clients(&[
            client("C1", "3", "{not json"),
            client("C2", "9", "{}"),
        ]);

        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].kind, IssueKind::MalformedStructuredField);
        assert_eq!(issues[0].field.as_deref(), Some("AttributesJSON"));
        assert_eq!(issues[1].record_key, "C2");
    }

    #[test]
    fn test_empty_cell_reported_once() {
        let engine = ValidationEngine::new();
        let mut record = client("C1", "3", "{}");
        record.client_name = CellValue::text("");

        let issues = engine.validate_clients(&[record]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::FieldMissing);
        assert_eq!(issues[0].message, "Empty cell in clients: ClientName");
    }

    #[test]
    fn test_whitespace_cell_is_not_empty() {
        let engine = ValidationEngine::new();
        let mut record = client("C1", "3", "{}");
        record.client_name = CellValue::text("   ");
        record.group_tag = CellValue::text("\t");

        assert!(engine.validate_clients(&[record]).is_empty());
    }

    #[test]
    fn test_missing_key_uses_row_number() {
        let engine = ValidationEngine::new();
        let mut record = worker("W1", "[1,2]", "2");
        record.worker_id = CellValue::Empty;

        let issues = engine.validate_workers(&[worker("W0", "1", "1"), record]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].record_key, "row 2");
        assert_eq!(issues[0].message, "WorkerID missing");
    }

    #[test]
    fn test_duplicate_worker_reported_once() {
        let engine = ValidationEngine::new();
        let issues = engine.validate_workers(&[
            worker("W1", "[1,2]", "2"),
            worker("W1", "[3]", "1"),
        ]);

        let duplicates: Vec<_> = issues
            .iter()
            .filter(|i| i.kind == IssueKind::DuplicateKey)
            .collect();
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].message, "Duplicate WorkerID: W1");
    }

    #[test]
    fn test_worker_slots_and_load() {
        let engine = ValidationEngine::new();
        let issues = engine.validate_workers(&[worker("W1", "1,x", "lots")]);

        let kinds: Vec<IssueKind> = issues.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![IssueKind::MalformedStructuredField, IssueKind::FieldOutOfRange]
        );
    }

    #[test]
    fn test_task_duration_and_phases() {
        let engine = ValidationEngine::new();
        assert!(engine.validate_tasks(&[task("T1", "2", "[1,2]")]).is_empty());

        let issues = engine.validate_tasks(&[task("T1", "0", "a,b")]);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].field.as_deref(), Some("Duration"));
        assert_eq!(issues[1].field.as_deref(), Some("PreferredPhases"));
    }

    #[test]
    fn test_unknown_requested_task() {
        let engine = ValidationEngine::new();
        let dataset = Dataset {
            clients: vec![client("C1", "3", "{}")],
            workers: vec![],
            tasks: vec![task("T1", "1", "1")],
        };

        let issues = engine.validate_dataset(&dataset);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::UnknownReference);
        assert!(issues[0].message.contains("'T2'"));
    }

    #[test]
    fn test_reference_check_can_be_disabled() {
        let engine = ValidationEngine::with_config(ValidationConfig {
            check_references: false,
            ..ValidationConfig::default()
        });
        let dataset = Dataset {
            clients: vec![client("C1", "3", "{}")],
            workers: vec![],
            tasks: vec![task("T1", "1", "1")],
        };
        assert!(engine.validate_dataset(&dataset).is_empty());
    }

    #[test]
    fn test_validate_rows_normalizes_first() {
        let engine = ValidationEngine::new();
        let issues = engine.validate_rows(
            EntityKind::Task,
            vec![row(&[("task id", "T1"), ("duration", "-1"), ("preferred phases", "2")])],
        );

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].record_key, "T1");
    }
}
