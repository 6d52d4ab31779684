#![deny(unsafe_code)]

use std::collections::BTreeMap;

use crate::{FieldName, FieldValue, ModelError, SourceName};

static MISSING: FieldValue = FieldValue::Missing;

/// One attrition record: a sparse map from field name to value.
///
/// Absent fields read as [`FieldValue::Missing`].
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Record {
    pub cells: BTreeMap<FieldName, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from `(field, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let mut record = Self::new();
        for (field, value) in pairs {
            record.insert(FieldName::new(field)?, value.into());
        }
        Ok(record)
    }

    pub fn insert(&mut self, field: FieldName, value: FieldValue) {
        self.cells.insert(field, value);
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.cells.get(field)
    }

    /// Null-safe access: absent fields are `Missing`.
    pub fn value(&self, field: &str) -> &FieldValue {
        self.cells.get(field).unwrap_or(&MISSING)
    }

    pub fn is_missing(&self, field: &str) -> bool {
        self.value(field).is_missing()
    }
}

/// An immutable named table of records, loaded once at startup.
#[derive(Debug, Clone)]
pub struct RecordSource {
    name: SourceName,
    label: String,
    columns: Vec<FieldName>,
    records: Vec<Record>,
}

impl RecordSource {
    pub fn new(
        name: SourceName,
        label: impl Into<String>,
        columns: Vec<FieldName>,
        records: Vec<Record>,
    ) -> Self {
        Self {
            name,
            label: label.into(),
            columns,
            records,
        }
    }

    /// Build a source whose columns are derived from the records in
    /// first-seen order.
    pub fn from_records(name: SourceName, label: impl Into<String>, records: Vec<Record>) -> Self {
        let mut columns: Vec<FieldName> = Vec::new();
        for record in &records {
            for field in record.cells.keys() {
                if !columns.contains(field) {
                    columns.push(field.clone());
                }
            }
        }
        Self::new(name, label, columns, records)
    }

    pub fn name(&self) -> &SourceName {
        &self.name
    }

    /// Human-readable origin label stamped into `dataset_origen`.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn columns(&self) -> &[FieldName] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

/// The union of the selected sources for one interaction.
///
/// Built once by the combiner and never mutated afterwards; filters produce
/// [`SubView`]s that borrow it.
#[derive(Debug, Clone, Default)]
pub struct WorkingTable {
    columns: Vec<FieldName>,
    rows: Vec<Record>,
}

impl WorkingTable {
    pub fn new(columns: Vec<FieldName>, rows: Vec<Record>) -> Self {
        Self { columns, rows }
    }

    /// Union of every column seen across the combined sources.
    pub fn columns(&self) -> &[FieldName] {
        &self.columns
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.columns.iter().any(|column| column == field)
    }

    /// A view over every row, in table order.
    pub fn view(&self) -> SubView<'_> {
        SubView {
            table: self,
            indices: (0..self.rows.len()).collect(),
        }
    }
}

/// A filtered, read-only selection of rows from a [`WorkingTable`].
#[derive(Debug, Clone)]
pub struct SubView<'a> {
    table: &'a WorkingTable,
    indices: Vec<usize>,
}

impl<'a> SubView<'a> {
    pub fn table(&self) -> &'a WorkingTable {
        self.table
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.table.has_field(field)
    }

    pub fn columns(&self) -> &'a [FieldName] {
        self.table.columns()
    }

    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        let rows = self.table.rows();
        self.indices.iter().map(move |idx| &rows[*idx])
    }

    /// Keep only rows matching `predicate`, preserving order.
    pub fn retain<F>(&self, mut predicate: F) -> SubView<'a>
    where
        F: FnMut(&Record) -> bool,
    {
        let rows = self.table.rows();
        let indices = self
            .indices
            .iter()
            .copied()
            .filter(|idx| predicate(&rows[*idx]))
            .collect();
        SubView {
            table: self.table,
            indices,
        }
    }
}
