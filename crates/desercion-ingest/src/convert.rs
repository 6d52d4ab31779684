//! DataFrame to record conversion.
//!
//! Polars stops at this boundary: downstream stages only see tagged
//! [`FieldValue`] cells.

use polars::prelude::{AnyValue, DataFrame};

use desercion_common::{any_to_i64, any_to_string};
use desercion_model::{FieldName, FieldValue, Record, RecordSource, SourceName};

use crate::error::Result;

/// Converts one Polars cell into a tagged field value.
///
/// Blank strings and NaN floats read as missing, matching how the cleaned
/// exports encode absent values.
pub fn any_to_field_value(value: AnyValue<'_>) -> FieldValue {
    match value {
        AnyValue::Null => FieldValue::Missing,
        AnyValue::Int8(_)
        | AnyValue::Int16(_)
        | AnyValue::Int32(_)
        | AnyValue::Int64(_)
        | AnyValue::UInt8(_)
        | AnyValue::UInt16(_)
        | AnyValue::UInt32(_)
        | AnyValue::UInt64(_) => any_to_i64(value).map_or(FieldValue::Missing, FieldValue::Integer),
        AnyValue::Float32(v) => float_value(f64::from(v)),
        AnyValue::Float64(v) => float_value(v),
        AnyValue::String(s) => text_value(s),
        AnyValue::StringOwned(ref s) => text_value(s.as_str()),
        other => text_value(&any_to_string(other)),
    }
}

fn float_value(v: f64) -> FieldValue {
    if v.is_finite() {
        FieldValue::Float(v)
    } else {
        FieldValue::Missing
    }
}

fn text_value(s: &str) -> FieldValue {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        FieldValue::Missing
    } else {
        FieldValue::text(trimmed)
    }
}

/// Builds an immutable [`RecordSource`] from a loaded DataFrame.
///
/// Column order follows the DataFrame; missing cells are stored explicitly so
/// every row of one source shares its field set.
pub fn dataframe_to_source(
    df: &DataFrame,
    name: SourceName,
    label: impl Into<String>,
) -> Result<RecordSource> {
    let columns = df
        .get_columns()
        .iter()
        .map(|column| FieldName::new(column.name().as_str()))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut records = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let mut record = Record::new();
        for (field, column) in columns.iter().zip(df.get_columns()) {
            let value = column.get(idx).unwrap_or(AnyValue::Null);
            record.insert(field.clone(), any_to_field_value(value));
        }
        records.push(record);
    }

    Ok(RecordSource::new(name, label, columns, records))
}
