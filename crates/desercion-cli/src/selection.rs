//! Parsing of dataset and filter arguments.

use anyhow::{Result, bail};

use desercion_model::{FilterSelection, FilterValue};

/// Parse `field=value` pairs into a selection, keeping argument order.
///
/// A value of `all` (or an empty value) clears the filter for that field.
pub fn parse_filters<S: AsRef<str>>(args: &[S]) -> Result<FilterSelection> {
    let mut selection = FilterSelection::new();
    for arg in args {
        let arg = arg.as_ref();
        let Some((field, value)) = arg.split_once('=') else {
            bail!("filter must look like field=value, got {arg:?}");
        };
        let field = field.trim();
        if field.is_empty() {
            bail!("filter has an empty field name: {arg:?}");
        }
        selection.set(field, FilterValue::parse(value));
    }
    Ok(selection)
}

/// Expand dataset arguments: comma-separated names are split and an empty
/// list selects every source in `available`.
pub fn resolve_datasets<S: AsRef<str>>(args: &[S], available: &[String]) -> Vec<String> {
    let names: Vec<String> = args
        .iter()
        .flat_map(|arg| arg.as_ref().split(','))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();
    if names.is_empty() {
        available.to_vec()
    } else {
        names
    }
}
