//! Canonical field names shared by the attrition sources.
//!
//! Not every source carries every field; all access goes through
//! [`Record::value`](crate::Record::value), which yields `Missing` for absent
//! fields.

pub const EDAD: &str = "edad";
pub const GENERO: &str = "genero";
pub const ESTRATO: &str = "estrato";
pub const MODALIDAD: &str = "modalidad";
pub const JORNADA: &str = "jornada";
pub const NOMBRE_FACULTAD: &str = "nombre_facultad";
pub const PERIODO_ANO: &str = "periodo_año";

/// Tag stamped on every combined row with the human-readable source label.
pub const DATASET_ORIGEN: &str = "dataset_origen";
