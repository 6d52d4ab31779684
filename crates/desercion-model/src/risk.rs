//! Synthetic student profile and risk assessment types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ModelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genero {
    #[serde(rename = "M")]
    Masculino,
    #[serde(rename = "F")]
    Femenino,
}

impl Genero {
    pub fn code(self) -> &'static str {
        match self {
            Self::Masculino => "M",
            Self::Femenino => "F",
        }
    }
}

impl FromStr for Genero {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "M" => Ok(Self::Masculino),
            "F" => Ok(Self::Femenino),
            _ => Err(ModelError::UnknownVariant {
                kind: "genero",
                value: value.to_string(),
            }),
        }
    }
}

impl fmt::Display for Genero {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Modalidad {
    Presencial,
    Virtual,
    Distancia,
}

impl Modalidad {
    pub fn code(self) -> &'static str {
        match self {
            Self::Presencial => "PRESENCIAL",
            Self::Virtual => "VIRTUAL",
            Self::Distancia => "DISTANCIA",
        }
    }
}

impl FromStr for Modalidad {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "PRESENCIAL" => Ok(Self::Presencial),
            "VIRTUAL" => Ok(Self::Virtual),
            "DISTANCIA" => Ok(Self::Distancia),
            _ => Err(ModelError::UnknownVariant {
                kind: "modalidad",
                value: value.to_string(),
            }),
        }
    }
}

impl fmt::Display for Modalidad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Jornada {
    Diurna,
    Nocturna,
    Extendida,
}

impl Jornada {
    pub fn code(self) -> &'static str {
        match self {
            Self::Diurna => "DIURNA",
            Self::Nocturna => "NOCTURNA",
            Self::Extendida => "EXTENDIDA",
        }
    }
}

impl FromStr for Jornada {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "DIURNA" => Ok(Self::Diurna),
            "NOCTURNA" => Ok(Self::Nocturna),
            "EXTENDIDA" => Ok(Self::Extendida),
            _ => Err(ModelError::UnknownVariant {
                kind: "jornada",
                value: value.to_string(),
            }),
        }
    }
}

impl fmt::Display for Jornada {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A manually entered student profile for the risk estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskProfile {
    pub edad: u32,
    pub genero: Genero,
    /// Socioeconomic stratum, 1 (lowest) to 6 (highest).
    pub estrato: u8,
    pub modalidad: Modalidad,
    pub jornada: Jornada,
}

impl RiskProfile {
    pub const STRATUM_RANGE: std::ops::RangeInclusive<u8> = 1..=6;

    /// Build a profile, rejecting strata outside 1..=6.
    pub fn new(
        edad: u32,
        genero: Genero,
        estrato: u8,
        modalidad: Modalidad,
        jornada: Jornada,
    ) -> Result<Self, ModelError> {
        if !Self::STRATUM_RANGE.contains(&estrato) {
            return Err(ModelError::StratumOutOfRange(estrato));
        }
        Ok(Self {
            edad,
            genero,
            estrato,
            modalidad,
            jornada,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTier {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskTier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactorKind {
    LowStratum,
    RemoteModality,
    AgeOutsideTypicalRange,
    NightShift,
    MaleGender,
}

impl RiskFactorKind {
    pub fn description(self) -> &'static str {
        match self {
            Self::LowStratum => "stratum 1-2",
            Self::RemoteModality => "virtual or distance modality",
            Self::AgeOutsideTypicalRange => "age under 18 or over 30",
            Self::NightShift => "night shift",
            Self::MaleGender => "male",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub kind: RiskFactorKind,
    pub weight: u32,
    pub triggered: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    AssignCounsellor,
    EnrollTutoring,
    SocioeconomicSupport,
    MonthlyFollowUp,
}

impl Recommendation {
    pub fn description(self) -> &'static str {
        match self {
            Self::AssignCounsellor => "Asignar consejero académico",
            Self::EnrollTutoring => "Inscribir en programa de tutorías",
            Self::SocioeconomicSupport => "Evaluar apoyo socioeconómico",
            Self::MonthlyFollowUp => "Seguimiento mensual",
        }
    }
}

/// Full output of the risk heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Sum of triggered weights, clamped to 100.
    pub score: u32,
    pub probability: f64,
    pub tier: RiskTier,
    pub factors: Vec<RiskFactor>,
    pub recommendations: Vec<Recommendation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_categorical_codes_case_insensitively() {
        assert_eq!("m".parse::<Genero>(), Ok(Genero::Masculino));
        assert_eq!(" virtual ".parse::<Modalidad>(), Ok(Modalidad::Virtual));
        assert_eq!("Nocturna".parse::<Jornada>(), Ok(Jornada::Nocturna));
        assert!("MIXTA".parse::<Jornada>().is_err());
    }

    #[test]
    fn profile_rejects_stratum_out_of_range() {
        let result = RiskProfile::new(20, Genero::Femenino, 7, Modalidad::Presencial, Jornada::Diurna);
        assert_eq!(result, Err(ModelError::StratumOutOfRange(7)));
        assert!(RiskProfile::new(20, Genero::Femenino, 6, Modalidad::Presencial, Jornada::Diurna).is_ok());
    }

    #[test]
    fn tiers_order_by_severity() {
        assert!(RiskTier::Low < RiskTier::Critical);
        assert_eq!(RiskTier::Critical.to_string(), "CRITICAL");
    }
}
