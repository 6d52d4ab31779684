//! Deterministic dropout-risk heuristic.
//!
//! The estimate is a fixed rule table, not a trained model:
//!
//! | Rule                          | Weight |
//! |-------------------------------|--------|
//! | stratum 1 or 2                | 30     |
//! | VIRTUAL or DISTANCIA modality | 25     |
//! | age under 18 or over 30       | 20     |
//! | NOCTURNA shift                | 15     |
//! | male                          | 5      |
//!
//! The weight sum is clamped to 100 and divided by 100.

use desercion_model::{
    Genero, Jornada, Modalidad, Recommendation, RiskAssessment, RiskFactor, RiskFactorKind,
    RiskProfile, RiskTier,
};

/// Upper bound of the weight sum.
pub const MAX_SCORE: u32 = 100;

struct Rule {
    kind: RiskFactorKind,
    weight: u32,
    applies: fn(&RiskProfile) -> bool,
}

fn low_stratum(profile: &RiskProfile) -> bool {
    profile.estrato <= 2
}

fn remote_modality(profile: &RiskProfile) -> bool {
    matches!(profile.modalidad, Modalidad::Virtual | Modalidad::Distancia)
}

fn atypical_age(profile: &RiskProfile) -> bool {
    profile.edad < 18 || profile.edad > 30
}

fn night_shift(profile: &RiskProfile) -> bool {
    profile.jornada == Jornada::Nocturna
}

fn male(profile: &RiskProfile) -> bool {
    profile.genero == Genero::Masculino
}

const RULES: [Rule; 5] = [
    Rule {
        kind: RiskFactorKind::LowStratum,
        weight: 30,
        applies: low_stratum,
    },
    Rule {
        kind: RiskFactorKind::RemoteModality,
        weight: 25,
        applies: remote_modality,
    },
    Rule {
        kind: RiskFactorKind::AgeOutsideTypicalRange,
        weight: 20,
        applies: atypical_age,
    },
    Rule {
        kind: RiskFactorKind::NightShift,
        weight: 15,
        applies: night_shift,
    },
    Rule {
        kind: RiskFactorKind::MaleGender,
        weight: 5,
        applies: male,
    },
];

/// Tier for a clamped score; thresholds at 30, 50 and 70.
pub fn tier_for(score: u32) -> RiskTier {
    match score {
        0..30 => RiskTier::Low,
        30..50 => RiskTier::Medium,
        50..70 => RiskTier::High,
        _ => RiskTier::Critical,
    }
}

fn probability(score: u32) -> f64 {
    f64::from(score.min(MAX_SCORE)) / f64::from(MAX_SCORE)
}

/// Risk probability in `[0, 1]` and its tier.
pub fn score(profile: &RiskProfile) -> (f64, RiskTier) {
    let assessment = assess(profile);
    (assessment.probability, assessment.tier)
}

/// Full assessment: clamped score, probability, tier, every evaluated factor
/// and the follow-up actions.
pub fn assess(profile: &RiskProfile) -> RiskAssessment {
    let factors: Vec<RiskFactor> = RULES
        .iter()
        .map(|rule| RiskFactor {
            kind: rule.kind,
            weight: rule.weight,
            triggered: (rule.applies)(profile),
        })
        .collect();
    let raw: u32 = factors
        .iter()
        .filter(|factor| factor.triggered)
        .map(|factor| factor.weight)
        .sum();
    let score = raw.min(MAX_SCORE);

    RiskAssessment {
        score,
        probability: probability(score),
        tier: tier_for(score),
        factors,
        recommendations: recommendations(score, profile),
    }
}

fn recommendations(score: u32, profile: &RiskProfile) -> Vec<Recommendation> {
    let mut actions = Vec::new();
    if score > 50 {
        actions.push(Recommendation::AssignCounsellor);
    }
    if score > 30 {
        actions.push(Recommendation::EnrollTutoring);
    }
    if low_stratum(profile) {
        actions.push(Recommendation::SocioeconomicSupport);
    }
    if score > 70 {
        actions.push(Recommendation::MonthlyFollowUp);
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(edad: u32, genero: Genero, estrato: u8, modalidad: Modalidad, jornada: Jornada) -> RiskProfile {
        RiskProfile::new(edad, genero, estrato, modalidad, jornada).unwrap()
    }

    #[test]
    fn no_factor_is_low() {
        let p = profile(20, Genero::Femenino, 4, Modalidad::Presencial, Jornada::Diurna);
        assert_eq!(score(&p), (0.0, RiskTier::Low));
        assert!(assess(&p).recommendations.is_empty());
    }

    #[test]
    fn every_factor_is_critical() {
        let p = profile(35, Genero::Masculino, 1, Modalidad::Virtual, Jornada::Nocturna);
        let assessment = assess(&p);
        assert_eq!(assessment.score, 95);
        assert_eq!(assessment.probability, 0.95);
        assert_eq!(assessment.tier, RiskTier::Critical);
        assert!(assessment.factors.iter().all(|f| f.triggered));
        assert_eq!(
            assessment.recommendations,
            vec![
                Recommendation::AssignCounsellor,
                Recommendation::EnrollTutoring,
                Recommendation::SocioeconomicSupport,
                Recommendation::MonthlyFollowUp,
            ]
        );
    }

    #[test]
    fn distance_and_young_is_medium() {
        let p = profile(17, Genero::Femenino, 3, Modalidad::Distancia, Jornada::Diurna);
        assert_eq!(score(&p), (0.45, RiskTier::Medium));
        assert_eq!(assess(&p).recommendations, vec![Recommendation::EnrollTutoring]);
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(tier_for(29), RiskTier::Low);
        assert_eq!(tier_for(30), RiskTier::Medium);
        assert_eq!(tier_for(50), RiskTier::High);
        assert_eq!(tier_for(70), RiskTier::Critical);
        assert_eq!(tier_for(100), RiskTier::Critical);
    }

    #[test]
    fn age_boundaries_are_exclusive() {
        let at_18 = profile(18, Genero::Femenino, 4, Modalidad::Presencial, Jornada::Diurna);
        let at_30 = profile(30, Genero::Femenino, 4, Modalidad::Presencial, Jornada::Diurna);
        assert_eq!(assess(&at_18).score, 0);
        assert_eq!(assess(&at_30).score, 0);
    }
}
