use std::sync::Arc;

use crate::core::similarity::{normalize_token, token_set, SkillSimilarity};
use crate::models::{
    DistrictType, Internship, MatchExplanation, MatchScore, QualificationLevel, ScoringWeights,
    SocialCategory, Student,
};

/// Score multiplier per missing qualification level
const QUALIFICATION_GAP_DECAY: f64 = 0.5;
/// Upper bound of the qualification score when CGPA is below the internship minimum
const CGPA_SHORTFALL_FACTOR: f64 = 0.1;

const LOCATION_PARTIAL: f64 = 0.8;
/// Willingness-to-relocate default when no preferred location matches
const LOCATION_BASELINE: f64 = 0.3;

const SECTOR_PARTIAL: f64 = 0.7;
const SECTOR_BASELINE: f64 = 0.2;
const FIELD_PARTIAL: f64 = 0.7;
const FIELD_BLEND: f64 = 0.3;

const DIVERSITY_BASELINE: f64 = 0.5;
const RESERVED_CATEGORY_BOOST: f64 = 0.2;
const EWS_BOOST: f64 = 0.1;
const DISTRICT_BOOST: f64 = 0.2;
const FIRST_TIMER_BOOST: f64 = 0.1;

/// Computes the five-dimension compatibility score of a (student, internship) pair
///
/// Scoring formula:
/// overall = (
///     skill_score * w.skill +                  # required skills covered
///     qualification_score * w.qualification +  # level gap, CGPA gate
///     location_score * w.location +            # preferred locations
///     sector_score * w.sector +                # sector interests, field of study
///     diversity_score * w.diversity            # underrepresentation boost
/// )
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    weights: ScoringWeights,
    skill_similarity: Option<Arc<dyn SkillSimilarity>>,
}

impl ScoringEngine {
    pub fn new(weights: ScoringWeights) -> Self {
        Self {
            weights,
            skill_similarity: None,
        }
    }

    /// Use a soft skill similarity measure instead of exact token overlap
    pub fn with_skill_similarity(mut self, similarity: Arc<dyn SkillSimilarity>) -> Self {
        self.skill_similarity = Some(similarity);
        self
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn score(&self, student: &Student, internship: &Internship) -> MatchScore {
        self.score_with(student, internship, true)
    }

    pub fn score_with(
        &self,
        student: &Student,
        internship: &Internship,
        diversity_boost: bool,
    ) -> MatchScore {
        let (skill, skill_exp) = skill_score(
            &student.skills,
            &internship.required_skills,
            self.skill_similarity.as_deref(),
        );

        // An unstated level sits at the bottom of the scale on either side
        let (qualification, qual_exp) = qualification_score(
            student.qualification.unwrap_or(QualificationLevel::Diploma),
            internship.preferred_qualification.unwrap_or(QualificationLevel::Diploma),
            student.cgpa,
            internship.min_cgpa,
        );

        let (location, loc_exp) =
            location_score(&student.location_preference, &internship.location);

        let (sector, sector_exp) = sector_score(
            &student.sector_interests,
            &internship.sector,
            &student.field_of_study,
            &internship.preferred_fields,
        );

        let (diversity, div_exp) = diversity_score(student, diversity_boost);

        let mut score = MatchScore {
            student_id: student.student_id.clone(),
            internship_id: internship.internship_id.clone(),
            overall_score: 0.0,
            skill_score: round4(skill),
            qualification_score: round4(qualification),
            location_score: round4(location),
            sector_score: round4(sector),
            diversity_score: round4(diversity),
            explanation: MatchExplanation {
                skills: skill_exp,
                qualification: qual_exp,
                location: loc_exp,
                sector: sector_exp,
                diversity: div_exp,
            },
        };
        score.overall_score = round4(self.weights.combine(&score));
        score
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(ScoringWeights::default())
    }
}

#[inline]
fn round4(value: f64) -> f64 {
    (value.clamp(0.0, 1.0) * 10_000.0).round() / 10_000.0
}

/// Fraction of required skills the student covers (0-1)
///
/// Without a similarity measure this is plain token overlap. With one, each
/// required skill counts its best match among the student's skills.
pub fn skill_score(
    student_skills: &[String],
    required_skills: &[String],
    similarity: Option<&dyn SkillSimilarity>,
) -> (f64, String) {
    let required = token_set(required_skills);
    if required.is_empty() {
        return (1.0, "No specific skills required".to_string());
    }

    let offered = token_set(student_skills);
    let matched: Vec<&str> = required
        .iter()
        .filter(|skill| offered.contains(*skill))
        .map(String::as_str)
        .collect();
    let overlap = matched.len() as f64 / required.len() as f64;

    let Some(similarity) = similarity else {
        let explanation = format!(
            "Matched {} of {} required skills{}",
            matched.len(),
            required.len(),
            if matched.is_empty() { String::new() } else { format!(" ({})", matched.join(", ")) }
        );
        return (overlap, explanation);
    };

    let total: f64 = required
        .iter()
        .map(|req| {
            offered
                .iter()
                .map(|have| {
                    if have == req {
                        1.0
                    } else {
                        similarity.similarity(have, req).clamp(0.0, 1.0)
                    }
                })
                .fold(0.0, f64::max)
        })
        .sum();
    let semantic = total / required.len() as f64;

    (
        semantic,
        format!("Semantic similarity: {:.2}, Direct overlap: {:.2}", semantic, overlap),
    )
}

/// Qualification fit (0-1)
///
/// 1.0 at or above the preferred level, halved per missing level. A CGPA
/// below the internship minimum caps the result at 0.1.
pub fn qualification_score(
    student_level: QualificationLevel,
    preferred_level: QualificationLevel,
    cgpa: f64,
    min_cgpa: f64,
) -> (f64, String) {
    let gap = preferred_level.rank().saturating_sub(student_level.rank());
    let level_score = QUALIFICATION_GAP_DECAY.powi(gap as i32);

    let mut explanation = if gap == 0 {
        "Meets preferred qualification".to_string()
    } else {
        format!("{} level(s) below preferred qualification", gap)
    };

    if cgpa < min_cgpa {
        let ratio = if min_cgpa > 0.0 { (cgpa / min_cgpa).clamp(0.0, 1.0) } else { 0.0 };
        explanation.push_str(&format!("; CGPA {:.2} below minimum {:.2}", cgpa, min_cgpa));
        return (level_score * CGPA_SHORTFALL_FACTOR * ratio, explanation);
    }

    (level_score, explanation)
}

/// Location fit (0-1); never below the relocation baseline
pub fn location_score(preferences: &[String], location: &str) -> (f64, String) {
    let location = normalize_token(location);
    let preferences = token_set(preferences);

    if location.is_empty() || preferences.is_empty() {
        return (LOCATION_BASELINE, "No location match".to_string());
    }

    if preferences.contains(&location) {
        return (1.0, "Exact location match".to_string());
    }

    if preferences.iter().any(|p| p.contains(&location) || location.contains(p.as_str())) {
        return (LOCATION_PARTIAL, "Partial location match".to_string());
    }

    (LOCATION_BASELINE, "No location match".to_string())
}

/// Sector fit (0-1), blended with field of study when the internship names preferred fields
pub fn sector_score(
    interests: &[String],
    sector: &str,
    field_of_study: &str,
    preferred_fields: &[String],
) -> (f64, String) {
    let (sector_fit, sector_label) =
        graded_overlap(interests, sector, SECTOR_PARTIAL, SECTOR_BASELINE);
    let sector_exp = format!("{} sector match", sector_label);

    if token_set(preferred_fields).is_empty() {
        return (sector_fit, sector_exp);
    }

    let (field_fit, field_label) =
        graded_overlap(preferred_fields, field_of_study, FIELD_PARTIAL, 0.0);
    let score = sector_fit * (1.0 - FIELD_BLEND) + field_fit * FIELD_BLEND;

    (score, format!("{}; {} field match", sector_exp, field_label.to_lowercase()))
}

/// Exact / partial / no overlap between a list and a single value
fn graded_overlap(list: &[String], value: &str, partial: f64, none: f64) -> (f64, &'static str) {
    let value = normalize_token(value);
    let list = token_set(list);

    if value.is_empty() || list.is_empty() {
        return (none, "No");
    }
    if list.contains(&value) {
        return (1.0, "Exact");
    }
    if list.iter().any(|item| item.contains(&value) || value.contains(item.as_str())) {
        return (partial, "Partial");
    }
    (none, "No")
}

/// Diversity boost (0-1); depends on the student only
pub fn diversity_score(student: &Student, diversity_boost: bool) -> (f64, String) {
    if !diversity_boost {
        return (DIVERSITY_BASELINE, "Diversity boost disabled".to_string());
    }

    let mut score = DIVERSITY_BASELINE;
    let mut factors = Vec::new();

    match student.social_category {
        SocialCategory::Sc | SocialCategory::St | SocialCategory::Obc => {
            score += RESERVED_CATEGORY_BOOST;
            factors.push(format!("Social category: {}", student.social_category.as_str()));
        }
        SocialCategory::Ews => {
            score += EWS_BOOST;
            factors.push(format!("Social category: {}", student.social_category.as_str()));
        }
        SocialCategory::General => {}
    }

    if matches!(student.district_type, DistrictType::Rural | DistrictType::Aspirational) {
        score += DISTRICT_BOOST;
        factors.push(format!("District type: {}", student.district_type.as_str()));
    }

    if student.is_first_time_applicant() {
        score += FIRST_TIMER_BOOST;
        factors.push("First-time applicant".to_string());
    }

    let explanation = if factors.is_empty() {
        "No diversity factors".to_string()
    } else {
        factors.join(", ")
    };

    (score.min(1.0), explanation)
}
