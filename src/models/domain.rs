use serde::{Deserialize, Deserializer, Serialize};
use crate::error::MatchError;

/// Academic qualification, ordered from lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QualificationLevel {
    Diploma,
    Undergraduate,
    Postgraduate,
    Doctorate,
}

impl QualificationLevel {
    /// Position on the ordinal scale (DIPLOMA = 1 .. DOCTORATE = 4)
    pub fn rank(self) -> u8 {
        match self {
            QualificationLevel::Diploma => 1,
            QualificationLevel::Undergraduate => 2,
            QualificationLevel::Postgraduate => 3,
            QualificationLevel::Doctorate => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SocialCategory {
    #[default]
    General,
    Obc,
    Sc,
    St,
    Ews,
}

impl SocialCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            SocialCategory::General => "GENERAL",
            SocialCategory::Obc => "OBC",
            SocialCategory::Sc => "SC",
            SocialCategory::St => "ST",
            SocialCategory::Ews => "EWS",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DistrictType {
    #[default]
    Urban,
    Rural,
    Aspirational,
}

impl DistrictType {
    pub fn as_str(self) -> &'static str {
        match self {
            DistrictType::Urban => "URBAN",
            DistrictType::Rural => "RURAL",
            DistrictType::Aspirational => "ASPIRATIONAL",
        }
    }
}

/// Treat an explicit JSON `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_true() -> bool { true }

fn default_duration() -> u8 { 1 }

/// Student profile as supplied by the calling application
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(alias = "student_id", default, deserialize_with = "null_as_default")]
    pub student_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub qualification: Option<QualificationLevel>,
    #[serde(alias = "field_of_study", default, deserialize_with = "null_as_default")]
    pub field_of_study: String,
    #[serde(default)]
    pub cgpa: f64,
    #[serde(alias = "location_preference", default, deserialize_with = "null_as_default")]
    pub location_preference: Vec<String>,
    #[serde(alias = "sector_interests", default, deserialize_with = "null_as_default")]
    pub sector_interests: Vec<String>,
    #[serde(alias = "social_category", default, deserialize_with = "null_as_default")]
    pub social_category: SocialCategory,
    #[serde(alias = "district_type", default, deserialize_with = "null_as_default")]
    pub district_type: DistrictType,
    #[serde(alias = "past_internships", default, deserialize_with = "null_as_default")]
    pub past_internships: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub languages: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub certifications: Vec<String>,
}

impl Student {
    pub fn is_first_time_applicant(&self) -> bool {
        self.past_internships == 0
    }

    /// First required field the record leaves out, by its wire name
    pub fn missing_field(&self) -> Option<&'static str> {
        self.qualification.is_none().then_some("qualification")
    }
}

/// Internship opportunity with its capacity snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Internship {
    #[serde(alias = "internship_id", default, deserialize_with = "null_as_default")]
    pub internship_id: String,
    #[serde(alias = "company_name", default, deserialize_with = "null_as_default")]
    pub company_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(alias = "required_skills", default, deserialize_with = "null_as_default")]
    pub required_skills: Vec<String>,
    #[serde(alias = "preferred_qualification", default, deserialize_with = "null_as_default")]
    pub preferred_qualification: Option<QualificationLevel>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sector: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default)]
    pub stipend: Option<f64>,
    #[serde(alias = "duration_months", default = "default_duration")]
    pub duration_months: u8,
    #[serde(default, deserialize_with = "null_as_default")]
    pub capacity: Option<u32>,
    #[serde(alias = "filled_positions", default, deserialize_with = "null_as_default")]
    pub filled_positions: u32,
    #[serde(alias = "min_cgpa", default, deserialize_with = "null_as_default")]
    pub min_cgpa: f64,
    #[serde(alias = "preferred_fields", default, deserialize_with = "null_as_default")]
    pub preferred_fields: Vec<String>,
    #[serde(alias = "is_active", default = "default_true")]
    pub is_active: bool,
}

impl Internship {
    /// Open slots left; never negative even if the snapshot is inconsistent
    pub fn remaining_capacity(&self) -> u32 {
        self.capacity.unwrap_or(0).saturating_sub(self.filled_positions)
    }

    /// First required field the record leaves out, by its wire name
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.preferred_qualification.is_none() {
            Some("preferredQualification")
        } else if self.capacity.is_none() {
            Some("capacity")
        } else {
            None
        }
    }
}

/// Human-readable reasoning behind each score component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchExplanation {
    pub skills: String,
    pub qualification: String,
    pub location: String,
    pub sector: String,
    pub diversity: String,
}

/// Compatibility of one (student, internship) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchScore {
    #[serde(alias = "student_id")]
    pub student_id: String,
    #[serde(alias = "internship_id")]
    pub internship_id: String,
    #[serde(alias = "overall_score")]
    pub overall_score: f64,
    #[serde(alias = "skill_score")]
    pub skill_score: f64,
    #[serde(alias = "qualification_score")]
    pub qualification_score: f64,
    #[serde(alias = "location_score")]
    pub location_score: f64,
    #[serde(alias = "sector_score")]
    pub sector_score: f64,
    #[serde(alias = "diversity_score")]
    pub diversity_score: f64,
    #[serde(default)]
    pub explanation: MatchExplanation,
}

/// Ranked matches for one student
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    #[serde(alias = "student_id")]
    pub student_id: String,
    #[serde(alias = "student_name", default)]
    pub student_name: String,
    #[serde(default)]
    pub matches: Vec<MatchScore>,
    #[serde(alias = "total_matches", default)]
    pub total_matches: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Student,
    Internship,
}

/// Input record skipped because it could not be processed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedRecord {
    pub kind: RecordKind,
    pub index: usize,
    pub id: Option<String>,
    pub reason: String,
}

/// Weights of the five score components; must sum to 1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub skill: f64,
    pub qualification: f64,
    pub location: f64,
    pub sector: f64,
    pub diversity: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skill: 0.30,
            qualification: 0.20,
            location: 0.20,
            sector: 0.15,
            diversity: 0.15,
        }
    }
}

impl ScoringWeights {
    const SUM_TOLERANCE: f64 = 1e-6;

    pub fn sum(&self) -> f64 {
        self.skill + self.qualification + self.location + self.sector + self.diversity
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        let components =
            [self.skill, self.qualification, self.location, self.sector, self.diversity];
        let all_non_negative = components.iter().all(|w| w.is_finite() && *w >= 0.0);
        let sum = self.sum();

        if !all_non_negative || (sum - 1.0).abs() > Self::SUM_TOLERANCE {
            return Err(MatchError::InvalidWeights { sum });
        }
        Ok(())
    }

    /// Weighted sum of the components of a score, clamped to [0, 1]
    pub fn combine(&self, score: &MatchScore) -> f64 {
        let total = score.skill_score * self.skill
            + score.qualification_score * self.qualification
            + score.location_score * self.location
            + score.sector_score * self.sector
            + score.diversity_score * self.diversity;

        total.clamp(0.0, 1.0)
    }

    /// Scale the diversity weight up by `multiplier` and renormalize to 1.0
    ///
    /// Used for the internship side of allocation, where diversity decides
    /// contested slots without changing what a student prefers.
    pub fn with_diversity_emphasis(&self, multiplier: f64) -> Self {
        let diversity = self.diversity * multiplier.max(1.0);
        let total = self.skill + self.qualification + self.location + self.sector + diversity;

        if total <= f64::EPSILON {
            return *self;
        }

        Self {
            skill: self.skill / total,
            qualification: self.qualification / total,
            location: self.location / total,
            sector: self.sector / total,
            diversity: diversity / total,
        }
    }
}
