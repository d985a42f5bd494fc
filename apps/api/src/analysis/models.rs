use serde::{Deserialize, Serialize};

/// Seniority bucket assigned to the candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Technical,
    Behavioral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CandidateProfile {
    pub experience_level: ExperienceLevel,
    pub key_skills: Vec<String>,
    pub primary_domain: String,
    /// Free-form, e.g. "3 years".
    pub years_of_experience: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterviewQuestion {
    pub id: u32,
    pub question: String,
    pub expected_answer: String,
    pub difficulty: Difficulty,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub skill_tested: String,
}

/// Structured outcome of one resume analysis.
///
/// The shape is strict: missing fields, unknown fields and out-of-range enum
/// values all fail deserialization. Nothing is defaulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisResult {
    pub candidate_profile: CandidateProfile,
    pub interview_questions: Vec<InterviewQuestion>,
}
