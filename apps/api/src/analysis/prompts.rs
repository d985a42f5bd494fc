//! Prompt Builder: composes the analysis prompt from extracted resume text.

use crate::analysis::extract::ExtractedText;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;

/// System prompt for resume analysis.
pub const ANALYSIS_SYSTEM: &str =
    "You are a resume analyzer and interview question generator. Return only valid JSON.";

/// Number of interview questions requested from the model.
pub const QUESTION_COUNT: usize = 5;

/// Analysis prompt template.
/// Replace: {question_count}, {json_instruction}, {resume_text}
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are an expert resume analyzer and interview question generator.

Here's a resume:
{resume_text}

Analyze this resume and provide:
1. A summary of the candidate's profile
2. Key skills identified
3. Experience level assessment
4. {question_count} relevant interview questions

Return your response in this EXACT JSON format (no extra fields):
{
  "candidate_profile": {
    "experience_level": "entry" | "mid" | "senior",
    "key_skills": ["skill1", "skill2"],
    "primary_domain": "main field",
    "years_of_experience": "X years"
  },
  "interview_questions": [
    {
      "id": 1,
      "question": "detailed question",
      "expected_answer": "key points to look for",
      "difficulty": "easy" | "medium" | "hard",
      "type": "technical" | "behavioral",
      "skill_tested": "specific skill"
    }
  ]
}

RULES:
1. `interview_questions` must contain exactly {question_count} entries with ids 1 to {question_count}
2. Enum fields must use one of the listed lowercase values verbatim
3. `years_of_experience` is a string, e.g. "3 years"
4. {json_instruction}"#;

/// A fully composed prompt. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisPrompt {
    system: &'static str,
    user: String,
}

impl AnalysisPrompt {
    pub fn system(&self) -> &str {
        self.system
    }

    pub fn user(&self) -> &str {
        &self.user
    }
}

/// Builds the analysis prompt. The resume text is embedded verbatim, last,
/// so placeholder-like sequences inside it are never substituted.
pub fn build_prompt(text: &ExtractedText) -> AnalysisPrompt {
    let count = QUESTION_COUNT.to_string();
    let user = ANALYSIS_PROMPT_TEMPLATE
        .replace("{question_count}", &count)
        .replace("{json_instruction}", JSON_ONLY_INSTRUCTION.trim())
        .replace("{resume_text}", text.as_str());

    AnalysisPrompt {
        system: ANALYSIS_SYSTEM,
        user,
    }
}
