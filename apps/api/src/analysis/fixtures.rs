//! Shared test fixtures for the analysis pipeline.

use std::path::Path;

/// A well-formed model reply with five questions.
pub const VALID_ANALYSIS: &str = r#"{
    "candidate_profile": {
        "experience_level": "senior",
        "key_skills": ["Rust", "PostgreSQL", "Kubernetes"],
        "primary_domain": "Backend Engineering",
        "years_of_experience": "8 years"
    },
    "interview_questions": [
        {"id": 1, "question": "How do you design idempotent APIs?", "expected_answer": "Idempotency keys, safe retries", "difficulty": "medium", "type": "technical", "skill_tested": "API design"},
        {"id": 2, "question": "Explain Rust lifetimes.", "expected_answer": "Borrow scopes, elision rules", "difficulty": "hard", "type": "technical", "skill_tested": "Rust"},
        {"id": 3, "question": "Tell me about a failed launch.", "expected_answer": "Ownership, learning", "difficulty": "easy", "type": "behavioral", "skill_tested": "Accountability"},
        {"id": 4, "question": "How would you tune a slow query?", "expected_answer": "EXPLAIN, indexes", "difficulty": "medium", "type": "technical", "skill_tested": "PostgreSQL"},
        {"id": 5, "question": "Describe mentoring a junior engineer.", "expected_answer": "Concrete example, outcome", "difficulty": "easy", "type": "behavioral", "skill_tested": "Mentorship"}
    ]
}"#;

/// Smallest byte sequence the intake accepts as a PDF, padded to `len` bytes.
pub fn pdf_bytes(len: usize) -> Vec<u8> {
    let mut bytes = b"%PDF-1.4\n% resume fixture\nJane Doe - Senior Rust Engineer\n".to_vec();
    bytes.resize(len.max(bytes.len()), b' ');
    bytes
}

/// Number of entries in a staging directory (0 if it does not exist).
pub fn staged_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}
