use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct OptionResult {
    pub option_id: Uuid,
    pub option_text: String,
    pub votes_count: i64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionResult {
    pub question_id: Uuid,
    pub question_text: String,
    /// Number of selections recorded for this question. A multi-select
    /// respondent contributes once per chosen option, so this is not a
    /// respondent count.
    pub total_answers: i64,
    pub options: Vec<OptionResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SurveyResults {
    pub survey_id: Uuid,
    pub survey_title: String,
    /// Cached count of users who completed the whole survey, a different
    /// denominator than any question's `total_answers`.
    pub total_responses: i32,
    pub questions: Vec<QuestionResult>,
}
