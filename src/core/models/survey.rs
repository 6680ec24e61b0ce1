use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle states, stored as plain strings.
pub mod status {
    pub const DRAFT: &str = "draft";
    pub const ACTIVE: &str = "active";
    pub const COMPLETED: &str = "completed";
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Survey {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub created_by: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: DateTime<Utc>,
    pub responses_count: i32,
    pub is_anonymous: bool,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Question {
    pub id: Uuid,
    pub survey_id: Uuid,
    pub question_text: String,
    pub question_order: i32,
    pub allow_multiple_answers: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Opt {
    pub id: Uuid,
    pub question_id: Uuid,
    pub option_text: String,
    pub option_order: i32,
    pub created_at: DateTime<Utc>,
}

/// A question with its options, both already in display order.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionDetail {
    #[serde(flatten)]
    pub question: Question,
    pub options: Vec<Opt>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SurveyDetail {
    #[serde(flatten)]
    pub survey: Survey,
    pub questions: Vec<QuestionDetail>,
}

#[derive(Debug, Default)]
pub struct SurveyQuery {
    pub status_eq: Option<String>,
}

#[derive(Debug, Default)]
pub struct QuestionQuery {
    pub survey_id_eq: Option<Uuid>,
}

#[derive(Debug, Default)]
pub struct OptionQuery {
    pub question_id_in: Vec<Uuid>,
}
