use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Closed set of request outcomes. Validation failures are ordinary values
/// the caller switches on; only the infrastructure variants map to 5xx.
#[derive(Debug, ThisError)]
pub enum Error {
    #[error("survey {0} not found")]
    SurveyNotFound(Uuid),

    #[error("survey is not active (status: {0})")]
    SurveyNotActive(String),

    #[error("you have already completed this survey")]
    AlreadyCompleted,

    #[error("question {0} not found in survey")]
    QuestionNotFound(Uuid),

    #[error("no options selected for question {0}")]
    EmptyAnswer(Uuid),

    #[error("question {0} does not allow multiple answers")]
    MultipleAnswersNotAllowed(Uuid),

    #[error("option {option_id} does not belong to question {question_id}")]
    OptionNotInQuestion { option_id: Uuid, question_id: Uuid },

    #[error("survey id in path and body do not match")]
    SurveyIdMismatch,

    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("jwt error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("config error: {0}")]
    Config(#[from] dotenv::Error),
}

impl Error {
    /// Stable machine-readable reason code, independent of the message text.
    pub fn code(&self) -> &'static str {
        match self {
            Error::SurveyNotFound(_) => "survey_not_found",
            Error::SurveyNotActive(_) => "survey_not_active",
            Error::AlreadyCompleted => "already_completed",
            Error::QuestionNotFound(_) => "question_not_found",
            Error::EmptyAnswer(_) => "empty_answer",
            Error::MultipleAnswersNotAllowed(_) => "multiple_answers_not_allowed",
            Error::OptionNotInQuestion { .. } => "option_not_in_question",
            Error::SurveyIdMismatch => "survey_id_mismatch",
            Error::Unauthenticated(_) => "unauthenticated",
            Error::InvalidCredentials => "invalid_credentials",
            Error::Database(_) => "persistence_failure",
            Error::Jwt(_) => "jwt_failure",
            Error::Config(_) => "config_failure",
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::SurveyNotFound(_) => StatusCode::NOT_FOUND,
            Error::SurveyNotActive(_)
            | Error::AlreadyCompleted
            | Error::QuestionNotFound(_)
            | Error::EmptyAnswer(_)
            | Error::MultipleAnswersNotAllowed(_)
            | Error::OptionNotInQuestion { .. }
            | Error::SurveyIdMismatch => StatusCode::BAD_REQUEST,
            Error::Unauthenticated(_) | Error::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Error::Database(_) | Error::Jwt(_) | Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Server-side faults keep their details in the log, not the body.
        let message = match self {
            Error::Database(_) => "database error".into(),
            Error::Jwt(_) => "token error".into(),
            Error::Config(_) => "configuration error".into(),
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(ErrorBody { code: self.code(), message })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let id = Uuid::new_v4();
        assert_eq!(Error::SurveyNotFound(id).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(Error::SurveyNotActive("draft".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(Error::AlreadyCompleted.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(Error::MultipleAnswersNotAllowed(id).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            Error::OptionNotInQuestion { option_id: id, question_id: id }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(Error::Unauthenticated("no token".into()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(Error::Database(sqlx::Error::PoolClosed).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_database_details_not_leaked() {
        let resp = Error::Database(sqlx::Error::PoolClosed).error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_message_carries_actual_status() {
        let err = Error::SurveyNotActive("completed".into());
        assert_eq!(err.to_string(), "survey is not active (status: completed)");
        assert_eq!(err.code(), "survey_not_active");
    }
}
