use actix_web::web::{Data, Json, Path, Query};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::context::UserInfo;
use crate::core::models::answer::Submit;
use crate::core::models::results::SurveyResults;
use crate::core::models::survey::{status, Survey, SurveyDetail};
use crate::core::services::{completion, results, submission, survey};
use crate::database::sqlx::PgSqlx;
use crate::error::Error;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
}

pub async fn list(params: Query<ListParams>, db: Data<PgPool>) -> Result<Json<Vec<Survey>>, Error> {
    let mut store = PgSqlx::new(db.acquire().await?);
    let surveys = survey::list_surveys(&mut store, params.into_inner().status).await?;
    Ok(Json(surveys))
}

pub async fn detail(survey_id: Path<(Uuid,)>, db: Data<PgPool>) -> Result<Json<SurveyDetail>, Error> {
    let survey_id = survey_id.into_inner().0;
    let mut store = PgSqlx::new(db.acquire().await?);
    let detail = survey::get_survey_detail(&mut store, survey_id)
        .await?
        .ok_or(Error::SurveyNotFound(survey_id))?;
    Ok(Json(detail))
}

#[derive(Debug, Serialize)]
pub struct StartResponse {
    pub survey_id: Uuid,
    pub message: String,
    pub started_at: DateTime<Utc>,
}

/// Advisory check before a client renders the questionnaire. Nothing is
/// reserved; submission revalidates everything transactionally.
pub async fn start(user: UserInfo, survey_id: Path<(Uuid,)>, db: Data<PgPool>) -> Result<Json<StartResponse>, Error> {
    let survey_id = survey_id.into_inner().0;
    let mut store = PgSqlx::new(db.acquire().await?);
    let survey = survey::get_survey(&mut store, survey_id)
        .await?
        .ok_or(Error::SurveyNotFound(survey_id))?;
    if survey.status != status::ACTIVE {
        return Err(Error::SurveyNotActive(survey.status));
    }
    if completion::has_completed(&mut store, survey_id, user.id).await? {
        return Err(Error::AlreadyCompleted);
    }
    Ok(Json(StartResponse {
        survey_id,
        message: "Survey started successfully".into(),
        started_at: Utc::now(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct SubmitBody {
    pub survey_id: Uuid,
    pub answers: Vec<Submit>,
}

#[derive(Debug, Serialize)]
pub struct CompleteResponse {
    pub survey_id: Uuid,
    pub message: String,
    pub completed_at: DateTime<Utc>,
}

pub async fn submit(user: UserInfo, survey_id: Path<(Uuid,)>, Json(body): Json<SubmitBody>, db: Data<PgPool>) -> Result<Json<CompleteResponse>, Error> {
    let survey_id = survey_id.into_inner().0;
    if body.survey_id != survey_id {
        return Err(Error::SurveyIdMismatch);
    }
    let tx = db.begin().await?;
    submission::submit(PgSqlx::new(tx), survey_id, user.id, body.answers).await?;
    Ok(Json(CompleteResponse {
        survey_id,
        message: "Survey completed successfully".into(),
        completed_at: Utc::now(),
    }))
}

pub async fn results(survey_id: Path<(Uuid,)>, db: Data<PgPool>) -> Result<Json<SurveyResults>, Error> {
    let survey_id = survey_id.into_inner().0;
    let mut store = PgSqlx::new(db.acquire().await?);
    let results = results::survey_results(&mut store, survey_id)
        .await?
        .ok_or(Error::SurveyNotFound(survey_id))?;
    Ok(Json(results))
}
