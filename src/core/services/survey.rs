use std::collections::HashMap;

use itertools::Itertools;
use uuid::Uuid;

use crate::core::models::survey::{OptionQuery, QuestionDetail, QuestionQuery, Survey, SurveyDetail, SurveyQuery};
use crate::core::ports::repository::{OptionCommon, QuestionCommon, Store, SurveyCommon};
use crate::error::Error;

pub async fn get_survey<D>(db: &mut D, id: Uuid) -> Result<Option<Survey>, Error>
where
    D: Store,
{
    SurveyCommon::get(db, id).await
}

pub async fn list_surveys<D>(db: &mut D, status: Option<String>) -> Result<Vec<Survey>, Error>
where
    D: Store,
{
    SurveyCommon::query(db, &SurveyQuery { status_eq: status }).await
}

/// The survey with its full question/option tree, or `None` when absent.
pub async fn get_survey_detail<D>(db: &mut D, id: Uuid) -> Result<Option<SurveyDetail>, Error>
where
    D: Store,
{
    let survey = match SurveyCommon::get(db, id).await? {
        Some(survey) => survey,
        None => return Ok(None),
    };
    let questions = load_question_tree(db, id).await?;
    Ok(Some(SurveyDetail { survey, questions }))
}

/// Questions of a survey with their options, sorted by the integer order
/// fields. Rows arrive in insertion order and the sort is stable, so equal
/// orders keep their original sequence.
pub async fn load_question_tree<D>(db: &mut D, survey_id: Uuid) -> Result<Vec<QuestionDetail>, Error>
where
    D: Store,
{
    let mut questions = QuestionCommon::query(db, &QuestionQuery { survey_id_eq: Some(survey_id) }).await?;
    questions.sort_by_key(|q| q.question_order);
    let question_ids = questions.iter().map(|q| q.id).collect();
    let options = OptionCommon::query(db, &OptionQuery { question_id_in: question_ids }).await?;
    let mut grouped: HashMap<Uuid, Vec<_>> = options.into_iter().map(|o| (o.question_id, o)).into_group_map();
    Ok(questions
        .into_iter()
        .map(|question| {
            let mut options = grouped.remove(&question.id).unwrap_or_default();
            options.sort_by_key(|o| o.option_order);
            QuestionDetail { question, options }
        })
        .collect())
}
