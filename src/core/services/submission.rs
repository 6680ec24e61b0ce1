use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::core::models::answer::{Insert as AnswerInsert, Submit};
use crate::core::models::survey::{status, QuestionDetail};
use crate::core::ports::repository::{AnswerCommon, Store, SurveyCommon, TxStore};
use crate::core::services::{completion, survey};
use crate::error::Error;

/// Validates and persists a full answer set for one (survey, user) pair as a
/// single transaction. The survey row is locked up front so the completion
/// check and the counter increment cannot race with a concurrent submission.
pub async fn submit<T>(mut store: T, survey_id: Uuid, user_id: i32, answers: Vec<Submit>) -> Result<(), Error>
where
    T: TxStore,
{
    match try_submit(&mut store, survey_id, user_id, answers).await {
        Ok(()) => {
            store.commit().await?;
            Ok(())
        }
        Err(e) => {
            // Best effort; the caller gets the rejection reason, not a
            // secondary rollback failure.
            if let Err(rollback_err) = store.rollback().await {
                log::warn!("rollback failed after rejected submission: {}", rollback_err);
            }
            Err(e)
        }
    }
}

async fn try_submit<D>(db: &mut D, survey_id: Uuid, user_id: i32, answers: Vec<Submit>) -> Result<(), Error>
where
    D: Store,
{
    let survey = SurveyCommon::get_for_update(db, survey_id)
        .await?
        .ok_or(Error::SurveyNotFound(survey_id))?;
    if survey.status != status::ACTIVE {
        return Err(Error::SurveyNotActive(survey.status));
    }
    if completion::has_completed(db, survey_id, user_id).await? {
        return Err(Error::AlreadyCompleted);
    }
    let questions = survey::load_question_tree(db, survey_id).await?;
    validate_answers(&questions, &answers)?;
    let rows = answers
        .iter()
        .flat_map(|a| {
            a.option_ids.iter().map(|&option_id| AnswerInsert {
                question_id: a.question_id,
                option_id,
                user_id,
            })
        })
        .collect();
    AnswerCommon::bulk_insert(db, rows).await?;
    SurveyCommon::increment_responses(db, survey_id).await?;
    Ok(())
}

/// Schema-driven validation over the already-loaded question tree. Entries
/// are checked in request order; the first failure wins.
fn validate_answers(questions: &[QuestionDetail], answers: &[Submit]) -> Result<(), Error> {
    let by_id: HashMap<Uuid, &QuestionDetail> = questions.iter().map(|q| (q.question.id, q)).collect();
    for answer in answers {
        let question = by_id
            .get(&answer.question_id)
            .ok_or(Error::QuestionNotFound(answer.question_id))?;
        if answer.option_ids.is_empty() {
            return Err(Error::EmptyAnswer(answer.question_id));
        }
        if answer.option_ids.len() > 1 && !question.question.allow_multiple_answers {
            return Err(Error::MultipleAnswersNotAllowed(answer.question_id));
        }
        let valid: HashSet<Uuid> = question.options.iter().map(|o| o.id).collect();
        for &option_id in &answer.option_ids {
            if !valid.contains(&option_id) {
                return Err(Error::OptionNotInQuestion {
                    option_id,
                    question_id: answer.question_id,
                });
            }
        }
    }
    Ok(())
}
