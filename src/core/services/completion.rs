use uuid::Uuid;

use crate::core::ports::repository::{AnswerCommon, Store};
use crate::error::Error;

/// Whether the user has already submitted answers for this survey. Always
/// evaluated fresh against the store; during a submission it runs inside the
/// same transaction as the write that follows.
pub async fn has_completed<D>(db: &mut D, survey_id: Uuid, user_id: i32) -> Result<bool, Error>
where
    D: Store,
{
    AnswerCommon::exists_for_survey(db, survey_id, user_id).await
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::models::answer::Insert as AnswerInsert;
    use crate::core::models::survey::status;
    use crate::core::services::testing::{new_option, new_question, new_survey, MemStore};

    #[tokio::test]
    async fn test_has_completed() {
        let mut db = MemStore::default();
        let survey = new_survey(status::ACTIVE);
        let question = new_question(survey.id, 1, false);
        let option = new_option(question.id, 1);
        {
            let mut state = db.state.lock().unwrap();
            state.surveys.push(survey.clone());
            state.questions.push(question.clone());
            state.options.push(option.clone());
        }
        assert!(!has_completed(&mut db, survey.id, 7).await.unwrap());
        AnswerCommon::bulk_insert(
            &mut db,
            vec![AnswerInsert {
                question_id: question.id,
                option_id: option.id,
                user_id: 7,
            }],
        )
        .await
        .unwrap();
        assert!(has_completed(&mut db, survey.id, 7).await.unwrap());
        assert!(!has_completed(&mut db, survey.id, 8).await.unwrap());
    }
}
