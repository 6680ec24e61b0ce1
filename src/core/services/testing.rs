//! In-memory store used by the service tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tokio::task::yield_now;
use uuid::Uuid;

use crate::core::models::{
    answer::{Insert as AnswerInsert, OptionCount},
    survey::{Opt, OptionQuery, Question, QuestionQuery, Survey, SurveyQuery},
    user::{Insert as UserInsert, User},
};
use crate::core::ports::repository::{AnswerCommon, OptionCommon, QuestionCommon, Store, SurveyCommon, TxStore, UserCommon};
use crate::error::Error;

#[derive(Debug, Default)]
pub struct MemState {
    pub surveys: Vec<Survey>,
    pub questions: Vec<Question>,
    pub options: Vec<Opt>,
    pub answers: Vec<AnswerInsert>,
    pub users: Vec<User>,
    pub locked: HashSet<Uuid>,
    pub committed: bool,
    pub rolled_back: bool,
    pub fail_rollback: bool,
}

/// Shared-state store handle; clones observe each other's writes, so a test
/// can keep one handle while a consumed transaction handle does the work.
/// Every method yields once, making each store call a scheduling point, and
/// `get_for_update` models the survey row lock: it is released only when the
/// holding handle commits, rolls back or is dropped.
#[derive(Debug, Default)]
pub struct MemStore {
    pub state: Arc<Mutex<MemState>>,
    held: Vec<Uuid>,
}

impl Clone for MemStore {
    fn clone(&self) -> Self {
        // Row locks stay with the handle that took them.
        Self {
            state: self.state.clone(),
            held: Vec::new(),
        }
    }
}

impl Drop for MemStore {
    fn drop(&mut self) {
        if self.held.is_empty() {
            return;
        }
        let mut state = self.state.lock().unwrap();
        for id in self.held.drain(..) {
            state.locked.remove(&id);
        }
    }
}

impl SurveyCommon for MemStore {
    async fn get(&mut self, id: Uuid) -> Result<Option<Survey>, Error> {
        yield_now().await;
        Ok(self.state.lock().unwrap().surveys.iter().find(|s| s.id == id).cloned())
    }

    async fn get_for_update(&mut self, id: Uuid) -> Result<Option<Survey>, Error> {
        loop {
            {
                let mut state = self.state.lock().unwrap();
                if !state.locked.contains(&id) {
                    state.locked.insert(id);
                    self.held.push(id);
                    break;
                }
            }
            yield_now().await;
        }
        self.get(id).await
    }

    async fn query(&mut self, query: &SurveyQuery) -> Result<Vec<Survey>, Error> {
        yield_now().await;
        let state = self.state.lock().unwrap();
        let mut surveys: Vec<Survey> = state
            .surveys
            .iter()
            .filter(|s| query.status_eq.as_deref().map_or(true, |status| s.status == status))
            .cloned()
            .collect();
        surveys.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(surveys)
    }

    async fn increment_responses(&mut self, id: Uuid) -> Result<(), Error> {
        yield_now().await;
        let mut state = self.state.lock().unwrap();
        if let Some(survey) = state.surveys.iter_mut().find(|s| s.id == id) {
            survey.responses_count += 1;
        }
        Ok(())
    }
}

impl QuestionCommon for MemStore {
    async fn query(&mut self, query: &QuestionQuery) -> Result<Vec<Question>, Error> {
        yield_now().await;
        let state = self.state.lock().unwrap();
        Ok(state
            .questions
            .iter()
            .filter(|q| query.survey_id_eq.map_or(true, |id| q.survey_id == id))
            .cloned()
            .collect())
    }
}

impl OptionCommon for MemStore {
    async fn query(&mut self, query: &OptionQuery) -> Result<Vec<Opt>, Error> {
        yield_now().await;
        let state = self.state.lock().unwrap();
        Ok(state
            .options
            .iter()
            .filter(|o| query.question_id_in.contains(&o.question_id))
            .cloned()
            .collect())
    }
}

impl AnswerCommon for MemStore {
    async fn bulk_insert(&mut self, answers: Vec<AnswerInsert>) -> Result<(), Error> {
        yield_now().await;
        self.state.lock().unwrap().answers.extend(answers);
        Ok(())
    }

    async fn exists_for_survey(&mut self, survey_id: Uuid, user_id: i32) -> Result<bool, Error> {
        yield_now().await;
        let state = self.state.lock().unwrap();
        Ok(state.answers.iter().any(|a| {
            a.user_id == user_id
                && state
                    .questions
                    .iter()
                    .any(|q| q.id == a.question_id && q.survey_id == survey_id)
        }))
    }

    async fn count_by_options(&mut self, option_ids: &[Uuid]) -> Result<Vec<OptionCount>, Error> {
        yield_now().await;
        let state = self.state.lock().unwrap();
        Ok(option_ids
            .iter()
            .filter_map(|&option_id| {
                let count = state.answers.iter().filter(|a| a.option_id == option_id).count() as i64;
                (count > 0).then_some(OptionCount { option_id, count })
            })
            .collect())
    }
}

impl UserCommon for MemStore {
    async fn get_by_email(&mut self, email: &str) -> Result<Option<User>, Error> {
        yield_now().await;
        Ok(self.state.lock().unwrap().users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert(&mut self, user: UserInsert) -> Result<i32, Error> {
        yield_now().await;
        let mut state = self.state.lock().unwrap();
        let id = state.users.len() as i32 + 1;
        state.users.push(User {
            id,
            nickname: user.nickname,
            email: user.email,
            password: user.password,
            salt: user.salt,
        });
        Ok(id)
    }
}

impl Store for MemStore {}

impl TxStore for MemStore {
    async fn commit(self) -> Result<(), Error> {
        self.state.lock().unwrap().committed = true;
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap();
        state.rolled_back = true;
        if state.fail_rollback {
            return Err(Error::Database(sqlx::Error::PoolClosed));
        }
        Ok(())
    }
}

pub fn new_survey(status: &str) -> Survey {
    let now = Utc::now();
    Survey {
        id: Uuid::new_v4(),
        title: "survey".into(),
        description: None,
        status: status.into(),
        created_by: 1,
        created_at: now,
        updated_at: now,
        start_date: None,
        end_date: now + chrono::Duration::days(7),
        responses_count: 0,
        is_anonymous: false,
    }
}

pub fn new_question(survey_id: Uuid, order: i32, allow_multiple: bool) -> Question {
    Question {
        id: Uuid::new_v4(),
        survey_id,
        question_text: format!("question {order}"),
        question_order: order,
        allow_multiple_answers: allow_multiple,
        created_at: Utc::now(),
    }
}

pub fn new_option(question_id: Uuid, order: i32) -> Opt {
    Opt {
        id: Uuid::new_v4(),
        question_id,
        option_text: format!("option {order}"),
        option_order: order,
        created_at: Utc::now(),
    }
}
