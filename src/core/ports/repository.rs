use uuid::Uuid;

use crate::core::models::{
    answer::{Insert as AnswerInsert, OptionCount},
    survey::{Opt, OptionQuery, Question, QuestionQuery, Survey, SurveyQuery},
    user::{Insert as UserInsert, User},
};
use crate::error::Error;

pub trait SurveyCommon {
    async fn get(&mut self, id: Uuid) -> Result<Option<Survey>, Error>;
    /// Same as `get` but takes a row lock, serializing concurrent
    /// submissions for the same survey.
    async fn get_for_update(&mut self, id: Uuid) -> Result<Option<Survey>, Error>;
    /// All surveys matching the query, newest first.
    async fn query(&mut self, query: &SurveyQuery) -> Result<Vec<Survey>, Error>;
    async fn increment_responses(&mut self, id: Uuid) -> Result<(), Error>;
}

pub trait QuestionCommon {
    /// Questions in insertion order; display order is applied by the caller.
    async fn query(&mut self, query: &QuestionQuery) -> Result<Vec<Question>, Error>;
}

pub trait OptionCommon {
    /// Options in insertion order; display order is applied by the caller.
    async fn query(&mut self, query: &OptionQuery) -> Result<Vec<Opt>, Error>;
}

pub trait AnswerCommon {
    async fn bulk_insert(&mut self, answers: Vec<AnswerInsert>) -> Result<(), Error>;
    /// Whether any answer for a question of this survey was written by this
    /// user.
    async fn exists_for_survey(&mut self, survey_id: Uuid, user_id: i32) -> Result<bool, Error>;
    async fn count_by_options(&mut self, option_ids: &[Uuid]) -> Result<Vec<OptionCount>, Error>;
}

pub trait UserCommon {
    async fn get_by_email(&mut self, email: &str) -> Result<Option<User>, Error>;
    async fn insert(&mut self, user: UserInsert) -> Result<i32, Error>;
}

pub trait Store: SurveyCommon + QuestionCommon + OptionCommon + AnswerCommon + UserCommon {}

pub trait TxStore: Store {
    async fn commit(self) -> Result<(), Error>;
    async fn rollback(self) -> Result<(), Error>;
}
