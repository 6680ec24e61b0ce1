use sqlx::{query, query_as, query_scalar, Executor, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use crate::core::models::{
    answer::{Insert as AnswerInsert, OptionCount},
    survey::{Opt, OptionQuery, Question, QuestionQuery, Survey, SurveyQuery},
    user::{Insert as UserInsert, User},
};
use crate::core::ports::repository::{AnswerCommon, OptionCommon, QuestionCommon, Store, SurveyCommon, TxStore, UserCommon};
use crate::error::Error;

/// Postgres-backed store over any sqlx executor: a pool connection for plain
/// reads, a transaction for submissions.
pub struct PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    executor: E,
}

impl<E> PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }
}

impl<E> SurveyCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn get(&mut self, id: Uuid) -> Result<Option<Survey>, Error> {
        let survey = query_as("SELECT * FROM surveys WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(survey)
    }

    async fn get_for_update(&mut self, id: Uuid) -> Result<Option<Survey>, Error> {
        let survey = query_as("SELECT * FROM surveys WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(survey)
    }

    async fn query(&mut self, param: &SurveyQuery) -> Result<Vec<Survey>, Error> {
        let surveys = query_as(
            "SELECT * FROM surveys
            WHERE ($1 IS NULL OR status = $1)
            ORDER BY created_at DESC",
        )
        .bind(&param.status_eq)
        .fetch_all(&mut self.executor)
        .await?;
        Ok(surveys)
    }

    async fn increment_responses(&mut self, id: Uuid) -> Result<(), Error> {
        query("UPDATE surveys SET responses_count = responses_count + 1, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&mut self.executor)
            .await?;
        Ok(())
    }
}

impl<E> QuestionCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn query(&mut self, param: &QuestionQuery) -> Result<Vec<Question>, Error> {
        let questions = query_as(
            "SELECT * FROM questions
            WHERE ($1 IS NULL OR survey_id = $1)
            ORDER BY created_at",
        )
        .bind(param.survey_id_eq)
        .fetch_all(&mut self.executor)
        .await?;
        Ok(questions)
    }
}

impl<E> OptionCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn query(&mut self, param: &OptionQuery) -> Result<Vec<Opt>, Error> {
        let options = query_as(
            "SELECT * FROM question_options
            WHERE question_id = ANY($1)
            ORDER BY created_at",
        )
        .bind(&param.question_id_in)
        .fetch_all(&mut self.executor)
        .await?;
        Ok(options)
    }
}

impl<E> AnswerCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn bulk_insert(&mut self, answers: Vec<AnswerInsert>) -> Result<(), Error> {
        if answers.is_empty() {
            return Ok(());
        }
        QueryBuilder::new("INSERT INTO answers (question_id, option_id, user_id) ")
            .push_values(answers.into_iter(), |mut b, a| {
                b.push_bind(a.question_id);
                b.push_bind(a.option_id);
                b.push_bind(a.user_id);
            })
            .build()
            .execute(&mut self.executor)
            .await?;
        Ok(())
    }

    async fn exists_for_survey(&mut self, survey_id: Uuid, user_id: i32) -> Result<bool, Error> {
        let exists = query_scalar(
            "SELECT EXISTS(
                SELECT a.id
                FROM answers AS a
                JOIN questions AS q ON a.question_id = q.id
                WHERE q.survey_id = $1 AND a.user_id = $2)",
        )
        .bind(survey_id)
        .bind(user_id)
        .fetch_one(&mut self.executor)
        .await?;
        Ok(exists)
    }

    async fn count_by_options(&mut self, option_ids: &[Uuid]) -> Result<Vec<OptionCount>, Error> {
        let counts = query_as(
            "SELECT option_id, COUNT(id) AS count
            FROM answers
            WHERE option_id = ANY($1)
            GROUP BY option_id",
        )
        .bind(option_ids)
        .fetch_all(&mut self.executor)
        .await?;
        Ok(counts)
    }
}

impl<E> UserCommon for PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    async fn get_by_email(&mut self, email: &str) -> Result<Option<User>, Error> {
        let user = query_as("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&mut self.executor)
            .await?;
        Ok(user)
    }

    async fn insert(&mut self, user: UserInsert) -> Result<i32, Error> {
        let id = query_scalar("INSERT INTO users (nickname, email, password, salt) VALUES ($1, $2, $3, $4) RETURNING id")
            .bind(user.nickname)
            .bind(user.email)
            .bind(user.password)
            .bind(user.salt)
            .fetch_one(&mut self.executor)
            .await?;
        Ok(id)
    }
}

impl<E> Store for PgSqlx<E> where for<'e> &'e mut E: Executor<'e, Database = Postgres> {}

impl TxStore for PgSqlx<Transaction<'static, Postgres>> {
    async fn commit(self) -> Result<(), Error> {
        self.executor.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        self.executor.rollback().await?;
        Ok(())
    }
}
