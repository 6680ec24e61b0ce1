use serde::Deserialize;
use sqlx::FromRow;
use uuid::Uuid;

/// One entry of a submission: the options a user picked for one question.
/// Answer rows are write-once; reads only ever aggregate them, so there is
/// no whole-row read model here.
#[derive(Debug, Clone, Deserialize)]
pub struct Submit {
    pub question_id: Uuid,
    pub option_ids: Vec<Uuid>,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub question_id: Uuid,
    pub option_id: Uuid,
    pub user_id: i32,
}

/// Row of the grouped per-option tally query.
#[derive(Debug, Clone, FromRow)]
pub struct OptionCount {
    pub option_id: Uuid,
    pub count: i64,
}
