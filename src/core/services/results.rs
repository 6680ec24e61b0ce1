use std::collections::HashMap;

use uuid::Uuid;

use crate::core::models::results::{OptionResult, QuestionResult, SurveyResults};
use crate::core::models::survey::QuestionDetail;
use crate::core::ports::repository::{AnswerCommon, Store};
use crate::core::services::survey;
use crate::error::Error;

/// Aggregated tallies for one survey, or `None` when the survey is absent.
/// Questions and options appear in display order.
pub async fn survey_results<D>(db: &mut D, id: Uuid) -> Result<Option<SurveyResults>, Error>
where
    D: Store,
{
    let detail = match survey::get_survey_detail(db, id).await? {
        Some(detail) => detail,
        None => return Ok(None),
    };
    let option_ids: Vec<Uuid> = detail
        .questions
        .iter()
        .flat_map(|q| q.options.iter().map(|o| o.id))
        .collect();
    let counts: HashMap<Uuid, i64> = AnswerCommon::count_by_options(db, &option_ids)
        .await?
        .into_iter()
        .map(|c| (c.option_id, c.count))
        .collect();
    let questions = detail.questions.into_iter().map(|q| aggregate_question(q, &counts)).collect();
    Ok(Some(SurveyResults {
        survey_id: detail.survey.id,
        survey_title: detail.survey.title,
        total_responses: detail.survey.responses_count,
        questions,
    }))
}

fn aggregate_question(detail: QuestionDetail, counts: &HashMap<Uuid, i64>) -> QuestionResult {
    let total_answers: i64 = detail.options.iter().map(|o| counts.get(&o.id).copied().unwrap_or(0)).sum();
    let options = detail
        .options
        .into_iter()
        .map(|o| {
            let votes_count = counts.get(&o.id).copied().unwrap_or(0);
            OptionResult {
                option_id: o.id,
                option_text: o.option_text,
                votes_count,
                percentage: percentage(votes_count, total_answers),
            }
        })
        .collect();
    QuestionResult {
        question_id: detail.question.id,
        question_text: detail.question.question_text,
        total_answers,
        options,
    }
}

/// Share of the question total, rounded to two decimals. A question with no
/// answers reports 0.0 for every option.
fn percentage(votes: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (votes as f64 / total as f64 * 10_000.0).round() / 100.0
}
