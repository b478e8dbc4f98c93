use questionnaire_types::{
    AnswerValue, Answers, Question, Questionnaire, RespondentId, StoredAnswer, StoredChoice,
    Submission,
};

use crate::Visibility;

/// Turn validated answers into the records a store persists.
///
/// Only visible questions with a non-empty value are included, in position
/// order. References to options or rows that do not exist are skipped, so
/// run the consistency check first.
pub fn build_submission(
    questionnaire: &Questionnaire,
    respondent: RespondentId,
    answers: &Answers,
    visibility: &Visibility,
) -> Submission {
    let stored = questionnaire
        .answerable()
        .filter(|question| visibility.is_visible(question.id()))
        .filter_map(|question| {
            let value = answers.get(question.id())?;
            if value.is_empty() {
                return None;
            }
            Some(stored_answer(question, value))
        })
        .collect();

    Submission {
        questionnaire: questionnaire.id(),
        revision: questionnaire.revision(),
        respondent,
        answers: stored,
    }
}

fn stored_answer(question: &Question, value: &AnswerValue) -> StoredAnswer {
    let mut answer = StoredAnswer {
        question: question.id(),
        body: None,
        choices: Vec::new(),
    };

    match value {
        AnswerValue::Text(text) => answer.body = Some(text.clone()),
        AnswerValue::Choices(choices) => {
            let mut choices: Vec<_> = choices
                .iter()
                .filter_map(|choice| {
                    let index = question.option_index(choice.option)?;
                    let option = &question.options()[index];
                    let custom_body = choice
                        .custom_body
                        .clone()
                        .filter(|body| option.free_text && !body.trim().is_empty());
                    Some((
                        index,
                        StoredChoice {
                            option: option.id,
                            body: option.body.clone(),
                            custom_body,
                            position: None,
                            row: None,
                        },
                    ))
                })
                .collect();
            choices.sort_by_key(|(index, _)| *index);
            choices.dedup_by_key(|(index, _)| *index);
            answer.choices = choices.into_iter().map(|(_, choice)| choice).collect();
        }
        AnswerValue::Sorting(order) => {
            answer.choices = order
                .iter()
                .filter_map(|id| question.option(*id))
                .zip(0u32..)
                .map(|(option, position)| StoredChoice {
                    option: option.id,
                    body: option.body.clone(),
                    custom_body: None,
                    position: Some(position),
                    row: None,
                })
                .collect();
        }
        AnswerValue::Matrix(cells) => {
            let mut cells: Vec<_> = cells
                .iter()
                .filter_map(|cell| {
                    let row = question.row_index(cell.row)?;
                    let option = question.option_index(cell.option)?;
                    Some((row, option, cell))
                })
                .collect();
            cells.sort_by_key(|(row, option, _)| (*row, *option));
            cells.dedup_by_key(|(row, option, _)| (*row, *option));
            answer.choices = cells
                .into_iter()
                .map(|(_, option, cell)| StoredChoice {
                    option: cell.option,
                    body: question.options()[option].body.clone(),
                    custom_body: None,
                    position: None,
                    row: Some(cell.row),
                })
                .collect();
        }
    }
    answer
}
