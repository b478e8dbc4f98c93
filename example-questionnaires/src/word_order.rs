use questionnaire::{
    AnswerOption, DefinitionError, Question, QuestionKind, Questionnaire, QuestionnaireDefinition,
    QuestionnaireId,
};

pub const WORD_ORDER: QuestionnaireId = QuestionnaireId::new(2);

/// Rank five words into a sentence.
///
/// The options are listed out of order; "We all like dark chocolate" is the
/// intended ranking.
pub fn word_order() -> Result<Questionnaire, DefinitionError> {
    let words = ["chocolate", "like", "We", "dark", "all"];
    let options = words
        .iter()
        .zip(10u64..)
        .map(|(word, id)| AnswerOption::new(id, *word))
        .collect();

    QuestionnaireDefinition::new(
        WORD_ORDER,
        "Word order",
        vec![
            Question::new(1, 0, "Put the words in order", QuestionKind::Sorting)
                .mandatory()
                .with_options(options),
        ],
    )
    .build()
}
