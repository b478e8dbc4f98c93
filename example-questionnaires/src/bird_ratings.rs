use questionnaire::{
    AnswerOption, DefinitionError, MatrixRow, Question, QuestionKind, Questionnaire,
    QuestionnaireDefinition, QuestionnaireId,
};

pub const BIRD_RATINGS: QuestionnaireId = QuestionnaireId::new(3);

fn birds() -> Vec<MatrixRow> {
    vec![MatrixRow::new(100, "Parrot"), MatrixRow::new(101, "Pigeon")]
}

/// One mandatory single-choice matrix and one multiple-choice matrix allowing
/// two traits per bird.
pub fn bird_ratings() -> Result<Questionnaire, DefinitionError> {
    QuestionnaireDefinition::new(
        BIRD_RATINGS,
        "Bird ratings",
        vec![
            Question::new(1, 0, "How much do you like them?", QuestionKind::MatrixSingle)
                .mandatory()
                .with_rows(birds())
                .with_options(vec![
                    AnswerOption::new(10, "A lot"),
                    AnswerOption::new(11, "Not at all"),
                ]),
            Question::new(2, 1, "Which traits fit?", QuestionKind::MatrixMultiple)
                .with_max_choices(2)
                .with_rows(birds())
                .with_options(vec![
                    AnswerOption::new(20, "Loud"),
                    AnswerOption::new(21, "Colourful"),
                    AnswerOption::new(22, "Clever"),
                ]),
        ],
    )
    .build()
}
