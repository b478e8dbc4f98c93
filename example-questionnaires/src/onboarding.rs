use questionnaire::{
    AnswerOption, DefinitionError, DisplayCondition, Question, QuestionKind, Questionnaire,
    QuestionnaireDefinition, QuestionnaireId,
};

pub const ONBOARDING: QuestionnaireId = QuestionnaireId::new(4);

/// Three steps mixing mandatory and optional display conditions.
///
/// - "Which club?" shows when the respondent is a member.
/// - "Would you like to join?" shows when membership was left unanswered or
///   answered with no.
/// - "Tell us more" shows for club members who typed a nickname.
pub fn onboarding() -> Result<Questionnaire, DefinitionError> {
    QuestionnaireDefinition::new(
        ONBOARDING,
        "Welcome",
        vec![
            Question::new(1, 0, "What is your name?", QuestionKind::ShortAnswer)
                .mandatory()
                .with_max_characters(40),
            Question::new(2, 1, "Nickname", QuestionKind::ShortAnswer).with_max_characters(20),
            Question::separator(3, 2),
            Question::new(4, 3, "Are you a club member?", QuestionKind::SingleOption)
                .with_options(vec![AnswerOption::new(40, "Yes"), AnswerOption::new(41, "No")]),
            Question::new(5, 4, "Which club?", QuestionKind::ShortAnswer)
                .mandatory()
                .with_condition(DisplayCondition::equal(4, 40u64)),
            Question::new(6, 5, "Would you like to join?", QuestionKind::SingleOption)
                .with_options(vec![AnswerOption::new(60, "Yes"), AnswerOption::new(61, "No")])
                .with_condition(DisplayCondition::not_answered(4))
                .with_condition(DisplayCondition::equal(4, 41u64)),
            Question::separator(7, 6),
            Question::new(8, 7, "Tell us more", QuestionKind::LongAnswer)
                .with_condition(DisplayCondition::equal(4, 40u64).required())
                .with_condition(DisplayCondition::answered(2).required()),
        ],
    )
    .with_description("A short introduction before your first walk.")
    .with_tos("We keep your answers until you leave the club.")
    .build()
}
