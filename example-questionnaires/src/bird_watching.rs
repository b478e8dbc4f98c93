use questionnaire::{Questionnaire, QuestionnaireId};

/// Id of the bird watching questionnaire.
pub const BIRD_WATCHING: QuestionnaireId = QuestionnaireId::new(5);

const DEFINITION: &str = include_str!("../fixtures/bird_watching.json");

/// A two-step questionnaire authored as JSON.
///
/// The first step asks whether and which birds were seen; the second follows
/// up on a cockatoo typed into the "Other" field and rates the birds seen.
pub fn bird_watching() -> Result<Questionnaire, serde_json::Error> {
    serde_json::from_str(DEFINITION)
}
