use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Create an id from its raw value.
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Get the raw value.
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", $prefix, self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }
    };
}

id_type!(
    /// Identifies a question within a questionnaire.
    QuestionId,
    "question"
);

id_type!(
    /// Identifies an answer option of a choice, sorting or matrix question.
    OptionId,
    "option"
);

id_type!(
    /// Identifies a row of a matrix question.
    RowId,
    "row"
);

id_type!(
    /// Identifies a questionnaire.
    QuestionnaireId,
    "questionnaire"
);

id_type!(
    /// Identifies whoever is answering (a user or an anonymous session token).
    RespondentId,
    "respondent"
);
