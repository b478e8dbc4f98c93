pub mod bird_ratings;
pub mod bird_watching;
pub mod onboarding;
pub mod word_order;

// Re-export bird_ratings items
pub use bird_ratings::{BIRD_RATINGS, bird_ratings};

// Re-export bird_watching items
pub use bird_watching::{BIRD_WATCHING, bird_watching};

// Re-export onboarding items
pub use onboarding::{ONBOARDING, onboarding};

// Re-export word_order items
pub use word_order::{WORD_ORDER, word_order};
