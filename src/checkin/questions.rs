//! Fixed question catalogue and agent-authored messages for the check-in.

use super::session::{OpenSlot, RatingDimension};

/// A 1–5 self-assessment question.
#[derive(Debug, Clone, Copy)]
pub struct RatingQuestion {
    pub dimension: RatingDimension,
    pub prompt: &'static str,
}

/// A free-text question.
#[derive(Debug, Clone, Copy)]
pub struct OpenQuestion {
    pub slot: OpenSlot,
    pub prompt: &'static str,
}

/// Rating questions, in the order they are asked.
pub const RATING_QUESTIONS: [RatingQuestion; 5] = [
    RatingQuestion {
        dimension: RatingDimension::Calmness,
        prompt: "How calm did you feel today? (1 = very tense, 5 = completely calm)",
    },
    RatingQuestion {
        dimension: RatingDimension::Energy,
        prompt: "How would you rate your energy today? (1 = drained, 5 = full of energy)",
    },
    RatingQuestion {
        dimension: RatingDimension::Satisfaction,
        prompt: "How satisfied are you with how your day went? (1 = not at all, 5 = very satisfied)",
    },
    RatingQuestion {
        dimension: RatingDimension::Connection,
        prompt: "How connected did you feel to the people around you? (1 = isolated, 5 = deeply connected)",
    },
    RatingQuestion {
        dimension: RatingDimension::Engagement,
        prompt: "How engaged were you in what you were doing? (1 = on autopilot, 5 = fully absorbed)",
    },
];

/// Open questions, in the order they are asked. The last one triggers
/// submission.
pub const OPEN_QUESTIONS: [OpenQuestion; 3] = [
    OpenQuestion {
        slot: OpenSlot::CurrentState,
        prompt: "How would you describe how you feel right now?",
    },
    OpenQuestion {
        slot: OpenSlot::EnergyMoments,
        prompt: "Which moments today gave you energy, and which ones drained it?",
    },
    OpenQuestion {
        slot: OpenSlot::MissingElement,
        prompt: "What felt missing from your day?",
    },
];

/// Prefixed to the first open question once all ratings are in.
pub const RATINGS_DONE_ACK: &str =
    "Thank you for the ratings! Now let's put a few things into words.";

/// Placeholder shown while the analysis is running.
pub const PROCESSING_MESSAGE: &str = "Analyzing your answers, this may take a moment…";

/// Shown when submission fails for any reason.
pub const SUBMIT_FAILED_MESSAGE: &str =
    "Sorry, I couldn't process your check-in right now. Please send your last answer again to retry.";

/// Substituted when a successful analysis carries no usable content.
pub const GENERIC_ACK_MESSAGE: &str =
    "Thank you for completing today's check-in! Your answers have been saved.";

/// Heading placed above numbered recommendations.
pub const RECOMMENDATIONS_HEADING: &str = "**Recommendations:**";

/// Glyph repeated `rating` times to echo a rating back to the user.
pub const RATING_GLYPH: char = '★';

/// Agent text that closes the rating phase and asks the first open question.
pub fn ratings_done_prompt() -> String {
    format!("{RATINGS_DONE_ACK}\n\n{}", OPEN_QUESTIONS[0].prompt)
}

/// User-facing echo of a rating: the glyph repeated `value` times.
pub fn rating_weight(value: u8) -> String {
    std::iter::repeat_n(RATING_GLYPH, usize::from(value)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_covers_every_slot_once() {
        let dims: Vec<RatingDimension> = RATING_QUESTIONS.iter().map(|q| q.dimension).collect();
        assert_eq!(dims, RatingDimension::ALL);

        let slots: Vec<OpenSlot> = OPEN_QUESTIONS.iter().map(|q| q.slot).collect();
        assert_eq!(slots, OpenSlot::ALL);
        assert_eq!(OPEN_QUESTIONS.last().unwrap().slot, OpenSlot::MissingElement);
    }

    #[test]
    fn rating_weight_repeats_glyph() {
        for value in 1..=5u8 {
            let weight = rating_weight(value);
            assert_eq!(weight.chars().count(), usize::from(value));
            assert!(weight.chars().all(|c| c == RATING_GLYPH));
        }
    }

    #[test]
    fn ratings_done_prompt_combines_ack_and_first_question() {
        let text = ratings_done_prompt();
        assert!(text.starts_with(RATINGS_DONE_ACK));
        assert!(text.ends_with(OPEN_QUESTIONS[0].prompt));
    }
}
