//! Check-in session — accumulated answers for one pass through the flow.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::CheckInPayload;

use super::state::CheckInStep;

/// A whole-number rating from 1 to 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// `None` if `value` is outside 1..=5.
    pub fn new(value: i64) -> Option<Self> {
        (i64::from(Self::MIN)..=i64::from(Self::MAX))
            .contains(&value)
            .then(|| Self(value as u8))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = String;
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("rating {value} is outside 1..=5"))
    }
}

impl From<Rating> for u8 {
    fn from(r: Rating) -> Self {
        r.0
    }
}

/// The rated dimensions, in question order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingDimension {
    Calmness,
    Energy,
    Satisfaction,
    Connection,
    Engagement,
}

impl RatingDimension {
    pub const ALL: [RatingDimension; 5] = [
        Self::Calmness,
        Self::Energy,
        Self::Satisfaction,
        Self::Connection,
        Self::Engagement,
    ];

    fn index(&self) -> usize {
        match self {
            Self::Calmness => 0,
            Self::Energy => 1,
            Self::Satisfaction => 2,
            Self::Connection => 3,
            Self::Engagement => 4,
        }
    }
}

impl std::fmt::Display for RatingDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Calmness => "calmness",
            Self::Energy => "energy",
            Self::Satisfaction => "satisfaction",
            Self::Connection => "connection",
            Self::Engagement => "engagement",
        };
        write!(f, "{s}")
    }
}

/// One slot per dimension; each is answered at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RatingAnswers {
    slots: [Option<Rating>; 5],
}

impl RatingAnswers {
    /// Record a rating. Returns `false` (and changes nothing) if the slot
    /// already holds an answer.
    pub fn record(&mut self, dimension: RatingDimension, rating: Rating) -> bool {
        let slot = &mut self.slots[dimension.index()];
        if slot.is_some() {
            return false;
        }
        *slot = Some(rating);
        true
    }

    pub fn get(&self, dimension: RatingDimension) -> Option<Rating> {
        self.slots[dimension.index()]
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }
}

/// The free-text questions, in question order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenSlot {
    CurrentState,
    EnergyMoments,
    MissingElement,
}

impl OpenSlot {
    pub const ALL: [OpenSlot; 3] = [Self::CurrentState, Self::EnergyMoments, Self::MissingElement];

    fn index(&self) -> usize {
        match self {
            Self::CurrentState => 0,
            Self::EnergyMoments => 1,
            Self::MissingElement => 2,
        }
    }
}

impl std::fmt::Display for OpenSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::CurrentState => "current_state",
            Self::EnergyMoments => "energy_moments",
            Self::MissingElement => "missing_element",
        };
        write!(f, "{s}")
    }
}

/// One slot per open question; empty until answered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenAnswers {
    slots: [String; 3],
}

impl OpenAnswers {
    /// Store an answer. Re-recording a slot replaces it, which is how the
    /// final answer is resubmitted after a failed submission.
    pub fn record(&mut self, slot: OpenSlot, text: &str) {
        self.slots[slot.index()] = text.to_string();
    }

    pub fn get(&self, slot: OpenSlot) -> &str {
        &self.slots[slot.index()]
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(|s| !s.trim().is_empty())
    }
}

/// Mutable state for a single check-in. Owned by the flow and discarded once
/// the check-in completes.
#[derive(Debug, Clone)]
pub struct CheckInSession {
    pub id: Uuid,
    pub step: CheckInStep,
    /// Index of the rating question currently being asked.
    pub rating_index: usize,
    /// Index of the open question currently being asked. Equals
    /// `OPEN_QUESTIONS.len()` once the last answer has been given.
    pub open_index: usize,
    pub ratings: RatingAnswers,
    pub answers: OpenAnswers,
}

impl Default for CheckInSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckInSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            step: CheckInStep::Welcome,
            rating_index: 0,
            open_index: 0,
            ratings: RatingAnswers::default(),
            answers: OpenAnswers::default(),
        }
    }

    /// Move to `target`. Returns an error if the transition is not allowed.
    pub fn advance_to(&mut self, target: CheckInStep) -> Result<(), String> {
        if !self.step.can_transition_to(target) {
            return Err(format!("Cannot transition from {} to {}", self.step, target));
        }
        self.step = target;
        Ok(())
    }

    /// Assemble the submission payload. `None` unless every slot is filled.
    pub fn payload(&self) -> Option<CheckInPayload> {
        if !self.answers.is_complete() {
            return None;
        }
        let rating = |d| self.ratings.get(d).map(|r: Rating| r.value());
        Some(CheckInPayload {
            calmness_rating: rating(RatingDimension::Calmness)?,
            energy_rating: rating(RatingDimension::Energy)?,
            satisfaction_rating: rating(RatingDimension::Satisfaction)?,
            connection_rating: rating(RatingDimension::Connection)?,
            engagement_rating: rating(RatingDimension::Engagement)?,
            current_state_text: self.answers.get(OpenSlot::CurrentState).to_string(),
            energy_moments_text: self.answers.get(OpenSlot::EnergyMoments).to_string(),
            missing_element_text: self.answers.get(OpenSlot::MissingElement).to_string(),
        })
    }
}
