//! Contact categories and classification
//!
//! Engines report contacts as pairs of bitmask categories. The session only
//! cares which of three outcomes a pair produces, so the bitmasks are mapped
//! onto a small closed enum at the edge and classified here.

use serde::{Deserialize, Serialize};

use super::state::EntityId;

/// Logical kind of a physics body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// The player
    Bird,
    /// Ground and pipes
    Solid,
    /// Invisible zone inside a pipe gap
    ScoreTrigger,
    /// Ceiling that caps upward flight
    Sky,
    /// Bits no known category maps to
    Unknown(u32),
}

impl Category {
    pub const BIRD_BITS: u32 = 1 << 0;
    pub const SOLID_BITS: u32 = 1 << 1;
    pub const SCORE_TRIGGER_BITS: u32 = 1 << 2;
    pub const SKY_BITS: u32 = 1 << 3;

    /// Map an engine category bitmask
    pub fn from_bits(bits: u32) -> Self {
        match bits {
            Self::BIRD_BITS => Category::Bird,
            Self::SOLID_BITS => Category::Solid,
            Self::SCORE_TRIGGER_BITS => Category::ScoreTrigger,
            Self::SKY_BITS => Category::Sky,
            other => Category::Unknown(other),
        }
    }

    /// Engine category bitmask
    pub fn bits(&self) -> u32 {
        match self {
            Category::Bird => Self::BIRD_BITS,
            Category::Solid => Self::SOLID_BITS,
            Category::ScoreTrigger => Self::SCORE_TRIGGER_BITS,
            Category::Sky => Self::SKY_BITS,
            Category::Unknown(bits) => *bits,
        }
    }

    /// Categories this body physically collides with
    pub fn collision_mask(&self) -> u32 {
        match self {
            Category::Bird => Self::SOLID_BITS | Self::SKY_BITS,
            Category::Solid | Category::Sky => Self::BIRD_BITS,
            // Triggers are pass-through
            Category::ScoreTrigger | Category::Unknown(_) => 0,
        }
    }

    /// Categories that produce a contact callback with this body
    pub fn contact_mask(&self) -> u32 {
        match self {
            Category::Bird => Self::SOLID_BITS | Self::SCORE_TRIGGER_BITS | Self::SKY_BITS,
            Category::Solid | Category::ScoreTrigger | Category::Sky => Self::BIRD_BITS,
            Category::Unknown(_) => 0,
        }
    }
}

/// One side of a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Body {
    pub id: EntityId,
    pub category: Category,
}

impl Body {
    pub fn new(id: EntityId, category: Category) -> Self {
        Self { id, category }
    }
}

/// A new contact between two bodies, in no particular order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub a: Body,
    pub b: Body,
}

impl Contact {
    pub fn new(a: Body, b: Body) -> Self {
        Self { a, b }
    }

    /// The side carrying `category`, if any
    pub fn find(&self, category: Category) -> Option<Body> {
        [self.a, self.b].into_iter().find(|body| body.category == category)
    }

    pub fn kind(&self) -> ContactKind {
        classify(self.a.category, self.b.category)
    }
}

/// What a contact means for the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactKind {
    /// Bird passed through a gap
    Score,
    /// Bird bumped the ceiling
    Ignore,
    /// Bird hit ground, a pipe, or something unrecognised
    Fatal,
}

/// Classify a contact pair. Trigger beats sky beats everything else.
pub fn classify(a: Category, b: Category) -> ContactKind {
    let either = |category: Category| a == category || b == category;

    if either(Category::ScoreTrigger) {
        ContactKind::Score
    } else if either(Category::Sky) {
        ContactKind::Ignore
    } else {
        ContactKind::Fatal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_priorities() {
        assert_eq!(classify(Category::Bird, Category::ScoreTrigger), ContactKind::Score);
        assert_eq!(classify(Category::ScoreTrigger, Category::Bird), ContactKind::Score);
        assert_eq!(classify(Category::Bird, Category::Sky), ContactKind::Ignore);
        assert_eq!(classify(Category::Sky, Category::Bird), ContactKind::Ignore);
        assert_eq!(classify(Category::Bird, Category::Solid), ContactKind::Fatal);
        // Trigger wins even when paired with the sky
        assert_eq!(classify(Category::Sky, Category::ScoreTrigger), ContactKind::Score);
    }

    #[test]
    fn test_unknown_category_is_fatal() {
        assert_eq!(classify(Category::Bird, Category::Unknown(64)), ContactKind::Fatal);
        assert_eq!(
            classify(Category::from_bits(0), Category::from_bits(1 << 7)),
            ContactKind::Fatal
        );
    }

    #[test]
    fn test_bits_round_trip_for_known_categories() {
        for category in [
            Category::Bird,
            Category::Solid,
            Category::ScoreTrigger,
            Category::Sky,
        ] {
            assert_eq!(Category::from_bits(category.bits()), category);
        }
        assert_eq!(Category::from_bits(3), Category::Unknown(3));
    }

    #[test]
    fn test_masks_are_symmetric_for_bird() {
        for other in [Category::Solid, Category::ScoreTrigger, Category::Sky] {
            let bird_reports = Category::Bird.contact_mask() & other.bits() != 0;
            let other_reports = other.contact_mask() & Category::Bird.bits() != 0;
            assert!(bird_reports && other_reports, "{other:?}");
        }
        assert_eq!(Category::ScoreTrigger.collision_mask(), 0);
        assert_eq!(Category::Bird.collision_mask() & Category::SCORE_TRIGGER_BITS, 0);
    }

    #[test]
    fn test_find_side() {
        let contact = Contact::new(
            Body::new(EntityId(1), Category::Bird),
            Body::new(EntityId(9), Category::ScoreTrigger),
        );
        assert_eq!(contact.find(Category::ScoreTrigger).map(|b| b.id), Some(EntityId(9)));
        assert_eq!(contact.find(Category::Sky), None);
        assert_eq!(contact.kind(), ContactKind::Score);
    }
}
