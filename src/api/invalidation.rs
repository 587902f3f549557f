use serde::{Deserialize, Serialize};

/// Ordered invalidation levels. A data pass always implies a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum InvalidationLevel {
    #[default]
    None,
    /// Geometry and styling must be rebuilt from the current domains.
    Render,
    /// Field extraction and domains must be recomputed first.
    Data,
}

impl InvalidationLevel {
    #[must_use]
    pub const fn max(self, other: Self) -> Self {
        if self as u8 >= other as u8 {
            self
        } else {
            other
        }
    }
}

/// What changed, recorded alongside the level for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvalidationTopic {
    Data,
    Fields,
    Style,
    Visibility,
    Highlight,
    Marker,
    Attachment,
    Layout,
}

impl InvalidationTopic {
    const fn bit(self) -> u16 {
        match self {
            Self::Data => 1 << 0,
            Self::Fields => 1 << 1,
            Self::Style => 1 << 2,
            Self::Visibility => 1 << 3,
            Self::Highlight => 1 << 4,
            Self::Marker => 1 << 5,
            Self::Attachment => 1 << 6,
            Self::Layout => 1 << 7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InvalidationTopics {
    bits: u16,
}

impl InvalidationTopics {
    #[must_use]
    pub const fn none() -> Self {
        Self { bits: 0 }
    }

    #[must_use]
    pub const fn from_topic(topic: InvalidationTopic) -> Self {
        Self { bits: topic.bit() }
    }

    #[must_use]
    pub const fn with_topic(self, topic: InvalidationTopic) -> Self {
        Self {
            bits: self.bits | topic.bit(),
        }
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    #[must_use]
    pub const fn contains_topic(self, topic: InvalidationTopic) -> bool {
        (self.bits & topic.bit()) != 0
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        self.bits == 0
    }
}

/// Coalesced dirty state of one series (or of the chart layout).
///
/// Marks merge: any number of mutations between two passes collapse into the
/// highest level and the union of their topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InvalidationMask {
    level: InvalidationLevel,
    #[serde(default)]
    topics: InvalidationTopics,
}

impl InvalidationMask {
    #[must_use]
    pub const fn none() -> Self {
        Self {
            level: InvalidationLevel::None,
            topics: InvalidationTopics::none(),
        }
    }

    #[must_use]
    pub const fn render(topic: InvalidationTopic) -> Self {
        Self {
            level: InvalidationLevel::Render,
            topics: InvalidationTopics::from_topic(topic),
        }
    }

    #[must_use]
    pub const fn data(topic: InvalidationTopic) -> Self {
        Self {
            level: InvalidationLevel::Data,
            topics: InvalidationTopics::from_topic(topic),
        }
    }

    #[must_use]
    pub const fn level(self) -> InvalidationLevel {
        self.level
    }

    #[must_use]
    pub const fn topics(self) -> InvalidationTopics {
        self.topics
    }

    #[must_use]
    pub const fn has_topic(self, topic: InvalidationTopic) -> bool {
        self.topics.contains_topic(topic)
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self.level, InvalidationLevel::None)
    }

    #[must_use]
    pub const fn needs_data(self) -> bool {
        matches!(self.level, InvalidationLevel::Data)
    }

    #[must_use]
    pub const fn needs_render(self) -> bool {
        !self.is_none()
    }

    pub fn merge(&mut self, other: Self) {
        self.level = self.level.max(other.level);
        self.topics = self.topics.union(other.topics);
    }

    /// Data work is done; only the render pass is still owed.
    pub fn complete_data(&mut self) {
        if self.needs_data() {
            self.level = InvalidationLevel::Render;
        }
    }

    pub fn clear(&mut self) {
        *self = Self::none();
    }
}
