//! Participant, Category, SkillLevel and the Entrant placed into match slots.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a registration (used in matches and lookups).
pub type ParticipantId = Uuid;

/// Event a participant registered for.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Singles,
    Doubles,
    Mixed,
}

impl Category {
    /// Doubles and mixed entries are two-player teams.
    pub fn is_team(self) -> bool {
        match self {
            Category::Singles => false,
            Category::Doubles | Category::Mixed => true,
        }
    }

    /// Players per side of a match in this category.
    pub fn players_per_side(self) -> usize {
        if self.is_team() {
            2
        } else {
            1
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Singles => "singles",
            Category::Doubles => "doubles",
            Category::Mixed => "mixed",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Self-declared playing level.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
    Elite,
}

impl SkillLevel {
    /// Seeding rank: higher is stronger. Unspecified skill ranks 0 (see [`skill_rank`]).
    pub fn rank(self) -> u8 {
        match self {
            SkillLevel::Beginner => 1,
            SkillLevel::Intermediate => 2,
            SkillLevel::Advanced => 3,
            SkillLevel::Expert => 4,
            SkillLevel::Elite => 5,
        }
    }
}

/// Rank of an optional skill level; participants without one seed last.
pub fn skill_rank(level: Option<SkillLevel>) -> u8 {
    level.map_or(0, SkillLevel::rank)
}

/// Partner on a doubles/mixed registration.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Partner {
    pub name: String,
    /// Registered user, when the partner has an account.
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

/// A registration for one category of a tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    /// Account that registered.
    pub user_id: Uuid,
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub age_groups: Vec<String>,
    #[serde(default)]
    pub skill_level: Option<SkillLevel>,
    #[serde(default)]
    pub partner: Option<Partner>,
    #[serde(default)]
    pub approved: bool,
}

impl Participant {
    /// Create an unapproved singles-style registration with no age groups or skill level.
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: name.into(),
            category,
            age_groups: Vec::new(),
            skill_level: None,
            partner: None,
            approved: false,
        }
    }

    pub fn with_skill(mut self, level: SkillLevel) -> Self {
        self.skill_level = Some(level);
        self
    }

    pub fn with_age_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.age_groups = groups.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_partner(mut self, name: impl Into<String>) -> Self {
        self.partner = Some(Partner {
            name: name.into(),
            user_id: None,
        });
        self
    }

    pub fn approve(mut self) -> Self {
        self.approved = true;
        self
    }

    /// The bracket entry for this registration.
    pub fn entrant(&self) -> Entrant {
        Entrant {
            participant_id: self.id,
            name: self.name.clone(),
            partner_name: self.partner.as_ref().map(|p| p.name.clone()),
            skill_level: self.skill_level,
        }
    }
}

/// One side of a match: a single player, or a player and partner treated as one entry.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Entrant {
    pub participant_id: ParticipantId,
    pub name: String,
    #[serde(default)]
    pub partner_name: Option<String>,
    #[serde(default)]
    pub skill_level: Option<SkillLevel>,
}

impl Entrant {
    /// "Name" or "Name / Partner".
    pub fn display_name(&self) -> String {
        match &self.partner_name {
            Some(partner) => format!("{} / {}", self.name, partner),
            None => self.name.clone(),
        }
    }
}
