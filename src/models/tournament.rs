//! Tournament configuration, caller identity, and errors.

use crate::models::game::MatchId;
use crate::models::participant::{Category, ParticipantId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Failure reported by a storage collaborator.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// A lock guarding in-memory state was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    Poisoned,
    #[error("duplicate match id {0}")]
    DuplicateMatch(MatchId),
    #[error("unknown match id {0}")]
    UnknownMatch(MatchId),
}

/// Errors that can occur during fixture generation and match progression.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum FixtureError {
    #[error("tournament {0} not found")]
    TournamentNotFound(TournamentId),
    #[error("match {0} not found")]
    MatchNotFound(MatchId),
    #[error("participant {0} not found")]
    ParticipantNotFound(ParticipantId),
    /// Bad input; nothing was written.
    #[error("{0}")]
    Validation(String),
    /// The action clashes with existing state (fixtures already generated, terminal match).
    #[error("{0}")]
    Conflict(String),
    #[error("failed to save fixtures: {0}")]
    Persistence(#[from] StoreError),
    #[error("admin access required")]
    Forbidden,
}

impl FixtureError {
    pub fn validation(message: impl Into<String>) -> Self {
        FixtureError::Validation(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        FixtureError::Conflict(message.into())
    }

    /// HTTP status equivalent for the web layer.
    pub fn status_code(&self) -> u16 {
        match self {
            FixtureError::TournamentNotFound(_)
            | FixtureError::MatchNotFound(_)
            | FixtureError::ParticipantNotFound(_) => 404,
            FixtureError::Validation(_) => 400,
            FixtureError::Forbidden => 403,
            FixtureError::Conflict(_) => 409,
            FixtureError::Persistence(_) => 500,
        }
    }
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// How each partition is played out.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    #[default]
    Knockout,
    RoundRobin,
}

/// Tournament configuration as seen by the fixture engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub format: Format,
    /// Categories open for registration.
    pub categories: Vec<Category>,
    /// Age group names (e.g. "U15", "Open"). Empty means no age grouping.
    #[serde(default)]
    pub age_groups: Vec<String>,
    #[serde(default)]
    pub allow_multiple_age_groups: bool,
    /// Set once fixtures have been persisted; guards against double generation.
    #[serde(default)]
    pub has_fixtures: bool,
}

impl Tournament {
    /// Create a tournament open for all categories, without age groups.
    pub fn new(name: impl Into<String>, format: Format) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            format,
            categories: vec![Category::Singles, Category::Doubles, Category::Mixed],
            age_groups: Vec::new(),
            allow_multiple_age_groups: false,
            has_fixtures: false,
        }
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_age_groups<I, S>(mut self, groups: I, allow_multiple: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.age_groups = groups.into_iter().map(Into::into).collect();
        self.allow_multiple_age_groups = allow_multiple;
        self
    }

    pub fn offers(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }

    pub fn knows_age_group(&self, name: &str) -> bool {
        self.age_groups.iter().any(|g| g == name)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Player,
}

/// Verified identity supplied by the authentication layer.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Caller {
    pub user_id: Uuid,
    pub roles: Vec<Role>,
}

impl Caller {
    pub fn admin(user_id: Uuid) -> Self {
        Self {
            user_id,
            roles: vec![Role::Admin],
        }
    }

    pub fn player(user_id: Uuid) -> Self {
        Self {
            user_id,
            roles: vec![Role::Player],
        }
    }

    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }

    pub fn require_admin(&self) -> Result<(), FixtureError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(FixtureError::Forbidden)
        }
    }
}
