//! In-memory goal registry.
//!
//! # Responsibility
//! - Hold the ordered set of active goals.
//! - Serve as the single source of truth consulted by the classifier.
//!
//! # Invariants
//! - `list()` preserves insertion order.
//! - Goal ids are unique; goals are never deleted.
//! - `rename` changes the title only.

use crate::model::goal::{Goal, GoalId};
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RegistryResult<T> = Result<T, GoalRegistryError>;

/// Goal registry errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalRegistryError {
    NotFound(GoalId),
    /// Title is blank after trim.
    InvalidTitle,
    DuplicateId(GoalId),
}

impl Display for GoalRegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "goal not found: {id}"),
            Self::InvalidTitle => write!(f, "goal title must not be blank"),
            Self::DuplicateId(id) => write!(f, "goal id already registered: {id}"),
        }
    }
}

impl Error for GoalRegistryError {}

/// Ordered goal collection.
#[derive(Debug, Clone)]
pub struct GoalRegistry {
    goals: Vec<Goal>,
    default_color: String,
}

impl GoalRegistry {
    pub fn new(default_color: impl Into<String>) -> Self {
        Self {
            goals: Vec::new(),
            default_color: default_color.into(),
        }
    }

    /// Creates a registry pre-populated with `goals`.
    ///
    /// # Errors
    /// - `DuplicateId` when two seed goals share an id.
    /// - `InvalidTitle` when a seed goal has a blank title.
    pub fn seeded(default_color: impl Into<String>, goals: Vec<Goal>) -> RegistryResult<Self> {
        let mut registry = Self::new(default_color);
        for goal in goals {
            if goal.title.trim().is_empty() {
                return Err(GoalRegistryError::InvalidTitle);
            }
            if registry.contains(&goal.id) {
                return Err(GoalRegistryError::DuplicateId(goal.id));
            }
            registry.goals.push(goal);
        }
        Ok(registry)
    }

    pub fn list(&self) -> &[Goal] {
        &self.goals
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    pub fn get(&self, id: &GoalId) -> Option<&Goal> {
        self.goals.iter().find(|goal| &goal.id == id)
    }

    pub fn contains(&self, id: &GoalId) -> bool {
        self.get(id).is_some()
    }

    /// Position of `id` in insertion order.
    pub fn position(&self, id: &GoalId) -> Option<usize> {
        self.goals.iter().position(|goal| &goal.id == id)
    }

    /// Adds a goal with a fresh id, the default color and zero target.
    pub fn add(&mut self, title: impl Into<String>) -> RegistryResult<Goal> {
        let title = normalize_title(title.into())?;
        let mut id = GoalId::generate();
        while self.contains(&id) {
            id = GoalId::generate();
        }

        let goal = Goal::new(id, title, self.default_color.clone(), 0);
        self.goals.push(goal.clone());
        debug!(
            "event=goal_add module=registry status=ok goal_id={} count={}",
            goal.id,
            self.goals.len()
        );
        Ok(goal)
    }

    /// Renames an existing goal; every other field stays unchanged.
    pub fn rename(&mut self, id: &GoalId, title: impl Into<String>) -> RegistryResult<Goal> {
        let title = normalize_title(title.into())?;
        let Some(goal) = self.goals.iter_mut().find(|goal| &goal.id == id) else {
            warn!("event=goal_rename module=registry status=error reason=not_found goal_id={id}");
            return Err(GoalRegistryError::NotFound(id.clone()));
        };

        goal.title = title;
        debug!("event=goal_rename module=registry status=ok goal_id={id}");
        Ok(goal.clone())
    }
}

fn normalize_title(title: String) -> RegistryResult<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(GoalRegistryError::InvalidTitle);
    }
    Ok(trimmed.to_string())
}
