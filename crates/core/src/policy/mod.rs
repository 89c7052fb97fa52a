//! Authorization policies.
//!
//! A policy is a pure function of (actor, action, target) to a [`Decision`].
//! One policy exists per protected entity kind; the [`PolicyRegistry`] maps
//! kinds to policies and is built once at startup.
//!
//! - [`rules`] -- the concrete per-entity policies.
//! - [`registry`] -- the immutable kind-to-policy mapping.

pub mod registry;
pub mod rules;

use std::fmt;

use crate::error::CoreError;
use crate::identity::ADMIN_GROUP;
use crate::lookup::UserStatus;
use crate::types::DbId;

pub use registry::{PolicyRegistry, PolicyRegistryBuilder};
pub use rules::{
    ContactPolicy, DashboardLayoutPolicy, GroupPolicy, PreferencePolicy, ThemePolicy, UserPolicy,
};

/// Something a user may attempt on an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ViewAny,
    View,
    Create,
    Update,
    Delete,
    /// Change privileged attributes of an instance (a user's group or status).
    Manage,
}

impl Action {
    pub fn name(self) -> &'static str {
        match self {
            Action::ViewAny => "view_any",
            Action::View => "view",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Manage => "manage",
        }
    }

    /// Whether the action addresses a specific instance.
    pub fn needs_target(self) -> bool {
        matches!(
            self,
            Action::View | Action::Update | Action::Delete | Action::Manage
        )
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Protected entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Group,
    UserEmail,
    UserPhone,
    UserPreference,
    Theme,
    DashboardLayout,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        EntityKind::User,
        EntityKind::Group,
        EntityKind::UserEmail,
        EntityKind::UserPhone,
        EntityKind::UserPreference,
        EntityKind::Theme,
        EntityKind::DashboardLayout,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EntityKind::User => "User",
            EntityKind::Group => "Group",
            EntityKind::UserEmail => "UserEmail",
            EntityKind::UserPhone => "UserPhone",
            EntityKind::UserPreference => "UserPreference",
            EntityKind::Theme => "Theme",
            EntityKind::DashboardLayout => "DashboardLayout",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of a policy check.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny { reason: String },
}

impl Decision {
    pub fn deny(reason: impl Into<String>) -> Self {
        Decision::Deny {
            reason: reason.into(),
        }
    }

    /// Allow when `condition` holds, otherwise deny with `reason`.
    pub fn allow_if(condition: bool, reason: &str) -> Self {
        if condition {
            Decision::Allow
        } else {
            Decision::deny(reason)
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Turn a denial into [`CoreError::Forbidden`].
    pub fn into_result(self) -> Result<(), CoreError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny { reason } => Err(CoreError::Forbidden(reason)),
        }
    }
}

/// The authenticated user on whose behalf a request runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: DbId,
    pub group_id: Option<DbId>,
    pub group_name: Option<String>,
    pub status: UserStatus,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.group_name.as_deref() == Some(ADMIN_GROUP)
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// True when both the actor and `group_id` belong to the same group.
    pub fn shares_group(&self, group_id: Option<DbId>) -> bool {
        matches!((self.group_id, group_id), (Some(a), Some(b)) if a == b)
    }
}

/// Plain description of the instance an action addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub id: DbId,
    /// User that owns the record. For a user row this is the user itself.
    pub owner_id: Option<DbId>,
    pub group_id: Option<DbId>,
}

impl Target {
    /// A user row: owned by itself, optionally in a group.
    pub fn user(id: DbId, group_id: Option<DbId>) -> Self {
        Self {
            id,
            owner_id: Some(id),
            group_id,
        }
    }

    /// A record that belongs to a user (email, phone, preference, layout).
    pub fn owned_by(id: DbId, owner_id: DbId) -> Self {
        Self {
            id,
            owner_id: Some(owner_id),
            group_id: None,
        }
    }

    /// A record about to be created for `owner_id`. The `id` is 0 until stored.
    pub fn unsaved(owner_id: DbId) -> Self {
        Self {
            id: 0,
            owner_id: Some(owner_id),
            group_id: None,
        }
    }

    /// A record with no owner (group, theme).
    pub fn shared(id: DbId) -> Self {
        Self {
            id,
            owner_id: None,
            group_id: None,
        }
    }

    pub fn is_owned_by(&self, actor: &Actor) -> bool {
        self.owner_id == Some(actor.user_id)
    }
}

/// Per-entity authorization rules.
///
/// Implementations must be pure: no IO, no interior mutability.
pub trait Policy: Send + Sync {
    /// Pre-check run before the per-action function.
    ///
    /// Returning `Some` short-circuits the decision. The default denies
    /// non-active actors and allows administrators.
    fn before(&self, actor: &Actor, _action: Action, _target: Option<&Target>) -> Option<Decision> {
        default_before(actor)
    }

    fn view_any(&self, _actor: &Actor) -> Decision {
        Decision::deny("You may not list these records")
    }

    fn view(&self, actor: &Actor, target: &Target) -> Decision;

    /// `owner` describes the user the new record will belong to, when the
    /// record has one.
    fn create(&self, actor: &Actor, owner: Option<&Target>) -> Decision;

    fn update(&self, actor: &Actor, target: &Target) -> Decision;

    fn delete(&self, actor: &Actor, target: &Target) -> Decision;

    fn manage(&self, _actor: &Actor, _target: &Target) -> Decision {
        Decision::deny("Only administrators may manage these records")
    }

    /// Run [`Policy::before`] then the function for `action`.
    fn decide(&self, actor: &Actor, action: Action, target: Option<&Target>) -> Decision {
        if let Some(decision) = self.before(actor, action, target) {
            return decision;
        }
        match (action, target) {
            (Action::ViewAny, _) => self.view_any(actor),
            (Action::Create, owner) => self.create(actor, owner),
            (Action::View, Some(t)) => self.view(actor, t),
            (Action::Update, Some(t)) => self.update(actor, t),
            (Action::Delete, Some(t)) => self.delete(actor, t),
            (Action::Manage, Some(t)) => self.manage(actor, t),
            (_, None) => Decision::deny(format!("Action '{action}' requires a target")),
        }
    }
}

/// Shared pre-check: inactive actors never act, administrators always do.
pub fn default_before(actor: &Actor) -> Option<Decision> {
    if !actor.is_active() {
        return Some(Decision::deny("Inactive accounts cannot perform this action"));
    }
    if actor.is_admin() {
        return Some(Decision::Allow);
    }
    None
}
