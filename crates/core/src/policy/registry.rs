//! Immutable mapping from entity kind to policy.
//!
//! Built once during startup and shared behind an `Arc`; lookups take `&self`
//! only, so concurrent readers need no locking. Kinds without a registered
//! policy are denied.

use std::collections::HashMap;
use std::sync::Arc;

use super::rules::{
    ContactPolicy, DashboardLayoutPolicy, GroupPolicy, PreferencePolicy, ThemePolicy, UserPolicy,
};
use super::{Action, Actor, Decision, EntityKind, Policy, Target};
use crate::error::CoreError;

pub struct PolicyRegistry {
    policies: HashMap<EntityKind, Arc<dyn Policy>>,
}

impl PolicyRegistry {
    pub fn builder() -> PolicyRegistryBuilder {
        PolicyRegistryBuilder::default()
    }

    /// Registry with a policy for every [`EntityKind`].
    pub fn standard() -> Self {
        let contacts: Arc<dyn Policy> = Arc::new(ContactPolicy);
        Self::builder()
            .register(EntityKind::User, UserPolicy)
            .register(EntityKind::Group, GroupPolicy)
            .register_shared(EntityKind::UserEmail, Arc::clone(&contacts))
            .register_shared(EntityKind::UserPhone, contacts)
            .register(EntityKind::UserPreference, PreferencePolicy)
            .register(EntityKind::Theme, ThemePolicy)
            .register(EntityKind::DashboardLayout, DashboardLayoutPolicy)
            .build()
    }

    pub fn get(&self, kind: EntityKind) -> Option<&dyn Policy> {
        self.policies.get(&kind).map(|p| p.as_ref())
    }

    pub fn is_registered(&self, kind: EntityKind) -> bool {
        self.policies.contains_key(&kind)
    }

    /// Decide `action` on `kind`. Unregistered kinds are always denied.
    pub fn decide(
        &self,
        actor: &Actor,
        kind: EntityKind,
        action: Action,
        target: Option<&Target>,
    ) -> Decision {
        match self.get(kind) {
            Some(policy) => policy.decide(actor, action, target),
            None => {
                tracing::warn!(entity = %kind, %action, "No policy registered, denying");
                Decision::deny(format!("No policy registered for {kind}"))
            }
        }
    }

    /// [`PolicyRegistry::decide`] as a `Result`, denials becoming
    /// [`CoreError::Forbidden`].
    pub fn authorize(
        &self,
        actor: &Actor,
        kind: EntityKind,
        action: Action,
        target: Option<&Target>,
    ) -> Result<(), CoreError> {
        let decision = self.decide(actor, kind, action, target);
        if let Decision::Deny { reason } = &decision {
            tracing::debug!(
                user_id = actor.user_id,
                entity = %kind,
                %action,
                target_id = target.map(|t| t.id),
                reason = %reason,
                "Policy denied action",
            );
        }
        decision.into_result()
    }
}

#[derive(Default)]
pub struct PolicyRegistryBuilder {
    policies: HashMap<EntityKind, Arc<dyn Policy>>,
}

impl PolicyRegistryBuilder {
    /// Register `policy` for `kind`, replacing any earlier registration.
    pub fn register(self, kind: EntityKind, policy: impl Policy + 'static) -> Self {
        self.register_shared(kind, Arc::new(policy))
    }

    /// Register an already shared policy (one policy serving several kinds).
    pub fn register_shared(mut self, kind: EntityKind, policy: Arc<dyn Policy>) -> Self {
        self.policies.insert(kind, policy);
        self
    }

    pub fn build(self) -> PolicyRegistry {
        PolicyRegistry {
            policies: self.policies,
        }
    }
}
