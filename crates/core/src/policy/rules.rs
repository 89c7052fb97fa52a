//! Concrete per-entity policies.
//!
//! Administrators and inactive actors are settled by [`default_before`];
//! the functions below only ever see active non-admin actors unless a
//! policy overrides `before`.

use super::{default_before, Action, Actor, Decision, Policy, Target};

/// Users: members see themselves and their group, edit only themselves.
/// Group and status changes are left to administrators.
pub struct UserPolicy;

impl Policy for UserPolicy {
    fn before(&self, actor: &Actor, action: Action, target: Option<&Target>) -> Option<Decision> {
        if action == Action::Delete && target.is_some_and(|t| t.is_owned_by(actor)) {
            return Some(Decision::deny("You cannot deactivate your own account"));
        }
        default_before(actor)
    }

    fn view_any(&self, _actor: &Actor) -> Decision {
        Decision::deny("Only administrators may list users")
    }

    fn view(&self, actor: &Actor, target: &Target) -> Decision {
        Decision::allow_if(
            target.is_owned_by(actor) || actor.shares_group(target.group_id),
            "You may only view users in your group",
        )
    }

    fn create(&self, _actor: &Actor, _owner: Option<&Target>) -> Decision {
        Decision::deny("Only administrators may create users")
    }

    fn update(&self, actor: &Actor, target: &Target) -> Decision {
        Decision::allow_if(target.is_owned_by(actor), "You may only update your own account")
    }

    fn delete(&self, _actor: &Actor, _target: &Target) -> Decision {
        Decision::deny("Only administrators may deactivate users")
    }

    fn manage(&self, _actor: &Actor, _target: &Target) -> Decision {
        Decision::deny("Only administrators may change group or status")
    }
}

/// Groups: readable by everyone, managed by administrators.
pub struct GroupPolicy;

impl Policy for GroupPolicy {
    fn view_any(&self, _actor: &Actor) -> Decision {
        Decision::Allow
    }

    fn view(&self, _actor: &Actor, _target: &Target) -> Decision {
        Decision::Allow
    }

    fn create(&self, _actor: &Actor, _owner: Option<&Target>) -> Decision {
        Decision::deny("Only administrators may create groups")
    }

    fn update(&self, _actor: &Actor, _target: &Target) -> Decision {
        Decision::deny("Only administrators may update groups")
    }

    fn delete(&self, _actor: &Actor, _target: &Target) -> Decision {
        Decision::deny("Only administrators may delete groups")
    }
}

/// Themes: readable by everyone, managed by administrators.
pub struct ThemePolicy;

impl Policy for ThemePolicy {
    fn view_any(&self, _actor: &Actor) -> Decision {
        Decision::Allow
    }

    fn view(&self, _actor: &Actor, _target: &Target) -> Decision {
        Decision::Allow
    }

    fn create(&self, _actor: &Actor, _owner: Option<&Target>) -> Decision {
        Decision::deny("Only administrators may create themes")
    }

    fn update(&self, _actor: &Actor, _target: &Target) -> Decision {
        Decision::deny("Only administrators may update themes")
    }

    fn delete(&self, _actor: &Actor, _target: &Target) -> Decision {
        Decision::deny("Only administrators may delete themes")
    }
}

/// Emails and phone numbers: owner only.
pub struct ContactPolicy;

impl Policy for ContactPolicy {
    fn view(&self, actor: &Actor, target: &Target) -> Decision {
        Decision::allow_if(target.is_owned_by(actor), "You may only view your own contact details")
    }

    fn create(&self, actor: &Actor, owner: Option<&Target>) -> Decision {
        Decision::allow_if(
            owner.is_some_and(|t| t.is_owned_by(actor)),
            "You may only add contact details to your own account",
        )
    }

    fn update(&self, actor: &Actor, target: &Target) -> Decision {
        Decision::allow_if(target.is_owned_by(actor), "You may only change your own contact details")
    }

    fn delete(&self, actor: &Actor, target: &Target) -> Decision {
        Decision::allow_if(target.is_owned_by(actor), "You may only remove your own contact details")
    }
}

/// Preferences: created and removed with the user, edited by the owner.
pub struct PreferencePolicy;

impl Policy for PreferencePolicy {
    fn view(&self, actor: &Actor, target: &Target) -> Decision {
        Decision::allow_if(target.is_owned_by(actor), "You may only view your own preferences")
    }

    fn create(&self, _actor: &Actor, _owner: Option<&Target>) -> Decision {
        Decision::deny("Preferences are created with the user")
    }

    fn update(&self, actor: &Actor, target: &Target) -> Decision {
        Decision::allow_if(target.is_owned_by(actor), "You may only update your own preferences")
    }

    fn delete(&self, _actor: &Actor, _target: &Target) -> Decision {
        Decision::deny("Preferences are removed with the user")
    }
}

/// Dashboard layouts: strictly per user, never deleted.
pub struct DashboardLayoutPolicy;

impl Policy for DashboardLayoutPolicy {
    fn view(&self, actor: &Actor, target: &Target) -> Decision {
        Decision::allow_if(target.is_owned_by(actor), "You may only view your own dashboard")
    }

    fn create(&self, actor: &Actor, owner: Option<&Target>) -> Decision {
        Decision::allow_if(
            owner.is_some_and(|t| t.is_owned_by(actor)),
            "You may only create your own dashboard",
        )
    }

    fn update(&self, actor: &Actor, target: &Target) -> Decision {
        Decision::allow_if(target.is_owned_by(actor), "You may only change your own dashboard")
    }

    fn delete(&self, _actor: &Actor, _target: &Target) -> Decision {
        Decision::deny("Dashboard layouts cannot be deleted")
    }
}
