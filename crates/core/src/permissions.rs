//! Read/edit/share decisions for a user on a property.
//!
//! Every check takes optional inputs and answers `false` when anything is
//! missing. Expired grants stay in the list and are simply ignored; expiry
//! is evaluated against the `now` the caller passes in.

use std::collections::HashSet;

use serde::Serialize;

use crate::models::{Property, PropertyPermission};
use crate::session::Session;
use crate::taxonomy::PermissionLevel;
use crate::types::{EntityId, Timestamp};

/// Grants on `property` that are still active at `now`.
pub fn active_grants(property: &Property, now: Timestamp) -> impl Iterator<Item = &PropertyPermission> {
    property.permissions.iter().filter(move |p| p.is_active_at(now))
}

/// Strongest active level held by `user_id`, across all of their grants.
///
/// The owner has no grant-derived level; check ownership separately.
pub fn effective_level(
    user_id: EntityId,
    property: &Property,
    now: Timestamp,
) -> Option<PermissionLevel> {
    active_grants(property, now)
        .filter(|p| p.user_id == user_id)
        .map(|p| p.property_level)
        .max_by_key(|level| level.rank())
}

/// Number of distinct non-owner users holding an active grant.
pub fn guest_count(property: &Property, now: Timestamp) -> u64 {
    active_grants(property, now)
        .filter(|p| p.user_id != property.owner_id)
        .map(|p| p.user_id)
        .collect::<HashSet<_>>()
        .len() as u64
}

/// Owner, or any active grant.
pub fn can_read(session: Option<&Session>, property: Option<&Property>, now: Timestamp) -> bool {
    let (Some(session), Some(property)) = (session, property) else {
        return false;
    };
    let user_id = session.user.id;
    property.is_owned_by(user_id)
        || effective_level(user_id, property, now).is_some_and(PermissionLevel::grants_read)
}

/// Owner, or an active `Admin` grant.
pub fn can_edit(session: Option<&Session>, property: Option<&Property>, now: Timestamp) -> bool {
    let (Some(session), Some(property)) = (session, property) else {
        return false;
    };
    let user_id = session.user.id;
    property.is_owned_by(user_id)
        || effective_level(user_id, property, now).is_some_and(PermissionLevel::grants_edit)
}

/// Whether the acting user's plan leaves room for another guest.
///
/// Callers confirm edit rights before offering sharing; this only checks
/// the guest limit of the session's own plan against the property's current
/// active guests. A session without a loaded plan cannot share.
/// Guests are counted per distinct user (see [`guest_count`]), so several
/// grants held by one user use a single guest slot.
pub fn can_share(session: Option<&Session>, property: Option<&Property>, now: Timestamp) -> bool {
    let (Some(session), Some(property)) = (session, property) else {
        return false;
    };
    let Some(limits) = session.limits() else {
        return false;
    };
    limits.max_guests.allows(guest_count(property, now))
}

/// All access answers for one user and property, for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessSummary {
    pub is_owner: bool,
    pub effective_level: Option<PermissionLevel>,
    pub can_read: bool,
    pub can_edit: bool,
    pub can_share: bool,
}

impl AccessSummary {
    pub fn denied() -> Self {
        Self {
            is_owner: false,
            effective_level: None,
            can_read: false,
            can_edit: false,
            can_share: false,
        }
    }
}

pub fn access_summary(
    session: Option<&Session>,
    property: Option<&Property>,
    now: Timestamp,
) -> AccessSummary {
    let (Some(s), Some(p)) = (session, property) else {
        return AccessSummary::denied();
    };
    AccessSummary {
        is_owner: p.is_owned_by(s.user.id),
        effective_level: effective_level(s.user.id, p, now),
        can_read: can_read(session, property, now),
        can_edit: can_edit(session, property, now),
        can_share: can_share(session, property, now),
    }
}
