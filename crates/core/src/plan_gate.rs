//! Plan-based feature gating.
//!
//! Pure lookups over plan codes and [`PlanLimits`]. Unknown plan codes are
//! denied; absent limits are unlimited, and `Bounded(0)` disables a feature.

use serde::Serialize;

use crate::formatting::format_file_size;
use crate::plans::{find_plan, Limit, PlanCode, PlanLimits, SubscriptionPlanDto};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Upload ceiling used when the plan code is not in the provided list.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 2 * BYTES_PER_MB;

pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// Reason shown when a building is requested on a lower tier.
pub const BUILDING_REQUIRES_PORTFOLIO: &str = "requires Portfolio+ plan";

/// Tiers allowed to create buildings and units.
const BUILDING_PLANS: &[PlanCode] = &[PlanCode::Portfolio, PlanCode::Enterprise];

/// Tiers allowed to store documents encrypted.
const ENCRYPTION_PLANS: &[PlanCode] = &[PlanCode::Business, PlanCode::Portfolio, PlanCode::Enterprise];

// ---------------------------------------------------------------------------
// Decision type
// ---------------------------------------------------------------------------

/// Outcome of a gate check, with the limiting reason on denial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GateDecision {
    Allowed,
    Denied { reason: String },
}

impl GateDecision {
    pub fn denied(reason: impl Into<String>) -> Self {
        Self::Denied {
            reason: reason.into(),
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allowed => None,
            Self::Denied { reason } => Some(reason),
        }
    }
}

/// Allow when `limit` leaves room beyond `current`, else deny with `what`.
fn quota(limit: Limit, current: u64, what: &str) -> GateDecision {
    if limit.allows(current) {
        return GateDecision::Allowed;
    }
    match limit {
        Limit::Bounded(0) => GateDecision::denied(format!("{what} not available on this plan")),
        Limit::Bounded(max) => {
            GateDecision::denied(format!("{what} limit reached ({current} of {max})"))
        }
        Limit::Unlimited => GateDecision::Allowed,
    }
}

// ---------------------------------------------------------------------------
// Code-based gates
// ---------------------------------------------------------------------------

fn plan_in(plan_code: &str, allowed: &[PlanCode]) -> bool {
    PlanCode::parse(plan_code).is_some_and(|code| allowed.contains(&code))
}

/// Only Portfolio and Enterprise may create buildings.
pub fn can_create_building(plan_code: &str) -> bool {
    plan_in(plan_code, BUILDING_PLANS)
}

/// [`can_create_building`] with the caller-facing reason.
pub fn building_creation_gate(plan_code: &str) -> GateDecision {
    if can_create_building(plan_code) {
        GateDecision::Allowed
    } else {
        GateDecision::denied(BUILDING_REQUIRES_PORTFOLIO)
    }
}

/// Business and above may encrypt storage. Unknown codes are denied.
pub fn can_encrypt(plan_code: &str) -> bool {
    plan_in(plan_code, ENCRYPTION_PLANS)
}

// ---------------------------------------------------------------------------
// Limit-based gates
// ---------------------------------------------------------------------------

/// Upload ceiling in bytes for `plan_code`.
///
/// Falls back to [`DEFAULT_MAX_UPLOAD_BYTES`] when the code is not in
/// `plans`. A listed plan without a size limit is unlimited.
pub fn max_upload_bytes_for(plan_code: &str, plans: &[SubscriptionPlanDto]) -> Limit {
    match find_plan(plan_code, plans) {
        Some(plan) => plan.limits.max_upload_mb.scaled(BYTES_PER_MB),
        None => Limit::Bounded(DEFAULT_MAX_UPLOAD_BYTES),
    }
}

/// Whether a file of `size_bytes` may be uploaded on `plan_code`.
pub fn upload_gate(plan_code: &str, plans: &[SubscriptionPlanDto], size_bytes: u64) -> GateDecision {
    let limit = max_upload_bytes_for(plan_code, plans);
    if limit.fits(size_bytes) {
        GateDecision::Allowed
    } else {
        let max = limit.bound().unwrap_or_default();
        GateDecision::denied(format!(
            "file is {} but the plan allows at most {}",
            format_file_size(size_bytes),
            format_file_size(max)
        ))
    }
}

pub fn property_quota_gate(limits: &PlanLimits, current_properties: u64) -> GateDecision {
    quota(limits.max_properties, current_properties, "Property")
}

pub fn document_quota_gate(limits: &PlanLimits, current_documents: u64) -> GateDecision {
    quota(limits.max_documents, current_documents, "Document")
}

pub fn building_quota_gate(limits: &PlanLimits, current_buildings: u64) -> GateDecision {
    quota(limits.max_buildings, current_buildings, "Building")
}

pub fn unit_quota_gate(limits: &PlanLimits, current_units: u64) -> GateDecision {
    quota(limits.max_units_per_building, current_units, "Units per building")
}

pub fn guest_quota_gate(limits: &PlanLimits, current_guests: u64) -> GateDecision {
    quota(limits.max_guests, current_guests, "Guest")
}

/// Whether uploads on this plan are sent for AI extraction.
pub fn ai_on_upload(limits: &PlanLimits) -> bool {
    limits.ai_on_upload
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
