//! Subscription plans, plan codes, and the [`Limit`] type.
//!
//! Plan limits arrive as optional numbers. An absent or null value means the
//! dimension is unlimited; `0` means the feature is disabled. [`Limit`] keeps
//! the two apart so no caller has to remember the convention.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Plan codes
// ---------------------------------------------------------------------------

pub const PLAN_FREE: &str = "free";
pub const PLAN_STARTER: &str = "starter";
pub const PLAN_PRO: &str = "pro";
pub const PLAN_BUSINESS: &str = "business";
pub const PLAN_PORTFOLIO: &str = "portfolio";
pub const PLAN_ENTERPRISE: &str = "enterprise";

/// Known subscription tiers, cheapest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PlanCode {
    Free,
    Starter,
    Pro,
    Business,
    Portfolio,
    Enterprise,
}

impl PlanCode {
    pub const ALL: [PlanCode; 6] = [
        Self::Free,
        Self::Starter,
        Self::Pro,
        Self::Business,
        Self::Portfolio,
        Self::Enterprise,
    ];

    /// Case-insensitive parse; surrounding whitespace is ignored.
    pub fn parse(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|plan| plan.as_str().eq_ignore_ascii_case(code))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Free => PLAN_FREE,
            Self::Starter => PLAN_STARTER,
            Self::Pro => PLAN_PRO,
            Self::Business => PLAN_BUSINESS,
            Self::Portfolio => PLAN_PORTFOLIO,
            Self::Enterprise => PLAN_ENTERPRISE,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Free => "Free",
            Self::Starter => "Starter",
            Self::Pro => "Pro",
            Self::Business => "Business",
            Self::Portfolio => "Portfolio",
            Self::Enterprise => "Enterprise",
        }
    }
}

impl fmt::Display for PlanCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Limit
// ---------------------------------------------------------------------------

/// A plan limit on one dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Limit {
    #[default]
    Unlimited,
    /// At most `n`. `Bounded(0)` disables the feature.
    Bounded(u64),
}

impl Limit {
    /// Whether one more item may be added when `current` already exist.
    pub fn allows(self, current: u64) -> bool {
        match self {
            Self::Unlimited => true,
            Self::Bounded(max) => current < max,
        }
    }

    /// Whether a quantity of exactly `amount` fits under the limit.
    pub fn fits(self, amount: u64) -> bool {
        match self {
            Self::Unlimited => true,
            Self::Bounded(max) => amount <= max,
        }
    }

    pub fn is_disabled(self) -> bool {
        self == Self::Bounded(0)
    }

    pub fn bound(self) -> Option<u64> {
        match self {
            Self::Unlimited => None,
            Self::Bounded(max) => Some(max),
        }
    }

    /// Scale a bounded value, saturating on overflow.
    pub fn scaled(self, factor: u64) -> Self {
        match self {
            Self::Unlimited => Self::Unlimited,
            Self::Bounded(max) => Self::Bounded(max.saturating_mul(factor)),
        }
    }
}

impl From<Option<u64>> for Limit {
    fn from(value: Option<u64>) -> Self {
        value.map_or(Self::Unlimited, Self::Bounded)
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unlimited => f.write_str("unlimited"),
            Self::Bounded(max) => write!(f, "{max}"),
        }
    }
}

impl Serialize for Limit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Unlimited => serializer.serialize_none(),
            Self::Bounded(max) => serializer.serialize_u64(*max),
        }
    }
}

impl<'de> Deserialize<'de> for Limit {
    /// `null` or a negative sentinel mean unlimited.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<i64>::deserialize(deserializer)?;
        Ok(match raw {
            Some(n) if n >= 0 => Self::Bounded(n as u64),
            _ => Self::Unlimited,
        })
    }
}

// ---------------------------------------------------------------------------
// Plan DTOs
// ---------------------------------------------------------------------------

/// Feature limits attached to a subscription plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanLimits {
    #[serde(default)]
    pub max_properties: Limit,
    #[serde(default)]
    pub max_documents: Limit,
    /// Some payloads send this field PascalCased; both spellings are read.
    #[serde(default, alias = "MaxGuests")]
    pub max_guests: Limit,
    #[serde(default)]
    pub max_buildings: Limit,
    #[serde(default)]
    pub max_units_per_building: Limit,
    #[serde(default)]
    pub max_upload_mb: Limit,
    #[serde(default)]
    pub ai_on_upload: bool,
    #[serde(default)]
    pub encryption_eligible: bool,
}

/// A subscription plan as listed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPlanDto {
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub monthly_price: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub limits: PlanLimits,
}

impl SubscriptionPlanDto {
    pub fn plan_code(&self) -> Option<PlanCode> {
        PlanCode::parse(&self.code)
    }
}

/// Find a plan by code, ignoring case.
pub fn find_plan<'a>(code: &str, plans: &'a [SubscriptionPlanDto]) -> Option<&'a SubscriptionPlanDto> {
    let code = code.trim();
    plans.iter().find(|plan| plan.code.trim().eq_ignore_ascii_case(code))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
