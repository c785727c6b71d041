//! Explicit session value passed into permission and gate checks.

use serde::{Deserialize, Serialize};

use crate::models::User;
use crate::plans::{PlanCode, PlanLimits, SubscriptionPlanDto};

/// The signed-in user, their bearer token, and their active plan.
///
/// Rules take a `&Session` argument rather than reading global auth state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    #[serde(skip_serializing)]
    #[serde(default)]
    pub token: String,
    /// `None` when the subscription could not be loaded.
    pub plan: Option<SubscriptionPlanDto>,
}

impl Session {
    pub fn new(user: User, token: impl Into<String>, plan: Option<SubscriptionPlanDto>) -> Self {
        Self {
            user,
            token: token.into(),
            plan,
        }
    }

    /// Raw plan code, if a plan is loaded.
    pub fn plan_code_str(&self) -> Option<&str> {
        self.plan.as_ref().map(|plan| plan.code.as_str())
    }

    pub fn plan_code(&self) -> Option<PlanCode> {
        self.plan.as_ref().and_then(SubscriptionPlanDto::plan_code)
    }

    pub fn limits(&self) -> Option<&PlanLimits> {
        self.plan.as_ref().map(|plan| &plan.limits)
    }
}
