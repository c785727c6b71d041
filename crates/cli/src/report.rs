//! Per-property access and document report.
//!
//! Pure assembly over `propdocs-core` rules; nothing here touches the
//! network, so the binary fetches data first and hands it in.

use serde::Serialize;

use propdocs_core::ai_fields::needs_review;
use propdocs_core::expiry::{expiring_documents, ExpiryStatus};
use propdocs_core::formatting::{format_money, format_timestamp_or_dash, initials_from_name, DASH};
use propdocs_core::models::Property;
use propdocs_core::permissions::{access_summary, guest_count, AccessSummary};
use propdocs_core::session::Session;
use propdocs_core::suggestions::{missing_suggestions, suggestion_coverage, SuggestionCoverage};
use propdocs_core::taxonomy::label_for_property_type;
use propdocs_core::types::{EntityId, Timestamp};

/// Who is looking, and on which plan.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub user_name: String,
    pub initials: String,
    pub plan: String,
    pub monthly_price: String,
}

/// A suggested document type the property does not have yet.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingDocument {
    pub key: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiringDocument {
    pub document_id: EntityId,
    pub file_name: String,
    pub label: &'static str,
    /// `dd/mm/yyyy`.
    pub expires_on: String,
    pub status: ExpiryStatus,
}

/// Everything the report shows for one property.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyReport {
    pub property_id: EntityId,
    pub name: String,
    pub type_label: &'static str,
    pub access: AccessSummary,
    pub document_count: usize,
    pub coverage: SuggestionCoverage,
    pub missing: Vec<MissingDocument>,
    pub expiring: Vec<ExpiringDocument>,
    pub needs_review: usize,
    pub guests: u64,
    pub unread_alerts: usize,
}

/// Full report for a session over the properties it can see.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub session: SessionSummary,
    pub properties: Vec<PropertyReport>,
}

pub fn build_session_summary(session: &Session) -> SessionSummary {
    let (plan, monthly_price) = match &session.plan {
        Some(plan) => {
            let label = plan
                .plan_code()
                .map(|code| code.label().to_string())
                .unwrap_or_else(|| plan.name.clone());
            let price = match (plan.monthly_price, plan.currency.as_deref()) {
                (Some(amount), Some(currency)) => format_money(amount, currency),
                _ => DASH.to_string(),
            };
            (label, price)
        }
        None => (DASH.to_string(), DASH.to_string()),
    };
    SessionSummary {
        user_name: session.user.name.clone(),
        initials: initials_from_name(&session.user.name),
        plan,
        monthly_price,
    }
}

/// Build the report for one property as seen by `session` at `now`.
pub fn build_property_report(session: &Session, property: &Property, now: Timestamp) -> PropertyReport {
    let missing = missing_suggestions(property.property_type, &property.documents)
        .into_iter()
        .map(|kind| MissingDocument {
            key: kind.as_str(),
            label: kind.label(),
        })
        .collect();

    let expiring = expiring_documents(property, now)
        .into_iter()
        .map(|(doc, status)| ExpiringDocument {
            document_id: doc.id,
            file_name: doc.file_name.clone(),
            label: doc.type_label(),
            expires_on: format_timestamp_or_dash(doc.expiration_date),
            status,
        })
        .collect();

    PropertyReport {
        property_id: property.id,
        name: property.name.clone(),
        type_label: label_for_property_type(property.property_type),
        access: access_summary(Some(session), Some(property), now),
        document_count: property.documents.len(),
        coverage: suggestion_coverage(property.property_type, &property.documents),
        missing,
        expiring,
        needs_review: property.documents.iter().filter(|d| needs_review(d)).count(),
        guests: guest_count(property, now),
        unread_alerts: property.unread_alert_count(),
    }
}

/// Report over every property the session may read; others are skipped.
pub fn build_report(session: &Session, properties: &[Property], now: Timestamp) -> Report {
    let properties = properties
        .iter()
        .map(|property| build_property_report(session, property, now))
        .filter(|report| report.access.can_read)
        .collect();
    Report {
        session: build_session_summary(session),
        properties,
    }
}
