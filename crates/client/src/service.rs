//! Backend calls guarded by the domain rules.
//!
//! Each function checks permissions, hierarchy and plan gates locally and
//! returns [`ClientError::Denied`] before any request when a rule refuses.

use propdocs_core::ai_fields::AiFieldEdits;
use propdocs_core::error::CoreError;
use propdocs_core::hierarchy::validate_parent;
use propdocs_core::models::{
    CreatePropertyInput, Document, Property, PropertyPermission, ShareInput,
};
use propdocs_core::permissions::{can_edit, can_share, guest_count};
use propdocs_core::plan_gate::{
    ai_on_upload, building_creation_gate, building_quota_gate, can_encrypt, document_quota_gate,
    guest_quota_gate, property_quota_gate, unit_quota_gate, upload_gate, GateDecision,
};
use propdocs_core::plans::{PlanLimits, SubscriptionPlanDto};
use propdocs_core::session::Session;
use propdocs_core::taxonomy::{PermissionLevel, PropertyType};
use propdocs_core::types::{EntityId, Timestamp};
use propdocs_core::upload::{ConfirmUpload, UploadRequest};

use crate::backend::PropertyBackend;
use crate::error::{ClientError, ClientResult};

/// Reason returned when the session has no subscription loaded.
pub const NO_ACTIVE_PLAN: &str = "no active subscription plan";

/// Reason returned when the user lacks edit rights on a property.
pub const EDIT_REQUIRED: &str = "edit access to this property is required";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn enforce(decision: GateDecision) -> ClientResult<()> {
    match decision {
        GateDecision::Allowed => Ok(()),
        GateDecision::Denied { reason } => Err(ClientError::Denied(reason)),
    }
}

fn require_edit(session: &Session, property: &Property, now: Timestamp) -> ClientResult<()> {
    if can_edit(Some(session), Some(property), now) {
        Ok(())
    } else {
        tracing::debug!(property_id = %property.id, user_id = %session.user.id, "Edit denied");
        Err(ClientError::Denied(EDIT_REQUIRED.to_string()))
    }
}

fn require_document(property: &Property, document_id: EntityId) -> ClientResult<()> {
    if property.documents.iter().any(|d| d.id == document_id) {
        Ok(())
    } else {
        Err(CoreError::NotFound {
            entity: "Document",
            id: document_id.to_string(),
        }
        .into())
    }
}

fn require_plan(session: &Session) -> ClientResult<(&str, &PlanLimits)> {
    match (&session.plan, session.limits()) {
        (Some(plan), Some(limits)) => Ok((plan.code.as_str(), limits)),
        _ => Err(ClientError::Denied(NO_ACTIVE_PLAN.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Resolve the current user and their plan into a [`Session`].
///
/// A failure loading the subscription is logged and leaves the plan empty,
/// so plan-gated actions are denied rather than the whole session failing.
pub async fn load_session<B: PropertyBackend>(
    backend: &B,
    token: impl Into<String>,
) -> ClientResult<Session> {
    let user = backend.current_user().await?;
    let plan = match backend.current_subscription().await {
        Ok(plan) => plan,
        Err(e) => {
            tracing::warn!(user_id = %user.id, error = %e, "Failed to load subscription");
            None
        }
    };
    tracing::info!(
        user_id = %user.id,
        plan = plan.as_ref().map(|p| p.code.as_str()).unwrap_or("none"),
        "Session loaded"
    );
    Ok(Session::new(user, token, plan))
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

/// Create a property after checking hierarchy, plan tier and quotas.
///
/// `existing` is the user's current property list, used to resolve the
/// parent and to count towards quotas.
pub async fn create_property<B: PropertyBackend>(
    backend: &B,
    session: &Session,
    input: &CreatePropertyInput,
    existing: &[Property],
    now: Timestamp,
) -> ClientResult<Property> {
    if input.name.trim().is_empty() {
        return Err(CoreError::Validation("Property name must not be empty".into()).into());
    }

    let parent = match input.parent_property_id {
        Some(parent_id) => Some(
            existing
                .iter()
                .find(|p| p.id == parent_id)
                .ok_or_else(|| CoreError::NotFound {
                    entity: "Property",
                    id: parent_id.to_string(),
                })?,
        ),
        None => None,
    };
    validate_parent(input.property_type, parent.map(|p| p.property_type))?;
    if let Some(parent) = parent {
        require_edit(session, parent, now)?;
    }

    let (plan_code, limits) = require_plan(session)?;
    let user_id = session.user.id;
    let owned = || existing.iter().filter(move |p| p.is_owned_by(user_id));

    match (input.property_type, parent) {
        (PropertyType::Unit, Some(parent)) => {
            enforce(building_creation_gate(plan_code))?;
            let units = existing
                .iter()
                .filter(|p| p.parent_property_id == Some(parent.id))
                .count() as u64;
            enforce(unit_quota_gate(limits, units))?;
        }
        (PropertyType::Building, _) => {
            enforce(building_creation_gate(plan_code))?;
            let buildings = owned()
                .filter(|p| p.property_type == PropertyType::Building)
                .count() as u64;
            enforce(building_quota_gate(limits, buildings))?;
            let top_level = owned().filter(|p| p.parent_property_id.is_none()).count() as u64;
            enforce(property_quota_gate(limits, top_level))?;
        }
        _ => {
            let top_level = owned().filter(|p| p.parent_property_id.is_none()).count() as u64;
            enforce(property_quota_gate(limits, top_level))?;
        }
    }

    let created = backend.create_property(input).await?;
    tracing::info!(
        property_id = %created.id,
        property_type = created.property_type.as_str(),
        "Property created"
    );
    Ok(created)
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// Upload a file to `property` through the two-phase flow.
///
/// Validates the request, checks edit rights and the plan's size, document
/// and encryption gates, then requests a signed URL, sends the bytes and
/// confirms. AI extraction is requested when the plan includes it.
pub async fn upload_document<B: PropertyBackend>(
    backend: &B,
    session: &Session,
    plans: &[SubscriptionPlanDto],
    property: &Property,
    request: &UploadRequest,
    bytes: Vec<u8>,
    now: Timestamp,
) -> ClientResult<Document> {
    request.validate()?;
    if request.size_bytes != bytes.len() as u64 {
        return Err(CoreError::Validation(format!(
            "Declared size {} does not match file length {}",
            request.size_bytes,
            bytes.len()
        ))
        .into());
    }
    require_edit(session, property, now)?;

    let (plan_code, limits) = require_plan(session)?;
    enforce(upload_gate(plan_code, plans, request.size_bytes))?;
    if request.encrypt && !can_encrypt(plan_code) {
        return Err(ClientError::Denied(
            "encrypted storage is not available on this plan".to_string(),
        ));
    }
    enforce(document_quota_gate(limits, property.documents.len() as u64))?;

    let ticket = backend.request_upload_url(property.id, request).await?;
    tracing::debug!(property_id = %property.id, upload_id = %ticket.upload_id, "Upload URL issued");

    backend
        .upload_bytes(&ticket, &request.content_type, bytes)
        .await?;

    let confirm = ConfirmUpload {
        upload_id: ticket.upload_id,
        property_id: property.id,
        run_ai_extraction: ai_on_upload(limits),
    };
    let document = backend.confirm_upload(&confirm).await?;
    tracing::info!(
        property_id = %property.id,
        document_id = %document.id,
        file_name = %document.file_name,
        ai_extraction = confirm.run_ai_extraction,
        "Document uploaded"
    );
    Ok(document)
}

/// Save locally edited AI fields. Only changed keys are sent.
///
/// Returns `Ok(None)` without a request when nothing was edited. The document
/// must belong to `property`. On success the buffer adopts the server's saved
/// fields as its new baseline.
pub async fn save_ai_fields<B: PropertyBackend>(
    backend: &B,
    session: &Session,
    property: &Property,
    document_id: EntityId,
    edits: &mut AiFieldEdits,
    now: Timestamp,
) -> ClientResult<Option<Document>> {
    if !edits.is_dirty() {
        return Ok(None);
    }
    require_document(property, document_id)?;
    require_edit(session, property, now)?;

    let saved = backend
        .update_document_fields(document_id, edits.changes())
        .await?;
    let baseline = saved.ai_fields.clone().unwrap_or_else(|| edits.merged());
    edits.commit(baseline);
    tracing::info!(document_id = %document_id, "AI fields saved");
    Ok(Some(saved))
}

pub async fn delete_document<B: PropertyBackend>(
    backend: &B,
    session: &Session,
    property: &Property,
    document_id: EntityId,
    now: Timestamp,
) -> ClientResult<()> {
    require_edit(session, property, now)?;
    require_document(property, document_id)?;
    backend.delete_document(document_id).await?;
    tracing::info!(property_id = %property.id, document_id = %document_id, "Document deleted");
    Ok(())
}

// ---------------------------------------------------------------------------
// Sharing
// ---------------------------------------------------------------------------

/// Grant another user access to `property`.
///
/// Requires edit rights and room under the plan's guest limit. A temporary
/// grant must carry an expiry, and any expiry must lie in the future.
pub async fn share_property<B: PropertyBackend>(
    backend: &B,
    session: &Session,
    property: &Property,
    input: &ShareInput,
    now: Timestamp,
) -> ClientResult<PropertyPermission> {
    if !input.email.contains('@') {
        return Err(CoreError::Validation(format!("'{}' is not an email address", input.email)).into());
    }
    match (input.property_level, input.expires_at) {
        (_, Some(expires_at)) if expires_at <= now => {
            return Err(CoreError::Validation("Expiry must be in the future".into()).into());
        }
        (PermissionLevel::Temporary, None) => {
            return Err(CoreError::Validation("Temporary access requires an expiry".into()).into());
        }
        _ => {}
    }

    require_edit(session, property, now)?;
    if !can_share(Some(session), Some(property), now) {
        let reason = match session.limits() {
            Some(limits) => guest_quota_gate(
                limits,
                guest_count(property, now),
            )
            .reason()
            .unwrap_or(NO_ACTIVE_PLAN)
            .to_string(),
            None => NO_ACTIVE_PLAN.to_string(),
        };
        return Err(ClientError::Denied(reason));
    }

    let permission = backend.share_property(property.id, input).await?;
    tracing::info!(
        property_id = %property.id,
        permission_id = %permission.id,
        level = permission.property_level.as_str(),
        "Property shared"
    );
    Ok(permission)
}

pub async fn revoke_permission<B: PropertyBackend>(
    backend: &B,
    session: &Session,
    property: &Property,
    permission_id: EntityId,
    now: Timestamp,
) -> ClientResult<()> {
    require_edit(session, property, now)?;
    backend.revoke_permission(property.id, permission_id).await?;
    tracing::info!(property_id = %property.id, permission_id = %permission_id, "Access revoked");
    Ok(())
}
