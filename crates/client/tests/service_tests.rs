//! Tests for the rule-guarded service functions.
//!
//! Every test runs against the in-memory `FakeBackend`, which records the
//! calls it receives, so denials can be shown to happen before any request.

mod common;

use std::collections::BTreeMap;

use assert_matches::assert_matches;
use chrono::Duration;
use uuid::Uuid;

use common::*;
use propdocs_client::error::ClientError;
use propdocs_client::service::{
    create_property, delete_document, load_session, revoke_permission, save_ai_fields,
    share_property, upload_document, EDIT_REQUIRED, NO_ACTIVE_PLAN,
};
use propdocs_core::ai_fields::AiFieldEdits;
use propdocs_core::error::CoreError;
use propdocs_core::models::{CreatePropertyInput, ShareInput};
use propdocs_core::plan_gate::BUILDING_REQUIRES_PORTFOLIO;
use propdocs_core::plans::{Limit, PlanLimits};
use propdocs_core::taxonomy::{DocumentType, PermissionLevel, PropertyType};
use propdocs_core::upload::UploadRequest;

fn create_input(property_type: PropertyType, parent: Option<Uuid>) -> CreatePropertyInput {
    CreatePropertyInput {
        name: "Rua Augusta 10".to_string(),
        property_type,
        parent_property_id: parent,
        address: None,
    }
}

fn upload_request(size: usize) -> UploadRequest {
    UploadRequest {
        file_name: "caderneta.pdf".to_string(),
        content_type: "application/pdf".to_string(),
        size_bytes: size as u64,
        document_type: DocumentType::PropertyTaxRecord,
        expiration_date: None,
        encrypt: false,
    }
}

// ---------------------------------------------------------------------------
// Test: load_session combines user and subscription
// ---------------------------------------------------------------------------

#[tokio::test]
async fn load_session_combines_user_and_plan() {
    let owner = user("Ana");
    let backend = FakeBackend::new(&owner, Some(plan("pro", roomy_limits())));

    let session = load_session(&backend, "tok").await.unwrap();

    assert_eq!(session.user, owner);
    assert_eq!(session.token, "tok");
    assert_eq!(session.plan_code_str(), Some("pro"));
}

// ---------------------------------------------------------------------------
// Test: subscription failure leaves the session without a plan
// ---------------------------------------------------------------------------

#[tokio::test]
async fn load_session_tolerates_subscription_failure() {
    let owner = user("Ana");
    let backend = FakeBackend::new(&owner, Some(plan("pro", roomy_limits())));
    backend.state().fail_subscription = true;

    let session = load_session(&backend, "tok").await.unwrap();

    assert!(session.plan.is_none());
}

// ---------------------------------------------------------------------------
// Test: an unauthenticated token fails the whole session
// ---------------------------------------------------------------------------

#[tokio::test]
async fn load_session_propagates_unauthorized() {
    let backend = FakeBackend::default();

    let err = load_session(&backend, "expired").await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(backend.calls(), vec!["current_user"]);
}

// ---------------------------------------------------------------------------
// Test: buildings are refused below Portfolio without a request
// ---------------------------------------------------------------------------

#[tokio::test]
async fn building_requires_portfolio_plan() {
    let owner = user("Ana");
    let session = session(&owner, Some(plan("pro", roomy_limits())));
    let backend = FakeBackend::new(&owner, None);

    let result = create_property(
        &backend,
        &session,
        &create_input(PropertyType::Building, None),
        &[],
        now(),
    )
    .await;

    assert_matches!(result, Err(ClientError::Denied(reason)) if reason == BUILDING_REQUIRES_PORTFOLIO);
    assert!(backend.calls().is_empty());
}

// ---------------------------------------------------------------------------
// Test: Portfolio may create a building
// ---------------------------------------------------------------------------

#[tokio::test]
async fn portfolio_creates_building() {
    let owner = user("Ana");
    let session = session(&owner, Some(plan("portfolio", roomy_limits())));
    let backend = FakeBackend::new(&owner, None);

    let created = create_property(
        &backend,
        &session,
        &create_input(PropertyType::Building, None),
        &[],
        now(),
    )
    .await
    .unwrap();

    assert_eq!(created.property_type, PropertyType::Building);
    assert_eq!(created.owner_id, owner.id);
    assert_eq!(backend.calls(), vec!["create_property"]);
}

// ---------------------------------------------------------------------------
// Test: hierarchy rules are checked before plan gates
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unit_needs_known_building_parent() {
    let owner = user("Ana");
    let session = session(&owner, Some(plan("portfolio", roomy_limits())));
    let backend = FakeBackend::new(&owner, None);
    let house = property(&owner, PropertyType::House);

    let orphan = create_property(
        &backend,
        &session,
        &create_input(PropertyType::Unit, None),
        &[],
        now(),
    )
    .await;
    assert_matches!(orphan, Err(ClientError::Core(CoreError::Validation(_))));

    let under_house = create_property(
        &backend,
        &session,
        &create_input(PropertyType::Unit, Some(house.id)),
        std::slice::from_ref(&house),
        now(),
    )
    .await;
    assert_matches!(under_house, Err(ClientError::Core(CoreError::Validation(msg))) if msg.contains("building"));

    let unknown = create_property(
        &backend,
        &session,
        &create_input(PropertyType::Unit, Some(Uuid::new_v4())),
        &[],
        now(),
    )
    .await;
    assert_matches!(unknown, Err(ClientError::Core(CoreError::NotFound { entity: "Property", .. })));

    assert!(backend.calls().is_empty());
}

// ---------------------------------------------------------------------------
// Test: units per building are capped by the plan
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unit_quota_per_building() {
    let owner = user("Ana");
    let limits = PlanLimits {
        max_units_per_building: Limit::Bounded(2),
        ..roomy_limits()
    };
    let session = session(&owner, Some(plan("enterprise", limits)));
    let backend = FakeBackend::new(&owner, None);
    let building = property(&owner, PropertyType::Building);
    let other_building = property(&owner, PropertyType::Building);
    let existing = vec![
        building.clone(),
        other_building.clone(),
        unit_of(&owner, &building),
        unit_of(&owner, &building),
        unit_of(&owner, &other_building),
    ];

    let full = create_property(
        &backend,
        &session,
        &create_input(PropertyType::Unit, Some(building.id)),
        &existing,
        now(),
    )
    .await;
    assert_matches!(full, Err(ClientError::Denied(reason)) if reason == "Units per building limit reached (2 of 2)");

    let room = create_property(
        &backend,
        &session,
        &create_input(PropertyType::Unit, Some(other_building.id)),
        &existing,
        now(),
    )
    .await
    .unwrap();
    assert_eq!(room.parent_property_id, Some(other_building.id));
}

// ---------------------------------------------------------------------------
// Test: a read-only guest cannot add units to someone else's building
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unit_requires_edit_on_parent() {
    let owner = user("Ana");
    let guest = user("Rui");
    let mut building = property(&owner, PropertyType::Building);
    grant(&mut building, &guest, PermissionLevel::Read, None);
    let session = session(&guest, Some(plan("portfolio", roomy_limits())));
    let backend = FakeBackend::new(&guest, None);

    let result = create_property(
        &backend,
        &session,
        &create_input(PropertyType::Unit, Some(building.id)),
        &[building],
        now(),
    )
    .await;

    assert_matches!(result, Err(ClientError::Denied(reason)) if reason == EDIT_REQUIRED);
}

// ---------------------------------------------------------------------------
// Test: property quota counts only the user's own top-level properties
// ---------------------------------------------------------------------------

#[tokio::test]
async fn property_quota_counts_owned_top_level() {
    let owner = user("Ana");
    let stranger = user("Zé");
    let limits = PlanLimits {
        max_properties: Limit::Bounded(1),
        ..roomy_limits()
    };
    let session = session(&owner, Some(plan("starter", limits)));
    let backend = FakeBackend::new(&owner, None);

    let shared_with_me = vec![property(&stranger, PropertyType::House)];
    create_property(
        &backend,
        &session,
        &create_input(PropertyType::Apartment, None),
        &shared_with_me,
        now(),
    )
    .await
    .unwrap();

    let mine = vec![property(&owner, PropertyType::House)];
    let result = create_property(
        &backend,
        &session,
        &create_input(PropertyType::Apartment, None),
        &mine,
        now(),
    )
    .await;
    assert_matches!(result, Err(ClientError::Denied(reason)) if reason == "Property limit reached (1 of 1)");
}

// ---------------------------------------------------------------------------
// Test: no plan loaded denies creation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_without_plan_is_denied() {
    let owner = user("Ana");
    let session = session(&owner, None);
    let backend = FakeBackend::new(&owner, None);

    let result = create_property(
        &backend,
        &session,
        &create_input(PropertyType::House, None),
        &[],
        now(),
    )
    .await;

    assert_matches!(result, Err(ClientError::Denied(reason)) if reason == NO_ACTIVE_PLAN);
}

// ---------------------------------------------------------------------------
// Test: upload runs the three phases and requests AI extraction
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_runs_two_phase_flow() {
    let owner = user("Ana");
    let pro = plan("pro", roomy_limits());
    let session = session(&owner, Some(pro.clone()));
    let backend = FakeBackend::new(&owner, None);
    let house = property(&owner, PropertyType::House);
    let bytes = vec![7u8; 2048];

    let document = upload_document(
        &backend,
        &session,
        &[pro],
        &house,
        &upload_request(bytes.len()),
        bytes,
        now(),
    )
    .await
    .unwrap();

    assert_eq!(document.property_id, house.id);
    assert_eq!(document.document_type, Some(DocumentType::PropertyTaxRecord));
    assert_eq!(
        backend.calls(),
        vec!["request_upload_url", "upload_bytes", "confirm_upload"]
    );
    let state = backend.state();
    assert_eq!(state.uploaded[0].1, "application/pdf");
    assert_eq!(state.uploaded[0].2, 2048);
    assert!(state.confirmed[0].run_ai_extraction);
}

// ---------------------------------------------------------------------------
// Test: oversized and encrypted uploads are refused by plan
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_gates_size_and_encryption() {
    let owner = user("Ana");
    let limits = PlanLimits {
        max_upload_mb: Limit::Bounded(1),
        ..roomy_limits()
    };
    let pro = plan("pro", limits);
    let session = session(&owner, Some(pro.clone()));
    let backend = FakeBackend::new(&owner, None);
    let house = property(&owner, PropertyType::House);

    let big = vec![0u8; 1024 * 1024 + 1];
    let too_big = upload_document(
        &backend,
        &session,
        std::slice::from_ref(&pro),
        &house,
        &upload_request(big.len()),
        big,
        now(),
    )
    .await;
    assert_matches!(too_big, Err(ClientError::Denied(reason)) if reason.contains("1,0 MB"));

    let mut encrypted = upload_request(10);
    encrypted.encrypt = true;
    let refused = upload_document(
        &backend,
        &session,
        &[pro],
        &house,
        &encrypted,
        vec![1u8; 10],
        now(),
    )
    .await;
    assert_matches!(refused, Err(ClientError::Denied(reason)) if reason.contains("encrypted"));

    assert!(backend.calls().is_empty());
}

// ---------------------------------------------------------------------------
// Test: declared size must match the bytes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_rejects_size_mismatch() {
    let owner = user("Ana");
    let session = session(&owner, Some(plan("pro", roomy_limits())));
    let backend = FakeBackend::new(&owner, None);
    let house = property(&owner, PropertyType::House);

    let result = upload_document(
        &backend,
        &session,
        &[],
        &house,
        &upload_request(100),
        vec![0u8; 99],
        now(),
    )
    .await;

    assert_matches!(result, Err(ClientError::Core(CoreError::Validation(_))));
}

// ---------------------------------------------------------------------------
// Test: read-only and expired admin guests cannot upload
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_requires_active_edit_grant() {
    let owner = user("Ana");
    let guest = user("Rui");
    let mut house = property(&owner, PropertyType::House);
    grant(&mut house, &guest, PermissionLevel::Read, None);
    grant(
        &mut house,
        &guest,
        PermissionLevel::Admin,
        Some(now() - Duration::days(1)),
    );
    let session = session(&guest, Some(plan("pro", roomy_limits())));
    let backend = FakeBackend::new(&guest, None);

    let result = upload_document(
        &backend,
        &session,
        &[],
        &house,
        &upload_request(4),
        vec![0u8; 4],
        now(),
    )
    .await;

    assert_matches!(result, Err(ClientError::Denied(reason)) if reason == EDIT_REQUIRED);
}

// ---------------------------------------------------------------------------
// Test: sharing validates expiry against the permission level
// ---------------------------------------------------------------------------

#[tokio::test]
async fn share_validates_expiry() {
    let owner = user("Ana");
    let session = session(&owner, Some(plan("pro", roomy_limits())));
    let backend = FakeBackend::new(&owner, None);
    let house = property(&owner, PropertyType::House);

    let temporary = ShareInput {
        email: "rui@example.pt".to_string(),
        property_level: PermissionLevel::Temporary,
        expires_at: None,
    };
    let result = share_property(&backend, &session, &house, &temporary, now()).await;
    assert_matches!(result, Err(ClientError::Core(CoreError::Validation(msg))) if msg.contains("expiry"));

    let past = ShareInput {
        expires_at: Some(now() - Duration::hours(1)),
        ..temporary.clone()
    };
    let result = share_property(&backend, &session, &house, &past, now()).await;
    assert_matches!(result, Err(ClientError::Core(CoreError::Validation(_))));

    let future = ShareInput {
        expires_at: Some(now() + Duration::days(7)),
        ..temporary
    };
    let permission = share_property(&backend, &session, &house, &future, now())
        .await
        .unwrap();
    assert_eq!(permission.property_level, PermissionLevel::Temporary);
    assert_eq!(backend.calls(), vec!["share_property"]);
}

// ---------------------------------------------------------------------------
// Test: guest limit blocks sharing with the quota reason
// ---------------------------------------------------------------------------

#[tokio::test]
async fn share_respects_guest_limit() {
    let owner = user("Ana");
    let limits = PlanLimits {
        max_guests: Limit::Bounded(1),
        ..roomy_limits()
    };
    let session = session(&owner, Some(plan("starter", limits)));
    let backend = FakeBackend::new(&owner, None);
    let mut house = property(&owner, PropertyType::House);
    grant(&mut house, &user("Rui"), PermissionLevel::Read, None);

    let input = ShareInput {
        email: "marta@example.pt".to_string(),
        property_level: PermissionLevel::Read,
        expires_at: None,
    };
    let result = share_property(&backend, &session, &house, &input, now()).await;

    assert_matches!(result, Err(ClientError::Denied(reason)) if reason == "Guest limit reached (1 of 1)");
    assert!(backend.calls().is_empty());
}

// ---------------------------------------------------------------------------
// Test: an admin guest may revoke, a read guest may not
// ---------------------------------------------------------------------------

#[tokio::test]
async fn revoke_requires_edit() {
    let owner = user("Ana");
    let admin = user("Rui");
    let reader = user("Marta");
    let mut house = property(&owner, PropertyType::House);
    grant(&mut house, &admin, PermissionLevel::Admin, None);
    let reader_grant = grant(&mut house, &reader, PermissionLevel::Read, None);
    let backend = FakeBackend::new(&admin, None);

    let denied = revoke_permission(&backend, &session(&reader, None), &house, reader_grant, now()).await;
    assert_matches!(denied, Err(ClientError::Denied(_)));

    revoke_permission(&backend, &session(&admin, None), &house, reader_grant, now())
        .await
        .unwrap();
    assert_eq!(backend.calls(), vec!["revoke_permission"]);
}

// ---------------------------------------------------------------------------
// Test: deleting an unknown document fails locally
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_document_checks_membership() {
    let owner = user("Ana");
    let session = session(&owner, None);
    let backend = FakeBackend::new(&owner, None);
    let mut house = property(&owner, PropertyType::House);
    let doc = document(house.id, None);
    house.documents.push(doc.clone());

    let missing = delete_document(&backend, &session, &house, Uuid::new_v4(), now()).await;
    assert_matches!(missing, Err(ClientError::Core(CoreError::NotFound { entity: "Document", .. })));

    delete_document(&backend, &session, &house, doc.id, now())
        .await
        .unwrap();
    assert_eq!(backend.calls(), vec!["delete_document"]);
}

// ---------------------------------------------------------------------------
// Test: saving AI fields sends only changes and resets the buffer
// ---------------------------------------------------------------------------

#[tokio::test]
async fn save_ai_fields_sends_changes_only() {
    let owner = user("Ana");
    let session = session(&owner, None);
    let backend = FakeBackend::new(&owner, None);
    let mut house = property(&owner, PropertyType::House);
    let fields = BTreeMap::from([
        ("artigo".to_string(), "U-1234".to_string()),
        ("freguesia".to_string(), "Arroios".to_string()),
    ]);
    let doc = document(house.id, Some(fields));
    house.documents.push(doc.clone());
    backend.state().documents.push(doc.clone());

    let mut edits = AiFieldEdits::from_document(&doc);
    let untouched = save_ai_fields(&backend, &session, &house, doc.id, &mut edits, now())
        .await
        .unwrap();
    assert!(untouched.is_none());
    assert!(backend.calls().is_empty());

    edits.set("freguesia", "Lumiar");
    let saved = save_ai_fields(&backend, &session, &house, doc.id, &mut edits, now())
        .await
        .unwrap()
        .unwrap();

    let sent = backend.state().saved_fields[0].clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent["freguesia"], "Lumiar");
    assert_eq!(saved.ai_fields.unwrap()["artigo"], "U-1234");
    assert!(!edits.is_dirty());
    assert_eq!(edits.get("freguesia"), Some("Lumiar"));
}

// ---------------------------------------------------------------------------
// Test: AI fields of a document on another property are refused locally
// ---------------------------------------------------------------------------

#[tokio::test]
async fn save_ai_fields_rejects_foreign_document() {
    let owner = user("Ana");
    let session = session(&owner, None);
    let backend = FakeBackend::new(&owner, None);
    let house = property(&owner, PropertyType::House);
    let other = property(&user("Zé"), PropertyType::House);
    let fields = BTreeMap::from([("artigo".to_string(), "U-1".to_string())]);
    let foreign = document(other.id, Some(fields));
    backend.state().documents.push(foreign.clone());

    let mut edits = AiFieldEdits::from_document(&foreign);
    edits.set("artigo", "U-2");
    let result = save_ai_fields(&backend, &session, &house, foreign.id, &mut edits, now()).await;

    assert_matches!(result, Err(ClientError::Core(CoreError::NotFound { entity: "Document", .. })));
    assert!(backend.calls().is_empty());
    assert!(edits.is_dirty());
}
