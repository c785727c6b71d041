//! Shared fixtures and an in-memory `PropertyBackend` for client tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use propdocs_client::backend::PropertyBackend;
use propdocs_client::error::{ClientError, ClientResult};
use propdocs_core::models::{
    Alert, CreatePropertyInput, Document, Property, PropertyPermission, ShareInput, User,
};
use propdocs_core::plans::{Limit, PlanLimits, SubscriptionPlanDto};
use propdocs_core::session::Session;
use propdocs_core::taxonomy::{PermissionLevel, PropertyType};
use propdocs_core::types::{EntityId, Timestamp};
use propdocs_core::upload::{ConfirmUpload, UploadRequest, UploadTicket};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Fixed clock so expiry comparisons are deterministic.
pub fn now() -> Timestamp {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

pub fn user(name: &str) -> User {
    User {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: format!("{}@example.pt", name.to_lowercase()),
    }
}

pub fn plan(code: &str, limits: PlanLimits) -> SubscriptionPlanDto {
    SubscriptionPlanDto {
        code: code.to_string(),
        name: code.to_string(),
        monthly_price: Some(9.99),
        currency: Some("EUR".to_string()),
        limits,
    }
}

/// Limits generous enough that only the dimension under test blocks.
pub fn roomy_limits() -> PlanLimits {
    PlanLimits {
        max_properties: Limit::Bounded(10),
        max_documents: Limit::Bounded(100),
        max_guests: Limit::Bounded(5),
        max_buildings: Limit::Bounded(3),
        max_units_per_building: Limit::Bounded(20),
        max_upload_mb: Limit::Bounded(10),
        ai_on_upload: true,
        encryption_eligible: true,
    }
}

pub fn session(user: &User, plan: Option<SubscriptionPlanDto>) -> Session {
    Session::new(user.clone(), "test-token", plan)
}

pub fn property(owner: &User, property_type: PropertyType) -> Property {
    Property {
        id: Uuid::new_v4(),
        owner_id: owner.id,
        name: format!("{} of {}", property_type.as_str(), owner.name),
        property_type,
        parent_property_id: None,
        documents: Vec::new(),
        permissions: Vec::new(),
        alerts: Vec::new(),
    }
}

pub fn unit_of(owner: &User, building: &Property) -> Property {
    Property {
        parent_property_id: Some(building.id),
        ..property(owner, PropertyType::Unit)
    }
}

pub fn grant(
    property: &mut Property,
    user: &User,
    level: PermissionLevel,
    expires_at: Option<Timestamp>,
) -> EntityId {
    let id = Uuid::new_v4();
    property.permissions.push(PropertyPermission {
        id,
        property_id: property.id,
        user_id: user.id,
        property_level: level,
        expires_at,
    });
    id
}

pub fn document(property_id: EntityId, ai_fields: Option<BTreeMap<String, String>>) -> Document {
    Document {
        id: Uuid::new_v4(),
        property_id,
        document_type: None,
        file_name: "contrato.pdf".to_string(),
        expiration_date: None,
        ai_fields,
        ai_confidence: Some(0.6),
        created_at: None,
    }
}

// ---------------------------------------------------------------------------
// Fake backend
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct FakeState {
    pub user: Option<User>,
    pub subscription: Option<SubscriptionPlanDto>,
    pub fail_subscription: bool,
    pub plans: Vec<SubscriptionPlanDto>,
    pub properties: Vec<Property>,
    pub documents: Vec<Document>,
    pub pending_uploads: HashMap<String, UploadRequest>,
    pub uploaded: Vec<(String, String, usize)>,
    pub confirmed: Vec<ConfirmUpload>,
    pub saved_fields: Vec<BTreeMap<String, String>>,
    pub calls: Vec<&'static str>,
}

/// In-memory backend recording the calls made against it.
#[derive(Debug, Default)]
pub struct FakeBackend {
    state: Mutex<FakeState>,
}

impl FakeBackend {
    pub fn new(user: &User, subscription: Option<SubscriptionPlanDto>) -> Self {
        let backend = Self::default();
        {
            let mut state = backend.state();
            state.user = Some(user.clone());
            state.subscription = subscription;
        }
        backend
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state().calls.clone()
    }

    fn record(&self, call: &'static str) -> MutexGuard<'_, FakeState> {
        let mut state = self.state();
        state.calls.push(call);
        state
    }
}

fn not_found(what: &str) -> ClientError {
    ClientError::Api {
        status: 404,
        body: format!("{what} not found"),
    }
}

impl PropertyBackend for FakeBackend {
    async fn current_user(&self) -> ClientResult<User> {
        self.record("current_user").user.clone().ok_or(ClientError::Api {
            status: 401,
            body: "unauthorized".to_string(),
        })
    }

    async fn current_subscription(&self) -> ClientResult<Option<SubscriptionPlanDto>> {
        let state = self.record("current_subscription");
        if state.fail_subscription {
            return Err(ClientError::Api {
                status: 500,
                body: "billing unavailable".to_string(),
            });
        }
        Ok(state.subscription.clone())
    }

    async fn list_plans(&self) -> ClientResult<Vec<SubscriptionPlanDto>> {
        Ok(self.record("list_plans").plans.clone())
    }

    async fn list_properties(&self) -> ClientResult<Vec<Property>> {
        Ok(self.record("list_properties").properties.clone())
    }

    async fn get_property(&self, id: EntityId) -> ClientResult<Property> {
        self.record("get_property")
            .properties
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| not_found("property"))
    }

    async fn create_property(&self, input: &CreatePropertyInput) -> ClientResult<Property> {
        let mut state = self.record("create_property");
        let owner_id = state.user.as_ref().map(|u| u.id).unwrap_or_default();
        let created = Property {
            id: Uuid::new_v4(),
            owner_id,
            name: input.name.clone(),
            property_type: input.property_type,
            parent_property_id: input.parent_property_id,
            documents: Vec::new(),
            permissions: Vec::new(),
            alerts: Vec::new(),
        };
        state.properties.push(created.clone());
        Ok(created)
    }

    async fn request_upload_url(
        &self,
        _property_id: EntityId,
        request: &UploadRequest,
    ) -> ClientResult<UploadTicket> {
        let mut state = self.record("request_upload_url");
        let upload_id = Uuid::new_v4().to_string();
        state
            .pending_uploads
            .insert(upload_id.clone(), request.clone());
        Ok(UploadTicket {
            upload_url: format!("https://storage.test/{upload_id}"),
            upload_id,
            expires_at: None,
        })
    }

    async fn upload_bytes(
        &self,
        ticket: &UploadTicket,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<()> {
        self.record("upload_bytes").uploaded.push((
            ticket.upload_id.clone(),
            content_type.to_string(),
            bytes.len(),
        ));
        Ok(())
    }

    async fn confirm_upload(&self, confirm: &ConfirmUpload) -> ClientResult<Document> {
        let mut state = self.record("confirm_upload");
        let request = state
            .pending_uploads
            .remove(&confirm.upload_id)
            .ok_or_else(|| not_found("upload"))?;
        let document = Document {
            id: Uuid::new_v4(),
            property_id: confirm.property_id,
            document_type: Some(request.document_type),
            file_name: request.file_name,
            expiration_date: request.expiration_date,
            ai_fields: None,
            ai_confidence: None,
            created_at: None,
        };
        state.confirmed.push(confirm.clone());
        state.documents.push(document.clone());
        Ok(document)
    }

    async fn update_document_fields(
        &self,
        document_id: EntityId,
        fields: &BTreeMap<String, String>,
    ) -> ClientResult<Document> {
        let mut state = self.record("update_document_fields");
        state.saved_fields.push(fields.clone());
        let document = state
            .documents
            .iter_mut()
            .find(|d| d.id == document_id)
            .ok_or_else(|| not_found("document"))?;
        let merged = document.ai_fields.get_or_insert_with(BTreeMap::new);
        merged.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(document.clone())
    }

    async fn delete_document(&self, document_id: EntityId) -> ClientResult<()> {
        let mut state = self.record("delete_document");
        state.documents.retain(|d| d.id != document_id);
        Ok(())
    }

    async fn share_property(
        &self,
        property_id: EntityId,
        input: &ShareInput,
    ) -> ClientResult<PropertyPermission> {
        drop(self.record("share_property"));
        Ok(PropertyPermission {
            id: Uuid::new_v4(),
            property_id,
            user_id: Uuid::new_v4(),
            property_level: input.property_level,
            expires_at: input.expires_at,
        })
    }

    async fn revoke_permission(
        &self,
        _property_id: EntityId,
        _permission_id: EntityId,
    ) -> ClientResult<()> {
        drop(self.record("revoke_permission"));
        Ok(())
    }

    async fn list_alerts(&self) -> ClientResult<Vec<Alert>> {
        drop(self.record("list_alerts"));
        Ok(Vec::new())
    }
}
