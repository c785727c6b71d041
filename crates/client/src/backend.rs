//! The backend operations the services depend on.

use std::collections::BTreeMap;
use std::future::Future;

use propdocs_core::models::{
    Alert, CreatePropertyInput, Document, Property, PropertyPermission, ShareInput, User,
};
use propdocs_core::plans::SubscriptionPlanDto;
use propdocs_core::types::EntityId;
use propdocs_core::upload::{ConfirmUpload, UploadRequest, UploadTicket};

use crate::error::ClientResult;

/// Trait implemented by the HTTP client and by in-memory fakes in tests.
///
/// Every call is authenticated as the session user.
pub trait PropertyBackend: Send + Sync {
    fn current_user(&self) -> impl Future<Output = ClientResult<User>> + Send;

    /// The user's active plan, or `None` when they have no subscription.
    fn current_subscription(
        &self,
    ) -> impl Future<Output = ClientResult<Option<SubscriptionPlanDto>>> + Send;

    fn list_plans(&self) -> impl Future<Output = ClientResult<Vec<SubscriptionPlanDto>>> + Send;

    fn list_properties(&self) -> impl Future<Output = ClientResult<Vec<Property>>> + Send;

    fn get_property(&self, id: EntityId) -> impl Future<Output = ClientResult<Property>> + Send;

    fn create_property(
        &self,
        input: &CreatePropertyInput,
    ) -> impl Future<Output = ClientResult<Property>> + Send;

    /// Phase one of an upload: obtain a signed URL.
    fn request_upload_url(
        &self,
        property_id: EntityId,
        request: &UploadRequest,
    ) -> impl Future<Output = ClientResult<UploadTicket>> + Send;

    /// Phase two: send the file bytes to the signed URL.
    fn upload_bytes(
        &self,
        ticket: &UploadTicket,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> impl Future<Output = ClientResult<()>> + Send;

    /// Phase three: confirm so the backend creates the document record.
    fn confirm_upload(
        &self,
        confirm: &ConfirmUpload,
    ) -> impl Future<Output = ClientResult<Document>> + Send;

    /// Save edited AI fields. Only changed keys are sent.
    fn update_document_fields(
        &self,
        document_id: EntityId,
        fields: &BTreeMap<String, String>,
    ) -> impl Future<Output = ClientResult<Document>> + Send;

    fn delete_document(&self, document_id: EntityId)
        -> impl Future<Output = ClientResult<()>> + Send;

    fn share_property(
        &self,
        property_id: EntityId,
        input: &ShareInput,
    ) -> impl Future<Output = ClientResult<PropertyPermission>> + Send;

    fn revoke_permission(
        &self,
        property_id: EntityId,
        permission_id: EntityId,
    ) -> impl Future<Output = ClientResult<()>> + Send;

    fn list_alerts(&self) -> impl Future<Output = ClientResult<Vec<Alert>>> + Send;
}
