//! # HTTP Backend Adapter
//!
//! `LocBackend` over the REST API of a legal-officer node. JSON bodies,
//! multipart for file content, bearer-token authentication.

use crate::config::HttpBackendConfig;
use crate::domain::{
    AddFileParams, AddLinkParams, AddMetadataParams, CollectionItemAnnouncement, CreateLocRequest,
    FileUpload, ItemRef, LocRequestFilter, ReviewDecision, TokensRecordAnnouncement, VoidRequest,
};
use crate::ports::LocBackend;
use async_trait::async_trait;
use loc_03_aggregator::Source;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared_types::{
    AccountId, CollectionItemRecord, Hash, IssuerRecord, LocError, LocId, LocRequest,
    TokensRecordRecord,
};
use tracing::debug;

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(rename = "errorMessage")]
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct RequestList {
    requests: Vec<LocRequest>,
}

#[derive(Deserialize)]
struct ItemList {
    items: Vec<CollectionItemRecord>,
}

#[derive(Deserialize)]
struct RecordList {
    records: Vec<TokensRecordRecord>,
}

#[derive(Deserialize)]
struct IssuerList {
    issuers: Vec<IssuerRecord>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RejectBody<'a> {
    reject_reason: &'a str,
}

#[derive(Serialize)]
struct CloseBody {
    seal: Option<Hash>,
}

#[derive(Serialize)]
struct IssuerSelectionBody<'a> {
    issuer: &'a AccountId,
    selected: bool,
}

/// Message of a non-2xx response: the `errorMessage` field when the body
/// carries one, the raw body otherwise.
fn error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            error_message: Some(message),
        }) => message,
        _ if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
        _ => body.to_string(),
    }
}

fn transport(error: reqwest::Error) -> LocError {
    LocError::Transport(error.to_string())
}

/// One authenticated session on one node, over HTTP.
pub struct HttpLocBackend {
    node_id: String,
    legal_officer: AccountId,
    config: HttpBackendConfig,
    client: reqwest::Client,
}

impl HttpLocBackend {
    /// Create a session on the node operated by `legal_officer`.
    pub fn new(
        node_id: impl Into<String>,
        legal_officer: AccountId,
        config: HttpBackendConfig,
    ) -> Result<Self, LocError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| LocError::Config(e.to_string()))?;
        Ok(Self {
            node_id: node_id.into(),
            legal_officer,
            config,
            client,
        })
    }

    /// Node configuration.
    pub fn config(&self) -> &HttpBackendConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.config.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("[loc-04] {} {} {}", self.node_id, method, url);
        let builder = self.client.request(method, url);
        match &self.config.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, LocError> {
        let response = builder.send().await.map_err(transport)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(LocError::Backend {
            status: status.as_u16(),
            message: error_message(status, &body),
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, LocError> {
        self.send(builder).await?.json().await.map_err(transport)
    }

    async fn send_empty(&self, builder: RequestBuilder) -> Result<(), LocError> {
        self.send(builder).await.map(|_| ())
    }

    /// `None` on 404.
    async fn send_optional<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<Option<T>, LocError> {
        match self.send_json(builder).await {
            Ok(value) => Ok(Some(value)),
            Err(LocError::Backend { status: 404, .. }) => Ok(None),
            Err(error) => Err(error),
        }
    }

    async fn lifecycle(&self, loc_id: &LocId, action: &str) -> Result<(), LocError> {
        self.send_empty(self.request(Method::POST, &format!("loc-request/{}/{}", loc_id, action)))
            .await
    }

    async fn item_action(
        &self,
        method: Method,
        loc_id: &LocId,
        item: &ItemRef,
        action: &str,
    ) -> Result<(), LocError> {
        let path = format!("loc-request/{}/{}/{}", loc_id, item, action);
        self.send_empty(self.request(method, &path)).await
    }

    fn upload_form(upload: &FileUpload) -> Result<Form, LocError> {
        let part = Part::bytes(upload.content.clone())
            .file_name(upload.name.clone())
            .mime_str(&upload.content_type)
            .map_err(|e| LocError::validation(e.to_string()))?;
        Ok(Form::new()
            .text("hash", upload.hash.to_hex())
            .part("file", part))
    }
}

impl Source for HttpLocBackend {
    fn source_id(&self) -> &str {
        &self.node_id
    }
}

#[async_trait]
impl LocBackend for HttpLocBackend {
    fn legal_officer(&self) -> &AccountId {
        &self.legal_officer
    }

    async fn create_request(&self, request: &CreateLocRequest) -> Result<LocRequest, LocError> {
        self.send_json(self.request(Method::POST, "loc-request").json(request))
            .await
    }

    async fn find_request(&self, loc_id: &LocId) -> Result<Option<LocRequest>, LocError> {
        self.send_optional(self.request(Method::GET, &format!("loc-request/{}", loc_id)))
            .await
    }

    async fn list_requests(&self, filter: &LocRequestFilter) -> Result<Vec<LocRequest>, LocError> {
        let list: RequestList = self
            .send_json(self.request(Method::PUT, "loc-request").json(filter))
            .await?;
        Ok(list.requests)
    }

    async fn submit_request(&self, loc_id: &LocId) -> Result<(), LocError> {
        self.lifecycle(loc_id, "submit").await
    }

    async fn cancel_request(&self, loc_id: &LocId) -> Result<(), LocError> {
        self.lifecycle(loc_id, "cancel").await
    }

    async fn rework_request(&self, loc_id: &LocId) -> Result<(), LocError> {
        self.lifecycle(loc_id, "rework").await
    }

    async fn accept_request(&self, loc_id: &LocId) -> Result<(), LocError> {
        self.lifecycle(loc_id, "accept").await
    }

    async fn reject_request(&self, loc_id: &LocId, reason: &str) -> Result<(), LocError> {
        let path = format!("loc-request/{}/reject", loc_id);
        self.send_empty(
            self.request(Method::POST, &path)
                .json(&RejectBody { reject_reason: reason }),
        )
        .await
    }

    async fn open_request(&self, loc_id: &LocId) -> Result<(), LocError> {
        self.lifecycle(loc_id, "open").await
    }

    async fn close_request(&self, loc_id: &LocId, seal: Option<Hash>) -> Result<(), LocError> {
        let path = format!("loc-request/{}/close", loc_id);
        self.send_empty(self.request(Method::POST, &path).json(&CloseBody { seal }))
            .await
    }

    async fn void_request(&self, loc_id: &LocId, void: &VoidRequest) -> Result<(), LocError> {
        let path = format!("loc-request/{}/void", loc_id);
        self.send_empty(self.request(Method::POST, &path).json(void))
            .await
    }

    async fn add_metadata(
        &self,
        loc_id: &LocId,
        params: &AddMetadataParams,
    ) -> Result<(), LocError> {
        let path = format!("loc-request/{}/metadata", loc_id);
        self.send_empty(self.request(Method::POST, &path).json(params))
            .await
    }

    async fn add_file(&self, loc_id: &LocId, params: &AddFileParams) -> Result<(), LocError> {
        let form = Self::upload_form(&params.upload)?.text("nature", params.nature.clone());
        let path = format!("loc-request/{}/files", loc_id);
        self.send_empty(self.request(Method::POST, &path).multipart(form))
            .await
    }

    async fn add_link(&self, loc_id: &LocId, params: &AddLinkParams) -> Result<(), LocError> {
        let path = format!("loc-request/{}/links", loc_id);
        self.send_empty(self.request(Method::POST, &path).json(params))
            .await
    }

    async fn delete_item(&self, loc_id: &LocId, item: &ItemRef) -> Result<(), LocError> {
        let path = format!("loc-request/{}/{}", loc_id, item);
        self.send_empty(self.request(Method::DELETE, &path)).await
    }

    async fn request_review(&self, loc_id: &LocId, item: &ItemRef) -> Result<(), LocError> {
        self.item_action(Method::POST, loc_id, item, "review-request")
            .await
    }

    async fn review_item(
        &self,
        loc_id: &LocId,
        item: &ItemRef,
        decision: &ReviewDecision,
    ) -> Result<(), LocError> {
        let path = format!("loc-request/{}/{}/review", loc_id, item);
        self.send_empty(self.request(Method::POST, &path).json(decision))
            .await
    }

    async fn confirm_item(&self, loc_id: &LocId, item: &ItemRef) -> Result<(), LocError> {
        self.item_action(Method::PUT, loc_id, item, "confirm").await
    }

    async fn confirm_acknowledged(&self, loc_id: &LocId, item: &ItemRef) -> Result<(), LocError> {
        self.item_action(Method::PUT, loc_id, item, "confirm-acknowledged")
            .await
    }

    async fn create_collection_item(
        &self,
        collection_loc_id: &LocId,
        item: &CollectionItemAnnouncement,
    ) -> Result<(), LocError> {
        let path = format!("collection/{}", collection_loc_id);
        self.send_empty(self.request(Method::POST, &path).json(item))
            .await
    }

    async fn delete_collection_item(
        &self,
        collection_loc_id: &LocId,
        item_id: &Hash,
    ) -> Result<(), LocError> {
        let path = format!("collection/{}/{}", collection_loc_id, item_id);
        self.send_empty(self.request(Method::DELETE, &path)).await
    }

    async fn find_collection_item(
        &self,
        collection_loc_id: &LocId,
        item_id: &Hash,
    ) -> Result<Option<CollectionItemRecord>, LocError> {
        let path = format!("collection/{}/{}", collection_loc_id, item_id);
        self.send_optional(self.request(Method::GET, &path)).await
    }

    async fn list_collection_items(
        &self,
        collection_loc_id: &LocId,
    ) -> Result<Vec<CollectionItemRecord>, LocError> {
        let path = format!("collection/{}", collection_loc_id);
        let list: ItemList = self.send_json(self.request(Method::GET, &path)).await?;
        Ok(list.items)
    }

    async fn upload_collection_item_file(
        &self,
        collection_loc_id: &LocId,
        item_id: &Hash,
        upload: &FileUpload,
    ) -> Result<(), LocError> {
        let path = format!("collection/{}/{}/files", collection_loc_id, item_id);
        let form = Self::upload_form(upload)?;
        self.send_empty(self.request(Method::POST, &path).multipart(form))
            .await
    }

    async fn create_tokens_record(
        &self,
        collection_loc_id: &LocId,
        record: &TokensRecordAnnouncement,
    ) -> Result<(), LocError> {
        let path = format!("records/{}", collection_loc_id);
        self.send_empty(self.request(Method::POST, &path).json(record))
            .await
    }

    async fn delete_tokens_record(
        &self,
        collection_loc_id: &LocId,
        record_id: &Hash,
    ) -> Result<(), LocError> {
        let path = format!("records/{}/{}", collection_loc_id, record_id);
        self.send_empty(self.request(Method::DELETE, &path)).await
    }

    async fn find_tokens_record(
        &self,
        collection_loc_id: &LocId,
        record_id: &Hash,
    ) -> Result<Option<TokensRecordRecord>, LocError> {
        let path = format!("records/{}/{}", collection_loc_id, record_id);
        self.send_optional(self.request(Method::GET, &path)).await
    }

    async fn list_tokens_records(
        &self,
        collection_loc_id: &LocId,
    ) -> Result<Vec<TokensRecordRecord>, LocError> {
        let path = format!("records/{}", collection_loc_id);
        let list: RecordList = self.send_json(self.request(Method::GET, &path)).await?;
        Ok(list.records)
    }

    async fn upload_tokens_record_file(
        &self,
        collection_loc_id: &LocId,
        record_id: &Hash,
        upload: &FileUpload,
    ) -> Result<(), LocError> {
        let path = format!("records/{}/{}/files", collection_loc_id, record_id);
        let form = Self::upload_form(upload)?;
        self.send_empty(self.request(Method::POST, &path).multipart(form))
            .await
    }

    async fn list_issuers(&self, loc_id: &LocId) -> Result<Vec<IssuerRecord>, LocError> {
        let path = format!("loc-request/{}/issuers", loc_id);
        let list: IssuerList = self.send_json(self.request(Method::GET, &path)).await?;
        Ok(list.issuers)
    }

    async fn set_issuer_selection(
        &self,
        loc_id: &LocId,
        issuer: &AccountId,
        selected: bool,
    ) -> Result<(), LocError> {
        let path = format!("loc-request/{}/issuers", loc_id);
        self.send_empty(
            self.request(Method::PUT, &path)
                .json(&IssuerSelectionBody { issuer, selected }),
        )
        .await
    }
}
