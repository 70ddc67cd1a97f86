use async_trait::async_trait;
use gloo::net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::domain::{ExpenseGateway, PaymentGateway};
use shared::{
    AddMemberRequest, ApiError, BalanceDto, ClientConfig, CommentCreateRequest, CommentResponse,
    ExpenseCreateRequest, ExpenseResponse, FriendRequest, FriendshipResponse, GroupCreateRequest,
    GroupResponse, JwtResponse, LoginRequest, OverallBalanceSummary, PaymentCreateRequest,
    PaymentResponse, ReceiptScanResponse, RegisterRequest, TransactionDto, UserId, UserResponse,
};
use wasm_bindgen::JsValue;
use web_sys::{File, FormData};

use super::logging::Logger;
use super::session::SessionStore;

/// API client for the expense-sharing backend. Every request carries the
/// stored bearer token; a 401 clears the stored session.
#[derive(Clone, PartialEq)]
pub struct ApiClient {
    config: ClientConfig,
}

impl ApiClient {
    /// Client configured from build-time environment, falling back to defaults
    pub fn new() -> Self {
        Self::with_config(ClientConfig::from_build_env())
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // --- Auth ---

    pub async fn login(&self, request: &LoginRequest) -> Result<JwtResponse, ApiError> {
        let response = send(self.post("/auth/login").json(request)).await?;
        read_json(response).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<UserResponse, ApiError> {
        let response = send(self.post("/auth/register").json(request)).await?;
        read_json(response).await
    }

    /// Confirm an email address; the backend answers with a plain message
    pub async fn verify_email(&self, token: &str) -> Result<String, ApiError> {
        let response = send(self.get("/auth/verify").query([("token", token)]).build()).await?;
        response.text().await.map_err(|e| ApiError::Parse(e.to_string()))
    }

    // --- Groups ---

    pub async fn my_groups(&self) -> Result<Vec<GroupResponse>, ApiError> {
        self.get_json("/groups/my").await
    }

    pub async fn create_group(&self, request: &GroupCreateRequest) -> Result<GroupResponse, ApiError> {
        let response = send(self.post("/groups").json(request)).await?;
        read_json(response).await
    }

    pub async fn group(&self, group_id: i64) -> Result<GroupResponse, ApiError> {
        self.get_json(&format!("/groups/{}", group_id)).await
    }

    pub async fn add_group_member(&self, group_id: i64, member_email: &str) -> Result<GroupResponse, ApiError> {
        let request = AddMemberRequest {
            member_email: member_email.to_string(),
        };
        let response = send(self.post(&format!("/groups/{}/members", group_id)).json(&request)).await?;
        read_json(response).await
    }

    pub async fn group_transactions(&self, group_id: i64) -> Result<Vec<TransactionDto>, ApiError> {
        self.get_json(&format!("/groups/{}/transactions", group_id)).await
    }

    pub async fn leave_group(&self, group_id: i64, user_id: UserId) -> Result<(), ApiError> {
        send(self.delete(&format!("/groups/{}/members/{}", group_id, user_id)).build()).await?;
        Ok(())
    }

    pub async fn delete_group(&self, group_id: i64) -> Result<(), ApiError> {
        send(self.delete(&format!("/groups/{}", group_id)).build()).await?;
        Ok(())
    }

    // --- Friendships ---

    pub async fn friends(&self) -> Result<Vec<FriendshipResponse>, ApiError> {
        self.get_json("/friendships/friends").await
    }

    pub async fn incoming_requests(&self) -> Result<Vec<FriendshipResponse>, ApiError> {
        self.get_json("/friendships/requests/incoming").await
    }

    pub async fn outgoing_requests(&self) -> Result<Vec<FriendshipResponse>, ApiError> {
        self.get_json("/friendships/requests/outgoing").await
    }

    pub async fn send_friend_request(&self, recipient_email: &str) -> Result<FriendshipResponse, ApiError> {
        let request = FriendRequest {
            recipient_email: recipient_email.to_string(),
        };
        let response = send(self.post("/friendships/requests").json(&request)).await?;
        read_json(response).await
    }

    pub async fn accept_friend_request(&self, friendship_id: i64) -> Result<FriendshipResponse, ApiError> {
        let path = format!("/friendships/requests/{}/accept", friendship_id);
        let response = send(self.put(&path).build()).await?;
        read_json(response).await
    }

    pub async fn reject_friend_request(&self, friendship_id: i64) -> Result<(), ApiError> {
        let path = format!("/friendships/requests/{}/reject", friendship_id);
        send(self.put(&path).build()).await?;
        Ok(())
    }

    pub async fn remove_friend(&self, friendship_id: i64) -> Result<(), ApiError> {
        send(self.delete(&format!("/friendships/{}", friendship_id)).build()).await?;
        Ok(())
    }

    // --- Expenses ---

    pub async fn my_expenses(&self) -> Result<Vec<ExpenseResponse>, ApiError> {
        self.get_json("/expenses/my").await
    }

    pub async fn delete_expense(&self, expense_id: i64) -> Result<(), ApiError> {
        send(self.delete(&format!("/expenses/{}", expense_id)).build()).await?;
        Ok(())
    }

    // --- Payments ---

    pub async fn delete_payment(&self, payment_id: i64) -> Result<(), ApiError> {
        send(self.delete(&format!("/payments/{}", payment_id)).build()).await?;
        Ok(())
    }

    // --- Balances ---

    pub async fn overall_balance(&self) -> Result<OverallBalanceSummary, ApiError> {
        self.get_json("/balances/overall").await
    }

    pub async fn group_balances(&self, group_id: i64) -> Result<Vec<BalanceDto>, ApiError> {
        self.get_json(&format!("/balances/group/{}", group_id)).await
    }

    // --- Receipts ---

    pub async fn scan_receipt(&self, receipt: &File) -> Result<ReceiptScanResponse, ApiError> {
        let form = FormData::new().map_err(js_error)?;
        form.append_with_blob_and_filename("receipt", receipt, &receipt.name())
            .map_err(js_error)?;
        let response = send(self.post("/receipts/scan-and-parse").body(form)).await?;
        read_json(response).await
    }

    // --- Comments ---

    pub async fn comments(&self, expense_id: i64) -> Result<Vec<CommentResponse>, ApiError> {
        self.get_json(&format!("/expenses/{}/comments", expense_id)).await
    }

    pub async fn add_comment(&self, expense_id: i64, content: &str) -> Result<CommentResponse, ApiError> {
        let request = CommentCreateRequest {
            content: content.to_string(),
        };
        let path = format!("/expenses/{}/comments", expense_id);
        let response = send(self.post(&path).json(&request)).await?;
        read_json(response).await
    }

    pub async fn delete_comment(&self, comment_id: i64) -> Result<(), ApiError> {
        send(self.delete(&format!("/comments/{}", comment_id)).build()).await?;
        Ok(())
    }

    // --- Request plumbing ---

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = send(self.get(path).build()).await?;
        read_json(response).await
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.authorized(Request::get(&self.config.endpoint(path)))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.authorized(Request::post(&self.config.endpoint(path)))
    }

    fn put(&self, path: &str) -> RequestBuilder {
        self.authorized(Request::put(&self.config.endpoint(path)))
    }

    fn delete(&self, path: &str) -> RequestBuilder {
        self.authorized(Request::delete(&self.config.endpoint(path)))
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match SessionStore::token() {
            Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
            None => builder,
        }
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl ExpenseGateway for ApiClient {
    type Attachment = File;

    async fn create_expense(
        &self,
        request: &ExpenseCreateRequest,
        attachment: Option<&File>,
    ) -> Result<ExpenseResponse, ApiError> {
        let form = expense_form_data(request, attachment)?;
        let response = send(self.post("/expenses").body(form)).await?;
        read_json(response).await
    }

    async fn update_expense(
        &self,
        expense_id: i64,
        request: &ExpenseCreateRequest,
        attachment: Option<&File>,
    ) -> Result<ExpenseResponse, ApiError> {
        let form = expense_form_data(request, attachment)?;
        let response = send(self.put(&format!("/expenses/{}", expense_id)).body(form)).await?;
        read_json(response).await
    }
}

#[async_trait(?Send)]
impl PaymentGateway for ApiClient {
    async fn record_payment(&self, request: &PaymentCreateRequest) -> Result<PaymentResponse, ApiError> {
        let response = send(self.post("/payments").json(request)).await?;
        read_json(response).await
    }

    async fn update_payment(
        &self,
        payment_id: i64,
        request: &PaymentCreateRequest,
    ) -> Result<PaymentResponse, ApiError> {
        let response = send(self.put(&format!("/payments/{}", payment_id)).json(request)).await?;
        read_json(response).await
    }
}

/// Multipart body the expense endpoints expect: the request as JSON text in
/// `expenseData`, plus the receipt file when one was attached
fn expense_form_data(request: &ExpenseCreateRequest, receipt: Option<&File>) -> Result<FormData, ApiError> {
    let json = serde_json::to_string(request)
        .map_err(|e| ApiError::Request(format!("Failed to serialize request: {}", e)))?;
    let form = FormData::new().map_err(js_error)?;
    form.append_with_str("expenseData", &json).map_err(js_error)?;
    if let Some(file) = receipt {
        form.append_with_blob_and_filename("receiptFile", file, &file.name())
            .map_err(js_error)?;
    }
    Ok(form)
}

async fn send(request: Result<Request, gloo::net::Error>) -> Result<Response, ApiError> {
    let request = request.map_err(|e| ApiError::Request(e.to_string()))?;
    let response = request
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if response.ok() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if status == 401 {
        Logger::warn_with_component("api", "Unauthorized access - 401. Clearing token.");
        SessionStore::clear();
    }
    Err(ApiError::from_response(status, &body))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Parse(e.to_string()))
}

fn js_error(value: JsValue) -> ApiError {
    ApiError::Request(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}
