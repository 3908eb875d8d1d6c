//! [`BackendService`] over the hosted service's HTTP APIs.

use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use shelf_commerce::account::{User, UserSummary};
use shelf_commerce::backend::{BackendError, BackendResult, BackendService};
use shelf_commerce::catalog::{Book, ImageUpload, Listing, ListingStatus, NewBook, NewListing};
use shelf_commerce::checkout::{NewOrder, Order, OrderStatus};
use shelf_commerce::ids::{BookId, OrderId, UserId};

use crate::rows::{AdminUserRow, BookRow, ListingRow, NewListingRow, OrderRow, RoleRow};
use crate::{FetchClient, FetchError, RequestBuilder};

/// Connection settings for the hosted service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestConfig {
    /// Project URL, e.g. `https://project.example.co`.
    pub url: String,
    /// Public anonymous API key.
    pub anon_key: String,
    /// Session token of the signed-in user, if any.
    pub access_token: Option<String>,
    /// Object-storage bucket for listing images.
    pub storage_bucket: String,
}

/// A password sign-in result.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: User,
}

/// Backend talking to the hosted REST, auth, storage and functions APIs.
///
/// Every request carries the anon key as `apikey`; the bearer token is the
/// session token when signed in and the anon key otherwise.
#[derive(Debug)]
pub struct RestBackend {
    client: FetchClient,
    anon_key: String,
    storage_bucket: String,
    access_token: RwLock<Option<String>>,
}

impl RestBackend {
    pub fn new(config: RestConfig) -> Result<Self, FetchError> {
        let client = FetchClient::new(&config.url)?.with_default_header("apikey", &config.anon_key);
        Ok(Self {
            client,
            anon_key: config.anon_key,
            storage_bucket: config.storage_bucket,
            access_token: RwLock::new(config.access_token.filter(|t| !t.is_empty())),
        })
    }

    /// The current session token, if signed in.
    pub fn access_token(&self) -> Option<String> {
        self.access_token.read().ok().and_then(|t| t.clone())
    }

    fn set_access_token(&self, token: Option<String>) {
        if let Ok(mut slot) = self.access_token.write() {
            *slot = token;
        }
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let token = self.access_token().unwrap_or_else(|| self.anon_key.clone());
        request.bearer_auth(token)
    }

    /// Public URL of an object in the storage bucket.
    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.client.base_url(),
            self.storage_bucket,
            path
        )
    }

    /// Sign in with email and password, keeping the returned session token.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, FetchError> {
        #[derive(Serialize)]
        struct Credentials<'a> {
            email: &'a str,
            password: &'a str,
        }

        let request = self
            .client
            .post("/auth/v1/token")
            .query("grant_type", "password")
            .json(&Credentials { email, password })?;
        let session: Session = self.client.send(request).await?.error_for_status()?.json()?;
        self.set_access_token(Some(session.access_token.clone()));
        tracing::info!(user_id = %session.user.id, "signed in");
        Ok(session)
    }

    /// End the session server-side and forget the token.
    pub async fn sign_out(&self) -> Result<(), FetchError> {
        if self.access_token().is_some() {
            let request = self.authorized(self.client.post("/auth/v1/logout"));
            self.client.send(request).await?.error_for_status()?;
        }
        self.set_access_token(None);
        Ok(())
    }

    pub(crate) fn books_request(&self) -> RequestBuilder {
        self.authorized(
            self.client
                .get("/rest/v1/books")
                .query("select", "*")
                .query("order", "created_at.desc"),
        )
    }

    pub(crate) fn insert_request<T: Serialize>(
        &self,
        table: &str,
        row: &T,
    ) -> Result<RequestBuilder, FetchError> {
        Ok(self.authorized(
            self.client
                .post(&format!("/rest/v1/{table}"))
                .header("Prefer", "return=representation")
                .json(row)?,
        ))
    }

    pub(crate) fn rpc_request(&self, function: &str) -> Result<RequestBuilder, FetchError> {
        Ok(self.authorized(
            self.client
                .post(&format!("/rest/v1/rpc/{function}"))
                .json(&serde_json::json!({}))?,
        ))
    }

    async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, FetchError> {
        self.client.send(request).await?.error_for_status()?.json()
    }

    async fn execute(&self, request: RequestBuilder) -> Result<(), FetchError> {
        self.client.send(request).await?.error_for_status()?;
        Ok(())
    }

    /// Inserted rows come back as a one-element array.
    async fn insert<T, R>(&self, table: &str, row: &T) -> Result<R, FetchError>
    where
        T: Serialize + Sync,
        R: serde::de::DeserializeOwned + Send,
    {
        let rows: Vec<R> = self.fetch(self.insert_request(table, row)?).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| FetchError::ParseError(format!("insert into {table} returned no row")))
    }
}

#[async_trait]
impl BackendService for RestBackend {
    async fn current_user(&self) -> BackendResult<Option<User>> {
        if self.access_token().is_none() {
            return Ok(None);
        }
        let request = self.authorized(self.client.get("/auth/v1/user"));
        let response = self.client.send(request).await.map_err(BackendError::from)?;
        if response.status == 401 || response.status == 403 {
            tracing::debug!(status = response.status, "session rejected");
            return Ok(None);
        }
        let user: User = response.error_for_status()?.json()?;
        Ok(Some(user))
    }

    async fn fetch_books(&self) -> BackendResult<Vec<Book>> {
        let rows: Vec<BookRow> = self.fetch(self.books_request()).await?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn fetch_active_listings(&self) -> BackendResult<Vec<Listing>> {
        let rows: Vec<ListingRow> = self.fetch(self.rpc_request("get_active_listings")?).await?;
        Ok(rows.into_iter().map(Listing::from).collect())
    }

    async fn submit_order(&self, order: &NewOrder) -> BackendResult<Order> {
        let row: OrderRow = self.insert("orders", order).await?;
        Ok(row.into())
    }

    async fn fetch_orders(&self) -> BackendResult<Vec<Order>> {
        let request = self.authorized(
            self.client
                .get("/rest/v1/orders")
                .query("select", "*")
                .query("order", "created_at.desc"),
        );
        let rows: Vec<OrderRow> = self.fetch(request).await?;
        Ok(rows.into_iter().map(Order::from).collect())
    }

    async fn update_order_status(&self, id: &OrderId, status: OrderStatus) -> BackendResult<()> {
        let request = self.authorized(
            self.client
                .patch("/rest/v1/orders")
                .query("id", format!("eq.{id}"))
                .json(&serde_json::json!({ "status": status }))?,
        );
        Ok(self.execute(request).await?)
    }

    async fn is_admin(&self, user: &UserId) -> BackendResult<bool> {
        let request = self.authorized(
            self.client
                .get("/rest/v1/user_roles")
                .query("select", "role")
                .query("user_id", format!("eq.{user}"))
                .query("role", "eq.admin"),
        );
        let rows: Vec<RoleRow> = self.fetch(request).await?;
        Ok(rows.iter().any(|r| r.role == "admin"))
    }

    async fn create_book(&self, book: &NewBook) -> BackendResult<Book> {
        let row: BookRow = self.insert("books", book).await?;
        Ok(row.into())
    }

    async fn delete_book(&self, id: &BookId) -> BackendResult<()> {
        let request = self.authorized(
            self.client
                .delete("/rest/v1/books")
                .query("id", format!("eq.{id}")),
        );
        Ok(self.execute(request).await?)
    }

    async fn list_users(&self) -> BackendResult<Vec<UserSummary>> {
        let rows: Vec<AdminUserRow> = self.fetch(self.rpc_request("get_admin_user_list")?).await?;
        Ok(rows.into_iter().map(UserSummary::from).collect())
    }

    async fn create_listing(&self, listing: &NewListing) -> BackendResult<Listing> {
        let row: ListingRow = self
            .insert("user_listings", &NewListingRow::from(listing))
            .await?;
        Ok(row.into())
    }

    async fn fetch_user_listings(&self, user: &UserId) -> BackendResult<Vec<Listing>> {
        let request = self.authorized(
            self.client
                .get("/rest/v1/user_listings")
                .query("select", "*")
                .query("user_id", format!("eq.{user}"))
                .query("order", "created_at.desc"),
        );
        let rows: Vec<ListingRow> = self.fetch(request).await?;
        Ok(rows.into_iter().map(Listing::from).collect())
    }

    async fn set_listing_status(&self, id: &BookId, status: ListingStatus) -> BackendResult<()> {
        let request = self.authorized(
            self.client
                .patch("/rest/v1/user_listings")
                .query("id", format!("eq.{id}"))
                .json(&serde_json::json!({ "status": status }))?,
        );
        Ok(self.execute(request).await?)
    }

    async fn upload_image(&self, upload: &ImageUpload) -> BackendResult<String> {
        let user = self
            .current_user()
            .await?
            .ok_or_else(|| BackendError::from(FetchError::NoSession))?;
        let path = upload.object_path(&user.id);
        let request = self.authorized(
            self.client
                .post(&format!("/storage/v1/object/{}/{}", self.storage_bucket, path))
                .bytes(upload.content_type.clone(), upload.bytes.clone()),
        );
        self.execute(request).await?;
        tracing::debug!(path = %path, bytes = upload.bytes.len(), "uploaded image");
        Ok(self.public_url(&path))
    }

    async fn delete_account(&self) -> BackendResult<()> {
        let token = self
            .access_token()
            .ok_or_else(|| BackendError::from(FetchError::NoSession))?;
        let request = self
            .client
            .post("/functions/v1/delete-account")
            .bearer_auth(token)
            .json(&serde_json::json!({}))?;
        self.execute(request).await?;
        self.set_access_token(None);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Method;

    fn backend(token: Option<&str>) -> RestBackend {
        RestBackend::new(RestConfig {
            url: "https://project.example.co/".to_string(),
            anon_key: "anon".to_string(),
            access_token: token.map(str::to_string),
            storage_bucket: "book-images".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_anon_requests_use_anon_key() {
        let req = backend(None).books_request();
        assert_eq!(req.method(), Method::Get);
        assert_eq!(req.url(), "https://project.example.co/rest/v1/books");
        assert_eq!(req.header_value("apikey"), Some("anon"));
        assert_eq!(req.header_value("Authorization"), Some("Bearer anon"));
    }

    #[test]
    fn test_session_token_is_bearer() {
        let req = backend(Some("user-jwt")).books_request();
        assert_eq!(req.header_value("Authorization"), Some("Bearer user-jwt"));
        assert_eq!(req.header_value("apikey"), Some("anon"));
    }

    #[test]
    fn test_empty_token_means_anonymous() {
        assert_eq!(backend(Some("")).access_token(), None);
    }

    #[test]
    fn test_insert_asks_for_representation() {
        let req = backend(None)
            .insert_request("orders", &serde_json::json!({"status": "pending"}))
            .unwrap();
        assert_eq!(req.url(), "https://project.example.co/rest/v1/orders");
        assert_eq!(req.header_value("Prefer"), Some("return=representation"));
    }

    #[test]
    fn test_rpc_path() {
        let req = backend(None).rpc_request("get_active_listings").unwrap();
        assert_eq!(
            req.url(),
            "https://project.example.co/rest/v1/rpc/get_active_listings"
        );
        assert_eq!(req.method(), Method::Post);
    }

    #[test]
    fn test_public_url() {
        assert_eq!(
            backend(None).public_url("u1/abc-cover.png"),
            "https://project.example.co/storage/v1/object/public/book-images/u1/abc-cover.png"
        );
    }

    #[test]
    fn test_uploaded_image_url_has_no_fragment() {
        let upload = ImageUpload::new("my cover #2.jpg", vec![]);
        let path = upload.object_path(&UserId::new("u1"));
        let url = reqwest::Url::parse(&backend(None).public_url(&path)).unwrap();
        assert_eq!(url.fragment(), None);
        assert_eq!(url.query(), None);
        assert!(url.path().ends_with(&path), "{}", url.path());
    }

    #[tokio::test]
    async fn test_anonymous_has_no_user() {
        assert_eq!(backend(None).current_user().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_account_needs_session() {
        let err = backend(None).delete_account().await.unwrap_err();
        assert_eq!(err.message(), "Not signed in");
    }
}
