//! User-submitted listings ("sell your books").

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::account::require_user;
use crate::backend::BackendService;
use crate::catalog::{Book, Condition, PLACEHOLDER_IMAGE};
use crate::error::{CommerceError, ValidationError};
use crate::ids::{BookId, UserId};
use crate::price::Price;

/// Whether a listing is shown in the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    #[default]
    Active,
    Inactive,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Active => "active",
            ListingStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(ListingStatus::Active),
            "inactive" => Ok(ListingStatus::Inactive),
            other => Err(format!("unknown listing status: {other}")),
        }
    }
}

/// A book put up for sale by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(flatten)]
    pub book: Book,
    pub user_id: UserId,
    pub status: ListingStatus,
    pub contact: String,
    pub created_at: DateTime<Utc>,
}

impl Listing {
    pub fn is_active(&self) -> bool {
        self.status == ListingStatus::Active
    }
}

impl AsRef<Book> for Listing {
    fn as_ref(&self) -> &Book {
        &self.book
    }
}

/// An image file picked on the sell form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Build an upload, guessing the content type from the file extension.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = match file_name
            .rsplit('.')
            .next()
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            _ => "application/octet-stream",
        };
        Self {
            file_name,
            content_type: content_type.to_string(),
            bytes,
        }
    }

    /// Object path the image is stored under for `owner`.
    ///
    /// The user's file name is not part of the path, only its extension, so
    /// every segment is safe to place in a URL unescaped.
    pub fn object_path(&self, owner: &UserId) -> String {
        let name = BookId::generate();
        match self.extension() {
            Some(ext) => format!("{}/{}.{}", path_segment(owner.as_str()), name, ext),
            None => format!("{}/{}", path_segment(owner.as_str()), name),
        }
    }

    /// Lowercase file extension, if it is short and alphanumeric.
    fn extension(&self) -> Option<String> {
        let (stem, ext) = self.file_name.rsplit_once('.')?;
        let valid = !stem.is_empty()
            && (1..=5).contains(&ext.len())
            && ext.chars().all(|c| c.is_ascii_alphanumeric());
        valid.then(|| ext.to_ascii_lowercase())
    }
}

fn path_segment(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' | '@' => c,
            _ => '-',
        })
        .collect()
}

/// A validated listing ready to insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewListing {
    pub user_id: UserId,
    pub title: String,
    pub author: String,
    pub category: String,
    pub condition: Condition,
    pub price: Price,
    pub image: String,
    pub description: Option<String>,
    pub contact: String,
    pub status: ListingStatus,
}

impl NewListing {
    /// Materialize as a [`Listing`] once the backend has assigned an id.
    pub fn into_listing(self, id: BookId, created_at: DateTime<Utc>) -> Listing {
        Listing {
            book: Book {
                id,
                title: self.title,
                author: self.author,
                category: self.category,
                price: self.price,
                old_price: self.price,
                image: self.image,
                condition: self.condition,
                description: self.description,
            },
            user_id: self.user_id,
            status: self.status,
            contact: self.contact,
            created_at,
        }
    }
}

/// Raw sell-form input.
///
/// Title, category, condition, price and contact are required. Author,
/// description and the image are optional.
#[derive(Debug, Clone, Default)]
pub struct ListingForm {
    pub title: String,
    pub author: String,
    pub category: String,
    pub condition: String,
    pub price: String,
    pub description: String,
    pub contact: String,
    pub image: Option<ImageUpload>,
}

impl ListingForm {
    /// Check the form, returning every rejected field at once.
    pub fn validate(&self, owner: &UserId) -> Result<NewListing, ValidationError> {
        let mut err = ValidationError::new();
        err.require("title", &self.title);
        err.require("category", &self.category);

        let condition = if self.condition.trim().is_empty() {
            err.missing("condition");
            None
        } else {
            match self.condition.parse::<Condition>() {
                Ok(c) => Some(c),
                Err(_) => {
                    err.invalid("condition", "must be new or old");
                    None
                }
            }
        };

        let price = parse_price("price", &self.price, &mut err);
        err.require("contact", &self.contact);
        err.into_result()?;

        let description = self.description.trim();
        Ok(NewListing {
            user_id: owner.clone(),
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            category: self.category.trim().to_string(),
            condition: condition.unwrap_or_default(),
            price: price.unwrap_or_default(),
            image: PLACEHOLDER_IMAGE.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            contact: self.contact.trim().to_string(),
            status: ListingStatus::Active,
        })
    }
}

/// Parse a whole, non-negative rupee amount from form text.
pub(crate) fn parse_price(
    field: &'static str,
    raw: &str,
    err: &mut ValidationError,
) -> Option<Price> {
    let raw = raw.trim();
    if raw.is_empty() {
        err.missing(field);
        return None;
    }
    match raw.parse::<i64>() {
        Ok(amount) if amount >= 0 => Some(Price::new(amount)),
        _ => {
            err.invalid(field, "must be a whole number");
            None
        }
    }
}

/// Submit a sell form for the signed-in user.
///
/// The image, if any, is uploaded first; its public URL becomes the listing
/// image. Nothing is inserted when validation or the upload fails.
pub async fn submit_listing(
    backend: &dyn BackendService,
    form: &ListingForm,
) -> Result<Listing, CommerceError> {
    let user = require_user(backend).await?;

    let mut listing = form.validate(&user.id)?;
    if let Some(image) = &form.image {
        listing.image = backend.upload_image(image).await?;
    }

    let created = backend.create_listing(&listing).await?;
    tracing::info!(listing_id = %created.book.id, title = %created.book.title, "listing submitted");
    Ok(created)
}

/// The signed-in user's listings, active or not.
pub async fn my_listings(backend: &dyn BackendService) -> Result<Vec<Listing>, CommerceError> {
    let user = require_user(backend).await?;
    Ok(backend.fetch_user_listings(&user.id).await?)
}

/// Deactivate or reactivate one of the signed-in user's listings.
pub async fn set_listing_status(
    backend: &dyn BackendService,
    id: &BookId,
    status: ListingStatus,
) -> Result<(), CommerceError> {
    let owned = my_listings(backend).await?;
    if !owned.iter().any(|l| &l.book.id == id) {
        return Err(CommerceError::ListingNotFound(id.to_string()));
    }
    backend.set_listing_status(id, status).await?;
    tracing::debug!(listing_id = %id, status = %status, "listing status changed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::User;
    use crate::backend::MemoryBackend;

    fn form() -> ListingForm {
        ListingForm {
            title: "The Shining".to_string(),
            category: "Horror".to_string(),
            condition: "old".to_string(),
            price: "150".to_string(),
            contact: "reader@example.com".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_object_path_is_url_safe() {
        let upload = ImageUpload::new("my cover #2.JPG", vec![]);
        let path = upload.object_path(&UserId::new("u1"));
        let (owner, name) = path.split_once('/').unwrap();
        assert_eq!(owner, "u1");
        assert!(name.ends_with(".jpg"), "{name}");
        assert!(!path.contains([' ', '#', '?', '%']), "{path}");
    }

    #[test]
    fn test_object_path_without_usable_extension() {
        let upload = ImageUpload::new("cover.j?g", vec![]);
        let path = upload.object_path(&UserId::new("a b"));
        assert!(path.starts_with("a-b/"), "{path}");
        assert!(!path.contains('.'), "{path}");
        assert!(!path.contains('?'), "{path}");
    }

    #[test]
    fn test_validate_reports_every_missing_field() {
        let err = ListingForm::default()
            .validate(&UserId::new("u1"))
            .unwrap_err();
        for field in ["title", "category", "condition", "price", "contact"] {
            assert!(err.has(field), "{field} should be rejected");
        }
        assert!(!err.has("author"));
    }

    #[test]
    fn test_validate_rejects_bad_price() {
        let mut f = form();
        f.price = "12.50".to_string();
        let err = f.validate(&UserId::new("u1")).unwrap_err();
        assert!(err.has("price"));
    }

    #[test]
    fn test_validate_builds_active_listing() {
        let listing = form().validate(&UserId::new("u1")).unwrap();
        assert_eq!(listing.status, ListingStatus::Active);
        assert_eq!(listing.condition, Condition::Old);
        assert_eq!(listing.price, Price::new(150));
        assert_eq!(listing.image, PLACEHOLDER_IMAGE);
        assert_eq!(listing.description, None);
    }

    #[test]
    fn test_image_content_type() {
        assert_eq!(ImageUpload::new("cover.JPG", vec![]).content_type, "image/jpeg");
        assert_eq!(
            ImageUpload::new("cover", vec![]).content_type,
            "application/octet-stream"
        );
    }

    #[tokio::test]
    async fn test_submit_requires_sign_in() {
        let backend = MemoryBackend::new();
        let result = submit_listing(&backend, &form()).await;
        assert!(matches!(result, Err(CommerceError::NotAuthenticated)));
    }

    #[tokio::test]
    async fn test_submit_uploads_image_first() {
        let backend = MemoryBackend::new().signed_in(User::new("u1", Some("reader@example.com")));
        let mut f = form();
        f.image = Some(ImageUpload::new("shining.png", vec![1, 2, 3]));

        let listing = submit_listing(&backend, &f).await.unwrap();
        assert!(listing.book.image.ends_with(".png"), "{}", listing.book.image);
        assert_eq!(backend.fetch_active_listings().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_owner_can_deactivate() {
        let backend = MemoryBackend::new().signed_in(User::new("u1", None));
        let listing = submit_listing(&backend, &form()).await.unwrap();

        set_listing_status(&backend, &listing.book.id, ListingStatus::Inactive)
            .await
            .unwrap();
        assert!(backend.fetch_active_listings().await.unwrap().is_empty());

        let missing = set_listing_status(&backend, &BookId::new("nope"), ListingStatus::Active).await;
        assert!(matches!(missing, Err(CommerceError::ListingNotFound(_))));
    }
}
