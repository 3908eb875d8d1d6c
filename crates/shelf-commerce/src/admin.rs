//! Admin back office.
//!
//! Every operation goes through an [`AdminConsole`], which can only be
//! obtained by a signed-in user holding the admin role.

use crate::account::{require_user, User, UserSummary};
use crate::backend::BackendService;
use crate::catalog::{parse_price, Book, Condition, NewBook};
use crate::checkout::{Order, OrderStatus};
use crate::error::{CommerceError, ValidationError};
use crate::ids::{BookId, OrderId};

/// Raw add-book form input.
#[derive(Debug, Clone)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    pub category: String,
    pub condition: Condition,
    pub price: String,
    pub old_price: String,
    pub image_url: String,
    pub description: String,
}

impl Default for BookForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            category: String::new(),
            condition: Condition::New,
            price: String::new(),
            old_price: String::new(),
            image_url: String::new(),
            description: String::new(),
        }
    }
}

impl BookForm {
    /// Check the form and build the row to insert.
    pub fn validate(&self, created_by: &User) -> Result<NewBook, ValidationError> {
        let mut err = ValidationError::new();
        err.require("title", &self.title);
        err.require("author", &self.author);
        err.require("category", &self.category);
        let price = parse_price("price", &self.price, &mut err);
        let old_price = parse_price("old_price", &self.old_price, &mut err);
        err.require("image_url", &self.image_url);
        err.into_result()?;

        let description = self.description.trim();
        Ok(NewBook {
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            category: self.category.trim().to_string(),
            condition: self.condition,
            price: price.unwrap_or_default(),
            old_price: old_price.unwrap_or_default(),
            image_url: self.image_url.trim().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            created_by: Some(created_by.id.clone()),
        })
    }
}

/// Authorized access to back-office operations.
pub struct AdminConsole<'a> {
    backend: &'a dyn BackendService,
    admin: User,
}

impl<'a> AdminConsole<'a> {
    /// Check the signed-in user against the role table.
    pub async fn authorize(backend: &'a dyn BackendService) -> Result<Self, CommerceError> {
        let user = require_user(backend).await?;
        if !backend.is_admin(&user.id).await? {
            tracing::warn!(user_id = %user.id, "admin access denied");
            return Err(CommerceError::Unauthorized);
        }
        Ok(Self {
            backend,
            admin: user,
        })
    }

    pub fn admin(&self) -> &User {
        &self.admin
    }

    /// Admin-added books, newest first.
    pub async fn books(&self) -> Result<Vec<Book>, CommerceError> {
        Ok(self.backend.fetch_books().await?)
    }

    pub async fn add_book(&self, form: &BookForm) -> Result<Book, CommerceError> {
        let book = form.validate(&self.admin)?;
        let created = self.backend.create_book(&book).await?;
        tracing::info!(book_id = %created.id, title = %created.title, "book added");
        Ok(created)
    }

    pub async fn delete_book(&self, id: &BookId) -> Result<(), CommerceError> {
        self.backend.delete_book(id).await?;
        tracing::info!(book_id = %id, "book deleted");
        Ok(())
    }

    /// Every order, newest first.
    pub async fn orders(&self) -> Result<Vec<Order>, CommerceError> {
        let mut orders = self.backend.fetch_orders().await?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    /// Move an order to `status`, refusing to leave a terminal status.
    pub async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, CommerceError> {
        let mut order = self
            .backend
            .fetch_orders()
            .await?
            .into_iter()
            .find(|o| &o.id == id)
            .ok_or_else(|| CommerceError::OrderNotFound(id.to_string()))?;

        let from = order.status;
        order.set_status(status)?;
        self.backend.update_order_status(id, status).await?;
        tracing::info!(order_id = %id, from = %from, to = %status, "order status updated");
        Ok(order)
    }

    pub async fn users(&self) -> Result<Vec<UserSummary>, CommerceError> {
        Ok(self.backend.list_users().await?)
    }
}
