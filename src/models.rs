//! Request and response types for the MailSlurp REST API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// A disposable inbox provisioned by MailSlurp.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inbox {
    pub id: Uuid,
    pub email_address: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub favourite: bool,
}

impl Inbox {
    /// Domain part of the inbox address (after `@`).
    pub fn domain(&self) -> &str {
        self.email_address
            .rsplit_once('@')
            .map(|(_, domain)| domain)
            .unwrap_or("")
    }
}

/// A full email, including its body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Email {
    pub id: Uuid,
    pub inbox_id: Uuid,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subject: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: String,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub to: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub read: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "isHTML", default, deserialize_with = "null_as_default")]
    pub is_html: bool,
}

/// Header-only view of an email, as returned by inbox listings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailPreview {
    pub id: Uuid,
    #[serde(default)]
    pub inbox_id: Option<Uuid>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subject: String,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub to: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub read: bool,
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
}

/// Options for creating an inbox.
///
/// All fields default to "let the service decide": a random address on the
/// default domain, no name, no expiry.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInboxOptions {
    /// Requested address; must use a domain you own.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Expiry in milliseconds from creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub favourite: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub use_domain_pool: bool,
}

/// Options for sending an email from an inbox.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailOptions {
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
    #[serde(rename = "isHTML")]
    pub is_html: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cc: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bcc: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

impl SendEmailOptions {
    /// Plain-text email to a single recipient.
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: vec![to.into()],
            subject: subject.into(),
            body: body.into(),
            ..Self::default()
        }
    }

    /// Mark the body as HTML.
    pub fn html(mut self) -> Self {
        self.is_html = true;
        self
    }
}

/// Sort order by receipt time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Pagination parameters for inbox listings.
///
/// Defaults: `page = 0`, `size = 20`, [`SortDirection::Asc`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageOptions {
    pub page: u32,
    pub size: u32,
    pub sort: SortDirection,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            page: 0,
            size: 20,
            sort: SortDirection::Asc,
        }
    }
}

impl PageOptions {
    /// Newest first, starting at page 0.
    pub fn newest_first(size: u32) -> Self {
        Self {
            page: 0,
            size,
            sort: SortDirection::Desc,
        }
    }
}

// The API sends explicit nulls for empty fields.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
