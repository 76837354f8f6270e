//! Shared helpers for tests against a mocked MailSlurp API.

#![allow(dead_code)]

use httpmock::MockServer;
use mailslurp_client::Client;
use serde_json::{Value, json};
use std::time::Duration;
use uuid::Uuid;

pub const API_KEY: &str = "test-api-key";

pub fn client(server: &MockServer) -> Client {
    Client::builder()
        .api_key(API_KEY)
        .base_url(server.base_url())
        .wait_slack(Duration::from_millis(500))
        .build()
        .unwrap()
}

pub fn inbox_json(id: Uuid, address: &str) -> Value {
    json!({
        "id": id,
        "emailAddress": address,
        "name": null,
        "createdAt": "2024-05-01T10:00:00.000Z",
        "favourite": false
    })
}

pub fn email_json(id: Uuid, inbox_id: Uuid, subject: &str, body: &str, read: bool) -> Value {
    json!({
        "id": id,
        "inboxId": inbox_id,
        "subject": subject,
        "body": body,
        "from": "sender@mailslurp.net",
        "to": ["receiver@mailslurp.net"],
        "read": read,
        "isHTML": false,
        "createdAt": "2024-05-01T10:00:05.000Z"
    })
}

pub fn preview_json(
    id: Uuid,
    inbox_id: Uuid,
    subject: &str,
    read: bool,
    created_at: &str,
) -> Value {
    json!({
        "id": id,
        "inboxId": inbox_id,
        "subject": subject,
        "from": "sender@mailslurp.net",
        "to": ["receiver@mailslurp.net"],
        "read": read,
        "createdAt": created_at
    })
}

pub fn page_json(content: Vec<Value>, size: u32) -> Value {
    let total = content.len() as u64;
    let pages = if total == 0 { 0 } else { 1 };
    paged_json(content, 0, size, total, pages)
}

pub fn paged_json(
    content: Vec<Value>,
    number: u32,
    size: u32,
    total_elements: u64,
    total_pages: u32,
) -> Value {
    json!({
        "content": content,
        "number": number,
        "size": size,
        "totalElements": total_elements,
        "totalPages": total_pages
    })
}
