//! End-to-end receive scenario: two inboxes, one email, one code.
//!
//! Runs against a mocked API by default. `live_receive_code` talks to the
//! real service and only runs with `API_KEY` set and `--ignored`.

mod common;

use common::{API_KEY, client, email_json, inbox_json, page_json, preview_json};
use httpmock::prelude::*;
use mailslurp_client::{
    Client, CreateInboxOptions, PageOptions, SendEmailOptions, WaitRequest, extract_code,
};
use serde_json::json;
use std::time::Duration;
use uuid::Uuid;

#[tokio::test]
async fn send_wait_extract_and_list() {
    let server = MockServer::start_async().await;
    let inbox1 = Uuid::new_v4();
    let inbox2 = Uuid::new_v4();
    let email_id = Uuid::new_v4();
    let address2 = "inbox2-7d1e@mailslurp.net";

    // Two inboxes from the same endpoint, told apart by name.
    let create1 = server
        .mock_async(|when, then| {
            when.method(POST).path("/inboxes").query_param("name", "inbox1");
            then.status(201)
                .json_body(inbox_json(inbox1, "inbox1-3b2a@mailslurp.net"));
        })
        .await;
    let create2 = server
        .mock_async(|when, then| {
            when.method(POST).path("/inboxes").query_param("name", "inbox2");
            then.status(201).json_body(inbox_json(inbox2, address2));
        })
        .await;
    let send = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(format!("/inboxes/{inbox1}"))
                .header("x-api-key", API_KEY)
                .json_body(json!({
                    "to": [address2],
                    "subject": "Hello inbox2",
                    "body": "Your code is: 123",
                    "isHTML": false
                }));
            then.status(201);
        })
        .await;
    let wait = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/waitForLatestEmail")
                .query_param("inboxId", inbox2.to_string())
                .query_param("timeout", "30000")
                .query_param("unreadOnly", "true");
            then.status(200).json_body(email_json(
                email_id,
                inbox2,
                "Hello inbox2",
                "Your code is: 123",
                false,
            ));
        })
        .await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(format!("/inboxes/{inbox2}/emails/paginated"))
                .query_param("page", "0")
                .query_param("size", "10")
                .query_param("sort", "DESC");
            then.status(200).json_body(page_json(
                vec![preview_json(
                    email_id,
                    inbox2,
                    "Hello inbox2",
                    true,
                    "2024-05-01T10:00:05.000Z",
                )],
                10,
            ));
        })
        .await;

    let client = client(&server);
    let named = |name: &str| CreateInboxOptions {
        name: Some(name.to_string()),
        ..CreateInboxOptions::default()
    };

    let sender = client.create_inbox(named("inbox1")).await.unwrap();
    let receiver = client.create_inbox(named("inbox2")).await.unwrap();
    create1.assert_async().await;
    create2.assert_async().await;

    client
        .send_email(
            sender.id,
            SendEmailOptions::new(
                receiver.email_address.clone(),
                "Hello inbox2",
                "Your code is: 123",
            ),
        )
        .await
        .unwrap();
    send.assert_async().await;

    let request = WaitRequest::new(receiver.id)
        .timeout(Duration::from_millis(30_000))
        .unread_only(true);
    let email = client.wait_for_latest_email(&request).await.unwrap();
    wait.assert_async().await;

    assert!(email.subject.contains("Hello inbox2"));
    assert!(email.body.contains("Your code is"));
    assert_eq!(extract_code(&email.body).unwrap(), "123");

    let page = client
        .get_inbox_emails_paginated(receiver.id, PageOptions::newest_first(10))
        .await
        .unwrap();
    list.assert_async().await;
    assert_eq!(page.content[0].subject, "Hello inbox2");
}

#[tokio::test]
#[ignore = "needs API_KEY and network access"]
async fn live_receive_code() {
    let client = Client::from_env().unwrap();

    let inbox1 = client
        .create_inbox(CreateInboxOptions::default())
        .await
        .unwrap();
    let inbox2 = client
        .create_inbox(CreateInboxOptions::default())
        .await
        .unwrap();
    assert!(inbox2.email_address.contains("@mailslurp"));

    client
        .send_email(
            inbox1.id,
            SendEmailOptions::new(
                inbox2.email_address.clone(),
                "Hello inbox2",
                "Your code is: 123",
            ),
        )
        .await
        .unwrap();

    let email = client
        .wait_for_latest_email(&WaitRequest::new(inbox2.id))
        .await
        .unwrap();
    assert!(email.subject.contains("Hello inbox2"));
    assert_eq!(email.extract_code().unwrap(), "123");

    let page = client
        .get_inbox_emails_paginated(inbox2.id, PageOptions::newest_first(10))
        .await
        .unwrap();
    assert!(!page.content.is_empty());

    client.delete_inbox(inbox1.id).await.unwrap();
    client.delete_inbox(inbox2.id).await.unwrap();
}
