//! Create two inboxes, send a code from one to the other, and read it back.
//!
//! Requires the `API_KEY` environment variable. Set `RUST_LOG=mailslurp_client=debug`
//! to see each request.

use mailslurp_client::{Client, CreateInboxOptions, PageOptions, SendEmailOptions, WaitRequest};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = Client::from_env()?;

    let sender = client.create_inbox(CreateInboxOptions::default()).await?;
    let receiver = client.create_inbox(CreateInboxOptions::default()).await?;
    println!("sender:   {}", sender.email_address);
    println!("receiver: {}", receiver.email_address);

    let options = SendEmailOptions::new(
        receiver.email_address.clone(),
        "Hello inbox2",
        "Your code is: 123",
    );
    client.send_email(sender.id, options).await?;

    let request = WaitRequest::new(receiver.id).timeout(Duration::from_millis(30_000));
    let email = client.wait_for_latest_email(&request).await?;
    println!("received: {}", email.subject);
    println!("code:     {}", email.extract_code()?);

    let page = client
        .get_inbox_emails_paginated(receiver.id, PageOptions::newest_first(10))
        .await?;
    if let Some(latest) = page.content.first() {
        println!("latest:   {}", latest.subject);
    }

    client.delete_inbox(sender.id).await?;
    client.delete_inbox(receiver.id).await?;
    Ok(())
}
