//! MailSlurp async client implementation.

use crate::wait::WaitRequest;
use crate::{
    Config, CreateInboxOptions, Email, EmailPreview, Error, Inbox, Page, PageOptions, Result,
    SendEmailOptions,
};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

/// Async client for the MailSlurp email testing service.
///
/// The API key is injected once at construction and sent with every request.
/// Use [`Client::from_env`] in tests, or [`Client::builder`] for custom
/// settings like proxies, timeouts, and a custom base URL.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    api_key: HeaderValue,
    proxy: Option<String>,
    user_agent: String,
    base_url: String,
    request_timeout: Duration,
    wait_slack: Duration,
}

impl Client {
    /// Create a builder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client with default settings for the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        ClientBuilder::new().api_key(api_key).build()
    }

    /// Create a client from the `API_KEY` environment variable.
    ///
    /// # Examples
    /// ```no_run
    /// # use mailslurp_client::Client;
    /// # fn main() -> Result<(), mailslurp_client::Error> {
    /// let client = Client::from_env()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_env() -> Result<Self> {
        Config::from_env()?.builder().build()
    }

    /// Get the proxy URL if one was configured.
    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    /// Base URL all requests are issued against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a new disposable inbox.
    ///
    /// # Examples
    /// ```no_run
    /// # use mailslurp_client::{Client, CreateInboxOptions};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), mailslurp_client::Error> {
    /// let client = Client::from_env()?;
    /// let inbox = client.create_inbox(CreateInboxOptions::default()).await?;
    /// println!("{}", inbox.email_address);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create_inbox(&self, options: CreateInboxOptions) -> Result<Inbox> {
        let request = self.http.post(self.url("/inboxes")).query(&options);
        let response = self.execute("create_inbox", "new inbox", request).await?;
        let inbox: Inbox = Self::decode("create_inbox", "new inbox", response).await?;
        debug!(inbox_id = %inbox.id, address = %inbox.email_address, "created inbox");
        Ok(inbox)
    }

    /// Fetch an inbox by id.
    pub async fn get_inbox(&self, inbox_id: Uuid) -> Result<Inbox> {
        let target = inbox_id.to_string();
        let request = self.http.get(self.url(&format!("/inboxes/{inbox_id}")));
        let response = self.execute("get_inbox", &target, request).await?;
        Self::decode("get_inbox", &target, response).await
    }

    /// Delete an inbox and all of its emails.
    pub async fn delete_inbox(&self, inbox_id: Uuid) -> Result<()> {
        let request = self.http.delete(self.url(&format!("/inboxes/{inbox_id}")));
        self.execute("delete_inbox", &inbox_id.to_string(), request)
            .await?;
        debug!(%inbox_id, "deleted inbox");
        Ok(())
    }

    /// Send an email from an inbox.
    ///
    /// # Examples
    /// ```no_run
    /// # use mailslurp_client::{Client, CreateInboxOptions, SendEmailOptions};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), mailslurp_client::Error> {
    /// let client = Client::from_env()?;
    /// let inbox = client.create_inbox(CreateInboxOptions::default()).await?;
    /// let options = SendEmailOptions::new(
    ///     inbox.email_address.clone(),
    ///     "Test email",
    ///     "<h1>MailSlurp supports HTML</h1>",
    /// )
    /// .html();
    /// client.send_email(inbox.id, options).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn send_email(&self, inbox_id: Uuid, options: SendEmailOptions) -> Result<()> {
        let request = self
            .http
            .post(self.url(&format!("/inboxes/{inbox_id}")))
            .json(&options);
        let response = self
            .execute("send_email", &inbox_id.to_string(), request)
            .await?;
        if response.status() != StatusCode::CREATED {
            warn!(%inbox_id, status = %response.status(), "send_email returned non-201 success");
        }
        debug!(%inbox_id, recipients = options.to.len(), "sent email");
        Ok(())
    }

    /// List emails in an inbox, one page at a time.
    ///
    /// # Examples
    /// ```no_run
    /// # use mailslurp_client::{Client, PageOptions};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), mailslurp_client::Error> {
    /// # let client = Client::from_env()?;
    /// # let inbox_id = uuid::Uuid::nil();
    /// let page = client
    ///     .get_inbox_emails_paginated(inbox_id, PageOptions::newest_first(10))
    ///     .await?;
    /// if let Some(latest) = page.content.first() {
    ///     println!("{}", latest.subject);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_inbox_emails_paginated(
        &self,
        inbox_id: Uuid,
        options: PageOptions,
    ) -> Result<Page<EmailPreview>> {
        let target = inbox_id.to_string();
        let request = self
            .http
            .get(self.url(&format!("/inboxes/{inbox_id}/emails/paginated")))
            .query(&options);
        let response = self
            .execute("get_inbox_emails_paginated", &target, request)
            .await?;
        Self::decode("get_inbox_emails_paginated", &target, response).await
    }

    /// Fetch a full email by id. The service marks it as read.
    pub async fn get_email(&self, email_id: Uuid) -> Result<Email> {
        let target = email_id.to_string();
        let request = self.http.get(self.url(&format!("/emails/{email_id}")));
        let response = self.execute("get_email", &target, request).await?;
        Self::decode("get_email", &target, response).await
    }

    /// Wait for the latest email in an inbox, blocking server-side.
    ///
    /// The service holds the request open for up to `request.timeout` and
    /// answers with the most recently received matching email, or HTTP 408.
    /// Locally the request is bounded by the timeout plus a small slack, so
    /// this never blocks indefinitely. Timeouts surface as [`Error::Timeout`];
    /// failing to connect is always [`Error::Request`].
    ///
    /// # Examples
    /// ```no_run
    /// # use mailslurp_client::{Client, WaitRequest};
    /// # use std::time::Duration;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), mailslurp_client::Error> {
    /// # let client = Client::from_env()?;
    /// # let inbox_id = uuid::Uuid::nil();
    /// let request = WaitRequest::new(inbox_id)
    ///     .timeout(Duration::from_millis(30_000))
    ///     .unread_only(true);
    /// let email = client.wait_for_latest_email(&request).await?;
    /// println!("{}", email.subject);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn wait_for_latest_email(&self, request: &WaitRequest) -> Result<Email> {
        self.wait_for_latest_email_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Like [`Client::wait_for_latest_email`], but returns
    /// [`Error::Cancelled`] as soon as `cancel` fires.
    pub async fn wait_for_latest_email_with_cancel(
        &self,
        request: &WaitRequest,
        cancel: &CancellationToken,
    ) -> Result<Email> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(inbox_id = %request.inbox_id, "wait cancelled");
                Err(Error::Cancelled { inbox_id: request.inbox_id })
            }
            result = self.request_latest_email(request) => result,
        }
    }

    async fn request_latest_email(&self, request: &WaitRequest) -> Result<Email> {
        let target = request.inbox_id.to_string();
        let timeout_ms = u64::try_from(request.timeout.as_millis()).unwrap_or(u64::MAX);
        let params = [
            ("inboxId", target.clone()),
            ("timeout", timeout_ms.to_string()),
            ("unreadOnly", request.unread_only.to_string()),
        ];

        debug!(
            inbox_id = %request.inbox_id,
            timeout_ms,
            unread_only = request.unread_only,
            "waiting for latest email"
        );

        let http_request = self
            .http
            .get(self.url("/waitForLatestEmail"))
            .query(&params)
            .timeout(request.timeout.saturating_add(self.wait_slack));

        let timed_out = || Error::Timeout {
            inbox_id: request.inbox_id,
            timeout: request.timeout,
        };

        let started = Instant::now();
        let response = match self
            .send("wait_for_latest_email", &target, http_request)
            .await
        {
            Ok(response) => response,
            // A failed connect is a transport error, whatever its cause.
            Err(Error::Request { source, .. })
                if source.is_timeout()
                    && !source.is_connect()
                    && started.elapsed() >= request.timeout =>
            {
                return Err(timed_out());
            }
            Err(Error::Status { status, .. }) if status == StatusCode::REQUEST_TIMEOUT.as_u16() => {
                return Err(timed_out());
            }
            Err(err) => return Err(err),
        };

        let email: Email = Self::decode("wait_for_latest_email", &target, response).await?;
        if request.unread_only && email.read {
            warn!(email_id = %email.id, "service returned a read email for an unread-only wait");
        }
        Ok(email)
    }

    /// Send a request with the default per-request timeout.
    async fn execute(
        &self,
        operation: &'static str,
        target: &str,
        request: RequestBuilder,
    ) -> Result<Response> {
        self.send(operation, target, request.timeout(self.request_timeout))
            .await
    }

    /// Common send pattern: auth headers, transport errors, status check.
    async fn send(
        &self,
        operation: &'static str,
        target: &str,
        request: RequestBuilder,
    ) -> Result<Response> {
        let response = request
            .headers(self.headers())
            .send()
            .await
            .map_err(|source| Error::Request {
                operation,
                target: target.to_string(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(operation, resource = target, status = status.as_u16(), "request failed");
        Err(Error::Status {
            operation,
            target: target.to_string(),
            status: status.as_u16(),
            body,
        })
    }

    /// Read the body and parse it as JSON.
    async fn decode<T: DeserializeOwned>(
        operation: &'static str,
        target: &str,
        response: Response,
    ) -> Result<T> {
        let text = response.text().await.map_err(|source| Error::Request {
            operation,
            target: target.to_string(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| Error::Json {
            operation,
            target: target.to_string(),
            source,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build headers for API requests.
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, self.api_key.clone());
        if let Ok(value) = HeaderValue::from_str(&self.user_agent) {
            headers.insert(USER_AGENT, value);
        }
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }
}

const API_KEY_HEADER: &str = "x-api-key";
const BASE_URL: &str = "https://api.mailslurp.com";
const USER_AGENT_VALUE: &str = concat!("mailslurp-client-rs/", env!("CARGO_PKG_VERSION"));
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_WAIT_SLACK: Duration = Duration::from_secs(5);

/// Builder for configuring a MailSlurp client.
///
/// Start with [`Client::builder`] to override defaults.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    api_key: Option<String>,
    proxy: Option<String>,
    danger_accept_invalid_certs: bool,
    user_agent: String,
    base_url: String,
    connect_timeout: Duration,
    request_timeout: Duration,
    wait_slack: Duration,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    /// Create a new builder with default settings.
    ///
    /// Defaults:
    /// - No API key (must be set before [`ClientBuilder::build`])
    /// - No proxy
    /// - `danger_accept_invalid_certs = false`
    /// - Crate user agent
    /// - `https://api.mailslurp.com`
    /// - 30s connect and request timeouts, 5s wait slack
    pub fn new() -> Self {
        Self {
            api_key: None,
            proxy: None,
            danger_accept_invalid_certs: false,
            user_agent: USER_AGENT_VALUE.to_string(),
            base_url: BASE_URL.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            wait_slack: DEFAULT_WAIT_SLACK,
        }
    }

    /// Set the API key sent with every request.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set a proxy URL (e.g., "http://127.0.0.1:8080").
    ///
    /// This uses reqwest's proxy support for all requests.
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Control whether to accept invalid TLS certificates (default: false).
    pub fn danger_accept_invalid_certs(mut self, value: bool) -> Self {
        self.danger_accept_invalid_certs = value;
        self
    }

    /// Override the default user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Override the API base URL.
    ///
    /// Useful for testing against a mock server.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Connection establishment timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Timeout for every request except server-side waits.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Extra time granted to a server-side wait beyond its own timeout.
    pub fn wait_slack(mut self, slack: Duration) -> Self {
        self.wait_slack = slack;
        self
    }

    /// Build the client.
    ///
    /// Fails with [`Error::MissingApiKey`] if no non-empty key was set.
    ///
    /// # Examples
    /// ```no_run
    /// # use mailslurp_client::Client;
    /// # fn main() -> Result<(), mailslurp_client::Error> {
    /// let client = Client::builder()
    ///     .api_key("your-api-key")
    ///     .user_agent("my-app/1.0")
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(self) -> Result<Client> {
        let api_key = self
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or(Error::MissingApiKey)?;
        let mut api_key =
            HeaderValue::from_str(api_key.trim()).map_err(|_| Error::InvalidApiKey)?;
        api_key.set_sensitive(true);

        let mut builder = reqwest::Client::builder()
            .danger_accept_invalid_certs(self.danger_accept_invalid_certs)
            .connect_timeout(self.connect_timeout);

        if let Some(proxy_url) = &self.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url).map_err(Error::Build)?);
        }

        let http = builder.build().map_err(Error::Build)?;

        Ok(Client {
            http,
            api_key,
            proxy: self.proxy,
            user_agent: self.user_agent,
            base_url: self.base_url,
            request_timeout: self.request_timeout,
            wait_slack: self.wait_slack,
        })
    }
}
