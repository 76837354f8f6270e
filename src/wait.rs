//! Waiting for email to arrive.
//!
//! [`Client::wait_for_latest_email`] delegates the wait to the service, which
//! blocks server-side. [`Client::poll_for_latest_email`] is the client-side
//! fallback: a bounded polling loop over the inbox listing with an explicit
//! deadline.

use crate::{Client, Email, EmailPreview, Error, PageOptions, Result};
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

/// Default wait timeout (30 seconds).
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_millis(30_000);

// Deadline used when `now + timeout` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// What to wait for: the latest email in an inbox.
///
/// "Latest" is always the most recently received match. Defaults: 30s
/// timeout, unread only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitRequest {
    /// Inbox to watch.
    pub inbox_id: Uuid,
    /// Upper bound on how long the wait may block.
    pub timeout: Duration,
    /// Only match emails that have not been read yet.
    pub unread_only: bool,
}

impl WaitRequest {
    /// Wait on `inbox_id` with the default timeout, unread only.
    pub fn new(inbox_id: Uuid) -> Self {
        Self {
            inbox_id,
            timeout: DEFAULT_WAIT_TIMEOUT,
            unread_only: true,
        }
    }

    /// Set the wait timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Restrict matches to unread emails (default: true).
    pub fn unread_only(mut self, unread_only: bool) -> Self {
        self.unread_only = unread_only;
        self
    }

    fn matches(&self, preview: &EmailPreview) -> bool {
        !self.unread_only || !preview.read
    }
}

/// Cadence of the client-side polling loop.
///
/// Defaults: 500ms interval, up to 100ms random jitter, 20 emails per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    /// Pause between listing checks.
    pub interval: Duration,
    /// Upper bound on random extra pause added to `interval`.
    pub jitter: Duration,
    /// Listing page size used by each check.
    pub page_size: u32,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
            jitter: Duration::from_millis(100),
            page_size: 20,
        }
    }
}

/// How a polling loop ended, when it did not fail.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum PollOutcome<T> {
    Found(T),
    DeadlineElapsed { attempts: u32 },
    Cancelled,
}

/// `now + timeout`, or a deadline decades away if that overflows.
pub(crate) fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout).unwrap_or_else(|| now + FAR_FUTURE)
}

/// Run `check` until it yields a value, the deadline passes, or `cancel`
/// fires.
///
/// The first check is issued immediately. Later checks are spaced by
/// `interval` plus jitter, clamped so no check starts after the deadline. An
/// in-flight check is abandoned at the deadline. Check errors end the loop.
pub(crate) async fn poll_until<T, F, Fut>(
    deadline: Instant,
    interval: Duration,
    jitter: Duration,
    cancel: &CancellationToken,
    mut check: F,
) -> Result<PollOutcome<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
{
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        let found = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(PollOutcome::Cancelled),
            result = check() => result?,
            _ = time::sleep_until(deadline) => {
                return Ok(PollOutcome::DeadlineElapsed { attempts });
            }
        };

        if let Some(value) = found {
            return Ok(PollOutcome::Found(value));
        }

        let now = Instant::now();
        if now >= deadline {
            return Ok(PollOutcome::DeadlineElapsed { attempts });
        }

        let pause = interval
            .saturating_add(sample_jitter(jitter))
            .min(deadline - now);
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(PollOutcome::Cancelled),
            _ = time::sleep(pause) => {}
        }

        if Instant::now() >= deadline {
            return Ok(PollOutcome::DeadlineElapsed { attempts });
        }
    }
}

fn sample_jitter(max: Duration) -> Duration {
    let max_ms = u64::try_from(max.as_millis()).unwrap_or(u64::MAX);
    if max_ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::rng().random_range(0..=max_ms))
}

impl Client {
    /// Wait for the latest email by polling the inbox listing locally.
    ///
    /// Use this against deployments without server-side blocking waits. The
    /// listing is read newest first, page by page, so the first match is the
    /// latest one; it is then fetched in full (which marks it read).
    pub async fn poll_for_latest_email(
        &self,
        request: &WaitRequest,
        options: PollOptions,
    ) -> Result<Email> {
        self.poll_for_latest_email_with_cancel(request, options, &CancellationToken::new())
            .await
    }

    /// Like [`Client::poll_for_latest_email`], but returns
    /// [`Error::Cancelled`] as soon as `cancel` fires.
    pub async fn poll_for_latest_email_with_cancel(
        &self,
        request: &WaitRequest,
        options: PollOptions,
        cancel: &CancellationToken,
    ) -> Result<Email> {
        let deadline = deadline_after(request.timeout);
        let page_size = options.page_size.max(1);

        debug!(
            inbox_id = %request.inbox_id,
            timeout_ms = u64::try_from(request.timeout.as_millis()).unwrap_or(u64::MAX),
            unread_only = request.unread_only,
            "polling for latest email"
        );

        let check = move || async move {
            self.find_latest_match(request, page_size, deadline).await
        };
        let outcome =
            poll_until(deadline, options.interval, options.jitter, cancel, check).await?;

        match outcome {
            PollOutcome::Found(email_id) => self.get_email(email_id).await,
            PollOutcome::DeadlineElapsed { attempts } => {
                debug!(inbox_id = %request.inbox_id, attempts, "no email before deadline");
                Err(Error::Timeout {
                    inbox_id: request.inbox_id,
                    timeout: request.timeout,
                })
            }
            PollOutcome::Cancelled => Err(Error::Cancelled {
                inbox_id: request.inbox_id,
            }),
        }
    }

    /// Walk the listing newest first until a match or the last page.
    async fn find_latest_match(
        &self,
        request: &WaitRequest,
        page_size: u32,
        deadline: Instant,
    ) -> Result<Option<Uuid>> {
        let mut page = PageOptions::newest_first(page_size);

        loop {
            let listing = self
                .get_inbox_emails_paginated(request.inbox_id, page)
                .await?;

            if let Some(preview) = listing.content.iter().find(|p| request.matches(p)) {
                return Ok(Some(preview.id));
            }

            let next = page.page.saturating_add(1);
            if listing.content.is_empty() || next >= listing.total_pages {
                return Ok(None);
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
            page.page = next;
        }
    }
}
