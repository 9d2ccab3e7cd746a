use anyhow::{Context, anyhow};
use serde::de::DeserializeOwned;
use serde_json::json;
use url::Url;

use crate::domain::chat::ChatSummary;
use crate::domain::email::EmailMessage;
use crate::domain::page::Page;
use crate::error::GraphError;
use crate::graph::transport::HttpTransport;

/// Mailbox-scoped Graph calls made with one app-only bearer token.
pub struct GraphClient<T> {
    transport: T,
    base_url: Url,
    user_email: String,
    access_token: String,
    page_size: Option<u32>,
    max_pages: Option<u32>,
}

impl<T: HttpTransport> GraphClient<T> {
    pub fn new(
        transport: T,
        base_url: &str,
        user_email: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self, GraphError> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("invalid Graph base URL '{base_url}'"))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("Graph base URL '{base_url}' cannot carry a path").into());
        }
        Ok(Self {
            transport,
            base_url,
            user_email: user_email.into(),
            access_token: access_token.into(),
            page_size: None,
            max_pages: None,
        })
    }

    /// `$top` for the first request of each listing.
    pub fn with_page_size(mut self, page_size: Option<u32>) -> Self {
        self.page_size = page_size.filter(|n| *n > 0);
        self
    }

    /// Stop following next links after this many pages. `None` or 0 = unlimited.
    pub fn with_max_pages(mut self, max_pages: Option<u32>) -> Self {
        self.max_pages = max_pages.filter(|n| *n > 0);
        self
    }

    pub fn user_email(&self) -> &str {
        &self.user_email
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn user_endpoint(&self, collection: &str) -> Result<Url, GraphError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Graph base URL '{}' cannot carry a path", self.base_url))?
            .pop_if_empty()
            .extend(["users", self.user_email.as_str(), collection]);
        Ok(url)
    }

    fn listing_endpoint(&self, collection: &str) -> Result<Url, GraphError> {
        let mut url = self.user_endpoint(collection)?;
        if let Some(top) = self.page_size {
            url.set_query(Some(&format!("$top={top}")));
        }
        Ok(url)
    }

    /// GETs `start` and every `@odata.nextLink` after it, concatenating each
    /// page's `value` array.
    pub fn fetch_paginated<R: DeserializeOwned>(
        &self,
        start: &str,
        operation: &'static str,
    ) -> Result<Vec<R>, GraphError> {
        let mut items = Vec::new();
        let mut next = Some(start.to_string());
        let mut pages = 0u32;

        while let Some(url) = next.take() {
            if let Some(cap) = self.max_pages
                && pages >= cap
            {
                log::warn!("{operation}: stopping after {cap} page(s), more results available");
                break;
            }

            log::debug!("GET {url}");
            let reply = self.transport.get(&url, &self.access_token)?;
            if reply.status != 200 {
                return Err(GraphError::RemoteApi {
                    operation,
                    status: reply.status,
                    body: reply.body,
                });
            }

            let page: Page<R> = serde_json::from_str(&reply.body)
                .with_context(|| format!("{operation}: malformed page {}", pages + 1))?;
            pages += 1;
            items.extend(page.value);
            next = page.next_link;
        }

        log::debug!("{operation}: {} item(s) over {pages} page(s)", items.len());
        Ok(items)
    }

    pub fn list_messages(&self) -> Result<Vec<EmailMessage>, GraphError> {
        let url = self.listing_endpoint("messages")?;
        self.fetch_paginated(url.as_str(), "fetching emails")
    }

    pub fn list_chats(&self) -> Result<Vec<ChatSummary>, GraphError> {
        let url = self.listing_endpoint("chats")?;
        self.fetch_paginated(url.as_str(), "fetching chats")
    }

    /// One POST to `sendMail`; Graph answers 202 Accepted on success.
    pub fn send_mail(
        &self,
        subject: &str,
        body: &str,
        recipients: &[String],
    ) -> Result<(), GraphError> {
        if recipients.is_empty() {
            return Err(anyhow!("sending email: at least one recipient is required").into());
        }

        let url = self.user_endpoint("sendMail")?;
        let payload = build_send_payload(subject, body, recipients);

        log::debug!("POST {url} ({} recipient(s))", recipients.len());
        let reply = self
            .transport
            .post_json(url.as_str(), &self.access_token, &payload)?;
        if reply.status != 202 {
            return Err(GraphError::RemoteApi {
                operation: "sending email",
                status: reply.status,
                body: reply.body,
            });
        }

        log::info!("sent '{subject}' to {} recipient(s)", recipients.len());
        Ok(())
    }
}

pub fn build_send_payload(subject: &str, body: &str, recipients: &[String]) -> serde_json::Value {
    let to_list: Vec<serde_json::Value> = recipients
        .iter()
        .map(|addr| json!({ "emailAddress": { "address": addr } }))
        .collect();

    json!({
        "message": {
            "subject": subject,
            "body": {
                "contentType": "Text",
                "content": body
            },
            "toRecipients": to_list
        },
        "saveToSentItems": true
    })
}
