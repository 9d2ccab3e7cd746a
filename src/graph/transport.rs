use anyhow::{Context, Result};
use reqwest::blocking::Client;
use std::time::Duration;

/// Status and raw body of a completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

/// The two verbs the Graph client needs. Non-2xx statuses are replies, not errors.
pub trait HttpTransport {
    fn get(&self, url: &str, bearer: &str) -> Result<HttpReply>;
    fn post_json(&self, url: &str, bearer: &str, payload: &serde_json::Value)
    -> Result<HttpReply>;
}

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("building HTTP client")?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, url: &str, bearer: &str) -> Result<HttpReply> {
        let res = self
            .client
            .get(url)
            .bearer_auth(bearer)
            .send()
            .with_context(|| format!("GET {url} failed"))?;
        let status = res.status().as_u16();
        let body = res.text().context("reading response body")?;
        Ok(HttpReply { status, body })
    }

    fn post_json(
        &self,
        url: &str,
        bearer: &str,
        payload: &serde_json::Value,
    ) -> Result<HttpReply> {
        let res = self
            .client
            .post(url)
            .bearer_auth(bearer)
            .json(payload)
            .send()
            .with_context(|| format!("POST {url} failed"))?;
        let status = res.status().as_u16();
        let body = res.text().context("reading response body")?;
        Ok(HttpReply { status, body })
    }
}
