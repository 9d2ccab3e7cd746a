use anyhow::anyhow;
use std::cell::RefCell;
use std::collections::VecDeque;

use crate::graph::transport::{HttpReply, HttpTransport};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Get(String),
    Post(String, serde_json::Value),
}

/// Replays canned replies in order and records every request.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    replies: RefCell<VecDeque<HttpReply>>,
    calls: RefCell<Vec<Call>>,
    pub(crate) tokens: RefCell<Vec<String>>,
}

impl ScriptedTransport {
    pub(crate) fn with(replies: Vec<(u16, &str)>) -> Self {
        let t = Self::default();
        t.replies
            .borrow_mut()
            .extend(replies.into_iter().map(|(status, body)| HttpReply {
                status,
                body: body.to_string(),
            }));
        t
    }

    fn next_reply(&self) -> anyhow::Result<HttpReply> {
        self.replies
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow!("no scripted reply left"))
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }
}

impl HttpTransport for ScriptedTransport {
    fn get(&self, url: &str, bearer: &str) -> anyhow::Result<HttpReply> {
        self.calls.borrow_mut().push(Call::Get(url.to_string()));
        self.tokens.borrow_mut().push(bearer.to_string());
        self.next_reply()
    }

    fn post_json(
        &self,
        url: &str,
        bearer: &str,
        payload: &serde_json::Value,
    ) -> anyhow::Result<HttpReply> {
        self.calls
            .borrow_mut()
            .push(Call::Post(url.to_string(), payload.clone()));
        self.tokens.borrow_mut().push(bearer.to_string());
        self.next_reply()
    }
}
