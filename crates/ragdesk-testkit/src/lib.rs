// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use ragdesk_app::{CollectionName, DocumentSource, GroqKeyBackend, ModelName};
use std::cell::RefCell;
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendReply {
    Accept,
    Reject,
    Fail(String),
}

/// Key backend that answers from a queue and remembers every key it saw.
/// An exhausted queue fails like a dropped connection.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    replies: RefCell<VecDeque<BackendReply>>,
    submitted: RefCell<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new(replies: impl IntoIterator<Item = BackendReply>) -> Self {
        Self {
            replies: RefCell::new(replies.into_iter().collect()),
            submitted: RefCell::new(Vec::new()),
        }
    }

    pub fn accepting() -> Self {
        Self::new([BackendReply::Accept])
    }

    pub fn rejecting() -> Self {
        Self::new([BackendReply::Reject])
    }

    pub fn failing(reason: &str) -> Self {
        Self::new([BackendReply::Fail(reason.to_owned())])
    }

    pub fn submitted(&self) -> Vec<String> {
        self.submitted.borrow().clone()
    }

    pub fn remaining(&self) -> usize {
        self.replies.borrow().len()
    }
}

impl GroqKeyBackend for ScriptedBackend {
    fn register_groq_api_key(&self, api_key: &str) -> Result<bool> {
        self.submitted.borrow_mut().push(api_key.to_owned());
        match self.replies.borrow_mut().pop_front() {
            Some(BackendReply::Accept) => Ok(true),
            Some(BackendReply::Reject) => Ok(false),
            Some(BackendReply::Fail(reason)) => Err(anyhow!(reason)),
            None => Err(anyhow!("scripted backend has no reply left")),
        }
    }
}

pub fn collections(names: &[&str]) -> Vec<CollectionName> {
    names.iter().map(|name| CollectionName::from(*name)).collect()
}

pub fn sources(names: &[&str]) -> Vec<DocumentSource> {
    names.iter().map(|name| DocumentSource::from(*name)).collect()
}

pub fn models(names: &[&str]) -> Vec<ModelName> {
    names.iter().map(|name| ModelName::from(*name)).collect()
}
