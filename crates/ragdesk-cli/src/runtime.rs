// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use ragdesk_app::{
    Action, Catalog, GroqKeyBackend, ModalController, ModalProps, SelectionStore, StoreEvent,
};

pub struct ApiRuntime<'a> {
    client: &'a ragdesk_api::Client,
}

impl<'a> ApiRuntime<'a> {
    pub fn new(client: &'a ragdesk_api::Client) -> Self {
        Self { client }
    }
}

impl GroqKeyBackend for ApiRuntime<'_> {
    fn register_groq_api_key(&self, api_key: &str) -> Result<bool> {
        self.client.set_groq_api_key(api_key)
    }
}

/// Everything one run of the app mutates. Built once at startup and passed
/// to whatever drives it.
pub struct Session<B> {
    pub store: SelectionStore,
    pub modal: ModalController<String>,
    backend: B,
}

impl<B: GroqKeyBackend> Session<B> {
    pub fn new(store: SelectionStore, backend: B) -> Self {
        Self {
            store,
            modal: ModalController::new(),
            backend,
        }
    }

    pub fn apply(&mut self, action: Action) -> Result<Vec<String>> {
        let lines = match action {
            Action::Store(command) => self
                .store
                .dispatch(command)
                .iter()
                .map(describe_event)
                .collect(),
            Action::SetGroqApiKey(api_key) => {
                let (outcome, events) = self.store.set_groq_api_key(&self.backend, &api_key);
                let status = if outcome.success { "ok" } else { "failed" };
                let mut lines = vec![format!("groq api key: {status} ({})", outcome.message)];
                lines.extend(events.iter().map(describe_event));
                lines
            }
            Action::OpenModal { component, props } => {
                let line = format!("modal open: {component} {}", render_props(&props)?);
                self.modal.open(component, props);
                vec![line]
            }
            Action::CloseModal => {
                self.modal.close();
                vec!["modal closed".to_owned()]
            }
            Action::ShowState => {
                let snapshot = serde_json::to_string(&self.store.snapshot())
                    .context("encode state snapshot")?;
                vec![snapshot]
            }
        };
        Ok(lines)
    }
}

fn describe_event(event: &StoreEvent) -> String {
    match event {
        StoreEvent::LlmSourceChanged(source) => format!("llm source: {source}"),
        StoreEvent::LlmModelChanged(model) => format!("llm model: {model}"),
        StoreEvent::CollectionsChanged(collections) => {
            format!("selected collections: {}", join_names(collections))
        }
        StoreEvent::CurrentCollectionChanged(Some(collection)) => {
            format!("current collection: {collection}")
        }
        StoreEvent::CurrentCollectionChanged(None) => "current collection: (none)".to_owned(),
        StoreEvent::SourcesChanged(sources) => {
            format!("selected sources: {}", join_names(sources))
        }
        StoreEvent::ModeChanged(mode) => format!("mode: {mode}"),
        StoreEvent::CatalogReplaced(catalog, count) => {
            let name = match catalog {
                Catalog::Ollama => "ollama",
                Catalog::Groq => "groq",
            };
            format!("{name} models: {count} available")
        }
        StoreEvent::GroqApiKeyStored => "groq api key stored".to_owned(),
    }
}

fn join_names<T: std::fmt::Display>(names: &[T]) -> String {
    if names.is_empty() {
        return "(none)".to_owned();
    }
    names
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_props(props: &ModalProps) -> Result<String> {
    serde_json::to_string(props).context("encode modal props")
}
