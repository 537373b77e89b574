// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use serde::Serialize;

use crate::{CollectionName, DocumentSource, LlmSource, ModeName, ModelName, names_from};

pub const DEFAULT_COLLECTION: &str = "ragtest";
pub const DEFAULT_LLM_SOURCE: &str = LlmSource::GROQ;
pub const DEFAULT_LLM_MODEL: &str = "llama-3.3-70b-versatile";

pub const DEFAULT_OLLAMA_MODELS: [&str; 5] = [
    "llama3.2:3b",
    "llama3.1:latest",
    "jmpark333/exaone:latest",
    "koesn/mistral-7b-instruct:latest",
    "koesn/llama3-8b-instruct:latest",
];

pub const DEFAULT_GROQ_MODELS: [&str; 4] = [
    "llama-3.3-70b-versatile",
    "llama-3.1-70b-versatile",
    "Llama-3.1-8b-Instant",
    "Llama3-70b-8192",
];

pub const KEY_SET_MESSAGE: &str = "Groq API key set successfully";
pub const KEY_REJECTED_MESSAGE: &str = "Failed to set Groq API key";
pub const KEY_ERROR_MESSAGE: &str = "Error setting Groq API key";

/// Remote side of the API-key action. Returns the backend's `success` flag;
/// transport and decoding failures come back as `Err`.
pub trait GroqKeyBackend {
    fn register_groq_api_key(&self, api_key: &str) -> Result<bool>;
}

impl<B: GroqKeyBackend + ?Sized> GroqKeyBackend for &B {
    fn register_groq_api_key(&self, api_key: &str) -> Result<bool> {
        (**self).register_groq_api_key(api_key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelInfo {
    pub source: LlmSource,
    pub model: ModelName,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyOutcome {
    pub success: bool,
    pub message: String,
}

impl KeyOutcome {
    fn new(success: bool, message: &str) -> Self {
        Self {
            success,
            message: message.to_owned(),
        }
    }
}

/// Values the store starts from. `Default` matches the built-in catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionDefaults {
    pub collection: Option<CollectionName>,
    pub llm_source: LlmSource,
    pub llm_model: ModelName,
    pub mode: ModeName,
    pub ollama_models: Vec<ModelName>,
    pub groq_models: Vec<ModelName>,
}

impl Default for SelectionDefaults {
    fn default() -> Self {
        Self {
            collection: Some(CollectionName::from(DEFAULT_COLLECTION)),
            llm_source: LlmSource::from(DEFAULT_LLM_SOURCE),
            llm_model: ModelName::from(DEFAULT_LLM_MODEL),
            mode: ModeName::rag(),
            ollama_models: names_from(&DEFAULT_OLLAMA_MODELS),
            groq_models: names_from(&DEFAULT_GROQ_MODELS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionStore {
    current_collection: Option<CollectionName>,
    selected_collections: Vec<CollectionName>,
    selected_sources: Vec<DocumentSource>,
    llm_source: LlmSource,
    llm_model: ModelName,
    ollama_models: Vec<ModelName>,
    groq_models: Vec<ModelName>,
    groq_api_key: Option<String>,
    selected_mode: ModeName,
}

impl Default for SelectionStore {
    fn default() -> Self {
        Self::with_defaults(SelectionDefaults::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Catalog {
    Ollama,
    Groq,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCommand {
    UpdateModelSelection {
        source: LlmSource,
        model: ModelName,
    },
    UpdateLlmInfo {
        source: LlmSource,
        model: ModelName,
    },
    UpdateCurrentLlmSource(LlmSource),
    UpdateCurrentLlmModel(ModelName),
    UpdateSelectedCollections(Vec<CollectionName>),
    UpdateSelectedSources(Vec<DocumentSource>),
    UpdateCurrentCollection(Option<CollectionName>),
    UpdateSelectedMode(ModeName),
    SetOllamaModels(Vec<ModelName>),
    SetGroqModels(Vec<ModelName>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    LlmSourceChanged(LlmSource),
    LlmModelChanged(ModelName),
    CollectionsChanged(Vec<CollectionName>),
    CurrentCollectionChanged(Option<CollectionName>),
    SourcesChanged(Vec<DocumentSource>),
    ModeChanged(ModeName),
    CatalogReplaced(Catalog, usize),
    GroqApiKeyStored,
}

/// Serializable view of the store. The API key itself is never exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionSnapshot {
    pub current_collection: Option<CollectionName>,
    pub selected_collections: Vec<CollectionName>,
    pub selected_sources: Vec<DocumentSource>,
    pub llm_source: LlmSource,
    pub llm_model: ModelName,
    pub ollama_models: Vec<ModelName>,
    pub groq_models: Vec<ModelName>,
    pub has_groq_api_key: bool,
    pub selected_mode: ModeName,
}

impl SelectionStore {
    pub fn with_defaults(defaults: SelectionDefaults) -> Self {
        Self {
            current_collection: defaults.collection,
            selected_collections: Vec::new(),
            selected_sources: Vec::new(),
            llm_source: defaults.llm_source,
            llm_model: defaults.llm_model,
            ollama_models: defaults.ollama_models,
            groq_models: defaults.groq_models,
            groq_api_key: None,
            selected_mode: defaults.mode,
        }
    }

    pub fn dispatch(&mut self, command: StoreCommand) -> Vec<StoreEvent> {
        match command {
            StoreCommand::UpdateModelSelection { source, model }
            | StoreCommand::UpdateLlmInfo { source, model } => {
                vec![self.set_llm_source(source), self.set_llm_model(model)]
            }
            StoreCommand::UpdateCurrentLlmSource(source) => vec![self.set_llm_source(source)],
            StoreCommand::UpdateCurrentLlmModel(model) => vec![self.set_llm_model(model)],
            StoreCommand::UpdateSelectedCollections(collections) => {
                self.current_collection = collections.first().cloned();
                self.selected_collections = collections;
                vec![
                    StoreEvent::CollectionsChanged(self.selected_collections.clone()),
                    StoreEvent::CurrentCollectionChanged(self.current_collection.clone()),
                ]
            }
            StoreCommand::UpdateSelectedSources(sources) => {
                self.selected_sources = sources;
                vec![StoreEvent::SourcesChanged(self.selected_sources.clone())]
            }
            StoreCommand::UpdateCurrentCollection(collection) => {
                self.current_collection = collection;
                vec![StoreEvent::CurrentCollectionChanged(
                    self.current_collection.clone(),
                )]
            }
            StoreCommand::UpdateSelectedMode(mode) => {
                self.selected_mode = mode;
                vec![StoreEvent::ModeChanged(self.selected_mode.clone())]
            }
            StoreCommand::SetOllamaModels(models) => {
                self.ollama_models = models;
                vec![StoreEvent::CatalogReplaced(
                    Catalog::Ollama,
                    self.ollama_models.len(),
                )]
            }
            StoreCommand::SetGroqModels(models) => {
                self.groq_models = models;
                vec![StoreEvent::CatalogReplaced(
                    Catalog::Groq,
                    self.groq_models.len(),
                )]
            }
        }
    }

    /// Registers `api_key` with the backend and stores it only when the
    /// backend acknowledges it. Failures never escape as errors.
    pub fn set_groq_api_key<B: GroqKeyBackend>(
        &mut self,
        backend: &B,
        api_key: &str,
    ) -> (KeyOutcome, Vec<StoreEvent>) {
        match backend.register_groq_api_key(api_key) {
            Ok(true) => {
                self.groq_api_key = Some(api_key.to_owned());
                tracing::info!("groq api key accepted by backend");
                (
                    KeyOutcome::new(true, KEY_SET_MESSAGE),
                    vec![StoreEvent::GroqApiKeyStored],
                )
            }
            Ok(false) => {
                tracing::warn!("backend rejected groq api key");
                (KeyOutcome::new(false, KEY_REJECTED_MESSAGE), Vec::new())
            }
            Err(error) => {
                tracing::error!(error = %format!("{error:#}"), "error setting groq api key");
                (KeyOutcome::new(false, KEY_ERROR_MESSAGE), Vec::new())
            }
        }
    }

    pub fn current_collection(&self) -> Option<&CollectionName> {
        self.current_collection.as_ref()
    }

    pub fn selected_collections(&self) -> &[CollectionName] {
        &self.selected_collections
    }

    pub fn selected_sources(&self) -> &[DocumentSource] {
        tracing::debug!(sources = ?self.selected_sources, "reading selected sources");
        &self.selected_sources
    }

    pub fn selected_mode(&self) -> &ModeName {
        &self.selected_mode
    }

    pub fn llm_source(&self) -> &LlmSource {
        &self.llm_source
    }

    pub fn llm_model(&self) -> &ModelName {
        &self.llm_model
    }

    pub fn current_model_info(&self) -> ModelInfo {
        ModelInfo {
            source: self.llm_source.clone(),
            model: self.llm_model.clone(),
        }
    }

    pub fn ollama_models(&self) -> &[ModelName] {
        &self.ollama_models
    }

    pub fn groq_models(&self) -> &[ModelName] {
        &self.groq_models
    }

    /// Catalog offered for `source`; empty for providers without one.
    pub fn models_for(&self, source: &LlmSource) -> &[ModelName] {
        if source.is_groq() {
            &self.groq_models
        } else if source.is_ollama() {
            &self.ollama_models
        } else {
            &[]
        }
    }

    pub fn groq_api_key(&self) -> Option<&str> {
        self.groq_api_key.as_deref()
    }

    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            current_collection: self.current_collection.clone(),
            selected_collections: self.selected_collections.clone(),
            selected_sources: self.selected_sources.clone(),
            llm_source: self.llm_source.clone(),
            llm_model: self.llm_model.clone(),
            ollama_models: self.ollama_models.clone(),
            groq_models: self.groq_models.clone(),
            has_groq_api_key: self.groq_api_key.is_some(),
            selected_mode: self.selected_mode.clone(),
        }
    }

    fn set_llm_source(&mut self, source: LlmSource) -> StoreEvent {
        self.llm_source = source;
        StoreEvent::LlmSourceChanged(self.llm_source.clone())
    }

    fn set_llm_model(&mut self, model: ModelName) -> StoreEvent {
        self.llm_model = model;
        StoreEvent::LlmModelChanged(self.llm_model.clone())
    }
}
