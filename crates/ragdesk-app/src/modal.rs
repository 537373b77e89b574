// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Parameters handed to the component shown in a modal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModalProps(BTreeMap<String, Value>);

impl ModalProps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_owned(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl FromIterator<(String, Value)> for ModalProps {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One shared modal slot. Opening replaces whatever was shown before; there
/// is no stack. `C` is whatever handle the renderer uses to pick a view.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalController<C> {
    visible: bool,
    component: Option<C>,
    props: ModalProps,
}

impl<C> Default for ModalController<C> {
    fn default() -> Self {
        Self {
            visible: false,
            component: None,
            props: ModalProps::default(),
        }
    }
}

impl<C> ModalController<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, component: C, props: ModalProps) {
        self.component = Some(component);
        self.props = props;
        self.visible = true;
    }

    pub fn open_default(&mut self, component: C) {
        self.open(component, ModalProps::default());
    }

    // Component and props stay behind until the next open.
    pub fn close(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn component(&self) -> Option<&C> {
        self.component.as_ref()
    }

    pub fn props(&self) -> &ModalProps {
        &self.props
    }

    /// What a renderer should draw right now, if anything.
    pub fn active(&self) -> Option<(&C, &ModalProps)> {
        if !self.visible {
            return None;
        }
        self.component.as_ref().map(|component| (component, &self.props))
    }
}
