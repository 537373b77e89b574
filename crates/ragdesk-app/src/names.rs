// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! name_type {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

name_type!(CollectionName);
name_type!(DocumentSource);
name_type!(LlmSource);
name_type!(ModelName);
name_type!(ModeName);

impl LlmSource {
    pub const GROQ: &'static str = "Groq";
    pub const OLLAMA: &'static str = "Ollama";
    pub const LM_STUDIO: &'static str = "LM Studio";

    pub fn is_groq(&self) -> bool {
        self.0.eq_ignore_ascii_case(Self::GROQ)
    }

    pub fn is_ollama(&self) -> bool {
        self.0.eq_ignore_ascii_case(Self::OLLAMA)
    }
}

impl ModeName {
    pub const RAG: &'static str = "RAG";

    pub fn rag() -> Self {
        Self::new(Self::RAG)
    }
}

pub fn names_from<T, S>(values: &[S]) -> Vec<T>
where
    T: From<String>,
    S: AsRef<str>,
{
    values
        .iter()
        .map(|value| T::from(value.as_ref().to_owned()))
        .collect()
}
