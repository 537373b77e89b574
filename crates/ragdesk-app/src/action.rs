// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    CollectionName, DocumentSource, LlmSource, ModalProps, ModelName, StoreCommand,
};

pub const ACTION_NAMES: [&str; 14] = [
    "updateModelSelection",
    "updateLlmInfo",
    "updateCurrentLlmSource",
    "updateCurrentLlmModel",
    "updateSelectedCollections",
    "updateSelectedSources",
    "updateCurrentCollection",
    "updateSelectedMode",
    "setOllamaModels",
    "setGroqModels",
    "setGroqApiKey",
    "openModal",
    "closeModal",
    "showState",
];

/// A dispatchable request decoded from its wire name and JSON payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Store(StoreCommand),
    SetGroqApiKey(String),
    OpenModal { component: String, props: ModalProps },
    CloseModal,
    ShowState,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ModelPair {
    source: LlmSource,
    model: ModelName,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct OpenModalPayload {
    component: String,
    #[serde(default)]
    props: ModalProps,
}

impl Action {
    pub fn parse(name: &str, payload: &Value) -> Result<Self> {
        let action = match name {
            "updateModelSelection" => {
                let pair: ModelPair = decode(name, payload)?;
                Self::Store(StoreCommand::UpdateModelSelection {
                    source: pair.source,
                    model: pair.model,
                })
            }
            "updateLlmInfo" => {
                let pair: ModelPair = decode(name, payload)?;
                Self::Store(StoreCommand::UpdateLlmInfo {
                    source: pair.source,
                    model: pair.model,
                })
            }
            "updateCurrentLlmSource" => Self::Store(StoreCommand::UpdateCurrentLlmSource(
                decode::<LlmSource>(name, payload)?,
            )),
            "updateCurrentLlmModel" => Self::Store(StoreCommand::UpdateCurrentLlmModel(
                decode::<ModelName>(name, payload)?,
            )),
            "updateSelectedCollections" => Self::Store(StoreCommand::UpdateSelectedCollections(
                decode::<Vec<CollectionName>>(name, payload)?,
            )),
            "updateSelectedSources" => Self::Store(StoreCommand::UpdateSelectedSources(
                decode::<Vec<DocumentSource>>(name, payload)?,
            )),
            "updateCurrentCollection" => Self::Store(StoreCommand::UpdateCurrentCollection(
                decode::<Option<CollectionName>>(name, payload)?,
            )),
            "updateSelectedMode" => {
                Self::Store(StoreCommand::UpdateSelectedMode(decode(name, payload)?))
            }
            "setOllamaModels" => Self::Store(StoreCommand::SetOllamaModels(decode(name, payload)?)),
            "setGroqModels" => Self::Store(StoreCommand::SetGroqModels(decode(name, payload)?)),
            "setGroqApiKey" => {
                let Some(api_key) = payload.as_str() else {
                    bail!("invalid payload for setGroqApiKey: expected a JSON string");
                };
                Self::SetGroqApiKey(api_key.to_owned())
            }
            "openModal" => {
                let open: OpenModalPayload = decode(name, payload)?;
                Self::OpenModal {
                    component: open.component,
                    props: open.props,
                }
            }
            "closeModal" => {
                expect_no_payload(name, payload)?;
                Self::CloseModal
            }
            "showState" => {
                expect_no_payload(name, payload)?;
                Self::ShowState
            }
            unknown => bail!(
                "unknown action {unknown:?}; supported actions: {}",
                ACTION_NAMES.join(", ")
            ),
        };
        Ok(action)
    }

    /// Parses one script line: `<name> [json payload]`.
    pub fn parse_line(line: &str) -> Result<Self> {
        let trimmed = line.trim();
        let (name, raw_payload) = match trimmed.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (trimmed, ""),
        };
        if name.is_empty() {
            bail!("empty action line");
        }

        let payload = if raw_payload.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(raw_payload)
                .with_context(|| format!("payload for {name} is not valid JSON"))?
        };
        Self::parse(name, &payload)
    }
}

fn decode<T: DeserializeOwned>(name: &str, payload: &Value) -> Result<T> {
    T::deserialize(payload).with_context(|| format!("invalid payload for {name}"))
}

fn expect_no_payload(name: &str, payload: &Value) -> Result<()> {
    if !payload.is_null() {
        bail!("{name} takes no payload");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Action;
    use crate::{CollectionName, LlmSource, ModalProps, ModelName, StoreCommand};
    use anyhow::Result;
    use serde_json::json;

    #[test]
    fn parses_model_selection_pair() -> Result<()> {
        let action = Action::parse(
            "updateModelSelection",
            &json!({"source": "Groq", "model": "X"}),
        )?;
        assert_eq!(
            action,
            Action::Store(StoreCommand::UpdateModelSelection {
                source: LlmSource::from("Groq"),
                model: ModelName::from("X"),
            })
        );
        Ok(())
    }

    #[test]
    fn pair_missing_model_is_rejected() {
        let error = Action::parse("updateLlmInfo", &json!({"source": "Groq"}))
            .expect_err("missing model should fail");
        assert!(error.to_string().contains("invalid payload for updateLlmInfo"));
    }

    #[test]
    fn list_with_non_string_element_is_rejected() {
        let error = Action::parse("updateSelectedCollections", &json!(["a", 1]))
            .expect_err("numeric element should fail");
        assert!(error.to_string().contains("updateSelectedCollections"));
    }

    #[test]
    fn current_collection_accepts_null() -> Result<()> {
        let cleared = Action::parse("updateCurrentCollection", &json!(null))?;
        assert_eq!(
            cleared,
            Action::Store(StoreCommand::UpdateCurrentCollection(None))
        );

        let set = Action::parse("updateCurrentCollection", &json!("docs"))?;
        assert_eq!(
            set,
            Action::Store(StoreCommand::UpdateCurrentCollection(Some(
                CollectionName::from("docs")
            )))
        );
        Ok(())
    }

    #[test]
    fn unknown_action_lists_supported_names() {
        let error = Action::parse("SET_SELECTED_MODE", &json!("RAG"))
            .expect_err("unknown action should fail");
        let message = error.to_string();
        assert!(message.contains("unknown action"));
        assert!(message.contains("updateSelectedMode"));
    }

    #[test]
    fn parse_line_splits_name_and_payload() -> Result<()> {
        let action = Action::parse_line(r#"openModal {"component": "ApiKey", "props": {"x": 1}}"#)?;
        assert_eq!(
            action,
            Action::OpenModal {
                component: "ApiKey".to_owned(),
                props: ModalProps::new().with("x", 1),
            }
        );

        assert_eq!(Action::parse_line("closeModal")?, Action::CloseModal);
        assert_eq!(
            Action::parse_line(r#"setGroqApiKey "gsk-1""#)?,
            Action::SetGroqApiKey("gsk-1".to_owned())
        );
        Ok(())
    }

    #[test]
    fn parse_line_reports_bad_json() {
        let error = Action::parse_line("updateSelectedMode {RAG")
            .expect_err("invalid json should fail");
        assert!(error.to_string().contains("not valid JSON"));
    }

    #[test]
    fn close_modal_rejects_payload() {
        let error =
            Action::parse("closeModal", &json!({"x": 1})).expect_err("payload should fail");
        assert!(error.to_string().contains("takes no payload"));
    }

    #[test]
    fn bad_api_key_payload_is_not_echoed() {
        for line in [
            r#"setGroqApiKey {"apiKey":"gsk-TOPSECRET"}"#,
            r#"setGroqApiKey ["gsk-TOPSECRET"]"#,
        ] {
            let error = Action::parse_line(line).expect_err("non-string key should fail");
            let message = format!("{error:#}");
            assert!(message.contains("setGroqApiKey"), "unexpected message: {message}");
            assert!(!message.contains("TOPSECRET"), "key leaked: {message}");
        }
    }

    #[test]
    fn invalid_payload_errors_omit_payload_contents() {
        let error = Action::parse("updateCurrentLlmModel", &json!({"secret": "hunter2"}))
            .expect_err("object model should fail");
        assert!(!format!("{error:#}").contains("hunter2"));
    }
}
