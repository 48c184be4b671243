//! Host JSON shape of field descriptors.
//!
//! Attributes the domain does not model are kept in `extra` so a descriptor
//! passed through the render hook comes back with everything the host sent.

use fieldgate_core::{AppError, NonEmptyString};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::{FieldDescriptor, FieldKind, FlexibleLayout, WysiwygToolbar};

#[derive(Debug, Deserialize)]
pub(super) struct FieldWire {
    key: String,
    #[serde(rename = "type")]
    field_type: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    instructions: Option<String>,
    #[serde(default)]
    sub_fields: Option<Value>,
    #[serde(default)]
    layouts: Option<Value>,
    #[serde(default)]
    min: Option<Value>,
    #[serde(default)]
    max: Option<Value>,
    #[serde(default)]
    toolbar: Option<Value>,
    #[serde(default)]
    uploader_disabled: Option<Value>,
    #[serde(default, rename = "readonly")]
    read_only: Option<Value>,
    #[serde(default)]
    disabled: Option<Value>,
    #[serde(default)]
    wrapper: Option<Map<String, Value>>,
    #[serde(default)]
    value: Option<Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub(super) struct FieldWireOut {
    key: String,
    name: String,
    label: String,
    #[serde(rename = "type")]
    field_type: String,
    instructions: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sub_fields: Option<Vec<FieldDescriptor>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    layouts: Option<LayoutsOut>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    toolbar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    uploader_disabled: Option<bool>,
    #[serde(rename = "readonly")]
    read_only: bool,
    disabled: bool,
    #[serde(skip_serializing_if = "Map::is_empty")]
    wrapper: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Layouts are sent back in the shape the host used.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(super) enum LayoutsOut {
    List(Vec<FlexibleLayout>),
    Keyed(BTreeMap<String, FlexibleLayout>),
}

impl TryFrom<FieldWire> for FieldDescriptor {
    type Error = AppError;

    fn try_from(wire: FieldWire) -> Result<Self, Self::Error> {
        let key = NonEmptyString::new(wire.key)
            .map_err(|_| AppError::Validation("field key must not be empty".to_owned()))?;
        let mut extra = wire.extra;
        let mut min = wire.min;
        let mut max = wire.max;
        let mut toolbar = wire.toolbar;
        let mut uploader_disabled = wire.uploader_disabled;
        let mut sub_fields = wire.sub_fields;
        let mut layouts = wire.layouts;
        let mut keyed_layouts = false;

        let kind = match wire.field_type.as_str() {
            "group" => FieldKind::Group {
                sub_fields: parse_sub_fields(&key, sub_fields.take())?,
            },
            "tab" => FieldKind::Tab,
            "repeater" => FieldKind::Repeater {
                sub_fields: parse_sub_fields(&key, sub_fields.take())?,
                min: take_u32(&mut min),
                max: take_u32(&mut max),
            },
            "flexible_content" => {
                keyed_layouts = matches!(layouts, Some(Value::Object(_)));
                FieldKind::FlexibleContent {
                    layouts: parse_layouts(&key, layouts.take())?,
                }
            }
            "image" => FieldKind::Image {
                uploader_disabled: uploader_disabled
                    .take()
                    .as_ref()
                    .is_some_and(lenient_bool),
            },
            "wysiwyg" => FieldKind::Wysiwyg {
                toolbar: match toolbar.take() {
                    Some(Value::String(name)) => WysiwygToolbar::from_host(name.as_str()),
                    unparsed => {
                        toolbar = unparsed;
                        WysiwygToolbar::Full
                    }
                },
            },
            "link" => FieldKind::Link,
            "button" => FieldKind::Button,
            "text" => FieldKind::Text,
            other => FieldKind::Other {
                type_name: NonEmptyString::new(other).map_err(|_| {
                    AppError::Validation(format!("field '{key}' must declare a type"))
                })?,
            },
        };

        for (name, leftover) in [
            ("min", min),
            ("max", max),
            ("toolbar", toolbar),
            ("uploader_disabled", uploader_disabled),
            ("sub_fields", sub_fields),
            ("layouts", layouts),
        ] {
            if let Some(leftover) = leftover {
                extra.insert(name.to_owned(), leftover);
            }
        }

        let mut wrapper_attributes = wire.wrapper.unwrap_or_default();
        let wrapper_classes = match wrapper_attributes.remove("class") {
            Some(Value::String(classes)) => classes.split_whitespace().map(str::to_owned).collect(),
            _ => Vec::new(),
        };

        Ok(Self {
            key,
            name: wire.name.unwrap_or_default(),
            label: wire.label.unwrap_or_default(),
            instructions: wire.instructions.unwrap_or_default(),
            kind,
            read_only: wire.read_only.as_ref().is_some_and(lenient_bool),
            disabled: wire.disabled.as_ref().is_some_and(lenient_bool),
            wrapper_classes,
            wrapper_attributes,
            value: wire.value,
            extra,
            keyed_layouts,
        })
    }
}

impl From<FieldDescriptor> for FieldWireOut {
    fn from(descriptor: FieldDescriptor) -> Self {
        let field_type = descriptor.kind.type_name().to_owned();
        let mut out = Self {
            key: descriptor.key.into(),
            name: descriptor.name,
            label: descriptor.label,
            field_type,
            instructions: descriptor.instructions,
            sub_fields: None,
            layouts: None,
            min: None,
            max: None,
            toolbar: None,
            uploader_disabled: None,
            read_only: descriptor.read_only,
            disabled: descriptor.disabled,
            wrapper: descriptor.wrapper_attributes,
            value: descriptor.value,
            extra: descriptor.extra,
        };

        if !descriptor.wrapper_classes.is_empty() {
            out.wrapper.insert(
                "class".to_owned(),
                Value::String(descriptor.wrapper_classes.join(" ")),
            );
        }

        match descriptor.kind {
            FieldKind::Group { sub_fields } => out.sub_fields = Some(sub_fields),
            FieldKind::Repeater {
                sub_fields,
                min,
                max,
            } => {
                out.sub_fields = Some(sub_fields);
                out.min = min;
                out.max = max;
            }
            FieldKind::FlexibleContent { layouts } => {
                out.layouts = Some(if descriptor.keyed_layouts {
                    LayoutsOut::Keyed(
                        layouts
                            .into_iter()
                            .map(|layout| {
                                let host_key = layout
                                    .host_key
                                    .clone()
                                    .unwrap_or_else(|| layout.key.clone());
                                (host_key, layout)
                            })
                            .collect(),
                    )
                } else {
                    LayoutsOut::List(layouts)
                });
            }
            FieldKind::Image { uploader_disabled } => out.uploader_disabled = Some(uploader_disabled),
            FieldKind::Wysiwyg { toolbar } => {
                // An unparsed host toolbar is echoed back until a lockdown replaces it.
                if toolbar != WysiwygToolbar::Full || !out.extra.contains_key("toolbar") {
                    out.toolbar = Some(toolbar.as_str().to_owned());
                }
            }
            FieldKind::Tab
            | FieldKind::Link
            | FieldKind::Button
            | FieldKind::Text
            | FieldKind::Other { .. } => {}
        }

        for (name, typed) in [
            ("min", out.min.is_some()),
            ("max", out.max.is_some()),
            ("toolbar", out.toolbar.is_some()),
        ] {
            if typed {
                out.extra.remove(name);
            }
        }

        out
    }
}

fn parse_sub_fields(
    key: &NonEmptyString,
    value: Option<Value>,
) -> Result<Vec<FieldDescriptor>, AppError> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => serde_json::from_value(value).map_err(|error| {
            AppError::Validation(format!("invalid sub_fields for field '{key}': {error}"))
        }),
    }
}

/// Layouts arrive either as a list or as an object keyed by layout key.
fn parse_layouts(
    key: &NonEmptyString,
    value: Option<Value>,
) -> Result<Vec<FlexibleLayout>, AppError> {
    let items: Vec<(Option<String>, Value)> = match value {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items.into_iter().map(|item| (None, item)).collect(),
        Some(Value::Object(items)) => items
            .into_iter()
            .map(|(host_key, item)| (Some(host_key), item))
            .collect(),
        Some(_) => {
            return Err(AppError::Validation(format!(
                "layouts for field '{key}' must be a list or an object"
            )));
        }
    };

    items
        .into_iter()
        .map(|(host_key, item)| {
            serde_json::from_value::<FlexibleLayout>(item)
                .map(|layout| FlexibleLayout { host_key, ..layout })
                .map_err(|error| {
                    AppError::Validation(format!("invalid layout for field '{key}': {error}"))
                })
        })
        .collect()
}

/// Takes a row bound only when it parses; anything else stays with the host's extras.
fn take_u32(slot: &mut Option<Value>) -> Option<u32> {
    let parsed = slot.as_ref().and_then(lenient_u32)?;
    slot.take();
    Some(parsed)
}

fn lenient_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(number) => number.as_u64().and_then(|raw| u32::try_from(raw).ok()),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_bool(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|raw| raw != 0.0),
        Value::String(text) => !matches!(text.trim(), "" | "0" | "false"),
        _ => false,
    }
}
