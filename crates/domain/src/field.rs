use fieldgate_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

mod wire;

/// Wrapper class marking a field whose inputs must be disabled by the form renderer.
pub const DISABLED_FIELD_CLASS: &str = "acf-disabled-field";

/// Wrapper class marking link and button fields whose edit affordances must be removed.
pub const LINK_BUTTON_DISABLED_CLASS: &str = "link-button-disabled";

/// Toolbar presets offered by rich-text fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WysiwygToolbar {
    /// Full editing toolbar.
    Full,
    /// Minimal toolbar used for read-only presentation.
    Basic,
    /// Custom toolbar registered by the host.
    Custom(String),
}

impl WysiwygToolbar {
    /// Returns the host value for the toolbar preset.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Full => "full",
            Self::Basic => "basic",
            Self::Custom(name) => name.as_str(),
        }
    }

    fn from_host(value: &str) -> Self {
        match value {
            "" | "full" => Self::Full,
            "basic" => Self::Basic,
            other => Self::Custom(other.to_owned()),
        }
    }
}

/// Named layout of a flexible-content field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlexibleLayout {
    #[serde(default)]
    key: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    label: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    sub_fields: Vec<FieldDescriptor>,
    #[serde(flatten)]
    extra: Map<String, Value>,
    /// Object key the host filed the layout under, when layouts arrive keyed.
    #[serde(skip)]
    host_key: Option<String>,
}

impl FlexibleLayout {
    /// Creates a layout owning the given sub-fields.
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        label: impl Into<String>,
        sub_fields: Vec<FieldDescriptor>,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            label: label.into(),
            sub_fields,
            extra: Map::new(),
            host_key: None,
        }
    }

    /// Returns the layout key.
    #[must_use]
    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Returns the layout machine name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the layout label, falling back to its name.
    #[must_use]
    pub fn label(&self) -> &str {
        if self.label.trim().is_empty() {
            self.name.as_str()
        } else {
            self.label.as_str()
        }
    }

    /// Returns the fields owned by the layout.
    #[must_use]
    pub fn sub_fields(&self) -> &[FieldDescriptor] {
        &self.sub_fields
    }
}

/// Field kind with the payload each kind carries.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Container rendering its sub-fields inline.
    Group {
        /// Ordered child fields.
        sub_fields: Vec<FieldDescriptor>,
    },
    /// Display-only separator between fields.
    Tab,
    /// Container repeating its sub-fields once per row.
    Repeater {
        /// Ordered child fields of every row.
        sub_fields: Vec<FieldDescriptor>,
        /// Minimum row count.
        min: Option<u32>,
        /// Maximum row count.
        max: Option<u32>,
    },
    /// Container whose rows pick one of several named layouts.
    FlexibleContent {
        /// Available layouts.
        layouts: Vec<FlexibleLayout>,
    },
    /// Media picker.
    Image {
        /// Whether the upload control is disabled.
        uploader_disabled: bool,
    },
    /// Rich-text editor.
    Wysiwyg {
        /// Toolbar preset.
        toolbar: WysiwygToolbar,
    },
    /// Link picker.
    Link,
    /// Button (label and target) picker.
    Button,
    /// Plain text input.
    Text,
    /// Any other host field type; receives no type-specific lockdown.
    Other {
        /// Host type name.
        type_name: NonEmptyString,
    },
}

impl FieldKind {
    /// Returns the host type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Group { .. } => "group",
            Self::Tab => "tab",
            Self::Repeater { .. } => "repeater",
            Self::FlexibleContent { .. } => "flexible_content",
            Self::Image { .. } => "image",
            Self::Wysiwyg { .. } => "wysiwyg",
            Self::Link => "link",
            Self::Button => "button",
            Self::Text => "text",
            Self::Other { type_name } => type_name.as_str(),
        }
    }

    /// Returns directly nested fields of groups and repeaters.
    #[must_use]
    pub fn sub_fields(&self) -> &[FieldDescriptor] {
        match self {
            Self::Group { sub_fields } | Self::Repeater { sub_fields, .. } => sub_fields,
            _ => &[],
        }
    }

    /// Returns the layouts of a flexible-content field.
    #[must_use]
    pub fn layouts(&self) -> &[FlexibleLayout] {
        match self {
            Self::FlexibleContent { layouts } => layouts,
            _ => &[],
        }
    }

    /// Applies the type-specific part of a lockdown and returns an extra wrapper class, if any.
    fn apply_lockdown(&mut self, row_count: u32) -> Option<&'static str> {
        match self {
            Self::Image { uploader_disabled } => {
                *uploader_disabled = true;
                None
            }
            Self::Repeater { min, max, .. } => {
                *min = Some(row_count);
                *max = Some(row_count);
                None
            }
            Self::Wysiwyg { toolbar } => {
                *toolbar = WysiwygToolbar::Basic;
                None
            }
            Self::Link | Self::Button => Some(LINK_BUTTON_DISABLED_CLASS),
            Self::Group { .. }
            | Self::Tab
            | Self::FlexibleContent { .. }
            | Self::Text
            | Self::Other { .. } => None,
        }
    }
}

/// Schema node describing one form field as presented by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "wire::FieldWire", into = "wire::FieldWireOut")]
pub struct FieldDescriptor {
    key: NonEmptyString,
    name: String,
    label: String,
    instructions: String,
    kind: FieldKind,
    read_only: bool,
    disabled: bool,
    wrapper_classes: Vec<String>,
    wrapper_attributes: Map<String, Value>,
    value: Option<Value>,
    extra: Map<String, Value>,
    keyed_layouts: bool,
}

impl FieldDescriptor {
    /// Creates an editable field descriptor.
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        label: impl Into<String>,
        kind: FieldKind,
    ) -> AppResult<Self> {
        let key = NonEmptyString::new(key)
            .map_err(|_| AppError::Validation("field key must not be empty".to_owned()))?;

        Ok(Self {
            key,
            name: name.into(),
            label: label.into(),
            instructions: String::new(),
            kind,
            read_only: false,
            disabled: false,
            wrapper_classes: Vec::new(),
            wrapper_attributes: Map::new(),
            value: None,
            extra: Map::new(),
            keyed_layouts: false,
        })
    }

    /// Sets the instructions text.
    #[must_use]
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    /// Sets the currently stored value shown by the form.
    #[must_use]
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    /// Returns the globally unique field key.
    #[must_use]
    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Returns the machine name used for value storage.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the display label, falling back to the name.
    #[must_use]
    pub fn label(&self) -> &str {
        if self.label.trim().is_empty() {
            self.name.as_str()
        } else {
            self.label.as_str()
        }
    }

    /// Returns the instructions text.
    #[must_use]
    pub fn instructions(&self) -> &str {
        self.instructions.as_str()
    }

    /// Returns the field kind.
    #[must_use]
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Returns the host type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        self.kind.type_name()
    }

    /// Returns whether the field is read-only.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Returns whether the field is disabled.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Returns the wrapper classes.
    #[must_use]
    pub fn wrapper_classes(&self) -> &[String] {
        &self.wrapper_classes
    }

    /// Returns the value shown by the form, if the host supplied one.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Number of rows currently held by a repeater value.
    #[must_use]
    pub fn row_count(&self) -> u32 {
        self.value
            .as_ref()
            .and_then(Value::as_array)
            .map(|rows| u32::try_from(rows.len()).unwrap_or(u32::MAX))
            .unwrap_or(0)
    }

    /// Marks the field as non-editable and applies the lockdown of its kind.
    ///
    /// Applying a lockdown to an already locked field changes nothing.
    pub fn lock_down(&mut self, notice: &str) {
        self.read_only = true;
        self.disabled = true;
        self.add_wrapper_class(DISABLED_FIELD_CLASS);
        self.append_notice(notice);

        let row_count = self.row_count();
        if let Some(class) = self.kind.apply_lockdown(row_count) {
            self.add_wrapper_class(class);
        }
    }

    fn add_wrapper_class(&mut self, class: &str) {
        if !self.wrapper_classes.iter().any(|existing| existing == class) {
            self.wrapper_classes.push(class.to_owned());
        }
    }

    fn append_notice(&mut self, notice: &str) {
        let notice = notice.trim();
        if notice.is_empty() || self.instructions.contains(notice) {
            return;
        }

        if self.instructions.trim().is_empty() {
            self.instructions = notice.to_owned();
        } else {
            self.instructions = format!("{} {notice}", self.instructions.trim_end());
        }
    }
}
