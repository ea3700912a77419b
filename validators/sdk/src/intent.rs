//! Outgoing intents
//!
//! Rule sets never talk to the host. They append [`Intent`]s to an
//! [`Intents`] list, which the reporter later replays in order.

use serde::Serialize;
use serde_json::Value;

/// One atomic outgoing call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    ReportError { field: String, message: String },
    ReportWarning { field: String, message: String },
    SetRequired { field: String, required: bool },
    SetDisplay { field: String, display: bool },
    /// `Value::Null` clears the field
    SetValue { field: String, value: Value },
    Diagnostic { text: String },
}

impl Intent {
    /// Field this intent is scoped to, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            Intent::ReportError { field, .. }
            | Intent::ReportWarning { field, .. }
            | Intent::SetRequired { field, .. }
            | Intent::SetDisplay { field, .. }
            | Intent::SetValue { field, .. } => Some(field),
            Intent::Diagnostic { .. } => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Intent::ReportError { .. })
    }
}

/// What to do with a governed field's value
#[derive(Debug, Clone, PartialEq)]
pub enum ValueControl {
    /// Leave whatever the user entered
    Keep,
    /// Force the field to null
    Clear,
    Set(Value),
}

/// Complete presentation state of one governed field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldControl {
    pub required: bool,
    pub display: bool,
    pub value: ValueControl,
}

impl FieldControl {
    /// Required, visible, value left alone
    pub fn required() -> Self {
        Self {
            required: true,
            display: true,
            value: ValueControl::Keep,
        }
    }

    /// Optional, visible, value left alone
    pub fn optional() -> Self {
        Self {
            required: false,
            display: true,
            value: ValueControl::Keep,
        }
    }

    /// Not applicable: optional, hidden and cleared
    pub fn not_applicable() -> Self {
        Self {
            required: false,
            display: false,
            value: ValueControl::Clear,
        }
    }
}

/// Ordered, append-only list of intents
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Intents(Vec<Intent>);

impl Intents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, field: &str, message: impl Into<String>) -> &mut Self {
        self.push(Intent::ReportError {
            field: field.to_string(),
            message: message.into(),
        })
    }

    pub fn warning(&mut self, field: &str, message: impl Into<String>) -> &mut Self {
        self.push(Intent::ReportWarning {
            field: field.to_string(),
            message: message.into(),
        })
    }

    pub fn required(&mut self, field: &str, required: bool) -> &mut Self {
        self.push(Intent::SetRequired {
            field: field.to_string(),
            required,
        })
    }

    pub fn display(&mut self, field: &str, display: bool) -> &mut Self {
        self.push(Intent::SetDisplay {
            field: field.to_string(),
            display,
        })
    }

    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> &mut Self {
        self.push(Intent::SetValue {
            field: field.to_string(),
            value: value.into(),
        })
    }

    pub fn clear(&mut self, field: &str) -> &mut Self {
        self.set(field, Value::Null)
    }

    pub fn diagnostic(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(Intent::Diagnostic { text: text.into() })
    }

    /// Restate the full state of a governed field: required, then display,
    /// then the value unless it is kept.
    pub fn control(&mut self, field: &str, control: FieldControl) -> &mut Self {
        self.required(field, control.required);
        self.display(field, control.display);
        match control.value {
            ValueControl::Keep => self,
            ValueControl::Clear => self.clear(field),
            ValueControl::Set(value) => self.set(field, value),
        }
    }

    pub fn push(&mut self, intent: Intent) -> &mut Self {
        self.0.push(intent);
        self
    }

    pub fn as_slice(&self) -> &[Intent] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of errors, i.e. whether the invocation would pass
    pub fn error_count(&self) -> usize {
        self.0.iter().filter(|intent| intent.is_error()).count()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Intent> {
        self.0.iter()
    }
}

impl From<Intents> for Vec<Intent> {
    fn from(intents: Intents) -> Self {
        intents.0
    }
}

impl<'a> IntoIterator for &'a Intents {
    type Item = &'a Intent;
    type IntoIter = std::slice::Iter<'a, Intent>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
