use serde_json::Map;

use super::*;

/// Decision taken for one submitted field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WritePlan {
    /// Persist the submitted value as is.
    Accept,
    /// Keep the stored value; fall back to the submission when nothing is stored.
    KeepStored,
    /// Restore the named repeater sub-fields row by row from the stored rows.
    RevertSubFields(Vec<String>),
}

impl WritePlan {
    /// Returns whether applying the plan needs the stored value.
    #[must_use]
    pub fn requires_stored_value(&self) -> bool {
        !matches!(self, Self::Accept)
    }

    /// Computes the value to persist.
    #[must_use]
    pub fn apply(&self, submitted: Value, stored: Option<Value>) -> Value {
        match self {
            Self::Accept => submitted,
            Self::KeepStored => match stored {
                Some(stored) if !is_empty_stored_value(&stored) => stored,
                _ => submitted,
            },
            Self::RevertSubFields(names) => revert_rows(submitted, stored, names),
        }
    }
}

impl FieldPolicy {
    /// Plans how a submitted value is treated before persistence.
    ///
    /// This check holds even when the rendered form was bypassed: a denied
    /// field keeps its stored value, and denied repeater sub-fields keep their
    /// stored value in every row that existed before.
    #[must_use]
    pub fn plan_write(
        &self,
        field: &FieldDescriptor,
        submitted: &Value,
        grants: &GrantTable,
        user: &UserIdentity,
    ) -> WritePlan {
        if self.bypasses(field, user) {
            return WritePlan::Accept;
        }

        if self.field_access(field, grants, user) == FieldAccess::Denied {
            return WritePlan::KeepStored;
        }

        let FieldKind::Repeater { sub_fields, .. } = field.kind() else {
            return WritePlan::Accept;
        };

        if !has_rows(submitted) {
            return WritePlan::Accept;
        }

        let denied: Vec<String> = sub_fields
            .iter()
            .filter(|sub_field| {
                self.field_access(sub_field, grants, user) == FieldAccess::Denied
            })
            .map(|sub_field| sub_field.name().to_owned())
            .filter(|name| !name.is_empty())
            .collect();

        if denied.is_empty() {
            WritePlan::Accept
        } else {
            WritePlan::RevertSubFields(denied)
        }
    }

    /// Returns the value to persist, reading the stored value only when needed.
    pub fn enforce_write<F>(
        &self,
        field: &FieldDescriptor,
        submitted: Value,
        grants: &GrantTable,
        user: &UserIdentity,
        stored_value: F,
    ) -> Value
    where
        F: FnOnce() -> Option<Value>,
    {
        let plan = self.plan_write(field, &submitted, grants, user);
        let stored = plan.requires_stored_value().then(stored_value).flatten();
        plan.apply(submitted, stored)
    }
}

fn is_empty_stored_value(value: &Value) -> bool {
    matches!(value, Value::Null | Value::Bool(false))
}

/// Hosts send repeater rows as a list, or as an object keyed by row index
/// once the indices stop being contiguous.
fn has_rows(value: &Value) -> bool {
    match value {
        Value::Array(rows) => !rows.is_empty(),
        Value::Object(rows) => !rows.is_empty(),
        _ => false,
    }
}

fn revert_rows(mut submitted: Value, stored: Option<Value>, names: &[String]) -> Value {
    let Some(stored) = stored else {
        return submitted;
    };

    match &mut submitted {
        Value::Array(rows) => {
            for (index, row) in rows.iter_mut().enumerate() {
                restore_row(row, stored_row(&stored, index.to_string().as_str()), names);
            }
        }
        Value::Object(rows) => {
            for (key, row) in rows.iter_mut() {
                restore_row(row, stored_row(&stored, key), names);
            }
        }
        _ => {}
    }

    submitted
}

fn stored_row<'v>(stored: &'v Value, row_key: &str) -> Option<&'v Map<String, Value>> {
    let row = match stored {
        Value::Array(rows) => row_key
            .parse::<usize>()
            .ok()
            .and_then(|index| rows.get(index)),
        Value::Object(rows) => rows.get(row_key),
        _ => None,
    };

    row.and_then(Value::as_object)
}

fn restore_row(row: &mut Value, stored_row: Option<&Map<String, Value>>, names: &[String]) {
    let (Value::Object(row), Some(stored_row)) = (row, stored_row) else {
        return;
    };

    for name in names {
        match stored_row.get(name) {
            Some(previous) if !previous.is_null() => {
                row.insert(name.clone(), previous.clone());
            }
            _ => {}
        }
    }
}
