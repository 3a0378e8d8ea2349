use indexmap::IndexMap;
use serde::Serialize;
use std::borrow::Cow;

pub struct FieldBuilder(IndexMap<Cow<'static, str>, ValidateError>);

#[allow(clippy::new_without_default)]
impl FieldBuilder {
  #[must_use]
  pub fn new() -> Self {
    Self(IndexMap::default())
  }

  /// Inserts the errors of a field. Empty errors are skipped and
  /// errors of a field already present are merged into it.
  pub fn insert(&mut self, key: impl Into<Cow<'static, str>>, value: ValidateError) {
    if value.is_empty() {
      return;
    }

    let key = key.into();
    match (self.0.get_mut(&key), value) {
      (Some(ValidateError::Messages(existing)), ValidateError::Messages(new)) => {
        existing.extend(new);
      },
      (_, value) => {
        self.0.insert(key, value);
      },
    }
  }

  /// Shorthand for inserting a single message for a field.
  pub fn insert_msg(
    &mut self,
    key: impl Into<Cow<'static, str>>,
    message: impl Into<Cow<'static, str>>,
  ) {
    self.insert(key, ValidateError::Messages(vec![message.into()]));
  }

  #[must_use]
  pub fn build(self) -> ValidateError {
    ValidateError::Fields(self.0)
  }
}

// ---------------------------------------------------- //

#[derive(Clone, PartialEq, Eq)]
pub enum ValidateError {
  Fields(IndexMap<Cow<'static, str>, ValidateError>),
  Messages(Vec<Cow<'static, str>>),
}

impl std::fmt::Display for ValidateError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str("Invalid data occurred")
  }
}

impl std::error::Error for ValidateError {}

impl std::fmt::Debug for ValidateError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ValidateError::Fields(n) => n.fmt(f),
      ValidateError::Messages(n) => f.debug_map().entry(&"_errors", &n).finish(),
    }
  }
}

impl ValidateError {
  #[must_use]
  pub fn field_builder() -> FieldBuilder {
    FieldBuilder::new()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    match self {
      ValidateError::Fields(n) => n.is_empty(),
      ValidateError::Messages(n) => n.is_empty(),
    }
  }

  pub fn into_result(self) -> Result<(), Self> {
    if self.is_empty() {
      Ok(())
    } else {
      Err(self)
    }
  }

  /// Flattens the error tree into one entry per message, keyed by
  /// the dotted path of the offending field (`db.primary.url`).
  #[must_use]
  pub fn field_errors(&self) -> Vec<FieldError> {
    fn walk(err: &ValidateError, path: &str, out: &mut Vec<FieldError>) {
      match err {
        ValidateError::Fields(fields) => {
          for (field, data) in fields {
            let path = if path.is_empty() {
              field.to_string()
            } else {
              format!("{path}.{field}")
            };
            walk(data, &path, out);
          }
        },
        ValidateError::Messages(messages) => {
          for message in messages {
            out.push(FieldError {
              param: path.to_string(),
              msg: message.clone(),
            });
          }
        },
      }
    }

    let mut out = Vec::new();
    walk(self, "", &mut out);
    out
  }
}

/// One flattened validation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
  pub param: String,
  pub msg: Cow<'static, str>,
}
