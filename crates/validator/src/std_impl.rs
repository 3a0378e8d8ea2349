use crate::{HasLength, Validate, ValidateError};

impl HasLength for String {
  fn length(&self) -> usize {
    self.len()
  }
}

impl HasLength for str {
  fn length(&self) -> usize {
    self.len()
  }
}

impl<T: Validate> Validate for Option<T> {
  fn validate(&self) -> Result<(), ValidateError> {
    match self {
      Some(inner) => inner.validate(),
      None => Ok(()),
    }
  }
}
