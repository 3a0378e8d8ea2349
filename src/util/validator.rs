use error_stack::Report;
use thiserror::Error;
use validator::ValidateError;

#[derive(Debug, Error)]
#[error("Invalid given data occurred")]
pub struct Wrapper;

pub trait IntoValidatorReport<T> {
  fn into_validator_report(self) -> error_stack::Result<T, Wrapper>;
}

impl<T> IntoValidatorReport<T> for Result<T, ValidateError> {
  fn into_validator_report(self) -> error_stack::Result<T, Wrapper> {
    self.map_err(|error| {
      error
        .field_errors()
        .into_iter()
        .fold(Report::new(Wrapper), |report, entry| {
          report.attach_printable(format!("{}: {}", entry.param, entry.msg))
        })
    })
  }
}
