use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Logging {
  /// Filter directives in the `tracing-subscriber` env filter syntax.
  /// `RUST_LOG` takes precedence over this value if it is set.
  ///
  /// **Environment variables**:
  /// - `CHATBOOK_LOGGING_FILTER`
  #[serde(default = "Logging::default_filter")]
  pub filter: String,
  /// **Environment variables**:
  /// - `CHATBOOK_LOGGING_STYLE`
  #[serde(default)]
  pub style: LoggingStyle,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggingStyle {
  #[default]
  Compact,
  Pretty,
  Json,
}

impl Logging {
  fn default_filter() -> String {
    "info".into()
  }
}

impl Default for Logging {
  fn default() -> Self {
    Self {
      filter: Self::default_filter(),
      style: LoggingStyle::default(),
    }
  }
}
