/// Whether a submitted text value counts as filled in. Whitespace-only
/// values are treated as empty.
#[must_use]
pub fn is_present(value: &str) -> bool {
  !value.trim().is_empty()
}

#[must_use]
pub fn is_present_opt<T: AsRef<str>>(value: Option<T>) -> bool {
  value.map_or(false, |v| is_present(v.as_ref()))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_is_present() {
    assert!(is_present("Developer"));
    assert!(!is_present(""));
    assert!(!is_present(" \t "));

    assert!(is_present_opt(Some("x")));
    assert!(!is_present_opt(Some("")));
    assert!(!is_present_opt::<&str>(None));
  }
}
