//! Small utility helpers used across modules.

/// Whole seconds as `MM:SS`; minutes grow past two digits when needed.
pub fn format_time(total_seconds: u64) -> String {
  format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Log-safe truncation for large strings.
/// Cuts on a char boundary so multi-byte text never panics.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut end = max;
  while !s.is_char_boundary(end) {
    end -= 1;
  }
  format!("{}… ({} bytes total)", &s[..end], s.len())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn formats_minutes_and_seconds() {
    assert_eq!(format_time(0), "00:00");
    assert_eq!(format_time(59), "00:59");
    assert_eq!(format_time(61), "01:01");
    assert_eq!(format_time(6000), "100:00");
  }

  #[test]
  fn truncation_respects_char_boundaries() {
    assert_eq!(trunc_for_log("short", 10), "short");
    let t = trunc_for_log("💖💖", 5);
    assert!(t.starts_with("💖…"));
    assert!(t.ends_with("(8 bytes total)"));
  }
}
