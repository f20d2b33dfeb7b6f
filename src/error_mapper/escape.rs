use std::borrow::Cow;

fn entity(c: char) -> Option<&'static str> {
  match c {
    '&' => Some("&amp;"),
    '<' => Some("&lt;"),
    '>' => Some("&gt;"),
    '"' => Some("&quot;"),
    '\'' => Some("&#39;"),
    _ => None,
  }
}

/// Escape the five characters that matter inside HTML text and quoted
/// attributes. Everything else passes through untouched.
pub fn escape(text: &str) -> Cow<'_, str> {
  if !text.chars().any(|c| entity(c).is_some()) {
    return Cow::Borrowed(text);
  }
  let mut out = String::with_capacity(text.len() + 16);
  for c in text.chars() {
    match entity(c) {
      Some(e) => out.push_str(e),
      None => out.push(c),
    }
  }
  Cow::Owned(out)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn escapes_all_five() {
    assert_eq!(escape("a&b<c>d\"e'f"), "a&amp;b&lt;c&gt;d&quot;e&#39;f");
  }

  #[test]
  fn empty() {
    assert_eq!(escape(""), "");
  }

  #[test]
  fn leaves_other_text_alone() {
    let text = "at foo (src/main.rs:1:2)\n/ ` é";
    assert!(matches!(escape(text), Cow::Borrowed(_)));
    assert_eq!(escape(text), text);
  }

  #[test]
  fn escapes_existing_entities() {
    assert_eq!(escape("&amp;"), "&amp;amp;");
  }
}
