use crate::parse::EnvMap;

/// Renders a mapping back to env-file text.
///
/// Comment lines are emitted verbatim first, then one `KEY="VALUE"` line per
/// entry in ascending key order, joined with `\n` and no trailing newline.
/// Values are always double-quoted, including empty ones. Embedded quotes or
/// newlines are written as-is; round-trip fidelity for such values relies on
/// the parser's quote handling, not on an escape scheme.
pub fn render(comment_lines: &[String], values: &EnvMap) -> String {
  let mut lines: Vec<String> = comment_lines.to_vec();
  for (key, value) in values {
    lines.push(format!("{}=\"{}\"", key, value));
  }
  lines.join("\n")
}
