//! Helpers for building runtime expression strings
//!
//! Expressions are opaque to this compiler: they are assembled here as
//! strings and evaluated later by the reactive runtime.

/// Quote a string as a runtime expression literal
pub fn quote(s: &str) -> String {
    format!("'{}'", s)
}

/// Render a list of field names as a runtime array literal
pub fn field_list(fields: &[String]) -> String {
    let quoted: Vec<String> = fields.iter().map(|f| quote(f)).collect();
    format!("[{}]", quoted.join(", "))
}

/// Render key/value pairs as a runtime object literal
pub fn object(pairs: &[String]) -> String {
    format!("{{{}}}", pairs.join(", "))
}
