//! MiniJinja filter registration.

use minijinja::{Environment, HtmlEscape, Value};

/// Registers the document filters on a minijinja environment.
///
/// # Arguments
///
/// * `env` - The MiniJinja environment to register filters on
pub fn register_filters(env: &mut Environment<'static>) {
    // Appends a newline to the value.
    // Usage: {{ content | nl }}
    env.add_filter("nl", |value: Value| -> String { format!("{}\n", value) });

    // Turns line breaks into <br /> so multi-line address blocks and notes
    // survive HTML output. Unsafe input is escaped first.
    env.add_filter("nl2br", nl2br);
}

fn nl2br(value: Value) -> Value {
    if value.is_undefined() || value.is_none() {
        return Value::from_safe_string(String::new());
    }

    let raw = value.to_string();
    let text = if value.is_safe() {
        raw
    } else {
        HtmlEscape(&raw).to_string()
    };

    Value::from_safe_string(text.replace("\r\n", "\n").replace('\n', "<br />\n"))
}
