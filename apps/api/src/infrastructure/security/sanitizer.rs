use ammonia::Builder;
use lazy_static::lazy_static;
use std::collections::HashSet;

lazy_static! {
    /// No tags or attributes survive; script-like elements lose their content too.
    static ref STRICT_POLICY: Builder<'static> = {
        let mut builder = Builder::empty();
        builder.clean_content_tags(
            ["script", "style", "iframe", "noscript"]
                .into_iter()
                .collect::<HashSet<_>>(),
        );
        builder
    };
}

/// Reduces free text to plain text. Whatever markup characters remain come
/// back entity-escaped (`&amp;`, `&lt;`, `&gt;`, `&#34;`, `&#39;`).
pub fn sanitize_text(input: &str) -> String {
    let cleaned = STRICT_POLICY.clean(input).to_string();
    escape_quotes(&cleaned)
}

// The HTML serializer only escapes quotes inside attribute values.
fn escape_quotes(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => output.push_str("&#34;"),
            '\'' => output.push_str("&#39;"),
            _ => output.push(c),
        }
    }
    output
}
