//! Classification and rename templating
//!
//! This module extracts the type token from a filename and renders the rename
//! template for a matched file.

use regex::Regex;

use crate::constants::{PLACEHOLDER_COUNTER, PLACEHOLDER_TIMESTAMP, PLACEHOLDER_TYPE};

/// Extracts the type token from a filename
///
/// The first match of `pattern` becomes the token; a filename without a match
/// yields an empty string.
pub fn extract_type(pattern: &Regex, filename: &str) -> String {
    pattern
        .find(filename)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Renders a rename template
///
/// Replaces the first occurrence of `[TYPE]`, `[TIMESTAMP]` and `[COUNTER]`
/// with their values. Later occurrences stay literal, and substituted values
/// are never scanned for placeholders again.
///
/// # Examples
/// ```
/// use dropwatch::naming::render_template;
///
/// let name = render_template("[TYPE]-[TIMESTAMP]-[COUNTER].dat", "x", 123, 0);
/// assert_eq!(name, "x-123-0.dat");
/// ```
pub fn render_template(template: &str, file_type: &str, timestamp: i64, counter: usize) -> String {
    let timestamp = timestamp.to_string();
    let counter = counter.to_string();
    let values = [
        (PLACEHOLDER_TYPE, file_type),
        (PLACEHOLDER_TIMESTAMP, timestamp.as_str()),
        (PLACEHOLDER_COUNTER, counter.as_str()),
    ];

    let mut spans: Vec<(usize, &str, &str)> = values
        .iter()
        .filter_map(|(placeholder, value)| {
            template
                .find(placeholder)
                .map(|index| (index, *placeholder, *value))
        })
        .collect();
    spans.sort_by_key(|(index, _, _)| *index);

    let mut rendered = String::with_capacity(template.len() + file_type.len());
    let mut cursor = 0;
    for (index, placeholder, value) in spans {
        rendered.push_str(&template[cursor..index]);
        rendered.push_str(value);
        cursor = index + placeholder.len();
    }
    rendered.push_str(&template[cursor..]);

    rendered
}
