//! Appends saved response examples to a request description.
//!
//! The target format has no first-class slot for saved examples, so they
//! travel as markdown sections appended to the request's description.

use super::types::PostmanResponseExample;
use crate::import::warning::ImportWarning;

/// Longest example body carried over verbatim; anything beyond is cut.
const MAX_EXAMPLE_BODY: usize = 2000;

/// Returns the description with one fenced section per usable example.
/// Examples with neither a name nor a body are skipped with a note.
#[must_use]
pub fn append_response_examples(
    description: &str,
    examples: &[PostmanResponseExample],
    path: &str,
    warnings: &mut Vec<ImportWarning>,
) -> String {
    if examples.is_empty() {
        return description.to_string();
    }

    let mut out = description.to_string();
    for example in examples {
        let body = example.body.as_deref().unwrap_or("");
        if example.name.is_empty() && body.is_empty() {
            warnings.push(ImportWarning::info(
                path,
                "response example without name or body was skipped",
            ));
            continue;
        }

        if !out.is_empty() {
            out.push_str("\n\n");
        }
        out.push_str("### Example: ");
        out.push_str(if example.name.is_empty() {
            "(unnamed)"
        } else {
            &example.name
        });

        if let Some(code) = example.code {
            out.push_str(&format!(
                "\n\n`{code} {}`",
                example.status.as_deref().unwrap_or("")
            ));
        }

        if !body.is_empty() {
            out.push_str("\n\n```\n");
            if body.len() > MAX_EXAMPLE_BODY {
                let mut end = MAX_EXAMPLE_BODY;
                while !body.is_char_boundary(end) {
                    end -= 1;
                }
                out.push_str(&body[..end]);
                out.push_str("\n… (truncated)");
            } else {
                out.push_str(body);
            }
            out.push_str("\n```");
        }
    }

    out
}
