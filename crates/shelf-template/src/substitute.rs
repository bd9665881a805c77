use std::collections::HashMap;

use crate::PLACEHOLDER;

/// Replace placeholders in `content` with values from `values`.
///
/// A single left-to-right pass over the placeholder tokens: for each token the
/// trimmed inner name is looked up in `values`; on a hit the whole token is
/// replaced by the value, on a miss the token is left verbatim, braces
/// included. Map keys are used exactly as supplied by the caller.
///
/// Replacement values are inserted literally and never rescanned, so a value
/// containing `{{X}}` survives as-is (no recursive expansion). Keys absent
/// from the content are ignored; `substitute(content, &HashMap::new())` is
/// the identity.
pub fn substitute(content: &str, values: &HashMap<String, String>) -> String {
    if values.is_empty() {
        return content.to_string();
    }
    PLACEHOLDER
        .replace_all(content, |caps: &regex::Captures<'_>| {
            match values.get(caps[1].trim()) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
