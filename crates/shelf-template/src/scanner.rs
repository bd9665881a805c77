use crate::PLACEHOLDER;

/// Scan artifact content for `{{NAME}}` placeholders and return the distinct
/// variable names in first-seen order.
///
/// Names are the inner text with surrounding whitespace trimmed, so
/// `{{ HOST }}` and `{{HOST}}` report the same variable. A placeholder whose
/// inner text is all whitespace has no collectable name and is skipped.
/// Content without placeholders yields an empty vec — never an error.
pub fn scan(content: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(content) {
        let name = caps[1].trim();
        if name.is_empty() {
            continue;
        }
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_content_has_no_variables() {
        assert!(scan("#!/bin/bash\necho hello\n").is_empty());
        assert!(scan("").is_empty());
        assert!(scan("single {braces} and {single} only").is_empty());
    }

    #[test]
    fn finds_variables_in_first_seen_order_deduplicated() {
        let content = "run {{A}} then {{B}} then {{A}} again";
        assert_eq!(scan(content), vec!["A", "B"]);
    }

    #[test]
    fn trims_whitespace_inside_braces() {
        assert_eq!(scan("image: nginx:{{ VERSION }}"), vec!["VERSION"]);
        // Spaced and unspaced spellings are the same variable.
        assert_eq!(scan("{{ HOST }} and {{HOST}}"), vec!["HOST"]);
    }

    #[test]
    fn unterminated_placeholder_is_ordinary_text() {
        assert!(scan("echo {{UNCLOSED").is_empty());
        assert!(scan("{{NO_CLOSE} }").is_empty());
    }

    #[test]
    fn whitespace_only_placeholder_is_skipped() {
        assert!(scan("weird {{   }} token").is_empty());
    }

    #[test]
    fn names_may_contain_arbitrary_non_brace_characters() {
        assert_eq!(
            scan("{{my var-1}} {{ DOTTED.NAME }}"),
            vec!["my var-1", "DOTTED.NAME"]
        );
    }

    #[test]
    fn compose_example() {
        let content = "services:\n  web:\n    image: \"nginx:{{VERSION}}\"\n    ports:\n      - \"{{PORT}}:80\"\n";
        assert_eq!(scan(content), vec!["VERSION", "PORT"]);
    }
}
