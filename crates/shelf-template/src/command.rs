use std::collections::HashMap;

use shelf_core::ArtifactKind;

/// Build the literal shell command a user copies to fetch an artifact.
///
/// Scripts become a pipe-to-interpreter command, compose files a save-to-disk
/// command. Variables, when present, travel as percent-encoded query
/// parameters in caller order, and the URL is double-quoted because `?` and
/// `&` are shell-meaningful. Without variables the URL is bare and the raw
/// endpoint passes placeholders through unresolved.
///
/// Values get no quoting beyond query-string encoding — what they expand to
/// inside the script is the caller's responsibility.
pub fn fetch_command(
    api_base: &str,
    kind: ArtifactKind,
    filename: &str,
    values: &[(String, String)],
) -> String {
    let base = api_base.trim_end_matches('/');
    let path = kind.raw_path(filename);

    if values.is_empty() {
        return match kind {
            ArtifactKind::Script => format!("curl -sL {base}/{path} | bash"),
            ArtifactKind::Compose => format!("curl -sL {base}/{path} -o {filename}"),
        };
    }

    let mut query = url::form_urlencoded::Serializer::new(String::new());
    for (name, value) in values {
        query.append_pair(name, value);
    }
    let query = query.finish();

    match kind {
        ArtifactKind::Script => format!("curl -sL \"{base}/{path}?{query}\" | bash"),
        ArtifactKind::Compose => {
            format!("curl -sL \"{base}/{path}?{query}\" -o {filename}")
        }
    }
}

/// Parse a raw query string into the variable value map the substitution
/// engine consumes. Every parameter is a candidate placeholder name/value
/// pair; when a name repeats, the last occurrence wins.
pub fn parse_query(query: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
        list.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn script_without_variables() {
        let cmd = fetch_command("http://localhost:7700/api", ArtifactKind::Script, "deploy.sh", &[]);
        assert_eq!(cmd, "curl -sL http://localhost:7700/api/raw/deploy.sh | bash");
    }

    #[test]
    fn script_with_variables() {
        let cmd = fetch_command(
            "http://localhost:7700/api",
            ArtifactKind::Script,
            "deploy.sh",
            &pairs(&[("IP", "10.0.0.1"), ("PORT", "8080")]),
        );
        assert_eq!(
            cmd,
            "curl -sL \"http://localhost:7700/api/raw/deploy.sh?IP=10.0.0.1&PORT=8080\" | bash"
        );
    }

    #[test]
    fn compose_without_variables() {
        let cmd = fetch_command("https://shelf.example.com/api", ArtifactKind::Compose, "stack.yml", &[]);
        assert_eq!(
            cmd,
            "curl -sL https://shelf.example.com/api/raw/compose/stack.yml -o stack.yml"
        );
    }

    #[test]
    fn compose_with_variables() {
        let cmd = fetch_command(
            "https://shelf.example.com/api",
            ArtifactKind::Compose,
            "stack.yml",
            &pairs(&[("VERSION", "1.25")]),
        );
        assert_eq!(
            cmd,
            "curl -sL \"https://shelf.example.com/api/raw/compose/stack.yml?VERSION=1.25\" -o stack.yml"
        );
    }

    #[test]
    fn trailing_slash_on_base_is_tolerated() {
        let cmd = fetch_command("http://localhost:7700/api/", ArtifactKind::Script, "x.sh", &[]);
        assert_eq!(cmd, "curl -sL http://localhost:7700/api/raw/x.sh | bash");
    }

    #[test]
    fn query_string_round_trips_exactly() {
        let input = pairs(&[("IP", "10.0.0.1"), ("MSG", "hello world & more"), ("PATH", "/opt/x")]);
        let cmd = fetch_command("http://h/api", ArtifactKind::Script, "s.sh", &input);

        let query = cmd
            .split('?')
            .nth(1)
            .and_then(|rest| rest.split('"').next())
            .unwrap();
        let decoded: Vec<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(decoded, input);
    }

    #[test]
    fn parse_query_last_duplicate_wins() {
        let map = parse_query("A=1&B=2&A=3");
        assert_eq!(map["A"], "3");
        assert_eq!(map["B"], "2");
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn parse_query_decodes_percent_and_plus() {
        let map = parse_query("MSG=hello+world&P=%2Fopt%2Fx");
        assert_eq!(map["MSG"], "hello world");
        assert_eq!(map["P"], "/opt/x");
    }

    #[test]
    fn parse_query_empty() {
        assert!(parse_query("").is_empty());
    }
}
