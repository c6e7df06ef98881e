//! Route match-condition parsing
//!
//! A route's conditions come from exactly one of two places: the first-class
//! `prefix` field, or, when that is empty, a small JSON document embedded in
//! the route's `config` blob:
//!
//! ```json
//! {"Prefix": "/v1", "match": [{"header_name": ":method", "header_value": "GET"}]}
//! ```

use crate::domain::MatchCondition;
use serde::Deserialize;
use tracing::debug;

/// Prefix used when the blob cannot be parsed
pub const FALLBACK_PREFIX: &str = "/";

#[derive(Debug, Deserialize)]
struct ConditionBlob {
    #[serde(rename = "Prefix", default)]
    prefix: Option<String>,
    #[serde(rename = "match", default)]
    matches: Option<Vec<HeaderEntry>>,
}

#[derive(Debug, Deserialize)]
struct HeaderEntry {
    #[serde(default)]
    header_name: Option<String>,
    #[serde(default)]
    header_value: Option<String>,
}

/// Build the ordered match conditions for one route.
///
/// A non-empty `prefix` yields exactly `[Prefix(prefix)]` and the blob is not
/// looked at. Otherwise the blob's prefix (possibly empty) comes first, then
/// one header condition per `match` entry in blob order. A blob that does not
/// parse yields `[Prefix("/")]`.
pub fn parse_conditions(prefix: &str, blob: &str) -> Vec<MatchCondition> {
    if !prefix.is_empty() {
        return vec![MatchCondition::prefix(prefix)];
    }

    let parsed: ConditionBlob = match serde_json::from_str(blob) {
        Ok(parsed) => parsed,
        Err(error) => {
            debug!(%error, "Route condition blob is not valid, using fallback prefix");
            return vec![MatchCondition::prefix(FALLBACK_PREFIX)];
        }
    };

    let headers = parsed.matches.unwrap_or_default();
    let mut conditions = Vec::with_capacity(1 + headers.len());
    conditions.push(MatchCondition::prefix(parsed.prefix.unwrap_or_default()));
    conditions.extend(headers.into_iter().map(|entry| {
        MatchCondition::header_contains(
            entry.header_name.unwrap_or_default().trim(),
            entry.header_value.unwrap_or_default().trim(),
        )
    }));
    conditions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_field_wins() {
        assert_eq!(parse_conditions("/", ""), vec![MatchCondition::prefix("/")]);
        assert_eq!(
            parse_conditions("/api", r#"{"Prefix":"/ignored"}"#),
            vec![MatchCondition::prefix("/api")]
        );
    }

    #[test]
    fn blob_prefix_only() {
        assert_eq!(
            parse_conditions("", r#"{"Prefix":"/test3"}"#),
            vec![MatchCondition::prefix("/test3")]
        );
    }

    #[test]
    fn blob_prefix_with_headers() {
        assert_eq!(
            parse_conditions(
                "",
                r#"{"Prefix":"/test4","match":[{"header_name":":method","header_value":"GET"}]}"#
            ),
            vec![MatchCondition::prefix("/test4"), MatchCondition::header_contains(":method", "GET")]
        );
    }

    #[test]
    fn header_entries_keep_blob_order_and_are_trimmed() {
        let conditions = parse_conditions(
            "",
            r#"{"Prefix":"/x","match":[{"header_name":" x-b ","header_value":" 2 "},{"header_name":"x-a","header_value":"1"}]}"#,
        );
        assert_eq!(
            conditions,
            vec![
                MatchCondition::prefix("/x"),
                MatchCondition::header_contains("x-b", "2"),
                MatchCondition::header_contains("x-a", "1"),
            ]
        );
    }

    #[test]
    fn blob_without_prefix_yields_empty_prefix() {
        assert_eq!(parse_conditions("", "{}"), vec![MatchCondition::prefix("")]);
        assert_eq!(parse_conditions("", r#"{"Prefix":null,"match":null}"#), vec![
            MatchCondition::prefix("")
        ]);
    }

    #[test]
    fn malformed_blob_falls_back() {
        assert_eq!(parse_conditions("", "not-json"), vec![MatchCondition::prefix("/")]);
        assert_eq!(parse_conditions("", ""), vec![MatchCondition::prefix("/")]);
        assert_eq!(parse_conditions("", "[1,2]"), vec![MatchCondition::prefix("/")]);
    }

    #[test]
    fn parsing_is_deterministic() {
        let blob = r#"{"Prefix":"/d","match":[{"header_name":"h","header_value":"v"}]}"#;
        assert_eq!(parse_conditions("", blob), parse_conditions("", blob));
    }
}
