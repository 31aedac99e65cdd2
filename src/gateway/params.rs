//! Inbound search parameters.
//!
//! Parameters normally arrive on the query string. POST requests may also
//! carry them in a JSON object or a URL-encoded form; body values take
//! precedence and the query string fills whatever the body lacks.

use serde::Deserialize;
use serde_json::Value;

use crate::gateway::error::GatewayError;

/// Names of the parameters every search must carry.
pub const REQUIRED_PARAMS: [&str; 3] = ["postStr", "type", "tk"];

/// Parameters as received, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawSearchParams {
    #[serde(rename = "postStr")]
    pub post_str: Option<String>,
    #[serde(rename = "type")]
    pub query_type: Option<String>,
    pub tk: Option<String>,
}

impl RawSearchParams {
    /// Fill absent fields from `fallback`.
    pub fn or(self, fallback: RawSearchParams) -> Self {
        Self {
            post_str: self.post_str.or(fallback.post_str),
            query_type: self.query_type.or(fallback.query_type),
            tk: self.tk.or(fallback.tk),
        }
    }

    /// Read parameters from a request body according to its content type.
    ///
    /// Unknown content types and malformed bodies yield no parameters.
    pub fn from_body(content_type: Option<&str>, body: &[u8]) -> Self {
        let mime = content_type
            .and_then(|ct| ct.split(';').next())
            .map(|m| m.trim().to_ascii_lowercase());

        match mime.as_deref() {
            Some("application/json") => Self::from_json(body),
            Some("application/x-www-form-urlencoded") => Self::from_form(body),
            _ => Self::default(),
        }
    }

    fn from_json(body: &[u8]) -> Self {
        let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(body) else {
            return Self::default();
        };
        let field = |name: &str| match map.get(name) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        };
        Self {
            post_str: field("postStr"),
            query_type: field("type"),
            tk: field("tk"),
        }
    }

    fn from_form(body: &[u8]) -> Self {
        let mut params = Self::default();
        for (key, value) in url::form_urlencoded::parse(body) {
            let slot = match key.as_ref() {
                "postStr" => &mut params.post_str,
                "type" => &mut params.query_type,
                "tk" => &mut params.tk,
                _ => continue,
            };
            slot.get_or_insert_with(|| value.into_owned());
        }
        params
    }
}

/// Validated search parameters, all non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub post_str: String,
    pub query_type: String,
    pub tk: String,
}

impl SearchParams {
    pub fn from_raw(raw: RawSearchParams) -> Result<Self, GatewayError> {
        let present = |v: Option<String>| v.filter(|s| !s.is_empty());
        match (
            present(raw.post_str),
            present(raw.query_type),
            present(raw.tk),
        ) {
            (Some(post_str), Some(query_type), Some(tk)) => Ok(Self {
                post_str,
                query_type,
                tk,
            }),
            _ => Err(GatewayError::MissingParameters),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(post_str: Option<&str>, query_type: Option<&str>, tk: Option<&str>) -> RawSearchParams {
        RawSearchParams {
            post_str: post_str.map(String::from),
            query_type: query_type.map(String::from),
            tk: tk.map(String::from),
        }
    }

    #[test]
    fn all_present_is_valid() {
        let params = SearchParams::from_raw(raw(Some("{}"), Some("query"), Some("abc"))).unwrap();
        assert_eq!(params.post_str, "{}");
        assert_eq!(params.query_type, "query");
        assert_eq!(params.tk, "abc");
    }

    #[test]
    fn absent_or_empty_is_missing() {
        let cases = [
            raw(None, Some("query"), Some("abc")),
            raw(Some("{}"), None, Some("abc")),
            raw(Some("{}"), Some("query"), None),
            raw(Some(""), Some("query"), Some("abc")),
            raw(Some("{}"), Some("query"), Some("")),
            raw(None, None, None),
        ];
        for case in cases {
            assert!(matches!(
                SearchParams::from_raw(case),
                Err(GatewayError::MissingParameters)
            ));
        }
    }

    #[test]
    fn json_body_is_read() {
        let body = br#"{"postStr":"{\"keyWord\":\"park\"}","type":"query","tk":7}"#;
        let params = RawSearchParams::from_body(Some("application/json; charset=utf-8"), body);
        assert_eq!(params, raw(Some(r#"{"keyWord":"park"}"#), Some("query"), Some("7")));
    }

    #[test]
    fn form_body_is_read() {
        let body = b"postStr=a%26b+c&type=query&tk=abc&extra=1";
        let params = RawSearchParams::from_body(Some("application/x-www-form-urlencoded"), body);
        assert_eq!(params, raw(Some("a&b c"), Some("query"), Some("abc")));
    }

    #[test]
    fn malformed_or_unknown_body_yields_nothing() {
        assert_eq!(
            RawSearchParams::from_body(Some("application/json"), b"{not json"),
            RawSearchParams::default()
        );
        assert_eq!(
            RawSearchParams::from_body(Some("application/json"), b"[1,2]"),
            RawSearchParams::default()
        );
        assert_eq!(
            RawSearchParams::from_body(Some("text/plain"), b"postStr=x"),
            RawSearchParams::default()
        );
        assert_eq!(RawSearchParams::from_body(None, b""), RawSearchParams::default());
    }

    #[test]
    fn body_wins_and_query_fills_gaps() {
        let body = raw(Some("from-body"), None, None);
        let query = raw(Some("from-query"), Some("query"), Some("abc"));
        assert_eq!(
            body.or(query),
            raw(Some("from-body"), Some("query"), Some("abc"))
        );
    }
}
