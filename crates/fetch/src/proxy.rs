//! CORS proxy endpoints.

use crate::error::FailureCause;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder inside an endpoint that gets replaced by the encoded target.
const URL_PLACEHOLDER: &str = "{url}";

/// How a proxy wraps the upstream body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Envelope {
    /// The body is passed through untouched.
    #[default]
    Raw,
    /// The body is a JSON object whose `contents` string field holds the
    /// upstream body.
    JsonContents,
}

/// A third-party relay that fetches a URL on our behalf.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProxyConfig {
    /// Either contains `{url}` or is a prefix the encoded target gets
    /// appended to.
    pub endpoint: String,
    #[serde(default)]
    pub envelope: Envelope,
}

impl ProxyConfig {
    pub fn raw(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into(), envelope: Envelope::Raw }
    }

    pub fn json_contents(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into(), envelope: Envelope::JsonContents }
    }

    /// The URL to request so that the proxy fetches `target`.
    pub fn wrap(&self, target: &str) -> String {
        let encoded = urlencoding::encode(target);
        match self.endpoint.contains(URL_PLACEHOLDER) {
            true => self.endpoint.replace(URL_PLACEHOLDER, &encoded),
            false => format!("{}{encoded}", self.endpoint),
        }
    }

    /// Strip the proxy's envelope from a successful response body.
    pub fn unwrap(&self, body: Vec<u8>) -> Result<Vec<u8>, FailureCause> {
        match self.envelope {
            Envelope::Raw => Ok(body),
            Envelope::JsonContents => unwrap_contents(&body),
        }
    }
}

fn unwrap_contents(body: &[u8]) -> Result<Vec<u8>, FailureCause> {
    let envelope: Value = serde_json::from_slice(body).map_err(|e| FailureCause::Envelope(e.to_string()))?;
    // The relay answers 200 even when upstream didn't.
    if let Some(status) = envelope.pointer("/status/http_code").and_then(Value::as_u64)
        && !(200..300).contains(&status)
    {
        return Err(FailureCause::Status(u16::try_from(status).unwrap_or(u16::MAX)));
    }
    match envelope.get("contents") {
        Some(Value::String(contents)) => Ok(contents.clone().into_bytes()),
        Some(Value::Null) | None => Err(FailureCause::Envelope("missing `contents` field".to_string())),
        Some(_) => Err(FailureCause::Envelope("`contents` is not a string".to_string())),
    }
}

/// Proxies tried, in order, when the direct descriptor download fails.
pub fn default_descriptor_proxies() -> Vec<ProxyConfig> {
    vec![
        ProxyConfig::raw("https://api.codetabs.com/v1/proxy?quest="),
        ProxyConfig::json_contents("https://api.allorigins.win/get?url="),
    ]
}

/// Proxies tried, in order, before the direct image request.
pub fn default_image_proxies() -> Vec<ProxyConfig> {
    vec![
        ProxyConfig::raw("https://api.allorigins.win/raw?url="),
        ProxyConfig::raw("https://cors-anywhere.herokuapp.com/"),
        ProxyConfig::raw("https://corsproxy.io/?"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const TARGET: &str = "https://drive.google.com/uc?export=download&id=abc";
    const ENCODED: &str = "https%3A%2F%2Fdrive.google.com%2Fuc%3Fexport%3Ddownload%26id%3Dabc";

    #[rstest]
    #[case("https://proxy.test/?q=", format!("https://proxy.test/?q={ENCODED}"))]
    #[case("https://proxy.test/fetch/{url}/raw", format!("https://proxy.test/fetch/{ENCODED}/raw"))]
    fn test_wrap(#[case] endpoint: &str, #[case] expected: String) {
        assert_eq!(ProxyConfig::raw(endpoint).wrap(TARGET), expected);
    }

    #[test]
    fn test_unwrap_raw_is_identity() {
        let body = b"{\"titulo\": \"x\"}".to_vec();
        assert_eq!(ProxyConfig::raw("p").unwrap(body.clone()), Ok(body));
    }

    #[test]
    fn test_unwrap_json_contents() {
        let proxy = ProxyConfig::json_contents("p");
        let body = br#"{"contents": "{\"titulo\": \"Mesa\"}", "status": {"http_code": 200}}"#.to_vec();
        assert_eq!(proxy.unwrap(body).unwrap(), br#"{"titulo": "Mesa"}"#);
    }

    #[rstest]
    #[case(r#"{"contents": null}"#)]
    #[case(r#"{"status": {"http_code": 200}}"#)]
    #[case(r#"{"contents": 42}"#)]
    #[case("<html>rate limited</html>")]
    fn test_unwrap_json_contents_malformed(#[case] body: &str) {
        let err = ProxyConfig::json_contents("p").unwrap(body.as_bytes().to_vec()).unwrap_err();
        assert!(matches!(err, FailureCause::Envelope(_)), "{err:?}");
    }

    #[test]
    fn test_unwrap_json_contents_upstream_status() {
        let body = br#"{"contents": "Not Found", "status": {"http_code": 404}}"#.to_vec();
        assert_eq!(ProxyConfig::json_contents("p").unwrap(body), Err(FailureCause::Status(404)));
    }

    #[test]
    fn test_envelope_deserialize() {
        let proxy: ProxyConfig = serde_json::from_str(r#"{"endpoint": "https://p/?u=", "envelope": "json_contents"}"#).unwrap();
        assert_eq!(proxy, ProxyConfig::json_contents("https://p/?u="));
        let proxy: ProxyConfig = serde_json::from_str(r#"{"endpoint": "https://p/?u="}"#).unwrap();
        assert_eq!(proxy.envelope, Envelope::Raw);
    }

    #[test]
    fn test_defaults() {
        let descriptor = default_descriptor_proxies();
        assert_eq!(descriptor.len(), 2);
        assert_eq!(descriptor[1].envelope, Envelope::JsonContents);
        assert!(default_image_proxies().iter().all(|p| p.envelope == Envelope::Raw));
    }
}
