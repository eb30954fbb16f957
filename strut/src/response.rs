//! Responses returned by generated calls.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// A successful HTTP response with its body already parsed.
///
/// JSON bodies are parsed into [`Value`]s; any other content type is kept as
/// a JSON string holding the raw text.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: u16,
    headers: BTreeMap<String, String>,
    body: Value,
}

impl Response {
    pub fn new(status: u16, headers: BTreeMap<String, String>, body: Value) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Response headers with lowercased names.
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn into_body(self) -> Value {
        self.body
    }

    /// Deserializes the body into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Pet {
        id: u64,
        name: String,
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let response = Response::new(
            200,
            BTreeMap::from([("content-type".to_string(), "application/json".to_string())]),
            Value::Null,
        );
        assert_eq!(response.header("Content-Type"), Some("application/json"));
    }

    #[test]
    fn test_body_deserializes() {
        let response = Response::new(200, BTreeMap::new(), json!({ "id": 1, "name": "Rex" }));
        assert_eq!(
            response.json::<Pet>().unwrap(),
            Pet {
                id: 1,
                name: "Rex".to_string()
            }
        );
    }
}
