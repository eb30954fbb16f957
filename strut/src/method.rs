//! HTTP verbs as they appear in Swagger path items.

use strum::{Display, EnumIter, EnumString};

/// HTTP methods a Swagger path item may declare.
///
/// Swagger documents use lowercase keys (`get`, `post`, ...); parsing is ASCII
/// case-insensitive and display is uppercase.
///
/// ## Examples
///
/// ```rust
/// use strut::RestMethod;
///
/// let method: RestMethod = "get".parse().unwrap();
/// assert_eq!(method, RestMethod::Get);
/// assert!(!method.has_body());
/// assert_eq!(method.to_string(), "GET");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum RestMethod {
    /// HTTP GET - Retrieve a resource.
    Get,
    /// HTTP POST - Create a resource or trigger an action.
    Post,
    /// HTTP PUT - Replace a resource entirely.
    Put,
    /// HTTP PATCH - Partially update a resource.
    Patch,
    /// HTTP DELETE - Remove a resource.
    Delete,
    /// HTTP HEAD - Retrieve headers only.
    Head,
    /// HTTP OPTIONS - Query supported methods.
    Options,
    /// HTTP TRACE - Echo the request for debugging.
    Trace,
}

impl RestMethod {
    /// Returns `true` if request parameters travel in a JSON body.
    ///
    /// Every other method sends them as the query string.
    pub fn has_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }

    /// Returns the lowercase verb used as a key in Swagger path items.
    pub fn as_spec_key(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Patch => "patch",
            Self::Delete => "delete",
            Self::Head => "head",
            Self::Options => "options",
            Self::Trace => "trace",
        }
    }

    /// Converts to the equivalent `reqwest::Method`.
    pub fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
            Self::Head => reqwest::Method::HEAD,
            Self::Options => reqwest::Method::OPTIONS,
            Self::Trace => reqwest::Method::TRACE,
        }
    }
}

impl From<RestMethod> for reqwest::Method {
    fn from(method: RestMethod) -> Self {
        method.to_reqwest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_parse_spec_keys() {
        assert_eq!("get".parse::<RestMethod>().unwrap(), RestMethod::Get);
        assert_eq!("delete".parse::<RestMethod>().unwrap(), RestMethod::Delete);
        assert_eq!("POST".parse::<RestMethod>().unwrap(), RestMethod::Post);
        assert!("parameters".parse::<RestMethod>().is_err());
    }

    #[test]
    fn test_spec_key_round_trips() {
        for method in RestMethod::iter() {
            assert_eq!(method.as_spec_key().parse::<RestMethod>().unwrap(), method);
        }
    }

    #[test]
    fn test_has_body() {
        assert!(!RestMethod::Get.has_body());
        assert!(RestMethod::Post.has_body());
        assert!(RestMethod::Put.has_body());
        assert!(RestMethod::Patch.has_body());
        assert!(!RestMethod::Delete.has_body());
    }

    #[test]
    fn test_to_reqwest() {
        assert_eq!(RestMethod::Get.to_reqwest(), reqwest::Method::GET);
        assert_eq!(RestMethod::Patch.to_reqwest(), reqwest::Method::PATCH);
    }
}
