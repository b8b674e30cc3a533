//! Load requests handed to an engine view.

use serde::{Deserialize, Serialize};
use url::Url;

/// A navigation request the session layer hands to an engine view.
///
/// Deliberately minimal: anything beyond the target URL (headers,
/// cache policy, referrer) is an engine concern configured on the view
/// itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadRequest {
    /// Target URL of the navigation.
    pub url: Url,
}

impl LoadRequest {
    /// Creates a request for the given URL.
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    /// Parses `input` as a URL and wraps it in a request.
    pub fn parse(input: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(input)?))
    }
}

impl From<Url> for LoadRequest {
    fn from(url: Url) -> Self {
        Self::new(url)
    }
}
