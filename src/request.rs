//! Outbound request descriptions
//!
//! A [`RequestDescriptor`] captures everything the transport needs for one
//! call: an absolute target URL and a header map. Descriptors are immutable
//! once built; retries resubmit the same descriptor unchanged.

use crate::error::Result;
use crate::types::StringMap;
use url::Url;

/// An immutable description of one outbound call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    target: Url,
    headers: StringMap,
}

impl RequestDescriptor {
    /// Create a descriptor for an absolute URL with no headers
    pub fn new(target: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            target: Url::parse(target.as_ref())?,
            headers: StringMap::new(),
        })
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Merge a header map; existing entries win on name collision
    #[must_use]
    pub fn headers(mut self, headers: &StringMap) -> Self {
        for (name, value) in headers {
            self.headers
                .entry(name.clone())
                .or_insert_with(|| value.clone());
        }
        self
    }

    /// The target URL
    pub fn target(&self) -> &Url {
        &self.target
    }

    /// The header map
    pub fn header_map(&self) -> &StringMap {
        &self.headers
    }
}
