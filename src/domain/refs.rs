// Object references - identifier or URI based addressing of metadata objects
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ObjRef {
    Identifier(String),
    Uri(String),
}

impl ObjRef {
    pub fn identifier(id: impl Into<String>) -> Self {
        ObjRef::Identifier(id.into())
    }

    pub fn uri(uri: impl Into<String>) -> Self {
        ObjRef::Uri(uri.into())
    }
}

impl fmt::Display for ObjRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjRef::Identifier(id) => write!(f, "id:{}", id),
            ObjRef::Uri(uri) => write!(f, "uri:{}", uri),
        }
    }
}

/// Stable identity of a persisted (or locally created) metadata object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectIdentity {
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl ObjectIdentity {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            uri: None,
        }
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Identifier refs match the identifier, URI refs match the URI (if any).
    pub fn matches(&self, reference: &ObjRef) -> bool {
        match reference {
            ObjRef::Identifier(id) => &self.identifier == id,
            ObjRef::Uri(uri) => self.uri.as_deref() == Some(uri.as_str()),
        }
    }

    pub fn same_object(&self, other: &ObjectIdentity) -> bool {
        self.identifier == other.identifier
            || (self.uri.is_some() && self.uri == other.uri)
    }

    pub fn to_ref(&self) -> ObjRef {
        ObjRef::Identifier(self.identifier.clone())
    }
}
