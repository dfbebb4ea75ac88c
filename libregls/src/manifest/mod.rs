//! Manifest and config blob data structures.
//!
//! A registry answers a manifest request in one of several shapes depending on
//! the `Accept` header and on what was pushed under the tag. [`ManifestShape`]
//! captures the shapes we care about and [`ManifestShape::from_bytes`] inspects
//! the JSON to pick one, instead of relying on zero-value defaults.

use crate::error::{RegistryError, Result};
use serde::Deserialize;

#[cfg(test)]
mod tests;

/// Media type requested when we need a single-platform manifest.
pub const MEDIA_TYPE_MANIFEST_V2: &str = "application/vnd.docker.distribution.manifest.v2+json";

/// Media type requested when we need a multi-platform manifest list.
pub const MEDIA_TYPE_MANIFEST_LIST_V2: &str =
    "application/vnd.docker.distribution.manifest.list.v2+json";

/// Build target of a manifest list entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Platform {
    #[serde(default)]
    pub architecture: String,
    #[serde(default)]
    pub os: String,
}

/// One per-platform entry of a manifest list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformEntry {
    #[serde(default)]
    pub media_type: String,
    #[serde(default)]
    pub digest: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub platform: Platform,
}

/// The shape a registry returned for a manifest request.
///
/// # Examples
///
/// ```
/// use libregls::manifest::ManifestShape;
///
/// let body = br#"{"manifests": [], "architecture": "amd64"}"#;
/// let shape = ManifestShape::from_bytes(body).unwrap();
/// assert_eq!(shape.architectures(), vec!["amd64".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestShape {
    /// A single-platform manifest referencing a config blob.
    SinglePlatform {
        config_digest: String,
        architecture: Option<String>,
    },
    /// A manifest list with one entry per platform.
    MultiPlatform { manifests: Vec<PlatformEntry> },
    /// Neither a list nor a config reference, only a top-level architecture.
    FallbackSingleArch { architecture: String },
}

#[derive(Deserialize)]
struct ListFields {
    #[serde(default)]
    manifests: Option<Vec<PlatformEntry>>,
}

#[derive(Deserialize)]
struct ConfigReference {
    #[serde(default)]
    digest: Option<String>,
}

#[derive(Deserialize)]
struct SingleFields {
    #[serde(default)]
    config: Option<ConfigReference>,
    #[serde(default)]
    architecture: Option<String>,
}

impl ManifestShape {
    /// Parse a manifest response body, detecting its shape.
    ///
    /// A non-empty `manifests` array wins. Otherwise a `config.digest` makes it a
    /// single-platform manifest, and anything else falls back to the top-level
    /// `architecture` field (missing means empty).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_slice(bytes)
            .map_err(|e| RegistryError::decode_with_source("Failed to parse manifest JSON", e))?;

        if !value.is_object() {
            return Err(RegistryError::decode(
                "Manifest response is not a JSON object",
            ));
        }

        let list: ListFields = serde_json::from_value(value.clone()).map_err(|e| {
            RegistryError::decode_with_source("Failed to parse manifest list entries", e)
        })?;
        if let Some(manifests) = list.manifests.filter(|m| !m.is_empty()) {
            return Ok(ManifestShape::MultiPlatform { manifests });
        }

        let single: SingleFields = serde_json::from_value(value)
            .map_err(|e| RegistryError::decode_with_source("Failed to parse manifest", e))?;

        match single.config.and_then(|c| c.digest).filter(|d| !d.is_empty()) {
            Some(config_digest) => Ok(ManifestShape::SinglePlatform {
                config_digest,
                architecture: single.architecture,
            }),
            None => Ok(ManifestShape::FallbackSingleArch {
                architecture: single.architecture.unwrap_or_default(),
            }),
        }
    }

    /// Returns the config digest of a single-platform manifest.
    pub fn config_digest(&self) -> Option<&str> {
        match self {
            ManifestShape::SinglePlatform { config_digest, .. } => Some(config_digest),
            _ => None,
        }
    }

    /// Returns true if this is a manifest list.
    pub fn is_multi_platform(&self) -> bool {
        matches!(self, ManifestShape::MultiPlatform { .. })
    }

    /// Architectures advertised by this manifest, in response order.
    ///
    /// Duplicates are preserved. Single-manifest shapes always yield exactly
    /// one entry, which is empty when the registry reported no architecture.
    pub fn architectures(&self) -> Vec<String> {
        match self {
            ManifestShape::MultiPlatform { manifests } => manifests
                .iter()
                .map(|m| m.platform.architecture.clone())
                .collect(),
            ManifestShape::SinglePlatform { architecture, .. } => {
                vec![architecture.clone().unwrap_or_default()]
            }
            ManifestShape::FallbackSingleArch { architecture } => vec![architecture.clone()],
        }
    }
}

/// Image configuration blob, reduced to the fields we read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConfigBlob {
    /// Creation time, RFC3339 with nanoseconds. Kept verbatim.
    #[serde(default)]
    pub created: String,
}
