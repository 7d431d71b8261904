//! Sources of scanned resources: the endpoints the running service exposes.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_entity::permission::AccessRequirement;
use warden_entity::resource::ScannedResource;

use crate::permission::RequirementRegistry;

/// Produces the list of protected endpoints the service currently exposes.
#[async_trait]
pub trait EndpointIntrospector: Send + Sync + std::fmt::Debug {
    /// Scan the service's endpoints.
    async fn scan(&self) -> AppResult<Vec<ScannedResource>>;
}

/// One endpoint as declared in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointDeclaration {
    /// Owning module.
    pub module: String,
    /// HTTP method.
    pub method: String,
    /// Route path.
    pub url: String,
    /// Display name; defaults to the resource code.
    #[serde(default)]
    pub name: Option<String>,
    /// Resource code; derived as `{module}:{method}:{url}` when absent.
    #[serde(default)]
    pub code: Option<String>,
    /// Access requirement guarding the endpoint.
    #[serde(default)]
    pub requires: Option<AccessRequirement>,
}

impl EndpointDeclaration {
    /// The declared or derived resource code.
    pub fn resource_code(&self) -> String {
        self.code
            .clone()
            .unwrap_or_else(|| ScannedResource::derive_code(&self.module, &self.method, &self.url))
    }

    /// The scanned resource this declaration stands for.
    pub fn to_scanned(&self) -> ScannedResource {
        let resource_code = self.resource_code();
        ScannedResource {
            resource_name: self.name.clone().unwrap_or_else(|| resource_code.clone()),
            resource_code,
            module: self.module.clone(),
            url: self.url.clone(),
            method: self.method.to_ascii_uppercase(),
        }
    }

    fn validate(&self, index: usize) -> AppResult<()> {
        let blank = [
            ("module", &self.module),
            ("method", &self.method),
            ("url", &self.url),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty());
        match blank {
            Some((field, _)) => Err(AppError::validation(format!(
                "Endpoint #{index} in manifest has an empty '{field}'"
            ))),
            None => Ok(()),
        }
    }
}

/// A JSON document listing the service's endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointManifest {
    /// Declared endpoints.
    #[serde(default)]
    pub endpoints: Vec<EndpointDeclaration>,
}

impl EndpointManifest {
    /// Parse and validate a manifest.
    pub fn parse(json: &str) -> AppResult<Self> {
        let manifest: Self = serde_json::from_str(json)?;
        for (index, endpoint) in manifest.endpoints.iter().enumerate() {
            endpoint.validate(index)?;
        }
        Ok(manifest)
    }

    /// Read and parse a manifest file.
    pub async fn load(path: &std::path::Path) -> AppResult<Self> {
        let json = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::with_source(
                warden_core::ErrorKind::Configuration,
                format!("Failed to read endpoint manifest {}", path.display()),
                e,
            )
        })?;
        Self::parse(&json)
    }

    /// Every declared endpoint as a scanned resource.
    pub fn scanned(&self) -> Vec<ScannedResource> {
        self.endpoints
            .iter()
            .map(EndpointDeclaration::to_scanned)
            .collect()
    }

    /// Registry of the requirements declared on the endpoints.
    pub fn requirements(&self) -> RequirementRegistry {
        self.endpoints
            .iter()
            .filter_map(|e| e.requires.clone().map(|r| (e, r)))
            .fold(RequirementRegistry::new(), |registry, (e, r)| {
                registry.with(&e.method, &e.url, r)
            })
    }
}

#[derive(Debug, Clone)]
enum ManifestSource {
    File(PathBuf),
    Inline(EndpointManifest),
}

/// Introspector reading endpoints from an [`EndpointManifest`].
///
/// A file-backed introspector re-reads the file on every scan.
#[derive(Debug, Clone)]
pub struct ManifestIntrospector {
    source: ManifestSource,
}

impl ManifestIntrospector {
    /// Introspector over a manifest file.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            source: ManifestSource::File(path.into()),
        }
    }

    /// Introspector over an already parsed manifest.
    pub fn from_manifest(manifest: EndpointManifest) -> Self {
        Self {
            source: ManifestSource::Inline(manifest),
        }
    }

    /// Load the current manifest.
    pub async fn manifest(&self) -> AppResult<EndpointManifest> {
        match &self.source {
            ManifestSource::File(path) => EndpointManifest::load(path).await,
            ManifestSource::Inline(manifest) => Ok(manifest.clone()),
        }
    }
}

#[async_trait]
impl EndpointIntrospector for ManifestIntrospector {
    async fn scan(&self) -> AppResult<Vec<ScannedResource>> {
        let scanned = self.manifest().await?.scanned();
        debug!(endpoints = scanned.len(), "Scanned endpoint manifest");
        Ok(scanned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "endpoints": [
            {"module": "user", "method": "GET", "url": "/users", "name": "List users", "code": "user:list",
             "requires": {"roles": ["admin", "ops"], "resources": ["user:list"], "both_required": false}},
            {"module": "user", "method": "delete", "url": "/users/{id}"}
        ]
    }"#;

    #[tokio::test]
    async fn test_scan_derives_missing_codes() {
        let manifest = EndpointManifest::parse(MANIFEST).unwrap();
        let scanned = ManifestIntrospector::from_manifest(manifest).scan().await.unwrap();

        assert_eq!(scanned.len(), 2);
        assert_eq!(scanned[0].resource_code, "user:list");
        assert_eq!(scanned[0].resource_name, "List users");
        assert_eq!(scanned[1].resource_code, "user:delete:/users/{id}");
        assert_eq!(scanned[1].resource_name, "user:delete:/users/{id}");
        assert_eq!(scanned[1].method, "DELETE");
    }

    #[test]
    fn test_requirements_registry() {
        let registry = EndpointManifest::parse(MANIFEST).unwrap().requirements();
        assert_eq!(registry.len(), 1);
        let req = registry.requirement_for("GET", "/users").unwrap();
        assert!(!req.both_required);
        assert!(registry.requirement_for("DELETE", "/users/{id}").is_none());
    }

    #[test]
    fn test_blank_fields_rejected() {
        let err = EndpointManifest::parse(r#"{"endpoints":[{"module":"","method":"GET","url":"/x"}]}"#)
            .unwrap_err();
        assert_eq!(err.kind, warden_core::ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_missing_file_is_configuration_error() {
        let err = ManifestIntrospector::from_path("/nonexistent/endpoints.json")
            .scan()
            .await
            .unwrap_err();
        assert_eq!(err.kind, warden_core::ErrorKind::Configuration);
    }
}
