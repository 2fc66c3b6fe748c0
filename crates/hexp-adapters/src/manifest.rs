//! `manifest.json` loading.
//!
//! Three things can go wrong with a manifest, and callers report them
//! differently, so [`ManifestError`] keeps them apart:
//!
//! 1. the file is not there,
//! 2. the file is not JSON (or not readable),
//! 3. the JSON does not describe a valid template.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

use hexp_core::domain::{DomainValidator, Manifest};

/// File name every template directory must contain.
pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Manifest not found at path: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to parse manifest at {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("Manifest validation failed at {}: {reason}", path.display())]
    Validation { path: PathBuf, reason: String },
}

impl ManifestError {
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path } | Self::Parse { path, .. } | Self::Validation { path, .. } => {
                path
            }
        }
    }
}

/// Reads and validates template manifests.
pub struct ManifestLoader;

impl ManifestLoader {
    /// Load the manifest at `path`.
    ///
    /// # Errors
    ///
    /// - [`ManifestError::NotFound`] if nothing exists at `path`
    /// - [`ManifestError::Parse`] if the file cannot be read or is not JSON
    /// - [`ManifestError::Validation`] if the JSON is not a valid base or
    ///   addon manifest
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Manifest, ManifestError> {
        let raw = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ManifestError::NotFound {
                path: path.to_path_buf(),
            },
            _ => ManifestError::Parse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            },
        })?;

        let manifest = Self::parse(path, &raw)?;
        debug!(id = manifest.id(), kind = %manifest.kind(), "loaded manifest");
        Ok(manifest)
    }

    /// Decode and validate manifest text; `path` is only used for errors.
    pub fn parse(path: &Path, raw: &str) -> Result<Manifest, ManifestError> {
        let value: Value = serde_json::from_str(raw).map_err(|e| ManifestError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let validation = |reason: String| ManifestError::Validation {
            path: path.to_path_buf(),
            reason,
        };

        let manifest: Manifest = serde_json::from_value(value).map_err(|e| validation(e.to_string()))?;
        DomainValidator::validate_manifest(&manifest).map_err(|e| validation(e.to_string()))?;
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use hexp_core::domain::{Operation, TemplateKind};
    use tempfile::TempDir;

    use super::*;

    fn write_manifest(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join(MANIFEST_FILE);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn loads_base_manifest_with_ops() {
        let tmp = TempDir::new().unwrap();
        let path = write_manifest(
            &tmp,
            r#"{
                "id": "next-app",
                "type": "base",
                "name": "Next.js",
                "description": "App router starter",
                "capabilities": ["web-server"],
                "ops": [{"type": "copy", "from": "files/README.md", "to": "README.md"}]
            }"#,
        );

        let manifest = ManifestLoader::load(&path).unwrap();
        assert_eq!(manifest.kind(), TemplateKind::Base);
        assert_eq!(manifest.id(), "next-app");
        assert_eq!(manifest.ops(), &[Operation::copy("files/README.md", "README.md")]);
    }

    #[test]
    fn missing_file_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = ManifestLoader::load(&tmp.path().join(MANIFEST_FILE)).unwrap_err();
        assert!(matches!(err, ManifestError::NotFound { .. }));
        assert!(err.to_string().starts_with("Manifest not found at path:"));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = write_manifest(&tmp, "{ not json");
        assert!(matches!(
            ManifestLoader::load(&path),
            Err(ManifestError::Parse { .. })
        ));
    }

    #[test]
    fn unknown_type_is_validation_error() {
        let err = ManifestLoader::parse(
            Path::new("m.json"),
            r#"{"id": "x", "type": "plugin", "name": "X", "description": "d"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ManifestError::Validation { .. }));
    }

    #[test]
    fn domain_rules_apply_after_decoding() {
        let err = ManifestLoader::parse(
            Path::new("m.json"),
            r#"{"id": "web", "type": "base", "name": "Web", "description": "d", "capabilities": []}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ManifestError::Validation { .. }));
        assert!(err.to_string().contains("at least one capability"));
        assert_eq!(err.path(), Path::new("m.json"));
    }
}
