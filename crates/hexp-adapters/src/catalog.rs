//! Filesystem-backed template catalog.
//!
//! # Directory layout expected
//!
//! ```text
//! <root>/
//! └── templates/
//!     ├── bases/
//!     │   └── next-app/
//!     │       ├── manifest.json   ← "type": "base"
//!     │       └── files/...
//!     └── addons/
//!         ├── prisma/
//!         │   └── manifest.json   ← "type": "addon"
//!         └── testing/
//!             └── vitest/
//!                 └── manifest.json
//! ```
//!
//! Both folders are walked recursively. A broken manifest never stops the
//! scan: it is recorded as a [`ScanError`], logged at `WARN`, and skipped.
//!
//! [`Catalog`] caches the scan until [`Catalog::refresh`] is called.

use std::{
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use serde::Serialize;
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use hexp_core::{
    application::{ApplicationError, ports::TemplateCatalog},
    domain::{AddonTemplate, BaseTemplate, Manifest, TemplateKind},
    error::HexpResult,
};

use crate::manifest::{MANIFEST_FILE, ManifestLoader};

/// A manifest (or folder) that could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanError {
    pub path: PathBuf,
    pub error: String,
}

impl ScanError {
    fn new(path: impl Into<PathBuf>, error: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            error: error.into(),
        }
    }
}

/// Everything one scan found. Templates are sorted by id.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CatalogScan {
    pub bases: Vec<BaseTemplate>,
    pub addons: Vec<AddonTemplate>,
    pub errors: Vec<ScanError>,
}

// ── Scanner ───────────────────────────────────────────────────────────────────

/// Walks `<root>/templates/{bases,addons}` and loads every manifest found.
pub struct TemplateScanner {
    root: PathBuf,
}

impl TemplateScanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Folder holding templates of `kind`.
    pub fn kind_dir(&self, kind: TemplateKind) -> PathBuf {
        self.root.join("templates").join(kind.dir_name())
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn scan(&self) -> CatalogScan {
        let mut scan = CatalogScan::default();

        for kind in [TemplateKind::Base, TemplateKind::Addon] {
            for manifest in self.scan_kind(kind, &mut scan.errors) {
                match manifest {
                    Manifest::Base(base) => scan.bases.push(base),
                    Manifest::Addon(addon) => scan.addons.push(addon),
                }
            }
        }

        scan.bases.sort_by(|a, b| a.id.cmp(&b.id));
        scan.addons.sort_by(|a, b| a.id.cmp(&b.id));

        debug!(
            bases = scan.bases.len(),
            addons = scan.addons.len(),
            errors = scan.errors.len(),
            "finished scanning templates"
        );
        scan
    }

    fn scan_kind(&self, kind: TemplateKind, errors: &mut Vec<ScanError>) -> Vec<Manifest> {
        let dir = self.kind_dir(kind);
        if !dir.is_dir() {
            let label = match kind {
                TemplateKind::Base => "Bases",
                TemplateKind::Addon => "Addons",
            };
            errors.push(ScanError::new(&dir, format!("{label} directory not found")));
            return Vec::new();
        }

        let mut found = Vec::new();
        for entry in WalkDir::new(&dir).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.clone());
                    warn!(path = %path.display(), error = %e, "cannot walk template folder");
                    errors.push(ScanError::new(path, e.to_string()));
                    continue;
                }
            };
            if !entry.file_type().is_file() || entry.file_name() != MANIFEST_FILE {
                continue;
            }

            let path = entry.path();
            match ManifestLoader::load(path) {
                Ok(manifest) if manifest.kind() == kind => found.push(manifest),
                Ok(manifest) => {
                    let error = format!(
                        "Expected {kind} template but got type: {}",
                        manifest.kind()
                    );
                    warn!(path = %path.display(), %error, "skipping manifest");
                    errors.push(ScanError::new(path, error));
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping manifest");
                    errors.push(ScanError::new(path, e.to_string()));
                }
            }
        }
        found
    }
}

// ── Catalog ───────────────────────────────────────────────────────────────────

/// Cached view over a templates root.
///
/// The first query scans the disk; later queries reuse the result until
/// [`refresh`](Self::refresh) drops it.
#[derive(Debug)]
pub struct Catalog {
    root: PathBuf,
    cache: RwLock<Option<Arc<CatalogScan>>>,
}

impl Catalog {
    /// Create a catalog rooted at `root` (made absolute, not scanned yet).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let root = std::path::absolute(&root).unwrap_or(root);
        Self {
            root,
            cache: RwLock::new(None),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The cached scan, scanning first if needed.
    pub fn scan(&self) -> HexpResult<Arc<CatalogScan>> {
        {
            let cache = self.cache.read().map_err(|_| ApplicationError::StoreLockError)?;
            if let Some(scan) = cache.as_ref() {
                return Ok(Arc::clone(scan));
            }
        }

        let mut cache = self.cache.write().map_err(|_| ApplicationError::StoreLockError)?;
        // Another caller may have filled it while we waited.
        if let Some(scan) = cache.as_ref() {
            return Ok(Arc::clone(scan));
        }
        let scan = Arc::new(TemplateScanner::new(&self.root).scan());
        *cache = Some(Arc::clone(&scan));
        Ok(scan)
    }

    /// Look a template up by id, bases first.
    pub fn get(&self, id: &str) -> HexpResult<Option<Manifest>> {
        let scan = self.scan()?;
        if let Some(base) = scan.bases.iter().find(|b| b.id == id) {
            return Ok(Some(Manifest::Base(base.clone())));
        }
        Ok(scan
            .addons
            .iter()
            .find(|a| a.id == id)
            .map(|addon| Manifest::Addon(addon.clone())))
    }

    /// Problems found by the last scan.
    pub fn errors(&self) -> HexpResult<Vec<ScanError>> {
        Ok(self.scan()?.errors.clone())
    }

    /// Drop the cached scan; the next query rescans.
    pub fn refresh(&self) -> HexpResult<()> {
        let mut cache = self.cache.write().map_err(|_| ApplicationError::StoreLockError)?;
        *cache = None;
        debug!(root = %self.root.display(), "catalog cache cleared");
        Ok(())
    }
}

impl TemplateCatalog for Catalog {
    fn bases(&self) -> HexpResult<Vec<BaseTemplate>> {
        Ok(self.scan()?.bases.clone())
    }

    fn addons(&self) -> HexpResult<Vec<AddonTemplate>> {
        Ok(self.scan()?.addons.clone())
    }

    fn template_dir(&self, kind: TemplateKind, id: &str) -> Option<PathBuf> {
        let dir = TemplateScanner::new(&self.root).kind_dir(kind).join(id);
        dir.join(MANIFEST_FILE).is_file().then_some(dir)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn base_manifest(id: &str) -> String {
        format!(
            r#"{{"id": "{id}", "type": "base", "name": "{id}", "description": "base", "capabilities": ["web-server"]}}"#
        )
    }

    fn addon_manifest(id: &str) -> String {
        format!(
            r#"{{"id": "{id}", "type": "addon", "name": "{id}", "description": "addon", "provides": ["{id}"]}}"#
        )
    }

    fn make_root(manifests: &[(&str, &str)]) -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("templates/bases")).unwrap();
        fs::create_dir_all(tmp.path().join("templates/addons")).unwrap();
        for (rel, body) in manifests {
            let path = tmp.path().join("templates").join(rel).join(MANIFEST_FILE);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, body).unwrap();
        }
        tmp
    }

    #[test]
    fn scans_bases_and_addons_sorted() {
        let tmp = make_root(&[
            ("bases/web", &base_manifest("web")),
            ("addons/zod", &addon_manifest("zod")),
            ("addons/testing/vitest", &addon_manifest("vitest")),
        ]);

        let scan = TemplateScanner::new(tmp.path()).scan();

        assert!(scan.errors.is_empty(), "{:?}", scan.errors);
        assert_eq!(scan.bases.len(), 1);
        let ids: Vec<&str> = scan.addons.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["vitest", "zod"]);
    }

    #[test]
    fn missing_folders_are_recorded() {
        let tmp = TempDir::new().unwrap();
        let scan = TemplateScanner::new(tmp.path()).scan();

        let messages: Vec<&str> = scan.errors.iter().map(|e| e.error.as_str()).collect();
        assert_eq!(
            messages,
            vec!["Bases directory not found", "Addons directory not found"]
        );
    }

    #[test]
    fn broken_manifest_does_not_stop_scan() {
        let tmp = make_root(&[
            ("addons/bad", "{ nope"),
            ("addons/good", &addon_manifest("good")),
        ]);

        let scan = TemplateScanner::new(tmp.path()).scan();

        assert_eq!(scan.addons.len(), 1);
        assert_eq!(scan.errors.len(), 1);
        assert!(scan.errors[0].path.ends_with("bad/manifest.json"));
    }

    #[test]
    fn manifest_in_wrong_folder_is_an_error() {
        let tmp = make_root(&[("bases/oops", &addon_manifest("oops"))]);

        let scan = TemplateScanner::new(tmp.path()).scan();

        assert!(scan.addons.is_empty());
        assert_eq!(
            scan.errors[0].error,
            "Expected base template but got type: addon"
        );
    }

    #[test]
    fn get_prefers_bases() {
        let tmp = make_root(&[
            ("bases/shared", &base_manifest("shared")),
            ("addons/shared", &addon_manifest("shared")),
        ]);
        let catalog = Catalog::new(tmp.path());

        let found = catalog.get("shared").unwrap().unwrap();
        assert_eq!(found.kind(), TemplateKind::Base);
        assert!(catalog.get("ghost").unwrap().is_none());
    }

    #[test]
    fn cache_holds_until_refresh() {
        let tmp = make_root(&[("bases/web", &base_manifest("web"))]);
        let catalog = Catalog::new(tmp.path());
        assert_eq!(catalog.bases().unwrap().len(), 1);

        let extra = tmp.path().join("templates/bases/api");
        fs::create_dir_all(&extra).unwrap();
        fs::write(extra.join(MANIFEST_FILE), base_manifest("api")).unwrap();

        assert_eq!(catalog.bases().unwrap().len(), 1);
        catalog.refresh().unwrap();
        assert_eq!(catalog.bases().unwrap().len(), 2);
    }

    #[test]
    fn template_dir_requires_manifest() {
        let tmp = make_root(&[("addons/prisma", &addon_manifest("prisma"))]);
        fs::create_dir_all(tmp.path().join("templates/addons/empty")).unwrap();
        let catalog = Catalog::new(tmp.path());

        assert_eq!(
            catalog.template_dir(TemplateKind::Addon, "prisma"),
            Some(catalog.root().join("templates/addons/prisma"))
        );
        assert_eq!(catalog.template_dir(TemplateKind::Addon, "empty"), None);
        assert_eq!(catalog.template_dir(TemplateKind::Base, "prisma"), None);
    }
}
