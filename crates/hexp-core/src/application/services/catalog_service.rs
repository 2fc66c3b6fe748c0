//! Catalog Service - template selection for a generation run.
//!
//! Turns ids typed by a user into template objects and pairs each selected
//! template with its on-disk directory for the engine.

use tracing::{debug, warn};

use crate::{
    application::{ApplicationError, ports::TemplateCatalog},
    domain::{AddonTemplate, BaseTemplate, DomainError, TemplateKind, TemplateOps, Variables},
    error::HexpResult,
};

/// Templates chosen for one run, in the order they were requested.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub base: BaseTemplate,
    pub addons: Vec<AddonTemplate>,
    /// Requested addon ids the catalog does not know.
    pub unknown_addons: Vec<String>,
}

impl Selection {
    /// Prompt defaults of the base and every addon. The first template to
    /// declare a prompt id wins.
    pub fn prompt_defaults(&self) -> Variables {
        let mut defaults = Variables::new();
        let prompts = self
            .base
            .prompts
            .iter()
            .chain(self.addons.iter().flat_map(|addon| addon.prompts.iter()));
        for prompt in prompts {
            if let Some(default) = &prompt.default {
                defaults.entry(prompt.id.clone()).or_insert_with(|| default.clone());
            }
        }
        defaults
    }
}

/// Operation lists paired with their template directories.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedOps {
    pub base: TemplateOps,
    pub addons: Vec<TemplateOps>,
    pub warnings: Vec<String>,
}

/// Service for template lookup.
pub struct CatalogService {
    catalog: Box<dyn TemplateCatalog>,
}

impl CatalogService {
    /// Create a new catalog service.
    pub fn new(catalog: Box<dyn TemplateCatalog>) -> Self {
        Self { catalog }
    }

    pub fn bases(&self) -> HexpResult<Vec<BaseTemplate>> {
        self.catalog.bases()
    }

    pub fn addons(&self) -> HexpResult<Vec<AddonTemplate>> {
        self.catalog.addons()
    }

    pub fn find_base(&self, id: &str) -> HexpResult<BaseTemplate> {
        self.catalog
            .bases()?
            .into_iter()
            .find(|base| base.id == id)
            .ok_or_else(|| {
                DomainError::TemplateNotFound {
                    kind: TemplateKind::Base.as_str(),
                    id: id.to_string(),
                }
                .into()
            })
    }

    /// Look up a base and addons by id. Unknown addons are collected, not
    /// treated as errors.
    pub fn select(&self, base_id: &str, addon_ids: &[String]) -> HexpResult<Selection> {
        let base = self.find_base(base_id)?;
        let available = self.catalog.addons()?;

        let mut addons = Vec::with_capacity(addon_ids.len());
        let mut unknown_addons = Vec::new();
        for id in addon_ids {
            match available.iter().find(|addon| &addon.id == id) {
                Some(addon) => addons.push(addon.clone()),
                None => {
                    warn!(addon = %id, "addon not found in catalog");
                    unknown_addons.push(id.clone());
                }
            }
        }

        debug!(base = %base.id, addons = addons.len(), "templates selected");
        Ok(Selection {
            base,
            addons,
            unknown_addons,
        })
    }

    /// Pair the base and each addon with its directory. A base without a
    /// directory is an error; such addons are skipped with a warning.
    pub fn template_ops(&self, base: &BaseTemplate, addons: &[AddonTemplate]) -> HexpResult<PlannedOps> {
        let base_dir = self
            .catalog
            .template_dir(TemplateKind::Base, &base.id)
            .ok_or_else(|| ApplicationError::TemplateDirectoryMissing {
                kind: TemplateKind::Base.as_str(),
                id: base.id.clone(),
            })?;

        let mut planned = Vec::with_capacity(addons.len());
        let mut warnings = Vec::new();
        for addon in addons {
            match self.catalog.template_dir(TemplateKind::Addon, &addon.id) {
                Some(dir) => planned.push(TemplateOps::new(addon.id.clone(), dir, addon.ops.clone())),
                None => {
                    warn!(addon = %addon.id, "addon directory missing, skipping");
                    warnings.push(format!("Addon '{}' has no template directory and was skipped", addon.id));
                }
            }
        }

        Ok(PlannedOps {
            base: TemplateOps::new(base.id.clone(), base_dir, base.ops.clone()),
            addons: planned,
            warnings,
        })
    }
}
