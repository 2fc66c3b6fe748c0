use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::domain::{
    entities::{AddonTemplate, BaseTemplate, Manifest, Prompt, PromptType},
    error::DomainError,
};

fn id_pattern() -> &'static Regex {
    static ID: OnceLock<Regex> = OnceLock::new();
    ID.get_or_init(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("id pattern is valid"))
}

/// Centralized manifest validation.
///
/// Deserialization only guarantees shape; the rules here are the ones a
/// manifest author can still get wrong.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_manifest(manifest: &Manifest) -> Result<(), DomainError> {
        match manifest {
            Manifest::Base(base) => Self::validate_base(base),
            Manifest::Addon(addon) => Self::validate_addon(addon),
        }
    }

    pub fn validate_base(base: &BaseTemplate) -> Result<(), DomainError> {
        Self::validate_identity(&base.id, &base.name, &base.description)?;
        if base.capabilities.is_empty() {
            return Err(DomainError::NoCapabilities {
                template_id: base.id.clone(),
            });
        }
        Self::validate_prompts(&base.id, &base.prompts)
    }

    pub fn validate_addon(addon: &AddonTemplate) -> Result<(), DomainError> {
        Self::validate_identity(&addon.id, &addon.name, &addon.description)?;
        let declares_something = [&addon.requires, &addon.provides, &addon.conflicts]
            .iter()
            .any(|list| list.iter().any(|entry| !entry.is_empty()));
        if !declares_something {
            return Err(DomainError::InertAddon {
                template_id: addon.id.clone(),
            });
        }
        Self::validate_prompts(&addon.id, &addon.prompts)
    }

    pub fn validate_template_id(id: &str) -> Result<(), DomainError> {
        if id_pattern().is_match(id) {
            Ok(())
        } else {
            Err(DomainError::InvalidTemplateId { id: id.to_string() })
        }
    }

    fn validate_identity(id: &str, name: &str, description: &str) -> Result<(), DomainError> {
        if id.is_empty() {
            return Err(DomainError::MissingRequiredField { field: "id" });
        }
        Self::validate_template_id(id)?;
        if name.trim().is_empty() {
            return Err(DomainError::MissingRequiredField { field: "name" });
        }
        if description.trim().is_empty() {
            return Err(DomainError::MissingRequiredField {
                field: "description",
            });
        }
        Ok(())
    }

    fn validate_prompts(template_id: &str, prompts: &[Prompt]) -> Result<(), DomainError> {
        let mut seen = HashSet::new();
        for prompt in prompts {
            if prompt.id.is_empty() {
                return Err(DomainError::MissingRequiredField { field: "prompts.id" });
            }
            if !seen.insert(prompt.id.as_str()) {
                return Err(DomainError::DuplicatePrompt {
                    template_id: template_id.to_string(),
                    prompt_id: prompt.id.clone(),
                });
            }
            let needs_options = matches!(prompt.kind, PromptType::Select | PromptType::Multiselect);
            if needs_options && prompt.options.is_empty() {
                return Err(DomainError::PromptWithoutOptions {
                    template_id: template_id.to_string(),
                    prompt_id: prompt.id.clone(),
                });
            }
        }
        Ok(())
    }
}
