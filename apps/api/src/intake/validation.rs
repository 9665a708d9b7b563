use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::profile::Profile;

pub const NAME_REQUIRED: &str = "Nome é obrigatório";
pub const NICHE_REQUIRED: &str = "Nicho é obrigatório";
pub const INSTAGRAM_REQUIRED: &str = "Instagram é obrigatório";
pub const OBJECTIVES_REQUIRED: &str = "Selecione ao menos um objetivo";

/// Field name → human-readable message. Empty means the profile may proceed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[cfg(test)]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    fn add(&mut self, field: &str, message: &str) {
        self.0.insert(field.to_string(), message.to_string());
    }
}

/// Validates a profile before generation.
///
/// Required: name, niche, instagram (whitespace-only counts as empty) and at
/// least one objective. TikTok and website are optional and never checked.
pub fn validate_profile(profile: &Profile) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if profile.name.trim().is_empty() {
        errors.add("name", NAME_REQUIRED);
    }
    if profile.niche.trim().is_empty() {
        errors.add("niche", NICHE_REQUIRED);
    }
    if profile.instagram.trim().is_empty() {
        errors.add("instagram", INSTAGRAM_REQUIRED);
    }
    if profile.objectives.is_empty() {
        errors.add("objectives", OBJECTIVES_REQUIRED);
    }

    errors
}
