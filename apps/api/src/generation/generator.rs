//! Script Generation — turns a validated profile into a sequence of scripts.
//!
//! Flow: build prompt → LLM call with response schema → parse → post-parse checks.
//!
//! A single failed attempt fails the whole operation; nothing is retried.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::generation::prompts::{script_response_schema, script_system, SCRIPT_PROMPT_TEMPLATE};
use crate::llm_client::{LlmClient, LlmError};
use crate::models::profile::{Objective, Profile};
use crate::models::script::Script;

/// Message shown to the user for every generation failure. The cause is only logged.
pub const GENERATION_FAILED_MESSAGE: &str =
    "Falha ao gerar roteiros. Verifique sua conexão ou tente novamente.";

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("provider call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("provider returned invalid scripts: {0}")]
    InvalidScripts(String),
}

impl GenerationError {
    /// The generic text surfaced to the end user.
    pub fn user_message(&self) -> &'static str {
        GENERATION_FAILED_MESSAGE
    }
}

/// Produces scripts for a profile. The session awaits this before leaving Processing.
#[async_trait]
pub trait ScriptGenerator: Send + Sync {
    async fn generate(&self, profile: &Profile) -> Result<Vec<Script>, GenerationError>;
}

/// Generator backed by the Gemini client with a schema-constrained response.
pub struct GeminiScriptGenerator {
    llm: LlmClient,
}

impl GeminiScriptGenerator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }

    async fn request_scripts(&self, profile: &Profile) -> Result<Vec<Script>, GenerationError> {
        let prompt = build_script_prompt(profile);
        let schema = script_response_schema();

        let parsed: Vec<Script> = self
            .llm
            .call_json(&prompt, &script_system(), Some(&schema))
            .await?;

        accept_scripts(parsed)
    }
}

#[async_trait]
impl ScriptGenerator for GeminiScriptGenerator {
    async fn generate(&self, profile: &Profile) -> Result<Vec<Script>, GenerationError> {
        info!("Generating scripts for client '{}'", profile.name);

        match self.request_scripts(profile).await {
            Ok(scripts) => {
                info!(
                    "Generated {} scripts for client '{}'",
                    scripts.len(),
                    profile.name
                );
                Ok(scripts)
            }
            Err(e) => {
                error!("Script generation failed for client '{}': {e}", profile.name);
                Err(e)
            }
        }
    }
}

/// Fills the prompt template with the profile fields.
/// TikTok and website lines are only added when present.
pub fn build_script_prompt(profile: &Profile) -> String {
    let mut extra_channels = String::new();
    if let Some(tiktok) = profile.tiktok() {
        extra_channels.push_str(&format!("\nTikTok: {tiktok}"));
    }
    if let Some(website) = profile.website() {
        extra_channels.push_str(&format!("\nWebsite: {website}"));
    }

    let objective_options = Objective::ALL
        .iter()
        .map(|o| o.label())
        .collect::<Vec<_>>()
        .join(", ");

    let objectives = profile.objectives_label();
    fill_template(
        SCRIPT_PROMPT_TEMPLATE,
        &[
            ("name", profile.name.as_str()),
            ("niche", profile.niche.as_str()),
            ("instagram", profile.instagram.as_str()),
            ("extra_channels", extra_channels.as_str()),
            ("objectives", objectives.as_str()),
            ("objective_options", objective_options.as_str()),
        ],
    )
}

/// Substitutes `{key}` placeholders in a single left-to-right pass, so braces
/// inside substituted values are never expanded. Unknown placeholders are kept.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let value = tail.find('}').and_then(|end| {
            let key = &tail[..end];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, end))
        });
        match value {
            Some((value, end)) => {
                out.push_str(value);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Post-parse checks on what the provider returned.
///
/// Rejects an empty array and any script with a blank title, objective, hook,
/// body or cta. Blank ids are replaced with a fresh UUID. Objectives matching a
/// known label are normalized to it; unknown ones are kept and logged.
pub fn accept_scripts(parsed: Vec<Script>) -> Result<Vec<Script>, GenerationError> {
    if parsed.is_empty() {
        return Err(GenerationError::InvalidScripts(
            "provider returned an empty script list".to_string(),
        ));
    }

    parsed
        .into_iter()
        .enumerate()
        .map(|(idx, mut script)| {
            let blank = [
                ("title", &script.title),
                ("objective", &script.objective),
                ("hook", &script.hook),
                ("body", &script.body),
                ("cta", &script.cta),
            ]
            .into_iter()
            .find(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| field);

            if let Some(field) = blank {
                return Err(GenerationError::InvalidScripts(format!(
                    "script #{} has an empty '{field}'",
                    idx + 1
                )));
            }

            if script.id.trim().is_empty() {
                script.id = Uuid::new_v4().to_string();
            }

            match script.objective.parse::<Objective>() {
                Ok(objective) => script.objective = objective.label().to_string(),
                Err(_) => warn!(
                    "Script #{} has objective '{}' outside the known options",
                    idx + 1,
                    script.objective
                ),
            }

            Ok(script)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn profile() -> Profile {
        Profile {
            name: "Dra. Ana Silva".to_string(),
            niche: "Harmonização Facial".to_string(),
            instagram: "@draanasilva".to_string(),
            tiktok: Some("@ana.tiktok".to_string()),
            website: None,
            objectives: vec![Objective::Sales, Objective::Authority],
        }
    }

    fn script(id: &str, objective: &str) -> Script {
        Script {
            id: id.to_string(),
            title: "O erro que envelhece".to_string(),
            objective: objective.to_string(),
            hook: "Você está fazendo isso errado".to_string(),
            body: "Três sinais de que...".to_string(),
            cta: "Agende sua avaliação".to_string(),
        }
    }

    fn gemini_body(text: &str) -> serde_json::Value {
        json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
    }

    async fn generator_for(server: &MockServer) -> GeminiScriptGenerator {
        GeminiScriptGenerator::new(
            LlmClient::with_base_url("test-key".to_string(), &server.uri()).unwrap(),
        )
    }

    #[test]
    fn test_prompt_embeds_profile_fields() {
        let prompt = build_script_prompt(&profile());
        assert!(prompt.contains("Nome do Cliente: Dra. Ana Silva"));
        assert!(prompt.contains("Nicho/Área: Harmonização Facial"));
        assert!(prompt.contains("Instagram: @draanasilva"));
        assert!(prompt.contains("TikTok: @ana.tiktok"));
        assert!(!prompt.contains("Website:"));
        assert!(prompt.contains("Objetivos Principais: Vendas, Autoridade"));
        assert!(prompt.contains("entre 10 e 15 roteiros"));
        assert!(!prompt.contains('{'), "all placeholders must be replaced");
    }

    #[test]
    fn test_prompt_does_not_expand_braces_in_profile_fields() {
        let mut profile = profile();
        profile.name = "{objectives}".to_string();
        profile.niche = "Estética {niche}".to_string();

        let prompt = build_script_prompt(&profile);
        assert!(prompt.contains("Nome do Cliente: {objectives}\n"));
        assert!(prompt.contains("Nicho/Área: Estética {niche}\n"));
        assert!(prompt.contains("Objetivos Principais: Vendas, Autoridade"));
    }

    #[test]
    fn test_fill_template_keeps_unknown_placeholders() {
        assert_eq!(fill_template("{a} {b} {", &[("a", "x")]), "x {b} {");
    }

    #[test]
    fn test_accept_scripts_rejects_empty_list() {
        let err = accept_scripts(vec![]).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidScripts(_)));
        assert_eq!(err.user_message(), GENERATION_FAILED_MESSAGE);
    }

    #[test]
    fn test_accept_scripts_rejects_blank_field() {
        let mut bad = script("2", "Vendas");
        bad.hook = "  ".to_string();
        let err = accept_scripts(vec![script("1", "Vendas"), bad]).unwrap_err();
        assert!(err.to_string().contains("script #2 has an empty 'hook'"));
    }

    #[test]
    fn test_accept_scripts_assigns_missing_ids_and_keeps_order() {
        let accepted =
            accept_scripts(vec![script("a", "Vendas"), script("", "Autoridade")]).unwrap();
        assert_eq!(accepted.len(), 2);
        assert_eq!(accepted[0].id, "a");
        assert!(Uuid::parse_str(&accepted[1].id).is_ok());
    }

    #[test]
    fn test_accept_scripts_normalizes_known_objective() {
        let accepted =
            accept_scripts(vec![script("1", "vendas"), script("2", "Crescimento")]).unwrap();
        assert_eq!(accepted[0].objective, "Vendas");
        assert_eq!(accepted[1].objective, "Crescimento");
    }

    #[tokio::test]
    async fn test_generate_parses_provider_array() {
        let server = MockServer::start().await;
        let scripts = json!([
            { "id": "1", "title": "A", "objective": "Vendas", "hook": "H", "body": "B", "cta": "C" },
            { "id": "2", "title": "D", "objective": "Autoridade", "hook": "H2", "body": "B2", "cta": "C2" }
        ]);
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(gemini_body(&scripts.to_string())),
            )
            .expect(1)
            .mount(&server)
            .await;

        let generated = generator_for(&server).await.generate(&profile()).await.unwrap();
        assert_eq!(generated.len(), 2);
        assert_eq!(generated[0].title, "A");
        assert_eq!(generated[1].cta, "C2");
    }

    #[tokio::test]
    async fn test_generate_fails_on_shape_mismatch() {
        let server = MockServer::start().await;
        let missing_cta = json!([{ "id": "1", "title": "A", "objective": "Vendas", "hook": "H", "body": "B" }]);
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(gemini_body(&missing_cta.to_string())),
            )
            .mount(&server)
            .await;

        let err = generator_for(&server)
            .await
            .generate(&profile())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Llm(LlmError::Parse(_))));
    }

    #[tokio::test]
    async fn test_generate_fails_on_network_error_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let err = generator_for(&server)
            .await
            .generate(&profile())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Llm(LlmError::Api { status: 500, .. })));
    }
}
