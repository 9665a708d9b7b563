// All LLM prompt constants for the Generation module.

use serde_json::{json, Value};

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

/// Persona for script generation. Combined with `JSON_ONLY_SYSTEM` before sending.
pub const SCRIPT_SYSTEM_PERSONA: &str = "Você é um estrategista de conteúdo especializado \
    em vídeos curtos (Reels, TikTok e Shorts) para marcas pessoais e negócios locais.";

pub fn script_system() -> String {
    format!("{SCRIPT_SYSTEM_PERSONA} {JSON_ONLY_SYSTEM}")
}

/// Script generation prompt template.
/// Replace: {name}, {niche}, {instagram}, {extra_channels}, {objectives}, {objective_options}
pub const SCRIPT_PROMPT_TEMPLATE: &str = r#"Gere entre 10 e 15 roteiros de vídeo curto (Reels/TikTok/Shorts) para o seguinte perfil:
Nome do Cliente: {name}
Nicho/Área: {niche}
Instagram: {instagram}{extra_channels}
Objetivos Principais: {objectives}

Instruções Estratégicas:
- Cada roteiro deve ser autoral, focado em autoridade e conversão.
- O "Hook" (Gancho) deve ser irresistível e durar no máximo 3 segundos.
- O "Body" (Conteúdo) deve entregar valor real ou curiosidade rápida.
- O "CTA" (Chamada para Ação) deve ser direto e relacionado ao objetivo selecionado.
- Use ganchos de curiosidade, quebra de padrão ou promessa de benefício.
- O campo "objective" de cada roteiro deve ser exatamente um destes: {objective_options}.

Retorne estritamente um JSON seguindo o esquema definido."#;

/// Output schema handed to the provider: an array of objects with six required string fields.
pub fn script_response_schema() -> Value {
    let fields = ["id", "title", "objective", "hook", "body", "cta"];
    let properties: serde_json::Map<String, Value> = fields
        .iter()
        .map(|f| (f.to_string(), json!({ "type": "STRING" })))
        .collect();

    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": properties,
            "required": fields,
        }
    })
}
