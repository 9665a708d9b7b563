// Script generation: prompt building, the provider call and post-parse checks.
// All LLM calls go through llm_client — no direct provider calls here.

pub mod generator;
pub mod prompts;
