use serde::{Deserialize, Serialize};

/// One generated short-video script. Immutable once accepted from the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    pub id: String,
    pub title: String,
    /// Usually one of the objective labels, but kept as text since it comes from the model.
    pub objective: String,
    pub hook: String,
    pub body: String,
    pub cta: String,
}
