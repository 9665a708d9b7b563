use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Marketing goal a client can select for the generated videos.
/// Serialized with the labels shown in the form; deserialized through `FromStr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Objective {
    #[serde(rename = "Vendas")]
    Sales,
    #[serde(rename = "Engajamento")]
    Engagement,
    #[serde(rename = "Autoridade")]
    Authority,
    #[serde(rename = "Educação")]
    Education,
    #[serde(rename = "Viralização")]
    Virality,
    #[serde(rename = "Conexão")]
    Connection,
}

impl Objective {
    /// All options, in the order the form lists them.
    pub const ALL: [Objective; 6] = [
        Objective::Sales,
        Objective::Engagement,
        Objective::Authority,
        Objective::Education,
        Objective::Virality,
        Objective::Connection,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Objective::Sales => "Vendas",
            Objective::Engagement => "Engajamento",
            Objective::Authority => "Autoridade",
            Objective::Education => "Educação",
            Objective::Virality => "Viralização",
            Objective::Connection => "Conexão",
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown objective '{0}'")]
pub struct UnknownObjective(pub String);

impl FromStr for Objective {
    type Err = UnknownObjective;

    /// Case-insensitive match against the form labels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Objective::ALL
            .into_iter()
            .find(|o| o.label().to_lowercase() == needle)
            .ok_or_else(|| UnknownObjective(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for Objective {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}

/// Client intake record filled in by the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub niche: String,
    pub instagram: String,
    #[serde(default)]
    pub tiktok: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    /// Selection order is preserved; no duplicates.
    #[serde(default)]
    pub objectives: Vec<Objective>,
}

impl Profile {
    /// Adds the objective if absent, removes it if present.
    pub fn toggle_objective(&mut self, objective: Objective) {
        if let Some(pos) = self.objectives.iter().position(|o| *o == objective) {
            self.objectives.remove(pos);
        } else {
            self.objectives.push(objective);
        }
    }

    /// Drops repeated objectives, keeping the first occurrence of each.
    pub fn dedup_objectives(&mut self) {
        let mut seen = Vec::with_capacity(self.objectives.len());
        self.objectives.retain(|o| {
            if seen.contains(o) {
                false
            } else {
                seen.push(*o);
                true
            }
        });
    }

    pub fn tiktok(&self) -> Option<&str> {
        non_blank(self.tiktok.as_deref())
    }

    pub fn website(&self) -> Option<&str> {
        non_blank(self.website.as_deref())
    }

    /// Objective labels joined with ", " for prompts and summaries.
    pub fn objectives_label(&self) -> String {
        self.objectives
            .iter()
            .map(|o| o.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
