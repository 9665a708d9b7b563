//! View models returned to the browser, one variant per application state.

use serde::Serialize;

use crate::intake::validation::ValidationErrors;
use crate::models::profile::{Objective, Profile};
use crate::models::script::Script;
use crate::presentation::download::{copy_text, download_filename};
use crate::presentation::phrases::phrase_at;
use crate::session::controller::{Controller, Phase};

pub const WEBSITE_NOT_INFORMED: &str = "Não informado";

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum View {
    Input(InputView),
    Processing(ProcessingView),
    Output(OutputView),
}

#[derive(Debug, Clone, Serialize)]
pub struct InputView {
    pub profile: Profile,
    pub errors: ValidationErrors,
    pub objective_options: Vec<Objective>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessingView {
    pub phrase: &'static str,
    pub phrase_index: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutputView {
    pub profile: Profile,
    pub details: ProfileDetails,
    pub details_open: bool,
    pub cards: Vec<ScriptCard>,
    pub download_filename: String,
}

/// Contents of the collapsible panel above the card grid.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileDetails {
    pub instagram: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tiktok: Option<String>,
    pub website: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScriptCard {
    #[serde(flatten)]
    pub script: Script,
    pub copy_text: String,
}

impl View {
    pub fn of(controller: &Controller) -> Self {
        match controller.phase() {
            Phase::Input => View::Input(InputView {
                profile: controller.profile().clone(),
                errors: controller.errors().clone(),
                objective_options: Objective::ALL.to_vec(),
                notice: controller.notice().map(str::to_string),
            }),
            Phase::Processing => View::Processing(ProcessingView {
                phrase: phrase_at(controller.phrase_index()),
                phrase_index: controller.phrase_index(),
            }),
            Phase::Output => {
                let profile = controller.profile();
                View::Output(OutputView {
                    profile: profile.clone(),
                    details: ProfileDetails {
                        instagram: profile.instagram.clone(),
                        tiktok: profile.tiktok().map(str::to_string),
                        website: profile
                            .website()
                            .unwrap_or(WEBSITE_NOT_INFORMED)
                            .to_string(),
                    },
                    details_open: controller.details_open(),
                    cards: controller
                        .scripts()
                        .iter()
                        .map(|s| ScriptCard {
                            script: s.clone(),
                            copy_text: copy_text(s),
                        })
                        .collect(),
                    download_filename: download_filename(&profile.name),
                })
            }
        }
    }
}
