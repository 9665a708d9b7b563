//! Application Controller — the single-user session state machine.
//!
//! Transitions:
//!   Input --begin_generation (valid)--> Processing
//!   Processing --complete_generation--> Output
//!   Processing --fail_generation--> Input (profile kept, notice set)
//!   any --reset--> Input (everything cleared)
//!
//! Every method is synchronous and side-effect free apart from `self`; the
//! async orchestration lives in `service.rs`.

use serde::Serialize;
use thiserror::Error;

use crate::intake::validation::{validate_profile, ValidationErrors};
use crate::models::profile::{Objective, Profile};
use crate::models::script::Script;
use crate::presentation::download::{download_filename, render_download};
use crate::presentation::phrases::PROCESSING_PHRASES;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Input,
    Processing,
    Output,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("a generation is already in progress")]
    Busy,

    #[error("profile can only be edited in the input form")]
    NotEditable,

    #[error("no generated scripts to show")]
    NotInOutput,

    #[error("generation result belongs to a discarded project")]
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BeginError {
    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("profile is incomplete")]
    Invalid(ValidationErrors),
}

/// Snapshot handed to the generator when entering Processing.
#[derive(Debug, Clone)]
pub struct GenerationTicket {
    pub cycle: u64,
    pub profile: Profile,
}

/// The downloadable plain-text document for the current results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct Controller {
    phase: Phase,
    profile: Profile,
    scripts: Vec<Script>,
    errors: ValidationErrors,
    notice: Option<String>,
    phrase_index: usize,
    details_open: bool,
    /// Bumped on every begin and reset so late results can be recognized.
    cycle: u64,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller {
    pub fn new() -> Self {
        Self {
            phase: Phase::Input,
            profile: Profile::default(),
            scripts: Vec::new(),
            errors: ValidationErrors::default(),
            notice: None,
            phrase_index: 0,
            details_open: false,
            cycle: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn scripts(&self) -> &[Script] {
        &self.scripts
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn phrase_index(&self) -> usize {
        self.phrase_index
    }

    pub fn details_open(&self) -> bool {
        self.details_open
    }

    /// True while `cycle` is the generation this controller is waiting on.
    pub fn is_awaiting(&self, cycle: u64) -> bool {
        self.phase == Phase::Processing && self.cycle == cycle
    }

    /// Replaces the form fields as the user types. Repeated objectives collapse
    /// into one.
    pub fn update_profile(&mut self, mut profile: Profile) -> Result<(), TransitionError> {
        self.ensure_editable()?;
        profile.dedup_objectives();
        self.profile = profile;
        self.notice = None;
        Ok(())
    }

    pub fn toggle_objective(&mut self, objective: Objective) -> Result<(), TransitionError> {
        self.ensure_editable()?;
        self.profile.toggle_objective(objective);
        self.notice = None;
        Ok(())
    }

    /// Validates the profile and, if it passes, enters Processing.
    pub fn begin_generation(&mut self) -> Result<GenerationTicket, BeginError> {
        self.ensure_editable()?;

        self.errors = validate_profile(&self.profile);
        if !self.errors.is_empty() {
            return Err(BeginError::Invalid(self.errors.clone()));
        }

        self.cycle += 1;
        self.phase = Phase::Processing;
        self.notice = None;
        self.phrase_index = 0;
        self.scripts.clear();

        Ok(GenerationTicket {
            cycle: self.cycle,
            profile: self.profile.clone(),
        })
    }

    /// Stores the scripts and enters Output. An empty list is treated as a failure.
    pub fn complete_generation(
        &mut self,
        cycle: u64,
        scripts: Vec<Script>,
    ) -> Result<(), TransitionError> {
        if !self.is_awaiting(cycle) {
            return Err(TransitionError::Stale);
        }
        if scripts.is_empty() {
            return self.fail_generation(
                cycle,
                crate::generation::generator::GENERATION_FAILED_MESSAGE,
            );
        }

        self.scripts = scripts;
        self.phase = Phase::Output;
        self.details_open = false;
        Ok(())
    }

    /// Returns to Input with the profile untouched and a notice for the user.
    pub fn fail_generation(&mut self, cycle: u64, message: &str) -> Result<(), TransitionError> {
        if !self.is_awaiting(cycle) {
            return Err(TransitionError::Stale);
        }

        self.phase = Phase::Input;
        self.scripts.clear();
        self.notice = Some(message.to_string());
        Ok(())
    }

    /// Cosmetic: moves to the next processing phrase, wrapping around.
    pub fn advance_phrase(&mut self) {
        if self.phase == Phase::Processing {
            self.phrase_index = (self.phrase_index + 1) % PROCESSING_PHRASES.len();
        }
    }

    pub fn toggle_details(&mut self) -> Result<(), TransitionError> {
        if self.phase != Phase::Output {
            return Err(TransitionError::NotInOutput);
        }
        self.details_open = !self.details_open;
        Ok(())
    }

    /// "New project": back to an empty form from any state.
    pub fn reset(&mut self) {
        self.cycle += 1;
        self.phase = Phase::Input;
        self.profile = Profile::default();
        self.scripts.clear();
        self.errors = ValidationErrors::default();
        self.notice = None;
        self.phrase_index = 0;
        self.details_open = false;
    }

    pub fn download(&self) -> Result<Download, TransitionError> {
        if self.phase != Phase::Output {
            return Err(TransitionError::NotInOutput);
        }
        Ok(Download {
            filename: download_filename(&self.profile.name),
            body: render_download(&self.scripts),
        })
    }

    fn ensure_editable(&self) -> Result<(), TransitionError> {
        match self.phase {
            Phase::Processing => Err(TransitionError::Busy),
            Phase::Output => Err(TransitionError::NotEditable),
            Phase::Input => Ok(()),
        }
    }
}
