//! Session orchestration: validation → generation (awaited) → sync (detached).
//!
//! The controller is mutated only under the session mutex and the lock is never
//! held across the provider call. Generation runs on its own task so a client
//! disconnect cannot strand the session in Processing.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{error, info};

use crate::errors::AppError;
use crate::generation::generator::{ScriptGenerator, GENERATION_FAILED_MESSAGE};
use crate::models::profile::{Objective, Profile};
use crate::presentation::phrases::PHRASE_INTERVAL;
use crate::presentation::view::View;
use crate::session::controller::{
    BeginError, Controller, Download, GenerationTicket, Phase, TransitionError,
};
use crate::session::ticker::PhraseTicker;
use crate::sync::webhook::{spawn_sync, BackendSync};

pub struct Session {
    pub(crate) controller: Controller,
    ticker: Option<PhraseTicker>,
}

#[derive(Clone)]
pub struct SessionService {
    session: Arc<Mutex<Session>>,
    generator: Arc<dyn ScriptGenerator>,
    sync: Arc<dyn BackendSync>,
    phrase_interval: Duration,
}

impl SessionService {
    pub fn new(generator: Arc<dyn ScriptGenerator>, sync: Arc<dyn BackendSync>) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session {
                controller: Controller::new(),
                ticker: None,
            })),
            generator,
            sync,
            phrase_interval: PHRASE_INTERVAL,
        }
    }

    pub async fn view(&self) -> View {
        View::of(&self.session.lock().await.controller)
    }

    pub async fn update_profile(&self, profile: Profile) -> Result<View, AppError> {
        let mut session = self.session.lock().await;
        session.controller.update_profile(profile)?;
        Ok(View::of(&session.controller))
    }

    pub async fn toggle_objective(&self, objective: Objective) -> Result<View, AppError> {
        let mut session = self.session.lock().await;
        session.controller.toggle_objective(objective)?;
        Ok(View::of(&session.controller))
    }

    pub async fn toggle_details(&self) -> Result<View, AppError> {
        let mut session = self.session.lock().await;
        session.controller.toggle_details()?;
        Ok(View::of(&session.controller))
    }

    pub async fn reset(&self) -> View {
        let mut session = self.session.lock().await;
        session.ticker = None;
        session.controller.reset();
        info!("Session reset to a new project");
        View::of(&session.controller)
    }

    pub async fn download(&self) -> Result<Download, AppError> {
        Ok(self.session.lock().await.controller.download()?)
    }

    /// Runs one generation cycle and returns the resulting view.
    pub async fn generate(&self) -> Result<View, AppError> {
        let ticket = {
            let mut session = self.session.lock().await;
            let ticket = match session.controller.begin_generation() {
                Ok(ticket) => ticket,
                Err(BeginError::Invalid(errors)) => {
                    info!(
                        "Generation blocked by validation: {}",
                        errors.fields().collect::<Vec<_>>().join(", ")
                    );
                    return Err(AppError::Validation(errors));
                }
                Err(e) => return Err(e.into()),
            };
            session.ticker = Some(PhraseTicker::start(
                self.session.clone(),
                self.phrase_interval,
            ));
            ticket
        };
        let cycle = ticket.cycle;
        info!("Generation cycle {cycle} started for '{}'", ticket.profile.name);

        let service = self.clone();
        match tokio::spawn(async move { service.run_generation(ticket).await }).await {
            Ok(result) => result,
            Err(e) => {
                error!("Generation task for cycle {cycle} aborted: {e}");
                let mut session = self.session.lock().await;
                if session.controller.is_awaiting(cycle) {
                    session.ticker = None;
                    session
                        .controller
                        .fail_generation(cycle, GENERATION_FAILED_MESSAGE)?;
                }
                Err(AppError::Generation(GENERATION_FAILED_MESSAGE.to_string()))
            }
        }
    }

    async fn run_generation(&self, ticket: GenerationTicket) -> Result<View, AppError> {
        let result = self.generator.generate(&ticket.profile).await;

        let mut session = self.session.lock().await;
        if !session.controller.is_awaiting(ticket.cycle) {
            info!(
                "Discarding result of generation cycle {}: project was reset",
                ticket.cycle
            );
            return Err(TransitionError::Stale.into());
        }
        session.ticker = None;

        match result {
            Ok(scripts) => {
                session.controller.complete_generation(ticket.cycle, scripts)?;
                if session.controller.phase() != Phase::Output {
                    return Err(AppError::Generation(GENERATION_FAILED_MESSAGE.to_string()));
                }
                // Not awaited: the view is returned whatever the webhook does.
                spawn_sync(
                    self.sync.clone(),
                    ticket.profile,
                    session.controller.scripts().to_vec(),
                );
                Ok(View::of(&session.controller))
            }
            Err(e) => {
                session
                    .controller
                    .fail_generation(ticket.cycle, e.user_message())?;
                Err(AppError::Generation(e.user_message().to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use crate::generation::generator::GenerationError;
    use crate::models::script::Script;
    use crate::sync::webhook::WebhookClient;

    fn scripts() -> Vec<Script> {
        ["A", "B", "C"]
            .iter()
            .map(|t| Script {
                id: t.to_lowercase(),
                title: t.to_string(),
                objective: "Vendas".to_string(),
                hook: format!("hook {t}"),
                body: format!("body {t}"),
                cta: format!("cta {t}"),
            })
            .collect()
    }

    fn profile() -> Profile {
        Profile {
            name: "Dra. Ana Silva".to_string(),
            niche: "Harmonização Facial".to_string(),
            instagram: "@draanasilva".to_string(),
            tiktok: Some("@ana".to_string()),
            website: None,
            objectives: vec![Objective::Sales, Objective::Connection],
        }
    }

    /// Returns canned scripts or fails, optionally after being released by a gate.
    struct FakeGenerator {
        succeed: bool,
        gate: Option<Arc<Notify>>,
        calls: AtomicUsize,
    }

    impl FakeGenerator {
        fn ok() -> Arc<Self> {
            Arc::new(Self {
                succeed: true,
                gate: None,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                succeed: false,
                gate: None,
                calls: AtomicUsize::new(0),
            })
        }

        fn gated(gate: Arc<Notify>) -> Arc<Self> {
            Arc::new(Self {
                succeed: true,
                gate: Some(gate),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ScriptGenerator for FakeGenerator {
        async fn generate(&self, _profile: &Profile) -> Result<Vec<Script>, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.succeed {
                Ok(scripts())
            } else {
                Err(GenerationError::InvalidScripts("no text".to_string()))
            }
        }
    }

    #[derive(Default)]
    struct RecordingSync {
        calls: std::sync::Mutex<Vec<(Profile, Vec<Script>)>>,
        done: Notify,
    }

    #[async_trait]
    impl BackendSync for RecordingSync {
        async fn sync(&self, profile: &Profile, scripts: &[Script]) {
            self.calls
                .lock()
                .unwrap()
                .push((profile.clone(), scripts.to_vec()));
            self.done.notify_one();
        }
    }

    async fn filled(service: &SessionService) {
        service.update_profile(profile()).await.unwrap();
    }

    async fn wait_for_processing(service: &SessionService) {
        loop {
            if matches!(service.view().await, View::Processing(_)) {
                return;
            }
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_generate_success_reaches_output_and_syncs() {
        let sync = Arc::new(RecordingSync::default());
        let service = SessionService::new(FakeGenerator::ok(), sync.clone());
        filled(&service).await;

        let view = service.generate().await.unwrap();
        match view {
            View::Output(output) => {
                let titles: Vec<_> = output.cards.iter().map(|c| c.script.title.as_str()).collect();
                assert_eq!(titles, vec!["A", "B", "C"]);
            }
            other => panic!("expected output view, got {other:?}"),
        }

        tokio::time::timeout(Duration::from_secs(5), sync.done.notified())
            .await
            .expect("sync should run in the background");
        let calls = sync.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, profile());
        assert_eq!(calls[0].1, scripts());
    }

    #[tokio::test]
    async fn test_invalid_profile_never_reaches_generator() {
        let generator = FakeGenerator::ok();
        let service = SessionService::new(generator.clone(), Arc::new(RecordingSync::default()));

        let err = service.generate().await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ref e) if e.len() == 4));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
        match service.view().await {
            View::Input(input) => assert_eq!(input.errors.len(), 4),
            other => panic!("expected input view, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generation_failure_reverts_to_input_with_profile() {
        let sync = Arc::new(RecordingSync::default());
        let service = SessionService::new(FakeGenerator::failing(), sync.clone());
        filled(&service).await;

        let err = service.generate().await.unwrap_err();
        match err {
            AppError::Generation(message) => assert_eq!(message, GENERATION_FAILED_MESSAGE),
            other => panic!("expected generation error, got {other:?}"),
        }

        match service.view().await {
            View::Input(input) => {
                assert_eq!(input.profile, profile());
                assert_eq!(input.notice.as_deref(), Some(GENERATION_FAILED_MESSAGE));
            }
            other => panic!("expected input view, got {other:?}"),
        }
        assert!(sync.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_second_generate_while_processing_is_rejected() {
        let gate = Arc::new(Notify::new());
        let generator = FakeGenerator::gated(gate.clone());
        let service = SessionService::new(generator.clone(), Arc::new(RecordingSync::default()));
        filled(&service).await;

        let first = {
            let service = service.clone();
            tokio::spawn(async move { service.generate().await })
        };
        wait_for_processing(&service).await;

        let err = service.generate().await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        gate.notify_one();
        let view = first.await.unwrap().unwrap();
        assert!(matches!(view, View::Output(_)));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_reset_while_processing_discards_late_result() {
        let gate = Arc::new(Notify::new());
        let sync = Arc::new(RecordingSync::default());
        let service = SessionService::new(FakeGenerator::gated(gate.clone()), sync.clone());
        filled(&service).await;

        let first = {
            let service = service.clone();
            tokio::spawn(async move { service.generate().await })
        };
        wait_for_processing(&service).await;

        service.reset().await;
        gate.notify_one();

        let err = first.await.unwrap().unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        match service.view().await {
            View::Input(input) => assert_eq!(input.profile, Profile::default()),
            other => panic!("expected input view, got {other:?}"),
        }
        assert!(sync.calls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_phrases_rotate_only_while_processing() {
        let gate = Arc::new(Notify::new());
        let service = SessionService::new(
            FakeGenerator::gated(gate.clone()),
            Arc::new(RecordingSync::default()),
        );
        filled(&service).await;

        let first = {
            let service = service.clone();
            tokio::spawn(async move { service.generate().await })
        };
        wait_for_processing(&service).await;

        tokio::time::sleep(Duration::from_secs(7)).await;
        match service.view().await {
            View::Processing(p) => assert_eq!(p.phrase_index, 2),
            other => panic!("expected processing view, got {other:?}"),
        }

        gate.notify_one();
        first.await.unwrap().unwrap();
        assert!(service.session.lock().await.ticker.is_none());
    }

    #[tokio::test]
    async fn test_sync_failure_does_not_touch_state() {
        let unreachable = Arc::new(WebhookClient::new("http://127.0.0.1:9/webhook"));
        let service = SessionService::new(FakeGenerator::ok(), unreachable);
        filled(&service).await;

        service.generate().await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;

        match service.view().await {
            View::Output(output) => assert_eq!(output.cards.len(), 3),
            other => panic!("expected output view, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_reset_after_output_clears_everything() {
        let service = SessionService::new(FakeGenerator::ok(), Arc::new(RecordingSync::default()));
        filled(&service).await;
        service.generate().await.unwrap();
        service.toggle_details().await.unwrap();

        match service.reset().await {
            View::Input(input) => {
                assert_eq!(input.profile, Profile::default());
                assert!(input.profile.objectives.is_empty());
                assert!(input.errors.is_empty());
            }
            other => panic!("expected input view, got {other:?}"),
        }
        let session = service.session.lock().await;
        assert!(session.controller.scripts().is_empty());
        assert_eq!(session.controller.phase(), Phase::Input);
    }
}
