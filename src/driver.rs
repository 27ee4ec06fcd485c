use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::history::store::{HistoryStore, InMemoryHistoryStore};
use crate::kernel::countdown::TICK_PERIOD;
use crate::kernel::types::{InterventionResult, SessionDraft};
use crate::kernel::{SideEffect, UrgeWizard, WizardError, WizardEvent, WizardState};
use crate::services::actions::{self, ActionResult};
use crate::services::llm::schema::{
    ImplementationIntentionInput, ImplementationIntentionOutput, UrgeSurfingInput, UrgeSurfingOutput,
};
use crate::services::llm::TextGenerator;

const EVENT_BUFFER: usize = 64;

/// What background tasks send back.
#[derive(Debug)]
enum Background {
    Reply(WizardEvent),
    /// Tagged with the ticker generation so ticks from a cancelled timer
    /// cannot leak into a later delay.
    Tick(u64),
}

/// Runs one wizard session against real services.
///
/// Owns the wizard, the history store and the generator. Gateway calls and the
/// delay ticker run as background tasks that report back through an internal
/// channel; nothing they produce touches the wizard until `process_next` or
/// `drain_ready` applies it.
pub struct WizardDriver<H: HistoryStore = InMemoryHistoryStore> {
    wizard: UrgeWizard,
    history: H,
    generator: Arc<dyn TextGenerator>,
    tx: mpsc::Sender<Background>,
    rx: mpsc::Receiver<Background>,
    ticker: Option<CancellationToken>,
    ticker_generation: u64,
    last_notice: Option<String>,
}

impl<H: HistoryStore> WizardDriver<H> {
    pub fn new(generator: Arc<dyn TextGenerator>, history: H) -> Self {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        Self {
            wizard: UrgeWizard::new(),
            history,
            generator,
            tx,
            rx,
            ticker: None,
            ticker_generation: 0,
            last_notice: None,
        }
    }

    pub fn wizard(&self) -> &UrgeWizard {
        &self.wizard
    }

    pub fn state(&self) -> &WizardState {
        self.wizard.state()
    }

    pub fn draft(&self) -> &SessionDraft {
        self.wizard.draft()
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn is_loading(&self) -> bool {
        self.wizard.state().is_loading()
    }

    pub fn countdown_running(&self) -> bool {
        self.ticker.is_some()
    }

    /// Most recent transient message (failed request), until the next reset.
    pub fn last_notice(&self) -> Option<&str> {
        self.last_notice.as_deref()
    }

    /// Applies a user event and starts whatever work it asks for.
    pub fn dispatch(&mut self, event: WizardEvent) -> Result<(), WizardError> {
        let effects = self.wizard.handle(event)?;
        self.execute(effects);
        Ok(())
    }

    pub fn reset(&mut self) {
        let effects = self.wizard.reset();
        self.execute(effects);
        self.last_notice = None;
    }

    /// Waits for the next background result (reply or tick) and applies it.
    /// Never returns if nothing is outstanding.
    pub async fn process_next(&mut self) -> Result<(), WizardError> {
        // We hold a sender ourselves, so the channel never closes.
        match self.rx.recv().await {
            Some(background) => self.apply(background),
            None => Ok(()),
        }
    }

    /// Applies every background result already queued. Returns how many.
    pub fn drain_ready(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(background) = self.rx.try_recv() {
            if let Err(e) = self.apply(background) {
                warn!("Background event rejected: {}", e);
            }
            applied += 1;
        }
        applied
    }

    fn apply(&mut self, background: Background) -> Result<(), WizardError> {
        match background {
            Background::Reply(event) => self.dispatch(event),
            Background::Tick(generation) if generation == self.ticker_generation && self.ticker.is_some() => {
                self.dispatch(WizardEvent::Tick)
            }
            Background::Tick(generation) => {
                debug!("Dropped tick from stale ticker {}", generation);
                Ok(())
            }
        }
    }

    pub async fn implementation_intention(
        &self,
        input: &ImplementationIntentionInput,
    ) -> ActionResult<ImplementationIntentionOutput> {
        actions::get_implementation_intention(self.generator.as_ref(), input).await
    }

    pub async fn urge_surfing_script(&self, input: &UrgeSurfingInput) -> ActionResult<UrgeSurfingOutput> {
        actions::get_urge_surfing_script(self.generator.as_ref(), input).await
    }

    fn execute(&mut self, effects: Vec<SideEffect>) {
        for effect in effects {
            match effect {
                SideEffect::RequestIntervention { request_id, input } => {
                    let generator = Arc::clone(&self.generator);
                    let tx = self.tx.clone();

                    tokio::spawn(async move {
                        let event = match actions::get_intervention(generator.as_ref(), &input).await {
                            ActionResult::Success(output) => WizardEvent::SuggestionReady {
                                request_id,
                                result: InterventionResult {
                                    suggestion: output.intervention,
                                    rationale: output.explanation,
                                },
                            },
                            ActionResult::Failure(error) => WizardEvent::SuggestionFailed { request_id, error },
                        };
                        // Receiver gone means the session was torn down; the reply is dropped.
                        let _ = tx.send(Background::Reply(event)).await;
                    });
                }
                SideEffect::StartCountdown { seconds } => self.start_ticker(seconds),
                SideEffect::StopCountdown => self.stop_ticker(),
                SideEffect::RecordHistory(entry) => self.history.append(entry),
                SideEffect::Notify(message) => {
                    warn!("{}", message);
                    self.last_notice = Some(message);
                }
            }
        }
    }

    fn start_ticker(&mut self, seconds: u32) {
        self.stop_ticker();

        self.ticker_generation += 1;
        let generation = self.ticker_generation;
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let mut cadence = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
            cadence.set_missed_tick_behavior(MissedTickBehavior::Skip);

            for _ in 0..seconds {
                tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => break,
                    _ = cadence.tick() => {
                        if tx.send(Background::Tick(generation)).await.is_err() {
                            break;
                        }
                    }
                }
            }
            debug!("Countdown ticker stopped");
        });

        self.ticker = Some(token);
    }

    fn stop_ticker(&mut self) {
        if let Some(token) = self.ticker.take() {
            token.cancel();
        }
    }
}

impl<H: HistoryStore> Drop for WizardDriver<H> {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}
