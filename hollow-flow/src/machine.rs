//! The page's interaction state machine.
//!
//! ```text
//!          mount + reveal delay
//!   Idle ────────────────────────▶ Peering ◀──────────── back ─────────┐
//!                                   │    │                             │
//!                     open_messages │    │ open_offering               │
//!                                   ▼    ▼                             │
//!                           Messaging    Offering ── submit ──▶ Submitted
//!                              ▲  │
//!                              └──┘ submit
//! ```
//!
//! Stage changes and visual delays are local. Store traffic goes through
//! the sync controllers and never blocks a transition.

use hollow_model::{Fields, Message};
use hollow_sync::{ContentService, PendingMutation, SyncController, SyncResult};
use hollow_types::Collection;
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::FlowConfig;
use crate::error::{FlowError, FlowResult};
use crate::timer::VisualDelay;

/// Where the visitor is on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Stage {
    #[default]
    Idle,
    Peering,
    Messaging,
    Offering,
    Submitted,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Peering => "peering",
            Self::Messaging => "messaging",
            Self::Offering => "offering",
            Self::Submitted => "submitted",
        })
    }
}

/// Something the visitor can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Mount,
    OpenMessages,
    OpenOffering,
    Back,
    UpdateDraft,
    Submit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mount => "mount",
            Self::OpenMessages => "open messages",
            Self::OpenOffering => "open offering",
            Self::Back => "go back",
            Self::UpdateDraft => "edit the draft",
            Self::Submit => "submit",
        })
    }
}

/// What the page shows right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewState {
    pub stage: Stage,
    /// False while the current stage is fading in.
    pub revealed: bool,
}

type SharedView = Arc<Mutex<ViewState>>;

fn lock(view: &SharedView) -> MutexGuard<'_, ViewState> {
    view.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Drives the page through its stages.
///
/// Must be used from within a Tokio runtime; delays and loads are spawned.
#[derive(Debug)]
pub struct InteractionMachine {
    view: SharedView,
    draft: String,
    mounted: bool,
    delay: VisualDelay,
    config: FlowConfig,
    messages: SyncController,
    offerings: SyncController,
    message_load: Option<JoinHandle<SyncResult<usize>>>,
}

impl InteractionMachine {
    pub fn new(messages: SyncController, offerings: SyncController, config: FlowConfig) -> Self {
        Self {
            view: Arc::new(Mutex::new(ViewState::default())),
            draft: String::new(),
            mounted: false,
            delay: VisualDelay::new(),
            config,
            messages,
            offerings,
            message_load: None,
        }
    }

    /// A machine over the service's message and offering collections.
    pub fn for_service(service: &ContentService, config: FlowConfig) -> Self {
        Self::new(
            service.controller(Collection::Messages),
            service.controller(Collection::Offerings),
            config,
        )
    }

    pub fn view(&self) -> ViewState {
        *lock(&self.view)
    }

    pub fn stage(&self) -> Stage {
        self.view().stage
    }

    pub fn is_revealed(&self) -> bool {
        self.view().revealed
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Returns true while a visual delay is running.
    pub fn delay_pending(&self) -> bool {
        self.delay.is_pending()
    }

    pub fn message_controller(&self) -> &SyncController {
        &self.messages
    }

    pub fn offering_controller(&self) -> &SyncController {
        &self.offerings
    }

    /// The message wall, most recent first.
    pub fn messages(&self) -> Vec<Message> {
        self.messages.records().iter().map(Message::from_record).collect()
    }

    fn reject(&self, action: Action) -> FlowError {
        FlowError::InvalidTransition {
            action,
            stage: self.stage(),
        }
    }

    /// Moves to `stage` and starts its fade-in.
    fn enter(&mut self, stage: Stage) {
        {
            let mut view = lock(&self.view);
            debug!("Stage {} -> {}", view.stage, stage);
            *view = ViewState {
                stage,
                revealed: false,
            };
        }
        let view = self.view.clone();
        self.delay.after(self.config.fade_delay(), move || {
            lock(&view).revealed = true;
        });
    }

    fn load_messages(&mut self) {
        let in_flight = self
            .message_load
            .as_ref()
            .is_some_and(|handle| !handle.is_finished());
        if in_flight {
            return;
        }
        let messages = self.messages.clone();
        self.message_load = Some(tokio::spawn(async move { messages.load().await }));
    }

    /// Waits for the most recent message load, if one was started.
    pub async fn messages_loaded(&mut self) -> Option<SyncResult<usize>> {
        let handle = self.message_load.take()?;
        match handle.await {
            Ok(result) => Some(result),
            Err(e) => {
                warn!("Message load task failed: {}", e);
                None
            }
        }
    }

    // ── Actions ──────────────────────────────────────────────────

    /// Starts the reveal delay and the message load side by side.
    pub fn mount(&mut self) -> FlowResult<()> {
        if self.mounted || self.stage() != Stage::Idle {
            return Err(self.reject(Action::Mount));
        }
        self.mounted = true;
        info!("Mounted; revealing in {} ms", self.config.reveal_delay_ms);

        let view = self.view.clone();
        let reveal = self.config.reveal_delay();
        let fade = self.config.fade_delay();
        self.delay.start(async move {
            tokio::time::sleep(reveal).await;
            {
                let mut state = lock(&view);
                if state.stage != Stage::Idle {
                    return;
                }
                *state = ViewState {
                    stage: Stage::Peering,
                    revealed: false,
                };
            }
            tokio::time::sleep(fade).await;
            lock(&view).revealed = true;
        });

        self.load_messages();
        Ok(())
    }

    /// Opens the message wall, loading it if it has not been loaded yet.
    pub fn open_messages(&mut self) -> FlowResult<()> {
        if self.stage() != Stage::Peering {
            return Err(self.reject(Action::OpenMessages));
        }
        self.enter(Stage::Messaging);
        if !self.messages.is_loaded() {
            self.load_messages();
        }
        Ok(())
    }

    pub fn open_offering(&mut self) -> FlowResult<()> {
        if self.stage() != Stage::Peering {
            return Err(self.reject(Action::OpenOffering));
        }
        self.enter(Stage::Offering);
        Ok(())
    }

    /// Returns to `Peering`. The draft is discarded.
    pub fn back(&mut self) -> FlowResult<()> {
        match self.stage() {
            Stage::Messaging | Stage::Offering | Stage::Submitted => {
                self.draft.clear();
                self.enter(Stage::Peering);
                Ok(())
            }
            Stage::Idle | Stage::Peering => Err(self.reject(Action::Back)),
        }
    }

    pub fn update_draft(&mut self, text: impl Into<String>) -> FlowResult<()> {
        match self.stage() {
            Stage::Messaging | Stage::Offering => {
                self.draft = text.into();
                Ok(())
            }
            _ => Err(self.reject(Action::UpdateDraft)),
        }
    }

    /// Sends the draft.
    ///
    /// A blank draft is refused without contacting the store. A message
    /// keeps the visitor on the wall with an empty draft; an offering moves
    /// on to `Submitted` whatever the store later answers.
    pub fn submit(&mut self) -> FlowResult<PendingMutation> {
        let (controller, field) = match self.stage() {
            Stage::Messaging => (&self.messages, "message"),
            Stage::Offering => (&self.offerings, "offering"),
            _ => return Err(self.reject(Action::Submit)),
        };
        if self.draft.trim().is_empty() {
            return Err(FlowError::EmptySubmission);
        }

        let mut partial = Fields::new();
        partial.insert(field.to_string(), Value::String(self.draft.clone()));
        let pending = controller.create_optimistic(partial)?;
        self.draft.clear();

        if self.stage() == Stage::Offering {
            self.enter(Stage::Submitted);
        }
        Ok(pending)
    }
}
