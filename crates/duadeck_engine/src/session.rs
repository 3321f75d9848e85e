//! Drives the pure state machine: dispatches messages, executes the
//! resulting effects, and feeds engine events back in as messages.

use std::sync::Arc;
use std::time::Duration;

use duadeck_core::{update, AppState, AppViewModel, Effect, Msg};
use engine_logging::{engine_debug, engine_info};

use crate::{
    forget_document_choice, save_document_choice, Authenticator, EngineEvent, EngineHandle,
    PersistenceStore,
};

/// Owns the app state and runs its effects.
///
/// ```no_run
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// use duadeck_engine::{
///     EngineHandle, JsonFileStore, Loader, ReqwestSheetSource, Session, SheetSettings,
///     StoredAuthenticator,
/// };
/// use engine_logging::{initialize, LogSettings};
///
/// # fn main() -> Result<(), duadeck_engine::StoreError> {
/// initialize(&LogSettings::default());
/// let store = Arc::new(JsonFileStore::open("duadeck-store.json")?);
/// let auth = Arc::new(StoredAuthenticator::new(store.clone()));
/// let source = Arc::new(ReqwestSheetSource::new(SheetSettings::default()));
/// let loader = Loader::new(source, store.clone(), auth.clone());
/// let mut session = Session::new(EngineHandle::new(loader), store, auth);
/// if session.start().is_some() {
///     let view = session.wait(Duration::from_secs(30));
///     println!("{:?}", view.map(|view| view.phase));
/// }
/// # Ok(())
/// # }
/// ```
pub struct Session {
    state: AppState,
    engine: EngineHandle,
    store: Arc<dyn PersistenceStore>,
    auth: Arc<dyn Authenticator>,
}

impl Session {
    pub fn new(
        engine: EngineHandle,
        store: Arc<dyn PersistenceStore>,
        auth: Arc<dyn Authenticator>,
    ) -> Self {
        Self::with_state(AppState::new(), engine, store, auth)
    }

    pub fn with_state(
        state: AppState,
        engine: EngineHandle,
        store: Arc<dyn PersistenceStore>,
        auth: Arc<dyn Authenticator>,
    ) -> Self {
        Self {
            state,
            engine,
            store,
            auth,
        }
    }

    /// Restore a still-valid session, if the authenticator has one.
    pub fn start(&mut self) -> Option<AppViewModel> {
        let credential = self.auth.credential()?;
        engine_info!("Resuming session for {}", credential.identity.email);
        self.dispatch(Msg::SignedIn(credential.identity))
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    /// Apply one message. Returns a fresh view if anything changed.
    pub fn dispatch(&mut self, msg: Msg) -> Option<AppViewModel> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        let view = was_dirty.then(|| state.view());
        self.state = state;
        self.run_effects(effects);
        view
    }

    /// Apply every engine event that has already arrived.
    pub fn pump(&mut self) -> Option<AppViewModel> {
        let mut latest = None;
        while let Some(event) = self.engine.try_recv() {
            if let Some(view) = self.handle_event(event) {
                latest = Some(view);
            }
        }
        latest
    }

    /// Block until one engine event arrives or `timeout` passes.
    pub fn wait(&mut self, timeout: Duration) -> Option<AppViewModel> {
        let event = self.engine.recv_timeout(timeout)?;
        self.handle_event(event)
    }

    fn handle_event(&mut self, event: EngineEvent) -> Option<AppViewModel> {
        match event {
            EngineEvent::Loaded { request_id, result } => {
                self.dispatch(Msg::DocumentLoaded { request_id, result })
            }
        }
    }

    fn run_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            engine_debug!("Effect {:?}", effect);
            match effect {
                Effect::FetchDocument {
                    request_id,
                    document_id,
                    columns,
                } => self.engine.open(request_id, document_id, columns),
                Effect::Reload { request_id } => self.engine.reload(request_id),
                Effect::RememberDocument {
                    user_email,
                    document_id,
                    columns,
                } => save_document_choice(self.store.as_ref(), &user_email, &document_id, columns),
                Effect::ForgetDocument { user_email } => {
                    forget_document_choice(self.store.as_ref(), &user_email)
                }
                Effect::ForgetCredential => {
                    engine_info!("Credential rejected, clearing it");
                    self.auth.forget_credential();
                }
                Effect::SignOut => {
                    engine_info!("Signing out");
                    self.auth.sign_out();
                }
            }
        }
    }
}
