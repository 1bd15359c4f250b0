use std::cell::{Cell, RefCell};
use std::rc::Rc;

use vpbridge_protocol::{CallbackArgument, PlayerId, TrustedOrigin, WireMode};
use vpbridge_transport::HostPage;

use crate::config::BridgeConfig;
use crate::error::{Direction, HostError, Rejection, Result};
use crate::readiness::{PlayerState, ReadinessTable};
use crate::registry::CallbackRegistry;

/// Observer for discarded messages and refused requests.
pub type DiagnosticHook = Rc<dyn Fn(&Rejection)>;

pub(crate) struct Shared<P> {
    pub(crate) config: BridgeConfig,
    pub(crate) page: P,
    pub(crate) readiness: RefCell<ReadinessTable>,
    pub(crate) callbacks: RefCell<CallbackRegistry>,
    pub(crate) diagnostics: RefCell<Option<DiagnosticHook>>,
    #[cfg(feature = "schema")]
    pub(crate) schemas: RefCell<Option<Rc<vpbridge_schema::ParameterSchemas>>>,
    pub(crate) initialized: Cell<bool>,
}

/// Host side of the player bridge, bound to one page.
///
/// Cloning yields another handle to the same bridge; the inbound listener
/// attached by [`Bridge::initialize`] holds one such handle for the life of the
/// page.
pub struct Bridge<P: HostPage> {
    pub(crate) shared: Rc<Shared<P>>,
}

impl<P: HostPage> Clone for Bridge<P> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<P: HostPage> Bridge<P> {
    /// Create a bridge over `page`. No listener is attached until
    /// [`Bridge::initialize`] runs.
    pub fn new(page: P, config: BridgeConfig) -> Self {
        Self {
            shared: Rc::new(Shared {
                config,
                page,
                readiness: RefCell::new(ReadinessTable::new()),
                callbacks: RefCell::new(CallbackRegistry::new()),
                diagnostics: RefCell::new(None),
                #[cfg(feature = "schema")]
                schemas: RefCell::new(None),
                initialized: Cell::new(false),
            }),
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.shared.config
    }

    pub fn trusted_origin(&self) -> &TrustedOrigin {
        &self.shared.config.trusted_origin
    }

    pub fn mode(&self) -> WireMode {
        self.shared.config.mode
    }

    pub fn page(&self) -> &P {
        &self.shared.page
    }

    pub fn is_initialized(&self) -> bool {
        self.shared.initialized.get()
    }

    /// Register a host callback players may invoke by name.
    pub fn register_callback<F>(&self, name: &str, callback: F) -> Result<()>
    where
        F: Fn(&CallbackArgument) + 'static,
    {
        self.shared.callbacks.borrow_mut().register(name, callback)
    }

    /// Remove a host callback. Returns true if one was registered.
    pub fn unregister_callback(&self, name: &str) -> bool {
        self.shared.callbacks.borrow_mut().unregister(name)
    }

    /// Registered callback names, sorted.
    pub fn callback_names(&self) -> Vec<String> {
        self.shared
            .callbacks
            .borrow()
            .names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Install a hook that sees every rejection. Replaces any previous hook.
    pub fn set_diagnostics<F>(&self, hook: F)
    where
        F: Fn(&Rejection) + 'static,
    {
        *self.shared.diagnostics.borrow_mut() = Some(Rc::new(hook));
    }

    pub fn clear_diagnostics(&self) {
        *self.shared.diagnostics.borrow_mut() = None;
    }

    /// Require callback arguments to match their parameter schemas.
    #[cfg(feature = "schema")]
    pub fn set_parameter_schemas(&self, schemas: vpbridge_schema::ParameterSchemas) {
        *self.shared.schemas.borrow_mut() = Some(Rc::new(schemas));
    }

    pub fn is_ready(&self, id: &PlayerId) -> bool {
        self.shared.readiness.borrow().is_ready(id)
    }

    pub fn player_state(&self, id: &PlayerId) -> PlayerState {
        self.shared.readiness.borrow().state(id)
    }

    /// Players that have reported ready, in id order.
    pub fn ready_players(&self) -> Vec<PlayerId> {
        self.shared.readiness.borrow().iter().cloned().collect()
    }

    pub(crate) fn report(&self, direction: Direction, err: &HostError) {
        tracing::trace!(?direction, kind = %err.kind(), error = %err, "bridge rejection");
        // Clone the hook out so it may replace or clear itself.
        let hook = self.shared.diagnostics.borrow().clone();
        if let Some(hook) = hook {
            hook(&Rejection::from_error(direction, err));
        }
    }
}

impl<P: HostPage + 'static> Bridge<P> {
    /// Attach the inbound listener to the page.
    ///
    /// Returns `Ok(false)` if the listener is already attached. There is no
    /// teardown.
    pub fn initialize(&self) -> Result<bool> {
        if self.shared.initialized.get() {
            return Ok(false);
        }

        let bridge = self.clone();
        self.shared
            .page
            .add_message_listener(Box::new(move |event| {
                let _ = bridge.handle_message(&event);
            }))?;

        self.shared.initialized.set(true);
        tracing::debug!(
            origin = %self.shared.config.trusted_origin,
            mode = %self.shared.config.mode,
            "bridge listener attached"
        );
        Ok(true)
    }
}

impl<P: HostPage> std::fmt::Debug for Bridge<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("config", &self.shared.config)
            .field("initialized", &self.shared.initialized.get())
            .field("ready", &self.shared.readiness.borrow().len())
            .field("callbacks", &self.shared.callbacks.borrow().len())
            .finish()
    }
}
