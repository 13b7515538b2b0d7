//! Sign-in-with-Neynar widget plumbing.
//!
//! The widget script reports a successful sign-in through a single named callback.
//! [`CallbackRegistry`] is that callback: the host bridges the script's call into
//! [`CallbackRegistry::dispatch`], and the form registers its handler explicitly.
//! Only the most recent registration is live; dropping an older [`Registration`]
//! never removes a newer handler.

use std::sync::{Arc, Mutex, Weak};

use serde::Deserialize;

pub const SIWN_SCRIPT_SRC: &str = "https://neynarxyz.github.io/siwn/raw/1.2.0/index.js";
pub const SUCCESS_CALLBACK: &str = "onSignInSuccess";
pub const WIDGET_CLASS: &str = "neynar_signin";
pub const WIDGET_THEME: &str = "light";

/// Payload the widget hands to the success callback.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignInData {
    pub fid: u64,
    #[serde(default)]
    pub signer_uuid: Option<String>,
}

type Handler = Arc<dyn Fn(SignInData) + Send + Sync>;

#[derive(Default)]
struct Slot {
    generation: u64,
    handler: Option<Handler>,
}

#[derive(Clone, Default)]
pub struct CallbackRegistry {
    slot: Arc<Mutex<Slot>>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `handler` as the only live callback.
    pub fn register<F>(&self, handler: F) -> Registration
    where
        F: Fn(SignInData) + Send + Sync + 'static,
    {
        let mut slot = self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        slot.generation += 1;
        slot.handler = Some(Arc::new(handler));

        Registration {
            slot: Arc::downgrade(&self.slot),
            generation: slot.generation,
        }
    }

    /// Invokes the live handler. Returns false when nothing is registered.
    pub fn dispatch(&self, data: SignInData) -> bool {
        let handler = {
            let slot = self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            slot.handler.clone()
        };

        match handler {
            Some(handler) => {
                handler(data);
                true
            }
            None => {
                tracing::warn!(fid = data.fid, "Sign-in callback fired with no handler registered");
                false
            }
        }
    }

    /// Parses the raw JSON the widget produced and dispatches it.
    pub fn dispatch_json(&self, raw: &str) -> Result<bool, serde_json::Error> {
        let data: SignInData = serde_json::from_str(raw)?;
        Ok(self.dispatch(data))
    }

    pub fn has_handler(&self) -> bool {
        self.slot
            .lock()
            .map(|slot| slot.handler.is_some())
            .unwrap_or(false)
    }
}

/// Keeps a handler registered until dropped.
pub struct Registration {
    slot: Weak<Mutex<Slot>>,
    generation: u64,
}

impl Registration {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self) -> bool {
        let Some(slot) = self.slot.upgrade() else {
            return false;
        };
        let current = slot
            .lock()
            .map(|slot| slot.generation == self.generation)
            .unwrap_or(false);
        current
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        let Some(slot) = self.slot.upgrade() else {
            return;
        };
        let mut slot = slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if slot.generation == self.generation {
            slot.handler = None;
        }
    }
}

/// Resources injected into the page for one widget instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetMount {
    pub generation: u64,
    pub client_id: String,
    pub element_class: &'static str,
    pub script_src: &'static str,
    pub success_callback: &'static str,
    pub theme: &'static str,
}

pub struct SocialWidget {
    client_id: String,
    registry: CallbackRegistry,
    mounted: Option<(WidgetMount, Registration)>,
    generation: u64,
}

impl SocialWidget {
    pub fn new(client_id: impl Into<String>, registry: CallbackRegistry) -> Self {
        Self {
            client_id: client_id.into(),
            registry,
            mounted: None,
            generation: 0,
        }
    }

    pub fn registry(&self) -> &CallbackRegistry {
        &self.registry
    }

    /// Tears down any previous instance, then injects a fresh one wired to `handler`.
    pub fn mount<F>(&mut self, handler: F) -> &WidgetMount
    where
        F: Fn(SignInData) + Send + Sync + 'static,
    {
        self.teardown();

        self.generation += 1;
        let registration = self.registry.register(handler);
        let mount = WidgetMount {
            generation: self.generation,
            client_id: self.client_id.clone(),
            element_class: WIDGET_CLASS,
            script_src: SIWN_SCRIPT_SRC,
            success_callback: SUCCESS_CALLBACK,
            theme: WIDGET_THEME,
        };

        tracing::debug!(generation = self.generation, "Mounted sign-in widget");

        let (mount, _) = self.mounted.insert((mount, registration));
        mount
    }

    /// Removes the injected resources and unregisters the handler.
    pub fn teardown(&mut self) -> Option<WidgetMount> {
        let (mount, registration) = self.mounted.take()?;
        drop(registration);
        tracing::debug!(generation = mount.generation, "Tore down sign-in widget");
        Some(mount)
    }

    pub fn current(&self) -> Option<&WidgetMount> {
        self.mounted.as_ref().map(|(mount, _)| mount)
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }
}

impl Drop for SocialWidget {
    fn drop(&mut self) {
        self.teardown();
    }
}
