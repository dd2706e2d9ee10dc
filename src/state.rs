//! Application state shared by the input hooks.
//!
//! Wires the remap dispatcher to the chat focus tracker and the loaded
//! configuration, and remembers which side-button presses were consumed so
//! their matching releases are suppressed too.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};

use smallvec::SmallVec;
use tracing::debug;

use crate::config::AppConfig;
use crate::dispatcher::RemapDispatcher;
use crate::error::RemapError;
use crate::focus::{ChatFocus, ForegroundLookup, foreground_process_name};
use crate::injector::KeyInjector;
use crate::mouse::{ExtraButton, MouseButtonId};

/// Direction of a key or button transition reported by a hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputTransition {
    Down,
    Up,
}

pub struct AppState<I> {
    dispatcher: RemapDispatcher<Arc<ChatFocus>, AppConfig, I>,
    focus: Arc<ChatFocus>,
    chat_toggle_vk: u32,
    chat_close_vks: SmallVec<[u32; 4]>,
    /// Suppresses auto-repeat of the held toggle key
    toggle_key_down: AtomicBool,
    /// Bit per extra button whose press was consumed
    consumed_buttons: AtomicU8,
    should_exit: AtomicBool,
    hook_threads: Mutex<SmallVec<[u32; 2]>>,
}

impl<I: KeyInjector> AppState<I> {
    /// Creates the state from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the chat toggle or close key names are invalid.
    pub fn new(config: AppConfig, injector: I) -> anyhow::Result<Self> {
        Self::with_foreground_lookup(config, injector, foreground_process_name)
    }

    /// Like [`AppState::new`] with a custom foreground process lookup.
    pub fn with_foreground_lookup(
        config: AppConfig,
        injector: I,
        foreground: ForegroundLookup,
    ) -> anyhow::Result<Self> {
        let chat_toggle_vk = config.chat_toggle_vk()?;
        let chat_close_vks = config.chat_close_vks()?;
        let focus = Arc::new(ChatFocus::with_foreground_lookup(
            &config.process_whitelist,
            foreground,
        ));

        Ok(Self {
            dispatcher: RemapDispatcher::new(focus.clone(), config, injector),
            focus,
            chat_toggle_vk,
            chat_close_vks,
            toggle_key_down: AtomicBool::new(false),
            consumed_buttons: AtomicU8::new(0),
            should_exit: AtomicBool::new(false),
            hook_threads: Mutex::new(SmallVec::new()),
        })
    }

    pub fn dispatcher(&self) -> &RemapDispatcher<Arc<ChatFocus>, AppConfig, I> {
        &self.dispatcher
    }

    pub fn focus(&self) -> &ChatFocus {
        &self.focus
    }

    /// Tracks chat open/close keys. Keyboard events are never blocked.
    ///
    /// Key presses only change chat state while a client process is in the
    /// foreground.
    pub fn handle_key_event(&self, transition: InputTransition, vk_code: u32) {
        if vk_code == self.chat_toggle_vk {
            match transition {
                InputTransition::Down => {
                    if !self.toggle_key_down.swap(true, Ordering::AcqRel)
                        && self.focus.is_foreground_whitelisted()
                    {
                        let open = self.focus.toggle();
                        debug!(open, "chat toggled");
                    }
                }
                InputTransition::Up => self.toggle_key_down.store(false, Ordering::Release),
            }
            return;
        }

        if transition == InputTransition::Down
            && self.chat_close_vks.contains(&vk_code)
            && self.focus.is_open()
            && self.focus.is_foreground_whitelisted()
        {
            self.focus.close();
            debug!("chat closed");
        }
    }

    /// Routes a mouse button transition; returns whether the raw event must be blocked.
    ///
    /// A press is blocked iff the dispatcher handled it. The release of a
    /// consumed extra button is blocked as well so the client never sees an
    /// unpaired release.
    pub fn handle_mouse_event(
        &self,
        transition: InputTransition,
        button: MouseButtonId,
    ) -> Result<bool, RemapError> {
        match transition {
            InputTransition::Down => {
                let handled = self.dispatcher.on_mouse_press(button)?.is_handled();
                if handled && let Some(extra) = ExtraButton::from_id(button) {
                    self.consumed_buttons
                        .fetch_or(Self::button_bit(extra), Ordering::AcqRel);
                }
                Ok(handled)
            }
            InputTransition::Up => {
                let Some(extra) = ExtraButton::from_id(button) else {
                    return Ok(false);
                };
                let bit = Self::button_bit(extra);
                let previous = self.consumed_buttons.fetch_and(!bit, Ordering::AcqRel);
                Ok(previous & bit != 0)
            }
        }
    }

    fn button_bit(button: ExtraButton) -> u8 {
        match button {
            ExtraButton::Mouse4 => 0b01,
            ExtraButton::Mouse5 => 0b10,
        }
    }
}

impl<I> AppState<I> {
    pub fn register_hook_thread(&self, thread_id: u32) {
        self.hook_threads
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(thread_id);
    }

    /// Marks the application as exiting and returns the hook threads to stop.
    pub fn exit(&self) -> SmallVec<[u32; 2]> {
        self.should_exit.store(true, Ordering::Release);
        self.hook_threads
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn should_exit(&self) -> bool {
        self.should_exit.load(Ordering::Acquire)
    }
}

#[cfg(windows)]
pub use self::global::{HostState, get_global_state, set_global_state};

#[cfg(windows)]
mod global {
    use std::sync::{Arc, OnceLock};

    use super::AppState;
    use crate::injector::SendInputInjector;

    pub type HostState = AppState<SendInputInjector>;

    static GLOBAL_STATE: OnceLock<Arc<HostState>> = OnceLock::new();

    pub fn set_global_state(state: Arc<HostState>) -> Result<(), Arc<HostState>> {
        GLOBAL_STATE.set(state)
    }

    pub fn get_global_state() -> Option<&'static Arc<HostState>> {
        GLOBAL_STATE.get()
    }
}
