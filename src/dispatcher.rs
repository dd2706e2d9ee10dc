//! Remap dispatcher.
//!
//! Decides whether a mouse press on an auxiliary button should be turned into
//! a synthetic key press/release pair. The dispatcher owns no state of its
//! own; every decision is a function of the button, the current focus state and
//! the current configuration.

use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::error::RemapError;
use crate::injector::{KeyInjectionRequest, KeyInjector};
use crate::keybind::Keybind;
use crate::mouse::{ExtraButton, MouseButtonId};

/// Answers whether the chat text input currently holds keyboard focus.
///
/// Must be synchronous and free of side effects.
pub trait FocusOracle {
    fn is_chat_focused(&self) -> bool;
}

/// Provides the binding configured for each auxiliary button.
///
/// Unbound buttons report [`Keybind::NOT_SET`].
pub trait KeybindSource {
    fn keybind_for(&self, button: ExtraButton) -> Keybind;
}

/// Outcome of a single mouse press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchResult {
    /// Synthetic keys were sent; the caller must suppress the original event.
    Handled,
    /// The original event must propagate unchanged.
    NotHandled,
}

impl DispatchResult {
    #[inline]
    pub fn is_handled(self) -> bool {
        self == DispatchResult::Handled
    }
}

impl From<DispatchResult> for bool {
    fn from(result: DispatchResult) -> Self {
        result.is_handled()
    }
}

/// Converts auxiliary mouse button presses into keyboard shortcuts while
/// chatting.
pub struct RemapDispatcher<F, C, I> {
    focus: F,
    config: C,
    injector: I,
}

impl<F, C, I> RemapDispatcher<F, C, I>
where
    F: FocusOracle,
    C: KeybindSource,
    I: KeyInjector,
{
    pub fn new(focus: F, config: C, injector: I) -> Self {
        Self {
            focus,
            config,
            injector,
        }
    }

    /// Handles a mouse press.
    ///
    /// Returns [`DispatchResult::Handled`] only after a full press/release
    /// pair was injected for the bound key. Modifiers stored in the keybind
    /// are not synthesized.
    ///
    /// # Errors
    ///
    /// Returns [`RemapError::Injection`] when the key injector fails. The
    /// release half is not attempted if the press failed.
    pub fn on_mouse_press(&self, button: MouseButtonId) -> Result<DispatchResult, RemapError> {
        let Some(extra) = ExtraButton::from_id(button) else {
            return Ok(DispatchResult::NotHandled);
        };

        if !self.focus.is_chat_focused() {
            trace!(button = button.get(), "chat not focused, ignoring extra button");
            return Ok(DispatchResult::NotHandled);
        }

        let keybind = self.config.keybind_for(extra);
        if !keybind.is_set() {
            trace!(button = button.get(), "no keybind configured");
            return Ok(DispatchResult::NotHandled);
        }

        let request = KeyInjectionRequest::new(keybind.key_code());
        if let Err(err) = request.send(&self.injector) {
            warn!(button = button.get(), %keybind, error = %err, "key injection failed");
            return Err(err);
        }

        debug!(button = button.get(), %keybind, "remapped extra button");
        Ok(DispatchResult::Handled)
    }

    pub fn focus(&self) -> &F {
        &self.focus
    }

    pub fn injector(&self) -> &I {
        &self.injector
    }
}

impl<T: FocusOracle + ?Sized> FocusOracle for &T {
    fn is_chat_focused(&self) -> bool {
        (**self).is_chat_focused()
    }
}

impl<T: FocusOracle + ?Sized> FocusOracle for Arc<T> {
    fn is_chat_focused(&self) -> bool {
        (**self).is_chat_focused()
    }
}

impl<T: KeybindSource + ?Sized> KeybindSource for &T {
    fn keybind_for(&self, button: ExtraButton) -> Keybind {
        (**self).keybind_for(button)
    }
}

impl<T: KeybindSource + ?Sized> KeybindSource for Arc<T> {
    fn keybind_for(&self, button: ExtraButton) -> Keybind {
        (**self).keybind_for(button)
    }
}

impl FocusOracle for bool {
    fn is_chat_focused(&self) -> bool {
        *self
    }
}
