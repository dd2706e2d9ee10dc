//! Side mouse button to keyboard remapping for game chat.
//!
//! While the chat box of the game client is focused, presses of mouse buttons
//! 4 and 5 are turned into a configured keyboard shortcut and the original
//! mouse event is suppressed. The decision logic lives in
//! [`dispatcher::RemapDispatcher`], which is platform independent; the
//! Windows hooks and `SendInput` injector are compiled on Windows only.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod focus;
pub mod injector;
pub mod keybind;
#[cfg(windows)]
pub mod keyboard;
pub mod mouse;
#[cfg(windows)]
pub mod signal;
pub mod state;

pub use config::AppConfig;
pub use dispatcher::{DispatchResult, FocusOracle, KeybindSource, RemapDispatcher};
pub use error::{InjectorError, KeyPhase, RemapError};
pub use injector::{KeyInjectionRequest, KeyInjector};
pub use keybind::{Keybind, KeybindParseError, Modifiers};
pub use mouse::{ExtraButton, MouseButtonId};
