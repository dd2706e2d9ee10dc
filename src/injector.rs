//! Synthetic key injection.

use std::sync::Arc;

use crate::error::{InjectorError, KeyPhase, RemapError};

/// Marker value placed in `dwExtraInfo` of every synthetic event this crate sends.
pub const SIMULATED_EVENT_MARKER: usize = 0x5344;

/// Platform capability that synthesizes single key transitions.
pub trait KeyInjector {
    fn press_key(&self, key_code: u32) -> Result<(), InjectorError>;
    fn release_key(&self, key_code: u32) -> Result<(), InjectorError>;
}

impl<T: KeyInjector + ?Sized> KeyInjector for &T {
    fn press_key(&self, key_code: u32) -> Result<(), InjectorError> {
        (**self).press_key(key_code)
    }

    fn release_key(&self, key_code: u32) -> Result<(), InjectorError> {
        (**self).release_key(key_code)
    }
}

impl<T: KeyInjector + ?Sized> KeyInjector for Arc<T> {
    fn press_key(&self, key_code: u32) -> Result<(), InjectorError> {
        (**self).press_key(key_code)
    }

    fn release_key(&self, key_code: u32) -> Result<(), InjectorError> {
        (**self).release_key(key_code)
    }
}

/// One synthetic key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SyntheticKeyEvent {
    pub key_code: u32,
    pub phase: KeyPhase,
}

/// A press followed by a release of one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyInjectionRequest {
    key_code: u32,
}

impl KeyInjectionRequest {
    pub fn new(key_code: u32) -> Self {
        Self { key_code }
    }

    pub fn key_code(&self) -> u32 {
        self.key_code
    }

    /// Events in the order they are sent.
    pub fn events(&self) -> [SyntheticKeyEvent; 2] {
        [
            SyntheticKeyEvent {
                key_code: self.key_code,
                phase: KeyPhase::Press,
            },
            SyntheticKeyEvent {
                key_code: self.key_code,
                phase: KeyPhase::Release,
            },
        ]
    }

    /// Sends the pair, stopping at the first failure.
    pub fn send<I: KeyInjector + ?Sized>(&self, injector: &I) -> Result<(), RemapError> {
        for event in self.events() {
            let sent = match event.phase {
                KeyPhase::Press => injector.press_key(event.key_code),
                KeyPhase::Release => injector.release_key(event.key_code),
            };
            sent.map_err(|source| RemapError::Injection {
                key_code: event.key_code,
                phase: event.phase,
                source,
            })?;
        }
        Ok(())
    }
}

#[cfg(windows)]
pub use self::windows_impl::SendInputInjector;

#[cfg(windows)]
mod windows_impl {
    use windows::Win32::Foundation::GetLastError;
    use windows::Win32::UI::Input::KeyboardAndMouse::*;

    use super::{KeyInjector, SIMULATED_EVENT_MARKER};
    use crate::error::InjectorError;
    use crate::keybind::parsing::{is_extended_key, vk_to_scancode};

    /// Key injector backed by `SendInput`.
    ///
    /// Keys with a known scancode are sent by scancode so games reading raw
    /// scancodes see them; anything else falls back to the virtual key.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct SendInputInjector;

    impl SendInputInjector {
        pub fn new() -> Self {
            Self
        }

        fn send(&self, key_code: u32, key_up: bool) -> Result<(), InjectorError> {
            let scancode = vk_to_scancode(key_code);
            let (vk, mut flags) = if scancode != 0 {
                (VIRTUAL_KEY(0), KEYEVENTF_SCANCODE)
            } else {
                (VIRTUAL_KEY(key_code as u16), KEYBD_EVENT_FLAGS(0))
            };
            if is_extended_key(key_code) {
                flags |= KEYEVENTF_EXTENDEDKEY;
            }
            if key_up {
                flags |= KEYEVENTF_KEYUP;
            }

            let input = INPUT {
                r#type: INPUT_KEYBOARD,
                Anonymous: INPUT_0 {
                    ki: KEYBDINPUT {
                        wVk: vk,
                        wScan: scancode,
                        dwFlags: flags,
                        time: 0,
                        dwExtraInfo: SIMULATED_EVENT_MARKER,
                    },
                },
            };

            let sent = unsafe { SendInput(&[input], std::mem::size_of::<INPUT>() as i32) };
            if sent == 0 {
                let code = unsafe { GetLastError() };
                return Err(InjectorError::new(format!(
                    "SendInput rejected the event (error {})",
                    code.0
                )));
            }
            Ok(())
        }
    }

    impl KeyInjector for SendInputInjector {
        fn press_key(&self, key_code: u32) -> Result<(), InjectorError> {
            self.send(key_code, false)
        }

        fn release_key(&self, key_code: u32) -> Result<(), InjectorError> {
            self.send(key_code, true)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[derive(Default)]
    struct Log(RefCell<Vec<SyntheticKeyEvent>>);

    impl KeyInjector for Log {
        fn press_key(&self, key_code: u32) -> Result<(), InjectorError> {
            self.0.borrow_mut().push(SyntheticKeyEvent {
                key_code,
                phase: KeyPhase::Press,
            });
            Ok(())
        }

        fn release_key(&self, key_code: u32) -> Result<(), InjectorError> {
            self.0.borrow_mut().push(SyntheticKeyEvent {
                key_code,
                phase: KeyPhase::Release,
            });
            Ok(())
        }
    }

    #[test]
    fn test_request_press_before_release() {
        let request = KeyInjectionRequest::new(0x54);
        let [first, second] = request.events();

        assert_eq!(first.phase, KeyPhase::Press);
        assert_eq!(second.phase, KeyPhase::Release);
        assert_eq!(first.key_code, 0x54);
        assert_eq!(second.key_code, 0x54);
    }

    #[test]
    fn test_send_through_shared_injector() {
        let log = Arc::new(Log::default());
        KeyInjectionRequest::new(0x09).send(&log).unwrap();

        assert_eq!(log.0.borrow().as_slice(), &KeyInjectionRequest::new(0x09).events());
    }
}
