//! Mouse button identifiers and the low-level mouse hook.

/// Integer id of the physical button that produced a mouse event.
///
/// Numbering follows the usual 1 = left, 2 = right, 3 = middle convention with
/// the side buttons continuing at 4 and 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MouseButtonId(pub i32);

impl MouseButtonId {
    pub const LEFT: MouseButtonId = MouseButtonId(1);
    pub const RIGHT: MouseButtonId = MouseButtonId(2);
    pub const MIDDLE: MouseButtonId = MouseButtonId(3);
    pub const EXTRA_BUTTON_1: MouseButtonId = MouseButtonId(4);
    pub const EXTRA_BUTTON_2: MouseButtonId = MouseButtonId(5);

    #[inline]
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Id for an X button given the high word of `mouseData` (1 = XBUTTON1).
    #[inline]
    pub const fn from_x_button(x_button: u16) -> Self {
        MouseButtonId(3 + x_button as i32)
    }
}

/// The two auxiliary buttons the remapper acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtraButton {
    Mouse4,
    Mouse5,
}

impl ExtraButton {
    /// Returns `None` for every button other than 4 and 5.
    #[inline]
    pub fn from_id(id: MouseButtonId) -> Option<Self> {
        match id {
            MouseButtonId::EXTRA_BUTTON_1 => Some(ExtraButton::Mouse4),
            MouseButtonId::EXTRA_BUTTON_2 => Some(ExtraButton::Mouse5),
            _ => None,
        }
    }

    pub fn id(self) -> MouseButtonId {
        match self {
            ExtraButton::Mouse4 => MouseButtonId::EXTRA_BUTTON_1,
            ExtraButton::Mouse5 => MouseButtonId::EXTRA_BUTTON_2,
        }
    }
}

#[cfg(windows)]
pub use self::hook::MouseHook;

#[cfg(windows)]
mod hook {
    use windows::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
    use windows::Win32::System::Threading::GetCurrentThreadId;
    use windows::Win32::UI::WindowsAndMessaging::*;

    use super::MouseButtonId;
    use crate::state::{InputTransition, get_global_state};

    unsafe impl Send for MouseHook {}

    pub struct MouseHook {
        hook_handle: HHOOK,
    }

    impl MouseHook {
        /// Installs the hook on the calling thread, which must then run
        /// [`MouseHook::run_message_loop`].
        pub fn new() -> anyhow::Result<Self> {
            unsafe {
                let hook = SetWindowsHookExA(WH_MOUSE_LL, Some(Self::mouse_proc), None, 0)?;

                if hook.0.is_null() {
                    anyhow::bail!("Failed to set mouse hook.");
                }

                Ok(Self { hook_handle: hook })
            }
        }

        pub fn run_message_loop(self) -> anyhow::Result<()> {
            if let Some(state) = get_global_state() {
                state.register_hook_thread(unsafe { GetCurrentThreadId() });
            }
            tracing::info!("mouse hook installed");

            unsafe {
                let mut msg = MSG::default();
                loop {
                    let result = GetMessageA(&mut msg, None, 0, 0);

                    if result.0 == 0 || result.0 == -1 {
                        break;
                    }

                    let _ = TranslateMessage(&msg);
                    DispatchMessageA(&msg);
                }
            }

            Ok(())
        }

        /// Maps a low-level mouse message to a button transition.
        fn decode(message: u32, mouse_data: u32) -> Option<(InputTransition, MouseButtonId)> {
            let x_button = ((mouse_data >> 16) & 0xFFFF) as u16;
            match message {
                WM_LBUTTONDOWN => Some((InputTransition::Down, MouseButtonId::LEFT)),
                WM_LBUTTONUP => Some((InputTransition::Up, MouseButtonId::LEFT)),
                WM_RBUTTONDOWN => Some((InputTransition::Down, MouseButtonId::RIGHT)),
                WM_RBUTTONUP => Some((InputTransition::Up, MouseButtonId::RIGHT)),
                WM_MBUTTONDOWN => Some((InputTransition::Down, MouseButtonId::MIDDLE)),
                WM_MBUTTONUP => Some((InputTransition::Up, MouseButtonId::MIDDLE)),
                WM_XBUTTONDOWN => Some((
                    InputTransition::Down,
                    MouseButtonId::from_x_button(x_button),
                )),
                WM_XBUTTONUP => Some((InputTransition::Up, MouseButtonId::from_x_button(x_button))),
                _ => None,
            }
        }

        unsafe extern "system" fn mouse_proc(
            code: i32,
            w_param: WPARAM,
            l_param: LPARAM,
        ) -> LRESULT {
            if code < 0 {
                return unsafe { CallNextHookEx(None, code, w_param, l_param) };
            }

            let mouse_struct = unsafe { &*(l_param.0 as *const MSLLHOOKSTRUCT) };

            if let Some(state) = get_global_state()
                && let Some((transition, button)) =
                    Self::decode(w_param.0 as u32, mouse_struct.mouseData)
            {
                match state.handle_mouse_event(transition, button) {
                    Ok(true) => return LRESULT(1), // block raw mouse event
                    Ok(false) => {}
                    Err(err) => {
                        tracing::warn!(error = %err, "extra button passed through after injection failure");
                    }
                }
            }

            unsafe { CallNextHookEx(None, code, w_param, l_param) }
        }
    }

    impl Drop for MouseHook {
        fn drop(&mut self) {
            unsafe {
                let _ = UnhookWindowsHookEx(self.hook_handle);
            }
        }
    }
}
