//! Low-level keyboard hook feeding chat focus tracking.
//!
//! Synthetic events are observed too: a remapped ENTER sends the chat message
//! in the client and must close chat here as well.

use windows::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::WindowsAndMessaging::*;

use crate::state::{InputTransition, get_global_state};

unsafe impl Send for KeyboardHook {}

pub struct KeyboardHook {
    hook_handle: HHOOK,
}

impl KeyboardHook {
    pub fn new() -> anyhow::Result<Self> {
        unsafe {
            let hook = SetWindowsHookExA(WH_KEYBOARD_LL, Some(Self::keyboard_proc), None, 0)?;

            if hook.0.is_null() {
                anyhow::bail!("Failed to set keyboard hook.");
            }

            Ok(Self { hook_handle: hook })
        }
    }

    pub fn run_message_loop(self) -> anyhow::Result<()> {
        if let Some(state) = get_global_state() {
            state.register_hook_thread(unsafe { GetCurrentThreadId() });
        }
        tracing::info!("keyboard hook installed");

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

    unsafe extern "system" fn keyboard_proc(
        code: i32,
        w_param: WPARAM,
        l_param: LPARAM,
    ) -> LRESULT {
        if code < 0 {
            return unsafe { CallNextHookEx(None, code, w_param, l_param) };
        }

        let kb_struct = unsafe { &*(l_param.0 as *const KBDLLHOOKSTRUCT) };

        let transition = match w_param.0 as u32 {
            WM_KEYDOWN | WM_SYSKEYDOWN => Some(InputTransition::Down),
            WM_KEYUP | WM_SYSKEYUP => Some(InputTransition::Up),
            _ => None,
        };

        if let Some(state) = get_global_state()
            && let Some(transition) = transition
        {
            state.handle_key_event(transition, kb_struct.vkCode);
        }

        unsafe { CallNextHookEx(None, code, w_param, l_param) }
    }
}

impl Drop for KeyboardHook {
    fn drop(&mut self) {
        unsafe {
            let _ = UnhookWindowsHookEx(self.hook_handle);
        }
    }
}
