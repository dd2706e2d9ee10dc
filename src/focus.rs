//! Chat focus tracking for the host application.
//!
//! The game does not expose whether its chat box is focused, so the host
//! infers it from the keys that open and close chat, restricted to the
//! whitelisted client processes.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::dispatcher::FocusOracle;

/// Returns the executable name of the foreground process, if known.
pub type ForegroundLookup = fn() -> Option<String>;

pub struct ChatFocus {
    chat_open: AtomicBool,
    /// Lowercase executable names; empty means any foreground process
    process_whitelist: Vec<String>,
    foreground: ForegroundLookup,
}

impl ChatFocus {
    pub fn new(process_whitelist: &[String]) -> Self {
        Self::with_foreground_lookup(process_whitelist, foreground_process_name)
    }

    pub fn with_foreground_lookup(
        process_whitelist: &[String],
        foreground: ForegroundLookup,
    ) -> Self {
        Self {
            chat_open: AtomicBool::new(false),
            process_whitelist: process_whitelist.iter().map(|p| p.to_lowercase()).collect(),
            foreground,
        }
    }

    pub fn is_open(&self) -> bool {
        self.chat_open.load(Ordering::Acquire)
    }

    pub fn open(&self) {
        self.chat_open.store(true, Ordering::Release);
    }

    pub fn close(&self) {
        self.chat_open.store(false, Ordering::Release);
    }

    /// Flips the chat state and returns the new value.
    pub fn toggle(&self) -> bool {
        !self.chat_open.fetch_xor(true, Ordering::AcqRel)
    }

    /// Check if a foreground process is whitelisted (empty whitelist = all allowed)
    pub fn is_process_whitelisted(&self, process_name: Option<&str>) -> bool {
        if self.process_whitelist.is_empty() {
            return true;
        }

        match process_name {
            Some(name) => {
                let name = name.to_lowercase();
                self.process_whitelist.iter().any(|p| *p == name)
            }
            // If we can't get process name, allow by default
            None => true,
        }
    }

    /// Whether the current foreground process is one of the client processes.
    pub fn is_foreground_whitelisted(&self) -> bool {
        if self.process_whitelist.is_empty() {
            return true;
        }
        self.is_process_whitelisted((self.foreground)().as_deref())
    }
}

impl FocusOracle for ChatFocus {
    fn is_chat_focused(&self) -> bool {
        self.is_open() && self.is_foreground_whitelisted()
    }
}

/// Lowercase executable name of the process owning the foreground window.
#[cfg(windows)]
pub fn foreground_process_name() -> Option<String> {
    use windows::Win32::Foundation::{CloseHandle, MAX_PATH};
    use windows::Win32::System::Threading::{
        OpenProcess, PROCESS_NAME_WIN32, PROCESS_QUERY_LIMITED_INFORMATION,
        QueryFullProcessImageNameW,
    };
    use windows::Win32::UI::WindowsAndMessaging::{GetForegroundWindow, GetWindowThreadProcessId};
    use windows::core::PWSTR;

    unsafe {
        let hwnd = GetForegroundWindow();
        if hwnd.0.is_null() {
            return None;
        }

        let mut process_id: u32 = 0;
        GetWindowThreadProcessId(hwnd, Some(&mut process_id as *mut u32));
        if process_id == 0 {
            return None;
        }

        let process_handle =
            OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, process_id).ok()?;

        let mut buffer = [0u16; MAX_PATH as usize];
        let mut size = buffer.len() as u32;

        let queried = QueryFullProcessImageNameW(
            process_handle,
            PROCESS_NAME_WIN32,
            PWSTR(buffer.as_mut_ptr()),
            &mut size,
        );
        let _ = CloseHandle(process_handle);
        queried.ok()?;

        let path = String::from_utf16_lossy(&buffer[..size as usize]);
        path.split('\\').next_back().map(|s| s.to_lowercase())
    }
}

#[cfg(not(windows))]
pub fn foreground_process_name() -> Option<String> {
    None
}
