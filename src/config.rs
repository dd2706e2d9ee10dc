use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};
use std::{fs, path::Path};

use crate::dispatcher::KeybindSource;
use crate::keybind::Keybind;
use crate::keybind::parsing::key_name_to_vk;
use crate::mouse::ExtraButton;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub mouse4_keybind: Keybind,
    #[serde(default)]
    pub mouse5_keybind: Keybind,
    #[serde(default = "default_chat_toggle_key")]
    pub chat_toggle_key: String,
    #[serde(default = "default_chat_close_keys")]
    pub chat_close_keys: SmallVec<[String; 4]>,
    #[serde(default)]
    pub process_whitelist: Vec<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_chat_toggle_key() -> String {
    "ENTER".to_string()
}
fn default_chat_close_keys() -> SmallVec<[String; 4]> {
    smallvec!["ESC".to_string()]
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mouse4_keybind: Keybind::NOT_SET,
            mouse5_keybind: Keybind::NOT_SET,
            chat_toggle_key: default_chat_toggle_key(),
            chat_close_keys: default_chat_close_keys(),
            process_whitelist: vec![], // Empty means all processes enabled
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Load config from file, or create default if not exists
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        if !path.as_ref().exists() {
            let default_config = Self::default();
            default_config.save_to_file(&path)?;
            return Ok(default_config);
        }
        Self::load_from_file(path)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects key names the host could not track.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.chat_toggle_vk()?;
        self.chat_close_vks()?;
        Ok(())
    }

    pub fn chat_toggle_vk(&self) -> anyhow::Result<u32> {
        key_name_to_vk(&self.chat_toggle_key)
            .ok_or_else(|| anyhow::anyhow!("Invalid chat toggle key: {}", self.chat_toggle_key))
    }

    pub fn chat_close_vks(&self) -> anyhow::Result<SmallVec<[u32; 4]>> {
        self.chat_close_keys
            .iter()
            .map(|name| {
                key_name_to_vk(name)
                    .ok_or_else(|| anyhow::anyhow!("Invalid chat close key: {}", name))
            })
            .collect()
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let commented = format!(
            "# Keys sent while the chat box is focused (e.g. \"ENTER\", \"CTRL+TAB\", \"NOT_SET\")\n\
             mouse4_keybind = \"{}\"\n\
             mouse5_keybind = \"{}\"\n\n\
             chat_toggle_key = \"{}\"      # Key that opens and sends chat in the client\n\
             chat_close_keys = {:?}   # Keys that always close chat\n\n\
             # Client processes (empty = any foreground window)\n\
             process_whitelist = {:?}     # Example: [\"gameclient.exe\"]\n\n\
             log_level = \"{}\"          # error, warn, info, debug or trace (RUST_LOG overrides)\n",
            self.mouse4_keybind,
            self.mouse5_keybind,
            self.chat_toggle_key,
            self.chat_close_keys.as_slice(),
            self.process_whitelist,
            self.log_level,
        );

        fs::write(path, commented)?;
        Ok(())
    }
}

impl KeybindSource for AppConfig {
    fn keybind_for(&self, button: ExtraButton) -> Keybind {
        match button {
            ExtraButton::Mouse4 => self.mouse4_keybind,
            ExtraButton::Mouse5 => self.mouse5_keybind,
        }
    }
}
