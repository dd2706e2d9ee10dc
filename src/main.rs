use anyhow::Result;
use sidekey::config::AppConfig;
use tracing_subscriber::EnvFilter;

const CONFIG_PATH: &str = "Config.toml";

fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[cfg(windows)]
fn main() -> Result<()> {
    use std::sync::Arc;
    use std::thread;

    use sidekey::injector::SendInputInjector;
    use sidekey::keyboard::KeyboardHook;
    use sidekey::mouse::MouseHook;
    use sidekey::signal;
    use sidekey::state::{AppState, set_global_state};

    let config = AppConfig::load_or_create(CONFIG_PATH)?;
    init_logging(&config);
    tracing::info!(
        path = CONFIG_PATH,
        mouse4 = %config.mouse4_keybind,
        mouse5 = %config.mouse5_keybind,
        "configuration loaded"
    );

    let app_state = Arc::new(AppState::new(config, SendInputInjector::new())?);
    set_global_state(app_state.clone())
        .map_err(|_| anyhow::anyhow!("Global state has been set"))?;

    signal::set_control_ctrl_handler()?;

    // Hooks must be created on the thread that pumps their messages
    let keyboard = thread::spawn(|| -> Result<()> { KeyboardHook::new()?.run_message_loop() });

    let result = MouseHook::new().and_then(MouseHook::run_message_loop);

    // The mouse hook loop ended on its own; make sure the keyboard loop follows
    if !app_state.should_exit() {
        for thread_id in app_state.exit() {
            unsafe {
                use windows::Win32::Foundation::{LPARAM, WPARAM};
                use windows::Win32::UI::WindowsAndMessaging::{PostThreadMessageA, WM_QUIT};
                let _ = PostThreadMessageA(thread_id, WM_QUIT, WPARAM(0), LPARAM(0));
            }
        }
    }
    match keyboard.join() {
        Ok(Err(err)) => tracing::error!(error = %err, "keyboard hook failed"),
        Err(_) => tracing::error!("keyboard hook thread panicked"),
        Ok(Ok(())) => {}
    }

    tracing::info!("shutting down");
    result
}

#[cfg(not(windows))]
fn main() -> Result<()> {
    let config = AppConfig::load_or_create(CONFIG_PATH)?;
    init_logging(&config);
    anyhow::bail!("sidekey needs a Windows host to hook mouse buttons and inject keys")
}
