// Forbid accidental stdout/stderr writes in the *library* portion of the TUI.
// The terminal is owned by the UI while it runs.
#![deny(clippy::print_stdout, clippy::print_stderr)]

use std::time::Duration;

use anyhow::Context;
use raksha_backend_client::GatewayClient;
use raksha_core::ConfigLoader;
use raksha_core::SessionSettings;
use raksha_core::VoiceCapability;
use tracing::info;

mod app;
mod app_event;
mod app_event_sender;
mod cli;
mod key_hint;
mod logging;
mod tui;
mod views;

pub use cli::Cli;

use crate::app::App;
use crate::tui::TerminalGuard;

pub fn run_main(cli: Cli) -> anyhow::Result<()> {
    install_panic_hooks()?;

    let mut loader = ConfigLoader::new().with_overrides(cli.config_overrides());
    if let Some(path) = cli.config_file {
        loader = loader.with_config_file(path);
    }
    let config = loader.load().context("failed to load configuration")?;

    let _log_guard = logging::init(&config.log_dir())?;
    info!("starting raksha against {}", config.api_base);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let client = GatewayClient::new(&config.api_base)
        .with_context(|| format!("invalid backend address {}", config.api_base))?;
    let voice = VoiceCapability::from_command(config.voice.command.as_deref());
    if !voice.is_available() {
        info!("no voice command configured; voice trigger disabled");
    }
    let settings = SessionSettings::from_config(&config, voice.is_available());

    let result = {
        let mut guard = TerminalGuard::enter().context("failed to initialize terminal")?;
        let mut app = App::new(settings, client, voice, runtime.handle().clone());
        app.run(guard.terminal())
    };

    runtime.shutdown_timeout(Duration::from_secs(1));
    info!("raksha exited");
    result
}

/// color-eyre reports panics; the terminal is restored first so the report
/// is readable.
fn install_panic_hooks() -> anyhow::Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook
        .install()
        .map_err(|e| anyhow::anyhow!("failed to install error hook: {e}"))?;
    let panic_hook = panic_hook.into_panic_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = tui::restore();
        panic_hook(info);
    }));
    Ok(())
}
