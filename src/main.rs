use std::process::ExitCode;
use tasktrack::{Config, JsonFileStorage, Menu, TaskStore, TerminalConsole};

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Config::from_env();
    log::debug!("using {config:?}");

    // Leave an unreadable file where it is rather than overwrite it.
    let storage = JsonFileStorage::new(&config.tasks_file);
    log::info!("tasks file: {}", storage.path().display());

    let store = match TaskStore::open(storage) {
        Ok(store) => store,
        Err(err) => {
            log::error!("failed to load tasks: {err}");
            eprintln!("Cannot start: {err}");
            eprintln!("Fix or move the file, then run again.");
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut menu = Menu::new(store, TerminalConsole::new(config.pacing));
    menu.run()?;
    Ok(ExitCode::SUCCESS)
}
