mod app;
mod form;
mod logging;
mod nav;
mod page;

use std::io::stdout;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
};
use folio_config::Config;
use log::{info, warn};

use crate::app::App;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    logging::init();

    let (config, config_path) = Config::load();
    info!("starting folio for {}", config.profile.name);

    let terminal = ratatui::init();
    let result = match execute!(stdout(), EnableMouseCapture) {
        Ok(()) => App::new(config, config_path).run(terminal),
        Err(err) => Err(err.into()),
    };
    // Restore the terminal even if the app failed.
    if let Err(err) = execute!(stdout(), DisableMouseCapture) {
        warn!("could not disable mouse capture: {err}");
    }
    ratatui::restore();
    result
}
