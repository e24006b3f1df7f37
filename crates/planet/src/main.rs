use planet::config;
use planet::gui::app::AppModel;
use planet::gui::menu::State;
use planet::sys::runtime;
use relm4::prelude::*;

fn main() {
    env_logger::init();

    let config = config::load_or_setup();
    let state = State::new(config.menu.clone());

    let (tx, rx) = async_channel::bounded(32);
    let (selection_tx, selection_rx) = async_channel::unbounded();

    // Start Background Services
    runtime::start_background_services(tx, selection_rx, config.server.socket);

    let app = RelmApp::new("org.planet.menu");

    app.run::<AppModel>((state, selection_tx, rx));
}
