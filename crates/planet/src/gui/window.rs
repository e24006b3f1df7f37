use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use gtk4_layer_shell::{Edge, KeyboardMode, Layer, LayerShell};
use planetctl::wm::{self, MonitorName};

/// Full-screen transparent overlay above every other surface. The menu only
/// reacts to the pointer, so it never takes keyboard focus.
pub fn init_layer_shell(window: &gtk::ApplicationWindow) {
    window.init_layer_shell();
    window.set_layer(Layer::Overlay);
    window.set_namespace(Some("planet"));
    window.set_exclusive_zone(-1);
    for edge in [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom] {
        window.set_anchor(edge, true);
    }
    window.set_keyboard_mode(KeyboardMode::None);
}

pub fn get_monitor_by_name(name: &MonitorName) -> Option<gdk::Monitor> {
    let display = gdk::Display::default()?;
    let monitors = display.monitors();
    (0..monitors.n_items()).find_map(|i| {
        monitors
            .item(i)
            .and_then(|item| item.downcast::<gdk::Monitor>().ok())
            .filter(|m| m.connector().is_some_and(|n| n.as_str() == name.as_str()))
    })
}

/// Moves the overlay to the focused monitor when the compositor reports one.
pub fn follow_active_monitor(window: &gtk::ApplicationWindow) {
    if let Some(monitor) = wm::get_active_monitor().and_then(|name| get_monitor_by_name(&name)) {
        window.set_monitor(Some(&monitor));
    }
}
