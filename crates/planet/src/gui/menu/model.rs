use crate::config::{Layout, MenuConfig};
use crate::gui::menu::ICON_SIZE;
use gdk_pixbuf::Pixbuf;
use planetctl::geometry::{Sector, Wheel};
use planetctl::icon;
use planetctl::protocol::{HostRequest, Label, MenuItem, MenuPayload};
use planetctl::wm::Point;

#[derive(Clone)]
pub struct Slot {
    pub item: MenuItem,
    pub pixbuf: Option<Pixbuf>,
}

impl Slot {
    pub fn new(item: MenuItem) -> Self {
        let pixbuf = Self::load_icon(&item);
        Self { item, pixbuf }
    }

    fn load_icon(item: &MenuItem) -> Option<Pixbuf> {
        let path = icon::find_icon_path(item.icon.name())?;
        Pixbuf::from_file_at_scale(&path, ICON_SIZE, ICON_SIZE, true)
            .map_err(|e| log::debug!("Failed to load icon {}: {}", path.display(), e))
            .ok()
    }

    pub fn label(&self) -> &Label {
        &self.item.label
    }
}

/// Label of the item under the pointer, shown by the fan layout.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Highlight {
    pub label: String,
    pub visible: bool,
}

pub struct State {
    pub slots: Vec<Slot>,
    pub sub: bool,
    pub visible: bool,
    pub hover_index: Option<usize>,
    pub config: MenuConfig,
    pub wheel: Wheel,
    pub sectors: Vec<Sector>,
    /// Top-left corner of the wheel canvas in window coordinates.
    pub origin: Point,
}

impl State {
    pub fn new(config: MenuConfig) -> Self {
        Self {
            slots: Vec::new(),
            sub: false,
            visible: false,
            hover_index: None,
            wheel: config.wheel(),
            config,
            sectors: Vec::new(),
            origin: Point::default(),
        }
    }

    /// Replaces the whole menu and shows it.
    pub fn open(&mut self, payload: MenuPayload) {
        self.slots = payload.items.into_iter().map(Slot::new).collect();
        self.sub = payload.sub.unwrap_or(false);
        self.visible = true;
        self.hover_index = None;
        self.recalculate_sectors();
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.hover_index = None;
    }

    pub fn apply_config(&mut self, config: MenuConfig) {
        let size = self.wheel.size();
        let viewport = (self.origin.x * 2.0 + size, self.origin.y * 2.0 + size);

        self.wheel = config.wheel();
        self.config = config;
        self.hover_index = None;
        self.recalculate_sectors();
        self.set_viewport(viewport.0, viewport.1);
    }

    /// Centers the canvas in a window of the given size.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        let size = self.wheel.size();
        self.origin = Point::new((width - size) / 2.0, (height - size) / 2.0);
    }

    fn recalculate_sectors(&mut self) {
        self.sectors = self.wheel.sectors(self.slots.len());
    }

    fn to_canvas(&self, point: Point) -> Point {
        point.offset(-self.origin.x, -self.origin.y)
    }

    /// Index of the item under `point` (window coordinates).
    pub fn item_at(&self, point: Point) -> Option<usize> {
        let local = self.to_canvas(point);
        let total = self.slots.len();

        match self.config.layout {
            Layout::Wedge => self.wheel.sector_at(local, total),
            Layout::Fan => self.wheel.fan_button_at(local, total),
        }
    }

    /// Returns whether the hovered item changed.
    pub fn update_cursor(&mut self, cursor: Point) -> bool {
        if !self.visible {
            return false;
        }
        let new_idx = self.item_at(cursor);
        let changed = self.hover_index != new_idx;
        self.hover_index = new_idx;
        changed
    }

    pub fn clear_hover(&mut self) -> bool {
        self.hover_index.take().is_some()
    }

    /// Resolves a click into the request for the host, hiding the menu if so
    /// configured. Clicks that miss every item do nothing.
    pub fn click(&mut self, point: Point) -> Option<HostRequest> {
        if !self.visible {
            return None;
        }
        let index = self.item_at(point)?;

        if self.config.close_on_select {
            self.hide();
        }
        Some(HostRequest::PlanetClick(index))
    }

    pub fn highlight(&self) -> Highlight {
        self.hover_index
            .and_then(|i| self.slots.get(i))
            .map(|slot| Highlight {
                label: slot.label().to_string(),
                visible: true,
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::AppEvent;
    use crate::sys::server::parse_event;

    const VIEWPORT: (f64, f64) = (1920.0, 1080.0);

    fn paint_and_garage() -> MenuPayload {
        MenuPayload::new(vec![
            MenuItem::new("palette", "Paint"),
            MenuItem::new("warehouse", "Garage"),
        ])
    }

    fn open_state(payload: MenuPayload, config: MenuConfig) -> State {
        let mut state = State::new(config);
        state.set_viewport(VIEWPORT.0, VIEWPORT.1);
        state.open(payload);
        state
    }

    /// Window position of the middle of a sector.
    fn sector_point(state: &State, index: usize) -> Point {
        let p = state.wheel.placed_anchor(&state.sectors[index]);
        p.offset(state.origin.x, state.origin.y)
    }

    #[test]
    fn starts_hidden_and_empty() {
        let state = State::new(MenuConfig::default());
        assert!(!state.visible);
        assert!(state.slots.is_empty());
        assert!(state.sectors.is_empty());
    }

    #[test]
    fn open_shows_one_half_per_item() {
        let state = open_state(paint_and_garage(), MenuConfig::default());

        assert!(state.visible);
        assert_eq!(state.sectors.len(), 2);
        assert!(state.sectors.iter().all(|s| (s.span - 180.0).abs() < 1e-9));
        assert_eq!(state.sectors[0].rotation, 0.0);
        assert_eq!(state.sectors[1].rotation, -180.0);
    }

    /// Feeds one socket line to the state the way the app does.
    fn dispatch(state: &mut State, line: &str) {
        match parse_event(line) {
            Some(AppEvent::Open(payload)) => state.open(payload),
            Some(AppEvent::Hide) => state.hide(),
            Some(AppEvent::ConfigReload) | None => {}
        }
    }

    #[test]
    fn open_line_shows_two_halves() {
        let mut state = State::new(MenuConfig::default());
        state.set_viewport(VIEWPORT.0, VIEWPORT.1);

        dispatch(
            &mut state,
            r#"{"action":"openPlanetMenu","data":{"items":[{"icon":"palette","label":"Paint"},{"icon":"warehouse","label":"Garage"}]}}"#,
        );

        assert!(state.visible);
        assert_eq!(state.sectors.len(), 2);
        assert!(state.sectors.iter().all(|s| (s.span - 180.0).abs() < 1e-9));
        assert_eq!(state.sectors[0].rotation, 0.0);
        assert_eq!(state.sectors[1].rotation, -180.0);
        assert_eq!(state.slots[0].label().as_str(), "Paint");
    }

    #[test]
    fn malformed_line_keeps_the_open_menu() {
        let mut state = open_state(MenuPayload::debug_sample(), MenuConfig::default());

        dispatch(&mut state, r#"{"action":"openPlanetMenu","data":{"sub":true}}"#);
        dispatch(&mut state, "not json");

        assert!(state.visible);
        assert_eq!(state.slots.len(), 5);
        assert_eq!(state.sectors.len(), 5);
        assert!(!state.sub);

        dispatch(&mut state, r#"{"action":"closePlanetMenu"}"#);
        assert!(!state.visible);
        assert_eq!(state.slots.len(), 5);
    }

    #[test]
    fn debug_sample_opens_five_sectors() {
        let state = open_state(MenuPayload::debug_sample(), MenuConfig::default());
        let rotations: Vec<f64> = state.sectors.iter().map(|s| -s.rotation).collect();
        assert_eq!(rotations, vec![0.0, 72.0, 144.0, 216.0, 288.0]);
    }

    #[test]
    fn open_replaces_the_previous_menu() {
        let mut state = open_state(MenuPayload::debug_sample(), MenuConfig::default());
        state.hover_index = Some(4);

        state.open(paint_and_garage());
        assert_eq!(state.slots.len(), 2);
        assert_eq!(state.slots[1].label().as_str(), "Garage");
        assert_eq!(state.hover_index, None);
        assert!(!state.sub);
    }

    #[test]
    fn empty_menu_is_visible_with_nothing_to_hit() {
        let mut state = open_state(MenuPayload::default(), MenuConfig::default());
        assert!(state.visible);
        assert!(state.sectors.is_empty());
        let center = Point::new(VIEWPORT.0 / 2.0, VIEWPORT.1 / 2.0);
        assert_eq!(state.click(center), None);
        assert!(state.visible);
    }

    #[test]
    fn click_reports_index_then_hides() {
        let mut state = open_state(MenuPayload::debug_sample(), MenuConfig::default());
        let target = sector_point(&state, 3);

        assert_eq!(state.click(target), Some(HostRequest::PlanetClick(3)));
        assert!(!state.visible);
        // hidden menus ignore further clicks
        assert_eq!(state.click(target), None);
    }

    #[test]
    fn click_can_leave_the_menu_open() {
        let config = MenuConfig {
            close_on_select: false,
            ..MenuConfig::default()
        };
        let mut state = open_state(paint_and_garage(), config);
        let target = sector_point(&state, 1);

        assert_eq!(state.click(target), Some(HostRequest::PlanetClick(1)));
        assert!(state.visible);
    }

    #[test]
    fn click_outside_the_wheel_is_ignored() {
        let mut state = open_state(paint_and_garage(), MenuConfig::default());
        assert_eq!(state.click(Point::new(5.0, 5.0)), None);
        assert!(state.visible);
    }

    #[test]
    fn hover_follows_the_pointer() {
        let mut state = open_state(MenuPayload::debug_sample(), MenuConfig::default());

        assert!(state.update_cursor(sector_point(&state, 2)));
        assert_eq!(state.hover_index, Some(2));
        assert_eq!(state.highlight().label, "Quite long text");
        assert!(state.highlight().visible);

        assert!(!state.update_cursor(sector_point(&state, 2)));
        assert!(state.update_cursor(Point::new(0.0, 0.0)));
        assert_eq!(state.highlight(), Highlight::default());

        state.update_cursor(sector_point(&state, 1));
        assert!(state.clear_hover());
        assert!(!state.clear_hover());
    }

    #[test]
    fn fan_layout_hits_buttons() {
        let config = MenuConfig {
            layout: Layout::Fan,
            ..MenuConfig::default()
        };
        let mut state = open_state(paint_and_garage(), config);
        // the second of two buttons sits straight below the center
        let button = state
            .wheel
            .fan_button(1, 2)
            .unwrap()
            .offset(state.origin.x, state.origin.y);
        assert!((button.x - VIEWPORT.0 / 2.0).abs() < 1e-9);
        assert!((button.y - (VIEWPORT.1 / 2.0 + 60.0)).abs() < 1e-9);

        assert_eq!(state.click(button), Some(HostRequest::PlanetClick(1)));
    }

    #[test]
    fn config_change_recenters_and_resizes() {
        let mut state = open_state(paint_and_garage(), MenuConfig::default());
        state.apply_config(MenuConfig {
            radius: 100.0,
            ..MenuConfig::default()
        });

        assert_eq!(state.wheel.size(), 200.0);
        assert_eq!(state.origin, Point::new(860.0, 440.0));
        assert_eq!(state.sectors.len(), 2);
        assert_eq!(state.sectors[0].path.radius, 100.0);
    }

    #[test]
    fn hide_clears_hover() {
        let mut state = open_state(paint_and_garage(), MenuConfig::default());
        state.update_cursor(sector_point(&state, 0));
        state.hide();
        assert!(!state.visible);
        assert_eq!(state.hover_index, None);
        assert!(!state.update_cursor(sector_point(&state, 0)));
    }
}
