use crate::config;
use crate::events::AppEvent;
use crate::gui::menu::{self, State};
use crate::gui::theme::{self, ThemeColors};
use crate::gui::window;
use gtk::prelude::*;
use gtk4 as gtk;
use planetctl::protocol::{HostRequest, MenuPayload};
use planetctl::wm::Point;
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

pub struct AppModel {
    pub state: Rc<RefCell<State>>,
    pub selections: async_channel::Sender<HostRequest>,
    pub root: gtk::ApplicationWindow,
    pub drawing_area: gtk::DrawingArea,
}

impl AppModel {
    fn visible(&self) -> bool {
        self.state.borrow().visible
    }
}

#[derive(Debug)]
pub enum AppMsg {
    Open(MenuPayload),
    Hide,
    Click(u32, Point),
    CursorMove(Point),
    PointerLeave,
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Open(payload) => AppMsg::Open(payload),
            AppEvent::Hide => AppMsg::Hide,
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (
        State,
        async_channel::Sender<HostRequest>,
        async_channel::Receiver<AppEvent>,
    );
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Planet"),
            #[watch]
            set_visible: model.visible(),
            #[watch]
            set_opacity: if model.visible() { 1.0 } else { 0.0 },
            add_css_class: "planet-window",
            set_decorated: false,

            #[name = "overlay"]
            gtk::Overlay {
                #[name = "drawing_area"]
                gtk::DrawingArea {
                    set_hexpand: true,
                    set_vexpand: true,
                    add_css_class: "planet-drawing-area",

                    add_controller = gtk::EventControllerMotion {
                        connect_motion[sender] => move |_, x, y| {
                            sender.input(AppMsg::CursorMove(Point::new(x, y)));
                        },
                        connect_leave[sender] => move |_| {
                            sender.input(AppMsg::PointerLeave);
                        }
                    },

                    add_controller = gtk::GestureClick {
                        set_button: 0, // Listen to all buttons
                        connect_released[sender] => move |gesture, _, x, y| {
                            sender.input(AppMsg::Click(gesture.current_button(), Point::new(x, y)));
                        }
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (state, selections, rx) = init;

        theme::load_css();
        window::init_layer_shell(&root);

        let model = AppModel {
            state: Rc::new(RefCell::new(state)),
            selections,
            root: root.clone(),
            drawing_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let state_draw = model.state.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, width, height| {
                let style_context = drawing_area.style_context();
                let colors = ThemeColors::from_context(&style_context);
                let mut state = state_draw.borrow_mut();
                state.set_viewport(width as f64, height as f64);
                if let Err(e) = menu::draw(cr, &state, &colors) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        root.set_visible(false);

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Open(payload) => {
                log::info!("Opening menu with {} items", payload.items.len());
                window::follow_active_monitor(&self.root);
                self.state.borrow_mut().open(payload);
                self.drawing_area.queue_draw();
            }
            AppMsg::Hide => {
                self.state.borrow_mut().hide();
            }
            AppMsg::Click(button, point) => {
                if button != gtk::gdk::BUTTON_PRIMARY {
                    return;
                }
                let Some(request) = self.state.borrow_mut().click(point) else {
                    return;
                };
                log::debug!("Selected {:?}", request);
                if let Err(e) = self.selections.try_send(request) {
                    log::error!("Failed to report selection: {}", e);
                }
                self.drawing_area.queue_draw();
            }
            AppMsg::CursorMove(point) => {
                if self.state.borrow_mut().update_cursor(point) {
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::PointerLeave => {
                if self.state.borrow_mut().clear_hover() {
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    self.state.borrow_mut().apply_config(new_config.menu);
                    self.drawing_area.queue_draw();
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }
    }
}
