use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

pub struct ThemeColors {
    pub sector: Srgba<f64>,
    pub sector_hovered: Srgba<f64>,
    pub stroke: Srgba<f64>,
    pub label: Srgba<f64>,
    pub label_hovered: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        Self {
            sector: Self::lookup_color(
                context,
                "theme_bg_color",
                Srgba::new(0.145, 0.149, 0.169, 0.95),
                Some(0.95),
            ),
            sector_hovered: Self::lookup_color(
                context,
                "theme_selected_bg_color",
                Srgba::new(0.133, 0.545, 0.902, 1.0),
                None,
            ),
            stroke: Srgba::new(1.0, 1.0, 1.0, 1.0),
            label: Self::lookup_color(
                context,
                "theme_fg_color",
                Srgba::new(0.757, 0.761, 0.773, 1.0),
                None,
            ),
            label_hovered: Self::lookup_color(
                context,
                "theme_selected_fg_color",
                Srgba::new(1.0, 1.0, 1.0, 1.0),
                None,
            ),
        }
    }

    pub fn sector(&self, hovered: bool) -> Srgba<f64> {
        if hovered {
            self.sector_hovered
        } else {
            self.sector
        }
    }

    pub fn label(&self, hovered: bool) -> Srgba<f64> {
        if hovered {
            self.label_hovered
        } else {
            self.label
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or(fallback)
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.planet-window, .planet-drawing-area {
    background: none;
    background-color: transparent;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
