use super::model::{Slot, State};
use super::{
    FAN_ICON_SIZE, ICON_INACTIVE_ALPHA, LABEL_BOX_CORNER, LABEL_BOX_OFFSET, LABEL_BOX_PADDING,
    STROKE_WIDTH,
};
use crate::config::{Layout, MenuConfig};
use crate::gui::theme::ThemeColors;
use cairo::Context;
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use palette::Srgba;
use planetctl::geometry::{FAN_BUTTON_RADIUS, LABEL_OFFSET, Sector, Wheel};
use planetctl::wm::Point;
use std::f64::consts::PI;
use std::iter::zip;

fn set_color(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

fn rotate_about(cr: &Context, pivot: Point, degrees: f64) {
    cr.translate(pivot.x, pivot.y);
    cr.rotate(degrees.to_radians());
    cr.translate(-pivot.x, -pivot.y);
}

/// Paints `pixbuf` scaled into a `size` square with its top-left at `at`.
fn draw_icon(
    cr: &Context,
    pixbuf: &Pixbuf,
    at: Point,
    size: f64,
    hovered: bool,
) -> Result<(), cairo::Error> {
    let scale = size / pixbuf.width().max(pixbuf.height()) as f64;

    cr.save()?;
    cr.translate(at.x, at.y);
    cr.scale(scale, scale);
    cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
    // dim icons that are not under the pointer
    if hovered {
        cr.paint()?;
    } else {
        cr.paint_with_alpha(ICON_INACTIVE_ALPHA)?;
    }
    cr.restore()
}

/// Writes `text` horizontally centered on `x` with its baseline at `y`.
fn draw_centered_text(
    cr: &Context,
    text: &str,
    x: f64,
    y: f64,
    font_size: f64,
) -> Result<(), cairo::Error> {
    cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Normal);
    cr.set_font_size(font_size);
    let ext = cr.text_extents(text)?;
    cr.move_to(x - ext.width() / 2.0 - ext.x_bearing(), y);
    cr.show_text(text)
}

struct SectorRenderer<'a> {
    slot: &'a Slot,
    sector: &'a Sector,
    wheel: &'a Wheel,
    config: &'a MenuConfig,
    hovered: bool,
}

impl<'a> SectorRenderer<'a> {
    fn new(
        slot: &'a Slot,
        sector: &'a Sector,
        wheel: &'a Wheel,
        config: &'a MenuConfig,
        hovered: bool,
    ) -> Self {
        Self {
            slot,
            sector,
            wheel,
            config,
            hovered,
        }
    }

    fn draw(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        cr.save()?;
        rotate_about(cr, self.wheel.center, self.sector.rotation);
        self.draw_wedge(cr, colors)?;

        // keep icon and label upright
        rotate_about(cr, self.sector.anchor, self.sector.anchor_rotation);
        self.draw_content(cr, colors)?;
        cr.restore()
    }

    fn draw_wedge(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let path = &self.sector.path;
        let start = path.start();

        cr.new_path();
        cr.move_to(path.center.x, path.center.y);
        cr.line_to(start.x, start.y);
        cr.arc_negative(
            path.center.x,
            path.center.y,
            path.radius,
            0.0,
            (-path.span).to_radians(),
        );
        cr.close_path();

        set_color(cr, colors.sector(self.hovered));
        cr.fill_preserve()?;
        set_color(cr, colors.stroke);
        cr.set_line_width(STROKE_WIDTH);
        cr.stroke()
    }

    fn draw_content(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let anchor = self.sector.anchor;
        let size = self.config.icon_size;

        if let Some(pixbuf) = &self.slot.pixbuf {
            let at = anchor.offset(-size / 2.0, -size * 0.7);
            draw_icon(cr, pixbuf, at, size, self.hovered)?;
        }

        set_color(cr, colors.label(self.hovered));
        draw_centered_text(
            cr,
            self.slot.label(),
            anchor.x,
            anchor.y + LABEL_OFFSET,
            self.config.font_size,
        )
    }
}

fn draw_wheel(cr: &Context, state: &State, colors: &ThemeColors) -> Result<(), cairo::Error> {
    cr.save()?;
    rotate_about(cr, state.wheel.center, state.wheel.rotation);

    for (i, (slot, sector)) in zip(&state.slots, &state.sectors).enumerate() {
        SectorRenderer::new(
            slot,
            sector,
            &state.wheel,
            &state.config,
            state.hover_index == Some(i),
        )
        .draw(cr, colors)?;
    }
    cr.restore()
}

fn draw_fan(cr: &Context, state: &State, colors: &ThemeColors) -> Result<(), cairo::Error> {
    let total = state.slots.len();

    for (i, slot) in state.slots.iter().enumerate() {
        let Ok(center) = state.wheel.fan_button(i, total) else {
            continue;
        };
        let hovered = state.hover_index == Some(i);

        set_color(cr, colors.sector(hovered));
        cr.new_path();
        cr.arc(center.x, center.y, FAN_BUTTON_RADIUS, 0.0, 2.0 * PI);
        cr.fill()?;

        if let Some(pixbuf) = &slot.pixbuf {
            let at = center.offset(-FAN_ICON_SIZE / 2.0, -FAN_ICON_SIZE / 2.0);
            draw_icon(cr, pixbuf, at, FAN_ICON_SIZE, hovered)?;
        }
    }

    draw_label_box(cr, state, colors)
}

/// Box under the fan showing the hovered item's label.
fn draw_label_box(cr: &Context, state: &State, colors: &ThemeColors) -> Result<(), cairo::Error> {
    let highlight = state.highlight();
    if !highlight.visible {
        return Ok(());
    }

    cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
    cr.set_font_size(state.config.font_size);
    let ext = cr.text_extents(&highlight.label)?;

    let (w, h) = (
        ext.width() + LABEL_BOX_PADDING * 2.0,
        ext.height() + LABEL_BOX_PADDING * 2.0,
    );
    let center = state.wheel.center.offset(0.0, LABEL_BOX_OFFSET);
    let (x, y) = (center.x - w / 2.0, center.y - h / 2.0);

    rounded_rect(cr, x, y, w, h, LABEL_BOX_CORNER);
    set_color(cr, colors.sector(false));
    cr.fill()?;

    set_color(cr, colors.label(false));
    cr.move_to(
        center.x - ext.width() / 2.0 - ext.x_bearing(),
        center.y - ext.height() / 2.0 - ext.y_bearing(),
    );
    cr.show_text(&highlight.label)
}

fn rounded_rect(cr: &Context, x: f64, y: f64, w: f64, h: f64, r: f64) {
    cr.new_sub_path();
    cr.arc(x + w - r, y + r, r, -PI / 2.0, 0.0);
    cr.arc(x + w - r, y + h - r, r, 0.0, PI / 2.0);
    cr.arc(x + r, y + h - r, r, PI / 2.0, PI);
    cr.arc(x + r, y + r, r, PI, 3.0 * PI / 2.0);
    cr.close_path();
}

pub fn draw(cr: &Context, state: &State, colors: &ThemeColors) -> Result<(), cairo::Error> {
    if !state.visible || state.slots.is_empty() {
        return Ok(());
    }

    cr.save()?;
    cr.translate(state.origin.x, state.origin.y);
    let drawn = match state.config.layout {
        Layout::Wedge => draw_wheel(cr, state, colors),
        Layout::Fan => draw_fan(cr, state, colors),
    };
    cr.restore()?;
    drawn
}
