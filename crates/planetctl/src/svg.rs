//! Standalone SVG rendering of a menu, for previewing without the overlay.

use crate::geometry::{ICON_SIZE, LABEL_OFFSET, Num, Sector, Wheel};
use crate::icon;
use crate::protocol::MenuItem;
use std::fmt;

#[derive(Debug, Clone)]
pub struct SvgStyle {
    pub sector_fill: String,
    pub stroke: String,
    pub label_fill: String,
    pub font_size: f64,
}

impl Default for SvgStyle {
    fn default() -> Self {
        Self {
            sector_fill: "#25262b".into(),
            stroke: "#fff".into(),
            label_fill: "#c1c2c5".into(),
            font_size: 16.0,
        }
    }
}

pub struct MenuSvg<'a> {
    items: &'a [MenuItem],
    wheel: Wheel,
    style: &'a SvgStyle,
}

impl<'a> MenuSvg<'a> {
    pub fn new(items: &'a [MenuItem], wheel: Wheel, style: &'a SvgStyle) -> Self {
        Self {
            items,
            wheel,
            style,
        }
    }

    fn write_sector(
        &self,
        f: &mut fmt::Formatter<'_>,
        sector: &Sector,
        item: &MenuItem,
    ) -> fmt::Result {
        let c = self.wheel.center;
        let a = sector.anchor;

        writeln!(
            f,
            r#"    <g class="sector" transform="rotate({} {} {})">"#,
            Num(sector.rotation),
            Num(c.x),
            Num(c.y)
        )?;
        writeln!(
            f,
            r#"      <path stroke="{}" fill="{}" d="{}"/>"#,
            self.style.stroke, self.style.sector_fill, sector.path
        )?;
        writeln!(
            f,
            r#"      <g transform="rotate({} {} {})" pointer-events="none">"#,
            Num(sector.anchor_rotation),
            Num(a.x),
            Num(a.y)
        )?;

        // unknown icons are left out rather than failing the whole menu
        if let Some(path) = icon::find_icon_path(item.icon.name()) {
            writeln!(
                f,
                r#"        <image x="{}" y="{}" width="{ICON_SIZE}" height="{ICON_SIZE}" href="file://{}"/>"#,
                a.x - ICON_SIZE / 2.0,
                a.y - ICON_SIZE * 0.7,
                escape(&path.to_string_lossy())
            )?;
        }

        writeln!(
            f,
            r#"        <text x="{}" y="{}" fill="{}" font-size="{}" text-anchor="middle">{}</text>"#,
            a.x,
            a.y + LABEL_OFFSET,
            self.style.label_fill,
            self.style.font_size,
            escape(&item.label)
        )?;
        writeln!(f, "      </g>")?;
        writeln!(f, "    </g>")
    }
}

impl fmt::Display for MenuSvg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.wheel.size();
        let c = self.wheel.center;

        writeln!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#
        )?;
        writeln!(
            f,
            r#"  <g transform="rotate({} {} {})">"#,
            self.wheel.rotation, c.x, c.y
        )?;

        for (sector, item) in self.wheel.sectors(self.items.len()).iter().zip(self.items) {
            self.write_sector(f, sector, item)?;
        }

        writeln!(f, "  </g>")?;
        writeln!(f, "</svg>")
    }
}

pub fn render(items: &[MenuItem], wheel: Wheel, style: &SvgStyle) -> String {
    MenuSvg::new(items, wheel, style).to_string()
}

fn escape(text: &str) -> String {
    text.chars()
        .fold(String::with_capacity(text.len()), |mut out, ch| {
            match ch {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '"' => out.push_str("&quot;"),
                '\'' => out.push_str("&apos;"),
                _ => out.push(ch),
            }
            out
        })
}
