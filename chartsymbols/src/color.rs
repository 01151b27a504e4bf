use std::{collections::HashMap, fmt};

use roxmltree::Node;

/// An RGB colour from a `color-table`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const TAG_NAME: &'static str = "color";

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Quoted upper case hex form, as written in mapfiles: `"#RRGGBB"`.
    pub fn hex(&self) -> String {
        format!("\"#{:02X}{:02X}{:02X}\"", self.r, self.g, self.b)
    }

    /// Space separated channels: `R G B`.
    pub fn rgb(&self) -> String {
        format!("{} {} {}", self.r, self.g, self.b)
    }

    fn map_from_xml(color: Node) -> Option<(String, Self)> {
        let name = color.attribute("name")?;
        let channel = |name| color.attribute(name)?.trim().parse::<u8>().ok();
        Some((name.to_owned(), Self::new(channel("r")?, channel("g")?, channel("b")?)))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

/// A named palette (`DAY_BRIGHT`, `DUSK`, `NIGHT`...).
#[derive(Clone, Debug, Default)]
pub struct ColorTable {
    pub name: String,
    /// Sprite sheet holding the raster symbols drawn with this palette.
    pub graphics_file: Option<String>,
    pub colors: HashMap<String, Color>,
}

impl ColorTable {
    pub const TAG_NAME: &'static str = "color-table";

    pub fn get(&self, name: &str) -> Option<Color> {
        self.colors.get(name).copied()
    }

    /// Colours sorted by name, for stable output.
    pub fn sorted(&self) -> Vec<(&str, Color)> {
        let mut colors: Vec<_> = self
            .colors
            .iter()
            .map(|(name, color)| (name.as_str(), *color))
            .collect();
        colors.sort_by(|a, b| a.0.cmp(b.0));
        colors
    }

    pub(crate) fn map_from_xml(table: Node) -> Option<Self> {
        let name = table.attribute("name")?.to_owned();
        let graphics_file = table
            .children()
            .find(|c| c.has_tag_name("graphics-file"))
            .and_then(|c| c.attribute("name"))
            .map(str::to_owned);

        let mut colors = HashMap::new();
        for color in table.descendants().filter(|c| c.has_tag_name(Color::TAG_NAME)) {
            match Color::map_from_xml(color) {
                Some((name, color)) => {
                    colors.insert(name, color);
                }
                None => log::debug!("skipping malformed color in table {name}"),
            }
        }

        Some(Self {
            name,
            graphics_file,
            colors,
        })
    }
}

pub(crate) fn load_color_tables(root: Node) -> HashMap<String, ColorTable> {
    root.descendants()
        .filter(|n| n.has_tag_name(ColorTable::TAG_NAME))
        .filter_map(ColorTable::map_from_xml)
        .map(|table| (table.name.clone(), table))
        .collect()
}
