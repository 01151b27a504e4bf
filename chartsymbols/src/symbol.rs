use roxmltree::Node;

use crate::{
    hpgl::{self, Stroke},
    values::{attribute, child, child_text, point, size},
};

/// Pen letter to colour name, decoded from a `color-ref` such as `ACHBLKBCHGRD`.
pub type ColorRefs = Vec<(char, String)>;

fn parse_color_refs(color_ref: &str) -> ColorRefs {
    let chars: Vec<char> = color_ref.trim().chars().collect();
    chars
        .chunks_exact(6)
        .map(|chunk| (chunk[0], chunk[1..].iter().collect()))
        .collect()
}

/// A raster symbol located on the sprite sheet of each colour table.
#[derive(Clone, Debug, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub pivot: (i32, i32),
    pub size: (i32, i32),
    pub graphics_location: Option<(i32, i32)>,
}

impl Symbol {
    pub const TAG_NAME: &'static str = "symbol";

    /// MapServer anchors pixmaps on their centre, S-52 on the pivot; this is the `OFFSET`
    /// that moves the pivot back onto the feature.
    pub fn offset(&self) -> (i32, i32) {
        (self.size.0 / 2 - self.pivot.0, self.size.1 / 2 - self.pivot.1)
    }

    fn from_bitmap(name: &str, bitmap: Node) -> Option<Self> {
        Some(Self {
            name: name.to_owned(),
            pivot: point(bitmap, "pivot")?,
            size: size(bitmap)?,
            graphics_location: point(bitmap, "graphics-location"),
        })
    }

    pub(crate) fn map_from_xml(symbol: Node) -> Option<Self> {
        let name = child_text(symbol, "name")?;
        Self::from_bitmap(name, child(symbol, "bitmap")?)
    }
}

/// A symbol drawn from HPGL, used for complex lines (`line-style`) and vector patterns.
#[derive(Clone, Debug, PartialEq)]
pub struct VectorSymbol {
    pub name: String,
    pub description: Option<String>,
    pub color_refs: ColorRefs,
    pub size: (i32, i32),
    pub pivot: (i32, i32),
    pub hpgl: String,
}

impl VectorSymbol {
    pub const TAG_NAME: &'static str = "line-style";

    pub fn strokes(&self) -> Vec<Stroke> {
        hpgl::parse(&self.hpgl)
    }

    /// Name of the colour drawn by `pen`.
    pub fn pen_color(&self, pen: char) -> Option<&str> {
        self.color_refs
            .iter()
            .find(|(p, _)| *p == pen)
            .map(|(_, color)| color.as_str())
    }

    /// Colour of the first pen; complex lines are drawn in a single colour.
    pub fn main_color(&self) -> Option<&str> {
        self.color_refs.first().map(|(_, color)| color.as_str())
    }

    pub(crate) fn map_from_xml(node: Node) -> Option<Self> {
        let name = child_text(node, "name")?.to_owned();
        let vector = child(node, "vector")?;
        let hpgl = node
            .descendants()
            .find(|n| n.has_tag_name("HPGL"))
            .and_then(|n| n.text())?
            .to_owned();

        Some(Self {
            name,
            description: child_text(node, "description").map(str::to_owned),
            color_refs: child_text(node, "color-ref")
                .map(parse_color_refs)
                .unwrap_or_default(),
            size: size(vector)?,
            pivot: point(vector, "pivot").unwrap_or((0, 0)),
            hpgl,
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FillType {
    Staggered,
    Linear,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PatternDefinition {
    Vector(VectorSymbol),
    Raster(Symbol),
}

/// An area fill pattern (`AP` instruction).
#[derive(Clone, Debug, PartialEq)]
pub struct Pattern {
    pub name: String,
    pub fill_type: FillType,
    /// Minimum distance between symbols, in 0.01 mm.
    pub min_distance: i32,
    pub definition: PatternDefinition,
}

impl Pattern {
    pub const TAG_NAME: &'static str = "pattern";

    /// Bounding box of one pattern tile, in the units of the definition.
    pub fn size(&self) -> (i32, i32) {
        match &self.definition {
            PatternDefinition::Vector(vector) => vector.size,
            PatternDefinition::Raster(raster) => raster.size,
        }
    }

    pub(crate) fn map_from_xml(node: Node) -> Option<Self> {
        let name = child_text(node, "name")?;
        let fill_type = match child_text(node, "filltype").map(str::trim) {
            Some("S") => FillType::Staggered,
            _ => FillType::Linear,
        };

        let (definition, distance_node) = match child_text(node, "definition").map(str::trim) {
            Some("R") => {
                let bitmap = child(node, "bitmap")?;
                (
                    PatternDefinition::Raster(Symbol::from_bitmap(name, bitmap)?),
                    bitmap,
                )
            }
            _ => (
                PatternDefinition::Vector(VectorSymbol::map_from_xml(node)?),
                child(node, "vector")?,
            ),
        };
        let min_distance = child(distance_node, "distance")
            .and_then(|d| attribute(d, "min"))
            .unwrap_or(0);

        Some(Self {
            name: name.to_owned(),
            fill_type,
            min_distance,
            definition,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse<T>(xml: &str, f: impl Fn(Node) -> Option<T>) -> Option<T> {
        let doc = roxmltree::Document::parse(xml).unwrap();
        f(doc.root_element())
    }

    #[test]
    fn color_refs_are_six_character_chunks() {
        assert_eq!(
            parse_color_refs("ACHBLKBCHGRD"),
            vec![('A', "CHBLK".to_owned()), ('B', "CHGRD".to_owned())]
        );
        assert!(parse_color_refs("").is_empty());
    }

    #[test]
    fn symbol_offset_moves_pivot_to_center() {
        let symbol = parse(
            r#"<symbol><name>BOYCAN01</name><bitmap width="10" height="20">
                <pivot x="5" y="19"/><graphics-location x="100" y="4"/></bitmap></symbol>"#,
            Symbol::map_from_xml,
        )
        .unwrap();
        assert_eq!(symbol.offset(), (0, -9));
        assert_eq!(symbol.graphics_location, Some((100, 4)));
    }

    #[test]
    fn symbol_without_bitmap_is_skipped() {
        let symbol = parse(
            r#"<symbol><name>VECONLY</name><vector width="1" height="1"/></symbol>"#,
            Symbol::map_from_xml,
        );
        assert!(symbol.is_none());
    }

    #[test]
    fn reads_line_style() {
        let line = parse(
            r#"<line-style><name>ACHARE51</name><color-ref>ACHMGD</color-ref>
                <vector width="1280" height="279"><pivot x="1800" y="1500"/>
                <HPGL>SPA;SW1;PU1800,1500;PD2400,1500</HPGL></vector></line-style>"#,
            VectorSymbol::map_from_xml,
        )
        .unwrap();
        assert_eq!(line.name, "ACHARE51");
        assert_eq!(line.main_color(), Some("CHMGD"));
        assert_eq!(line.pen_color('A'), Some("CHMGD"));
        assert_eq!(line.strokes().len(), 1);
    }

    #[test]
    fn reads_vector_and_raster_patterns() {
        let vector = parse(
            r#"<pattern><name>DRGARE01</name><definition>V</definition><filltype>S</filltype>
                <color-ref>ACHGRF</color-ref>
                <vector width="100" height="100"><distance min="500" max="0"/>
                <pivot x="0" y="0"/><HPGL>SPA;PU0,0;PD100,100</HPGL></vector></pattern>"#,
            Pattern::map_from_xml,
        )
        .unwrap();
        assert_eq!(vector.fill_type, FillType::Staggered);
        assert_eq!(vector.min_distance, 500);
        assert!(matches!(vector.definition, PatternDefinition::Vector(_)));

        let raster = parse(
            r#"<pattern><name>MARSHES1</name><definition>R</definition><filltype>L</filltype>
                <bitmap width="8" height="4"><distance min="0" max="0"/>
                <pivot x="4" y="2"/></bitmap></pattern>"#,
            Pattern::map_from_xml,
        )
        .unwrap();
        assert_eq!(raster.size(), (8, 4));
        assert!(matches!(raster.definition, PatternDefinition::Raster(_)));
    }
}
