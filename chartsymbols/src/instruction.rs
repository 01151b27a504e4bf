//! The S-52 symbology instruction mini-language (`SY(...)`, `LS(...)`, `TX(...)`...) and its
//! rendering as mapfile `STYLE` and `LABEL` blocks.

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    catalog::ChartSymbols,
    lookup::Geometry,
    mapfile::{single_quoted, MapfileWriter},
    symbol::PatternDefinition,
};

lazy_static! {
    static ref COMMAND: Regex = Regex::new(r"^\s*([A-Z]{2})\((.*)\)\s*$").unwrap();
    static ref FORMAT_SPEC: Regex =
        Regex::new(r"%[-+ 0#]*[0-9]*(?:\.[0-9]+)?(?:l|h)?[sdifcxeg]").unwrap();
    static ref ATTRIBUTE: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9_]{5}$").unwrap();
}

/// Symbol units (0.01 mm) per pixel.
const UNITS_PER_PIXEL: i32 = 32;

#[derive(Clone, Debug, PartialEq)]
pub enum Rotation {
    Fixed(f64),
    Attribute(String),
}

impl Rotation {
    fn parse(arg: &str) -> Option<Self> {
        let arg = arg.trim();
        if arg.is_empty() {
            None
        } else if let Ok(angle) = arg.parse::<f64>() {
            Some(Self::Fixed(angle))
        } else {
            Some(Self::Attribute(arg.to_owned()))
        }
    }

    fn write(&self, writer: &mut MapfileWriter) {
        match self {
            Self::Fixed(angle) => writer.entry("ANGLE", angle),
            Self::Attribute(attribute) => writer.line(format_args!("ANGLE [{attribute}]")),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
}

impl LineStyle {
    fn parse(arg: &str) -> Self {
        match arg.trim() {
            "DASH" => Self::Dashed,
            "DOTT" => Self::Dotted,
            _ => Self::Solid,
        }
    }

    fn pattern(self) -> Option<&'static str> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some("12 6"),
            Self::Dotted => Some("2 4"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TextContent {
    /// `TX(OBJNAM,...)`
    Attribute(String),
    /// `TX('Fog sig',...)`
    Literal(String),
    /// `TE('clr %4.1lf','VERCLR',...)`
    Format {
        format: String,
        attributes: Vec<String>,
    },
}

impl TextContent {
    /// MapServer `TEXT` value with attribute substitutions.
    fn to_mapfile(&self) -> String {
        match self {
            Self::Attribute(attribute) => single_quoted(&format!("[{attribute}]")),
            Self::Literal(text) => single_quoted(text),
            Self::Format { format, attributes } => {
                let mut attributes = attributes.iter();
                let text = FORMAT_SPEC.replace_all(format, |_: &regex::Captures| {
                    attributes
                        .next()
                        .map(|attribute| format!("[{attribute}]"))
                        .unwrap_or_default()
                });
                single_quoted(&text.replace("%%", "%"))
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Text {
    pub content: TextContent,
    /// 1 centre, 2 right, 3 left
    pub hjust: u8,
    /// 1 bottom, 2 centre, 3 top
    pub vjust: u8,
    pub bold: bool,
    pub size: u32,
    /// Offset of the text in units of the body size.
    pub offset: (f64, f64),
    pub color: String,
    pub display: u32,
}

impl Text {
    const DEFAULT_SIZE: u32 = 10;

    fn from_args(content: TextContent, args: &[String]) -> Self {
        let arg = |i: usize| args.get(i).map(String::as_str).unwrap_or("");
        let chars = arg(3);
        let bold = chars.chars().nth(1) == Some('6');
        let size = chars
            .get(3..)
            .and_then(|s| s.parse().ok())
            .unwrap_or(Self::DEFAULT_SIZE);

        Self {
            content,
            hjust: arg(0).parse().unwrap_or(1),
            vjust: arg(1).parse().unwrap_or(1),
            bold,
            size,
            offset: (arg(4).parse().unwrap_or(0.0), arg(5).parse().unwrap_or(0.0)),
            color: arg(6).to_owned(),
            display: arg(7).parse().unwrap_or(0),
        }
    }

    /// MapServer `POSITION` of the label relative to the anchor.
    pub fn position(&self) -> &'static str {
        let vertical = match self.vjust {
            3 => "l",
            2 => "c",
            _ => "u",
        };
        let horizontal = match self.hjust {
            3 => "r",
            2 => "l",
            _ => "c",
        };
        match (vertical, horizontal) {
            ("u", "l") => "ul",
            ("u", "c") => "uc",
            ("u", "r") => "ur",
            ("c", "l") => "cl",
            ("c", "r") => "cr",
            ("l", "l") => "ll",
            ("l", "c") => "lc",
            ("l", "r") => "lr",
            _ => "cc",
        }
    }

    pub fn attributes(&self) -> Vec<&str> {
        match &self.content {
            TextContent::Attribute(attribute) => vec![attribute.as_str()],
            TextContent::Literal(_) => Vec::new(),
            TextContent::Format { attributes, .. } => {
                attributes.iter().map(String::as_str).collect()
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Instruction {
    /// `SY(name[,rot])`
    Symbol {
        name: String,
        rotation: Option<Rotation>,
    },
    /// `LS(pstyle,width,colour)`
    SimpleLine {
        style: LineStyle,
        width: u32,
        color: String,
    },
    /// `LC(name)`
    ComplexLine { name: String },
    /// `AC(colour[,transparency])`
    AreaColor { color: String, transparency: u8 },
    /// `AP(name[,rot])`
    AreaPattern {
        name: String,
        rotation: Option<Rotation>,
    },
    /// `TX(...)` and `TE(...)`
    Text(Text),
    /// `CS(procname)`; only the procedure name, without its version suffix, is kept.
    ConditionalSymbology { procedure: String },
    Unknown(String),
}

/// Split instruction arguments on commas outside single quotes and strip the quotes.
fn split_args(args: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    for c in args.chars() {
        match c {
            '\'' => quoted = !quoted,
            ',' if !quoted => parts.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    parts.push(current);
    parts.into_iter().map(|p| p.trim().to_owned()).collect()
}

impl Instruction {
    /// Parse one instruction of a `;` separated instruction string.
    pub fn parse(command: &str) -> Self {
        let Some(captures) = COMMAND.captures(command) else {
            return Self::Unknown(command.to_owned());
        };
        let raw_args = &captures[2];
        let args = split_args(raw_args);
        let arg = |i: usize| args.get(i).map(String::as_str).unwrap_or("");

        match &captures[1] {
            "SY" => Self::Symbol {
                name: arg(0).to_owned(),
                rotation: Rotation::parse(arg(1)),
            },
            "LS" => Self::SimpleLine {
                style: LineStyle::parse(arg(0)),
                width: arg(1).parse().unwrap_or(1),
                color: arg(2).to_owned(),
            },
            "LC" => Self::ComplexLine {
                name: arg(0).to_owned(),
            },
            "AC" => Self::AreaColor {
                color: arg(0).to_owned(),
                transparency: arg(1).parse::<u8>().unwrap_or(0).min(4),
            },
            "AP" => Self::AreaPattern {
                name: arg(0).to_owned(),
                rotation: Rotation::parse(arg(1)),
            },
            "TX" => {
                let raw = raw_args.trim_start();
                let content = if raw.starts_with('\'') {
                    TextContent::Literal(arg(0).to_owned())
                } else {
                    TextContent::Attribute(arg(0).to_owned())
                };
                Self::Text(Text::from_args(content, args.get(1..).unwrap_or(&[])))
            }
            "TE" => {
                let content = TextContent::Format {
                    format: arg(0).to_owned(),
                    attributes: arg(1)
                        .split(',')
                        .map(str::trim)
                        .filter(|a| !a.is_empty())
                        .map(str::to_owned)
                        .collect(),
                };
                Self::Text(Text::from_args(content, args.get(2..).unwrap_or(&[])))
            }
            "CS" => {
                let procedure = arg(0).trim_end_matches(|c: char| c.is_ascii_digit());
                Self::ConditionalSymbology {
                    procedure: procedure.to_owned(),
                }
            }
            _ => Self::Unknown(command.to_owned()),
        }
    }

    /// Attributes this instruction needs from the data to render.
    pub fn attributes(&self) -> BTreeSet<&str> {
        match self {
            Self::Symbol {
                rotation: Some(Rotation::Attribute(attribute)),
                ..
            }
            | Self::AreaPattern {
                rotation: Some(Rotation::Attribute(attribute)),
                ..
            } => BTreeSet::from([attribute.as_str()]),
            Self::Text(text) => text
                .attributes()
                .into_iter()
                .filter(|a| ATTRIBUTE.is_match(a))
                .collect(),
            _ => BTreeSet::new(),
        }
    }

    pub fn is_label(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Write the `STYLE` or `LABEL` block(s) of this instruction.
    pub fn write_mapfile(
        &self,
        writer: &mut MapfileWriter,
        symbols: &ChartSymbols,
        geometry: Geometry,
    ) {
        match self {
            Self::Symbol { name, rotation } => {
                writer.block("STYLE", |w| {
                    w.quoted("SYMBOL", name);
                    if let Some(symbol) = symbols.symbol(name) {
                        let (x, y) = symbol.offset();
                        if (x, y) != (0, 0) {
                            w.line(format_args!("OFFSET {x} {y}"));
                        }
                    }
                    if let Some(rotation) = rotation {
                        rotation.write(w);
                    }
                    if geometry == Geometry::Area {
                        w.quoted("GEOMTRANSFORM", "centroid");
                    }
                });
            }
            Self::SimpleLine {
                style,
                width,
                color,
            } => {
                let color = symbols.color_or_default(color);
                writer.block("STYLE", |w| {
                    match geometry {
                        Geometry::Area => w.entry("OUTLINECOLOR", color),
                        _ => w.entry("COLOR", color),
                    }
                    w.entry("WIDTH", width);
                    if let Some(pattern) = style.pattern() {
                        w.line(format_args!("PATTERN {pattern} END"));
                        w.entry("LINECAP", "BUTT");
                    }
                });
            }
            Self::ComplexLine { name } => {
                let Some(line) = symbols.line_style(name) else {
                    log::debug!("no line style {name}, complex line not drawn");
                    return;
                };
                let color = symbols.color_or_default(line.main_color().unwrap_or(""));
                writer.block("STYLE", |w| {
                    if geometry == Geometry::Area {
                        w.entry("OUTLINECOLOR", color);
                        w.entry("WIDTH", 1);
                        w.line("PATTERN 10 5 END");
                    } else {
                        w.quoted("SYMBOL", name);
                        w.entry("COLOR", color);
                        w.entry("SIZE", (line.size.1 / UNITS_PER_PIXEL).max(1));
                        w.entry("GAP", -(line.size.0 / UNITS_PER_PIXEL).max(1));
                    }
                });
            }
            Self::AreaColor {
                color,
                transparency,
            } => {
                let color = symbols.color_or_default(color);
                writer.block("STYLE", |w| {
                    w.entry("COLOR", color);
                    if *transparency > 0 {
                        w.entry("OPACITY", 100 - 25 * u32::from(*transparency));
                    }
                });
            }
            Self::AreaPattern { name, rotation } => {
                let Some(pattern) = symbols.pattern(name) else {
                    log::debug!("no pattern {name}, area pattern not drawn");
                    return;
                };
                writer.block("STYLE", |w| {
                    w.quoted("SYMBOL", name);
                    match &pattern.definition {
                        PatternDefinition::Vector(vector) => {
                            let color = symbols.color_or_default(vector.main_color().unwrap_or(""));
                            w.entry("COLOR", color);
                            w.entry("SIZE", (vector.size.1 / UNITS_PER_PIXEL).max(1));
                            let gap = (vector.size.0 + pattern.min_distance) / UNITS_PER_PIXEL;
                            w.entry("GAP", gap.max(1));
                        }
                        PatternDefinition::Raster(raster) => {
                            w.entry("SIZE", raster.size.1);
                        }
                    }
                    if let Some(rotation) = rotation {
                        rotation.write(w);
                    }
                });
            }
            Self::Text(text) => {
                let color = symbols.color_or_default(&text.color);
                writer.block("LABEL", |w| {
                    w.line(format_args!("TEXT {}", text.content.to_mapfile()));
                    w.quoted("FONT", if text.bold { "sc-bold" } else { "sc" });
                    w.entry("SIZE", text.size);
                    w.entry("COLOR", color);
                    w.entry("POSITION", text.position());
                    let size = text.size as f64;
                    let (x, y) = (text.offset.0 * size, text.offset.1 * size);
                    if (x, y) != (0.0, 0.0) {
                        w.line(format_args!("OFFSET {} {}", x.round(), y.round()));
                    }
                    if geometry == Geometry::Line {
                        w.entry("ANGLE", "FOLLOW");
                    }
                    w.entry("PARTIALS", "FALSE");
                });
            }
            Self::ConditionalSymbology { procedure } => {
                log::debug!("unexpanded CS({procedure}) is not rendered");
            }
            Self::Unknown(command) => {
                log::debug!("unknown instruction {command:?} is not rendered");
            }
        }
    }
}

/// Parse a full `;` separated instruction string, ignoring empty parts.
pub fn parse_instructions(instructions: &str) -> Vec<Instruction> {
    instructions
        .split(';')
        .filter(|part| !part.trim().is_empty())
        .map(Instruction::parse)
        .collect()
}
