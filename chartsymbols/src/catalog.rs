use std::{
    collections::{BTreeMap, HashMap, HashSet},
    path::Path,
};

use roxmltree::Node;

use crate::{
    color::{load_color_tables, Color, ColorTable},
    cs::{lookups_from_cs, CsSettings},
    error::ChartSymbolsError,
    filter::Filter,
    instruction::Instruction,
    layer::Layer,
    lookup::{DisplayPriority, Geometry, Lookup, LookupCollection},
    symbol::{Pattern, Symbol, VectorSymbol},
    values::{attribute, child_text},
};

/// Table that holds the line lookups, whatever the point and area tables are.
pub const LINES_TABLE: &str = "Lines";

/// Feature name of the virtual lookup for non-SOUNDG features carrying a sounding.
pub const X_SNDG: &str = "X-SNDG";

/// Drawn for colours that are missing from the active colour table.
const FALLBACK_COLOR: Color = Color {
    r: 255,
    g: 0,
    b: 255,
};

/// How the catalog is filtered while it is loaded.
#[derive(Clone, Debug)]
pub struct CatalogOptions {
    /// `Simplified` or `Paper`.
    pub point_table: String,
    /// `Plain` or `Symbolized`.
    pub area_table: String,
    /// Accepted display categories; `None` accepts all.
    pub display_categories: Option<HashSet<String>>,
    pub color_table: String,
    /// Lookup names to drop; `None` drops the default set.
    pub excluded_lookups: Option<Vec<String>>,
    pub cs: CsSettings,
}

impl CatalogOptions {
    pub const DEFAULT_EXCLUDED_LOOKUPS: [&'static str; 1] = ["M_QUAL"];
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            point_table: "Simplified".into(),
            area_table: "Plain".into(),
            display_categories: None,
            color_table: "DAY_BRIGHT".into(),
            excluded_lookups: None,
            cs: CsSettings::default(),
        }
    }
}

/// The compiled S-52 rule catalog.
#[derive(Clone, Debug)]
pub struct ChartSymbols {
    color_tables: HashMap<String, ColorTable>,
    color_table: String,

    symbols: HashMap<String, Symbol>,
    line_styles: HashMap<String, VectorSymbol>,
    patterns: HashMap<String, Pattern>,

    point_lookups: BTreeMap<String, Vec<Lookup>>,
    line_lookups: BTreeMap<String, Vec<Lookup>>,
    polygon_lookups: BTreeMap<String, Vec<Lookup>>,

    excluded_lookups: Vec<String>,
}

/// The child elements of a `lookup` that are needed to compile it.
struct LookupElement<'a> {
    name: &'a str,
    id: &'a str,
    geometry: &'a str,
    table: &'a str,
    display: &'a str,
    comment: &'a str,
    instruction: &'a str,
    rules: Filter,
    display_priority: &'a str,
}

impl<'a> LookupElement<'a> {
    fn map_from_xml(lookup: Node<'a, '_>) -> Option<Self> {
        let rules = Filter::and(
            lookup
                .children()
                .filter(|c| c.has_tag_name("attrib-code"))
                .filter_map(|c| c.text())
                .map(Filter::from_attrcode),
        );
        Some(Self {
            name: attribute(lookup, "name")?,
            id: attribute(lookup, "id").unwrap_or(""),
            geometry: child_text(lookup, "type")?,
            table: child_text(lookup, "table-name")?,
            display: child_text(lookup, "display-cat")?,
            comment: child_text(lookup, "comment")?,
            instruction: child_text(lookup, "instruction")?,
            rules,
            display_priority: child_text(lookup, "disp-prio")?,
        })
    }
}

impl ChartSymbols {
    pub fn from_file(path: &Path, options: &CatalogOptions) -> Result<Self, ChartSymbolsError> {
        if !path.is_file() {
            return Err(ChartSymbolsError::MissingFile(path.to_owned()));
        }
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text, options)
    }

    pub fn parse(text: &str, options: &CatalogOptions) -> Result<Self, ChartSymbolsError> {
        let document = roxmltree::Document::parse(text)?;
        let root = document.root_element();
        if !root.has_tag_name("chartsymbols") {
            return Err(ChartSymbolsError::UnexpectedRoot(
                root.tag_name().name().to_owned(),
            ));
        }

        let excluded_lookups = match &options.excluded_lookups {
            Some(excluded) => excluded.clone(),
            None => CatalogOptions::DEFAULT_EXCLUDED_LOOKUPS
                .iter()
                .map(|name| name.to_string())
                .collect(),
        };

        let mut chart_symbols = Self {
            color_tables: load_color_tables(root),
            color_table: String::new(),
            symbols: HashMap::new(),
            line_styles: HashMap::new(),
            patterns: HashMap::new(),
            point_lookups: BTreeMap::new(),
            line_lookups: BTreeMap::new(),
            polygon_lookups: BTreeMap::new(),
            excluded_lookups,
        };
        chart_symbols.load_colors(&options.color_table);
        chart_symbols.load_symbols(root);
        chart_symbols.load_lookups(root, options);
        Ok(chart_symbols)
    }

    /// Select the active colour table. An unknown table leaves every colour undefined.
    pub fn load_colors(&mut self, color_table: &str) {
        if !self.color_tables.contains_key(color_table) {
            log::warn!("color table {color_table} is not defined");
        }
        self.color_table = color_table.to_owned();
    }

    fn load_symbols(&mut self, root: Node) {
        for node in root.descendants() {
            match node.tag_name().name() {
                Symbol::TAG_NAME => match Symbol::map_from_xml(node) {
                    Some(symbol) => {
                        self.symbols.insert(symbol.name.clone(), symbol);
                    }
                    None => log::debug!("skipping symbol without bitmap definition"),
                },
                VectorSymbol::TAG_NAME => match VectorSymbol::map_from_xml(node) {
                    Some(line) => {
                        self.line_styles.insert(line.name.clone(), line);
                    }
                    None => log::debug!("skipping malformed line-style"),
                },
                Pattern::TAG_NAME => match Pattern::map_from_xml(node) {
                    Some(pattern) => {
                        self.patterns.insert(pattern.name.clone(), pattern);
                    }
                    None => log::debug!("skipping malformed pattern"),
                },
                _ => {}
            }
        }
    }

    fn load_lookups(&mut self, root: Node, options: &CatalogOptions) {
        let accepted_tables = [
            options.point_table.as_str(),
            options.area_table.as_str(),
            LINES_TABLE,
        ];

        for node in root.descendants().filter(|n| n.has_tag_name("lookup")) {
            let Some(element) = LookupElement::map_from_xml(node) else {
                log::debug!("skipping incomplete lookup {:?}", node.attribute("id"));
                continue;
            };

            if self.excluded_lookups.iter().any(|e| e == element.name) {
                continue;
            }
            if !accepted_tables.contains(&element.table.trim()) {
                continue;
            }
            if let Some(categories) = &options.display_categories {
                if !categories.contains(element.display.trim()) {
                    continue;
                }
            }

            let Ok(display_priority) = element.display_priority.parse::<DisplayPriority>() else {
                log::warn!(
                    "lookup {} ({}) has unknown display priority {:?}",
                    element.id,
                    element.name,
                    element.display_priority
                );
                continue;
            };
            let Ok(geometry) = element.geometry.parse::<Geometry>() else {
                log::debug!("dropping lookup {} of type {}", element.id, element.geometry);
                continue;
            };

            let base = Lookup {
                id: element.id.to_owned(),
                table: element.table.trim().to_owned(),
                display: element.display.trim().to_owned(),
                comment: element.comment.trim().to_owned(),
                instructions: Vec::new(),
                rules: element.rules,
                display_priority: Some(display_priority),
            };
            let lookups = compile_instructions(
                base,
                element.instruction,
                geometry,
                element.name,
                &options.cs,
            );

            self.lookups_mut(geometry)
                .entry(element.name.to_owned())
                .or_default()
                .extend(lookups);
        }

        if !self.excluded_lookups.iter().any(|e| e == X_SNDG) {
            let base = Lookup {
                id: X_SNDG.to_owned(),
                table: options.point_table.clone(),
                comment: "non-SOUNDG features with sounding".to_owned(),
                display_priority: Some(DisplayPriority::AreaSymbol),
                ..Lookup::default()
            };
            let lookups = LookupCollection::new(base).product(&lookups_from_cs(
                "SOUNDG",
                Geometry::Point,
                X_SNDG,
                &options.cs,
            ));
            self.point_lookups
                .insert(X_SNDG.to_owned(), lookups.into_iter().collect());
        }
    }

    fn lookups_mut(&mut self, geometry: Geometry) -> &mut BTreeMap<String, Vec<Lookup>> {
        match geometry {
            Geometry::Point => &mut self.point_lookups,
            Geometry::Line => &mut self.line_lookups,
            Geometry::Area => &mut self.polygon_lookups,
        }
    }

    /// All lookups of one geometry, by feature name.
    pub fn lookups(&self, geometry: Geometry) -> &BTreeMap<String, Vec<Lookup>> {
        match geometry {
            Geometry::Point => &self.point_lookups,
            Geometry::Line => &self.line_lookups,
            Geometry::Area => &self.polygon_lookups,
        }
    }

    pub fn point_lookups(&self, feature: &str) -> &[Lookup] {
        self.feature_lookups(Geometry::Point, feature)
    }

    pub fn line_lookups(&self, feature: &str) -> &[Lookup] {
        self.feature_lookups(Geometry::Line, feature)
    }

    pub fn polygon_lookups(&self, feature: &str) -> &[Lookup] {
        self.feature_lookups(Geometry::Area, feature)
    }

    pub fn feature_lookups(&self, geometry: Geometry, feature: &str) -> &[Lookup] {
        self.lookups(geometry)
            .get(feature)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn color_table_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.color_tables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn color_table(&self, name: &str) -> Option<&ColorTable> {
        self.color_tables.get(name)
    }

    /// Name of the active colour table.
    pub fn active_color_table(&self) -> &str {
        &self.color_table
    }

    pub fn color(&self, name: &str) -> Option<Color> {
        self.color_tables.get(&self.color_table)?.get(name)
    }

    /// The colour `name`, or a conspicuous magenta when the active table lacks it.
    pub fn color_or_default(&self, name: &str) -> Color {
        self.color(name).unwrap_or_else(|| {
            log::warn!("color {name:?} missing from table {}", self.color_table);
            FALLBACK_COLOR
        })
    }

    pub fn symbol(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn line_style(&self, name: &str) -> Option<&VectorSymbol> {
        self.line_styles.get(name)
    }

    pub fn pattern(&self, name: &str) -> Option<&Pattern> {
        self.patterns.get(name)
    }

    /// Raster symbols sorted by name.
    pub fn symbols(&self) -> Vec<&Symbol> {
        sorted_values(&self.symbols)
    }

    /// Complex line styles sorted by name.
    pub fn line_styles(&self) -> Vec<&VectorSymbol> {
        sorted_values(&self.line_styles)
    }

    /// Area patterns sorted by name.
    pub fn patterns(&self) -> Vec<&Pattern> {
        sorted_values(&self.patterns)
    }

    /// The layer for point features of `feature`; lights get the light description label.
    pub fn point_layer<'a>(
        &'a self,
        layer: &str,
        feature: &str,
        group: &str,
        max_scale_denom: u64,
        fields: Option<&[String]>,
    ) -> Layer<'a> {
        let mut point_layer = Layer::new(
            self,
            layer,
            feature,
            Geometry::Point,
            group,
            max_scale_denom,
            fields,
        );
        if feature == "LIGHTS" {
            point_layer = point_layer.with_light_descriptions();
        }
        point_layer
    }

    pub fn line_layer<'a>(
        &'a self,
        layer: &str,
        feature: &str,
        group: &str,
        max_scale_denom: u64,
        fields: Option<&[String]>,
    ) -> Layer<'a> {
        Layer::new(
            self,
            layer,
            feature,
            Geometry::Line,
            group,
            max_scale_denom,
            fields,
        )
    }

    pub fn polygon_layer<'a>(
        &'a self,
        layer: &str,
        feature: &str,
        group: &str,
        max_scale_denom: u64,
        fields: Option<&[String]>,
    ) -> Layer<'a> {
        Layer::new(
            self,
            layer,
            feature,
            Geometry::Area,
            group,
            max_scale_denom,
            fields,
        )
    }

    /// Dispatch to the layer constructor of `geometry`.
    pub fn layer<'a>(
        &'a self,
        geometry: Geometry,
        layer: &str,
        feature: &str,
        group: &str,
        max_scale_denom: u64,
        fields: Option<&[String]>,
    ) -> Layer<'a> {
        match geometry {
            Geometry::Point => self.point_layer(layer, feature, group, max_scale_denom, fields),
            Geometry::Line => self.line_layer(layer, feature, group, max_scale_denom, fields),
            Geometry::Area => self.polygon_layer(layer, feature, group, max_scale_denom, fields),
        }
    }
}

fn sorted_values<T>(map: &HashMap<String, T>) -> Vec<&T> {
    let mut entries: Vec<(&String, &T)> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries.into_iter().map(|(_, value)| value).collect()
}

/// Expand the `;` separated instruction string of a lookup. `CS` procedures multiply the
/// lookups built so far, every other instruction is appended to all of them.
fn compile_instructions(
    base: Lookup,
    instructions: &str,
    geometry: Geometry,
    name: &str,
    settings: &CsSettings,
) -> LookupCollection {
    let mut lookups = LookupCollection::new(base);
    for part in instructions.split(';').filter(|p| !p.trim().is_empty()) {
        match Instruction::parse(part) {
            Instruction::ConditionalSymbology { procedure } => {
                let expanded = lookups_from_cs(&procedure, geometry, name, settings);
                lookups = lookups.product(&expanded);
            }
            instruction => lookups.add_instruction(instruction),
        }
    }
    lookups
}
