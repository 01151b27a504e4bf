//! Assembly of the mapfile `LAYER` stanza of one feature type.

use std::{collections::BTreeSet, fmt};

use crate::{
    catalog::ChartSymbols,
    instruction::Instruction,
    lookup::{DisplayPriority, Geometry, Lookup},
    mapfile::{single_quoted, MapfileWriter},
};

/// Light characteristics shown next to a light flare, in display order.
const LIGHT_DESCRIPTION: [(&str, &str); 3] = [("SIGGRP", ""), ("SIGPER", "s"), ("VALNMR", "M")];

/// The layer of one feature type of one chart level, with the lookups that apply to its data.
#[derive(Clone, Debug)]
pub struct Layer<'a> {
    catalog: &'a ChartSymbols,
    name: String,
    feature: String,
    geometry: Geometry,
    group: String,
    data: String,
    max_scale_denom: u64,
    fields: Option<BTreeSet<String>>,
    lookups: Vec<&'a Lookup>,
    light_descriptions: bool,
}

impl<'a> Layer<'a> {
    /// `layer` is the chart level (`CL4`) that also names the shapefile directory. When `fields`
    /// is given, lookups whose rules need other attributes are dropped.
    pub fn new(
        catalog: &'a ChartSymbols,
        layer: &str,
        feature: &str,
        geometry: Geometry,
        group: &str,
        max_scale_denom: u64,
        fields: Option<&[String]>,
    ) -> Self {
        let fields: Option<BTreeSet<String>> =
            fields.map(|fields| fields.iter().map(|f| f.to_ascii_uppercase()).collect());

        let mut lookups: Vec<&Lookup> = catalog
            .feature_lookups(geometry, feature)
            .iter()
            .filter(|lookup| match &fields {
                Some(fields) => {
                    let missing: Vec<&str> = lookup
                        .rules
                        .attributes()
                        .into_iter()
                        .filter(|a| !fields.contains(*a))
                        .collect();
                    if !missing.is_empty() {
                        log::trace!(
                            "{feature}: dropping lookup {} without fields {missing:?}",
                            lookup.id
                        );
                    }
                    missing.is_empty()
                }
                None => true,
            })
            .collect();
        // MapServer uses the first matching class
        lookups.sort_by_key(|lookup| std::cmp::Reverse(lookup.rules.condition_count()));

        let name = format!("{layer}-{geometry}-{feature}");
        Self {
            catalog,
            data: format!("{layer}/{name}"),
            name,
            feature: feature.to_owned(),
            geometry,
            group: group.to_owned(),
            max_scale_denom,
            fields,
            lookups,
            light_descriptions: false,
        }
    }

    /// Add the light characteristics label to every class.
    pub fn with_light_descriptions(mut self) -> Self {
        self.light_descriptions = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn feature(&self) -> &str {
        &self.feature
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    /// Shapefile path relative to the map's `SHAPEPATH`.
    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn lookups(&self) -> &[&'a Lookup] {
        &self.lookups
    }

    pub fn is_empty(&self) -> bool {
        self.lookups.is_empty()
    }

    /// Highest display priority of the layer's lookups.
    pub fn display_priority(&self) -> DisplayPriority {
        self.lookups
            .iter()
            .map(|lookup| lookup.display_priority())
            .max()
            .unwrap_or(DisplayPriority::NoData)
    }

    fn has_fields(&self, instruction: &Instruction) -> bool {
        match &self.fields {
            Some(fields) => instruction.attributes().iter().all(|a| fields.contains(*a)),
            None => true,
        }
    }

    fn light_description(&self) -> Option<String> {
        let parts: Vec<String> = LIGHT_DESCRIPTION
            .iter()
            .filter(|(attribute, _)| match &self.fields {
                Some(fields) => fields.contains(*attribute),
                None => true,
            })
            .map(|(attribute, unit)| format!("[{attribute}]{unit}"))
            .collect();
        (!parts.is_empty()).then(|| single_quoted(&parts.join(" ")))
    }

    fn write_class(&self, writer: &mut MapfileWriter, lookup: &Lookup) {
        writer.block("CLASS", |w| {
            w.quoted("NAME", format_args!("{} {}", self.feature, lookup.id));
            if !lookup.rules.is_empty() {
                w.entry("EXPRESSION", &lookup.rules);
            }
            for instruction in &lookup.instructions {
                if self.has_fields(instruction) {
                    instruction.write_mapfile(w, self.catalog, self.geometry);
                } else {
                    log::trace!("{}: skipping {instruction:?}", self.name);
                }
            }
            if self.light_descriptions {
                if let Some(text) = self.light_description() {
                    w.block("LABEL", |w| {
                        w.entry("TEXT", text);
                        w.quoted("FONT", "sc");
                        w.entry("SIZE", 8);
                        w.entry("COLOR", self.catalog.color_or_default("CHBLK"));
                        w.entry("POSITION", "cr");
                        w.line("OFFSET 10 0");
                        w.entry("PARTIALS", "FALSE");
                    });
                }
            }
        });
    }

    /// The `LAYER` stanza, or nothing when no lookup applies.
    pub fn write_mapfile(&self, writer: &mut MapfileWriter) {
        if self.is_empty() {
            return;
        }
        writer.block("LAYER", |w| {
            w.quoted("NAME", &self.name);
            w.quoted("GROUP", &self.group);
            w.entry("TYPE", self.geometry.layer_type());
            w.entry("STATUS", "ON");
            w.entry("MAXSCALEDENOM", self.max_scale_denom);
            w.quoted("DATA", &self.data);
            w.block("METADATA", |w| {
                w.line(format_args!("\"ows_title\" \"{}\"", self.feature));
                w.line("\"gml_include_items\" \"all\"");
                w.line("\"wms_feature_mime_type\" \"text/html\"");
            });
            self.write_classes(w);
        });
    }

    /// Only the `CLASS` blocks, most specific first.
    pub fn write_classes(&self, writer: &mut MapfileWriter) {
        for lookup in &self.lookups {
            self.write_class(writer, lookup);
        }
    }
}

impl fmt::Display for Layer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut writer = MapfileWriter::new();
        self.write_mapfile(&mut writer);
        f.write_str(&writer.into_string())
    }
}
