//! The rule set directory: colour tables and compiled layer rules, dumped from the catalog so
//! they can be inspected and adjusted.

use std::{fmt::Write, path::Path};

use mapgen_chartsymbols::{ChartSymbols, Geometry, MapfileWriter};

use crate::{dirutils::write_file, error::GenerateError};

/// One `<TABLE>.txt` per colour table, with lines `NAME R G B #RRGGBB`.
pub fn create_color_rules(catalog: &ChartSymbols, dir: &Path) -> Result<(), GenerateError> {
    for name in catalog.color_table_names() {
        let Some(table) = catalog.color_table(name) else {
            continue;
        };
        let mut text = String::new();
        for (color_name, color) in table.sorted() {
            let hex = color.hex();
            writeln!(text, "{color_name} {} {}", color.rgb(), hex.trim_matches('"')).ok();
        }
        write_file(&dir.join(format!("{name}.txt")), &text, true)?;
    }
    log::info!("created color tables in {}", dir.display());
    Ok(())
}

/// One `<Point|Line|Area>.txt` with the classes every feature would be rendered with.
pub fn create_layer_rules(catalog: &ChartSymbols, dir: &Path) -> Result<(), GenerateError> {
    for geometry in [Geometry::Point, Geometry::Line, Geometry::Area] {
        let mut writer = MapfileWriter::new();
        for feature in catalog.lookups(geometry).keys() {
            let layer = catalog.layer(geometry, "rules", feature, "rules", 0, None);
            writer.line(format_args!(
                "# {feature} ({})",
                layer.display_priority().as_str()
            ));
            layer.write_classes(&mut writer);
            writer.blank();
        }
        write_file(
            &dir.join(format!("{geometry}.txt")),
            &writer.into_string(),
            true,
        )?;
    }
    log::info!("created layer rules in {}", dir.display());
    Ok(())
}
