use std::path::{Path, PathBuf};

use mapgen_chartsymbols::{hpgl, ChartSymbols, MapfileWriter, PatternDefinition, VectorSymbol};

use crate::{dirutils::write_file, error::GenerateError, theme::Theme};

fn write_pixmap(writer: &mut MapfileWriter, theme: &Theme, name: &str) {
    writer.block("SYMBOL", |w| {
        w.quoted("NAME", name);
        w.entry("TYPE", "PIXMAP");
        w.quoted("IMAGE", format_args!("{}/{name}.png", theme.name));
    });
}

fn write_vector(writer: &mut MapfileWriter, vector: &VectorSymbol, name: &str) {
    let strokes = vector.strokes();
    if strokes.is_empty() {
        log::debug!("{name} has no drawable HPGL, skipped");
        return;
    }
    writer.block("SYMBOL", |w| {
        w.quoted("NAME", name);
        w.entry("TYPE", "VECTOR");
        w.block("POINTS", |w| {
            w.line(hpgl::to_mapfile_points(&strokes, vector.pivot));
        });
        w.entry("FILLED", "FALSE");
    });
}

/// The `SYMBOLSET` of one theme: raster symbols and patterns as pixmaps, complex lines and
/// vector patterns as vector symbols.
pub fn symbolset(catalog: &ChartSymbols, theme: &Theme) -> String {
    let mut writer = MapfileWriter::new();
    writer.block("SYMBOLSET", |w| {
        for symbol in catalog.symbols() {
            write_pixmap(w, theme, &symbol.name);
        }
        for line in catalog.line_styles() {
            write_vector(w, line, &line.name);
        }
        for pattern in catalog.patterns() {
            match &pattern.definition {
                PatternDefinition::Raster(_) => write_pixmap(w, theme, &pattern.name),
                PatternDefinition::Vector(vector) => write_vector(w, vector, &pattern.name),
            }
        }
    });
    writer.into_string()
}

/// Write `symbols-<theme>.sym` into `dir`.
pub fn generate_symbolset(
    catalog: &ChartSymbols,
    theme: &Theme,
    dir: &Path,
    force: bool,
) -> Result<PathBuf, GenerateError> {
    let path = dir.join(format!("symbols-{}.sym", theme.name));
    write_file(&path, &symbolset(catalog, theme), force)?;
    Ok(path)
}
