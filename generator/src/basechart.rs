//! Mapfiles for the shapefile tree of a converted base chart.
//!
//! The data directory holds one directory per chart level (`CL1` overview to `CL6` berthing),
//! each with shapefiles named `CL<n>-<Point|Line|Area>-<FEATURE>.shp`. Every level becomes an
//! include file per theme holding one layer per shapefile, and every theme gets a main mapfile
//! including the levels.

use std::path::Path;

use lazy_static::lazy_static;
use mapgen_chartsymbols::{ChartSymbols, Geometry, Layer, MapfileWriter};
use regex::Regex;

use crate::{
    config::Config,
    dbf,
    dirutils::write_file,
    error::GenerateError,
    theme::{Theme, THEMES},
};

lazy_static! {
    static ref SHAPEFILE: Regex = Regex::new(r"^CL(\d)-(Point|Line|Area)-(.+)\.shp$").unwrap();
}

/// Chart levels and the largest scale denominator they are shown at.
pub const LEVELS: [(u8, u64); 6] = [
    (1, 99999999),
    (2, 3000000),
    (3, 1200000),
    (4, 180000),
    (5, 45000),
    (6, 22000),
];

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ShapeFile {
    pub level: u8,
    pub geometry: Geometry,
    pub feature: String,
    /// Attribute columns, when the `.dbf` could be read.
    pub fields: Option<Vec<String>>,
}

/// The shapefiles of chart level `level` below `data`, sorted.
pub fn scan_level(data: &Path, level: u8) -> Result<Vec<ShapeFile>, GenerateError> {
    let dir = data.join(format!("CL{level}"));
    if !dir.is_dir() {
        log::debug!("no data for level {level} in {}", dir.display());
        return Ok(Vec::new());
    }
    let read_error = |source| GenerateError::Read {
        path: dir.clone(),
        source,
    };

    let mut shapefiles = Vec::new();
    for entry in std::fs::read_dir(&dir).map_err(read_error)? {
        let path = entry.map_err(read_error)?.path();
        let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        let Some(captures) = SHAPEFILE.captures(file_name) else {
            continue;
        };
        if captures[1] != level.to_string() {
            log::warn!("{} is in the wrong level directory", path.display());
            continue;
        }
        let Ok(geometry) = captures[2].parse::<Geometry>() else {
            continue;
        };
        let fields = match dbf::read_field_names(&path.with_extension("dbf")) {
            Ok(fields) => Some(fields),
            Err(error) => {
                log::warn!("{error}; all rules of {} are kept", &captures[3]);
                None
            }
        };
        shapefiles.push(ShapeFile {
            level,
            geometry,
            feature: captures[3].to_owned(),
            fields,
        });
    }
    shapefiles.sort();
    Ok(shapefiles)
}

/// The layers of one level, in drawing order: by display priority, then areas, lines and
/// points.
pub fn level_mapfile(
    catalog: &ChartSymbols,
    level: u8,
    max_scale_denom: u64,
    shapefiles: &[ShapeFile],
) -> String {
    let name = format!("CL{level}");
    let mut layers: Vec<Layer> = shapefiles
        .iter()
        .map(|shapefile| {
            catalog.layer(
                shapefile.geometry,
                &name,
                &shapefile.feature,
                &name,
                max_scale_denom,
                shapefile.fields.as_deref(),
            )
        })
        .filter(|layer| {
            if layer.is_empty() {
                log::debug!("{}: no rules apply, layer omitted", layer.name());
            }
            !layer.is_empty()
        })
        .collect();
    layers.sort_by_key(|layer| (layer.display_priority(), layer.geometry()));

    let mut writer = MapfileWriter::new();
    for layer in &layers {
        layer.write_mapfile(&mut writer);
        writer.blank();
    }
    writer.into_string()
}

/// The `MAP` stanza of `theme`, including the level files of `levels`.
pub fn main_mapfile(
    catalog: &ChartSymbols,
    config: &Config,
    theme: &Theme,
    levels: &[u8],
) -> String {
    let mut writer = MapfileWriter::new();
    writer.block("MAP", |w| {
        w.quoted("NAME", format_args!("SeaChart_{}", theme.name));
        w.entry("EXTENT", "-180 -85 180 85");
        w.entry("UNITS", "DD");
        w.entry("SIZE", "1024 1024");
        w.entry("IMAGETYPE", "png");
        w.entry("IMAGECOLOR", catalog.color_or_default("NODTA").rgb());
        w.quoted("SHAPEPATH", config.paths.data.display());
        w.quoted("SYMBOLSET", format_args!("symbols/symbols-{}.sym", theme.name));
        w.quoted("FONTSET", "fonts/fontset.lst");
        if config.debug {
            w.entry("DEBUG", 5);
            w.line("CONFIG \"MS_ERRORFILE\" \"stderr\"");
        }
        w.block("PROJECTION", |w| w.line("\"init=epsg:4326\""));
        w.block("WEB", |w| {
            w.block("METADATA", |w| {
                w.line(format_args!("\"wms_title\" \"SeaChart {}\"", theme.name));
                w.line("\"wms_srs\" \"EPSG:4326 EPSG:3857 EPSG:900913\"");
                w.line("\"wms_enable_request\" \"*\"");
                w.line("\"wms_feature_info_mime_type\" \"text/html\"");
            });
        });
        for level in levels {
            w.quoted("INCLUDE", format_args!("includes/{}/CL{level}.map", theme.name));
        }
    });
    writer.into_string()
}

/// Write the level includes and main mapfile of every theme below the map directory.
pub fn generate_basechart_config(
    config: &Config,
    catalog: &mut ChartSymbols,
    force: bool,
) -> Result<(), GenerateError> {
    let mut levels = Vec::new();
    for (level, max_scale_denom) in LEVELS {
        let shapefiles = scan_level(&config.paths.data, level)?;
        if !shapefiles.is_empty() {
            log::info!("level {level}: {} shapefiles", shapefiles.len());
            levels.push((level, max_scale_denom, shapefiles));
        }
    }
    if levels.is_empty() {
        log::warn!("no chart levels found in {}", config.paths.data.display());
    }
    let level_numbers: Vec<u8> = levels.iter().map(|(level, ..)| *level).collect();

    let map = &config.paths.map;
    for theme in &THEMES {
        catalog.load_colors(theme.color_table);
        for (level, max_scale_denom, shapefiles) in &levels {
            let text = level_mapfile(catalog, *level, *max_scale_denom, shapefiles);
            let path = map.join(format!("includes/{}/CL{level}.map", theme.name));
            write_file(&path, &text, force)?;
        }
        let text = main_mapfile(catalog, config, theme, &level_numbers);
        write_file(&map.join(format!("SeaChart_{}.map", theme.name)), &text, force)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use mapgen_chartsymbols::CatalogOptions;

    use super::*;
    use crate::dbf::tests::dbf_header;

    const CATALOG: &str = include_str!("../../resources/chartsymbols/chartsymbols_S57.xml");

    fn catalog() -> ChartSymbols {
        ChartSymbols::parse(CATALOG, &CatalogOptions::default()).unwrap()
    }

    fn shapefile(dir: &Path, name: &str, fields: Option<&[&str]>) {
        std::fs::create_dir_all(dir).unwrap();
        std::fs::write(dir.join(format!("{name}.shp")), b"").unwrap();
        if let Some(fields) = fields {
            std::fs::write(dir.join(format!("{name}.dbf")), dbf_header(fields)).unwrap();
        }
    }

    fn chart_tree() -> tempfile::TempDir {
        let root = tempfile::tempdir().unwrap();
        let data = root.path().join("data");
        shapefile(&data.join("CL4"), "CL4-Point-BOYCAR", Some(&["OBJNAM"]));
        shapefile(&data.join("CL4"), "CL4-Point-NOSUCH", Some(&[]));
        shapefile(&data.join("CL5"), "CL5-Line-COALNE", None);
        shapefile(&data.join("CL5"), "CL5-Area-DEPARE", Some(&["DRVAL1", "DRVAL2"]));
        shapefile(&data.join("CL5"), "CL4-Area-LNDARE", None);
        std::fs::write(data.join("CL5/README.txt"), "").unwrap();
        root
    }

    fn config(root: &Path) -> Config {
        Config::parse("[paths]\ndata = \"data\"\n", root, Path::new("resources")).unwrap()
    }

    #[test]
    fn scans_shapefiles_of_a_level() {
        let root = chart_tree();
        let data = root.path().join("data");

        let level5 = scan_level(&data, 5).unwrap();
        assert_eq!(
            level5,
            vec![
                ShapeFile {
                    level: 5,
                    geometry: Geometry::Area,
                    feature: "DEPARE".into(),
                    fields: Some(vec!["DRVAL1".into(), "DRVAL2".into()]),
                },
                ShapeFile {
                    level: 5,
                    geometry: Geometry::Line,
                    feature: "COALNE".into(),
                    fields: None,
                },
            ]
        );
        assert!(scan_level(&data, 1).unwrap().is_empty());
    }

    #[test]
    fn level_layers_are_in_drawing_order() {
        let root = chart_tree();
        let shapefiles = scan_level(&root.path().join("data"), 5).unwrap();
        let text = level_mapfile(&catalog(), 5, 45000, &shapefiles);

        let depare = text.find("NAME \"CL5-Area-DEPARE\"").unwrap();
        let coalne = text.find("NAME \"CL5-Line-COALNE\"").unwrap();
        assert!(depare < coalne);
        assert!(text.contains("MAXSCALEDENOM 45000"));
    }

    #[test]
    fn empty_layers_are_omitted() {
        let root = chart_tree();
        let shapefiles = scan_level(&root.path().join("data"), 4).unwrap();
        assert_eq!(shapefiles.len(), 2);
        let text = level_mapfile(&catalog(), 4, 180000, &shapefiles);
        assert!(text.contains("CL4-Point-BOYCAR"));
        assert!(!text.contains("NOSUCH"));
    }

    #[test]
    fn main_mapfile_includes_levels() {
        let root = tempfile::tempdir().unwrap();
        let config = config(root.path());
        let text = main_mapfile(&catalog(), &config, &THEMES[0], &[4, 5]);
        assert!(text.starts_with("MAP\n    NAME \"SeaChart_day\"\n"));
        assert!(text.contains("SYMBOLSET \"symbols/symbols-day.sym\""));
        assert!(text.contains("IMAGECOLOR 163 180 183"));
        assert!(text.ends_with(
            "    INCLUDE \"includes/day/CL4.map\"\n    INCLUDE \"includes/day/CL5.map\"\nEND\n"
        ));
        assert!(!text.contains("DEBUG"));
    }

    #[test]
    fn generates_every_theme() {
        let root = chart_tree();
        let config = config(root.path());
        let mut catalog = catalog();
        generate_basechart_config(&config, &mut catalog, false).unwrap();

        let map = root.path().join("map");
        for theme in ["day", "dusk", "night"] {
            assert!(map.join(format!("SeaChart_{theme}.map")).is_file());
            assert!(map.join(format!("includes/{theme}/CL4.map")).is_file());
            assert!(map.join(format!("includes/{theme}/CL5.map")).is_file());
            assert!(!map.join(format!("includes/{theme}/CL1.map")).exists());
        }
        let night = std::fs::read_to_string(map.join("includes/night/CL4.map")).unwrap();
        assert!(night.contains("COLOR \"#1D1D1D\""));

        let day = map.join("SeaChart_day.map");
        std::fs::write(&day, "edited").unwrap();
        generate_basechart_config(&config, &mut catalog, false).unwrap();
        assert_eq!(std::fs::read_to_string(&day).unwrap(), "edited");
        generate_basechart_config(&config, &mut catalog, true).unwrap();
        assert_ne!(std::fs::read_to_string(&day).unwrap(), "edited");
    }
}
