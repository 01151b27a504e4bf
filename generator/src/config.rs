//! The chart configuration file.

use std::path::{Component, Path, PathBuf};

use mapgen_chartsymbols::{CatalogOptions, CsSettings, MarinerSettings, TopmarkType};
use serde::Deserialize;

use crate::error::ConfigError;

/// Display category that is shown whatever the configuration says.
pub const DISPLAY_BASE: &str = "Displaybase";

#[derive(Debug, Default, Deserialize)]
struct RawPaths {
    data: Option<PathBuf>,
    map: Option<PathBuf>,
    ruleset: Option<PathBuf>,
    chartsymbols: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawMariner {
    shallow_contour: f64,
    safety_contour: f64,
    deep_contour: f64,
    safety_depth: f64,
}

impl Default for RawMariner {
    fn default() -> Self {
        let defaults = MarinerSettings::default();
        Self {
            shallow_contour: defaults.shallow_contour,
            safety_contour: defaults.safety_contour,
            deep_contour: defaults.deep_contour,
            safety_depth: defaults.safety_depth,
        }
    }
}

/// The file as written by the user.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    debug: bool,
    point_table: Option<String>,
    tablename: Option<String>,
    area_table: Option<String>,
    displaycategory: Option<String>,
    topmark_type: Option<String>,
    excluded_lookups: Option<Vec<String>>,
    #[serde(default)]
    paths: RawPaths,
    #[serde(default)]
    mariner: RawMariner,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Paths {
    pub data: PathBuf,
    pub map: PathBuf,
    /// Always ends in a `rules` directory.
    pub ruleset: PathBuf,
    pub chartsymbols: PathBuf,
}

/// The resolved configuration with every default applied.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub debug: bool,
    pub point_table: String,
    pub area_table: String,
    pub display_categories: Vec<String>,
    pub topmark: TopmarkType,
    pub excluded_lookups: Option<Vec<String>>,
    pub mariner: MarinerSettings,
    pub paths: Paths,
}

impl Config {
    /// Read `path`; relative paths inside are resolved against its directory.
    pub fn load(path: &Path, resources: &Path) -> Result<Self, ConfigError> {
        let read_error = |source| ConfigError::Read {
            path: path.to_owned(),
            source,
        };
        let text = std::fs::read_to_string(path).map_err(read_error)?;
        let base_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let base_dir = std::fs::canonicalize(base_dir).map_err(read_error)?;
        Self::parse(&text, &base_dir, resources)
    }

    /// Resolve configuration `text` located in `base_dir`.
    pub fn parse(text: &str, base_dir: &Path, resources: &Path) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(text)?;

        let data = raw
            .paths
            .data
            .as_deref()
            .ok_or(ConfigError::MissingDataPath)?;
        let data = config_relative(base_dir, data);

        let mut point_table = raw.point_table.unwrap_or_else(|| "Simplified".to_owned());
        if let Some(tablename) = raw.tablename {
            log::warn!("`tablename` configuration option is deprecated. Use point_table instead");
            point_table = tablename;
        }

        let map = match raw.paths.map.as_deref() {
            Some(map) => config_relative(base_dir, map),
            None => normalize(&data.join("../map")),
        };
        // the resources directory is not part of the chart configuration
        let resources = normalize(resources);
        let ruleset = match raw.paths.ruleset.as_deref() {
            Some(ruleset) => config_relative(base_dir, ruleset),
            None => resources.clone(),
        };
        let chartsymbols = match raw.paths.chartsymbols.as_deref() {
            Some(chartsymbols) => config_relative(base_dir, chartsymbols),
            None => resources.join("chartsymbols/chartsymbols_S57.xml"),
        };
        if !chartsymbols.is_file() {
            log::error!("chartsymbols.xml not found at: {}", chartsymbols.display());
        }

        let mut display_categories: Vec<String> = raw
            .displaycategory
            .as_deref()
            .unwrap_or("Standard")
            .split(',')
            .map(|category| category.trim().to_owned())
            .filter(|category| !category.is_empty())
            .collect();
        display_categories.push(DISPLAY_BASE.to_owned());

        let topmark = match raw.topmark_type.as_deref() {
            Some(value) => parse_topmark_type(value)?,
            None => TopmarkType::Rigid,
        };

        Ok(Self {
            debug: raw.debug,
            point_table,
            area_table: raw.area_table.unwrap_or_else(|| "Plain".to_owned()),
            display_categories,
            topmark,
            excluded_lookups: raw.excluded_lookups,
            mariner: MarinerSettings {
                shallow_contour: raw.mariner.shallow_contour,
                safety_contour: raw.mariner.safety_contour,
                deep_contour: raw.mariner.deep_contour,
                safety_depth: raw.mariner.safety_depth,
            },
            paths: Paths {
                data,
                map,
                ruleset: crate::dirutils::force_sub_dir(&ruleset, "rules"),
                chartsymbols,
            },
        })
    }

    /// Catalog filtering for the given colour table.
    pub fn catalog_options(&self, color_table: &str) -> CatalogOptions {
        CatalogOptions {
            point_table: self.point_table.clone(),
            area_table: self.area_table.clone(),
            display_categories: Some(self.display_categories.iter().cloned().collect()),
            color_table: color_table.to_owned(),
            excluded_lookups: self.excluded_lookups.clone(),
            cs: CsSettings {
                mariner: self.mariner,
                topmark: self.topmark,
            },
        }
    }
}

fn parse_topmark_type(value: &str) -> Result<TopmarkType, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "rigid" => Ok(TopmarkType::Rigid),
        "floating" => Ok(TopmarkType::Floating),
        _ => Err(ConfigError::InvalidTopmarkType(value.to_owned())),
    }
}

/// `path` resolved against `base_dir` and normalised.
pub fn config_relative(base_dir: &Path, path: &Path) -> PathBuf {
    normalize(&base_dir.join(path))
}

/// Lexical normalisation: drops `.` and folds `..` into the preceding component.
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(component),
            },
            other => normalized.push(other),
        }
    }
    normalized
}
