mod basechart;
mod cli;
mod config;
mod dbf;
mod dirutils;
mod error;
mod rules;
mod symbolset;
mod theme;

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use log::LevelFilter;
use mapgen_chartsymbols::ChartSymbols;

use crate::{
    cli::{Cli, Format},
    config::Config,
    error::{ConfigError, GenerateError},
    theme::THEMES,
};

fn level_filter(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Off,
        1 => LevelFilter::Warn,
        2 => LevelFilter::Info,
        3 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// The logger passes everything; the global maximum level does the filtering so that the
/// configuration file can raise it later.
fn init_logging(verbosity: u8) {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Trace)
        .format_timestamp(None)
        .init();
    log::set_max_level(level_filter(verbosity));
}

fn run(cli: &Cli, config: &Config) -> Result<(), GenerateError> {
    let options = config.catalog_options(THEMES[0].color_table);
    let mut catalog = ChartSymbols::from_file(&config.paths.chartsymbols, &options)?;

    let rule_set = &config.paths.ruleset;
    if !dirutils::color_tables_exist(rule_set) {
        rules::create_color_rules(&catalog, &rule_set.join("color_tables"))?;
    }

    match cli.format {
        Format::Chart => {
            if !dirutils::layer_rules_exist(rule_set) || cli.force {
                rules::create_layer_rules(&catalog, &rule_set.join("layer_rules"))?;
            }
            basechart::generate_basechart_config(config, &mut catalog, cli.force)?;
        }
        format => return Err(GenerateError::Unsupported(format)),
    }

    let symbols = config.paths.map.join("symbols");
    for theme in &THEMES {
        catalog.load_colors(theme.color_table);
        symbolset::generate_symbolset(&catalog, theme, &symbols, cli.force)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbosity());

    let config = match Config::load(&cli.config_file, &cli.resources) {
        Ok(config) => config,
        Err(error) => {
            if matches!(error, ConfigError::Read { .. } | ConfigError::Parse(_)) {
                Cli::command().print_help().ok();
            }
            eprintln!("{error}");
            return ExitCode::from(error.exit_code());
        }
    };
    if config.debug && log::max_level() < LevelFilter::Debug {
        log::set_max_level(LevelFilter::Debug);
    }

    match run(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("{error}");
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level_filter(0), LevelFilter::Off);
        assert_eq!(level_filter(1), LevelFilter::Warn);
        assert_eq!(level_filter(3), LevelFilter::Debug);
        assert_eq!(level_filter(9), LevelFilter::Trace);
    }

    #[test]
    fn other_formats_are_not_ported() {
        let dir = tempfile::tempdir().unwrap();
        let resources = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../resources");
        let config = Config::parse(
            "[paths]\ndata = \"data\"\nruleset = \"rules\"\n",
            dir.path(),
            &resources,
        )
        .unwrap();
        let cli = Cli::try_parse_from(["mapgen", "chart.toml", "geotif"]).unwrap();

        let error = run(&cli, &config).unwrap_err();
        assert!(matches!(error, GenerateError::Unsupported(Format::GeoTif)));
        // the colour tables are bootstrapped before the format is looked at
        assert!(dir.path().join("rules/color_tables/DAY_BRIGHT.txt").is_file());
    }

    #[test]
    fn generates_a_chart() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data/CL3");
        std::fs::create_dir_all(&data).unwrap();
        std::fs::write(data.join("CL3-Area-LNDARE.shp"), b"").unwrap();
        let resources = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../resources");
        let config = Config::parse(
            "[paths]\ndata = \"data\"\nruleset = \"rules\"\n",
            dir.path(),
            &resources,
        )
        .unwrap();
        let cli = Cli::try_parse_from(["mapgen", "chart.toml"]).unwrap();

        run(&cli, &config).unwrap();
        let map = dir.path().join("map");
        assert!(map.join("SeaChart_dusk.map").is_file());
        assert!(map.join("includes/dusk/CL3.map").is_file());
        assert!(map.join("symbols/symbols-night.sym").is_file());
        assert!(dir.path().join("rules/layer_rules/Area.txt").is_file());
    }
}
