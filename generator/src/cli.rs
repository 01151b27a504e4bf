use std::{fmt, path::PathBuf};

use clap::{Parser, ValueEnum};

/// Kind of geographical data the configuration describes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    #[default]
    Chart,
    #[value(name = "basechart")]
    BaseChart,
    #[value(name = "geotif")]
    GeoTif,
    Elevation,
    Aml,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_possible_value() {
            Some(value) => f.write_str(value.get_name()),
            None => write!(f, "{self:?}"),
        }
    }
}

/// Generate a MapServer configuration for different kinds of geographical data.
///
/// The resulting configuration is put in the folder `map` next to the geographical data,
/// unless the configuration file says otherwise.
///
/// The bundled `resources/chartsymbols/chartsymbols_S57.xml` only covers a handful of
/// features. Point `paths.chartsymbols` at a complete S-52 chartsymbols catalog to render a
/// whole chart.
#[derive(Parser, Debug)]
#[command(name = "mapgen", version, about)]
pub struct Cli {
    /// Chart configuration in TOML format
    pub config_file: PathBuf,

    /// Format of the data
    #[arg(value_enum, default_value_t = Format::Chart)]
    pub format: Format,

    /// Force overwrite the rule set and existing mapfiles
    #[arg(short, long, visible_alias = "force-overwrite")]
    pub force: bool,

    /// Directory holding the default rule set and a minimal chartsymbols catalog
    #[arg(long, env = "MAPGEN_RESOURCES", default_value = "resources")]
    pub resources: PathBuf,

    /// Quiet operation, suppress warnings
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            1 + self.verbose.min(3)
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn defaults_to_chart_format() {
        let cli = Cli::try_parse_from(["mapgen", "chart.toml"]).unwrap();
        assert_eq!(cli.format, Format::Chart);
        assert!(!cli.force);
        assert_eq!(cli.verbosity(), 1);
    }

    #[test]
    fn accepts_all_force_spellings() {
        for flag in ["-f", "--force", "--force-overwrite"] {
            let cli = Cli::try_parse_from(["mapgen", "chart.toml", "basechart", flag]).unwrap();
            assert!(cli.force, "{flag}");
            assert_eq!(cli.format, Format::BaseChart);
        }
    }

    #[test]
    fn rejects_unknown_formats() {
        assert!(Cli::try_parse_from(["mapgen", "chart.toml", "png"]).is_err());
    }

    #[test]
    fn formats_display_as_their_argument() {
        assert_eq!(Format::GeoTif.to_string(), "geotif");
        assert_eq!(Format::Aml.to_string(), "aml");
    }

    #[test]
    fn verbosity_levels() {
        let cli = Cli::try_parse_from(["mapgen", "chart.toml", "-vv"]).unwrap();
        assert_eq!(cli.verbosity(), 3);
        let cli = Cli::try_parse_from(["mapgen", "chart.toml", "-q"]).unwrap();
        assert_eq!(cli.verbosity(), 0);
    }

    #[test]
    fn help_asks_for_a_complete_catalog() {
        let help = Cli::command().render_long_help().to_string();
        let help = help.split_whitespace().collect::<Vec<_>>().join(" ");
        assert!(help.contains("a complete S-52 chartsymbols catalog"));
    }
}
