//! Conditional symbology procedures.
//!
//! An S-52 `CS(...)` instruction selects the symbolisation of a feature procedurally. MapServer
//! has no procedures, so each one is expanded ahead of time into a list of plain lookups whose
//! rules select between the possible outcomes. The expanded lookups are combined with the
//! lookup that referenced the procedure.

mod areas;
mod depth;
mod hazards;
mod lines;
mod navaids;

use crate::{
    filter::{Comparison, Filter},
    instruction::parse_instructions,
    lookup::{Geometry, Lookup},
};

/// Depths (metres) a mariner would normally set on an ECDIS.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MarinerSettings {
    pub shallow_contour: f64,
    pub safety_contour: f64,
    pub deep_contour: f64,
    pub safety_depth: f64,
}

impl Default for MarinerSettings {
    fn default() -> Self {
        Self {
            shallow_contour: 2.0,
            safety_contour: 10.0,
            deep_contour: 30.0,
            safety_depth: 10.0,
        }
    }
}

/// Whether topmarks sit on floating (buoy) or rigid (beacon) structures.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TopmarkType {
    #[default]
    Rigid,
    Floating,
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CsSettings {
    pub mariner: MarinerSettings,
    pub topmark: TopmarkType,
}

/// A lookup with `rules` and the parsed `instructions`.
fn rule(rules: Filter, instructions: &str) -> Lookup {
    Lookup {
        rules,
        instructions: parse_instructions(instructions),
        ..Lookup::default()
    }
}

/// The lookup used when no other rule of a procedure applies.
fn otherwise(instructions: &str) -> Lookup {
    rule(Filter::all(), instructions)
}

/// Comma separated quality of position values meaning "approximate" or worse.
const APPROXIMATE_QUAPOS: [u32; 8] = [2, 3, 4, 5, 6, 7, 8, 9];

fn approximate_position() -> Filter {
    Filter::list_contains("QUAPOS", &APPROXIMATE_QUAPOS)
}

/// `attribute` is set and below `value`.
fn set_and_below(attribute: &str, value: f64) -> Filter {
    Filter::and([
        Filter::HasValue(attribute.to_owned()),
        Filter::compare(attribute, Comparison::Lt, value),
    ])
}

/// `attribute` is set and at or above `value`.
fn set_and_at_least(attribute: &str, value: f64) -> Filter {
    Filter::and([
        Filter::HasValue(attribute.to_owned()),
        Filter::compare(attribute, Comparison::Ge, value),
    ])
}

fn placeholder(procedure: &str, geometry: Geometry, name: &str) -> Vec<Lookup> {
    log::debug!("no expansion for CS({procedure}) of {name}, using placeholder");
    match geometry {
        Geometry::Point => vec![otherwise("SY(QUESMRK1)")],
        Geometry::Line => vec![otherwise("LS(DASH,1,CHMGD)")],
        Geometry::Area => Vec::new(),
    }
}

/// Expand the conditional symbology `procedure` (without its version suffix) for the
/// feature `name` of the given geometry.
pub fn lookups_from_cs(
    procedure: &str,
    geometry: Geometry,
    name: &str,
    settings: &CsSettings,
) -> Vec<Lookup> {
    let mariner = &settings.mariner;
    match procedure {
        "DEPARE" => depth::depare(geometry, name, mariner),
        "DEPCNT" => depth::depcnt(mariner),
        "SOUNDG" => depth::soundg(mariner),
        "LIGHTS" => navaids::lights(),
        "TOPMAR" => navaids::topmar(settings.topmark),
        "WRECKS" => hazards::wrecks(geometry, mariner),
        "OBSTRN" => hazards::obstrn(geometry, name, mariner),
        "RESARE" => areas::resare(),
        "RESTRN" => areas::restrn(),
        "SLCONS" => lines::slcons(geometry),
        "QUAPOS" | "QUALIN" | "QUAPNT" => lines::quapos(geometry),
        _ => placeholder(procedure, geometry, name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::{Instruction, LineStyle};

    #[test]
    fn unknown_procedures_get_placeholders() {
        let settings = CsSettings::default();
        let point = lookups_from_cs("DATCVR", Geometry::Point, "M_COVR", &settings);
        assert_eq!(point.len(), 1);
        assert_eq!(
            point[0].instructions,
            vec![Instruction::Symbol {
                name: "QUESMRK1".into(),
                rotation: None
            }]
        );
        assert!(lookups_from_cs("DATCVR", Geometry::Area, "M_COVR", &settings).is_empty());
    }

    #[test]
    fn unknown_line_procedures_get_a_dashed_line() {
        let line = lookups_from_cs("DATCVR", Geometry::Line, "M_COVR", &CsSettings::default());
        assert_eq!(line.len(), 1);
        assert!(line[0].rules.is_empty());
        assert_eq!(
            line[0].instructions,
            vec![Instruction::SimpleLine {
                style: LineStyle::Dashed,
                width: 1,
                color: "CHMGD".into(),
            }]
        );
    }

    #[test]
    fn every_known_procedure_ends_with_a_default() {
        let settings = CsSettings::default();
        for (procedure, geometry) in [
            ("DEPARE", Geometry::Area),
            ("DEPCNT", Geometry::Line),
            ("SOUNDG", Geometry::Point),
            ("LIGHTS", Geometry::Point),
            ("TOPMAR", Geometry::Point),
            ("WRECKS", Geometry::Point),
            ("OBSTRN", Geometry::Area),
            ("RESARE", Geometry::Area),
            ("RESTRN", Geometry::Area),
            ("SLCONS", Geometry::Line),
            ("QUAPOS", Geometry::Line),
        ] {
            let lookups = lookups_from_cs(procedure, geometry, procedure, &settings);
            let last = lookups.last().unwrap();
            assert!(last.rules.is_empty(), "{procedure} has no default rule");
        }
    }
}
