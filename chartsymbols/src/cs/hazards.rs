use super::{otherwise, rule, set_and_at_least, set_and_below, MarinerSettings};
use crate::{
    filter::Filter,
    lookup::{Geometry, Lookup},
};

const SOUNDING_LABEL: &str = "TE('%s','VALSOU',1,2,2,'16108',0,0,SNDG2,33)";

/// Area and line variants shared by wrecks and obstructions.
fn hazard_outline(geometry: Geometry, mariner: &MarinerSettings) -> Vec<Lookup> {
    match geometry {
        Geometry::Line => vec![
            rule(
                set_and_below("VALSOU", mariner.safety_depth),
                "LS(DOTT,2,CHBLK)",
            ),
            otherwise("LS(DASH,2,CHBLK)"),
        ],
        _ => vec![
            rule(
                set_and_below("VALSOU", mariner.safety_depth),
                "AC(DEPVS);LS(DOTT,2,CHBLK)",
            ),
            rule(
                Filter::list_contains("WATLEV", &[1, 2]),
                "AC(CHBRN);LS(SOLD,2,CSTLN)",
            ),
            otherwise("LS(DOTT,2,CHBLK)"),
        ],
    }
}

/// Isolated dangers shallower than the safety depth replace the category symbol.
fn dangers(mariner: &MarinerSettings) -> [Lookup; 2] {
    [
        rule(
            set_and_below("VALSOU", mariner.safety_depth),
            &format!("SY(DANGER01);{SOUNDING_LABEL}"),
        ),
        rule(
            set_and_at_least("VALSOU", mariner.safety_depth),
            "SY(DANGER02)",
        ),
    ]
}

pub(super) fn wrecks(geometry: Geometry, mariner: &MarinerSettings) -> Vec<Lookup> {
    if geometry != Geometry::Point {
        return hazard_outline(geometry, mariner);
    }
    let mut lookups = dangers(mariner).to_vec();
    lookups.push(rule(Filter::equals("CATWRK", "1"), "SY(WRECKS04)"));
    lookups.push(rule(
        Filter::list_contains("WATLEV", &[1, 2]),
        "SY(WRECKS01)",
    ));
    lookups.push(otherwise("SY(WRECKS05)"));
    lookups
}

/// Obstructions and underwater rocks.
pub(super) fn obstrn(geometry: Geometry, name: &str, mariner: &MarinerSettings) -> Vec<Lookup> {
    if geometry != Geometry::Point {
        return hazard_outline(geometry, mariner);
    }
    let mut lookups = dangers(mariner).to_vec();
    if name == "UWTROC" {
        lookups.push(rule(Filter::equals("WATLEV", "4"), "SY(UWTROC04)"));
        lookups.push(otherwise("SY(UWTROC03)"));
    } else {
        lookups.push(rule(Filter::equals("CATOBS", "6"), "SY(FOULAR01)"));
        lookups.push(otherwise("SY(OBSTRN01)"));
    }
    lookups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::parse_instructions;

    #[test]
    fn dangerous_wrecks_are_labelled() {
        let lookups = wrecks(Geometry::Point, &MarinerSettings::default());
        assert_eq!(lookups[0].instructions.len(), 2);
        assert!(lookups[0].instructions[1].is_label());
        assert_eq!(
            lookups[0].rules.to_string(),
            r#"(("[VALSOU]" != "") AND ([VALSOU] < 10))"#
        );
    }

    #[test]
    fn rocks_use_their_own_symbols() {
        let rocks = obstrn(Geometry::Point, "UWTROC", &MarinerSettings::default());
        let obstructions = obstrn(Geometry::Point, "OBSTRN", &MarinerSettings::default());
        assert_ne!(rocks.last(), obstructions.last());
    }

    #[test]
    fn areas_get_outlines() {
        let lookups = wrecks(Geometry::Area, &MarinerSettings::default());
        assert_eq!(lookups.len(), 3);
        assert_eq!(lookups[0].instructions.len(), 2);
    }

    #[test]
    fn line_hazards_are_dotted_when_dangerous() {
        let mariner = MarinerSettings::default();
        for lookups in [
            wrecks(Geometry::Line, &mariner),
            obstrn(Geometry::Line, "OBSTRN", &mariner),
        ] {
            assert_eq!(lookups.len(), 2);
            assert_eq!(
                lookups[0].rules.to_string(),
                r#"(("[VALSOU]" != "") AND ([VALSOU] < 10))"#
            );
            assert_eq!(lookups[0].instructions, parse_instructions("LS(DOTT,2,CHBLK)"));
            assert!(lookups[1].rules.is_empty());
            assert_eq!(lookups[1].instructions, parse_instructions("LS(DASH,2,CHBLK)"));
        }
    }

    #[test]
    fn drying_obstruction_areas_are_land_coloured() {
        let lookups = obstrn(Geometry::Area, "OBSTRN", &MarinerSettings::default());
        assert_eq!(
            lookups[1].rules.to_string(),
            r#"("[WATLEV]" ~ "(^|,)(1|2)(,|$)")"#
        );
        assert_eq!(
            lookups[1].instructions,
            parse_instructions("AC(CHBRN);LS(SOLD,2,CSTLN)")
        );
    }
}
