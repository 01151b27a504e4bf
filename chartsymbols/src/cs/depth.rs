use super::{approximate_position, otherwise, rule, set_and_at_least, set_and_below, MarinerSettings};
use crate::{
    filter::{Comparison, Filter},
    lookup::{Geometry, Lookup},
};

/// Depth area shading (and the outline of depth areas drawn as lines).
pub(super) fn depare(geometry: Geometry, name: &str, mariner: &MarinerSettings) -> Vec<Lookup> {
    if geometry == Geometry::Line {
        return vec![
            rule(
                Filter::and([
                    set_and_below("DRVAL1", mariner.safety_contour),
                    set_and_at_least("DRVAL2", mariner.safety_contour),
                ]),
                "LS(SOLD,2,DEPSC)",
            ),
            otherwise("LS(SOLD,1,DEPCN)"),
        ];
    }

    let dredged = if name == "DRGARE" {
        ";AP(DRGARE01);LS(DASH,1,CHGRF)"
    } else {
        ""
    };
    let band = |from: f64, to: f64, color: &str| {
        rule(
            Filter::and([
                set_and_at_least("DRVAL1", from),
                Filter::compare("DRVAL1", Comparison::Lt, to),
            ]),
            &format!("AC({color}){dredged}"),
        )
    };

    vec![
        // an unknown DRVAL1 counts as drying
        rule(
            Filter::or([
                Filter::IsEmpty("DRVAL1".into()),
                Filter::compare("DRVAL1", Comparison::Lt, 0.0),
            ]),
            &format!("AC(DEPIT){dredged}"),
        ),
        band(0.0, mariner.shallow_contour, "DEPVS"),
        band(mariner.shallow_contour, mariner.safety_contour, "DEPMS"),
        band(mariner.safety_contour, mariner.deep_contour, "DEPMD"),
        otherwise(&format!("AC(DEPDW){dredged}")),
    ]
}

/// Depth contours; the safety contour is emphasised.
pub(super) fn depcnt(mariner: &MarinerSettings) -> Vec<Lookup> {
    let safety = || Filter::compare("VALDCO", Comparison::Eq, mariner.safety_contour);
    vec![
        rule(
            Filter::and([safety(), approximate_position()]),
            "LS(DASH,2,DEPSC)",
        ),
        rule(safety(), "LS(SOLD,2,DEPSC)"),
        rule(approximate_position(), "LS(DASH,1,DEPCN)"),
        otherwise("LS(SOLD,1,DEPCN)"),
    ]
}

/// Soundings, drawn as depth labels; shallow ones stand out.
pub(super) fn soundg(mariner: &MarinerSettings) -> Vec<Lookup> {
    vec![
        rule(
            set_and_below("DEPTH", mariner.safety_depth),
            "TE('%s','DEPTH',1,2,2,'16108',0,0,SNDG2,33)",
        ),
        otherwise("TE('%s','DEPTH',1,2,2,'15108',0,0,SNDG1,33)"),
    ]
}
