use super::{approximate_position, otherwise, rule};
use crate::{
    filter::Filter,
    lookup::{Geometry, Lookup},
};

/// Shoreline constructions.
pub(super) fn slcons(geometry: Geometry) -> Vec<Lookup> {
    if geometry == Geometry::Point {
        return quapos(geometry);
    }
    vec![
        rule(approximate_position(), "LC(LOWACC01)"),
        rule(Filter::list_contains("CONDTN", &[1, 2]), "LS(DASH,1,CSTLN)"),
        rule(
            Filter::list_contains("CATSLC", &[6, 15, 16]),
            "LS(SOLD,4,CSTLN)",
        ),
        rule(Filter::list_contains("WATLEV", &[3, 4]), "LS(DASH,2,CSTLN)"),
        otherwise("LS(SOLD,2,CSTLN)"),
    ]
}

/// Quality of position: low accuracy coastlines and points are flagged.
pub(super) fn quapos(geometry: Geometry) -> Vec<Lookup> {
    match geometry {
        Geometry::Point => vec![
            rule(approximate_position(), "SY(LOWACC01)"),
            otherwise(""),
        ],
        _ => vec![
            rule(approximate_position(), "LC(LOWACC21)"),
            otherwise("LS(SOLD,1,CSTLN)"),
        ],
    }
}
