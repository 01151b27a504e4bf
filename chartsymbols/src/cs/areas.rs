use super::{otherwise, rule};
use crate::{filter::Filter, lookup::Lookup};

const ENTRY_PROHIBITED: [u32; 3] = [7, 8, 14];
const ANCHORING: [u32; 2] = [1, 2];
const FISHING: [u32; 4] = [3, 4, 5, 6];
const OTHER_RESTRICTIONS: [u32; 5] = [9, 10, 11, 12, 13];

/// Restricted areas: centred symbol and boundary by restriction.
pub(super) fn resare() -> Vec<Lookup> {
    vec![
        rule(
            Filter::list_contains("RESTRN", &ENTRY_PROHIBITED),
            "SY(ENTRES51);LC(ENTRES51)",
        ),
        rule(
            Filter::list_contains("RESTRN", &ANCHORING),
            "SY(ACHRES51);LC(ACHRES51)",
        ),
        rule(
            Filter::list_contains("RESTRN", &FISHING),
            "SY(FSHRES51);LC(FSHRES51)",
        ),
        rule(
            Filter::list_contains("RESTRN", &OTHER_RESTRICTIONS),
            "SY(INFARE51);LC(CTYARE51)",
        ),
        otherwise("SY(RSRDEF51);LC(CTYARE51)"),
    ]
}

/// Restriction symbol added to other areas (anchorages, cables...); nothing when unrestricted.
pub(super) fn restrn() -> Vec<Lookup> {
    vec![
        rule(
            Filter::list_contains("RESTRN", &ENTRY_PROHIBITED),
            "SY(ENTRES61)",
        ),
        rule(Filter::list_contains("RESTRN", &ANCHORING), "SY(ACHRES61)"),
        rule(Filter::list_contains("RESTRN", &FISHING), "SY(FSHRES61)"),
        rule(Filter::HasValue("RESTRN".into()), "SY(INFARE51)"),
        otherwise(""),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrestricted_areas_keep_their_symbols() {
        let lookups = restrn();
        assert!(lookups.last().unwrap().instructions.is_empty());
    }

    #[test]
    fn restricted_areas_match_list_values() {
        let lookups = resare();
        assert_eq!(
            lookups[0].rules.to_string(),
            r#"("[RESTRN]" ~ "(^|,)(7|8|14)(,|$)")"#
        );
        assert_eq!(lookups[0].instructions.len(), 2);
    }
}
