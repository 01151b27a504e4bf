use super::{otherwise, rule, TopmarkType};
use crate::{filter::Filter, lookup::Lookup};

/// Light flares by colour.
pub(super) fn lights() -> Vec<Lookup> {
    vec![
        rule(Filter::list_contains("COLOUR", &[3]), "SY(LIGHTS11,135)"),
        rule(Filter::list_contains("COLOUR", &[4]), "SY(LIGHTS12,135)"),
        rule(
            Filter::list_contains("COLOUR", &[1, 6, 11]),
            "SY(LIGHTS13,135)",
        ),
        otherwise("SY(LITDEF11,135)"),
    ]
}

const FLOATING_TOPMARKS: [(u32, &str); 33] = [
    (1, "TOPMAR02"),
    (2, "TOPMAR04"),
    (3, "TOPMAR10"),
    (4, "TOPMAR12"),
    (5, "TOPMAR13"),
    (6, "TOPMAR14"),
    (7, "TOPMAR65"),
    (8, "TOPMAR17"),
    (9, "TOPMAR16"),
    (10, "TOPMAR08"),
    (11, "TOPMAR07"),
    (12, "TOPMAR14"),
    (13, "TOPMAR05"),
    (14, "TOPMAR06"),
    (15, "TMARDEF2"),
    (16, "TMARDEF2"),
    (17, "TMARDEF2"),
    (18, "TOPMAR10"),
    (19, "TOPMAR13"),
    (20, "TOPMAR14"),
    (21, "TOPMAR13"),
    (22, "TOPMAR14"),
    (23, "TOPMAR14"),
    (24, "TOPMAR02"),
    (25, "TOPMAR04"),
    (26, "TOPMAR10"),
    (27, "TOPMAR17"),
    (28, "TOPMAR18"),
    (29, "TOPMAR02"),
    (30, "TOPMAR17"),
    (31, "TOPMAR14"),
    (32, "TOPMAR10"),
    (33, "TMARDEF2"),
];

const RIGID_TOPMARKS: [(u32, &str); 33] = [
    (1, "TOPMAR22"),
    (2, "TOPMAR24"),
    (3, "TOPMAR30"),
    (4, "TOPMAR32"),
    (5, "TOPMAR33"),
    (6, "TOPMAR34"),
    (7, "TOPMAR85"),
    (8, "TOPMAR86"),
    (9, "TOPMAR36"),
    (10, "TOPMAR28"),
    (11, "TOPMAR27"),
    (12, "TOPMAR14"),
    (13, "TOPMAR25"),
    (14, "TOPMAR26"),
    (15, "TOPMAR88"),
    (16, "TOPMAR87"),
    (17, "TMARDEF1"),
    (18, "TOPMAR30"),
    (19, "TOPMAR33"),
    (20, "TOPMAR34"),
    (21, "TOPMAR33"),
    (22, "TOPMAR34"),
    (23, "TOPMAR34"),
    (24, "TOPMAR22"),
    (25, "TOPMAR24"),
    (26, "TOPMAR30"),
    (27, "TOPMAR86"),
    (28, "TOPMAR89"),
    (29, "TOPMAR22"),
    (30, "TOPMAR86"),
    (31, "TOPMAR14"),
    (32, "TOPMAR30"),
    (33, "TMARDEF1"),
];

/// Topmark symbol by shape, from the floating or rigid table.
pub(super) fn topmar(topmark: TopmarkType) -> Vec<Lookup> {
    let (table, default) = match topmark {
        TopmarkType::Floating => (&FLOATING_TOPMARKS, "TMARDEF2"),
        TopmarkType::Rigid => (&RIGID_TOPMARKS, "TMARDEF1"),
    };

    let mut lookups = vec![rule(Filter::IsEmpty("TOPSHP".into()), "SY(QUESMRK1)")];
    lookups.extend(table.iter().map(|(shape, symbol)| {
        rule(
            Filter::equals("TOPSHP", shape.to_string()),
            &format!("SY({symbol})"),
        )
    }));
    lookups.push(otherwise(&format!("SY({default})")));
    lookups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::Instruction;

    fn symbol_of(lookup: &Lookup) -> &str {
        match &lookup.instructions[0] {
            Instruction::Symbol { name, .. } => name.as_str(),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn topmark_table_follows_type() {
        let rigid = topmar(TopmarkType::Rigid);
        let floating = topmar(TopmarkType::Floating);
        // TOPSHP 1 follows the "unknown shape" rule
        assert_eq!(symbol_of(&rigid[1]), "TOPMAR22");
        assert_eq!(symbol_of(&floating[1]), "TOPMAR02");
        assert_eq!(symbol_of(rigid.last().unwrap()), "TMARDEF1");
        assert_eq!(symbol_of(floating.last().unwrap()), "TMARDEF2");
    }

    #[test]
    fn red_lights_win_over_white() {
        let lookups = lights();
        assert_eq!(symbol_of(&lookups[0]), "LIGHTS11");
        assert_eq!(
            lookups[0].instructions[0],
            Instruction::Symbol {
                name: "LIGHTS11".into(),
                rotation: Some(crate::instruction::Rotation::Fixed(135.0)),
            }
        );
    }

    #[test]
    fn light_flares_follow_colour() {
        let lookups = lights();
        let flares: Vec<(String, &str)> = lookups
            .iter()
            .map(|l| (l.rules.to_string(), symbol_of(l)))
            .collect();
        assert_eq!(
            flares,
            vec![
                (r#"("[COLOUR]" ~ "(^|,)(3)(,|$)")"#.to_owned(), "LIGHTS11"),
                (r#"("[COLOUR]" ~ "(^|,)(4)(,|$)")"#.to_owned(), "LIGHTS12"),
                (
                    r#"("[COLOUR]" ~ "(^|,)(1|6|11)(,|$)")"#.to_owned(),
                    "LIGHTS13"
                ),
                (String::new(), "LITDEF11"),
            ]
        );
    }
}
