/// A rendering variant of the chart and the colour table it is drawn with.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub color_table: &'static str,
}

pub const THEMES: [Theme; 3] = [
    Theme {
        name: "day",
        color_table: "DAY_BRIGHT",
    },
    Theme {
        name: "dusk",
        color_table: "DUSK",
    },
    Theme {
        name: "night",
        color_table: "NIGHT",
    },
];
