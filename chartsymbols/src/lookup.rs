use std::{fmt, str::FromStr};

use crate::{filter::Filter, instruction::Instruction};

/// Geometry of the features a lookup applies to (the `type` element).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Geometry {
    Area,
    Line,
    Point,
}

impl Geometry {
    /// Layer `TYPE` keyword.
    pub fn layer_type(self) -> &'static str {
        match self {
            Self::Area => "POLYGON",
            Self::Line => "LINE",
            Self::Point => "POINT",
        }
    }

    /// Name used in lookup `type` elements and shapefile names.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Area => "Area",
            Self::Line => "Line",
            Self::Point => "Point",
        }
    }
}

impl FromStr for Geometry {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Area" => Ok(Self::Area),
            "Line" => Ok(Self::Line),
            "Point" => Ok(Self::Point),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// S-52 display priority; higher priorities are drawn on top.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DisplayPriority {
    NoData = 0,
    Group1 = 1,
    Area1 = 2,
    Area2 = 3,
    PointSymbol = 4,
    LineSymbol = 5,
    AreaSymbol = 6,
    Routing = 7,
    Hazards = 8,
    Mariners = 9,
}

impl DisplayPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoData => "No data",
            Self::Group1 => "Group 1",
            Self::Area1 => "Area 1",
            Self::Area2 => "Area 2",
            Self::PointSymbol => "Point Symbol",
            Self::LineSymbol => "Line Symbol",
            Self::AreaSymbol => "Area Symbol",
            Self::Routing => "Routing",
            Self::Hazards => "Hazards",
            Self::Mariners => "Mariners",
        }
    }
}

impl FromStr for DisplayPriority {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "No data" => Ok(Self::NoData),
            "Group 1" => Ok(Self::Group1),
            "Area 1" => Ok(Self::Area1),
            "Area 2" => Ok(Self::Area2),
            "Point Symbol" => Ok(Self::PointSymbol),
            "Line Symbol" => Ok(Self::LineSymbol),
            "Area Symbol" => Ok(Self::AreaSymbol),
            "Routing" => Ok(Self::Routing),
            "Hazards" => Ok(Self::Hazards),
            "Mariners" | "Mariners' Standard" | "Mariners' Other" => Ok(Self::Mariners),
            _ => Err(()),
        }
    }
}

/// One compiled rendering rule for a feature type.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Lookup {
    pub id: String,
    pub table: String,
    pub display: String,
    pub comment: String,
    pub instructions: Vec<Instruction>,
    pub rules: Filter,
    pub display_priority: Option<DisplayPriority>,
}

fn prefer(left: &str, right: &str) -> String {
    let preferred = if right.is_empty() { left } else { right };
    preferred.to_owned()
}

impl Lookup {
    pub fn with_rules(rules: Filter) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    pub fn with_instructions(instructions: Vec<Instruction>) -> Self {
        Self {
            instructions,
            ..Self::default()
        }
    }

    pub fn add_instruction(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    /// Combine with a more specific lookup: text fields and priority of `other` win when set,
    /// rules are AND-ed and instructions appended.
    pub fn combine(&self, other: &Lookup) -> Lookup {
        Lookup {
            id: prefer(&self.id, &other.id),
            table: prefer(&self.table, &other.table),
            display: prefer(&self.display, &other.display),
            comment: prefer(&self.comment, &other.comment),
            instructions: self
                .instructions
                .iter()
                .chain(&other.instructions)
                .cloned()
                .collect(),
            rules: Filter::and([self.rules.clone(), other.rules.clone()]),
            display_priority: other.display_priority.or(self.display_priority),
        }
    }

    pub fn display_priority(&self) -> DisplayPriority {
        self.display_priority.unwrap_or(DisplayPriority::NoData)
    }
}

/// The lookups a single catalog entry expands to.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LookupCollection(Vec<Lookup>);

impl LookupCollection {
    pub fn new(lookup: Lookup) -> Self {
        Self(vec![lookup])
    }

    /// Cartesian combination of every member with every lookup of `others`. Combining with an
    /// empty list leaves the collection unchanged.
    pub fn product(self, others: &[Lookup]) -> Self {
        if others.is_empty() {
            return self;
        }
        Self(
            self.0
                .iter()
                .flat_map(|lookup| others.iter().map(move |other| lookup.combine(other)))
                .collect(),
        )
    }

    pub fn add_instruction(&mut self, instruction: Instruction) {
        for lookup in &mut self.0 {
            lookup.add_instruction(instruction.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Lookup> {
        self.0.iter()
    }
}

impl IntoIterator for LookupCollection {
    type Item = Lookup;
    type IntoIter = std::vec::IntoIter<Lookup>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
