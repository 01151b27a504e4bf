//! Attribute filters, rendered as MapServer logical expressions.

use std::{collections::BTreeSet, fmt};

/// Length of an S-57 attribute acronym (`CATLAM`, `DRVAL1`...).
pub const ACRONYM_LEN: usize = 6;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Comparison {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl Comparison {
    fn as_str(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Eq => "=",
            Self::Ne => "!=",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    /// The attribute is set.
    HasValue(String),
    /// The attribute is unset (`?` in S-52 attribute codes).
    IsEmpty(String),
    /// String equality.
    Equals { attribute: String, value: String },
    /// Numeric comparison.
    Compare {
        attribute: String,
        op: Comparison,
        value: f64,
    },
    /// Regular expression match.
    Matches { attribute: String, pattern: String },
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    /// The filter that accepts everything.
    pub fn all() -> Self {
        Self::And(Vec::new())
    }

    /// Parse a lookup `attrib-code`, e.g. `CATLAM1`, `COLOUR1,3`, `ORIENT` or `TOPSHP?`.
    pub fn from_attrcode(code: &str) -> Self {
        let code = code.trim();
        let split = code
            .char_indices()
            .nth(ACRONYM_LEN)
            .map_or(code.len(), |(i, _)| i);
        let (attribute, value) = code.split_at(split);
        let attribute = attribute.to_owned();
        match value.trim() {
            "" => Self::HasValue(attribute),
            "?" => Self::IsEmpty(attribute),
            value => Self::Equals {
                attribute,
                value: value.to_owned(),
            },
        }
    }

    pub fn equals(attribute: &str, value: impl Into<String>) -> Self {
        Self::Equals {
            attribute: attribute.to_owned(),
            value: value.into(),
        }
    }

    pub fn compare(attribute: &str, op: Comparison, value: f64) -> Self {
        Self::Compare {
            attribute: attribute.to_owned(),
            op,
            value,
        }
    }

    pub fn matches(attribute: &str, pattern: impl Into<String>) -> Self {
        Self::Matches {
            attribute: attribute.to_owned(),
            pattern: pattern.into(),
        }
    }

    /// Matches when the comma separated list attribute contains any of `values`.
    pub fn list_contains(attribute: &str, values: &[u32]) -> Self {
        let alternatives: Vec<String> = values.iter().map(u32::to_string).collect();
        Self::matches(
            attribute,
            format!("(^|,)({})(,|$)", alternatives.join("|")),
        )
    }

    /// Conjunction that flattens nested conjunctions and drops empty ones.
    pub fn and(filters: impl IntoIterator<Item = Filter>) -> Self {
        let mut flat = Vec::new();
        for filter in filters {
            match filter {
                Self::And(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        Self::And(flat)
    }

    pub fn or(filters: impl IntoIterator<Item = Filter>) -> Self {
        Self::Or(filters.into_iter().collect())
    }

    pub fn negate(filter: Filter) -> Self {
        Self::Not(Box::new(filter))
    }

    /// `true` when this filter accepts everything.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::And(filters) => filters.iter().all(Self::is_empty),
            _ => false,
        }
    }

    /// Number of atomic conditions; lookups with more conditions are more specific.
    pub fn condition_count(&self) -> usize {
        match self {
            Self::And(filters) | Self::Or(filters) => {
                filters.iter().map(Self::condition_count).sum()
            }
            Self::Not(filter) => filter.condition_count(),
            _ => 1,
        }
    }

    /// Attribute acronyms referenced by this filter.
    pub fn attributes(&self) -> BTreeSet<&str> {
        let mut attributes = BTreeSet::new();
        self.collect_attributes(&mut attributes);
        attributes
    }

    fn collect_attributes<'a>(&'a self, attributes: &mut BTreeSet<&'a str>) {
        match self {
            Self::HasValue(attribute)
            | Self::IsEmpty(attribute)
            | Self::Equals { attribute, .. }
            | Self::Compare { attribute, .. }
            | Self::Matches { attribute, .. } => {
                attributes.insert(attribute.as_str());
            }
            Self::And(filters) | Self::Or(filters) => {
                for filter in filters {
                    filter.collect_attributes(attributes);
                }
            }
            Self::Not(filter) => filter.collect_attributes(attributes),
        }
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::all()
    }
}

fn escape(value: &str) -> String {
    value.replace('"', "\\\"")
}

fn write_joined(f: &mut fmt::Formatter<'_>, filters: &[Filter], operator: &str) -> fmt::Result {
    let filters: Vec<&Filter> = filters.iter().filter(|f| !f.is_empty()).collect();
    match filters[..] {
        [] => Ok(()),
        [single] => write!(f, "{single}"),
        _ => {
            f.write_str("(")?;
            for (i, filter) in filters.iter().enumerate() {
                if i > 0 {
                    write!(f, " {operator} ")?;
                }
                write!(f, "{filter}")?;
            }
            f.write_str(")")
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HasValue(attribute) => write!(f, "(\"[{attribute}]\" != \"\")"),
            Self::IsEmpty(attribute) => write!(f, "(\"[{attribute}]\" = \"\")"),
            Self::Equals { attribute, value } => {
                write!(f, "(\"[{attribute}]\" = \"{}\")", escape(value))
            }
            Self::Compare {
                attribute,
                op,
                value,
            } => write!(f, "([{attribute}] {} {value})", op.as_str()),
            Self::Matches { attribute, pattern } => {
                write!(f, "(\"[{attribute}]\" ~ \"{}\")", escape(pattern))
            }
            Self::And(filters) => write_joined(f, filters, "AND"),
            Self::Or(filters) => write_joined(f, filters, "OR"),
            Self::Not(filter) => write!(f, "(NOT {filter})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_attribute_codes() {
        assert_eq!(
            Filter::from_attrcode("CATLAM1"),
            Filter::equals("CATLAM", "1")
        );
        assert_eq!(
            Filter::from_attrcode("COLOUR1,3"),
            Filter::equals("COLOUR", "1,3")
        );
        assert_eq!(
            Filter::from_attrcode("ORIENT"),
            Filter::HasValue("ORIENT".into())
        );
        assert_eq!(
            Filter::from_attrcode("TOPSHP?"),
            Filter::IsEmpty("TOPSHP".into())
        );
        assert_eq!(Filter::from_attrcode("OBJ"), Filter::HasValue("OBJ".into()));
    }

    #[test]
    fn renders_mapserver_expressions() {
        assert_eq!(
            Filter::from_attrcode("CATLAM1").to_string(),
            r#"("[CATLAM]" = "1")"#
        );
        assert_eq!(
            Filter::compare("DRVAL1", Comparison::Ge, 2.5).to_string(),
            "([DRVAL1] >= 2.5)"
        );
        assert_eq!(
            Filter::negate(Filter::HasValue("ORIENT".into())).to_string(),
            r#"(NOT ("[ORIENT]" != ""))"#
        );
        assert_eq!(
            Filter::list_contains("RESTRN", &[7, 8]).to_string(),
            r#"("[RESTRN]" ~ "(^|,)(7|8)(,|$)")"#
        );
    }

    #[test]
    fn empty_conjunctions_render_nothing() {
        let filter = Filter::and([Filter::all(), Filter::all()]);
        assert!(filter.is_empty());
        assert_eq!(filter.to_string(), "");

        let single = Filter::and([Filter::all(), Filter::equals("CATWRK", "1")]);
        assert_eq!(single.to_string(), r#"("[CATWRK]" = "1")"#);
    }

    #[test]
    fn nested_conjunctions_are_flattened() {
        let filter = Filter::and([
            Filter::and([Filter::equals("A", "1"), Filter::equals("B", "2")]),
            Filter::or([Filter::equals("C", "3"), Filter::equals("D", "4")]),
        ]);
        assert_eq!(
            filter.to_string(),
            r#"(("[A]" = "1") AND ("[B]" = "2") AND (("[C]" = "3") OR ("[D]" = "4")))"#
        );
        assert_eq!(filter.condition_count(), 4);
        assert_eq!(
            filter.attributes().into_iter().collect::<Vec<_>>(),
            vec!["A", "B", "C", "D"]
        );
    }
}
