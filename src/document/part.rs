//! Part addresses: names for one regenerable unit inside a lesson plan.
//!
//! The address space is exactly the lesson plan's field set. Scalar and
//! list fields are disjoint enums, so field-to-kind mapping is checked at
//! compile time and dispatch never goes through a string lookup.

use serde::{Deserialize, Serialize};

/// A scalar (single string) lesson field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarField {
    /// Learning objectives.
    Objectives,
    /// Opening hook.
    Activation,
    /// Main instructional narrative.
    Instruction,
    /// Wrap-up.
    Closure,
}

/// An ordered-list lesson field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListField {
    /// Practice exercises.
    Exercises,
    /// Comprehension quiz.
    Quiz,
}

/// Any lesson field, scalar or list. Used for stage sequencing and event
/// labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LessonField {
    /// A scalar field.
    Scalar(ScalarField),
    /// A list field.
    List(ListField),
}

/// The address of exactly one regenerable unit: a whole scalar field, or
/// one element of a list field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartAddress {
    /// A scalar field as a whole.
    Scalar(ScalarField),
    /// One element of a list field.
    Item {
        /// The list field.
        field: ListField,
        /// Zero-based position within the list at dispatch time.
        index: usize,
    },
}

impl ScalarField {
    /// Stable textual key for this field.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            ScalarField::Objectives => "objectives",
            ScalarField::Activation => "activation",
            ScalarField::Instruction => "instruction",
            ScalarField::Closure => "closure",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "objectives" => Some(ScalarField::Objectives),
            "activation" => Some(ScalarField::Activation),
            "instruction" => Some(ScalarField::Instruction),
            "closure" => Some(ScalarField::Closure),
            _ => None,
        }
    }
}

impl ListField {
    /// Stable textual key for this field.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            ListField::Exercises => "exercises",
            ListField::Quiz => "quiz",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "exercises" => Some(ListField::Exercises),
            "quiz" => Some(ListField::Quiz),
            _ => None,
        }
    }
}

impl LessonField {
    /// Stable textual key for this field.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            LessonField::Scalar(f) => f.key(),
            LessonField::List(f) => f.key(),
        }
    }
}

impl PartAddress {
    /// Produces the stable, comparable key for this address.
    ///
    /// Keys are distinct for every distinct address, including across
    /// different indices of the same list field: `"activation"`,
    /// `"quiz[0]"`, `"quiz[1]"`.
    #[must_use]
    pub fn part_id(&self) -> String {
        match self {
            PartAddress::Scalar(f) => f.key().to_string(),
            PartAddress::Item { field, index } => format!("{}[{index}]", field.key()),
        }
    }

    /// Parses a part id back into an address (the inverse of [`part_id`]).
    ///
    /// Returns `None` for unknown field names, malformed index syntax, or a
    /// list field named without an index.
    ///
    /// [`part_id`]: PartAddress::part_id
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        if let Some(open) = s.find('[') {
            let close = s.strip_suffix(']')?;
            let field = ListField::parse(&s[..open])?;
            let index: usize = close[open + 1..].parse().ok()?;
            return Some(PartAddress::Item { field, index });
        }
        ScalarField::parse(s).map(PartAddress::Scalar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_ids_are_distinct() {
        let a = PartAddress::Item { field: ListField::Quiz, index: 0 };
        let b = PartAddress::Item { field: ListField::Quiz, index: 1 };
        let c = PartAddress::Scalar(ScalarField::Activation);
        let d = PartAddress::Item { field: ListField::Exercises, index: 0 };

        assert_ne!(a.part_id(), b.part_id());
        assert_ne!(a.part_id(), c.part_id());
        assert_ne!(b.part_id(), c.part_id());
        assert_ne!(a.part_id(), d.part_id());
    }

    #[test]
    fn part_id_format() {
        assert_eq!(PartAddress::Scalar(ScalarField::Objectives).part_id(), "objectives");
        assert_eq!(
            PartAddress::Item { field: ListField::Exercises, index: 2 }.part_id(),
            "exercises[2]"
        );
    }

    #[test]
    fn parse_round_trips_every_address() {
        let addresses = [
            PartAddress::Scalar(ScalarField::Objectives),
            PartAddress::Scalar(ScalarField::Activation),
            PartAddress::Scalar(ScalarField::Instruction),
            PartAddress::Scalar(ScalarField::Closure),
            PartAddress::Item { field: ListField::Exercises, index: 0 },
            PartAddress::Item { field: ListField::Quiz, index: 7 },
        ];
        for addr in addresses {
            assert_eq!(PartAddress::parse(&addr.part_id()), Some(addr));
        }
    }

    #[test]
    fn parse_rejects_unknown_and_malformed() {
        assert_eq!(PartAddress::parse("summary"), None);
        assert_eq!(PartAddress::parse("quiz"), None);
        assert_eq!(PartAddress::parse("quiz[x]"), None);
        assert_eq!(PartAddress::parse("quiz[1"), None);
        assert_eq!(PartAddress::parse("activation[0]"), None);
    }
}
