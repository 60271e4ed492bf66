//! Boolean predicates over a set of roll options.
use std::collections::BTreeSet;

/// One statement of a [`Predicate`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PredicateStatement {
    /// Holds when the option is present.
    Atom(String),
    Not(Box<PredicateStatement>),
    And(Vec<PredicateStatement>),
    Or(Vec<PredicateStatement>),
    Nor(Vec<PredicateStatement>),
}

impl PredicateStatement {
    pub fn atom(option: impl Into<String>) -> Self {
        Self::Atom(option.into())
    }

    pub fn not(statement: PredicateStatement) -> Self {
        Self::Not(Box::new(statement))
    }

    pub fn test(&self, options: &BTreeSet<String>) -> bool {
        match self {
            Self::Atom(option) => options.contains(option),
            Self::Not(inner) => !inner.test(options),
            Self::And(all) => all.iter().all(|s| s.test(options)),
            Self::Or(any) => any.iter().any(|s| s.test(options)),
            Self::Nor(none) => !none.iter().any(|s| s.test(options)),
        }
    }

    fn is_valid(&self) -> bool {
        match self {
            Self::Atom(option) => !option.trim().is_empty(),
            Self::Not(inner) => inner.is_valid(),
            Self::And(list) | Self::Or(list) | Self::Nor(list) => {
                !list.is_empty() && list.iter().all(Self::is_valid)
            }
        }
    }
}

/// Conjunction of statements. The empty predicate always holds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Predicate(pub Vec<PredicateStatement>);

impl Predicate {
    pub fn new(statements: Vec<PredicateStatement>) -> Self {
        Self(statements)
    }

    /// Predicate made only of atoms, all of which must be present.
    pub fn all_of<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(options.into_iter().map(PredicateStatement::atom).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_valid(&self) -> bool {
        self.0.iter().all(PredicateStatement::is_valid)
    }

    pub fn test(&self, options: &BTreeSet<String>) -> bool {
        self.0.iter().all(|statement| statement.test(options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn empty_predicate_always_passes() {
        assert!(Predicate::default().test(&options(&[])));
    }

    #[test]
    fn nested_statements() {
        let predicate = Predicate::new(vec![
            PredicateStatement::atom("self:type:character"),
            PredicateStatement::Or(vec![
                PredicateStatement::atom("rage"),
                PredicateStatement::atom("frenzy"),
            ]),
            PredicateStatement::not(PredicateStatement::atom("fatigued")),
        ]);

        assert!(predicate.test(&options(&["self:type:character", "frenzy"])));
        assert!(!predicate.test(&options(&["self:type:character", "frenzy", "fatigued"])));
        assert!(!predicate.test(&options(&["self:type:character"])));
    }

    #[test]
    fn empty_group_is_invalid() {
        let predicate = Predicate::new(vec![PredicateStatement::Or(vec![])]);
        assert!(!predicate.is_valid());
    }
}
