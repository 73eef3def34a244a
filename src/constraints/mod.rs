use indexmap::IndexMap;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

use crate::matcher::{Bindings, BoundValue};

pub type BindingsPredicate = Arc<dyn Fn(&Bindings) -> bool + Send + Sync>;
pub type ValuePredicate = Arc<dyn Fn(&BoundValue) -> bool + Send + Sync>;

/// Constraint specification attached to a route: a predicate over the whole
/// binding map, or a per-parameter rule map validated in insertion order.
#[derive(Clone, Default)]
pub enum ConstraintSpec {
    #[default]
    None,
    Predicate(BindingsPredicate),
    Map(IndexMap<String, ConstraintRule>),
}

impl ConstraintSpec {
    pub fn predicate(check: impl Fn(&Bindings) -> bool + Send + Sync + 'static) -> Self {
        ConstraintSpec::Predicate(Arc::new(check))
    }

    pub fn map<I, S>(rules: I) -> Self
    where
        I: IntoIterator<Item = (S, ConstraintRule)>,
        S: Into<String>,
    {
        ConstraintSpec::Map(
            rules
                .into_iter()
                .map(|(name, rule)| (name.into(), rule))
                .collect(),
        )
    }

    /// A specification containing any predicate disables result caching for
    /// its route: a predicate may answer differently across calls for the
    /// same path.
    pub(crate) fn has_predicate(&self) -> bool {
        match self {
            ConstraintSpec::None => false,
            ConstraintSpec::Predicate(_) => true,
            ConstraintSpec::Map(rules) => rules
                .values()
                .any(|rule| matches!(rule, ConstraintRule::Predicate(_))),
        }
    }
}

impl fmt::Debug for ConstraintSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintSpec::None => f.write_str("ConstraintSpec::None"),
            ConstraintSpec::Predicate(_) => f.write_str("ConstraintSpec::Predicate(..)"),
            ConstraintSpec::Map(rules) => f
                .debug_map()
                .entries(rules.iter().map(|(name, rule)| (name, rule)))
                .finish(),
        }
    }
}

/// One per-parameter rule. Regex and allowed-set rules apply to each
/// element of a wildcard-captured list; a predicate receives the whole
/// bound value.
#[derive(Clone)]
pub enum ConstraintRule {
    Pattern(Regex),
    Predicate(ValuePredicate),
    OneOf(Vec<String>),
}

impl ConstraintRule {
    /// Compiles an anchored pattern rule from a raw regex fragment.
    pub fn pattern(raw: &str) -> Result<Self, regex::Error> {
        Regex::new(&format!("^(?:{raw})$")).map(ConstraintRule::Pattern)
    }

    pub fn predicate(check: impl Fn(&BoundValue) -> bool + Send + Sync + 'static) -> Self {
        ConstraintRule::Predicate(Arc::new(check))
    }

    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ConstraintRule::OneOf(values.into_iter().map(Into::into).collect())
    }

    /// `Err` carries the offending value for diagnostics.
    fn admits(&self, value: &BoundValue) -> Result<(), String> {
        match self {
            ConstraintRule::Pattern(regex) => per_element(value, |element| regex.is_match(element)),
            ConstraintRule::OneOf(allowed) => {
                per_element(value, |element| allowed.iter().any(|a| a == element))
            }
            ConstraintRule::Predicate(check) => {
                if check(value) {
                    Ok(())
                } else {
                    Err(value.to_string())
                }
            }
        }
    }
}

impl fmt::Debug for ConstraintRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintRule::Pattern(regex) => write!(f, "Pattern({:?})", regex.as_str()),
            ConstraintRule::Predicate(_) => f.write_str("Predicate(..)"),
            ConstraintRule::OneOf(values) => write!(f, "OneOf({values:?})"),
        }
    }
}

fn per_element(value: &BoundValue, check: impl Fn(&str) -> bool) -> Result<(), String> {
    match value {
        BoundValue::One(single) => {
            if check(single) {
                Ok(())
            } else {
                Err(single.clone())
            }
        }
        BoundValue::Many(elements) => {
            for element in elements {
                if !check(element) {
                    return Err(element.clone());
                }
            }
            Ok(())
        }
    }
}

/// Validation verdict: not an error, a normal control-flow result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintFailure {
    /// The whole-map predicate said no; no per-parameter detail exists.
    Rejected,
    /// The first offending parameter, in the rule map's insertion order.
    Parameter { name: String, value: String },
}

pub fn validate(bindings: &Bindings, spec: &ConstraintSpec) -> Result<(), ConstraintFailure> {
    match spec {
        ConstraintSpec::None => Ok(()),
        ConstraintSpec::Predicate(check) => {
            if check(bindings) {
                Ok(())
            } else {
                Err(ConstraintFailure::Rejected)
            }
        }
        ConstraintSpec::Map(rules) => validate_rules(bindings, rules),
    }
}

/// Validates against a bare rule map. Parameters absent from the bindings
/// are skipped; the first failing rule aborts.
pub fn validate_rules(
    bindings: &Bindings,
    rules: &IndexMap<String, ConstraintRule>,
) -> Result<(), ConstraintFailure> {
    for (name, rule) in rules {
        let Some(value) = bindings.get(name) else {
            continue;
        };
        if let Err(offending) = rule.admits(value) {
            return Err(ConstraintFailure::Parameter {
                name: name.clone(),
                value: offending,
            });
        }
    }

    Ok(())
}
