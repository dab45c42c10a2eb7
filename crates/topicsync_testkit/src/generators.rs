//! Property-based test generators using proptest.
//!
//! Provides strategies for topic values and changes that respect the
//! value type each change is made for.

use proptest::prelude::*;
use serde_json::Value;
use topicsync_change::{Change, ValueType};

/// Strategy for any value type.
pub fn value_type_strategy() -> impl Strategy<Value = ValueType> {
    prop::sample::select(ValueType::ALL.to_vec())
}

/// Strategy for collection items.
///
/// Items are drawn from a small pool so appends and removes collide often.
pub fn item_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        prop::sample::select(vec!["a", "b", "c", "d"]).prop_map(Value::from),
        (0i64..4).prop_map(Value::from),
    ]
}

/// Strategy for collection values.
pub fn collection_strategy() -> impl Strategy<Value = Value> {
    prop::collection::vec(item_strategy(), 0..6).prop_map(Value::Array)
}

/// Strategy for finite, non-zero floats across the whole exponent range.
///
/// JSON cannot carry NaN or the infinities, and zero is left out so bit
/// comparisons do not depend on how a sign is written.
pub fn float_strategy() -> impl Strategy<Value = f64> {
    prop::num::f64::NORMAL | prop::num::f64::SUBNORMAL
}

/// Strategy for values of a given type.
pub fn value_strategy(value_type: ValueType) -> BoxedStrategy<Value> {
    match value_type {
        ValueType::String => ".{0,12}".prop_map(Value::from).boxed(),
        ValueType::Int => any::<i64>().prop_map(Value::from).boxed(),
        ValueType::Float => float_strategy().prop_map(Value::from).boxed(),
        ValueType::Bool => any::<bool>().prop_map(Value::from).boxed(),
        ValueType::Collection => collection_strategy().boxed(),
    }
}

/// Strategy for a value type together with two values of it.
pub fn value_pair_strategy() -> impl Strategy<Value = (ValueType, Value, Value)> {
    value_type_strategy().prop_flat_map(|value_type| {
        (
            Just(value_type),
            value_strategy(value_type),
            value_strategy(value_type),
        )
    })
}

/// Strategy for changes that apply to a collection.
pub fn collection_change_strategy() -> impl Strategy<Value = Change> {
    prop_oneof![
        3 => item_strategy().prop_map(|item| Change::append(item)),
        2 => item_strategy().prop_map(|item| Change::remove(item)),
        1 => collection_strategy().prop_map(|v| Change::set(ValueType::Collection, v)),
    ]
}

/// Strategy for any change, with a value of the type it applies to.
pub fn change_with_value_strategy() -> impl Strategy<Value = (Change, Value)> {
    value_type_strategy().prop_flat_map(|value_type| match value_type {
        ValueType::Collection => (collection_change_strategy(), collection_strategy()).boxed(),
        scalar => (
            value_strategy(scalar).prop_map(move |v| Change::set(scalar, v)),
            value_strategy(scalar),
        )
            .boxed(),
    })
}

/// One step of a scripted editing session over the fixture topics
/// `count` (int) and `items` (collection).
#[derive(Debug, Clone)]
pub enum ScriptStep {
    /// Replace `count`.
    SetCount(i64),
    /// Append to `items`.
    Append(Value),
    /// Remove from `items`; may fail if the item is absent.
    Remove(Value),
}

/// Strategy for a script step.
pub fn script_step_strategy() -> impl Strategy<Value = ScriptStep> {
    prop_oneof![
        2 => (-100i64..100).prop_map(ScriptStep::SetCount),
        3 => item_strategy().prop_map(ScriptStep::Append),
        2 => item_strategy().prop_map(ScriptStep::Remove),
    ]
}

/// Strategy for a sequence of script steps.
pub fn script_strategy(min_steps: usize, max_steps: usize) -> impl Strategy<Value = Vec<ScriptStep>> {
    prop::collection::vec(script_step_strategy(), min_steps..max_steps)
}

/// Case budget for the property suites.
///
/// `quick` suits the in-crate generator checks, the default suits the
/// manager properties, and `thorough` is for properties over the wire text
/// where rare inputs matter.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Cases per property.
    pub cases: u32,
    /// Shrink iteration limit.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Small budget.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Large budget.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Builds the `ProptestConfig` for a `proptest!` block.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn values_fit_their_type((value_type, a, b) in value_pair_strategy()) {
            prop_assert!(value_type.accepts(&a));
            prop_assert!(value_type.accepts(&b));
        }

        #[test]
        fn changes_match_their_value((change, value) in change_with_value_strategy()) {
            prop_assert!(change.value_type().accepts(&value));
        }

        #[test]
        fn scripts_respect_bounds(script in script_strategy(1, 10)) {
            prop_assert!(!script.is_empty());
            prop_assert!(script.len() < 10);
        }
    }
}
