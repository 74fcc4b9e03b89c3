//! Attribute combination strategies
//!
//! When two nodes are merged, attributes present on both sides are combined by
//! a [`CombineStrategy`]. Callers pick one strategy for numeric attributes and
//! one for string attributes, e.g. average embeddings but concatenate keyword
//! lists.
//!
//! - [`RetainMin`] / [`RetainMax`]: keep the smaller / larger scalar
//! - [`AvgNum`]: average two numbers (integer division truncates)
//! - [`Array`]: promote scalars to lists and concatenate

use super::{AttributeValue, ValueFamily};
use crate::error::GraphError;

/// Result of combining two attribute values
pub type CombineResult = Result<AttributeValue, GraphError>;

/// A rule for merging two same-typed attribute values.
///
/// Each method receives the two values of one family and returns the merged
/// value, or [`GraphError::TypeMismatch`] when the inputs are outside what the
/// strategy supports.
pub trait CombineStrategy {
    /// Short name used in logs and errors
    fn name(&self) -> &'static str;

    fn combine_int(&self, a: &AttributeValue, b: &AttributeValue) -> CombineResult;

    fn combine_f32(&self, a: &AttributeValue, b: &AttributeValue) -> CombineResult;

    fn combine_f64(&self, a: &AttributeValue, b: &AttributeValue) -> CombineResult;

    fn combine_string(&self, a: &AttributeValue, b: &AttributeValue) -> CombineResult;
}

/// Combine two values, routing numeric families to `numeric` and strings to
/// `text`.
///
/// Values of different families cannot be combined. Empty lists carry no
/// element type and are accepted alongside any family.
pub fn combine_values(
    a: &AttributeValue,
    b: &AttributeValue,
    numeric: &dyn CombineStrategy,
    text: &dyn CombineStrategy,
) -> CombineResult {
    let family = if a.is_empty_list() {
        b.family()
    } else {
        a.family()
    };

    if !b.is_empty_list() && b.family() != family {
        return Err(GraphError::type_mismatch(
            "combine",
            a.type_name(),
            b.type_name(),
        ));
    }

    match family {
        ValueFamily::Int => numeric.combine_int(a, b),
        ValueFamily::Float32 => numeric.combine_f32(a, b),
        ValueFamily::Float64 => numeric.combine_f64(a, b),
        ValueFamily::Str => text.combine_string(a, b),
    }
}

fn mismatch(strategy: &dyn CombineStrategy, a: &AttributeValue, b: &AttributeValue) -> GraphError {
    GraphError::type_mismatch(strategy.name(), a.type_name(), b.type_name())
}

/// Keeps the smaller value (numeric or lexicographic order). Ties keep `a`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetainMin;

impl CombineStrategy for RetainMin {
    fn name(&self) -> &'static str {
        "retain_min"
    }

    fn combine_int(&self, a: &AttributeValue, b: &AttributeValue) -> CombineResult {
        match (a.as_int(), b.as_int()) {
            (Some(x), Some(y)) => Ok(AttributeValue::Int(if x <= y { x } else { y })),
            _ => Err(mismatch(self, a, b)),
        }
    }

    fn combine_f32(&self, a: &AttributeValue, b: &AttributeValue) -> CombineResult {
        match (a.as_f32(), b.as_f32()) {
            (Some(x), Some(y)) => Ok(AttributeValue::Float32(if x <= y { x } else { y })),
            _ => Err(mismatch(self, a, b)),
        }
    }

    fn combine_f64(&self, a: &AttributeValue, b: &AttributeValue) -> CombineResult {
        match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => Ok(AttributeValue::Float64(if x <= y { x } else { y })),
            _ => Err(mismatch(self, a, b)),
        }
    }

    fn combine_string(&self, a: &AttributeValue, b: &AttributeValue) -> CombineResult {
        match (a.as_str(), b.as_str()) {
            (Some(x), Some(y)) => Ok(AttributeValue::from(if x <= y { x } else { y })),
            _ => Err(mismatch(self, a, b)),
        }
    }
}

/// Keeps the larger value (numeric or lexicographic order). Ties keep `a`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetainMax;

impl CombineStrategy for RetainMax {
    fn name(&self) -> &'static str {
        "retain_max"
    }

    fn combine_int(&self, a: &AttributeValue, b: &AttributeValue) -> CombineResult {
        match (a.as_int(), b.as_int()) {
            (Some(x), Some(y)) => Ok(AttributeValue::Int(if x >= y { x } else { y })),
            _ => Err(mismatch(self, a, b)),
        }
    }

    fn combine_f32(&self, a: &AttributeValue, b: &AttributeValue) -> CombineResult {
        match (a.as_f32(), b.as_f32()) {
            (Some(x), Some(y)) => Ok(AttributeValue::Float32(if x >= y { x } else { y })),
            _ => Err(mismatch(self, a, b)),
        }
    }

    fn combine_f64(&self, a: &AttributeValue, b: &AttributeValue) -> CombineResult {
        match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => Ok(AttributeValue::Float64(if x >= y { x } else { y })),
            _ => Err(mismatch(self, a, b)),
        }
    }

    fn combine_string(&self, a: &AttributeValue, b: &AttributeValue) -> CombineResult {
        match (a.as_str(), b.as_str()) {
            (Some(x), Some(y)) => Ok(AttributeValue::from(if x >= y { x } else { y })),
            _ => Err(mismatch(self, a, b)),
        }
    }
}

/// Averages two numbers. Strings have no average and always mismatch.
#[derive(Debug, Clone, Copy, Default)]
pub struct AvgNum;

impl CombineStrategy for AvgNum {
    fn name(&self) -> &'static str {
        "avg_num"
    }

    fn combine_int(&self, a: &AttributeValue, b: &AttributeValue) -> CombineResult {
        match (a.as_int(), b.as_int()) {
            // i128 keeps the sum from overflowing; the mean always fits back
            (Some(x), Some(y)) => Ok(AttributeValue::Int(((x as i128 + y as i128) / 2) as i64)),
            _ => Err(mismatch(self, a, b)),
        }
    }

    fn combine_f32(&self, a: &AttributeValue, b: &AttributeValue) -> CombineResult {
        match (a.as_f32(), b.as_f32()) {
            (Some(x), Some(y)) => Ok(AttributeValue::Float32(x / 2.0 + y / 2.0)),
            _ => Err(mismatch(self, a, b)),
        }
    }

    fn combine_f64(&self, a: &AttributeValue, b: &AttributeValue) -> CombineResult {
        match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => Ok(AttributeValue::Float64(x / 2.0 + y / 2.0)),
            _ => Err(mismatch(self, a, b)),
        }
    }

    fn combine_string(&self, a: &AttributeValue, b: &AttributeValue) -> CombineResult {
        Err(mismatch(self, a, b))
    }
}

/// Accumulates values into a list so no original value is lost.
#[derive(Debug, Clone, Copy, Default)]
pub struct Array;

impl Array {
    fn concat<T>(
        &self,
        a: &AttributeValue,
        b: &AttributeValue,
        promote: impl Fn(&AttributeValue) -> Option<Vec<T>>,
        wrap: impl Fn(Vec<T>) -> AttributeValue,
    ) -> CombineResult {
        match (promote(a), promote(b)) {
            (Some(mut left), Some(right)) => {
                left.extend(right);
                Ok(wrap(left))
            }
            _ => Err(mismatch(self, a, b)),
        }
    }
}

impl CombineStrategy for Array {
    fn name(&self) -> &'static str {
        "array"
    }

    fn combine_int(&self, a: &AttributeValue, b: &AttributeValue) -> CombineResult {
        self.concat(a, b, AttributeValue::to_int_list, AttributeValue::IntList)
    }

    fn combine_f32(&self, a: &AttributeValue, b: &AttributeValue) -> CombineResult {
        self.concat(a, b, AttributeValue::to_f32_list, AttributeValue::Float32List)
    }

    fn combine_f64(&self, a: &AttributeValue, b: &AttributeValue) -> CombineResult {
        self.concat(a, b, AttributeValue::to_f64_list, AttributeValue::Float64List)
    }

    fn combine_string(&self, a: &AttributeValue, b: &AttributeValue) -> CombineResult {
        self.concat(a, b, AttributeValue::to_str_list, AttributeValue::StrList)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> AttributeValue {
        AttributeValue::from(v)
    }

    fn strs(v: &[&str]) -> AttributeValue {
        AttributeValue::StrList(v.iter().map(|x| x.to_string()).collect())
    }

    #[test]
    fn test_retain_min() {
        let min = RetainMin;
        assert_eq!(
            min.combine_int(&3i64.into(), &5i64.into()).unwrap(),
            AttributeValue::Int(3)
        );
        assert_eq!(
            min.combine_f32(&2.5f32.into(), &1.5f32.into()).unwrap(),
            AttributeValue::Float32(1.5)
        );
        assert_eq!(
            min.combine_f64(&(-1.0f64).into(), &1.0f64.into()).unwrap(),
            AttributeValue::Float64(-1.0)
        );
        assert_eq!(min.combine_string(&s("beta"), &s("alpha")).unwrap(), s("alpha"));
    }

    #[test]
    fn test_retain_max() {
        let max = RetainMax;
        assert_eq!(
            max.combine_int(&3i64.into(), &5i64.into()).unwrap(),
            AttributeValue::Int(5)
        );
        assert_eq!(
            max.combine_f64(&0.1f64.into(), &0.2f64.into()).unwrap(),
            AttributeValue::Float64(0.2)
        );
        assert_eq!(max.combine_string(&s("beta"), &s("alpha")).unwrap(), s("beta"));
    }

    #[test]
    fn test_avg_num() {
        let avg = AvgNum;
        // Integer division truncates
        assert_eq!(
            avg.combine_int(&3i64.into(), &4i64.into()).unwrap(),
            AttributeValue::Int(3)
        );
        assert_eq!(
            avg.combine_int(&i64::MAX.into(), &i64::MAX.into()).unwrap(),
            AttributeValue::Int(i64::MAX)
        );
        assert_eq!(
            avg.combine_f32(&1.0f32.into(), &2.0f32.into()).unwrap(),
            AttributeValue::Float32(1.5)
        );
        assert_eq!(
            avg.combine_f64(&1.0f64.into(), &2.0f64.into()).unwrap(),
            AttributeValue::Float64(1.5)
        );
    }

    #[test]
    fn test_avg_num_large_floats_stay_finite() {
        assert_eq!(
            AvgNum.combine_f64(&f64::MAX.into(), &f64::MAX.into()).unwrap(),
            AttributeValue::Float64(f64::MAX)
        );
        assert_eq!(
            AvgNum.combine_f32(&f32::MAX.into(), &f32::MAX.into()).unwrap(),
            AttributeValue::Float32(f32::MAX)
        );
        assert_eq!(
            AvgNum.combine_f64(&f64::MAX.into(), &(-f64::MAX).into()).unwrap(),
            AttributeValue::Float64(0.0)
        );
    }

    #[test]
    fn test_avg_num_has_no_string_variant() {
        let err = AvgNum.combine_string(&s("a"), &s("b")).unwrap_err();
        assert!(matches!(
            err,
            GraphError::TypeMismatch {
                strategy: "avg_num",
                ..
            }
        ));
    }

    #[test]
    fn test_array_promotes_scalars() {
        let array = Array;
        assert_eq!(
            array.combine_int(&1i64.into(), &2i64.into()).unwrap(),
            AttributeValue::IntList(vec![1, 2])
        );
        assert_eq!(
            array.combine_string(&s("a"), &strs(&["b", "c"])).unwrap(),
            strs(&["a", "b", "c"])
        );
        assert_eq!(
            array
                .combine_f64(&AttributeValue::Float64List(vec![0.5]), &1.5f64.into())
                .unwrap(),
            AttributeValue::Float64List(vec![0.5, 1.5])
        );
    }

    #[test]
    fn test_array_accepts_empty_list_of_any_type() {
        let merged = Array
            .combine_int(&AttributeValue::StrList(vec![]), &7i64.into())
            .unwrap();
        assert_eq!(merged, AttributeValue::IntList(vec![7]));
    }

    #[test]
    fn test_scalar_strategies_reject_lists() {
        let err = RetainMin
            .combine_int(&AttributeValue::IntList(vec![1]), &2i64.into())
            .unwrap_err();
        assert_eq!(
            err,
            GraphError::type_mismatch("retain_min", "int list", "int")
        );
    }

    #[test]
    fn test_combine_values_routes_by_family() {
        let merged = combine_values(&1i64.into(), &2i64.into(), &AvgNum, &Array).unwrap();
        assert_eq!(merged, AttributeValue::Int(1));

        let merged = combine_values(&s("x"), &s("y"), &AvgNum, &Array).unwrap();
        assert_eq!(merged, strs(&["x", "y"]));
    }

    #[test]
    fn test_combine_values_rejects_mixed_families() {
        let err = combine_values(&1i64.into(), &s("y"), &Array, &Array).unwrap_err();
        assert_eq!(err, GraphError::type_mismatch("combine", "int", "string"));

        // float32 and float64 are distinct families
        assert!(combine_values(&1.0f32.into(), &1.0f64.into(), &Array, &Array).is_err());
    }
}
