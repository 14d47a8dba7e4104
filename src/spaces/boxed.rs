//! `BoxSpace` definition
use super::Space;
use ndarray::{Array1, Zip};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A box in `R^n`: the cartesian product of `n` closed intervals.
///
/// Bounds may be infinite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSpace {
    pub low: Array1<f64>,
    pub high: Array1<f64>,
}

impl BoxSpace {
    pub fn new(low: Array1<f64>, high: Array1<f64>) -> Self {
        assert_eq!(low.len(), high.len(), "bounds must have the same length");
        assert!(
            Zip::from(&low).and(&high).all(|l, h| l <= h),
            "require low <= high"
        );
        Self { low, high }
    }

    /// A box with the same bounds in every dimension.
    pub fn uniform(dim: usize, low: f64, high: f64) -> Self {
        Self::new(Array1::from_elem(dim, low), Array1::from_elem(dim, high))
    }

    /// All of `R^n`.
    pub fn unbounded(dim: usize) -> Self {
        Self::uniform(dim, f64::NEG_INFINITY, f64::INFINITY)
    }

    /// Number of dimensions.
    pub fn dim(&self) -> usize {
        self.low.len()
    }

    /// The shape of elements of this space.
    pub fn shape(&self) -> [usize; 1] {
        [self.dim()]
    }

    /// Project a point onto the box by clamping each coordinate.
    ///
    /// # Panics
    /// If `value` has a different dimension from the space.
    pub fn clip(&self, value: &Array1<f64>) -> Array1<f64> {
        Zip::from(value)
            .and(&self.low)
            .and(&self.high)
            .map_collect(|&x, &l, &h| x.max(l).min(h))
    }
}

impl Space for BoxSpace {
    type Element = Array1<f64>;

    fn contains(&self, value: &Self::Element) -> bool {
        value.len() == self.dim()
            && Zip::from(value)
                .and(&self.low)
                .and(&self.high)
                .all(|&x, &l, &h| l <= x && x <= h && !x.is_nan())
    }
}

impl fmt::Display for BoxSpace {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "BoxSpace(")?;
        for (i, (l, h)) in self.low.iter().zip(&self.high).enumerate() {
            if i > 0 {
                write!(f, " x ")?;
            }
            write!(f, "[{}, {}]", l, h)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rstest::rstest;

    #[rstest]
    #[case(array![0.0, 0.5], true)]
    #[case(array![-1.0, 1.0], true)]
    #[case(array![1.5, 0.0], false)]
    #[case(array![0.0, f64::NAN], false)]
    #[case(array![0.0], false)]
    fn contains(#[case] value: Array1<f64>, #[case] expected: bool) {
        let space = BoxSpace::uniform(2, -1.0, 1.0);
        assert_eq!(space.contains(&value), expected);
    }

    #[test]
    fn clip_clamps_each_coordinate() {
        let space = BoxSpace::new(array![-1.0, 0.0], array![1.0, 2.0]);
        assert_eq!(space.clip(&array![3.0, -4.0]), array![1.0, 0.0]);
        assert_eq!(space.clip(&array![0.5, 1.5]), array![0.5, 1.5]);
    }

    #[test]
    fn unbounded_contains_large_values() {
        let space = BoxSpace::unbounded(3);
        assert_eq!(space.shape(), [3]);
        assert!(space.contains(&array![1e300, -1e300, 0.0]));
    }

    #[test]
    #[should_panic(expected = "require low <= high")]
    fn inverted_bounds_panic() {
        let _ = BoxSpace::new(array![1.0], array![0.0]);
    }

    #[test]
    fn display() {
        let space = BoxSpace::uniform(2, -1.0, 1.0);
        assert_eq!(space.to_string(), "BoxSpace([-1, 1] x [-1, 1])");
    }
}
