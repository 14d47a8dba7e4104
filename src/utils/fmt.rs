//! Formatting utilities
use std::fmt;
use std::time::Duration;

/// Pretty-printing
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PrettyPrint<T>(pub T);

impl fmt::Display for PrettyPrint<f64> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Learning rates and squared errors span many orders of magnitude.
        let magnitude = self.0.abs();
        if (magnitude >= 1e6 || magnitude <= 1e-4) && self.0 != 0.0 {
            fmt::LowerExp::fmt(&self.0, f)
        } else {
            fmt::Display::fmt(&self.0, f)
        }
    }
}

impl fmt::Display for PrettyPrint<Duration> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

/// Display a vector as a bracketed, comma-separated list with fixed precision.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vector<'a>(pub &'a [f64]);

impl<'a> fmt::Display for Vector<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let precision = f.precision().unwrap_or(3);
        f.write_str("[")?;
        for (i, x) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:.*}", precision, x)?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_print_small_uses_exponent() {
        assert_eq!(format!("{}", PrettyPrint(0.00005)), "5e-5");
        assert_eq!(format!("{}", PrettyPrint(0.5)), "0.5");
        assert_eq!(format!("{}", PrettyPrint(0.0)), "0");
    }

    #[test]
    fn vector_precision() {
        assert_eq!(format!("{}", Vector(&[1.0, -0.5])), "[1.000, -0.500]");
        assert_eq!(format!("{:.1}", Vector(&[0.26])), "[0.3]");
        assert_eq!(format!("{}", Vector(&[])), "[]");
    }
}
