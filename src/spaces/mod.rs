//! Observation and action spaces
mod boxed;

pub use boxed::BoxSpace;

/// A set of elements.
pub trait Space {
    type Element;

    /// Check whether a particular value is contained in the space.
    fn contains(&self, value: &Self::Element) -> bool;
}
