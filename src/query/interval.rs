use std::ops::Bound;

/// A possibly half-open or unbounded interval over an ordered domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval<T> {
    lower: Bound<T>,
    upper: Bound<T>,
}

impl<T: Ord> Interval<T> {
    pub fn new(lower: Bound<T>, upper: Bound<T>) -> Self {
        Self { lower, upper }
    }

    pub fn all() -> Self {
        Self::new(Bound::Unbounded, Bound::Unbounded)
    }

    pub fn closed(lower: T, upper: T) -> Self {
        Self::new(Bound::Included(lower), Bound::Included(upper))
    }

    pub fn open(lower: T, upper: T) -> Self {
        Self::new(Bound::Excluded(lower), Bound::Excluded(upper))
    }

    pub fn closed_open(lower: T, upper: T) -> Self {
        Self::new(Bound::Included(lower), Bound::Excluded(upper))
    }

    pub fn open_closed(lower: T, upper: T) -> Self {
        Self::new(Bound::Excluded(lower), Bound::Included(upper))
    }

    pub fn at_least(lower: T) -> Self {
        Self::new(Bound::Included(lower), Bound::Unbounded)
    }

    pub fn greater_than(lower: T) -> Self {
        Self::new(Bound::Excluded(lower), Bound::Unbounded)
    }

    pub fn at_most(upper: T) -> Self {
        Self::new(Bound::Unbounded, Bound::Included(upper))
    }

    pub fn less_than(upper: T) -> Self {
        Self::new(Bound::Unbounded, Bound::Excluded(upper))
    }

    pub fn lower(&self) -> Bound<&T> {
        self.lower.as_ref()
    }

    pub fn upper(&self) -> Bound<&T> {
        self.upper.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        match (&self.lower, &self.upper) {
            (Bound::Included(l), Bound::Included(u)) => l > u,
            (Bound::Included(l), Bound::Excluded(u))
            | (Bound::Excluded(l), Bound::Included(u))
            | (Bound::Excluded(l), Bound::Excluded(u)) => l >= u,
            _ => false,
        }
    }

    fn above_lower(&self, value: &T) -> bool {
        match &self.lower {
            Bound::Unbounded => true,
            Bound::Included(l) => value >= l,
            Bound::Excluded(l) => value > l,
        }
    }

    fn below_upper(&self, value: &T) -> bool {
        match &self.upper {
            Bound::Unbounded => true,
            Bound::Included(u) => value <= u,
            Bound::Excluded(u) => value < u,
        }
    }

    pub fn contains(&self, value: &T) -> bool {
        self.above_lower(value) && self.below_upper(value)
    }

    /// Whether the closed range `[min, max]` shares any point with this interval.
    pub fn intersects(&self, min: &T, max: &T) -> bool {
        !self.is_empty() && min <= max && self.above_lower(max) && self.below_upper(min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains() {
        assert!(Interval::closed(1, 3).contains(&1));
        assert!(Interval::closed(1, 3).contains(&3));
        assert!(!Interval::open(1, 3).contains(&1));
        assert!(!Interval::open(1, 3).contains(&3));
        assert!(Interval::open(1, 3).contains(&2));
        assert!(Interval::at_least(5).contains(&i64::MAX));
        assert!(!Interval::less_than(5).contains(&5));
        assert!(Interval::<i32>::all().contains(&0));
    }

    #[test]
    fn test_is_empty() {
        assert!(!Interval::closed(1, 1).is_empty());
        assert!(Interval::closed_open(1, 1).is_empty());
        assert!(Interval::open_closed(1, 1).is_empty());
        assert!(Interval::closed(2, 1).is_empty());
        assert!(!Interval::at_most(1).is_empty());
        assert!(!Interval::<i32>::all().is_empty());
    }

    #[test]
    fn test_intersects() {
        let interval = Interval::closed(10, 20);
        assert!(interval.intersects(&0, &10));
        assert!(interval.intersects(&20, &30));
        assert!(interval.intersects(&12, &13));
        assert!(interval.intersects(&0, &100));
        assert!(!interval.intersects(&0, &9));
        assert!(!interval.intersects(&21, &30));

        let open = Interval::open(10, 20);
        assert!(!open.intersects(&0, &10));
        assert!(!open.intersects(&20, &25));
        assert!(open.intersects(&10, &11));

        assert!(!Interval::closed_open(5, 5).intersects(&0, &10));
        assert!(Interval::greater_than(9).intersects(&0, &10));
        assert!(!Interval::greater_than(10).intersects(&0, &10));
    }
}
