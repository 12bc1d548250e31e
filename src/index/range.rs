/// Inclusive range of row ids. `last: None` is unbounded above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRange {
    Empty,
    Rows { first: u64, last: Option<u64> },
}

impl RowRange {
    pub fn all() -> Self {
        RowRange::Rows {
            first: 0,
            last: None,
        }
    }

    pub fn closed(first: u64, last: u64) -> Self {
        if first > last {
            RowRange::Empty
        } else {
            RowRange::Rows {
                first,
                last: Some(last),
            }
        }
    }

    pub fn at_least(first: u64) -> Self {
        RowRange::Rows { first, last: None }
    }

    pub fn at_most(last: u64) -> Self {
        RowRange::Rows {
            first: 0,
            last: Some(last),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RowRange::Empty)
    }

    pub fn is_all(&self) -> bool {
        *self == RowRange::all()
    }

    pub fn contains(&self, row_id: u64) -> bool {
        match self {
            RowRange::Empty => false,
            RowRange::Rows { first, last } => {
                row_id >= *first && last.is_none_or(|last| row_id <= last)
            }
        }
    }

    /// Whether every row of `other` is also in `self`.
    pub fn encloses(&self, other: &RowRange) -> bool {
        match (self, other) {
            (_, RowRange::Empty) => true,
            (RowRange::Empty, _) => false,
            (
                RowRange::Rows { first, last },
                RowRange::Rows {
                    first: other_first,
                    last: other_last,
                },
            ) => {
                first <= other_first
                    && match (last, other_last) {
                        (None, _) => true,
                        (Some(_), None) => false,
                        (Some(last), Some(other_last)) => last >= other_last,
                    }
            }
        }
    }

    pub fn intersect(&self, other: &RowRange) -> RowRange {
        match (self, other) {
            (RowRange::Empty, _) | (_, RowRange::Empty) => RowRange::Empty,
            (
                RowRange::Rows { first, last },
                RowRange::Rows {
                    first: other_first,
                    last: other_last,
                },
            ) => {
                let first = (*first).max(*other_first);
                let last = match (last, other_last) {
                    (Some(a), Some(b)) => Some((*a).min(*b)),
                    (Some(a), None) | (None, Some(a)) => Some(*a),
                    (None, None) => None,
                };
                match last {
                    Some(last) => RowRange::closed(first, last),
                    None => RowRange::at_least(first),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_normalizes_inverted() {
        assert_eq!(RowRange::closed(5, 4), RowRange::Empty);
        assert!(!RowRange::closed(4, 4).is_empty());
    }

    #[test]
    fn test_contains() {
        assert!(RowRange::all().contains(u64::MAX));
        assert!(RowRange::closed(2, 4).contains(2));
        assert!(RowRange::closed(2, 4).contains(4));
        assert!(!RowRange::closed(2, 4).contains(5));
        assert!(!RowRange::at_least(3).contains(2));
        assert!(!RowRange::Empty.contains(0));
    }

    #[test]
    fn test_intersect() {
        assert_eq!(
            RowRange::closed(0, 10).intersect(&RowRange::closed(5, 20)),
            RowRange::closed(5, 10)
        );
        assert_eq!(
            RowRange::at_least(7).intersect(&RowRange::at_most(9)),
            RowRange::closed(7, 9)
        );
        assert_eq!(
            RowRange::closed(0, 3).intersect(&RowRange::closed(4, 9)),
            RowRange::Empty
        );
        assert_eq!(
            RowRange::all().intersect(&RowRange::at_least(3)),
            RowRange::at_least(3)
        );
        assert_eq!(RowRange::Empty.intersect(&RowRange::all()), RowRange::Empty);
    }

    #[test]
    fn test_encloses() {
        assert!(RowRange::all().encloses(&RowRange::closed(3, 9)));
        assert!(RowRange::closed(0, 9).encloses(&RowRange::closed(3, 9)));
        assert!(!RowRange::closed(4, 9).encloses(&RowRange::closed(3, 9)));
        assert!(!RowRange::closed(0, 9).encloses(&RowRange::at_least(3)));
        assert!(RowRange::Empty.encloses(&RowRange::Empty));
        assert!(!RowRange::Empty.encloses(&RowRange::closed(1, 1)));
    }
}
