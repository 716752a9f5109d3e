//! Best-set tracking: the current optimum and every member exactly tied with it.

use crate::optimizer::objective::Direction;

#[derive(Debug, Clone, PartialEq)]
pub enum BestSet<T> {
    Empty,
    HasBest { value: f64, members: Vec<T> },
}

impl<T> Default for BestSet<T> {
    fn default() -> Self {
        Self::Empty
    }
}

/// What happened to an offered candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    Replaced,
    Tied,
    Discarded,
}

impl<T> BestSet<T> {
    pub fn new() -> Self {
        Self::Empty
    }

    pub fn best(&self) -> Option<f64> {
        match self {
            Self::Empty => None,
            Self::HasBest { value, .. } => Some(*value),
        }
    }

    pub fn members(&self) -> &[T] {
        match self {
            Self::Empty => &[],
            Self::HasBest { members, .. } => members,
        }
    }

    /// Apply one transition. `make` runs only when the candidate is kept, so
    /// callers can defer building the member.
    pub fn offer(&mut self, value: f64, direction: Direction, make: impl FnOnce() -> T) -> Offer {
        match self {
            Self::HasBest { value: best, members } => {
                if value == *best {
                    members.push(make());
                    Offer::Tied
                } else if direction.improves(value, *best) {
                    *self = Self::HasBest {
                        value,
                        members: vec![make()],
                    };
                    Offer::Replaced
                } else {
                    Offer::Discarded
                }
            }
            Self::Empty => {
                *self = Self::HasBest {
                    value,
                    members: vec![make()],
                };
                Offer::Replaced
            }
        }
    }

    /// Combine two partial trackers. On an exact tie `self`'s members come
    /// first, so merging partitions in enumeration order reproduces the
    /// sequential member order.
    pub fn merge(self, other: Self, direction: Direction) -> Self {
        match (self, other) {
            (Self::Empty, other) => other,
            (this, Self::Empty) => this,
            (
                Self::HasBest {
                    value: left,
                    members: mut left_members,
                },
                Self::HasBest {
                    value: right,
                    members: right_members,
                },
            ) => {
                if left == right {
                    left_members.extend(right_members);
                    Self::HasBest {
                        value: left,
                        members: left_members,
                    }
                } else if direction.improves(right, left) {
                    Self::HasBest {
                        value: right,
                        members: right_members,
                    }
                } else {
                    Self::HasBest {
                        value: left,
                        members: left_members,
                    }
                }
            }
        }
    }

    pub fn into_parts(self) -> (Option<f64>, Vec<T>) {
        match self {
            Self::Empty => (None, Vec::new()),
            Self::HasBest { value, members } => (Some(value), members),
        }
    }
}
