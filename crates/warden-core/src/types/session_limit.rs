//! Concurrent session limit type.

use serde::{Deserialize, Serialize};

/// Maximum number of concurrent ACTIVE sessions a user may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionLimit {
    /// A fixed maximum number of concurrent sessions.
    Fixed(u32),
    /// No per-user limit.
    Unlimited,
}

impl SessionLimit {
    /// Whether a user already holding `active_count` sessions is at the limit,
    /// i.e. one more session would exceed it.
    pub fn is_reached_by(&self, active_count: usize) -> bool {
        match self {
            Self::Fixed(max) => active_count >= *max as usize,
            Self::Unlimited => false,
        }
    }

    /// Number of sessions to evict so that at most `max` remain.
    pub fn overflow(&self, active_count: usize) -> usize {
        match self {
            Self::Fixed(max) => active_count.saturating_sub(*max as usize),
            Self::Unlimited => 0,
        }
    }

    /// Return the numeric limit, or `None` for unlimited.
    pub fn as_max(&self) -> Option<u32> {
        match self {
            Self::Fixed(max) => Some(*max),
            Self::Unlimited => None,
        }
    }
}

impl From<u32> for SessionLimit {
    /// Convert a `u32` to a `SessionLimit`. `0` means unlimited.
    fn from(value: u32) -> Self {
        if value == 0 {
            Self::Unlimited
        } else {
            Self::Fixed(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_limit() {
        let limit = SessionLimit::Fixed(3);
        assert!(!limit.is_reached_by(2));
        assert!(limit.is_reached_by(3));
        assert_eq!(limit.overflow(3), 0);
        assert_eq!(limit.overflow(5), 2);
    }

    #[test]
    fn test_unlimited() {
        let limit = SessionLimit::Unlimited;
        assert!(!limit.is_reached_by(10_000));
        assert_eq!(limit.overflow(usize::MAX), 0);
    }

    #[test]
    fn test_from_u32() {
        assert_eq!(SessionLimit::from(0), SessionLimit::Unlimited);
        assert_eq!(SessionLimit::from(5), SessionLimit::Fixed(5));
    }
}
