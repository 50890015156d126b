//! Best score record.

use serde::{Deserialize, Serialize};

/// Lexicographically smallest `(rolls, time)` ever achieved.
///
/// `None` means unset. The stored form is `{"rolls": u32|null, "time": u32|null}`;
/// missing fields deserialize as unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BestScore {
    #[serde(default)]
    pub rolls: Option<u32>,
    #[serde(default)]
    pub time: Option<u32>,
}

impl BestScore {
    pub const UNSET: BestScore = BestScore {
        rolls: None,
        time: None,
    };

    pub fn new(rolls: u32, time: u32) -> Self {
        Self {
            rolls: Some(rolls),
            time: Some(time),
        }
    }

    pub fn is_set(&self) -> bool {
        self.rolls.is_some()
    }

    /// True iff `(rolls, time)` is strictly better: fewer rolls, or equal rolls in less time.
    ///
    /// An unset component compares as infinitely large.
    pub fn improves_on(&self, rolls: u32, time: u32) -> bool {
        match (self.rolls, self.time) {
            (None, _) => true,
            (Some(r), _) if rolls < r => true,
            (Some(r), None) => rolls == r,
            (Some(r), Some(t)) => rolls == r && time < t,
        }
    }

    /// True when this record is exactly `(rolls, time)`.
    pub fn matches(&self, rolls: u32, time: u32) -> bool {
        self.rolls == Some(rolls) && self.time == Some(time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_is_always_improved() {
        assert!(BestScore::UNSET.improves_on(u32::MAX, u32::MAX));
        assert!(!BestScore::UNSET.is_set());
    }

    #[test]
    fn strict_lexicographic_improvement() {
        let best = BestScore::new(5, 20);
        assert!(best.improves_on(5, 18));
        assert!(best.improves_on(4, 99));
        assert!(!best.improves_on(6, 10));
        assert!(!best.improves_on(5, 20));
        assert!(!best.improves_on(5, 21));
    }

    #[test]
    fn missing_time_compares_as_infinite() {
        let best = BestScore {
            rolls: Some(5),
            time: None,
        };
        assert!(best.improves_on(5, 1_000));
        assert!(!best.improves_on(6, 0));
    }

    #[test]
    fn null_fields_deserialize_as_unset() {
        let b: BestScore = serde_json::from_str(r#"{"rolls":null,"time":null}"#).unwrap();
        assert_eq!(b, BestScore::UNSET);
        let b: BestScore = serde_json::from_str("{}").unwrap();
        assert_eq!(b, BestScore::UNSET);
        let b: BestScore = serde_json::from_str(r#"{"rolls":7,"time":31}"#).unwrap();
        assert_eq!(b, BestScore::new(7, 31));
    }

    #[test]
    fn matches_exact_pair_only() {
        let best = BestScore::new(3, 9);
        assert!(best.matches(3, 9));
        assert!(!best.matches(3, 8));
        assert!(!BestScore::UNSET.matches(0, 0));
    }
}
