//! Ordered member sets.
//!
//! Two views of one set: `by_member` answers score lookups in O(log n),
//! `by_rank` yields (score, member) iteration order. Mutators keep the
//! views in lockstep; serialization stores only the member map and the
//! rank view is rebuilt on load.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::score::Score;

/// A set of members ordered by (score, member).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Score>", into = "BTreeMap<String, Score>")]
pub struct SortedSet {
    by_member: BTreeMap<String, Score>,
    by_rank: BTreeSet<(Score, String)>,
}

impl SortedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or re-scores a member. Returns true when the member was new.
    pub fn insert(&mut self, member: &str, score: Score) -> bool {
        match self.by_member.insert(member.to_string(), score) {
            Some(previous) => {
                if previous != score {
                    self.by_rank.remove(&(previous, member.to_string()));
                    self.by_rank.insert((score, member.to_string()));
                }
                false
            }
            None => {
                self.by_rank.insert((score, member.to_string()));
                true
            }
        }
    }

    /// Removes a member. Returns true when it was present.
    pub fn remove(&mut self, member: &str) -> bool {
        match self.by_member.remove(member) {
            Some(score) => {
                self.by_rank.remove(&(score, member.to_string()));
                true
            }
            None => false,
        }
    }

    pub fn score(&self, member: &str) -> Option<Score> {
        self.by_member.get(member).copied()
    }

    pub fn contains(&self, member: &str) -> bool {
        self.by_member.contains_key(member)
    }

    pub fn len(&self) -> usize {
        self.by_member.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_member.is_empty()
    }

    /// Members in rank order: ascending score, ties broken by member.
    pub fn iter_ranked(&self) -> impl Iterator<Item = (&str, Score)> {
        self.by_rank
            .iter()
            .map(|(score, member)| (member.as_str(), *score))
    }

    /// Members whose scores fall within the inclusive `[min, max]` range,
    /// in rank order.
    pub fn range_by_score(
        &self,
        min: Score,
        max: Score,
    ) -> impl Iterator<Item = (&str, Score)> + '_ {
        self.by_rank
            .range((min, String::new())..)
            .take_while(move |(score, _)| *score <= max)
            .map(|(score, member)| (member.as_str(), *score))
    }
}

impl From<BTreeMap<String, Score>> for SortedSet {
    fn from(by_member: BTreeMap<String, Score>) -> Self {
        let by_rank = by_member
            .iter()
            .map(|(member, score)| (*score, member.clone()))
            .collect();
        SortedSet { by_member, by_rank }
    }
}

impl From<SortedSet> for BTreeMap<String, Score> {
    fn from(set: SortedSet) -> Self {
        set.by_member
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(v: f64) -> Score {
        Score::from_f64(v).unwrap()
    }

    #[test]
    fn test_insert_and_score_lookup() {
        let mut set = SortedSet::new();
        assert!(set.insert("p1", score(70.0)));
        assert!(set.insert("p2", score(35.0)));
        assert_eq!(set.score("p1"), Some(score(70.0)));
        assert_eq!(set.score("p2"), Some(score(35.0)));
        assert_eq!(set.score("p3"), None);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_insert_rescores_existing_member() {
        let mut set = SortedSet::new();
        assert!(set.insert("p1", score(70.0)));
        assert!(!set.insert("p1", score(80.0)));
        assert_eq!(set.len(), 1);
        assert_eq!(set.score("p1"), Some(score(80.0)));

        let ranked: Vec<_> = set.iter_ranked().collect();
        assert_eq!(ranked, vec![("p1", score(80.0))]);
    }

    #[test]
    fn test_remove_keeps_views_consistent() {
        let mut set = SortedSet::new();
        set.insert("p1", score(70.0));
        set.insert("p2", score(35.0));
        assert!(set.remove("p1"));
        assert!(!set.remove("p1"));
        assert!(!set.contains("p1"));
        assert_eq!(set.iter_ranked().count(), 1);
    }

    #[test]
    fn test_rank_order_is_score_then_member() {
        let mut set = SortedSet::new();
        set.insert("zed", score(10.0));
        set.insert("amy", score(10.0));
        set.insert("bob", score(5.0));

        let members: Vec<_> = set.iter_ranked().map(|(m, _)| m).collect();
        assert_eq!(members, vec!["bob", "amy", "zed"]);
    }

    #[test]
    fn test_range_by_score_bounds_are_inclusive() {
        let mut set = SortedSet::new();
        set.insert("a", score(10.0));
        set.insert("b", score(20.0));
        set.insert("c", score(30.0));
        set.insert("d", score(40.0));

        let hits: Vec<_> = set
            .range_by_score(score(20.0), score(30.0))
            .map(|(m, _)| m)
            .collect();
        assert_eq!(hits, vec!["b", "c"]);

        let all: Vec<_> = set
            .range_by_score(score(10.0), score(40.0))
            .map(|(m, _)| m)
            .collect();
        assert_eq!(all, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_serde_roundtrip_rebuilds_rank_view() {
        let mut set = SortedSet::new();
        set.insert("p1", score(70.0));
        set.insert("p2", score(35.0));

        let json = serde_json::to_string(&set).unwrap();
        let back: SortedSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);

        let members: Vec<_> = back.iter_ranked().map(|(m, _)| m).collect();
        assert_eq!(members, vec!["p2", "p1"]);
    }
}
