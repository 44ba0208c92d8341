use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::models::{MatchScore, ScoringWeights};

pub const DEFAULT_DIVERSITY_MULTIPLIER: f64 = 2.0;

/// One student's candidates, best first
#[derive(Debug, Clone)]
pub struct StudentPreferences {
    pub student_id: String,
    pub ranked: Vec<MatchScore>,
}

/// Capacity-respecting assignment produced by one optimization run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    /// studentId -> internshipId
    pub assignments: BTreeMap<String, String>,
    /// Students left without a slot, in input order
    pub unassigned: Vec<String>,
    /// Number of proposals made before the run settled
    pub proposals: usize,
}

impl Allocation {
    pub fn total_allocated(&self) -> usize {
        self.assignments.len()
    }

    /// Share of students placed, as a percentage with two decimals
    pub fn allocation_rate(&self, total_students: usize) -> f64 {
        if total_students == 0 {
            return 0.0;
        }
        let rate = self.total_allocated() as f64 / total_students as f64 * 100.0;
        (rate * 100.0).round() / 100.0
    }
}

/// Provisional holder of an internship slot
#[derive(Debug, Clone, Copy)]
struct Holder<'a> {
    student: usize,
    student_id: &'a str,
    priority: f64,
}

impl Holder<'_> {
    /// Higher priority wins; equal priorities go to the smaller student id
    fn outranks(&self, other: &Holder<'_>) -> bool {
        match self.priority.total_cmp(&other.priority) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => self.student_id < other.student_id,
        }
    }
}

#[derive(Debug)]
struct Slot<'a> {
    capacity: usize,
    holders: Vec<Holder<'a>>,
}

impl<'a> Slot<'a> {
    /// Offer a slot to `candidate`; returns the student who ends up rejected, if any
    fn offer(&mut self, candidate: Holder<'a>) -> Option<usize> {
        if self.holders.len() < self.capacity {
            self.holders.push(candidate);
            return None;
        }

        let weakest = self
            .holders
            .iter()
            .enumerate()
            .reduce(|worst, current| if worst.1.outranks(current.1) { current } else { worst })
            .map(|(index, _)| index);

        match weakest {
            Some(index) if candidate.outranks(&self.holders[index]) => {
                let displaced = std::mem::replace(&mut self.holders[index], candidate);
                Some(displaced.student)
            }
            _ => Some(candidate.student),
        }
    }
}

/// Student-proposing deferred acceptance over capacity-bounded internships
///
/// Students propose down their own ranking (plain overall score). Each
/// internship keeps its best proposals up to capacity, ranking them by the
/// same score, or by a diversity-emphasised recombination of the components
/// when the boost is on. Pending proposals live in a worklist; every
/// proposal advances a student's cursor, so a run makes at most
/// `sum(len(ranked))` proposals.
#[derive(Debug, Clone, Copy)]
pub struct AllocationOptimizer {
    diversity_multiplier: f64,
}

impl AllocationOptimizer {
    pub fn new(diversity_multiplier: f64) -> Self {
        Self { diversity_multiplier }
    }

    pub fn diversity_multiplier(&self) -> f64 {
        self.diversity_multiplier
    }

    /// Resolve one assignment from per-student rankings and a capacity snapshot
    pub fn allocate(
        &self,
        preferences: &[StudentPreferences],
        capacities: &BTreeMap<String, u32>,
        weights: &ScoringWeights,
        diversity_boost: bool,
    ) -> Allocation {
        let priority_weights =
            diversity_boost.then(|| weights.with_diversity_emphasis(self.diversity_multiplier));

        let mut slots: HashMap<&str, Slot<'_>> = capacities
            .iter()
            .filter(|(_, capacity)| **capacity > 0)
            .map(|(id, capacity)| {
                (id.as_str(), Slot { capacity: *capacity as usize, holders: Vec::new() })
            })
            .collect();

        let mut next_choice = vec![0usize; preferences.len()];
        let mut pending: VecDeque<usize> = (0..preferences.len()).collect();
        let mut proposals = 0usize;

        while let Some(student) = pending.pop_front() {
            let prefs = &preferences[student];
            let Some(choice) = prefs.ranked.get(next_choice[student]) else {
                // List exhausted: the student stays unassigned
                continue;
            };
            next_choice[student] += 1;

            let Some(slot) = slots.get_mut(choice.internship_id.as_str()) else {
                pending.push_front(student);
                continue;
            };

            proposals += 1;
            let priority = match &priority_weights {
                Some(adjusted) => adjusted.combine(choice),
                None => choice.overall_score,
            };
            let holder = Holder {
                student,
                student_id: prefs.student_id.as_str(),
                priority,
            };

            if let Some(rejected) = slot.offer(holder) {
                pending.push_front(rejected);
            }
        }

        let mut assignments = BTreeMap::new();
        for (internship_id, slot) in &slots {
            for holder in &slot.holders {
                assignments.insert(holder.student_id.to_string(), internship_id.to_string());
            }
        }

        let mut reported = HashSet::new();
        let unassigned: Vec<String> = preferences
            .iter()
            .filter(|p| !assignments.contains_key(&p.student_id))
            .filter(|p| reported.insert(p.student_id.as_str()))
            .map(|p| p.student_id.clone())
            .collect();

        tracing::info!(
            "Allocated {} out of {} students ({} proposals)",
            assignments.len(),
            preferences.len(),
            proposals
        );

        Allocation {
            assignments,
            unassigned,
            proposals,
        }
    }
}

impl Default for AllocationOptimizer {
    fn default() -> Self {
        Self::new(DEFAULT_DIVERSITY_MULTIPLIER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchExplanation;

    fn score(student: &str, internship: &str, overall: f64, diversity: f64) -> MatchScore {
        MatchScore {
            student_id: student.to_string(),
            internship_id: internship.to_string(),
            overall_score: overall,
            skill_score: overall,
            qualification_score: overall,
            location_score: overall,
            sector_score: overall,
            diversity_score: diversity,
            explanation: MatchExplanation::default(),
        }
    }

    fn prefs(student: &str, ranked: &[(&str, f64)]) -> StudentPreferences {
        StudentPreferences {
            student_id: student.to_string(),
            ranked: ranked.iter().map(|(i, s)| score(student, i, *s, 0.5)).collect(),
        }
    }

    fn capacities(entries: &[(&str, u32)]) -> BTreeMap<String, u32> {
        entries.iter().map(|(id, c)| (id.to_string(), *c)).collect()
    }

    fn allocate(
        preferences: &[StudentPreferences],
        caps: &BTreeMap<String, u32>,
        diversity_boost: bool,
    ) -> Allocation {
        AllocationOptimizer::default().allocate(
            preferences,
            caps,
            &ScoringWeights::default(),
            diversity_boost,
        )
    }

    #[test]
    fn test_displaced_student_moves_to_next_choice() {
        let preferences = vec![
            prefs("S2", &[("I1", 0.7), ("I2", 0.6)]),
            prefs("S1", &[("I1", 0.9), ("I2", 0.5)]),
        ];
        let caps = capacities(&[("I1", 1), ("I2", 1)]);

        let allocation = allocate(&preferences, &caps, false);

        assert_eq!(allocation.assignments.get("S1").map(String::as_str), Some("I1"));
        assert_eq!(allocation.assignments.get("S2").map(String::as_str), Some("I2"));
        assert!(allocation.unassigned.is_empty());
    }

    #[test]
    fn test_capacity_never_exceeded() {
        let preferences: Vec<StudentPreferences> = (0..10)
            .map(|i| prefs(&format!("S{}", i), &[("I1", 0.5 + i as f64 * 0.01), ("I2", 0.4)]))
            .collect();
        let caps = capacities(&[("I1", 3), ("I2", 2)]);

        let allocation = allocate(&preferences, &caps, true);

        let mut per_internship: HashMap<&str, u32> = HashMap::new();
        for internship in allocation.assignments.values() {
            *per_internship.entry(internship.as_str()).or_default() += 1;
        }
        assert_eq!(per_internship.get("I1"), Some(&3));
        assert_eq!(per_internship.get("I2"), Some(&2));
        assert_eq!(allocation.total_allocated(), 5);
        assert_eq!(allocation.unassigned.len(), 5);
        assert_eq!(allocation.allocation_rate(10), 50.0);
    }

    #[test]
    fn test_highest_scores_win_contested_slots() {
        let preferences = vec![
            prefs("S1", &[("I1", 0.6)]),
            prefs("S2", &[("I1", 0.8)]),
            prefs("S3", &[("I1", 0.7)]),
        ];
        let caps = capacities(&[("I1", 2)]);

        let allocation = allocate(&preferences, &caps, false);

        assert!(allocation.assignments.contains_key("S2"));
        assert!(allocation.assignments.contains_key("S3"));
        assert_eq!(allocation.unassigned, vec!["S1".to_string()]);
    }

    #[test]
    fn test_diversity_boost_decides_contested_slot() {
        // S1 has the higher plain score, S2 the higher diversity component
        let preferences = vec![
            StudentPreferences {
                student_id: "S1".to_string(),
                ranked: vec![score("S1", "I1", 0.62, 0.5)],
            },
            StudentPreferences {
                student_id: "S2".to_string(),
                ranked: vec![score("S2", "I1", 0.60, 1.0)],
            },
        ];
        let caps = capacities(&[("I1", 1)]);
        let optimizer = AllocationOptimizer::default();
        let weights = ScoringWeights::default();

        let plain = optimizer.allocate(&preferences, &caps, &weights, false);
        let boosted = optimizer.allocate(&preferences, &caps, &weights, true);

        assert!(plain.assignments.contains_key("S1"));
        assert!(boosted.assignments.contains_key("S2"));
    }

    #[test]
    fn test_equal_priority_goes_to_smaller_id() {
        let preferences = vec![prefs("S9", &[("I1", 0.7)]), prefs("S1", &[("I1", 0.7)])];
        let caps = capacities(&[("I1", 1)]);

        let allocation = allocate(&preferences, &caps, false);

        assert!(allocation.assignments.contains_key("S1"));
        assert_eq!(allocation.unassigned, vec!["S9".to_string()]);
    }

    #[test]
    fn test_no_candidates_or_capacity_is_unassigned() {
        let preferences = vec![prefs("S1", &[]), prefs("S2", &[("I1", 0.9), ("I2", 0.9)])];
        let caps = capacities(&[("I1", 0)]);

        let allocation = allocate(&preferences, &caps, true);

        assert_eq!(allocation.total_allocated(), 0);
        assert_eq!(allocation.unassigned, vec!["S1".to_string(), "S2".to_string()]);
        assert_eq!(allocation.proposals, 0);
        assert_eq!(allocation.allocation_rate(0), 0.0);
    }

    #[test]
    fn test_proposals_bounded_by_list_lengths() {
        let preferences: Vec<StudentPreferences> = (0..6)
            .map(|i| {
                let first = 0.9 - i as f64 * 0.1;
                prefs(&format!("S{}", i), &[("I1", first), ("I2", 0.5), ("I3", 0.4)])
            })
            .collect();
        let caps = capacities(&[("I1", 1), ("I2", 1), ("I3", 1)]);

        let allocation = allocate(&preferences, &caps, false);

        let bound: usize = preferences.iter().map(|p| p.ranked.len()).sum();
        assert!(allocation.proposals <= bound);
        assert_eq!(allocation.total_allocated(), 3);
    }

    #[test]
    fn test_assignment_independent_of_proposal_order() {
        let mut preferences = vec![
            prefs("S1", &[("I1", 0.9), ("I2", 0.8)]),
            prefs("S2", &[("I1", 0.8), ("I3", 0.7)]),
            prefs("S3", &[("I2", 0.9), ("I1", 0.6)]),
            prefs("S4", &[("I2", 0.7), ("I3", 0.65)]),
        ];
        let caps = capacities(&[("I1", 1), ("I2", 1), ("I3", 1)]);
        let optimizer = AllocationOptimizer::default();
        let weights = ScoringWeights::default();

        let forward = optimizer.allocate(&preferences, &caps, &weights, true);
        preferences.reverse();
        let backward = optimizer.allocate(&preferences, &caps, &weights, true);

        assert_eq!(forward.assignments, backward.assignments);
        assert_eq!(forward.assignments.get("S1").map(String::as_str), Some("I1"));
        assert_eq!(forward.assignments.get("S3").map(String::as_str), Some("I2"));
        assert_eq!(forward.assignments.get("S2").map(String::as_str), Some("I3"));
        assert_eq!(forward.unassigned, vec!["S4".to_string()]);
    }
}
