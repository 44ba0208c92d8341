use std::collections::HashSet;

use crate::error::MatchError;
use crate::models::{Internship, RecordKind, RejectedRecord, Student};

/// Hard eligibility gate applied before any scoring
///
/// Only structurally infeasible internships are removed here. Soft
/// mismatches (skills, qualification) are left to scoring so that weak
/// matches stay visible.
#[inline]
pub fn is_eligible(internship: &Internship) -> bool {
    internship.is_active && internship.remaining_capacity() > 0
}

/// Internships a student may be scored against, in input order
pub fn candidates<'a>(student: &Student, internships: &[&'a Internship]) -> Vec<&'a Internship> {
    let eligible: Vec<&'a Internship> = internships
        .iter()
        .copied()
        .filter(|internship| is_eligible(internship))
        .collect();

    if eligible.is_empty() {
        tracing::warn!("No available internships for student {}", student.student_id);
    }

    eligible
}

/// Record-level check on a single student at `index`
pub fn check_student(index: usize, student: &Student) -> Result<(), MatchError> {
    if student.student_id.trim().is_empty() {
        return Err(MatchError::MissingStudentId { index });
    }
    match student.missing_field() {
        Some(field) => Err(MatchError::IncompleteStudent { index, field }),
        None => Ok(()),
    }
}

/// Record-level check on a single internship at `index`
pub fn check_internship(index: usize, internship: &Internship) -> Result<(), MatchError> {
    if internship.internship_id.trim().is_empty() {
        return Err(MatchError::MissingInternshipId { index });
    }
    match internship.missing_field() {
        Some(field) => Err(MatchError::IncompleteInternship { index, field }),
        None => Ok(()),
    }
}

/// Split students into processable records and rejected ones
///
/// A record is rejected when its identifier is blank, a required field is
/// missing, or it repeats the identifier of an earlier accepted record.
/// The first complete occurrence of an identifier wins.
pub fn validate_students(students: &[Student]) -> (Vec<&Student>, Vec<RejectedRecord>) {
    partition_records(
        students,
        RecordKind::Student,
        |s| &s.student_id,
        check_student,
        MatchError::DuplicateStudentId,
    )
}

/// Split internships into processable records and rejected ones
pub fn validate_internships(internships: &[Internship]) -> (Vec<&Internship>, Vec<RejectedRecord>) {
    partition_records(
        internships,
        RecordKind::Internship,
        |i| &i.internship_id,
        check_internship,
        MatchError::DuplicateInternshipId,
    )
}

fn partition_records<'a, T>(
    records: &'a [T],
    kind: RecordKind,
    id_of: impl Fn(&T) -> &String,
    check: impl Fn(usize, &T) -> Result<(), MatchError>,
    duplicate: impl Fn(String) -> MatchError,
) -> (Vec<&'a T>, Vec<RejectedRecord>) {
    let mut seen = HashSet::new();
    let mut accepted = Vec::with_capacity(records.len());
    let mut rejected = Vec::new();

    for (index, record) in records.iter().enumerate() {
        let id = id_of(record);

        let outcome = check(index, record).and_then(|()| {
            if seen.insert(id.as_str()) {
                Ok(())
            } else {
                Err(duplicate(id.clone()))
            }
        });

        match outcome {
            Ok(()) => accepted.push(record),
            Err(error) => {
                tracing::warn!("Rejecting {:?} record at position {}: {}", kind, index, error);
                rejected.push(RejectedRecord {
                    kind,
                    index,
                    id: (!id.trim().is_empty()).then(|| id.clone()),
                    reason: error.to_string(),
                });
            }
        }
    }

    (accepted, rejected)
}
