//! Finalization gate
//!
//! Completeness and consistency checks run before a session may be scored
//! for export. Checks run in a fixed order and the first failure is returned,
//! so the interviewer always sees the earliest problem first.

use crate::rubric::Rubric;
use crate::session::{is_valid_interview_date, InterviewSession};
use crate::ValidationError;

/// Validate `session` for export
///
/// Order: candidate name, interview date, location, track, then every trait
/// resolved for the track in declared order (score present and 1-5, verbatim
/// notes present when the disqualifier is flagged).
pub fn validate(session: &InterviewSession, rubric: &Rubric) -> Result<(), ValidationError> {
    let candidate = &session.candidate;

    if candidate.name.trim().is_empty() {
        return Err(ValidationError::MissingCandidateName);
    }
    let date = candidate.interview_date.trim();
    if !is_valid_interview_date(date) {
        return Err(ValidationError::InvalidInterviewDate(date.to_string()));
    }
    if candidate.school.trim().is_empty() {
        return Err(ValidationError::MissingLocation);
    }
    let track = session.track().ok_or(ValidationError::MissingTrack)?;

    for t in rubric.traits_for_track(track) {
        match session.input(&t.id) {
            Some(input) => input.check(t)?,
            None => {
                return Err(ValidationError::MissingRawScore {
                    trait_id: t.id.clone(),
                    trait_name: t.name.clone(),
                })
            }
        }
    }

    Ok(())
}
