//! Scripted thinking steps

/// Steps shown while generating content for the first time
pub const GENERATION_STEPS: &[&str] = &[
    "Reading your brief",
    "Identifying the target audience",
    "Reviewing channel best practices",
    "Drafting key messages",
    "Choosing a tone of voice",
    "Writing the first version",
    "Writing an alternative version",
    "Polishing the copy",
];

/// Steps shown while revising existing content
pub const REVISION_STEPS: &[&str] = &[
    "Reviewing your feedback",
    "Finding the passages to change",
    "Applying revisions",
];

/// Script for a run
pub(crate) fn steps_for(is_revision: bool) -> &'static [&'static str] {
    if is_revision {
        REVISION_STEPS
    } else {
        GENERATION_STEPS
    }
}
