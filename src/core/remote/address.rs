//! Remote addressing scheme.
//!
//! Maps (project, stage) to a flat storage key. Before stages existed,
//! a project stored a single object under its bare project id; reads of
//! the default stage still fall back to that legacy key, while writes
//! always use the modern per-stage key. The fallback is an ordered
//! candidate list walked in priority order, not exception-driven
//! control flow.

use crate::core::constants::DEFAULT_STAGE;

/// Which addressing generation a candidate key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Modern per-stage key.
    Primary,
    /// Pre-stage single object per project.
    Legacy,
}

/// One resolvable storage location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub key: String,
    pub source: Source,
}

/// The primary storage key for a project stage.
pub fn locate(project_id: &str, stage: &str) -> String {
    format!("{}.{}", project_id, stage)
}

/// The legacy storage key, from before stage namespacing existed.
pub fn locate_legacy(project_id: &str) -> String {
    project_id.to_string()
}

/// Ordered read candidates: the primary key, then the legacy key when
/// (and only when) the stage is the default stage.
pub fn read_candidates(project_id: &str, stage: &str) -> Vec<Candidate> {
    let mut candidates = vec![Candidate {
        key: locate(project_id, stage),
        source: Source::Primary,
    }];

    if stage == DEFAULT_STAGE {
        candidates.push(Candidate {
            key: locate_legacy(project_id),
            source: Source::Legacy,
        });
    }

    candidates
}

/// The write key. Always primary — new writes never touch the legacy
/// location, so old data ages out without a migration step.
pub fn write_key(project_id: &str, stage: &str) -> String {
    locate(project_id, stage)
}
