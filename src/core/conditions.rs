use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{JobRequirements, RequestProfile};

/// The conditions an application is scored on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchCondition {
    Experience,
    NoticePeriod,
    WorkMode,
    JobType,
    Location,
    Qualification,
    Skill,
    Shift,
}

impl MatchCondition {
    pub const ALL: [MatchCondition; 8] = [
        MatchCondition::Experience,
        MatchCondition::NoticePeriod,
        MatchCondition::WorkMode,
        MatchCondition::JobType,
        MatchCondition::Location,
        MatchCondition::Qualification,
        MatchCondition::Skill,
        MatchCondition::Shift,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchCondition::Experience => "experience",
            MatchCondition::NoticePeriod => "notice_period",
            MatchCondition::WorkMode => "work_mode",
            MatchCondition::JobType => "job_type",
            MatchCondition::Location => "location",
            MatchCondition::Qualification => "qualification",
            MatchCondition::Skill => "skill",
            MatchCondition::Shift => "shift",
        }
    }

    /// Check whether the candidate's profile satisfies this condition for the job
    ///
    /// Thresholds compare with `>=`. ID categories are satisfied by any shared ID.
    #[inline]
    pub fn is_satisfied(&self, profile: &RequestProfile, job: &JobRequirements) -> bool {
        match self {
            MatchCondition::Experience => profile.experience >= job.min_experience,
            MatchCondition::NoticePeriod => profile.notice_period >= job.min_notice_period,
            MatchCondition::WorkMode => shares_any(&profile.work_mode_ids, &job.work_mode_ids),
            MatchCondition::JobType => shares_any(&profile.job_type_ids, &job.job_type_ids),
            MatchCondition::Location => shares_any(&profile.location_ids, &job.location_ids),
            MatchCondition::Qualification => {
                shares_any(&profile.qualification_ids, &job.qualification_ids)
            }
            MatchCondition::Skill => shares_any(&profile.skill_ids, &job.skill_ids),
            MatchCondition::Shift => shares_any(&profile.shift_ids, &job.shift_ids),
        }
    }
}

impl fmt::Display for MatchCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// True as soon as one offered ID appears among the required ones
#[inline]
pub fn shares_any(offered: &[u64], required: &[u64]) -> bool {
    offered.iter().any(|id| required.contains(id))
}
