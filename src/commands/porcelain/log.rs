use crate::areas::refs::{HEAD_REF_NAME, Head};
use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{KitError, Result};
use chrono::{DateTime, FixedOffset, Utc};
use std::collections::HashMap;

/// One commit of `log` output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub oid: ObjectId,
    pub commit: Commit,
    /// Refs pointing at this commit: HEAD first, then branches, then tags
    pub decorations: Vec<String>,
}

impl LogEntry {
    /// Age of the commit relative to now, e.g. `3 days ago`
    pub fn age(&self) -> String {
        relative_age(self.commit.timestamp(), Utc::now().fixed_offset())
    }
}

impl Repository {
    /// History reachable from HEAD, newest first; empty on an unborn branch
    pub fn log(&self) -> Result<Vec<LogEntry>> {
        let Some(head_oid) = self.refs().head_commit()? else {
            return Ok(Vec::new());
        };

        let mut decorations = self.decorations()?;
        let mut entries = Vec::new();

        for oid in self.history(&head_oid)? {
            let commit = self
                .database()
                .parse_object_as_commit(&oid)?
                .ok_or_else(|| KitError::corrupt_object(oid.as_ref(), "not a commit"))?;

            entries.push(LogEntry {
                decorations: decorations.remove(&oid).unwrap_or_default(),
                oid,
                commit,
            });
        }

        Ok(entries)
    }

    fn decorations(&self) -> Result<HashMap<ObjectId, Vec<String>>> {
        let mut decorations = HashMap::<ObjectId, Vec<String>>::new();
        let head = self.refs().read_head()?;

        match &head {
            Head::Symbolic(branch) => {
                if let Some(tip) = self.refs().read_branch(branch)? {
                    decorations
                        .entry(tip)
                        .or_default()
                        .push(format!("{HEAD_REF_NAME} -> {branch}"));
                }
            }
            Head::Detached(oid) => {
                decorations
                    .entry(oid.clone())
                    .or_default()
                    .push(HEAD_REF_NAME.to_string());
            }
        }

        for (name, tip) in self.refs().list_branches()? {
            if matches!(&head, Head::Symbolic(current) if *current == name) {
                continue;
            }
            decorations.entry(tip).or_default().push(name);
        }

        for (name, target) in self.refs().list_tags()? {
            if let Some(commit_oid) = self.peel_to_commit(&target)? {
                decorations
                    .entry(commit_oid)
                    .or_default()
                    .push(format!("tag: {name}"));
            }
        }

        Ok(decorations)
    }
}

/// Most significant unit of the time elapsed between `then` and `now`
pub fn relative_age(then: DateTime<FixedOffset>, now: DateTime<FixedOffset>) -> String {
    let seconds = (now - then).num_seconds();
    let units = [
        (365 * 24 * 3600, "year"),
        (30 * 24 * 3600, "month"),
        (24 * 3600, "day"),
        (3600, "hour"),
        (60, "minute"),
        (1, "second"),
    ];

    for (unit_seconds, unit) in units {
        let count = seconds / unit_seconds;
        if count > 0 {
            let plural = if count > 1 { "s" } else { "" };
            return format!("{count} {unit}{plural} ago");
        }
    }

    "just now".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rstest::rstest;

    #[rstest]
    #[case(Duration::zero(), "just now")]
    #[case(Duration::seconds(1), "1 second ago")]
    #[case(Duration::seconds(59), "59 seconds ago")]
    #[case(Duration::minutes(2), "2 minutes ago")]
    #[case(Duration::hours(1), "1 hour ago")]
    #[case(Duration::days(3), "3 days ago")]
    #[case(Duration::days(65), "2 months ago")]
    #[case(Duration::days(800), "2 years ago")]
    fn reports_the_most_significant_unit(#[case] elapsed: Duration, #[case] expected: &str) {
        let now = Utc::now().fixed_offset();

        assert_eq!(relative_age(now - elapsed, now), expected);
    }

    #[test]
    fn future_timestamps_are_just_now() {
        let now = Utc::now().fixed_offset();

        assert_eq!(relative_age(now + Duration::hours(1), now), "just now");
    }
}
