//! Activity logging and querying

use chrono::NaiveDate;

use crate::core::clock::Clock;
use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::journal::{Journal, JournalError};
use crate::core::project::Project;
use crate::entities::activity::{ActivityEntry, ActivityType, EntityType};

/// Parameters of one activity to record
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub activity_type: ActivityType,
    pub entity_type: EntityType,
    pub entity_id: Option<EntityId>,
    pub entity_name: Option<String>,
    pub description: String,
    pub metadata: Option<serde_json::Value>,
}

impl NewActivity {
    pub fn new(activity_type: ActivityType, entity_type: EntityType, description: impl Into<String>) -> Self {
        Self {
            activity_type,
            entity_type,
            entity_id: None,
            entity_name: None,
            description: description.into(),
            metadata: None,
        }
    }

    pub fn entity(mut self, id: EntityId, name: impl Into<String>) -> Self {
        self.entity_id = Some(id);
        self.entity_name = Some(name.into());
        self
    }

    pub fn metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Writes activity entries to the project's activity journal
pub struct ActivityLogger<'a> {
    journal: Journal<ActivityEntry>,
    actor: String,
    clock: &'a dyn Clock,
}

impl<'a> ActivityLogger<'a> {
    pub fn new(project: &Project, actor: impl Into<String>, clock: &'a dyn Clock) -> Self {
        Self {
            journal: Journal::new(project.activity_log_path()),
            actor: actor.into(),
            clock,
        }
    }

    /// Record an activity
    ///
    /// Failing to write the log never fails the command that triggered it;
    /// the problem is reported as a warning instead.
    pub fn log(&self, activity: NewActivity) -> Option<ActivityEntry> {
        let entry = ActivityEntry {
            id: EntityId::new(EntityPrefix::Act),
            activity_type: activity.activity_type,
            entity_type: activity.entity_type,
            entity_id: activity.entity_id,
            entity_name: activity.entity_name,
            description: activity.description,
            metadata: activity.metadata,
            actor: self.actor.clone(),
            created: self.clock.now(),
        };

        match self.journal.append(&entry) {
            Ok(()) => {
                log::debug!("Logged activity {} ({})", entry.id, entry.activity_type);
                Some(entry)
            }
            Err(e) => {
                log::warn!("Failed to log activity: {}", e);
                None
            }
        }
    }
}

/// Filters for querying the activity log
#[derive(Debug, Clone, Default)]
pub struct ActivityFilter {
    pub activity_type: Option<ActivityType>,
    pub entity_type: Option<EntityType>,
    pub since: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
    pub limit: Option<usize>,
}

impl ActivityFilter {
    pub fn matches(&self, entry: &ActivityEntry) -> bool {
        let date = entry.created.date_naive();
        self.activity_type.is_none_or(|t| entry.activity_type == t)
            && self.entity_type.is_none_or(|t| entry.entity_type == t)
            && self.since.is_none_or(|d| date >= d)
            && self.until.is_none_or(|d| date <= d)
    }

    /// Apply to entries, returning newest first
    pub fn apply(&self, entries: Vec<ActivityEntry>) -> Vec<ActivityEntry> {
        let mut matched: Vec<ActivityEntry> = entries.into_iter().filter(|e| self.matches(e)).collect();
        // Journal order breaks timestamp ties: later appends come first
        matched.reverse();
        matched.sort_by(|a, b| b.created.cmp(&a.created));
        if let Some(limit) = self.limit {
            matched.truncate(limit);
        }
        matched
    }
}

/// Read the whole activity log, oldest first
pub fn load_activity(project: &Project) -> Result<Vec<ActivityEntry>, JournalError> {
    Journal::new(project.activity_log_path()).read_all()
}

/// Query the activity log, newest first
pub fn query_activity(project: &Project, filter: &ActivityFilter) -> Result<Vec<ActivityEntry>, JournalError> {
    Ok(filter.apply(load_activity(project)?))
}
