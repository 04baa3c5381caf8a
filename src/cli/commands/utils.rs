//! Shared utilities for CLI commands

use miette::Result;

use crate::cli::GlobalOpts;
use crate::core::activity::{ActivityLogger, NewActivity};
use crate::core::clock::Clock;
use crate::core::project::Project;
use crate::core::shortid::ShortIdIndex;
use crate::core::store::ProductStore;
use crate::core::Config;
use crate::entities::activity::ActivityEntry;

/// Everything a project command needs: the project, its config and the clock
pub struct Session {
    pub project: Project,
    pub config: Config,
    pub clock: Box<dyn Clock>,
}

impl Session {
    pub fn open(global: &GlobalOpts) -> Result<Self> {
        let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
        let config = Config::load_for(Some(&project));
        let clock = global.clock()?;
        Ok(Self {
            project,
            config,
            clock,
        })
    }

    pub fn store(&self) -> ProductStore<'_> {
        ProductStore::new(&self.project)
    }

    pub fn short_ids(&self) -> ShortIdIndex {
        ShortIdIndex::load(&self.project)
    }

    /// Record an activity as the configured author
    pub fn log_activity(&self, activity: NewActivity) -> Option<ActivityEntry> {
        ActivityLogger::new(&self.project, self.config.author(), self.clock.as_ref()).log(activity)
    }
}
