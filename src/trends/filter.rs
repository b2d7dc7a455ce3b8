use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, Condition};

use super::Granularity;
use crate::entity::readings;

/// Operator-selected filter set for one pipeline evaluation.
///
/// An empty site or room set means "no filter" and passes everything.
/// `start > end` is legal and simply matches no readings; downstream
/// handles the empty result as a no-data outcome, not an error.
#[derive(Debug, Clone)]
pub struct FilterCriteria {
    /// Inclusive lower timestamp bound
    pub start: DateTime<Utc>,
    /// Inclusive upper timestamp bound
    pub end: DateTime<Utc>,
    pub sites: Vec<String>,
    pub rooms: Vec<String>,
    pub granularity: Granularity,
}

impl FilterCriteria {
    /// Evaluate the predicate against a single reading.
    #[must_use]
    pub fn matches(&self, reading: &readings::Model) -> bool {
        let ts = reading.ts.with_timezone(&Utc);
        ts >= self.start
            && ts <= self.end
            && (self.sites.is_empty() || self.sites.iter().any(|s| *s == reading.site))
            && (self.rooms.is_empty() || self.rooms.iter().any(|r| *r == reading.room))
    }

    /// The same predicate as a sea-orm condition, for pushdown into the
    /// warehouse query.
    #[must_use]
    pub fn condition(&self) -> Condition {
        let mut cond = Condition::all()
            .add(readings::Column::Ts.gte(self.start))
            .add(readings::Column::Ts.lte(self.end));

        if !self.sites.is_empty() {
            cond = cond.add(readings::Column::Site.is_in(self.sites.clone()));
        }
        if !self.rooms.is_empty() {
            cond = cond.add(readings::Column::Room.is_in(self.rooms.clone()));
        }

        cond
    }
}
