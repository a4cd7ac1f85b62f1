/// Database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Lookup-table ids are SMALLINT, matching the seeded `item_statuses` rows.
pub type StatusId = i16;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
