//! Database layer (SQLite via sqlx).

pub mod content;
pub mod staging;

pub use content::ContentStore;
pub use staging::StagingStore;

/// Post type for imported activities.
pub const ACTIVITY_POST_TYPE: &str = "strava_activity";

/// Status of live posts.
pub const STATUS_PUBLISH: &str = "publish";

/// Table names as constants.
pub mod tables {
    /// Content tables owned by this service.
    pub const POSTS: &str = "posts";
    pub const POST_META: &str = "post_meta";
    /// Staging tables populated by the upstream sync pipeline (read-only).
    pub const STAGING_RAW: &str = "strava_activities_raw";
    pub const STAGING_NORMALIZED: &str = "strava_activities";
}

/// Meta keys attached to activity posts.
pub mod meta_keys {
    /// Strava activity id, the reconciliation key
    pub const ACTIVITY_ID: &str = "_strava_activity_id";
    /// Full serialized activity record, used for re-rendering
    pub const ACTIVITY_DATA: &str = "_strava_activity_data";
    /// Normalized category, used for icon lookup at render time
    pub const ACTIVITY_TYPE: &str = "_strava_activity_type";
}
