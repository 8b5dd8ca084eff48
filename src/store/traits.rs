//! Store interfaces for setup persistence.
//!
//! Three narrow collaborators instead of one wide trait: the grinder record,
//! the basket profiles, and the completion flag are owned by different parts
//! of the app once setup is over.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::equipment::{BasketConfig, GrinderConfig};
use crate::error::DatabaseError;

/// Persistence for the grinder scale configuration — a single logical record.
#[async_trait]
pub trait GrinderConfigStore: Send + Sync {
    /// Upsert the grinder configuration.
    async fn save(&self, config: &GrinderConfig) -> Result<(), DatabaseError>;

    /// Return the stored configuration, creating and persisting the default
    /// when none exists yet.
    async fn get_or_create_default(&self) -> Result<GrinderConfig, DatabaseError>;

    /// Return the stored configuration, if any.
    async fn current(&self) -> Result<Option<GrinderConfig>, DatabaseError>;
}

/// Persistence for basket dose profiles.
#[async_trait]
pub trait BasketConfigStore: Send + Sync {
    /// Upsert a basket profile. Saving an active profile deactivates any
    /// previously active row — at most one stays active.
    async fn save(&self, config: &BasketConfig) -> Result<(), DatabaseError>;

    /// The currently active basket profile, if any.
    async fn active(&self) -> Result<Option<BasketConfig>, DatabaseError>;
}

/// Tracks whether first-run setup has finished.
#[async_trait]
pub trait SetupStatusStore: Send + Sync {
    /// Record that setup finished. Idempotent: repeated calls keep the
    /// original completion timestamp.
    async fn mark_complete(&self) -> Result<(), DatabaseError>;

    async fn is_complete(&self) -> Result<bool, DatabaseError>;

    /// When setup first completed, if it has.
    async fn completed_at(&self) -> Result<Option<DateTime<Utc>>, DatabaseError>;
}
