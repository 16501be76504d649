//! Configuration for slotdb
//!
//! Centralized configuration with sensible defaults.

/// Default maximum bytes per text field (including the reserved terminator byte)
pub const DEFAULT_MAX_DATA: i32 = 512;

/// Default slot capacity
pub const DEFAULT_MAX_ROWS: i32 = 100;

/// Largest slot capacity a store accepts. Every slot is allocated up front.
pub const MAX_ROWS_LIMIT: i32 = 1 << 20;

/// Main configuration for a slotdb session
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Capacity Configuration (used only when creating a new file)
    // -------------------------------------------------------------------------
    /// Maximum bytes per text field. Content is limited to `max_data - 1` bytes.
    pub max_data: i32,

    /// Total number of slots
    pub max_rows: i32,

    // -------------------------------------------------------------------------
    // Record Configuration
    // -------------------------------------------------------------------------
    /// What to do with a name/email longer than `max_data - 1` bytes
    pub field_policy: FieldPolicy,

    // -------------------------------------------------------------------------
    // Persistence Configuration
    // -------------------------------------------------------------------------
    /// Save after every mutating command
    pub autosave: bool,

    /// fsync the file at the end of every save
    pub sync_on_save: bool,
}

/// Policy for text fields exceeding the configured maximum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldPolicy {
    /// Fail with `FieldTooLong`
    #[default]
    Reject,

    /// Cut the field down to `max_data - 1` bytes (on a char boundary)
    Truncate,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_data: DEFAULT_MAX_DATA,
            max_rows: DEFAULT_MAX_ROWS,
            field_policy: FieldPolicy::Reject,
            autosave: true,
            sync_on_save: true,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the maximum field size (in bytes)
    pub fn max_data(mut self, max_data: i32) -> Self {
        self.config.max_data = max_data;
        self
    }

    /// Set the number of slots
    pub fn max_rows(mut self, max_rows: i32) -> Self {
        self.config.max_rows = max_rows;
        self
    }

    /// Set the policy for oversized fields
    pub fn field_policy(mut self, policy: FieldPolicy) -> Self {
        self.config.field_policy = policy;
        self
    }

    /// Enable or disable saving after each mutation
    pub fn autosave(mut self, enabled: bool) -> Self {
        self.config.autosave = enabled;
        self
    }

    /// Enable or disable fsync on save
    pub fn sync_on_save(mut self, enabled: bool) -> Self {
        self.config.sync_on_save = enabled;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
