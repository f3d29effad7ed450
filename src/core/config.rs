use serde::{Deserialize, Serialize};

/// Version string rendered on `infModal` when the payload carries none.
pub const DEFAULT_MODAL_VERSION: &str = "4.00";

/// Maximum number of `det` entries an NF-e may carry.
pub const MAX_NFE_ITEMS: usize = 990;

/// Settings shared by the validators, encoders and [`Emitter`](super::Emitter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// `versaoModal` used when `infModal.versaoModal` is absent.
    pub default_modal_version: String,
    /// Upper bound on NF-e line items.
    pub max_items: usize,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            default_modal_version: DEFAULT_MODAL_VERSION.into(),
            max_items: MAX_NFE_ITEMS,
        }
    }
}

/// Builder for [`EmitterConfig`].
///
/// # Example
///
/// ```
/// use dfe::core::EmitterConfigBuilder;
///
/// let config = EmitterConfigBuilder::new()
///     .default_modal_version("3.00")
///     .max_items(50)
///     .build();
/// assert_eq!(config.max_items, 50);
/// ```
#[derive(Debug, Default)]
pub struct EmitterConfigBuilder {
    config: EmitterConfig,
}

impl EmitterConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback `versaoModal`.
    pub fn default_modal_version(mut self, version: impl Into<String>) -> Self {
        self.config.default_modal_version = version.into();
        self
    }

    /// Set the NF-e line item limit.
    pub fn max_items(mut self, max: usize) -> Self {
        self.config.max_items = max;
        self
    }

    pub fn build(self) -> EmitterConfig {
        self.config
    }
}
