//! Resolution settings.

use millwork_math::Tolerance;
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// How the part extractor merges identical parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupPolicy {
    /// Every part is listed individually.
    Off,
    /// Merge parts with equal world extents, material, edges and machining.
    #[default]
    Exact,
    /// Merge parts with equal cut size, grain, material, edges and machining,
    /// regardless of how they are oriented in the assembly.
    CutSize,
}

/// Settings for one resolution pass.
///
/// ```
/// use millwork_kernel::{DedupPolicy, ResolveSettings};
///
/// let settings = ResolveSettings::from_toml_str("partial = true\ndedup = \"cut_size\"").unwrap();
/// assert!(settings.partial);
/// assert_eq!(settings.dedup, DedupPolicy::CutSize);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolveSettings {
    /// Skip failing subtrees and collect their errors instead of aborting.
    pub partial: bool,
    /// Resolve sibling cells on the rayon thread pool.
    pub parallel: bool,
    /// Part merge policy used by extraction.
    pub dedup: DedupPolicy,
    /// Linear tolerance in mm.
    pub tolerance: f64,
}

impl Default for ResolveSettings {
    fn default() -> Self {
        Self {
            partial: false,
            parallel: false,
            dedup: DedupPolicy::Exact,
            tolerance: Tolerance::DEFAULT.linear,
        }
    }
}

impl ResolveSettings {
    /// Parse and validate settings from TOML text. Missing keys take defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
        let settings: ResolveSettings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate settings.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(SettingsError::Invalid(
                "tolerance must be a positive number of millimeters".into(),
            ));
        }
        if self.tolerance > 1.0 {
            return Err(SettingsError::Invalid(
                "tolerance above 1mm would merge distinct panels".into(),
            ));
        }
        Ok(())
    }

    /// The linear tolerance as a [`Tolerance`].
    pub fn tol(&self) -> Tolerance {
        Tolerance::new(self.tolerance)
    }
}
