use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use crate::assets::compress::CompressionOpts;
use crate::controller::keys::KeyBindings;
use crate::controller::manip::{ManipulationController, StepConfig};
use crate::foundation::core::Vec2;
use crate::foundation::error::{EditorError, EditorResult};
use crate::geometry::fit::FitPolicy;
use crate::render::cpu::CompositorOpts;
use crate::transform::model::{ScaleBounds, Transform};

/// Editor settings, loaded from JSON. Every field has a default, so `{}` is a valid config.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Increments for discrete key and button steps.
    pub steps: StepConfig,
    /// Range scale factors are clamped into.
    pub scale_bounds: ScaleBounds,
    /// Transform the overlay is mounted with.
    pub initial: Transform,
    /// On-screen overlay width at scale 1, in display pixels.
    pub overlay_display_width: f64,
    /// How the background is fitted into the container.
    pub fit: FitPolicy,
    /// Upper bound on loading both images during save. A load that runs over keeps its
    /// workers, and the next save resumes waiting on them.
    pub load_timeout_ms: u64,
    /// Key name to button map; replaces the defaults entirely when present.
    pub key_bindings: KeyBindings,
    /// Upload preparation settings.
    pub compression: CompressionOpts,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            steps: StepConfig::default(),
            scale_bounds: ScaleBounds::default(),
            initial: Transform::default(),
            overlay_display_width: 200.0,
            fit: FitPolicy::Contain,
            load_timeout_ms: 10_000,
            key_bindings: KeyBindings::default(),
            compression: CompressionOpts::default(),
        }
    }
}

impl EditorConfig {
    /// Parse a config from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> EditorResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| EditorError::validation(format!("parse editor config JSON: {e}")))
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> EditorResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            EditorError::validation(format!("open editor config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check ranges that serde cannot express.
    pub fn validate(&self) -> EditorResult<()> {
        self.steps.validate()?;
        self.scale_bounds.validate()?;
        if !self.initial.is_finite() {
            return Err(EditorError::validation("initial transform must be finite"));
        }
        if !self.overlay_display_width.is_finite() || self.overlay_display_width <= 0.0 {
            return Err(EditorError::validation(
                "overlay_display_width must be finite and > 0",
            ));
        }
        if self.load_timeout_ms == 0 {
            return Err(EditorError::validation("load_timeout_ms must be > 0"));
        }
        if self.compression.max_width == 0 || self.compression.max_height == 0 {
            return Err(EditorError::validation(
                "compression max dimensions must be > 0",
            ));
        }
        if !(1..=100).contains(&self.compression.quality) {
            return Err(EditorError::validation("compression quality must be in 1..=100"));
        }
        Ok(())
    }

    /// Image loading budget.
    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }

    /// Compositor options derived from this config.
    pub fn compositor_opts(&self) -> CompositorOpts {
        CompositorOpts {
            overlay_display_width: self.overlay_display_width,
            fit: self.fit,
            clear_rgba: None,
        }
    }

    /// A controller at the initial transform for an overlay shown at `overlay_size`.
    pub fn controller(&self, overlay_size: Vec2) -> ManipulationController {
        ManipulationController::new(
            self.initial,
            overlay_size,
            self.scale_bounds,
            self.steps,
            self.key_bindings.clone(),
        )
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
