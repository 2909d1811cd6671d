use crate::assets::loader::{ImageSource, LoadedPair, PendingLoad};
use crate::config::EditorConfig;
use crate::controller::manip::ManipulationController;
use crate::foundation::core::{DisplaySize, Vec2};
use crate::foundation::error::{EditorError, EditorResult};
use crate::render::cpu::{CompositeImage, Compositor, overlay_display_size};
use crate::render::encode::{CompositeBlob, to_blob};

/// What [`AvatarEditor::save`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The composite was produced and handed to the save callback.
    Saved,
    /// The container has not been measured yet; nothing was loaded and the callback did not run.
    Deferred,
}

/// One editing session: a background, an overlay, and the overlay's placement.
///
/// The editor owns the [`ManipulationController`]; input goes through
/// [`AvatarEditor::controller_mut`] and [`AvatarEditor::save`] reads the controller's transform
/// as-is. Neither save nor cancel touches the inputs.
pub struct AvatarEditor {
    background: ImageSource,
    overlay: ImageSource,
    controller: ManipulationController,
    container: Option<DisplaySize>,
    config: EditorConfig,
    compositor: Compositor,
    job_id: Option<String>,
    loaded: Option<LoadedPair>,
    pending: Option<PendingLoad>,
}

impl AvatarEditor {
    /// Mount the editor over `background` with `overlay` at the configured initial transform.
    ///
    /// The overlay is assumed square until it has been loaded and its aspect ratio is known.
    pub fn new(
        background: ImageSource,
        overlay: ImageSource,
        config: EditorConfig,
    ) -> EditorResult<Self> {
        config.validate()?;
        let w = config.overlay_display_width;
        let controller = config.controller(Vec2::new(w, w));
        let compositor = Compositor::new(config.compositor_opts());
        Ok(Self {
            background,
            overlay,
            controller,
            container: None,
            config,
            compositor,
            job_id: None,
            loaded: None,
            pending: None,
        })
    }

    /// Attach the generation job id used for the download file name.
    pub fn with_job_id(mut self, job_id: impl Into<String>) -> Self {
        self.job_id = Some(job_id.into());
        self
    }

    /// Job id, if any.
    pub fn job_id(&self) -> Option<&str> {
        self.job_id.as_deref()
    }

    /// Record the container size after layout. Unmeasured sizes clear the measurement.
    pub fn measure_container(&mut self, size: DisplaySize) {
        self.container = size.is_measured().then_some(size);
    }

    /// Last measured container.
    pub fn container(&self) -> Option<DisplaySize> {
        self.container
    }

    /// Read access to the manipulation state.
    pub fn controller(&self) -> &ManipulationController {
        &self.controller
    }

    /// Route pointer and keyboard input here.
    pub fn controller_mut(&mut self) -> &mut ManipulationController {
        &mut self.controller
    }

    /// Config the editor was mounted with.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Load both images, cache them, and size the overlay from its native aspect ratio.
    ///
    /// A load that times out stays in flight, and the next call resumes waiting on it.
    pub fn load(&mut self) -> EditorResult<&LoadedPair> {
        let pair = self.load_pair()?;
        self.adopt(pair)
    }

    fn load_pair(&mut self) -> EditorResult<LoadedPair> {
        let mut pending = match self.pending.take() {
            Some(pending) => pending,
            None => PendingLoad::spawn(&self.background, &self.overlay)?,
        };
        match pending.wait(self.config.load_timeout()) {
            Err(e @ EditorError::Timeout(_)) => {
                self.pending = Some(pending);
                Err(e)
            }
            res => res,
        }
    }

    fn adopt(&mut self, pair: LoadedPair) -> EditorResult<&LoadedPair> {
        let size = overlay_display_size(pair.overlay.size()?, self.config.overlay_display_width);
        self.controller.set_overlay_size(size);
        Ok(self.loaded.insert(pair))
    }

    /// Render the on-screen view at container resolution. Loads the images on first use.
    ///
    /// Returns `Ok(None)` while the container is unmeasured.
    pub fn preview(&mut self) -> EditorResult<Option<CompositeImage>> {
        let Some(container) = self.container else {
            return Ok(None);
        };
        if self.loaded.is_none() {
            self.load()?;
        }
        let Some(pair) = self.loaded.as_ref() else {
            return Ok(None);
        };
        let t = self.controller.transform();
        self.compositor
            .render_preview(pair, &t, container)
            .map(Some)
    }

    /// Composite at the background's native resolution and hand the PNG to `on_save`.
    ///
    /// Both images are (re)loaded; a load that timed out earlier is resumed rather than
    /// restarted. On any failure the callback is not invoked, the error is
    /// returned, and the editor stays usable.
    #[tracing::instrument(skip_all, fields(job_id = self.job_id.as_deref().unwrap_or("")))]
    pub fn save(&mut self, on_save: impl FnOnce(CompositeBlob)) -> EditorResult<SaveOutcome> {
        let Some(container) = self.container else {
            tracing::warn!("save requested before the container was measured");
            return Ok(SaveOutcome::Deferred);
        };

        let pair = self
            .load_pair()
            .inspect_err(|e| tracing::error!(error = %e, "failed to load images for composite"))?;
        let t = self.controller.transform();
        self.adopt(pair)?;
        let pair = self
            .loaded
            .as_ref()
            .ok_or_else(|| EditorError::load("image pair missing after load"))?;
        let image = self.compositor.composite(pair, &t, container)?;
        let blob = to_blob(&image, self.job_id.as_deref())?;
        tracing::info!(
            width = blob.width,
            height = blob.height,
            bytes = blob.bytes.len(),
            file_name = %blob.file_name,
            "composite saved"
        );
        on_save(blob);
        Ok(SaveOutcome::Saved)
    }

    /// Leave without producing output. Consumes the editor.
    pub fn cancel(self, on_cancel: impl FnOnce()) {
        tracing::debug!("editor cancelled");
        on_cancel();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/editor.rs"]
mod tests;
