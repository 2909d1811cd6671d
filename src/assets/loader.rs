use std::path::PathBuf;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crate::assets::decode::{PreparedImage, decode_image};
use crate::foundation::error::{EditorError, EditorResult};

/// A loadable image reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    /// File on disk.
    Path(PathBuf),
    /// Encoded image bytes already in memory.
    Bytes(Arc<[u8]>),
    /// Remote `http(s)` URL. Requires the `http` feature.
    Url(String),
}

impl ImageSource {
    /// Interpret a CLI-style reference: `http://` / `https://` become URLs, anything else a path.
    pub fn parse(reference: &str) -> Self {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            Self::Url(reference.to_owned())
        } else {
            Self::Path(PathBuf::from(reference))
        }
    }

    /// Short description for logs and error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Path(p) => p.display().to_string(),
            Self::Bytes(b) => format!("<{} bytes>", b.len()),
            Self::Url(u) => u.clone(),
        }
    }

    /// Fetch the encoded bytes.
    pub fn fetch(&self) -> EditorResult<Vec<u8>> {
        match self {
            Self::Path(p) => std::fs::read(p)
                .map_err(|e| EditorError::load(format!("failed to read '{}': {e}", p.display()))),
            Self::Bytes(b) => Ok(b.to_vec()),
            Self::Url(u) => fetch_url(u),
        }
    }

    /// Fetch and decode.
    pub fn load(&self) -> EditorResult<PreparedImage> {
        let bytes = self.fetch()?;
        decode_image(&bytes)
            .map_err(|e| EditorError::load(format!("failed to decode '{}': {e}", self.describe())))
    }
}

impl From<PathBuf> for ImageSource {
    fn from(p: PathBuf) -> Self {
        Self::Path(p)
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b.into())
    }
}

#[cfg(feature = "http")]
fn fetch_url(url: &str) -> EditorResult<Vec<u8>> {
    let resp = reqwest::blocking::get(url)
        .map_err(|e| EditorError::load(format!("failed to fetch '{url}': {e}")))?;
    let status = resp.status();
    if !status.is_success() {
        return Err(EditorError::load(format!("fetch '{url}' returned {status}")));
    }
    let bytes = resp
        .bytes()
        .map_err(|e| EditorError::load(format!("failed to read body of '{url}': {e}")))?;
    Ok(bytes.to_vec())
}

#[cfg(not(feature = "http"))]
fn fetch_url(url: &str) -> EditorResult<Vec<u8>> {
    Err(EditorError::load(format!(
        "cannot fetch '{url}': url sources require the 'http' feature"
    )))
}

/// Both composite inputs, decoded.
#[derive(Clone, Debug)]
pub struct LoadedPair {
    /// Background photo.
    pub background: PreparedImage,
    /// Overlay (avatar) image.
    pub overlay: PreparedImage,
}

#[derive(Clone, Copy, Debug)]
enum Slot {
    Background,
    Overlay,
}

/// Both loads of an image pair, in flight on their own worker threads.
///
/// [`PendingLoad::wait`] may time out and be called again later: it keeps whatever already
/// arrived and resumes on the same workers instead of spawning new ones.
pub(crate) struct PendingLoad {
    rx: mpsc::Receiver<(Slot, EditorResult<PreparedImage>)>,
    background: Option<PreparedImage>,
    overlay: Option<PreparedImage>,
}

impl PendingLoad {
    /// Start loading both sources, one worker thread each.
    pub(crate) fn spawn(background: &ImageSource, overlay: &ImageSource) -> EditorResult<Self> {
        let (tx, rx) = mpsc::channel();
        for (slot, source) in [
            (Slot::Background, background.clone()),
            (Slot::Overlay, overlay.clone()),
        ] {
            let tx = tx.clone();
            std::thread::Builder::new()
                .name(format!("load-{slot:?}").to_lowercase())
                .spawn(move || {
                    // The receiver may have given up already; nothing to report then.
                    let _ = tx.send((slot, source.load()));
                })
                .map_err(|e| EditorError::load(format!("failed to spawn loader thread: {e}")))?;
        }
        Ok(Self {
            rx,
            background: None,
            overlay: None,
        })
    }

    /// Wait up to `timeout` for both images, in whichever order they finish.
    ///
    /// Fails on the first load error. On [`EditorError::Timeout`] the load is still pending.
    pub(crate) fn wait(&mut self, timeout: Duration) -> EditorResult<LoadedPair> {
        let deadline = Instant::now() + timeout;
        while self.background.is_none() || self.overlay.is_none() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let (slot, res) = self.rx.recv_timeout(remaining).map_err(|e| match e {
                mpsc::RecvTimeoutError::Timeout => EditorError::timeout(format!(
                    "image loading exceeded {} ms",
                    timeout.as_millis()
                )),
                mpsc::RecvTimeoutError::Disconnected => {
                    EditorError::load("image loader exited without a result")
                }
            })?;
            let img = res?;
            tracing::debug!(?slot, width = img.width, height = img.height, "image loaded");
            match slot {
                Slot::Background => self.background = Some(img),
                Slot::Overlay => self.overlay = Some(img),
            }
        }

        match (self.background.take(), self.overlay.take()) {
            (Some(background), Some(overlay)) => Ok(LoadedPair {
                background,
                overlay,
            }),
            _ => Err(EditorError::load("image pair incomplete")),
        }
    }
}

/// Load both images concurrently and wait for both, in whichever order they finish.
///
/// Fails on the first load error, or with a timeout once `timeout` has elapsed. A source that
/// never completes is abandoned on its worker thread; use [`AvatarEditor`] to resume such a
/// load instead.
///
/// [`AvatarEditor`]: crate::AvatarEditor
#[tracing::instrument(skip_all, fields(background = %background.describe(), overlay = %overlay.describe()))]
pub fn load_pair(
    background: &ImageSource,
    overlay: &ImageSource,
    timeout: Duration,
) -> EditorResult<LoadedPair> {
    PendingLoad::spawn(background, overlay)?.wait(timeout)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
