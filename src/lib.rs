//! Avatar editor: place a generated avatar over a photo and flatten the result.
//!
//! The crate is organized around one piece of state, the overlay [`Transform`]:
//!
//! - [`ManipulationController`] turns pointer drags, corner/rotate handles and key presses into
//!   transform updates (and normalizes raw affines from other manipulation layers).
//! - [`DisplayGeometry`] maps the on-screen container onto the background's native pixels.
//! - [`Compositor`] rasterizes background and overlay at native resolution with `vello_cpu`.
//! - [`AvatarEditor`] ties them together with image loading and the save/cancel flow.
//!
//! The `service` types describe the generation backend the editor's inputs come from; the
//! blocking HTTP client behind them needs the `http` feature.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod config;
mod controller;
mod foundation;
mod geometry;
mod render;
mod service;
mod session;
mod transform;

pub use crate::foundation::core::{Affine, DisplaySize, PixelSize, Point, Rect, Vec2};
pub use crate::foundation::error::{EditorError, EditorResult};

pub use crate::assets::compress::{
    CompressedUpload, CompressionOpts, MAX_UPLOAD_BYTES, compress_upload, fit_within,
    validate_upload,
};
pub use crate::assets::decode::{PreparedImage, decode_image};
pub use crate::assets::loader::{ImageSource, LoadedPair, load_pair};
pub use crate::config::EditorConfig;
pub use crate::controller::gesture::{
    HANDLE_RADIUS, Handle, HitTarget, ROTATE_HANDLE_OFFSET, handle_position, hit_test,
    rotate_handle_position,
};
pub use crate::controller::keys::{EditorButton, KeyBindings};
pub use crate::controller::manip::{ManipulationController, StepConfig, centered};
pub use crate::geometry::fit::{DisplayGeometry, FitPolicy, to_native_pixels};
pub use crate::render::cpu::{
    CompositeImage, Compositor, CompositorOpts, OverlayPlacement, overlay_display_size,
    overlay_placement,
};
pub use crate::render::encode::{
    CompositeBlob, encode_png, suggested_file_name, to_blob, write_png,
};
pub use crate::service::api::{
    CheckoutSession, GenerateResponse, JobList, JobMetadata, JobRecord, JobStatus, PaymentType,
    PortalSession, ServiceApi, StaticToken, SubscriptionStatus, TokenProvider,
};
pub use crate::service::http::{DEFAULT_BASE_URL, HttpServiceClient};
pub use crate::service::poll::{PollOpts, poll_job};
pub use crate::session::editor::{AvatarEditor, SaveOutcome};
pub use crate::transform::affine::{
    compose, decompose, format_css_matrix, normalize, parse_css_matrix,
};
pub use crate::transform::model::{ScaleBounds, Transform};
