//! One crop editing session, from picked image to output bitmap.
//!
//! # Lifecycle
//!
//! ```text
//! Idle --load--> Selecting <--gestures--> Interacting
//!                    |                         |
//!                    +------commit/cancel------+--> Committed | Cancelled
//! ```
//!
//! `Idle` waits for the image picker. `Selecting` has an image and a settled
//! transform. `Interacting` has at least one gesture live. `Committed` and
//! `Cancelled` are terminal; every call after them fails with
//! [`CropError::SessionClosed`].
//!
//! Committing is split in three so rasterization can run on a worker:
//! [`CropSession::begin_commit`] snapshots the committed transform into a
//! [`RenderJob`], [`RenderJob::run`] does the work on any thread, and
//! [`CropSession::finish_commit`] applies the result. Only one job may be
//! outstanding; a second `begin_commit` fails with [`CropError::SessionBusy`].
//! [`CropSession::commit`] does all three inline.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::config::CropConfig;
use crate::decode::{decode_image, Bitmap, DecodeError};
use crate::geometry::{fill_size, Offset, Placement, Size};
use crate::render::{render, RenderError, RenderOptions};
use crate::shape::{ClipMask, CropShape};
use crate::transform::{GestureEvent, GestureReducer, SnapEvent, TransformState};

/// Errors surfaced by a crop session.
#[derive(Debug, Error)]
pub enum CropError {
    /// The picked image could not be decoded or was missing.
    #[error("Decode failure: {0}")]
    DecodeFailure(#[from] DecodeError),

    /// Rendering failed for a reason the caller can correct.
    #[error("Render failure: {0}")]
    RenderFailure(RenderError),

    /// The committed transform did not cover the crop window. The session
    /// is aborted.
    #[error("Raster inconsistency: {0}")]
    RasterInconsistency(String),

    /// A commit is already in flight.
    #[error("Session busy: a commit is already in progress")]
    SessionBusy,

    /// The session was committed or cancelled.
    #[error("Session closed")]
    SessionClosed,

    /// No image has been loaded yet.
    #[error("No image loaded")]
    NotReady,

    /// The result does not belong to the outstanding commit.
    #[error("Render result does not match the pending commit")]
    StaleRender,

    /// The crop shape resolves to a window without area.
    #[error("Invalid crop size: {width}x{height}")]
    InvalidCropSize { width: f64, height: f64 },
}

impl From<RenderError> for CropError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Inconsistent { detail } => CropError::RasterInconsistency(detail),
            other => CropError::RenderFailure(other),
        }
    }
}

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionState {
    Idle,
    Selecting,
    Interacting,
    Committed,
    Cancelled,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Committed | SessionState::Cancelled)
    }
}

/// What the preview should draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewFrame {
    pub offset: Offset,
    pub scale: f64,
    pub clip: ClipMask,
    /// A snap-back transition is running; keep calling `advance`.
    pub animating: bool,
}

/// Result of feeding one gesture event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUpdate {
    pub frame: PreviewFrame,
    /// Present when the interaction ended with a boundary correction.
    pub snap: Option<SnapEvent>,
}

/// A self-contained rasterization of one commit. `Send`, so it can be
/// moved to a worker thread.
#[derive(Debug)]
pub struct RenderJob {
    ticket: u64,
    snap: Option<SnapEvent>,
    source: Arc<Bitmap>,
    placement: Placement,
    window: Size,
    output_width: u32,
    output_height: u32,
    options: RenderOptions,
}

impl RenderJob {
    pub fn output_size(&self) -> (u32, u32) {
        (self.output_width, self.output_height)
    }

    /// Boundary correction made when the commit ended a live gesture.
    pub fn snap(&self) -> Option<SnapEvent> {
        self.snap
    }

    /// Rasterize. Does not touch the session.
    pub fn run(self) -> RenderOutcome {
        let result = render(
            &self.source,
            self.placement,
            self.window,
            self.output_width,
            self.output_height,
            self.options,
        );
        RenderOutcome {
            ticket: self.ticket,
            result,
        }
    }
}

/// Result of [`RenderJob::run`], handed back to [`CropSession::finish_commit`].
#[derive(Debug)]
pub struct RenderOutcome {
    ticket: u64,
    result: Result<Bitmap, RenderError>,
}

/// A crop session. Owns its transform state exclusively and shares the
/// source bitmap read-only.
#[derive(Debug)]
pub struct CropSession {
    shape: CropShape,
    config: CropConfig,
    window: Size,
    source: Option<Arc<Bitmap>>,
    reducer: Option<GestureReducer>,
    state: SessionState,
    pending: Option<u64>,
    next_ticket: u64,
}

impl CropSession {
    /// Create a session waiting for its image.
    pub fn new(shape: CropShape, config: CropConfig) -> Result<Self, CropError> {
        let window = shape.size(&config.shape_sizes);
        if !window.has_positive_area() {
            return Err(CropError::InvalidCropSize {
                width: window.width,
                height: window.height,
            });
        }
        Ok(Self {
            shape,
            config,
            window,
            source: None,
            reducer: None,
            state: SessionState::Idle,
            pending: None,
            next_ticket: 0,
        })
    }

    /// Create a session and load the picked image in one step.
    ///
    /// `source` is `None` when the picker was cancelled or failed to decode.
    pub fn open(
        source: Option<Bitmap>,
        shape: CropShape,
        config: CropConfig,
    ) -> Result<Self, CropError> {
        let mut session = Self::new(shape, config)?;
        session.load(source)?;
        Ok(session)
    }

    /// Decode `bytes` and open a session on the result.
    pub fn open_bytes(
        bytes: &[u8],
        shape: CropShape,
        config: CropConfig,
    ) -> Result<Self, CropError> {
        let bitmap = decode_image(bytes)?;
        Self::open(Some(bitmap), shape, config)
    }

    /// Supply (or replace) the image. Resets the transform to identity.
    ///
    /// On failure the session stays where it was.
    pub fn load(&mut self, source: Option<Bitmap>) -> Result<(), CropError> {
        self.ensure_open()?;
        if self.state == SessionState::Interacting || self.pending.is_some() {
            return Err(CropError::SessionBusy);
        }

        let bitmap = source.ok_or(DecodeError::NoImage)?;
        if !bitmap.is_readable() {
            return Err(DecodeError::CorruptedFile(format!(
                "{}x{} bitmap with {} bytes",
                bitmap.width,
                bitmap.height,
                bitmap.pixels.len()
            ))
            .into());
        }

        let displayed = fill_size(
            Size::new(bitmap.width as f64, bitmap.height as f64),
            self.window,
        );
        self.reducer = Some(GestureReducer::new(
            displayed,
            self.window,
            self.config.clamp_limits(),
            self.config.snap_duration(),
        ));
        debug!(
            width = bitmap.width,
            height = bitmap.height,
            shape = %self.shape.display_name(),
            "crop session loaded image"
        );
        self.source = Some(Arc::new(bitmap));
        self.state = SessionState::Selecting;
        Ok(())
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn shape(&self) -> CropShape {
        self.shape
    }

    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    /// Crop window size in display points.
    pub fn window(&self) -> Size {
        self.window
    }

    /// Output size used by [`CropSession::commit`].
    pub fn output_size(&self) -> (u32, u32) {
        let out = self.window.scaled(self.config.output_scale);
        // Saturating casts: negative or NaN become 0 and fail at render time.
        (out.width.round() as u32, out.height.round() as u32)
    }

    /// Current transform, if an image is loaded.
    pub fn transform(&self) -> Option<&TransformState> {
        self.reducer.as_ref().map(GestureReducer::state)
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// What the preview should draw right now.
    pub fn frame(&self) -> PreviewFrame {
        let (placement, animating) = match &self.reducer {
            Some(reducer) => (reducer.displayed(), reducer.is_animating()),
            None => (Placement::IDENTITY, false),
        };
        PreviewFrame {
            offset: placement.offset,
            scale: placement.scale,
            clip: self.shape.clip_mask(),
            animating,
        }
    }

    /// Feed one gesture event.
    pub fn handle(&mut self, event: GestureEvent) -> Result<SessionUpdate, CropError> {
        self.ensure_open()?;
        let reducer = self.reducer.as_mut().ok_or(CropError::NotReady)?;

        let snap = reducer.apply(event);
        self.state = if reducer.is_interacting() {
            SessionState::Interacting
        } else {
            SessionState::Selecting
        };

        Ok(SessionUpdate {
            frame: self.frame(),
            snap,
        })
    }

    /// Advance the snap animation by `dt`.
    pub fn advance(&mut self, dt: Duration) -> PreviewFrame {
        if let Some(reducer) = self.reducer.as_mut() {
            reducer.advance(dt);
        }
        self.frame()
    }

    /// Start a commit at the default output size.
    pub fn begin_commit(&mut self) -> Result<RenderJob, CropError> {
        let (width, height) = self.output_size();
        self.begin_commit_at(width, height)
    }

    /// Start a commit at an explicit output size in pixels.
    ///
    /// Active gestures are ended first, which runs the boundary clamp.
    pub fn begin_commit_at(&mut self, width: u32, height: u32) -> Result<RenderJob, CropError> {
        if self.pending.is_some() {
            return Err(CropError::SessionBusy);
        }
        self.ensure_open()?;
        let reducer = self.reducer.as_mut().ok_or(CropError::NotReady)?;
        let source = self.source.clone().ok_or(CropError::NotReady)?;

        let mut snap = None;
        if reducer.is_interacting() {
            snap = reducer.finish();
            if let Some(event) = &snap {
                debug!(
                    dx = event.correction.dx,
                    dy = event.correction.dy,
                    "ending active gestures before commit corrected transform"
                );
            } else {
                debug!("ending active gestures before commit");
            }
            self.state = SessionState::Selecting;
        }

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.pending = Some(ticket);

        let mask = if self.config.mask_circle_output {
            self.shape.clip_mask()
        } else {
            ClipMask::None
        };

        Ok(RenderJob {
            ticket,
            snap,
            source,
            placement: reducer.state().committed(),
            window: self.window,
            output_width: width,
            output_height: height,
            options: RenderOptions {
                filter: self.config.filter,
                mask,
            },
        })
    }

    /// Apply the result of a [`RenderJob`].
    ///
    /// On success the session is committed. A render failure leaves the
    /// session as it was so the caller can retry or cancel. A raster
    /// inconsistency aborts the session.
    pub fn finish_commit(&mut self, outcome: RenderOutcome) -> Result<Bitmap, CropError> {
        if self.state.is_terminal() {
            // Output of a commit that outlived its session is dropped here.
            return Err(CropError::SessionClosed);
        }
        if self.pending != Some(outcome.ticket) {
            return Err(CropError::StaleRender);
        }
        self.pending = None;

        match outcome.result {
            Ok(bitmap) => {
                debug!(
                    width = bitmap.width,
                    height = bitmap.height,
                    "crop session committed"
                );
                self.close(SessionState::Committed);
                Ok(bitmap)
            }
            Err(err) => {
                let err = CropError::from(err);
                if let CropError::RasterInconsistency(detail) = &err {
                    error!(
                        %detail,
                        "clamped transform failed to cover crop window; aborting session"
                    );
                    self.close(SessionState::Cancelled);
                } else {
                    warn!(error = %err, "crop commit failed");
                }
                Err(err)
            }
        }
    }

    /// Commit inline at the default output size.
    pub fn commit(&mut self) -> Result<Bitmap, CropError> {
        let job = self.begin_commit()?;
        self.finish_commit(job.run())
    }

    /// Commit inline at an explicit output size.
    pub fn commit_at(&mut self, width: u32, height: u32) -> Result<Bitmap, CropError> {
        let job = self.begin_commit_at(width, height)?;
        self.finish_commit(job.run())
    }

    /// Abandon the session. No output is produced; calling it again is a no-op.
    pub fn cancel(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        debug!("crop session cancelled");
        self.close(SessionState::Cancelled);
    }

    fn close(&mut self, state: SessionState) {
        self.state = state;
        self.pending = None;
        self.source = None;
        self.reducer = None;
    }

    fn ensure_open(&self) -> Result<(), CropError> {
        if self.state.is_terminal() {
            Err(CropError::SessionClosed)
        } else {
            Ok(())
        }
    }
}
