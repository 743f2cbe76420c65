use serde::{Deserialize, Serialize};

use crate::geometry::{Offset, Placement};

/// Pan/zoom state of one crop session.
///
/// `offset`/`scale` are the live values, which move while a gesture is in
/// flight. The committed pair is the baseline the next gesture starts from.
/// With no gesture active both pairs are equal.
///
/// The zoom baseline is kept as a delta: `committed_scale_delta` is
/// `scale - 1` at the end of the last zoom, and a zoom update computes
/// `magnification + committed_scale_delta`. Storing the absolute scale
/// instead would shift every gesture after the first by one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformState {
    pub offset: Offset,
    pub scale: f64,
    pub committed_offset: Offset,
    pub committed_scale_delta: f64,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            offset: Offset::ZERO,
            scale: 1.0,
            committed_offset: Offset::ZERO,
            committed_scale_delta: 0.0,
        }
    }
}

impl TransformState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live(&self) -> Placement {
        Placement::new(self.offset, self.scale)
    }

    /// Absolute committed scale.
    pub fn committed_scale(&self) -> f64 {
        1.0 + self.committed_scale_delta
    }

    pub fn committed(&self) -> Placement {
        Placement::new(self.committed_offset, self.committed_scale())
    }

    /// Whether live and committed values agree.
    pub fn is_settled(&self) -> bool {
        self.offset == self.committed_offset && self.scale == self.committed_scale()
    }

    /// Set live and committed values to `placement`.
    pub(crate) fn settle(&mut self, placement: Placement) {
        self.offset = placement.offset;
        self.committed_offset = placement.offset;
        self.committed_scale_delta = placement.scale - 1.0;
        self.scale = self.committed_scale();
    }
}
