//! Object picking and highlighting.
//!
//! Picking requests are queued until the end of the frame, when the values
//! visible in the requested region are handed to the callback exactly once.

use std::fmt;

/// Pixel-space rectangle, `right`/`bottom` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl PixelRect {
    #[must_use]
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }
}

pub type PickingCallback = Box<dyn FnOnce(&[u32]) + Send>;

struct PickingRequest {
    region: PixelRect,
    callback: PickingCallback,
}

#[derive(Default)]
pub struct ObjectPicking {
    pending: Vec<PickingRequest>,
}

impl fmt::Debug for ObjectPicking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectPicking")
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl ObjectPicking {
    pub fn request(&mut self, region: PixelRect, callback: PickingCallback) {
        self.pending.push(PickingRequest { region, callback });
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Drains every request, answering each with `resolve(region)`.
    pub fn resolve_all(&mut self, mut resolve: impl FnMut(PixelRect) -> Vec<u32>) {
        for request in self.pending.drain(..) {
            let values = resolve(request.region);
            (request.callback)(&values);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub values: Vec<u32>,
    pub color: [u8; 3],
    pub frame_id: u64,
}

/// The most recent highlight request. It lasts for the frame it was made in.
#[derive(Debug, Default)]
pub struct Highlighting {
    current: Option<Highlight>,
}

impl Highlighting {
    pub fn request(&mut self, values: Vec<u32>, color: [u8; 3], frame_id: u64) {
        self.current = Some(Highlight {
            values,
            color,
            frame_id,
        });
    }

    #[must_use]
    pub fn current(&self) -> Option<&Highlight> {
        self.current.as_ref()
    }

    /// Drops a highlight requested before `frame_id`.
    pub fn expire_before(&mut self, frame_id: u64) {
        if self.current.as_ref().is_some_and(|h| h.frame_id < frame_id) {
            self.current = None;
        }
    }
}
