//! Animation-frame scheduling.
//!
//! Mirrors the request/cancel contract of a display-refresh callback: a
//! component asks for the next frame, the host loop collects every pending
//! request once per refresh, and each component re-requests from inside its
//! own frame if it wants to keep running.

use std::collections::BTreeSet;

/// Identifies one pending frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(u64);

/// Frame requests that became due at the start of a refresh.
#[derive(Debug, Default)]
pub struct DueFrames(BTreeSet<FrameHandle>);

impl DueFrames {
    pub fn contains(&self, handle: FrameHandle) -> bool {
        self.0.contains(&handle)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Host-side registry of pending frame requests.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    next_id: u64,
    pending: BTreeSet<FrameHandle>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a callback on the next refresh.
    pub fn request(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.insert(handle);
        handle
    }

    /// Cancel a pending request. Returns false if it was not pending.
    pub fn cancel(&mut self, handle: FrameHandle) -> bool {
        self.pending.remove(&handle)
    }

    pub fn is_pending(&self, handle: FrameHandle) -> bool {
        self.pending.contains(&handle)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Take every pending request for the refresh that is starting now.
    pub fn begin_frame(&mut self) -> DueFrames {
        DueFrames(std::mem::take(&mut self.pending))
    }
}
