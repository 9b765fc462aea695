//! Attachment board engine
//!
//! Absolutely-positioned receipt thumbnails on a fixed-aspect page,
//! expressed as percentage rectangles. Move keeps the rectangle inside
//! the 0-100 canvas; resize enforces a minimum size of 10 and no upper
//! cap. An oversized entry may grow off the printable area, which is
//! accepted behavior.
//!
//! Gesture wiring is an explicit state machine:
//! `Idle → Manipulating(entry, mode) → Idle`.

use crate::geometry::clamp;
use crate::types::Layout;

/// Minimum width/height of a board rectangle, in percent.
pub const MIN_SIZE_PCT: f32 = 10.0;

/// Layout assigned to manual entries at creation.
pub const MANUAL_LAYOUT: Layout = Layout {
    x: 5.0,
    y: 5.0,
    width: 25.0,
    height: 25.0,
};

/// Active gesture kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManipulationMode {
    Move,
    Resize,
}

#[derive(Debug, Clone)]
struct Manipulation {
    id: String,
    mode: ManipulationMode,
    start_pointer: (f32, f32),
    start_layout: Layout,
}

/// Board gesture session. At most one manipulation is active at a time;
/// a second begin while active is ignored.
#[derive(Debug, Clone, Default)]
pub struct BoardSession {
    active: Option<Manipulation>,
}

impl BoardSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_ref().map(|m| m.id.as_str())
    }

    pub fn active_mode(&self) -> Option<ManipulationMode> {
        self.active.as_ref().map(|m| m.mode)
    }

    /// Records the gesture target, mode, starting pointer position and a
    /// snapshot of the entry's layout at gesture start.
    pub fn begin(&mut self, id: &str, mode: ManipulationMode, pointer: (f32, f32), layout: Layout) {
        if self.active.is_some() {
            return;
        }
        self.active = Some(Manipulation {
            id: id.to_string(),
            mode,
            start_pointer: pointer,
            start_layout: layout,
        });
    }

    /// Computes the updated layout for the current pointer position.
    ///
    /// Returns `(entry_id, layout)` for the caller to write back into the
    /// root state; the session never holds an authoritative copy. A
    /// missing manipulation or degenerate container is a no-op tick and
    /// returns `None`.
    pub fn update(
        &self,
        pointer: (f32, f32),
        container_size: (f32, f32),
    ) -> Option<(String, Layout)> {
        let m = self.active.as_ref()?;
        if container_size.0 <= 0.0 || container_size.1 <= 0.0 {
            return None;
        }

        // Percentage-space deltas
        let dx = (pointer.0 - m.start_pointer.0) / container_size.0 * 100.0;
        let dy = (pointer.1 - m.start_pointer.1) / container_size.1 * 100.0;

        let start = m.start_layout;
        let layout = match m.mode {
            ManipulationMode::Move => Layout {
                x: clamp(start.x + dx, 0.0, 100.0 - start.width),
                y: clamp(start.y + dy, 0.0, 100.0 - start.height),
                width: start.width,
                height: start.height,
            },
            ManipulationMode::Resize => Layout {
                x: start.x,
                y: start.y,
                width: (start.width + dx).max(MIN_SIZE_PCT),
                height: (start.height + dy).max(MIN_SIZE_PCT),
            },
        };

        Some((m.id.clone(), layout))
    }

    /// Clears the active slot. Idempotent.
    pub fn end(&mut self) {
        self.active = None;
    }
}

/// Initial placement for the n-th captured entry: a deterministic diagonal
/// cascade that avoids exact overlap for the first several items.
pub fn initial_layout(existing_count: usize) -> Layout {
    Layout {
        x: ((existing_count * 5) % 70) as f32,
        y: ((existing_count * 10) % 70) as f32,
        width: 30.0,
        height: 30.0,
    }
}
