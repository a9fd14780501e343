/// Vertical scroll position over the row list.
///
/// Every mutation re-clamps, so `0 <= offset <= max_offset()` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollState {
    offset: i32,
    content: i32,
    viewport: i32,
}

/// Scroll bar thumb in widget pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thumb {
    pub top: i32,
    pub height: i32,
}

impl ScrollState {
    pub fn offset(&self) -> i32 {
        self.offset
    }

    pub fn content_height(&self) -> i32 {
        self.content
    }

    pub fn viewport_height(&self) -> i32 {
        self.viewport
    }

    pub fn max_offset(&self) -> i32 {
        (self.content - self.viewport).max(0)
    }

    pub fn set_extent(&mut self, content: i32, viewport: i32) {
        self.content = content.max(0);
        self.viewport = viewport.max(0);
        self.clamp();
    }

    /// Idempotent.
    pub fn clamp(&mut self) {
        self.offset = self.offset.clamp(0, self.max_offset());
    }

    pub fn scroll_to(&mut self, offset: i32) {
        self.offset = offset;
        self.clamp();
    }

    pub fn scroll_by(&mut self, delta: i32) {
        self.scroll_to(self.offset.saturating_add(delta));
    }

    /// One viewport up or down.
    pub fn page(&mut self, down: bool) {
        let delta = if down { self.viewport } else { -self.viewport };
        self.scroll_by(delta);
    }

    /// Scroll bar drag: the pointer moved `dy` pixels since the drag started
    /// at `anchor_offset`.
    pub fn drag_from(&mut self, anchor_offset: i32, dy: i32) {
        if self.viewport == 0 {
            return;
        }
        let delta = i64::from(dy) * i64::from(self.content) / i64::from(self.viewport);
        let target = (i64::from(anchor_offset) + delta).clamp(i64::from(i32::MIN), i64::from(i32::MAX));
        self.scroll_to(target as i32);
    }

    pub fn thumb(&self) -> Option<Thumb> {
        if self.content == 0 {
            return None;
        }
        let vp = self.viewport as f32;
        let content = self.content as f32;
        Some(Thumb {
            top: (vp * self.offset as f32 / content).round() as i32,
            height: (vp * vp / content).round() as i32,
        })
    }
}
