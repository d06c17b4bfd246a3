//! The per-frame pipeline: hit test, layout, style pass, draw.

use crate::error::UiResult;
use crate::input::InputState;
use crate::render::UIRenderer;
use crate::widget::{WidgetId, WidgetTree};

/// What happened during one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frame number, starting at 1.
    pub frame: u64,
    /// Deepest widget under the pointer.
    pub hit: Option<WidgetId>,
    /// Queued style edits applied in this frame's style pass.
    pub style_edits: usize,
    /// Widgets drawn.
    pub widgets_drawn: usize,
    /// True if geometry had to be refreshed before hit testing.
    pub refreshed_before_hit: bool,
}

impl WidgetTree {
    /// Runs one frame against the current input state.
    ///
    /// Order: hit test, full-tree layout, style pass (queued edits, then every
    /// widget resolved), draw. If geometry is stale it is recomputed before the
    /// hit test so the pointer is never tested against outdated rectangles.
    /// Edits that change margin or padding take effect in the next frame's
    /// layout.
    ///
    /// # Errors
    ///
    /// Propagates measurement and notification failures.
    pub fn run_frame(&mut self, input: &InputState, renderer: &mut UIRenderer) -> UiResult<FrameStats> {
        let root = self.root;
        let refreshed_before_hit = self.geometry_stale;
        if refreshed_before_hit {
            self.compute_geometry(root)?;
        }

        let (x, y) = input.pointer();
        let hit = self.update_interaction(x, y, input.primary_down())?;

        self.compute_geometry(root)?;

        let style_edits = self.apply_style_edits()?;
        self.resolve_all();

        renderer.begin_frame();
        let widgets_drawn = self.draw(renderer)?;

        self.frame += 1;
        let stats = FrameStats {
            frame: self.frame,
            hit,
            style_edits,
            widgets_drawn,
            refreshed_before_hit,
        };
        tracing::trace!(?stats, "frame done");
        Ok(stats)
    }

    /// Number of completed frames.
    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.frame
    }
}
