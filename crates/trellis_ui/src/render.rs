//! UI rendering system.
//!
//! The tree is drawn into a [`UIRenderer`], which records backend-agnostic
//! commands. The embedding application turns the batches into actual draw calls.

use crate::error::UiResult;
use crate::layout::Rect;
use crate::style::{Color, CornerRadii};
use crate::widget::{WidgetId, WidgetTree};

/// A render command for the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Filled rounded rectangle.
    Rect {
        /// Bounds.
        bounds: Rect,
        /// Fill color.
        color: Color,
        /// Corner radii.
        radii: CornerRadii,
    },
    /// Rounded rectangle outline.
    RectOutline {
        /// Bounds.
        bounds: Rect,
        /// Stroke color.
        color: Color,
        /// Line width.
        width: f32,
        /// Corner radii.
        radii: CornerRadii,
    },
    /// Text centered in its bounds.
    Text {
        /// Text content.
        text: String,
        /// Box the text is centered in.
        bounds: Rect,
        /// Text color.
        color: Color,
        /// Font size.
        font_size: f32,
    },
    /// Image blit.
    Image {
        /// Bounds.
        bounds: Rect,
        /// Image name, as known to the image source.
        source: String,
    },
    /// Scissor rect (clip children).
    PushClip {
        /// Clip bounds.
        bounds: Rect,
    },
    /// Pop scissor rect.
    PopClip,
}

/// A batch of render commands with the same state.
#[derive(Debug, Clone)]
pub struct UIBatch {
    /// Commands in this batch.
    pub commands: Vec<RenderCommand>,
    /// Clip rect (if any).
    pub clip: Option<Rect>,
}

impl UIBatch {
    /// Creates a new empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(256),
            clip: None,
        }
    }
}

impl Default for UIBatch {
    fn default() -> Self {
        Self::new()
    }
}

/// UI renderer that collects and batches commands.
#[derive(Debug)]
pub struct UIRenderer {
    /// All commands from the frame.
    commands: Vec<RenderCommand>,
    /// Clip stack.
    clip_stack: Vec<Rect>,
    /// Final batches for rendering.
    batches: Vec<UIBatch>,
}

impl UIRenderer {
    /// Creates a new UI renderer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(1024),
            clip_stack: Vec::with_capacity(16),
            batches: Vec::with_capacity(8),
        }
    }

    /// Begins a new frame.
    pub fn begin_frame(&mut self) {
        self.commands.clear();
        self.clip_stack.clear();
        self.batches.clear();
    }

    /// Adds a render command.
    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    /// Pushes a clip rect, intersected with the current one.
    pub fn push_clip(&mut self, bounds: Rect) {
        let actual_clip = match self.clip_stack.last() {
            Some(current) => current.intersection(&bounds).unwrap_or(Rect::ZERO),
            None => bounds,
        };

        self.clip_stack.push(actual_clip);
        self.commands.push(RenderCommand::PushClip { bounds: actual_clip });
    }

    /// Pops the current clip rect.
    pub fn pop_clip(&mut self) {
        self.clip_stack.pop();
        self.commands.push(RenderCommand::PopClip);
    }

    /// Returns the current clip rect.
    #[must_use]
    pub fn current_clip(&self) -> Option<Rect> {
        self.clip_stack.last().copied()
    }

    /// Commands recorded so far this frame.
    #[must_use]
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Ends the frame and returns batches for rendering.
    ///
    /// A new batch starts at every clip change.
    pub fn end_frame(&mut self) -> &[UIBatch] {
        self.batches.clear();
        let mut clips: Vec<Rect> = Vec::new();
        let mut batch = UIBatch::new();

        for command in self.commands.drain(..) {
            match command {
                RenderCommand::PushClip { bounds } => {
                    clips.push(bounds);
                }
                RenderCommand::PopClip => {
                    clips.pop();
                }
                command => {
                    let clip = clips.last().copied();
                    if clip != batch.clip && !batch.commands.is_empty() {
                        self.batches.push(std::mem::take(&mut batch));
                    }
                    batch.clip = clip;
                    batch.commands.push(command);
                }
            }
        }
        if !batch.commands.is_empty() {
            self.batches.push(batch);
        }

        &self.batches
    }

    /// Returns the number of commands recorded this frame.
    #[must_use]
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }
}

impl Default for UIRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetTree {
    /// Draws the tree with the styles resolved in the last style pass.
    ///
    /// Each placed widget draws its background, its border when the border width
    /// is positive, its own content and then its children clipped to its bounds.
    /// Returns the number of widgets drawn.
    ///
    /// # Errors
    ///
    /// Returns [`crate::UiError::UnknownWidget`] if the tree is inconsistent.
    pub fn draw(&self, renderer: &mut UIRenderer) -> UiResult<usize> {
        self.draw_widget(self.root, (0.0, 0.0), renderer)
    }

    fn draw_widget(&self, id: WidgetId, origin: (f32, f32), renderer: &mut UIRenderer) -> UiResult<usize> {
        let node = self.node(id)?;
        let bounds = node.rect().translate(origin.0, origin.1);
        let style = node.effective_style();

        if style.background_color.a > 0.0 {
            renderer.push(RenderCommand::Rect {
                bounds,
                color: style.background_color,
                radii: style.radii,
            });
        }
        if style.border_width > 0.0 {
            renderer.push(RenderCommand::RectOutline {
                bounds,
                color: style.border_color,
                width: style.border_width,
                radii: style.radii,
            });
        }
        node.widget().render(bounds, style, renderer);

        let mut drawn = 1;
        let mut children = node.placed_children().peekable();
        if children.peek().is_some() {
            renderer.push_clip(bounds);
            for (child, _) in children {
                drawn += self.draw_widget(child, (bounds.x, bounds.y), renderer)?;
            }
            renderer.pop_clip();
        }
        Ok(drawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renderer_frame() {
        let mut renderer = UIRenderer::new();

        renderer.begin_frame();
        renderer.push(RenderCommand::Rect {
            bounds: Rect::new(0.0, 0.0, 100.0, 50.0),
            color: Color::WHITE,
            radii: CornerRadii::default(),
        });

        let batches = renderer.end_frame();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].commands.len(), 1);
    }

    #[test]
    fn test_clip_stack() {
        let mut renderer = UIRenderer::new();
        renderer.begin_frame();

        renderer.push_clip(Rect::new(0.0, 0.0, 100.0, 100.0));
        renderer.push_clip(Rect::new(50.0, 50.0, 100.0, 100.0));
        assert_eq!(renderer.current_clip(), Some(Rect::new(50.0, 50.0, 50.0, 50.0)));

        renderer.pop_clip();
        renderer.pop_clip();
        assert!(renderer.current_clip().is_none());
    }

    #[test]
    fn test_batches_split_on_clip() {
        let mut renderer = UIRenderer::new();
        let rect = |x| RenderCommand::Rect {
            bounds: Rect::new(x, 0.0, 1.0, 1.0),
            color: Color::WHITE,
            radii: CornerRadii::default(),
        };

        renderer.push(rect(0.0));
        renderer.push_clip(Rect::new(0.0, 0.0, 10.0, 10.0));
        renderer.push(rect(1.0));
        renderer.push(rect(2.0));
        renderer.pop_clip();
        renderer.push(rect(3.0));

        let batches = renderer.end_frame();
        let sizes: Vec<_> = batches.iter().map(|b| (b.clip.is_some(), b.commands.len())).collect();
        assert_eq!(sizes, vec![(false, 1), (true, 2), (false, 1)]);
    }
}
