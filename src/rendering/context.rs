use crate::core::{
    config::Color,
    geo::{Point, Size},
    viewport::Transform,
};

/// Outline style for lines and stroked shapes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub width: f64,
    pub color: Color,
    pub alpha: f64,
}

impl Stroke {
    pub fn new(width: f64, color: Color, alpha: f64) -> Self {
        Self {
            width,
            color,
            alpha,
        }
    }
}

/// Which coordinate frame a command is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawLayer {
    /// World pixels, drawn through the container transform
    World,
    /// Screen pixels, drawn on top without scaling
    Overlay,
}

/// Commands that can be issued to the render context
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Rect {
        origin: Point,
        size: Size,
        fill: Color,
    },
    StrokeRect {
        origin: Point,
        size: Size,
        stroke: Stroke,
    },
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
    },
    Circle {
        center: Point,
        radius: f64,
        fill: Color,
    },
    RoundRect {
        origin: Point,
        size: Size,
        corner: f64,
        fill: Color,
    },
    Text {
        position: Point,
        text: String,
        color: Color,
        font_size: f64,
    },
}

/// One finished frame, ready to hand to a surface
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub background: Color,
    /// Container transform the world layer is drawn through
    pub transform: Transform,
    pub world: Vec<DrawCommand>,
    pub overlay: Vec<DrawCommand>,
}

impl Frame {
    /// Total number of queued commands in both layers
    pub fn command_count(&self) -> usize {
        self.world.len() + self.overlay.len()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.world.iter().chain(self.overlay.iter()).filter_map(|cmd| match cmd {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Collects drawing primitives for one frame.
///
/// Nothing is rasterized here; commands are queued per layer and handed to a
/// [`RenderSurface`](crate::rendering::surface::RenderSurface) as a [`Frame`].
#[derive(Debug)]
pub struct RenderContext {
    pub size: Size,
    background: Color,
    world: Vec<DrawCommand>,
    overlay: Vec<DrawCommand>,
}

impl RenderContext {
    pub fn new(size: Size, background: Color) -> Self {
        Self {
            size,
            background,
            world: Vec::new(),
            overlay: Vec::new(),
        }
    }

    /// Begin a frame
    pub fn begin_frame(&mut self) {
        self.world.clear();
        self.overlay.clear();
    }

    fn queue(&mut self, layer: DrawLayer) -> &mut Vec<DrawCommand> {
        match layer {
            DrawLayer::World => &mut self.world,
            DrawLayer::Overlay => &mut self.overlay,
        }
    }

    pub fn fill_rect(&mut self, layer: DrawLayer, origin: Point, size: Size, fill: Color) {
        self.queue(layer).push(DrawCommand::Rect { origin, size, fill });
    }

    pub fn stroke_rect(&mut self, layer: DrawLayer, origin: Point, size: Size, stroke: Stroke) {
        self.queue(layer)
            .push(DrawCommand::StrokeRect { origin, size, stroke });
    }

    pub fn line(&mut self, layer: DrawLayer, from: Point, to: Point, stroke: Stroke) {
        self.queue(layer).push(DrawCommand::Line { from, to, stroke });
    }

    pub fn circle(&mut self, layer: DrawLayer, center: Point, radius: f64, fill: Color) {
        self.queue(layer).push(DrawCommand::Circle {
            center,
            radius,
            fill,
        });
    }

    pub fn round_rect(
        &mut self,
        layer: DrawLayer,
        origin: Point,
        size: Size,
        corner: f64,
        fill: Color,
    ) {
        self.queue(layer).push(DrawCommand::RoundRect {
            origin,
            size,
            corner,
            fill,
        });
    }

    pub fn text(
        &mut self,
        layer: DrawLayer,
        position: Point,
        text: impl Into<String>,
        color: Color,
        font_size: f64,
    ) {
        self.queue(layer).push(DrawCommand::Text {
            position,
            text: text.into(),
            color,
            font_size,
        });
    }

    /// Get the current drawing queue of one layer
    pub fn get_drawing_queue(&self, layer: DrawLayer) -> &[DrawCommand] {
        match layer {
            DrawLayer::World => &self.world,
            DrawLayer::Overlay => &self.overlay,
        }
    }

    /// Hands the queued commands over as a frame and leaves the context empty
    pub fn finish(&mut self, transform: Transform) -> Frame {
        Frame {
            background: self.background,
            transform,
            world: std::mem::take(&mut self.world),
            overlay: std::mem::take(&mut self.overlay),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layers_are_kept_apart() {
        let mut ctx = RenderContext::new(Size::new(100.0, 100.0), Color(0x1a1a1a));
        ctx.fill_rect(
            DrawLayer::World,
            Point::new(0.0, 0.0),
            Size::new(10.0, 10.0),
            Color(0x2b2b2b),
        );
        ctx.text(DrawLayer::Overlay, Point::new(30.0, 10.0), "Plain", Color::WHITE, 12.0);

        assert_eq!(ctx.get_drawing_queue(DrawLayer::World).len(), 1);
        assert_eq!(ctx.get_drawing_queue(DrawLayer::Overlay).len(), 1);

        let frame = ctx.finish(Transform::identity());
        assert_eq!(frame.command_count(), 2);
        assert_eq!(frame.texts().collect::<Vec<_>>(), vec!["Plain"]);
        assert!(ctx.get_drawing_queue(DrawLayer::World).is_empty());
    }

    #[test]
    fn test_begin_frame_clears_queues() {
        let mut ctx = RenderContext::new(Size::default(), Color(0));
        ctx.circle(DrawLayer::World, Point::new(1.0, 1.0), 6.0, Color(0x3ddc84));
        ctx.begin_frame();
        assert!(ctx.get_drawing_queue(DrawLayer::World).is_empty());
    }
}
