use foundation::color::Rgba;

use crate::surface::{Canvas, CompositeOp, Readback};

/// One recorded [`Canvas`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceOp {
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    Arc {
        cx: f64,
        cy: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        anticlockwise: bool,
    },
    ClosePath,
    Fill(Rgba),
    Stroke(Rgba),
    SetCompositeOp(CompositeOp),
    SetShadow(Rgba, f64),
    Clear,
}

/// A [`Canvas`] that draws nothing and records every call instead.
/// Reading pixels back yields a transparent buffer.
pub struct TraceCanvas {
    width: u32,
    height: u32,
    ops: Vec<TraceOp>,
}

impl TraceCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[TraceOp] {
        &self.ops
    }

    /// The colors of every `fill` call, in order.
    pub fn fills(&self) -> Vec<Rgba> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                TraceOp::Fill(color) => Some(*color),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for TraceCanvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn begin_path(&mut self) {
        self.ops.push(TraceOp::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ops.push(TraceOp::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ops.push(TraceOp::LineTo(x, y));
    }

    fn arc(
        &mut self,
        cx: f64,
        cy: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        anticlockwise: bool,
    ) {
        self.ops.push(TraceOp::Arc {
            cx,
            cy,
            radius,
            start_angle,
            end_angle,
            anticlockwise,
        });
    }

    fn close_path(&mut self) {
        self.ops.push(TraceOp::ClosePath);
    }

    fn fill(&mut self, color: Rgba) {
        self.ops.push(TraceOp::Fill(color));
    }

    fn stroke(&mut self, color: Rgba) {
        self.ops.push(TraceOp::Stroke(color));
    }

    fn set_composite_op(&mut self, op: CompositeOp) {
        self.ops.push(TraceOp::SetCompositeOp(op));
    }

    fn set_shadow(&mut self, color: Rgba, size: f64) {
        self.ops.push(TraceOp::SetShadow(color, size));
    }

    fn clear(&mut self) {
        self.ops.push(TraceOp::Clear);
    }
}

impl Readback for TraceCanvas {
    fn read_pixels(&self) -> Vec<u8> {
        vec![0; self.width as usize * self.height as usize * 4]
    }

    fn pixel_at(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some([0, 0, 0, 0])
    }
}

#[cfg(test)]
mod tests {
    use super::{Canvas, CompositeOp, Rgba, TraceCanvas, TraceOp};

    #[test]
    fn records_calls_in_order() {
        let mut canvas = TraceCanvas::new(8, 8);
        canvas.begin_path();
        canvas.move_to(1.0, 2.0);
        canvas.line_to(3.0, 4.0);
        canvas.close_path();
        canvas.set_composite_op(CompositeOp::DestinationOut);
        canvas.fill(Rgba::opaque(9, 8, 7));

        assert_eq!(
            canvas.ops(),
            &[
                TraceOp::BeginPath,
                TraceOp::MoveTo(1.0, 2.0),
                TraceOp::LineTo(3.0, 4.0),
                TraceOp::ClosePath,
                TraceOp::SetCompositeOp(CompositeOp::DestinationOut),
                TraceOp::Fill(Rgba::opaque(9, 8, 7)),
            ]
        );
    }

    #[test]
    fn fills_lists_fill_colors_only() {
        let mut canvas = TraceCanvas::new(8, 8);
        canvas.fill(Rgba::opaque(1, 0, 0));
        canvas.stroke(Rgba::opaque(2, 0, 0));
        canvas.fill(Rgba::opaque(3, 0, 0));

        assert_eq!(
            canvas.fills(),
            vec![Rgba::opaque(1, 0, 0), Rgba::opaque(3, 0, 0)]
        );
    }
}
