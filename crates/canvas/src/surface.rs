use foundation::color::Rgba;

/// Pixel compositing mode for subsequent fill and stroke calls.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum CompositeOp {
    /// Painted pixels blend over what is already there.
    #[default]
    SourceOver,
    /// Painted pixels erase what is already there; the paint itself
    /// leaves no color behind.
    DestinationOut,
}

/// A 2D drawing surface with path-based fills.
///
/// Path contract:
/// - `begin_path` discards all accumulated subpaths.
/// - `move_to` starts a new subpath; `line_to` extends the current one
///   (or starts one when none is open).
/// - `arc` appends a circular arc from `start_angle` to `end_angle`,
///   sweeping clockwise in screen space unless `anticlockwise` is set.
///   When a subpath is already open, a straight segment connects the
///   current point to the arc's start point first.
/// - `close_path` joins the current subpath back to its first point.
///
/// `fill` paints every accumulated subpath with the even-odd rule, so
/// inner rings wound in either direction cut holes. Open subpaths are
/// treated as closed for filling; `stroke` only draws the closing edge
/// of subpaths that were explicitly closed.
pub trait Canvas {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn arc(
        &mut self,
        cx: f64,
        cy: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        anticlockwise: bool,
    );
    fn close_path(&mut self);

    fn fill(&mut self, color: Rgba);
    fn stroke(&mut self, color: Rgba);

    fn set_composite_op(&mut self, op: CompositeOp);

    /// Hint that subsequent fills should bleed softly outward by
    /// roughly `size` pixels in `color`. Surfaces may approximate or
    /// ignore it; passing `size` of zero turns the hint off.
    fn set_shadow(&mut self, color: Rgba, size: f64);

    /// Reset every pixel to transparent and drop any accumulated path.
    fn clear(&mut self);
}

/// Read access to the finished pixels of a surface.
pub trait Readback {
    /// Returns the surface contents as tightly packed RGBA bytes,
    /// rows top to bottom, `width * height * 4` long.
    fn read_pixels(&self) -> Vec<u8>;

    /// Returns the RGBA bytes of a single pixel, or `None` outside
    /// the surface.
    fn pixel_at(&self, x: u32, y: u32) -> Option<[u8; 4]>;
}
