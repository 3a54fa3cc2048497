//! Lyon tessellation of the bin's paper shapes into a flat triangle list.
//!
//! The host reads the buffer through a raw pointer after each tick and
//! draws it as-is: six floats per vertex, three vertices per triangle.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use lyon::math::point;
use lyon::path::Path;
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, FillVertexConstructor, LineCap,
    LineJoin, StrokeOptions, StrokeTessellator, StrokeVertex, StrokeVertexConstructor,
    VertexBuffers,
};

/// Per-vertex data for vector/polygon rendering.
/// 6 floats = 24 bytes per vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct VectorVertex {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl VectorVertex {
    /// Number of floats per vertex.
    pub const FLOATS: usize = 6;
    /// Stride in bytes.
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    fn at(p: lyon::math::Point, color: VectorColor) -> Self {
        Self {
            x: p.x,
            y: p.y,
            r: color.r,
            g: color.g,
            b: color.b,
            a: color.a,
        }
    }
}

/// Straight (non-premultiplied) RGBA, each channel in 0.0 - 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl VectorColor {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color from RGB u8 values (0-255) with full opacity.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba8(r, g, b, 255)
    }

    /// Create a color from RGBA u8 values (0-255).
    pub fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Pen ink for outlines and creases.
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Debug overlay.
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
}

impl Default for VectorColor {
    fn default() -> Self {
        Self::WHITE
    }
}

struct FillVertexCtor {
    color: VectorColor,
}

impl FillVertexConstructor<VectorVertex> for FillVertexCtor {
    fn new_vertex(&mut self, vertex: FillVertex) -> VectorVertex {
        VectorVertex::at(vertex.position(), self.color)
    }
}

struct StrokeVertexCtor {
    color: VectorColor,
}

impl StrokeVertexConstructor<VectorVertex> for StrokeVertexCtor {
    fn new_vertex(&mut self, vertex: StrokeVertex) -> VectorVertex {
        VectorVertex::at(vertex.position(), self.color)
    }
}

/// Build a path through `points`, closed or open. `None` for fewer than two.
fn polyline_path(points: &[Vec2], closed: bool) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    if rest.is_empty() {
        return None;
    }
    let mut builder = Path::builder();
    builder.begin(point(first.x, first.y));
    for p in rest {
        builder.line_to(point(p.x, p.y));
    }
    builder.end(closed);
    Some(builder.build())
}

/// Tessellators plus the frame's output buffer.
///
/// Cleared at the start of each paint and filled by drawing commands in
/// painter's order.
pub struct VectorState {
    fill_tess: FillTessellator,
    stroke_tess: StrokeTessellator,
    geometry: VertexBuffers<VectorVertex, u32>,
    buffer: Vec<VectorVertex>,
    tolerance: f32,
}

impl VectorState {
    pub fn new() -> Self {
        Self {
            fill_tess: FillTessellator::new(),
            stroke_tess: StrokeTessellator::new(),
            geometry: VertexBuffers::new(),
            buffer: Vec::with_capacity(4096),
            tolerance: 0.25,
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn vertex_count(&self) -> usize {
        self.buffer.len()
    }

    pub fn vertices(&self) -> &[VectorVertex] {
        &self.buffer
    }

    /// The buffer as the flat float array the host reads.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.buffer)
    }

    /// Raw pointer to the flat float buffer, for the host to copy from.
    pub fn buffer_ptr(&self) -> *const f32 {
        self.as_floats().as_ptr()
    }

    /// Flush indexed geometry to the flat buffer as a triangle list.
    fn flush_geometry(&mut self) {
        let vertices = &self.geometry.vertices;
        self.buffer
            .extend(self.geometry.indices.iter().map(|&idx| vertices[idx as usize]));
        self.geometry.vertices.clear();
        self.geometry.indices.clear();
    }

    /// Fill a closed polygon. Fewer than three points draws nothing.
    pub fn fill_polygon(&mut self, points: &[Vec2], color: VectorColor) {
        if points.len() < 3 {
            return;
        }
        let Some(path) = polyline_path(points, true) else {
            return;
        };
        let result = self.fill_tess.tessellate_path(
            &path,
            &FillOptions::tolerance(self.tolerance),
            &mut BuffersBuilder::new(&mut self.geometry, FillVertexCtor { color }),
        );
        self.finish(result.is_ok());
    }

    /// Stroke the closed outline of a polygon with rounded joins.
    pub fn stroke_polygon(&mut self, points: &[Vec2], width: f32, color: VectorColor) {
        if points.len() < 3 {
            return;
        }
        if let Some(path) = polyline_path(points, true) {
            self.stroke_path(&path, width, color);
        }
    }

    /// Stroke an open polyline with round caps.
    pub fn stroke_polyline(&mut self, points: &[Vec2], width: f32, color: VectorColor) {
        if let Some(path) = polyline_path(points, false) {
            self.stroke_path(&path, width, color);
        }
    }

    pub fn stroke_segment(&mut self, from: Vec2, to: Vec2, width: f32, color: VectorColor) {
        self.stroke_polyline(&[from, to], width, color);
    }

    /// Small filled square centred on `at`.
    pub fn mark(&mut self, at: Vec2, size: f32, color: VectorColor) {
        let h = size * 0.5;
        self.fill_polygon(
            &[
                at + Vec2::new(-h, -h),
                at + Vec2::new(h, -h),
                at + Vec2::new(h, h),
                at + Vec2::new(-h, h),
            ],
            color,
        );
    }

    fn stroke_path(&mut self, path: &Path, width: f32, color: VectorColor) {
        if !(width > 0.0) {
            return;
        }
        let options = StrokeOptions::tolerance(self.tolerance)
            .with_line_width(width)
            .with_line_join(LineJoin::Round)
            .with_line_cap(LineCap::Round);
        let result = self.stroke_tess.tessellate_path(
            path,
            &options,
            &mut BuffersBuilder::new(&mut self.geometry, StrokeVertexCtor { color }),
        );
        self.finish(result.is_ok());
    }

    fn finish(&mut self, ok: bool) {
        if ok {
            self.flush_geometry();
        } else {
            log::debug!("tessellation failed, shape skipped");
            self.geometry.vertices.clear();
            self.geometry.indices.clear();
        }
    }
}

impl Default for VectorState {
    fn default() -> Self {
        Self::new()
    }
}
