// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Stick-figure rasterization.

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut, draw_polygon_mut};
use imageproc::point::Point;
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

use crate::motion::ScreenMotion;
use crate::skeleton::{HEAD_JOINT, SKELETON};
use crate::visualizer::Color;

/// Static styling of bones and joints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    /// Bone stroke color.
    pub bone_color: Color,
    /// Bone stroke width in pixels.
    pub bone_width: u32,
    /// Joint fill color.
    pub joint_color: Color,
    /// Joint radius in pixels.
    pub joint_radius: u32,
    /// Head radius in pixels.
    pub head_radius: u32,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            bone_color: Color::BONE_GRAY,
            bone_width: 4,
            joint_color: Color::JOINT_BLUE,
            joint_radius: 6,
            head_radius: 14,
        }
    }
}

impl RenderStyle {
    /// Create a style with default colors and sizes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bone color and width.
    #[must_use]
    pub const fn with_bones(mut self, color: Color, width: u32) -> Self {
        self.bone_color = color;
        self.bone_width = width;
        self
    }

    /// Set joint color and radii.
    #[must_use]
    pub const fn with_joints(mut self, color: Color, radius: u32, head_radius: u32) -> Self {
        self.joint_color = color;
        self.joint_radius = radius;
        self.head_radius = head_radius;
        self
    }

    /// Radius used to draw `joint`.
    #[must_use]
    pub const fn radius_for(&self, joint: usize) -> u32 {
        if joint == HEAD_JOINT {
            self.head_radius
        } else {
            self.joint_radius
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn to_pixel(pose: &ArrayView2<'_, f32>, joint: usize) -> (i32, i32) {
    (pose[[joint, 0]].round() as i32, pose[[joint, 1]].round() as i32)
}

/// Draw a round-capped line of the given width.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_precision_loss)]
fn draw_thick_line(img: &mut RgbaImage, a: (i32, i32), b: (i32, i32), width: u32, color: Rgba<u8>) {
    let half = width as f32 / 2.0;
    let (dx, dy) = ((b.0 - a.0) as f32, (b.1 - a.1) as f32);
    let len = dx.hypot(dy);

    if width > 1 && len > 0.0 {
        let (nx, ny) = ((-dy / len * half).round() as i32, (dx / len * half).round() as i32);
        let poly = [
            Point::new(a.0 + nx, a.1 + ny),
            Point::new(b.0 + nx, b.1 + ny),
            Point::new(b.0 - nx, b.1 - ny),
            Point::new(a.0 - nx, a.1 - ny),
        ];
        if poly[0] != poly[3] {
            draw_polygon_mut(img, &poly, color);
        }
    }
    draw_line_segment_mut(
        img,
        (a.0 as f32, a.1 as f32),
        (b.0 as f32, b.1 as f32),
        color,
    );

    if width > 1 {
        let cap = half.round() as i32;
        draw_filled_circle_mut(img, a, cap, color);
        draw_filled_circle_mut(img, b, cap, color);
    }
}

/// Draw one `(22, 2)` screen pose onto `img`.
///
/// Bones are drawn first so joints sit on top of them.
#[allow(clippy::cast_possible_wrap)]
pub fn draw_stick_figure(img: &mut RgbaImage, pose: ArrayView2<'_, f32>, style: &RenderStyle) {
    let bone_color = style.bone_color.to_rgba();
    for [joint_a, joint_b] in SKELETON {
        draw_thick_line(
            img,
            to_pixel(&pose, joint_a),
            to_pixel(&pose, joint_b),
            style.bone_width,
            bone_color,
        );
    }

    let joint_color = style.joint_color.to_rgba();
    for joint in 0..pose.nrows() {
        let radius = style.radius_for(joint) as i32;
        draw_filled_circle_mut(img, to_pixel(&pose, joint), radius, joint_color);
    }
}

/// Render a single pose on a transparent square canvas.
#[must_use]
pub fn render_frame(pose: ArrayView2<'_, f32>, canvas_size: u32, style: &RenderStyle) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(canvas_size, canvas_size, Rgba([0, 0, 0, 0]));
    draw_stick_figure(&mut img, pose, style);
    img
}

/// Render every frame of a projected motion.
#[must_use]
pub fn render_frames(screen: &ScreenMotion, canvas_size: u32, style: &RenderStyle) -> Vec<RgbaImage> {
    (0..screen.num_frames())
        .map(|t| render_frame(screen.frame(t), canvas_size, style))
        .collect()
}
