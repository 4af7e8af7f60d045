// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Lottie vector animation assembly.
//!
//! Bones become open two-vertex paths keyed at the union of their endpoint keyframes.
//! Joints become ellipses whose transform position is keyed at the joint's keyframes.
//! Everything else is static, so the document only grows with the number of keyframes.

use serde::Serialize;

use crate::keyframes::KeyframeMap;
use crate::motion::ScreenMotion;
use crate::render::RenderStyle;
use crate::skeleton::SKELETON;
use crate::visualizer::Color;

/// Lottie schema version written to every document.
pub const LOTTIE_VERSION: &str = "5.7.4";

/// Ease-in tangent of every keyframe.
const EASE_IN: f32 = 0.833;
/// Ease-out tangent of every keyframe.
const EASE_OUT: f32 = 0.167;

/// Bezier easing handle.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Easing {
    x: [f32; 1],
    y: [f32; 1],
}

impl Easing {
    const fn uniform(value: f32) -> Self {
        Self { x: [value], y: [value] }
    }
}

/// A keyframed value.
#[derive(Debug, Clone, Serialize)]
pub struct Keyframe<T> {
    i: Easing,
    o: Easing,
    t: usize,
    s: T,
}

impl<T> Keyframe<T> {
    const fn new(t: usize, s: T) -> Self {
        Self {
            i: Easing::uniform(EASE_IN),
            o: Easing::uniform(EASE_OUT),
            t,
            s,
        }
    }
}

/// Static (`a: 0`) or animated (`a: 1`) property.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Property<T> {
    Static { a: u8, k: T },
    Animated { a: u8, k: Vec<Keyframe<T>> },
}

impl<T> Property<T> {
    const fn fixed(k: T) -> Self {
        Self::Static { a: 0, k }
    }

    const fn animated(k: Vec<Keyframe<T>>) -> Self {
        Self::Animated { a: 1, k }
    }

    /// Whether this property changes over time.
    pub const fn is_animated(&self) -> bool {
        matches!(self, Self::Animated { .. })
    }
}

/// Bezier path with in/out tangents and vertices.
#[derive(Debug, Clone, Serialize)]
pub struct PathShape {
    i: Vec<[f32; 2]>,
    o: Vec<[f32; 2]>,
    v: Vec<[f32; 2]>,
    c: bool,
}

impl PathShape {
    /// Open straight segment between two points.
    fn segment(a: [f32; 2], b: [f32; 2]) -> Self {
        Self {
            i: vec![[0.0, 0.0]; 2],
            o: vec![[0.0, 0.0]; 2],
            v: vec![a, b],
            c: false,
        }
    }
}

/// Shape items used by the two layers.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "ty")]
pub enum ShapeItem {
    #[serde(rename = "gr")]
    Group {
        nm: String,
        np: u32,
        cix: u32,
        bm: u32,
        it: Vec<ShapeItem>,
    },
    #[serde(rename = "sh")]
    Path { ks: Property<Vec<PathShape>> },
    #[serde(rename = "st")]
    Stroke {
        c: Property<[f32; 4]>,
        o: Property<f32>,
        w: Property<f32>,
        lc: u8,
        lj: u8,
    },
    #[serde(rename = "el")]
    Ellipse {
        p: Property<[f32; 2]>,
        s: Property<[f32; 2]>,
    },
    #[serde(rename = "fl")]
    Fill {
        c: Property<[f32; 4]>,
        o: Property<f32>,
    },
    #[serde(rename = "tr")]
    Transform {
        nm: String,
        p: Property<[f32; 2]>,
        a: Property<[f32; 2]>,
        s: Property<[f32; 2]>,
        r: Property<f32>,
        o: Property<f32>,
    },
}

impl ShapeItem {
    /// Group transform with position `p` and identity everything else.
    fn transform(p: Property<[f32; 2]>) -> Self {
        Self::Transform {
            nm: "Transform".to_string(),
            p,
            a: Property::fixed([0.0, 0.0]),
            s: Property::fixed([100.0, 100.0]),
            r: Property::fixed(0.0),
            o: Property::fixed(100.0),
        }
    }

    fn group(nm: String, it: Vec<Self>) -> Self {
        Self::Group {
            nm,
            np: 2,
            cix: 2,
            bm: 0,
            it,
        }
    }
}

/// Layer transform, always static.
#[derive(Debug, Clone, Serialize)]
pub struct LayerTransform {
    o: Property<f32>,
    r: Property<f32>,
    p: Property<[f32; 3]>,
    a: Property<[f32; 3]>,
    s: Property<[f32; 3]>,
}

impl Default for LayerTransform {
    fn default() -> Self {
        Self {
            o: Property::fixed(100.0),
            r: Property::fixed(0.0),
            p: Property::fixed([0.0, 0.0, 0.0]),
            a: Property::fixed([0.0, 0.0, 0.0]),
            s: Property::fixed([100.0, 100.0, 100.0]),
        }
    }
}

/// Shape layer (`ty: 4`).
#[derive(Debug, Clone, Serialize)]
pub struct Layer {
    ddd: u8,
    ind: u32,
    ty: u8,
    nm: String,
    sr: u32,
    ks: LayerTransform,
    ao: u8,
    shapes: Vec<ShapeItem>,
    ip: usize,
    op: usize,
    st: usize,
    bm: u32,
}

impl Layer {
    fn shape_layer(ind: u32, nm: &str, shapes: Vec<ShapeItem>, op: usize) -> Self {
        Self {
            ddd: 0,
            ind,
            ty: 4,
            nm: nm.to_string(),
            sr: 1,
            ks: LayerTransform::default(),
            ao: 0,
            shapes,
            ip: 0,
            op,
            st: 0,
            bm: 0,
        }
    }

    /// Layer name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.nm
    }

    /// Top-level shape groups.
    #[must_use]
    pub fn shapes(&self) -> &[ShapeItem] {
        &self.shapes
    }
}

/// Complete Lottie document.
#[derive(Debug, Clone, Serialize)]
pub struct LottieAnimation {
    v: &'static str,
    fr: u32,
    ip: usize,
    op: usize,
    w: u32,
    h: u32,
    nm: String,
    ddd: u8,
    assets: Vec<serde_json::Value>,
    layers: Vec<Layer>,
}

impl LottieAnimation {
    /// Frame rate.
    #[must_use]
    pub const fn fps(&self) -> u32 {
        self.fr
    }

    /// Out point, equal to the number of source frames.
    #[must_use]
    pub const fn duration_frames(&self) -> usize {
        self.op
    }

    /// Layers in document order.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Compact JSON encoding.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

fn rgba(color: Color) -> [f32; 4] {
    let [r, g, b] = color.normalized();
    [r, g, b, 1.0]
}

fn point(screen: &ScreenMotion, t: usize, joint: usize) -> [f32; 2] {
    let data = screen.data();
    [data[[t, joint, 0]], data[[t, joint, 1]]]
}

fn bone_group(index: usize, [a, b]: [usize; 2], screen: &ScreenMotion, keyframes: &KeyframeMap, style: &RenderStyle) -> ShapeItem {
    let path = keyframes
        .bone(a, b)
        .into_iter()
        .map(|t| Keyframe::new(t, vec![PathShape::segment(point(screen, t, a), point(screen, t, b))]))
        .collect();

    #[allow(clippy::cast_precision_loss)]
    let stroke = ShapeItem::Stroke {
        c: Property::fixed(rgba(style.bone_color)),
        o: Property::fixed(100.0),
        w: Property::fixed(style.bone_width as f32),
        lc: 2,
        lj: 2,
    };

    ShapeItem::group(
        format!("Bone_{index}"),
        vec![
            ShapeItem::Path { ks: Property::animated(path) },
            stroke,
            ShapeItem::transform(Property::fixed([0.0, 0.0])),
        ],
    )
}

fn joint_group(joint: usize, frames: &[usize], screen: &ScreenMotion, style: &RenderStyle) -> ShapeItem {
    #[allow(clippy::cast_precision_loss)]
    let diameter = 2.0 * style.radius_for(joint) as f32;
    let position = frames
        .iter()
        .map(|&t| Keyframe::new(t, point(screen, t, joint)))
        .collect();

    ShapeItem::group(
        format!("Joint_{joint}"),
        vec![
            ShapeItem::Ellipse {
                p: Property::fixed([0.0, 0.0]),
                s: Property::fixed([diameter, diameter]),
            },
            ShapeItem::Fill {
                c: Property::fixed(rgba(style.joint_color)),
                o: Property::fixed(100.0),
            },
            ShapeItem::transform(Property::animated(position)),
        ],
    )
}

/// Assemble a Lottie document from a projected motion and its keyframes.
///
/// # Arguments
///
/// * `screen` - Projected `(T, 22, 2)` motion at the source frame rate.
/// * `keyframes` - Per-joint keyframes detected on `screen`.
/// * `canvas_size` - Width and height of the composition.
/// * `fps` - Frame rate written to the document.
/// * `style` - Bone and joint styling.
#[must_use]
pub fn create_lottie_animation(
    screen: &ScreenMotion,
    keyframes: &KeyframeMap,
    canvas_size: u32,
    fps: u32,
    style: &RenderStyle,
) -> LottieAnimation {
    let total = screen.num_frames();

    let bones = SKELETON
        .iter()
        .enumerate()
        .map(|(index, &bone)| bone_group(index, bone, screen, keyframes, style))
        .collect();

    let joints = keyframes
        .iter()
        .map(|(joint, frames)| joint_group(joint, frames, screen, style))
        .collect();

    LottieAnimation {
        v: LOTTIE_VERSION,
        fr: fps,
        ip: 0,
        op: total,
        w: canvas_size,
        h: canvas_size,
        nm: "Exercise Animation".to_string(),
        ddd: 0,
        assets: Vec::new(),
        layers: vec![
            Layer::shape_layer(1, "Bones", bones, total),
            Layer::shape_layer(2, "Joints", joints, total),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyframes::{KeyframeConfig, optimize_all_joints};
    use crate::skeleton::{HEAD_JOINT, NUM_JOINTS};
    use ndarray::Array3;
    use serde_json::Value;

    /// Every joint moves right for 10 frames then down for 10.
    fn corner_motion() -> ScreenMotion {
        let data = Array3::from_shape_fn((20, NUM_JOINTS, 2), |(t, j, c)| {
            let base = 10.0 * j as f32;
            match (c, t < 10) {
                (0, true) => base + 10.0 * t as f32,
                (0, false) => base + 90.0,
                (_, true) => 50.0,
                (_, false) => 50.0 + 10.0 * (t - 9) as f32,
            }
        });
        ScreenMotion::new(data).unwrap()
    }

    fn document() -> (Value, KeyframeMap) {
        let screen = corner_motion();
        let map = optimize_all_joints(&screen, &KeyframeConfig::default()).unwrap();
        let anim = create_lottie_animation(&screen, &map, 400, 30, &RenderStyle::default());
        (serde_json::from_str(&anim.to_json().unwrap()).unwrap(), map)
    }

    #[test]
    fn test_header() {
        let (doc, _) = document();
        assert_eq!(doc["v"], "5.7.4");
        assert_eq!(doc["fr"], 30);
        assert_eq!(doc["ip"], 0);
        assert_eq!(doc["op"], 20);
        assert_eq!(doc["w"], 400);
        assert_eq!(doc["h"], 400);
        assert_eq!(doc["ddd"], 0);
        assert_eq!(doc["layers"].as_array().unwrap().len(), 2);
        assert_eq!(doc["layers"][0]["nm"], "Bones");
        assert_eq!(doc["layers"][1]["nm"], "Joints");
        assert_eq!(doc["layers"][0]["ty"], 4);
    }

    #[test]
    fn test_bone_groups() {
        let (doc, map) = document();
        let bones = doc["layers"][0]["shapes"].as_array().unwrap();
        assert_eq!(bones.len(), SKELETON.len());

        let first = &bones[0];
        assert_eq!(first["ty"], "gr");
        assert_eq!(first["nm"], "Bone_0");
        let items = first["it"].as_array().unwrap();
        assert_eq!(items[0]["ty"], "sh");
        assert_eq!(items[1]["ty"], "st");
        assert_eq!(items[1]["lc"], 2);
        assert_eq!(items[1]["w"]["k"], 4.0);
        assert_eq!(items[2]["ty"], "tr");

        let path = &items[0]["ks"];
        assert_eq!(path["a"], 1);
        let keys = path["k"].as_array().unwrap();
        assert_eq!(keys.len(), map.bone(0, 3).len());
        assert_eq!(keys[0]["s"][0]["c"], false);
        assert_eq!(keys[0]["s"][0]["v"].as_array().unwrap().len(), 2);
        assert_eq!(keys[0]["s"][0]["v"][0][0], 0.0);
        assert_eq!(keys[0]["s"][0]["v"][1][0], 30.0);
    }

    #[test]
    fn test_joint_groups() {
        let (doc, map) = document();
        let joints = doc["layers"][1]["shapes"].as_array().unwrap();
        assert_eq!(joints.len(), NUM_JOINTS);

        let head = &joints[HEAD_JOINT]["it"];
        assert_eq!(head[0]["ty"], "el");
        assert_eq!(head[0]["s"]["k"][0], 28.0);
        assert_eq!(head[1]["ty"], "fl");
        assert_eq!(joints[0]["it"][0]["s"]["k"][0], 12.0);

        let position = &joints[0]["it"][2]["p"];
        assert_eq!(position["a"], 1);
        let times: Vec<u64> = position["k"]
            .as_array()
            .unwrap()
            .iter()
            .map(|k| k["t"].as_u64().unwrap())
            .collect();
        assert_eq!(times, vec![0, 9, 19]);
        assert_eq!(map.joint(0), &[0, 9, 19]);
        assert_eq!(position["k"][1]["s"][0], 90.0);
        assert_eq!(position["k"][1]["s"][1], 50.0);
    }

    #[test]
    fn test_easing_and_colors() {
        let (doc, _) = document();
        let key = &doc["layers"][1]["shapes"][0]["it"][2]["p"]["k"][0];
        let ease_in = key["i"]["x"][0].as_f64().unwrap();
        let ease_out = key["o"]["y"][0].as_f64().unwrap();
        assert!((ease_in - 0.833).abs() < 1e-6);
        assert!((ease_out - 0.167).abs() < 1e-6);

        let fill = &doc["layers"][1]["shapes"][0]["it"][1]["c"]["k"];
        assert_eq!(fill.as_array().unwrap().len(), 4);
        assert_eq!(fill[3], 1.0);
        assert!((fill[2].as_f64().unwrap() - 246.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_static_properties_are_not_animated() {
        assert!(!Property::fixed(1.0f32).is_animated());
        assert!(Property::animated(vec![Keyframe::new(0, 1.0f32)]).is_animated());
    }
}
