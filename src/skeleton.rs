// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! SMPL-H 22-joint body convention shared by every pipeline stage.

/// Number of body joints in every pose.
pub const NUM_JOINTS: usize = 22;

/// Index of the head joint, drawn with a larger radius.
pub const HEAD_JOINT: usize = 15;

/// Joint names indexed by joint id.
pub const JOINT_NAMES: [&str; NUM_JOINTS] = [
    "pelvis",
    "left_hip",
    "right_hip",
    "spine1",
    "left_knee",
    "right_knee",
    "spine2",
    "left_ankle",
    "right_ankle",
    "spine3",
    "left_foot",
    "right_foot",
    "neck",
    "left_collar",
    "right_collar",
    "head",
    "left_shoulder",
    "right_shoulder",
    "left_elbow",
    "right_elbow",
    "left_wrist",
    "right_wrist",
];

/// SMPL-H kinematic tree as (parent, child) joint pairs.
/// Defines which joints connect to form the stick figure.
pub const SKELETON: [[usize; 2]; 21] = [
    [0, 3],   // pelvis to spine1
    [3, 6],   // spine1 to spine2
    [6, 9],   // spine2 to spine3
    [9, 12],  // spine3 to neck
    [12, 15], // neck to head
    [0, 1],   // pelvis to left hip
    [1, 4],   // left hip to left knee
    [4, 7],   // left knee to left ankle
    [7, 10],  // left ankle to left foot
    [0, 2],   // pelvis to right hip
    [2, 5],   // right hip to right knee
    [5, 8],   // right knee to right ankle
    [8, 11],  // right ankle to right foot
    [9, 13],  // spine3 to left collar
    [13, 16], // left collar to left shoulder
    [16, 18], // left shoulder to left elbow
    [18, 20], // left elbow to left wrist
    [9, 14],  // spine3 to right collar
    [14, 17], // right collar to right shoulder
    [17, 19], // right shoulder to right elbow
    [19, 21], // right elbow to right wrist
];

/// Look up a joint name by index.
#[must_use]
pub fn joint_name(index: usize) -> Option<&'static str> {
    JOINT_NAMES.get(index).copied()
}
