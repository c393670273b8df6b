//! Keyframe sampling.
//!
//! Model:
//! - Times are in seconds, non-decreasing, starting at 0.
//! - At or before the first time (or with a single frame) the first frame is
//!   held; at or after the last time the last frame is held.
//! - In between, translation and scale interpolate linearly and rotation uses
//!   NLERP. Zero-length intervals (repeated times) are skipped.

use crate::data::{Keyframes, Track, Transform};
use crate::interp::{lerp_vec3, nlerp_quat};

/// Where a sample time falls within a keyframe array.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Segment {
    /// Hold the frame at this index.
    Frame(usize),
    /// Blend frame `left` toward `left + 1` by `fraction` in (0, 1).
    Between { left: usize, fraction: f32 },
}

/// Locate `t` among `times`. `times` must not be empty.
pub fn find_segment(times: &[f32], t: f32) -> Segment {
    let n = times.len();
    if n <= 1 || t <= 0.0 || t <= times[0] {
        return Segment::Frame(0);
    }
    if t >= times[n - 1] {
        return Segment::Frame(n - 1);
    }
    for i in 0..(n - 1) {
        let t0 = times[i];
        let t1 = times[i + 1];
        if t1 <= t0 {
            continue;
        }
        if t0 <= t && t <= t1 {
            if t == t0 {
                return Segment::Frame(i);
            }
            if t == t1 {
                return Segment::Frame(i + 1);
            }
            let fraction = (t - t0) / (t1 - t0);
            return Segment::Between { left: i, fraction };
        }
    }
    Segment::Frame(n - 1)
}

/// Sample keyframes at time `t` (seconds). Empty keyframes sample as identity.
pub fn sample_keyframes(keyframes: &Keyframes, t: f32) -> Transform {
    if keyframes.is_empty() {
        return Transform::IDENTITY;
    }
    match find_segment(&keyframes.times, t) {
        Segment::Frame(i) => keyframes.frame(i),
        Segment::Between { left, fraction } => {
            let a = keyframes.frame(left);
            let b = keyframes.frame(left + 1);
            Transform {
                translation: lerp_vec3(a.translation, b.translation, fraction),
                rotation: nlerp_quat(a.rotation, b.rotation, fraction),
                scale: lerp_vec3(a.scale, b.scale, fraction),
            }
        }
    }
}

/// Sample a track of either representation at time `t`.
pub fn sample_track(track: &Track, t: f32) -> Transform {
    sample_keyframes(track.keyframes(), t)
}
