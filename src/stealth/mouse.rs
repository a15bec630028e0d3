//! Pointer motion planning
//!
//! Turns a start/end pair into a time-annotated Bezier path with optional
//! overshoot and tremor corrections. Planning is pure: the same draw sequence
//! always yields the same path.

use std::f64::consts::{FRAC_PI_2, TAU};
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::MotionProfile;

use super::{chance, millis};

/// Sampled curve length range (inclusive)
const MIN_CURVE_SAMPLES: usize = 20;
const MAX_CURVE_SAMPLES: usize = 49;

/// Interior control points stray at most this fraction of the distance
const MAX_CONTROL_OFFSET_RATIO: f64 = 0.2;

/// Base per-step delay range (ms)
const MIN_STEP_DELAY_MS: u64 = 5;
const MAX_STEP_DELAY_MS: u64 = 14;

/// Overshoot excursion distance range
const MIN_OVERSHOOT: f64 = 10.0;
const MAX_OVERSHOOT: f64 = 40.0;

/// Tremor jitter on each axis
const MICRO_JITTER: f64 = 2.0;

/// A 2D coordinate
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Linear interpolation towards `other` at `t`
    pub fn lerp(&self, other: Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

/// Axis-aligned rectangle, e.g. an element's bounding box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    /// Uniformly random point inside the box
    pub fn random_point<R: Rng>(&self, rng: &mut R) -> Point {
        Point::new(
            self.x + rng.gen::<f64>() * self.width,
            self.y + rng.gen::<f64>() * self.height,
        )
    }
}

/// Role of a step within a motion plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionKind {
    /// Point on the main Bezier curve
    Path,
    /// Jittered tremor point emitted before a curve point
    MicroCorrection,
    /// Excursion past the target and the return to it
    Overshoot,
}

/// One pointer move followed by a wait
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionStep {
    pub point: Point,
    pub delay: Duration,
    pub kind: MotionKind,
}

impl MotionStep {
    fn new(point: Point, delay: Duration, kind: MotionKind) -> Self {
        Self { point, delay, kind }
    }
}

/// Generate a human-like pointer path from `start` to `end`
pub fn generate_path<R: Rng>(
    start: Point,
    end: Point,
    profile: &MotionProfile,
    rng: &mut R,
) -> Vec<MotionStep> {
    let controls = control_points(start, end, profile.control_point_count, rng);
    let sample_count = rng.gen_range(MIN_CURVE_SAMPLES..=MAX_CURVE_SAMPLES);
    let curve = sample_curve(&controls, sample_count, start, end);

    let last = curve.len() - 1;
    let mut steps = Vec::with_capacity(curve.len() + 8);

    for (i, point) in curve.into_iter().enumerate() {
        let delay = step_delay(profile.speed_variation, rng);

        if i > 0 && i < last && chance(rng, profile.micro_correction_probability) {
            let jitter = Point::new(
                point.x + rng.gen_range(-MICRO_JITTER..=MICRO_JITTER),
                point.y + rng.gen_range(-MICRO_JITTER..=MICRO_JITTER),
            );
            steps.push(MotionStep::new(jitter, delay / 2, MotionKind::MicroCorrection));
        }

        steps.push(MotionStep::new(point, delay, MotionKind::Path));
    }

    if chance(rng, profile.overshoot_probability) {
        let reach = rng.gen_range(MIN_OVERSHOOT..=MAX_OVERSHOOT);
        let angle = rng.gen_range(0.0..TAU);
        let overshoot = Point::new(end.x + reach * angle.cos(), end.y + reach * angle.sin());

        let delay = step_delay(profile.speed_variation, rng);
        steps.push(MotionStep::new(overshoot, delay, MotionKind::Overshoot));
        let delay = step_delay(profile.speed_variation, rng);
        steps.push(MotionStep::new(end, delay, MotionKind::Overshoot));
    }

    log::debug!(
        "Planned pointer path ({:.1}, {:.1}) -> ({:.1}, {:.1}): {} steps",
        start.x,
        start.y,
        end.x,
        end.y,
        steps.len()
    );

    steps
}

/// Build control points displaced perpendicular to the start-end line
fn control_points<R: Rng>(start: Point, end: Point, count: usize, rng: &mut R) -> Vec<Point> {
    let count = count.max(2);
    let distance = start.distance(end);
    let max_offset = distance * MAX_CONTROL_OFFSET_RATIO;
    let normal = (end.y - start.y).atan2(end.x - start.x) + FRAC_PI_2;

    let mut points = Vec::with_capacity(count);
    points.push(start);

    for i in 1..count - 1 {
        let t = i as f64 / (count - 1) as f64;
        let base = start.lerp(end, t);

        // No perpendicular exists for a zero-length move
        let offset = if distance > 0.0 {
            rng.gen_range(-1.0..=1.0) * max_offset
        } else {
            0.0
        };

        points.push(Point::new(
            base.x + offset * normal.cos(),
            base.y + offset * normal.sin(),
        ));
    }

    points.push(end);
    points
}

/// Sample `count` points uniformly in t, pinning the endpoints
fn sample_curve(controls: &[Point], count: usize, start: Point, end: Point) -> Vec<Point> {
    if start == end {
        return vec![start; count];
    }

    let mut curve: Vec<Point> = (0..count)
        .map(|i| bezier_point(controls, i as f64 / (count - 1) as f64))
        .collect();

    curve[0] = start;
    curve[count - 1] = end;
    curve
}

/// Evaluate the Bezier curve at `t` as a Bernstein-weighted sum
pub fn bezier_point(controls: &[Point], t: f64) -> Point {
    let n = controls.len() - 1;

    controls
        .iter()
        .enumerate()
        .fold(Point::default(), |acc, (i, p)| {
            let weight = binomial_coefficient(n, i)
                * (1.0 - t).powi((n - i) as i32)
                * t.powi(i as i32);
            Point::new(acc.x + weight * p.x, acc.y + weight * p.y)
        })
}

fn binomial_coefficient(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    if k == 0 || k == n {
        return 1.0;
    }

    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}

/// Per-step delay: 5-14ms base, varied by `speed_variation`, never negative
fn step_delay<R: Rng>(speed_variation: f64, rng: &mut R) -> Duration {
    let base = rng.gen_range(MIN_STEP_DELAY_MS..=MAX_STEP_DELAY_MS) as f64;
    let variation = base * speed_variation * rng.gen_range(-1.0..=1.0);
    millis(base + variation)
}
