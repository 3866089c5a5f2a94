use glam::Vec3;

use super::route::ResolvedPath;

/// Parameter advance per step. At one step per frame this walks one path
/// segment in roughly a thousand frames.
pub const DEFAULT_STEP_SIZE: f32 = 0.001;

enum AnimatorState {
    Idle,
    Animating { path: ResolvedPath, t: f32 },
}

/// Steps a marker along a resolved path, one parameter increment per call.
///
/// The path parameter `t` spans one unit per segment: the integer part picks
/// the segment, the fraction interpolates inside it. Stepping past the last
/// segment snaps back to the start, so the walk loops until [`clear`] or the
/// next [`install`] replaces it.
///
/// [`clear`]: PathAnimator::clear
/// [`install`]: PathAnimator::install
pub struct PathAnimator {
    state: AnimatorState,
    step_size: f32,
}

impl PathAnimator {
    pub fn new() -> Self {
        Self::with_step_size(DEFAULT_STEP_SIZE)
    }

    pub fn with_step_size(step_size: f32) -> Self {
        Self {
            state: AnimatorState::Idle,
            step_size,
        }
    }

    pub fn step_size(&self) -> f32 {
        self.step_size
    }

    /// Adopt a path and rewind to its first point. Any previous walk is
    /// discarded.
    pub fn install(&mut self, path: ResolvedPath) {
        self.state = AnimatorState::Animating { path, t: 0.0 };
    }

    /// Drop the current path. Subsequent steps do nothing.
    pub fn clear(&mut self) {
        self.state = AnimatorState::Idle;
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.state, AnimatorState::Animating { .. })
    }

    pub fn path(&self) -> Option<&ResolvedPath> {
        match &self.state {
            AnimatorState::Animating { path, .. } => Some(path),
            AnimatorState::Idle => None,
        }
    }

    /// Current marker position without advancing.
    pub fn position(&self) -> Option<Vec3> {
        match &self.state {
            AnimatorState::Animating { path, t } => Some(sample(path, *t)),
            AnimatorState::Idle => None,
        }
    }

    /// Advance one step and return the new marker position, or None when
    /// idle. Reaching the end of the path snaps the marker back to the
    /// exact first point.
    pub fn step(&mut self) -> Option<Vec3> {
        match &mut self.state {
            AnimatorState::Animating { path, t } => {
                *t += self.step_size;
                if *t >= path.segment_count() as f32 {
                    *t = 0.0;
                }
                Some(sample(path, *t))
            }
            AnimatorState::Idle => None,
        }
    }
}

impl Default for PathAnimator {
    fn default() -> Self {
        Self::new()
    }
}

fn sample(path: &ResolvedPath, t: f32) -> Vec3 {
    let points = path.points();
    let segment = (t.floor() as usize).min(path.segment_count() - 1);
    let frac = t - segment as f32;
    points[segment].lerp(points[segment + 1], frac)
}
