//! Procedural course generation
//!
//! The course is an ordered platform sequence, left to right in generation
//! order. Camera shifts translate it and cull from the front, but never reorder
//! it. `generated` counts every platform ever created this session and is what
//! the difficulty curve is indexed by.

use serde::{Deserialize, Serialize};

use super::difficulty::{difficulty, gap_for_difficulty, height_change_for_difficulty};
use super::rng::RandomSource;
use super::state::{Platform, Viewport};
use crate::consts::*;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Course {
    pub platforms: Vec<Platform>,
    generated: u32,
}

impl Course {
    /// Launch pad plus the initial run of platforms
    pub fn seeded(viewport: Viewport, tuning: &Tuning, rng: &mut impl RandomSource) -> Self {
        let base_y = viewport.height - tuning.platform_bottom_margin;
        let mut course = Self::from_platform(Platform {
            x: LAUNCH_PAD_X,
            y: base_y,
            width: tuning.launch_pad_width(),
            height: tuning.platform_height,
            color_index: 0,
        });

        // The initial run is laid out on its own cursor: x starts at a fixed
        // offset instead of the pad's right edge.
        let mut x = FIRST_PLATFORM_X;
        let mut y = base_y;
        for i in 0..tuning.initial_platforms {
            let d = difficulty(i);
            x += gap_for_difficulty(d, tuning);
            y += height_change_for_difficulty(d, tuning, rng);
            y = tuning.clamp_platform_y(y, viewport.height);

            course.push(Platform {
                x,
                y,
                width: tuning.platform_width,
                height: tuning.platform_height,
                color_index: i as usize % PLATFORM_COLORS.len(),
            });
        }

        log::debug!("Seeded course with {} platforms", course.generated);
        course
    }

    /// Course containing a single platform
    pub fn from_platform(platform: Platform) -> Self {
        Self {
            platforms: vec![platform],
            generated: 1,
        }
    }

    /// Total platforms created this session (pruning does not decrement it)
    pub fn generated(&self) -> u32 {
        self.generated
    }

    pub fn last(&self) -> Option<&Platform> {
        self.platforms.last()
    }

    fn push(&mut self, platform: Platform) {
        self.platforms.push(platform);
        self.generated += 1;
    }

    /// Unconditionally append the next platform after the current last one
    pub fn push_next(
        &mut self,
        viewport: Viewport,
        tuning: &Tuning,
        rng: &mut impl RandomSource,
    ) -> bool {
        let Some(last) = self.platforms.last() else {
            return false;
        };

        let d = difficulty(self.generated);
        let gap = gap_for_difficulty(d, tuning);
        let height_change = height_change_for_difficulty(d, tuning, rng);
        let platform = Platform {
            x: last.right() + gap,
            y: tuning.clamp_platform_y(last.y + height_change, viewport.height),
            width: tuning.platform_width,
            height: tuning.platform_height,
            color_index: rng.pick(PLATFORM_COLORS.len()),
        };

        log::trace!(
            "Platform #{} at ({:.1}, {:.1}), difficulty {}",
            self.generated,
            platform.x,
            platform.y,
            d
        );
        self.push(platform);
        true
    }

    /// Append one platform if the last one is within the lookahead margin of
    /// the right viewport edge
    pub fn extend(
        &mut self,
        viewport: Viewport,
        tuning: &Tuning,
        rng: &mut impl RandomSource,
    ) -> bool {
        let near_edge = self
            .platforms
            .last()
            .is_some_and(|last| last.x < viewport.width + tuning.generation_lookahead);
        near_edge && self.push_next(viewport, tuning, rng)
    }

    /// Translate every platform horizontally
    pub fn translate(&mut self, dx: f32) {
        for platform in &mut self.platforms {
            platform.x += dx;
        }
    }

    /// Drop platforms whose right edge is left of `-margin`
    pub fn cull(&mut self, margin: f32) -> usize {
        let before = self.platforms.len();
        self.platforms.retain(|p| p.right() > -margin);
        before - self.platforms.len()
    }
}
