//! Horizontal camera follow
//!
//! After a landing the world is translated so the ball sits at the viewport's
//! horizontal centre, then platforms that scrolled off the left are culled.

use super::platforms::Course;
use super::state::{Ball, Viewport};

/// Shift the world left if the ball is past the centre line.
///
/// Returns the offset that was subtracted from every x, if any.
pub fn follow(
    ball: &mut Ball,
    course: &mut Course,
    viewport: Viewport,
    cull_margin: f32,
) -> Option<f32> {
    let center = viewport.center_x();
    if ball.pos.x <= center {
        return None;
    }

    let offset = ball.pos.x - center;
    course.translate(-offset);
    ball.pos.x -= offset;

    let culled = course.cull(cull_margin);
    log::debug!("Camera shifted by {:.1}, culled {} platforms", offset, culled);
    Some(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Platform;
    use glam::Vec2;

    fn course_at(xs: &[f32]) -> Course {
        let mut platforms = xs.iter().map(|&x| Platform {
            x,
            y: 400.0,
            width: 90.0,
            height: 20.0,
            color_index: 0,
        });
        let mut course = Course::from_platform(platforms.next().unwrap());
        course.platforms.extend(platforms);
        course
    }

    #[test]
    fn test_no_shift_left_of_centre() {
        let mut ball = Ball::new(Vec2::new(350.0, 385.0), 15.0, 0);
        let mut course = course_at(&[0.0, 300.0]);
        assert_eq!(follow(&mut ball, &mut course, Viewport::new(800.0, 600.0), 100.0), None);
        assert_eq!(ball.pos.x, 350.0);
        assert_eq!(course.platforms[0].x, 0.0);
    }

    #[test]
    fn test_shift_is_pure_translation() {
        let mut ball = Ball::new(Vec2::new(650.0, 385.0), 15.0, 0);
        let mut course = course_at(&[-50.0, 300.0, 600.0, 900.0]);
        let before: Vec<f32> = course.platforms.iter().map(|p| p.x).collect();

        let offset = follow(&mut ball, &mut course, Viewport::new(800.0, 600.0), 100.0).unwrap();
        assert_eq!(offset, 250.0);
        assert_eq!(ball.pos.x, 400.0);
        assert_eq!(ball.pos.y, 385.0);

        // First platform now has right edge at -210 and is culled
        assert_eq!(course.platforms.len(), 3);
        for (after, before) in course.platforms.iter().zip(&before[1..]) {
            assert!((after.x - (before - 250.0)).abs() < 1e-4);
        }
        assert_eq!(course.generated(), 1);
    }
}
