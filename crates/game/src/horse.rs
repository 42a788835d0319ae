//! Horse companion that trots after the player.

use glam::Vec2;

#[derive(Debug, Clone)]
pub struct Horse {
    /// Position in grid cells.
    pub position: Vec2,
    /// Distance at which the horse stops approaching.
    pub follow_distance: f32,
    /// Cells per second.
    pub speed: f32,
    /// Grid direction of the last step, used to face the model.
    heading: Vec2,
}

impl Horse {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            follow_distance: 60.0,
            speed: 60.0,
            heading: Vec2::Y,
        }
    }

    /// Step toward `target` without entering its follow ring, then clamp to `bounds`.
    pub fn update(&mut self, target: Vec2, dt: f32, bounds: Vec2) {
        let offset = target - self.position;
        let distance = offset.length();
        if distance > self.follow_distance {
            let step = (self.speed * dt).min(distance - self.follow_distance);
            self.heading = offset / distance;
            self.position += self.heading * step;
        }
        self.position = self.position.clamp(Vec2::ZERO, bounds);
    }

    /// Yaw (radians about +Y) that points the model's +Z along the heading.
    pub fn yaw(&self) -> f32 {
        self.heading.x.atan2(self.heading.y)
    }
}

impl Default for Horse {
    fn default() -> Self {
        Self::new(Vec2::new(500.0, 350.0))
    }
}
