//! Player state: grid position, movement and the revolver's ammunition.

use glam::{Vec2, Vec3};
use procgen::{MeshSettings, World};

/// Eye height above the terrain surface in world units.
pub const EYE_HEIGHT: f32 = 1.7;

/// Player on the world grid.
#[derive(Debug, Clone)]
pub struct Player {
    /// Position in grid cells; x east, y south.
    pub position: Vec2,
    /// Cells per second.
    pub speed: f32,
    ammo: u32,
    max_ammo: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            position: Vec2::new(400.0, 300.0),
            speed: 100.0,
            ammo: 7,
            max_ammo: 7,
        }
    }
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move along `direction` (grid axes, normalized by the caller) and clamp
    /// to `[0, bounds.x] × [0, bounds.y]`.
    pub fn update(&mut self, direction: Vec2, dt: f32, bounds: Vec2) {
        self.position += direction * self.speed * dt;
        self.position = self.position.clamp(Vec2::ZERO, bounds);
    }

    pub fn reload(&mut self) {
        if self.ammo < self.max_ammo {
            log::debug!("Reloaded {} rounds", self.max_ammo - self.ammo);
        }
        self.ammo = self.max_ammo;
    }

    /// Spend one round. Returns `false` when the cylinder is empty.
    pub fn try_fire(&mut self) -> bool {
        if self.ammo == 0 {
            return false;
        }
        self.ammo -= 1;
        true
    }

    pub fn ammo(&self) -> u32 {
        self.ammo
    }

    pub fn max_ammo(&self) -> u32 {
        self.max_ammo
    }

    /// First-person eye in world space, standing on the scaled terrain.
    pub fn eye_position(&self, world: &World, settings: &MeshSettings) -> Vec3 {
        let (x, y) = (self.position.x, self.position.y);
        settings.grid_to_world(x, y, world.sample_height(x, y)) + Vec3::Y * EYE_HEIGHT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use procgen::WorldConfig;

    const BOUNDS: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn starts_at_map_center_loaded() {
        let player = Player::new();
        assert_eq!(player.position, Vec2::new(400.0, 300.0));
        assert_eq!(player.ammo(), 7);
        assert_eq!(player.max_ammo(), 7);
    }

    #[test]
    fn moves_at_speed() {
        let mut player = Player::new();
        player.update(Vec2::new(0.0, -1.0), 0.5, BOUNDS);
        assert_eq!(player.position, Vec2::new(400.0, 250.0));
        player.update(Vec2::new(1.0, 0.0), 0.1, BOUNDS);
        assert!((player.position.x - 410.0).abs() < 1e-4);
    }

    #[test]
    fn clamped_to_world() {
        let mut player = Player::new();
        player.update(Vec2::new(-1.0, 0.0), 60.0, BOUNDS);
        assert_eq!(player.position.x, 0.0);
        player.update(Vec2::new(0.0, 1.0), 60.0, BOUNDS);
        assert_eq!(player.position.y, 600.0);
    }

    #[test]
    fn fire_stops_at_empty_and_reload_refills() {
        let mut player = Player::new();
        for _ in 0..7 {
            assert!(player.try_fire());
        }
        assert_eq!(player.ammo(), 0);
        assert!(!player.try_fire());
        assert_eq!(player.ammo(), 0);

        player.reload();
        assert_eq!(player.ammo(), 7);
    }

    #[test]
    fn eye_sits_above_scaled_ground() {
        let world = World::generate(&WorldConfig {
            width: 40,
            height: 30,
            seed: Some(3),
        });
        let settings = MeshSettings::default();
        let mut player = Player::new();
        player.position = Vec2::new(10.0, 20.0);

        let eye = player.eye_position(&world, &settings);
        let ground = world.height_at(10, 20) * settings.height_scale;
        assert_eq!(eye.x, 10.0 * settings.scale);
        assert_eq!(eye.z, 20.0 * settings.scale);
        assert!((eye.y - (ground + EYE_HEIGHT)).abs() < 1e-5);
    }
}
