//! Rendering: clear, terrain, water, horse, held items, then the overlay.

mod overlay;

use anyhow::Result;
use engine_core::Transform;
use glam::{Quat, Vec3};
use procgen::TerrainVertex;
use renderer::{Camera, Mesh, ModelKind, ModelSpace, Vertex};

use crate::config::ViewMode;
use crate::GameState;

// Mesher output is uploaded straight into the shared vertex layout.
const _: () = assert!(std::mem::size_of::<TerrainVertex>() == std::mem::size_of::<Vertex>());

/// Cornflower blue, linear.
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.127,
    g: 0.301,
    b: 0.846,
    a: 1.0,
};

const HORSE_TINT: [f32; 4] = [0.42, 0.24, 0.12, 1.0];
const HANDS_TINT: [f32; 4] = [0.86, 0.62, 0.48, 1.0];
const GUN_TINT: [f32; 4] = [0.12, 0.12, 0.13, 1.0];

/// Eye-relative placement of held items: x left, y up, z forward.
const HANDS_OFFSET: Vec3 = Vec3::new(-0.18, -0.28, 0.45);
const GUN_OFFSET: Vec3 = Vec3::new(-0.2, -0.2, 0.55);

/// GPU terrain and water meshes; uploaded once and kept for the session.
pub struct TerrainMeshes {
    pub terrain: Mesh,
    pub water: Mesh,
}

/// Build the terrain on first use and upload it. Later calls do nothing.
fn ensure_terrain(state: &mut GameState) -> Result<()> {
    if state.terrain_meshes.is_some() {
        return Ok(());
    }
    state.mesher.build(&state.world)?;

    let device = state.renderer.device();
    let terrain = state.mesher.terrain();
    let water = state.mesher.water();
    state.terrain_meshes = Some(TerrainMeshes {
        terrain: Mesh::new(device, "Terrain", &terrain.vertices, &terrain.indices),
        water: Mesh::new(device, "Water", &water.vertices, &water.indices),
    });
    log::info!(
        "Uploaded terrain ({} triangles) and water ({} triangles)",
        terrain.triangle_count(),
        water.triangle_count()
    );
    Ok(())
}

/// Transform for an item held in front of the camera, in eye-relative space.
pub fn held_item_transform(camera: &Camera, offset: Vec3, scale: f32) -> Transform {
    let rotation = Quat::from_rotation_y(camera.yaw()) * Quat::from_rotation_x(-camera.pitch());
    Transform {
        position: rotation * offset,
        rotation,
        scale: Vec3::splat(scale),
    }
}

fn model_scale(state: &GameState, kind: ModelKind) -> f32 {
    state.model_scales.get(&kind).copied().unwrap_or(1.0)
}

/// Run all render passes for one frame.
pub fn run(state: &mut GameState) -> Result<()> {
    if state.view_mode == ViewMode::FirstPerson {
        ensure_terrain(state)?;
    }

    let (output, mut encoder) = state.renderer.begin_frame()?;
    let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
    state.renderer.clear(&mut encoder, &view, CLEAR_COLOR);

    if state.view_mode == ViewMode::FirstPerson {
        let t = state.time.elapsed_seconds();
        let settings = *state.mesher.settings();
        state.renderer.update_camera(&state.camera);
        state.renderer.update_water(settings.water_wave_offset(t), t);

        if let Some(meshes) = &state.terrain_meshes {
            state.renderer.render_terrain(&mut encoder, &view, &meshes.terrain);
            state.renderer.render_water(&mut encoder, &view, &meshes.water);
        }

        // Horse stands on the terrain surface under its grid position.
        let p = state.horse.position;
        let ground = settings.grid_to_world(p.x, p.y, state.world.sample_height(p.x, p.y));
        let horse = Transform::from_position(ground)
            .with_yaw(state.horse.yaw())
            .with_scale(model_scale(state, ModelKind::Horse));
        state
            .renderer
            .render_model(&mut encoder, &view, ModelKind::Horse, &horse, HORSE_TINT, ModelSpace::World);

        // Hands and gun draw over the world.
        state.renderer.clear_depth(&mut encoder);
        for (kind, offset, tint) in [
            (ModelKind::Hands, HANDS_OFFSET, HANDS_TINT),
            (ModelKind::Gun, GUN_OFFSET, GUN_TINT),
        ] {
            let transform = held_item_transform(&state.camera, offset, model_scale(state, kind));
            state
                .renderer
                .render_model(&mut encoder, &view, kind, &transform, tint, ModelSpace::View);
        }
    }

    let (sw, sh) = state.renderer.dimensions();
    let overlay = overlay::build(state, sw as f32, sh as f32);
    state
        .renderer
        .render_overlay(&mut encoder, &view, &overlay.vertices, &overlay.indices);

    state.renderer.end_frame(output, encoder);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_item_follows_view_direction() {
        let mut camera = Camera::default();
        let t = held_item_transform(&camera, Vec3::new(0.0, 0.0, 1.0), 1.0);
        assert!((t.position - camera.forward()).length() < 1e-5);

        camera.set_yaw_pitch(1.2, 0.4);
        let t = held_item_transform(&camera, Vec3::new(0.0, 0.0, 0.5), 2.0);
        assert!((t.position - camera.forward() * 0.5).length() < 1e-5);
        assert!((t.rotation * Vec3::Z - camera.forward()).length() < 1e-5);
        assert_eq!(t.scale, Vec3::splat(2.0));
    }

    #[test]
    fn held_item_offsets_turn_with_camera() {
        let mut camera = Camera::default();
        camera.set_yaw_pitch(std::f32::consts::PI, 0.0);
        let t = held_item_transform(&camera, Vec3::new(-0.2, -0.2, 0.0), 1.0);
        // Facing -Z, the right-hand offset (-X local) lands on +X.
        assert!((t.position - Vec3::new(0.2, -0.2, 0.0)).length() < 1e-5);
    }
}
