//! Frontier - first-person prototype: procedural hills, a river crossing, a horse and a revolver.

mod config;
mod events;
mod horse;
mod hud;
mod inventory;
mod player;
mod render;

use anyhow::Result;
use engine_core::Time;
use glam::Vec2;
use input::InputState;
use procgen::{MeshSettings, TerrainMesher, World, WorldConfig, DARK_GRASS_ABOVE, LIGHT_GRASS_BELOW};
use renderer::{AssetBundle, Camera, ModelKind, Renderer, TerrainUniform};
use std::collections::HashMap;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use config::{GameConfig, ViewMode};
use horse::Horse;
use inventory::InventoryWheel;
use player::Player;
use render::TerrainMeshes;

/// Target heights (world units) the loaded models are scaled to.
const MODEL_HEIGHTS: [(ModelKind, f32); 3] = [
    (ModelKind::Horse, 3.2),
    (ModelKind::Hands, 0.35),
    (ModelKind::Gun, 0.18),
];

/// Base camera sensitivity; `GameConfig::sensitivity` multiplies it.
const BASE_SENSITIVITY: f32 = 0.002;

/// Main game state.
pub struct GameState {
    pub renderer: Renderer,
    pub camera: Camera,
    pub input: InputState,
    pub time: Time,

    pub world: World,
    pub mesher: TerrainMesher,
    /// GPU copies of the mesher output, uploaded on the first 3D frame.
    pub terrain_meshes: Option<TerrainMeshes>,
    /// Uniform scale per loaded model.
    pub model_scales: HashMap<ModelKind, f32>,

    pub player: Player,
    pub horse: Horse,
    pub inventory: InventoryWheel,
    pub view_mode: ViewMode,

    pub running: bool,
}

impl GameState {
    async fn new(window: Arc<Window>, config: GameConfig) -> Result<Self> {
        let world = World::generate(&WorldConfig {
            seed: config.world_seed,
            ..Default::default()
        });
        let inventory = InventoryWheel::default();

        let assets = AssetBundle::load(&config.asset_dir, inventory.items());
        let mut renderer = Renderer::new(window, &assets, config.vsync).await?;

        let model_scales = MODEL_HEIGHTS
            .iter()
            .filter_map(|&(kind, height)| {
                assets.model(kind).map(|model| (kind, model.scale_to_height(height)))
            })
            .collect();

        let settings = MeshSettings::default();
        renderer.update_terrain(&TerrainUniform {
            bands: [
                LIGHT_GRASS_BELOW * settings.height_scale,
                DARK_GRASS_ABOVE * settings.height_scale,
                0.0,
                0.0,
            ],
            ..Default::default()
        });

        let player = Player::new();
        let mut camera = Camera::new(player.eye_position(&world, &settings));
        camera.sensitivity = BASE_SENSITIVITY * config.sensitivity;
        let (width, height) = renderer.dimensions();
        camera.set_aspect(width, height);

        log::info!("Starting in {:?} view", config.start_view);

        Ok(Self {
            renderer,
            camera,
            input: InputState::new(),
            time: Time::new(),
            view_mode: config.start_view,
            world,
            mesher: TerrainMesher::new(settings),
            terrain_meshes: None,
            model_scales,
            player,
            horse: Horse::default(),
            inventory,
            running: true,
        })
    }

    fn world_bounds(&self) -> Vec2 {
        Vec2::new(self.world.width() as f32, self.world.height() as f32)
    }

    fn update(&mut self) {
        self.time.update();
        self.input.begin_frame();
        let dt = self.time.delta_seconds();
        let bounds = self.world_bounds();

        if self.input.is_toggle_view_pressed() {
            self.set_view_mode(self.view_mode.toggled());
        }

        if self.input.is_inventory_opened() {
            self.inventory.show();
        }
        if self.input.is_inventory_closed() {
            self.inventory.hide();
        }

        if self.inventory.is_visible() {
            // Wheel navigation; the player stands still meanwhile.
            if self.input.is_next_item_pressed() {
                self.inventory.next_item();
            }
            if self.input.is_prev_item_pressed() {
                self.inventory.prev_item();
            }
            if self.input.is_use_item_pressed() {
                self.inventory.use_selected();
            }
        } else {
            self.player.update(self.input.get_movement_input(), dt, bounds);
            if self.input.is_reload_pressed() {
                self.player.reload();
            }
            if self.input.is_fire_pressed() && self.input.is_cursor_locked() {
                if self.player.try_fire() {
                    log::debug!("Fired, {} rounds left", self.player.ammo());
                } else {
                    log::debug!("Click. Empty");
                }
            }
        }

        self.horse.update(self.player.position, dt, bounds);

        if self.view_mode == ViewMode::FirstPerson && self.input.is_cursor_locked() {
            let delta = self.input.mouse_delta();
            self.camera.process_mouse(delta.x, delta.y);
        }
        self.camera.position = self.player.eye_position(&self.world, self.mesher.settings());

        if self.time.frame_count() % 600 == 0 {
            log::debug!("{:.0} fps", self.time.fps());
        }

        self.input.end_frame();
    }

    fn set_view_mode(&mut self, mode: ViewMode) {
        if mode == self.view_mode {
            return;
        }
        self.view_mode = mode;
        log::info!("View mode: {:?}", mode);
        if mode == ViewMode::TopDown {
            self.release_cursor();
        }
    }

    fn render(&mut self) -> Result<()> {
        render::run(self)
    }
}

/// Application handler for winit.
struct App {
    state: Option<GameState>,
}

impl App {
    fn new() -> Self {
        Self { state: None }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_none() {
            let config = GameConfig::load();
            let window_attrs = Window::default_attributes()
                .with_title("Frontier")
                .with_inner_size(winit::dpi::LogicalSize::new(config.window_width, config.window_height));

            let window = match event_loop.create_window(window_attrs) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            let state = pollster::block_on(GameState::new(window.clone(), config));
            match state {
                Ok(s) => {
                    self.state = Some(s);
                    window.request_redraw();
                }
                Err(e) => {
                    log::error!("Failed to initialize game: {:#}", e);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(state) = &mut self.state {
            if state.handle_window_event(event) || !state.running {
                event_loop.exit();
            }
        }
    }

    fn device_event(&mut self, _: &ActiveEventLoop, _: DeviceId, event: DeviceEvent) {
        if let Some(state) = &mut self.state {
            state.handle_device_event(event);
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Controls: WASD move, mouse look (click to capture), R reload, left click fire");
    log::info!("          hold I for the inventory wheel (arrows/scroll select, Enter use), Tab toggles view");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app)?;

    Ok(())
}
