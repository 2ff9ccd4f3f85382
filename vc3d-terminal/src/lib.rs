/// Terminal front end: ASCII model viewer and the `vc3d` commands
use anyhow::{bail, Context, Result};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use log::{debug, info};
use nalgebra::{Matrix4, Point3};
use serde::Serialize;
use std::io::{self, stdout, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use vc3d_core::{
    feature_edges, load_model, scene_bounds, world_meshes, Camera, Geometry, LoadedModel, Mesh,
    ModelFormat, NormalizeConfig, ProjectionMode, RotationState, SceneNode, StatsRecord, Transform,
};

pub mod cli;
pub mod config;
pub mod renderer;

pub use cli::{Cli, Commands};
pub use config::ViewerConfig;
pub use renderer::{AsciiRenderer, RenderMode};

const INITIAL_ROTATION: RotationState = RotationState {
    x: 0.3,
    y: 0.3,
    z: 0.0,
};

/// A normalized model with the per-mesh data the viewer reuses every frame
pub struct ViewModel {
    pub model: LoadedModel,
    /// Counts at the same edge threshold as `edges`
    pub stats: StatsRecord,
    /// Feature edges of each mesh, in traversal order
    edges: Vec<Vec<[Point3<f32>; 2]>>,
}

impl ViewModel {
    pub fn new(model: LoadedModel, edge_threshold_deg: f32) -> Self {
        let edges = world_meshes(&model.root, Matrix4::identity())
            .map(|(mesh, _)| feature_edges(&mesh.geometry, edge_threshold_deg))
            .collect();
        let stats = model.stats_with(edge_threshold_deg);
        Self { model, stats, edges }
    }

    /// Number of edge segments drawn in edge mode
    pub fn drawn_edges(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    models: Vec<ViewModel>,
    active: usize,
    stats: StatsRecord,
    mode: RenderMode,
    auto_rotate: bool,
    rotation: RotationState,
    camera: Camera,
    renderer: AsciiRenderer,
    frame_time: Duration,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    /// Size the viewer to the current terminal
    pub fn new(models: Vec<ViewModel>, config: &ViewerConfig) -> Result<Self> {
        let (width, height) = terminal::size()?;
        Self::with_size(models, config, width as usize, height as usize)
    }

    pub fn with_size(models: Vec<ViewModel>, config: &ViewerConfig, width: usize, height: usize) -> Result<Self> {
        let Some(first) = models.first() else {
            bail!("no models to view");
        };
        let stats = first.stats;

        let mut app = Self {
            models,
            active: 0,
            stats,
            mode: config.render_mode,
            auto_rotate: config.auto_rotate,
            rotation: INITIAL_ROTATION,
            camera: terminal_camera(width, height),
            renderer: AsciiRenderer::new(width, height),
            frame_time: Duration::from_millis(1000 / u64::from(config.fps.max(1))),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        };
        app.frame_active();
        Ok(app)
    }

    pub fn active_model(&self) -> &LoadedModel {
        &self.models[self.active].model
    }

    pub fn stats(&self) -> StatsRecord {
        self.stats
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            // Update
            self.update();

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_time {
                std::thread::sleep(self.frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                self.handle_key(code)
            }
            Event::Resize(width, height) => {
                let projection = self.camera.mode;
                self.renderer.resize(width as usize, height as usize);
                self.camera = terminal_camera(width as usize, height as usize);
                self.camera.mode = projection;
                self.frame_active();
            }
            _ => {}
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Tab => self.next_model(),
            KeyCode::Char('1') => self.mode = RenderMode::Vertices,
            KeyCode::Char('2') => self.mode = RenderMode::Edges,
            KeyCode::Char('3') => self.mode = RenderMode::Faces,
            KeyCode::Char('m') => self.mode = self.mode.next(),
            KeyCode::Char(' ') => self.auto_rotate = !self.auto_rotate,
            KeyCode::Char('0') => self.rotation = INITIAL_ROTATION,
            KeyCode::Char('p') => {
                self.camera.mode = match self.camera.mode {
                    ProjectionMode::Perspective => ProjectionMode::Orthographic,
                    ProjectionMode::Orthographic => ProjectionMode::Perspective,
                };
            }
            KeyCode::Char('w') | KeyCode::Up => {
                self.rotation.rotate(0.1, 0.0, 0.0);
            }
            KeyCode::Char('s') | KeyCode::Down => {
                self.rotation.rotate(-0.1, 0.0, 0.0);
            }
            KeyCode::Char('a') | KeyCode::Left => {
                self.rotation.rotate(0.0, -0.1, 0.0);
            }
            KeyCode::Char('d') | KeyCode::Right => {
                self.rotation.rotate(0.0, 0.1, 0.0);
            }
            KeyCode::Char('e') => {
                self.rotation.rotate(0.0, 0.0, 0.1);
            }
            KeyCode::Char('r') => {
                self.rotation.rotate(0.0, 0.0, -0.1);
            }
            _ => {}
        }
    }

    fn next_model(&mut self) {
        self.active = (self.active + 1) % self.models.len();
        self.stats = self.models[self.active].stats;
        self.frame_active();
        debug!("switched to model '{}': {}", self.active_model().name(), self.stats);
    }

    fn frame_active(&mut self) {
        if let Some(bounds) = scene_bounds(&self.active_model().root) {
            self.camera.frame(&bounds);
        }
    }

    fn update(&mut self) {
        if self.auto_rotate {
            self.rotation.rotate(0.01, 0.015, 0.0);
        }
    }

    /// Rasterize the active model into the renderer's buffers
    pub fn render_scene(&mut self) {
        let view = Transform::rotation_matrix(&self.rotation);
        let active = &self.models[self.active];

        self.renderer.clear();
        for ((mesh, model), edges) in world_meshes(&active.model.root, view).zip(&active.edges) {
            match self.mode {
                RenderMode::Vertices => self.renderer.render_vertices(mesh, &model, &self.camera),
                RenderMode::Edges => self.renderer.render_edges(edges, &model, &self.camera),
                RenderMode::Faces => self.renderer.render_mesh(mesh, &model, &self.camera),
            }
        }
    }

    pub fn status_line(&self) -> String {
        format!(
            "VC3D [{}/{}] {} | {} | mode: {} | FPS: {:.1}",
            self.active + 1,
            self.models.len(),
            self.active_model().name(),
            self.stats,
            self.mode,
            self.fps
        )
    }

    pub fn renderer(&self) -> &AsciiRenderer {
        &self.renderer
    }

    fn render(&mut self) -> io::Result<()> {
        self.render_scene();

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let bottom = self.renderer.height().saturating_sub(1) as u16;
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(self.status_line()),
            cursor::MoveTo(0, bottom),
            SetForegroundColor(Color::DarkGrey),
            Print("Tab=Model 1/2/3/M=Mode WASD/Arrows=Rotate E/R=Roll Space=Spin P=Projection 0=Reset Q=Quit"),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

/// Terminal cells are roughly twice as tall as they are wide
fn terminal_camera(width: usize, height: usize) -> Camera {
    Camera::new(width as u32, (height * 2) as u32)
}

/// Shown when the viewer is started without files
fn builtin_cube() -> LoadedModel {
    let root = SceneNode::group("cube").with_child(SceneNode::with_mesh("cube", Mesh::new(Geometry::cube(2.0))));
    LoadedModel::new(root, ModelFormat::Obj)
}

fn load_with_context(path: &Path) -> Result<LoadedModel> {
    load_model(path).with_context(|| format!("failed to load {}", path.display()))
}

/// Load and normalize every file for the viewer, or the built-in cube
/// when `files` is empty
pub fn load_view_models(files: &[PathBuf], config: &ViewerConfig) -> Result<Vec<ViewModel>> {
    let normalize = config.normalize_config()?;
    let models = if files.is_empty() {
        vec![builtin_cube()]
    } else {
        files.iter().map(|path| load_with_context(path)).collect::<Result<Vec<_>>>()?
    };

    models
        .into_iter()
        .map(|mut model| {
            model.normalize(&normalize)?;
            Ok(ViewModel::new(model, config.edge_threshold_deg))
        })
        .collect()
}

/// Size and scale a model ended up with after normalization
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedSummary {
    pub scale: f32,
    pub size: [f32; 3],
}

/// One output line of `vc3d stats`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatsLine {
    #[serde(flatten)]
    pub stats: StatsRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized: Option<NormalizedSummary>,
}

impl StatsLine {
    pub fn table_row(&self, file: &str) -> String {
        let stats = &self.stats;
        let mut row = format!(
            "{:<32} {:<6} {:>10} {:>10} {:>10}",
            file,
            stats.format.label(),
            stats.vertex_count,
            stats.face_count,
            stats.edge_count
        );
        if let Some(NormalizedSummary { scale, size: [x, y, z] }) = self.normalized {
            row.push_str(&format!(" {:>10.4} {:>8.3} x {:.3} x {:.3}", scale, x, y, z));
        }
        row
    }
}

/// Count a model, normalizing it first when `normalize` is given
pub fn measure(
    mut model: LoadedModel,
    edge_threshold_deg: f32,
    normalize: Option<&NormalizeConfig>,
) -> Result<StatsLine> {
    let normalized = match normalize {
        Some(config) => {
            let normalization = model.normalize(config)?;
            let size = scene_bounds(&model.root).map_or([0.0; 3], |bounds| {
                let size = bounds.size();
                [size.x, size.y, size.z]
            });
            Some(NormalizedSummary {
                scale: normalization.uniform_scale(),
                size,
            })
        }
        None => None,
    };

    Ok(StatsLine {
        stats: model.stats_with(edge_threshold_deg),
        normalized,
    })
}

/// Run a parsed command line
pub fn execute(cli: Cli) -> Result<()> {
    let config = ViewerConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::View {
            files,
            mode,
            target_size,
        } => {
            let config = config.merge(mode, target_size)?;
            let models = load_view_models(&files, &config)?;
            info!("starting viewer with {} model(s)", models.len().max(1));

            let mut app = TerminalApp::new(models, &config)?;
            app.run()?;
        }
        Commands::Stats {
            files,
            json,
            normalize,
        } => {
            let normalize = normalize.then(|| config.normalize_config()).transpose()?;
            let mut out = stdout().lock();
            if !json {
                let mut header = format!(
                    "{:<32} {:<6} {:>10} {:>10} {:>10}",
                    "FILE", "FORMAT", "VERTICES", "FACES", "EDGES"
                );
                if normalize.is_some() {
                    header.push_str(&format!(" {:>10} {:>8}", "SCALE", "SIZE"));
                }
                writeln!(out, "{header}")?;
            }

            for path in &files {
                let line = measure(load_with_context(path)?, config.edge_threshold_deg, normalize.as_ref())?;
                if json {
                    writeln!(out, "{}", serde_json::to_string(&line)?)?;
                } else {
                    writeln!(out, "{}", line.table_row(&path.display().to_string()))?;
                }
            }
        }
    }

    Ok(())
}
