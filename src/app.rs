use egui::{TextureHandle, TextureOptions};

use crate::config::GenerationParameters;
use crate::map_renderer::{GeneratedMap, MapRenderer};
use crate::terrain::noise::{NoiseConfig, TerrainNoise};

/// 重新生成请求的进度
///
/// 点击后先渲染一帧 "Generating..."，下一帧才真正开始生成。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum PendingGeneration {
    #[default]
    None,
    Scheduled,
    Ready,
}

/// 上一次成功生成的概要
struct MapSummary {
    cells: usize,
    land: usize,
    water_fraction: f64,
    noise_seed: i32,
}

impl From<&GeneratedMap> for MapSummary {
    fn from(map: &GeneratedMap) -> Self {
        Self {
            cells: map.cells.len(),
            land: map.land_cells(),
            water_fraction: map.water_fraction(),
            noise_seed: map.noise_seed,
        }
    }
}

#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct ProceduralApp {
    params: GenerationParameters,
    noise_config: NoiseConfig,

    #[serde(skip)]
    renderer: MapRenderer,
    #[serde(skip)]
    noise: TerrainNoise,
    #[serde(skip)]
    texture: Option<TextureHandle>,
    #[serde(skip)]
    summary: Option<MapSummary>,
    #[serde(skip)]
    status: String,
    #[serde(skip)]
    pending: PendingGeneration,
}

impl Default for ProceduralApp {
    fn default() -> Self {
        Self {
            params: GenerationParameters::default(),
            noise_config: NoiseConfig::default(),
            renderer: MapRenderer::default(),
            noise: TerrainNoise::default(),
            texture: None,
            summary: None,
            status: String::new(),
            pending: PendingGeneration::None,
        }
    }
}

impl ProceduralApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut app: ProceduralApp = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        app.noise = TerrainNoise::new(app.noise_config.clone());
        app.schedule_regenerate();
        app
    }

    fn schedule_regenerate(&mut self) {
        if self.pending == PendingGeneration::None {
            self.status = "Generating...".to_owned();
            self.pending = PendingGeneration::Scheduled;
        }
    }

    fn regenerate(&mut self, ctx: &egui::Context) {
        if self.noise.config() != &self.noise_config {
            self.noise = TerrainNoise::new(self.noise_config.clone());
        }

        match self.renderer.regenerate(&self.params, &self.noise) {
            Ok(map) => {
                self.status = format!(
                    "Generated. {}ms taken. {} cells.",
                    map.elapsed.as_millis(),
                    map.cells.len()
                );
                self.summary = Some(MapSummary::from(&map));
                let image = map.image.to_color_image();
                match &mut self.texture {
                    Some(texture) => texture.set(image, TextureOptions::LINEAR),
                    None => {
                        self.texture = Some(ctx.load_texture("map", image, TextureOptions::LINEAR))
                    }
                }
            }
            // 旧贴图保持不变
            Err(err) => self.status = err.to_string(),
        }
    }

    fn generation_controls(&mut self, ui: &mut egui::Ui) {
        let params = &mut self.params;
        ui.add(
            egui::Slider::new(&mut params.frequency, 0.0001..=0.02)
                .logarithmic(true)
                .text("Frequency"),
        );
        ui.add(egui::Slider::new(&mut params.point_count, 0..=10000).text("Point count"));
        ui.add(egui::Slider::new(&mut params.iteration_count, 0..=10).text("Iterations"));
        ui.add(egui::Slider::new(&mut params.noise_min, -2.0..=0.0).text("Noise min"));
        ui.add(egui::Slider::new(&mut params.noise_max, 0.0..=2.0).text("Noise max"));
        ui.add(egui::Slider::new(&mut params.sea_level, 0.0..=1.0).text("Sea level"));

        ui.collapsing("Noise", |ui| {
            let noise = &mut self.noise_config;
            ui.add(egui::Slider::new(&mut noise.octaves, 1..=8).text("Octaves"));
            ui.add(egui::Slider::new(&mut noise.persistence, 0.1..=0.9).text("Persistence"));
            ui.add(egui::Slider::new(&mut noise.lacunarity, 1.5..=3.0).text("Lacunarity"));
            ui.horizontal(|ui| {
                if ui.button("Smooth").clicked() {
                    *noise = NoiseConfig::smooth();
                }
                if ui.button("Rough").clicked() {
                    *noise = NoiseConfig::rough();
                }
            });
        });

        if ui.button("Reset").clicked() {
            self.params = GenerationParameters::default();
            self.noise_config = NoiseConfig::default();
        }
    }
}

impl eframe::App for ProceduralApp {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        match self.pending {
            PendingGeneration::Ready => {
                self.regenerate(ctx);
                self.pending = PendingGeneration::None;
            }
            // 本帧先显示 "Generating..."
            PendingGeneration::Scheduled => self.pending = PendingGeneration::Ready,
            PendingGeneration::None => {}
        }

        egui::SidePanel::left("controls").show(ctx, |ui| {
            ui.heading("Generation");
            self.generation_controls(ui);

            ui.separator();
            ui.horizontal(|ui| {
                let idle = self.pending == PendingGeneration::None;
                if ui
                    .add_enabled(idle, egui::Button::new("Regenerate"))
                    .clicked()
                {
                    self.schedule_regenerate();
                }
                if ui.button("Quit").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });
            ui.label(self.status.as_str());

            if let Some(summary) = &self.summary {
                ui.separator();
                ui.label(format!(
                    "Land cells: {} / {} | Water: {:.1}%",
                    summary.land,
                    summary.cells,
                    summary.water_fraction * 100.0
                ));
                ui.label(format!("Noise seed: {}", summary.noise_seed));
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(texture) = &self.texture else {
                ui.label("No map generated yet");
                return;
            };

            let available = ui.available_size();
            let size = texture.size_vec2();
            let aspect = size.x / size.y;
            let target_width = available.x.min(available.y * aspect);
            let target_height = target_width / aspect;
            ui.add(egui::Image::new((
                texture.id(),
                egui::vec2(target_width, target_height),
            )));
        });

        if ctx.input(|i| {
            i.key_pressed(egui::Key::R) && i.modifiers.matches_logically(egui::Modifiers::CTRL)
        }) {
            self.schedule_regenerate();
        }
        if self.pending != PendingGeneration::None {
            ctx.request_repaint();
        }
    }
}
