use procedural::config::{CanvasConfig, GenerationParameters};
use procedural::map_renderer::MapRenderer;
use procedural::terrain::TerrainNoise;

fn main() {
    env_logger::init();

    let params = GenerationParameters::default();
    let noise = TerrainNoise::default();
    let mut renderer = MapRenderer::new(CanvasConfig::default());

    let map = match renderer.regenerate(&params, &noise) {
        Ok(map) => map,
        Err(err) => {
            eprintln!("Generation failed: {err}");
            std::process::exit(1);
        }
    };

    let total = map.cells.len();
    let land = map.land_cells();
    let water = map.water_cells();

    let elevations: Vec<f64> = map.cells.iter().map(|c| c.elevation).collect();
    let min = elevations.iter().copied().fold(f64::INFINITY, f64::min);
    let max = elevations.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let avg = elevations.iter().sum::<f64>() / total.max(1) as f64;

    let areas: Vec<f64> = map.cells.iter().map(|c| c.cell.area()).collect();
    let min_area = areas.iter().copied().fold(f64::INFINITY, f64::min);
    let max_area = areas.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    println!("Map stats ({}x{}):", map.image.width(), map.image.height());
    println!("  Noise seed: {}", map.noise_seed);
    println!("  Time: {}ms", map.elapsed.as_millis());
    println!("  Cells: {}", total);
    println!(
        "  Land cells (h>{}): {} ({:.1}%)",
        params.sea_level,
        land,
        land as f64 * 100.0 / total.max(1) as f64
    );
    println!(
        "  Water cells (h<={}): {} ({:.1}%)",
        params.sea_level,
        water,
        map.water_fraction() * 100.0
    );
    if total > 0 {
        println!("Elevation:");
        println!("  Min: {:.3}", min);
        println!("  Max: {:.3}", max);
        println!("  Avg: {:.3}", avg);
        println!("Cell area:");
        println!("  Min: {:.1}", min_area);
        println!("  Max: {:.1}", max_area);
    }
}
