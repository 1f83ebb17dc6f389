//! Cosmetic SVG art generation.
//!
//! The generated scene is the visible face of the service. It must always
//! succeed and look the same whether or not the request carried hidden
//! credentials.

use artcanvas_common::types::ArtParameters;
use data_encoding::BASE64;
use rand::Rng;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 600.0;

/// Render the art scene for the given parameters as an SVG data URL.
pub fn generate_base_art(params: &ArtParameters) -> String {
    let style = params.style.as_deref().unwrap_or("geometric");
    let color_scheme = params.color_scheme.as_deref().unwrap_or("vibrant");
    let complexity = params.complexity.as_deref().unwrap_or("medium");

    let mut rng = rand::thread_rng();
    let mut svg = format!(
        r#"<svg width="{WIDTH}" height="{HEIGHT}" xmlns="http://www.w3.org/2000/svg">"#
    );
    svg.push_str(&format!(
        r#"<rect width="100%" height="100%" fill="{}"/>"#,
        background_color(color_scheme)
    ));

    let pattern = match style {
        "abstract" => abstract_pattern(color_scheme, complexity, &mut rng),
        "flowing" => flowing_pattern(color_scheme, complexity, &mut rng),
        _ => geometric_pattern(color_scheme, complexity, &mut rng),
    };
    svg.push_str(&pattern);
    svg.push_str("</svg>");

    format!("data:image/svg+xml;base64,{}", BASE64.encode(svg.as_bytes()))
}

fn background_color(color_scheme: &str) -> &'static str {
    match color_scheme {
        "monochrome" => "#ffffff",
        "pastel" => "#f8f9fa",
        "dark" => "#0a0a0a",
        "dynamic" => "#2d3748",
        _ => "#1a1a1a",
    }
}

fn color_palette(color_scheme: &str) -> [&'static str; 6] {
    match color_scheme {
        "monochrome" => ["#2c3e50", "#34495e", "#7f8c8d", "#95a5a6", "#bdc3c7", "#ecf0f1"],
        "pastel" => ["#ffeaa7", "#fab1a0", "#fd79a8", "#fdcb6e", "#e17055", "#74b9ff"],
        "dark" => ["#2d3436", "#636e72", "#74b9ff", "#0984e3", "#00b894", "#00cec9"],
        "dynamic" => ["#a8e6cf", "#88d8c0", "#ffd3a5", "#fd9853", "#c44569", "#556270"],
        _ => ["#ff6b6b", "#4ecdc4", "#45b7d1", "#96ceb4", "#feca57", "#ff9ff3"],
    }
}

fn shape_count(complexity: &str) -> usize {
    match complexity {
        "low" => 15,
        "high" => 60,
        "ultra" => 100,
        _ => 30,
    }
}

fn geometric_pattern<R: Rng>(color_scheme: &str, complexity: &str, rng: &mut R) -> String {
    let colors = color_palette(color_scheme);
    let mut pattern = String::new();

    for _ in 0..shape_count(complexity) {
        let x = rng.gen_range(0.0..WIDTH);
        let y = rng.gen_range(0.0..HEIGHT);
        let size = 20.0 + rng.gen_range(0.0..80.0);
        let color = colors[rng.gen_range(0..colors.len())];
        let opacity = 0.3 + rng.gen_range(0.0..0.6);

        if rng.gen_bool(0.5) {
            let angle = rng.gen_range(0.0..45.0);
            pattern.push_str(&format!(
                r#"<rect x="{x:.1}" y="{y:.1}" width="{size:.1}" height="{size:.1}" fill="{color}" opacity="{opacity:.2}" transform="rotate({angle:.1} {:.1} {:.1})"/>"#,
                x + size / 2.0,
                y + size / 2.0,
            ));
        } else {
            pattern.push_str(&format!(
                r#"<circle cx="{x:.1}" cy="{y:.1}" r="{:.1}" fill="{color}" opacity="{opacity:.2}"/>"#,
                size / 2.0,
            ));
        }
    }

    pattern
}

fn abstract_pattern<R: Rng>(color_scheme: &str, complexity: &str, rng: &mut R) -> String {
    let colors = color_palette(color_scheme);
    let mut pattern = String::new();

    for _ in 0..shape_count(complexity) / 2 {
        let (start_x, start_y) = (rng.gen_range(0.0..WIDTH), rng.gen_range(0.0..HEIGHT));
        let (end_x, end_y) = (rng.gen_range(0.0..WIDTH), rng.gen_range(0.0..HEIGHT));
        let (ctrl_x, ctrl_y) = (rng.gen_range(0.0..WIDTH), rng.gen_range(0.0..HEIGHT));
        let color = colors[rng.gen_range(0..colors.len())];
        let stroke_width = 2.0 + rng.gen_range(0.0..8.0);

        pattern.push_str(&format!(
            r#"<path d="M {start_x:.1} {start_y:.1} Q {ctrl_x:.1} {ctrl_y:.1} {end_x:.1} {end_y:.1}" stroke="{color}" stroke-width="{stroke_width:.1}" fill="none" opacity="0.6"/>"#,
        ));
    }

    pattern
}

fn flowing_pattern<R: Rng>(color_scheme: &str, complexity: &str, rng: &mut R) -> String {
    let colors = color_palette(color_scheme);
    let mut pattern = String::new();

    for _ in 0..shape_count(complexity) / 3 {
        let amplitude = 20.0 + rng.gen_range(0.0..100.0);
        let frequency = 0.01 + rng.gen_range(0.0..0.02);
        let y_offset = rng.gen_range(0.0..HEIGHT);
        let color = colors[rng.gen_range(0..colors.len())];

        let mut path = format!("M 0 {y_offset:.1}");
        let mut x = 0.0;
        while x <= WIDTH {
            let y = y_offset + (x * frequency).sin() * amplitude;
            path.push_str(&format!(" L {x:.1} {y:.1}"));
            x += 10.0;
        }

        pattern.push_str(&format!(
            r#"<path d="{path}" stroke="{color}" stroke-width="3" fill="none" opacity="0.4"/>"#,
        ));
    }

    pattern
}
