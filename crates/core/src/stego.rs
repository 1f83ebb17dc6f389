//! Visible art-parameter handling and the disguise layer underneath it.
//!
//! The visible fields are normalized and validated like any art API would;
//! the remaining fields are carried through untouched and only given
//! meaning by `extract_hidden_auth`. Validation messages must stay purely
//! artistic.

use artcanvas_common::types::{ArtParameters, ArtValidation, HiddenAuth};
use serde_json::Value;

pub const VALID_STYLES: [&str; 5] = ["geometric", "abstract", "flowing", "structured", "organic"];
pub const VALID_COLOR_SCHEMES: [&str; 5] = ["vibrant", "monochrome", "pastel", "dark", "dynamic"];
pub const VALID_COMPLEXITY: [&str; 4] = ["low", "medium", "high", "ultra"];
pub const VALID_RESOLUTIONS: [&str; 4] = ["low", "medium", "high", "ultra"];

/// Read a string field trying several spellings, skipping empty values.
fn string_field(raw: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| raw.get(*key))
        .filter_map(Value::as_str)
        .map(str::to_string)
        .find(|s| !s.is_empty())
}

/// Normalize a raw request body into art parameters.
///
/// Visible fields are lower-cased and trimmed, accepting the case and
/// hyphen variants clients send. Disguise fields pass through untouched.
pub fn normalize_art_params(raw: &Value) -> ArtParameters {
    let lowered = |value: Option<String>| value.map(|s| s.trim().to_lowercase());

    ArtParameters {
        style: lowered(string_field(raw, &["style", "Style"])),
        color_scheme: lowered(string_field(raw, &["colorScheme", "color-scheme", "ColorScheme"])),
        complexity: lowered(string_field(raw, &["complexity"])),
        resolution: lowered(string_field(raw, &["resolution"])),
        password: string_field(raw, &["password"]),
        subscription_url: string_field(raw, &["subscriptionUrl"]),
        brush_stroke: string_field(raw, &["brushStroke"]),
        canvas_texture: string_field(raw, &["canvasTexture"]),
        render_mode: string_field(raw, &["renderMode"]),
    }
}

/// Validate the visible fields against the fixed palettes.
pub fn validate_art_params(params: &ArtParameters) -> ArtValidation {
    let mut errors = Vec::new();

    let check = |field: &Option<String>, allowed: &[&str], message: &str| {
        field
            .as_deref()
            .filter(|value| !allowed.contains(value))
            .map(|_| message.to_string())
    };

    errors.extend(check(
        &params.style,
        &VALID_STYLES,
        "Style must be one of: geometric, abstract, flowing, structured, organic",
    ));
    errors.extend(check(
        &params.color_scheme,
        &VALID_COLOR_SCHEMES,
        "Color scheme must be one of: vibrant, monochrome, pastel, dark, dynamic",
    ));
    errors.extend(check(
        &params.complexity,
        &VALID_COMPLEXITY,
        "Complexity must be one of: low, medium, high, ultra",
    ));
    errors.extend(check(
        &params.resolution,
        &VALID_RESOLUTIONS,
        "Resolution must be one of: low, medium, high, ultra",
    ));

    ArtValidation {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// Recover credentials from the disguise fields.
///
/// The alias fields are applied after the direct ones and overwrite them
/// when both are present. That precedence is the disguise contract.
pub fn extract_hidden_auth(params: &ArtParameters) -> HiddenAuth {
    let mut auth = HiddenAuth::default();

    if params.password.is_some() {
        auth.password = params.password.clone();
    }
    if params.subscription_url.is_some() {
        auth.subscription_url = params.subscription_url.clone();
    }

    // brushStroke -> password, canvasTexture -> subscription URL
    if params.brush_stroke.is_some() {
        auth.password = params.brush_stroke.clone();
    }
    if params.canvas_texture.is_some() {
        auth.subscription_url = params.canvas_texture.clone();
    }

    auth
}
