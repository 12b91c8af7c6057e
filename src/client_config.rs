//! Client configuration rendering.
//!
//! Produces the snippet a dataset contributes to the client-side map script.
//! The output is embedded verbatim in a JavaScript context, so every literal
//! uses the JavaScript convention: lowercase `true`/`false` and `null`, even
//! where the declaration holds native booleans and `None`s.

use serde_json::json;

use crate::declarations::DatasetDeclaration;
use crate::error::Result;

/// Render a dataset's client-consumable configuration snippet.
pub fn render(decl: &DatasetDeclaration) -> Result<String> {
    let center = serde_json::to_string(&decl.location.center)?;
    let name = serde_json::to_string(&decl.name)?;
    let image_metadata = serde_json::to_string(&decl.imagery_metadata)?;
    let url = serde_json::to_string(&decl.tile_layer.url)?;

    let kwargs = serde_json::to_string(&json!({
        "minZoom": decl.tile_layer.min_zoom,
        "maxZoom": decl.tile_layer.max_zoom,
        "maxNativeZoom": decl.tile_layer.max_native_zoom,
        "attribution": decl.tile_layer.attribution,
        "tms": decl.tile_layer.tms,
    }))?;

    // A dataset without shape layers serializes as null, never an empty list;
    // the client treats the two differently.
    let shapes = match &decl.shape_layers {
        Some(layers) => {
            let refs: Vec<_> = layers
                .iter()
                .map(|layer| {
                    json!({
                        "name": layer.name,
                        "shapes_fn": layer.shapes_fn,
                        "zone_name_key": layer.zone_name_key,
                    })
                })
                .collect();
            serde_json::to_string(&refs)?
        }
        None => "null".to_string(),
    };

    Ok(format!(
        r#"{{
    "location": [{center}, {initial_zoom}, {name}, {image_metadata}],
    "tileObject": L.tileLayer({url}, {kwargs}),
    "shapes": {shapes}
}}"#,
        initial_zoom = decl.location.initial_zoom,
    ))
}
