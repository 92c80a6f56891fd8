/// Spelling and synonym variants folded onto their base material.
fn base_material(raw: &str) -> &str {
    match raw {
        "asphalt" | "bitumen" | "roofingfelt" | "shingle" | "shingles" | "tar" => "tar_paper",
        "block" | "masonry" | "granite" | "paving_stones" | "sandstone" => "stone",
        "bricks" => "brick",
        "glas" | "glassfront" => "glass",
        "grass" | "thatch" => "plants",
        "panels" => "panel",
        "plastered" => "plaster",
        "rooftiles" | "tile" | "tiles" => "roof_tiles",
        "sheet" | "sheets" | "tent" => "canvas",
        "slates" => "slate",
        "steel" => "metal",
        other => other,
    }
}

fn named_color(material: &str) -> Option<&'static str> {
    Some(match material {
        "brick" => "#cc7755",
        "bronze" => "#ffeecc",
        "canvas" => "#fff8f0",
        "concrete" => "#999999",
        "copper" => "#a0e0d0",
        "glass" => "#e8f8f8",
        "gold" => "#ffcc00",
        "plants" => "#009933",
        "metal" => "#aaaaaa",
        "panel" => "#fff8f0",
        "plaster" => "#999999",
        "roof_tiles" => "#f08060",
        "silver" => "#cccccc",
        "slate" => "#666666",
        "stone" => "#996666",
        "tar_paper" => "#333333",
        "wood" => "#deb887",
        _ => return None,
    })
}

/// Color string for an OSM material tag, or `None` for tags without a
/// palette entry. Tags already written as `#rrggbb` pass through.
pub fn material_color(raw: &str) -> Option<String> {
    let lower = raw.to_ascii_lowercase();
    if lower.starts_with('#') {
        return Some(lower);
    }
    named_color(base_material(&lower)).map(str::to_string)
}
