//! Canned inputs and replies.

use crate::design::{Brief, DesignSkeleton, Dimensions, VisualKind, VisualRequest};
use serde_json::json;

const KIND_CYCLE: [VisualKind; 4] = [
    VisualKind::Day,
    VisualKind::Interior,
    VisualKind::Plan,
    VisualKind::Night,
];

/// A complete residential brief.
#[must_use]
pub fn sample_brief() -> Brief {
    Brief::new(
        "Harbor House",
        "Residential",
        vec!["Villa".to_string(), "Garden".to_string()],
        Dimensions::meters(20.0, 12.0, 7.5),
    )
    .with_location("Lisbon, Portugal")
    .with_preference("Warm minimalism, lots of daylight")
}

/// A skeleton titled `Design {index}` with `requests` visual requests,
/// cycling day, interior, plan, night.
#[must_use]
pub fn sample_skeleton(index: usize, requests: usize) -> DesignSkeleton {
    let visual_requests = (0..requests)
        .map(|i| {
            let kind = KIND_CYCLE[i % KIND_CYCLE.len()];
            let request = VisualRequest::new(index, kind, format!("view {i}"));
            match kind {
                VisualKind::Interior => request.with_room(format!("Room {i}")),
                VisualKind::Plan => request.with_level(format!("Level {i}")),
                _ => request,
            }
        })
        .collect();

    DesignSkeleton {
        index,
        title: format!("Design {index}"),
        description: "A calm courtyard house. Its signature element: a shaded loggia.".to_string(),
        architectural_style: Some("Contemporary".to_string()),
        materials: vec!["Limestone".to_string(), "Oak".to_string()],
        color_palette: vec!["#F5F0E6".to_string(), "#3B3A36".to_string()],
        visual_requests,
        dimensions: Some(Dimensions::meters(20.0, 12.0, 7.5)),
        flat_configuration: None,
    }
}

/// A concept reply with `designs` concepts of `requests` prompts each,
/// wrapped in a JSON code fence.
#[must_use]
pub fn concept_reply(designs: usize, requests: usize) -> String {
    let concepts: Vec<_> = (0..designs)
        .map(|d| {
            let prompts: Vec<_> = (0..requests)
                .map(|i| {
                    let kind = KIND_CYCLE[i % KIND_CYCLE.len()];
                    json!({
                        "type": kind.to_string(),
                        "prompt": format!("view {i}"),
                        "room": (kind == VisualKind::Interior).then(|| format!("Room {i}")),
                        "level": (kind == VisualKind::Plan).then(|| format!("Level {i}")),
                    })
                })
                .collect();
            json!({
                "title": format!("Design {d}"),
                "description": "A calm courtyard house. Its signature element: a shaded loggia.",
                "architecturalStyle": "Contemporary",
                "materials": ["Limestone", "Oak"],
                "colorPalette": ["#F5F0E6", "#3B3A36"],
                "internalImagePrompts": prompts,
            })
        })
        .collect();

    format!("```json\n{}\n```", serde_json::Value::Array(concepts))
}
