//! Request builders for every generator call the agents make.
//!
//! Prompt wording is deliberately brief; the backend is free to expand on
//! it. Random choices (drafting style, interior framing) use the thread RNG
//! and never live across an await point.

use crate::core::AgentId;
use crate::design::{Brief, DesignSkeleton, VisualKind, VisualRequest};
use crate::generator::{AspectRatio, GenerationRequest, GenerationTask};
use rand::seq::SliceRandom;
use std::collections::BTreeSet;

/// Drafting styles for floor plans.
pub const PLAN_STYLES: [&str; 3] = [
    "Minimalist presentation style: fine consistent line weights, abstract furniture blocks, greyscale wall fills.",
    "Hyper-detailed technical style: varied line weights, full dimensioning with grid lines, symbol legend.",
    "Colour-coded zoning style: transparent fills per functional zone, simple symbolic furniture.",
];

/// Framings for interior renders.
pub const INTERIOR_RATIOS: [AspectRatio; 3] =
    [AspectRatio::Square, AspectRatio::Portrait, AspectRatio::Landscape];

fn pick<T: Copy>(options: &[T]) -> T {
    *options
        .choose(&mut rand::thread_rng())
        .unwrap_or(&options[0])
}

/// The concept call.
#[must_use]
pub fn concept_request(brief: &Brief) -> GenerationRequest {
    let d = &brief.dimensions;
    let mut prompt = format!(
        "Project: {}\nSpace type: {}\nSub-spaces: {}\nDimensions: {} x {} x {} {}\nLocation: {}\n",
        brief.project_name,
        brief.space_type,
        brief.sub_spaces.join(", "),
        d.length,
        d.width,
        d.height,
        d.unit,
        brief.location_or_default(),
    );
    if !brief.custom_preference.trim().is_empty() {
        prompt.push_str(&format!("Preferences: {}\n", brief.custom_preference));
    }
    if !brief.structural_constraints.trim().is_empty() {
        prompt.push_str(&format!("Structural constraints: {}\n", brief.structural_constraints));
    }
    let rooms = brief.required_rooms();
    if !rooms.is_empty() {
        prompt.push_str(&format!(
            "Provide one interior prompt for each of these rooms: {}\n",
            rooms.join(", ")
        ));
    }
    prompt.push_str(
        "Return a JSON array of design objects with title, description, architecturalStyle, \
         materials, colorPalette and internalImagePrompts (type: day|night|interior|plan, \
         prompt, room, level).",
    );

    GenerationRequest::json(GenerationTask::Concept, prompt)
        .with_system_instruction(format!("You are the {}. {}", AgentId::ConceptArchitect, AgentId::ConceptArchitect.role()))
        .with_temperature(0.9)
}

/// One visual synthesis call.
#[must_use]
pub fn visual_request(request: &VisualRequest, design: &DesignSkeleton) -> GenerationRequest {
    let task = GenerationTask::Visual(request.kind);
    let subject = format!("\"{} - {}\". Subject: {}.", design.title, design.description, request.prompt);

    match request.kind {
        VisualKind::Plan => {
            let mut prompt = format!("Architectural floor plan for {subject}");
            if let Some(level) = &request.level {
                prompt.push_str(&format!(" Level: {level}."));
            }
            if let Some(d) = design.dimensions {
                prompt.push_str(&format!(
                    " Overall footprint approximately {} {unit} by {} {unit}; all dimensions must be consistent with it.",
                    d.length,
                    d.width,
                    unit = d.unit,
                ));
            }
            if let Some(element) = design.signature_element() {
                prompt.push_str(&format!(
                    " Prominently feature the signature element: \"{element}\"."
                ));
            }
            prompt.push(' ');
            prompt.push_str(pick(&PLAN_STYLES));
            GenerationRequest::image(task, prompt, AspectRatio::Landscape)
        }
        VisualKind::Day | VisualKind::Night => {
            let light = if request.kind == VisualKind::Day {
                "natural daylight"
            } else {
                "night, warm interior and landscape lighting"
            };
            let prompt = format!(
                "Photorealistic exterior render, {light}, of {subject} Materials: {}.",
                design.materials_text()
            );
            GenerationRequest::image(task, prompt, AspectRatio::Wide)
        }
        VisualKind::Interior => {
            let room = request.room.as_deref().unwrap_or("interior");
            let prompt = format!(
                "Photorealistic interior render of the {room} in {subject} Palette: {}.",
                design.color_palette.join(", ")
            );
            GenerationRequest::image(task, prompt, pick(&INTERIOR_RATIOS))
        }
    }
}

/// Distinct interior rooms of a design, in first-seen order.
#[must_use]
pub fn interior_rooms(design: &DesignSkeleton) -> Vec<String> {
    let mut seen = BTreeSet::new();
    design
        .visual_requests
        .iter()
        .filter(|r| r.kind == VisualKind::Interior)
        .filter_map(|r| r.room.clone())
        .filter(|room| seen.insert(room.clone()))
        .collect()
}

/// The Materials Specialist call.
#[must_use]
pub fn finishes_request(design: &DesignSkeleton) -> GenerationRequest {
    let rooms = interior_rooms(design);
    let rooms = if rooms.is_empty() {
        "all primary spaces".to_string()
    } else {
        rooms.join(", ")
    };
    let prompt = format!(
        "Finishes schedule for \"{}\" ({}). Materials: {}. Cover: {rooms}. \
         Return a JSON object mapping category to a list of {{location, material, finish, notes}}.",
        design.title,
        design.architectural_style.as_deref().unwrap_or("unspecified style"),
        design.materials_text(),
    );
    GenerationRequest::json(GenerationTask::FinishesSchedule, prompt).with_temperature(0.4)
}

/// The Compliance AI call.
#[must_use]
pub fn compliance_request(design: &DesignSkeleton, brief: &Brief) -> GenerationRequest {
    let prompt = format!(
        "High-level compliance notes for \"{}\": {} Location: {}. Space type: {}.",
        design.title,
        design.description,
        brief.location_or_default(),
        brief.space_type,
    );
    GenerationRequest::text(GenerationTask::Compliance, prompt)
}

/// The Cost Estimator AI call.
#[must_use]
pub fn cost_request(design: &DesignSkeleton, brief: &Brief) -> GenerationRequest {
    let d = &brief.dimensions;
    let prompt = format!(
        "Preliminary cost estimate for \"{}\" in {}. Footprint {:.1} square {}. Materials: {}. \
         Return JSON with currency, estimatedTotalCost, costBreakdown, billOfQuantities, summary.",
        design.title,
        brief.location_or_default(),
        d.footprint(),
        d.unit,
        design.materials_text(),
    );
    GenerationRequest::json(GenerationTask::Cost, prompt).with_temperature(0.3)
}

/// The Eco-Analyst AI call.
#[must_use]
pub fn sustainability_request(design: &DesignSkeleton, brief: &Brief) -> GenerationRequest {
    let prompt = format!(
        "Sustainability assessment of \"{}\" in {}. Materials: {}. \
         Return JSON with overallScore (0-100), summary, positiveAspects, improvementSuggestions.",
        design.title,
        brief.location_or_default(),
        design.materials_text(),
    );
    GenerationRequest::json(GenerationTask::Sustainability, prompt).with_temperature(0.3)
}

/// An agent portrait.
#[must_use]
pub fn avatar_request(agent: AgentId) -> GenerationRequest {
    GenerationRequest::image(
        GenerationTask::Avatar,
        format!(
            "Minimal futuristic portrait icon representing the {agent}, an AI {}.",
            agent.role()
        ),
        AspectRatio::Square,
    )
}

/// One assistant chat turn, with the transcript so far.
#[must_use]
pub fn assistant_request(transcript: &[(String, String)], message: &str) -> GenerationRequest {
    let mut prompt = String::new();
    for (user, reply) in transcript {
        prompt.push_str(&format!("User: {user}\nAssistant: {reply}\n"));
    }
    prompt.push_str(&format!("User: {message}\nAssistant:"));
    GenerationRequest::text(GenerationTask::Assistant, prompt).with_system_instruction(format!(
        "You are the {}, the user's primary interface with the design team.",
        AgentId::ProjectLead
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::{Dimensions, FlatConfiguration};
    use crate::generator::ResponseFormat;

    fn skeleton() -> DesignSkeleton {
        DesignSkeleton {
            index: 0,
            title: "Lantern House".to_string(),
            description: "Its signature element: a glowing timber lantern. Calm.".to_string(),
            architectural_style: None,
            materials: vec!["Timber".to_string()],
            color_palette: vec!["#AA8844".to_string()],
            visual_requests: vec![
                VisualRequest::new(0, VisualKind::Interior, "warm").with_room("Kitchen"),
                VisualRequest::new(0, VisualKind::Interior, "bright").with_room("Living Room"),
                VisualRequest::new(0, VisualKind::Interior, "again").with_room("Kitchen"),
                VisualRequest::new(0, VisualKind::Day, "facade"),
            ],
            dimensions: Some(Dimensions::meters(12.0, 9.0, 4.0)),
            flat_configuration: None,
        }
    }

    fn brief() -> Brief {
        Brief::new("Lantern", "Residential", vec!["House".to_string()], Dimensions::meters(12.0, 9.0, 4.0))
    }

    #[test]
    fn test_plan_request_shape() {
        let design = skeleton();
        let request = VisualRequest::new(0, VisualKind::Plan, "ground level").with_level("Ground Floor");
        let built = visual_request(&request, &design);

        assert_eq!(built.aspect_ratio(), Some(AspectRatio::Landscape));
        assert!(built.prompt.contains("a glowing timber lantern"));
        assert!(built.prompt.contains("12 meters by 9 meters"));
        assert!(built.prompt.contains("Ground Floor"));
        assert!(PLAN_STYLES.iter().any(|style| built.prompt.contains(style)));
    }

    #[test]
    fn test_render_aspect_ratios() {
        let design = skeleton();
        let day = visual_request(&VisualRequest::new(0, VisualKind::Day, "a"), &design);
        let night = visual_request(&VisualRequest::new(0, VisualKind::Night, "a"), &design);
        assert_eq!(day.aspect_ratio(), Some(AspectRatio::Wide));
        assert_eq!(night.aspect_ratio(), Some(AspectRatio::Wide));

        for _ in 0..20 {
            let interior = visual_request(&design.visual_requests[0], &design);
            assert!(INTERIOR_RATIOS.contains(&interior.aspect_ratio().unwrap()));
        }
    }

    #[test]
    fn test_interior_rooms_are_distinct() {
        assert_eq!(interior_rooms(&skeleton()), vec!["Kitchen", "Living Room"]);
        let request = finishes_request(&skeleton());
        assert!(request.prompt.contains("Kitchen, Living Room"));
        assert_eq!(request.format, ResponseFormat::Json);
    }

    #[test]
    fn test_location_fallback() {
        let request = compliance_request(&skeleton(), &brief());
        assert!(request.prompt.contains("Location: Not specified"));

        let located = brief().with_location("Lisbon");
        assert!(cost_request(&skeleton(), &located).prompt.contains("in Lisbon"));
    }

    #[test]
    fn test_concept_request_lists_required_rooms() {
        let brief = brief().with_flat_configuration(FlatConfiguration {
            bhk: 3,
            num_bathrooms: 2,
            num_balconies: 2,
        });
        let request = concept_request(&brief);
        assert!(request.prompt.contains("Study Room"));
        assert!(request.prompt.contains("Balcony 2"));
        assert_eq!(request.task, GenerationTask::Concept);
    }

    #[test]
    fn test_assistant_request_carries_transcript() {
        let transcript = vec![("Hi".to_string(), "Hello.".to_string())];
        let request = assistant_request(&transcript, "What is brutalism?");
        assert!(request.prompt.starts_with("User: Hi\nAssistant: Hello.\n"));
        assert!(request.prompt.ends_with("User: What is brutalism?\nAssistant:"));
    }
}
