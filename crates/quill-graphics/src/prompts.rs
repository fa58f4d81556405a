//! Prompt templates for the image and video backends

use crate::config::BrandPalette;
use quill_domain::ResearchResult;

/// Variation hints, one per rendering in a variations request
pub const VARIATION_HINTS: &[&str] = &[
    "Favor a bold, minimal composition with generous negative space.",
    "Take a warmer, more human perspective with people in the scene.",
    "Lean into a schematic, data-forward look with clean geometric shapes.",
    "Use a dramatic wide angle with strong depth and lighting contrast.",
    "Keep it understated and editorial, like a business magazine cover.",
];

/// Research facts usable in chart and infographic prompts
///
/// Only statistics, findings and trends from successful fetches, rendered as
/// `- <fact> (Source: <source_name>)`.
pub fn research_fact_lines(research: &[ResearchResult]) -> Vec<String> {
    research
        .iter()
        .filter(|result| !result.is_error())
        .flat_map(|result| {
            result
                .chartable_facts()
                .map(move |fact| format!("- {} (Source: {})", fact.fact.trim(), result.source_name))
        })
        .collect()
}

/// Prompt for the creative (conceptual) image backend; never sees research
pub fn creative_prompt(description: &str, palette: &BrandPalette) -> String {
    format!(
        "Professional LinkedIn graphic for a B2B AI consulting firm specializing in retail supply chain.\n\n\
         Create: {description}\n\n\
         Style requirements:\n\
         - Clean, modern, professional corporate aesthetic\n\
         - Color palette: Blues ({}, {}, {}) with white and gray accents\n\
         - Suitable for B2B audience (executives, VPs, directors)\n\
         - Landscape orientation for LinkedIn (16:9 ratio)\n\
         - No cartoon or playful elements\n\
         - Minimal or no text in the image\n\
         - Focus on clarity and visual impact\n\
         - Photorealistic or clean illustration style\n\
         - Professional business environment",
        palette.primary, palette.secondary, palette.dark
    )
}

/// Prompt for the text-capable infographic backend
pub fn infographic_prompt(description: &str, research: &[ResearchResult], palette: &BrandPalette) -> String {
    let facts = research_fact_lines(research);
    let research_context = if facts.is_empty() {
        String::new()
    } else {
        format!("\n\nUse these real statistics and facts:\n{}", facts.join("\n"))
    };

    format!(
        "Create a professional infographic for LinkedIn:\n\n\
         {description}{research_context}\n\n\
         Style requirements:\n\
         - Clean, modern corporate design\n\
         - Color palette: Blues ({}, {}, {}) with white and gray accents\n\
         - Clear, readable text and labels\n\
         - Professional B2B aesthetic suitable for supply chain executives\n\
         - Landscape orientation (16:9 ratio)\n\
         - Data should be prominently displayed with clear visual hierarchy\n\
         - Minimal but effective use of icons and visual elements",
        palette.primary, palette.secondary, palette.dark
    )
}

/// Prompt for the video backend
pub fn video_prompt(description: &str, duration_secs: u32, palette: &BrandPalette) -> String {
    format!(
        "Professional B2B video for LinkedIn.\n\
         Topic: {description}\n\
         Style: Clean, corporate aesthetic with blue color tones ({}, {}).\n\
         Professional lighting, smooth camera movements.\n\
         Suitable for supply chain and logistics consulting content.\n\
         Duration: {duration_secs} seconds.",
        palette.primary, palette.secondary
    )
}

/// Description annotated with reviewer feedback
pub fn with_feedback(description: &str, feedback: &str) -> String {
    format!("{}\n\nAdjustments requested: {}", description, feedback)
}

/// Description annotated with the `index`-th variation hint
pub fn with_variation(description: &str, index: usize) -> String {
    let hint = VARIATION_HINTS[index % VARIATION_HINTS.len()];
    format!("{}\n\nVariation {}: {}", description, index + 1, hint)
}
