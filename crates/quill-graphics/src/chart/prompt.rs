//! Prompt asking the model for a chart specification

use crate::config::GraphicsConfig;
use quill_domain::GraphicKind;

const ILLUSTRATIVE_INSTRUCTION: &str = "No real data was provided. Use realistic example data that fits the description. \
The chart will be captioned as illustrative example data, so do not present the values as real.";

/// Build the chart-spec prompt
///
/// `data_instruction` is the user or research data block; `None` means the
/// model invents illustrative values.
pub fn chart_spec_prompt(
    description: &str,
    kind: GraphicKind,
    data_instruction: Option<&str>,
    config: &GraphicsConfig,
) -> String {
    let palette = &config.palette;
    let layout_hint = match kind {
        GraphicKind::Diagram => "This is a process or structure diagram: use type \"flow\" with 2-8 short steps and leave \"points\" empty.",
        _ => "Pick \"bar\", \"line\" or \"pie\", whichever reads best for the data, with 2-12 points. Use \"flow\" only for processes.",
    };
    let data_block = data_instruction.unwrap_or(ILLUSTRATIVE_INSTRUCTION);

    format!(
        "Produce a chart specification for a professional LinkedIn {kind} for a B2B AI consulting firm \
         specializing in retail supply chain.\n\n\
         Description: {description}\n\n\
         {data_block}\n\n\
         The chart is drawn by a fixed renderer with this house style:\n\
         - Colors: {} (primary), {} (secondary), {} (dark), {} (accent)\n\
         - Figure: 12 x 6.75 inches at 150 DPI ({}x{} px), white background\n\
         - Bold title, top and right spines removed, light horizontal grid only\n\n\
         {layout_hint}\n\n\
         Return ONLY a JSON object, no code and no commentary, in this shape:\n\
         {{\"type\": \"bar\" | \"line\" | \"pie\" | \"flow\", \"title\": \"...\", \"x_label\": \"...\", \
         \"y_label\": \"...\", \"points\": [{{\"label\": \"...\", \"value\": 0}}], \"steps\": [\"...\"], \
         \"source_note\": \"...\"}}\n\
         Keep the title under 70 characters. Values must be plain numbers.",
        palette.primary,
        palette.secondary,
        palette.dark,
        palette.accent,
        config.chart_width_px,
        config.chart_height_px,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_style_and_data() {
        let config = GraphicsConfig::default();
        let prompt = chart_spec_prompt(
            "Forecast accuracy by quarter",
            GraphicKind::Chart,
            Some("IMPORTANT - USE THESE EXACT DATA POINTS (user-provided):\nQ1: 100"),
            &config,
        );
        assert!(prompt.contains("#0077B5"));
        assert!(prompt.contains("1800x1012 px"));
        assert!(prompt.contains("Q1: 100"));
        assert!(!prompt.contains("illustrative example data"));
    }

    #[test]
    fn test_prompt_without_data_is_illustrative() {
        let prompt = chart_spec_prompt("Returns process", GraphicKind::Diagram, None, &GraphicsConfig::default());
        assert!(prompt.contains("illustrative example data"));
        assert!(prompt.contains("use type \"flow\""));
    }
}
