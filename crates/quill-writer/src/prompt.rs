//! Prompt construction for post drafting

use crate::config::WriterConfig;
use quill_domain::{DataSource, ResearchResult};

const CITATION_INSTRUCTIONS: &str = "
CITATION REQUIREMENTS (since research URLs were provided):
- When using facts from the research, cite the source naturally
- Use formats like: \"According to [source]...\" or \"A recent [source] report found...\"
- Don't over-cite - 1-2 citations is enough for a LinkedIn post
- Make citations feel natural, not academic
- If a fact seems particularly strong, attribute it
";

const ILLUSTRATIVE_WARNING: &str = "
WARNING: Some data is marked as ILLUSTRATIVE (not real).
- Do NOT present illustrative data as fact
- If using illustrative data, frame it appropriately: \"For example, if costs dropped from X to Y...\"
- Or simply use the numbers as a realistic scenario without claiming they're real
";

const STYLE_RULES: &str = "- Short paragraphs (1-3 sentences max per paragraph)
- Mix sentence lengths: some 5 words, some 20 words
- Use contractions naturally (can't, don't, won't)
- Direct assertions: \"This is broken.\" not \"It's important to note that this is broken.\"
- Specific numbers, not vague: \"from 4.2 to 7.8 turns\" not \"significant improvement\"
- Real scenarios with details
- No hashtags
- No emojis
- End with optional question (make it genuine, not engagement bait)

STRUCTURE:
1. Hook (1-2 sentences) - Specific observation or contrarian statement
2. Problem/insight (2-4 short paragraphs) - Concrete example with real context
3. Connection to solution (1-2 paragraphs) - How AI/better systems address it
4. Optional close - Natural question or just end on the insight

TONE:
- Confident supply chain expert who's seen this 100 times
- Helpful but skeptical of buzzwords
- Conversational (like explaining to peer over coffee)
- Not salesy, not promotional

VALIDATION:
- Does it sound like a human expert wrote it?
- Would someone guess AI wrote this? If yes, rewrite.
- Are there any banned phrases? If yes, remove them.
- Sentence lengths varied?

Output ONLY the post text. No preamble, no explanations.";

/// Research section: one block per usable source
///
/// Failed fetches and sources with neither facts nor summary are skipped;
/// returns an empty string when nothing is left.
pub fn research_section(research: &[ResearchResult]) -> String {
    let sections: Vec<String> = research
        .iter()
        .filter(|r| !r.is_error())
        .filter(|r| !r.extracted_facts.is_empty() || !r.summary.trim().is_empty())
        .map(|result| {
            let mut section = format!("\n--- SOURCE: {} ({}) ---\n", result.source_name, result.url);
            if !result.summary.trim().is_empty() {
                section.push_str(&format!("Summary: {}\n", result.summary.trim()));
            }
            if !result.extracted_facts.is_empty() {
                section.push_str("Key Facts:\n");
                for fact in &result.extracted_facts {
                    let citation = if fact.citation_text.trim().is_empty() {
                        format!("According to {}", result.source_name)
                    } else {
                        fact.citation_text.trim().to_string()
                    };
                    section.push_str(&format!(
                        "  - [{}] {}\n    Citation: {}\n",
                        fact.fact_type.as_str(),
                        fact.fact,
                        citation
                    ));
                }
            }
            section
        })
        .collect();

    if sections.is_empty() {
        return String::new();
    }
    format!("\n\nRESEARCH DATA FROM PROVIDED URLS:\n{}\n", sections.join("\n"))
}

/// Data-source section with per-type labels
pub fn data_sources_section(sources: &[DataSource]) -> String {
    if sources.is_empty() {
        return String::new();
    }

    let lines: Vec<String> = sources
        .iter()
        .map(|source| {
            let mut line = format!(
                "  - {}: {} (Source: {}",
                source.data_point,
                source.value,
                source.source_type.label()
            );
            if let Some(description) = source.source_description.as_deref().filter(|d| !d.trim().is_empty()) {
                line.push_str(&format!(" - {}", description));
            }
            line.push(')');
            if source.is_illustrative() {
                line.push_str(" [WARNING: This is illustrative data, not real]");
            }
            line
        })
        .collect();

    format!("\n\nDATA SOURCES PROVIDED:\n{}\n", lines.join("\n"))
}

/// Builds the drafting prompt
pub struct DraftPromptBuilder<'a> {
    idea: &'a str,
    author: &'a str,
    research: &'a [ResearchResult],
    data_sources: &'a [DataSource],
}

impl<'a> DraftPromptBuilder<'a> {
    /// Start a prompt for `author`'s raw idea
    pub fn new(idea: &'a str, author: &'a str) -> Self {
        Self {
            idea,
            author,
            research: &[],
            data_sources: &[],
        }
    }

    /// Attach research results
    pub fn with_research(mut self, research: &'a [ResearchResult]) -> Self {
        self.research = research;
        self
    }

    /// Attach declared data sources
    pub fn with_data_sources(mut self, data_sources: &'a [DataSource]) -> Self {
        self.data_sources = data_sources;
        self
    }

    /// Build the complete prompt
    pub fn build(&self, config: &WriterConfig) -> String {
        let mut prompt = format!(
            "You are drafting a LinkedIn post for {author}, a {persona}.\n\n\
             RAW INSIGHT FROM {upper}:\n\"{idea}\"\n",
            author = self.author,
            persona = config.persona,
            upper = self.author.to_uppercase(),
            idea = self.idea,
        );

        prompt.push_str(&research_section(self.research));
        prompt.push_str(&data_sources_section(self.data_sources));

        prompt.push_str("\nWRITING REQUIREMENTS:\n\nCRITICAL - BANNED PHRASES (never use these):\n");
        for phrase in &config.banned_phrases {
            prompt.push_str(&format!("- \"{}\"\n", phrase));
        }
        prompt.push_str("- Any em-dashes (\u{2014})\n");
        prompt.push_str("- Multiple exclamation marks\n");
        prompt.push_str("- Generic conclusions like \"What are your thoughts?\"\n");

        if !self.research.is_empty() {
            prompt.push_str(CITATION_INSTRUCTIONS);
        }
        if self.data_sources.iter().any(DataSource::is_illustrative) {
            prompt.push_str(ILLUSTRATIVE_WARNING);
        }

        prompt.push_str(&format!(
            "\nREQUIRED STYLE:\n- {}-{} characters total\n",
            config.min_chars, config.max_chars
        ));
        prompt.push_str(STYLE_RULES);
        prompt
    }
}

/// Prompt for the single regeneration after a banned phrase was found
pub fn regeneration_prompt(idea: &str, author: &str, detected_phrase: &str) -> String {
    format!(
        "The previous draft contained the banned phrase \"{detected_phrase}\".\n\n\
         Generate a new LinkedIn post that is MORE HUMAN and LESS AI-LIKE.\n\n\
         Raw idea: \"{idea}\"\n\n\
         Remember:\n\
         - No corporate buzzwords\n\
         - No AI-isms like \"let's dive in\" or \"in today's\"\n\
         - Never use \"{detected_phrase}\"\n\
         - Direct, conversational tone\n\
         - Sounds like {author} talking naturally\n\n\
         Output only the post text."
    )
}
