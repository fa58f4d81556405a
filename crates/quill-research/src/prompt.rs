//! LLM prompt for fact extraction

/// Builds the fact-extraction prompt for one page
pub struct FactPromptBuilder<'a> {
    content: &'a str,
    topic: &'a str,
    source_name: &'a str,
}

impl<'a> FactPromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(content: &'a str, topic: &'a str, source_name: &'a str) -> Self {
        Self {
            content,
            topic,
            source_name,
        }
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(
            "Analyze this web content and extract relevant facts, statistics, and quotes \
             that could support a LinkedIn post about the following topic:\n\n",
        );
        prompt.push_str(&format!("TOPIC: {}\n\n", self.topic));
        prompt.push_str(&format!("WEB CONTENT:\n{}\n\n", self.content));
        prompt.push_str(&format!("SOURCE: {}\n\n", self.source_name));
        prompt.push_str(EXTRACTION_INSTRUCTIONS);

        prompt
    }
}

const EXTRACTION_INSTRUCTIONS: &str = r#"Please extract:
1. Specific statistics or data points (with exact numbers)
2. Key quotes that could be cited
3. Main findings or conclusions relevant to the topic
4. Any industry trends mentioned

Format your response as JSON:
{
    "extracted_facts": [
        {
            "fact": "The specific fact or statistic",
            "type": "statistic" | "quote" | "finding" | "trend",
            "citation_text": "How to cite this (e.g., 'According to [source]...')"
        }
    ],
    "summary": "A 2-3 sentence summary of the most relevant information for this topic",
    "relevance_score": 1-10 (how relevant is this content to the topic)
}

If no relevant facts are found, return empty extracted_facts array with relevance_score of 1.
Only include facts that are directly relevant to the topic. Be precise with numbers - don't estimate or round."#;
