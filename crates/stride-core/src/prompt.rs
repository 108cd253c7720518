//! Prompt construction for the weekly summary.

use chrono::NaiveDate;

use crate::{log::Entry, summarize::GenerationParams};

/// Separator placed between entries when they are combined into one block.
pub const ENTRY_DELIMITER: &str = "\n\n---\n\n";

/// Sampling parameters used for every weekly compilation.
pub const WEEKLY_GENERATION_PARAMS: GenerationParams = GenerationParams {
  temperature:       0.4,
  max_output_tokens: 1000,
};

/// Section headings of the weekly log, in output order.
pub const SECTIONS: [(&str, &str); 4] = [
  ("✅ **What I did**", "[Synthesized list of key tasks/projects]"),
  (
    "🎯 **Impact**",
    "[Synthesized list of outcomes/achievements, quantifying where possible]",
  ),
  ("🧠 **Learned**", "[Synthesized list of new skills, technologies, insights]"),
  (
    "❓ **Questions / Next**",
    "[Synthesized list of open questions, next steps, or exploration]",
  ),
];

/// Join entry contents in the given order. Contents are not trimmed,
/// filtered or deduplicated.
pub fn combine_entries(entries: &[Entry]) -> String {
  entries
    .iter()
    .map(|e| e.content.as_str())
    .collect::<Vec<_>>()
    .join(ENTRY_DELIMITER)
}

/// Build the instruction sent to the summarizer for the week starting at
/// `week_start`.
pub fn build_prompt(week_start: NaiveDate, combined: &str) -> String {
  let mut template = format!("## Week of {week_start}\n\n");
  for (heading, placeholder) in SECTIONS {
    template.push_str(heading);
    template.push_str("\n- ");
    template.push_str(placeholder);
    template.push_str("\n\n");
  }

  format!(
    "You are an expert personal assistant helping a software engineer create a \
     concise promotion journal. Review the following raw daily/session notes \
     from a single week. Your task is to:\n\
     1. Synthesize and combine similar points from the notes.\n\
     2. Structure the information into a single, comprehensive weekly log using \
     the following markdown format (do NOT wrap it in a code block):\n\n\
     {template}\
     Crucially:\n\
     - Do NOT invent content. Only use information provided in the raw notes.\n\
     - Be concise. Combine related points into single bullet items where appropriate.\n\
     - If a section (e.g., 'Impact') has no relevant information, include the \
     heading but write 'N/A' or 'No specific new impact noted.'\n\
     - Use the exact markdown headings and emojis provided.\n\n\
     Raw Weekly Notes:\n---\n{combined}\n---"
  )
}
