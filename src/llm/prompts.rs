use crate::models::Tag;

pub const SENTIMENT_PROMPT: &str = r#"Given the following reddit comment, please say if the sentiment is NEGATIVE, NEUTRAL, or POSITIVE.

The sentiment must be one of those three choices. Please only return one of those three choices.

Comment: {comment}
"#;

const TAGGING_PREAMBLE: &str = r#"Given the following reddit comment for a product, add the following tags if the tag applies to the comment. Each tag has a tag name and a criteria for when it applies.
The final answer for Tags can contain zero or more comma separated tags.
Please only return the tags that apply. If no tags apply, return nothing (ie empty string).
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptTemplate {
    Sentiment,
    Tagging,
}

impl PromptTemplate {
    pub fn name(&self) -> &'static str {
        match self {
            PromptTemplate::Sentiment => "sentiment",
            PromptTemplate::Tagging => "tagging",
        }
    }

    pub fn render(&self, comment: &str) -> String {
        match self {
            PromptTemplate::Sentiment => SENTIMENT_PROMPT.replace("{comment}", comment),
            PromptTemplate::Tagging => tagging_prompt(comment),
        }
    }
}

fn tagging_prompt(comment: &str) -> String {
    let mut prompt = String::from(TAGGING_PREAMBLE);
    prompt.push('\n');

    for tag in Tag::ALL {
        prompt.push_str(&format!("Tag Name: {}\n", tag));
        prompt.push_str(&format!("Tag Criteria: {}\n", tag.criteria()));
    }

    prompt.push_str(&format!("\nComment: {}\nTags:\n", comment));
    prompt
}
