//! Persona prompts and canned replies

use super::{ChatMessage, Role};

/// Chat widget persona
pub const SHOP_ASSISTANT_PROMPT: &str = "You are the friendly assistant of an independent golf pro shop. \
Help customers choose clubs, balls, bags, apparel and accessories, explain fitting basics \
(shaft flex, loft, lie, grip size) in plain language, and point them to the right product \
categories. Keep answers short and practical. If you are unsure about stock, prices or \
delivery times, suggest contacting the shop instead of guessing.";

/// Description generator persona
pub const COPYWRITER_PROMPT: &str = "You write product descriptions for a golf equipment store. \
Write two short paragraphs of persuasive, accurate copy aimed at golfers. Mention the key \
features you are given, do not invent technical specifications, and do not use headings, \
lists or prices.";

/// Reply when the model cannot be reached
pub const CHAT_FALLBACK: &str = "Thanks for your message! Our assistant is taking a short break \
right now. Please browse our clubs, balls and accessories, or contact the shop directly and \
one of our team will be happy to help.";

pub const CHAT_MAX_TOKENS: u32 = 300;
pub const CHAT_TEMPERATURE: f32 = 0.7;
pub const DESCRIPTION_MAX_TOKENS: u32 = 400;
pub const DESCRIPTION_TEMPERATURE: f32 = 0.8;

/// Prior turns forwarded with a chat message
pub const MAX_HISTORY: usize = 10;

/// Keep the most recent user/assistant turns, drop empty and system ones
pub fn trim_history(history: Vec<ChatMessage>) -> Vec<ChatMessage> {
    let kept: Vec<ChatMessage> = history
        .into_iter()
        .filter(|m| m.role != Role::System && !m.content.trim().is_empty())
        .collect();
    let skip = kept.len().saturating_sub(MAX_HISTORY);
    kept.into_iter().skip(skip).collect()
}

/// User prompt for the description generator
pub fn description_request(
    name: &str,
    brand: Option<&str>,
    category: Option<&str>,
    features: &[String],
) -> String {
    let mut prompt = format!("Write a product description for \"{name}\"");
    if let Some(brand) = brand {
        prompt.push_str(&format!(" by {brand}"));
    }
    if let Some(category) = category {
        prompt.push_str(&format!(" in the {category} category"));
    }
    prompt.push('.');
    if !features.is_empty() {
        prompt.push_str("\nKey features:\n");
        for feature in features {
            prompt.push_str(&format!("- {feature}\n"));
        }
    }
    prompt
}

/// Template description used when the model is unavailable
pub fn fallback_description(name: &str, brand: Option<&str>, category: Option<&str>) -> String {
    let maker = brand.map(|b| format!(" from {b}")).unwrap_or_default();
    let kind = category
        .map(|c| c.to_lowercase())
        .unwrap_or_else(|| "golf equipment".to_string());
    format!(
        "The {name}{maker} is a quality choice of {kind} for golfers who want dependable \
         performance on every round. Visit the shop or contact our team for fitting advice \
         and full specifications."
    )
}
