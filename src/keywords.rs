//! Keyword tables for the image pipeline
//!
//! The image vendor works best with English prompts, so dreams written in
//! Chinese or Spanish are reduced to English scene phrases by substring match.
//! The stock-photo fallback uses the same idea to pick a search query.

use crate::models::Language;

/// Each entry: any of the patterns present → the English phrase is used.
type PhraseTable = &'static [(&'static [&'static str], &'static str)];

const ZH_PHRASES: PhraseTable = &[
    (&["飞", "飞翔"], "flying through the sky"),
    (&["花", "花园"], "beautiful garden with colorful flowers"),
    (&["海", "水"], "peaceful ocean or flowing water"),
    (&["森林", "树"], "enchanted forest with tall trees"),
    (&["天空", "云"], "expansive sky with soft clouds"),
    (&["动物"], "gentle animals"),
    (&["光", "阳光"], "warm golden light"),
];

const ES_PHRASES: PhraseTable = &[
    (&["volar", "volando"], "flying through the sky"),
    (&["jardín", "flores"], "beautiful garden with colorful flowers"),
    (&["océano", "agua", "mar"], "peaceful ocean or flowing water"),
    (&["bosque", "árboles"], "enchanted forest with tall trees"),
    (&["cielo", "nubes"], "expansive sky with soft clouds"),
    (&["animales"], "gentle animals"),
    (&["luz", "sol"], "warm golden light"),
];

const DEFAULT_SCENE: &str = "a peaceful and beautiful dreamscape";

/// First match wins, so order is priority.
const SEARCH_TERMS: PhraseTable = &[
    (&["童年", "小时候", "childhood"], "childhood memories peaceful"),
    (&["花", "花园", "garden", "flower"], "healing flowers peaceful garden"),
    (&["海", "水", "ocean", "sea", "water"], "calm ocean healing water"),
    (&["森林", "树", "forest", "tree"], "peaceful forest healing nature"),
    (&["天空", "云", "sky", "cloud"], "peaceful sky healing clouds"),
    (&["紫色", "粉色", "purple", "pink"], "healing purple pink colors"),
];

const DEFAULT_SEARCH_TERM: &str = "healing meditation peaceful";

fn matches(text: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|p| text.contains(p))
}

/// Comma-joined English phrases for every recognized keyword in `dream`.
pub fn english_scene(dream: &str, language: Language) -> String {
    let table = match language {
        Language::Zh => ZH_PHRASES,
        Language::Es => ES_PHRASES,
        Language::En => return dream.to_string(),
    };

    let lowered = dream.to_lowercase();
    let phrases: Vec<&str> = table
        .iter()
        .filter(|(patterns, _)| matches(&lowered, patterns))
        .map(|(_, phrase)| *phrase)
        .collect();

    if phrases.is_empty() {
        DEFAULT_SCENE.to_string()
    } else {
        phrases.join(", ")
    }
}

/// Short stock-photo query derived from the dream text.
pub fn search_term(dream: &str) -> &'static str {
    let lowered = dream.to_lowercase();
    SEARCH_TERMS
        .iter()
        .find(|(patterns, _)| matches(&lowered, patterns))
        .map(|(_, term)| *term)
        .unwrap_or(DEFAULT_SEARCH_TERM)
}
