use crate::keywords;
use crate::models::Language;

pub const ANALYSIS_SYSTEM_EN: &str = include_str!("../data/prompts/analysis_system_en.txt");
pub const ANALYSIS_SYSTEM_ZH: &str = include_str!("../data/prompts/analysis_system_zh.txt");
pub const ANALYSIS_SYSTEM_ES: &str = include_str!("../data/prompts/analysis_system_es.txt");
pub const ANALYSIS_USER_EN: &str = include_str!("../data/prompts/analysis_user_en.txt");
pub const ANALYSIS_USER_ZH: &str = include_str!("../data/prompts/analysis_user_zh.txt");
pub const ANALYSIS_USER_ES: &str = include_str!("../data/prompts/analysis_user_es.txt");
pub const IMAGE_GENERATION: &str = include_str!("../data/prompts/image_generation.txt");

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

/// System instruction and user template for a dream-analysis request.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisPrompt {
    pub system: &'static str,
    pub user_template: &'static str,
}

impl AnalysisPrompt {
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::En => Self {
                system: ANALYSIS_SYSTEM_EN,
                user_template: ANALYSIS_USER_EN,
            },
            Language::Zh => Self {
                system: ANALYSIS_SYSTEM_ZH,
                user_template: ANALYSIS_USER_ZH,
            },
            Language::Es => Self {
                system: ANALYSIS_SYSTEM_ES,
                user_template: ANALYSIS_USER_ES,
            },
        }
    }

    pub fn user_message(&self, dream: &str) -> String {
        render(self.user_template, &[("dream", dream)])
    }
}

/// English prompt for the image vendor. Non-English dreams are reduced to the
/// English phrases their recognized keywords map to.
pub fn image_prompt(dream: &str, language: Language) -> String {
    let scene = match language {
        Language::En => dream.to_string(),
        Language::Zh | Language::Es => keywords::english_scene(dream, language),
    };
    render(IMAGE_GENERATION, &[("dream", &scene)])
}
