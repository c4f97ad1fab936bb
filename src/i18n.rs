//! Shared message catalog for every user-facing string.
//!
//! Server error messages and the browser UI strings live in one table per
//! locale. Every lookup goes through [`translate`], so the fallback rule is the
//! same everywhere: requested locale, then English, then the key itself.

use crate::models::Language;
use crate::prompts;
use std::collections::BTreeMap;

const CATALOG_EN: &[(&str, &str)] = &[
    // Dream analysis endpoint
    ("analysis.error.empty_dream", "Dream description cannot be empty"),
    ("analysis.error.not_configured", "DeepSeek API key not configured"),
    ("analysis.error.rate_limited", "Too many requests, please try again later"),
    ("analysis.error.invalid_key", "Invalid API key, please check configuration"),
    ("analysis.error.failed", "Dream analysis failed, please try again later"),
    // Image generation endpoint
    ("image.error.empty_dream", "Dream description cannot be empty"),
    (
        "image.message.fallback",
        "Due to technical limitations, we provided a related healing image for you",
    ),
    (
        "image.message.preset",
        "We provided a healing-style image to help you better understand your dream",
    ),
    (
        "image.error.unavailable",
        "Image generation is temporarily unavailable, but dream analysis function is normal",
    ),
    ("image.message.continue", "You can continue to use the dream analysis function"),
    (
        "image.message.pending",
        "Your GPT-4o image generation task has been submitted to 4oimageapi.io (Task ID: {{task_short}}...). \
         The AI-generated image will be ready shortly via callback. Meanwhile, here's a curated healing image \
         for your dream analysis. Check /api/4oimage-result/{{task_id}} for the final result.",
    ),
    // Page
    ("page-title", "Dream Analysis"),
    ("page-subtitle", "AI Dream Interpreter - Explore the Mysteries of Your Subconscious"),
    ("dream-input-label", "Describe your dream..."),
    (
        "dream-input-placeholder",
        "For example: I dreamed I was walking through a field of purple flowers with a rainbow in the sky...",
    ),
    ("analyze-btn", "Analyze Dream"),
    ("loading-text", "AI is analyzing your dream..."),
    ("analysis-title", "Dream Analysis"),
    ("image-title", "Dream Image"),
    ("image-placeholder", "The image generated from your dream will appear here"),
    ("generate-image-btn", "Generate Dream Image"),
    ("generating-text", "Generating..."),
    ("footer-text", "Exploring Inner Wisdom"),
    ("ai-powered", "AI Powered"),
    ("free-to-use", "Free to Use"),
    // Notifications
    ("error-empty-dream", "Please enter your dream description"),
    ("error-analysis-failed", "Dream analysis failed, please try again later"),
    ("error-image-failed", "Image generation failed, please try again later"),
    ("success-image-generated", "Dream image generated successfully!"),
    ("error-analyze-first", "Please analyze your dream first"),
    ("input-hint-text", "We'll analyze your dream and generate a beautiful image for you!"),
    // Gallery
    ("gallery-title", "Dream Gallery"),
    ("gallery-subtitle", "Explore dreams shared by our community"),
    ("gallery-placeholder", "Be the first to share your dream image!"),
    // Language switcher
    ("language-english", "English"),
    ("language-spanish", "Español"),
    ("language-chinese", "中文"),
];

const CATALOG_ZH: &[(&str, &str)] = &[
    ("analysis.error.empty_dream", "梦境描述不能为空"),
    ("analysis.error.not_configured", "DeepSeek API密钥未配置"),
    ("analysis.error.rate_limited", "请求过于频繁，请稍后重试"),
    ("analysis.error.invalid_key", "API密钥无效，请检查配置"),
    ("analysis.error.failed", "梦境分析失败，请稍后重试"),
    ("image.error.empty_dream", "梦境描述不能为空"),
    ("image.message.fallback", "由于技术限制，为您提供了相关的疗愈图像"),
    ("image.message.preset", "为您提供了一张疗愈风格的图像，希望能帮助您更好地理解梦境"),
    ("image.error.unavailable", "图像生成暂时不可用，但梦境分析功能正常"),
    ("image.message.continue", "您可以继续使用梦境分析功能"),
    (
        "image.message.pending",
        "您的GPT-4o图像生成任务已提交至4oimageapi.io（任务ID: {{task_short}}...）。AI生成的图像将通过回调机制很快就绪。\
         现在为您提供精选疗愈图像辅助梦境分析。可通过 /api/4oimage-result/{{task_id}} 查看最终结果。",
    ),
    ("page-title", "梦境解析"),
    ("page-subtitle", "AI解梦助手 - 探索潜意识的奥秘"),
    ("dream-input-label", "请描述您的梦境..."),
    ("dream-input-placeholder", "例如：我梦见自己在一片紫色的花海中漫步，天空中有彩虹..."),
    ("analyze-btn", "解析梦境"),
    ("loading-text", "AI正在解析您的梦境..."),
    ("analysis-title", "梦境解析"),
    ("image-title", "梦境图像"),
    ("image-placeholder", "基于您的梦境生成的图像将在这里显示"),
    ("generate-image-btn", "生成梦境图像"),
    ("generating-text", "生成中..."),
    ("footer-text", "探索内心的智慧"),
    ("ai-powered", "AI驱动"),
    ("free-to-use", "免费使用"),
    ("error-empty-dream", "请输入您的梦境描述"),
    ("error-analysis-failed", "梦境分析失败，请稍后重试"),
    ("error-image-failed", "图像生成失败，请稍后重试"),
    ("success-image-generated", "梦境图像生成成功！"),
    ("error-analyze-first", "请先解析梦境"),
    ("input-hint-text", "我们将分析您的梦境并为您生成一张美丽的图片！"),
    ("gallery-title", "梦境画廊"),
    ("gallery-subtitle", "探索我们的社区分享的梦境"),
    ("gallery-placeholder", "成为第一个分享您梦境图像的人！"),
    ("language-english", "English"),
    ("language-spanish", "Español"),
    ("language-chinese", "中文"),
];

const CATALOG_ES: &[(&str, &str)] = &[
    ("analysis.error.empty_dream", "La descripción del sueño no puede estar vacía"),
    ("analysis.error.not_configured", "Clave API de DeepSeek no configurada"),
    ("analysis.error.rate_limited", "Demasiadas solicitudes, inténtalo de nuevo más tarde"),
    ("analysis.error.invalid_key", "Clave API inválida, verifica la configuración"),
    ("analysis.error.failed", "Análisis de sueños falló, inténtalo de nuevo más tarde"),
    ("image.error.empty_dream", "La descripción del sueño no puede estar vacía"),
    (
        "image.message.fallback",
        "Debido a limitaciones técnicas, te proporcionamos una imagen sanadora relacionada",
    ),
    (
        "image.message.preset",
        "Te proporcionamos una imagen de estilo sanador para ayudarte a entender mejor tu sueño",
    ),
    (
        "image.error.unavailable",
        "La generación de imágenes no está disponible temporalmente, pero la función de análisis de sueños funciona normalmente",
    ),
    ("image.message.continue", "Puedes continuar usando la función de análisis de sueños"),
    (
        "image.message.pending",
        "Su tarea de generación de imágenes GPT-4o se ha enviado a 4oimageapi.io (ID: {{task_short}}...). \
         La imagen generada por IA estará lista pronto mediante callback. Mientras tanto, aquí tiene una imagen \
         curativa seleccionada. Consulte /api/4oimage-result/{{task_id}} para el resultado final.",
    ),
    ("page-title", "Análisis de Sueños"),
    ("page-subtitle", "Intérprete de Sueños IA - Explora los Misterios de tu Subconsciente"),
    ("dream-input-label", "Describe tu sueño..."),
    (
        "dream-input-placeholder",
        "Por ejemplo: Soñé que caminaba por un campo de flores púrpuras con un arcoíris en el cielo...",
    ),
    ("analyze-btn", "Analizar Sueño"),
    ("loading-text", "La IA está analizando tu sueño..."),
    ("analysis-title", "Análisis del Sueño"),
    ("image-title", "Imagen del Sueño"),
    ("image-placeholder", "La imagen generada de tu sueño aparecerá aquí"),
    ("generate-image-btn", "Generar Imagen del Sueño"),
    ("generating-text", "Generando..."),
    ("footer-text", "Explorando la Sabiduría Interior"),
    ("ai-powered", "Con IA"),
    ("free-to-use", "Gratis"),
    ("error-empty-dream", "Por favor ingresa la descripción de tu sueño"),
    (
        "error-analysis-failed",
        "El análisis del sueño falló, por favor intenta de nuevo más tarde",
    ),
    (
        "error-image-failed",
        "La generación de imagen falló, por favor intenta de nuevo más tarde",
    ),
    ("success-image-generated", "¡Imagen del sueño generada exitosamente!"),
    ("error-analyze-first", "Por favor analiza tu sueño primero"),
    (
        "input-hint-text",
        "Analizaremos tu sueño y generaremos una imagen hermosa para ti!",
    ),
    ("gallery-title", "Galería de Sueños"),
    ("gallery-subtitle", "Explora sueños compartidos por nuestra comunidad"),
    ("gallery-placeholder", "¡Se el primero en compartir tu imagen de sueño!"),
    ("language-english", "English"),
    ("language-spanish", "Español"),
    ("language-chinese", "中文"),
];

fn table(language: Language) -> &'static [(&'static str, &'static str)] {
    match language {
        Language::En => CATALOG_EN,
        Language::Zh => CATALOG_ZH,
        Language::Es => CATALOG_ES,
    }
}

fn find(entries: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    entries
        .iter()
        .find(|(k, v)| *k == key && !v.is_empty())
        .map(|(_, v)| *v)
}

/// Looks `key` up in `language`, then English, then returns the key itself.
pub fn translate<'a>(language: Language, key: &'a str) -> &'a str {
    find(table(language), key)
        .or_else(|| find(CATALOG_EN, key))
        .unwrap_or(key)
}

/// [`translate`] with `{{name}}` placeholders filled in.
pub fn translate_with(language: Language, key: &str, vars: &[(&str, &str)]) -> String {
    prompts::render(translate(language, key), vars)
}

/// Every English key with its best translation for `language`.
pub fn catalog(language: Language) -> BTreeMap<&'static str, &'static str> {
    CATALOG_EN
        .iter()
        .map(|(key, _)| (*key, translate(language, *key)))
        .collect()
}
