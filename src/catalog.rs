//! Read-only registry of variant options and direction metadata.
//!
//! A catalog is built once and shared behind an `Arc`; nothing mutates it after
//! construction. Grouping by direction and the metadata table are computed at
//! build time.

use crate::{
    error::{Result, VariantError},
    models::{Direction, DirectionMeta, VariantOption},
};
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

static BUILTIN: Lazy<Arc<OptionCatalog>> = Lazy::new(|| Arc::new(OptionCatalog::builtin()));

#[derive(Debug)]
pub struct OptionCatalog {
    options: Vec<Arc<VariantOption>>,
    index: HashMap<String, usize>,
    by_direction: BTreeMap<Direction, Vec<Arc<VariantOption>>>,
    meta: HashMap<Direction, DirectionMeta>,
}

impl OptionCatalog {
    pub fn new(options: Vec<VariantOption>) -> Result<Self> {
        let mut index = HashMap::with_capacity(options.len());
        let mut by_direction: BTreeMap<Direction, Vec<Arc<VariantOption>>> = BTreeMap::new();
        let mut stored = Vec::with_capacity(options.len());

        for option in options {
            if index.contains_key(&option.id) {
                return Err(VariantError::ConfigError(format!(
                    "Duplicate variant option id: {}",
                    option.id
                )));
            }
            let option = Arc::new(option);
            index.insert(option.id.clone(), stored.len());
            by_direction
                .entry(option.direction)
                .or_default()
                .push(Arc::clone(&option));
            stored.push(option);
        }

        Ok(Self {
            options: stored,
            index,
            by_direction,
            meta: builtin_direction_meta(),
        })
    }

    pub fn builtin() -> Self {
        Self::new(builtin_options()).unwrap_or_else(|e| {
            log::error!("Built-in catalog rejected: {}", e);
            Self {
                options: Vec::new(),
                index: HashMap::new(),
                by_direction: BTreeMap::new(),
                meta: builtin_direction_meta(),
            }
        })
    }

    /// Process-wide built-in catalog, constructed on first use.
    pub fn shared() -> Arc<OptionCatalog> {
        Arc::clone(&BUILTIN)
    }

    /// All options, in registration order.
    pub fn list_options(&self) -> &[Arc<VariantOption>] {
        &self.options
    }

    pub fn options_for_direction(&self, direction: Direction) -> &[Arc<VariantOption>] {
        self.by_direction
            .get(&direction)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn grouped(&self) -> &BTreeMap<Direction, Vec<Arc<VariantOption>>> {
        &self.by_direction
    }

    pub fn get(&self, id: &str) -> Option<&Arc<VariantOption>> {
        self.index.get(id).map(|&i| &self.options[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Metadata for a raw direction identifier. Never fails: unknown
    /// identifiers get the fallback icon and echo the identifier back.
    pub fn direction_metadata(&self, raw: &str) -> DirectionMeta {
        Direction::parse(raw)
            .and_then(|d| self.meta.get(&d))
            .cloned()
            .unwrap_or_else(|| DirectionMeta::fallback(raw))
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

fn meta(label: &str, icon: &str, description: &str) -> DirectionMeta {
    DirectionMeta {
        label: label.to_string(),
        icon: icon.to_string(),
        description: description.to_string(),
    }
}

fn builtin_direction_meta() -> HashMap<Direction, DirectionMeta> {
    HashMap::from([
        (Direction::Style, meta("Style variants", "🎨", "Change the overall visual style")),
        (Direction::Tone, meta("Tone variants", "🌈", "Adjust the color mood")),
        (Direction::Composition, meta("Composition variants", "📐", "Change camera angle and framing")),
        (Direction::Scene, meta("Scene variants", "🏠", "Swap the background environment")),
        (Direction::Seasonal, meta("Seasonal themes", "🗓️", "Add seasonal or holiday elements")),
        (Direction::Element, meta("Element variants", "✨", "Add or remove elements")),
        (Direction::Text, meta("Text variants", "📝", "Add marketing copy")),
    ])
}

fn builtin_options() -> Vec<VariantOption> {
    use Direction::*;
    vec![
        VariantOption::new(
            "style-realistic", Style, "Photorealistic", "High-definition realistic photography",
            "Transform this image into a hyper-realistic photographic style with studio lighting, sharp details, and professional color grading. Maintain the original subject and composition.",
            "📸",
        ),
        VariantOption::new(
            "style-illustration", Style, "Illustration", "Polished digital illustration",
            "Transform this image into a beautiful digital illustration style with clean lines, vibrant colors, and artistic shading. Keep the main subject recognizable.",
            "🎨",
        ),
        VariantOption::new(
            "style-flat", Style, "Flat design", "Modern flat design look",
            "Transform this image into a modern flat design style with bold shapes, minimal gradients, and clean geometric forms. Simplify details while keeping the essence.",
            "🔲",
        ),
        VariantOption::new(
            "style-3d", Style, "3D render", "Three-dimensional rendered look",
            "Transform this image into a 3D rendered style with depth, realistic materials, soft shadows, and a polished CGI look. Keep the subject centered.",
            "🎮",
        ),
        VariantOption::new(
            "tone-warm", Tone, "Warm tone", "Cozy orange and amber palette",
            "Adjust the color grading to a warm tone with golden yellows, soft oranges, and cozy amber hues. Keep the composition and subject unchanged.",
            "🌅",
        ),
        VariantOption::new(
            "tone-cool", Tone, "Cool tone", "Calm blue and teal palette",
            "Adjust the color grading to a cool tone with soft blues, teals, and silver highlights. Maintain the original composition and subject.",
            "❄️",
        ),
        VariantOption::new(
            "tone-high-contrast", Tone, "High contrast", "Punchy, high-impact contrast",
            "Enhance the contrast dramatically with deep blacks, bright highlights, and punchy colors. Make it visually striking while keeping the subject clear.",
            "⚡",
        ),
        VariantOption::new(
            "tone-soft", Tone, "Soft dreamy", "Gentle pastel haze",
            "Apply a soft, dreamy aesthetic with muted pastels, gentle light leaks, and a slightly hazy atmosphere. Keep the subject visible but ethereal.",
            "🌸",
        ),
        VariantOption::new(
            "comp-closeup", Composition, "Close-up", "Tight framing on the subject",
            "Recreate this scene as a dramatic close-up shot, focusing tightly on the main subject. Add depth of field with a blurred background.",
            "🔍",
        ),
        VariantOption::new(
            "comp-wide", Composition, "Wide shot", "Wide angle showing the full scene",
            "Recreate this scene as a wide-angle panoramic shot, showing more of the environment around the subject. Maintain the subject as the focal point.",
            "🏞️",
        ),
        VariantOption::new(
            "comp-overhead", Composition, "Overhead", "Top-down view",
            "Recreate this scene from a top-down overhead perspective, as if photographed from directly above. Keep all key elements visible.",
            "🔭",
        ),
        VariantOption::new(
            "comp-low", Composition, "Low angle", "Looking up at the subject",
            "Recreate this scene from a low angle looking upward, making the subject appear more powerful and impressive.",
            "⬆️",
        ),
        VariantOption::new(
            "scene-studio", Scene, "Studio backdrop", "Clean solid studio background",
            "Place the main subject on a clean, solid white studio background with professional lighting. Remove any distracting elements.",
            "⬜",
        ),
        VariantOption::new(
            "scene-outdoor", Scene, "Outdoors", "Natural outdoor setting",
            "Place the main subject in a beautiful outdoor natural setting with soft natural lighting, greenery, and a pleasant atmosphere.",
            "🌳",
        ),
        VariantOption::new(
            "scene-luxury", Scene, "Luxury", "High-end showcase environment",
            "Place the main subject in a luxurious, high-end environment with elegant materials like marble, gold accents, and sophisticated lighting.",
            "💎",
        ),
        VariantOption::new(
            "scene-minimal", Scene, "Minimal space", "Simple modern display space",
            "Place the main subject in a minimalist modern space with clean lines, neutral colors, and thoughtful negative space.",
            "🪴",
        ),
        VariantOption::new(
            "seasonal-spring", Seasonal, "Spring", "Fresh spring atmosphere",
            "Add spring elements to this image: cherry blossoms, fresh green leaves, soft pink and green colors, morning light, and a fresh, hopeful atmosphere.",
            "🌸",
        ),
        VariantOption::new(
            "seasonal-summer", Seasonal, "Summer", "Energetic summer atmosphere",
            "Add summer elements to this image: bright sunshine, tropical colors, beach vibes, vibrant energy, and warm golden light.",
            "☀️",
        ),
        VariantOption::new(
            "seasonal-autumn", Seasonal, "Autumn", "Warm autumn atmosphere",
            "Add autumn elements to this image: falling leaves, warm orange and brown tones, cozy atmosphere, and soft golden hour lighting.",
            "🍂",
        ),
        VariantOption::new(
            "seasonal-winter", Seasonal, "Winter", "Cozy winter atmosphere",
            "Add winter elements to this image: soft snow, cozy warm lighting, cool blue tones with warm highlights, and a festive comfortable atmosphere.",
            "❄️",
        ),
        VariantOption::new(
            "seasonal-cny", Seasonal, "Chinese New Year", "Festive lunar new year atmosphere",
            "Add Chinese New Year elements: red and gold colors, lanterns, traditional patterns, festive decorations, and a celebratory atmosphere.",
            "🧧",
        ),
    ]
}
