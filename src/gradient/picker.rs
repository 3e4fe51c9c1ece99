//! Deterministic key → gradient assignment
//!
//! Keys (document ids, or titles for unsaved drafts) are hashed with djb2 over
//! UTF-16 code units using 32-bit signed wraparound, so the same key lands on
//! the same preset as the browser-side picker.

use anyhow::{ensure, Result};
use serde::Serialize;

use super::presets::{Gradient, GRADIENTS};

/// djb2 seed value; also the hash of the empty string.
pub const DJB2_SEED: i32 = 5381;

/// Rendering used when the selected entry has neither a class nor CSS.
pub const FALLBACK_CSS: &str = "linear-gradient(135deg,#475569,#0EA5E9)";

/// djb2 over UTF-16 code units with explicit i32 wraparound.
pub fn djb2(input: &str) -> i32 {
    input.encode_utf16().fold(DJB2_SEED, |acc, unit| {
        acc.wrapping_mul(33).wrapping_add(i32::from(unit))
    })
}

/// Reduce a key to an index in `0..modulo`, or `None` when `modulo` is zero.
///
/// `unsigned_abs` keeps `i32::MIN` in range.
pub fn hash_to_index(input: &str, modulo: usize) -> Option<usize> {
    (djb2(input).unsigned_abs() as usize).checked_rem(modulo)
}

/// What a presentation layer should apply to a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderSpec {
    /// Apply the utility classes
    Class {
        #[serde(rename = "className")]
        class_name: &'static str,
    },
    /// Apply an inline `background-image`
    InlineStyle {
        #[serde(rename = "backgroundImage")]
        background_image: &'static str,
    },
    /// Entry had no usable rendering
    Fallback {
        #[serde(rename = "backgroundImage")]
        background_image: &'static str,
    },
}

impl RenderSpec {
    /// Label used for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Class { .. } => "class",
            Self::InlineStyle { .. } => "inline_style",
            Self::Fallback { .. } => "fallback",
        }
    }

    pub fn class_name(&self) -> Option<&'static str> {
        match self {
            Self::Class { class_name } => Some(class_name),
            _ => None,
        }
    }

    pub fn background_image(&self) -> Option<&'static str> {
        match self {
            Self::InlineStyle { background_image } | Self::Fallback { background_image } => {
                Some(background_image)
            }
            Self::Class { .. } => None,
        }
    }
}

/// Full outcome of resolving a key: which entry was picked and how to draw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub index: usize,
    pub gradient_id: &'static str,
    pub render: RenderSpec,
}

/// Maps card keys to renderings over an immutable gradient table.
///
/// `supports_style_classes` replaces client-side feature detection: it is
/// decided once from configuration and can be overridden per request.
#[derive(Debug, Clone, Copy)]
pub struct GradientResolver {
    table: &'static [Gradient],
    supports_style_classes: bool,
}

impl Default for GradientResolver {
    fn default() -> Self {
        Self::new(true)
    }
}

impl GradientResolver {
    /// Resolver over the built-in presets.
    pub const fn new(supports_style_classes: bool) -> Self {
        Self {
            table: GRADIENTS,
            supports_style_classes,
        }
    }

    /// Resolver over a custom table. Rejects an empty table.
    pub fn with_table(table: &'static [Gradient], supports_style_classes: bool) -> Result<Self> {
        ensure!(!table.is_empty(), "gradient table must not be empty");
        Ok(Self {
            table,
            supports_style_classes,
        })
    }

    /// Same table, different capability flag.
    pub fn with_style_classes(self, supports_style_classes: bool) -> Self {
        Self {
            supports_style_classes,
            ..self
        }
    }

    pub fn supports_style_classes(&self) -> bool {
        self.supports_style_classes
    }

    pub fn table(&self) -> &'static [Gradient] {
        self.table
    }

    pub fn index_for(&self, key: &str) -> usize {
        // Tables are non-empty by construction
        hash_to_index(key, self.table.len()).unwrap_or(0)
    }

    pub fn pick(&self, key: &str) -> &'static Gradient {
        &self.table[self.index_for(key)]
    }

    /// Class if allowed and present, else inline CSS, else the fallback.
    pub fn resolve(&self, key: &str) -> RenderSpec {
        render_for(self.pick(key), self.supports_style_classes)
    }

    pub fn resolution(&self, key: &str) -> Resolution {
        let index = self.index_for(key);
        let gradient = &self.table[index];
        Resolution {
            index,
            gradient_id: gradient.id,
            render: render_for(gradient, self.supports_style_classes),
        }
    }
}

fn render_for(gradient: &'static Gradient, supports_style_classes: bool) -> RenderSpec {
    match (supports_style_classes, gradient.class_name, gradient.css) {
        (true, Some(class_name), _) => RenderSpec::Class { class_name },
        (_, _, Some(css)) => RenderSpec::InlineStyle {
            background_image: css,
        },
        _ => RenderSpec::Fallback {
            background_image: FALLBACK_CSS,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static BARE: &[Gradient] = &[Gradient {
        id: "bare",
        name: "Bare",
        class_name: None,
        css: None,
    }];

    static CLASS_ONLY: &[Gradient] = &[Gradient {
        id: "class-only",
        name: "Class only",
        class_name: Some("bg-gradient-to-br from-red-500 to-blue-500"),
        css: None,
    }];

    static EMPTY: &[Gradient] = &[];

    #[test]
    fn test_empty_string_hashes_to_seed() {
        assert_eq!(djb2(""), 5381);
        assert_eq!(hash_to_index("", GRADIENTS.len()), Some(5381 % 16));
        assert_eq!(GradientResolver::default().pick("").id, "green-lime");
    }

    #[test]
    fn test_abc_snapshot() {
        assert_eq!(djb2("abc"), 193_485_963);
        assert_eq!(hash_to_index("abc", 16), Some(11));
        assert_eq!(GradientResolver::default().pick("abc").id, "sky-blue");
    }

    #[test]
    fn test_wraparound_is_32_bit() {
        // 5381 * 33^6 overflows i32 on the sixth code unit
        let long = "aaaaaaaaaa";
        assert_eq!(djb2(long), 2_045_699_247);
        assert_eq!(hash_to_index(long, 16), Some(15));
        // Negative accumulators still reduce into range
        for key in ["zzzzzzzzzzzzzzzzzzzz", "The quick brown fox", "🦀 crab"] {
            assert!(hash_to_index(key, 16).is_some_and(|i| i < 16));
        }
    }

    #[test]
    fn test_zero_modulo_has_no_index() {
        assert_eq!(hash_to_index("abc", 0), None);
        assert_eq!(hash_to_index("", 0), None);
    }

    #[test]
    fn test_hashes_utf16_code_units() {
        // A non-BMP char is two UTF-16 units, not one char or four bytes
        let by_units = "🦀"
            .encode_utf16()
            .fold(DJB2_SEED, |acc, u| acc.wrapping_mul(33).wrapping_add(u as i32));
        assert_eq!(djb2("🦀"), by_units);
    }

    #[test]
    fn test_min_value_does_not_overflow() {
        assert_eq!(i32::MIN.unsigned_abs() as usize % 16, 0);
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let resolver = GradientResolver::new(true);
        for key in ["", "abc", "6650f0c2a1", "Neural Market Predictor"] {
            assert_eq!(resolver.resolve(key), resolver.resolve(key));
        }
    }

    #[test]
    fn test_class_preferred_when_supported() {
        let render = GradientResolver::new(true).resolve("abc");
        assert_eq!(
            render,
            RenderSpec::Class {
                class_name: "bg-gradient-to-br from-sky-500 to-blue-500"
            }
        );
    }

    #[test]
    fn test_inline_style_without_class_support() {
        let render = GradientResolver::new(false).resolve("abc");
        assert_eq!(
            render,
            RenderSpec::InlineStyle {
                background_image: "linear-gradient(135deg,#0EA5E9,#3B82F6)"
            }
        );
    }

    #[test]
    fn test_flag_changes_kind_not_entry() {
        let with = GradientResolver::new(true);
        let without = with.with_style_classes(false);
        for key in ["", "abc", "Hackathon Weekend", "65f1c0de"] {
            let a = with.resolution(key);
            let b = without.resolution(key);
            assert_eq!(a.gradient_id, b.gradient_id);
            assert_eq!(a.index, b.index);
            assert_eq!(a.render.kind(), "class");
            assert_eq!(b.render.kind(), "inline_style");
        }
    }

    #[test]
    fn test_bare_entry_falls_back() {
        for flag in [true, false] {
            let resolver = GradientResolver::with_table(BARE, flag).unwrap();
            let render = resolver.resolve("anything");
            assert_eq!(render.kind(), "fallback");
            assert_eq!(
                render.background_image(),
                Some("linear-gradient(135deg,#475569,#0EA5E9)")
            );
        }
    }

    #[test]
    fn test_class_only_entry_without_support_falls_back() {
        let resolver = GradientResolver::with_table(CLASS_ONLY, false).unwrap();
        assert_eq!(resolver.resolve("x").kind(), "fallback");

        let resolver = resolver.with_style_classes(true);
        assert!(resolver.resolve("x").class_name().is_some());
    }

    #[test]
    fn test_empty_table_rejected() {
        assert!(GradientResolver::with_table(EMPTY, true).is_err());
    }

    #[test]
    fn test_render_spec_serialization() {
        let json = serde_json::to_value(GradientResolver::new(false).resolution("abc")).unwrap();
        assert_eq!(json["gradient_id"], "sky-blue");
        assert_eq!(json["index"], 11);
        assert_eq!(json["render"]["kind"], "inline_style");
        assert_eq!(
            json["render"]["backgroundImage"],
            "linear-gradient(135deg,#0EA5E9,#3B82F6)"
        );
    }
}
