//! Preset card gradients
//!
//! Order matters: card keys hash to an index into [`GRADIENTS`], so reordering
//! or inserting entries reassigns colours for every existing card.

use serde::Serialize;

/// A two-colour linear gradient with a class rendering and a raw CSS rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Gradient {
    /// Stable identifier (unique within a table)
    pub id: &'static str,
    /// Display name for the admin UI
    pub name: &'static str,
    /// Utility-class rendering, used when style classes resolve on the client
    #[serde(rename = "className", skip_serializing_if = "Option::is_none")]
    pub class_name: Option<&'static str>,
    /// Raw CSS `background-image` value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css: Option<&'static str>,
}

impl Gradient {
    const fn preset(
        id: &'static str,
        name: &'static str,
        class_name: &'static str,
        css: &'static str,
    ) -> Self {
        Self {
            id,
            name,
            class_name: Some(class_name),
            css: Some(css),
        }
    }
}

/// Built-in gradient table.
pub const GRADIENTS: &[Gradient] = &[
    Gradient::preset(
        "indigo-purple",
        "Indigo → Purple",
        "bg-gradient-to-br from-indigo-500 to-purple-500",
        "linear-gradient(135deg,#6366F1,#A855F7)",
    ),
    Gradient::preset(
        "violet-fuchsia",
        "Violet → Fuchsia",
        "bg-gradient-to-br from-violet-500 to-fuchsia-500",
        "linear-gradient(135deg,#7C3AED,#D946EF)",
    ),
    Gradient::preset(
        "blue-cyan",
        "Blue → Cyan",
        "bg-gradient-to-br from-blue-500 to-cyan-500",
        "linear-gradient(135deg,#3B82F6,#06B6D4)",
    ),
    Gradient::preset(
        "cyan-teal",
        "Cyan → Teal",
        "bg-gradient-to-br from-cyan-500 to-teal-500",
        "linear-gradient(135deg,#06B6D4,#14B8A6)",
    ),
    Gradient::preset(
        "teal-emerald",
        "Teal → Emerald",
        "bg-gradient-to-br from-teal-500 to-emerald-500",
        "linear-gradient(135deg,#14B8A6,#10B981)",
    ),
    Gradient::preset(
        "green-lime",
        "Green → Lime",
        "bg-gradient-to-br from-green-500 to-lime-500",
        "linear-gradient(135deg,#22C55E,#84CC16)",
    ),
    Gradient::preset(
        "amber-orange",
        "Amber → Orange",
        "bg-gradient-to-br from-amber-500 to-orange-500",
        "linear-gradient(135deg,#F59E0B,#F97316)",
    ),
    Gradient::preset(
        "orange-red",
        "Orange → Red",
        "bg-gradient-to-br from-orange-500 to-red-500",
        "linear-gradient(135deg,#F97316,#EF4444)",
    ),
    Gradient::preset(
        "rose-pink",
        "Rose → Pink",
        "bg-gradient-to-br from-rose-500 to-pink-500",
        "linear-gradient(135deg,#F43F5E,#EC4899)",
    ),
    Gradient::preset(
        "pink-fuchsia",
        "Pink → Fuchsia",
        "bg-gradient-to-br from-pink-500 to-fuchsia-500",
        "linear-gradient(135deg,#EC4899,#D946EF)",
    ),
    Gradient::preset(
        "purple-rose",
        "Purple → Rose",
        "bg-gradient-to-br from-purple-500 to-rose-500",
        "linear-gradient(135deg,#A855F7,#F43F5E)",
    ),
    Gradient::preset(
        "sky-blue",
        "Sky → Blue",
        "bg-gradient-to-br from-sky-500 to-blue-500",
        "linear-gradient(135deg,#0EA5E9,#3B82F6)",
    ),
    Gradient::preset(
        "slate-indigo",
        "Slate → Indigo",
        "bg-gradient-to-br from-slate-600 to-indigo-500",
        "linear-gradient(135deg,#475569,#6366F1)",
    ),
    Gradient::preset(
        "zinc-slate",
        "Zinc → Slate",
        "bg-gradient-to-br from-zinc-600 to-slate-600",
        "linear-gradient(135deg,#52525B,#475569)",
    ),
    Gradient::preset(
        "emerald-cyan",
        "Emerald → Cyan",
        "bg-gradient-to-br from-emerald-500 to-cyan-500",
        "linear-gradient(135deg,#10B981,#06B6D4)",
    ),
    Gradient::preset(
        "indigo-sky",
        "Indigo → Sky",
        "bg-gradient-to-br from-indigo-500 to-sky-500",
        "linear-gradient(135deg,#6366F1,#0EA5E9)",
    ),
];
