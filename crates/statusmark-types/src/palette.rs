// ABOUTME: Compiled-in choices offered by the pickers
// ABOUTME: Badge text colors, status bar colors and emoji glyphs

/// One selectable palette choice. `value` is a hex color or an emoji glyph;
/// an empty value stands for "no override".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteEntry {
    pub value: &'static str,
    pub display_name: &'static str,
}

const fn entry(value: &'static str, display_name: &'static str) -> PaletteEntry {
    PaletteEntry {
        value,
        display_name,
    }
}

pub const BADGE_COLOR_PALETTE: &[PaletteEntry] = &[
    entry("#FFFFFF", "Pure White"),
    entry("#000000", "Pure Black"),
    entry("#F97316", "Sunset Orange"),
    entry("#EF4444", "Crimson"),
    entry("#14B8A6", "Tropical Teal"),
    entry("#0EA5E9", "Sky Blue"),
    entry("#8B5CF6", "Amethyst"),
    entry("#F472B6", "Rose Pink"),
    entry("#22D3EE", "Electric Cyan"),
    entry("#FACC15", "Golden Glow"),
    entry("", "Theme Default"),
];

pub const STATUS_BAR_COLOR_PALETTE: &[PaletteEntry] = &[
    entry("#1E3A8A", "Cobalt Blue"),
    entry("#059669", "Emerald Mist"),
    entry("#0EA5E9", "Azure Pulse"),
    entry("#F59E0B", "Amber Flame"),
    entry("#E11D48", "Rose Inferno"),
    entry("#7C3AED", "Violet Storm"),
    entry("#0F766E", "Teal Abyss"),
    entry("#475569", "Slate Titanium"),
    entry("", "Theme Default"),
];

pub const EMOJI_PALETTE: &[PaletteEntry] = &[
    entry("🚀", "Rocket"),
    entry("❤️", "Heart"),
    entry("✨", "Sparkles"),
    entry("🔥", "Fire"),
    entry("🌟", "Glowing Star"),
    entry("💎", "Gem"),
    entry("🎯", "Bullseye"),
    entry("🧠", "Brain"),
    entry("🛠️", "Tools"),
    entry("🧪", "Test Tube"),
    entry("📦", "Package"),
    entry("📁", "Folder"),
    entry("✅", "Check Mark"),
    entry("☕", "Coffee"),
    entry("🌈", "Rainbow"),
    entry("🎉", "Party"),
    entry("", "Empty"),
];
