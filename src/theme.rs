use ratatui::style::Color;
use serde::Deserialize;

/// All semantic color slots for the mdcompare UI.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // General UI
    pub accent: Color,
    pub text: Color,
    pub text_muted: Color,
    pub surface: Color,

    // Line-level diff
    pub diff_add_bg: Color,
    pub diff_del_bg: Color,
    pub diff_add_fg: Color,
    pub diff_del_fg: Color,
    pub diff_context_fg: Color,
    pub collapsed_bg: Color,

    // Character-level highlights inside changed lines
    pub char_add_bg: Color,
    pub char_del_bg: Color,

    // Status indicators
    pub success: Color,
    pub error: Color,
    pub warning: Color,
}

/// Base colors a built-in theme is derived from, as `0xRRGGBB`.
struct Palette {
    name: &'static str,
    accent: u32,
    fg: u32,
    muted: u32,
    surface: u32,
    sunken: u32,
    green: u32,
    red: u32,
    yellow: u32,
    /// Line and character backgrounds: add, del, char add, char del.
    tints: [u32; 4],
}

#[rustfmt::skip]
const PALETTES: &[Palette] = &[
    Palette { name: "one-dark", accent: 0x56b6c2, fg: 0xabb2bf, muted: 0x5c6370, surface: 0x21252b, sunken: 0x181a1f,
        green: 0x98c379, red: 0xe06c75, yellow: 0xe5c07b, tints: [0x1e2b1e, 0x2f1c1e, 0x2f4a2a, 0x5a2a2f] },
    Palette { name: "github-dark", accent: 0x58a6ff, fg: 0xe6edf3, muted: 0x7d8590, surface: 0x161b22, sunken: 0x0d1117,
        green: 0x3fb950, red: 0xf85149, yellow: 0xd29922, tints: [0x122818, 0x321212, 0x235f32, 0x782323] },
    Palette { name: "dracula", accent: 0x8be9fd, fg: 0xf8f8f2, muted: 0x6272a4, surface: 0x282a36, sunken: 0x1e1f28,
        green: 0x50fa7b, red: 0xff5555, yellow: 0xf1fa8c, tints: [0x0f280f, 0x2d0a0a, 0x1e642d, 0x731919] },
    Palette { name: "catppuccin-mocha", accent: 0x89b4fa, fg: 0xcdd6f4, muted: 0x6c7086, surface: 0x1e1e2e, sunken: 0x181825,
        green: 0xa6e3a1, red: 0xf38ba8, yellow: 0xf9e2af, tints: [0x0a2314, 0x2d0a0f, 0x1e5a32, 0x6e1e2d] },
    Palette { name: "tokyo-night", accent: 0x7aa2f7, fg: 0xc0caf5, muted: 0x565f89, surface: 0x1a1b26, sunken: 0x14161e,
        green: 0x9ece6a, red: 0xf7768e, yellow: 0xe0af68, tints: [0x0a230f, 0x2d0a0f, 0x235528, 0x6e1e2d] },
    Palette { name: "solarized-dark", accent: 0x268bd2, fg: 0x93a1a1, muted: 0x586e75, surface: 0x00222b, sunken: 0x001a21,
        green: 0x859900, red: 0xdc322f, yellow: 0xb58900, tints: [0x001e0a, 0x280505, 0x144b19, 0x641414] },
];

pub const THEME_NAMES: &[&str] = &[
    "one-dark",
    "github-dark",
    "dracula",
    "catppuccin-mocha",
    "tokyo-night",
    "solarized-dark",
];

fn rgb(hex: u32) -> Color {
    Color::Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

impl Theme {
    /// Look up a built-in theme; unknown names get the first one.
    pub fn from_name(name: &str) -> Self {
        let palette = PALETTES
            .iter()
            .find(|p| p.name == name)
            .unwrap_or(&PALETTES[0]);
        Self::from_palette(palette)
    }

    fn from_palette(p: &Palette) -> Self {
        let [add_bg, del_bg, char_add_bg, char_del_bg] = p.tints;
        Self {
            name: p.name.to_string(),
            accent: rgb(p.accent),
            text: rgb(p.fg),
            text_muted: rgb(p.muted),
            surface: rgb(p.surface),
            diff_add_bg: rgb(add_bg),
            diff_del_bg: rgb(del_bg),
            diff_add_fg: rgb(p.green),
            diff_del_fg: rgb(p.red),
            diff_context_fg: rgb(p.fg),
            collapsed_bg: rgb(p.sunken),
            char_add_bg: rgb(char_add_bg),
            char_del_bg: rgb(char_del_bg),
            success: rgb(p.green),
            error: rgb(p.red),
            warning: rgb(p.yellow),
        }
    }
}

pub fn next_theme(current: &str) -> &'static str {
    let idx = THEME_NAMES.iter().position(|&n| n == current).unwrap_or(0);
    THEME_NAMES[(idx + 1) % THEME_NAMES.len()]
}

pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
    let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
    let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ThemeOverrides {
    pub accent: Option<String>,
    pub text: Option<String>,
    pub text_muted: Option<String>,
    pub surface: Option<String>,
    pub diff_add_bg: Option<String>,
    pub diff_del_bg: Option<String>,
    pub diff_add_fg: Option<String>,
    pub diff_del_fg: Option<String>,
    pub diff_context_fg: Option<String>,
    pub collapsed_bg: Option<String>,
    pub char_add_bg: Option<String>,
    pub char_del_bg: Option<String>,
    pub success: Option<String>,
    pub error: Option<String>,
    pub warning: Option<String>,
}

pub fn apply_overrides(theme: &mut Theme, overrides: &ThemeOverrides) {
    macro_rules! apply {
        ($field:ident) => {
            if let Some(ref hex) = overrides.$field {
                match parse_hex_color(hex) {
                    Some(c) => theme.$field = c,
                    None => tracing::warn!(
                        field = stringify!($field),
                        value = %hex,
                        "ignoring invalid color override"
                    ),
                }
            }
        };
    }
    apply!(accent);
    apply!(text);
    apply!(text_muted);
    apply!(surface);
    apply!(diff_add_bg);
    apply!(diff_del_bg);
    apply!(diff_add_fg);
    apply!(diff_del_fg);
    apply!(diff_context_fg);
    apply!(collapsed_bg);
    apply!(char_add_bg);
    apply!(char_del_bg);
    apply!(success);
    apply!(error);
    apply!(warning);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ff8000"), Some(Color::Rgb(255, 128, 0)));
        assert_eq!(parse_hex_color("00ff00"), Some(Color::Rgb(0, 255, 0)));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("zzzzzz"), None);
        assert_eq!(parse_hex_color("#ééé"), None);
    }

    #[test]
    fn test_unknown_name_falls_back() {
        assert_eq!(Theme::from_name("no-such-theme").name, "one-dark");
        for name in THEME_NAMES {
            assert_eq!(Theme::from_name(name).name, *name);
        }
    }

    #[test]
    fn test_palette_names_match_theme_list() {
        let names: Vec<&str> = PALETTES.iter().map(|p| p.name).collect();
        assert_eq!(names, THEME_NAMES);
    }

    #[test]
    fn test_rgb_unpacks_channels() {
        assert_eq!(rgb(0x58a6ff), Color::Rgb(88, 166, 255));
    }

    #[test]
    fn test_next_theme_wraps() {
        assert_eq!(next_theme("one-dark"), "github-dark");
        assert_eq!(next_theme("solarized-dark"), "one-dark");
    }

    #[test]
    fn test_overrides_skip_invalid() {
        let mut theme = Theme::from_name("one-dark");
        let overrides = ThemeOverrides {
            accent: Some("#010203".to_string()),
            char_add_bg: Some("green".to_string()),
            ..ThemeOverrides::default()
        };
        apply_overrides(&mut theme, &overrides);
        assert_eq!(theme.accent, Color::Rgb(1, 2, 3));
        assert_eq!(theme.char_add_bg, Color::Rgb(0x2f, 0x4a, 0x2a));
    }
}
