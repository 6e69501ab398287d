// Key zoning and the built-in board table. Layout generation for the full
// range of physical standards lives outside the core; the simulation only
// needs key identity, span, and row, plus the zone classification that picks
// the keycap defaults.

use serde::{Deserialize, Serialize};

use crate::color::RenderTone;

/// Named key grouping sharing keycap defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeycapZone {
    Alpha,
    Modifier,
    Function,
    Nav,
    Numpad,
    Space,
}

/// One key slot in a board table, in layout units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyDefinition {
    pub id: String,
    pub width: f32,
    pub depth: f32,
    pub row: u32,
    pub col: f32,
    #[serde(default)]
    pub tone: RenderTone,
}

impl KeyDefinition {
    fn new(id: &str, width: f32, row: u32, col: f32) -> Self {
        Self {
            id: id.to_string(),
            width,
            depth: 1.0,
            row,
            col,
            tone: RenderTone::Default,
        }
    }

    fn toned(id: &str, width: f32, row: u32, col: f32, tone: RenderTone) -> Self {
        Self {
            tone,
            ..Self::new(id, width, row, col)
        }
    }
}

/// Per-key input to the derivation pipeline, resolved once at mount time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyContext {
    pub id: String,
    pub zone: KeycapZone,
    pub row: u32,
    /// Span in layout units.
    pub width: f32,
    pub depth: f32,
    #[serde(default)]
    pub tone: RenderTone,
}

impl KeyContext {
    pub fn new(id: &str, row: u32, width: f32, depth: f32) -> Self {
        Self {
            id: id.to_string(),
            zone: zone_for_key(id),
            row,
            width,
            depth,
            tone: RenderTone::Default,
        }
    }

    pub fn from_definition(def: &KeyDefinition) -> Self {
        Self {
            tone: def.tone,
            ..Self::new(&def.id, def.row, def.width, def.depth)
        }
    }
}

/// Classifies a key id into its zone. Ids are matched case-insensitively;
/// unknown ids land in the alpha zone.
pub fn zone_for_key(key_id: &str) -> KeycapZone {
    let id = key_id.to_ascii_lowercase();
    if id.is_empty() {
        return KeycapZone::Alpha;
    }
    if id.starts_with("num") {
        return KeycapZone::Numpad;
    }
    if id == "space" || id.starts_with("space-") {
        return KeycapZone::Space;
    }
    if let Some(rest) = id.strip_prefix('f') {
        if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) {
            return KeycapZone::Function;
        }
    }
    if matches!(
        id.as_str(),
        "up" | "down" | "left" | "right" | "home" | "end" | "ins" | "del" | "pgup" | "pgdn"
    ) {
        return KeycapZone::Nav;
    }
    if id.contains("shift")
        || id.contains("ctrl")
        || id.contains("alt")
        || matches!(id.as_str(), "tab" | "caps" | "fn" | "menu")
    {
        return KeycapZone::Modifier;
    }
    KeycapZone::Alpha
}

/// Standard ansi 60% board, 15 units wide over five rows. The headless
/// session and the diagnostics sample both mount from this table.
pub fn sixty_percent_board() -> Vec<KeyDefinition> {
    let mut keys = Vec::with_capacity(61);

    keys.push(KeyDefinition::new("grave", 1.0, 0, 0.0));
    for (i, ch) in "1234567890".chars().enumerate() {
        keys.push(KeyDefinition::new(&ch.to_string(), 1.0, 0, i as f32 + 1.0));
    }
    keys.push(KeyDefinition::new("minus", 1.0, 0, 11.0));
    keys.push(KeyDefinition::new("equal", 1.0, 0, 12.0));
    keys.push(KeyDefinition::new("backspace", 2.0, 0, 13.0));

    keys.push(KeyDefinition::toned("tab", 1.5, 1, 0.0, RenderTone::Modifier));
    for (i, ch) in "qwertyuiop".chars().enumerate() {
        keys.push(KeyDefinition::new(&ch.to_string(), 1.0, 1, i as f32 + 1.5));
    }
    keys.push(KeyDefinition::new("bracket-l", 1.0, 1, 11.5));
    keys.push(KeyDefinition::new("bracket-r", 1.0, 1, 12.5));
    keys.push(KeyDefinition::new("backslash", 1.5, 1, 13.5));

    keys.push(KeyDefinition::toned("caps", 1.75, 2, 0.0, RenderTone::Modifier));
    for (i, ch) in "asdfghjkl".chars().enumerate() {
        keys.push(KeyDefinition::new(&ch.to_string(), 1.0, 2, i as f32 + 1.75));
    }
    keys.push(KeyDefinition::new("semicolon", 1.0, 2, 10.75));
    keys.push(KeyDefinition::new("quote", 1.0, 2, 11.75));
    keys.push(KeyDefinition::toned("enter", 2.25, 2, 12.75, RenderTone::Accent));

    keys.push(KeyDefinition::toned("lshift", 2.25, 3, 0.0, RenderTone::Modifier));
    for (i, ch) in "zxcvbnm".chars().enumerate() {
        keys.push(KeyDefinition::new(&ch.to_string(), 1.0, 3, i as f32 + 2.25));
    }
    keys.push(KeyDefinition::new("comma", 1.0, 3, 9.25));
    keys.push(KeyDefinition::new("period", 1.0, 3, 10.25));
    keys.push(KeyDefinition::new("slash", 1.0, 3, 11.25));
    keys.push(KeyDefinition::toned("rshift", 2.75, 3, 12.25, RenderTone::Modifier));

    keys.push(KeyDefinition::toned("lctrl", 1.25, 4, 0.0, RenderTone::Modifier));
    keys.push(KeyDefinition::toned("lwin", 1.25, 4, 1.25, RenderTone::Modifier));
    keys.push(KeyDefinition::toned("lalt", 1.25, 4, 2.5, RenderTone::Modifier));
    keys.push(KeyDefinition::toned("space", 6.25, 4, 3.75, RenderTone::Accent));
    keys.push(KeyDefinition::toned("ralt", 1.25, 4, 10.0, RenderTone::Modifier));
    keys.push(KeyDefinition::toned("rwin", 1.25, 4, 11.25, RenderTone::Modifier));
    keys.push(KeyDefinition::toned("menu", 1.25, 4, 12.5, RenderTone::Modifier));
    keys.push(KeyDefinition::toned("rctrl", 1.25, 4, 13.75, RenderTone::Modifier));

    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_rules_cover_the_cluster_names() {
        assert_eq!(zone_for_key("num7"), KeycapZone::Numpad);
        assert_eq!(zone_for_key("space"), KeycapZone::Space);
        assert_eq!(zone_for_key("space-left"), KeycapZone::Space);
        assert_eq!(zone_for_key("f12"), KeycapZone::Function);
        assert_eq!(zone_for_key("pgdn"), KeycapZone::Nav);
        assert_eq!(zone_for_key("lshift"), KeycapZone::Modifier);
        assert_eq!(zone_for_key("rctrl"), KeycapZone::Modifier);
        assert_eq!(zone_for_key("caps"), KeycapZone::Modifier);
        assert_eq!(zone_for_key("q"), KeycapZone::Alpha);
    }

    #[test]
    fn function_zone_requires_a_pure_number_suffix() {
        assert_eq!(zone_for_key("f1"), KeycapZone::Function);
        assert_eq!(zone_for_key("f"), KeycapZone::Alpha);
        assert_eq!(zone_for_key("fx2"), KeycapZone::Alpha);
    }

    #[test]
    fn unknown_and_empty_ids_fall_back_to_alpha() {
        assert_eq!(zone_for_key(""), KeycapZone::Alpha);
        assert_eq!(zone_for_key("artisan-skull"), KeycapZone::Alpha);
        assert_eq!(zone_for_key("lwin"), KeycapZone::Alpha);
    }

    #[test]
    fn sixty_percent_board_is_complete() {
        let keys = sixty_percent_board();
        assert_eq!(keys.len(), 61);

        let space = keys.iter().find(|k| k.id == "space").unwrap();
        assert_eq!(space.width, 6.25);
        assert_eq!(space.row, 4);

        let ids: std::collections::HashSet<_> = keys.iter().map(|k| k.id.as_str()).collect();
        assert_eq!(ids.len(), keys.len(), "key ids must be unique");
    }
}
