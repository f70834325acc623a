pub const LIMITLESS_CDN_BASE: &str =
    "https://limitlesstcg.nyc3.cdn.digitaloceanspaces.com/tpci";
pub const LIMITLESS_DECK_BASE: &str = "https://play.limitlesstcg.com/deck";

/// Upstream game code for the tournaments endpoint.
pub const UPSTREAM_GAME_CODE: &str = "PTCG";

pub const DEFAULT_SET_COLOR: &str = "#808080";

/// Display color per set code, for visual identification when card images
/// fail to load.
pub fn set_color(card_set: &str) -> &'static str {
    match card_set.to_uppercase().as_str() {
        // Scarlet & Violet era
        "TWM" => "#8B4789", // Twilight Masquerade
        "PRE" => "#22B14C", // Primal Energy
        "OBF" => "#FF8C00", // Obsidian Flames
        "PAL" => "#1E90FF", // Paldea Evolved
        "SVI" => "#DC143C", // Scarlet & Violet
        "MEG" => "#FFD700", // Mega Evolution
        "TEF" => "#20B2AA", // Temporal Forces
        "ASC" => "#9370DB", // Ancient Roar
        "DRI" => "#FF6347", // Destined Rivals
        "MEW" => "#00CED1", // 151
        "PAF" => "#FF69B4", // Paldean Fates
        "PFL" => "#8B7355", // Paldean Fates promos
        "SCR" => "#4169E1", // Stellar Crown
        "SLV" => "#C0C0C0", // Silver Tempest
        "SHF" => "#FF4500", // Shining Fates
        "SVP" => "#DA70D6", // SV promos
        _ => DEFAULT_SET_COLOR,
    }
}
