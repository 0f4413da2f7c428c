use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Game genre of a training round.
///
/// Known genres carry their own severe-incident keyword list; any other label is
/// kept verbatim as `Custom` and falls back to generic themes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Genre {
    Mmorpg,
    CollectibleRpg,
    Shooter,
    Moba,
    SportsRacing,
    PuzzleCasual,
    SubcultureVisualNovel,
    Custom(String),
}

impl Genre {
    pub const CATALOG: &'static [Genre] = &[
        Genre::Mmorpg,
        Genre::CollectibleRpg,
        Genre::Shooter,
        Genre::Moba,
        Genre::SportsRacing,
        Genre::PuzzleCasual,
        Genre::SubcultureVisualNovel,
    ];

    pub fn label(&self) -> &str {
        match self {
            Genre::Mmorpg => "MMORPG",
            Genre::CollectibleRpg => "수집형 RPG (가챠)",
            Genre::Shooter => "FPS/TPS (슈팅)",
            Genre::Moba => "MOBA (AOS)",
            Genre::SportsRacing => "스포츠/레이싱",
            Genre::PuzzleCasual => "퍼즐/캐주얼",
            Genre::SubcultureVisualNovel => "서브컬처 비주얼 노벨",
            Genre::Custom(label) => label,
        }
    }
}

impl From<String> for Genre {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if let Some(known) = Genre::CATALOG.iter().find(|g| g.label() == trimmed) {
            return known.clone();
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "mmorpg" => Genre::Mmorpg,
            "gacha" | "collectible_rpg" => Genre::CollectibleRpg,
            "fps" | "tps" | "shooter" => Genre::Shooter,
            "moba" | "aos" => Genre::Moba,
            "sports" | "racing" | "sports_racing" => Genre::SportsRacing,
            "puzzle" | "casual" | "puzzle_casual" => Genre::PuzzleCasual,
            "visual_novel" | "subculture" => Genre::SubcultureVisualNovel,
            _ => Genre::Custom(trimmed.to_string()),
        }
    }
}

impl From<Genre> for String {
    fn from(value: Genre) -> Self {
        match value {
            Genre::Custom(label) => label,
            known => known.label().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    #[serde(alias = "모바일")]
    Mobile,
    #[serde(alias = "PC")]
    Pc,
    #[serde(alias = "멀티플랫폼")]
    MultiPlatform,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Mobile, Platform::Pc, Platform::MultiPlatform];

    pub fn label(self) -> &'static str {
        match self {
            Platform::Mobile => "모바일",
            Platform::Pc => "PC",
            Platform::MultiPlatform => "멀티플랫폼",
        }
    }
}

/// Training difficulty. Drives the severity instruction and the trigger pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    #[serde(alias = "easy", alias = "쉬움 (Easy)")]
    Light,
    #[serde(alias = "normal", alias = "보통 (Normal)")]
    Moderate,
    #[serde(alias = "hard", alias = "어려움 (Hard)")]
    Severe,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Light, Difficulty::Moderate, Difficulty::Severe];

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Light => "쉬움 (Easy)",
            Difficulty::Moderate => "보통 (Normal)",
            Difficulty::Severe => "어려움 (Hard)",
        }
    }
}

/// Temperature preset for scenario generation and evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    Conservative,
    #[default]
    Balanced,
    Creative,
}

impl Persona {
    pub const ALL: [Persona; 3] = [Persona::Conservative, Persona::Balanced, Persona::Creative];

    pub fn temperature(self) -> f32 {
        match self {
            Persona::Conservative => 0.3,
            Persona::Balanced => 0.5,
            Persona::Creative => 0.7,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Persona::Conservative => "👮‍♂️ 논리적/보수적 (FM)",
            Persona::Balanced => "⚖️ 밸런스형 (추천)",
            Persona::Creative => "🎭 창의적/드라마틱",
        }
    }
}

/// The active incident of a training round. Immutable once created.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioRecord {
    pub public_text: String,
    pub cause_text: String,
    pub genre: Genre,
    pub platform: Platform,
    pub difficulty: Difficulty,
    pub created_at: DateTime<Utc>,
}
