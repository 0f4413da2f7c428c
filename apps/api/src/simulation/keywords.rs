//! Trigger keywords: incident themes surfaced to the scenario generator.
//!
//! Severe rounds draw from a genre-specific pool; lighter rounds use fixed
//! generic pools. The number of surfaced keywords is itself random (0–3,
//! weighted toward 1) and zero is a valid outcome that lets the model invent
//! the theme.

use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{Difficulty, Genre};

/// Marker sent instead of keywords when none are drawn.
pub const NO_KEYWORDS_MARKER: &str = "지정된 키워드 없음. (창의적으로 생성)";

/// Weights for surfacing 0, 1, 2 or 3 keywords.
pub const KEYWORD_COUNT_WEIGHTS: [u32; 4] = [20, 40, 30, 10];

/// Severe-round themes for genres without their own list.
const GENERIC_SEVERE: &[&str] = &["치명적인 버그", "운영 신뢰도 붕괴"];

const MODERATE_TRIGGERS: &[&str] = &[
    "점검 시간 연장",
    "툴팁/텍스트 오기재",
    "이벤트 보상 미지급",
    "경미한 밸런스 불만",
    "번역 어색함",
];

const LIGHT_TRIGGERS: &[&str] = &[
    "단순 오탈자",
    "공지사항 링크 실수",
    "10분 내외의 접속 불안정",
    "이벤트 날짜 표기 혼동",
];

fn severe_triggers(genre: &Genre) -> &'static [&'static str] {
    match genre {
        Genre::Mmorpg => &[
            "경제 붕괴(골드 인플레)",
            "아이템 복사 버그",
            "랭커/방송인 특혜 논란",
            "공성전 서버 다운",
            "작업장/매크로 방치",
            "강화 확률 조작 의혹",
            "특정 길드 편파 운영",
            "운영자 계정 남용",
        ],
        Genre::CollectibleRpg => &[
            "매출 관련 이슈",
            "확률 조작(천장 미적용)",
            "일러스트 검열/표절(트레이싱)",
            "픽업 일정 통수(이중 픽업)",
            "캐릭터 성능 잠수함 너프",
            "사료(보상) 차별",
            "한정 캐릭터 복각 논란",
        ],
        Genre::Shooter => &[
            "신종 핵(ESP/에임봇) 창궐",
            "넷코드(핑) 이슈",
            "밸런스 붕괴(사기총 방치)",
            "맵 글리치(벽뚫기)",
            "대회 공정성(방플)",
            "티밍(어뷰징)",
            "키보드/마우스 컨버터 논란",
        ],
        Genre::Moba => &[
            "서버 팅김(재접 불가)",
            "치명적 버그(스킬 쿨타임 0초)",
            "트롤/패작/대리 제재 미흡",
            "신챔프 OP 논란",
            "매칭 시스템(다인큐) 불공정",
            "닷지 버그 악용",
            "오브젝트 버그",
        ],
        Genre::SportsRacing => &[
            "라이선스 만료(선수/차량 삭제)",
            "물리 엔진 오류(차량 날아감/선수 끼임)",
            "P2W(현질) 밸런스 붕괴",
            "렉/핑으로 인한 승패 판정 오류",
            "랭킹 어뷰징",
            "카드깡 확률 논란",
        ],
        Genre::PuzzleCasual => &[
            "클리어 불가능한 스테이지(난이도 조절 실패)",
            "과도한 광고 노출(플레이 방해)",
            "타 게임 리소스 도용/표절",
            "데이터 초기화/백섭",
            "소셜 기능(하트 보내기) 오류",
            "랭킹 조작",
        ],
        Genre::SubcultureVisualNovel => &[
            "스토리/대사 사상 검증(혐오 표현)",
            "번역 퀄리티(오역/밈 남발)",
            "성우 논란(계약 해지)",
            "굿즈 퀄리티 불량",
            "운영진의 유저 비하 발언",
            "설정 붕괴",
        ],
        Genre::Custom(_) => GENERIC_SEVERE,
    }
}

/// The keyword pool eligible for a round.
pub fn trigger_pool(genre: &Genre, difficulty: Difficulty) -> &'static [&'static str] {
    match difficulty {
        Difficulty::Severe => severe_triggers(genre),
        Difficulty::Moderate => MODERATE_TRIGGERS,
        Difficulty::Light => LIGHT_TRIGGERS,
    }
}

/// Picks an index with probability proportional to its weight.
/// Returns `None` when the weights are empty or all zero.
pub fn weighted_choice<R: Rng + ?Sized>(weights: &[u32], rng: &mut R) -> Option<usize> {
    WeightedIndex::new(weights).ok().map(|dist| dist.sample(rng))
}

/// Draws how many keywords to surface this round.
pub fn draw_keyword_count<R: Rng + ?Sized>(rng: &mut R) -> usize {
    weighted_choice(&KEYWORD_COUNT_WEIGHTS, rng).unwrap_or(1)
}

/// Samples `min(count, pool.len())` distinct keywords.
pub fn sample_keywords<R: Rng + ?Sized>(
    pool: &[&'static str],
    count: usize,
    rng: &mut R,
) -> Vec<&'static str> {
    pool.choose_multiple(rng, count.min(pool.len()))
        .copied()
        .collect()
}

/// Renders the selection for the prompt; an empty selection becomes the marker.
pub fn format_keywords(selected: &[&str]) -> String {
    if selected.is_empty() {
        NO_KEYWORDS_MARKER.to_string()
    } else {
        selected.join(", ")
    }
}

/// Full keyword step of scenario generation: pool → count → sample → render.
pub fn pick_triggers<R: Rng + ?Sized>(genre: &Genre, difficulty: Difficulty, rng: &mut R) -> String {
    let count = draw_keyword_count(rng);
    let selected = sample_keywords(trigger_pool(genre, difficulty), count, rng);
    format_keywords(&selected)
}
