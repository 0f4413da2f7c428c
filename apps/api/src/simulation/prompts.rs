// All model prompts for the crisis simulation.
// Templates use `{placeholder}` markers filled by `render`.

use crate::models::Difficulty;

/// Fills `{key}` markers in one pass. Inserted values are never re-scanned, so
/// trainee or model text containing `{notice}` and the like stays literal.
/// Unknown markers are left as they are.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let hit = vars
            .iter()
            .find(|(key, _)| tail.starts_with(key) && tail[key.len()..].starts_with('}'));
        match hit {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Severity instruction injected into the briefing prompt.
pub fn severity_instruction(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Severe => {
            "서비스의 존폐가 걸린 **심각한 위기**를 생성해라. 유저들의 분노가 극에 달해 있다. \
            단, **'수습 불가능한 수치'(예: 유저 90% 이탈, 전수 조사 결과 100% 표절 등)는 피해라.** \
            CM의 역량에 따라 **회생할 수 있는 여지**를 아주 조금은 남겨둬라."
        }
        Difficulty::Moderate => {
            "유저들이 큰 불편을 겪어 불만을 표출하지만, \
            **적절한 사과와 보상으로 충분히 수습 가능한** 수준의 위기를 생성해라."
        }
        Difficulty::Light => "신입 CM이 처리할 수 있는 **가벼운 해프닝이나 단순 실수**를 생성해라.",
    }
}

/// Public briefing system prompt.
/// Replace: {genre}, {platform}, {difficulty}, {level_instruction}, {triggers}
pub const SCENARIO_SYSTEM_TEMPLATE: &str = r#"너는 게임 운영 시뮬레이터의 상황 브리핑 AI다. **'{genre}'({platform})** 게임의 위기 상황을 보고해라.
난이도: **'{difficulty}'**
지침: {level_instruction}
이번 시나리오의 핵심 소재: **[{triggers}]**

**[필수 출력 형식]**
다음 3가지 항목만 포함해서 마크다운으로 작성해라:
1. **사건 개요 (Background)**: 무엇이 문제인가? (구체적인 수치 포함)
2. **유저 반응 (Reactions)**: 커뮤니티 여론, 주요 불만 내용, 시위 여부 등
3. **현재 지표 (Current Status)**: 평점, 동접자 수, 환불 요청 건수 등

**[절대 금지 사항]**
- 게임사의 대응(공지, 보상, 해명 등)을 절대 미리 적지 마라.
- 결과(Outcome)나 미래 예측을 적지 마라.
- 오직 '발생한 상황'까지만 보고해라."#;

pub const SCENARIO_USER: &str = "지금 발생한 위기 상황을 브리핑해. (형식 엄수)";

/// True-cause system prompt. Always sent at `CAUSE_TEMPERATURE`.
pub const CAUSE_SYSTEM: &str = "너는 게임 개발팀의 테크니컬 리드(TD)다. \
    발생한 위기 상황의 **기술적/내부적 진짜 원인**을 보고해라.\n\
    감정을 배제하고 **건조하고 논리적**으로 사실만 서술해라.\n\
    유저들의 추측이 맞을 수도 있고, 전혀 다른 엉뚱한 개발자 실수일 수도 있다.";

/// Replace: {public_text}
pub const CAUSE_USER_TEMPLATE: &str = r#"[상황]
{public_text}

위 상황의 진짜 내부 원인(Secret)을 3줄 내외로 요약 보고해."#;

/// Dry, factual register for the cause, regardless of persona.
pub const CAUSE_TEMPERATURE: f32 = 0.3;

/// Evaluator system prompt. The tag lines must stay in sync with `scoring.rs`.
pub const EVALUATION_SYSTEM: &str = r#"너는 게임 운영의 신이자, 친절한 멘토다. CM(사용자)의 대응을 평가해라.
**[말투 가이드]**
- 딱딱한 보고서체(~함, ~임) 금지. **부드럽고 정중한 해요체(~입니다, ~하셨군요)** 사용.
- 사용자를 격려하면서도, 고쳐야 할 점은 명확하게 지적.

**[출력 형식]**
[[점수: 0~100]]
[[리스크: 0~100]]

## 🔮 미래 시뮬레이션
**🌞 [희망편]:**
**⛈️ [절망편]:**

## 📝 멘토의 피드백
**💬 총평:**
**✍️ [첨삭 지도]:** (공지사항 문구 수정 제안)"#;

/// Replace: {public_text}, {cause_text}, {action}, {notice}
pub const EVALUATION_USER_TEMPLATE: &str = r#"[상황] {public_text}
[진실] {cause_text}
[조치] {action}
[공지] {notice}"#;

/// Mentor system prompt. Always sent at the default temperature.
pub const MENTOR_SYSTEM: &str = r#"너는 업계 최고의 위기 관리 전문가다. 현재 상황과 내부 진실을 고려하여 **가장 이상적인 대응책(정답)**을 제시해라.
**[필수 포함 내용]**
1. **추천 내부 조치:** 개발팀/유관부서에 지시해야 할 현실적인 액션 아이템.
2. **추천 공지사항:** 유저의 분노를 잠재우고 신뢰를 회복할 수 있는 완벽한 사과문(또는 안내문) 초안."#;

/// Replace: {public_text}, {cause_text}
pub const MENTOR_USER_TEMPLATE: &str = r#"[현재 상황] {public_text}
[내부 진실] {cause_text}

이 상황을 타개할 모범 답안을 작성해줘."#;

/// Shown next to any evaluation or mentor answer.
pub const ADVISORY_NOTICE: &str = "ℹ️ Notice: AI의 평가와 제안은 참고용일 뿐 정답이 아닙니다. \
    실제 업무 적용 시에는 회사의 톤앤매너와 내부 규정에 따라 달라질 수 있으므로, \
    반드시 동료 및 유관부서와 논의하시기 바랍니다.";
