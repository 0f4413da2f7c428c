//! Test doubles shared by the unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm_client::{Credential, Provider, TextGenerator};

/// One call observed by `ScriptedGenerator`.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub provider: Provider,
    pub api_key: String,
    pub system: String,
    pub user: String,
    pub temperature: f32,
}

/// Gateway stub: replies from a script in order, then repeats `fallback`.
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<String>>,
    fallback: String,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedGenerator {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            fallback: "스크립트 응답 없음".to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        credential: &Credential,
        system: &str,
        user: &str,
        temperature: f32,
    ) -> String {
        self.calls.lock().unwrap().push(RecordedCall {
            provider: credential.provider,
            api_key: credential.api_key.clone(),
            system: system.to_string(),
            user: user.to_string(),
            temperature,
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

pub fn test_credential() -> Credential {
    Credential::new(Provider::Mistral, "test-key")
}

pub const PUBLIC_BRIEFING: &str = "```markdown\n\
1. **사건 개요 (Background)**: 랭크 게임 도중 서버 팅김이 3시간째 이어지고 있다. 재접속 불가 사례 12,000건.\n\
2. **유저 반응 (Reactions)**: 커뮤니티에 '패배 기록 삭제하라'는 글이 1위. 스트리머 다수가 방송 중단.\n\
3. **현재 지표 (Current Status)**: 스토어 평점 4.1 → 2.3, 동접자 38% 감소.\n\
```";

pub const CAUSE_REPORT: &str = "매칭 서버 세션 캐시의 TTL 설정이 배포 과정에서 0으로 덮어써졌다.\n\
재접속 시 세션 복구가 불가능해졌다.\n\
롤백 스크립트는 존재하지만 아직 실행되지 않았다.";

pub const SCORED_FEEDBACK: &str = "[[점수: 72]] [[리스크: 40]]\n\
## 🔮 미래 시뮬레이션\n\
**🌞 [희망편]:** 보상 공지 후 여론이 빠르게 진정됩니다.\n\
**⛈️ [절망편]:** 원인 설명이 부족하면 재발 시 신뢰가 무너집니다.\n\
## 📝 멘토의 피드백\n\
**💬 총평:** 신속한 대응이 돋보였어요.\n\
**✍️ [첨삭 지도]:** '불편을 드려'보다 구체적인 피해 범위를 적어 주세요.";
