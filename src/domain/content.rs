/// Static content table: one descriptor per stage.
///
/// Everything here is compile-time data. The table is indexed by
/// `Stage::index()`, so `content_for` is total and always returns the
/// same `'static` record for the same stage.

use super::stage::Stage;

// ── Shared records ──

/// A run of text that is either plain or highlighted.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Seg {
    Plain(&'static str),
    Hl(&'static str),
}

/// Pictograms referenced by the content. The view maps them to glyphs.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Icon {
    Brain,
    Camera,
    Check,
    Code,
    Database,
    ExternalLink,
    LineChart,
    Link,
    Mail,
    Map,
    PenTool,
    Quote,
    Refrigerator,
    Rocket,
    Settings,
    Shield,
    Smartphone,
    Target,
    User,
    Users,
    Zap,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Fallback {
    /// Drop the asset from the layout.
    Hide,
    /// Show this text where the asset would have been.
    Placeholder(&'static str),
}

/// A decorative image that may or may not exist on disk.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ImageAsset {
    pub file: &'static str,
    pub alt: &'static str,
    pub fallback: Fallback,
}

#[derive(Clone, Copy, Debug)]
pub struct LinkRef {
    pub icon: Icon,
    pub label: &'static str,
    pub url: &'static str,
}

#[derive(Clone, Copy, Debug)]
pub struct Links {
    pub email: &'static str,
    pub linkedin: &'static str,
    #[allow(dead_code)]
    pub blog: &'static str,
    pub app_download: &'static str,
    pub app_retro: &'static str,
}

pub const LINKS: Links = Links {
    email: "hanabikwon@gmail.com",
    linkedin: "https://www.linkedin.com/in/gyeongran-kwon/",
    blog: "https://give-it-a-shot.site/tag/note/",
    app_download: "https://hanabikwon.github.io/recipesoup_app_download/",
    app_retro: "https://give-it-a-shot.site/tag/note/",
};

// ── Per-stage records ──

#[derive(Debug)]
pub struct IntroContent {
    pub tagline: &'static str,
    pub name: &'static str,
    pub pitch: &'static str,
    pub pitch_emphasis: &'static str,
    pub badges: &'static [&'static str],
    pub start_label: &'static str,
}

#[derive(Clone, Copy, Debug)]
pub struct StatData {
    pub subject: &'static str,
    pub value: u8,
    pub full_mark: u8,
}

#[derive(Debug)]
pub struct StatHighlight {
    pub title: &'static str,
    pub detail: &'static str,
    pub caption: &'static str,
    pub result: &'static str,
}

#[derive(Debug)]
pub struct StatsContent {
    pub heading: &'static str,
    pub summary: &'static [Seg],
    pub highlights: &'static [StatHighlight],
    pub chart: &'static [StatData],
}

#[derive(Debug)]
pub struct StoryCard {
    pub title: &'static str,
    pub quote: Option<&'static str>,
    pub body: &'static [&'static str],
    pub footer: Option<&'static str>,
}

#[derive(Debug)]
pub struct OriginContent {
    pub heading: &'static str,
    pub cards: &'static [StoryCard],
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum QuestKind {
    Main,
    Side,
}

#[derive(Debug)]
pub struct QuestItem {
    #[allow(dead_code)]
    pub id: &'static str,
    pub year: &'static str,
    pub title: &'static str,
    pub role: &'static str,
    pub description: &'static [&'static str],
    pub kind: QuestKind,
}

#[derive(Debug)]
pub struct QuestLogContent {
    pub heading: &'static str,
    pub caption: &'static str,
    pub quests: &'static [QuestItem],
}

#[derive(Debug)]
pub struct Metric {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug)]
pub struct SpecialDrop {
    pub icon: Icon,
    pub title: &'static str,
    pub body: &'static [&'static str],
    pub skill: &'static str,
}

#[derive(Debug)]
pub struct RaidContent {
    pub badge: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub objectives: &'static [&'static str],
    pub drops: &'static [SpecialDrop],
    pub metrics: &'static [Metric],
}

#[derive(Debug)]
pub struct Feature {
    pub icon: Icon,
    pub name: &'static str,
    pub detail: &'static str,
}

#[derive(Debug)]
pub struct TacticGroup {
    pub icon: Icon,
    pub title: &'static str,
    pub items: &'static [&'static [Seg]],
}

#[derive(Debug)]
pub struct ShowcaseContent {
    pub badge: &'static str,
    pub title: &'static str,
    pub total_log: &'static str,
    pub pitch: &'static [&'static [Seg]],
    pub features_heading: &'static str,
    pub features: &'static [Feature],
    pub feedback_heading: &'static str,
    pub feedback: &'static [&'static str],
    pub tactics_heading: &'static str,
    pub tactics: &'static [TacticGroup],
    pub links: &'static [LinkRef],
    pub app_name: &'static str,
    pub platforms: &'static str,
    pub release_note: &'static str,
    pub icon: ImageAsset,
    pub screenshot: ImageAsset,
    pub audience_heading: &'static str,
    pub audience: &'static [&'static str],
}

#[derive(Debug)]
pub struct SkillNode {
    pub category: &'static str,
    pub skills: &'static [&'static str],
    pub icon: Icon,
}

#[derive(Debug)]
pub struct SkillTreeContent {
    pub heading: &'static str,
    pub nodes: &'static [SkillNode],
}

#[derive(Debug)]
pub struct AbilityPillar {
    pub title: &'static str,
    pub items: &'static [&'static str],
}

#[derive(Debug)]
pub struct AbilityContent {
    pub heading: &'static str,
    pub pitch: &'static [&'static [Seg]],
    pub pillars: &'static [AbilityPillar],
}

#[derive(Debug)]
pub struct PartyMember {
    pub role: &'static str,
    pub name: &'static str,
    pub quote: &'static [Seg],
}

#[derive(Debug)]
pub struct PartyContent {
    pub heading: &'static str,
    pub members: &'static [PartyMember],
}

#[derive(Debug)]
pub struct ContactContent {
    pub heading: &'static str,
    pub prompt: &'static [Seg],
    pub links: &'static [LinkRef],
    pub credits: &'static [&'static str],
}

#[derive(Debug)]
pub enum StageContent {
    Intro(IntroContent),
    Stats(StatsContent),
    Origin(OriginContent),
    QuestLog(QuestLogContent),
    BossRaid1(RaidContent),
    BossRaid2(ShowcaseContent),
    SkillTree(SkillTreeContent),
    SpecialAbility(AbilityContent),
    PartyReview(PartyContent),
    Contact(ContactContent),
}

impl StageContent {
    /// The stage this descriptor belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            StageContent::Intro(_) => Stage::Intro,
            StageContent::Stats(_) => Stage::Stats,
            StageContent::Origin(_) => Stage::Origin,
            StageContent::QuestLog(_) => Stage::QuestLog,
            StageContent::BossRaid1(_) => Stage::BossRaid1,
            StageContent::BossRaid2(_) => Stage::BossRaid2,
            StageContent::SkillTree(_) => Stage::SkillTree,
            StageContent::SpecialAbility(_) => Stage::SpecialAbility,
            StageContent::PartyReview(_) => Stage::PartyReview,
            StageContent::Contact(_) => Stage::Contact,
        }
    }
}

pub fn content_for(stage: Stage) -> &'static StageContent {
    &CONTENT[stage.index()]
}

// ══════════════════════════════════════════════════════════════
// The table
// ══════════════════════════════════════════════════════════════

pub const STAT_DATA: &[StatData] = &[
    StatData { subject: "0→1 Execution", value: 100, full_mark: 100 },
    StatData { subject: "AI-Native", value: 95, full_mark: 100 },
    StatData { subject: "Go-To-Market", value: 90, full_mark: 100 },
    StatData { subject: "Data Driven", value: 85, full_mark: 100 },
    StatData { subject: "Fast Learning", value: 95, full_mark: 100 },
    StatData { subject: "Startup Exp", value: 90, full_mark: 100 },
];

pub const QUEST_LOG: &[QuestItem] = &[
    QuestItem {
        id: "q1",
        year: "2021.07 - 2023.05",
        title: "스퀘어랩 (Squarelab)",
        role: "콘텐츠팀 / 콘텐츠 매니저",
        kind: QuestKind::Main,
        description: &[
            "에어프레미아 항공사 브랜디드 콘텐츠 기획: CVR 31%, 오가닉 조회수 9,800건",
            "신세계면세점 파트너십 체결 및 장기 제휴 2.5년 관리: 전체 콘텐츠의 40% 핸들링",
            "브랜드 커뮤니케이션 강화 및 콘텐츠 수익화 모델 검증",
        ],
    },
    QuestItem {
        id: "q2",
        year: "2023.06 - 2025.07",
        title: "타이드스퀘어 (Tourvis Select)",
        role: "신사업 TF팀 / 콘텐츠 기획자",
        kind: QuestKind::Main,
        description: &[
            "럭셔리 호텔 예약 서비스 런칭: 일평균 활성 유저(DAU) 181% 증가, 검색량 106% 상승",
            "SNS 채널 운영 및 A/B 테스트: 도달 1.8만, CPA 효율 384% 개선",
            "데이터 기반 의사결정: Looker Studio 대시보드 구축, 제작 리소스 62% 절감(AI 도입)",
            "Python & BigQuery 활용 데이터 파이프라인 이해 및 구현",
        ],
    },
    QuestItem {
        id: "q3",
        year: "2025.07 - Current",
        title: "Class Change: Product Builder",
        role: "1인 빌더",
        kind: QuestKind::Side,
        description: &[
            "개발 경험 없이 1개월 만에 앱 출시: 기획/디자인/개발/배포 완료",
            "AI-Native 워크플로우 적용으로 개발 속도 약 2-3배 가속화",
        ],
    },
];

pub const SKILL_TREE: &[SkillNode] = &[
    SkillNode {
        category: "Product & Design",
        skills: &["Figma", "Framer", "Headless CMS", "UI/UX Planning"],
        icon: Icon::Smartphone,
    },
    SkillNode {
        category: "AI & Engineering",
        skills: &["Cursor/Claude", "Flutter", "OpenAI API", "Supabase", "Vercel"],
        icon: Icon::Brain,
    },
    SkillNode {
        category: "Data & Analytics",
        skills: &["Looker Studio", "GA4", "Amplitude", "SQLD", "ADsP"],
        icon: Icon::Database,
    },
    SkillNode {
        category: "Growth & Marketing",
        skills: &["Meta (Instagram/Threads)", "Naver SS/SA", "SEO", "Copywriting"],
        icon: Icon::LineChart,
    },
];

pub const PARTY_REVIEWS: &[PartyMember] = &[
    PartyMember {
        role: "Team Lead",
        name: "Leader",
        quote: &[
            Seg::Plain("업무와 서비스에 대한 "),
            Seg::Hl("애정과 책임감"),
            Seg::Plain("이 강합니다. 높은 퀄리티를 내고자 최선을 다하므로 결과물에 대한 신뢰가 높습니다. "),
            Seg::Hl("데이터에 대한 관심"),
            Seg::Plain("이 높아 이를 업무에 적용해 빠른 의사결정을 돕고 팀 효율을 높여 줍니다. "),
            Seg::Hl("주체적으로 개선점을 찾아내"),
            Seg::Plain(" 다양한 아이디어를 제안하는 적극적인 팀원입니다."),
        ],
    },
    PartyMember {
        role: "Content Manager",
        name: "Peer",
        quote: &[
            Seg::Plain("과제가 주어지면 "),
            Seg::Hl("끝까지 파고들고 공부하는 모습"),
            Seg::Plain("이 대단합니다. 새로운 기획 및 업무에도 호기심이 많으며 "),
            Seg::Hl("일 욕심"),
            Seg::Plain("도 많습니다. 업무 변화, 툴 변화 등 다양한 상황에 맞추어 업무를 수행합니다. 같은 팀으로서 "),
            Seg::Hl("좋은 자극을 주는 동료"),
            Seg::Plain("입니다."),
        ],
    },
    PartyMember {
        role: "Designer",
        name: "Peer",
        quote: &[
            Seg::Hl("작업자의 아이디어를 적극 수용"),
            Seg::Plain("하며 긍정적으로 해석합니다. 디자인에도 관심이 많은 편이며 "),
            Seg::Hl("커뮤니케이션이 빠르게"),
            Seg::Plain(" 이루어집니다. 기획 배경, 목적, 요청 사항, 진행 일정 등을 담은 기획안을 전달해 "),
            Seg::Hl("커뮤니케이션 오류를 방지"),
            Seg::Plain("해 줍니다."),
        ],
    },
    PartyMember {
        role: "Developer",
        name: "Peer",
        quote: &[
            Seg::Plain("막히면 "),
            Seg::Hl("주도적으로 해결 방법"),
            Seg::Plain("을 찾습니다. "),
            Seg::Hl("학습 속도"),
            Seg::Plain("가 빠르고, 마음먹은 건 바로 실행에 옮기는 "),
            Seg::Hl("실행력"),
            Seg::Plain("이 강점입니다. 개발자와의 소통에서도 "),
            Seg::Hl("논리적이고 명확하게 요구사항을 구체적으로"),
            Seg::Plain(" 전달합니다."),
        ],
    },
];

static CONTENT: [StageContent; Stage::COUNT] = [
    StageContent::Intro(IntroContent {
        tagline: "PRODUCT BUILDER",
        name: "Gyeongran Kwon",
        pitch: "\"스타트업 마케터에서 1인 빌더로,",
        pitch_emphasis: "AI와 함께 0 → 1을 만들어낸 사람\"",
        badges: &["1인 앱 출시", "서비스 런칭 2회", "AI-Native", "스타트업 4년"],
        start_label: "START GAME",
    }),
    StageContent::Stats(StatsContent {
        heading: "Character Stats",
        summary: &[
            Seg::Plain("마케팅 전략("),
            Seg::Hl("Strategy"),
            Seg::Plain(")과 엔지니어링 실행력("),
            Seg::Hl("Execution"),
            Seg::Plain(")을 겸비한 하이브리드 클래스"),
        ],
        highlights: &[
            StatHighlight {
                title: "0 → 1 Execution",
                detail: "서비스 런칭 2회 & DAU 181% 성장",
                caption: "ACHIEVEMENT",
                result: "App Store 1인 출시",
            },
            StatHighlight {
                title: "AI-Native",
                detail: "앱 출시 기간 1개월",
                caption: "SPEED RUN",
                result: "평균 대비 75% 단축",
            },
            StatHighlight {
                title: "Data Driven",
                detail: "A/B 테스트로 광고 효율화",
                caption: "RESULT",
                result: "CPC 81% 개선",
            },
        ],
        chart: STAT_DATA,
    }),
    StageContent::Origin(OriginContent {
        heading: "Origin Story",
        cards: &[
            StoryCard {
                title: "The Marketer's Dilemma",
                quote: Some("\"내가 직접 만들 수 있다면 얼마나 좋을까?\""),
                body: &[
                    "스타트업 마케터 4년차.",
                    "기획서를 쓰고 나면 개발 대기 3개월, 간단한 A/B 테스트도 2주 소요.",
                    "\"리소스가 부족해요\"라는 말 앞에서 아이디어가 멈추는 것이 늘 아쉬웠습니다.",
                ],
                footer: None,
            },
            StoryCard {
                title: "The Awakening",
                quote: None,
                body: &[
                    "토이 프로젝트에 참여하고 싶었으나, 최소 셋업으로 개발자·기획자·디자이너만 찾는 상황.",
                    "한편 퇴근 후에는 Python과 SQL을 공부하며 실무에 적용해보기 시작했습니다.",
                    "그러다 Claude Code와 Cursor AI를 만났습니다.",
                ],
                footer: Some("\"이거면 나도 만들 수 있지 않을까?\""),
            },
            StoryCard {
                title: "Class Change",
                quote: None,
                body: &[
                    "2025년 7월 퇴사 후 실험 시작.",
                    "\"비개발자도 AI와 함께라면 1개월 만에 앱 런칭이 가능했다.\"",
                ],
                footer: Some("Quest Complete: Recipesoup 앱 출시 성공"),
            },
        ],
    }),
    StageContent::QuestLog(QuestLogContent {
        heading: "Quest Log",
        caption: "CAREER TIMELINE",
        quests: QUEST_LOG,
    }),
    StageContent::BossRaid1(RaidContent {
        badge: "BOSS RAID #1",
        title: "Tourvis Select 런칭",
        subtitle: "첫 번째 0 → 1 경험: 신사업 TF 런칭 멤버",
        objectives: &[
            "브랜드 포지셔닝 전략 수립 및 런칭 마케팅",
            "신규 유저 유입 및 초기 트래픽 확보",
        ],
        drops: &[
            SpecialDrop {
                icon: Icon::Rocket,
                title: "Special Drop 1",
                body: &["건당 3시간 → 1시간", "AI 도입, 상세 페이지 제작 효율 극대화"],
                skill: "AI Content Workflow",
            },
            SpecialDrop {
                icon: Icon::Database,
                title: "Special Drop 2",
                body: &["Looker Studio 대시보드 구축", "데이터 기반 의사결정 구조 마련"],
                skill: "Automated Data Pipeline",
            },
        ],
        metrics: &[
            Metric { value: "+181%", label: "DAU Growth" },
            Metric { value: "106%", label: "Search Volume" },
        ],
    }),
    StageContent::BossRaid2(ShowcaseContent {
        badge: "BOSS RAID #2",
        title: "Recipesoup",
        total_log: "Total Log: 192 Hours",
        pitch: &[
            &[Seg::Plain("단순한 요리 기록 앱을 넘어,")],
            &[
                Seg::Hl("'왜 만들었는지'"),
                Seg::Plain("와 "),
                Seg::Hl("'그날의 감정'"),
                Seg::Plain("까지 함께 남기는"),
            ],
            &[Seg::Plain("AI 기반 감성 레시피 다이어리입니다.")],
        ],
        features_heading: "5가지 레시피 입력 방식",
        features: &[
            Feature { icon: Icon::Zap, name: "퀵레시피", detail: "요리명만 입력하면 끝" },
            Feature { icon: Icon::Refrigerator, name: "냉장고 털기", detail: "남은 재료로 추천" },
            Feature { icon: Icon::Link, name: "링크 가져오기", detail: "블로그 레시피 요약" },
            Feature { icon: Icon::Camera, name: "사진 분석", detail: "완성 요리 역추적" },
            Feature { icon: Icon::PenTool, name: "직접 작성", detail: "나만의 비법 기록" },
        ],
        feedback_heading: "Player Feedback (실제 사용자 후기)",
        feedback: &[
            "\"레시피 아카이빙으로도 가능한데 내 감정을 기록하는 일기의 용도로도 적절해서, 그 어떤 목적으로 써도 좋은 앱!\"",
            "\"지루한 삶 속에서 하루를 기록하는 참신한 어플... 퀘스트를 깨듯 토끼굴을 늘려나가는 재미도 좋습니다.\"",
            "\"디자인도 귀엽고 예쁘고 레시피 어플 중에 가장 신박하고 좋은 것 같아요.\"",
        ],
        tactics_heading: "TACTICAL SOLUTION",
        tactics: &[
            TacticGroup {
                icon: Icon::Code,
                title: "Engineering",
                items: &[
                    &[Seg::Hl("Flutter"), Seg::Plain("로 iOS/Android 크로스 플랫폼 앱 개발")],
                    &[
                        Seg::Hl("OpenAI API"),
                        Seg::Plain("를 연동하여 음식 사진 분석 및 OCR 기능 구현"),
                    ],
                ],
            },
            TacticGroup {
                icon: Icon::Settings,
                title: "Strategy & Ops",
                items: &[
                    &[
                        Seg::Plain("리텐션 증대를 위한 "),
                        Seg::Hl("\"토끼굴\""),
                        Seg::Plain(" 게이미피케이션 시스템 설계"),
                    ],
                    &[Seg::Plain("복잡한 앱 스토어 심사(Privacy Manifest) 해결 및 출시")],
                ],
            },
        ],
        links: &[
            LinkRef { icon: Icon::ExternalLink, label: "앱 다운로드", url: LINKS.app_download },
            LinkRef { icon: Icon::Code, label: "개발 회고", url: LINKS.app_retro },
        ],
        app_name: "Recipesoup",
        platforms: "iOS & Android",
        release_note: "Store 출시 완료",
        icon: ImageAsset {
            file: "recipesoup_icon.png",
            alt: "Icon",
            fallback: Fallback::Hide,
        },
        screenshot: ImageAsset {
            file: "recipesoup_screenshot.png",
            alt: "Recipesoup Main",
            fallback: Fallback::Placeholder("Screenshot 1 Placeholder (recipesoup_screenshot.png)"),
        },
        audience_heading: "Class Recommendation",
        audience: &[
            "요리할 때의 감정을 함께 기록하고 싶은 분",
            "AI 도움으로 쉽게 레시피를 정리하고 싶은 분",
            "흩어진 레시피를 한곳에 모아두고 싶은 분",
        ],
    }),
    StageContent::SkillTree(SkillTreeContent {
        heading: "Skill Tree",
        nodes: SKILL_TREE,
    }),
    StageContent::SpecialAbility(AbilityContent {
        heading: "Special Ability: AI-Native",
        pitch: &[
            &[
                Seg::Plain("AI를 단순한 '도구'가 아닌 "),
                Seg::Hl("'확장된 신체'"),
                Seg::Plain("처럼 활용합니다."),
            ],
            &[Seg::Plain("기획, 디자인, 개발, 배포까지 전 과정에서 AI와 협업하여")],
            &[Seg::Hl("1인 팀의 한계를 돌파"), Seg::Plain("합니다.")],
        ],
        pillars: &[
            AbilityPillar { title: "Plan", items: &["아키텍처 구조화", "UX 플로우 설계", "기술 문서 작성"] },
            AbilityPillar { title: "Build", items: &["코드 생성", "UI 구현", "콘텐츠 자산 제작"] },
            AbilityPillar { title: "Research", items: &["기술 조사", "스택 비교", "솔루션 탐색"] },
        ],
    }),
    StageContent::PartyReview(PartyContent {
        heading: "Party Members' Review",
        members: PARTY_REVIEWS,
    }),
    StageContent::Contact(ContactContent {
        heading: "GAME CLEAR!",
        prompt: &[
            Seg::Plain("Product Builder 권경란과 함께 "),
            Seg::Hl("New Game"),
            Seg::Plain("을 시작하시겠습니까?"),
        ],
        links: &[
            LinkRef { icon: Icon::Mail, label: LINKS.email, url: LINKS.email },
            LinkRef { icon: Icon::User, label: "LinkedIn Profile", url: LINKS.linkedin },
            LinkRef { icon: Icon::Smartphone, label: "앱 다운로드 (iOS/Android)", url: LINKS.app_download },
            LinkRef { icon: Icon::PenTool, label: "회고 블로그 보기", url: LINKS.app_retro },
        ],
        credits: &[
            "SYSTEM: Thank you for playing.",
            "CREDITS: Designed with Google AI Studio.",
            "© 2025 Gyeongran Kwon.",
        ],
    }),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retrospective_links_share_one_target() {
        let StageContent::Contact(contact) = content_for(Stage::Contact) else {
            panic!("contact stage has contact content");
        };
        let retro = contact.links.iter().find(|l| l.label == "회고 블로그 보기").unwrap();
        assert_eq!(retro.url, LINKS.app_retro);
    }

    #[test]
    fn table_is_total_and_aligned() {
        for stage in Stage::ALL {
            assert_eq!(content_for(stage).stage(), stage);
        }
    }

    #[test]
    fn lookup_is_stable() {
        for stage in Stage::ALL {
            let a = content_for(stage) as *const StageContent;
            let b = content_for(stage) as *const StageContent;
            assert_eq!(a, b);
        }
    }

    #[test]
    fn stats_never_exceed_full_mark() {
        for s in STAT_DATA {
            assert!(s.value <= s.full_mark, "{}", s.subject);
        }
    }
}
