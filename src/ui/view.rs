/// View: turns a stage's content descriptor into styled, wrapped lines.
///
/// Pure layout. No terminal access and no colours here; `Tone` names the
/// role of a run of text and the renderer picks the colour.
///
/// Widths are terminal columns. Hangul and other East Asian wide
/// characters take two.

use crate::domain::content::{
    AbilityContent, ContactContent, Fallback, Icon, ImageAsset, IntroContent, OriginContent,
    PartyContent, QuestKind, QuestLogContent, RaidContent, Seg, ShowcaseContent, SkillTreeContent,
    StageContent, StatsContent,
};
use crate::sim::nav::NavCommand;
use crate::ui::assets::{AssetCatalog, AssetStatus};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tone {
    Title,
    Heading,
    Accent,
    Body,
    Muted,
    Emphasis,
    Highlight,
    Badge,
    Success,
    Link,
    Placeholder,
    Button,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Span {
    pub text: String,
    pub tone: Tone,
}

impl Span {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Span { text: text.into(), tone }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Align {
    Left,
    Center,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Line {
    pub spans: Vec<Span>,
    pub align: Align,
    /// Clicking this line runs the command.
    pub action: Option<NavCommand>,
}

impl Line {
    pub fn blank() -> Self {
        Line { spans: Vec::new(), align: Align::Left, action: None }
    }

    pub fn width(&self) -> usize {
        self.spans.iter().map(|s| str_width(&s.text)).sum()
    }

    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

// ── Display width ──

/// Columns a char occupies. Covers the wide ranges this content uses
/// (Hangul, CJK, fullwidth forms); everything else is one column.
pub fn char_width(c: char) -> usize {
    let cp = c as u32;
    let wide = matches!(cp,
        0x1100..=0x115F        // Hangul Jamo
        | 0x2E80..=0x303E      // CJK radicals, punctuation
        | 0x3041..=0x33FF      // kana, CJK symbols
        | 0x3400..=0x4DBF      // CJK ext A
        | 0x4E00..=0x9FFF      // CJK unified
        | 0xA960..=0xA97F      // Hangul Jamo ext A
        | 0xAC00..=0xD7A3      // Hangul syllables
        | 0xF900..=0xFAFF      // CJK compatibility
        | 0xFE30..=0xFE4F      // CJK compatibility forms
        | 0xFF00..=0xFF60      // fullwidth forms
        | 0xFFE0..=0xFFE6
        | 0x1F300..=0x1F64F    // pictographs, emoticons
        | 0x1F900..=0x1F9FF
        | 0x20000..=0x3FFFD
    );
    if wide { 2 } else { 1 }
}

pub fn str_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

// ── Wrapping ──

fn push_text(line: &mut Vec<Span>, text: &str, tone: Tone) {
    match line.last_mut() {
        Some(last) if last.tone == tone => last.text.push_str(text),
        _ => line.push(Span::new(text, tone)),
    }
}

/// Greedy word wrap over styled spans. Words wider than `width` are split.
pub fn wrap(spans: &[Span], width: usize) -> Vec<Vec<Span>> {
    let width = width.max(1);
    let mut lines: Vec<Vec<Span>> = vec![Vec::new()];
    let mut col = 0;
    let mut pending_space = false;

    for span in spans {
        for (i, word) in span.text.split(' ').enumerate() {
            if i > 0 {
                pending_space = true;
            }
            if word.is_empty() {
                continue;
            }
            let gap = usize::from(pending_space && col > 0);
            if col > 0 && col + gap + str_width(word) > width {
                lines.push(Vec::new());
                col = 0;
            }
            if pending_space && col > 0 {
                if let Some(line) = lines.last_mut() {
                    push_text(line, " ", span.tone);
                }
                col += 1;
            }
            pending_space = false;

            for ch in word.chars() {
                let cw = char_width(ch);
                if col > 0 && col + cw > width {
                    lines.push(Vec::new());
                    col = 0;
                }
                if let Some(line) = lines.last_mut() {
                    let mut buf = [0u8; 4];
                    push_text(line, ch.encode_utf8(&mut buf), span.tone);
                }
                col += cw;
            }
        }
    }
    lines
}

fn segs(parts: &[Seg], plain: Tone) -> Vec<Span> {
    parts
        .iter()
        .map(|s| match s {
            Seg::Plain(t) => Span::new(*t, plain),
            Seg::Hl(t) => Span::new(*t, Tone::Highlight),
        })
        .collect()
}

pub fn icon_glyph(icon: Icon) -> char {
    match icon {
        Icon::Brain => '◉',
        Icon::Camera => '◎',
        Icon::Check => '✔',
        Icon::Code => '⌘',
        Icon::Database => '▦',
        Icon::ExternalLink => '↗',
        Icon::LineChart => '↗',
        Icon::Link => '∞',
        Icon::Mail => '✉',
        Icon::Map => '▤',
        Icon::PenTool => '✎',
        Icon::Quote => '❝',
        Icon::Refrigerator => '▥',
        Icon::Rocket => '➶',
        Icon::Settings => '⚙',
        Icon::Shield => '◈',
        Icon::Smartphone => '▯',
        Icon::Target => '◎',
        Icon::User => '◍',
        Icon::Users => '◍',
        Icon::Zap => 'ϟ',
    }
}

// ── Page builder ──

struct Page {
    width: usize,
    lines: Vec<Line>,
}

impl Page {
    fn new(width: usize) -> Self {
        Page { width: width.max(8), lines: Vec::with_capacity(48) }
    }

    fn blank(&mut self) {
        self.lines.push(Line::blank());
    }

    fn push(&mut self, spans: Vec<Span>, align: Align) {
        for wrapped in wrap(&spans, self.width) {
            self.lines.push(Line { spans: wrapped, align, action: None });
        }
    }

    fn text(&mut self, text: &str, tone: Tone, align: Align) {
        self.push(vec![Span::new(text, tone)], align);
    }

    fn heading(&mut self, icon: Option<Icon>, text: &str) {
        let mut spans = Vec::with_capacity(2);
        if let Some(i) = icon {
            spans.push(Span::new(format!("{} ", icon_glyph(i)), Tone::Accent));
        }
        spans.push(Span::new(text, Tone::Title));
        self.push(spans, Align::Left);
        self.blank();
    }

    /// Marker on the first line, hanging indent after it.
    fn bullet(&mut self, marker: &str, marker_tone: Tone, body: Vec<Span>, indent: usize) {
        let lead = indent + str_width(marker) + 1;
        let wrapped = wrap(&body, self.width.saturating_sub(lead));
        for (i, mut spans) in wrapped.into_iter().enumerate() {
            let prefix = if i == 0 {
                Span::new(format!("{}{} ", " ".repeat(indent), marker), marker_tone)
            } else {
                Span::new(" ".repeat(lead), Tone::Body)
            };
            spans.insert(0, prefix);
            self.lines.push(Line { spans, align: Align::Left, action: None });
        }
    }

    fn badges(&mut self, items: &[&str], align: Align) {
        let mut spans = Vec::with_capacity(items.len() * 2);
        for (i, b) in items.iter().enumerate() {
            if i > 0 {
                spans.push(Span::new(" ", Tone::Body));
            }
            // non-breaking inside a badge: wrap() splits on ' ' only
            spans.push(Span::new(format!("[{}]", b.replace(' ', "\u{00A0}")), Tone::Badge));
        }
        self.push(spans, align);
    }

    fn button(&mut self, label: &str, action: NavCommand) {
        self.lines.push(Line {
            spans: vec![Span::new(format!("▶  {label}  ◀"), Tone::Button)],
            align: Align::Center,
            action: Some(action),
        });
    }

    fn image(&mut self, asset: &ImageAsset, assets: &AssetCatalog, label: &str) {
        match (assets.status(asset), asset.fallback) {
            (AssetStatus::Available(path), _) => {
                self.push(
                    vec![
                        Span::new(format!("▣ {label} ({}) ", asset.alt), Tone::Muted),
                        Span::new(path.display().to_string(), Tone::Link),
                    ],
                    Align::Left,
                );
            }
            (AssetStatus::Missing, Fallback::Hide) => {}
            (AssetStatus::Missing, Fallback::Placeholder(text)) => {
                self.text(text, Tone::Placeholder, Align::Left);
            }
        }
    }
}

// ── Per-stage layouts ──

pub fn compose(content: &StageContent, assets: &AssetCatalog, width: usize) -> Vec<Line> {
    let mut page = Page::new(width);
    match content {
        StageContent::Intro(c) => intro(&mut page, c),
        StageContent::Stats(c) => stats(&mut page, c),
        StageContent::Origin(c) => origin(&mut page, c),
        StageContent::QuestLog(c) => quest_log(&mut page, c),
        StageContent::BossRaid1(c) => raid(&mut page, c),
        StageContent::BossRaid2(c) => showcase(&mut page, c, assets),
        StageContent::SkillTree(c) => skill_tree(&mut page, c),
        StageContent::SpecialAbility(c) => ability(&mut page, c),
        StageContent::PartyReview(c) => party(&mut page, c),
        StageContent::Contact(c) => contact(&mut page, c),
    }
    page.lines
}

fn letter_spaced(s: &str) -> String {
    s.chars().map(|c| c.to_string()).collect::<Vec<_>>().join("\u{00A0}")
}

fn intro(p: &mut Page, c: &IntroContent) {
    p.text(&letter_spaced(c.tagline), Tone::Accent, Align::Center);
    p.blank();
    p.text(c.name, Tone::Title, Align::Center);
    p.blank();
    p.text(c.pitch, Tone::Body, Align::Center);
    p.text(c.pitch_emphasis, Tone::Emphasis, Align::Center);
    p.blank();
    p.badges(c.badges, Align::Center);
    p.blank();
    p.blank();
    p.button(c.start_label, NavCommand::Advance);
}

fn stats(p: &mut Page, c: &StatsContent) {
    p.heading(Some(Icon::Shield), c.heading);
    p.push(segs(c.summary, Tone::Body), Align::Left);
    p.blank();

    for h in c.highlights {
        p.push(vec![Span::new("▌ ", Tone::Muted), Span::new(h.title, Tone::Heading)], Align::Left);
        p.push(vec![Span::new("  ", Tone::Body), Span::new(h.detail, Tone::Muted)], Align::Left);
        p.push(
            vec![
                Span::new(format!("  {} ", h.caption), Tone::Muted),
                Span::new(h.result, Tone::Accent),
            ],
            Align::Left,
        );
    }
    p.blank();

    let label_w = c.chart.iter().map(|s| str_width(s.subject)).max().unwrap_or(0);
    let bar_w = p.width.saturating_sub(label_w + 6).clamp(4, 40);
    for s in c.chart {
        let filled = bar_w * s.value as usize / s.full_mark.max(1) as usize;
        let pad = label_w - str_width(s.subject);
        p.lines.push(Line {
            spans: vec![
                Span::new(format!("{}{} ", s.subject, " ".repeat(pad)), Tone::Body),
                Span::new("█".repeat(filled), Tone::Accent),
                Span::new("░".repeat(bar_w - filled), Tone::Muted),
                Span::new(format!(" {:>3}", s.value), Tone::Muted),
            ],
            align: Align::Left,
            action: None,
        });
    }
}

fn origin(p: &mut Page, c: &OriginContent) {
    p.heading(Some(Icon::Brain), c.heading);
    for (i, card) in c.cards.iter().enumerate() {
        if i > 0 {
            p.text("│", Tone::Muted, Align::Center);
        }
        p.text(card.title, Tone::Heading, Align::Left);
        if let Some(q) = card.quote {
            p.text(q, Tone::Emphasis, Align::Left);
        }
        for line in card.body {
            p.text(line, Tone::Body, Align::Left);
        }
        if let Some(f) = card.footer {
            p.text(f, Tone::Success, Align::Left);
        }
    }
}

fn quest_log(p: &mut Page, c: &QuestLogContent) {
    p.push(
        vec![
            Span::new(format!("{} ", icon_glyph(Icon::Map)), Tone::Accent),
            Span::new(c.heading, Tone::Title),
            Span::new(format!("   {}", c.caption), Tone::Muted),
        ],
        Align::Left,
    );
    p.blank();
    for q in c.quests {
        let (marker, tone) = match q.kind {
            QuestKind::Main => ("●", Tone::Heading),
            QuestKind::Side => ("○", Tone::Body),
        };
        p.bullet(
            marker,
            Tone::Accent,
            vec![Span::new(q.title, tone), Span::new(format!("  {}", q.year), Tone::Muted)],
            0,
        );
        p.bullet(" ", Tone::Body, vec![Span::new(q.role, Tone::Accent)], 0);
        for d in q.description {
            p.bullet("▹", Tone::Muted, vec![Span::new(*d, Tone::Body)], 2);
        }
        p.blank();
    }
}

fn raid(p: &mut Page, c: &RaidContent) {
    p.badges(&[c.badge], Align::Left);
    p.text(c.title, Tone::Title, Align::Left);
    p.text(c.subtitle, Tone::Muted, Align::Left);
    p.blank();

    p.text("Mission Objective", Tone::Heading, Align::Left);
    for o in c.objectives {
        p.bullet(&icon_glyph(Icon::Check).to_string(), Tone::Success, vec![Span::new(*o, Tone::Body)], 0);
    }
    p.blank();

    let metrics: Vec<Span> = c
        .metrics
        .iter()
        .flat_map(|m| {
            [
                Span::new(m.value, Tone::Accent),
                Span::new(format!(" {}    ", m.label), Tone::Muted),
            ]
        })
        .collect();
    p.push(metrics, Align::Left);
    p.blank();

    for d in c.drops {
        p.push(
            vec![
                Span::new(format!("{} ", icon_glyph(d.icon)), Tone::Accent),
                Span::new(d.title, Tone::Heading),
            ],
            Align::Left,
        );
        for line in d.body {
            p.text(line, Tone::Body, Align::Left);
        }
        p.push(
            vec![Span::new("[Skill Acquired] ", Tone::Muted), Span::new(d.skill, Tone::Success)],
            Align::Left,
        );
        p.blank();
    }
}

fn showcase(p: &mut Page, c: &ShowcaseContent, assets: &AssetCatalog) {
    p.badges(&[c.badge], Align::Left);
    p.push(
        vec![Span::new(c.title, Tone::Title), Span::new(format!("   {}", c.total_log), Tone::Muted)],
        Align::Left,
    );
    for line in c.pitch {
        p.push(segs(line, Tone::Body), Align::Left);
    }
    p.blank();

    // app card
    p.image(&c.icon, assets, c.app_name);
    p.push(
        vec![
            Span::new(c.app_name, Tone::Heading),
            Span::new(format!("  {}  ", c.platforms), Tone::Muted),
            Span::new(c.release_note, Tone::Success),
        ],
        Align::Left,
    );
    p.image(&c.screenshot, assets, c.app_name);
    p.blank();

    p.text(c.features_heading, Tone::Heading, Align::Left);
    for f in c.features {
        p.bullet(
            &icon_glyph(f.icon).to_string(),
            Tone::Accent,
            vec![Span::new(format!("{}:", f.name), Tone::Emphasis), Span::new(format!(" {}", f.detail), Tone::Body)],
            0,
        );
    }
    p.blank();

    p.push(
        vec![
            Span::new(format!("{} ", icon_glyph(Icon::Quote)), Tone::Accent),
            Span::new(c.feedback_heading, Tone::Heading),
        ],
        Align::Left,
    );
    for f in c.feedback {
        p.bullet("│", Tone::Muted, vec![Span::new(*f, Tone::Emphasis)], 0);
    }
    p.blank();

    p.push(
        vec![
            Span::new(format!("{} ", icon_glyph(Icon::Shield)), Tone::Accent),
            Span::new(c.tactics_heading, Tone::Heading),
        ],
        Align::Left,
    );
    for g in c.tactics {
        p.push(
            vec![Span::new(format!("{} ", icon_glyph(g.icon)), Tone::Muted), Span::new(g.title, Tone::Muted)],
            Align::Left,
        );
        for item in g.items {
            p.bullet("▷", Tone::Accent, segs(item, Tone::Body), 2);
        }
    }
    p.blank();

    p.push(
        vec![
            Span::new(format!("{} ", icon_glyph(Icon::Target)), Tone::Accent),
            Span::new(c.audience_heading, Tone::Heading),
        ],
        Align::Left,
    );
    for a in c.audience {
        p.bullet("•", Tone::Accent, vec![Span::new(*a, Tone::Body)], 0);
    }
    p.blank();

    for l in c.links {
        p.push(
            vec![
                Span::new(format!("{} {}  ", icon_glyph(l.icon), l.label), Tone::Accent),
                Span::new(l.url, Tone::Link),
            ],
            Align::Left,
        );
    }
}

fn skill_tree(p: &mut Page, c: &SkillTreeContent) {
    p.heading(Some(Icon::Map), c.heading);
    for node in c.nodes {
        p.push(
            vec![
                Span::new(format!("{} ", icon_glyph(node.icon)), Tone::Accent),
                Span::new(node.category, Tone::Heading),
            ],
            Align::Left,
        );
        p.badges(node.skills, Align::Left);
        p.blank();
    }
}

fn ability(p: &mut Page, c: &AbilityContent) {
    p.text(&icon_glyph(Icon::Brain).to_string(), Tone::Accent, Align::Center);
    p.blank();
    p.text(c.heading, Tone::Title, Align::Center);
    p.blank();
    for line in c.pitch {
        p.push(segs(line, Tone::Body), Align::Center);
    }
    p.blank();
    for pillar in c.pillars {
        p.text(pillar.title, Tone::Heading, Align::Center);
        p.text(&pillar.items.join(" · "), Tone::Muted, Align::Center);
        p.blank();
    }
}

fn party(p: &mut Page, c: &PartyContent) {
    p.heading(Some(Icon::Users), c.heading);
    for m in c.members {
        let initial = m.name.chars().next().unwrap_or('?');
        p.push(
            vec![
                Span::new(format!("({initial}) "), Tone::Accent),
                Span::new(m.role, Tone::Heading),
                Span::new(format!(" · {}", m.name), Tone::Muted),
            ],
            Align::Left,
        );
        let mut quote = vec![Span::new("\"", Tone::Muted)];
        quote.extend(segs(m.quote, Tone::Body));
        quote.push(Span::new("\"", Tone::Muted));
        p.bullet(" ", Tone::Body, quote, 1);
        p.blank();
    }
}

fn contact(p: &mut Page, c: &ContactContent) {
    p.blank();
    p.text(c.heading, Tone::Success, Align::Center);
    p.blank();
    p.push(segs(c.prompt, Tone::Body), Align::Center);
    p.blank();
    for l in c.links {
        let mut spans = vec![
            Span::new(format!("{} ", icon_glyph(l.icon)), Tone::Accent),
            Span::new(l.label, Tone::Heading),
        ];
        if l.url != l.label {
            spans.push(Span::new(format!("  {}", l.url), Tone::Link));
        }
        p.push(spans, Align::Left);
    }
    p.blank();
    for line in c.credits {
        p.text(line, Tone::Muted, Align::Center);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::content::content_for;
    use crate::domain::stage::Stage;

    fn spans(text: &str) -> Vec<Span> {
        vec![Span::new(text, Tone::Body)]
    }

    fn joined(lines: &[Vec<Span>]) -> Vec<String> {
        lines.iter().map(|l| l.iter().map(|s| s.text.as_str()).collect()).collect()
    }

    #[test]
    fn hangul_is_double_width() {
        assert_eq!(str_width("abc"), 3);
        assert_eq!(str_width("한글"), 4);
        assert_eq!(str_width("AI와"), 4);
    }

    #[test]
    fn wrap_breaks_on_spaces() {
        let out = wrap(&spans("the quick brown fox"), 10);
        assert_eq!(joined(&out), vec!["the quick", "brown fox"]);
    }

    #[test]
    fn wrap_counts_wide_chars() {
        // each syllable is 2 columns: "가나다" = 6
        let out = wrap(&spans("가나다 라마"), 7);
        assert_eq!(joined(&out), vec!["가나다", "라마"]);
        for line in &out {
            let w: usize = line.iter().map(|s| str_width(&s.text)).sum();
            assert!(w <= 7);
        }
    }

    #[test]
    fn wrap_splits_overlong_words() {
        let out = wrap(&spans("abcdefghij"), 4);
        assert_eq!(joined(&out), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn wrap_keeps_tones_and_spaces_between_spans() {
        let input = vec![Span::new("plain ", Tone::Body), Span::new("hot", Tone::Highlight)];
        let out = wrap(&input, 40);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0], vec![Span::new("plain ", Tone::Body), Span::new("hot", Tone::Highlight)]);
    }

    #[test]
    fn every_stage_fits_its_width() {
        let assets = AssetCatalog::empty();
        for width in [30, 60, 96] {
            for stage in Stage::ALL {
                let lines = compose(content_for(stage), &assets, width);
                assert!(!lines.is_empty(), "{stage:?}");
                for l in &lines {
                    assert!(l.width() <= width, "{stage:?} @ {width}: {:?}", l.text());
                }
            }
        }
    }

    #[test]
    fn intro_has_a_start_button() {
        let lines = compose(content_for(Stage::Intro), &AssetCatalog::empty(), 80);
        let buttons: Vec<_> = lines.iter().filter(|l| l.action.is_some()).collect();
        assert_eq!(buttons.len(), 1);
        assert_eq!(buttons[0].action, Some(NavCommand::Advance));
        assert!(buttons[0].text().contains("START GAME"));
    }

    #[test]
    fn missing_images_degrade() {
        let lines = compose(content_for(Stage::BossRaid2), &AssetCatalog::empty(), 80);
        let text: Vec<String> = lines.iter().map(Line::text).collect();
        // icon hidden, screenshot replaced by its placeholder
        assert!(!text.iter().any(|t| t.contains("(Icon)")));
        assert!(text.iter().any(|t| t.contains("Screenshot 1 Placeholder")));
        assert!(lines.iter().any(|l| l.spans.iter().any(|s| s.tone == Tone::Placeholder)));
    }

    #[test]
    fn present_images_show_their_file() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["recipesoup_icon.png", "recipesoup_screenshot.png"] {
            std::fs::write(dir.path().join(name), b"\x89PNG").unwrap();
        }
        let assets = AssetCatalog::scan(dir.path());
        let lines = compose(content_for(Stage::BossRaid2), &assets, 200);
        let text: Vec<String> = lines.iter().map(Line::text).collect();
        assert!(text.iter().any(|t| t.contains("recipesoup_icon.png")));
        assert!(text.iter().any(|t| t.contains("recipesoup_screenshot.png")));
        assert!(!lines.iter().any(|l| l.spans.iter().any(|s| s.tone == Tone::Placeholder)));
    }

    #[test]
    fn compose_is_deterministic() {
        let assets = AssetCatalog::empty();
        for stage in Stage::ALL {
            let a = compose(content_for(stage), &assets, 72);
            let b = compose(content_for(stage), &assets, 72);
            assert_eq!(a, b);
        }
    }
}
