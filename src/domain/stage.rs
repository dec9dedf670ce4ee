/// Stage: the ten fixed screens of the tour, in order.
///
/// The order is fixed at compile time. Nothing at runtime can skip or
/// reorder a stage; navigation only ever moves one step.

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub enum Stage {
    Intro = 0,
    Stats = 1,
    Origin = 2,
    QuestLog = 3,
    BossRaid1 = 4,
    BossRaid2 = 5,
    SkillTree = 6,
    SpecialAbility = 7,
    PartyReview = 8,
    Contact = 9,
}

impl Stage {
    pub const COUNT: usize = 10;
    pub const FIRST: Stage = Stage::Intro;
    pub const LAST: Stage = Stage::Contact;

    pub const ALL: [Stage; Stage::COUNT] = [
        Stage::Intro,
        Stage::Stats,
        Stage::Origin,
        Stage::QuestLog,
        Stage::BossRaid1,
        Stage::BossRaid2,
        Stage::SkillTree,
        Stage::SpecialAbility,
        Stage::PartyReview,
        Stage::Contact,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(i: usize) -> Option<Stage> {
        Stage::ALL.get(i).copied()
    }

    /// The following stage, or `None` at `Contact`.
    pub fn next(self) -> Option<Stage> {
        Stage::from_index(self.index() + 1)
    }

    /// The preceding stage, or `None` at `Intro`.
    pub fn prev(self) -> Option<Stage> {
        self.index().checked_sub(1).and_then(Stage::from_index)
    }

    /// Short label for the HUD and logs.
    pub fn label(self) -> &'static str {
        match self {
            Stage::Intro => "Intro",
            Stage::Stats => "Character Stats",
            Stage::Origin => "Origin Story",
            Stage::QuestLog => "Quest Log",
            Stage::BossRaid1 => "Boss Raid #1",
            Stage::BossRaid2 => "Boss Raid #2",
            Stage::SkillTree => "Skill Tree",
            Stage::SpecialAbility => "Special Ability",
            Stage::PartyReview => "Party Review",
            Stage::Contact => "Game Clear",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_ordered_by_index() {
        for (i, stage) in Stage::ALL.iter().enumerate() {
            assert_eq!(stage.index(), i);
            assert_eq!(Stage::from_index(i), Some(*stage));
        }
        assert_eq!(Stage::from_index(Stage::COUNT), None);
    }

    #[test]
    fn next_and_prev_stop_at_the_ends() {
        assert_eq!(Stage::Intro.prev(), None);
        assert_eq!(Stage::Intro.next(), Some(Stage::Stats));
        assert_eq!(Stage::Contact.next(), None);
        assert_eq!(Stage::Contact.prev(), Some(Stage::PartyReview));
        assert_eq!(Stage::FIRST, Stage::ALL[0]);
        assert_eq!(Stage::LAST, Stage::ALL[Stage::COUNT - 1]);
    }
}
