//! Badge definitions and metadata
//!
//! The catalog is static data. A user holds a badge by listing its id in
//! their progress record; nothing here is per-user state.

/// Unique identifier for each badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BadgeId {
    EarlyBird,
    Scholar,
    CryptoNative,
    TopLearner,
    StreakStar,
    WeeklyChampion,
    MonthlyMaster,
}

impl BadgeId {
    /// Get the string ID for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EarlyBird => "early_bird",
            Self::Scholar => "scholar",
            Self::CryptoNative => "crypto_native",
            Self::TopLearner => "top_learner",
            Self::StreakStar => "streak_star",
            Self::WeeklyChampion => "weekly_champion",
            Self::MonthlyMaster => "monthly_master",
        }
    }

    /// Parse from database string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "early_bird" => Some(Self::EarlyBird),
            "scholar" => Some(Self::Scholar),
            "crypto_native" => Some(Self::CryptoNative),
            "top_learner" => Some(Self::TopLearner),
            "streak_star" => Some(Self::StreakStar),
            "weekly_champion" => Some(Self::WeeklyChampion),
            "monthly_master" => Some(Self::MonthlyMaster),
            _ => None,
        }
    }

    pub fn all() -> &'static [BadgeId] {
        &[
            Self::EarlyBird,
            Self::Scholar,
            Self::CryptoNative,
            Self::TopLearner,
            Self::StreakStar,
            Self::WeeklyChampion,
            Self::MonthlyMaster,
        ]
    }
}

/// Badge definition with display metadata
#[derive(Debug, Clone)]
pub struct Badge {
    pub id: BadgeId,
    pub name: &'static str,
    pub description: &'static str,
    /// Icon reference resolved by the UI
    pub icon: &'static str,
    /// Display value shown next to the badge
    pub points: u64,
    /// Granted by the badge checker (false: only by an explicit grant)
    pub automatic: bool,
}

/// All badge definitions
pub static BADGES: &[Badge] = &[
    Badge {
        id: BadgeId::EarlyBird,
        name: "Early Bird",
        description: "Start your first learning session",
        icon: "Zap",
        points: 0,
        automatic: true,
    },
    Badge {
        id: BadgeId::Scholar,
        name: "Syllabus Master",
        description: "Earn 500 points",
        icon: "BookOpen",
        points: 500,
        automatic: true,
    },
    Badge {
        id: BadgeId::CryptoNative,
        name: "Identity Verified",
        description: "Link a wallet to your learner profile",
        icon: "ShieldCheck",
        points: 0,
        automatic: false,
    },
    Badge {
        id: BadgeId::TopLearner,
        name: "Grand Scholar",
        description: "Earn 1000 points",
        icon: "Trophy",
        points: 1000,
        automatic: true,
    },
    Badge {
        id: BadgeId::StreakStar,
        name: "Consistent Scholar",
        description: "Keep a 5-day learning streak",
        icon: "Flame",
        points: 0,
        automatic: true,
    },
    Badge {
        id: BadgeId::WeeklyChampion,
        name: "Weekly Champion",
        description: "Reach the weekly points threshold",
        icon: "Medal",
        points: 500,
        automatic: true,
    },
    Badge {
        id: BadgeId::MonthlyMaster,
        name: "Monthly Master",
        description: "Reach the monthly points threshold",
        icon: "Crown",
        points: 2000,
        automatic: true,
    },
];

impl Badge {
    /// Get badge definition by ID
    pub fn get(id: BadgeId) -> Option<&'static Badge> {
        BADGES.iter().find(|b| b.id == id)
    }

    /// Look up a stored id string
    pub fn lookup(id: &str) -> Option<&'static Badge> {
        BadgeId::from_str(id).and_then(Self::get)
    }

    pub fn total_count() -> usize {
        BADGES.len()
    }
}
