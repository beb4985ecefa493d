//! Deterministic feedback text: raw-score levels, per-dimension suggestions,
//! and advice derived from a standardized profile or from improvements.
//!
//! Raw-score levels and suggestion buckets work on raw totals. Percentile
//! ratings live in [`crate::norms::STANDARD_RATINGS`] and are never mixed in here.

use serde::Serialize;

use crate::enums::{AgeGroup, Dimension};
use crate::history::Improvement;
use crate::scoring::MAX_SUB_TEST_SCORE;
use crate::standard::StandardizedProfile;

// ---------------------------------------------------------------------------
// Suggestions
// ---------------------------------------------------------------------------

/// Raw-total bucket used to pick suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionBucket {
    High,
    Mid,
    Low,
}

impl SuggestionBucket {
    /// `>= 75` high, `>= 50` mid, otherwise low.
    #[must_use]
    pub fn from_total(raw_total: f64) -> Self {
        if raw_total >= 75.0 {
            Self::High
        } else if raw_total >= 50.0 {
            Self::Mid
        } else {
            Self::Low
        }
    }
}

/// Training suggestions for a dimension given its raw total on the 0–100 scale.
#[must_use]
pub fn suggestions(dimension: Dimension, raw_total: f64) -> &'static [&'static str] {
    use Dimension::{Attention, Planning, Simultaneous, Successive};
    use SuggestionBucket::{High, Low, Mid};

    match (dimension, SuggestionBucket::from_total(raw_total)) {
        (Planning, High) => &[
            "Keep building planning habits: let the child help plan family activities",
            "Try more demanding strategy games such as chess or introductory programming",
        ],
        (Planning, Mid) => &[
            "Use puzzles and building blocks to practise planning",
            "Encourage thinking through the steps before starting a task",
            "Guide the child to analyse problems and draw up a plan",
        ],
        (Planning, Low) => &[
            "Start with simple daily plans, such as scheduling the day's homework",
            "Play strategy board games like mazes and tangrams",
            "Demonstrate step-by-step problem solving and let the child follow along",
        ],
        (Attention, High) => &[
            "Maintain good focus habits and extend study sessions gradually",
            "Try activities that need sustained focus, such as a musical instrument or drawing",
        ],
        (Attention, Mid) => &[
            "Practise attention with spot-the-difference and word-chain games",
            "Provide a quiet study environment with few distractions",
            "Use the Pomodoro technique and lengthen focus periods step by step",
        ],
        (Attention, Low) => &[
            "Do 5 to 10 minutes of focus training games every day",
            "Cut screen time and add outdoor exercise",
            "Try meditation or breathing exercises to help concentration",
            "If difficulties persist, seek a professional learning assessment",
        ],
        (Simultaneous, High) => &[
            "Develop spatial imagination through geometry and drawing",
            "Join science experiment activities to build holistic thinking",
        ],
        (Simultaneous, Mid) => &[
            "Do more jigsaw puzzles and figure-reasoning games",
            "Organise knowledge with mind maps to practise integrating information",
            "Encourage observing and describing how things relate to each other",
        ],
        (Simultaneous, Low) => &[
            "Start with simple shape-matching exercises",
            "Use visual learning tools such as charts and flow diagrams",
            "Train spatial awareness with building blocks and origami",
            "Point out how parts relate to the whole in everyday life",
        ],
        (Successive, High) => &[
            "Keep encouraging longer stories and articles",
            "Try learning to program to build sequential reasoning",
        ],
        (Successive, Mid) => &[
            "Retell stories to train sequence memory",
            "Practise completing tasks step by step, such as following a recipe",
            "Practise explaining things aloud in logical order",
        ],
        (Successive, Low) => &[
            "Train memory with short sequences, such as phone numbers",
            "Listen to audio stories and retell the main plot",
            "Use card games to practise ordering",
            "Encourage \"first, then, finally\" when the child describes events",
        ],
    }
}

// ---------------------------------------------------------------------------
// Raw-score levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreLevel {
    Excellent,
    Good,
    Fair,
    ToImprove,
    NeedsPractice,
    NeedsAttention,
}

/// Display data for a raw-score level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreBand {
    pub level: ScoreLevel,
    pub label: &'static str,
    pub color: &'static str,
    pub emoji: &'static str,
    pub description: &'static str,
}

impl ScoreLevel {
    /// Level for a percentage of the scale maximum: 90/80/70/60/40 cut-offs.
    #[must_use]
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 90.0 {
            Self::Excellent
        } else if percentage >= 80.0 {
            Self::Good
        } else if percentage >= 70.0 {
            Self::Fair
        } else if percentage >= 60.0 {
            Self::ToImprove
        } else if percentage >= 40.0 {
            Self::NeedsPractice
        } else {
            Self::NeedsAttention
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::ToImprove => "Room to Improve",
            Self::NeedsPractice => "Needs Practice",
            Self::NeedsAttention => "Needs Attention",
        }
    }

    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Excellent => "#00B894",
            Self::Good => "#6C5CE7",
            Self::Fair => "#00CEC9",
            Self::ToImprove => "#FDCB6E",
            Self::NeedsPractice => "#E17055",
            Self::NeedsAttention => "#FF7675",
        }
    }

    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Excellent => "🌟",
            Self::Good => "👍",
            Self::Fair => "💪",
            Self::ToImprove => "📚",
            Self::NeedsPractice => "💡",
            Self::NeedsAttention => "❤️",
        }
    }

    const fn band(self, description: &'static str) -> ScoreBand {
        ScoreBand {
            level: self,
            label: self.label(),
            color: self.color(),
            emoji: self.emoji(),
            description,
        }
    }
}

/// Level of an overall raw total on the 0–100 scale.
#[must_use]
pub fn score_level(total: f64) -> ScoreBand {
    let level = ScoreLevel::from_percentage(total);
    let description = match level {
        ScoreLevel::Excellent => "Outstanding performance",
        ScoreLevel::Good => "Good performance",
        ScoreLevel::Fair => "Solid performance, keep it up",
        ScoreLevel::ToImprove => "There is room to improve",
        ScoreLevel::NeedsPractice => "More practice and training needed",
        ScoreLevel::NeedsAttention => "Professional guidance is recommended",
    };
    level.band(description)
}

/// Level of a single sub-test score on the 0–33 scale.
#[must_use]
pub fn dimension_level(score: f64) -> ScoreBand {
    let level = ScoreLevel::from_percentage(score / MAX_SUB_TEST_SCORE * 100.0);
    let description = match level {
        ScoreLevel::Excellent => "Outstanding performance",
        ScoreLevel::Good => "Good performance",
        ScoreLevel::Fair => "Solid performance",
        ScoreLevel::ToImprove => "There is room to improve",
        ScoreLevel::NeedsPractice => "More practice needed",
        ScoreLevel::NeedsAttention => "Targeted training is recommended",
    };
    level.band(description)
}

// ---------------------------------------------------------------------------
// Personalized advice
// ---------------------------------------------------------------------------

const STRENGTH_PERCENTILE: f64 = 85.0;
const WEAKNESS_PERCENTILE: f64 = 30.0;
const IMPROVEMENT_PERCENTILE: f64 = 50.0;
const BALANCE_ADVICE_RANGE: f64 = 25.0;
const MOTIVATION_CHANGE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceKind {
    Strength,
    Weakness,
    Improvement,
    Balance,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advice {
    /// `None` for balance advice, which spans dimensions.
    pub dimension: Option<Dimension>,
    pub kind: AdviceKind,
    pub title: String,
    pub content: String,
}

const fn strength_text(dimension: Dimension) -> &'static str {
    match dimension {
        Dimension::Planning => {
            "Shows excellent planning and organising ability. Try harder challenges such as programming or chess competitions to develop this strength."
        }
        Dimension::Attention => {
            "Focus is very strong. Use it to learn skills that need sustained concentration, such as playing an instrument, calligraphy, or fine handicrafts."
        }
        Dimension::Simultaneous => {
            "Spatial and holistic thinking stand out. Encourage geometry, science experiments, and art that rely on spatial reasoning."
        }
        Dimension::Successive => {
            "Sequential memory and logical reasoning are strong. Languages, programming, and music suit this kind of ordered thinking."
        }
    }
}

const fn weakness_text(dimension: Dimension) -> &'static str {
    match dimension {
        Dimension::Planning => {
            "Build planning gradually with simple schedules, puzzles, and block building. Model thinking before acting."
        }
        Dimension::Attention => {
            "Provide a quiet study space, use a timer for short focus sessions starting at 5 minutes, reduce screen time, and add outdoor activity."
        }
        Dimension::Simultaneous => {
            "Play more puzzles, shape matching, and building games. Use charts and mind maps to help understand material as a whole."
        }
        Dimension::Successive => {
            "Train sequence memory with story retelling, number memory games, and rhythm clapping. Encourage ordered speech with \"step one, step two\"."
        }
    }
}

const fn improvement_text(dimension: Dimension) -> &'static str {
    match dimension {
        Dimension::Planning => {
            "There is a basis for planning. Add strategy board games and involve the child in planning family activities."
        }
        Dimension::Attention => {
            "There is a basis for focus. Use the Pomodoro technique, growing sessions from 15 to 25 minutes."
        }
        Dimension::Simultaneous => {
            "Spatial thinking can improve. Try spot-the-difference games, figure reasoning, and physical models."
        }
        Dimension::Successive => {
            "Sequencing can improve. Retell stories, recite poems, and practise rhythms."
        }
    }
}

/// Advice per dimension from percentile bands, plus balance advice when the
/// percentile range exceeds 25.
#[must_use]
pub fn personalized_advice(profile: &StandardizedProfile) -> Vec<Advice> {
    let mut advice = Vec::new();

    for score in &profile.scores {
        let dimension = score.dimension;
        let name = dimension.display_name();
        let entry = if score.percentile >= STRENGTH_PERCENTILE {
            Some((
                AdviceKind::Strength,
                format!("{name}: area of strength"),
                strength_text(dimension),
            ))
        } else if score.percentile < WEAKNESS_PERCENTILE {
            Some((
                AdviceKind::Weakness,
                format!("{name}: focus area"),
                weakness_text(dimension),
            ))
        } else if score.percentile < IMPROVEMENT_PERCENTILE {
            Some((
                AdviceKind::Improvement,
                format!("{name}: can do better"),
                improvement_text(dimension),
            ))
        } else {
            None
        };
        if let Some((kind, title, content)) = entry {
            advice.push(Advice {
                dimension: Some(dimension),
                kind,
                title,
                content: content.to_string(),
            });
        }
    }

    let balance = profile.balance();
    if balance.range > BALANCE_ADVICE_RANGE {
        let strong = balance.strongest.display_name();
        let weak = balance.weakest.display_name();
        advice.push(Advice {
            dimension: None,
            kind: AdviceKind::Balance,
            title: "Cognitive balance".to_string(),
            content: format!(
                "{strong} is clearly stronger than {weak}. Keep building on the strength while giving {weak} targeted practice."
            ),
        });
    }

    advice
}

// ---------------------------------------------------------------------------
// Motivational advice
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EncouragementKind {
    Overall,
    Positive,
    Attention,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Encouragement {
    pub dimension: Option<Dimension>,
    pub kind: EncouragementKind,
    pub content: String,
}

/// Encouragement from per-dimension improvements (canonical order).
///
/// A percentile change above 10 is praised and below -10 is flagged. An
/// overall message leads the list when something improved and nothing declined.
#[must_use]
pub fn motivational_advice(improvements: &[Option<Improvement>; 4]) -> Vec<Encouragement> {
    let mut out = Vec::new();
    let mut improved = false;
    let mut declined = false;

    for dimension in Dimension::ALL {
        let Some(imp) = improvements[dimension.index()] else {
            continue;
        };
        let name = dimension.display_name();
        if imp.change > MOTIVATION_CHANGE {
            improved = true;
            out.push(Encouragement {
                dimension: Some(dimension),
                kind: EncouragementKind::Positive,
                content: format!(
                    "{name} rose by {} percentile points. Keep it up!",
                    imp.change.round()
                ),
            });
        } else if imp.change < -MOTIVATION_CHANGE {
            declined = true;
            out.push(Encouragement {
                dimension: Some(dimension),
                kind: EncouragementKind::Attention,
                content: format!(
                    "{name} dropped. This may reflect the testing conditions; consider retesting to confirm."
                ),
            });
        }
    }

    if improved && !declined {
        out.insert(
            0,
            Encouragement {
                dimension: None,
                kind: EncouragementKind::Overall,
                content: "Steady progress across the board. The training is working, keep going!"
                    .to_string(),
            },
        );
    }

    out
}

// ---------------------------------------------------------------------------
// Parent guidance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Guidance {
    pub title: String,
    pub content: String,
}

const fn age_group_text(group: AgeGroup) -> Option<&'static str> {
    match group {
        AgeGroup::Preschool => Some(
            "Ages 5 to 6 are a key period for cognitive development. Train through play, keep sessions under 15 minutes, and favour outdoor activity and time with peers.",
        ),
        AgeGroup::LowerPrimary => Some(
            "Children aged 7 to 9 are forming study habits. Tie training to schoolwork, build independent learning, and balance work with rest.",
        ),
        AgeGroup::UpperPrimary => Some(
            "Ages 10 to 12 can take more goal-directed training. Encourage thinking competitions and science exploration to build independent problem solving.",
        ),
        AgeGroup::JuniorHigh => Some(
            "Teenagers aged 13 to 15 can follow systematic cognitive training. Combine it with subject learning to develop critical and creative thinking.",
        ),
        AgeGroup::SeniorHigh => Some(
            "At 16 to 17 cognition approaches adult level. Project-based and research-style learning help develop it further.",
        ),
        AgeGroup::Unknown => None,
    }
}

const fn daily_training_text(dimension: Dimension) -> &'static str {
    match dimension {
        Dimension::Planning => {
            "Spend 10 minutes each day planning tomorrow together; at weekends complete a multi-step craft or cooking project."
        }
        Dimension::Attention => {
            "Practise 10 minutes of quiet time daily, cut fragmented information, and encourage reading and puzzles."
        }
        Dimension::Simultaneous => {
            "Do a set of figure-reasoning or spot-the-difference exercises daily, encourage drawing and model building, and organise learning with mind maps."
        }
        Dimension::Successive => {
            "Retell a short story or lesson every day, play number-chain games, and regularly recite short poems or songs."
        }
    }
}

/// Guidance for parents: an overall assessment, an age-group guide when the
/// group is known, and daily training aimed at the weakest dimension.
#[must_use]
pub fn parent_guidance(profile: &StandardizedProfile) -> Vec<Guidance> {
    let avg = profile.overall.avg_percentile;
    let overall = if avg >= 70.0 {
        "Cognitive development is going well. Keep offering rich and varied learning opportunities to sustain it."
    } else if avg >= 40.0 {
        "Cognitive development is in the typical range. Targeted training and support leave plenty of room to grow."
    } else {
        "Keep an eye on cognitive development and train through games. Consult a professional if needed."
    };

    let mut guidance = vec![Guidance {
        title: "Overall assessment".to_string(),
        content: overall.to_string(),
    }];

    if let Some(text) = age_group_text(profile.age_group) {
        guidance.push(Guidance {
            title: format!("{} parent guide", profile.age_group.display_name()),
            content: text.to_string(),
        });
    }

    let weakest = profile.balance().weakest;
    guidance.push(Guidance {
        title: "Daily training".to_string(),
        content: daily_training_text(weakest).to_string(),
    });

    guidance
}
