//! Static template tables.

use entities::{Category, ScoreTier};

pub(crate) struct FocusAreaTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub priority: i64,
}

pub(crate) struct BlueprintTemplate {
    pub identity_goal: &'static str,
    pub current_state: &'static str,
    pub focus_areas: [FocusAreaTemplate; 5],
}

pub(crate) struct HabitTemplate {
    pub title: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub focus_area: &'static str,
    pub duration_minutes: u32,
}

pub(crate) struct RecommendationTemplate {
    pub title: &'static str,
    pub description: &'static str,
    pub impact: &'static str,
}

const fn area(name: &'static str, description: &'static str, priority: i64) -> FocusAreaTemplate {
    FocusAreaTemplate {
        name,
        description,
        priority,
    }
}

// Expands to a struct literal so the arrays below are promoted to 'static.
macro_rules! rec {
    ($title:expr, $description:expr, $impact:expr $(,)?) => {
        RecommendationTemplate {
            title: $title,
            description: $description,
            impact: $impact,
        }
    };
}

pub(crate) const BLUEPRINTS: [BlueprintTemplate; 3] = [
    BlueprintTemplate {
        identity_goal: "I want to become a more disciplined, creative, and mindful person who consistently works toward my goals and maintains meaningful relationships.",
        current_state: "I'm currently struggling with consistency in my habits but have strong motivation to improve my personal and professional life.",
        focus_areas: [
            area("Personal Development", "Building self-discipline and consistent habits", 5),
            area("Health & Fitness", "Maintaining physical and mental well-being", 4),
            area("Creative Expression", "Exploring and developing creative talents", 3),
            area("Mindfulness", "Practicing presence and emotional awareness", 4),
            area("Relationships", "Nurturing meaningful connections", 3),
        ],
    },
    BlueprintTemplate {
        identity_goal: "I aspire to be a confident leader who balances professional success with personal well-being and contributes positively to my community.",
        current_state: "I have good skills but need to work on self-confidence and time management to reach my full potential.",
        focus_areas: [
            area("Leadership Skills", "Developing confidence and communication abilities", 5),
            area("Work-Life Balance", "Managing time effectively between work and personal life", 4),
            area("Community Involvement", "Contributing meaningfully to my community", 3),
            area("Self-Care", "Prioritizing mental and physical health", 4),
            area("Professional Growth", "Advancing career skills and opportunities", 4),
        ],
    },
    BlueprintTemplate {
        identity_goal: "I want to become someone who lives authentically, maintains excellent physical and mental health, and pursues lifelong learning.",
        current_state: "I'm in a transition phase where I'm discovering what truly matters to me and building better daily routines.",
        focus_areas: [
            area("Authentic Living", "Aligning actions with personal values", 5),
            area("Physical Health", "Maintaining fitness and energy levels", 4),
            area("Mental Wellness", "Cultivating emotional resilience and clarity", 4),
            area("Continuous Learning", "Pursuing new knowledge and skills", 3),
            area("Routine Building", "Establishing consistent daily practices", 3),
        ],
    },
];

pub(crate) const HABITS: [HabitTemplate; 7] = [
    HabitTemplate {
        title: "Morning Meditation",
        description: "10-minute mindfulness meditation to start the day centered",
        category: "Morning Routine",
        focus_area: "Mindfulness",
        duration_minutes: 10,
    },
    HabitTemplate {
        title: "Daily Journaling",
        description: "Reflect on goals, gratitude, and personal insights",
        category: "Evening Reflection",
        focus_area: "Personal Development",
        duration_minutes: 15,
    },
    HabitTemplate {
        title: "Exercise Session",
        description: "Physical activity to maintain health and energy",
        category: "Health & Wellness",
        focus_area: "Physical Health",
        duration_minutes: 30,
    },
    HabitTemplate {
        title: "Read for Growth",
        description: "Read books or articles related to personal development",
        category: "Growth & Learning",
        focus_area: "Continuous Learning",
        duration_minutes: 20,
    },
    HabitTemplate {
        title: "Creative Practice",
        description: "Engage in a creative activity (writing, art, music, etc.)",
        category: "Growth & Learning",
        focus_area: "Creative Expression",
        duration_minutes: 25,
    },
    HabitTemplate {
        title: "Connect with Others",
        description: "Reach out to friends, family, or colleagues meaningfully",
        category: "Social Connection",
        focus_area: "Relationships",
        duration_minutes: 15,
    },
    HabitTemplate {
        title: "Plan Tomorrow",
        description: "Review goals and set priorities for the next day",
        category: "Evening Reflection",
        focus_area: "Personal Development",
        duration_minutes: 10,
    },
];

/// Templates for a category in a score tier. Every pair has at least one.
pub(crate) fn recommendations_for(
    category: Category,
    tier: ScoreTier,
) -> &'static [RecommendationTemplate] {
    use Category::*;
    use ScoreTier::*;

    match (category, tier) {
        (Fitness, Foundation) => &[
            rec!(
                "Start with 10-minute daily walks",
                "Begin building fitness habits with low-impact, manageable daily movement.",
                "+25% fitness foundation",
            ),
            rec!(
                "Track your water intake",
                "Proper hydration is fundamental to physical health and energy levels.",
                "+15% energy levels",
            ),
        ],
        (Career, Foundation) => &[
            rec!(
                "Define your career vision",
                "Spend time clarifying what you want from your professional life.",
                "+30% career clarity",
            ),
            rec!(
                "Update your professional profile",
                "Make sure your professional presence reflects your current skills and goals.",
                "+20% networking opportunities",
            ),
        ],
        (Relationships, Foundation) => &[rec!(
            "Schedule weekly friend/family time",
            "Block dedicated time for meaningful connections with people you care about.",
            "+35% relationship satisfaction",
        )],
        (Learning, Foundation) => &[rec!(
            "Read for 15 minutes daily",
            "Start a consistent learning habit with just 15 minutes of reading each day.",
            "+40% knowledge growth",
        )],
        (Wellness, Foundation) => &[rec!(
            "Practice 5-minute meditation",
            "Begin a mindfulness practice with short, manageable meditation sessions.",
            "+30% stress reduction",
        )],
        (Fitness, Optimization) => &[rec!(
            "Add strength training 2x/week",
            "Build on your cardio foundation with resistance training for muscle development.",
            "+20% strength gains",
        )],
        (Career, Optimization) => &[rec!(
            "Set quarterly professional goals",
            "Create specific, measurable goals to advance your career systematically.",
            "+25% career progression",
        )],
        (Relationships, Optimization) => &[rec!(
            "Practice active listening",
            "Improve relationship quality by focusing on truly understanding others.",
            "+20% relationship depth",
        )],
        (Learning, Optimization) => &[rec!(
            "Take an online course",
            "Deepen your knowledge in an area of interest with structured learning.",
            "+30% skill development",
        )],
        (Wellness, Optimization) => &[rec!(
            "Establish a wind-down routine",
            "Create a consistent evening routine to improve sleep quality and mental wellness.",
            "+25% sleep quality",
        )],
        (Fitness, Advanced) => &[rec!(
            "Train for a fitness challenge",
            "Set an ambitious fitness goal like a race or competition to push your limits.",
            "+15% performance optimization",
        )],
        (Career, Advanced) => &[rec!(
            "Mentor someone in your field",
            "Share your expertise by mentoring others while deepening your own knowledge.",
            "+20% leadership skills",
        )],
        (Relationships, Advanced) => &[rec!(
            "Plan meaningful experiences",
            "Create lasting memories by organizing special activities with loved ones.",
            "+15% relationship richness",
        )],
        (Learning, Advanced) => &[rec!(
            "Teach others what you know",
            "Solidify your knowledge by teaching or creating content in your areas of expertise.",
            "+25% knowledge retention",
        )],
        (Wellness, Advanced) => &[rec!(
            "Explore advanced mindfulness",
            "Deepen your practice with advanced meditation techniques or retreats.",
            "+20% mindfulness mastery",
        )],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_and_tier_has_templates() {
        for category in Category::ALL {
            for tier in [
                ScoreTier::Foundation,
                ScoreTier::Optimization,
                ScoreTier::Advanced,
            ] {
                assert!(!recommendations_for(category, tier).is_empty());
            }
        }
    }

    #[test]
    fn test_focus_area_priorities_in_range() {
        for template in &BLUEPRINTS {
            for area in &template.focus_areas {
                assert!((1..=5).contains(&area.priority));
            }
        }
    }
}
