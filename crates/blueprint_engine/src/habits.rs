//! Habit generation.

use entities::Habit;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{BlueprintDraft, TemplateSelection, templates::HABITS};

/// Fewest habits generated for a blueprint.
pub const MIN_GENERATED_HABITS: usize = 5;
/// Most habits generated for a blueprint.
pub const MAX_GENERATED_HABITS: usize = 6;

/// A generated habit that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub focus_area: String,
    pub duration_minutes: u32,
}

impl HabitDraft {
    /// Turns the draft into an active habit linked to a blueprint.
    pub fn into_habit(self, user_id: Uuid, blueprint_id: Uuid) -> Habit {
        Habit::new(user_id, self.title, self.category)
            .with_blueprint(blueprint_id)
            .with_description(self.description)
            .with_focus_area(self.focus_area)
            .with_duration(self.duration_minutes)
    }
}

/// Generates the starter habits for a blueprint.
///
/// Templates whose focus area appears in the blueprint come first, otherwise
/// the table order is kept. Returns between [`MIN_GENERATED_HABITS`] and
/// [`MAX_GENERATED_HABITS`] drafts whatever the blueprint holds.
pub fn generate_habits(blueprint: &BlueprintDraft, selection: TemplateSelection) -> Vec<HabitDraft> {
    let in_blueprint = |name: &str| {
        blueprint
            .focus_areas
            .iter()
            .any(|area| area.name.trim().eq_ignore_ascii_case(name))
    };

    let mut templates: Vec<_> = HABITS.iter().collect();
    // Stable: false sorts before true, so matches lead.
    templates.sort_by_key(|t| !in_blueprint(t.focus_area));

    let extra = selection.pick(
        blueprint.focus_areas.len(),
        MAX_GENERATED_HABITS - MIN_GENERATED_HABITS + 1,
    );
    let count = MIN_GENERATED_HABITS + extra;

    templates
        .into_iter()
        .take(count)
        .map(|t| HabitDraft {
            title: t.title.to_string(),
            description: t.description.to_string(),
            category: t.category.to_string(),
            focus_area: t.focus_area.to_string(),
            duration_minutes: t.duration_minutes,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use entities::FocusArea;

    use super::*;
    use crate::generate_blueprint;

    fn draft_with(areas: &[&str]) -> BlueprintDraft {
        BlueprintDraft {
            identity_goal: "goal".to_string(),
            current_state: "state".to_string(),
            focus_areas: areas.iter().map(|n| FocusArea::new(*n, "", 3)).collect(),
        }
    }

    #[test]
    fn test_count_within_bounds() {
        for areas in [vec![], vec!["Mindfulness"], vec!["a", "b", "c", "d", "e"]] {
            for selection in [
                TemplateSelection::Modulo,
                TemplateSelection::Seeded(1),
                TemplateSelection::Seeded(99),
            ] {
                let habits = generate_habits(&draft_with(&areas), selection);
                assert!(habits.len() >= MIN_GENERATED_HABITS);
                assert!(habits.len() <= MAX_GENERATED_HABITS);
            }
        }
    }

    #[test]
    fn test_modulo_count_follows_focus_areas() {
        assert_eq!(generate_habits(&draft_with(&["a", "b"]), TemplateSelection::Modulo).len(), 5);
        assert_eq!(generate_habits(&draft_with(&["a"]), TemplateSelection::Modulo).len(), 6);
    }

    #[test]
    fn test_matching_focus_areas_first() {
        let habits = generate_habits(
            &draft_with(&["Relationships", "physical health"]),
            TemplateSelection::Modulo,
        );
        assert_eq!(habits[0].title, "Exercise Session");
        assert_eq!(habits[1].title, "Connect with Others");
        assert_eq!(habits[2].title, "Morning Meditation");
    }

    #[test]
    fn test_generated_blueprint_yields_habits() {
        let blueprint =
            generate_blueprint(&["a".to_string(), "b".to_string()], TemplateSelection::Modulo)
                .unwrap();
        let habits = generate_habits(&blueprint, TemplateSelection::Modulo);
        assert_eq!(habits.len(), 6);
        // Only these two match the focus areas of template 2.
        assert_eq!(habits[0].title, "Exercise Session");
        assert_eq!(habits[1].title, "Read for Growth");

        let user_id = Uuid::new_v4();
        let blueprint_id = Uuid::new_v4();
        let habit = habits[0].clone().into_habit(user_id, blueprint_id);
        assert_eq!(habit.blueprint_id, Some(blueprint_id));
        assert_eq!(habit.duration_minutes, Some(30));
        assert!(habit.is_active);
    }
}
