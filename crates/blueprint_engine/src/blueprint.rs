//! Blueprint generation and refinement.

use entities::{Blueprint, FocusArea};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, EngineResult, TemplateSelection, templates::BLUEPRINTS};

/// A generated blueprint that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlueprintDraft {
    pub identity_goal: String,
    pub current_state: String,
    pub focus_areas: Vec<FocusArea>,
}

impl BlueprintDraft {
    /// Turns the draft into a blueprint owned by `user_id`.
    pub fn into_blueprint(self, user_id: Uuid) -> Blueprint {
        Blueprint::new(
            user_id,
            self.identity_goal,
            self.current_state,
            self.focus_areas,
        )
    }

    /// Applies the draft's content to an existing blueprint.
    pub fn apply_to(self, blueprint: Blueprint) -> Blueprint {
        Blueprint {
            identity_goal: self.identity_goal,
            current_state: self.current_state,
            focus_areas: self.focus_areas,
            ..blueprint
        }
    }
}

impl From<&Blueprint> for BlueprintDraft {
    fn from(blueprint: &Blueprint) -> Self {
        Self {
            identity_goal: blueprint.identity_goal.clone(),
            current_state: blueprint.current_state.clone(),
            focus_areas: blueprint.focus_areas.clone(),
        }
    }
}

/// Generates a blueprint from onboarding answers.
///
/// The template is picked from the number of answers; their content is not
/// analysed.
pub fn generate_blueprint(
    responses: &[String],
    selection: TemplateSelection,
) -> EngineResult<BlueprintDraft> {
    if responses.is_empty() {
        return Err(EngineError::validation("responses must not be empty"));
    }

    let index = selection.pick(responses.len(), BLUEPRINTS.len());
    let template = &BLUEPRINTS[index];
    tracing::debug!(index, responses = responses.len(), "Selected blueprint template");

    Ok(BlueprintDraft {
        identity_goal: template.identity_goal.to_string(),
        current_state: template.current_state.to_string(),
        focus_areas: template
            .focus_areas
            .iter()
            .map(|area| FocusArea::new(area.name, area.description, area.priority))
            .collect(),
    })
}

/// Changes requested when refining a blueprint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlueprintRefinement {
    /// Free-text feedback. Recorded but not interpreted.
    #[serde(default)]
    pub feedback: Option<String>,
    /// Replacement identity goal.
    #[serde(default)]
    pub new_goals: Option<String>,
}

/// Refines a blueprint: a non-blank `new_goals` replaces the identity goal and
/// each focus-area priority moves one step up or down, staying in `[1, 5]`.
pub fn refine_blueprint(
    draft: BlueprintDraft,
    refinement: &BlueprintRefinement,
    selection: TemplateSelection,
) -> BlueprintDraft {
    let identity_goal = refinement
        .new_goals
        .as_deref()
        .map(str::trim)
        .filter(|goal| !goal.is_empty())
        .map(str::to_string)
        .unwrap_or(draft.identity_goal);

    let focus_areas = draft
        .focus_areas
        .into_iter()
        .enumerate()
        .map(|(i, area)| FocusArea {
            priority: area.priority.nudged(selection.nudge(i)),
            ..area
        })
        .collect();

    BlueprintDraft {
        identity_goal,
        current_state: draft.current_state,
        focus_areas,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("answer {i}")).collect()
    }

    #[test]
    fn test_template_by_response_count() {
        let draft = generate_blueprint(&answers(2), TemplateSelection::Modulo).unwrap();
        assert_eq!(draft.identity_goal, BLUEPRINTS[2].identity_goal);
        assert_eq!(draft.current_state, BLUEPRINTS[2].current_state);
        assert_eq!(draft.focus_areas.len(), 5);
        assert_eq!(draft.focus_areas[0].name, "Authentic Living");

        let draft = generate_blueprint(&answers(4), TemplateSelection::Modulo).unwrap();
        assert_eq!(draft.identity_goal, BLUEPRINTS[1].identity_goal);
    }

    #[test]
    fn test_empty_responses_rejected() {
        let result = generate_blueprint(&[], TemplateSelection::Modulo);
        assert!(matches!(result, Err(EngineError::Validation(_))));
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = generate_blueprint(&answers(5), TemplateSelection::Seeded(9)).unwrap();
        let b = generate_blueprint(&answers(5), TemplateSelection::Seeded(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_refine_nudges_and_clamps() {
        let draft = BlueprintDraft {
            identity_goal: "old".to_string(),
            current_state: "state".to_string(),
            focus_areas: vec![
                FocusArea::new("a", "", 5),
                FocusArea::new("b", "", 1),
                FocusArea::new("c", "", 3),
            ],
        };
        let refined = refine_blueprint(
            draft,
            &BlueprintRefinement {
                new_goals: Some("  new goal ".to_string()),
                ..Default::default()
            },
            TemplateSelection::Modulo,
        );

        assert_eq!(refined.identity_goal, "new goal");
        let priorities: Vec<u8> = refined
            .focus_areas
            .iter()
            .map(|a| a.priority.value())
            .collect();
        // Modulo nudges up, down, up.
        assert_eq!(priorities, vec![5, 1, 4]);
    }

    #[test]
    fn test_refine_keeps_goal_when_blank() {
        let draft = generate_blueprint(&answers(1), TemplateSelection::Modulo).unwrap();
        let goal = draft.identity_goal.clone();
        let refined = refine_blueprint(
            draft,
            &BlueprintRefinement {
                new_goals: Some("   ".to_string()),
                ..Default::default()
            },
            TemplateSelection::Seeded(3),
        );
        assert_eq!(refined.identity_goal, goal);
        assert!(refined
            .focus_areas
            .iter()
            .all(|a| (1..=5).contains(&a.priority.value())));
    }
}
