//! Onboarding assessment questions.

use entities::{AssessmentType, Category};
use serde::{Deserialize, Serialize};

/// How a question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Text,
    Slider,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentQuestion {
    pub id: String,
    pub question: String,
    pub category: Category,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u8>,
}

/// Returns one question per category, in category order.
pub fn assessment_questions(set: AssessmentType) -> Vec<AssessmentQuestion> {
    Category::ALL
        .into_iter()
        .map(|category| match set {
            AssessmentType::IdealSelf => AssessmentQuestion {
                id: format!("{category}_goal"),
                question: ideal_self_prompt(category).to_string(),
                category,
                kind: QuestionKind::Text,
                min: None,
                max: None,
            },
            AssessmentType::CurrentSelf => AssessmentQuestion {
                id: format!("{category}_current"),
                question: current_self_prompt(category).to_string(),
                category,
                kind: QuestionKind::Slider,
                min: Some(1),
                max: Some(100),
            },
        })
        .collect()
}

fn ideal_self_prompt(category: Category) -> &'static str {
    match category {
        Category::Fitness => {
            "Describe your ideal fitness level and physical health. What does being physically at your best look like to you?"
        }
        Category::Career => {
            "What does your ideal career look like? Describe your dream job, work environment, and professional achievements."
        }
        Category::Relationships => {
            "How do you envision your ideal relationships? What kind of connections do you want with family, friends, and romantic partners?"
        }
        Category::Learning => {
            "What knowledge and skills do you want to develop? What subjects fascinate you and how do you want to grow intellectually?"
        }
        Category::Wellness => {
            "Describe your ideal state of mental and emotional wellness. How do you want to feel on a daily basis?"
        }
    }
}

fn current_self_prompt(category: Category) -> &'static str {
    match category {
        Category::Fitness => "Rate your current fitness level and physical health (1-100)",
        Category::Career => {
            "Rate your current career satisfaction and professional fulfillment (1-100)"
        }
        Category::Relationships => {
            "Rate your current relationship satisfaction and social connections (1-100)"
        }
        Category::Learning => "Rate your current learning and personal growth (1-100)",
        Category::Wellness => "Rate your current mental and emotional wellness (1-100)",
    }
}
