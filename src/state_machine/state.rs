//! Dialogue state types

use crate::recipe::SyllableCounts;
use serde::{Deserialize, Serialize};

/// Node of the dialogue script, in forward order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Waiting for the number of "an"s
    #[default]
    AskAn,
    /// Waiting for the number of "a"s
    AskA,
    /// Waiting for the number of "um"s
    AskUm,
    /// Announcing the cocktail name (transient)
    ShowName,
    /// Waiting for the first ingredient list
    AskIngredients,
    /// Waiting for extra ingredients or a "no"
    AskMoreIngredients,
    /// Reading out the recipe (transient)
    ShowRecipe,
    /// Conversation over, only a reset is possible
    Done,
}

impl Step {
    /// Passed through by the engine itself, no input is awaited
    pub fn is_transient(self) -> bool {
        matches!(self, Step::ShowName | Step::ShowRecipe)
    }

    pub fn is_terminal(self) -> bool {
        self == Step::Done
    }

    /// Whether the host should let the participant type
    pub fn accepts_input(self) -> bool {
        !self.is_transient() && !self.is_terminal()
    }

    /// Whether all three syllable counts have been collected by this point
    pub fn has_cocktail_name(self) -> bool {
        self >= Step::ShowName
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Step::AskAn => "ask_an",
            Step::AskA => "ask_a",
            Step::AskUm => "ask_um",
            Step::ShowName => "show_name",
            Step::AskIngredients => "ask_ingredients",
            Step::AskMoreIngredients => "ask_more_ingredients",
            Step::ShowRecipe => "show_recipe",
            Step::Done => "done",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything one conversation has collected so far.
///
/// Transitions never mutate a `Session` in place; they build the next one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Session {
    pub step: Step,
    pub counts: SyllableCounts,
    /// Set exactly when `step.has_cocktail_name()`
    pub cocktail_name: Option<String>,
    /// Participant-supplied ingredients, repeats allowed
    pub ingredients: Vec<String>,
    /// The final pick read out in `show_recipe`
    pub recommended: Vec<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accepts_input(&self) -> bool {
        self.step.accepts_input()
    }

    /// The derived name, or an empty string before it exists
    pub fn cocktail_name(&self) -> &str {
        self.cocktail_name.as_deref().unwrap_or_default()
    }

    pub(crate) fn at(&self, step: Step) -> Self {
        Self {
            step,
            ..self.clone()
        }
    }
}
