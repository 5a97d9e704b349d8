//! Fixed bot lines and conversational pacing
//!
//! Everything the recipe bot says lives here so the transition function only
//! decides *which* line to emit.

use std::time::Duration;

pub const GREETING: &str = "Welcome to the an I Cocktail Recipe Generator! How many \"an\"s are in the name of the cocktail you'd like? (enter any integer)";

pub const ASK_A: &str =
    "How many \"a\"s are in the name of the cocktail you'd like? (enter any integer)";

pub const ASK_UM: &str =
    "How many \"um\"s are in the name of the cocktail you'd like? (enter any integer)";

pub const NOT_A_NUMBER: &str = "That's not a number! Please enter an integer.";

pub const ASK_INGREDIENTS: &str = "What ingredients do you have? (list them separated by commas)";

pub const NO_INGREDIENTS: &str = "Please enter at least one ingredient, separated by commas.";

pub const ASK_MORE_INGREDIENTS: &str =
    "Any more ingredients? (comma separated, or just say \"no\")";

pub const GOOD_LUCK: &str = "Good luck.";

/// Delay between the participant's line and the bot's reply
pub const REPLY_DELAY: Duration = Duration::from_millis(300);

/// Delay after the bot's first line of a multi-line answer
pub const LONG_PAUSE: Duration = Duration::from_millis(500);

/// Delay between the remaining lines of a multi-line answer
pub const SHORT_PAUSE: Duration = Duration::from_millis(300);

pub fn name_acknowledgement(cocktail_name: &str) -> String {
    format!(
        "Ok, copy that. It sounds like you want {cocktail_name}. Let's see what you have for ingredients and I bet we can figure out how to cook up {cocktail_name}."
    )
}

pub fn ingredients_acknowledgement(cocktail_name: &str) -> String {
    format!("Ok sweet. These ingredients actually set you up perfectly for making {cocktail_name}.")
}

pub fn recommendation_lead_in(cocktail_name: &str) -> String {
    format!(
        "Based on the ingredients that you have available, I'd recommend using the following to make {cocktail_name}:"
    )
}

pub fn recommendation(ingredients: &[String]) -> String {
    ingredients.join(", ")
}
