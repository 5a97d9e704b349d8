//! Pure state transition function
//!
//! Given a session, an event and a random source, produce the next session
//! and the ordered effects that render it. No I/O happens here; pacing is
//! expressed as `Effect::Pause` for the runtime to interpret.

use super::{Effect, Event, Session, Step};
use crate::recipe::{
    compose_cocktail_name, is_negation, parse_count, parse_ingredients, select_ingredients,
    SyllableCounts,
};
use crate::script;
use rand::Rng;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_session: Session,
    pub effects: Vec<Effect>,
    /// Set when the line was rejected and the bot asked again
    pub problem: Option<InputProblem>,
}

impl TransitionResult {
    pub fn new(session: Session) -> Self {
        Self {
            new_session: session,
            effects: vec![],
            problem: None,
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }

    fn preceded_by(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        let mut ordered: Vec<Effect> = effects.into_iter().collect();
        ordered.append(&mut self.effects);
        self.effects = ordered;
        self
    }
}

/// Answers the bot corrects in place by asking again
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputProblem {
    /// A count question got something that is not an integer
    InvalidInteger,
    /// The ingredient list had no usable entries
    EmptyIngredientList,
}

impl InputProblem {
    pub fn reprompt(self) -> &'static str {
        match self {
            InputProblem::InvalidInteger => script::NOT_A_NUMBER,
            InputProblem::EmptyIngredientList => script::NO_INGREDIENTS,
        }
    }
}

/// Events the machine refuses outright
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Nothing to submit")]
    EmptyLine,
    #[error("The bot is still answering ({0}), wait for it to finish")]
    Busy(Step),
    #[error("The conversation is over, start over to make another cocktail")]
    Finished,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
pub fn transition<R: Rng + ?Sized>(
    session: &Session,
    event: Event,
    rng: &mut R,
) -> Result<TransitionResult, TransitionError> {
    match event {
        Event::Reset => Ok(TransitionResult::new(Session::new()).with_effect(
            Effect::RestartTranscript {
                greeting: script::GREETING.to_string(),
            },
        )),

        Event::ParticipantLine { text } => answer(session, &text, rng),

        Event::PacingComplete => match session.step {
            Step::ShowName => Ok(TransitionResult::new(session.at(Step::AskIngredients))
                .with_effect(Effect::system(script::ASK_INGREDIENTS))),
            Step::ShowRecipe => Ok(TransitionResult::new(session.at(Step::Done))
                .with_effect(Effect::system(script::GOOD_LUCK))),
            step => Err(TransitionError::InvalidTransition(format!(
                "pacing completed while in {step}"
            ))),
        },
    }
}

fn answer<R: Rng + ?Sized>(
    session: &Session,
    text: &str,
    rng: &mut R,
) -> Result<TransitionResult, TransitionError> {
    let line = text.trim();

    let reply = match session.step {
        step @ (Step::ShowName | Step::ShowRecipe) => return Err(TransitionError::Busy(step)),
        Step::Done => return Err(TransitionError::Finished),
        _ if line.is_empty() => return Err(TransitionError::EmptyLine),
        Step::AskAn => record_count(session, line, Step::AskA, script::ASK_A, |counts, n| {
            counts.an = n;
        }),
        Step::AskA => record_count(session, line, Step::AskUm, script::ASK_UM, |counts, n| {
            counts.a = n;
        }),
        Step::AskUm => name_cocktail(session, line, rng),
        Step::AskIngredients => collect_ingredients(session, line),
        Step::AskMoreIngredients => recommend(session, line, rng),
    };

    Ok(reply.preceded_by([
        Effect::participant(line),
        Effect::Pause(script::REPLY_DELAY),
    ]))
}

fn reprompt(session: &Session, problem: InputProblem) -> TransitionResult {
    let mut result =
        TransitionResult::new(session.clone()).with_effect(Effect::system(problem.reprompt()));
    result.problem = Some(problem);
    result
}

fn record_count(
    session: &Session,
    line: &str,
    next: Step,
    prompt: &str,
    set: fn(&mut SyllableCounts, u8),
) -> TransitionResult {
    let Some(count) = parse_count(line) else {
        return reprompt(session, InputProblem::InvalidInteger);
    };

    let mut counts = session.counts;
    set(&mut counts, count);

    TransitionResult::new(Session {
        step: next,
        counts,
        ..session.clone()
    })
    .with_effect(Effect::system(prompt))
}

fn name_cocktail<R: Rng + ?Sized>(session: &Session, line: &str, rng: &mut R) -> TransitionResult {
    let Some(um) = parse_count(line) else {
        return reprompt(session, InputProblem::InvalidInteger);
    };

    let counts = SyllableCounts {
        um,
        ..session.counts
    };
    let name = compose_cocktail_name(counts, rng);
    let acknowledgement = script::name_acknowledgement(&name);

    TransitionResult::new(Session {
        step: Step::ShowName,
        counts,
        cocktail_name: Some(name),
        ..session.clone()
    })
    .with_effects([
        Effect::system(acknowledgement),
        Effect::Pause(script::LONG_PAUSE),
        Effect::CompletePacing,
    ])
}

fn collect_ingredients(session: &Session, line: &str) -> TransitionResult {
    let ingredients = parse_ingredients(line);
    if ingredients.is_empty() {
        return reprompt(session, InputProblem::EmptyIngredientList);
    }

    TransitionResult::new(Session {
        step: Step::AskMoreIngredients,
        ingredients,
        ..session.clone()
    })
    .with_effect(Effect::system(script::ASK_MORE_INGREDIENTS))
}

fn recommend<R: Rng + ?Sized>(session: &Session, line: &str, rng: &mut R) -> TransitionResult {
    let mut ingredients = session.ingredients.clone();
    if !is_negation(line) {
        ingredients.extend(parse_ingredients(line));
    }

    let recommended = select_ingredients(&ingredients, rng);
    let name = session.cocktail_name();

    let effects = [
        Effect::system(script::ingredients_acknowledgement(name)),
        Effect::Pause(script::LONG_PAUSE),
        Effect::system(script::recommendation_lead_in(name)),
        Effect::Pause(script::SHORT_PAUSE),
        Effect::system(script::recommendation(&recommended)),
        Effect::Pause(script::SHORT_PAUSE),
        Effect::CompletePacing,
    ];

    TransitionResult::new(Session {
        step: Step::ShowRecipe,
        ingredients,
        recommended,
        ..session.clone()
    })
    .with_effects(effects)
}
