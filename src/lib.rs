//! an I Cocktail Recipe Generator
//!
//! A scripted chat bot that asks how many "an", "a" and "um" syllables the
//! participant wants, shuffles them into a cocktail name, and "recommends"
//! a pick from the ingredients they list.

pub mod config;
pub mod recipe;
pub mod runtime;
pub mod script;
pub mod state_machine;
pub mod transcript;
