//! Prompt templates for the guidance generator.

pub mod dynamic_guidance;

pub use dynamic_guidance::{dynamic_guidance_user_prompt, DYNAMIC_GUIDANCE_SYSTEM};
