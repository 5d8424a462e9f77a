//! The conversation side of Leadline.
//!
//! The external voice runtime owns speech, turn-taking, and reasoning. For each
//! conversation it:
//!
//! 1. **Starts** a [`LeadSession`] (fresh, empty lead profile)
//! 2. **Prompts** its language model with the [`Instructions`]
//! 3. **Calls tools** through the session as facts come up
//! 4. **Submits** the lead when the prospect wraps up, and speaks the result
//! 5. **Ends** the session; nothing is saved unless step 4 happened

pub mod instructions;
pub mod session;

pub use instructions::Instructions;
pub use session::LeadSession;
