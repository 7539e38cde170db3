//! Prompt domain
//!
//! Templates and the assembler that turns a session history plus a new turn
//! into the message list sent to the completion provider.

mod assembler;
mod template;

pub use assembler::{PromptAssembler, UserTurn};
pub use template::PromptTemplate;
