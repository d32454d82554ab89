pub mod chat;
pub mod intake;
pub mod notifier;

pub use chat::ChatService;
pub use intake::{IntakeOutcome, IntakePipeline};
pub use notifier::Notifier;
