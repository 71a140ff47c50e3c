pub mod descriptors;
pub mod message_builder;

pub use descriptors::{describe_answers, describe_questions};
pub use message_builder::MessageBuilder;
