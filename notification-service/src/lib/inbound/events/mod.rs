pub mod consumer;
pub mod messages;

pub use consumer::RegistrationEventsConsumer;
