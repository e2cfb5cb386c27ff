pub mod event_registry;

pub use event_registry::EventRegistry;
