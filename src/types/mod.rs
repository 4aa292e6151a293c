//! Shared types for the model catalog, capability resolution, and routing.

pub mod capability;
pub mod model;
pub mod request;

pub use capability::{Capability, OutputType};
pub use model::{ModelDefaults, ModelDescriptor, ProviderId};
pub use request::{
    ChatResponse, InvocationNeeds, Message, ReasoningConfig, ReasoningEffort, ResponseFormat, Role,
    ToolSpec,
};
