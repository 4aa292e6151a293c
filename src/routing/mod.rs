//! Provider routing: resolve a model id to an upstream provider and a
//! lazy invocable handle.

mod handle;
mod provider;
mod router;

pub use handle::ModelHandle;
pub use provider::{ApiProvider, ModelProvider, PassthroughProvider, SharedProvider};
pub use router::{ProviderRouter, ProviderRouterBuilder};
