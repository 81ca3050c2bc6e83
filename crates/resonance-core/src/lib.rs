pub mod ai;
pub mod config;
pub mod mode;
pub mod persona;
pub mod session;

// Re-export main types for convenience
pub use ai::{GeminiClient, GatewayError, ModelGateway, Reply, CONNECTION_FALLBACK, NO_CONTENT_FALLBACK};
pub use config::Config;
pub use mode::Mode;
pub use persona::{compose, ComposedPrompt, SYSTEM_INSTRUCTION};
pub use session::{run_request, Action, Request, Session, Ticket};
