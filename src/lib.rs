pub mod config;
pub mod driver;
pub mod history;
pub mod kernel;
pub mod services;

pub use config::GatewayConfig;
pub use driver::WizardDriver;
pub use history::{HistoryEntry, HistoryStore, InMemoryHistoryStore};
pub use kernel::{SideEffect, Step, UrgeWizard, WizardError, WizardEvent, WizardState};
pub use services::actions::ActionResult;
pub use services::llm::{LlmGateway, TextGenerator};
