//! The urge-logging wizard.
//!
//! The kernel never awaits, sleeps or touches the network. It consumes
//! `WizardEvent`s and hands back `SideEffect`s; a driver executes those and
//! feeds results (gateway replies, timer ticks) back in as further events.

pub mod countdown;
pub mod event;
pub mod state;
pub mod types;
pub mod wizard;

pub use event::{RequestId, SideEffect, WizardEvent};
pub use state::{Step, WizardState};
pub use wizard::{UrgeWizard, WizardError};
