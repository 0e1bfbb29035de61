//! Client-side resume editing: the draft store mutated by explicit commands,
//! the section navigator, and the session that saves sections through the
//! resume gateway.

pub mod command;
pub mod gateway;
pub mod navigator;
pub mod session;
pub mod store;

pub use command::DraftCommand;
pub use gateway::{GatewayConfig, GatewayError, HttpResumeGateway, ResumeGateway};
pub use navigator::SectionNavigator;
pub use session::{EditorSession, Notice};
pub use store::{DraftError, DraftStore};
