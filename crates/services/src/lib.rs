#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod registry;
pub mod study;

pub use flashdeck_core::Clock;

pub use app_services::AppServices;
pub use error::{RegistryError, SessionError};
pub use registry::{Registry, RemovalRequest};
pub use study::{CardView, MarkResult, StudyService, StudyView};
