//! Closed identifier sets shared by every stage.
//!
//! `AppType`, `CloudProvider` and `DeploymentMode` are the only values an
//! `AppConfig` may carry; free text never survives past intent extraction.
//! The default-port table and the framework detection order live here so
//! that every precedence rule can be reviewed in one place.

#[macro_use]
pub mod id_enum_macro;

pub mod app_type;
pub mod cloud_provider;
pub mod framework;

pub use app_type::{AppType, Ecosystem, DEFAULT_PORTS};
pub use cloud_provider::{CloudProvider, DeploymentMode};
pub use framework::{DependencyPattern, DependencyPatternType, Framework, FrameworkRegistry};
