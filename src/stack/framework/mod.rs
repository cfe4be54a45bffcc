//! Framework definitions
//!
//! Frameworks are detected deterministically from the dependency names a
//! manifest declares. The registry keeps them in a fixed priority order so
//! that a manifest listing several frameworks always resolves the same way.

use crate::stack::{AppType, Ecosystem};

/// Dependency pattern for framework detection
#[derive(Debug, Clone)]
pub struct DependencyPattern {
    pub pattern_type: DependencyPatternType,
    pub pattern: &'static str,
}

/// Type of dependency pattern matching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyPatternType {
    /// Case-insensitive token anywhere in a requirement name (e.g. "flask" in "Flask-Cors")
    PypiToken,
    /// Exact npm package name (e.g. "express")
    NpmPackage,
}

impl DependencyPattern {
    pub fn matches(&self, dependency: &str) -> bool {
        match self.pattern_type {
            DependencyPatternType::PypiToken => dependency.to_lowercase().contains(self.pattern),
            DependencyPatternType::NpmPackage => dependency == self.pattern,
        }
    }
}

pub trait Framework: Send + Sync {
    fn id(&self) -> AppType;

    fn ecosystem(&self) -> Ecosystem;

    fn dependency_patterns(&self) -> Vec<DependencyPattern>;

    fn matches_any(&self, dependencies: &[String]) -> bool {
        let patterns = self.dependency_patterns();
        dependencies
            .iter()
            .any(|dep| patterns.iter().any(|pattern| pattern.matches(dep)))
    }
}

pub mod django;
pub mod express;
pub mod flask;
pub mod react;

pub use django::DjangoFramework;
pub use express::ExpressFramework;
pub use flask::FlaskFramework;
pub use react::ReactFramework;

/// Ordered framework table; earlier entries win when several match.
pub struct FrameworkRegistry {
    frameworks: Vec<Box<dyn Framework>>,
}

impl FrameworkRegistry {
    pub fn with_defaults() -> Self {
        Self {
            frameworks: vec![
                Box::new(DjangoFramework),
                Box::new(FlaskFramework),
                Box::new(ExpressFramework),
                Box::new(ReactFramework),
            ],
        }
    }

    /// Detection order, exposed so tests can pin it.
    pub fn order(&self) -> Vec<AppType> {
        self.frameworks.iter().map(|f| f.id()).collect()
    }

    /// First framework of `ecosystem` whose patterns match any dependency.
    pub fn detect(&self, ecosystem: Ecosystem, dependencies: &[String]) -> Option<AppType> {
        self.frameworks
            .iter()
            .filter(|f| f.ecosystem() == ecosystem)
            .find(|f| f.matches_any(dependencies))
            .map(|f| f.id())
    }
}

impl Default for FrameworkRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
