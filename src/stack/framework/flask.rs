//! Flask framework for Python

use super::*;

pub struct FlaskFramework;

impl Framework for FlaskFramework {
    fn id(&self) -> AppType {
        AppType::Flask
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Python
    }

    fn dependency_patterns(&self) -> Vec<DependencyPattern> {
        vec![DependencyPattern {
            pattern_type: DependencyPatternType::PypiToken,
            pattern: "flask",
        }]
    }
}
