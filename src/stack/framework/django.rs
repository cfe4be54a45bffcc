//! Django framework for Python

use super::*;

pub struct DjangoFramework;

impl Framework for DjangoFramework {
    fn id(&self) -> AppType {
        AppType::Django
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Python
    }

    fn dependency_patterns(&self) -> Vec<DependencyPattern> {
        vec![DependencyPattern {
            pattern_type: DependencyPatternType::PypiToken,
            pattern: "django",
        }]
    }
}
