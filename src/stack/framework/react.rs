//! React single-page applications

use super::*;

pub struct ReactFramework;

impl Framework for ReactFramework {
    fn id(&self) -> AppType {
        AppType::React
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Node
    }

    fn dependency_patterns(&self) -> Vec<DependencyPattern> {
        vec![
            DependencyPattern {
                pattern_type: DependencyPatternType::NpmPackage,
                pattern: "react",
            },
            DependencyPattern {
                pattern_type: DependencyPatternType::NpmPackage,
                pattern: "react-dom",
            },
        ]
    }
}
