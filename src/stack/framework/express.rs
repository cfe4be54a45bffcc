//! Express framework for Node.js

use super::*;

pub struct ExpressFramework;

impl Framework for ExpressFramework {
    fn id(&self) -> AppType {
        AppType::Express
    }

    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Node
    }

    fn dependency_patterns(&self) -> Vec<DependencyPattern> {
        vec![DependencyPattern {
            pattern_type: DependencyPatternType::NpmPackage,
            pattern: "express",
        }]
    }
}
