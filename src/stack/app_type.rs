crate::define_id_enum! {
    /// Application framework the bundle is generated for
    AppType {
        Flask => "flask" : "Flask",
        Django => "django" : "Django",
        NodeJs => "nodejs" : "Node.js" | "node",
        Express => "express" : "Express",
        React => "react" : "React",
        Generic => "generic" : "Generic",
    }
}

/// Language ecosystem an application type belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    Python,
    Node,
}

impl Ecosystem {
    /// Dependency manifest whose presence signals the ecosystem.
    pub fn manifest(&self) -> &'static str {
        match self {
            Ecosystem::Python => "requirements.txt",
            Ecosystem::Node => "package.json",
        }
    }

    /// Well-known entry-point files scanned for a listening port, most likely first.
    pub fn entrypoints(&self) -> &'static [&'static str] {
        match self {
            Ecosystem::Python => &["app.py", "main.py", "wsgi.py", "run.py", "server.py"],
            Ecosystem::Node => &["server.js", "index.js", "app.js", "main.js"],
        }
    }
}

/// Port a freshly extracted configuration binds before any repository evidence.
pub const DEFAULT_PORTS: &[(AppType, u16)] = &[
    (AppType::Flask, 5000),
    (AppType::Django, 5000),
    (AppType::NodeJs, 3000),
    (AppType::Express, 3000),
    (AppType::React, 3000),
    (AppType::Generic, 80),
];

impl AppType {
    pub fn default_port(&self) -> u16 {
        DEFAULT_PORTS
            .iter()
            .find(|(app_type, _)| app_type == self)
            .map(|(_, port)| *port)
            .unwrap_or(80)
    }

    pub fn ecosystem(&self) -> Option<Ecosystem> {
        match self {
            AppType::Flask | AppType::Django => Some(Ecosystem::Python),
            AppType::NodeJs | AppType::Express | AppType::React => Some(Ecosystem::Node),
            AppType::Generic => None,
        }
    }

    /// `nodejs` is the ecosystem-level guess for any Node manifest; only
    /// `express` and `react` narrow it further.
    pub fn is_refined_by(&self, detected: AppType) -> bool {
        match self {
            AppType::Generic => detected != AppType::Generic,
            AppType::NodeJs => matches!(detected, AppType::Express | AppType::React),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ports_cover_every_variant() {
        for app_type in AppType::all_variants() {
            assert!(
                DEFAULT_PORTS.iter().any(|(t, _)| t == app_type),
                "missing default port for {}",
                app_type
            );
        }
    }

    #[test]
    fn test_default_port_values() {
        assert_eq!(AppType::Flask.default_port(), 5000);
        assert_eq!(AppType::Django.default_port(), 5000);
        assert_eq!(AppType::NodeJs.default_port(), 3000);
        assert_eq!(AppType::Express.default_port(), 3000);
        assert_eq!(AppType::Generic.default_port(), 80);
    }

    #[test]
    fn test_app_type_serialization() {
        assert_eq!(serde_json::to_string(&AppType::NodeJs).unwrap(), "\"nodejs\"");
        let parsed: AppType = serde_json::from_str("\"express\"").unwrap();
        assert_eq!(parsed, AppType::Express);
    }

    #[test]
    fn test_unknown_app_type_is_rejected() {
        let parsed: Result<AppType, _> = serde_json::from_str("\"rails\"");
        assert!(parsed.is_err());
        assert!("rails".parse::<AppType>().is_err());
    }

    #[test]
    fn test_from_name_accepts_display_and_alias() {
        assert_eq!(AppType::from_name("Node.js"), Some(AppType::NodeJs));
        assert_eq!(AppType::from_name("node"), Some(AppType::NodeJs));
        assert_eq!(AppType::from_name("FLASK"), Some(AppType::Flask));
    }

    #[test]
    fn test_refinement_rules() {
        assert!(AppType::Generic.is_refined_by(AppType::Flask));
        assert!(AppType::NodeJs.is_refined_by(AppType::Express));
        assert!(AppType::NodeJs.is_refined_by(AppType::React));
        assert!(!AppType::NodeJs.is_refined_by(AppType::Flask));
        assert!(!AppType::Django.is_refined_by(AppType::Flask));
        assert!(!AppType::Express.is_refined_by(AppType::React));
        assert!(!AppType::Generic.is_refined_by(AppType::Generic));
    }
}
