crate::define_id_enum! {
    /// Target cloud provider. AWS is the only provider with every deployment
    /// mode fully modeled.
    CloudProvider {
        Aws => "aws" : "AWS" | "amazon",
        Gcp => "gcp" : "GCP" | "google",
        Azure => "azure" : "Azure" | "microsoft",
    }
}

impl Default for CloudProvider {
    fn default() -> Self {
        CloudProvider::Aws
    }
}

crate::define_id_enum! {
    /// Execution shape of the deployed application
    DeploymentMode {
        Container => "container" : "Container" | "docker",
        Serverless => "serverless" : "Serverless" | "lambda",
        Vm => "vm" : "VM" | "virtual machine",
    }
}

impl Default for DeploymentMode {
    fn default() -> Self {
        DeploymentMode::Container
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(CloudProvider::default(), CloudProvider::Aws);
        assert_eq!(DeploymentMode::default(), DeploymentMode::Container);
    }

    #[test]
    fn test_display_uses_machine_name() {
        assert_eq!(CloudProvider::Gcp.to_string(), "gcp");
        assert_eq!(DeploymentMode::Vm.to_string(), "vm");
        assert_eq!(CloudProvider::Azure.name(), "Azure");
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("amazon".parse::<CloudProvider>().unwrap(), CloudProvider::Aws);
        assert_eq!("Lambda".parse::<DeploymentMode>().unwrap(), DeploymentMode::Serverless);
        assert!("kubernetes".parse::<DeploymentMode>().is_err());
    }
}
