// ABOUTME: Property tests for deployment and deployer naming.
// ABOUTME: Names must be deterministic and distinct per version.

use deploylog::types::{ConfigName, deployer_name, deployment_name, version_of};
use proptest::prelude::*;

proptest! {
    #[test]
    fn deployment_name_is_deterministic(
        config in "[a-z][a-z0-9-]{0,20}",
        version in 1i64..100_000,
    ) {
        let config = ConfigName::new(config);
        prop_assert_eq!(deployment_name(&config, version), deployment_name(&config, version));
    }

    #[test]
    fn different_versions_give_different_names(
        config in "[a-z][a-z0-9-]{0,20}",
        a in 1i64..100_000,
        b in 1i64..100_000,
    ) {
        prop_assume!(a != b);
        let config = ConfigName::new(config);
        prop_assert_ne!(deployment_name(&config, a), deployment_name(&config, b));
    }

    #[test]
    fn version_is_recoverable(config in "[a-z][a-z0-9-]{0,20}", version in 1i64..100_000) {
        let name = deployment_name(&ConfigName::new(config), version);
        prop_assert_eq!(version_of(&name), Some(version));
    }

    #[test]
    fn deployer_is_named_after_its_deployment(
        config in "[a-z][a-z0-9-]{0,20}",
        version in 1i64..100_000,
    ) {
        let deployment = deployment_name(&ConfigName::new(config), version);
        let deployer = deployer_name(&deployment);
        prop_assert!(deployer.as_str().starts_with(deployment.as_str()));
        prop_assert_ne!(deployer.as_str(), deployment.as_str());
    }
}
