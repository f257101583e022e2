//! Constructs detectables and assembles them into the default rule set with
//! yield relations, nesting flags, and name/version priorities.

use crate::cargo::CargoLockDetectable;
use crate::gomod::{GoModCliDetectable, GoModDetectable};
use crate::gradle::GradleBuildDetectable;
use crate::maven::PomXmlDetectable;
use crate::npm::{NpmCliDetectable, PackageJsonDetectable, PackageLockDetectable};
use crate::pip::RequirementsTxtDetectable;
use bomscan_core::executable::ExecutableResolver;
use bomscan_detector::{
    Detectable, DetectableEnvironment, DetectorRuleSet, DetectorType, FilePredicate,
};
use std::sync::Arc;

/// Creates detectable instances, carrying the shared pieces (currently the
/// executable resolver) they need beyond their environment.
pub struct DetectableFactory {
    executable_resolver: Arc<dyn ExecutableResolver>,
}

impl DetectableFactory {
    pub fn new(executable_resolver: Arc<dyn ExecutableResolver>) -> Self {
        Self {
            executable_resolver,
        }
    }

    pub fn package_json(&self, environment: DetectableEnvironment) -> Box<dyn Detectable> {
        Box::new(PackageJsonDetectable::new(environment))
    }

    pub fn package_lock(&self, environment: DetectableEnvironment) -> Box<dyn Detectable> {
        Box::new(PackageLockDetectable::new(environment))
    }

    pub fn npm_cli(&self, environment: DetectableEnvironment) -> Box<dyn Detectable> {
        Box::new(NpmCliDetectable::new(
            environment,
            self.executable_resolver.clone(),
        ))
    }

    pub fn pom_xml(&self, environment: DetectableEnvironment) -> Box<dyn Detectable> {
        Box::new(PomXmlDetectable::new(environment))
    }

    pub fn cargo_lock(&self, environment: DetectableEnvironment) -> Box<dyn Detectable> {
        Box::new(CargoLockDetectable::new(environment))
    }

    pub fn requirements_txt(&self, environment: DetectableEnvironment) -> Box<dyn Detectable> {
        Box::new(RequirementsTxtDetectable::new(environment))
    }

    pub fn go_mod(&self, environment: DetectableEnvironment) -> Box<dyn Detectable> {
        Box::new(GoModDetectable::new(environment))
    }

    pub fn go_mod_cli(&self, environment: DetectableEnvironment) -> Box<dyn Detectable> {
        Box::new(GoModCliDetectable::new(
            environment,
            self.executable_resolver.clone(),
        ))
    }

    pub fn gradle_build(&self, environment: DetectableEnvironment) -> Box<dyn Detectable> {
        Box::new(GradleBuildDetectable::new(environment))
    }
}

/// Builds the default rule set. CLI-invoking detectables are registered only
/// when `include_cli_detectables` is set; without them the parse-based
/// detectables carry each ecosystem on their own.
pub fn create_rules(
    factory: &Arc<DetectableFactory>,
    include_cli_detectables: bool,
) -> DetectorRuleSet {
    let mut builder = DetectorRuleSet::builder();

    let f = factory.clone();
    let package_lock = builder.add_detector(
        DetectorType::Npm,
        "Package Lock",
        FilePredicate::name("package-lock.json"),
        Box::new(move |env| f.package_lock(env)),
    );
    builder.name_version_priority(package_lock, 5);

    let f = factory.clone();
    let package_json = builder.add_detector(
        DetectorType::Npm,
        "Package Json Parse",
        FilePredicate::name("package.json"),
        Box::new(move |env| f.package_json(env)),
    );
    builder.name_version_priority(package_json, 4);
    builder.yield_to(package_json, package_lock);

    if include_cli_detectables {
        let f = factory.clone();
        let npm_cli = builder.add_detector(
            DetectorType::Npm,
            "Npm Cli",
            FilePredicate::name("package.json"),
            Box::new(move |env| f.npm_cli(env)),
        );
        builder.name_version_priority(npm_cli, 6);
        builder.yield_to(package_json, npm_cli);
        builder.yield_to(package_lock, npm_cli);
    }

    let f = factory.clone();
    let pom_xml = builder.add_detector(
        DetectorType::Maven,
        "Pom Xml",
        FilePredicate::name("pom.xml"),
        Box::new(move |env| f.pom_xml(env)),
    );
    builder.not_nestable(pom_xml);
    builder.name_version_priority(pom_xml, 8);

    let f = factory.clone();
    let gradle = builder.add_detector(
        DetectorType::Gradle,
        "Gradle Build",
        FilePredicate::any_of(vec![
            FilePredicate::name("build.gradle"),
            FilePredicate::name("build.gradle.kts"),
        ]),
        Box::new(move |env| f.gradle_build(env)),
    );
    builder.not_nestable(gradle);
    builder.name_version_priority(gradle, 7);

    let f = factory.clone();
    let cargo_lock = builder.add_detector(
        DetectorType::Cargo,
        "Cargo Lock",
        FilePredicate::name("Cargo.lock"),
        Box::new(move |env| f.cargo_lock(env)),
    );
    builder.name_version_priority(cargo_lock, 6);

    let f = factory.clone();
    let requirements = builder.add_detector(
        DetectorType::Pip,
        "Requirements Txt",
        FilePredicate::name("requirements.txt"),
        Box::new(move |env| f.requirements_txt(env)),
    );
    builder.name_version_priority(requirements, 1);

    let f = factory.clone();
    let go_mod = builder.add_detector(
        DetectorType::GoMod,
        "Go Mod Parse",
        FilePredicate::name("go.mod"),
        Box::new(move |env| f.go_mod(env)),
    );
    builder.name_version_priority(go_mod, 5);

    if include_cli_detectables {
        let f = factory.clone();
        let go_cli = builder.add_detector(
            DetectorType::GoMod,
            "Go Mod Cli",
            FilePredicate::name("go.mod"),
            Box::new(move |env| f.go_mod_cli(env)),
        );
        builder.name_version_priority(go_cli, 6);
        builder.yield_to(go_mod, go_cli);
    }

    builder.build()
}
