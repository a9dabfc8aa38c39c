//! Facts discovered by scanning fragment classes.

use anyhow::{Result, anyhow, ensure};
use descriptor_merge::{
    Annotation, Fragment, MappingTarget, MergeError, MergeOptions, ModuleDescriptor, ModuleInputs,
    ScannedClass, StaticDiscovery, merge_module,
};
use rstest::{fixture, rstest};
use test_helpers::scan::{FailingDiscovery, annotated_filter, annotated_listener, annotated_servlet};

const JAR: &str = "WEB-INF/lib/web.jar";

#[fixture]
fn inputs() -> ModuleInputs {
    ModuleInputs::new(ModuleDescriptor::default()).with_fragment(Fragment::classes_only(JAR))
}

#[rstest]
fn marked_classes_become_components(inputs: ModuleInputs) -> Result<()> {
    let discovery = StaticDiscovery::default()
        .with_class("com.acme.Hello", annotated_servlet(JAR, Some("hello"), &["/hello"]))
        .with_class("com.acme.Audit", annotated_filter(JAR, None, &["/*"]))
        .with_class("com.acme.Startup", annotated_listener(JAR));
    let merged = merge_module(&inputs, &discovery, &discovery, MergeOptions::default())?;
    let config = merged.config();
    let hello = config.servlet("hello").ok_or_else(|| anyhow!("hello missing"))?;
    ensure!(hello.id == "ServletGeneratedId2", "got {}", hello.id);
    ensure!(hello.class.as_deref() == Some("com.acme.Hello"));
    ensure!(config.servlet_mappings.get("hello").is_some_and(|p| p == &["/hello"]));
    let audit = config
        .filter("com.acme.Audit")
        .ok_or_else(|| anyhow!("filter named after its class missing"))?;
    ensure!(audit.id == "FilterGeneratedId3", "got {}", audit.id);
    let targets: Vec<_> = config.mappings_for("com.acme.Audit").map(|m| &m.target).collect();
    ensure!(targets == [&MappingTarget::UrlPattern("/*".to_owned())]);
    ensure!(config.listeners == ["com.acme.Startup"]);
    Ok(())
}

#[rstest]
fn servlet_marker_on_the_wrong_class_is_a_validation_error(inputs: ModuleInputs) -> Result<()> {
    let mut plain = annotated_servlet(JAR, Some("hello"), &["/hello"]);
    plain.capabilities.clear();
    let discovery = StaticDiscovery::default().with_class("com.acme.Plain", plain);
    let err = merge_module(&inputs, &discovery, &discovery, MergeOptions::default())
        .err()
        .ok_or_else(|| anyhow!("expected a validation error"))?;
    ensure!(
        matches!(err.as_ref(), MergeError::Validation { key, .. } if key == "com.acme.Plain"),
        "got {err}"
    );
    Ok(())
}

#[rstest]
fn servlet_marker_without_patterns_is_rejected(inputs: ModuleInputs) -> Result<()> {
    let discovery = StaticDiscovery::default()
        .with_class("com.acme.Hello", annotated_servlet(JAR, Some("hello"), &[]));
    let err = merge_module(&inputs, &discovery, &discovery, MergeOptions::default())
        .err()
        .ok_or_else(|| anyhow!("expected a validation error"))?;
    ensure!(err.to_string().contains("no URL patterns"), "got {err}");
    Ok(())
}

#[rstest]
fn complete_fragment_is_not_scanned() -> Result<()> {
    let fragment = Fragment {
        metadata_complete: true,
        ..Fragment::classes_only(JAR)
    };
    let inputs = ModuleInputs::new(ModuleDescriptor::default()).with_fragment(fragment);
    let discovery = StaticDiscovery::default()
        .with_class("com.acme.Hello", annotated_servlet(JAR, Some("hello"), &["/hello"]));
    let merged = merge_module(&inputs, &discovery, &discovery, MergeOptions::default())?;
    ensure!(merged.config().servlets.is_empty());
    Ok(())
}

#[rstest]
fn complete_module_ignores_discovery(inputs: ModuleInputs) -> Result<()> {
    let discovery = StaticDiscovery::default()
        .with_class("com.acme.Hello", annotated_servlet(JAR, Some("hello"), &["/hello"]));
    let merged = merge_module(
        &inputs.metadata_complete(true),
        &discovery,
        &discovery,
        MergeOptions::default(),
    )?;
    ensure!(merged.config().servlets.is_empty());
    ensure!(merged.config().metadata_complete);
    Ok(())
}

#[rstest]
fn discovery_failure_stops_the_merge(inputs: ModuleInputs) -> Result<()> {
    let err = merge_module(&inputs, &FailingDiscovery, &FailingDiscovery, MergeOptions::default())
        .err()
        .ok_or_else(|| anyhow!("expected a collaborator error"))?;
    let MergeError::Collaborator { operation, source } = err.as_ref() else {
        return Err(anyhow!("expected a collaborator error, got {err}"));
    };
    ensure!(operation.contains("WebServlet"), "got {operation}");
    ensure!(source.to_string() == "class index unavailable");
    Ok(())
}

#[rstest]
fn listener_without_listener_capability_is_reported(inputs: ModuleInputs) -> Result<()> {
    let discovery = StaticDiscovery::default().with_class(
        "com.acme.NotAListener",
        ScannedClass::seed(JAR).with_annotation(Annotation::WebListener),
    );
    let err = merge_module(&inputs, &discovery, &discovery, MergeOptions::default())
        .err()
        .ok_or_else(|| anyhow!("expected a validation error"))?;
    ensure!(err.to_string().contains("com.acme.NotAListener"), "got {err}");
    Ok(())
}
