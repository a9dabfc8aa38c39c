//! Precedence of primary, fragment, and discovered values.

use anyhow::{Result, anyhow, ensure};
use descriptor_merge::{
    Annotation, Diagnostic, Fragment, MergeOptions, ModuleDescriptor, ModuleInputs, NoDiscovery,
    ScannedClass, Servlet, StaticDiscovery, WebServletInfo, discovery::HTTP_SERVLET, merge_module,
};
use rstest::rstest;
use test_helpers::{
    descriptors::{library, servlet, servlet_mapping, with_context_params, with_session_timeout},
    scan::annotated_servlet,
};

#[rstest]
fn primary_value_beats_fragment_value() -> Result<()> {
    let inputs = ModuleInputs::new(with_session_timeout(30))
        .with_fragment(library("audit.jar", with_session_timeout(45)));
    let merged = merge_module(&inputs, &NoDiscovery, &NoDiscovery, MergeOptions::default())?;
    ensure!(merged.config().session.timeout == Some(30));
    let expected = Diagnostic {
        field: "session-config.session-timeout".to_owned(),
        key: None,
        kept_value: "30".to_owned(),
        ignored_value: "45".to_owned(),
        ignored_origin: "web fragment 'WEB-INF/lib/audit.jar'".to_owned(),
    };
    ensure!(merged.diagnostics() == [expected], "got {:?}", merged.diagnostics());
    Ok(())
}

#[rstest]
fn fragment_fills_values_the_primary_leaves_out() -> Result<()> {
    let inputs = ModuleInputs::new(with_context_params(&[("mode", "prod")]))
        .with_fragment(library("a.jar", with_context_params(&[("region", "eu")])))
        .with_fragment(library("b.jar", with_context_params(&[("region", "eu"), ("mode", "dev")])));
    let merged = merge_module(&inputs, &NoDiscovery, &NoDiscovery, MergeOptions::default())?;
    let params: Vec<_> = merged
        .config()
        .context_params
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();
    ensure!(params == [("mode", "prod"), ("region", "eu")], "got {params:?}");
    ensure!(merged.diagnostics().len() == 1);
    Ok(())
}

#[rstest]
fn descriptor_mapping_suppresses_marker_patterns() -> Result<()> {
    let discovery = StaticDiscovery::default().with_class(
        "com.acme.Hello",
        annotated_servlet("WEB-INF/lib/hello.jar", Some("hello"), &["/annotated"]),
    );
    let primary = ModuleDescriptor {
        servlet_mappings: vec![servlet_mapping("hello", &["/declared"])],
        servlets: vec![servlet("hello", "com.acme.Hello")],
        ..ModuleDescriptor::default()
    };
    let inputs = ModuleInputs::new(primary)
        .with_fragment(Fragment::classes_only("WEB-INF/lib/hello.jar"));
    let merged = merge_module(&inputs, &discovery, &discovery, MergeOptions::default())?;
    let patterns = merged
        .config()
        .servlet_mappings
        .get("hello")
        .ok_or_else(|| anyhow!("hello is not mapped"))?;
    ensure!(patterns == &["/declared"], "got {patterns:?}");
    Ok(())
}

#[rstest]
fn fragment_descriptor_replaces_discovered_value() -> Result<()> {
    let info = WebServletInfo {
        name: Some("hello".to_owned()),
        url_patterns: vec!["/hello".to_owned()],
        load_on_startup: Some(5),
        ..WebServletInfo::default()
    };
    let discovery = StaticDiscovery::default().with_class(
        "com.acme.Hello",
        ScannedClass::seed("WEB-INF/lib/a.jar")
            .with_capability(HTTP_SERVLET)
            .with_annotation(Annotation::WebServlet(info)),
    );
    let fragment_b = ModuleDescriptor {
        servlets: vec![Servlet {
            load_on_startup: Some(1),
            ..servlet("hello", "com.acme.Hello")
        }],
        ..ModuleDescriptor::default()
    };
    let inputs = ModuleInputs::new(ModuleDescriptor::default())
        .with_fragment(Fragment::classes_only("WEB-INF/lib/a.jar"))
        .with_fragment(library("b.jar", fragment_b));
    let merged = merge_module(&inputs, &discovery, &discovery, MergeOptions::default())?;
    let hello = merged
        .config()
        .servlet("hello")
        .ok_or_else(|| anyhow!("hello is not registered"))?;
    ensure!(hello.load_on_startup == Some(1), "got {:?}", hello.load_on_startup);
    ensure!(merged.diagnostics().is_empty());
    Ok(())
}

#[rstest]
fn defaults_fill_welcome_files_and_display_name() -> Result<()> {
    let options = MergeOptions {
        module_name: Some("shop".to_owned()),
        ..MergeOptions::default()
    };
    let inputs = ModuleInputs::new(ModuleDescriptor::default());
    let merged = merge_module(&inputs, &NoDiscovery, &NoDiscovery, options)?;
    let config = merged.config();
    ensure!(config.welcome_files == ["index.html", "index.htm", "index.jsp"]);
    ensure!(config.display_name.as_deref() == Some("shop"));
    Ok(())
}

#[rstest]
#[case(true, true, true)]
#[case(true, false, false)]
#[case(false, true, false)]
fn one_non_distributable_fragment_wins(
    #[case] primary: bool,
    #[case] fragment: bool,
    #[case] expected: bool,
) -> Result<()> {
    let inputs = ModuleInputs::new(ModuleDescriptor {
        distributable: primary,
        ..ModuleDescriptor::default()
    })
    .with_fragment(library(
        "a.jar",
        ModuleDescriptor {
            distributable: fragment,
            ..ModuleDescriptor::default()
        },
    ));
    let merged = merge_module(&inputs, &NoDiscovery, &NoDiscovery, MergeOptions::default())?;
    ensure!(merged.config().distributable == expected);
    Ok(())
}
