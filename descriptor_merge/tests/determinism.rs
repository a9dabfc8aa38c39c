//! Equal inputs produce byte-identical output.

use anyhow::{Result, ensure};
use descriptor_merge::{
    FilterMapping, Fragment, MergeOptions, ModuleDescriptor, ModuleInputs, Reference, StaticDiscovery,
    merge_module,
};
use rstest::rstest;
use test_helpers::{
    descriptors::{filter, library, servlet, servlet_mapping, with_context_params},
    scan::{annotated_filter, annotated_listener, annotated_servlet},
};

fn inputs() -> ModuleInputs {
    let primary = ModuleDescriptor {
        servlets: vec![servlet("orders", "com.acme.Orders")],
        servlet_mappings: vec![servlet_mapping("orders", &["/orders/*"])],
        filter_mappings: vec![FilterMapping::url("audit", "/*")],
        references: vec![Reference::env_entry("retries", "3")],
        ..with_context_params(&[("mode", "prod"), ("region", "eu")])
    };
    let fragment = ModuleDescriptor {
        filters: vec![filter("audit", "com.acme.Audit")],
        ..with_context_params(&[("zone", "b"), ("mode", "dev")])
    };
    ModuleInputs::new(primary)
        .with_fragment(library("audit.jar", fragment))
        .with_fragment(Fragment::classes_only("WEB-INF/lib/web.jar"))
}

fn discovery() -> StaticDiscovery {
    let jar = "WEB-INF/lib/web.jar";
    StaticDiscovery::default()
        .with_class("com.acme.Zeta", annotated_servlet(jar, None, &["/zeta"]))
        .with_class("com.acme.Alpha", annotated_servlet(jar, None, &["/alpha"]))
        .with_class("com.acme.Trace", annotated_filter(jar, Some("trace"), &["/trace/*"]))
        .with_class("com.acme.Boot", annotated_listener(jar))
}

#[rstest]
fn repeated_merges_serialize_identically() -> Result<()> {
    let render = || -> Result<String> {
        let index = discovery();
        let merged = merge_module(&inputs(), &index, &index, MergeOptions::default())?;
        Ok(merged.to_json(true)?)
    };
    let first = render()?;
    for _ in 0..5 {
        ensure!(render()? == first, "merge output changed between runs");
    }
    Ok(())
}

#[rstest]
fn discovered_components_follow_index_order() -> Result<()> {
    let index = discovery();
    let merged = merge_module(&inputs(), &index, &index, MergeOptions::default())?;
    let names: Vec<_> = merged.config().servlets.keys().map(String::as_str).collect();
    ensure!(names == ["orders", "com.acme.Zeta", "com.acme.Alpha"], "got {names:?}");
    let params: Vec<_> = merged.config().context_params.keys().map(String::as_str).collect();
    ensure!(params == ["mode", "region", "zone"], "got {params:?}");
    Ok(())
}
