//! Binding and extension overrides applied after the merge.

use anyhow::{Result, anyhow, ensure};
use descriptor_merge::{
    BindingDescriptor, ExtensionDescriptor, MergeOptions, ModuleDescriptor, ModuleInputs,
    NoDiscovery, ParamValue, Reference, ReferenceBinding, ReferenceKind, ResourceRefExtension,
    merge_module,
};
use rstest::{fixture, rstest};
use test_helpers::descriptors::{library, reference};

#[fixture]
fn declared() -> ModuleDescriptor {
    ModuleDescriptor {
        references: vec![
            reference(ReferenceKind::ResourceRef, "jdbc/orders", &[]),
            Reference::env_entry("retries", "3"),
        ],
        ..ModuleDescriptor::default()
    }
}

fn binding_for(name: &str, binding_name: &str) -> ReferenceBinding {
    ReferenceBinding {
        kind: ReferenceKind::ResourceRef,
        name: name.to_owned(),
        binding_name: binding_name.to_owned(),
    }
}

#[rstest]
fn binding_values_overwrite_merged_values(declared: ModuleDescriptor) -> Result<()> {
    let binding = BindingDescriptor {
        virtual_host: Some("shop_host".to_owned()),
        reference_bindings: vec![binding_for("jdbc/orders", "jdbc/ordersPrimary")],
        env_entry_values: vec![ParamValue::new("retries", "7")],
    };
    let inputs = ModuleInputs::new(declared).with_binding(binding);
    let merged = merge_module(&inputs, &NoDiscovery, &NoDiscovery, MergeOptions::default())?;
    let config = merged.config();
    ensure!(config.virtual_host.as_deref() == Some("shop_host"));
    let orders = config
        .reference(ReferenceKind::ResourceRef, "jdbc/orders")
        .ok_or_else(|| anyhow!("resource-ref missing"))?;
    ensure!(orders.binding_name.as_deref() == Some("jdbc/ordersPrimary"));
    let retries = config
        .reference(ReferenceKind::EnvEntry, "retries")
        .ok_or_else(|| anyhow!("env-entry missing"))?;
    ensure!(retries.value.as_deref() == Some("7"));
    ensure!(merged.diagnostics().is_empty());
    Ok(())
}

#[rstest]
fn later_binding_replaces_earlier_binding(declared: ModuleDescriptor) -> Result<()> {
    let binding = BindingDescriptor {
        reference_bindings: vec![
            binding_for("jdbc/orders", "jdbc/first"),
            binding_for("jdbc/orders", "jdbc/second"),
        ],
        ..BindingDescriptor::default()
    };
    let inputs = ModuleInputs::new(declared).with_binding(binding);
    let merged = merge_module(&inputs, &NoDiscovery, &NoDiscovery, MergeOptions::default())?;
    let orders = merged
        .config()
        .reference(ReferenceKind::ResourceRef, "jdbc/orders")
        .ok_or_else(|| anyhow!("resource-ref missing"))?;
    ensure!(orders.binding_name.as_deref() == Some("jdbc/second"));
    Ok(())
}

#[rstest]
fn overrides_for_undeclared_references_are_ignored(declared: ModuleDescriptor) -> Result<()> {
    let binding = BindingDescriptor {
        reference_bindings: vec![binding_for("jdbc/unknown", "jdbc/nowhere")],
        env_entry_values: vec![ParamValue::new("missing", "1")],
        ..BindingDescriptor::default()
    };
    let extension = ExtensionDescriptor {
        resource_refs: vec![ResourceRefExtension {
            name: "jdbc/unknown".to_owned(),
            ..ResourceRefExtension::default()
        }],
    };
    let inputs = ModuleInputs::new(declared)
        .with_binding(binding)
        .with_extension(extension);
    let merged = merge_module(&inputs, &NoDiscovery, &NoDiscovery, MergeOptions::default())?;
    ensure!(merged.config().reference(ReferenceKind::ResourceRef, "jdbc/unknown").is_none());
    ensure!(merged.config().reference(ReferenceKind::EnvEntry, "missing").is_none());
    Ok(())
}

#[rstest]
fn extension_tunes_resource_references(declared: ModuleDescriptor) -> Result<()> {
    let tuning = ResourceRefExtension {
        name: "jdbc/orders".to_owned(),
        isolation_level: Some("TRANSACTION_READ_COMMITTED".to_owned()),
        commit_priority: Some(2),
        ..ResourceRefExtension::default()
    };
    let extension = ExtensionDescriptor {
        resource_refs: vec![tuning.clone()],
    };
    let inputs = ModuleInputs::new(declared).with_extension(extension);
    let merged = merge_module(&inputs, &NoDiscovery, &NoDiscovery, MergeOptions::default())?;
    let orders = merged
        .config()
        .reference(ReferenceKind::ResourceRef, "jdbc/orders")
        .ok_or_else(|| anyhow!("resource-ref missing"))?;
    ensure!(orders.extension.as_ref() == Some(&tuning));
    Ok(())
}

#[rstest]
fn overrides_are_not_validated_against_fragment_values() -> Result<()> {
    let fragment = ModuleDescriptor {
        references: vec![Reference::env_entry("retries", "3")],
        ..ModuleDescriptor::default()
    };
    let binding = BindingDescriptor {
        env_entry_values: vec![ParamValue::new("retries", "9"), ParamValue::new("retries", "10")],
        ..BindingDescriptor::default()
    };
    let inputs = ModuleInputs::new(ModuleDescriptor::default())
        .with_fragment(library("a.jar", fragment))
        .with_binding(binding);
    let merged = merge_module(&inputs, &NoDiscovery, &NoDiscovery, MergeOptions::default())?;
    let retries = merged
        .config()
        .reference(ReferenceKind::EnvEntry, "retries")
        .ok_or_else(|| anyhow!("env-entry missing"))?;
    ensure!(retries.value.as_deref() == Some("10"));
    Ok(())
}
