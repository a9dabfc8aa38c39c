//! Unit tests for phase ordering and deferred replay.

use anyhow::{Result, anyhow, ensure};
use rstest::{fixture, rstest};

use super::{MergeSession, Phase};
use crate::{
    Annotation, ClassRegion, Discovery, MappingTarget, MergeError, MergeOptions, NoDiscovery,
    ScannedClass, StaticDiscovery, WebFilterInfo,
    descriptor::{Filter, FilterMapping, Fragment, ModuleDescriptor, MultipartConfig, Servlet},
    discovery::{FILTER, HTTP_SERVLET},
};

fn servlet(name: &str, class: &str) -> Servlet {
    Servlet {
        name: name.to_owned(),
        class: Some(class.to_owned()),
        ..Servlet::default()
    }
}

fn filter(name: &str, class: &str) -> Filter {
    Filter {
        name: name.to_owned(),
        class: Some(class.to_owned()),
        ..Filter::default()
    }
}

fn is_phase_order(err: &MergeError) -> bool {
    matches!(err, MergeError::PhaseOrder { .. })
}

#[fixture]
fn options() -> MergeOptions {
    MergeOptions::default()
}

#[rstest]
fn primary_requires_initialization(options: MergeOptions) -> Result<()> {
    let mut session = MergeSession::new(options, &NoDiscovery, &NoDiscovery, false);
    let err = session
        .configure_primary(&ModuleDescriptor::default())
        .err()
        .ok_or_else(|| anyhow!("expected a phase error"))?;
    ensure!(is_phase_order(&err), "unexpected error {err}");
    ensure!(*session.phase() == Phase::Created);
    Ok(())
}

#[rstest]
fn discovered_phase_must_follow_its_own_fragment(options: MergeOptions) -> Result<()> {
    let first = Fragment::new("WEB-INF/lib/a.jar", ModuleDescriptor::default());
    let second = Fragment::new("WEB-INF/lib/b.jar", ModuleDescriptor::default());
    let mut session = MergeSession::new(options, &NoDiscovery, &NoDiscovery, false);
    session.configure_init(&[first.clone(), second.clone()])?;
    session.configure_primary(&ModuleDescriptor::default())?;
    session.configure_fragment(&first)?;
    let err = session
        .configure_fragment_discovered(&second)
        .err()
        .ok_or_else(|| anyhow!("expected a phase error"))?;
    ensure!(is_phase_order(&err), "unexpected error {err}");
    session.configure_fragment_discovered(&first)?;
    ensure!(*session.phase() == Phase::FragmentDiscovered("WEB-INF/lib/a.jar".to_owned()));
    Ok(())
}

#[rstest]
fn finish_requires_the_extension_phase(options: MergeOptions) -> Result<()> {
    let mut session = MergeSession::new(options, &NoDiscovery, &NoDiscovery, false);
    session.configure_init(&[])?;
    session.configure_primary(&ModuleDescriptor::default())?;
    session.configure_defaults()?;
    let err = session.finish().err().ok_or_else(|| anyhow!("expected a phase error"))?;
    ensure!(is_phase_order(&err), "unexpected error {err}");
    Ok(())
}

#[rstest]
fn complete_module_ignores_fragments(options: MergeOptions) -> Result<()> {
    let fragment = Fragment::new(
        "WEB-INF/lib/a.jar",
        ModuleDescriptor {
            display_name: Some("fragment".to_owned()),
            ..ModuleDescriptor::default()
        },
    );
    let mut session = MergeSession::new(options, &NoDiscovery, &NoDiscovery, true);
    session.configure_init(std::slice::from_ref(&fragment))?;
    session.configure_primary(&ModuleDescriptor::default())?;
    session.configure_fragment(&fragment)?;
    session.configure_fragment_discovered(&fragment)?;
    ensure!(*session.phase() == Phase::Primary);
    ensure!(session.config().display_name.is_none());
    Ok(())
}

#[rstest]
fn init_records_module_identity(options: MergeOptions) -> Result<()> {
    let fragments = [
        Fragment::classes_only("WEB-INF/lib/b.jar"),
        Fragment::classes_only("WEB-INF/classes"),
        Fragment::classes_only("WEB-INF/lib/a.jar"),
    ];
    let mut session = MergeSession::new(options, &NoDiscovery, &NoDiscovery, false);
    session.configure_init(&fragments)?;
    let config = session.config();
    ensure!(config.id == "ModuleGeneratedId1", "unexpected id {}", config.id);
    ensure!(config.ordered_lib_paths == ["b.jar", "a.jar"]);
    Ok(())
}

#[rstest]
fn forward_filter_mapping_resolves_at_defaults(options: MergeOptions) -> Result<()> {
    let primary = ModuleDescriptor {
        filter_mappings: vec![FilterMapping::url("audit", "/*")],
        ..ModuleDescriptor::default()
    };
    let fragment = Fragment::new(
        "WEB-INF/lib/audit.jar",
        ModuleDescriptor {
            filters: vec![filter("audit", "com.acme.Audit")],
            ..ModuleDescriptor::default()
        },
    );
    let mut session = MergeSession::new(options, &NoDiscovery, &NoDiscovery, false);
    session.configure_init(std::slice::from_ref(&fragment))?;
    session.configure_primary(&primary)?;
    ensure!(session.deferred().len() == 1, "forward mapping should be queued");
    session.configure_fragment(&fragment)?;
    session.configure_fragment_discovered(&fragment)?;
    session.configure_defaults()?;
    let targets: Vec<_> = session.config().mappings_for("audit").map(|m| &m.target).collect();
    ensure!(targets == [&MappingTarget::UrlPattern("/*".to_owned())], "got {targets:?}");
    ensure!(session.deferred().is_empty());
    Ok(())
}

#[rstest]
fn forward_filter_mapping_is_dropped_without_deferral() -> Result<()> {
    let options = MergeOptions {
        defer_forward_filter_mappings: false,
        ..MergeOptions::default()
    };
    let primary = ModuleDescriptor {
        filter_mappings: vec![FilterMapping::url("audit", "/*")],
        ..ModuleDescriptor::default()
    };
    let fragment = Fragment::new(
        "WEB-INF/lib/audit.jar",
        ModuleDescriptor {
            filters: vec![filter("audit", "com.acme.Audit")],
            ..ModuleDescriptor::default()
        },
    );
    let mut session = MergeSession::new(options, &NoDiscovery, &NoDiscovery, false);
    session.configure_init(std::slice::from_ref(&fragment))?;
    session.configure_primary(&primary)?;
    ensure!(session.deferred().is_empty());
    session.configure_fragment(&fragment)?;
    session.configure_fragment_discovered(&fragment)?;
    session.configure_defaults()?;
    ensure!(session.config().filter_mappings.is_empty());
    ensure!(session.config().filter("audit").is_some());
    Ok(())
}

#[rstest]
fn referenced_servlet_class_is_scanned(options: MergeOptions) -> Result<()> {
    let limits = MultipartConfig {
        max_file_size: Some(1024),
        ..MultipartConfig::default()
    };
    let discovery = StaticDiscovery::default().with_class(
        "com.acme.Upload",
        ScannedClass::partial("WEB-INF/lib/upload.jar")
            .with_capability(HTTP_SERVLET)
            .with_annotation(Annotation::MultipartConfig(limits.clone())),
    );
    let primary = ModuleDescriptor {
        servlets: vec![servlet("upload", "com.acme.Upload")],
        ..ModuleDescriptor::default()
    };
    let mut session = MergeSession::new(options, &discovery, &discovery, false);
    session.configure_init(&[])?;
    session.configure_primary(&primary)?;
    session.configure_defaults()?;
    let upload = session
        .config()
        .servlet("upload")
        .ok_or_else(|| anyhow!("servlet missing"))?;
    ensure!(upload.multipart.as_ref() == Some(&limits), "got {:?}", upload.multipart);
    Ok(())
}

#[rstest]
fn actions_queued_during_replay_are_applied(options: MergeOptions) -> Result<()> {
    let info = WebFilterInfo {
        servlet_names: vec!["hello".to_owned()],
        ..WebFilterInfo::default()
    };
    let discovery = StaticDiscovery::default().with_class(
        "com.acme.Trace",
        ScannedClass::partial("WEB-INF/lib/trace.jar")
            .with_capability(FILTER)
            .with_annotation(Annotation::WebFilter(info)),
    );
    ensure!(!discovery.is_included_class("com.acme.Trace"));
    let primary = ModuleDescriptor {
        servlets: vec![servlet("hello", "com.acme.Hello")],
        filters: vec![filter("trace", "com.acme.Trace")],
        filter_mappings: vec![FilterMapping::url("trace", "/trace/*")],
        ..ModuleDescriptor::default()
    };
    let mut session = MergeSession::new(options, &discovery, &discovery, false);
    session.configure_init(&[])?;
    session.configure_primary(&primary)?;
    session.configure_defaults()?;
    let targets: Vec<_> = session
        .config()
        .filter_mappings
        .iter()
        .map(|m| (m.filter.as_str(), &m.target))
        .collect();
    ensure!(
        targets
            == [
                ("trace", &MappingTarget::UrlPattern("/trace/*".to_owned())),
                ("com.acme.Trace", &MappingTarget::ServletName("hello".to_owned())),
            ],
        "got {targets:?}"
    );
    Ok(())
}

#[rstest]
fn excluded_classes_are_not_scanned(options: MergeOptions) -> Result<()> {
    let mut scanned = ScannedClass::partial("WEB-INF/lib/upload.jar")
        .with_capability(HTTP_SERVLET)
        .with_annotation(Annotation::RunAs {
            role: "admin".to_owned(),
        });
    scanned.region = ClassRegion::Excluded;
    let discovery = StaticDiscovery::default().with_class("com.acme.Upload", scanned);
    let primary = ModuleDescriptor {
        servlets: vec![servlet("upload", "com.acme.Upload")],
        ..ModuleDescriptor::default()
    };
    let mut session = MergeSession::new(options, &discovery, &discovery, false);
    session.configure_init(&[])?;
    session.configure_primary(&primary)?;
    session.configure_defaults()?;
    let upload = session
        .config()
        .servlet("upload")
        .ok_or_else(|| anyhow!("servlet missing"))?;
    ensure!(upload.run_as_role.is_none());
    Ok(())
}
