//! Facts discovered by scanning classes.

use indexmap::IndexSet;

use super::{
    MergeSession,
    components::{ComponentDecl, ComponentKind},
};
use crate::{
    CollaboratorExt, MergeResult,
    context::keys,
    deferred::DeferredAction,
    descriptor::FilterMapping,
    discovery::{Annotation, FILTER, HTTP_SERVLET, Marker, ScanScope, WebFilterInfo, WebServletInfo},
};

impl MergeSession<'_> {
    /// Merge every marker found on the seed classes of a fragment.
    pub(super) fn scan_fragment(&mut self, identity: &str) -> MergeResult<()> {
        let scope = ScanScope::Fragment(identity);
        let servlets = self.select(scope, Marker::WebServlet)?;
        self.configure_servlet_annotations(&servlets)?;
        let listeners = self.select(scope, Marker::WebListener)?;
        self.configure_listener_annotations(&listeners, false)?;
        let multipart = self.select(scope, Marker::MultipartConfig)?;
        self.configure_multipart_annotations(&multipart)?;
        let run_as = self.select(scope, Marker::RunAs)?;
        self.configure_run_as_annotations(&run_as)?;
        let filters = self.select(scope, Marker::WebFilter)?;
        self.configure_filter_annotations(&filters, false)
    }

    /// Scan classes named by descriptors that no fragment scan covered.
    ///
    /// Only servlet-related markers are read here. Listener and filter
    /// classes are scanned when their deferred registration is replayed.
    pub(super) fn configure_specified_classes(&mut self) -> MergeResult<()> {
        if self.metadata_complete || self.scanning_required.is_empty() {
            return Ok(());
        }
        let pending: IndexSet<String> = self
            .scanning_required
            .iter()
            .filter(|class| {
                !self.discovery.is_included_class(class) && !self.discovery.is_excluded_class(class)
            })
            .cloned()
            .collect();
        if pending.is_empty() {
            return Ok(());
        }
        let scope = ScanScope::Classes(&pending);
        let servlets = self.select(scope, Marker::WebServlet)?;
        self.configure_servlet_annotations(&servlets)?;
        let multipart = self.select(scope, Marker::MultipartConfig)?;
        self.configure_multipart_annotations(&multipart)?;
        let run_as = self.select(scope, Marker::RunAs)?;
        self.configure_run_as_annotations(&run_as)
    }

    /// Scan one class referenced by a replayed action, at most once.
    pub(super) fn configure_specific_class(&mut self, class: &str) -> MergeResult<()> {
        if self.metadata_complete || !self.scanning_required.contains(class) {
            return Ok(());
        }
        if self.discovery.is_included_class(class) || self.discovery.is_excluded_class(class) {
            self.scanning_required.shift_remove(class);
            return Ok(());
        }
        tracing::debug!(
            class,
            external = self.discovery.is_external_class(class),
            "scanning referenced class"
        );
        let classes: IndexSet<String> = IndexSet::from([class.to_owned()]);
        let scope = ScanScope::Classes(&classes);
        let servlets = self.select(scope, Marker::WebServlet)?;
        self.configure_servlet_annotations(&servlets)?;
        let listeners = self.select(scope, Marker::WebListener)?;
        self.configure_listener_annotations(&listeners, true)?;
        let multipart = self.select(scope, Marker::MultipartConfig)?;
        self.configure_multipart_annotations(&multipart)?;
        let run_as = self.select(scope, Marker::RunAs)?;
        self.configure_run_as_annotations(&run_as)?;
        let filters = self.select(scope, Marker::WebFilter)?;
        self.configure_filter_annotations(&filters, true)?;
        self.scanning_required.shift_remove(class);
        Ok(())
    }

    fn select(&self, scope: ScanScope<'_>, marker: Marker) -> MergeResult<IndexSet<String>> {
        self.discovery
            .select_annotated_classes(scope, marker)
            .collaborator(|| format!("selecting classes marked {}", marker.as_str()))
    }

    fn read_annotation(&self, class: &str, marker: Marker) -> MergeResult<Option<Annotation>> {
        self.discovery
            .annotation(class, marker)
            .collaborator(|| format!("reading the {} marker of {class}", marker.as_str()))
    }

    fn configure_servlet_annotations(&mut self, classes: &IndexSet<String>) -> MergeResult<()> {
        self.mark_scanned(classes);
        for class in classes {
            if !self.capabilities.has_capability(class, HTTP_SERVLET) {
                self.log
                    .record_validation(class, "class marked WebServlet does not extend HttpServlet");
                continue;
            }
            let Some(Annotation::WebServlet(info)) = self.read_annotation(class, Marker::WebServlet)? else {
                continue;
            };
            self.configure_servlet_annotation(class, &info)?;
        }
        Ok(())
    }

    fn configure_servlet_annotation(&mut self, class: &str, info: &WebServletInfo) -> MergeResult<()> {
        let patterns = match (info.value.is_empty(), info.url_patterns.is_empty()) {
            (false, false) => {
                self.log
                    .record_validation(class, "WebServlet declares both value and urlPatterns");
                return Ok(());
            }
            (true, true) => {
                self.log.record_validation(class, "WebServlet declares no URL patterns");
                return Ok(());
            }
            (false, true) => &info.value,
            (true, false) => &info.url_patterns,
        };
        let name = info.name.as_deref().filter(|n| !n.is_empty()).unwrap_or(class);
        let decl = ComponentDecl {
            kind: ComponentKind::Servlet,
            name,
            id: None,
            class: Some(class),
            display_name: info.display_name.as_deref(),
            description: info.description.as_deref(),
            init_params: &info.init_params,
            async_supported: info.async_supported,
        };
        self.register_component(&decl)?;
        self.configure_component_attributes(&decl)?;
        if let Some(order) = info.load_on_startup {
            self.configure_load_on_startup(name, order)?;
        }
        if self.context.items(keys::SERVLET_MAPPING)?.contains_key(name) {
            tracing::debug!(servlet = name, class, "marker URL patterns ignored; servlet mapped by a descriptor");
            return Ok(());
        }
        for pattern in patterns {
            self.add_servlet_mapping(name, pattern)?;
        }
        Ok(())
    }

    fn configure_listener_annotations(&mut self, classes: &IndexSet<String>, now: bool) -> MergeResult<()> {
        self.mark_scanned(classes);
        for class in classes {
            if !self.options.is_listener(self.capabilities, class) {
                self.log.record_validation(
                    class,
                    "class marked WebListener implements no supported listener interface",
                );
            }
            if !self.context.names(keys::LISTENER)?.insert(class.clone()) {
                continue;
            }
            if now {
                self.config.listeners.push(class.clone());
            } else {
                self.deferred.enqueue(DeferredAction::AddListener { class: class.clone() });
            }
        }
        Ok(())
    }

    fn configure_multipart_annotations(&mut self, classes: &IndexSet<String>) -> MergeResult<()> {
        for class in classes {
            if let Some(Annotation::MultipartConfig(config)) =
                self.read_annotation(class, Marker::MultipartConfig)?
            {
                self.deferred.enqueue(DeferredAction::ApplyMultipart {
                    class: class.clone(),
                    config,
                });
            }
        }
        Ok(())
    }

    fn configure_run_as_annotations(&mut self, classes: &IndexSet<String>) -> MergeResult<()> {
        for class in classes {
            if let Some(Annotation::RunAs { role }) = self.read_annotation(class, Marker::RunAs)? {
                self.deferred.enqueue(DeferredAction::ApplyRunAs {
                    class: class.clone(),
                    role,
                });
            }
        }
        Ok(())
    }

    fn configure_filter_annotations(&mut self, classes: &IndexSet<String>, now: bool) -> MergeResult<()> {
        self.mark_scanned(classes);
        for class in classes {
            if !self.capabilities.has_capability(class, FILTER) {
                self.log
                    .record_validation(class, "class marked WebFilter does not implement Filter");
                continue;
            }
            let Some(Annotation::WebFilter(info)) = self.read_annotation(class, Marker::WebFilter)? else {
                continue;
            };
            self.configure_filter_annotation(class, &info, now)?;
        }
        Ok(())
    }

    fn configure_filter_annotation(&mut self, class: &str, info: &WebFilterInfo, now: bool) -> MergeResult<()> {
        if !info.value.is_empty() && !info.url_patterns.is_empty() {
            self.log
                .record_validation(class, "WebFilter declares both value and urlPatterns");
            return Ok(());
        }
        if info.value.is_empty() && info.url_patterns.is_empty() && info.servlet_names.is_empty() {
            self.log
                .record_validation(class, "WebFilter declares no URL patterns or servlet names");
            return Ok(());
        }
        let patterns = if info.value.is_empty() { &info.url_patterns } else { &info.value };
        let name = info.name.as_deref().filter(|n| !n.is_empty()).unwrap_or(class);
        let decl = ComponentDecl {
            kind: ComponentKind::Filter,
            name,
            id: None,
            class: Some(class),
            display_name: info.display_name.as_deref(),
            description: info.description.as_deref(),
            init_params: &info.init_params,
            async_supported: info.async_supported,
        };
        self.register_component(&decl)?;
        self.configure_component_attributes(&decl)?;
        if self.context.items(keys::FILTER_MAPPING)?.contains_key(name) {
            tracing::debug!(filter = name, class, "marker mappings ignored; filter mapped by a descriptor");
            return Ok(());
        }
        for pattern in patterns {
            let mapping = FilterMapping {
                dispatchers: info.dispatchers.clone(),
                ..FilterMapping::url(name, pattern.clone())
            };
            self.add_filter_mapping(&mapping, now);
        }
        for servlet in &info.servlet_names {
            let mapping = FilterMapping {
                dispatchers: info.dispatchers.clone(),
                ..FilterMapping::servlet(name, servlet.clone())
            };
            self.add_filter_mapping(&mapping, false);
        }
        Ok(())
    }
}
