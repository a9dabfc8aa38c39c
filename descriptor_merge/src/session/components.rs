//! Servlet and filter registration.

use super::MergeSession;
use crate::{
    ConfigItem, FilterConfig, MergeResult, ModuleConfig, ServletConfig,
    context::{ItemKey, keys},
    descriptor::{Filter, ParamValue, Servlet},
    validate::FieldLabel,
};

const SERVLET_ID_PREFIX: &str = "ServletGeneratedId";
const FILTER_ID_PREFIX: &str = "FilterGeneratedId";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum ComponentKind {
    Servlet,
    Filter,
}

impl ComponentKind {
    const fn element(self) -> &'static str {
        match self {
            Self::Servlet => "servlet",
            Self::Filter => "filter",
        }
    }

    const fn name_element(self) -> &'static str {
        match self {
            Self::Servlet => "servlet-name",
            Self::Filter => "filter-name",
        }
    }

    const fn init_param_element(self) -> &'static str {
        match self {
            Self::Servlet => "servlet.init-param",
            Self::Filter => "filter.init-param",
        }
    }

    const fn registry(self) -> ItemKey<String> {
        match self {
            Self::Servlet => keys::SERVLET,
            Self::Filter => keys::FILTER,
        }
    }

    const fn async_key(self) -> ItemKey<bool> {
        match self {
            Self::Servlet => keys::SERVLET_ASYNC,
            Self::Filter => keys::FILTER_ASYNC,
        }
    }

    const fn init_param_key(self) -> ItemKey<String> {
        match self {
            Self::Servlet => keys::SERVLET_INIT_PARAM,
            Self::Filter => keys::FILTER_INIT_PARAM,
        }
    }

    const fn id_prefix(self) -> &'static str {
        match self {
            Self::Servlet => SERVLET_ID_PREFIX,
            Self::Filter => FILTER_ID_PREFIX,
        }
    }
}

/// Attributes shared by servlet and filter declarations, whether they come
/// from a descriptor or a marker.
#[derive(Clone, Copy, Debug)]
pub(super) struct ComponentDecl<'d> {
    pub(super) kind: ComponentKind,
    pub(super) name: &'d str,
    pub(super) id: Option<&'d str>,
    pub(super) class: Option<&'d str>,
    pub(super) display_name: Option<&'d str>,
    pub(super) description: Option<&'d str>,
    pub(super) init_params: &'d [ParamValue],
    pub(super) async_supported: Option<bool>,
}

impl<'d> ComponentDecl<'d> {
    fn servlet(servlet: &'d Servlet) -> Self {
        Self {
            kind: ComponentKind::Servlet,
            name: &servlet.name,
            id: servlet.id.as_deref(),
            class: servlet.class.as_deref(),
            display_name: servlet.display_name.as_deref(),
            description: servlet.description.as_deref(),
            init_params: &servlet.init_params,
            async_supported: servlet.async_supported,
        }
    }

    fn filter(filter: &'d Filter) -> Self {
        Self {
            kind: ComponentKind::Filter,
            name: &filter.name,
            id: filter.id.as_deref(),
            class: filter.class.as_deref(),
            display_name: filter.display_name.as_deref(),
            description: filter.description.as_deref(),
            init_params: &filter.init_params,
            async_supported: filter.async_supported,
        }
    }
}

impl MergeSession<'_> {
    pub(super) fn configure_servlets(&mut self, servlets: &[Servlet]) -> MergeResult<()> {
        for servlet in servlets {
            self.configure_servlet(servlet)?;
        }
        Ok(())
    }

    pub(super) fn configure_filters(&mut self, filters: &[Filter]) -> MergeResult<()> {
        for filter in filters {
            let decl = ComponentDecl::filter(filter);
            if self.register_component(&decl)?
                && let Some(class) = decl.class
            {
                self.require_scan(class);
            }
            self.configure_component_attributes(&decl)?;
        }
        Ok(())
    }

    fn configure_servlet(&mut self, servlet: &Servlet) -> MergeResult<()> {
        let decl = ComponentDecl::servlet(servlet);
        if self.register_component(&decl)? {
            if let Some(entry) = self.config.servlet_mut(&servlet.name) {
                entry.jsp_file.clone_from(&servlet.jsp_file);
                entry.enabled = servlet.enabled;
            }
            if let Some(class) = decl.class {
                self.require_scan(class);
            }
        }
        self.configure_component_attributes(&decl)?;

        let name = servlet.name.as_str();
        if let Some(order) = servlet.load_on_startup {
            self.configure_load_on_startup(name, order)?;
        }
        if let Some(multipart) = &servlet.multipart {
            let label = FieldLabel::keyed("servlet", "servlet-name", name, "multipart-config");
            self.merge_setting(keys::MULTIPART, name, &label, multipart.clone(), |config, value| {
                if let Some(entry) = config.servlet_mut(name) {
                    entry.multipart = Some(value.clone());
                }
            })?;
        }
        if let Some(role) = &servlet.run_as {
            self.configure_run_as(name, role)?;
        }
        Ok(())
    }

    pub(super) fn configure_load_on_startup(&mut self, servlet: &str, order: i32) -> MergeResult<()> {
        let label = FieldLabel::keyed("servlet", "servlet-name", servlet, "load-on-startup");
        self.merge_setting(keys::LOAD_ON_STARTUP, servlet, &label, order, |config, value| {
            if let Some(entry) = config.servlet_mut(servlet) {
                entry.load_on_startup = Some(*value);
            }
        })
    }

    pub(super) fn configure_run_as(&mut self, servlet: &str, role: &str) -> MergeResult<()> {
        let label = FieldLabel::keyed("servlet", "servlet-name", servlet, "run-as");
        self.merge_setting(keys::RUN_AS, servlet, &label, role.to_owned(), |config, value| {
            if let Some(entry) = config.servlet_mut(servlet) {
                entry.run_as_role = Some(value.clone());
            }
        })
    }

    /// Register the component named in `decl` unless one with that name
    /// exists. Returns `true` when a new component was registered.
    pub(super) fn register_component(&mut self, decl: &ComponentDecl<'_>) -> MergeResult<bool> {
        let registry = self.context.items(decl.kind.registry())?;
        if registry.contains_key(decl.name) {
            tracing::debug!(
                component = decl.kind.element(),
                name = decl.name,
                origin = %self.current,
                "component already registered"
            );
            return Ok(false);
        }
        registry.insert(
            decl.name.to_owned(),
            ConfigItem::new(decl.class.map(str::to_owned), self.current.clone()),
        );
        let id = decl
            .id
            .map_or_else(|| self.ids.generate(decl.kind.id_prefix()), str::to_owned);
        let name = decl.name.to_owned();
        let class = decl.class.map(str::to_owned);
        match decl.kind {
            ComponentKind::Servlet => {
                let mut entry = ServletConfig::new(id, name.clone());
                entry.class = class;
                self.config.servlets.insert(name, entry);
            }
            ComponentKind::Filter => {
                let mut entry = FilterConfig::new(id, name.clone());
                entry.class = class;
                self.config.filters.insert(name, entry);
            }
        }
        Ok(true)
    }

    /// Merge display name, description, init params, and async support.
    pub(super) fn configure_component_attributes(
        &mut self,
        decl: &ComponentDecl<'_>,
    ) -> MergeResult<()> {
        fill_descriptions(&mut self.config, decl);
        for param in decl.init_params {
            self.configure_init_param(decl, param)?;
        }
        if let Some(flag) = decl.async_supported {
            let (kind, name) = (decl.kind, decl.name);
            let label = FieldLabel::keyed(kind.element(), kind.name_element(), name, "async-supported");
            self.merge_setting(kind.async_key(), name, &label, flag, |config, value| {
                match kind {
                    ComponentKind::Servlet => {
                        if let Some(entry) = config.servlet_mut(name) {
                            entry.async_supported = *value;
                        }
                    }
                    ComponentKind::Filter => {
                        if let Some(entry) = config.filter_mut(name) {
                            entry.async_supported = *value;
                        }
                    }
                }
            })?;
        }
        Ok(())
    }

    fn configure_init_param(&mut self, decl: &ComponentDecl<'_>, param: &ParamValue) -> MergeResult<()> {
        let (kind, name) = (decl.kind, decl.name);
        let lookup = format!("{name}.{}", param.name);
        let label = FieldLabel::keyed(kind.init_param_element(), "param-name", &lookup, "param-value");
        let param_name = param.name.as_str();
        self.merge_setting(
            kind.init_param_key(),
            &lookup,
            &label,
            param.value.clone(),
            |config, value| {
                let params = match kind {
                    ComponentKind::Servlet => config.servlet_mut(name).map(|s| &mut s.init_params),
                    ComponentKind::Filter => config.filter_mut(name).map(|f| &mut f.init_params),
                };
                if let Some(params) = params {
                    params.insert(param_name.to_owned(), value.clone());
                }
            },
        )
    }
}

fn fill_descriptions(config: &mut ModuleConfig, decl: &ComponentDecl<'_>) {
    let slots = match decl.kind {
        ComponentKind::Servlet => config
            .servlet_mut(decl.name)
            .map(|entry| (&mut entry.display_name, &mut entry.description)),
        ComponentKind::Filter => config
            .filter_mut(decl.name)
            .map(|entry| (&mut entry.display_name, &mut entry.description)),
    };
    let Some((display_name, description)) = slots else {
        return;
    };
    if display_name.is_none() {
        *display_name = decl.display_name.map(str::to_owned);
    }
    if description.is_none() {
        *description = decl.description.map(str::to_owned);
    }
}
