//! Servlet and filter mappings.

use super::MergeSession;
use crate::{
    ConfigItem, FilterMappingConfig, MappingTarget, MergeResult, Provenance, SourceTier,
    context::keys,
    deferred::DeferredAction,
    descriptor::{Dispatcher, FilterMapping, ServletMapping},
};

/// Servlet name that maps a filter onto every servlet.
const ALL_SERVLETS: &str = "*";

impl MergeSession<'_> {
    pub(super) fn configure_servlet_mappings(&mut self, mappings: &[ServletMapping]) -> MergeResult<()> {
        for mapping in mappings {
            self.configure_servlet_mapping(mapping)?;
        }
        Ok(())
    }

    /// Descriptor mappings for one servlet accumulate within a tier; a
    /// lower tier never adds patterns to a servlet mapped by a higher one.
    fn configure_servlet_mapping(&mut self, mapping: &ServletMapping) -> MergeResult<()> {
        let incoming = self.current.tier();
        let mappings = self.context.items(keys::SERVLET_MAPPING)?;
        match mappings.get(&mapping.servlet).map(ConfigItem::tier) {
            None => {
                mappings.insert(
                    mapping.servlet.clone(),
                    ConfigItem::new(Some(mapping.url_patterns.clone()), self.current.clone()),
                );
            }
            Some(recorded) if recorded == incoming => {}
            Some(recorded) => {
                tracing::debug!(
                    servlet = %mapping.servlet,
                    recorded = %recorded,
                    ignored = %self.current,
                    "servlet mapping ignored; servlet already mapped"
                );
                return Ok(());
            }
        }
        for pattern in &mapping.url_patterns {
            self.add_servlet_mapping(&mapping.servlet, pattern)?;
        }
        Ok(())
    }

    /// Route `pattern` to `servlet`, rejecting a pattern already owned by
    /// another servlet when the servlet level requires unique patterns.
    pub(super) fn add_servlet_mapping(&mut self, servlet: &str, pattern: &str) -> MergeResult<()> {
        let owners = self.context.items(keys::URL_PATTERN_OWNER)?;
        let owner = owners.get(pattern).and_then(ConfigItem::value).cloned();
        match owner {
            Some(existing) if existing != servlet => {
                if self.options.servlet_level.enforces_unique_url_patterns() {
                    self.log.record_validation(
                        pattern,
                        format!(
                            "URL pattern is mapped to both servlet '{existing}' and servlet '{servlet}'"
                        ),
                    );
                    return Ok(());
                }
                tracing::debug!(pattern, existing = %existing, servlet, "URL pattern shared by servlets");
            }
            Some(_) => {}
            None => {
                owners.insert(
                    pattern.to_owned(),
                    ConfigItem::new(Some(servlet.to_owned()), self.current.clone()),
                );
            }
        }
        let patterns = self.config.servlet_mappings.entry(servlet.to_owned()).or_default();
        if !patterns.iter().any(|known| known == pattern) {
            patterns.push(pattern.to_owned());
        }
        Ok(())
    }

    pub(super) fn configure_filter_mappings(&mut self, mappings: &[FilterMapping]) -> MergeResult<()> {
        let provenance = self.current.clone();
        for mapping in mappings {
            self.configure_filter_mapping(mapping, &provenance, false)?;
        }
        Ok(())
    }

    /// Merge one descriptor filter mapping.
    ///
    /// A mapping naming a filter that is not declared yet is queued and
    /// retried once, with `retry` set, during the defaults phase. Mappings
    /// accepted on the first pass are queued as well, so every descriptor
    /// mapping is applied in declaration order.
    pub(super) fn configure_filter_mapping(
        &mut self,
        mapping: &FilterMapping,
        provenance: &Provenance,
        retry: bool,
    ) -> MergeResult<()> {
        if !self.context.items(keys::FILTER)?.contains_key(&mapping.filter) {
            return self.defer_unresolved(mapping, provenance, retry);
        }
        let incoming = provenance.tier();
        let mappings = self.context.items(keys::FILTER_MAPPING)?;
        match mappings.get(&mapping.filter).map(ConfigItem::tier) {
            None => {
                mappings.insert(
                    mapping.filter.clone(),
                    ConfigItem::new(Some(mapping.clone()), provenance.clone()),
                );
            }
            Some(recorded) if recorded == incoming || incoming.outranks(recorded) => {}
            Some(recorded) => {
                tracing::debug!(
                    filter = %mapping.filter,
                    recorded = %recorded,
                    ignored = %provenance,
                    "filter mapping ignored; filter already mapped"
                );
                return Ok(());
            }
        }
        self.add_filter_mapping(mapping, retry);
        Ok(())
    }

    /// Queue a mapping whose filter is not declared yet.
    ///
    /// The mapping's tier is recorded straight away so that lower tiers
    /// merged before the replay cannot map the same filter themselves.
    fn defer_unresolved(
        &mut self,
        mapping: &FilterMapping,
        provenance: &Provenance,
        retry: bool,
    ) -> MergeResult<()> {
        if retry {
            if provenance.tier() == SourceTier::Discovered {
                tracing::debug!(filter = %mapping.filter, "filter mapping names an undeclared filter; dropped");
            } else {
                tracing::warn!(
                    filter = %mapping.filter,
                    origin = %provenance,
                    "filter mapping names an undeclared filter; dropped"
                );
            }
            return Ok(());
        }
        if self.options.defer_forward_filter_mappings {
            self.context
                .items(keys::FILTER_MAPPING)?
                .entry(mapping.filter.clone())
                .or_insert_with(|| ConfigItem::new(Some(mapping.clone()), provenance.clone()));
            self.deferred.enqueue(DeferredAction::ResolveFilterMapping {
                mapping: mapping.clone(),
                provenance: provenance.clone(),
            });
        } else {
            tracing::debug!(
                filter = %mapping.filter,
                origin = %provenance,
                "filter mapping names a filter not yet declared; dropped"
            );
        }
        Ok(())
    }

    /// Apply `mapping` immediately when `now` is set, otherwise queue it.
    pub(super) fn add_filter_mapping(&mut self, mapping: &FilterMapping, now: bool) {
        let filter = &mapping.filter;
        let dispatchers = &mapping.dispatchers;
        if let Some(pattern) = &mapping.url_pattern {
            if now {
                self.push_filter_mapping(filter, MappingTarget::UrlPattern(pattern.clone()), dispatchers);
            } else {
                self.deferred.enqueue(DeferredAction::MapFilterUrl {
                    filter: filter.clone(),
                    pattern: pattern.clone(),
                    dispatchers: dispatchers.clone(),
                });
            }
        }
        let Some(servlet) = &mapping.servlet_name else {
            return;
        };
        match (servlet.as_str() == ALL_SERVLETS, now) {
            (true, true) => {
                let servlets: Vec<String> = self.config.servlets.keys().cloned().collect();
                for name in servlets {
                    self.push_filter_mapping(filter, MappingTarget::ServletName(name), dispatchers);
                }
            }
            (true, false) => self.deferred.enqueue(DeferredAction::MapFilterAllServlets {
                filter: filter.clone(),
                dispatchers: dispatchers.clone(),
            }),
            (false, true) => {
                self.push_filter_mapping(filter, MappingTarget::ServletName(servlet.clone()), dispatchers);
            }
            (false, false) => self.deferred.enqueue(DeferredAction::MapFilterServlet {
                filter: filter.clone(),
                servlet: servlet.clone(),
                dispatchers: dispatchers.clone(),
            }),
        }
    }

    pub(super) fn push_filter_mapping(
        &mut self,
        filter: &str,
        target: MappingTarget,
        dispatchers: &[Dispatcher],
    ) {
        self.config.filter_mappings.push(FilterMappingConfig {
            filter: filter.to_owned(),
            target,
            dispatchers: dispatchers.to_vec(),
        });
    }
}
