//! Module-level settings: names, parameters, pages, session, and collections.

use super::MergeSession;
use crate::{
    ConfigItem, MergeResult, ModuleConfig,
    context::keys,
    deferred::DeferredAction,
    descriptor::{
        CookieConfig, DataSource, ErrorPage, LocaleEncoding, MimeMapping, ModuleDescriptor,
        ParamValue, SessionConfig,
    },
    validate::FieldLabel,
};

/// Welcome files used when no source declares any.
pub(super) const DEFAULT_WELCOME_FILES: [&str; 3] = ["index.html", "index.htm", "index.jsp"];

impl MergeSession<'_> {
    pub(super) fn configure_module_names(&mut self, descriptor: &ModuleDescriptor) {
        self.config.display_name.clone_from(&descriptor.display_name);
        self.config.description.clone_from(&descriptor.description);
    }

    pub(super) fn configure_primary_distributable(&mut self, distributable: bool) {
        if !self.options.ignore_distributable {
            self.config.distributable = distributable;
        }
    }

    /// A single non-distributable fragment makes the whole module
    /// non-distributable.
    pub(super) fn configure_fragment_distributable(&mut self, distributable: bool) {
        if self.options.ignore_distributable || distributable || !self.config.distributable {
            return;
        }
        self.config.distributable = false;
        tracing::info!(fragment = %self.current, "fragment is not distributable; module marked non-distributable");
    }

    pub(super) fn configure_context_params(&mut self, params: &[ParamValue]) -> MergeResult<()> {
        for param in params {
            let name = param.name.as_str();
            let label = FieldLabel::keyed("context-param", "param-name", name, "param-value");
            self.merge_setting(keys::CONTEXT_PARAM, name, &label, param.value.clone(), |config, value| {
                config.context_params.insert(name.to_owned(), value.clone());
            })?;
        }
        Ok(())
    }

    pub(super) fn configure_mime_mappings(&mut self, mappings: &[MimeMapping]) -> MergeResult<()> {
        for mapping in mappings {
            let extension = mapping.extension.as_str();
            let label = FieldLabel::keyed("mime-mapping", "extension", extension, "mime-type");
            self.merge_setting(
                keys::MIME_MAPPING,
                extension,
                &label,
                mapping.mime_type.clone(),
                |config, value| {
                    config.mime_mappings.insert(extension.to_owned(), value.clone());
                },
            )?;
        }
        Ok(())
    }

    pub(super) fn configure_error_pages(&mut self, pages: &[ErrorPage]) -> MergeResult<()> {
        for page in pages {
            self.configure_error_page(page)?;
        }
        Ok(())
    }

    fn configure_error_page(&mut self, page: &ErrorPage) -> MergeResult<()> {
        let location = page.location.clone();
        if let Some(code) = page.error_code {
            let lookup = code.to_string();
            let label = FieldLabel::keyed("error-page", "error-code", &lookup, "location");
            return self.merge_setting(keys::ERROR_PAGE_CODE, &lookup, &label, location, |config, value| {
                config.error_pages.by_code.insert(code, value.clone());
            });
        }
        if let Some(exception) = &page.exception_type {
            let label = FieldLabel::keyed("error-page", "exception-type", exception, "location");
            return self.merge_setting(
                keys::ERROR_PAGE_EXCEPTION,
                exception,
                &label,
                location,
                |config, value| {
                    config.error_pages.by_exception.insert(exception.clone(), value.clone());
                },
            );
        }
        if !self.options.servlet_level.supports_default_error_page() && !self.options.allow_default_error_page {
            tracing::debug!(
                location = %page.location,
                level = %self.options.servlet_level,
                "default error page not supported at this servlet level; skipped"
            );
            return Ok(());
        }
        self.merge_setting(
            keys::ERROR_PAGE_DEFAULT,
            "default",
            &FieldLabel::default_location(),
            location,
            |config, value| config.error_pages.default = Some(value.clone()),
        )
    }

    pub(super) fn configure_welcome_files(&mut self, files: &[String]) -> MergeResult<()> {
        for file in files {
            if self.context.names(keys::WELCOME_FILE)?.insert(file.clone()) {
                self.config.welcome_files.push(file.clone());
            }
        }
        Ok(())
    }

    pub(super) fn configure_locale_encodings(&mut self, encodings: &[LocaleEncoding]) -> MergeResult<()> {
        for mapping in encodings {
            let recorded = self.context.items(keys::LOCALE_ENCODING)?;
            if recorded.contains_key(&mapping.locale) {
                tracing::debug!(locale = %mapping.locale, origin = %self.current, "locale encoding already mapped");
                continue;
            }
            recorded.insert(
                mapping.locale.clone(),
                ConfigItem::new(Some(mapping.encoding.clone()), self.current.clone()),
            );
            self.config
                .locale_encodings
                .insert(mapping.locale.clone(), mapping.encoding.clone());
        }
        Ok(())
    }

    /// Descriptor listeners are registered during the defaults phase, after
    /// every class they might reference has been registered.
    pub(super) fn configure_listeners(&mut self, listeners: &[String]) -> MergeResult<()> {
        for class in listeners {
            if !self.context.names(keys::LISTENER)?.insert(class.clone()) {
                continue;
            }
            self.require_scan(class);
            self.deferred.enqueue(DeferredAction::AddListener { class: class.clone() });
        }
        Ok(())
    }

    pub(super) fn configure_data_sources(&mut self, sources: &[DataSource]) -> MergeResult<()> {
        for source in sources {
            let name = source.name.as_str();
            if name.is_empty() {
                continue;
            }
            let label = FieldLabel::keyed("data-source", "name", name, "definition");
            self.merge_setting(keys::DATA_SOURCE, name, &label, source.clone(), |config, value| {
                config.data_sources.insert(name.to_owned(), value.clone());
            })?;
        }
        Ok(())
    }

    pub(super) fn configure_session_config(&mut self, session: &SessionConfig) -> MergeResult<()> {
        if let Some(timeout) = session.timeout {
            self.merge_session_setting("session-config", "session-timeout", timeout.to_string(), |config| {
                config.session.timeout = Some(timeout);
            })?;
        }
        if let Some(cookie) = &session.cookie {
            self.configure_cookie_config(cookie)?;
        }
        for mode in &session.tracking_modes {
            if self.context.names(keys::TRACKING_MODE)?.insert(mode.as_str().to_owned()) {
                self.config.session.tracking_modes.push(*mode);
            }
        }
        Ok(())
    }

    fn configure_cookie_config(&mut self, cookie: &CookieConfig) -> MergeResult<()> {
        const PARENT: &str = "cookie-config";
        if let Some(name) = &cookie.name {
            self.merge_session_setting(PARENT, "name", name.clone(), |config| {
                config.session.cookie.name = Some(name.clone());
            })?;
        }
        if let Some(domain) = &cookie.domain {
            self.merge_session_setting(PARENT, "domain", domain.clone(), |config| {
                config.session.cookie.domain = Some(domain.clone());
            })?;
        }
        if let Some(path) = &cookie.path {
            self.merge_session_setting(PARENT, "path", path.clone(), |config| {
                config.session.cookie.path = Some(path.clone());
            })?;
        }
        if let Some(comment) = &cookie.comment {
            self.merge_session_setting(PARENT, "comment", comment.clone(), |config| {
                config.session.cookie.comment = Some(comment.clone());
            })?;
        }
        if let Some(http_only) = cookie.http_only {
            self.merge_session_setting(PARENT, "http-only", http_only.to_string(), |config| {
                config.session.cookie.http_only = Some(http_only);
            })?;
        }
        if let Some(secure) = cookie.secure {
            self.merge_session_setting(PARENT, "secure", secure.to_string(), |config| {
                config.session.cookie.secure = Some(secure);
            })?;
        }
        if let Some(max_age) = cookie.max_age {
            self.merge_session_setting(PARENT, "max-age", max_age.to_string(), |config| {
                config.session.cookie.max_age = Some(max_age);
            })?;
        }
        Ok(())
    }

    /// Session settings are compared in rendered form; `apply` writes the
    /// typed value.
    fn merge_session_setting(
        &mut self,
        parent: &str,
        element: &str,
        rendered: String,
        apply: impl FnOnce(&mut ModuleConfig),
    ) -> MergeResult<()> {
        let lookup = format!("{parent}.{element}");
        let label = FieldLabel::scalar(parent, element);
        self.merge_setting(keys::SESSION_SETTING, &lookup, &label, rendered, |config, _| apply(config))
    }

    pub(super) fn apply_default_values(&mut self) {
        if self.config.welcome_files.is_empty() {
            self.config.welcome_files = DEFAULT_WELCOME_FILES.iter().map(|f| (*f).to_owned()).collect();
        }
        if self.config.display_name.is_none() {
            self.config.display_name.clone_from(&self.config.module_name);
        }
    }
}
