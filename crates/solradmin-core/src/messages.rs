//! Localizable user-facing notices.
//!
//! Every outcome maps to its own catalog key. Templates use `{name}`
//! placeholders; a placeholder without a value is left as written.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::AppError;
use crate::models::{Operation, OperationReport, OperationStatus, Site};

pub const INDEX_EMPTIED_ALL: &str = "index_emptied_all";
pub const INDEX_EMPTIED_PARTIAL: &str = "index_emptied_partial";
pub const NOTHING_TO_EMPTY: &str = "nothing_to_empty";
pub const ERROR_ON_EMPTY_INDEX: &str = "error.on_empty_index";
pub const QUEUE_EMPTIED: &str = "success.queue_emptied";
pub const ERROR_ON_CLEAR_QUEUE: &str = "error.on_clear_queue";
pub const CORE_CONFIGURATION_RELOADED: &str = "core_configuration_reloaded";
pub const ERROR_CORE_RELOAD_FAILED: &str = "error.core_reload_failed";
pub const ERROR_CAN_NOT_PROCEED: &str = "error.can_not_proceed";

const DEFAULT_TEMPLATES: &[(&str, &str)] = &[
    (
        INDEX_EMPTIED_ALL,
        "Index emptied for site \"{site}\" in core(s): {cores}.",
    ),
    (
        INDEX_EMPTIED_PARTIAL,
        "Index for site \"{site}\" emptied in core(s): {cores}; failed for: {failed}.",
    ),
    (
        NOTHING_TO_EMPTY,
        "Site \"{site}\" has no configured cores; nothing to empty.",
    ),
    (
        ERROR_ON_EMPTY_INDEX,
        "Failed to empty index for site \"{site}\": {error}",
    ),
    (
        QUEUE_EMPTIED,
        "Index queue for site \"{site}\" emptied ({count} item(s) removed).",
    ),
    (
        ERROR_ON_CLEAR_QUEUE,
        "Failed to clear index queue for site \"{site}\": {error}",
    ),
    (
        CORE_CONFIGURATION_RELOADED,
        "Core configuration reloaded ({cores}).",
    ),
    (
        ERROR_CORE_RELOAD_FAILED,
        "Failed to reload index configuration for core \"{core}\": {error}",
    ),
    (
        ERROR_CAN_NOT_PROCEED,
        "Site \"{site}\" has no configured Solr cores; index maintenance is not available.",
    ),
];

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Ok,
    Warning,
    Error,
}

/// A rendered message ready to show to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub severity: Severity,
    pub key: &'static str,
    pub text: String,
}

/// Key → template catalog.
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    templates: HashMap<String, String>,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self {
            templates: DEFAULT_TEMPLATES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl MessageCatalog {
    /// Built-in English catalog with `overrides` replacing matching keys.
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut catalog = Self::default();
        for (key, template) in overrides {
            catalog.templates.insert(key.clone(), template.clone());
        }
        catalog
    }

    /// Renders `key` with `params`. An unknown key renders as the key itself.
    ///
    /// The template is scanned once, so substituted values are never
    /// themselves expanded.
    pub fn render(&self, key: &str, params: &[(&str, &str)]) -> String {
        let template = self.templates.get(key).map(String::as_str).unwrap_or(key);
        let mut text = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            text.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let value = after.find('}').and_then(|close| {
                let name = &after[..close];
                params
                    .iter()
                    .find(|(n, _)| *n == name)
                    .map(|(_, value)| (*value, close))
            });
            match value {
                Some((value, close)) => {
                    text.push_str(value);
                    rest = &after[close + 1..];
                }
                None => {
                    text.push('{');
                    rest = after;
                }
            }
        }
        text.push_str(rest);
        text
    }

    fn notice(&self, severity: Severity, key: &'static str, params: &[(&str, &str)]) -> Notice {
        Notice {
            severity,
            key,
            text: self.render(key, params),
        }
    }

    /// Notice describing an empty-index or reload report.
    pub fn report_notice(&self, site: &Site, report: &OperationReport) -> Notice {
        let cores = report.affected_cores().join(", ");
        match report.operation {
            Operation::EmptyIndex => self.empty_index_notice(site, report, &cores),
            Operation::ReloadConfiguration => match report.failed_core() {
                None => self.notice(
                    Severity::Ok,
                    CORE_CONFIGURATION_RELOADED,
                    &[("site", site.label.as_str()), ("cores", cores.as_str())],
                ),
                Some(failed) => self.notice(
                    Severity::Error,
                    ERROR_CORE_RELOAD_FAILED,
                    &[
                        ("site", site.label.as_str()),
                        ("core", failed.core_name.as_str()),
                        ("error", failed.error.as_deref().unwrap_or_default()),
                    ],
                ),
            },
        }
    }

    fn empty_index_notice(&self, site: &Site, report: &OperationReport, cores: &str) -> Notice {
        let failed = report
            .failures()
            .map(|r| format!("{} ({})", r.core_name, r.error.as_deref().unwrap_or_default()))
            .collect::<Vec<_>>()
            .join(", ");

        match report.status() {
            OperationStatus::Succeeded if report.results.is_empty() => {
                self.notice(Severity::Ok, NOTHING_TO_EMPTY, &[("site", site.label.as_str())])
            }
            OperationStatus::Succeeded => self.notice(
                Severity::Ok,
                INDEX_EMPTIED_ALL,
                &[("site", site.label.as_str()), ("cores", cores)],
            ),
            OperationStatus::PartiallyFailed => self.notice(
                Severity::Warning,
                INDEX_EMPTIED_PARTIAL,
                &[("site", site.label.as_str()), ("cores", cores), ("failed", failed.as_str())],
            ),
            OperationStatus::Failed => self.notice(
                Severity::Error,
                ERROR_ON_EMPTY_INDEX,
                &[("site", site.label.as_str()), ("error", failed.as_str())],
            ),
        }
    }

    /// Notice for a successful queue clear.
    pub fn queue_cleared_notice(&self, site: &Site, count: u64) -> Notice {
        self.notice(
            Severity::Ok,
            QUEUE_EMPTIED,
            &[("site", site.label.as_str()), ("count", count.to_string().as_str())],
        )
    }

    /// Notice for a failed queue clear.
    pub fn queue_error_notice(&self, site: &Site, error: &AppError) -> Notice {
        self.notice(
            Severity::Error,
            ERROR_ON_CLEAR_QUEUE,
            &[("site", site.label.as_str()), ("error", error.user_message().as_str())],
        )
    }

    /// Notice shown when a site has no cores to maintain.
    pub fn can_not_proceed_notice(&self, site: &Site) -> Notice {
        self.notice(Severity::Warning, ERROR_CAN_NOT_PROCEED, &[("site", site.label.as_str())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OperationResult;

    fn site() -> Site {
        Site::new("example", "Example Site", "abc")
    }

    fn report(operation: Operation, results: Vec<OperationResult>) -> OperationReport {
        let mut report = OperationReport::new(operation, "example");
        for r in results {
            report.add(r);
        }
        report
    }

    #[test]
    fn test_render_replaces_placeholders() {
        let catalog = MessageCatalog::default();
        let text = catalog.render(INDEX_EMPTIED_ALL, &[("site", "Example"), ("cores", "a, b")]);
        assert_eq!(text, "Index emptied for site \"Example\" in core(s): a, b.");
    }

    #[test]
    fn test_render_unknown_key_and_placeholder() {
        let catalog = MessageCatalog::default();
        assert_eq!(catalog.render("no.such.key", &[]), "no.such.key");
        assert_eq!(
            catalog.render(NOTHING_TO_EMPTY, &[]),
            "Site \"{site}\" has no configured cores; nothing to empty."
        );
    }

    #[test]
    fn test_render_does_not_expand_substituted_values() {
        let catalog = MessageCatalog::default();
        let text = catalog.render(
            INDEX_EMPTIED_PARTIAL,
            &[("site", "{cores} {failed}"), ("cores", "core_en"), ("failed", "core_de")],
        );
        assert_eq!(
            text,
            "Index for site \"{cores} {failed}\" emptied in core(s): core_en; failed for: core_de."
        );
    }

    #[test]
    fn test_render_keeps_stray_braces() {
        let mut overrides = HashMap::new();
        overrides.insert("custom".to_string(), "{ {site} {other} {site".to_string());
        let catalog = MessageCatalog::with_overrides(&overrides);
        assert_eq!(
            catalog.render("custom", &[("site", "Example")]),
            "{ Example {other} {site"
        );
    }

    #[test]
    fn test_label_with_placeholder_in_partial_notice() {
        let catalog = MessageCatalog::default();
        let site = Site::new("example", "Shop {cores}", "abc");
        let notice = catalog.report_notice(
            &site,
            &report(
                Operation::EmptyIndex,
                vec![
                    OperationResult::success("core_en"),
                    OperationResult::failure("core_de", "HTTP 500"),
                ],
            ),
        );
        assert!(notice.text.starts_with("Index for site \"Shop {cores}\" emptied"));
    }

    #[test]
    fn test_overrides() {
        let mut overrides = HashMap::new();
        overrides.insert(INDEX_EMPTIED_ALL.to_string(), "Index geleert: {cores}".to_string());
        let catalog = MessageCatalog::with_overrides(&overrides);
        assert_eq!(
            catalog.render(INDEX_EMPTIED_ALL, &[("cores", "core_de")]),
            "Index geleert: core_de"
        );
        // untouched keys keep their default
        assert!(catalog.render(QUEUE_EMPTIED, &[]).starts_with("Index queue"));
    }

    #[test]
    fn test_empty_index_notices_are_distinct() {
        let catalog = MessageCatalog::default();
        let site = site();

        let all = catalog.report_notice(
            &site,
            &report(
                Operation::EmptyIndex,
                vec![
                    OperationResult::success("core_en"),
                    OperationResult::success("core_de"),
                ],
            ),
        );
        assert_eq!(all.key, INDEX_EMPTIED_ALL);
        assert_eq!(all.severity, Severity::Ok);
        assert!(all.text.contains("core_en, core_de"));

        let nothing = catalog.report_notice(&site, &report(Operation::EmptyIndex, vec![]));
        assert_eq!(nothing.key, NOTHING_TO_EMPTY);

        let partial = catalog.report_notice(
            &site,
            &report(
                Operation::EmptyIndex,
                vec![
                    OperationResult::success("core_en"),
                    OperationResult::failure("core_de", "HTTP 500"),
                ],
            ),
        );
        assert_eq!(partial.key, INDEX_EMPTIED_PARTIAL);
        assert_eq!(partial.severity, Severity::Warning);
        assert!(partial.text.contains("core_de (HTTP 500)"));

        let failed = catalog.report_notice(
            &site,
            &report(
                Operation::EmptyIndex,
                vec![OperationResult::failure("core_en", "down")],
            ),
        );
        assert_eq!(failed.key, ERROR_ON_EMPTY_INDEX);
        assert_eq!(failed.severity, Severity::Error);
    }

    #[test]
    fn test_reload_notices() {
        let catalog = MessageCatalog::default();
        let site = site();

        let ok = catalog.report_notice(
            &site,
            &report(
                Operation::ReloadConfiguration,
                vec![OperationResult::success("core_en")],
            ),
        );
        assert_eq!(ok.text, "Core configuration reloaded (core_en).");

        let failed = catalog.report_notice(
            &site,
            &report(
                Operation::ReloadConfiguration,
                vec![
                    OperationResult::success("core_en"),
                    OperationResult::failure("core_de", "HTTP 500"),
                ],
            ),
        );
        assert_eq!(failed.key, ERROR_CORE_RELOAD_FAILED);
        assert_eq!(
            failed.text,
            "Failed to reload index configuration for core \"core_de\": HTTP 500"
        );
    }

    #[test]
    fn test_queue_notices() {
        let catalog = MessageCatalog::default();
        let site = site();

        let ok = catalog.queue_cleared_notice(&site, 12);
        assert_eq!(
            ok.text,
            "Index queue for site \"Example Site\" emptied (12 item(s) removed)."
        );

        let err = catalog.queue_error_notice(&site, &AppError::Store(sqlx::Error::RowNotFound));
        assert_eq!(err.severity, Severity::Error);
        assert_eq!(err.key, ERROR_ON_CLEAR_QUEUE);
    }

    #[test]
    fn test_can_not_proceed_notice() {
        let notice = MessageCatalog::default().can_not_proceed_notice(&site());
        assert_eq!(notice.severity, Severity::Warning);
        assert!(notice.text.contains("Example Site"));
    }
}
