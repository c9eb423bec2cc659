use lsp_types::{
    notification::{Notification, PublishDiagnostics},
    Diagnostic, PublishDiagnosticsParams, Url,
};

use super::{
    common::{shader_range_to_lsp_range, shader_severity_to_lsp_severity},
    ServerLanguage,
};

impl ServerLanguage {
    pub fn recolt_diagnostic(&self, uri: &Url) -> Vec<Diagnostic> {
        self.workspace
            .diagnostics(uri)
            .into_iter()
            .map(|diagnostic| Diagnostic {
                range: shader_range_to_lsp_range(&diagnostic.range.range),
                severity: Some(shader_severity_to_lsp_severity(diagnostic.severity)),
                source: Some("azsl".into()),
                message: diagnostic.error,
                ..Default::default()
            })
            .collect()
    }

    pub fn publish_diagnostics(&self, uri: &Url, version: Option<i32>) -> anyhow::Result<()> {
        let diagnostics = self.recolt_diagnostic(uri);
        log::debug!("Publishing {} diagnostics for {}", diagnostics.len(), uri);
        self.send_notification(
            PublishDiagnostics::METHOD,
            PublishDiagnosticsParams {
                uri: uri.clone(),
                diagnostics,
                version,
            },
        )
    }
}
