use azsl_sense::symbols::symbol_provider::ShaderSymbolParams;
use lsp_types::{InitializeParams, Url};
use serde_json::Value;

/// Settings section read from the client configuration.
pub const CONFIG_SECTION: &str = "azsl";

/// Read settings sent by the client, either the `azsl` section or the settings
/// object itself. Malformed settings fall back to the defaults.
pub fn parse_symbol_params(settings: &Value) -> ShaderSymbolParams {
    let section = settings.get(CONFIG_SECTION).unwrap_or(settings);
    if section.is_null() {
        return ShaderSymbolParams::default();
    }
    match serde_json::from_value(section.clone()) {
        Ok(params) => params,
        Err(err) => {
            log::warn!("Invalid configuration {}: {}", section, err);
            ShaderSymbolParams::default()
        }
    }
}

fn folder_path(uri: &Url) -> Option<std::path::PathBuf> {
    match uri.to_file_path() {
        Ok(path) => Some(path),
        Err(()) => {
            log::warn!("Ignoring non file workspace folder {}", uri);
            None
        }
    }
}

/// Settings from `initializationOptions`, with workspace folders added to the
/// include roots.
pub fn initial_symbol_params(params: &InitializeParams) -> ShaderSymbolParams {
    let mut symbol_params = params
        .initialization_options
        .as_ref()
        .map(parse_symbol_params)
        .unwrap_or_default();
    let folders: Vec<Url> = match &params.workspace_folders {
        Some(folders) => folders.iter().map(|folder| folder.uri.clone()).collect(),
        #[allow(deprecated)]
        None => params.root_uri.iter().cloned().collect(),
    };
    for folder in folders.iter().filter_map(folder_path) {
        if !symbol_params.include_roots.contains(&folder) {
            symbol_params.include_roots.push(folder);
        }
    }
    symbol_params
}
