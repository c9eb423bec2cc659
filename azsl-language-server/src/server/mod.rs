mod common;
mod config;
mod diagnostic;
mod document_symbol;
mod goto;
mod hover;

use azsl_sense::workspace::{ShaderChange, ShaderWorkspace};
use lsp_server::{Connection, ErrorCode, Message, Notification, Request, RequestId, Response};
use lsp_types::{
    notification::{
        DidChangeConfiguration, DidChangeTextDocument, DidCloseTextDocument, DidOpenTextDocument,
        Notification as _,
    },
    request::{DocumentSymbolRequest, GotoDefinition, HoverRequest, Request as _},
    DidChangeConfigurationParams, DidChangeTextDocumentParams, DidCloseTextDocumentParams,
    DidOpenTextDocumentParams, DocumentSymbolParams, DocumentSymbolResponse,
    GotoDefinitionParams, HoverParams, HoverProviderCapability, InitializeParams, OneOf,
    ServerCapabilities, TextDocumentSyncCapability, TextDocumentSyncKind,
    TextDocumentSyncOptions,
};
use serde::{de::DeserializeOwned, Serialize};

use common::lsp_range_to_shader_range;

pub struct ServerLanguage {
    connection: Connection,
    workspace: ShaderWorkspace,
}

fn server_capabilities() -> ServerCapabilities {
    ServerCapabilities {
        text_document_sync: Some(TextDocumentSyncCapability::Options(
            TextDocumentSyncOptions {
                open_close: Some(true),
                change: Some(TextDocumentSyncKind::INCREMENTAL),
                ..Default::default()
            },
        )),
        definition_provider: Some(OneOf::Left(true)),
        hover_provider: Some(HoverProviderCapability::Simple(true)),
        document_symbol_provider: Some(OneOf::Left(true)),
        ..Default::default()
    }
}

/// Serve LSP over stdio until the client asks for shutdown.
pub fn run() -> anyhow::Result<()> {
    let (connection, io_threads) = Connection::stdio();
    let capabilities = serde_json::to_value(server_capabilities())?;
    let initialize_params = connection.initialize(capabilities)?;
    let initialize_params: InitializeParams = serde_json::from_value(initialize_params)?;
    let mut server = ServerLanguage::new(connection, &initialize_params);
    server.run()?;
    // Drop the connection so the writer thread can finish.
    drop(server);
    io_threads.join()?;
    Ok(())
}

impl ServerLanguage {
    pub fn new(connection: Connection, params: &InitializeParams) -> Self {
        let symbol_params = config::initial_symbol_params(params);
        log::info!("Include roots: {:?}", symbol_params.include_roots);
        Self {
            connection,
            workspace: ShaderWorkspace::new(symbol_params),
        }
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        let receiver = self.connection.receiver.clone();
        for message in &receiver {
            match message {
                Message::Request(request) => {
                    if self.connection.handle_shutdown(&request)? {
                        return Ok(());
                    }
                    self.on_request(request)?;
                }
                Message::Response(response) => {
                    log::debug!("Ignoring response {:?}", response.id);
                }
                Message::Notification(notification) => self.on_notification(notification)?,
            }
        }
        Ok(())
    }

    fn send(&self, message: Message) -> anyhow::Result<()> {
        self.connection.sender.send(message)?;
        Ok(())
    }

    pub fn send_response<T: Serialize>(&self, id: RequestId, result: T) -> anyhow::Result<()> {
        self.send(Message::Response(Response::new_ok(id, result)))
    }

    pub fn send_error(&self, id: RequestId, code: ErrorCode, message: String) -> anyhow::Result<()> {
        self.send(Message::Response(Response::new_err(id, code as i32, message)))
    }

    pub fn send_notification<T: Serialize>(&self, method: &str, params: T) -> anyhow::Result<()> {
        self.send(Message::Notification(Notification::new(
            method.to_string(),
            params,
        )))
    }

    fn on_request(&mut self, request: Request) -> anyhow::Result<()> {
        let Request { id, method, params } = request;
        match method.as_str() {
            GotoDefinition::METHOD => match parse_params::<GotoDefinitionParams>(&method, params) {
                Some(params) => {
                    let result = self.recolt_goto(&params);
                    self.send_response(id, result)
                }
                None => self.send_invalid_params(id, &method),
            },
            HoverRequest::METHOD => match parse_params::<HoverParams>(&method, params) {
                Some(params) => {
                    let result = self.recolt_hover(&params);
                    self.send_response(id, result)
                }
                None => self.send_invalid_params(id, &method),
            },
            DocumentSymbolRequest::METHOD => {
                match parse_params::<DocumentSymbolParams>(&method, params) {
                    Some(params) => {
                        let symbols = self.recolt_document_symbol(&params.text_document.uri);
                        self.send_response(id, DocumentSymbolResponse::Nested(symbols))
                    }
                    None => self.send_invalid_params(id, &method),
                }
            }
            _ => {
                log::warn!("Unsupported request {}", method);
                self.send_error(
                    id,
                    ErrorCode::MethodNotFound,
                    format!("Unsupported request {}", method),
                )
            }
        }
    }

    fn send_invalid_params(&self, id: RequestId, method: &str) -> anyhow::Result<()> {
        self.send_error(
            id,
            ErrorCode::InvalidParams,
            format!("Invalid parameters for {}", method),
        )
    }

    fn on_notification(&mut self, notification: Notification) -> anyhow::Result<()> {
        let Notification { method, params } = notification;
        match method.as_str() {
            DidOpenTextDocument::METHOD => {
                if let Some(params) = parse_params::<DidOpenTextDocumentParams>(&method, params) {
                    self.on_did_open(params)?;
                }
            }
            DidChangeTextDocument::METHOD => {
                if let Some(params) = parse_params::<DidChangeTextDocumentParams>(&method, params)
                {
                    self.on_did_change(params)?;
                }
            }
            DidCloseTextDocument::METHOD => {
                if let Some(params) = parse_params::<DidCloseTextDocumentParams>(&method, params) {
                    self.workspace.close_document(&params.text_document.uri);
                }
            }
            DidChangeConfiguration::METHOD => {
                if let Some(params) =
                    parse_params::<DidChangeConfigurationParams>(&method, params)
                {
                    let mut symbol_params = config::parse_symbol_params(&params.settings);
                    // Keep the workspace folders found at initialization.
                    for root in &self.workspace.params().include_roots {
                        if !symbol_params.include_roots.contains(root) {
                            symbol_params.include_roots.push(root.clone());
                        }
                    }
                    log::info!("Updated configuration: {:?}", symbol_params);
                    self.workspace.set_params(symbol_params);
                }
            }
            _ => log::debug!("Ignoring notification {}", method),
        }
        Ok(())
    }

    fn on_did_open(&mut self, params: DidOpenTextDocumentParams) -> anyhow::Result<()> {
        let document = params.text_document;
        if self
            .workspace
            .open_document(&document.uri, document.version, &document.text)
        {
            self.publish_diagnostics(&document.uri, Some(document.version))?;
        }
        Ok(())
    }

    fn on_did_change(&mut self, params: DidChangeTextDocumentParams) -> anyhow::Result<()> {
        let uri = params.text_document.uri;
        let version = params.text_document.version;
        let changes = params
            .content_changes
            .into_iter()
            .map(|change| match change.range {
                Some(range) => ShaderChange::Incremental {
                    range: lsp_range_to_shader_range(&range),
                    text: change.text,
                },
                None => ShaderChange::Full(change.text),
            })
            .collect();
        match self.workspace.change_document(&uri, version, changes) {
            Ok(()) => self.publish_diagnostics(&uri, Some(version)),
            Err(err) => {
                log::warn!("Failed to update {}: {}", uri, err);
                Ok(())
            }
        }
    }
}

fn parse_params<P: DeserializeOwned>(method: &str, params: serde_json::Value) -> Option<P> {
    match serde_json::from_value(params) {
        Ok(params) => Some(params),
        Err(err) => {
            log::warn!("Invalid parameters for {}: {}", method, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use lsp_types::{
        GotoDefinitionResponse, HoverContents, Position, TextDocumentIdentifier,
        TextDocumentItem, TextDocumentPositionParams, Url,
    };

    use super::*;

    pub(super) fn test_server() -> (ServerLanguage, Connection) {
        let (server, client) = Connection::memory();
        (ServerLanguage::new(server, &InitializeParams::default()), client)
    }

    pub(super) fn open(server: &mut ServerLanguage, uri: &Url, text: &str) {
        server
            .on_did_open(DidOpenTextDocumentParams {
                text_document: TextDocumentItem {
                    uri: uri.clone(),
                    language_id: "azsl".into(),
                    version: 1,
                    text: text.into(),
                },
            })
            .unwrap();
    }

    fn position_params(uri: &Url, line: u32, character: u32) -> TextDocumentPositionParams {
        TextDocumentPositionParams {
            text_document: TextDocumentIdentifier { uri: uri.clone() },
            position: Position::new(line, character),
        }
    }

    #[test]
    fn test_definition_and_hover() {
        let (mut server, _client) = test_server();
        let shared = Url::parse("file:///project/shared.azsli").unwrap();
        let main = Url::parse("file:///project/main.azsl").unwrap();
        open(&mut server, &main, "#include \"shared.azsli\"\nvoid f() { Helper(); }\n");
        open(&mut server, &shared, "// Help.\nvoid Helper() {}\n");

        let definition = server.recolt_goto(&GotoDefinitionParams {
            text_document_position_params: position_params(&main, 1, 12),
            work_done_progress_params: Default::default(),
            partial_result_params: Default::default(),
        });
        match definition {
            Some(GotoDefinitionResponse::Scalar(location)) => {
                assert_eq!(location.uri, shared);
                assert_eq!(location.range.start, Position::new(1, 0));
                assert_eq!(location.range.end, Position::new(1, 0));
            }
            other => panic!("Unexpected definition {:?}", other),
        }

        let hover = server
            .recolt_hover(&HoverParams {
                text_document_position_params: position_params(&main, 1, 12),
                work_done_progress_params: Default::default(),
            })
            .unwrap();
        match hover.contents {
            HoverContents::Markup(markup) => {
                assert_eq!(markup.value, "```hlsl\n// Help.\nvoid Helper()\n```")
            }
            other => panic!("Unexpected hover {:?}", other),
        }
    }

    #[test]
    fn test_unknown_request() {
        let (mut server, client) = test_server();
        server
            .on_request(Request::new(
                RequestId::from(1),
                "azsl/unknown".into(),
                serde_json::Value::Null,
            ))
            .unwrap();
        match client.receiver.try_recv().unwrap() {
            Message::Response(response) => {
                assert_eq!(response.id, RequestId::from(1));
                assert_eq!(
                    response.error.map(|error| error.code),
                    Some(ErrorCode::MethodNotFound as i32)
                );
            }
            other => panic!("Unexpected message {:?}", other),
        }
    }

    #[test]
    fn test_invalid_params_answer_error() {
        let (mut server, client) = test_server();
        server
            .on_request(Request::new(
                RequestId::from(2),
                HoverRequest::METHOD.into(),
                serde_json::json!({ "position": 3 }),
            ))
            .unwrap();
        match client.receiver.try_recv().unwrap() {
            Message::Response(response) => assert_eq!(
                response.error.map(|error| error.code),
                Some(ErrorCode::InvalidParams as i32)
            ),
            other => panic!("Unexpected message {:?}", other),
        }
    }
}
