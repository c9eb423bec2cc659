//! Process wide index of documents, their symbol tables and the includes still
//! waiting for a target.
use std::{
    cell::OnceCell,
    collections::{BTreeMap, HashMap, HashSet, VecDeque},
};

use url::Url;

use crate::{
    grammar::AzslParser,
    include::{is_relative_include, read_include, uri_matches_include, IncludeHandler},
    position::{ShaderPosition, ShaderRange},
    shader_error::{ShaderDiagnostic, ShaderError},
    shader_text::ShaderText,
    symbols::{
        symbol_provider::{ShaderSymbolParams, SymbolProvider},
        symbols::{ShaderFunction, ShaderSymbolTable},
    },
    syntax::SyntaxTree,
};

/// A content change reported by the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderChange {
    Full(String),
    Incremental { range: ShaderRange, text: String },
}

/// State of one document: text, tree and symbols of its current version.
#[derive(Debug, Clone)]
pub struct ShaderDocument {
    pub uri: Url,
    /// Editor version, `None` for a document read from an include root.
    pub version: Option<i32>,
    pub text: ShaderText,
    pub tree: SyntaxTree,
    pub symbols: ShaderSymbolTable,
}

pub struct ShaderWorkspace {
    params: ShaderSymbolParams,
    parser: OnceCell<AzslParser>,
    symbol_provider: SymbolProvider,
    // Ordered so that suffix matches pick the same document every run.
    documents: BTreeMap<Url, ShaderDocument>,
    // Include text -> documents waiting for it.
    pending_includes: HashMap<String, Vec<Url>>,
    // Include texts not found under the include roots, until the roots change.
    missing_on_disk: HashSet<String>,
}

impl Default for ShaderWorkspace {
    fn default() -> Self {
        Self::new(ShaderSymbolParams::default())
    }
}

impl ShaderWorkspace {
    pub fn new(params: ShaderSymbolParams) -> Self {
        Self {
            params,
            parser: OnceCell::new(),
            symbol_provider: SymbolProvider::azsl(),
            documents: BTreeMap::new(),
            pending_includes: HashMap::new(),
            missing_on_disk: HashSet::new(),
        }
    }
    pub fn params(&self) -> &ShaderSymbolParams {
        &self.params
    }
    pub fn set_params(&mut self, params: ShaderSymbolParams) {
        self.params = params;
        self.missing_on_disk.clear();
    }
    /// Forget every document and pending include. Settings are kept.
    pub fn reset(&mut self) {
        self.documents.clear();
        self.pending_includes.clear();
        self.missing_on_disk.clear();
    }
    pub fn get_document(&self, uri: &Url) -> Option<&ShaderDocument> {
        self.documents.get(uri)
    }
    pub fn documents(&self) -> impl Iterator<Item = &ShaderDocument> {
        self.documents.values()
    }
    /// Include texts without a target, with the documents waiting for them.
    pub fn pending_includes(&self) -> &HashMap<String, Vec<Url>> {
        &self.pending_includes
    }

    fn parse(&self, text: &ShaderText, old: Option<&SyntaxTree>) -> SyntaxTree {
        self.parser
            .get_or_init(AzslParser::new)
            .parse(text.as_str(), old)
    }

    fn insert_document(&mut self, uri: &Url, version: Option<i32>, text: ShaderText) {
        let tree = self.parse(&text, None);
        let symbols = self
            .documents
            .remove(uri)
            .map(|document| document.symbols)
            .unwrap_or_default();
        self.documents.insert(
            uri.clone(),
            ShaderDocument {
                uri: uri.clone(),
                version,
                text,
                tree,
                symbols,
            },
        );
    }

    /// Parse and analyse a document. Returns false if the editor already gave the
    /// same or a newer version. A document read from disk is always replaced.
    pub fn open_document(&mut self, uri: &Url, version: i32, content: &str) -> bool {
        if let Some(known) = self.documents.get(uri).and_then(|document| document.version) {
            if known >= version {
                log::debug!(
                    "Ignoring open of {} version {}, version {} is known",
                    uri,
                    version,
                    known
                );
                return false;
            }
        }
        self.insert_document(uri, Some(version), ShaderText::new(content));
        self.analyze(uri);
        true
    }

    /// Apply changes in order, each one seeing the tree left by the previous, then
    /// analyse once. An unknown document receiving an edit is loaded from disk, the
    /// file content standing for the current text.
    pub fn change_document(
        &mut self,
        uri: &Url,
        version: i32,
        changes: Vec<ShaderChange>,
    ) -> Result<(), ShaderError> {
        for change in changes {
            match change {
                ShaderChange::Full(content) => {
                    self.insert_document(uri, Some(version), ShaderText::new(content));
                }
                ShaderChange::Incremental { range, text } => {
                    let Some(mut document) = self.documents.remove(uri) else {
                        let path = uri
                            .to_file_path()
                            .map_err(|()| ShaderError::UnknownDocument(uri.clone()))?;
                        let content = std::fs::read_to_string(&path)
                            .map_err(|err| ShaderError::io(path, err))?;
                        self.insert_document(uri, Some(version), ShaderText::new(content));
                        break;
                    };
                    let edit = document.text.apply_change(&range, &text);
                    document.tree.edit(&edit);
                    document.tree = self.parse(&document.text, Some(&document.tree));
                    document.version = Some(version);
                    self.documents.insert(uri.clone(), document);
                }
            }
        }
        self.analyze(uri);
        Ok(())
    }

    /// Closing keeps the document unless eviction is configured.
    pub fn close_document(&mut self, uri: &Url) {
        if !self.params.evict_on_close {
            return;
        }
        if self.documents.remove(uri).is_some() {
            self.withdraw_pending(uri);
            log::debug!("Evicted {}", uri);
        }
    }

    /// Analyse `uri`, then the documents its includes pulled from disk.
    pub fn analyze(&mut self, uri: &Url) {
        let handler = IncludeHandler::new(self.params.include_roots.clone());
        let mut worklist = VecDeque::from([uri.clone()]);
        let mut visited = HashSet::new();
        let mut loaded = 0;
        while let Some(uri) = worklist.pop_front() {
            if !visited.insert(uri.clone()) {
                continue;
            }
            let unresolved = self.analyze_document(&uri);
            if handler.get_includes().is_empty() {
                continue;
            }
            for include in unresolved {
                if loaded >= self.params.max_disk_includes {
                    log::warn!(
                        "Reached {} includes loaded from disk while analysing {}",
                        self.params.max_disk_includes,
                        uri
                    );
                    break;
                }
                if self.missing_on_disk.contains(&include) {
                    continue;
                }
                let Some(path) = handler.search_path_in_includes(&include) else {
                    log::debug!("Include {} is not under the include roots", include);
                    self.missing_on_disk.insert(include);
                    continue;
                };
                match read_include(&path) {
                    Ok((include_uri, content)) => {
                        if self.documents.contains_key(&include_uri) {
                            continue;
                        }
                        log::info!("Loaded include {} from {}", include, path.display());
                        self.insert_document(&include_uri, None, ShaderText::new(content));
                        worklist.push_back(include_uri);
                        loaded += 1;
                    }
                    Err(err) => log::warn!("Failed to load include {}: {}", include, err),
                }
            }
        }
    }

    fn withdraw_pending(&mut self, uri: &Url) {
        self.pending_includes.retain(|_, owners| {
            owners.retain(|owner| owner != uri);
            !owners.is_empty()
        });
    }

    // Give `uri` to every document waiting for an include it matches.
    fn resolve_pending(&mut self, uri: &Url) {
        if !self.params.can_resolve_pending(uri) {
            return;
        }
        let matched: Vec<String> = self
            .pending_includes
            .keys()
            .filter(|include| uri_matches_include(uri, include))
            .cloned()
            .collect();
        for include in matched {
            let Some(owners) = self.pending_includes.remove(&include) else {
                continue;
            };
            for owner in owners {
                if let Some(document) = self.documents.get_mut(&owner) {
                    log::info!("Resolved pending include {} of {} to {}", include, owner, uri);
                    document.symbols.add_include(uri.clone());
                }
            }
        }
    }

    fn resolve_include(&self, uri: &Url, include: &str) -> Option<Url> {
        if is_relative_include(include) {
            return match IncludeHandler::resolve_relative(uri, include) {
                Ok(resolved) => Some(resolved),
                Err(err) => {
                    log::warn!("{}", err);
                    None
                }
            };
        }
        IncludeHandler::search_in_documents(
            include,
            self.documents.keys().filter(|known| *known != uri),
        )
    }

    // Rebuild the symbol table of a document. Returns the includes left pending.
    fn analyze_document(&mut self, uri: &Url) -> Vec<String> {
        self.withdraw_pending(uri);
        self.resolve_pending(uri);
        let Some(document) = self.documents.get(uri) else {
            return Vec::new();
        };
        let stats = document.tree.stats();
        log::debug!(
            "Parsed {}: {} declarations reused, {} reparsed",
            uri,
            stats.reused,
            stats.reparsed
        );
        let symbols = self
            .symbol_provider
            .query_file_symbols(&document.tree, &document.text);
        let mut table = ShaderSymbolTable::from_symbols(&symbols);
        let mut unresolved = Vec::new();
        for include in &symbols.includes {
            match self.resolve_include(uri, &include.path) {
                Some(resolved) => {
                    table.add_include(resolved);
                }
                None => {
                    log::debug!("Include {} of {} is pending", include.path, uri);
                    let owners = self
                        .pending_includes
                        .entry(include.path.clone())
                        .or_default();
                    if !owners.contains(uri) {
                        owners.push(uri.clone());
                    }
                    unresolved.push(include.path.clone());
                }
            }
        }
        if let Some(document) = self.documents.get_mut(uri) {
            document.symbols = table;
        }
        unresolved
    }

    /// Find a function visible from `uri`: its own functions, then those of its
    /// direct includes in resolution order. Includes of includes are not searched.
    pub fn query_function(&self, uri: &Url, name: &str) -> Option<(&Url, &ShaderFunction)> {
        let document = self.documents.get(uri)?;
        if let Some(function) = document.symbols.find_function(name) {
            return Some((&document.uri, function));
        }
        document.symbols.includes().iter().find_map(|include| {
            let included = self.documents.get(include)?;
            included
                .symbols
                .find_function(name)
                .map(|function| (&included.uri, function))
        })
    }

    fn find_called_function(
        &self,
        uri: &Url,
        position: &ShaderPosition,
    ) -> Option<(&Url, &ShaderFunction)> {
        let document = self.documents.get(uri)?;
        let name =
            self.symbol_provider
                .find_call_at_position(&document.tree, &document.text, position)?;
        self.query_function(uri, name)
    }

    /// Declaration start of the function called at `position`.
    pub fn resolve_definition(
        &self,
        uri: &Url,
        position: &ShaderPosition,
    ) -> Option<(Url, ShaderPosition)> {
        self.find_called_function(uri, position)
            .map(|(owner, function)| (owner.clone(), function.range.start))
    }

    /// Comment and signature of the function called at `position`.
    pub fn resolve_hover(&self, uri: &Url, position: &ShaderPosition) -> Option<String> {
        self.find_called_function(uri, position)
            .map(|(_, function)| function.format())
    }

    /// Parse errors of a document, one per error region.
    pub fn diagnostics(&self, uri: &Url) -> Vec<ShaderDiagnostic> {
        match self.documents.get(uri) {
            Some(document) => {
                self.symbol_provider
                    .query_file_errors(uri, &document.tree, &document.text)
            }
            None => Vec::new(),
        }
    }

    /// Functions of a document sorted by position.
    pub fn document_functions(&self, uri: &Url) -> Vec<&ShaderFunction> {
        let Some(document) = self.documents.get(uri) else {
            return Vec::new();
        };
        let mut functions: Vec<&ShaderFunction> = document.symbols.functions().collect();
        functions.sort_by_key(|function| function.range.start);
        functions
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pretty_assertions::assert_eq;

    use super::*;

    fn uri(path: &str) -> Url {
        Url::parse(&format!("file://{}", path)).unwrap()
    }

    fn names(workspace: &ShaderWorkspace, uri: &Url) -> Vec<String> {
        workspace
            .document_functions(uri)
            .into_iter()
            .map(|function| function.name.clone())
            .collect()
    }

    #[test]
    fn test_hover_through_include() {
        let mut workspace = ShaderWorkspace::default();
        let shared = uri("/project/shared.azsli");
        let main = uri("/project/main.azsl");
        workspace.open_document(&shared, 1, "// Entry.\nvoid main() { return; }\n");
        workspace.open_document(
            &main,
            1,
            "#include \"shared.azsli\"\nvoid caller()\n{\n    main();\n}\n",
        );
        let hover = workspace
            .resolve_hover(&main, &ShaderPosition::new(3, 6))
            .unwrap();
        assert!(hover.contains("void main()"), "{}", hover);
        assert_eq!(hover, "// Entry.\nvoid main()");
        assert_eq!(
            workspace.resolve_definition(&main, &ShaderPosition::new(3, 4)),
            Some((shared.clone(), ShaderPosition::new(1, 0)))
        );
        // Not a call.
        assert_eq!(workspace.resolve_hover(&main, &ShaderPosition::new(1, 6)), None);
    }

    #[test]
    fn test_pending_include_resolved_later() {
        let mut workspace = ShaderWorkspace::default();
        let main = uri("/project/main.azsl");
        workspace.open_document(
            &main,
            1,
            "#include \"shared.azsli\"\nfloat4 MainPS() : SV_Target { return Shade(); }\n",
        );
        assert!(workspace.get_document(&main).unwrap().symbols.includes().is_empty());
        assert_eq!(
            workspace.pending_includes().get("shared.azsli"),
            Some(&vec![main.clone()])
        );
        assert_eq!(workspace.resolve_hover(&main, &ShaderPosition::new(1, 38)), None);

        let shared = uri("/project/shared.azsli");
        workspace.open_document(&shared, 1, "float4 Shade() { return 1; }\n");
        assert!(workspace.pending_includes().is_empty());
        assert_eq!(
            workspace.get_document(&main).unwrap().symbols.includes(),
            &[shared.clone()]
        );
        assert_eq!(
            workspace.resolve_hover(&main, &ShaderPosition::new(1, 38)),
            Some("float4 Shade()".into())
        );
    }

    #[test]
    fn test_pending_include_keeps_every_owner() {
        let mut workspace = ShaderWorkspace::default();
        let a = uri("/project/a.azsl");
        let b = uri("/project/b.azsl");
        workspace.open_document(&a, 1, "#include \"shared.azsli\"\n");
        workspace.open_document(&b, 1, "#include \"shared.azsli\"\n");
        assert_eq!(workspace.pending_includes()["shared.azsli"], vec![a.clone(), b.clone()]);
        // Reanalysis replaces the registration of a instead of adding one.
        workspace
            .change_document(&a, 2, vec![ShaderChange::Full("#include \"shared.azsli\"\n".into())])
            .unwrap();
        assert_eq!(workspace.pending_includes()["shared.azsli"], vec![b.clone(), a.clone()]);
        let shared = uri("/project/lib/shared.azsli");
        workspace.open_document(&shared, 1, "void f();\n");
        assert_eq!(workspace.get_document(&a).unwrap().symbols.includes(), &[shared.clone()]);
        assert_eq!(workspace.get_document(&b).unwrap().symbols.includes(), &[shared]);
    }

    #[test]
    fn test_pending_include_suffix_boundary() {
        let mut workspace = ShaderWorkspace::default();
        let main = uri("/project/main.azsl");
        workspace.open_document(&main, 1, "#include \"shared.azsli\"\n");
        workspace.open_document(&uri("/project/unshared.azsli"), 1, "void f();\n");
        assert!(workspace.pending_includes().contains_key("shared.azsli"));
    }

    #[test]
    fn test_retry_extensions() {
        let mut workspace = ShaderWorkspace::new(ShaderSymbolParams {
            retry_extensions: vec![".azsli".into(), ".srgi".into()],
            ..Default::default()
        });
        let main = uri("/project/main.azsl");
        workspace.open_document(&main, 1, "#include \"shared\"\n");
        workspace.open_document(&uri("/project/shared"), 1, "void f();\n");
        assert!(workspace.pending_includes().contains_key("shared"));
    }

    #[test]
    fn test_duplicate_function_last_wins() {
        let mut workspace = ShaderWorkspace::default();
        let main = uri("/project/main.azsl");
        workspace.open_document(&main, 1, "void f(int a) {}\nvoid g() { f(1); }\nvoid f(float a) {}\n");
        assert_eq!(names(&workspace, &main), vec!["g", "f"]);
        assert_eq!(
            workspace.resolve_definition(&main, &ShaderPosition::new(1, 11)),
            Some((main.clone(), ShaderPosition::new(2, 0)))
        );
    }

    #[test]
    fn test_local_function_without_includes() {
        let mut workspace = ShaderWorkspace::default();
        let main = uri("/project/main.azsl");
        workspace.open_document(&main, 1, "float Twice(float x) { return x * 2; }\nfloat Use() { return Twice(1.0); }\n");
        assert_eq!(
            workspace.resolve_hover(&main, &ShaderPosition::new(1, 23)),
            Some("float Twice(float x)".into())
        );
    }

    #[test]
    fn test_one_hop_only() {
        let mut workspace = ShaderWorkspace::default();
        let a = uri("/project/a.azsl");
        let b = uri("/project/b.azsli");
        let c = uri("/project/c.azsli");
        workspace.open_document(&c, 1, "void FromC() {}\n");
        workspace.open_document(&b, 1, "#include \"c.azsli\"\nvoid FromB() {}\n");
        workspace.open_document(&a, 1, "#include \"b.azsli\"\n");
        assert!(workspace.query_function(&a, "FromB").is_some());
        assert!(workspace.query_function(&b, "FromC").is_some());
        assert!(workspace.query_function(&a, "FromC").is_none());
    }

    #[test]
    fn test_include_cycle_terminates() {
        let mut workspace = ShaderWorkspace::default();
        let a = uri("/project/a.azsli");
        let b = uri("/project/b.azsli");
        workspace.open_document(&a, 1, "#include \"b.azsli\"\nvoid FromA() {}\n");
        workspace.open_document(&b, 1, "#include \"a.azsli\"\nvoid FromB() {}\n");
        assert!(workspace.query_function(&a, "FromB").is_some());
        assert!(workspace.query_function(&b, "FromA").is_some());
        assert!(workspace.query_function(&a, "Missing").is_none());
    }

    #[test]
    fn test_relative_include() {
        let mut workspace = ShaderWorkspace::default();
        let main = uri("/project/shaders/main.azsl");
        workspace.open_document(&main, 1, "#include \"../common/light.azsli\"\n");
        assert_eq!(
            workspace.get_document(&main).unwrap().symbols.includes(),
            &[uri("/project/common/light.azsli")]
        );
        assert!(workspace.pending_includes().is_empty());
    }

    #[test]
    fn test_open_older_version_ignored() {
        let mut workspace = ShaderWorkspace::default();
        let main = uri("/project/main.azsl");
        assert!(workspace.open_document(&main, 2, "void New() {}\n"));
        assert!(!workspace.open_document(&main, 2, "void Old() {}\n"));
        assert!(!workspace.open_document(&main, 1, "void Old() {}\n"));
        assert_eq!(names(&workspace, &main), vec!["New"]);
    }

    #[test]
    fn test_incremental_changes_in_order() {
        let mut workspace = ShaderWorkspace::default();
        let main = uri("/project/main.azsl");
        workspace.open_document(&main, 1, "void a() {}\nvoid b() {}\nvoid c() {}\n");
        workspace
            .change_document(
                &main,
                2,
                vec![
                    // Rename b into bb, then insert a function using the new line count.
                    ShaderChange::Incremental {
                        range: ShaderRange::new(ShaderPosition::new(1, 5), ShaderPosition::new(1, 6)),
                        text: "bb".into(),
                    },
                    ShaderChange::Incremental {
                        range: ShaderRange::at(ShaderPosition::new(3, 0)),
                        text: "void d() { bb(); }\n".into(),
                    },
                ],
            )
            .unwrap();
        let document = workspace.get_document(&main).unwrap();
        assert_eq!(document.version, Some(2));
        assert_eq!(
            document.text.as_str(),
            "void a() {}\nvoid bb() {}\nvoid c() {}\nvoid d() { bb(); }\n"
        );
        assert_eq!(names(&workspace, &main), vec!["a", "bb", "c", "d"]);
        let fresh = AzslParser::new().parse(document.text.as_str(), None);
        assert_eq!(document.tree.root_node().to_sexp(), fresh.root_node().to_sexp());
        assert!(document.tree.stats().reused > 0);
        assert_eq!(
            workspace.resolve_definition(&main, &ShaderPosition::new(3, 12)),
            Some((main.clone(), ShaderPosition::new(1, 0)))
        );
    }

    #[test]
    fn test_incremental_change_unknown_document_reads_disk() {
        let mut workspace = ShaderWorkspace::default();
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("test/azsl/shared.azsli");
        let shared = Url::from_file_path(&path).unwrap();
        workspace
            .change_document(
                &shared,
                3,
                vec![ShaderChange::Incremental {
                    range: ShaderRange::at(ShaderPosition::zero()),
                    text: "ignored".into(),
                }],
            )
            .unwrap();
        let document = workspace.get_document(&shared).unwrap();
        assert_eq!(document.version, Some(3));
        assert!(document.symbols.find_function("ComputeLighting").is_some());

        let missing = uri("/project/missing.azsl");
        let change = ShaderChange::Incremental {
            range: ShaderRange::at(ShaderPosition::zero()),
            text: "x".into(),
        };
        assert!(workspace.change_document(&missing, 1, vec![change]).is_err());
        assert!(workspace.get_document(&missing).is_none());
    }

    #[test]
    fn test_close_document() {
        let mut workspace = ShaderWorkspace::default();
        let main = uri("/project/main.azsl");
        workspace.open_document(&main, 1, "#include \"shared.azsli\"\nvoid f() {}\n");
        workspace.close_document(&main);
        assert!(workspace.query_function(&main, "f").is_some());

        workspace.set_params(ShaderSymbolParams {
            evict_on_close: true,
            ..Default::default()
        });
        workspace.close_document(&main);
        assert!(workspace.query_function(&main, "f").is_none());
        assert!(workspace.pending_includes().is_empty());
    }

    #[test]
    fn test_diagnostics() {
        let mut workspace = ShaderWorkspace::default();
        let main = uri("/project/main.azsl");
        workspace.open_document(&main, 1, "void f() {}\n) )\nvoid g() {}\n");
        let diagnostics = workspace.diagnostics(&main);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].range.range.start, ShaderPosition::new(1, 0));
        assert_eq!(names(&workspace, &main), vec!["f", "g"]);
        assert!(workspace.diagnostics(&uri("/project/unknown.azsl")).is_empty());
    }

    #[test]
    fn test_disk_include_discovery() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("test/azsl/disk");
        let mut workspace = ShaderWorkspace::new(ShaderSymbolParams {
            include_roots: vec![root.clone()],
            ..Default::default()
        });
        let entry = uri("/virtual/entry.azsl");
        workspace.open_document(&entry, 1, "#include \"lib/common.azsli\"\nfloat Use() { return CommonScale(1.0); }\n");
        let common = Url::from_file_path(root.join("lib/common.azsli")).unwrap();
        let deep = Url::from_file_path(root.join("lib/deep.azsli")).unwrap();
        assert_eq!(workspace.get_document(&common).unwrap().version, None);
        assert!(workspace.get_document(&deep).is_some());
        assert!(workspace.pending_includes().is_empty());
        assert_eq!(
            workspace.resolve_definition(&entry, &ShaderPosition::new(1, 22)),
            Some((common.clone(), ShaderPosition::new(2, 0)))
        );
        assert!(workspace.query_function(&entry, "DeepScale").is_none());
        assert!(workspace.query_function(&common, "DeepScale").is_some());
        assert_eq!(
            workspace.get_document(&deep).unwrap().symbols.includes(),
            &[common.clone()]
        );
        // The editor opening a disk document replaces it.
        assert!(workspace.open_document(&common, 1, "float CommonScale(float value) { return value; }\n"));
        assert_eq!(workspace.get_document(&common).unwrap().version, Some(1));
    }

    #[test]
    fn test_editor_open_at_version_zero_replaces_disk_document() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("test/azsl/disk");
        let mut workspace = ShaderWorkspace::new(ShaderSymbolParams {
            include_roots: vec![root.clone()],
            ..Default::default()
        });
        let entry = uri("/virtual/entry.azsl");
        workspace.open_document(&entry, 0, "#include \"lib/common.azsli\"\n");
        let common = Url::from_file_path(root.join("lib/common.azsli")).unwrap();
        assert_eq!(workspace.get_document(&common).unwrap().version, None);
        assert!(workspace.open_document(&common, 0, "float EditorOnly() { return 1.0; }\n"));
        assert_eq!(names(&workspace, &common), vec!["EditorOnly"]);
        // A second open at the same editor version is stale.
        assert!(!workspace.open_document(&common, 0, "float Other() { return 1.0; }\n"));
        assert_eq!(names(&workspace, &common), vec!["EditorOnly"]);
    }

    #[test]
    fn test_missing_disk_include_searched_once() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("test/azsl/disk");
        let mut workspace = ShaderWorkspace::new(ShaderSymbolParams {
            include_roots: vec![root.clone()],
            ..Default::default()
        });
        let entry = uri("/virtual/entry.azsl");
        workspace.open_document(&entry, 1, "#include \"missing.azsli\"\n");
        assert!(workspace.missing_on_disk.contains("missing.azsli"));
        workspace
            .change_document(&entry, 2, vec![ShaderChange::Full("#include \"missing.azsli\"\n// edit\n".into())])
            .unwrap();
        assert_eq!(workspace.missing_on_disk.len(), 1);
        assert!(workspace.pending_includes().contains_key("missing.azsli"));
        // New roots search again.
        workspace.set_params(ShaderSymbolParams {
            include_roots: vec![root],
            ..Default::default()
        });
        assert!(workspace.missing_on_disk.is_empty());
    }

    #[test]
    fn test_disk_include_bound() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("test/azsl/disk");
        let mut workspace = ShaderWorkspace::new(ShaderSymbolParams {
            include_roots: vec![root],
            max_disk_includes: 1,
            ..Default::default()
        });
        let entry = uri("/virtual/entry.azsl");
        workspace.open_document(&entry, 1, "#include \"lib/common.azsli\"\n");
        assert_eq!(workspace.documents().count(), 2);
        assert!(workspace.pending_includes().contains_key("deep.azsli"));
    }

    #[test]
    fn test_reset() {
        let mut workspace = ShaderWorkspace::default();
        let main = uri("/project/main.azsl");
        workspace.open_document(&main, 1, "#include \"shared.azsli\"\n");
        workspace.reset();
        assert!(workspace.get_document(&main).is_none());
        assert!(workspace.pending_includes().is_empty());
    }
}
