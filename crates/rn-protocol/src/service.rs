//! Top-level `renameSymbol`/`prepareRename` operations (spec §6): wire
//! params in, wire result or JSON-RPC error out.

use std::path::PathBuf;

use rn_driver::{CancellationToken, ProgressReporter, RenameDriver};
use rn_source::LineIndex;
use rn_workspace_index::SourceFileProvider;
use serde::{Deserialize, Serialize};

use crate::edits::{WireEdits, to_wire};
use crate::error::to_json_rpc_error;
use crate::jsonrpc::{JsonRpcError, UNEXPECTED_FAILURE};
use crate::range::{RangeConverter, WireLocation, WirePosition};

/// `renameSymbol` request params (spec §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameSymbolParams {
    /// The cursor file's id (its path, as the engine addresses it).
    pub uri: String,
    /// The cursor position, in UTF-16 wire coordinates.
    pub position: WirePosition,
    /// The name to rename to.
    pub new_name: String,
    /// Every workspace folder the client has open.
    pub workspace_folders: Vec<String>,
}

fn byte_offset(
    provider: &dyn SourceFileProvider,
    path: &std::path::Path,
    position: WirePosition,
) -> Result<usize, JsonRpcError> {
    let text =
        provider.read(path).map_err(|err| JsonRpcError::new(UNEXPECTED_FAILURE, err.to_string()))?;
    let index = LineIndex::new(&text);
    Ok(index.position_to_offset(&text, position.line, position.character))
}

/// Run a rename end to end: decode wire params, drive the engine, encode
/// the result (or map its failure to a JSON-RPC error).
pub fn rename_symbol(
    driver: &RenameDriver,
    provider: &dyn SourceFileProvider,
    params: &RenameSymbolParams,
    progress: &dyn ProgressReporter,
    cancel: &CancellationToken,
) -> Result<WireEdits, JsonRpcError> {
    let cursor_file = PathBuf::from(&params.uri);
    let position = byte_offset(provider, &cursor_file, params.position)?;
    let workspace_folders: Vec<PathBuf> = params.workspace_folders.iter().map(PathBuf::from).collect();

    let plan = driver
        .rename(&cursor_file, position, &workspace_folders, &params.new_name, progress, cancel)
        .map_err(|err| to_json_rpc_error(&err, provider))?;

    to_wire(&plan, provider).map_err(|err| JsonRpcError::new(UNEXPECTED_FAILURE, err.to_string()))
}

/// Run the `prepareRename` capability check: `Some(location)` if the cursor
/// designates a renameable entity, `None` if it plainly doesn't, or an
/// error if classification itself failed (e.g. an unresolved data field).
pub fn prepare_rename(
    driver: &RenameDriver,
    provider: &dyn SourceFileProvider,
    uri: &str,
    position: WirePosition,
    workspace_folders: &[String],
) -> Result<Option<WireLocation>, JsonRpcError> {
    let cursor_file = PathBuf::from(uri);
    let byte_pos = byte_offset(provider, &cursor_file, position)?;
    let folders: Vec<PathBuf> = workspace_folders.iter().map(PathBuf::from).collect();

    let found = driver
        .can_rename_at(&cursor_file, &folders, byte_pos)
        .map_err(|err| to_json_rpc_error(&err, provider))?;

    let Some((location, _name)) = found else {
        return Ok(None);
    };
    let mut converter = RangeConverter::new(provider);
    let wire_location = converter
        .convert(&location)
        .map_err(|err| JsonRpcError::new(UNEXPECTED_FAILURE, err.to_string()))?;
    Ok(Some(wire_location))
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    use rn_ast::{ToyAnalyzer, ToyParser};
    use rn_driver::NoopProgress;
    use rn_test_support::must;
    use rn_workspace_index::{InMemorySourceProvider, PathConfigForFolder, WorkspacePathConfig};

    use super::*;

    struct NoConfig;
    impl PathConfigForFolder for NoConfig {
        fn path_config_for_folder(&self, _folder: &Path) -> Option<WorkspacePathConfig> {
            None
        }
    }

    #[test]
    fn rename_symbol_round_trips_through_wire_params_and_wire_result() {
        let source = "module M;\nint f(int a) { return a; }\n";
        let provider =
            InMemorySourceProvider::new(vec![(PathBuf::from("/ws/M.lang"), source.to_string())]);
        let driver = RenameDriver::new(
            Arc::new(provider.clone()),
            Arc::new(ToyParser),
            Arc::new(ToyAnalyzer),
            Arc::new(NoConfig),
        );

        let index = LineIndex::new(source);
        let param_byte = source.find("int a)").map(|p| p + 4).expect("param a present");
        let (line, character) = index.offset_to_position(source, param_byte);

        let params = RenameSymbolParams {
            uri: "/ws/M.lang".to_string(),
            position: WirePosition { line, character },
            new_name: "x".to_string(),
            workspace_folders: vec!["/ws".to_string()],
        };

        let wire = must(rename_symbol(&driver, &provider, &params, &NoopProgress, &CancellationToken::new()));
        assert_eq!(wire.document_changes.len(), 1);
    }

    #[test]
    fn prepare_rename_on_a_literal_returns_none() {
        let source = "module M;\nint a = 1;\n";
        let provider =
            InMemorySourceProvider::new(vec![(PathBuf::from("/ws/M.lang"), source.to_string())]);
        let driver = RenameDriver::new(
            Arc::new(provider.clone()),
            Arc::new(ToyParser),
            Arc::new(ToyAnalyzer),
            Arc::new(NoConfig),
        );
        let index = LineIndex::new(source);
        let literal_byte = source.rfind('1').expect("literal present");
        let (line, character) = index.offset_to_position(source, literal_byte);
        let found = must(prepare_rename(
            &driver,
            &provider,
            "/ws/M.lang",
            WirePosition { line, character },
            &["/ws".to_string()],
        ));
        assert!(found.is_none());
    }
}
