//! Error taxonomy for workspace indexing (spec §7 surfaces checker errors
//! by aborting the rename that touches the offending file).

use rn_ast::OracleError;
use thiserror::Error;

/// Failure modes while building or querying a [`crate::WorkspaceIndex`].
#[derive(Debug, Clone, Error)]
pub enum WorkspaceIndexError {
    /// The parser or type checker failed on a file the index needed.
    #[error("failed to load {file}: {source}")]
    Load {
        /// The file that failed to load.
        file: String,
        /// The underlying oracle failure.
        #[source]
        source: OracleError,
    },
    /// The cursor file does not lie under any configured workspace folder.
    #[error("cursor file {file} is not under any workspace folder")]
    NoEnclosingFolder {
        /// The file that could not be matched to a folder.
        file: String,
    },
}
