//! Wire representation of [`rn_core::PlannedEdits`] (spec §3, §6).

use std::collections::HashMap;
use std::sync::Arc;

use rn_core::{AnnotationId, Capture, DocumentEdit, IllegalRenameReason, PlannedEdits};
use rn_workspace_index::SourceFileProvider;
use serde::{Deserialize, Serialize};

use crate::range::{RangeConversionError, RangeConverter, WireLocation, WireRange};

/// One textual replacement, wire form of [`rn_core::TextEdit`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireTextEdit {
    /// The range to replace.
    pub range: WireRange,
    /// The escaped replacement text.
    pub new_text: String,
    /// The annotation id this edit carries, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation_id: Option<AnnotationId>,
}

/// Wire form of [`DocumentEdit`], tagged by `kind` for JSON transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum WireDocumentEdit {
    /// Text replacements within one file.
    Changed {
        /// The edited file's id.
        file: Arc<str>,
        /// The replacements.
        edits: Vec<WireTextEdit>,
    },
    /// A file rename, implied by a `moduleName` rename.
    Renamed {
        /// The file's old path.
        from: Arc<str>,
        /// The file's new path.
        to: Arc<str>,
    },
    /// A new file was created.
    Created {
        /// The created file.
        file: Arc<str>,
    },
    /// A file was removed.
    Removed {
        /// The removed file.
        file: Arc<str>,
    },
}

/// Wire form of [`rn_core::ChangeAnnotation`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireChangeAnnotation {
    /// Short user-visible label.
    pub label: String,
    /// Longer explanation.
    pub description: String,
    /// Whether the host should prompt before applying this edit.
    pub needs_confirmation: bool,
}

/// The successful result of a `renameSymbol` call (spec §6).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireEdits {
    /// Every document edit to apply.
    pub document_changes: Vec<WireDocumentEdit>,
    /// Annotations referenced by `document_changes`, keyed by id as a string
    /// (JSON object keys must be strings).
    pub change_annotations: HashMap<String, WireChangeAnnotation>,
}

/// Convert a planned edit set to its wire form, resolving every byte-offset
/// range to a UTF-16 one via `provider`.
pub fn to_wire(plan: &PlannedEdits, provider: &dyn SourceFileProvider) -> Result<WireEdits, RangeConversionError> {
    let mut converter = RangeConverter::new(provider);
    let mut document_changes = Vec::with_capacity(plan.edits.len());
    for edit in &plan.edits {
        document_changes.push(match edit {
            DocumentEdit::Changed { file, edits } => {
                let mut wire_edits = Vec::with_capacity(edits.len());
                for text_edit in edits {
                    let wire_range = converter.convert(&text_edit.range)?.range;
                    wire_edits.push(WireTextEdit {
                        range: wire_range,
                        new_text: text_edit.new_text.clone(),
                        annotation_id: text_edit.annotation,
                    });
                }
                WireDocumentEdit::Changed { file: file.clone(), edits: wire_edits }
            }
            DocumentEdit::Renamed { from, to } => {
                WireDocumentEdit::Renamed { from: from.clone(), to: to.clone() }
            }
            DocumentEdit::Created { file } => WireDocumentEdit::Created { file: file.clone() },
            DocumentEdit::Removed { file } => WireDocumentEdit::Removed { file: file.clone() },
        });
    }
    let change_annotations = plan
        .annotations
        .iter()
        .map(|(id, annotation)| {
            (
                id.to_string(),
                WireChangeAnnotation {
                    label: annotation.label.clone(),
                    description: annotation.description.clone(),
                    needs_confirmation: annotation.needs_confirmation,
                },
            )
        })
        .collect();
    Ok(WireEdits { document_changes, change_annotations })
}

/// One witness location with an explanatory message, wire form of
/// [`rn_core::UnsupportedRenameIssue`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireIssue {
    /// The offending location.
    pub location: WireLocation,
    /// A human-readable explanation.
    pub message: String,
}

/// Wire form of [`IllegalRenameReason`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "camelCase")]
pub enum WireIllegalReason {
    /// The escaped new name is not a legal identifier.
    InvalidName {
        /// The name that failed to parse.
        new_name: String,
    },
    /// A resolved define lies outside the known workspace files.
    DefinitionsOutsideWorkspace {
        /// The out-of-workspace define locations.
        locations: Vec<WireLocation>,
    },
    /// Renaming would collide with a pre-existing, non-overloadable
    /// declaration of the new name.
    DoubleDeclaration {
        /// The define being renamed.
        current: WireLocation,
        /// The pre-existing define it collides with.
        existing: WireLocation,
    },
    /// Renaming would change what some use resolves to.
    CaptureChange {
        /// Every detected capture, as a free-form description plus its
        /// witness locations (the three capture sub-cases don't need
        /// separate wire shapes; a host only needs to show the user where).
        captures: Vec<WireCapture>,
    },
}

/// Wire form of [`Capture`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireCapture {
    /// Which capture sub-case this is.
    pub kind: &'static str,
    /// The locations implicated, in the order the sub-case names them.
    pub locations: Vec<WireLocation>,
}

fn convert_reason(
    reason: &IllegalRenameReason,
    converter: &mut RangeConverter<'_>,
) -> Result<WireIllegalReason, RangeConversionError> {
    Ok(match reason {
        IllegalRenameReason::InvalidName { new_name } => {
            WireIllegalReason::InvalidName { new_name: new_name.clone() }
        }
        IllegalRenameReason::DefinitionsOutsideWorkspace { locations } => {
            let mut wire_locations = Vec::with_capacity(locations.len());
            for loc in locations {
                wire_locations.push(converter.convert(loc)?);
            }
            WireIllegalReason::DefinitionsOutsideWorkspace { locations: wire_locations }
        }
        IllegalRenameReason::DoubleDeclaration { current, existing } => {
            WireIllegalReason::DoubleDeclaration {
                current: converter.convert(current)?,
                existing: converter.convert(existing)?,
            }
        }
        IllegalRenameReason::CaptureChange { captures } => {
            let mut wire_captures = Vec::with_capacity(captures.len());
            for capture in captures {
                wire_captures.push(convert_capture(capture, converter)?);
            }
            WireIllegalReason::CaptureChange { captures: wire_captures }
        }
    })
}

fn convert_capture(
    capture: &Capture,
    converter: &mut RangeConverter<'_>,
) -> Result<WireCapture, RangeConversionError> {
    Ok(match capture {
        Capture::ImplicitBecomesUse { implicit_definition, absorbed_by } => WireCapture {
            kind: "implicitBecomesUse",
            locations: vec![converter.convert(implicit_definition)?, converter.convert(absorbed_by)?],
        },
        Capture::CurrentUseShadowed { use_location, new_definer } => WireCapture {
            kind: "currentUseShadowed",
            locations: vec![converter.convert(use_location)?, converter.convert(new_definer)?],
        },
        Capture::NewUseShadowed { use_location, new_definer } => WireCapture {
            kind: "newUseShadowed",
            locations: vec![converter.convert(use_location)?, converter.convert(new_definer)?],
        },
    })
}

/// Convert every reason in `reasons` to wire form.
pub fn reasons_to_wire(
    reasons: &[IllegalRenameReason],
    provider: &dyn SourceFileProvider,
) -> Result<Vec<WireIllegalReason>, RangeConversionError> {
    let mut converter = RangeConverter::new(provider);
    reasons.iter().map(|r| convert_reason(r, &mut converter)).collect()
}

/// Convert a locator/planner issue list to wire form.
pub fn issues_to_wire(
    issues: &[rn_core::UnsupportedRenameIssue],
    provider: &dyn SourceFileProvider,
) -> Result<Vec<WireIssue>, RangeConversionError> {
    let mut converter = RangeConverter::new(provider);
    issues
        .iter()
        .map(|issue| {
            Ok(WireIssue { location: converter.convert(&issue.location)?, message: issue.message.clone() })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use rn_core::{DocumentEdit, TextEdit};
    use rn_source::SourceLocation;
    use rn_test_support::must;
    use rn_workspace_index::InMemorySourceProvider;

    use super::*;

    #[test]
    fn changed_edit_converts_its_ranges() {
        let provider = InMemorySourceProvider::new(vec![(
            PathBuf::from("/ws/M.lang"),
            "module M;\nint f(int a) { return a; }\n".to_string(),
        )]);
        let plan = PlannedEdits {
            edits: vec![DocumentEdit::Changed {
                file: "/ws/M.lang".into(),
                edits: vec![TextEdit {
                    range: SourceLocation::new("/ws/M.lang", 14, 15),
                    new_text: "x".to_string(),
                    annotation: None,
                }],
            }],
            annotations: HashMap::new(),
        };
        let wire = must(to_wire(&plan, &provider));
        assert_eq!(wire.document_changes.len(), 1);
        match &wire.document_changes[0] {
            WireDocumentEdit::Changed { edits, .. } => {
                assert_eq!(edits[0].new_text, "x");
                assert_eq!(edits[0].range.start.line, 1);
            }
            other => panic!("expected Changed, got {other:?}"),
        }
    }

    #[test]
    fn renamed_edit_passes_through_without_reading_any_file() {
        let provider = InMemorySourceProvider::new(Vec::<(PathBuf, String)>::new());
        let plan = PlannedEdits {
            edits: vec![DocumentEdit::Renamed { from: "/ws/M.lang".into(), to: "/ws/N.lang".into() }],
            annotations: HashMap::new(),
        };
        let wire = must(to_wire(&plan, &provider));
        assert_eq!(
            wire.document_changes,
            vec![WireDocumentEdit::Renamed { from: "/ws/M.lang".into(), to: "/ws/N.lang".into() }]
        );
    }
}
