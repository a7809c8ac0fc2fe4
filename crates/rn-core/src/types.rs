//! Output vocabulary for the Legality Checker and Edit Planner (spec §3,
//! §6 "Error shape", §7).

use std::collections::HashMap;

use rn_source::SourceLocation;

/// An identifier for a [`ChangeAnnotation`], stable within one rename call.
pub type AnnotationId = u32;

/// `<location, optional changeAnnotationId>` (spec §3 "RenameLocation").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameLocation {
    /// The identifier sub-location to replace.
    pub location: SourceLocation,
    /// The annotation this edit should carry, if any.
    pub annotation: Option<AnnotationId>,
}

/// One textual replacement within a file (spec §3 "TextEdit").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    /// The range to replace.
    pub range: SourceLocation,
    /// The replacement text (the escaped new name).
    pub new_text: String,
    /// The annotation this edit should carry, if any.
    pub annotation: Option<AnnotationId>,
}

/// A file-scoped or file-level edit (spec §3 "DocumentEdit").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEdit {
    /// Text replacements within one file.
    Changed {
        /// The file being edited.
        file: std::sync::Arc<str>,
        /// The replacements, in no particular order.
        edits: Vec<TextEdit>,
    },
    /// A file rename (implied by a `moduleName` rename).
    Renamed {
        /// The file's old path.
        from: std::sync::Arc<str>,
        /// The file's new path.
        to: std::sync::Arc<str>,
    },
    /// A new file was created. Unused by the rename engine today — present
    /// so the wire format (`rn-protocol`) has a total mapping from the
    /// spec's four-variant `DocumentEdit` union.
    Created {
        /// The created file.
        file: std::sync::Arc<str>,
    },
    /// A file was removed. Unused by the rename engine today, same reason
    /// as `Created`.
    Removed {
        /// The removed file.
        file: std::sync::Arc<str>,
    },
}

/// A user-visible label/description plus a "needs confirmation" flag for
/// cross-file or risky edits (spec §3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeAnnotation {
    /// Short user-visible label.
    pub label: String,
    /// Longer explanation.
    pub description: String,
    /// Whether the host should prompt before applying this edit.
    pub needs_confirmation: bool,
}

/// The result of a successful Edit Planner run (spec §4.6 step 4).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlannedEdits {
    /// Every document edit to apply.
    pub edits: Vec<DocumentEdit>,
    /// Annotations referenced by `edits`, keyed by id.
    pub annotations: HashMap<AnnotationId, ChangeAnnotation>,
}

/// One witness location with an explanatory message, carried by
/// `unsupportedRename` (spec §6 "Error shape").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedRenameIssue {
    /// The offending location.
    pub location: SourceLocation,
    /// A human-readable explanation.
    pub message: String,
}

impl From<crate::locator::UnsupportedRenameIssue> for UnsupportedRenameIssue {
    fn from(issue: crate::locator::UnsupportedRenameIssue) -> Self {
        UnsupportedRenameIssue { location: issue.location, message: issue.message }
    }
}

/// One kind of illegality a rename can be rejected for (spec §7).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IllegalRenameReason {
    /// The escaped new name is not a legal identifier of the syntactic
    /// category the cursor's role requires.
    InvalidName {
        /// The name that failed to parse.
        new_name: String,
    },
    /// A member of the resolved define set is not in the workspace's
    /// known source files.
    DefinitionsOutsideWorkspace {
        /// The out-of-workspace define locations.
        locations: Vec<SourceLocation>,
    },
    /// Renaming would collide with an existing, non-overloadable
    /// declaration of the new name (spec §4.5 item 3).
    DoubleDeclaration {
        /// The define being renamed.
        current: SourceLocation,
        /// The pre-existing define of the new name it collides with.
        existing: SourceLocation,
    },
    /// Renaming would change what some use resolves to (spec §4.5 item 4).
    CaptureChange {
        /// Every detected capture.
        captures: Vec<Capture>,
    },
}

/// One capture witness (spec §4.5 item 4 / GLOSSARY "Capture").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capture {
    /// An implicit definition of the new name inside a current
    /// definition's scope would become a use of that definition.
    ImplicitBecomesUse {
        /// The implicit definition that would be absorbed.
        implicit_definition: SourceLocation,
        /// The current definition it would resolve to.
        absorbed_by: SourceLocation,
    },
    /// A current use under the renamed define's scope, whose defining
    /// scope strictly contains that scope, would resolve to the renamed
    /// define after rename.
    CurrentUseShadowed {
        /// The use that would be captured.
        use_location: SourceLocation,
        /// The renamed define that would newly shadow it.
        new_definer: SourceLocation,
    },
    /// A use of the new name inside the renamed define's scope would
    /// resolve to the renamed define instead of its current target.
    NewUseShadowed {
        /// The use that would be captured.
        use_location: SourceLocation,
        /// The renamed define that would newly shadow it.
        new_definer: SourceLocation,
    },
}
