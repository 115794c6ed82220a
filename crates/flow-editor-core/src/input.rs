//! Input types from browser edit events.
//!
//! `InputType` is the semantic intent of an edit event as named by the W3C
//! Input Events specification. Parsing is total: values this crate does not
//! know are kept verbatim in `Unknown`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InputType {
    // === Insertion ===
    /// Insert typed text.
    InsertText,
    /// Replace the current composition string.
    InsertCompositionText,
    /// Commit a composition.
    InsertFromComposition,
    /// Insert a line break (Shift+Enter).
    InsertLineBreak,
    /// Insert a paragraph break (Enter).
    InsertParagraph,
    InsertFromPaste,
    InsertFromPasteAsQuotation,
    InsertFromDrop,
    /// Insert replacement text (spell check, autocorrect).
    InsertReplacementText,
    /// Insert from kill buffer (Ctrl+Y on macOS).
    InsertFromYank,
    /// Transpose the characters around the caret.
    InsertTranspose,
    InsertHorizontalRule,
    InsertOrderedList,
    InsertUnorderedList,
    InsertLink,

    // === Deletion ===
    /// Delete content backward (Backspace).
    DeleteContentBackward,
    /// Delete content forward (Delete key).
    DeleteContentForward,
    DeleteWordBackward,
    DeleteWordForward,
    DeleteSoftLineBackward,
    DeleteSoftLineForward,
    DeleteEntireSoftLine,
    DeleteHardLineBackward,
    DeleteHardLineForward,
    DeleteByCut,
    DeleteByDrag,
    /// Generic content deletion.
    DeleteContent,

    // === History ===
    HistoryUndo,
    HistoryRedo,

    // === Formatting ===
    FormatBold,
    FormatItalic,
    FormatUnderline,
    FormatStrikeThrough,
    FormatSuperscript,
    FormatSubscript,

    /// Unrecognized input type.
    Unknown(String),
}

impl InputType {
    /// Parse a W3C `inputType` string.
    pub fn parse(s: &str) -> Self {
        match s {
            "insertText" => Self::InsertText,
            "insertCompositionText" => Self::InsertCompositionText,
            "insertFromComposition" => Self::InsertFromComposition,
            "insertLineBreak" => Self::InsertLineBreak,
            "insertParagraph" => Self::InsertParagraph,
            "insertFromPaste" => Self::InsertFromPaste,
            "insertFromPasteAsQuotation" => Self::InsertFromPasteAsQuotation,
            "insertFromDrop" => Self::InsertFromDrop,
            "insertReplacementText" => Self::InsertReplacementText,
            "insertFromYank" => Self::InsertFromYank,
            "insertTranspose" => Self::InsertTranspose,
            "insertHorizontalRule" => Self::InsertHorizontalRule,
            "insertOrderedList" => Self::InsertOrderedList,
            "insertUnorderedList" => Self::InsertUnorderedList,
            "insertLink" => Self::InsertLink,

            "deleteContentBackward" => Self::DeleteContentBackward,
            "deleteContentForward" => Self::DeleteContentForward,
            "deleteWordBackward" => Self::DeleteWordBackward,
            "deleteWordForward" => Self::DeleteWordForward,
            "deleteSoftLineBackward" => Self::DeleteSoftLineBackward,
            "deleteSoftLineForward" => Self::DeleteSoftLineForward,
            "deleteEntireSoftLine" => Self::DeleteEntireSoftLine,
            "deleteHardLineBackward" => Self::DeleteHardLineBackward,
            "deleteHardLineForward" => Self::DeleteHardLineForward,
            "deleteByCut" => Self::DeleteByCut,
            "deleteByDrag" => Self::DeleteByDrag,
            "deleteContent" => Self::DeleteContent,

            "historyUndo" => Self::HistoryUndo,
            "historyRedo" => Self::HistoryRedo,

            "formatBold" => Self::FormatBold,
            "formatItalic" => Self::FormatItalic,
            "formatUnderline" => Self::FormatUnderline,
            "formatStrikeThrough" => Self::FormatStrikeThrough,
            "formatSuperscript" => Self::FormatSuperscript,
            "formatSubscript" => Self::FormatSubscript,

            other => Self::Unknown(other.to_string()),
        }
    }

    /// The W3C string for this input type.
    pub fn as_str(&self) -> &str {
        match self {
            Self::InsertText => "insertText",
            Self::InsertCompositionText => "insertCompositionText",
            Self::InsertFromComposition => "insertFromComposition",
            Self::InsertLineBreak => "insertLineBreak",
            Self::InsertParagraph => "insertParagraph",
            Self::InsertFromPaste => "insertFromPaste",
            Self::InsertFromPasteAsQuotation => "insertFromPasteAsQuotation",
            Self::InsertFromDrop => "insertFromDrop",
            Self::InsertReplacementText => "insertReplacementText",
            Self::InsertFromYank => "insertFromYank",
            Self::InsertTranspose => "insertTranspose",
            Self::InsertHorizontalRule => "insertHorizontalRule",
            Self::InsertOrderedList => "insertOrderedList",
            Self::InsertUnorderedList => "insertUnorderedList",
            Self::InsertLink => "insertLink",
            Self::DeleteContentBackward => "deleteContentBackward",
            Self::DeleteContentForward => "deleteContentForward",
            Self::DeleteWordBackward => "deleteWordBackward",
            Self::DeleteWordForward => "deleteWordForward",
            Self::DeleteSoftLineBackward => "deleteSoftLineBackward",
            Self::DeleteSoftLineForward => "deleteSoftLineForward",
            Self::DeleteEntireSoftLine => "deleteEntireSoftLine",
            Self::DeleteHardLineBackward => "deleteHardLineBackward",
            Self::DeleteHardLineForward => "deleteHardLineForward",
            Self::DeleteByCut => "deleteByCut",
            Self::DeleteByDrag => "deleteByDrag",
            Self::DeleteContent => "deleteContent",
            Self::HistoryUndo => "historyUndo",
            Self::HistoryRedo => "historyRedo",
            Self::FormatBold => "formatBold",
            Self::FormatItalic => "formatItalic",
            Self::FormatUnderline => "formatUnderline",
            Self::FormatStrikeThrough => "formatStrikeThrough",
            Self::FormatSuperscript => "formatSuperscript",
            Self::FormatSubscript => "formatSubscript",
            Self::Unknown(s) => s,
        }
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for InputType {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}
