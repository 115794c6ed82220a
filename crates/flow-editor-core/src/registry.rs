//! Input handler registry: which handler an input type routes to.

use std::fmt;

use crate::input::InputType;
use crate::model::StyleKey;

/// The handlers the pipeline knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputHandler {
    /// Remove the target range.
    DeleteSelection,
    /// Flip a character style across the target range.
    ToggleStyle(StyleKey),
    /// Insert extracted content, with the native fast path for typed text.
    InsertContent,
    /// Split the paragraph, keeping its style on both halves.
    InsertParagraph,
}

impl fmt::Display for InputHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputHandler::DeleteSelection => f.write_str("delete-selection"),
            InputHandler::ToggleStyle(key) => write!(f, "toggle-style({})", key.as_str()),
            InputHandler::InsertContent => f.write_str("insert-content"),
            InputHandler::InsertParagraph => f.write_str("insert-paragraph"),
        }
    }
}

/// Handler registered for `input_type`.
///
/// `None` means the event is not ours: the browser's default behavior must be
/// left alone. `insertFromPasteAsQuotation` and `insertCompositionText` are
/// unmapped.
pub fn lookup(input_type: &InputType) -> Option<InputHandler> {
    use InputType::*;

    let handler = match input_type {
        DeleteContentBackward | DeleteContentForward | DeleteContent | DeleteByCut
        | DeleteByDrag => InputHandler::DeleteSelection,

        FormatBold => InputHandler::ToggleStyle(StyleKey::Bold),
        FormatItalic => InputHandler::ToggleStyle(StyleKey::Italic),
        FormatUnderline => InputHandler::ToggleStyle(StyleKey::Underline),
        FormatStrikeThrough => InputHandler::ToggleStyle(StyleKey::Strike),

        InsertFromComposition | InsertFromDrop | InsertFromPaste | InsertFromYank
        | InsertLineBreak | InsertReplacementText | InsertText | InsertTranspose => {
            InputHandler::InsertContent
        }

        InsertParagraph => InputHandler::InsertParagraph,

        _ => return None,
    };
    Some(handler)
}
