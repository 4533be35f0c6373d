//! Keyboard accelerators. Each maps onto an existing transition; none adds
//! state of its own.

/// A key press with the context needed to interpret it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyInput {
	/// `KeyboardEvent.key` value, e.g. `"k"`, `"/"`, `"Escape"`.
	pub key: String,
	/// Platform modifier held (Ctrl, or Cmd on macOS).
	pub modifier: bool,
	/// The search field has focus.
	pub search_focused: bool,
	/// Some other text input has focus.
	pub editable_focused: bool,
	/// The query is non-empty.
	pub has_query: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
	/// Move focus to the search field.
	FocusSearch,
	/// Empty the query, then reset as a background click does.
	ClearSearch,
	/// Background-click reset.
	Deselect,
}

pub fn interpret(input: &KeyInput) -> Option<KeyCommand> {
	let other_input = input.editable_focused && !input.search_focused;
	match input.key.as_str() {
		"k" | "K" if input.modifier => Some(KeyCommand::FocusSearch),
		"Backspace" | "Delete" if input.modifier && !other_input => Some(KeyCommand::ClearSearch),
		"/" if !input.modifier && !input.search_focused && !input.editable_focused => {
			Some(KeyCommand::FocusSearch)
		}
		"Escape" if input.search_focused && input.has_query => Some(KeyCommand::ClearSearch),
		"Escape" => Some(KeyCommand::Deselect),
		_ => None,
	}
}
