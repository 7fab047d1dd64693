//! UI store: cart modal, global spinner and toast.

use serde::{Deserialize, Serialize};

use super::action::Action;
use super::core::Reducer;

/// Toast severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
	/// Neutral notice.
	#[default]
	Info,
	/// Completed action.
	Success,
	/// Failed action.
	Error,
}

/// Toast notification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
	/// Whether the toast is shown.
	pub visible: bool,
	/// Message text.
	pub message: String,
	/// Severity.
	#[serde(rename = "type")]
	pub kind: ToastKind,
}

/// UI domain state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
	/// Whether the cart modal is open.
	pub cart_modal_open: bool,
	/// Whether the page-wide spinner is shown.
	pub global_loading: bool,
	/// Current toast.
	pub toast: Toast,
}

/// UI store actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
	/// Opens the cart modal.
	OpenCartModal,
	/// Closes the cart modal.
	CloseCartModal,
	/// Shows a toast, replacing any visible one.
	ShowToast {
		/// Message text.
		message: String,
		/// Severity.
		kind: ToastKind,
	},
	/// Hides the toast and clears its message.
	HideToast,
	/// Shows or hides the page-wide spinner.
	SetGlobalLoading(bool),
}

impl UiAction {
	/// Shorthand for a success toast.
	pub fn success(message: impl Into<String>) -> Self {
		Self::ShowToast {
			message: message.into(),
			kind: ToastKind::Success,
		}
	}

	/// Shorthand for an error toast.
	pub fn error(message: impl Into<String>) -> Self {
		Self::ShowToast {
			message: message.into(),
			kind: ToastKind::Error,
		}
	}
}

/// Reducer for [`UiState`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UiReducer;

impl Reducer for UiReducer {
	type State = UiState;
	type Action = Action;
	const NAME: &'static str = "ui";

	fn reduce(&self, state: &UiState, action: &Action) -> Option<UiState> {
		let Action::Ui(action) = action else {
			return None;
		};

		let next = match action {
			UiAction::OpenCartModal => UiState {
				cart_modal_open: true,
				..state.clone()
			},
			UiAction::CloseCartModal => UiState {
				cart_modal_open: false,
				..state.clone()
			},
			UiAction::ShowToast { message, kind } => UiState {
				toast: Toast {
					visible: true,
					message: message.clone(),
					kind: *kind,
				},
				..state.clone()
			},
			UiAction::HideToast => UiState {
				toast: Toast::default(),
				..state.clone()
			},
			UiAction::SetGlobalLoading(loading) => UiState {
				global_loading: *loading,
				..state.clone()
			},
		};
		Some(next)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::store::ProductAction;
	use rstest::rstest;

	fn reduce(state: &UiState, action: UiAction) -> UiState {
		UiReducer.reduce(state, &Action::Ui(action)).unwrap()
	}

	#[rstest]
	fn test_modal_open_and_close() {
		let open = reduce(&UiState::default(), UiAction::OpenCartModal);
		assert!(open.cart_modal_open);
		let closed = reduce(&open, UiAction::CloseCartModal);
		assert_eq!(closed, UiState::default());
	}

	#[rstest]
	#[case(UiAction::success("added to cart"), ToastKind::Success)]
	#[case(UiAction::error("failed"), ToastKind::Error)]
	#[case(UiAction::ShowToast { message: "hi".to_string(), kind: ToastKind::Info }, ToastKind::Info)]
	fn test_show_toast(#[case] action: UiAction, #[case] kind: ToastKind) {
		let next = reduce(&UiState::default(), action);
		assert!(next.toast.visible);
		assert_eq!(next.toast.kind, kind);

		let hidden = reduce(&next, UiAction::HideToast);
		assert_eq!(hidden.toast, Toast::default());
	}

	#[rstest]
	fn test_global_loading_keeps_toast() {
		let toast = reduce(&UiState::default(), UiAction::success("ok"));
		let loading = reduce(&toast, UiAction::SetGlobalLoading(true));
		assert!(loading.global_loading);
		assert_eq!(loading.toast, toast.toast);
	}

	#[rstest]
	fn test_product_action_is_ignored() {
		let action = Action::Product(ProductAction::StartLoading);
		assert_eq!(UiReducer.reduce(&UiState::default(), &action), None);
	}

	#[rstest]
	fn test_toast_wire_format() {
		let json = serde_json::to_value(reduce(&UiState::default(), UiAction::error("x"))).unwrap();
		assert_eq!(json["toast"]["type"], "error");
		assert_eq!(json["cartModalOpen"], false);
	}
}
