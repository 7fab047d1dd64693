//! Server-side rendering
//!
//! - [`renderer`]: per-request rendering into markup, head and initial data
//! - [`state`]: the initial-data payload and its script embedding
//! - [`head`]: title and meta derived from page state

pub mod head;
pub mod renderer;
pub mod state;

pub use head::{PageHead, SITE_NAME, html_escape};
pub use renderer::{
	HEAD_PLACEHOLDER, HTML_PLACEHOLDER, RenderError, RenderOutput, SsrOptions, SsrRenderer,
	default_template, render_document,
};
pub use state::{HydrationPayload, INITIAL_DATA_VAR, extract_initial_data};
