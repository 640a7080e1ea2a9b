//! Search presentation
//!
//! Binds user input to the suggestion pipeline and turns selections and the
//! explore action into navigation routes.

mod navigation;
mod search_box;

pub use navigation::Route;
pub use search_box::{ExploreCallback, SearchBox, SelectedCallback, SuggestionOption};
