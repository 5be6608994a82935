//! Business logic services.

pub mod display;
pub mod issue;
pub mod issue_form;
pub mod issue_view;
pub mod list_state;
pub mod pagination_window;
