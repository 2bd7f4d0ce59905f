//
//  releasehub-cli
//  crud/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # CRUD State Machines
//!
//! The three interaction patterns every console screen instantiates:
//!
//! - [`ListPage`]: a paged list with search/reset/pagination actions
//! - [`DialogForm`]: a modal create/edit/view flow
//! - [`DetailForm`]: a full-page create/edit/view flow
//!
//! All three are generic over the entity type and talk to the backend
//! through small `async_trait` seams ([`PageFetcher`], [`CrudBackend`]), so
//! screens, tests, and future entities share one set of semantics. None of
//! them construct errors: API failures pass through as
//! [`ApiError`](crate::api::http::ApiError), local precondition failures are
//! plain `anyhow` errors.

mod detail_form;
mod dialog_form;
mod list_page;

pub use detail_form::DetailForm;
pub use dialog_form::{CrudBackend, DialogForm, OpenOptions, Preset};
pub use list_page::{ListPage, ListPageOptions, PageFetcher, QueryHook, RowsHook};

/// Entity id as used by the form state machines.
///
/// The backend mixes string and numeric ids; they are normalized to strings
/// at the client edge.
pub type Id = String;

/// Interaction mode of a form, governing whether submit is permitted and
/// whether fields are editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrudMode {
    /// Creating a new entity.
    #[default]
    Create,
    /// Editing an existing entity.
    Edit,
    /// Read-only inspection; submit is a no-op.
    View,
}
