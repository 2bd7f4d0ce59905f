//
//  releasehub-cli
//  crud/detail_form.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Detail-form state machine.
//!
//! The full-page sibling of the dialog form: same create/edit/view
//! branching and id bookkeeping, minus the modal visibility concept. Used
//! by screens that own the whole page, like the release-window editor.

use std::sync::Arc;

use crate::api::http::ApiError;

use super::dialog_form::CrudBackend;
use super::{CrudMode, Id};

/// Full-page CRUD state machine.
///
/// # Contract
///
/// - [`reset`](Self::reset) clears the form to the default value, clears the
///   tracked id, and returns to create mode
/// - [`load`](Self::load) fetches the entity and replaces the form; a load
///   failure logs, keeps the previous form state, and reports `false`
/// - [`submit`](Self::submit) follows the dialog form's create/update
///   branching and id-presence requirement, rethrows on failure, and
///   returns a success boolean (`false` in view mode)
pub struct DetailForm<T>
where
    T: Clone + Send + Sync + 'static,
{
    backend: Arc<dyn CrudBackend<T>>,
    default_form: T,
    /// The form value backing the page's fields.
    pub form: T,
    /// Current interaction mode.
    pub mode: CrudMode,
    /// Whether the entity load is in flight.
    pub loading: bool,
    /// Whether a submit is in flight.
    pub saving: bool,
    current_id: Option<Id>,
}

impl<T> DetailForm<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Builds the page state around a backend and a default form value.
    pub fn new(backend: Arc<dyn CrudBackend<T>>, default_form: T) -> Self {
        let form = default_form.clone();
        Self {
            backend,
            default_form,
            form,
            mode: CrudMode::Create,
            loading: false,
            saving: false,
            current_id: None,
        }
    }

    /// Id of the entity currently backing the form, if any.
    pub fn current_id(&self) -> Option<&str> {
        self.current_id.as_deref()
    }

    /// Clears the form to defaults and forgets the tracked id.
    pub fn reset(&mut self) {
        self.form = self.default_form.clone();
        self.current_id = None;
        self.mode = CrudMode::Create;
    }

    /// Loads an entity into the form.
    ///
    /// Returns whether the load succeeded. A failure logs and keeps the
    /// previous form state; the id and mode are still recorded so the
    /// screen can retry.
    pub async fn load(&mut self, id: impl Into<Id>, mode: CrudMode) -> bool {
        self.current_id = Some(id.into());
        self.mode = mode;
        self.loading = true;

        let loaded = match self
            .backend
            .fetch_by_id(self.current_id.as_deref().unwrap_or_default())
            .await
        {
            Ok(entity) => {
                self.form = entity;
                true
            }
            Err(err) => {
                tracing::error!("failed to load detail: {err}");
                false
            }
        };

        self.loading = false;
        loaded
    }

    /// Submits the form.
    ///
    /// Returns `Ok(true)` when the entity was created/updated, `Ok(false)`
    /// in view mode. Failures propagate to the caller.
    pub async fn submit(&mut self) -> anyhow::Result<bool> {
        if self.mode == CrudMode::View {
            return Ok(false);
        }

        self.saving = true;
        let result = if self.mode == CrudMode::Create {
            self.backend
                .create(&self.form)
                .await
                .map_err(anyhow::Error::from)
        } else if let Some(id) = self.current_id.clone() {
            self.backend
                .update(&id, &self.form)
                .await
                .map_err(anyhow::Error::from)
        } else {
            Err(anyhow::anyhow!("missing id for update"))
        };
        self.saving = false;

        result.map(|_| true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Default, Debug, PartialEq)]
    struct Policy {
        id: String,
        name: String,
    }

    #[derive(Default)]
    struct FakeBackend {
        missing: bool,
        creates: AtomicUsize,
        updates: AtomicUsize,
    }

    #[async_trait]
    impl CrudBackend<Policy> for FakeBackend {
        async fn fetch_by_id(&self, id: &str) -> Result<Policy, ApiError> {
            if self.missing {
                return Err(ApiError {
                    code: "4004".to_string(),
                    message: "not found".to_string(),
                    trace_id: None,
                    http_status: Some(200),
                    details: None,
                });
            }
            Ok(Policy {
                id: id.to_string(),
                name: "Semantic Versioning".to_string(),
            })
        }

        async fn create(&self, form: &Policy) -> Result<Policy, ApiError> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            Ok(form.clone())
        }

        async fn update(&self, id: &str, form: &Policy) -> Result<Policy, ApiError> {
            self.updates.fetch_add(1, Ordering::SeqCst);
            let mut updated = form.clone();
            updated.id = id.to_string();
            Ok(updated)
        }
    }

    #[tokio::test]
    async fn load_replaces_form_and_reports_success() {
        let backend = Arc::new(FakeBackend::default());
        let mut detail = DetailForm::new(backend, Policy::default());

        assert!(detail.load("p-1", CrudMode::View).await);
        assert_eq!(detail.form.name, "Semantic Versioning");
        assert_eq!(detail.current_id(), Some("p-1"));
        assert!(!detail.loading);
    }

    #[tokio::test]
    async fn load_failure_keeps_previous_form() {
        let backend = Arc::new(FakeBackend {
            missing: true,
            ..FakeBackend::default()
        });
        let mut detail = DetailForm::new(backend, Policy::default());

        assert!(!detail.load("p-404", CrudMode::Edit).await);
        assert_eq!(detail.form, Policy::default());
        assert_eq!(detail.mode, CrudMode::Edit);
    }

    #[tokio::test]
    async fn view_submit_is_a_no_op() {
        let backend = Arc::new(FakeBackend::default());
        let mut detail = DetailForm::new(backend.clone(), Policy::default());
        detail.load("p-1", CrudMode::View).await;

        assert!(!detail.submit().await.unwrap());
        assert_eq!(backend.creates.load(Ordering::SeqCst), 0);
        assert_eq!(backend.updates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn create_then_reset_clears_tracking() {
        let backend = Arc::new(FakeBackend::default());
        let mut detail = DetailForm::new(backend.clone(), Policy::default());
        detail.form.name = "Date Based".to_string();

        assert!(detail.submit().await.unwrap());
        assert_eq!(backend.creates.load(Ordering::SeqCst), 1);

        detail.load("p-7", CrudMode::Edit).await;
        detail.reset();
        assert_eq!(detail.current_id(), None);
        assert_eq!(detail.mode, CrudMode::Create);
        assert_eq!(detail.form, Policy::default());
    }

    #[tokio::test]
    async fn edit_submit_requires_an_id() {
        let backend = Arc::new(FakeBackend::default());
        let mut detail = DetailForm::new(backend.clone(), Policy::default());
        detail.mode = CrudMode::Edit;

        let err = detail.submit().await.unwrap_err();
        assert!(err.to_string().contains("missing id"));
        assert_eq!(backend.updates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn edit_submit_updates_under_the_loaded_id() {
        let backend = Arc::new(FakeBackend::default());
        let mut detail = DetailForm::new(backend.clone(), Policy::default());
        detail.load("p-3", CrudMode::Edit).await;
        detail.form.name = "Custom Policy".to_string();

        assert!(detail.submit().await.unwrap());
        assert_eq!(backend.updates.load(Ordering::SeqCst), 1);
    }
}
