//
//  releasehub-cli
//  crud/dialog_form.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Dialog-form state machine.
//!
//! Models the modal create/edit/view flow: `closed → (loading?) → open →
//! (saving) → closed`. The form holds a full entity value; opening in
//! create mode seeds it from the default, opening with an id loads the
//! entity first. A load failure is a soft failure: the dialog stays open
//! with whatever form state exists rather than silently bouncing the user.

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::http::ApiError;

use super::{CrudMode, Id};

/// Backend seam of the form state machines.
///
/// One implementation per entity, adapting the resource client's request
/// shapes to the form's entity type.
#[async_trait]
pub trait CrudBackend<T>: Send + Sync
where
    T: Send + Sync + 'static,
{
    /// Loads the entity backing an edit/view form.
    async fn fetch_by_id(&self, id: &str) -> Result<T, ApiError>;

    /// Creates a new entity from the form value.
    async fn create(&self, form: &T) -> Result<T, ApiError>;

    /// Updates the entity with the form value.
    async fn update(&self, id: &str, form: &T) -> Result<T, ApiError>;
}

/// Preset applied over the form after defaults or the loaded entity.
///
/// The functional equivalent of spreading a partial object over the form:
/// the screen hands over a closure that fills whatever fields it wants
/// pre-populated.
pub type Preset<T> = Box<dyn FnOnce(&mut T) + Send>;

/// Arguments of [`DialogForm::open`].
pub struct OpenOptions<T> {
    /// Entity id for edit/view modes.
    pub id: Option<Id>,
    /// Interaction mode; defaults to create.
    pub mode: CrudMode,
    /// Optional preset merged over the initial form value.
    pub preset: Option<Preset<T>>,
}

impl<T> Default for OpenOptions<T> {
    fn default() -> Self {
        Self {
            id: None,
            mode: CrudMode::Create,
            preset: None,
        }
    }
}

impl<T> OpenOptions<T> {
    /// Open in create mode.
    pub fn create() -> Self {
        Self::default()
    }

    /// Open in edit mode for an existing entity.
    pub fn edit(id: impl Into<Id>) -> Self {
        Self {
            id: Some(id.into()),
            mode: CrudMode::Edit,
            preset: None,
        }
    }

    /// Open in read-only view mode.
    pub fn view(id: impl Into<Id>) -> Self {
        Self {
            id: Some(id.into()),
            mode: CrudMode::View,
            preset: None,
        }
    }

    /// Attaches a preset merged over the initial form value.
    pub fn preset(mut self, preset: impl FnOnce(&mut T) + Send + 'static) -> Self {
        self.preset = Some(Box::new(preset));
        self
    }
}

/// Modal CRUD state machine.
///
/// # Contract
///
/// - [`open`](Self::open): shows the dialog, sets the mode, resets the
///   loading/saving flags; create mode seeds the form from the default plus
///   preset, edit/view modes load the entity and merge the preset over it.
///   A load failure logs and leaves the dialog open.
/// - [`close`](Self::close): hides the dialog without clearing form state;
///   the next `open` overwrites it.
/// - [`submit`](Self::submit): no-op (close only) in view mode; calls the
///   backend's create/update otherwise, failing fast when edit mode has no
///   id. Success invokes the registered callback with the server result and
///   closes; failure propagates and leaves the dialog open.
/// - [`on_success`](Self::on_success): registers exactly one callback,
///   replacing any previous registration.
pub struct DialogForm<T>
where
    T: Clone + Send + Sync + 'static,
{
    backend: Arc<dyn CrudBackend<T>>,
    default_form: T,
    /// Whether the dialog is shown.
    pub visible: bool,
    /// Current interaction mode.
    pub mode: CrudMode,
    /// Whether the entity load is in flight.
    pub loading: bool,
    /// Whether a submit is in flight.
    pub saving: bool,
    /// The form value backing the dialog's fields.
    pub form: T,
    current_id: Option<Id>,
    on_success: Option<Box<dyn Fn(&T) + Send + Sync>>,
}

impl<T> DialogForm<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Builds a closed dialog around a backend and a default form value.
    pub fn new(backend: Arc<dyn CrudBackend<T>>, default_form: T) -> Self {
        let form = default_form.clone();
        Self {
            backend,
            default_form,
            visible: false,
            mode: CrudMode::Create,
            loading: false,
            saving: false,
            form,
            current_id: None,
            on_success: None,
        }
    }

    /// Registers the success callback, replacing any previous registration.
    pub fn on_success(&mut self, callback: impl Fn(&T) + Send + Sync + 'static) {
        self.on_success = Some(Box::new(callback));
    }

    /// Id of the entity currently backing the form, if any.
    pub fn current_id(&self) -> Option<&str> {
        self.current_id.as_deref()
    }

    /// Opens the dialog.
    pub async fn open(&mut self, options: OpenOptions<T>) {
        let OpenOptions { id, mode, preset } = options;

        self.visible = true;
        self.mode = mode;
        self.current_id = id.clone();
        self.loading = false;
        self.saving = false;

        if mode == CrudMode::Create {
            self.form = self.default_form.clone();
            if let Some(preset) = preset {
                preset(&mut self.form);
            }
        } else if let Some(id) = id {
            self.loading = true;
            match self.backend.fetch_by_id(&id).await {
                Ok(entity) => {
                    self.form = entity;
                    if let Some(preset) = preset {
                        preset(&mut self.form);
                    }
                }
                Err(err) => {
                    // Soft failure: keep the dialog open with whatever form
                    // state exists instead of bouncing the user.
                    tracing::error!("failed to load dialog data: {err}");
                }
            }
            self.loading = false;
        } else {
            tracing::warn!("dialog opened in edit/view mode without an id");
        }
    }

    /// Hides the dialog. Form state is left for the next `open` to overwrite.
    pub fn close(&mut self) {
        self.visible = false;
    }

    /// Submits the form.
    ///
    /// Returns the server result on success (`None` in view mode, where the
    /// dialog simply closes). Failures propagate to the caller and leave the
    /// dialog open.
    pub async fn submit(&mut self) -> anyhow::Result<Option<T>> {
        if self.mode == CrudMode::View {
            self.close();
            return Ok(None);
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
            // Fail fast: edit mode without a prior open({id}) is a screen bug.
            Err(anyhow::anyhow!("missing id for update"))
        };
        self.saving = false;

        match result {
            Ok(entity) => {
                if let Some(callback) = &self.on_success {
                    callback(&entity);
                }
                self.close();
                Ok(Some(entity))
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Clone, Default, Debug, PartialEq)]
    struct Window {
        id: String,
        name: String,
        frozen: bool,
    }

    #[derive(Default)]
    struct FakeBackend {
        entity: Mutex<Option<Window>>,
        fetch_fails: bool,
        create_fails: bool,
        creates: AtomicUsize,
        updates: AtomicUsize,
        fetches: AtomicUsize,
    }

    impl FakeBackend {
        fn with_entity(entity: Window) -> Arc<Self> {
            Arc::new(Self {
                entity: Mutex::new(Some(entity)),
                ..Self::default()
            })
        }
    }

    fn not_found() -> ApiError {
        ApiError {
            code: "4004".to_string(),
            message: "not found".to_string(),
            trace_id: None,
            http_status: Some(200),
            details: None,
        }
    }

    #[async_trait]
    impl CrudBackend<Window> for FakeBackend {
        async fn fetch_by_id(&self, id: &str) -> Result<Window, ApiError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.fetch_fails {
                return Err(not_found());
            }
            let entity = self.entity.lock().unwrap().clone();
            entity
                .filter(|window| window.id == id)
                .ok_or_else(not_found)
        }

        async fn create(&self, form: &Window) -> Result<Window, ApiError> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            if self.create_fails {
                return Err(not_found());
            }
            let mut created = form.clone();
            created.id = "w-new".to_string();
            Ok(created)
        }

        async fn update(&self, id: &str, form: &Window) -> Result<Window, ApiError> {
            self.updates.fetch_add(1, Ordering::SeqCst);
            let mut updated = form.clone();
            updated.id = id.to_string();
            Ok(updated)
        }
    }

    #[tokio::test]
    async fn create_submit_calls_create_once_and_fires_callback() {
        let backend = FakeBackend::with_entity(Window::default());
        let mut dialog = DialogForm::new(backend.clone(), Window::default());
        let callback_payload = Arc::new(Mutex::new(None::<Window>));
        let sink = callback_payload.clone();
        dialog.on_success(move |window| {
            *sink.lock().unwrap() = Some(window.clone());
        });

        dialog
            .open(OpenOptions::create().preset(|form: &mut Window| {
                form.name = "March regular".to_string();
            }))
            .await;
        assert!(dialog.visible);
        assert_eq!(dialog.form.name, "March regular");

        let created = dialog.submit().await.unwrap().unwrap();
        assert_eq!(backend.creates.load(Ordering::SeqCst), 1);
        assert_eq!(created.id, "w-new");
        assert_eq!(
            callback_payload.lock().unwrap().as_ref().map(|w| w.id.clone()),
            Some("w-new".to_string())
        );
        assert!(!dialog.visible);
    }

    #[tokio::test]
    async fn view_submit_closes_without_backend_calls() {
        let backend = FakeBackend::with_entity(Window {
            id: "w-1".to_string(),
            name: "Q1".to_string(),
            frozen: false,
        });
        let mut dialog = DialogForm::new(backend.clone(), Window::default());
        dialog.open(OpenOptions::view("w-1")).await;

        let result = dialog.submit().await.unwrap();
        assert!(result.is_none());
        assert!(!dialog.visible);
        assert_eq!(backend.creates.load(Ordering::SeqCst), 0);
        assert_eq!(backend.updates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn edit_submit_without_id_fails_before_update() {
        let backend = FakeBackend::with_entity(Window::default());
        let mut dialog = DialogForm::new(backend.clone(), Window::default());
        dialog
            .open(OpenOptions {
                id: None,
                mode: CrudMode::Edit,
                preset: None,
            })
            .await;

        let err = dialog.submit().await.unwrap_err();
        assert!(err.to_string().contains("missing id"));
        assert_eq!(backend.updates.load(Ordering::SeqCst), 0);
        assert!(dialog.visible); // failure leaves the dialog open
        assert!(!dialog.saving);
    }

    #[tokio::test]
    async fn edit_open_loads_entity_and_merges_preset() {
        let backend = FakeBackend::with_entity(Window {
            id: "w-1".to_string(),
            name: "Q1".to_string(),
            frozen: false,
        });
        let mut dialog = DialogForm::new(backend.clone(), Window::default());
        dialog
            .open(OpenOptions::edit("w-1").preset(|form: &mut Window| form.frozen = true))
            .await;

        assert_eq!(backend.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(dialog.form.name, "Q1");
        assert!(dialog.form.frozen); // preset wins over the loaded value
        assert!(!dialog.loading);

        let updated = dialog.submit().await.unwrap().unwrap();
        assert_eq!(backend.updates.load(Ordering::SeqCst), 1);
        assert_eq!(updated.id, "w-1");
    }

    #[tokio::test]
    async fn load_failure_leaves_dialog_open() {
        let backend = Arc::new(FakeBackend {
            fetch_fails: true,
            ..FakeBackend::default()
        });
        let mut dialog = DialogForm::new(backend, Window::default());
        dialog.open(OpenOptions::edit("w-404")).await;

        assert!(dialog.visible);
        assert!(!dialog.loading);
        assert_eq!(dialog.form, Window::default());
    }

    #[tokio::test]
    async fn submit_failure_rethrows_and_leaves_dialog_open() {
        let backend = Arc::new(FakeBackend {
            create_fails: true,
            ..FakeBackend::default()
        });
        let mut dialog = DialogForm::new(backend, Window::default());
        dialog.open(OpenOptions::create()).await;

        let err = dialog.submit().await.unwrap_err();
        assert!(err.downcast_ref::<ApiError>().is_some());
        assert!(dialog.visible);
        assert!(!dialog.saving);
    }

    #[tokio::test]
    async fn on_success_replaces_previous_registration() {
        let backend = FakeBackend::with_entity(Window::default());
        let mut dialog = DialogForm::new(backend, Window::default());
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let first_hook = first.clone();
        dialog.on_success(move |_| {
            first_hook.fetch_add(1, Ordering::SeqCst);
        });
        let second_hook = second.clone();
        dialog.on_success(move |_| {
            second_hook.fetch_add(1, Ordering::SeqCst);
        });

        dialog.open(OpenOptions::create()).await;
        dialog.submit().await.unwrap();

        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }
}
