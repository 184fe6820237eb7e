//! # CRUD Screen
//!
//! One controller for the four master-data screens (kategori, bahan baku,
//! belanja, produk).
//!
//! ## State Machine
//! ```text
//!            set_filter / refresh
//!          ┌──────────────────────┐
//!          ▼                      │
//!   ┌─────────────┐  open_create  ┌───────────────┐  submit ok   ┌──────┐
//!   │    idle     │ ────────────► │ modal: create │ ───────────► │ idle │
//!   │             │  open_edit    │ modal: edit   │              └──────┘
//!   └─────────────┘ ────────────► └───────────────┘
//!          │                        │  submit err / validation err
//!          │ request_delete         └──► stays open
//!          ▼
//!   ┌─────────────┐  confirm_delete ok / cancel_delete  ┌──────┐
//!   │  deleting   │ ──────────────────────────────────► │ idle │
//!   └─────────────┘                                     └──────┘
//! ```

use std::marker::PhantomData;
use std::sync::Arc;

use tracing::{debug, warn};
use warteg_api::{ApiError, Gateway, Resource, WriteOp};
use warteg_core::Validate;

use crate::error::{AppError, AppResult};
use crate::notify::{Notification, Notifier};

/// Progress of the list read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// Create / edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    Closed,
    Create,
    Edit { id: String },
}

pub struct CrudScreen<R: Resource> {
    gateway: Gateway,
    notifier: Arc<dyn Notifier>,
    filter: R::Filter,
    rows: Vec<R::Record>,
    load: LoadState,
    modal: Modal,
    pending_delete: Option<String>,
    _resource: PhantomData<R>,
}

impl<R: Resource> CrudScreen<R> {
    pub fn new(gateway: Gateway, notifier: Arc<dyn Notifier>) -> Self {
        CrudScreen {
            gateway,
            notifier,
            filter: R::Filter::default(),
            rows: Vec::new(),
            load: LoadState::Idle,
            modal: Modal::Closed,
            pending_delete: None,
            _resource: PhantomData,
        }
    }

    // =========================================================================
    // List
    // =========================================================================

    /// Re-reads the list with the current filter.
    ///
    /// On failure the previous rows stay on screen.
    pub async fn refresh(&mut self) -> AppResult<()> {
        self.load = LoadState::Loading;
        match self.gateway.list::<R>(&self.filter).await {
            Ok(rows) => {
                debug!(resource = R::LABEL, count = rows.len(), "List loaded");
                self.rows = rows;
                self.load = LoadState::Loaded;
                Ok(())
            }
            Err(e) => {
                warn!(resource = R::LABEL, error = %e, "List failed");
                self.load = LoadState::Failed(e.to_string());
                self.notifier.notify(Notification::error(e.to_string()));
                Err(AppError::from(e).notified())
            }
        }
    }

    pub async fn set_filter(&mut self, filter: R::Filter) -> AppResult<()> {
        self.filter = filter;
        self.refresh().await
    }

    pub fn filter(&self) -> &R::Filter {
        &self.filter
    }

    pub fn rows(&self) -> &[R::Record] {
        &self.rows
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    // =========================================================================
    // Create / Edit
    // =========================================================================

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn open_create(&mut self) {
        self.modal = Modal::Create;
    }

    /// Opens the edit form for a row currently on screen.
    pub fn open_edit(&mut self, id: &str) -> AppResult<&R::Record> {
        let record = self
            .rows
            .iter()
            .find(|r| R::record_id(r) == id)
            .ok_or_else(|| AppError::not_found(R::LABEL, id))?;
        self.modal = Modal::Edit { id: id.to_string() };
        Ok(record)
    }

    pub fn close_modal(&mut self) {
        self.modal = Modal::Closed;
    }

    /// Validates the form and writes it.
    ///
    /// ## Outcomes
    /// - invalid form: error notification, modal stays open, no request
    /// - write ok: success notification, modal closes, list refreshes
    /// - write failed: error notification, modal stays open
    ///
    /// `Ok(None)` when the server acknowledged without returning the record.
    pub async fn submit(&mut self, draft: R::Draft) -> AppResult<Option<R::Record>> {
        let op = match &self.modal {
            Modal::Closed => return Err(AppError::invalid_state("No form is open")),
            Modal::Create => WriteOp::Create,
            Modal::Edit { .. } => WriteOp::Update,
        };

        if let Err(e) = draft.validate() {
            self.notifier.notify(Notification::error(e.to_string()));
            return Err(AppError::from(e).notified());
        }

        let result = match &self.modal {
            Modal::Edit { id } => self.gateway.update::<R>(id, &draft).await,
            _ => self.gateway.create::<R>(&draft).await,
        };

        match result {
            Ok(record) => {
                self.notifier.notify(Notification::success(success_message::<R>(op)));
                self.modal = Modal::Closed;
                // The write already succeeded; a failed re-read is reported by refresh.
                let _ = self.refresh().await;
                Ok(record)
            }
            Err(e) => Err(self.write_failed(op, e)),
        }
    }

    // =========================================================================
    // Delete
    // =========================================================================

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    pub fn request_delete(&mut self, id: &str) {
        self.pending_delete = Some(id.to_string());
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Issues the delete asked for by [`request_delete`](Self::request_delete).
    pub async fn confirm_delete(&mut self) -> AppResult<()> {
        let id = self
            .pending_delete
            .clone()
            .ok_or_else(|| AppError::invalid_state("No delete is pending"))?;

        match self.gateway.delete::<R>(&id).await {
            Ok(()) => {
                self.pending_delete = None;
                self.notifier
                    .notify(Notification::success(success_message::<R>(WriteOp::Delete)));
                let _ = self.refresh().await;
                Ok(())
            }
            Err(e) => Err(self.write_failed(WriteOp::Delete, e)),
        }
    }

    fn write_failed(&self, op: WriteOp, err: ApiError) -> AppError {
        warn!(resource = R::LABEL, %op, error = %err, "Write failed");
        self.notifier.notify(Notification::error(failure_message::<R>(op)));
        AppError::from(err).notified()
    }
}

fn success_message<R: Resource>(op: WriteOp) -> String {
    let verb = match op {
        WriteOp::Create => "dibuat",
        WriteOp::Update => "diperbarui",
        WriteOp::Delete => "dihapus",
    };
    format!("{} berhasil {}!", R::LABEL, verb)
}

fn failure_message<R: Resource>(op: WriteOp) -> String {
    let verb = match op {
        WriteOp::Create => "membuat",
        WriteOp::Update => "memperbarui",
        WriteOp::Delete => "menghapus",
    };
    format!("Gagal {} {}.", verb, R::LABEL.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::notify::{Level, RecordingNotifier};
    use serde_json::json;
    use warteg_api::mock::MockTransport;
    use warteg_api::{CategoryResource, HttpMethod};
    use warteg_core::types::{NewCategory, TextFilter};

    fn setup() -> (Arc<MockTransport>, Arc<RecordingNotifier>, CrudScreen<CategoryResource>) {
        let mock = Arc::new(MockTransport::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let gateway = Gateway::new(mock.clone(), "http://test");
        let screen = CrudScreen::new(gateway, notifier.clone());
        (mock, notifier, screen)
    }

    fn draft(name: &str) -> NewCategory {
        NewCategory {
            category_name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_refresh_loads_rows() {
        let (mock, _, mut screen) = setup();
        mock.push_json(200, json!([{"categoryId": "c1", "categoryName": "Makanan"}]));

        screen.refresh().await.unwrap();

        assert_eq!(screen.load_state(), &LoadState::Loaded);
        assert_eq!(screen.rows()[0].category_name, "Makanan");
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_prior_rows() {
        let (mock, notifier, mut screen) = setup();
        mock.push_json(200, json!([{"categoryId": "c1", "categoryName": "Makanan"}]));
        screen.refresh().await.unwrap();

        mock.push_json(500, json!({"message": "boom"}));
        let err = screen.set_filter(TextFilter::search("mi")).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ServerError);
        assert!(matches!(screen.load_state(), LoadState::Failed(_)));
        assert_eq!(screen.rows().len(), 1);
        assert_eq!(notifier.last().unwrap().level, Level::Error);
    }

    #[tokio::test]
    async fn test_filter_change_rereads_with_query() {
        let (mock, _, mut screen) = setup();
        mock.push_json(200, json!([]));

        screen.set_filter(TextFilter::search("minum")).await.unwrap();

        let request = mock.last_request().unwrap();
        assert_eq!(request.query, vec![("search".to_string(), "minum".to_string())]);
    }

    #[tokio::test]
    async fn test_invalid_form_keeps_modal_and_sends_nothing() {
        let (mock, notifier, mut screen) = setup();
        screen.open_create();

        let err = screen.submit(draft("  ")).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(screen.modal(), &Modal::Create);
        assert_eq!(mock.request_count(), 0);
        assert_eq!(notifier.last().unwrap().level, Level::Error);
    }

    #[tokio::test]
    async fn test_submit_without_modal_is_rejected() {
        let (mock, _, mut screen) = setup();

        let err = screen.submit(draft("Makanan")).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidState);
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_create_success_closes_modal_and_refreshes() {
        let (mock, notifier, mut screen) = setup();
        mock.push_json(201, json!({"categoryId": "c9", "categoryName": "Minuman"}));
        mock.push_json(200, json!([{"categoryId": "c9", "categoryName": "Minuman"}]));
        screen.open_create();

        let created = screen.submit(draft("Minuman")).await.unwrap();

        assert_eq!(created.unwrap().category_id, "c9");
        assert_eq!(screen.modal(), &Modal::Closed);
        assert_eq!(screen.rows().len(), 1);
        assert_eq!(notifier.messages()[0], "Kategori berhasil dibuat!");
        let requests = mock.requests();
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(requests[1].method, HttpMethod::Get);
    }

    #[tokio::test]
    async fn test_acknowledged_update_without_record_closes_modal() {
        let (mock, notifier, mut screen) = setup();
        mock.push_json(200, json!([{"categoryId": "c1", "categoryName": "Makanan"}]));
        screen.refresh().await.unwrap();
        screen.open_edit("c1").unwrap();
        mock.push_json(200, json!({"message": "Category updated"}));
        mock.push_json(200, json!([{"categoryId": "c1", "categoryName": "Lauk"}]));

        let updated = screen.submit(draft("Lauk")).await.unwrap();

        assert_eq!(updated, None);
        assert_eq!(screen.modal(), &Modal::Closed);
        assert_eq!(screen.rows()[0].category_name, "Lauk");
        assert_eq!(notifier.messages(), vec!["Kategori berhasil diperbarui!"]);
    }

    #[tokio::test]
    async fn test_failed_update_keeps_modal_open() {
        let (mock, notifier, mut screen) = setup();
        mock.push_json(200, json!([{"categoryId": "c1", "categoryName": "Makanan"}]));
        screen.refresh().await.unwrap();
        screen.open_edit("c1").unwrap();

        mock.push_json(422, json!({"message": "invalid"}));
        let err = screen.submit(draft("Lauk")).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::Rejected);
        assert_eq!(screen.modal(), &Modal::Edit { id: "c1".into() });
        assert_eq!(notifier.last().unwrap().message, "Gagal memperbarui kategori.");
        assert_eq!(mock.last_request().unwrap().path, "/category/c1");
    }

    #[tokio::test]
    async fn test_open_edit_requires_loaded_row() {
        let (_, _, mut screen) = setup();

        let err = screen.open_edit("missing").unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(screen.modal(), &Modal::Closed);
    }

    #[tokio::test]
    async fn test_delete_waits_for_confirmation() {
        let (mock, notifier, mut screen) = setup();

        screen.request_delete("c1");
        assert_eq!(screen.pending_delete(), Some("c1"));
        screen.cancel_delete();
        assert_eq!(mock.request_count(), 0);

        screen.request_delete("c1");
        mock.push_json(200, json!({"message": "deleted"}));
        mock.push_json(200, json!([]));
        screen.confirm_delete().await.unwrap();

        assert_eq!(screen.pending_delete(), None);
        assert_eq!(mock.requests()[0].method, HttpMethod::Delete);
        assert_eq!(notifier.messages()[0], "Kategori berhasil dihapus!");
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_pending() {
        let (mock, notifier, mut screen) = setup();
        screen.request_delete("c1");
        mock.push_json(404, json!({"message": "not found"}));

        let err = screen.confirm_delete().await.unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(screen.pending_delete(), Some("c1"));
        assert_eq!(notifier.last().unwrap().message, "Gagal menghapus kategori.");
    }

    #[test]
    fn test_messages_use_resource_label() {
        use warteg_api::BahanBakuResource;
        assert_eq!(success_message::<BahanBakuResource>(WriteOp::Update), "Bahan Baku berhasil diperbarui!");
        assert_eq!(failure_message::<BahanBakuResource>(WriteOp::Create), "Gagal membuat bahan baku.");
    }
}
