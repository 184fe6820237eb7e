//! # Console Commands
//!
//! Each command builds a screen, drives it, and renders its state to stdout.
//! Notifications go to stderr through the [`Notifier`].
//!
//! ## Command Categories
//! - **Master data**: category and bahan-baku CRUD
//! - **Belanja**: purchase records and the purchase draft
//! - **Produk**: catalog CRUD with image upload
//! - **Penjualan**: sales list and the interactive POS session
//! - **Dashboard**: summary

pub mod belanja;
pub mod dashboard;
pub mod master;
pub mod penjualan;
pub mod pos;
pub mod produk;

use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use warteg_api::{Gateway, Resource};

use crate::cli::{Command, DeleteArgs};
use crate::error::{AppError, AppResult};
use crate::notify::Notifier;
use crate::screens::CrudScreen;

/// What every command needs.
#[derive(Clone)]
pub struct Context {
    pub gateway: Gateway,
    pub notifier: Arc<dyn Notifier>,
}

impl Context {
    pub fn new(gateway: Gateway, notifier: Arc<dyn Notifier>) -> Self {
        Context { gateway, notifier }
    }

    pub fn crud<R: Resource>(&self) -> CrudScreen<R> {
        CrudScreen::new(self.gateway.clone(), self.notifier.clone())
    }
}

/// Runs one parsed command.
pub async fn dispatch<I, W>(ctx: &Context, command: Command, input: &mut I, out: &mut W) -> AppResult<()>
where
    I: AsyncBufRead + Unpin,
    W: Write,
{
    match command {
        Command::Category(cmd) => master::category(ctx, cmd, input, out).await,
        Command::BahanBaku(cmd) => master::bahan_baku(ctx, cmd, input, out).await,
        Command::Belanja(cmd) => belanja::run(ctx, cmd, input, out).await,
        Command::Produk(cmd) => produk::run(ctx, cmd, input, out).await,
        Command::Penjualan(cmd) => penjualan::run(ctx, cmd, out).await,
        Command::Pos => pos::session(ctx, input, out).await,
        Command::Dashboard => dashboard::show(ctx, out).await,
    }
}

// =============================================================================
// Shared CRUD steps
// =============================================================================

/// Opens the create form and submits `draft`.
pub(crate) async fn create<R: Resource>(ctx: &Context, draft: R::Draft) -> AppResult<Option<R::Record>> {
    let mut screen = ctx.crud::<R>();
    screen.open_create();
    screen.submit(draft).await
}

/// Loads the list, opens the edit form for `id`, then submits the draft
/// built from the current record.
pub(crate) async fn update<R, F>(ctx: &Context, id: &str, build: F) -> AppResult<Option<R::Record>>
where
    R: Resource,
    F: FnOnce(&R::Record) -> AppResult<R::Draft>,
{
    let mut screen = ctx.crud::<R>();
    screen.refresh().await?;
    let draft = build(screen.open_edit(id)?)?;
    screen.submit(draft).await
}

/// Deletes after a y/N prompt unless `--yes` was given.
pub(crate) async fn delete<R, I, W>(ctx: &Context, args: DeleteArgs, input: &mut I, out: &mut W) -> AppResult<()>
where
    R: Resource,
    I: AsyncBufRead + Unpin,
    W: Write,
{
    let mut screen = ctx.crud::<R>();
    screen.request_delete(&args.id);

    let prompt = format!("Hapus {} {}?", R::LABEL, args.id);
    if !args.yes && !confirm(input, out, &prompt).await? {
        screen.cancel_delete();
        writeln!(out, "Dibatalkan.")?;
        return Ok(());
    }
    screen.confirm_delete().await
}

/// Asks a yes/no question. Anything but `y`/`ya`/`yes` is no.
pub(crate) async fn confirm<I, W>(input: &mut I, out: &mut W, prompt: &str) -> AppResult<bool>
where
    I: AsyncBufRead + Unpin,
    W: Write,
{
    write!(out, "{} [y/N] ", prompt)?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer).await?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "ya" | "yes"))
}

pub(crate) fn not_supported(what: &str) -> AppError {
    AppError::validation(format!("{} is not supported here", what))
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::notify::RecordingNotifier;
    use warteg_api::mock::MockTransport;

    pub fn context() -> (Arc<MockTransport>, Arc<RecordingNotifier>, Context) {
        let mock = Arc::new(MockTransport::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let gateway = Gateway::new(mock.clone(), "http://test");
        (mock, notifier.clone(), Context::new(gateway, notifier))
    }

    pub fn text(out: Vec<u8>) -> String {
        String::from_utf8(out).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use serde_json::json;
    use warteg_api::{CategoryResource, HttpMethod};

    #[tokio::test]
    async fn test_confirm_accepts_y_only() {
        let mut out = Vec::new();
        assert!(confirm(&mut &b"y\n"[..], &mut out, "Hapus?").await.unwrap());
        assert!(confirm(&mut &b"Ya\n"[..], &mut out, "Hapus?").await.unwrap());
        assert!(!confirm(&mut &b"n\n"[..], &mut out, "Hapus?").await.unwrap());
        assert!(!confirm(&mut &b""[..], &mut out, "Hapus?").await.unwrap());
        assert!(text(out).starts_with("Hapus? [y/N] "));
    }

    #[tokio::test]
    async fn test_declined_delete_sends_nothing() {
        let (mock, _, ctx) = context();
        let mut out = Vec::new();
        let args = DeleteArgs { id: "c1".into(), yes: false };

        delete::<CategoryResource, _, _>(&ctx, args, &mut &b"n\n"[..], &mut out).await.unwrap();

        assert_eq!(mock.request_count(), 0);
        assert!(text(out).contains("Dibatalkan."));
    }

    #[tokio::test]
    async fn test_yes_flag_skips_prompt() {
        let (mock, notifier, ctx) = context();
        mock.push_json(200, json!({"message": "deleted"}));
        mock.push_json(200, json!([]));
        let args = DeleteArgs { id: "c1".into(), yes: true };

        delete::<CategoryResource, _, _>(&ctx, args, &mut &b""[..], &mut Vec::new()).await.unwrap();

        assert_eq!(mock.requests()[0].method, HttpMethod::Delete);
        assert_eq!(mock.requests()[0].path, "/category/c1");
        assert_eq!(notifier.messages(), vec!["Kategori berhasil dihapus!"]);
    }
}
