//! Product catalog commands.

use std::io::Write;
use std::path::Path;

use tokio::io::AsyncBufRead;
use warteg_api::ProdukResource;
use warteg_core::types::{ImageUpload, NewProduk, ProdukFilter};
use warteg_core::validation::validate_search_term;

use super::Context;
use crate::cli::{ProdukCommand, ProdukForm};
use crate::error::{AppError, AppResult};
use crate::render;

/// MIME type from the file extension.
fn content_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

pub async fn load_image(path: &Path) -> AppResult<ImageUpload> {
    let content_type = content_type(path)
        .ok_or_else(|| AppError::validation(format!("Unsupported image type: {}", path.display())))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| AppError::validation(format!("Invalid image path: {}", path.display())))?
        .to_string();
    let bytes = tokio::fs::read(path).await?;

    Ok(ImageUpload {
        file_name,
        content_type: content_type.to_string(),
        bytes,
    })
}

pub async fn run<I, W>(ctx: &Context, cmd: ProdukCommand, input: &mut I, out: &mut W) -> AppResult<()>
where
    I: AsyncBufRead + Unpin,
    W: Write,
{
    match cmd {
        ProdukCommand::List { search, category_id } => {
            let search = match search {
                Some(term) => validate_search_term(&term)?,
                None => None,
            };
            let mut screen = ctx.crud::<ProdukResource>();
            screen.set_filter(ProdukFilter { search, category_id }).await?;
            render::produk(out, screen.rows())?;
        }
        ProdukCommand::Create(form) => {
            let image = match &form.image {
                Some(path) => Some(load_image(path).await?),
                None => None,
            };
            let draft = NewProduk {
                nama_produk: form.name,
                harga: form.harga,
                category_id: form.category_id,
                image,
            };
            // The id is printed when the server echoes the record.
            if let Some(created) = super::create::<ProdukResource>(ctx, draft).await? {
                writeln!(out, "{}", created.produk_id)?;
            }
        }
        ProdukCommand::Update { id, form } => {
            let ProdukForm {
                name,
                harga,
                category_id,
                image,
            } = form;
            // Updates are JSON; the image is only uploaded on create.
            if image.is_some() {
                return Err(super::not_supported("--image on update"));
            }
            super::update::<ProdukResource, _>(ctx, &id, |_| {
                Ok(NewProduk {
                    nama_produk: name,
                    harga,
                    category_id,
                    image: None,
                })
            })
            .await?;
        }
        ProdukCommand::Delete(args) => super::delete::<ProdukResource, _, _>(ctx, args, input, out).await?,
    }
    Ok(())
}
