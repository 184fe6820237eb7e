//! Category and bahan baku commands.

use std::io::Write;

use tokio::io::AsyncBufRead;
use warteg_api::{BahanBakuResource, CategoryResource};
use warteg_core::types::{NewBahanBaku, NewCategory, TextFilter};
use warteg_core::validation::validate_search_term;

use super::Context;
use crate::cli::{BahanBakuCommand, BahanBakuForm, CategoryCommand, SearchArgs};
use crate::error::AppResult;
use crate::render;

fn text_filter(args: &SearchArgs) -> AppResult<TextFilter> {
    let search = match &args.search {
        Some(term) => validate_search_term(term)?,
        None => None,
    };
    Ok(TextFilter { search })
}

pub async fn category<I, W>(ctx: &Context, cmd: CategoryCommand, input: &mut I, out: &mut W) -> AppResult<()>
where
    I: AsyncBufRead + Unpin,
    W: Write,
{
    match cmd {
        CategoryCommand::List(args) => {
            let mut screen = ctx.crud::<CategoryResource>();
            screen.set_filter(text_filter(&args)?).await?;
            render::categories(out, screen.rows())?;
        }
        CategoryCommand::Create { name } => {
            let created = super::create::<CategoryResource>(ctx, NewCategory { category_name: name }).await?;
            if let Some(created) = created {
                writeln!(out, "{}", created.category_id)?;
            }
        }
        CategoryCommand::Update { id, name } => {
            super::update::<CategoryResource, _>(ctx, &id, |_| Ok(NewCategory { category_name: name })).await?;
        }
        CategoryCommand::Delete(args) => super::delete::<CategoryResource, _, _>(ctx, args, input, out).await?,
    }
    Ok(())
}

fn bahan_baku_draft(form: BahanBakuForm) -> NewBahanBaku {
    NewBahanBaku {
        nama_bahan_baku: form.name,
        supplier: form.supplier,
        merk: form.merk,
    }
}

pub async fn bahan_baku<I, W>(ctx: &Context, cmd: BahanBakuCommand, input: &mut I, out: &mut W) -> AppResult<()>
where
    I: AsyncBufRead + Unpin,
    W: Write,
{
    match cmd {
        BahanBakuCommand::List(args) => {
            let mut screen = ctx.crud::<BahanBakuResource>();
            screen.set_filter(text_filter(&args)?).await?;
            render::bahan_baku(out, screen.rows())?;
        }
        BahanBakuCommand::Create(form) => {
            let created = super::create::<BahanBakuResource>(ctx, bahan_baku_draft(form)).await?;
            if let Some(created) = created {
                writeln!(out, "{}", created.bahan_baku_id)?;
            }
        }
        BahanBakuCommand::Update { id, form } => {
            // Omitted optional fields keep their current values.
            super::update::<BahanBakuResource, _>(ctx, &id, |current| {
                let mut draft = bahan_baku_draft(form);
                draft.supplier = draft.supplier.or_else(|| current.supplier.clone());
                draft.merk = draft.merk.or_else(|| current.merk.clone());
                Ok(draft)
            })
            .await?;
        }
        BahanBakuCommand::Delete(args) => super::delete::<BahanBakuResource, _, _>(ctx, args, input, out).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{context, text};
    use crate::error::ErrorCode;
    use serde_json::json;
    use warteg_api::HttpMethod;

    #[tokio::test]
    async fn test_category_list_renders_rows() {
        let (mock, _, ctx) = context();
        mock.push_json(200, json!([{"categoryId": "c1", "categoryName": "Makanan"}]));
        let mut out = Vec::new();

        let cmd = CategoryCommand::List(SearchArgs { search: Some(" mak ".into()) });
        category(&ctx, cmd, &mut &b""[..], &mut out).await.unwrap();

        assert!(text(out).contains("Makanan"));
        assert_eq!(mock.last_request().unwrap().query, vec![("search".to_string(), "mak".to_string())]);
    }

    #[tokio::test]
    async fn test_blank_category_name_is_not_sent() {
        let (mock, notifier, ctx) = context();

        let cmd = CategoryCommand::Create { name: "   ".into() };
        let err = category(&ctx, cmd, &mut &b""[..], &mut Vec::new()).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(mock.request_count(), 0);
        assert_eq!(notifier.all().len(), 1);
    }

    #[tokio::test]
    async fn test_bahan_baku_update_keeps_unset_fields() {
        let (mock, notifier, ctx) = context();
        mock.push_json(
            200,
            json!([{"bahanBakuId": "b1", "namaBahanBaku": "Beras", "supplier": "Toko Maju", "merk": "Rojolele"}]),
        );
        mock.push_json(
            200,
            json!({"bahanBakuId": "b1", "namaBahanBaku": "Beras Pulen", "supplier": "Toko Maju", "merk": "Rojolele"}),
        );
        mock.push_json(200, json!([]));

        let form = BahanBakuForm {
            name: "Beras Pulen".into(),
            supplier: None,
            merk: None,
        };
        let cmd = BahanBakuCommand::Update { id: "b1".into(), form };
        bahan_baku(&ctx, cmd, &mut &b""[..], &mut Vec::new()).await.unwrap();

        let put = &mock.requests()[1];
        assert_eq!(put.method, HttpMethod::Put);
        assert_eq!(put.path, "/bahan-baku/b1");
        let body = put.json().unwrap();
        assert_eq!(body["namaBahanBaku"], "Beras Pulen");
        assert_eq!(body["supplier"], "Toko Maju");
        assert_eq!(notifier.messages(), vec!["Bahan Baku berhasil diperbarui!"]);
    }

    #[tokio::test]
    async fn test_update_of_unknown_id_fails_before_write() {
        let (mock, _, ctx) = context();
        mock.push_json(200, json!([]));

        let cmd = CategoryCommand::Update { id: "c404".into(), name: "X".into() };
        let err = category(&ctx, cmd, &mut &b""[..], &mut Vec::new()).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(mock.request_count(), 1);
    }
}
