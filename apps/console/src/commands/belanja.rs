//! Purchase commands: list, record (draft + save), update, delete.

use std::io::Write;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tokio::io::AsyncBufRead;
use warteg_api::BelanjaResource;
use warteg_core::types::{BelanjaFilter, NewBelanja};
use warteg_core::validation::validate_search_term;
use warteg_core::Money;

use super::Context;
use crate::cli::{BelanjaCommand, PurchaseItemArg};
use crate::error::{AppError, AppResult};
use crate::render;
use crate::screens::PurchaseScreen;

/// Midnight UTC of `date`, or now.
fn purchase_time(date: Option<NaiveDate>) -> DateTime<Utc> {
    date.and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or_else(Utc::now)
}

/// Parses a `tanggal` as stored by the server: RFC 3339, a zone-less
/// timestamp (read as UTC) or a bare `YYYY-MM-DD` (midnight UTC).
fn stored_tanggal(raw: &str) -> AppResult<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| AppError::validation(format!("Stored tanggal '{}' is not a date, pass --tanggal", raw)))
}

pub async fn run<I, W>(ctx: &Context, cmd: BelanjaCommand, input: &mut I, out: &mut W) -> AppResult<()>
where
    I: AsyncBufRead + Unpin,
    W: Write,
{
    match cmd {
        BelanjaCommand::List {
            search,
            start_date,
            end_date,
        } => {
            if let (Some(start), Some(end)) = (start_date, end_date) {
                if start > end {
                    return Err(AppError::validation("--start-date must not be after --end-date"));
                }
            }
            let search = match search {
                Some(term) => validate_search_term(&term)?,
                None => None,
            };
            let mut screen = ctx.crud::<BelanjaResource>();
            screen
                .set_filter(BelanjaFilter {
                    search,
                    start_date,
                    end_date,
                })
                .await?;
            render::belanja(out, screen.rows())?;
        }
        BelanjaCommand::Record { items, tanggal } => {
            record(ctx, &items, purchase_time(tanggal), out).await?;
        }
        BelanjaCommand::Update {
            id,
            bahan_baku_id,
            nama,
            tanggal,
            harga_satuan,
            qty,
        } => {
            super::update::<BelanjaResource, _>(ctx, &id, |current| {
                let when = match tanggal {
                    Some(date) => purchase_time(Some(date)),
                    None => stored_tanggal(&current.tanggal)?,
                };
                let nama = nama.or_else(|| current.nama_bahan_baku.clone());
                Ok(NewBelanja::new(
                    bahan_baku_id.trim(),
                    nama,
                    when,
                    Money::from_rupiah(harga_satuan),
                    qty,
                )?)
            })
            .await?;
        }
        BelanjaCommand::Delete(args) => super::delete::<BelanjaResource, _, _>(ctx, args, input, out).await?,
    }
    Ok(())
}

/// Fills a purchase draft from `items`, shows it, then saves it.
///
/// Any invalid item aborts before anything is sent.
async fn record<W: Write>(
    ctx: &Context,
    items: &[PurchaseItemArg],
    tanggal: DateTime<Utc>,
    out: &mut W,
) -> AppResult<()> {
    let mut screen = PurchaseScreen::new(ctx.gateway.clone(), ctx.notifier.clone());
    for item in items {
        screen.add(
            &item.bahan_baku_id,
            &item.nama,
            tanggal,
            Money::from_rupiah(item.harga_satuan),
            item.qty,
        )?;
    }
    render::draft(out, screen.draft())?;

    let saved = screen.save().await?;
    writeln!(out, "{} baris tersimpan.", saved)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{context, text};
    use crate::error::ErrorCode;
    use serde_json::json;

    fn item(id: &str, nama: &str, qty: i64, harga: i64) -> PurchaseItemArg {
        PurchaseItemArg {
            bahan_baku_id: id.into(),
            nama: nama.into(),
            qty,
            harga_satuan: harga,
        }
    }

    #[test]
    fn test_purchase_time_is_midnight_utc() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1);
        assert_eq!(purchase_time(date).to_rfc3339(), "2024-05-01T00:00:00+00:00");
    }

    #[test]
    fn test_stored_tanggal_formats() {
        let cases = [
            ("2024-05-01T07:30:00.000Z", "2024-05-01T07:30:00+00:00"),
            ("2024-05-01T07:30:00+07:00", "2024-05-01T00:30:00+00:00"),
            ("2024-05-01T07:30:00", "2024-05-01T07:30:00+00:00"),
            ("2024-05-01 07:30:00.123", "2024-05-01T07:30:00.123+00:00"),
            ("2024-05-01", "2024-05-01T00:00:00+00:00"),
        ];
        for (raw, expected) in cases {
            assert_eq!(stored_tanggal(raw).unwrap().to_rfc3339(), expected, "{raw}");
        }
        assert_eq!(stored_tanggal("kemarin").unwrap_err().code, ErrorCode::ValidationError);
    }

    fn stored(tanggal: &str) -> serde_json::Value {
        json!([{"belanjaId": "x1", "bahanBakuId": "b1", "namaBahanBaku": "Beras", "tanggal": tanggal,
                "hargaSatuan": 12000, "qty": 2, "hargaTotal": 24000}])
    }

    fn update_cmd(tanggal: Option<NaiveDate>) -> BelanjaCommand {
        BelanjaCommand::Update {
            id: "x1".into(),
            bahan_baku_id: "b1".into(),
            nama: None,
            tanggal,
            harga_satuan: 13000,
            qty: 2,
        }
    }

    #[tokio::test]
    async fn test_update_keeps_date_only_tanggal() {
        let (mock, _, ctx) = context();
        mock.push_json(200, stored("2024-05-01"));
        mock.push_json(200, json!({"message": "Belanja updated"}));
        mock.push_json(200, json!([]));

        run(&ctx, update_cmd(None), &mut &b""[..], &mut Vec::new()).await.unwrap();

        let put = &mock.requests()[1];
        assert_eq!(put.path, "/belanja/x1");
        let body = put.json().unwrap();
        assert_eq!(body["tanggal"], "2024-05-01T00:00:00.000Z");
        assert_eq!(body["namaBahanBaku"], "Beras");
        assert_eq!(body["hargaTotal"], 26000);
    }

    #[tokio::test]
    async fn test_update_with_unreadable_tanggal_sends_nothing() {
        let (mock, _, ctx) = context();
        mock.push_json(200, stored("not a date"));

        let err = run(&ctx, update_cmd(None), &mut &b""[..], &mut Vec::new()).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(mock.request_count(), 1);

        mock.push_json(200, stored("not a date"));
        mock.push_json(200, json!({"message": "Belanja updated"}));
        mock.push_json(200, json!([]));
        run(&ctx, update_cmd(NaiveDate::from_ymd_opt(2024, 6, 2)), &mut &b""[..], &mut Vec::new())
            .await
            .unwrap();
        assert_eq!(mock.requests()[2].json().unwrap()["tanggal"], "2024-06-02T00:00:00.000Z");
    }

    #[tokio::test]
    async fn test_record_with_overflowing_item_sends_nothing() {
        let (mock, _, ctx) = context();

        let cmd = BelanjaCommand::Record {
            items: vec![item("b1", "Beras", 2, i64::MAX)],
            tanggal: None,
        };
        let err = run(&ctx, cmd, &mut &b""[..], &mut Vec::new()).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_list_sends_date_range() {
        let (mock, _, ctx) = context();
        mock.push_json(200, json!([]));

        let cmd = BelanjaCommand::List {
            search: None,
            start_date: NaiveDate::from_ymd_opt(2024, 5, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 5, 31),
        };
        run(&ctx, cmd, &mut &b""[..], &mut Vec::new()).await.unwrap();

        let query = mock.last_request().unwrap().query;
        assert_eq!(
            query,
            vec![
                ("startDate".to_string(), "2024-05-01".to_string()),
                ("endDate".to_string(), "2024-05-31".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_reversed_range_is_rejected_locally() {
        let (mock, _, ctx) = context();

        let cmd = BelanjaCommand::List {
            search: None,
            start_date: NaiveDate::from_ymd_opt(2024, 6, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 5, 1),
        };
        let err = run(&ctx, cmd, &mut &b""[..], &mut Vec::new()).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_record_saves_every_item() {
        let (mock, _, ctx) = context();
        for id in ["x1", "x2"] {
            mock.push_json(
                201,
                json!({"belanjaId": id, "bahanBakuId": "b1", "tanggal": "2024-05-01T00:00:00.000Z",
                       "hargaSatuan": 1000, "qty": 1, "hargaTotal": 1000}),
            );
        }
        let mut out = Vec::new();

        let cmd = BelanjaCommand::Record {
            items: vec![item("b1", "Beras", 2, 12_000), item("b2", "Minyak", 1, 15_000)],
            tanggal: NaiveDate::from_ymd_opt(2024, 5, 1),
        };
        run(&ctx, cmd, &mut &b""[..], &mut out).await.unwrap();

        let out = text(out);
        assert!(out.contains("Total: Rp 39.000"));
        assert!(out.contains("2 baris tersimpan."));
        assert_eq!(mock.request_count(), 2);
    }

    #[tokio::test]
    async fn test_record_with_invalid_item_sends_nothing() {
        let (mock, _, ctx) = context();

        let cmd = BelanjaCommand::Record {
            items: vec![item("b1", "Beras", 2, 12_000), item("b2", "Minyak", 1, 0)],
            tanggal: None,
        };
        let err = run(&ctx, cmd, &mut &b""[..], &mut Vec::new()).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(mock.request_count(), 0);
    }
}
