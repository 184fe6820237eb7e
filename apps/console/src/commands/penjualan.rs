//! Sales list.

use std::io::Write;

use super::Context;
use crate::cli::PenjualanCommand;
use crate::error::{AppError, AppResult};
use crate::notify::Notification;
use crate::render;

pub async fn run<W: Write>(ctx: &Context, cmd: PenjualanCommand, out: &mut W) -> AppResult<()> {
    match cmd {
        PenjualanCommand::List => {
            let rows = match ctx.gateway.penjualan().await {
                Ok(rows) => rows,
                Err(e) => {
                    ctx.notifier.notify(Notification::error(e.to_string()));
                    return Err(AppError::from(e).notified());
                }
            };
            render::penjualan(out, &rows)?;
        }
    }
    Ok(())
}
