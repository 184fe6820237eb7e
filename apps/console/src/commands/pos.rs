//! # POS Session
//!
//! Line-oriented cart on stdin. One command per line:
//!
//! ```text
//! produk                 show the product grid
//! kategori               show categories
//! kategori <id>|all      filter by category
//! cari [term]            search products (empty clears)
//! tambah <produkId>      add one unit
//! hapus <produkId>       remove the line
//! keranjang              show the cart
//! simpan                 save the order
//! keluar                 end the session (also EOF)
//! ```

use std::io::Write;
use std::str::FromStr;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use super::Context;
use crate::error::{AppResult, ErrorCode};
use crate::notify::Notification;
use crate::render::{self, Table};
use crate::screens::{PosScreen, ALL_CATEGORY};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PosInput {
    Products,
    Categories,
    SelectCategory(Option<String>),
    Search(String),
    Add(String),
    Remove(String),
    Cart,
    Save,
    Help,
    Quit,
}

impl FromStr for PosInput {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, arg) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let required = |what: &str| {
            if arg.is_empty() {
                Err(format!("'{}' needs a {}", word, what))
            } else {
                Ok(arg.to_string())
            }
        };

        match word.to_lowercase().as_str() {
            "produk" | "ls" => Ok(PosInput::Products),
            "kategori" | "category" if arg.is_empty() => Ok(PosInput::Categories),
            "kategori" | "category" => {
                let selection = (!arg.eq_ignore_ascii_case("all")).then(|| arg.to_string());
                Ok(PosInput::SelectCategory(selection))
            }
            "cari" | "search" => Ok(PosInput::Search(arg.to_string())),
            "tambah" | "add" => required("product id").map(PosInput::Add),
            "hapus" | "rm" => required("product id").map(PosInput::Remove),
            "keranjang" | "cart" => Ok(PosInput::Cart),
            "simpan" | "save" => Ok(PosInput::Save),
            "bantuan" | "help" | "?" => Ok(PosInput::Help),
            "keluar" | "quit" | "exit" => Ok(PosInput::Quit),
            other => Err(format!("Unknown command '{}', type 'bantuan' for help", other)),
        }
    }
}

const HELP: &str = "\
produk | kategori [id|all] | cari [term] | tambah <id> | hapus <id> | keranjang | simpan | keluar";

/// Runs the session until `keluar` or end of input.
///
/// Errors are reported and the session goes on; only I/O errors end it.
pub async fn session<I, W>(ctx: &Context, input: &mut I, out: &mut W) -> AppResult<()>
where
    I: AsyncBufRead + Unpin,
    W: Write,
{
    let mut screen = PosScreen::new(ctx.gateway.clone(), ctx.notifier.clone());
    // A failed initial load is already reported; the operator can retry.
    let _ = screen.load_categories().await;
    let _ = screen.refresh_products().await;
    writeln!(out, "{}", HELP)?;

    let mut line = String::new();
    loop {
        write!(out, "[{} | {}] > ", screen.category_label(), screen.grand_total())?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line).await? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<PosInput>() {
            Ok(command) => command,
            Err(message) => {
                ctx.notifier.notify(Notification::error(message));
                continue;
            }
        };
        debug!(?command, "POS input");
        if command == PosInput::Quit {
            break;
        }

        if let Err(e) = apply(&mut screen, command, out).await {
            if e.code == ErrorCode::IoError {
                return Err(e);
            }
            if !e.notified {
                ctx.notifier.notify(Notification::error(e.message));
            }
        }
    }

    if !screen.cart().is_empty() {
        writeln!(out, "Keranjang belum disimpan ({} baris).", screen.cart().len())?;
    }
    Ok(())
}

async fn apply<W: Write>(screen: &mut PosScreen, command: PosInput, out: &mut W) -> AppResult<()> {
    match command {
        PosInput::Products => products(screen, out)?,
        PosInput::Categories => {
            let mut table = Table::new(["ID", "Kategori"]);
            table.row(["all", ALL_CATEGORY]);
            for c in screen.categories() {
                table.row([c.category_id.as_str(), c.category_name.as_str()]);
            }
            table.write_to(out)?;
        }
        PosInput::SelectCategory(id) => {
            screen.set_category(id).await?;
            products(screen, out)?;
        }
        PosInput::Search(term) => {
            screen.set_search(&term).await?;
            products(screen, out)?;
        }
        PosInput::Add(id) => {
            let line = screen.add_product(&id)?;
            writeln!(out, "{} x{} = {}", line.name(), line.quantity(), line.line_total())?;
        }
        PosInput::Remove(id) => match screen.remove_item(&id) {
            Some(line) => writeln!(out, "{} dihapus.", line.name())?,
            None => writeln!(out, "{} tidak ada di keranjang.", id)?,
        },
        PosInput::Cart => render::cart(out, screen.cart())?,
        PosInput::Save => {
            let lines = screen.cart().len();
            let created = screen.submit().await?;
            let message = if created.message.is_empty() { "Tersimpan" } else { created.message.as_str() };
            writeln!(out, "{} ({} baris)", message, lines)?;
        }
        PosInput::Help => writeln!(out, "{}", HELP)?,
        PosInput::Quit => {}
    }
    Ok(())
}

fn products<W: Write>(screen: &PosScreen, out: &mut W) -> AppResult<()> {
    render::produk(out, screen.products())?;
    Ok(())
}
