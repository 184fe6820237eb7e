//! # Command Line
//!
//! ```text
//! warteg [--config <path>] [--base-url <url>] [-v] <command>
//!
//!   category    list | create | update | delete
//!   bahan-baku  list | create | update | delete
//!   belanja     list | record | update | delete
//!   produk      list | create | update | delete
//!   penjualan   list
//!   pos         interactive cart on stdin
//!   dashboard   summary
//! ```

use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "warteg", version, about = "Warteg restaurant management client")]
pub struct Cli {
    /// Config file (default: warteg.toml in the platform config dir)
    #[arg(long, global = true, env = "WARTEG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Overrides the API base URL from config and environment
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Debug logging for warteg crates
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Product categories
    #[command(subcommand)]
    Category(CategoryCommand),

    /// Raw materials
    #[command(subcommand)]
    BahanBaku(BahanBakuCommand),

    /// Purchases of raw materials
    #[command(subcommand)]
    Belanja(BelanjaCommand),

    /// Product catalog
    #[command(subcommand)]
    Produk(ProdukCommand),

    /// Sales records
    #[command(subcommand)]
    Penjualan(PenjualanCommand),

    /// Interactive point-of-sale session
    Pos,

    /// Sales, purchases and profit
    Dashboard,
}

// =============================================================================
// Shared Arguments
// =============================================================================

#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct DeleteArgs {
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(long, short)]
    pub yes: bool,
}

// =============================================================================
// Category / Bahan Baku
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum CategoryCommand {
    List(SearchArgs),
    Create {
        #[arg(long)]
        name: String,
    },
    Update {
        id: String,
        #[arg(long)]
        name: String,
    },
    Delete(DeleteArgs),
}

#[derive(Debug, Clone, Args)]
pub struct BahanBakuForm {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub supplier: Option<String>,
    #[arg(long)]
    pub merk: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum BahanBakuCommand {
    List(SearchArgs),
    Create(BahanBakuForm),
    Update {
        id: String,
        #[command(flatten)]
        form: BahanBakuForm,
    },
    Delete(DeleteArgs),
}

// =============================================================================
// Belanja
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum BelanjaCommand {
    List {
        #[arg(long)]
        search: Option<String>,
        /// First day, YYYY-MM-DD
        #[arg(long)]
        start_date: Option<NaiveDate>,
        /// Last day, YYYY-MM-DD
        #[arg(long)]
        end_date: Option<NaiveDate>,
    },
    /// Builds a purchase list and saves it line by line
    Record {
        /// bahanBakuId:nama:qty:hargaSatuan (repeatable)
        #[arg(long = "item", required = true)]
        items: Vec<PurchaseItemArg>,
        /// Purchase date, YYYY-MM-DD (default: now)
        #[arg(long)]
        tanggal: Option<NaiveDate>,
    },
    Update {
        id: String,
        #[arg(long)]
        bahan_baku_id: String,
        #[arg(long)]
        nama: Option<String>,
        #[arg(long)]
        tanggal: Option<NaiveDate>,
        #[arg(long)]
        harga_satuan: i64,
        #[arg(long)]
        qty: i64,
    },
    Delete(DeleteArgs),
}

/// One `--item` of `belanja record`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseItemArg {
    pub bahan_baku_id: String,
    pub nama: String,
    pub qty: i64,
    pub harga_satuan: i64,
}

impl FromStr for PurchaseItemArg {
    type Err = String;

    /// The name may itself contain `:`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let usage = || format!("expected bahanBakuId:nama:qty:harga, got '{}'", s);

        let (bahan_baku_id, rest) = s.split_once(':').ok_or_else(usage)?;
        let mut tail = rest.rsplitn(3, ':');
        let harga = tail.next().ok_or_else(usage)?;
        let qty = tail.next().ok_or_else(usage)?;
        let nama = tail.next().ok_or_else(usage)?;

        Ok(PurchaseItemArg {
            bahan_baku_id: bahan_baku_id.trim().to_string(),
            nama: nama.trim().to_string(),
            qty: qty.trim().parse().map_err(|e| format!("invalid qty '{}': {}", qty, e))?,
            harga_satuan: harga.trim().parse().map_err(|e| format!("invalid harga '{}': {}", harga, e))?,
        })
    }
}

// =============================================================================
// Produk / Penjualan
// =============================================================================

#[derive(Debug, Clone, Args)]
pub struct ProdukForm {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub harga: i64,
    #[arg(long)]
    pub category_id: String,
    /// Image file (jpg, png, webp, gif)
    #[arg(long)]
    pub image: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum ProdukCommand {
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category_id: Option<String>,
    },
    Create(ProdukForm),
    Update {
        id: String,
        #[command(flatten)]
        form: ProdukForm,
    },
    Delete(DeleteArgs),
}

#[derive(Debug, Subcommand)]
pub enum PenjualanCommand {
    List,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_item_parses_name_with_colon() {
        let item: PurchaseItemArg = "b1:Beras: Pandan Wangi:2:12000".parse().unwrap();
        assert_eq!(item.bahan_baku_id, "b1");
        assert_eq!(item.nama, "Beras: Pandan Wangi");
        assert_eq!(item.qty, 2);
        assert_eq!(item.harga_satuan, 12000);
    }

    #[test]
    fn test_item_rejects_bad_input() {
        assert!("b1:Beras:2".parse::<PurchaseItemArg>().is_err());
        assert!("b1:Beras:dua:12000".parse::<PurchaseItemArg>().is_err());
    }

    #[test]
    fn test_parses_belanja_record() {
        let cli = Cli::try_parse_from([
            "warteg",
            "belanja",
            "record",
            "--item",
            "b1:Beras:2:12000",
            "--item",
            "b2:Minyak:1:15000",
            "--tanggal",
            "2024-05-01",
        ])
        .unwrap();

        match cli.command {
            Command::Belanja(BelanjaCommand::Record { items, tanggal }) => {
                assert_eq!(items.len(), 2);
                assert_eq!(tanggal, NaiveDate::from_ymd_opt(2024, 5, 1));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["warteg", "dashboard", "--base-url", "http://pos.local", "-v"]).unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://pos.local"));
        assert!(cli.verbose);
    }
}
