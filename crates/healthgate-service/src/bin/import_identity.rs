//! Import a CA-issued identity into the service wallet.
//!
//! Reads the certificate and private key from an MSP directory
//! (`signcerts/` + `keystore/`) and stores them under a label for the
//! gateway to use when opening ledger sessions.

use clap::Parser;
use healthgate_ledger::{FileWallet, WalletIdentity};
use std::path::PathBuf;

/// Wallet import CLI.
#[derive(Parser)]
#[command(name = "hg-import-identity")]
#[command(about = "Import an MSP identity into the healthgate wallet", long_about = None)]
#[command(version)]
struct Cli {
    /// Wallet directory
    #[arg(short, long, env = "HEALTHGATE_LEDGER_WALLET_DIR", default_value = "wallet")]
    wallet: PathBuf,

    /// MSP directory containing signcerts/ and keystore/
    #[arg(short, long)]
    msp_dir: PathBuf,

    /// Label to store the identity under
    #[arg(short, long)]
    label: String,

    /// MSP the identity belongs to
    #[arg(long)]
    msp_id: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let identity = WalletIdentity::from_msp_dir(&cli.msp_dir, &cli.msp_id)?;
    let wallet = FileWallet::open(&cli.wallet)?;

    if wallet.get(&cli.label)?.is_some() {
        println!("identity '{}' already exists, replacing", cli.label);
    }
    wallet.put(&cli.label, &identity)?;

    println!(
        "imported identity '{}' (msp {}) into {}",
        cli.label,
        cli.msp_id,
        wallet.dir().display()
    );
    Ok(())
}
