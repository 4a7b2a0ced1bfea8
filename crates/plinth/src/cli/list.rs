use anyhow::{Context, Result};
use plinth_store::Receipt;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::env::PlinthEnv;

#[derive(Debug, clap::Args)]
pub struct List {}

#[derive(Debug, Tabled)]
struct Row {
    #[tabled(rename = "PLUGIN")]
    name:      String,
    #[tabled(rename = "VERSION")]
    version:   String,
    #[tabled(rename = "TARGET")]
    target:    String,
    #[tabled(rename = "INSTALLED")]
    installed: String,
}

impl From<Receipt> for Row {
    fn from(receipt: Receipt) -> Self {
        Self {
            name:      receipt.name,
            version:   receipt.version,
            target:    receipt.target.to_string(),
            installed: receipt.installed_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

impl List {
    pub fn run(self, env: &PlinthEnv) -> Result<bool> {
        let installed = env
            .store()
            .installed()
            .context("failed to read installed plugins")?;
        if installed.is_empty() {
            println!("No plugins installed.");
            return Ok(true);
        }
        println!("{}", render(installed));
        Ok(true)
    }
}

fn render(receipts: Vec<Receipt>) -> Table {
    let mut table = Table::new(receipts.into_iter().map(Row::from));
    table.with(Style::blank());
    table
}
