//! `stockroom` command-line entry point.
//!
//! ```text
//! stockroom list
//! stockroom add <name> <price> <quantity> <supplier> <phone> [--sale]
//! stockroom sell <id>
//! stockroom delete <id>
//! ```
//!
//! The store location comes from `STOCKROOM_DATABASE` (`:memory:` for a throwaway store).

use anyhow::{Context, bail};
use serde_json::json;

use stockroom_app::{EditorForm, ListScreen, Notice, SaveOutcome};
use stockroom_core::ProductId;
use stockroom_infra::{SharedStore, StoreConfig, StoreHost};
use stockroom_products::SaleFlag;

const USAGE: &str = "usage: stockroom <list | add <name> <price> <quantity> <supplier> <phone> [--sale] | sell <id> | delete <id>>";

fn main() -> anyhow::Result<()> {
    stockroom_observability::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        bail!(USAGE);
    };

    let config = StoreConfig::from_env();
    tracing::info!(backend = ?config.backend, "starting stockroom");
    let host = StoreHost::new(config);
    let store = host.acquire().context("failed to open product store")?;

    match command.as_str() {
        "list" => list(&store),
        "add" => add(&store, rest),
        "sell" => sell(&store, rest),
        "delete" => delete(&store, rest),
        other => bail!("unknown command {other:?}\n{USAGE}"),
    }
}

fn list(store: &SharedStore) -> anyhow::Result<()> {
    let screen = ListScreen::open(store).context("failed to read products")?;
    println!("{}", serde_json::to_string_pretty(screen.rows())?);
    Ok(())
}

fn add(store: &SharedStore, args: &[String]) -> anyhow::Result<()> {
    let (positional, flags): (Vec<&String>, Vec<&String>) =
        args.iter().partition(|a| !a.starts_with("--"));
    let [name, price, quantity, supplier, phone] = positional.as_slice() else {
        bail!(USAGE);
    };

    let mut form = EditorForm::new();
    form.set_name(name.as_str());
    form.set_price(price.as_str());
    form.set_quantity(quantity.as_str());
    form.set_supplier_name(supplier.as_str());
    form.set_supplier_phone(phone.as_str());
    if flags.iter().any(|f| f.as_str() == "--sale") {
        form.set_sale(SaleFlag::HasSale);
    }

    let outcome = form.save(store);
    match outcome {
        SaveOutcome::Inserted(id) => {
            let product = store.require(id)?;
            print_notice(Notice::InsertSucceeded);
            println!("{}", serde_json::to_string_pretty(&product)?);
            Ok(())
        }
        other => report(other.notice().unwrap_or(Notice::InsertFailed)),
    }
}

fn sell(store: &SharedStore, args: &[String]) -> anyhow::Result<()> {
    let id = product_id(args)?;
    let mut screen = ListScreen::open(store).context("failed to read products")?;

    if let Some(notice) = screen.sell(id) {
        return report(notice);
    }
    screen.refresh_if_stale()?;
    let row = screen.row(id).context("product vanished after sale")?;
    println!("{}", serde_json::to_string_pretty(row)?);
    Ok(())
}

fn delete(store: &SharedStore, args: &[String]) -> anyhow::Result<()> {
    let id = product_id(args)?;
    let form = EditorForm::edit(store, id).context("failed to read product")?;
    match form.delete(store) {
        Some(notice) => report(notice),
        None => Ok(()),
    }
}

fn product_id(args: &[String]) -> anyhow::Result<ProductId> {
    let [raw] = args else {
        bail!(USAGE);
    };
    raw.parse::<ProductId>()
        .with_context(|| format!("invalid product id {raw:?}"))
}

fn print_notice(notice: Notice) {
    println!("{}", json!({ "notice": notice.message() }));
}

fn report(notice: Notice) -> anyhow::Result<()> {
    print_notice(notice);
    if notice.is_error() {
        bail!(notice.message());
    }
    Ok(())
}
