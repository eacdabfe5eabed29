use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::Context;
use colored::Colorize;
use serde_json::json;

use tally_ledger::{Ledger, LedgerError, RemoveOutcome, TracingAudit};
use tally_store::{LoadOutcome, SnapshotStore, StoreConfig};
use tally_types::parse_integer;

use crate::cli::*;

/// Snapshot file and output settings shared by every command.
struct Session {
    store: SnapshotStore,
    path: PathBuf,
    format: OutputFormat,
}

impl Session {
    fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let config = match &cli.config {
            Some(path) => StoreConfig::from_toml_file(path)
                .with_context(|| format!("reading config {}", path.display()))?,
            None => StoreConfig::default(),
        };
        let path = cli
            .file
            .clone()
            .unwrap_or_else(|| config.default_path.clone());
        Ok(Self {
            store: SnapshotStore::new(config)?,
            path,
            format: cli.format,
        })
    }

    fn open(&self) -> anyhow::Result<Ledger> {
        let mut ledger = Ledger::new();
        self.store
            .load(&mut ledger, &self.path)
            .with_context(|| format!("loading {}", self.path.display()))?;
        Ok(ledger)
    }

    fn commit(&self, ledger: &Ledger) -> anyhow::Result<()> {
        self.store
            .save(ledger, &self.path)
            .with_context(|| format!("saving {}", self.path.display()))
    }

    fn json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }
}

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let session = Session::from_cli(&cli)?;
    match cli.command {
        Command::Add(args) => cmd_add(&session, args),
        Command::Remove(args) => cmd_remove(&session, args),
        Command::Qty(args) => cmd_qty(&session, args),
        Command::Low(args) => cmd_low(&session, args),
        Command::Report(_) => cmd_report(&session),
        Command::Demo(_) => cmd_demo(&session),
    }
}

fn quantity_arg(raw: &str) -> Result<i64, LedgerError> {
    parse_integer(raw).map_err(|e| LedgerError::InvalidQuantity(e.to_string()))
}

fn threshold_arg(raw: &str) -> Result<i64, LedgerError> {
    parse_integer(raw).map_err(|e| LedgerError::InvalidThreshold(e.to_string()))
}

fn cmd_add(session: &Session, args: MutateArgs) -> anyhow::Result<()> {
    let qty = quantity_arg(&args.qty)?;
    let mut ledger = session.open()?;
    let total = ledger.add(&args.item, qty, Some(&mut TracingAudit))?;
    session.commit(&ledger)?;

    if session.json() {
        println!("{}", json!({ "item": args.item, "quantity": total }));
    } else {
        println!("{} {} now at {}", "✓".green().bold(), args.item.bold(), total);
    }
    Ok(())
}

fn cmd_remove(session: &Session, args: MutateArgs) -> anyhow::Result<()> {
    let qty = quantity_arg(&args.qty)?;
    let mut ledger = session.open()?;
    let outcome = ledger.remove(&args.item, qty)?;
    if outcome != RemoveOutcome::Absent {
        session.commit(&ledger)?;
    }

    if session.json() {
        let remaining = ledger.quantity_of(&args.item)?;
        println!(
            "{}",
            json!({
                "item": args.item,
                "tracked": ledger.contains(&args.item),
                "quantity": remaining,
            })
        );
        return Ok(());
    }
    match outcome {
        RemoveOutcome::Absent => println!(
            "{} {} is not tracked; nothing removed",
            "!".yellow().bold(),
            args.item.bold()
        ),
        RemoveOutcome::Reduced { remaining } => {
            println!("{} {} now at {}", "✓".green().bold(), args.item.bold(), remaining)
        }
        RemoveOutcome::Depleted { .. } => {
            println!("{} {} depleted and dropped", "✓".green().bold(), args.item.bold())
        }
    }
    Ok(())
}

fn cmd_qty(session: &Session, args: QtyArgs) -> anyhow::Result<()> {
    let ledger = session.open()?;
    let qty = ledger.quantity_of(&args.item)?;

    if session.json() {
        println!("{}", json!({ "item": args.item, "quantity": qty }));
    } else {
        println!("{}: {}", args.item.bold(), qty);
    }
    Ok(())
}

fn cmd_low(session: &Session, args: LowArgs) -> anyhow::Result<()> {
    let threshold = threshold_arg(&args.threshold)?;
    let ledger = session.open()?;
    let low = ledger.below_threshold(threshold)?;

    if session.json() {
        let names: Vec<&str> = low.iter().map(|name| name.as_str()).collect();
        println!("{}", json!({ "threshold": threshold, "items": names }));
    } else if low.is_empty() {
        println!("No items below {threshold}.");
    } else {
        println!("Items below {}:", threshold.to_string().bold());
        for name in &low {
            println!("  {}", name.as_str().yellow());
        }
    }
    Ok(())
}

fn cmd_report(session: &Session) -> anyhow::Result<()> {
    let ledger = session.open()?;
    if session.json() {
        println!("{}", serde_json::to_string(&ledger)?);
    } else {
        print!("{}", render_report(&ledger));
    }
    Ok(())
}

fn cmd_demo(session: &Session) -> anyhow::Result<()> {
    let mut ledger = Ledger::new();
    let mut audit: Vec<String> = Vec::new();

    ledger.add("apple", 10, Some(&mut audit))?;
    ledger.add("banana", 2, Some(&mut audit))?;
    if let Err(e) = ledger.add("  ", 10, Some(&mut audit)) {
        println!("{} {}", "rejected:".red(), e);
    }
    ledger.remove("apple", 3)?;
    ledger.remove("orange", 1)?;

    println!("Apple stock: {}", ledger.quantity_of("apple")?);
    let low = ledger.below_threshold(5)?;
    let names: Vec<&str> = low.iter().map(|name| name.as_str()).collect();
    println!("Low items: {names:?}");

    session.commit(&ledger)?;
    let mut reloaded = Ledger::new();
    if let LoadOutcome::Loaded { items } = session.store.load(&mut reloaded, &session.path)? {
        println!(
            "{} Reloaded {} items from {}",
            "✓".green().bold(),
            items,
            session.path.display()
        );
    }
    print!("{}", render_report(&reloaded));

    println!("Audit:");
    for line in &audit {
        println!("  {}", line.dimmed());
    }
    Ok(())
}

/// Human-readable listing of every tracked item, in ledger order.
fn render_report(ledger: &Ledger) -> String {
    let mut out = String::from("Items Report\n");
    for (name, qty) in ledger.iter() {
        let _ = writeln!(out, "{name} -> {qty}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn run(file: &std::path::Path, args: &[&str]) -> anyhow::Result<()> {
        let mut argv = vec!["tally", "--file", file.to_str().unwrap()];
        argv.extend_from_slice(args);
        run_command(Cli::try_parse_from(argv).unwrap())
    }

    fn read_back(file: &std::path::Path) -> Ledger {
        let mut ledger = Ledger::new();
        tally_store::load(&mut ledger, file).unwrap();
        ledger
    }

    #[test]
    fn report_lists_items_in_order() {
        let mut ledger = Ledger::new();
        ledger.add("apple", 7, None).unwrap();
        ledger.add("banana", 2, None).unwrap();

        assert_eq!(
            render_report(&ledger),
            "Items Report\napple -> 7\nbanana -> 2\n"
        );
    }

    #[test]
    fn report_of_empty_ledger_is_header_only() {
        assert_eq!(render_report(&Ledger::new()), "Items Report\n");
    }

    #[test]
    fn add_then_remove_persists_between_runs() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("inventory.json");

        run(&file, &["add", "apple", "10"]).unwrap();
        run(&file, &["remove", "apple", "3"]).unwrap();

        assert_eq!(read_back(&file).quantity_of("apple").unwrap(), 7);
    }

    #[test]
    fn non_integer_quantity_is_invalid_quantity() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("inventory.json");

        let err = run(&file, &["add", "apple", "ten"]).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<LedgerError>(),
            Some(LedgerError::InvalidQuantity(_))
        ));
        assert!(!file.exists());
    }

    #[test]
    fn negative_threshold_is_invalid_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("inventory.json");

        let err = run(&file, &["low", "--threshold", "-1"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LedgerError>(),
            Some(LedgerError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn removing_untracked_item_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("inventory.json");

        run(&file, &["remove", "orange", "1"]).unwrap();
        assert!(!file.exists());
    }

    #[test]
    fn corrupt_snapshot_surfaces_schema_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("inventory.json");
        std::fs::write(&file, r#"{"x": "ten"}"#).unwrap();

        let err = run(&file, &["qty", "x"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<tally_store::StoreError>(),
            Some(tally_store::StoreError::SchemaInvalid { .. })
        ));
    }

    #[test]
    fn demo_writes_expected_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("inventory.json");

        run(&file, &["demo"]).unwrap();

        let ledger = read_back(&file);
        assert_eq!(ledger.quantity_of("apple").unwrap(), 7);
        assert_eq!(ledger.quantity_of("banana").unwrap(), 2);
        assert!(!ledger.contains("orange"));
        assert_eq!(std::fs::read_to_string(&file).unwrap(), r#"{"apple":7,"banana":2}"#);
    }

    #[test]
    fn config_file_supplies_default_path() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = dir.path().join("configured.json");
        let config = dir.path().join("tally.toml");
        std::fs::write(
            &config,
            format!("default_path = {:?}\n", snapshot.to_str().unwrap()),
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "tally",
            "--config",
            config.to_str().unwrap(),
            "add",
            "bolt",
            "4",
        ])
        .unwrap();
        run_command(cli).unwrap();

        assert_eq!(read_back(&snapshot).quantity_of("bolt").unwrap(), 4);
    }
}
