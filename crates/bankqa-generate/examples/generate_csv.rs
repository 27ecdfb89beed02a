use std::env;
use std::path::PathBuf;

use bankqa_generate::{BankDataGenerator, GenerateOptions, RowCounts};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = env::args().skip(1);
    let mut out_dir = PathBuf::from("csv");
    let mut options = GenerateOptions::default();
    let mut counts = RowCounts::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--out" => out_dir = args.next().map(PathBuf::from).ok_or("missing --out value")?,
            "--seed" => options.seed = Some(args.next().ok_or("missing --seed value")?.parse()?),
            "--customers" => counts.customers = args.next().ok_or("missing value")?.parse()?,
            "--accounts" => counts.accounts = args.next().ok_or("missing value")?.parse()?,
            "--transactions" => {
                counts.transactions = args.next().ok_or("missing value")?.parse()?
            }
            _ => return Err(format!("unexpected argument '{arg}'").into()),
        }
    }

    let result = BankDataGenerator::new(options).run(counts, &out_dir)?;

    println!("out_dir={}", result.out_dir.display());
    Ok(())
}
