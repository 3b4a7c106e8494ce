use super::{CliModel, load};
use crate::{BucketArgs, Kind};
use colored::Colorize;
use fleetflow_r2::{CorsModel, CustomDomainModel, EventNotificationModel, LifecycleModel, SippyModel};
use std::path::Path;

pub fn handle(kind: Kind, args: &BucketArgs, file: &Path) -> anyhow::Result<()> {
    println!("{}", "設定を検証中...".blue());

    let result = match kind {
        Kind::Lifecycle => check::<LifecycleModel>(args, file),
        Kind::Cors => check::<CorsModel>(args, file),
        Kind::EventNotification => check::<EventNotificationModel>(args, file),
        Kind::Sippy => check::<SippyModel>(args, file),
        Kind::CustomDomain => check::<CustomDomainModel>(args, file),
    };

    match result {
        Ok((path, summary)) => {
            println!("{}", "✓ 設定は正常です！".green().bold());
            println!();
            println!("パス: {}", path.cyan());
            for line in summary {
                println!("{}", line);
            }
        }
        Err(e) => {
            eprintln!();
            eprintln!("{}", "✗ 設定エラー".red().bold());
            eprintln!("  {:#}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn check<M: CliModel>(args: &BucketArgs, file: &Path) -> anyhow::Result<(String, Vec<String>)> {
    let model: M = load(file, args)?;
    model.validate()?;
    Ok((model.path(), model.summary()))
}
