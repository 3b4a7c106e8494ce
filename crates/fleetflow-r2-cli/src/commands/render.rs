use super::{CliModel, load};
use crate::{BucketArgs, Kind};
use fleetflow_r2::{CorsModel, CustomDomainModel, EventNotificationModel, LifecycleModel, SippyModel};
use std::path::Path;

pub fn handle(
    kind: Kind,
    args: &BucketArgs,
    desired: &Path,
    prior: Option<&Path>,
    pretty: bool,
) -> anyhow::Result<()> {
    let body = match kind {
        Kind::Lifecycle => render::<LifecycleModel>(args, desired, prior)?,
        Kind::Cors => render::<CorsModel>(args, desired, prior)?,
        Kind::EventNotification => render::<EventNotificationModel>(args, desired, prior)?,
        Kind::Sippy => render::<SippyModel>(args, desired, prior)?,
        Kind::CustomDomain => render::<CustomDomainModel>(args, desired, prior)?,
    };

    let output = if pretty {
        let value: serde_json::Value = serde_json::from_slice(&body)?;
        serde_json::to_string_pretty(&value)?
    } else {
        String::from_utf8(body)?
    };
    println!("{}", output);

    Ok(())
}

fn render<M: CliModel>(args: &BucketArgs, desired: &Path, prior: Option<&Path>) -> anyhow::Result<Vec<u8>> {
    let desired: M = load(desired, args)?;
    desired.validate()?;

    let body = match prior {
        Some(prior) => {
            let prior: M = load(prior, args)?;
            desired.marshal_for_update(&prior)?
        }
        None => desired.marshal()?,
    };

    if let Some((header, value)) = desired.bucket().jurisdiction.header() {
        tracing::debug!("request needs header {}: {}", header, value);
    }
    tracing::info!(
        "rendered {} body for {} ({} bytes)",
        M::KIND,
        desired.path(),
        body.len()
    );
    Ok(body)
}
