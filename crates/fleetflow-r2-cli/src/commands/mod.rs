pub mod render;
pub mod validate;

use crate::BucketArgs;
use anyhow::Context;
use fleetflow_r2::{
    BucketRef, BucketSubResource, CorsModel, CustomDomainModel, EventNotificationModel,
    Jurisdiction, LifecycleModel, SippyModel,
};
use std::path::Path;

/// CLI-side hooks for each sub-resource model
pub trait CliModel: BucketSubResource {
    /// Fill in fields that come from the command line rather than the file
    fn prepare(&mut self, _args: &BucketArgs) -> anyhow::Result<()> {
        Ok(())
    }

    /// One line per item, for `validate` output
    fn summary(&self) -> Vec<String>;
}

impl CliModel for LifecycleModel {
    fn summary(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "ルール: {}個 (日付条件を含む: {}個)",
            self.rules().len(),
            self.dated_rule_count()
        )];
        for (index, rule) in self.rules().iter().enumerate() {
            let id = rule.id.clone().unwrap_or_else(|| format!("#{}", index));
            let mut parts = Vec::new();
            if let Some(condition) = rule.delete_transition.as_ref().and_then(|t| t.condition.as_ref()) {
                parts.push(format!("delete:{}", condition.type_name()));
            }
            let transitions = rule.storage_class_transitions.as_deref().unwrap_or_default();
            if !transitions.is_empty() {
                parts.push(format!("storage-class:{}", transitions.len()));
            }
            if rule.abort_multipart_transition.is_some() {
                parts.push("abort-multipart".to_string());
            }
            let state = if rule.enabled { "有効" } else { "無効" };
            lines.push(format!("  - {} [{}] {}", id, state, parts.join(", ")));
        }
        lines
    }
}

impl CliModel for CorsModel {
    fn summary(&self) -> Vec<String> {
        let rules = self.rules.as_deref().unwrap_or_default();
        let mut lines = vec![format!("CORSルール: {}個", rules.len())];
        for rule in rules {
            lines.push(format!(
                "  - {} (methods: {}, origins: {})",
                rule.id.as_deref().unwrap_or("(ID未設定)"),
                rule.allowed.methods.len(),
                rule.allowed.origins.join(" ")
            ));
        }
        lines
    }
}

impl CliModel for EventNotificationModel {
    fn prepare(&mut self, args: &BucketArgs) -> anyhow::Result<()> {
        self.queue_id = args
            .queue_id
            .clone()
            .context("event-notification には --queue-id が必要です")?;
        Ok(())
    }

    fn summary(&self) -> Vec<String> {
        let rules = self.rules.as_deref().unwrap_or_default();
        let mut lines = vec![format!("キュー: {} / 通知ルール: {}個", self.queue_id, rules.len())];
        for rule in rules {
            lines.push(format!(
                "  - {:?} prefix={} suffix={}",
                rule.actions,
                rule.prefix.as_deref().unwrap_or("-"),
                rule.suffix.as_deref().unwrap_or("-")
            ));
        }
        lines
    }
}

impl CliModel for SippyModel {
    fn summary(&self) -> Vec<String> {
        let source = self
            .source
            .as_ref()
            .map(|s| format!("{:?} {}", s.provider, s.bucket.as_deref().unwrap_or("-")))
            .unwrap_or_else(|| "(未設定)".to_string());
        vec![format!("移行元: {}", source)]
    }
}

impl CliModel for CustomDomainModel {
    fn summary(&self) -> Vec<String> {
        vec![format!(
            "ドメイン: {} (zone: {}, {})",
            self.domain,
            self.zone_id,
            if self.enabled { "有効" } else { "無効" }
        )]
    }
}

pub fn bucket_ref(args: &BucketArgs) -> anyhow::Result<BucketRef> {
    let jurisdiction: Jurisdiction = args.jurisdiction.parse()?;
    let bucket = BucketRef::new(&args.account_id, &args.bucket).with_jurisdiction(jurisdiction);
    bucket.validate()?;
    Ok(bucket)
}

/// Read a model from a JSON file and attach it to the bucket
pub fn load<M: CliModel>(path: &Path, args: &BucketArgs) -> anyhow::Result<M> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("{} を読み込めません", path.display()))?;
    let mut model: M = serde_json::from_str(&content)
        .with_context(|| format!("{} のJSONを解析できません", path.display()))?;
    model.set_bucket(bucket_ref(args)?);
    model.prepare(args)?;
    tracing::debug!("loaded {} from {}", M::KIND, path.display());
    Ok(model)
}
