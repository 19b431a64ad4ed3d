//! Pipeline plan types
//!
//! The plan is the compiler's output and the execution engine's input:
//! stages run in order, tasks inside a stage may run concurrently.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Smallest unit of execution: one plugin invocation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineTask {
    pub plugin: String,

    #[serde(default)]
    pub skip_on_fail: bool,

    #[serde(default)]
    pub subtasks: Vec<String>,

    /// Flat, serializable option bag the plugin decodes at run time
    #[serde(default)]
    pub options: Map<String, Value>,
}

impl PipelineTask {
    pub fn new(plugin: impl Into<String>) -> Self {
        Self {
            plugin: plugin.into(),
            ..Default::default()
        }
    }

    pub fn with_subtasks<I, S>(mut self, subtasks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subtasks = subtasks.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_options(mut self, options: Map<String, Value>) -> Self {
        self.options = options;
        self
    }
}

/// Tasks that are safe to run concurrently
pub type PipelineStage = Vec<PipelineTask>;

/// Ordered list of stages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PipelinePlan(Vec<PipelineStage>);

impl PipelinePlan {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn from_stages(stages: Vec<PipelineStage>) -> Self {
        Self(stages)
    }

    pub fn stages(&self) -> &[PipelineStage] {
        &self.0
    }

    pub fn into_stages(self) -> Vec<PipelineStage> {
        self.0
    }

    pub fn push_stage(&mut self, stage: PipelineStage) {
        self.0.push(stage);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Total number of tasks across all stages
    pub fn task_count(&self) -> usize {
        self.0.iter().map(Vec::len).sum()
    }

    pub fn tasks(&self) -> impl Iterator<Item = &PipelineTask> {
        self.0.iter().flatten()
    }

    pub fn tasks_mut(&mut self) -> impl Iterator<Item = &mut PipelineTask> {
        self.0.iter_mut().flatten()
    }

    /// Merge plans that may run side by side: stage `i` of every plan lands
    /// in stage `i` of the result.
    pub fn parallelize<I>(plans: I) -> PipelinePlan
    where
        I: IntoIterator<Item = PipelinePlan>,
    {
        let mut merged: Vec<PipelineStage> = Vec::new();
        for plan in plans {
            for (index, stage) in plan.0.into_iter().enumerate() {
                if index >= merged.len() {
                    merged.push(Vec::new());
                }
                merged[index].extend(stage);
            }
        }
        PipelinePlan(merged)
    }

    /// Merge plans that must run one after the other
    pub fn sequentialize<I>(plans: I) -> PipelinePlan
    where
        I: IntoIterator<Item = PipelinePlan>,
    {
        PipelinePlan(plans.into_iter().flat_map(|p| p.0).collect())
    }
}

impl From<Vec<PipelineStage>> for PipelinePlan {
    fn from(stages: Vec<PipelineStage>) -> Self {
        Self(stages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(plugin: &str) -> PipelineTask {
        PipelineTask::new(plugin)
    }

    #[test]
    fn test_parallelize_merges_stage_by_index() {
        let a = PipelinePlan::from_stages(vec![vec![task("github")], vec![task("refdiff")]]);
        let b = PipelinePlan::from_stages(vec![vec![task("jira")]]);

        let merged = PipelinePlan::parallelize([a, b]);

        assert_eq!(merged.len(), 2);
        let first: Vec<_> = merged.stages()[0].iter().map(|t| t.plugin.as_str()).collect();
        assert_eq!(first, vec!["github", "jira"]);
        assert_eq!(merged.stages()[1][0].plugin, "refdiff");
    }

    #[test]
    fn test_sequentialize_concatenates() {
        let before = PipelinePlan::from_stages(vec![vec![task("webhook")]]);
        let body = PipelinePlan::from_stages(vec![vec![task("gitlab")], vec![task("dora")]]);

        let plan = PipelinePlan::sequentialize([before, body, PipelinePlan::new()]);

        assert_eq!(plan.len(), 3);
        assert_eq!(plan.task_count(), 3);
        assert_eq!(plan.stages()[2][0].plugin, "dora");
    }

    #[test]
    fn test_plan_serializes_as_nested_arrays() {
        let plan = PipelinePlan::from_stages(vec![vec![task("refdiff")]]);
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(
            json,
            serde_json::json!([[{
                "plugin": "refdiff",
                "skipOnFail": false,
                "subtasks": [],
                "options": {}
            }]])
        );
    }
}
