//! Terminal rendering of compile results

use blueprint_core::domain::pipeline::PipelineTask;
use blueprint_core::domain::scope::DomainScope;
use blueprint_core::dto::compile::CompileResponse;
use blueprint_core::dto::plugin::PluginSummary;
use colored::*;

pub fn print_response(response: &CompileResponse) {
    let plan = &response.plan;

    if plan.is_empty() {
        println!("{}", "Empty plan: nothing to collect.".yellow());
    } else {
        println!(
            "{}",
            format!(
                "✓ Plan with {} stage(s), {} task(s)",
                plan.len(),
                plan.task_count()
            )
            .green()
            .bold()
        );
        for (index, stage) in plan.stages().iter().enumerate() {
            println!();
            println!("  {}", format!("Stage {}", index + 1).bold());
            for task in stage {
                println!("{}", task_line(task));
                if !task.options.is_empty() {
                    println!(
                        "      {}",
                        serde_json::Value::Object(task.options.clone())
                            .to_string()
                            .dimmed()
                    );
                }
            }
        }
    }

    println!();
    if response.scopes.is_empty() {
        println!("{}", "No domain scopes.".yellow());
    } else {
        println!(
            "{}",
            format!("Domain scopes ({}):", response.scopes.len()).bold()
        );
        for scope in &response.scopes {
            println!("{}", scope_line(scope));
        }
    }
}

pub fn task_line(task: &PipelineTask) -> String {
    let mut line = format!("    {} {}", "▸".cyan(), task.plugin.bold());
    if !task.subtasks.is_empty() {
        line.push_str(&format!(
            " {}",
            format!("[{} subtask(s)]", task.subtasks.len()).dimmed()
        ));
    }
    if task.skip_on_fail {
        line.push_str(&format!(" {}", "(skip on fail)".yellow()));
    }
    line
}

pub fn scope_line(scope: &DomainScope) -> String {
    format!(
        "  {} {:<10} {} {}",
        "▸".cyan(),
        scope.kind().to_string(),
        scope.id().cyan(),
        scope.name().dimmed()
    )
}

pub fn plugin_line(plugin: &PluginSummary) -> String {
    let entities: Vec<_> = plugin.entities.iter().map(|e| e.as_str()).collect();
    format!(
        "  {} {:<16} {:<18} {:>3} subtasks  {}",
        "▸".cyan(),
        plugin.plugin,
        plugin.scope_type,
        plugin.subtask_count,
        entities.join(", ").dimmed()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use blueprint_core::domain::entity::EntityTag;

    #[test]
    fn test_task_line() {
        colored::control::set_override(false);

        let mut task = PipelineTask::new("github").with_subtasks(["collectApiIssues", "extractApiIssues"]);
        assert_eq!(task_line(&task), "    ▸ github [2 subtask(s)]");

        task.skip_on_fail = true;
        assert!(task_line(&task).ends_with("(skip on fail)"));

        assert_eq!(task_line(&PipelineTask::new("refdiff")), "    ▸ refdiff");
    }

    #[test]
    fn test_plugin_line() {
        colored::control::set_override(false);

        let summary = PluginSummary {
            plugin: "jira".to_string(),
            scope_type: "JiraBoard".to_string(),
            subtask_count: 27,
            entities: [EntityTag::Ticket, EntityTag::Cross].into(),
        };
        let line = plugin_line(&summary);
        assert!(line.contains("jira"));
        assert!(line.contains(" 27 subtasks"));
        assert!(line.ends_with("TICKET, CROSS"));
    }
}
